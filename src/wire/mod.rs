// Protobuf wire-format layer, implemented by hand.
//
// Only the subset the way codec needs: little-endian base-128 varints,
// zigzag signed mapping, field tags, length-delimited payloads and packed
// repeated scalars.
//
// # Modules
//
// - `varint` — base-128 varint encoding/decoding and zigzag mapping
// - `field`  — field tags, packed arrays, and the record cursor

pub mod field;
pub mod varint;

use thiserror::Error;

/// Low-level wire-format violations. All of them mean the record bytes are
/// malformed or truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("truncated record: varint or field runs past the end")]
    Truncated,
    #[error("varint overflows the target integer type")]
    Overflow,
    #[error("unsupported wire type {0}")]
    WireType(u32),
    #[error("invalid field number 0")]
    Field,
}

//! Pbfway: OSM PBF way-record codec in Rust.
//!
//! The crate transcodes a single "way" record (an ordered polyline of node
//! references with tags, optional metadata and optional inline coordinates)
//! between its in-memory form and the compact protobuf wire form used by the
//! OSM PBF block format:
//!
//! - Hand-rolled protobuf wire primitives (`wire`)
//! - The way/metadata data model (`way`)
//! - Block-scoped string tables (`strings`)
//! - Delta-chain and fixed-point coordinate helpers (`delta`, `grid`)
//! - Batch encoding and per-record decoding (`encoder`, `decoder`)
//!
//! Blob compression, file framing and the parallel per-block scheduling that
//! feed many records through this codec live in the surrounding block layer;
//! they interact with this crate only through string tables, grid parameters
//! and raw record bytes.
//!
//! # Quick Start
//!
//! ```
//! use pbfway::{BlockEncoder, Grid, RecordDecoder, StringTableBuilder, Way, WayDecoder, WayEncoder};
//! use pbfway::decoder::split_group;
//!
//! let mut strings = StringTableBuilder::new();
//! let mut way = Way::new(42);
//! way.nodes = vec![100, 105, 110];
//! way.tags.insert("highway".into(), "residential".into());
//!
//! let mut encoder = WayEncoder::new(&mut strings, Grid::default());
//! encoder.add(&way).unwrap();
//! let group = encoder.finalize().unwrap();
//!
//! let table = strings.freeze();
//! let decoder = WayDecoder::new(&table, Grid::default());
//! let records = split_group(&group).unwrap();
//! let decoded = decoder.parse(records[0]).unwrap();
//! assert_eq!(decoded, way);
//! ```

pub mod decoder;
pub mod delta;
pub mod encoder;
pub mod grid;
mod schema;
pub mod strings;
pub mod way;
pub mod wire;

// Re-export key types for convenience.
pub use decoder::{DecodeError, RecordDecoder, WayDecoder};
pub use encoder::{BlockEncoder, ENTRY_SIZE, EncodeError, WayEncoder};
pub use grid::Grid;
pub use strings::{IndexOutOfRange, StringTable, StringTableBuilder};
pub use way::{Info, Way};

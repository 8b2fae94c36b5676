// Way decoder: one wire-format record plus block-wide context in, one way
// entity out.
//
// Parsing is a pure function of the record bytes, the block's string table
// and its grid parameters; the decoder holds no mutable state and can parse
// any number of records from the same block.

use log::debug;
use thiserror::Error;

use crate::delta;
use crate::grid::Grid;
use crate::schema;
use crate::strings::{IndexOutOfRange, StringTable};
use crate::way::{Info, Way};
use crate::wire::field::{self, WireReader};
use crate::wire::WireError;

/// Malformed-input conditions on the decode side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error(transparent)]
    StringIndex(#[from] IndexOutOfRange),
    /// Key and value index arrays must pair up one-to-one; anything else is
    /// rejected rather than truncated to the shorter side.
    #[error("tag arity mismatch: {keys} key indices, {vals} value indices")]
    TagArity { keys: usize, vals: usize },
}

/// Shared shape of the per-record-type decoders.
pub trait RecordDecoder {
    type Record;

    /// Decode one wire-format record.
    fn parse(&self, record: &[u8]) -> Result<Self::Record, DecodeError>;
}

/// Decodes way records against one block's string table and grid.
pub struct WayDecoder<'st> {
    strings: &'st StringTable,
    grid: Grid,
}

impl<'st> WayDecoder<'st> {
    pub fn new(strings: &'st StringTable, grid: Grid) -> Self {
        Self { strings, grid }
    }

    /// Parse the metadata submessage. The empty submessage is the
    /// absent-metadata sentinel; non-empty payloads start from the proto2
    /// field defaults.
    fn parse_info(&self, payload: &[u8]) -> Result<Option<Info>, DecodeError> {
        if payload.is_empty() {
            return Ok(None);
        }
        let mut info = Info::default();
        let mut reader = WireReader::new(payload);
        while !reader.is_empty() {
            let (field_no, wire) = reader.read_tag()?;
            match (field_no, wire) {
                (schema::info::VERSION, field::WIRE_VARINT) => {
                    info.version = reader.read_i64()? as i32;
                }
                (schema::info::TIMESTAMP, field::WIRE_VARINT) => {
                    info.timestamp = reader.read_i64()?;
                }
                (schema::info::CHANGESET, field::WIRE_VARINT) => {
                    info.changeset = reader.read_i64()?;
                }
                (schema::info::UID, field::WIRE_VARINT) => {
                    info.uid = reader.read_i64()? as i32;
                }
                (schema::info::USER_SID, field::WIRE_VARINT) => {
                    info.username = self.strings.resolve(reader.read_u32()?)?.to_owned();
                }
                (schema::info::VISIBLE, field::WIRE_VARINT) => {
                    info.visible = reader.read_u64()? != 0;
                }
                (_, wire) => reader.skip(wire)?,
            }
        }
        Ok(Some(info))
    }
}

impl RecordDecoder for WayDecoder<'_> {
    type Record = Way;

    fn parse(&self, record: &[u8]) -> Result<Way, DecodeError> {
        let mut reader = WireReader::new(record);
        let mut way = Way::default();
        let mut keys = Vec::new();
        let mut vals = Vec::new();
        let mut info_payload: Option<&[u8]> = None;
        let mut refs = Vec::new();
        let mut lat_deltas = Vec::new();
        let mut lon_deltas = Vec::new();

        while !reader.is_empty() {
            let (field_no, wire) = reader.read_tag()?;
            match field_no {
                schema::way::ID if wire == field::WIRE_VARINT => way.id = reader.read_i64()?,
                schema::way::KEYS => reader.read_repeated_u32(wire, &mut keys)?,
                schema::way::VALS => reader.read_repeated_u32(wire, &mut vals)?,
                schema::way::INFO if wire == field::WIRE_LEN => {
                    info_payload = Some(reader.read_bytes()?);
                }
                schema::way::REFS => reader.read_repeated_sint64(wire, &mut refs)?,
                schema::way::LAT => reader.read_repeated_sint64(wire, &mut lat_deltas)?,
                schema::way::LON => reader.read_repeated_sint64(wire, &mut lon_deltas)?,
                _ => reader.skip(wire)?,
            }
        }

        if keys.len() != vals.len() {
            return Err(DecodeError::TagArity {
                keys: keys.len(),
                vals: vals.len(),
            });
        }
        for (key, val) in keys.iter().zip(&vals) {
            way.tags.insert(
                self.strings.resolve(*key)?.to_owned(),
                self.strings.resolve(*val)?.to_owned(),
            );
        }

        if let Some(payload) = info_payload {
            way.info = self.parse_info(payload)?;
        }

        way.nodes = delta::unfold(&refs);

        // Coordinates only when both axes line up with the refs; otherwise
        // degrade to "no inline coordinates". Never partially populated.
        if lat_deltas.len() == refs.len() && lat_deltas.len() == lon_deltas.len() {
            way.lat = delta::unfold(&lat_deltas)
                .into_iter()
                .map(|unit| self.grid.lat_to_degrees(unit))
                .collect();
            way.lon = delta::unfold(&lon_deltas)
                .into_iter()
                .map(|unit| self.grid.lon_to_degrees(unit))
                .collect();
        }

        debug!(
            "decoded way {}: {} nodes, {} tags, coordinates={}",
            way.id,
            way.nodes.len(),
            way.tags.len(),
            !way.lat.is_empty()
        );
        Ok(way)
    }
}

/// Walk a primitive group and return its raw way records in order, skipping
/// any other record types sharing the group. Full blob handling stays with
/// the surrounding block layer; this is the minimal split its callers need.
pub fn split_group(group: &[u8]) -> Result<Vec<&[u8]>, DecodeError> {
    let mut reader = WireReader::new(group);
    let mut ways = Vec::new();
    while !reader.is_empty() {
        let (field_no, wire) = reader.read_tag()?;
        if field_no == schema::group::WAYS && wire == field::WIRE_LEN {
            ways.push(reader.read_bytes()?);
        } else {
            reader.skip(wire)?;
        }
    }
    Ok(ways)
}

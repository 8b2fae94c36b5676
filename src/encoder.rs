// Way encoder: accumulates ways into one encoded primitive group.
//
// The encoder is stateful and single-use: once `finalize` has run, any
// further call fails with `EncodeError::Finalized`. It is not safe for
// concurrent use; the surrounding block layer runs one encoder plus one
// string table per block and never shares them across threads.

use std::mem;

use log::debug;
use thiserror::Error;

use crate::delta;
use crate::grid::Grid;
use crate::schema;
use crate::strings::StringTableBuilder;
use crate::way::Way;
use crate::wire::field;

/// Byte-cost unit for the size estimate. Not part of the wire format;
/// varint packing usually lands well under this, so the estimate is a
/// conservative upper bound for the blob assembler's batching decisions.
pub const ENTRY_SIZE: usize = 8;

/// Invalid-usage conditions on the encode side. These signal a bug in the
/// caller, not a data problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("encoder already finalized")]
    Finalized,
}

/// Shared shape of the per-record-type batch encoders (way, and by analogy
/// node and relation): feed records, watch the size estimate, finalize into
/// one primitive group.
pub trait BlockEncoder {
    type Record;

    /// Accumulate one record.
    fn add(&mut self, record: &Self::Record) -> Result<(), EncodeError>;

    /// Conservative upper bound on the encoded size of the batch so far.
    /// Zero before the first `add`; never decreases.
    fn estimate_size(&self) -> usize;

    /// Close the batch and return the encoded primitive-group bytes.
    fn finalize(&mut self) -> Result<Vec<u8>, EncodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Accumulating,
    Finalized,
}

/// Accumulates way records and encodes them into one primitive group.
pub struct WayEncoder<'st> {
    /// Block-wide deduplicating string table, injected by the block layer.
    strings: &'st mut StringTableBuilder,
    /// Coordinate grid of the block being written.
    grid: Grid,
    /// Encoded group bytes accumulated so far.
    group: Vec<u8>,
    /// Running cost of all member arrays, in `ENTRY_SIZE` units.
    members_len: usize,
    /// Running cost of all key/value index arrays.
    tags_len: usize,
    way_count: usize,
    state: State,
}

impl<'st> WayEncoder<'st> {
    pub fn new(strings: &'st mut StringTableBuilder, grid: Grid) -> Self {
        Self {
            strings,
            grid,
            group: Vec::new(),
            members_len: 0,
            tags_len: 0,
            way_count: 0,
            state: State::Accumulating,
        }
    }

    /// Encode the metadata submessage. Absent metadata is the empty
    /// submessage, which stays distinguishable from explicitly-zero fields.
    fn encode_info(&mut self, way: &Way) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(info) = &way.info {
            field::write_int64(&mut buf, schema::info::VERSION, i64::from(info.version));
            field::write_int64(&mut buf, schema::info::TIMESTAMP, info.timestamp);
            field::write_int64(&mut buf, schema::info::CHANGESET, info.changeset);
            field::write_int64(&mut buf, schema::info::UID, i64::from(info.uid));
            let user_sid = self.strings.index_of(&info.username);
            field::write_uint32(&mut buf, schema::info::USER_SID, user_sid);
            field::write_bool(&mut buf, schema::info::VISIBLE, info.visible);
        }
        buf
    }

    fn add_impl(&mut self, way: &Way) {
        let mut record = Vec::new();
        field::write_int64(&mut record, schema::way::ID, way.id);

        let mut keys = Vec::with_capacity(way.tags.len());
        let mut vals = Vec::with_capacity(way.tags.len());
        for (key, val) in &way.tags {
            keys.push(self.strings.index_of(key));
            vals.push(self.strings.index_of(val));
        }
        field::write_packed_u32(&mut record, schema::way::KEYS, &keys);
        field::write_packed_u32(&mut record, schema::way::VALS, &vals);
        self.tags_len += way.tags.len() * ENTRY_SIZE;

        let info = self.encode_info(way);
        field::write_bytes(&mut record, schema::way::INFO, &info);

        field::write_packed_sint64(&mut record, schema::way::REFS, &delta::fold(&way.nodes));

        // Coordinates only as a matched pair, quantized per axis with the
        // decode transform's inverse. Anything off-cardinality is skipped
        // entirely rather than partially emitted.
        let mut member_multiply = 1;
        if way.has_inline_coordinates() {
            let lat_units: Vec<i64> = way.lat.iter().map(|&d| self.grid.lat_to_unit(d)).collect();
            let lon_units: Vec<i64> = way.lon.iter().map(|&d| self.grid.lon_to_unit(d)).collect();
            field::write_packed_sint64(&mut record, schema::way::LAT, &delta::fold(&lat_units));
            field::write_packed_sint64(&mut record, schema::way::LON, &delta::fold(&lon_units));
            member_multiply += 2;
        }
        self.members_len += way.nodes.len() * ENTRY_SIZE * member_multiply;

        field::write_bytes(&mut self.group, schema::group::WAYS, &record);
        self.way_count += 1;
    }
}

impl BlockEncoder for WayEncoder<'_> {
    type Record = Way;

    fn add(&mut self, way: &Way) -> Result<(), EncodeError> {
        if self.state == State::Finalized {
            return Err(EncodeError::Finalized);
        }
        self.add_impl(way);
        Ok(())
    }

    fn estimate_size(&self) -> usize {
        self.members_len + self.tags_len + self.way_count * ENTRY_SIZE
    }

    fn finalize(&mut self) -> Result<Vec<u8>, EncodeError> {
        if self.state == State::Finalized {
            return Err(EncodeError::Finalized);
        }
        self.state = State::Finalized;
        debug!(
            "finalized way group: {} ways, {} bytes encoded, {} estimated",
            self.way_count,
            self.group.len(),
            self.estimate_size()
        );
        Ok(mem::take(&mut self.group))
    }
}

// Block-scoped string tables.
//
// The wire format never stores tag text inline; records carry small integer
// indices into a per-block table instead. The builder side deduplicates and
// grows monotonically while a block is being written; the read side is
// frozen for the lifetime of the block. Neither is shared across blocks.

use std::collections::HashMap;

use thiserror::Error;

/// A record referenced a string index past the end of the block's table.
/// Always malformed input; never silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("string index {index} out of range for table of {len} entries")]
pub struct IndexOutOfRange {
    pub index: u32,
    pub len: usize,
}

/// Read-only string table for decoding one block.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    pub fn new(strings: Vec<String>) -> Self {
        Self { strings }
    }

    /// Resolve an index from the wire back to text.
    pub fn resolve(&self, index: u32) -> Result<&str, IndexOutOfRange> {
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or(IndexOutOfRange {
                index,
                len: self.strings.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Deduplicating string table under construction for one block.
///
/// Index 0 is seeded with the empty string; the format reserves it.
/// Index assignment order is first-use order and stays stable for the
/// lifetime of the block.
#[derive(Debug)]
pub struct StringTableBuilder {
    strings: Vec<String>,
    index: HashMap<String, u32>,
}

impl StringTableBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            strings: Vec::new(),
            index: HashMap::new(),
        };
        builder.index_of("");
        builder
    }

    /// The index for `text`, allocating a new entry on first use.
    pub fn index_of(&mut self, text: &str) -> u32 {
        if let Some(&idx) = self.index.get(text) {
            return idx;
        }
        let idx = self.strings.len() as u32;
        self.strings.push(text.to_owned());
        self.index.insert(text.to_owned(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Freeze into the read-only table used on the decode side. The block
    /// writer calls this once all records of the block have been encoded.
    pub fn freeze(self) -> StringTable {
        StringTable::new(self.strings)
    }
}

impl Default for StringTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// In-memory data model for a single way record.
//
// A way is built once by the producer (encode path) or by the decoder
// (decode path) and is immutable once handed downstream. Identifier
// uniqueness across a collection is the caller's business, not checked here.

use std::collections::HashMap;

/// Authorship metadata attached to a record.
///
/// Absent metadata (`Way::info == None`) and all-zero metadata are distinct
/// states and survive a round trip as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub changeset: i64,
    pub timestamp: i64,
    pub uid: i32,
    pub username: String,
    pub version: i32,
    pub visible: bool,
}

impl Default for Info {
    /// Proto2 field defaults from `Osmformat.Info`: `version` defaults to -1
    /// and `visible` to true when a writer omits those fields.
    fn default() -> Self {
        Self {
            changeset: 0,
            timestamp: 0,
            uid: 0,
            username: String::new(),
            version: -1,
            visible: true,
        }
    }
}

/// A single OSM way: an ordered sequence of node references plus tags,
/// optional metadata and optional inline coordinates.
///
/// `lat` and `lon` are degree values parallel to `nodes`; they are either
/// both empty or both exactly `nodes.len()` long. Partial coordinate data
/// never crosses the wire in either direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Way {
    pub id: i64,
    pub tags: HashMap<String, String>,
    pub info: Option<Info>,
    pub nodes: Vec<i64>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

impl Way {
    /// A bare way with the given id and everything else empty.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Whether the inline-coordinate invariant holds: both axes match the
    /// node count. Trivially true when the way is empty.
    pub fn has_inline_coordinates(&self) -> bool {
        self.lat.len() == self.lon.len() && self.lon.len() == self.nodes.len()
    }
}

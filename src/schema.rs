// Osmformat field numbers used by the way codec (proto2 schema).

/// `Osmformat.Way` fields.
pub mod way {
    pub const ID: u32 = 1;
    pub const KEYS: u32 = 2;
    pub const VALS: u32 = 3;
    pub const INFO: u32 = 4;
    pub const REFS: u32 = 8;
    pub const LAT: u32 = 9;
    pub const LON: u32 = 10;
}

/// `Osmformat.Info` fields.
pub mod info {
    pub const VERSION: u32 = 1;
    pub const TIMESTAMP: u32 = 2;
    pub const CHANGESET: u32 = 3;
    pub const UID: u32 = 4;
    pub const USER_SID: u32 = 5;
    pub const VISIBLE: u32 = 6;
}

/// `Osmformat.PrimitiveGroup` fields (only the one this codec produces).
pub mod group {
    pub const WAYS: u32 = 3;
}

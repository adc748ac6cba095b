use serde::{Deserialize, Serialize};

/// Byte length of an `Iloc` payload: x, y, then eight reserved bytes.
pub const ICON_LOCATION_LEN: usize = 16;

/// A point on the Finder's icon grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Decode an `Iloc` payload. Anything other than exactly 16 bytes is
    /// treated as "no position".
    pub fn from_icon_location(blob: &[u8]) -> Option<Self> {
        if blob.len() != ICON_LOCATION_LEN {
            return None;
        }
        let x = u32::from_be_bytes([blob[0], blob[1], blob[2], blob[3]]);
        let y = u32::from_be_bytes([blob[4], blob[5], blob[6], blob[7]]);
        Some(Self { x, y })
    }
}

/// Icon position of a single file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePosition {
    pub filename: String,
    pub x: u32,
    pub y: u32,
}

impl FilePosition {
    /// Position of `filename` at `point`.
    pub fn new(filename: impl Into<String>, point: Point) -> Self {
        Self {
            filename: filename.into(),
            x: point.x,
            y: point.y,
        }
    }

    /// Coordinates without the filename.
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// Axis-aligned bounding box over a set of positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
    pub width: u32,
    pub height: u32,
}

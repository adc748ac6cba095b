use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TypeError, TypeResult};

/// A four-character code as stored on disk.
///
/// Field codes (`Iloc`, `bwsp`, ...) and value type tags (`blob`, `ustr`, ...)
/// are both four raw bytes. They are nearly always ASCII, but nothing in the
/// container enforces that, so the raw bytes are kept and rendered lossily.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCc([u8; 4]);

impl FourCc {
    /// Icon location: 16-byte blob holding the icon's x/y grid position.
    pub const ICON_LOCATION: Self = Self(*b"Iloc");

    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The raw four bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Returns `true` if every byte is printable ASCII.
    pub fn is_ascii(&self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }

    /// Lossy string form.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ascii() {
            write!(f, "FourCc({})", self.to_string_lossy())
        } else {
            write!(f, "FourCc(0x{})", hex::encode(self.0))
        }
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl FromStr for FourCc {
    type Err = TypeError;

    fn from_str(s: &str) -> TypeResult<Self> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| TypeError::InvalidFourCc(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&[u8]> for FourCc {
    type Error = TypeError;

    fn try_from(bytes: &[u8]) -> TypeResult<Self> {
        let arr: [u8; 4] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: 4,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl PartialEq<str> for FourCc {
    fn eq(&self, other: &str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for FourCc {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl Serialize for FourCc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

impl<'de> Deserialize<'de> for FourCc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

use serde::{Deserialize, Serialize};

use crate::code::FourCc;

/// Wire type of a field value, identified by its four-byte tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// `bool`: one byte, low bit significant.
    Bool,
    /// `shor`: two-byte integer padded to four on the wire.
    Shor,
    /// `long`: four-byte big-endian integer.
    Long,
    /// `comp`: eight-byte big-endian integer.
    Comp,
    /// `dutc`: eight-byte big-endian timestamp.
    Dutc,
    /// `type`: a four-character code.
    Type,
    /// `blob`: length-prefixed raw bytes.
    Blob,
    /// `ustr`: length-prefixed UTF-16BE text.
    Ustr,
}

impl ValueKind {
    /// All known kinds in tag order.
    pub const ALL: [ValueKind; 8] = [
        Self::Bool,
        Self::Shor,
        Self::Long,
        Self::Comp,
        Self::Dutc,
        Self::Type,
        Self::Blob,
        Self::Ustr,
    ];

    /// The on-disk tag.
    pub fn tag(&self) -> FourCc {
        FourCc::new(match self {
            Self::Bool => *b"bool",
            Self::Shor => *b"shor",
            Self::Long => *b"long",
            Self::Comp => *b"comp",
            Self::Dutc => *b"dutc",
            Self::Type => *b"type",
            Self::Blob => *b"blob",
            Self::Ustr => *b"ustr",
        })
    }

    /// Parse an on-disk tag. Unknown tags yield `None`.
    pub fn from_tag(tag: FourCc) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// A decoded field value.
///
/// The variant is chosen by the decoder from the wire tag: `shor`/`long`
/// decode to [`FieldValue::UInt32`], `comp`/`dutc` to [`FieldValue::UInt64`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Bool(bool),
    UInt32(u32),
    UInt64(u64),
    TypeCode(FourCc),
    Blob(#[serde(with = "hex_bytes")] Vec<u8>),
    Text(String),
}

impl FieldValue {
    /// Blob payload, if this is a blob.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Integer payload widened to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt32(v) => Some(u64::from(*v)),
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The kind this value would be written as. Integers report the wider
    /// of their two possible tags (`long`, `comp`).
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::UInt32(_) => ValueKind::Long,
            Self::UInt64(_) => ValueKind::Comp,
            Self::TypeCode(_) => ValueKind::Type,
            Self::Blob(_) => ValueKind::Blob,
            Self::Text(_) => ValueKind::Ustr,
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_resolve_to_kinds() {
        for kind in ValueKind::ALL {
            assert_eq!(ValueKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn unknown_tag() {
        assert_eq!(ValueKind::from_tag(FourCc::new(*b"book")), None);
        assert_eq!(ValueKind::from_tag(FourCc::new(*b"BLOB")), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(FieldValue::UInt32(7).as_u64(), Some(7));
        assert_eq!(FieldValue::UInt64(1 << 40).as_u64(), Some(1 << 40));
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Text("x".into()).as_text(), Some("x"));
        assert_eq!(FieldValue::Blob(vec![1, 2]).as_blob(), Some(&[1u8, 2][..]));
        assert!(FieldValue::Bool(false).as_blob().is_none());
    }

    #[test]
    fn blob_serializes_as_hex() {
        let json = serde_json::to_string(&FieldValue::Blob(vec![0xde, 0xad])).unwrap();
        assert_eq!(json, r#"{"type":"blob","value":"dead"}"#);
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FieldValue::Blob(vec![0xde, 0xad]));
    }

    #[test]
    fn type_code_serializes_as_string() {
        let json = serde_json::to_string(&FieldValue::TypeCode(FourCc::new(*b"icnv"))).unwrap();
        assert_eq!(json, r#"{"type":"type_code","value":"icnv"}"#);
    }
}

use dsstore_types::{FieldValue, FourCc, ValueKind};

use crate::cursor::ByteCursor;
use crate::error::{ParseResult, ParsingError};

/// Decode one tagged value: a four-byte type tag followed by its payload.
///
/// Unknown tags are fatal. Only `blob` and `ustr` carry a length, so there
/// is no way to skip a value of unknown width and stay aligned.
pub fn decode_value(cursor: &mut ByteCursor<'_>) -> ParseResult<FieldValue> {
    let offset = cursor.position();
    let tag = FourCc::new(cursor.read_array()?);
    let kind = ValueKind::from_tag(tag).ok_or_else(|| ParsingError::UnknownValueType {
        tag: tag.to_string_lossy(),
        offset,
    })?;
    decode_payload(cursor, kind)
}

/// Decode the payload of a value whose tag has already been read.
pub fn decode_payload(cursor: &mut ByteCursor<'_>, kind: ValueKind) -> ParseResult<FieldValue> {
    Ok(match kind {
        ValueKind::Bool => FieldValue::Bool(cursor.read_u8()? & 0x01 != 0),
        // shor is two bytes of padding followed by the value
        ValueKind::Shor | ValueKind::Long => FieldValue::UInt32(cursor.read_u32_be()?),
        ValueKind::Comp | ValueKind::Dutc => FieldValue::UInt64(cursor.read_u64_be()?),
        ValueKind::Type => FieldValue::TypeCode(FourCc::new(cursor.read_array()?)),
        ValueKind::Blob => {
            let len = cursor.read_u32_be()?;
            FieldValue::Blob(cursor.read_bytes(len as usize)?.to_vec())
        }
        ValueKind::Ustr => {
            let chars = cursor.read_u32_be()?;
            FieldValue::Text(cursor.read_utf16_be(chars)?)
        }
    })
}

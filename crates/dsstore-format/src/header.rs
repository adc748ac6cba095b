use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cursor::ByteCursor;
use crate::error::{ParseResult, ParsingError};

/// Expected first word of every file.
pub const ALIGNMENT_MARKER: u32 = 0x0000_0001;

/// `Bud1`.
pub const MAGIC: u32 = 0x4275_6431;

/// Stored offsets are relative to the byte after the alignment marker.
pub const ADDRESS_BASE: u32 = 0x4;

/// Bytes consumed by [`Header::decode`].
pub const HEADER_LEN: usize = 20;

/// Fixed-size file header.
///
/// ```text
/// [u32 alignment = 1][u32 magic = "Bud1"]
/// [u32 allocator offset - 4][u32 allocator length][u32 allocator offset - 4]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alignment: u32,
    pub magic: u32,
    /// Absolute byte offset of the allocator block. Wider than the stored
    /// delta so an out-of-range delta stays out of range.
    pub allocator_offset: u64,
    pub allocator_length: u32,
    /// Absolute offset decoded from the redundant copy.
    pub allocator_offset_copy: u64,
}

impl Header {
    /// Decode the header at the cursor's current position.
    ///
    /// Only a wrong magic is fatal. A wrong alignment marker or a mismatched
    /// offset copy is logged and parsing carries on.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> ParseResult<Self> {
        let alignment = cursor.read_u32_be()?;
        if alignment != ALIGNMENT_MARKER {
            warn!(alignment, "alignment int {alignment:#x} not 0x00000001");
        }

        let magic = cursor.read_u32_be()?;
        if magic != MAGIC {
            return Err(ParsingError::BadMagic { actual: magic });
        }

        let allocator_offset = absolute(cursor.read_u32_be()?);
        let allocator_length = cursor.read_u32_be()?;
        let allocator_offset_copy = absolute(cursor.read_u32_be()?);
        if allocator_offset_copy != allocator_offset {
            warn!(
                allocator_offset,
                allocator_offset_copy,
                "allocator offsets {allocator_offset:#x} and {allocator_offset_copy:#x} unequal"
            );
        }

        Ok(Self {
            alignment,
            magic,
            allocator_offset,
            allocator_length,
            allocator_offset_copy,
        })
    }

    /// Returns `true` if both advisory checks passed.
    pub fn is_consistent(&self) -> bool {
        self.alignment == ALIGNMENT_MARKER && self.allocator_offset == self.allocator_offset_copy
    }
}

/// Absolute file offset of a stored allocator delta.
fn absolute(delta: u32) -> u64 {
    u64::from(ADDRESS_BASE) + u64::from(delta)
}

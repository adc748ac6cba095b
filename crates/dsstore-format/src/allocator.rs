use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cursor::ByteCursor;
use crate::error::{ParseResult, ParsingError};
use crate::header::{Header, ADDRESS_BASE};

/// Distance from the allocator start to its table of contents.
pub const DIRECTORY_OFFSET: usize = 0x408;

/// One free list per power-of-two size class, 2^0 through 2^31.
pub const FREE_LIST_BUCKETS: usize = 32;

/// Table-of-contents key naming the record tree's master block.
pub const ROOT_DIRECTORY_KEY: &str = "DSDB";

/// Low bits of a block descriptor hold log2 of the block size.
const SIZE_CLASS_MASK: u32 = 0x1f;

/// A block descriptor split into its address and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAddress {
    /// Address relative to [`ADDRESS_BASE`], always a multiple of 32.
    pub offset: u32,
    /// Block size in bytes.
    pub size: u32,
}

impl BlockAddress {
    /// Unpack a block descriptor.
    pub fn from_descriptor(descriptor: u32) -> Self {
        Self {
            offset: (descriptor >> 5) << 5,
            size: 1u32 << (descriptor & SIZE_CLASS_MASK),
        }
    }

    /// Absolute position of the block's first byte in the file.
    pub fn file_offset(&self) -> usize {
        ADDRESS_BASE as usize + self.offset as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub key: String,
    pub block_id: u32,
}

/// The allocator's table of contents: tree name to master block id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub entries: Vec<DirectoryEntry>,
}

impl Directory {
    /// Block id for a key. A repeated key resolves to its last occurrence.
    pub fn get(&self, key: &str) -> Option<u32> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.block_id)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys other than `root_key`. These are never followed.
    pub fn extra_keys<'a>(&'a self, root_key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .map(|e| e.key.as_str())
            .filter(move |k| *k != root_key)
    }
}

/// Free block ids grouped by size class. Kept for diagnostics only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeList {
    pub buckets: Vec<Vec<u32>>,
}

impl FreeList {
    /// Free blocks of size `2^class`.
    pub fn bucket(&self, class: u32) -> &[u32] {
        self.buckets
            .get(class as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Free blocks across all size classes.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Decoded buddy allocator state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocator {
    /// Packed block descriptors indexed by block id.
    pub offsets: Vec<u32>,
    pub directory: Directory,
    pub free_list: FreeList,
    /// Block id of the record tree's master block.
    pub master_id: u32,
}

impl Allocator {
    /// Decode the allocator block located by `header`.
    ///
    /// Fails if `root_key` is missing from the table of contents; any other
    /// keys are logged and kept.
    pub fn decode(cursor: &mut ByteCursor<'_>, header: &Header, root_key: &str) -> ParseResult<Self> {
        let base = usize::try_from(header.allocator_offset).unwrap_or(usize::MAX);
        cursor.seek(base);

        let count = cursor.read_u32_be()?;
        let second = cursor.read_u32_be()?;
        if second != 0 {
            warn!(second, "second int of allocator {second:#x} not 0x00000000");
        }

        let mut offsets = Vec::with_capacity((count as usize).min(cursor.remaining() / 4));
        for _ in 0..count {
            offsets.push(cursor.read_u32_be()?);
        }
        debug!(count, "read block offsets");

        cursor.seek(base.saturating_add(DIRECTORY_OFFSET));
        let key_count = cursor.read_u32_be()?;
        let mut directory = Directory::default();
        for _ in 0..key_count {
            let key_len = cursor.read_u8()?;
            let key = String::from_utf8_lossy(cursor.read_bytes(key_len as usize)?).into_owned();
            let block_id = cursor.read_u32_be()?;
            if key != root_key {
                warn!(key = %key, block_id, "directory contains non-{root_key:?} key");
            }
            directory.entries.push(DirectoryEntry { key, block_id });
        }

        let master_id = directory
            .get(root_key)
            .ok_or_else(|| ParsingError::MissingDirectoryKey(root_key.to_string()))?;

        let mut buckets = Vec::with_capacity(FREE_LIST_BUCKETS);
        for _ in 0..FREE_LIST_BUCKETS {
            let len = cursor.read_u32_be()?;
            let mut ids = Vec::with_capacity((len as usize).min(cursor.remaining() / 4));
            for _ in 0..len {
                ids.push(cursor.read_u32_be()?);
            }
            buckets.push(ids);
        }
        let free_list = FreeList { buckets };

        debug!(
            keys = directory.len(),
            master_id,
            free = free_list.total(),
            "allocator decoded"
        );

        Ok(Self {
            offsets,
            directory,
            free_list,
            master_id,
        })
    }

    /// Decode the descriptor for `block_id`.
    pub fn block(&self, block_id: u32) -> ParseResult<BlockAddress> {
        self.offsets
            .get(block_id as usize)
            .map(|d| BlockAddress::from_descriptor(*d))
            .ok_or(ParsingError::InvalidBlockId {
                block_id,
                count: self.offsets.len(),
            })
    }

    /// Absolute file offset of `block_id`.
    pub fn resolve(&self, block_id: u32) -> ParseResult<usize> {
        Ok(self.block(block_id)?.file_offset())
    }

    /// Number of entries in the offset table.
    pub fn block_count(&self) -> usize {
        self.offsets.len()
    }
}

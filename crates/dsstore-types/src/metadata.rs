use serde::{Deserialize, Serialize};

/// Summary of a parsed file: header fields plus the master block counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeMetadata {
    pub alignment: u32,
    pub magic: u32,
    /// Absolute byte offset of the allocator block.
    pub allocator_offset: u64,
    pub allocator_length: u32,
    pub root_id: u32,
    pub tree_height: u32,
    pub record_count: u32,
    pub node_count: u32,
}

impl TreeMetadata {
    /// Returns `true` if the master block reported at least one record.
    pub fn has_records(&self) -> bool {
        self.record_count > 0 && self.node_count > 0
    }
}

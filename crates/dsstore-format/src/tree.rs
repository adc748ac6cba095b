use std::collections::HashSet;

use dsstore_types::{FieldValue, FourCc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::allocator::Allocator;
use crate::cursor::ByteCursor;
use crate::error::{ParseResult, ParsingError};
use crate::value::decode_value;

/// Expected fifth word of the master block (the tree's page size).
pub const MASTER_SENTINEL: u32 = 0x0000_1000;

/// The record tree's master block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterBlock {
    pub root_id: u32,
    pub tree_height: u32,
    pub record_count: u32,
    pub node_count: u32,
    pub page_size: u32,
}

impl MasterBlock {
    /// Decode the master block at the cursor.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> ParseResult<Self> {
        let root_id = cursor.read_u32_be()?;
        let tree_height = cursor.read_u32_be()?;
        let record_count = cursor.read_u32_be()?;
        let node_count = cursor.read_u32_be()?;
        let page_size = cursor.read_u32_be()?;
        if page_size != MASTER_SENTINEL {
            warn!(page_size, "fifth int of master {page_size:#x} not 0x00001000");
        }
        Ok(Self {
            root_id,
            tree_height,
            record_count,
            node_count,
            page_size,
        })
    }
}

/// One (filename, field, value) triple read from a tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub code: FourCc,
    pub value: FieldValue,
}

impl TreeEntry {
    fn decode(cursor: &mut ByteCursor<'_>) -> ParseResult<Self> {
        let name_len = cursor.read_u32_be()?;
        let name = cursor.read_utf16_be(name_len)?;
        let code = FourCc::new(cursor.read_array()?);
        let value = decode_value(cursor)?;
        Ok(Self { name, code, value })
    }
}

/// Counters gathered during a walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    pub nodes: usize,
    pub entries: usize,
    pub max_depth: u32,
}

/// Pending work for the traversal stack.
#[derive(Clone, Copy, Debug)]
enum Step {
    /// Read the header of a node block.
    Enter { block_id: u32, depth: u32 },
    /// Continue a node's entries at `resume`. For internal nodes the next
    /// read is a child id; for leaves it is an entry.
    Resume(Frame),
    /// The child before this entry has been walked; read the entry itself.
    Entry(Frame),
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    resume: usize,
    remaining: u32,
    /// Rightmost child. Zero for leaves.
    next: u32,
    depth: u32,
}

/// In-order walker over the record B-tree.
///
/// Node layout:
///
/// ```text
/// [u32 next][u32 count]
/// count x ([u32 child if next != 0][u32 name len][UTF-16BE name][4cc field][value])
/// ```
///
/// Every node read moves the shared cursor to a different block, so each
/// pending frame stores the position it must resume from. Work is kept on
/// an explicit stack; tree depth does not consume native stack.
pub struct TreeWalker<'c, 'a> {
    cursor: &'c mut ByteCursor<'a>,
    allocator: &'c Allocator,
    enforce_height: bool,
}

impl<'c, 'a> TreeWalker<'c, 'a> {
    /// Walker over `allocator`'s blocks; height enforcement is on.
    pub fn new(cursor: &'c mut ByteCursor<'a>, allocator: &'c Allocator) -> Self {
        Self {
            cursor,
            allocator,
            enforce_height: true,
        }
    }

    /// Reject nodes deeper than the master block's tree height.
    pub fn enforce_height(mut self, enforce: bool) -> Self {
        self.enforce_height = enforce;
        self
    }

    /// Read the master block named by the allocator's directory.
    pub fn read_master(&mut self) -> ParseResult<MasterBlock> {
        let offset = self.allocator.resolve(self.allocator.master_id)?;
        self.cursor.seek(offset);
        let master = MasterBlock::decode(self.cursor)?;
        debug!(
            root_id = master.root_id,
            tree_height = master.tree_height,
            records = master.record_count,
            nodes = master.node_count,
            "master block"
        );
        Ok(master)
    }

    /// Walk the tree under `master`, calling `visit` for every entry in key
    /// order.
    pub fn walk<F>(&mut self, master: &MasterBlock, mut visit: F) -> ParseResult<WalkStats>
    where
        F: FnMut(TreeEntry),
    {
        let mut stats = WalkStats::default();
        let mut seen = HashSet::new();
        let mut stack = vec![Step::Enter {
            block_id: master.root_id,
            depth: 0,
        }];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter { block_id, depth } => {
                    if self.enforce_height && depth > master.tree_height {
                        return Err(ParsingError::TreeTooDeep {
                            block_id,
                            depth,
                            height: master.tree_height,
                        });
                    }
                    if !seen.insert(block_id) {
                        return Err(ParsingError::CycleDetected(block_id));
                    }
                    let offset = self.allocator.resolve(block_id)?;
                    self.cursor.seek(offset);
                    let next = self.cursor.read_u32_be()?;
                    let remaining = self.cursor.read_u32_be()?;
                    stats.nodes += 1;
                    stats.max_depth = stats.max_depth.max(depth);
                    stack.push(Step::Resume(Frame {
                        resume: self.cursor.position(),
                        remaining,
                        next,
                        depth,
                    }));
                }
                Step::Resume(frame) => {
                    if frame.remaining == 0 {
                        if frame.next != 0 {
                            stack.push(Step::Enter {
                                block_id: frame.next,
                                depth: frame.depth + 1,
                            });
                        }
                        continue;
                    }
                    self.cursor.seek(frame.resume);
                    if frame.next != 0 {
                        let child = self.cursor.read_u32_be()?;
                        stack.push(Step::Entry(Frame {
                            resume: self.cursor.position(),
                            ..frame
                        }));
                        stack.push(Step::Enter {
                            block_id: child,
                            depth: frame.depth + 1,
                        });
                    } else {
                        stack.push(self.read_entry(frame, &mut visit)?);
                        stats.entries += 1;
                    }
                }
                Step::Entry(frame) => {
                    self.cursor.seek(frame.resume);
                    stack.push(self.read_entry(frame, &mut visit)?);
                    stats.entries += 1;
                }
            }
        }

        debug!(nodes = stats.nodes, entries = stats.entries, "tree walk complete");
        Ok(stats)
    }

    /// Read one entry at the cursor and return the step that continues the
    /// node after it.
    fn read_entry<F>(&mut self, frame: Frame, visit: &mut F) -> ParseResult<Step>
    where
        F: FnMut(TreeEntry),
    {
        let entry = TreeEntry::decode(self.cursor)?;
        visit(entry);
        Ok(Step::Resume(Frame {
            resume: self.cursor.position(),
            remaining: frame.remaining - 1,
            ..frame
        }))
    }
}

//! Synthesized `.DS_Store` buffers for tests.
//!
//! Produces the smallest layout the parser accepts: header, a master block at
//! address `0x20`, the allocator at `0x800`, and tree nodes from `0x1000`
//! upward, each aligned to its power-of-two size. Knobs exist for every
//! advisory and fatal check so tests can corrupt one thing at a time.

use dsstore_types::{FieldValue, FourCc};

use crate::allocator::{DIRECTORY_OFFSET, FREE_LIST_BUCKETS, ROOT_DIRECTORY_KEY};
use crate::header::{ALIGNMENT_MARKER, MAGIC};
use crate::tree::MASTER_SENTINEL;

const MASTER_ADDR: u32 = 0x20;
const ALLOCATOR_ADDR: u32 = 0x800;
const ALLOCATOR_LOG2: u32 = 11;
const NODES_ADDR: u32 = 0x1000;
const MIN_BLOCK: usize = 32;

/// One tree entry in wire form.
#[derive(Clone, Debug)]
pub struct FixtureEntry {
    pub name: String,
    pub code: FourCc,
    pub tag: [u8; 4],
    pub payload: Vec<u8>,
}

impl FixtureEntry {
    /// Encode `value` with the tag reported by [`FieldValue::kind`].
    pub fn new(name: &str, code: &str, value: &FieldValue) -> Self {
        let payload = match value {
            FieldValue::Bool(b) => vec![u8::from(*b)],
            FieldValue::UInt32(v) => v.to_be_bytes().to_vec(),
            FieldValue::UInt64(v) => v.to_be_bytes().to_vec(),
            FieldValue::TypeCode(t) => t.as_bytes().to_vec(),
            FieldValue::Blob(bytes) => {
                let mut out = (bytes.len() as u32).to_be_bytes().to_vec();
                out.extend_from_slice(bytes);
                out
            }
            FieldValue::Text(text) => utf16_with_len(text),
        };
        Self::raw(name, code, value.kind().tag().as_bytes(), payload)
    }

    /// An entry with an arbitrary tag and payload.
    pub fn raw(name: &str, code: &str, tag: &[u8; 4], payload: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            code: FourCc::new(four(code)),
            tag: *tag,
            payload,
        }
    }

    /// A 16-byte `Iloc` blob for (`x`, `y`).
    pub fn icon_location(name: &str, x: u32, y: u32) -> Self {
        Self::new(name, "Iloc", &FieldValue::Blob(iloc_payload(x, y)))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&utf16_with_len(&self.name));
        out.extend_from_slice(self.code.as_bytes());
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.payload);
    }
}

/// A tree node. Internal nodes have one more child than entries; the last
/// child becomes the node's `next` pointer.
#[derive(Clone, Debug)]
pub enum FixtureNode {
    Leaf(Vec<FixtureEntry>),
    Internal {
        children: Vec<FixtureNode>,
        entries: Vec<FixtureEntry>,
    },
}

/// Where the builder placed things.
#[derive(Clone, Debug, Default)]
pub struct FixtureLayout {
    pub allocator_offset: usize,
    pub master_offset: usize,
    /// Block ids of tree nodes in pre-order (root first).
    pub node_ids: Vec<u32>,
    /// Absolute file offsets of tree nodes, parallel to `node_ids`.
    pub node_offsets: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct FixtureBuilder {
    root: FixtureNode,
    alignment: u32,
    magic: u32,
    offset_copy_delta: u32,
    allocator_second: u32,
    root_key: String,
    extra_keys: Vec<(String, u32)>,
    sentinel: u32,
    tree_height: Option<u32>,
    free: Vec<(usize, Vec<u32>)>,
}

impl FixtureBuilder {
    /// A file whose tree is a single leaf.
    pub fn leaf(entries: Vec<FixtureEntry>) -> Self {
        Self::tree(FixtureNode::Leaf(entries))
    }

    /// A file whose record tree has the given shape.
    pub fn tree(root: FixtureNode) -> Self {
        Self {
            root,
            alignment: ALIGNMENT_MARKER,
            magic: MAGIC,
            offset_copy_delta: 0,
            allocator_second: 0,
            root_key: ROOT_DIRECTORY_KEY.to_string(),
            extra_keys: Vec::new(),
            sentinel: MASTER_SENTINEL,
            tree_height: None,
            free: Vec::new(),
        }
    }

    pub fn alignment(mut self, alignment: u32) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn magic(mut self, magic: u32) -> Self {
        self.magic = magic;
        self
    }

    /// Skew the redundant allocator offset by `delta`.
    pub fn offset_copy_delta(mut self, delta: u32) -> Self {
        self.offset_copy_delta = delta;
        self
    }

    pub fn allocator_second(mut self, value: u32) -> Self {
        self.allocator_second = value;
        self
    }

    /// Key under which the master block is registered.
    pub fn root_key(mut self, key: &str) -> Self {
        self.root_key = key.to_string();
        self
    }

    pub fn extra_key(mut self, key: &str, block_id: u32) -> Self {
        self.extra_keys.push((key.to_string(), block_id));
        self
    }

    pub fn sentinel(mut self, sentinel: u32) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Override the tree height written to the master block.
    pub fn tree_height(mut self, height: u32) -> Self {
        self.tree_height = Some(height);
        self
    }

    pub fn free_blocks(mut self, size_class: usize, ids: Vec<u32>) -> Self {
        self.free.push((size_class, ids));
        self
    }

    /// Serialize the file.
    pub fn build(&self) -> Vec<u8> {
        self.build_with_layout().0
    }

    pub fn build_with_layout(&self) -> (Vec<u8>, FixtureLayout) {
        let mut nodes = Vec::new();
        let mut height = 0;
        let mut records = 0u32;
        serialize_node(&self.root, 0, &mut nodes, &mut height, &mut records);

        let mut descriptors = vec![
            ALLOCATOR_ADDR | ALLOCATOR_LOG2,
            MASTER_ADDR | MIN_BLOCK.trailing_zeros(),
        ];
        let mut placed = Vec::with_capacity(nodes.len());
        let mut addr = NODES_ADDR as usize;
        for bytes in &nodes {
            let size = bytes.len().next_power_of_two().max(MIN_BLOCK);
            addr = addr.next_multiple_of(size);
            descriptors.push(addr as u32 | size.trailing_zeros());
            placed.push(addr);
            addr += size;
        }

        let mut data = vec![0u8; 4 + addr];
        let put = |data: &mut Vec<u8>, at: usize, bytes: &[u8]| {
            data[at..at + bytes.len()].copy_from_slice(bytes);
        };

        let header: Vec<u8> = [
            self.alignment,
            self.magic,
            ALLOCATOR_ADDR,
            1 << ALLOCATOR_LOG2,
            ALLOCATOR_ADDR.wrapping_add(self.offset_copy_delta),
        ]
        .iter()
        .flat_map(|w| w.to_be_bytes())
        .collect();
        put(&mut data, 0, &header);

        let master_offset = 4 + MASTER_ADDR as usize;
        let master: Vec<u8> = [
            2,
            self.tree_height.unwrap_or(height),
            records,
            nodes.len() as u32,
            self.sentinel,
        ]
        .iter()
        .flat_map(|w| w.to_be_bytes())
        .collect();
        put(&mut data, master_offset, &master);

        let allocator_offset = 4 + ALLOCATOR_ADDR as usize;
        let mut table = Vec::new();
        table.extend_from_slice(&(descriptors.len() as u32).to_be_bytes());
        table.extend_from_slice(&self.allocator_second.to_be_bytes());
        for d in &descriptors {
            table.extend_from_slice(&d.to_be_bytes());
        }
        assert!(table.len() <= DIRECTORY_OFFSET, "too many blocks for fixture");
        put(&mut data, allocator_offset, &table);

        let mut toc = Vec::new();
        let keys: Vec<(&str, u32)> = self
            .extra_keys
            .iter()
            .map(|(k, id)| (k.as_str(), *id))
            .chain(std::iter::once((self.root_key.as_str(), 1)))
            .collect();
        toc.extend_from_slice(&(keys.len() as u32).to_be_bytes());
        for (key, id) in keys {
            toc.push(key.len() as u8);
            toc.extend_from_slice(key.as_bytes());
            toc.extend_from_slice(&id.to_be_bytes());
        }
        for bucket in 0..FREE_LIST_BUCKETS {
            let ids: Vec<u32> = self
                .free
                .iter()
                .filter(|(b, _)| *b == bucket)
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect();
            toc.extend_from_slice(&(ids.len() as u32).to_be_bytes());
            for id in ids {
                toc.extend_from_slice(&id.to_be_bytes());
            }
        }
        assert!(
            DIRECTORY_OFFSET + toc.len() <= 1 << ALLOCATOR_LOG2,
            "allocator overflows its block"
        );
        put(&mut data, allocator_offset + DIRECTORY_OFFSET, &toc);

        let mut layout = FixtureLayout {
            allocator_offset,
            master_offset,
            ..FixtureLayout::default()
        };
        for (i, (bytes, addr)) in nodes.iter().zip(&placed).enumerate() {
            let offset = 4 + addr;
            put(&mut data, offset, bytes);
            layout.node_ids.push(2 + i as u32);
            layout.node_offsets.push(offset);
        }

        (data, layout)
    }
}

/// Serialize `node` and its subtree in pre-order. Returns the node's block id.
fn serialize_node(
    node: &FixtureNode,
    depth: u32,
    out: &mut Vec<Vec<u8>>,
    height: &mut u32,
    records: &mut u32,
) -> u32 {
    let slot = out.len();
    out.push(Vec::new());
    *height = (*height).max(depth);

    let mut bytes = Vec::new();
    match node {
        FixtureNode::Leaf(entries) => {
            bytes.extend_from_slice(&0u32.to_be_bytes());
            bytes.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            for entry in entries {
                entry.encode(&mut bytes);
            }
            *records += entries.len() as u32;
        }
        FixtureNode::Internal { children, entries } => {
            assert_eq!(
                children.len(),
                entries.len() + 1,
                "internal node needs one more child than entries"
            );
            let ids: Vec<u32> = children
                .iter()
                .map(|child| serialize_node(child, depth + 1, out, height, records))
                .collect();
            bytes.extend_from_slice(&ids[ids.len() - 1].to_be_bytes());
            bytes.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            for (entry, child) in entries.iter().zip(&ids) {
                bytes.extend_from_slice(&child.to_be_bytes());
                entry.encode(&mut bytes);
            }
            *records += entries.len() as u32;
        }
    }
    out[slot] = bytes;
    2 + slot as u32
}

/// A 16-byte `Iloc` payload.
pub fn iloc_payload(x: u32, y: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    out.extend_from_slice(&x.to_be_bytes());
    out.extend_from_slice(&y.to_be_bytes());
    out.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);
    out
}

fn utf16_with_len(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut out = (units.len() as u32).to_be_bytes().to_vec();
    for unit in units {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

fn four(code: &str) -> [u8; 4] {
    let mut out = [b' '; 4];
    for (slot, b) in out.iter_mut().zip(code.bytes()) {
        *slot = b;
    }
    out
}

use std::path::Path;

use dsstore_types::{Record, TreeMetadata};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocator::Allocator;
use crate::assembler::RecordAssembler;
use crate::config::ParserConfig;
use crate::cursor::ByteCursor;
use crate::error::ParseResult;
use crate::header::{Header, ALIGNMENT_MARKER, MAGIC};
use crate::tree::{MasterBlock, TreeWalker, WalkStats};

/// A fully parsed file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsStore {
    pub header: Header,
    pub allocator: Allocator,
    pub master: MasterBlock,
    pub stats: WalkStats,
    pub records: Vec<Record>,
}

impl DsStore {
    /// Parse a buffer with the default configuration.
    pub fn from_bytes(data: &[u8]) -> ParseResult<Self> {
        DsStoreParser::new(data).parse_document()
    }

    /// Parse a buffer with an explicit configuration.
    pub fn from_bytes_with_config(data: &[u8], config: ParserConfig) -> ParseResult<Self> {
        DsStoreParser::with_config(data, config).parse_document()
    }

    /// Read and parse a file from disk.
    pub fn open(path: &Path) -> ParseResult<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Header and master block summary.
    pub fn metadata(&self) -> TreeMetadata {
        metadata_from(Some(&self.header), Some(&self.master))
    }

    /// Look up a record by filename.
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Take the records, dropping the structural state.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Read-only parser over a borrowed buffer.
///
/// ```text
/// header -> allocator -> master block -> record tree -> records
/// ```
pub struct DsStoreParser<'a> {
    data: &'a [u8],
    config: ParserConfig,
    header: Option<Header>,
    allocator: Option<Allocator>,
    master: Option<MasterBlock>,
}

impl<'a> DsStoreParser<'a> {
    /// Parser with the default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, ParserConfig::default())
    }

    /// Parser with an explicit configuration.
    pub fn with_config(data: &'a [u8], config: ParserConfig) -> Self {
        Self {
            data,
            config,
            header: None,
            allocator: None,
            master: None,
        }
    }

    /// Parse the buffer and return one record per filename.
    ///
    /// Structural state from the last successful parse is kept for
    /// [`metadata`](Self::metadata).
    pub fn parse(&mut self) -> ParseResult<Vec<Record>> {
        let doc = self.parse_document()?;
        self.header = Some(doc.header);
        self.allocator = Some(doc.allocator);
        self.master = Some(doc.master);
        Ok(doc.records)
    }

    /// Parse the buffer into a [`DsStore`] without touching parser state.
    pub fn parse_document(&self) -> ParseResult<DsStore> {
        let mut cursor = ByteCursor::new(self.data);
        let header = Header::decode(&mut cursor)?;
        debug!(
            allocator_offset = header.allocator_offset,
            allocator_length = header.allocator_length,
            "header decoded"
        );

        let allocator = Allocator::decode(&mut cursor, &header, &self.config.root_key)?;

        let mut assembler = RecordAssembler::new();
        let mut walker = TreeWalker::new(&mut cursor, &allocator)
            .enforce_height(self.config.enforce_tree_height);
        let master = walker.read_master()?;
        let stats = walker.walk(&master, |entry| assembler.push_entry(entry))?;

        Ok(DsStore {
            header,
            allocator,
            master,
            stats,
            records: assembler.finish(),
        })
    }

    /// Header and master block summary. Fields not yet parsed are zero.
    pub fn metadata(&self) -> TreeMetadata {
        metadata_from(self.header.as_ref(), self.master.as_ref())
    }

    /// Header from the last successful parse.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Allocator state from the last successful parse.
    pub fn allocator(&self) -> Option<&Allocator> {
        self.allocator.as_ref()
    }

    /// Active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

fn metadata_from(header: Option<&Header>, master: Option<&MasterBlock>) -> TreeMetadata {
    let mut meta = TreeMetadata {
        alignment: ALIGNMENT_MARKER,
        magic: MAGIC,
        ..TreeMetadata::default()
    };
    if let Some(h) = header {
        meta.alignment = h.alignment;
        meta.magic = h.magic;
        meta.allocator_offset = h.allocator_offset;
        meta.allocator_length = h.allocator_length;
    }
    if let Some(m) = master {
        meta.root_id = m.root_id;
        meta.tree_height = m.tree_height;
        meta.record_count = m.record_count;
        meta.node_count = m.node_count;
    }
    meta
}

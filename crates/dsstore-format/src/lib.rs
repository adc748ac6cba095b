//! Read-only parser for `.DS_Store` files.
//!
//! A `.DS_Store` file is a buddy-allocated container ("Bud1") holding one
//! B-tree of (filename, field code, typed value) entries.
//!
//! # Architecture
//!
//! - [`ByteCursor`]: bounds-checked big-endian reads over a borrowed buffer
//! - [`Header`]: alignment marker, magic, allocator location
//! - [`Allocator`]: block offset table, table of contents, free lists
//! - [`TreeWalker`]: in-order traversal with an explicit work stack
//! - [`decode_value`]: one tagged value per entry
//! - [`RecordAssembler`]: merges entries into one [`Record`] per filename
//! - [`DsStoreParser`] / [`DsStore`]: the whole pipeline
//!
//! [`Record`]: dsstore_types::Record

pub mod allocator;
pub mod assembler;
pub mod config;
pub mod cursor;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;
pub mod header;
pub mod parser;
pub mod tree;
pub mod value;

pub use allocator::{Allocator, BlockAddress, Directory, FreeList, ROOT_DIRECTORY_KEY};
pub use assembler::RecordAssembler;
pub use config::ParserConfig;
pub use cursor::ByteCursor;
pub use error::{ParseResult, ParsingError};
pub use header::{Header, MAGIC};
pub use parser::{DsStore, DsStoreParser};
pub use tree::{MasterBlock, TreeEntry, TreeWalker, WalkStats};
pub use value::decode_value;

use thiserror::Error;

/// Fatal structural violations. Parsing stops at the first one.
#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("magic bytes {actual:#010x} not 0x42756431 (Bud1)")]
    BadMagic { actual: u32 },

    #[error("key {0:?} not found in table of contents")]
    MissingDirectoryKey(String),

    #[error("unrecognized data type {tag:?} at offset {offset:#x}")]
    UnknownValueType { tag: String, offset: usize },

    #[error("truncated file: need {needed} bytes at offset {offset:#x}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("block id {block_id} outside offset table of {count} entries")]
    InvalidBlockId { block_id: u32, count: usize },

    #[error("tree node {block_id} at depth {depth} exceeds tree height {height}")]
    TreeTooDeep { block_id: u32, depth: u32, height: u32 },

    #[error("tree node {0} visited twice")]
    CycleDetected(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for parsing operations.
pub type ParseResult<T> = Result<T, ParsingError>;

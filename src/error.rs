//! Error types for index building and record lookup

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZipIndexError>;

#[derive(Error, Debug)]
pub enum ZipIndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key '{key}' is {len} bytes, index keys are limited to {max}")]
    KeyTooLong { key: String, len: usize, max: usize },

    #[error("Record at offset {offset} has {found} fields, expected {expected}")]
    RecordFormat {
        offset: u64,
        expected: usize,
        found: usize,
    },

    #[error("Record at offset {offset} is not valid text: {reason}")]
    Desync { offset: u64, reason: String },

    #[error("Corrupt index file: {0}")]
    CorruptIndex(String),

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),

    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl From<bincode::error::EncodeError> for ZipIndexError {
    fn from(e: bincode::error::EncodeError) -> Self {
        ZipIndexError::Fingerprint(e.to_string())
    }
}

impl From<bincode::error::DecodeError> for ZipIndexError {
    fn from(e: bincode::error::DecodeError) -> Self {
        ZipIndexError::Fingerprint(e.to_string())
    }
}

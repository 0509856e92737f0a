//! Error types for the indexing core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("decode-corrupt: {0}")]
    DecodeCorrupt(String),

    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    #[error("token service failed: {0}")]
    TokenServiceFailed(String),

    #[error("blob store failed: {0}")]
    BlobStoreFailed(String),
}

impl From<bincode::Error> for IndexError {
    fn from(err: bincode::Error) -> Self {
        IndexError::Serialization(err.to_string())
    }
}

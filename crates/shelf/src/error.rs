use shelf_codec::CodecError;
use shelf_store::StoreError;
use thiserror::Error;

/// Errors from typed reads and writes.
///
/// A missing or undecodable item is not an error; reads report it as absent.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Raised by application code to abandon a write transaction.
    #[error("transaction aborted: {0}")]
    Aborted(String),
}

pub type ShelfResult<T> = Result<T, ShelfError>;

use shelf_types::TypeError;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The index cannot address a stored item.
    #[error("invalid index: {0}")]
    InvalidIndex(#[from] TypeError),

    /// The key exceeds the configured maximum length.
    #[error("key in collection {collection} is {len} bytes, limit is {max}")]
    KeyTooLong {
        collection: String,
        len: usize,
        max: usize,
    },

    /// The collection name exceeds the configured maximum length.
    #[error("collection name is {len} bytes, limit is {max}")]
    CollectionTooLong { len: usize, max: usize },

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// The connection's background writer is no longer running.
    #[error("connection writer has shut down")]
    WriterClosed,

    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// I/O error from the host system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

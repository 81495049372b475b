use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid index: collection name must not be empty")]
    EmptyCollection,

    #[error("invalid index in collection {collection}: key must not be empty")]
    EmptyKey { collection: String },
}

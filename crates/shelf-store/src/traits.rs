use std::fmt;

use shelf_types::{Index, RawValue};

use crate::context::ExecutionContext;
use crate::error::{StoreError, StoreResult};

/// Read access to the store within one transaction.
///
/// A miss is `Ok(None)`. `Err` is reserved for failures of the store itself.
pub trait ReadTransaction {
    /// The payload stored at `index`.
    fn get(&self, index: &Index) -> StoreResult<Option<RawValue>>;

    /// The metadata stored at `index`.
    fn get_metadata(&self, index: &Index) -> StoreResult<Option<RawValue>>;

    /// Every key currently stored in `collection`, in the store's order.
    fn keys_in_collection(&self, collection: &str) -> StoreResult<Vec<String>>;

    /// Names of all non-empty collections.
    fn collections(&self) -> StoreResult<Vec<String>>;

    fn contains(&self, index: &Index) -> StoreResult<bool> {
        Ok(self.get(index)?.is_some())
    }

    fn count_in_collection(&self, collection: &str) -> StoreResult<usize> {
        Ok(self.keys_in_collection(collection)?.len())
    }
}

/// Read-write access to the store within one transaction.
///
/// Changes become visible to other transactions only when the enclosing
/// [`Connection::write`] block returns `Ok`. Reads inside the transaction see
/// its own changes.
pub trait WriteTransaction: ReadTransaction {
    /// Store `payload` and `metadata` at `index`, replacing both entirely.
    fn put(&mut self, index: &Index, payload: RawValue, metadata: Option<RawValue>)
        -> StoreResult<()>;

    /// Remove the payload and metadata at `index`. Returns whether anything
    /// was stored there.
    fn remove(&mut self, index: &Index) -> StoreResult<bool>;

    /// Remove every item in `collection`. Returns how many were removed.
    fn remove_all_in_collection(&mut self, collection: &str) -> StoreResult<usize>;
}

/// A handle that produces transactions.
///
/// `read` and `write` run their block on the calling thread and return when
/// the transaction ends. `async_read` and `async_write` queue the block on the
/// connection's writer thread; blocks queued on one connection run in
/// submission order. Blocks must not start another transaction on the same
/// store from inside themselves.
pub trait Connection: Send + Sync {
    /// Run `block` in a read transaction.
    fn read<R, E, F>(&self, block: F) -> Result<R, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<R, E>,
        E: From<StoreError>;

    /// Run `block` in a write transaction and commit it.
    ///
    /// Blocks the caller until the commit completes. If `block` returns `Err`
    /// nothing it wrote is committed.
    fn write<R, E, F>(&self, block: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<R, E>,
        E: From<StoreError>;

    /// Queue `block` as a write transaction without blocking the caller.
    ///
    /// Once the transaction has committed (or failed), `completion` is run
    /// exactly once on `context` with the outcome. Without a completion,
    /// failures are logged.
    fn async_write<R, E, F, X, C>(&self, block: F, context: X, completion: Option<C>)
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + fmt::Display + Send + 'static,
        X: ExecutionContext,
        C: FnOnce(Result<R, E>) + Send + 'static;

    /// Queue `block` as a read transaction and deliver its outcome to
    /// `completion` on `context`.
    fn async_read<R, E, F, X, C>(&self, block: F, context: X, completion: C)
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StoreError> + Send + 'static,
        X: ExecutionContext,
        C: FnOnce(Result<R, E>) + Send + 'static;
}

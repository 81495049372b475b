//! Typed operations over a [`Connection`], one transaction per call.
//!
//! Synchronous calls block until their transaction has finished. The
//! `async_*` calls return immediately; the connection runs the transaction on
//! its writer thread and hands the outcome to the completion on the chosen
//! [`ExecutionContext`]. Calls made through one connection run in the order
//! they were made.

use shelf_codec::Storable;
use shelf_store::{Connection, ExecutionContext};
use shelf_types::{Index, Persistable};
use tracing::debug;

use crate::error::ShelfResult;
use crate::read::Reader;
use crate::write::Writer;

/// Typed reads, each in its own read transaction.
pub trait ConnectionReader: Connection {
    fn read_at_index<T: Storable>(&self, index: &Index) -> ShelfResult<Option<T>> {
        self.read(|tx| tx.read_at_index(index))
    }

    fn read_at_indexes<T: Storable>(&self, indexes: &[Index]) -> ShelfResult<Vec<T>> {
        self.read(|tx| tx.read_at_indexes(indexes))
    }

    fn read_by_key<T: Storable>(&self, key: &str) -> ShelfResult<Option<T>> {
        self.read(|tx| tx.read_by_key(key))
    }

    fn read_by_keys<T, I>(&self, keys: I) -> ShelfResult<Vec<T>>
    where
        T: Storable,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let indexes = T::indexes_with_keys(keys);
        self.read(|tx| tx.read_at_indexes(&indexes))
    }

    fn read_all<T: Storable>(&self) -> ShelfResult<Vec<T>> {
        self.read(|tx| tx.read_all())
    }

    fn read_metadata_at_index<T: Storable>(
        &self,
        index: &Index,
    ) -> ShelfResult<Option<T::Metadata>> {
        self.read(|tx| tx.read_metadata_at_index::<T>(index))
    }

    fn read_metadata_at_indexes<T: Storable>(
        &self,
        indexes: &[Index],
    ) -> ShelfResult<Vec<T::Metadata>> {
        self.read(|tx| tx.read_metadata_at_indexes::<T, _>(indexes))
    }

    /// Read one item off the caller's thread.
    fn async_read_at_index<T, X, C>(&self, index: Index, context: X, completion: C)
    where
        T: Storable + Send + 'static,
        X: ExecutionContext,
        C: FnOnce(ShelfResult<Option<T>>) + Send + 'static,
    {
        self.async_read(move |tx| tx.read_at_index(&index), context, completion);
    }

    /// Read the items stored under `keys` off the caller's thread.
    fn async_read_by_keys<T, I, X, C>(&self, keys: I, context: X, completion: C)
    where
        T: Storable + Send + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
        X: ExecutionContext,
        C: FnOnce(ShelfResult<Vec<T>>) + Send + 'static,
    {
        let indexes = T::indexes_with_keys(keys);
        self.async_read(move |tx| tx.read_at_indexes(&indexes), context, completion);
    }

    /// Read the whole collection of `T` off the caller's thread.
    fn async_read_all<T, X, C>(&self, context: X, completion: C)
    where
        T: Storable + Send + 'static,
        X: ExecutionContext,
        C: FnOnce(ShelfResult<Vec<T>>) + Send + 'static,
    {
        self.async_read(|tx| tx.read_all(), context, completion);
    }
}

impl<X: Connection + ?Sized> ConnectionReader for X {}

/// Typed writes, each in its own write transaction.
pub trait ConnectionWriter: Connection {
    /// Write `item` and block until it is committed.
    fn write_item<T: Storable>(&self, item: T) -> ShelfResult<T> {
        self.write(move |tx| tx.write_item(item))
    }

    /// Write `items` in one transaction and block until it is committed.
    fn write_items<T, I>(&self, items: I) -> ShelfResult<Vec<T>>
    where
        T: Storable,
        I: IntoIterator<Item = T>,
    {
        self.write(move |tx| tx.write_items(items))
    }

    /// Queue a write of `item` without blocking.
    ///
    /// After the commit, `completion` runs exactly once on `context` with the
    /// written item.
    fn async_write_item<T, X, C>(&self, item: T, context: X, completion: Option<C>)
    where
        T: Storable + Send + 'static,
        X: ExecutionContext,
        C: FnOnce(ShelfResult<T>) + Send + 'static,
    {
        debug!(index = %item.index(), "queueing async write");
        self.async_write(move |tx| tx.write_item(item), context, completion);
    }

    /// Queue a write of `items` in one transaction without blocking.
    fn async_write_items<T, I, X, C>(&self, items: I, context: X, completion: Option<C>)
    where
        T: Storable + Send + 'static,
        I: IntoIterator<Item = T>,
        X: ExecutionContext,
        C: FnOnce(ShelfResult<Vec<T>>) + Send + 'static,
    {
        let items: Vec<T> = items.into_iter().collect();
        debug!(collection = T::COLLECTION, count = items.len(), "queueing async write");
        self.async_write(move |tx| tx.write_items(items), context, completion);
    }

    fn remove_item<T: Persistable>(&self, item: &T) -> ShelfResult<bool> {
        self.write(|tx| tx.remove_item(item))
    }

    fn remove_by_key<T: Persistable>(&self, key: &str) -> ShelfResult<bool> {
        self.write(|tx| tx.remove_by_key::<T>(key))
    }

    fn remove_by_keys<T, I>(&self, keys: I) -> ShelfResult<usize>
    where
        T: Persistable,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.write(|tx| tx.remove_by_keys::<T, _>(keys))
    }

    fn remove_all<T: Persistable>(&self) -> ShelfResult<usize> {
        self.write(|tx| tx.remove_all::<T>())
    }
}

impl<X: Connection + ?Sized> ConnectionWriter for X {}

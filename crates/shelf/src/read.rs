use shelf_codec::{MetadataCodec, Storable};
use shelf_store::ReadTransaction;
use shelf_types::Index;
use tracing::trace;

use crate::engine::{decode_item, stores_metadata};
use crate::error::ShelfResult;

/// Typed reads over any transaction.
///
/// Implemented for every [`ReadTransaction`], including the read half of a
/// write transaction, so reads inside a write see its pending changes.
/// Misses are never errors: a single read returns `None` and a batch read
/// leaves the miss out.
pub trait Reader: ReadTransaction {
    /// Read the item of type `T` stored at `index`.
    fn read_at_index<T: Storable>(&self, index: &Index) -> ShelfResult<Option<T>> {
        let Some(payload) = self.get(index)? else {
            trace!(%index, "read miss");
            return Ok(None);
        };
        let metadata = if stores_metadata::<T>() {
            self.get_metadata(index)?
        } else {
            None
        };
        Ok(decode_item(Some(&payload), metadata.as_ref()))
    }

    /// Read every index in order, dropping misses.
    fn read_at_indexes<'a, T, I>(&self, indexes: I) -> ShelfResult<Vec<T>>
    where
        T: Storable,
        I: IntoIterator<Item = &'a Index>,
    {
        let mut items = Vec::new();
        for index in indexes {
            if let Some(item) = self.read_at_index(index)? {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Read the item of type `T` stored under `key` in its collection.
    fn read_by_key<T: Storable>(&self, key: &str) -> ShelfResult<Option<T>> {
        self.read_at_index(&T::index_with_key(key))
    }

    /// Read the items of type `T` stored under `keys`, in order, dropping misses.
    fn read_by_keys<T, I>(&self, keys: I) -> ShelfResult<Vec<T>>
    where
        T: Storable,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.read_at_indexes(&T::indexes_with_keys(keys))
    }

    /// Read every item in the collection of `T`, in key order.
    fn read_all<T: Storable>(&self) -> ShelfResult<Vec<T>> {
        let keys = self.keys_in_collection(T::COLLECTION)?;
        trace!(collection = T::COLLECTION, keys = keys.len(), "read all");
        self.read_by_keys(keys)
    }

    /// Read only the metadata stored for `T` at `index`.
    ///
    /// Always `None` for types without metadata.
    fn read_metadata_at_index<T: Storable>(
        &self,
        index: &Index,
    ) -> ShelfResult<Option<T::Metadata>> {
        if !stores_metadata::<T>() {
            return Ok(None);
        }
        let raw = self.get_metadata(index)?;
        Ok(<T::MetadataCodec as MetadataCodec<T::Metadata>>::decode_metadata(raw.as_ref()))
    }

    /// Read the metadata stored for `T` at each index, dropping misses.
    fn read_metadata_at_indexes<'a, T, I>(&self, indexes: I) -> ShelfResult<Vec<T::Metadata>>
    where
        T: Storable,
        I: IntoIterator<Item = &'a Index>,
    {
        let mut found = Vec::new();
        for index in indexes {
            if let Some(metadata) = self.read_metadata_at_index::<T>(index)? {
                found.push(metadata);
            }
        }
        Ok(found)
    }
}

impl<X: ReadTransaction + ?Sized> Reader for X {}

use shelf_codec::Storable;
use shelf_store::WriteTransaction;
use shelf_types::{Index, Persistable};
use tracing::trace;

use crate::engine::encode_item;
use crate::error::ShelfResult;

/// Typed writes over any write transaction.
///
/// Every write replaces both the payload and the metadata at the item's
/// index; nothing is merged with what was there before.
pub trait Writer: WriteTransaction {
    /// Store `item` at its index and hand it back unchanged.
    fn write_item<T: Storable>(&mut self, item: T) -> ShelfResult<T> {
        let index = item.index();
        let (payload, metadata) = encode_item(&item)?;
        trace!(%index, has_metadata = metadata.is_some(), "write item");
        self.put(&index, payload, metadata)?;
        Ok(item)
    }

    /// Store every item in input order.
    fn write_items<T, I>(&mut self, items: I) -> ShelfResult<Vec<T>>
    where
        T: Storable,
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .map(|item| self.write_item(item))
            .collect()
    }

    /// Remove `item` together with its metadata. Returns whether it was stored.
    fn remove_item<T: Persistable>(&mut self, item: &T) -> ShelfResult<bool> {
        Ok(self.remove(&item.index())?)
    }

    /// Remove whatever is stored at each index. Returns how many were removed.
    fn remove_at_indexes<'a, I>(&mut self, indexes: I) -> ShelfResult<usize>
    where
        I: IntoIterator<Item = &'a Index>,
    {
        let mut removed = 0;
        for index in indexes {
            if self.remove(index)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Remove the item of type `T` stored under `key`.
    fn remove_by_key<T: Persistable>(&mut self, key: &str) -> ShelfResult<bool> {
        Ok(self.remove(&T::index_with_key(key))?)
    }

    /// Remove the items of type `T` stored under `keys`.
    fn remove_by_keys<T, I>(&mut self, keys: I) -> ShelfResult<usize>
    where
        T: Persistable,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.remove_at_indexes(&T::indexes_with_keys(keys))
    }

    /// Remove every item in the collection of `T`.
    fn remove_all<T: Persistable>(&mut self) -> ShelfResult<usize> {
        Ok(self.remove_all_in_collection(T::COLLECTION)?)
    }
}

impl<X: WriteTransaction + ?Sized> Writer for X {}

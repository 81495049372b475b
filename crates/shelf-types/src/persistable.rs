use crate::index::Index;

/// A type whose instances know where they live in the store.
///
/// The collection is a constant of the type; the key is a pure function of
/// one instance, usually a stable identifier field. Together they give every
/// item exactly one [`Index`].
pub trait Persistable {
    /// Collection shared by every instance of the type.
    const COLLECTION: &'static str;

    /// Key of this instance within [`Self::COLLECTION`].
    fn key(&self) -> String;

    /// The index this instance is stored under.
    fn index(&self) -> Index {
        Index::new(Self::COLLECTION, self.key())
    }

    /// The index an instance with `key` would be stored under.
    ///
    /// Equal to `item.index()` for any item whose `key()` is `key`, which is
    /// what lets key-based reads skip loading the item first.
    fn index_with_key(key: impl Into<String>) -> Index
    where
        Self: Sized,
    {
        Index::new(Self::COLLECTION, key)
    }

    /// Map [`Persistable::index_with_key`] over a sequence of keys, in order.
    fn indexes_with_keys<I>(keys: I) -> Vec<Index>
    where
        Self: Sized,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        keys.into_iter().map(Self::index_with_key).collect()
    }
}

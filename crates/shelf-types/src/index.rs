use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Address of one stored item: a collection name plus a key within it.
///
/// Two indexes are equal iff both fields are equal. An `Index` is never
/// stored itself; it is the value handed to a transaction to locate an
/// item's payload and metadata.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Index {
    collection: String,
    key: String,
}

impl Index {
    /// Create an index from a collection name and a key.
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// The collection this index points into.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The key within the collection.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Split into `(collection, key)`.
    pub fn into_parts(self) -> (String, String) {
        (self.collection, self.key)
    }

    /// Check that the index can address a stored item.
    ///
    /// Reads tolerate any index (an unaddressable one simply finds nothing);
    /// writes must pass this check.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.collection.is_empty() {
            return Err(TypeError::EmptyCollection);
        }
        if self.key.is_empty() {
            return Err(TypeError::EmptyKey {
                collection: self.collection.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({}/{})", self.collection, self.key)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

impl<C: Into<String>, K: Into<String>> From<(C, K)> for Index {
    fn from((collection, key): (C, K)) -> Self {
        Self::new(collection, key)
    }
}

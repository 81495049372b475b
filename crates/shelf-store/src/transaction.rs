//! Transactions over the in-memory store.
//!
//! Read transactions borrow the committed state under a read lock. Write
//! transactions buffer their changes and apply them in one step on commit, so
//! a block that fails leaves the store untouched.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use shelf_types::{Index, RawValue};
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::{ReadTransaction, WriteTransaction};

/// Payload and metadata stored under one index.
#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) payload: RawValue,
    pub(crate) metadata: Option<RawValue>,
}

/// Committed state: collection name to its ordered keys.
pub(crate) type Collections = HashMap<String, BTreeMap<String, Slot>>;

fn lookup<'a>(collections: &'a Collections, index: &Index) -> Option<&'a Slot> {
    collections.get(index.collection())?.get(index.key())
}

fn poisoned(e: impl std::fmt::Display) -> StoreError {
    StoreError::LockPoisoned(e.to_string())
}

/// A read transaction borrowing committed state.
pub(crate) struct MemoryReadTransaction<'a> {
    collections: &'a Collections,
}

impl<'a> MemoryReadTransaction<'a> {
    pub(crate) fn new(collections: &'a Collections) -> Self {
        Self { collections }
    }
}

impl ReadTransaction for MemoryReadTransaction<'_> {
    fn get(&self, index: &Index) -> StoreResult<Option<RawValue>> {
        Ok(lookup(self.collections, index).map(|slot| slot.payload.clone()))
    }

    fn get_metadata(&self, index: &Index) -> StoreResult<Option<RawValue>> {
        Ok(lookup(self.collections, index).and_then(|slot| slot.metadata.clone()))
    }

    fn keys_in_collection(&self, collection: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .collections
            .get(collection)
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn collections(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// A write transaction buffering changes over committed state.
///
/// The caller must hold the store's writer lock for the transaction's whole
/// lifetime, so committed state cannot move underneath the buffer.
pub(crate) struct MemoryWriteTransaction<'a> {
    state: &'a RwLock<Collections>,
    config: &'a StoreConfig,
    /// `None` marks a removal.
    changes: BTreeMap<Index, Option<Slot>>,
    /// Collections wiped earlier in this transaction.
    cleared: HashSet<String>,
}

impl<'a> MemoryWriteTransaction<'a> {
    pub(crate) fn new(state: &'a RwLock<Collections>, config: &'a StoreConfig) -> Self {
        Self {
            state,
            config,
            changes: BTreeMap::new(),
            cleared: HashSet::new(),
        }
    }

    /// Apply the buffered changes to committed state.
    pub(crate) fn commit(self) -> StoreResult<()> {
        if self.changes.is_empty() && self.cleared.is_empty() {
            trace!("empty write transaction; nothing to commit");
            return Ok(());
        }

        let mut state = self.state.write().map_err(poisoned)?;
        for collection in &self.cleared {
            state.remove(collection);
        }

        let (mut puts, mut removes) = (0usize, 0usize);
        for (index, change) in self.changes {
            let (collection, key) = index.into_parts();
            match change {
                Some(slot) => {
                    state.entry(collection).or_default().insert(key, slot);
                    puts += 1;
                }
                None => {
                    if let Some(keys) = state.get_mut(&collection) {
                        keys.remove(&key);
                        if keys.is_empty() {
                            state.remove(&collection);
                        }
                    }
                    removes += 1;
                }
            }
        }

        debug!(
            puts,
            removes,
            cleared = self.cleared.len(),
            "write transaction committed"
        );
        Ok(())
    }

    fn check_index(&self, index: &Index) -> StoreResult<()> {
        index.validate()?;
        if index.collection().len() > self.config.max_collection_len {
            return Err(StoreError::CollectionTooLong {
                len: index.collection().len(),
                max: self.config.max_collection_len,
            });
        }
        if index.key().len() > self.config.max_key_len {
            return Err(StoreError::KeyTooLong {
                collection: index.collection().to_string(),
                len: index.key().len(),
                max: self.config.max_key_len,
            });
        }
        Ok(())
    }

    /// Resolve `index` through the buffer, then committed state.
    fn resolve(&self, index: &Index) -> StoreResult<Option<Slot>> {
        if let Some(change) = self.changes.get(index) {
            return Ok(change.clone());
        }
        if self.cleared.contains(index.collection()) {
            return Ok(None);
        }
        let state = self.state.read().map_err(poisoned)?;
        Ok(lookup(&state, index).cloned())
    }
}

impl ReadTransaction for MemoryWriteTransaction<'_> {
    fn get(&self, index: &Index) -> StoreResult<Option<RawValue>> {
        Ok(self.resolve(index)?.map(|slot| slot.payload))
    }

    fn get_metadata(&self, index: &Index) -> StoreResult<Option<RawValue>> {
        Ok(self.resolve(index)?.and_then(|slot| slot.metadata))
    }

    fn keys_in_collection(&self, collection: &str) -> StoreResult<Vec<String>> {
        let mut keys: BTreeSet<String> = if self.cleared.contains(collection) {
            BTreeSet::new()
        } else {
            let state = self.state.read().map_err(poisoned)?;
            state
                .get(collection)
                .map(|keys| keys.keys().cloned().collect())
                .unwrap_or_default()
        };

        for (index, change) in &self.changes {
            if index.collection() != collection {
                continue;
            }
            match change {
                Some(_) => keys.insert(index.key().to_string()),
                None => keys.remove(index.key()),
            };
        }
        Ok(keys.into_iter().collect())
    }

    fn collections(&self) -> StoreResult<Vec<String>> {
        let mut names: BTreeSet<String> = {
            let state = self.state.read().map_err(poisoned)?;
            state
                .keys()
                .filter(|name| !self.cleared.contains(*name))
                .cloned()
                .collect()
        };
        names.extend(self.changes.keys().map(|i| i.collection().to_string()));

        let mut non_empty = Vec::with_capacity(names.len());
        for name in names {
            if !self.keys_in_collection(&name)?.is_empty() {
                non_empty.push(name);
            }
        }
        Ok(non_empty)
    }
}

impl WriteTransaction for MemoryWriteTransaction<'_> {
    fn put(
        &mut self,
        index: &Index,
        payload: RawValue,
        metadata: Option<RawValue>,
    ) -> StoreResult<()> {
        self.check_index(index)?;
        trace!(%index, has_metadata = metadata.is_some(), "put");
        self.changes
            .insert(index.clone(), Some(Slot { payload, metadata }));
        Ok(())
    }

    fn remove(&mut self, index: &Index) -> StoreResult<bool> {
        let existed = self.resolve(index)?.is_some();
        trace!(%index, existed, "remove");
        self.changes.insert(index.clone(), None);
        Ok(existed)
    }

    fn remove_all_in_collection(&mut self, collection: &str) -> StoreResult<usize> {
        let removed = self.keys_in_collection(collection)?.len();
        self.changes.retain(|index, _| index.collection() != collection);
        self.cleared.insert(collection.to_string());
        trace!(collection, removed, "remove all in collection");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> RwLock<Collections> {
        let mut collections = Collections::new();
        let people = collections.entry("people".into()).or_default();
        people.insert(
            "alice".into(),
            Slot {
                payload: RawValue::encoded(b"alice".to_vec()),
                metadata: Some(RawValue::encoded(b"meta".to_vec())),
            },
        );
        people.insert(
            "bob".into(),
            Slot {
                payload: RawValue::encoded(b"bob".to_vec()),
                metadata: None,
            },
        );
        RwLock::new(collections)
    }

    fn bytes(raw: Option<RawValue>) -> Option<Vec<u8>> {
        raw.and_then(|r| r.as_bytes().map(|b| b.to_vec()))
    }

    #[test]
    fn read_transaction_sees_committed_state() {
        let state = seeded();
        let guard = state.read().unwrap();
        let tx = MemoryReadTransaction::new(&guard);

        let alice = Index::new("people", "alice");
        assert_eq!(bytes(tx.get(&alice).unwrap()), Some(b"alice".to_vec()));
        assert_eq!(bytes(tx.get_metadata(&alice).unwrap()), Some(b"meta".to_vec()));
        assert!(tx.get_metadata(&Index::new("people", "bob")).unwrap().is_none());
        assert!(tx.get(&Index::new("people", "carol")).unwrap().is_none());
        assert!(tx.get(&Index::new("pets", "alice")).unwrap().is_none());
        assert_eq!(tx.keys_in_collection("people").unwrap(), vec!["alice", "bob"]);
        assert!(tx.keys_in_collection("pets").unwrap().is_empty());
        assert_eq!(tx.collections().unwrap(), vec!["people"]);
        assert_eq!(tx.count_in_collection("people").unwrap(), 2);
        assert!(tx.contains(&alice).unwrap());
    }

    #[test]
    fn write_transaction_reads_its_own_changes() {
        let state = seeded();
        let config = StoreConfig::default();
        let mut tx = MemoryWriteTransaction::new(&state, &config);

        let carol = Index::new("people", "carol");
        tx.put(&carol, RawValue::encoded(b"carol".to_vec()), None)
            .unwrap();
        assert!(tx.remove(&Index::new("people", "bob")).unwrap());

        assert_eq!(bytes(tx.get(&carol).unwrap()), Some(b"carol".to_vec()));
        assert!(tx.get(&Index::new("people", "bob")).unwrap().is_none());
        assert_eq!(tx.keys_in_collection("people").unwrap(), vec!["alice", "carol"]);

        // Nothing is visible outside until commit.
        assert_eq!(state.read().unwrap()["people"].len(), 2);
        tx.commit().unwrap();

        let committed = state.read().unwrap();
        let keys: Vec<&String> = committed["people"].keys().collect();
        assert_eq!(keys, vec!["alice", "carol"]);
    }

    #[test]
    fn dropping_a_write_transaction_discards_changes() {
        let state = seeded();
        let config = StoreConfig::default();
        {
            let mut tx = MemoryWriteTransaction::new(&state, &config);
            tx.put(&Index::new("pets", "rex"), RawValue::encoded(vec![1u8]), None)
                .unwrap();
        }
        assert!(!state.read().unwrap().contains_key("pets"));
    }

    #[test]
    fn put_replaces_payload_and_metadata() {
        let state = seeded();
        let config = StoreConfig::default();
        let mut tx = MemoryWriteTransaction::new(&state, &config);

        let alice = Index::new("people", "alice");
        tx.put(&alice, RawValue::encoded(b"alice-2".to_vec()), None)
            .unwrap();
        tx.commit().unwrap();

        let guard = state.read().unwrap();
        let read = MemoryReadTransaction::new(&guard);
        assert_eq!(bytes(read.get(&alice).unwrap()), Some(b"alice-2".to_vec()));
        assert!(read.get_metadata(&alice).unwrap().is_none());
    }

    #[test]
    fn remove_reports_whether_anything_was_stored() {
        let state = seeded();
        let config = StoreConfig::default();
        let mut tx = MemoryWriteTransaction::new(&state, &config);

        assert!(tx.remove(&Index::new("people", "alice")).unwrap());
        assert!(!tx.remove(&Index::new("people", "alice")).unwrap());
        assert!(!tx.remove(&Index::new("people", "nobody")).unwrap());
    }

    #[test]
    fn remove_all_then_put_keeps_only_new_items() {
        let state = seeded();
        let config = StoreConfig::default();
        let mut tx = MemoryWriteTransaction::new(&state, &config);

        assert_eq!(tx.remove_all_in_collection("people").unwrap(), 2);
        tx.put(
            &Index::new("people", "dave"),
            RawValue::encoded(b"dave".to_vec()),
            None,
        )
        .unwrap();
        assert_eq!(tx.keys_in_collection("people").unwrap(), vec!["dave"]);
        assert!(tx.get(&Index::new("people", "alice")).unwrap().is_none());
        tx.commit().unwrap();

        let committed = state.read().unwrap();
        let keys: Vec<&String> = committed["people"].keys().collect();
        assert_eq!(keys, vec!["dave"]);
    }

    #[test]
    fn emptied_collections_disappear() {
        let state = seeded();
        let config = StoreConfig::default();
        let mut tx = MemoryWriteTransaction::new(&state, &config);
        tx.remove(&Index::new("people", "alice")).unwrap();
        tx.remove(&Index::new("people", "bob")).unwrap();
        assert!(tx.collections().unwrap().is_empty());
        tx.commit().unwrap();
        assert!(state.read().unwrap().is_empty());
    }

    #[test]
    fn put_validates_index() {
        let state = seeded();
        let config = StoreConfig {
            max_key_len: 4,
            max_collection_len: 6,
            ..StoreConfig::default()
        };
        let mut tx = MemoryWriteTransaction::new(&state, &config);
        let payload = || RawValue::encoded(vec![0u8]);

        assert!(matches!(
            tx.put(&Index::new("", "k"), payload(), None),
            Err(StoreError::InvalidIndex(_))
        ));
        assert!(matches!(
            tx.put(&Index::new("people", ""), payload(), None),
            Err(StoreError::InvalidIndex(_))
        ));
        assert!(matches!(
            tx.put(&Index::new("people", "toolong"), payload(), None),
            Err(StoreError::KeyTooLong { len: 7, max: 4, .. })
        ));
        assert!(matches!(
            tx.put(&Index::new("animals", "k"), payload(), None),
            Err(StoreError::CollectionTooLong { len: 7, max: 6 })
        ));
        assert!(tx.put(&Index::new("people", "eve"), payload(), None).is_ok());
    }
}

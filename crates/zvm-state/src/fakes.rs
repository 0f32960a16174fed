//! In-memory fake for the seen store (testing only)
//!
//! `MemorySeenStore` satisfies the [`SeenStore`] contract without any
//! external dependencies. Nothing survives the process.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::storage_traits::{Collection, SeenStore};
use crate::Result;

/// In-memory seen store backed by a `HashMap<Collection, BTreeSet<identifier>>`.
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    seen: Mutex<HashMap<Collection, BTreeSet<String>>>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store that already holds `identifiers` for `collection`.
    pub fn with_seen<I, S>(collection: Collection, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        store
            .guard()
            .entry(collection)
            .or_default()
            .extend(identifiers.into_iter().map(Into::into));
        store
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<Collection, BTreeSet<String>>> {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn contains(&self, collection: Collection, identifier: &str) -> Result<bool> {
        Ok(self
            .guard()
            .get(&collection)
            .is_some_and(|ids| ids.contains(identifier)))
    }

    async fn insert(&self, collection: Collection, identifier: &str) -> Result<bool> {
        Ok(self
            .guard()
            .entry(collection)
            .or_default()
            .insert(identifier.to_string()))
    }

    async fn count(&self, collection: Collection) -> Result<u64> {
        Ok(self
            .guard()
            .get(&collection)
            .map_or(0, |ids| ids.len() as u64))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<String>> {
        Ok(self
            .guard()
            .get(&collection)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }
}

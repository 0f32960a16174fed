//! Storage trait definitions for the seen set
//!
//! `SeenStore` is the single storage abstraction of the auditor: a durable,
//! append-only set of identifiers per [`Collection`]. The trait is async and
//! backend-agnostic. An in-memory fake is provided for testing via the
//! `fakes` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::Result;

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// A resource collection polled from the ZVM.
///
/// Each collection owns its own seen set; identifiers never cross over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Events,
    Tasks,
}

impl Collection {
    /// Every collection, in the order a cycle processes them.
    pub const ALL: [Collection; 2] = [Collection::Events, Collection::Tasks];

    /// Lowercase name, shared by the API path segment and the table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Events => "events",
            Collection::Tasks => "tasks",
        }
    }

    /// Table holding the seen identifiers of this collection.
    pub fn table(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = StateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "events" | "event" => Ok(Collection::Events),
            "tasks" | "task" => Ok(Collection::Tasks),
            _ => Err(StateError::UnknownCollection(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SeenStore
// ---------------------------------------------------------------------------

/// A single persisted row: `{identifier: string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenRecord {
    pub identifier: String,
}

impl SeenRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Durable set of already-processed identifiers, keyed per collection.
///
/// Guarantees:
/// - Once `insert(c, id)` has returned `Ok`, `contains(c, id)` is `true`
///   for the lifetime of the store, including after a reopen.
/// - `insert` is idempotent: inserting a present identifier is a no-op
///   and returns `false`.
/// - There is no removal operation; the set only grows.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Check whether `identifier` was already recorded for `collection`.
    async fn contains(&self, collection: Collection, identifier: &str) -> Result<bool>;

    /// Record `identifier` for `collection`. Returns `true` if it was new.
    async fn insert(&self, collection: Collection, identifier: &str) -> Result<bool>;

    /// Number of identifiers recorded for `collection`.
    async fn count(&self, collection: Collection) -> Result<u64>;

    /// All identifiers recorded for `collection`, sorted ascending.
    async fn list(&self, collection: Collection) -> Result<Vec<String>>;
}

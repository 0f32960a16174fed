//! ZVM-State: durable seen-identifier tracking for the ZVM auditor
//!
//! This crate provides the persistence layer of the auditor. It records which
//! event and task identifiers have already been reported so that a periodic
//! re-run only surfaces records it has never seen before.
//!
//! ## Key Components
//!
//! - `Collection`: the two tracked resource collections (`events`, `tasks`)
//! - `SeenStore`: backend-agnostic seen-set contract (contains / insert)
//! - `SurrealSeenStore`: file-backed SurrealDB implementation
//! - `fakes::MemorySeenStore`: in-memory implementation for tests

mod error;
pub mod fakes;
mod handle;
mod migrations;
pub mod storage_traits;

pub use error::StateError;
pub use handle::{StoreConfig, SurrealSeenStore, DEFAULT_STORE_PATH};
pub use storage_traits::{Collection, SeenRecord, SeenStore};

/// Result type for zvm-state operations
pub type Result<T> = std::result::Result<T, StateError>;

//! Error types for zvm-state

use thiserror::Error;

/// Errors that can occur in the seen-store layer
#[derive(Error, Debug)]
pub enum StateError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),

    /// Collection name that is neither `events` nor `tasks`
    #[error("Unknown collection: {0} (expected 'events' or 'tasks')")]
    UnknownCollection(String),
}

impl From<surrealdb::Error> for StateError {
    fn from(err: surrealdb::Error) -> Self {
        StateError::Query(err.to_string())
    }
}

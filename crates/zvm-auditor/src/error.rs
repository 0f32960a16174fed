//! Error types for the auditor

use thiserror::Error;
use zvm_client::{AuthError, ClientError, FetchError};
use zvm_state::StateError;

/// Failure that aborts a single collection pass.
///
/// The other collection's pass still runs.
#[derive(Error, Debug)]
pub enum PassError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("seen store failed: {0}")]
    Store(#[from] StateError),
}

/// Failure that aborts the whole run
#[derive(Error, Debug)]
pub enum AuditorError {
    /// Token exchange failed; nothing was fetched
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Client could not be constructed from the configuration
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Seen store could not be opened or queried
    #[error(transparent)]
    State(#[from] StateError),
}

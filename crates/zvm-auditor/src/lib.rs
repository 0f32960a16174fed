//! ZVM Auditor Library
//!
//! Polls a Zerto Virtual Manager for events and tasks and reports each
//! record exactly once across runs, using a durable seen store.
//!
//! ```ignore
//! let config = AuditorConfig::new(ZvmConfig::new(address, username, password), StoreConfig::default());
//! let store = config.open_store().await?;
//! let report = run_cycle(&config.client()?, &store).await?;
//! ```

pub mod audit;
pub mod config;
pub mod cycle;
mod error;
pub mod obs;
pub mod records;
pub mod telemetry;

pub use audit::{process_collection, PassReport};
pub use config::AuditorConfig;
pub use cycle::{run_cycle, CycleReport, PassOutcome};
pub use error::{AuditorError, PassError};
pub use records::{extract_identifier, identifier_field, EventSummary, RecordSummary, TaskSummary};
pub use telemetry::init_tracing;

pub use zvm_client::{AccessToken, AuthError, FetchError, ZvmClient, ZvmConfig};
pub use zvm_state::{Collection, SeenStore, StoreConfig, SurrealSeenStore};

/// Auditor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

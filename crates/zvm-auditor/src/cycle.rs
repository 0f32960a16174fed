//! One audit cycle: authenticate, then an events pass and a tasks pass.
//!
//! The passes are sequential and independent. A failed events pass never
//! prevents the tasks pass; a failed token exchange prevents both.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, Instrument};
use uuid::Uuid;
use zvm_client::{AccessToken, ZvmClient};
use zvm_state::{Collection, SeenStore};

use crate::audit::{process_collection, PassReport};
use crate::error::{AuditorError, PassError};
use crate::obs;

/// Result of one collection pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    Completed(PassReport),
    Failed { collection: Collection, error: String },
}

impl PassOutcome {
    pub fn collection(&self) -> Collection {
        match self {
            PassOutcome::Completed(report) => report.collection,
            PassOutcome::Failed { collection, .. } => *collection,
        }
    }

    pub fn report(&self) -> Option<&PassReport> {
        match self {
            PassOutcome::Completed(report) => Some(report),
            PassOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PassOutcome::Failed { .. })
    }
}

/// Summary of a cycle that got past authentication
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub passes: Vec<PassOutcome>,
}

impl CycleReport {
    /// Outcome of the pass for `collection`.
    pub fn pass(&self, collection: Collection) -> Option<&PassOutcome> {
        self.passes.iter().find(|p| p.collection() == collection)
    }

    /// Number of records reported across all completed passes.
    pub fn new_records(&self) -> usize {
        self.passes
            .iter()
            .filter_map(PassOutcome::report)
            .map(|r| r.new_identifiers.len())
            .sum()
    }

    pub fn failed_passes(&self) -> usize {
        self.passes.iter().filter(|p| p.is_failed()).count()
    }
}

/// Run one full cycle against `client`, recording into `store`.
///
/// Returns `AuditorError::Auth` when no token could be obtained; pass
/// failures are logged and reported inside the `CycleReport`.
pub async fn run_cycle(
    client: &ZvmClient,
    store: &dyn SeenStore,
) -> Result<CycleReport, AuditorError> {
    let cycle_id = Uuid::new_v4().to_string();
    let span = obs::cycle_span(&cycle_id);

    async move {
        let started_at = Utc::now();
        let clock = Instant::now();
        obs::emit_cycle_started(&client.config().base_url());

        let token = match client.acquire_token().await {
            Ok(token) => token,
            Err(e) => {
                obs::emit_auth_failed(&e);
                return Err(AuditorError::Auth(e));
            }
        };

        let mut passes = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            passes.push(run_pass(client, store, collection, &token).await);
        }

        let report = CycleReport {
            cycle_id,
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
            passes,
        };
        obs::emit_cycle_finished(
            report.duration_ms,
            report.new_records(),
            report.failed_passes(),
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

async fn run_pass(
    client: &ZvmClient,
    store: &dyn SeenStore,
    collection: Collection,
    token: &AccessToken,
) -> PassOutcome {
    match fetch_and_process(client, store, collection, token).await {
        Ok(report) => {
            obs::emit_pass_finished(&report);
            PassOutcome::Completed(report)
        }
        Err(e) => {
            obs::emit_pass_failed(collection, &e);
            PassOutcome::Failed {
                collection,
                error: e.to_string(),
            }
        }
    }
}

async fn fetch_and_process(
    client: &ZvmClient,
    store: &dyn SeenStore,
    collection: Collection,
    token: &AccessToken,
) -> Result<PassReport, PassError> {
    let records = client.fetch_collection(collection.as_str(), token).await?;
    info!("Fetched {} {}", records.len(), collection);
    process_collection(collection, &records, store).await
}

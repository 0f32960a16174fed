//! Dedup & report loop for one collection pass
//!
//! For every fetched record:
//! 1. no usable identifier → skipped, nothing recorded
//! 2. identifier already seen → skipped quietly
//! 3. identifier new → one report line, then recorded as seen
//!
//! A store error aborts the pass; identifiers recorded before the failure
//! stay recorded.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use zvm_state::{Collection, SeenStore};

use crate::error::PassError;
use crate::obs;
use crate::records::{identifier_field, RecordSummary};

/// What a completed pass did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub collection: Collection,
    /// Records in the fetched response
    pub fetched: usize,
    /// Identifiers reported and recorded by this pass, in response order
    pub new_identifiers: Vec<String>,
    /// Records whose identifier was already seen
    pub skipped: usize,
    /// Records without a usable identifier
    pub missing_identifier: usize,
}

impl PassReport {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            fetched: 0,
            new_identifiers: Vec::new(),
            skipped: 0,
            missing_identifier: 0,
        }
    }
}

/// Run the dedup & report loop over already-fetched records.
pub async fn process_collection(
    collection: Collection,
    records: &[Value],
    store: &dyn SeenStore,
) -> Result<PassReport, PassError> {
    let mut report = PassReport::new(collection);
    report.fetched = records.len();

    for record in records {
        let Some(summary) = RecordSummary::from_record(collection, record) else {
            debug!(
                "Skipping {} record without {}",
                collection,
                identifier_field(collection)
            );
            report.missing_identifier += 1;
            continue;
        };

        let identifier = summary.identifier();
        debug!("Processing {} - {}", collection, identifier);

        if store.contains(collection, identifier).await? {
            debug!("{} {} already exists in the store", collection, identifier);
            report.skipped += 1;
            continue;
        }

        debug!("New {} detected: {}", collection, identifier);
        if let Ok(details) = serde_json::to_string_pretty(record) {
            debug!("{} details: {}", collection, details);
        }

        obs::emit_observed(&summary);
        store.insert(collection, identifier).await?;
        report.new_identifiers.push(identifier.to_string());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use zvm_state::fakes::MemorySeenStore;

    #[tokio::test]
    async fn test_new_records_are_recorded() {
        let store = MemorySeenStore::new();
        let records = vec![json!({"EventIdentifier": "E1"}), json!({"EventIdentifier": "E2"})];

        let report = process_collection(Collection::Events, &records, &store)
            .await
            .unwrap();

        assert_eq!(report.fetched, 2);
        assert_eq!(report.new_identifiers, vec!["E1", "E2"]);
        assert!(store.contains(Collection::Events, "E1").await.unwrap());
        assert!(store.contains(Collection::Events, "E2").await.unwrap());
    }

    #[tokio::test]
    async fn test_seen_records_are_skipped() {
        let store = MemorySeenStore::with_seen(Collection::Tasks, ["T1"]);
        let records = vec![json!({"TaskIdentifier": "T1"}), json!({"TaskIdentifier": "T2"})];

        let report = process_collection(Collection::Tasks, &records, &store)
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.new_identifiers, vec!["T2"]);
        assert_eq!(store.count(Collection::Tasks).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_identifier_is_neither_reported_nor_recorded() {
        let store = MemorySeenStore::new();
        let records = vec![
            json!({"Description": "no id"}),
            json!({"EventIdentifier": null}),
            json!(17),
        ];

        let report = process_collection(Collection::Events, &records, &store)
            .await
            .unwrap();

        assert_eq!(report.missing_identifier, 3);
        assert!(report.new_identifiers.is_empty());
        assert_eq!(store.count(Collection::Events).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_within_one_response_reported_once() {
        let store = MemorySeenStore::new();
        let records = vec![json!({"EventIdentifier": "E1"}), json!({"EventIdentifier": "E1"})];

        let report = process_collection(Collection::Events, &records, &store)
            .await
            .unwrap();

        assert_eq!(report.new_identifiers, vec!["E1"]);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_rerun_with_identical_input_is_idempotent() {
        let store = MemorySeenStore::new();
        let records = vec![json!({"TaskIdentifier": "T1"}), json!({"TaskIdentifier": "T2"})];

        process_collection(Collection::Tasks, &records, &store)
            .await
            .unwrap();
        let second = process_collection(Collection::Tasks, &records, &store)
            .await
            .unwrap();

        assert!(second.new_identifiers.is_empty());
        assert_eq!(second.skipped, 2);
        assert_eq!(store.list(Collection::Tasks).await.unwrap(), vec!["T1", "T2"]);
    }
}

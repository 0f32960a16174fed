//! Structured observability hooks for the audit cycle.
//!
//! This module provides:
//! - A cycle-scoped tracing span via [`cycle_span`]
//! - Emission functions for cycle lifecycle events and for every newly
//!   observed record
//!
//! Each new record produces exactly one `info!` event tagged
//! `event = "zvm.event.observed"` or `event = "zvm.task.observed"`, whose
//! message is the pipe-joined report line.

use tracing::{error, info, Span};
use zvm_state::Collection;

use crate::audit::PassReport;
use crate::records::{EventSummary, RecordSummary, TaskSummary};

/// Span tagged with the cycle id. Instrument the cycle future with it.
pub fn cycle_span(cycle_id: &str) -> Span {
    tracing::info_span!("zvm.cycle", cycle_id = %cycle_id)
}

/// Emit event: cycle started against a ZVM.
pub fn emit_cycle_started(base_url: &str) {
    info!(event = "cycle.started", zvm = %base_url);
}

/// Emit event: cycle finished with totals across both passes.
pub fn emit_cycle_finished(duration_ms: u64, new_records: usize, failed_passes: usize) {
    info!(
        event = "cycle.finished",
        duration_ms = duration_ms,
        new_records = new_records,
        failed_passes = failed_passes,
    );
}

/// Emit event: token exchange failed; no collection will be fetched.
pub fn emit_auth_failed(error: &dyn std::fmt::Display) {
    error!(event = "auth.failed", error = %error, "Error obtaining token: {}", error);
}

/// Emit event: a collection pass completed.
pub fn emit_pass_finished(report: &PassReport) {
    info!(
        event = "pass.finished",
        collection = %report.collection,
        fetched = report.fetched,
        new = report.new_identifiers.len(),
        skipped = report.skipped,
        missing_identifier = report.missing_identifier,
    );
}

/// Emit event: a collection pass was aborted.
pub fn emit_pass_failed(collection: Collection, error: &dyn std::fmt::Display) {
    error!(
        event = "pass.failed",
        collection = %collection,
        error = %error,
        "Request to Zerto API failed: {}",
        error
    );
}

/// Emit event: first sighting of an event.
pub fn emit_event_observed(event: &EventSummary) {
    info!(
        event = "zvm.event.observed",
        identifier = %event.identifier,
        occurred_on = %event.occurred_on,
        user_name = %event.user_name,
        description = %event.description,
        site_name = %event.site_name,
        site_identifier = %event.site_identifier,
        "{}",
        event.line()
    );
}

/// Emit event: first sighting of a task.
pub fn emit_task_observed(task: &TaskSummary) {
    info!(
        event = "zvm.task.observed",
        identifier = %task.identifier,
        started = %task.started,
        initiated_by = %task.initiated_by,
        task_type = %task.task_type,
        site_identifier = %task.site_identifier,
        "{}",
        task.line()
    );
}

/// Dispatch to the emitter matching the record's collection.
pub fn emit_observed(summary: &RecordSummary) {
    match summary {
        RecordSummary::Event(event) => emit_event_observed(event),
        RecordSummary::Task(task) => emit_task_observed(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_span_create() {
        let _span = cycle_span("test-cycle-id").entered();
    }
}

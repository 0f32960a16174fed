//! Read-only views over raw ZVM records
//!
//! Records arrive as untyped JSON. Only the identifier decides whether a
//! record takes part in deduplication; every display field is optional and
//! renders as `None` when absent or null.

use serde::Serialize;
use serde_json::Value;
use zvm_state::Collection;

const MISSING: &str = "None";

/// Name of the identifier field for a collection.
pub fn identifier_field(collection: Collection) -> &'static str {
    match collection {
        Collection::Events => "EventIdentifier",
        Collection::Tasks => "TaskIdentifier",
    }
}

/// Identifier of `record` as a string, or `None` when it is absent, null or
/// empty. Numbers and booleans are stringified; arrays and objects count as
/// absent. Records without an identifier are skipped without being recorded.
pub fn extract_identifier(collection: Collection, record: &Value) -> Option<String> {
    match record.get(identifier_field(collection))? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render the value at JSON `pointer` for display.
fn display_field(record: &Value, pointer: &str) -> String {
    match record.pointer(pointer) {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Display fields of a new event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub identifier: String,
    pub occurred_on: String,
    pub user_name: String,
    pub description: String,
    pub site_name: String,
    pub site_identifier: String,
}

impl EventSummary {
    pub fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            identifier: extract_identifier(Collection::Events, record)?,
            occurred_on: display_field(record, "/OccurredOn"),
            user_name: display_field(record, "/UserName"),
            description: display_field(record, "/Description"),
            site_name: display_field(record, "/SiteName"),
            site_identifier: display_field(record, "/SiteIdentifier"),
        })
    }

    /// `OccurredOn | EventIdentifier | UserName | Description | SiteName | SiteIdentifier`
    pub fn line(&self) -> String {
        [
            self.occurred_on.as_str(),
            self.identifier.as_str(),
            self.user_name.as_str(),
            self.description.as_str(),
            self.site_name.as_str(),
            self.site_identifier.as_str(),
        ]
        .join(" | ")
    }
}

/// Display fields of a new task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub identifier: String,
    pub started: String,
    pub initiated_by: String,
    pub task_type: String,
    pub site_identifier: String,
}

impl TaskSummary {
    pub fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            identifier: extract_identifier(Collection::Tasks, record)?,
            started: display_field(record, "/started"),
            initiated_by: display_field(record, "/InitiatedBy"),
            task_type: display_field(record, "/Type"),
            site_identifier: display_field(record, "/RelatedEntities/Sites/0/identifier"),
        })
    }

    /// `started | TaskIdentifier | InitiatedBy | Type | site identifier | TaskIdentifier`
    pub fn line(&self) -> String {
        [
            self.started.as_str(),
            self.identifier.as_str(),
            self.initiated_by.as_str(),
            self.task_type.as_str(),
            self.site_identifier.as_str(),
            self.identifier.as_str(),
        ]
        .join(" | ")
    }
}

/// A record that carries an identifier, viewed through its collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "collection", rename_all = "lowercase")]
pub enum RecordSummary {
    Event(EventSummary),
    Task(TaskSummary),
}

impl RecordSummary {
    /// `None` when the record has no usable identifier.
    pub fn from_record(collection: Collection, record: &Value) -> Option<Self> {
        match collection {
            Collection::Events => EventSummary::from_record(record).map(RecordSummary::Event),
            Collection::Tasks => TaskSummary::from_record(record).map(RecordSummary::Task),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            RecordSummary::Event(event) => &event.identifier,
            RecordSummary::Task(task) => &task.identifier,
        }
    }

    pub fn line(&self) -> String {
        match self {
            RecordSummary::Event(event) => event.line(),
            RecordSummary::Task(task) => task.line(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_identifier_skips_absent_values() {
        let c = Collection::Events;
        assert_eq!(extract_identifier(c, &json!({})), None);
        assert_eq!(extract_identifier(c, &json!({"EventIdentifier": null})), None);
        assert_eq!(extract_identifier(c, &json!({"EventIdentifier": ""})), None);
        assert_eq!(extract_identifier(c, &json!({"EventIdentifier": ["E1"]})), None);
        assert_eq!(extract_identifier(c, &json!("E1")), None);
    }

    #[test]
    fn test_extract_identifier_stringifies_scalars() {
        let c = Collection::Events;
        let id = |record: Value| extract_identifier(c, &record);
        assert_eq!(id(json!({"EventIdentifier": "E1"})).as_deref(), Some("E1"));
        assert_eq!(id(json!({"EventIdentifier": 42})).as_deref(), Some("42"));
        assert_eq!(id(json!({"EventIdentifier": 2.5})).as_deref(), Some("2.5"));
        assert_eq!(id(json!({"EventIdentifier": true})).as_deref(), Some("true"));
    }

    #[test]
    fn test_numeric_identifier_appears_in_line() {
        let summary = TaskSummary::from_record(&json!({"TaskIdentifier": 7001})).unwrap();
        assert_eq!(summary.identifier, "7001");
        assert_eq!(summary.line(), "None | 7001 | None | None | None | 7001");
    }

    #[test]
    fn test_identifier_field_is_per_collection() {
        let record = json!({"TaskIdentifier": "T1"});
        assert_eq!(extract_identifier(Collection::Events, &record), None);
        assert_eq!(extract_identifier(Collection::Tasks, &record).as_deref(), Some("T1"));
    }

    #[test]
    fn test_event_line() {
        let record = json!({
            "EventIdentifier": "E1",
            "OccurredOn": "2024-05-01T10:00:00Z",
            "UserName": "admin",
            "Description": "VPG 'web' created",
            "SiteName": "Site-A",
            "SiteIdentifier": "S-1"
        });

        let summary = EventSummary::from_record(&record).unwrap();
        assert_eq!(
            summary.line(),
            "2024-05-01T10:00:00Z | E1 | admin | VPG 'web' created | Site-A | S-1"
        );
    }

    #[test]
    fn test_event_missing_fields_render_none() {
        let record = json!({"EventIdentifier": "E2", "UserName": null});
        let summary = EventSummary::from_record(&record).unwrap();
        assert_eq!(summary.line(), "None | E2 | None | None | None | None");
    }

    #[test]
    fn test_task_line_reads_first_site() {
        let record = json!({
            "TaskIdentifier": "T1",
            "started": "2024-05-01T10:05:00Z",
            "InitiatedBy": "scheduler",
            "Type": "FailoverTest",
            "RelatedEntities": {"Sites": [{"identifier": "S-1"}, {"identifier": "S-2"}]}
        });

        let summary = TaskSummary::from_record(&record).unwrap();
        assert_eq!(summary.site_identifier, "S-1");
        assert_eq!(
            summary.line(),
            "2024-05-01T10:05:00Z | T1 | scheduler | FailoverTest | S-1 | T1"
        );
    }

    #[test]
    fn test_task_without_sites_renders_none() {
        for related in [json!({}), json!({"Sites": []}), json!({"Sites": [{}]})] {
            let record = json!({"TaskIdentifier": "T2", "RelatedEntities": related});
            let summary = TaskSummary::from_record(&record).unwrap();
            assert_eq!(summary.site_identifier, "None");
        }
    }

    #[test]
    fn test_non_string_display_fields_render_as_json() {
        let record = json!({"TaskIdentifier": "T3", "Type": 7});
        let summary = TaskSummary::from_record(&record).unwrap();
        assert_eq!(summary.task_type, "7");
    }

    #[test]
    fn test_record_summary_dispatch() {
        let record = json!({"EventIdentifier": "E9"});
        let summary = RecordSummary::from_record(Collection::Events, &record).unwrap();
        assert_eq!(summary.identifier(), "E9");
        assert!(RecordSummary::from_record(Collection::Tasks, &record).is_none());
    }
}

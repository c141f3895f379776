//! Action results reported by the assistant and their display contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one operation the assistant engine claims to have executed.
///
/// Produced entirely server-side. The client never interprets the details,
/// it only lays them out through [`ActionResult::detail_entries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Action identifier, e.g. `create_task`.
    pub action: String,

    /// Whether the engine reports the action as successful.
    pub success: bool,

    /// Structured details (may contain nested task/leave summaries).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,

    /// Error message for failed actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Success/failure badge of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Success,
    Failed,
}

impl ActionStatus {
    /// Badge text.
    pub fn label(&self) -> &'static str {
        match self {
            ActionStatus::Success => "SUCCESS",
            ActionStatus::Failed => "FAILED",
        }
    }
}

/// One row of the flattened details listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailEntry {
    pub key: String,
    pub value: DetailValue,
}

/// Display form of a details value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailValue {
    /// Scalar or object rendered as compact JSON text.
    Text(String),
    /// Collection rendered as a nested list, one line per element.
    List(Vec<String>),
}

impl ActionResult {
    /// Create a successful result.
    pub fn succeeded(action: impl Into<String>, details: Option<Map<String, Value>>) -> Self {
        Self {
            action: action.into(),
            success: true,
            details,
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failed(action: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            success: false,
            details: None,
            error: Some(error.into()),
        }
    }

    /// Human-formatted action name: `create_task` becomes `CREATE TASK`.
    pub fn label(&self) -> String {
        self.action
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }

    /// Badge for this result.
    pub fn status(&self) -> ActionStatus {
        if self.success {
            ActionStatus::Success
        } else {
            ActionStatus::Failed
        }
    }

    /// Flattened key/value listing of `details`, in server order.
    pub fn detail_entries(&self) -> Vec<DetailEntry> {
        let Some(details) = &self.details else {
            return Vec::new();
        };

        details
            .iter()
            .map(|(key, value)| DetailEntry {
                key: key.clone(),
                value: match value {
                    Value::Array(items) => {
                        DetailValue::List(items.iter().map(summarize_item).collect())
                    }
                    other => DetailValue::Text(json_text(other)),
                },
            })
            .collect()
    }
}

/// One line for an element of a nested collection.
fn summarize_item(item: &Value) -> String {
    let Value::Object(fields) = item else {
        return json_text(item);
    };

    if let Some(title) = fields.get("title").and_then(Value::as_str) {
        return summarize_task(title, fields);
    }
    if let Some(leave_type) = fields.get("leave_type").and_then(Value::as_str) {
        return summarize_leave(leave_type, fields);
    }
    json_text(item)
}

/// `title [status, priority]`
fn summarize_task(title: &str, fields: &Map<String, Value>) -> String {
    let tags: Vec<&str> = ["status", "priority"]
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .collect();

    if tags.is_empty() {
        title.to_string()
    } else {
        format!("{} [{}]", title, tags.join(", "))
    }
}

/// `user: leave_type start → end`
fn summarize_leave(leave_type: &str, fields: &Map<String, Value>) -> String {
    let text = |key: &str| fields.get(key).and_then(Value::as_str);

    let mut line = match text("user").or_else(|| text("user_email")) {
        Some(user) => format!("{}: {}", user, leave_type),
        None => leave_type.to_string(),
    };
    match (text("start_date"), text("end_date")) {
        (Some(start), Some(end)) => line.push_str(&format!(" {} → {}", start, end)),
        (Some(day), None) | (None, Some(day)) => line.push_str(&format!(" {}", day)),
        (None, None) => {}
    }
    line
}

fn json_text(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(value: Value) -> Option<Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn test_label_formatting() {
        let result = ActionResult::succeeded("create_task", None);
        assert_eq!(result.label(), "CREATE TASK");

        let result = ActionResult::succeeded("list_pending_leaves", None);
        assert_eq!(result.label(), "LIST PENDING LEAVES");

        let result = ActionResult::succeeded("__odd__name", None);
        assert_eq!(result.label(), "ODD NAME");
    }

    #[test]
    fn test_status_badge() {
        assert_eq!(
            ActionResult::succeeded("mark_attendance", None).status(),
            ActionStatus::Success
        );
        let failed = ActionResult::failed("approve_leave", "Insufficient permissions");
        assert_eq!(failed.status(), ActionStatus::Failed);
        assert_eq!(failed.status().label(), "FAILED");
    }

    #[test]
    fn test_scalar_details_render_as_json_text() {
        let result = ActionResult::succeeded(
            "create_task",
            details(json!({"title": "X", "count": 3, "urgent": true, "deadline": null})),
        );

        let entries = result.detail_entries();
        let find = |key: &str| {
            entries
                .iter()
                .find(|e| e.key == key)
                .map(|e| e.value.clone())
                .unwrap()
        };
        assert_eq!(entries.len(), 4);
        assert_eq!(find("title"), DetailValue::Text(r#""X""#.to_string()));
        assert_eq!(find("count"), DetailValue::Text("3".to_string()));
        assert_eq!(find("urgent"), DetailValue::Text("true".to_string()));
        assert_eq!(find("deadline"), DetailValue::Text("null".to_string()));
    }

    #[test]
    fn test_task_list_details() {
        let result = ActionResult::succeeded(
            "list_user_tasks",
            details(json!({
                "tasks": [
                    {"id": "t1", "title": "Write report", "status": "in_progress", "priority": "high"},
                    {"id": "t2", "title": "Fix login"}
                ]
            })),
        );

        let entries = result.detail_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].value,
            DetailValue::List(vec![
                "Write report [in_progress, high]".to_string(),
                "Fix login".to_string(),
            ])
        );
    }

    #[test]
    fn test_leave_list_details() {
        let result = ActionResult::succeeded(
            "list_pending_leaves",
            details(json!({
                "leaves": [
                    {
                        "leave_id": "l1",
                        "user": "Dana",
                        "leave_type": "sick",
                        "start_date": "2025-03-01",
                        "end_date": "2025-03-02"
                    },
                    {"leave_type": "casual", "user_email": "sam@operai.demo"}
                ]
            })),
        );

        let entries = result.detail_entries();
        assert_eq!(
            entries[0].value,
            DetailValue::List(vec![
                "Dana: sick 2025-03-01 → 2025-03-02".to_string(),
                "sam@operai.demo: casual".to_string(),
            ])
        );
    }

    #[test]
    fn test_unknown_list_items_fall_back_to_json() {
        let result = ActionResult::succeeded(
            "get_team_members",
            details(json!({"members": [{"name": "Ari"}, "plain", 7], "empty": []})),
        );

        let entries = result.detail_entries();
        let members = entries.iter().find(|e| e.key == "members").unwrap();
        assert_eq!(
            members.value,
            DetailValue::List(vec![
                r#"{"name":"Ari"}"#.to_string(),
                r#""plain""#.to_string(),
                "7".to_string(),
            ])
        );
        let empty = entries.iter().find(|e| e.key == "empty").unwrap();
        assert_eq!(empty.value, DetailValue::List(Vec::new()));
    }

    #[test]
    fn test_no_details() {
        let result = ActionResult::failed("reassign_task", "Task not found");
        assert!(result.detail_entries().is_empty());
    }
}

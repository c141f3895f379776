//! Wire shapes of the assistant endpoints and the response adapter.
//!
//! The server has shipped several revisions of the reply contract. The
//! canonical one is `{ response, thought, actions_executed }`; the older
//! `message`/`explanation` text fields and `actionsExecuted`/`actions`
//! arrays are still accepted. Everything is collapsed into
//! [`AssistantReply`] here so nothing downstream branches on field names.
//!
//! The adapter walks a `serde_json::Value` instead of deriving with
//! `#[serde(alias)]`: a reply carrying two aliases at once, or a field of an
//! unexpected type, must degrade instead of failing to deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::ActionResult;
use crate::ids::SessionId;

/// Text fields, in order of preference.
const CONTENT_FIELDS: [&str; 3] = ["response", "message", "explanation"];

/// Action array fields, in order of preference.
const ACTION_FIELDS: [&str; 3] = ["actions_executed", "actionsExecuted", "actions"];

/// Action name fields, in order of preference.
const ACTION_NAME_FIELDS: [&str; 2] = ["action", "name"];

/// Name used when an action element carries no name at all.
const UNKNOWN_ACTION: &str = "unknown_action";

/// Body of `POST /api/ai/execute` and `POST /api/ai/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Trimmed operator command.
    pub message: String,
    /// Conversation correlation id.
    pub session_id: SessionId,
}

impl ExecuteRequest {
    pub fn new(message: impl Into<String>, session_id: SessionId) -> Self {
        Self {
            message: message.into(),
            session_id,
        }
    }
}

/// Normalized assistant reply.
///
/// Serializes with the canonical field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Explanation text shown as the assistant message.
    #[serde(rename = "response")]
    pub content: String,

    /// Executed actions, in server order.
    #[serde(rename = "actions_executed", default)]
    pub actions: Vec<ActionResult>,

    /// The engine's reading of the command, if it shared one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
}

impl AssistantReply {
    /// Normalize a raw response body.
    ///
    /// Bodies that are not JSON become a plain reply carrying the raw text.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::plain(body.trim()),
        }
    }

    /// Normalize a decoded response.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::from_fields(&fields),
            Value::String(text) => Self::plain(text),
            Value::Null => Self::default(),
            other => Self::plain(other.to_string()),
        }
    }

    /// Reply without actions.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            actions: Vec::new(),
            thought: None,
        }
    }

    /// An object carrying neither a text field nor an actions array is shown
    /// as its raw JSON text.
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let items = ACTION_FIELDS
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_array));

        let content = match first_text(fields, &CONTENT_FIELDS) {
            Some(text) => text,
            None if items.is_none() => Value::Object(fields.clone()).to_string(),
            None => String::new(),
        };

        let actions = items
            .map(|items| items.iter().filter_map(normalize_action).collect())
            .unwrap_or_default();

        let thought = first_text(fields, &["thought"]);

        Self {
            content,
            actions,
            thought,
        }
    }

    /// Number of actions reported as failed.
    pub fn failed_count(&self) -> usize {
        self.actions.iter().filter(|a| !a.success).count()
    }
}

/// Normalize one element of the actions array.
///
/// Non-object elements are dropped. When the outcome is nested under
/// `result`, each nested field wins and the outer object fills whatever the
/// nested one lacks.
fn normalize_action(value: &Value) -> Option<ActionResult> {
    let outer = value.as_object()?;
    let inner = outer.get("result").and_then(Value::as_object);
    let lookup = |key: &str| {
        inner
            .and_then(|fields| fields.get(key))
            .filter(|v| !v.is_null())
            .or_else(|| outer.get(key).filter(|v| !v.is_null()))
    };

    let action = inner
        .and_then(|fields| first_text(fields, &ACTION_NAME_FIELDS))
        .or_else(|| first_text(outer, &ACTION_NAME_FIELDS))
        .unwrap_or_else(|| UNKNOWN_ACTION.to_string());

    let success = lookup("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let details = match lookup("details") {
        None => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => {
            let mut wrapped = Map::new();
            wrapped.insert("value".to_string(), other.clone());
            Some(wrapped)
        }
    };

    let error = inner
        .and_then(|fields| non_empty_str(fields, "error"))
        .or_else(|| non_empty_str(outer, "error"));

    Some(ActionResult {
        action,
        success,
        details,
        error,
    })
}

fn non_empty_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// One stored turn from `GET /api/ai/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Operator command.
    pub message: String,
    /// Assistant reply text.
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// `execute` for action turns, absent for plain chat.
    #[serde(default)]
    pub action_type: Option<String>,
    /// Server timestamp (ISO-8601).
    #[serde(default)]
    pub created_at: Option<String>,
}

impl HistoryEntry {
    /// Parsed creation time, if the server sent a valid timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
            })
            .ok()
    }
}

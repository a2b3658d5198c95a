//! JSON shapes exchanged with the backend, and the rules that turn an HTTP
//! status plus body into success or an [`ApiError`].
//!
//! The backend is not consistent about envelopes: some endpoints wrap the
//! payload as `{ "status": "success", "task": {...} }`, others return the
//! record bare with a `status` key mixed in. Everything that has to cope with
//! that lives here so the client and controller only see typed values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::task::{Priority, Status, Task, TaskId, UnknownStatus};

/// `status` value the backend uses for a successful operation.
pub const STATUS_SUCCESS: &str = "success";

// ── Task records ───────────────────────────────────────────────

/// A task as the backend serializes it, before its status is checked.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "assignee")]
    pub assigned_to_username: Option<String>,
    #[serde(default)]
    pub assigned_to_initials: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub social_post_id: Option<TaskId>,
    #[serde(default)]
    pub project_name: Option<String>,
}

impl TaskRecord {
    /// Convert to a [`Task`], using `inherited` when the record has no status
    /// of its own (a task listed under a column key).
    pub fn into_task(self, inherited: Option<&str>) -> Result<Task, UnknownStatus> {
        let raw = self.status.as_deref().or(inherited).unwrap_or_default();
        let status: Status = raw.parse()?;

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status,
            priority: self.priority,
            assignee: self.assigned_to_username,
            assignee_initials: self.assigned_to_initials,
            tags: self.tags.unwrap_or_default(),
            linked_post: self.social_post_id,
            project_name: self.project_name,
        })
    }
}

// ── Requests ───────────────────────────────────────────────────

/// Body of the move endpoint. The order list is the complete destination
/// column, which the server uses to rewrite relative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub task_id: TaskId,
    pub new_status: Status,
    pub new_order_list: Vec<TaskId>,
}

// ── Responses ──────────────────────────────────────────────────

/// Turn a raw response into its JSON body, or the matching error.
///
/// - unreadable body on 2xx: network failure
/// - 4xx: validation failure, carrying field errors when present
/// - 5xx: server failure
/// - 2xx whose body reports `status: "error"` or carries an `error` key:
///   server failure (unexpected shape)
pub fn classify(status: u16, body: &str) -> Result<Value, ApiError> {
    let parsed = serde_json::from_str::<Value>(body);

    match status {
        200..=299 => {
            let value = parsed
                .map_err(|e| ApiError::Network(format!("unparsable response body: {e}")))?;
            if let Some(message) = reported_error(&value) {
                return Err(ApiError::Server { status, message });
            }
            Ok(value)
        }
        400..=499 => {
            let value = parsed.unwrap_or(Value::Null);
            Err(ApiError::Validation {
                status,
                message: message_of(&value).unwrap_or_else(|| format!("request rejected ({status})")),
                errors: field_errors(&value),
            })
        }
        _ => {
            let message = parsed
                .ok()
                .and_then(|value| message_of(&value))
                .unwrap_or_else(|| format!("unexpected status {status}"));
            Err(ApiError::Server { status, message })
        }
    }
}

/// Like [`classify`], but also require `status: "success"` in the body.
pub fn expect_success(status: u16, body: &str) -> Result<Value, ApiError> {
    let value = classify(status, body)?;
    match value.get("status").and_then(Value::as_str) {
        Some(STATUS_SUCCESS) => Ok(value),
        other => Err(ApiError::Server {
            status,
            message: match other {
                Some(s) => format!("unexpected status field '{s}'"),
                None => "response has no status field".to_string(),
            },
        }),
    }
}

/// Pull the created task out of a create response, wrapped or bare.
///
/// In the bare form the envelope's `status: "success"` can shadow the task's
/// own status; it is dropped so the caller falls back to a default column.
pub fn created_task(status: u16, value: Value) -> Result<TaskRecord, ApiError> {
    let (record, bare) = match value.get("task") {
        Some(inner @ Value::Object(_)) => (inner.clone(), false),
        _ => (value, true),
    };
    let mut record: TaskRecord = serde_json::from_value(record).map_err(|e| ApiError::Server {
        status,
        message: format!("created task has unexpected shape: {e}"),
    })?;
    if bare && record.status.as_deref() == Some(STATUS_SUCCESS) {
        record.status = None;
    }
    Ok(record)
}

fn reported_error(value: &Value) -> Option<String> {
    if value.get("status").and_then(Value::as_str) == Some("error") {
        return Some(message_of(value).unwrap_or_else(|| "backend reported an error".to_string()));
    }
    value.get("error").map(|e| match e {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Field errors come as `{ "field": ["msg", ...] }` or `{ "field": "msg" }`.
fn field_errors(value: &Value) -> BTreeMap<String, Vec<String>> {
    let mut errors = BTreeMap::new();
    let Some(Value::Object(map)) = value.get("errors") else {
        return errors;
    };
    for (field, messages) in map {
        let list = match messages {
            Value::Array(items) => items
                .iter()
                .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                .collect(),
            Value::String(s) => vec![s.clone()],
            other => vec![other.to_string()],
        };
        errors.insert(field.clone(), list);
    }
    errors
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_request_uses_camel_case_keys() {
        let req = UpdateTaskRequest {
            task_id: TaskId::new("7"),
            new_status: Status::Doing,
            new_order_list: vec![TaskId::new("3"), TaskId::new("7")],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "taskId": "7", "newStatus": "doing", "newOrderList": ["3", "7"] })
        );
    }

    #[test]
    fn record_inherits_column_key_only_when_status_missing() {
        let record: TaskRecord = serde_json::from_value(json!({ "id": 1, "title": "A" })).unwrap();
        assert_eq!(record.into_task(Some("done")).unwrap().status, Status::Done);

        let record: TaskRecord =
            serde_json::from_value(json!({ "id": 1, "title": "A", "status": "doing" })).unwrap();
        assert_eq!(record.into_task(Some("done")).unwrap().status, Status::Doing);

        let record: TaskRecord = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert!(record.into_task(None).is_err());
    }

    #[test]
    fn record_tolerates_null_tags() {
        let record: TaskRecord =
            serde_json::from_value(json!({ "id": "x", "status": "todo", "tags": null })).unwrap();
        assert!(record.into_task(None).unwrap().tags.is_empty());
    }

    #[test]
    fn classify_success_body() {
        let value = expect_success(200, r#"{"status":"success","message":"ok"}"#).unwrap();
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn classify_validation_errors() {
        let err = classify(
            400,
            r#"{"status":"error","message":"Title is required.","errors":{"title":["required"],"project":"unknown"}}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Validation { status, message, errors } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Title is required.");
                assert_eq!(errors["title"], vec!["required".to_string()]);
                assert_eq!(errors["project"], vec!["unknown".to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn classify_html_500_is_server_failure() {
        let err = classify(500, "<!DOCTYPE html><html>boom</html>").unwrap_err();
        assert_eq!(
            err,
            ApiError::Server { status: 500, message: "unexpected status 500".into() }
        );
    }

    #[test]
    fn classify_unreadable_ok_body_is_network_failure() {
        assert!(matches!(classify(200, "not json"), Err(ApiError::Network(_))));
    }

    #[test]
    fn classify_reported_error_on_ok_status() {
        let err = classify(200, r#"{"error":"Task not found"}"#).unwrap_err();
        assert_eq!(err, ApiError::Server { status: 200, message: "Task not found".into() });
    }

    #[test]
    fn expect_success_rejects_missing_status() {
        assert!(matches!(expect_success(200, "{}"), Err(ApiError::Server { .. })));
    }

    #[test]
    fn created_task_wrapped_or_bare() {
        let wrapped = json!({ "status": "success", "task": { "id": 5, "title": "A", "status": "todo" } });
        assert_eq!(created_task(201, wrapped).unwrap().id, TaskId::new("5"));

        let bare = json!({ "status": "todo", "id": 6, "title": "B", "message": "created" });
        let record = created_task(201, bare).unwrap();
        assert_eq!(record.into_task(None).unwrap().status, Status::Todo);

        let shadowed = json!({ "status": "success", "id": 7, "title": "C" });
        let record = created_task(201, shadowed).unwrap();
        assert_eq!(record.status, None);
        assert_eq!(record.into_task(Some("briefing")).unwrap().status, Status::Briefing);
    }
}

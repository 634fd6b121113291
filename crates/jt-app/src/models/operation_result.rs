use serde::Serialize;

use jt_core::bookmark::{BookmarkError, ErrorKind};

/// Payload of operations that only report success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoPayload {}

/// UI-facing result of a store operation.
///
/// Serializes as `{"success": true, ...payload}` or
/// `{"success": false, "error": "...", "error_kind": "..."}`. The payload
/// is flattened, so it must serialize as a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T: Serialize> OperationResult<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            error: None,
            error_kind: None,
            payload: Some(payload),
        }
    }

    pub fn failure(error: &BookmarkError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            payload: None,
        }
    }
}

impl<T: Serialize> From<Result<T, BookmarkError>> for OperationResult<T> {
    fn from(result: Result<T, BookmarkError>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookmarkPayload;
    use chrono::{TimeZone, Utc};
    use jt_core::bookmark::{BookmarkRecord, JobRecord};
    use jt_core::ids::JobId;
    use serde_json::json;

    #[test]
    fn test_success_flattens_payload() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let record = BookmarkRecord::new(JobRecord::new("j1", "T", "E"), None, String::new(), now);
        let value = serde_json::to_value(OperationResult::ok(BookmarkPayload {
            bookmark: record,
        }))
        .unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["bookmark"]["job_id"], json!("j1"));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_carries_message_and_kind() {
        let result: OperationResult<NoPayload> =
            Err(BookmarkError::NotFound(JobId::from("j1"))).into();
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "bookmark not found: j1",
                "error_kind": "NotFound"
            })
        );
    }

    #[test]
    fn test_empty_payload_is_just_success() {
        let value = serde_json::to_value(OperationResult::ok(NoPayload {})).unwrap();
        assert_eq!(value, json!({"success": true}));
    }
}

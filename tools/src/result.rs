//! The envelope every tool call returns.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Result of a tool call.
///
/// Three shapes are possible:
/// - `{ "success": true, "data": ... }`
/// - `{ "success": true, "message": ... }` when the call worked but found nothing
/// - `{ "success": false, "error": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult<T> {
    /// Whether the call succeeded.
    pub success: bool,

    /// Payload of a successful call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Explanation for a successful call without results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ToolResult<T> {
    /// Create a successful result.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Create a successful result that legitimately has nothing to return.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Wrap a `Result`, turning the error into its display message.
    pub fn from_result<E: Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }

    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.success
    }

    /// Whether the call succeeded without producing data.
    pub fn is_empty(&self) -> bool {
        self.success && self.data.is_none()
    }

    /// Transform the payload, keeping the envelope.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ToolResult<U> {
        ToolResult {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
        }
    }
}

impl<T: Serialize> ToolResult<T> {
    /// Convert the payload to JSON.
    pub fn into_value(self) -> ToolResult<serde_json::Value> {
        let Self {
            success,
            data,
            message,
            error,
        } = self;

        match data.map(serde_json::to_value).transpose() {
            Ok(data) => ToolResult {
                success,
                data,
                message,
                error,
            },
            Err(e) => ToolResult::err(format!("failed to serialize tool output: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ok_shape() {
        let value = serde_json::to_value(ToolResult::ok(vec![1, 2])).unwrap();
        assert_eq!(value, serde_json::json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn test_empty_shape() {
        let result: ToolResult<Vec<i32>> = ToolResult::ok_empty("Nothing found");
        assert!(result.is_ok());
        assert!(result.is_empty());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "success": true, "message": "Nothing found" })
        );
    }

    #[test]
    fn test_err_shape() {
        let result: ToolResult<()> = ToolResult::err("Speed must be greater than zero");
        assert!(!result.is_ok());
        assert!(!result.is_empty());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "success": false, "error": "Speed must be greater than zero" })
        );
    }

    #[test]
    fn test_from_result() {
        let failed: ToolResult<u8> = ToolResult::from_result(Err::<u8, _>("boom"));
        assert_eq!(failed.error.as_deref(), Some("boom"));

        let worked = ToolResult::from_result(Ok::<_, String>(3));
        assert_eq!(worked.data, Some(3));
    }

    #[test]
    fn test_map_and_into_value() {
        let result = ToolResult::ok(2).map(|n| n * 10).into_value();
        assert_eq!(result.data, Some(serde_json::json!(20)));

        let empty = ToolResult::<i32>::ok_empty("none").into_value();
        assert_eq!(empty.message.as_deref(), Some("none"));
        assert!(empty.data.is_none());
    }

    #[test]
    fn test_round_trip_from_json() {
        let parsed: ToolResult<String> =
            serde_json::from_str(r#"{"success":false,"error":"nope"}"#).unwrap();
        assert_eq!(parsed, ToolResult::err("nope"));
    }
}

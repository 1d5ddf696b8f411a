//! Helpers for building `CallToolResult` values

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

fn to_json<T: Serialize>(data: &T) -> Result<Content, McpError> {
    serde_json::to_string_pretty(data)
        .map(Content::text)
        .map_err(|e| McpError::internal_error(e.to_string(), None))
}

/// Successful result whose single content item is `data` as pretty JSON
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![to_json(data)?]))
}

/// Tool-level failure (`is_error = true`) carrying `data` as pretty JSON
///
/// Use this for errors the caller should read as data, e.g. `{"error": "..."}`,
/// rather than protocol errors.
pub fn json_error<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![to_json(data)?]))
}

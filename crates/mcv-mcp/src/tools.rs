//! MCP Tool Types
//!
//! Parameter types for every MCP tool, plus the error payload returned when
//! a tool call fails. Identifiers are accepted as signed integers so that
//! negative or zero values reach validation instead of failing to decode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mcv_mcp_core::Error;

// =============================================================================
// Course Tools
// =============================================================================

/// Parameters for mcv_get_courses
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CoursesParams {
    /// Academic year (e.g. 2567). Defaults to the current term's year.
    #[serde(default)]
    pub year: Option<i64>,

    /// Semester (1, 2 or 3). Defaults to the current semester.
    #[serde(default)]
    pub semester: Option<i64>,
}

/// Parameters for tools that operate on a single course
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseParams {
    /// Course id (`cv_cid`) as returned by mcv_get_courses
    pub cv_cid: i64,
}

// =============================================================================
// Assignment Tools
// =============================================================================

/// Parameters for mcv_get_assignments
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AssignmentsParams {
    /// Maximum number of assignments to return (1-500, default 50)
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Parameters for mcv_get_assignment_detail
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssignmentDetailParams {
    /// Course id (`cv_cid`)
    pub cv_cid: i64,

    /// Assignment id as returned by the assignment tools
    pub assignment_id: i64,
}

// =============================================================================
// Material Tools
// =============================================================================

/// Parameters for mcv_get_material_content
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MaterialContentParams {
    /// Course id (`cv_cid`)
    pub cv_cid: i64,

    /// Material node id as returned by mcv_get_course_materials
    pub material_node_id: i64,
}

// =============================================================================
// Session Tools
// =============================================================================

/// Parameters for mcv_validate_session
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ValidateSessionParams {}

// =============================================================================
// Errors
// =============================================================================

/// Payload of a failed tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolErrorResponse {
    /// Error kind (e.g. `authentication_error`, `validation_error`)
    pub error: String,

    /// Human-readable description
    pub message: String,

    /// What the user can do about it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// HTTP status of the offending response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Leading part of the offending response body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl From<&Error> for ToolErrorResponse {
    fn from(err: &Error) -> Self {
        let hint = match err {
            Error::Authentication(_) => Some(
                "Log in to MyCourseVille in a browser, copy the session cookie, \
                 and restart the server with a fresh MCV_COOKIE"
                    .to_string(),
            ),
            Error::Network(_) => Some("Check the network connection and try again".to_string()),
            _ => None,
        };

        let (status, snippet) = match err {
            Error::UnexpectedFormat {
                status, snippet, ..
            } => (Some(*status), Some(snippet.clone())),
            _ => (None, None),
        };

        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
            hint,
            status,
            snippet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_params_default() {
        let params: CoursesParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.year.is_none());
        assert!(params.semester.is_none());

        let params: AssignmentsParams = serde_json::from_value(json!({"limit": 5})).unwrap();
        assert_eq!(params.limit, Some(5));
    }

    #[test]
    fn test_negative_ids_decode() {
        let params: CourseParams = serde_json::from_value(json!({"cv_cid": -3})).unwrap();
        assert_eq!(params.cv_cid, -3);
    }

    #[test]
    fn test_authentication_error_payload() {
        let err = Error::Authentication("rejected".to_string());
        let payload = ToolErrorResponse::from(&err);
        assert_eq!(payload.error, "authentication_error");
        assert!(payload.hint.unwrap().contains("MCV_COOKIE"));
        assert!(payload.status.is_none());
    }

    #[test]
    fn test_unexpected_format_payload() {
        let err = Error::unexpected_format(500, "bad gateway", "<html>oops</html>");
        let value = serde_json::to_value(ToolErrorResponse::from(&err)).unwrap();
        assert_eq!(value["error"], "unexpected_format_error");
        assert_eq!(value["status"], 500);
        assert_eq!(value["snippet"], "<html>oops</html>");
        assert!(value.get("hint").is_none());
    }

    #[test]
    fn test_validation_payload_is_minimal() {
        let err = Error::Validation("cv_cid must be a positive integer".to_string());
        let value = serde_json::to_value(ToolErrorResponse::from(&err)).unwrap();
        assert_eq!(
            value,
            json!({
                "error": "validation_error",
                "message": "Invalid parameters: cv_cid must be a positive integer"
            })
        );
    }
}

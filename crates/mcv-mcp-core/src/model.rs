//! Portal entities returned by the MCP tools.
//!
//! Every type here is a read-only snapshot of something the portal rendered.
//! Identifiers and timestamps are kept exactly as the portal sent them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An enrolled course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Course {
    /// Portal course identifier
    pub cv_cid: u64,
    /// Course number, e.g. "2110101"
    pub course_no: String,
    /// Course title
    pub title: String,
    /// Academic year
    pub year: u32,
    /// Semester number
    pub semester: u8,
}

/// An assignment (worksheet) listed for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Assignment {
    /// Course the assignment belongs to
    pub mcv_course_id: u64,
    /// Assignment identifier
    pub assignment_id: u64,
    /// Assignment title
    pub assignment_name: String,
    /// Course number, when the listing shows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_no: Option<String>,
    /// Due date as rendered by the portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Submission status as rendered by the portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A course material entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Material {
    /// Course the material belongs to
    pub cv_cid: u64,
    /// Material node identifier (from the `view_content_node` URL)
    pub material_node_id: Option<u64>,
    /// Folder name, empty when the material is not in a folder
    pub folder: String,
    /// Material title
    pub title: String,
    /// Absolute URL of the material view page
    pub view_url: String,
}

/// Details of a single material including its download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MaterialContent {
    /// Course the material belongs to
    pub cv_cid: u64,
    /// Material node identifier
    pub material_node_id: u64,
    /// Material title
    pub title: String,
    /// Download URL (often a short-lived signed S3 URL), empty if none found
    pub download_url: String,
    /// Absolute URL of the material view page
    pub page_url: String,
}

/// A course announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Announcement {
    /// Course the announcement belongs to
    pub cv_cid: u64,
    /// Announcement identifier, when the page exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_id: Option<String>,
    /// Announcement title
    pub title: String,
    /// Announcement body text
    pub content: String,
    /// Posting time as rendered by the portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
}

/// Type of answer a worksheet question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one of the listed choices
    MultipleChoice,
    /// Free text answer
    OpenText,
    /// Anything else
    Unknown,
}

/// One choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Choice {
    /// Value submitted for this choice
    pub value: String,
    /// Choice text
    pub label: String,
}

/// A worksheet question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// Portal question identifier (`qstn_nid`)
    pub id: String,
    /// 1-based position in the worksheet
    pub number: usize,
    /// Question text
    pub question: String,
    /// Answer type
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Ordered choices (empty unless multiple choice)
    pub choices: Vec<Choice>,
    /// Points awarded
    pub points: u32,
    /// Human-readable one-question summary
    pub summary: String,
}

/// Full content of an assignment worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssignmentDetail {
    /// Course the assignment belongs to
    pub cv_cid: u64,
    /// Assignment identifier
    pub assignment_id: u64,
    /// Worksheet title
    pub title: String,
    /// Due date as rendered by the portal, empty if absent
    pub due_date: String,
    /// Worksheet instructions
    pub instruction: String,
    /// Questions in worksheet order
    pub questions: Vec<Question>,
    /// Number of questions
    pub total_questions: usize,
    /// Human-readable summary of the whole worksheet
    pub human_summary: String,
}

/// Result of a session liveness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionState {
    /// Whether the portal accepted the cookie
    pub valid: bool,
    /// Explanation for humans
    pub message: String,
}

impl SessionState {
    /// State for an accepted or rejected session.
    pub fn from_validity(valid: bool) -> Self {
        let message = if valid {
            "Session is valid"
        } else {
            "Session expired or invalid"
        };
        Self {
            valid,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignment_omits_missing_optionals() {
        let assignment = Assignment {
            mcv_course_id: 12345,
            assignment_id: 678,
            assignment_name: "Lab 1".to_string(),
            course_no: None,
            due_date: None,
            status: None,
        };
        let value = serde_json::to_value(&assignment).unwrap();
        assert_eq!(
            value,
            json!({
                "mcv_course_id": 12345,
                "assignment_id": 678,
                "assignment_name": "Lab 1"
            })
        );
    }

    #[test]
    fn test_question_kind_serialization() {
        let question = Question {
            id: "99".to_string(),
            number: 1,
            question: "2 + 2?".to_string(),
            kind: QuestionKind::MultipleChoice,
            choices: vec![Choice {
                value: "a".to_string(),
                label: "4".to_string(),
            }],
            points: 1,
            summary: String::new(),
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "multiple_choice");
        assert_eq!(value["choices"][0]["label"], "4");
    }

    #[test]
    fn test_session_state_messages() {
        assert_eq!(SessionState::from_validity(true).message, "Session is valid");
        let invalid = SessionState::from_validity(false);
        assert!(!invalid.valid);
        assert_eq!(invalid.message, "Session expired or invalid");
    }
}

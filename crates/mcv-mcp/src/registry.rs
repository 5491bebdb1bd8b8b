//! Tool Registry
//!
//! Validates tool parameters and dispatches to [`McvClient`]. Validation
//! happens before any request is sent, so malformed calls never reach the
//! portal.

use mcv_mcp_client::McvClient;
use mcv_mcp_core::config::MAX_ASSIGNMENT_LIMIT;
use mcv_mcp_core::{
    Announcement, Assignment, AssignmentDetail, Course, Error, Material, MaterialContent, Result,
    SessionState,
};

use crate::tools::*;

/// Names of the tools exposed by the server, in registration order.
pub const TOOL_NAMES: [&str; 8] = [
    "mcv_get_courses",
    "mcv_get_assignments",
    "mcv_get_course_assignments",
    "mcv_get_course_materials",
    "mcv_get_material_content",
    "mcv_get_announcements",
    "mcv_get_assignment_detail",
    "mcv_validate_session",
];

fn positive_id(name: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::Validation(format!("{name} must be a positive integer, got {value}")))
}

fn assignment_limit(value: Option<i64>) -> Result<Option<u32>> {
    let Some(limit) = value else {
        return Ok(None);
    };
    match u32::try_from(limit) {
        Ok(limit) if (1..=MAX_ASSIGNMENT_LIMIT).contains(&limit) => Ok(Some(limit)),
        _ => Err(Error::Validation(format!(
            "limit must be between 1 and {MAX_ASSIGNMENT_LIMIT}, got {limit}"
        ))),
    }
}

fn term_year(value: Option<i64>) -> Result<Option<u32>> {
    value
        .map(|year| {
            u32::try_from(year)
                .ok()
                .filter(|y| *y > 0)
                .ok_or_else(|| Error::Validation(format!("year must be a positive integer, got {year}")))
        })
        .transpose()
}

fn term_semester(value: Option<i64>) -> Result<Option<u8>> {
    value
        .map(|semester| match semester {
            1..=3 => Ok(semester as u8),
            _ => Err(Error::Validation(format!(
                "semester must be 1, 2 or 3, got {semester}"
            ))),
        })
        .transpose()
}

/// Validating front of the portal client, one method per tool.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    client: McvClient,
}

impl ToolRegistry {
    /// Create a registry over a portal client.
    pub fn new(client: McvClient) -> Self {
        Self { client }
    }

    /// The underlying portal client.
    pub fn client(&self) -> &McvClient {
        &self.client
    }

    /// mcv_get_courses
    pub async fn get_courses(&self, params: CoursesParams) -> Result<Vec<Course>> {
        let year = term_year(params.year)?;
        let semester = term_semester(params.semester)?;
        self.client.get_courses(year, semester).await
    }

    /// mcv_get_assignments
    pub async fn get_assignments(&self, params: AssignmentsParams) -> Result<Vec<Assignment>> {
        let limit = assignment_limit(params.limit)?;
        self.client.get_assignments(limit).await
    }

    /// mcv_get_course_assignments
    pub async fn get_course_assignments(&self, params: CourseParams) -> Result<Vec<Assignment>> {
        let cv_cid = positive_id("cv_cid", params.cv_cid)?;
        self.client.get_course_assignments(cv_cid).await
    }

    /// mcv_get_course_materials
    pub async fn get_course_materials(&self, params: CourseParams) -> Result<Vec<Material>> {
        let cv_cid = positive_id("cv_cid", params.cv_cid)?;
        self.client.get_course_materials(cv_cid).await
    }

    /// mcv_get_material_content
    pub async fn get_material_content(&self, params: MaterialContentParams) -> Result<MaterialContent> {
        let cv_cid = positive_id("cv_cid", params.cv_cid)?;
        let node = positive_id("material_node_id", params.material_node_id)?;
        self.client.get_material_content(cv_cid, node).await
    }

    /// mcv_get_announcements
    pub async fn get_announcements(&self, params: CourseParams) -> Result<Vec<Announcement>> {
        let cv_cid = positive_id("cv_cid", params.cv_cid)?;
        self.client.get_announcements(cv_cid).await
    }

    /// mcv_get_assignment_detail
    pub async fn get_assignment_detail(&self, params: AssignmentDetailParams) -> Result<AssignmentDetail> {
        let cv_cid = positive_id("cv_cid", params.cv_cid)?;
        let assignment_id = positive_id("assignment_id", params.assignment_id)?;
        self.client.get_assignment_detail(cv_cid, assignment_id).await
    }

    /// mcv_validate_session
    pub async fn validate_session(&self, _params: ValidateSessionParams) -> Result<SessionState> {
        self.client.validate_session().await
    }
}

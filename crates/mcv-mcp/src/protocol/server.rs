//! MCV MCP Server Implementation
//!
//! This module implements the MCP server using rmcp 0.9's #[tool_router] pattern.
//! Each tool hands its parameters to the [`ToolRegistry`] and renders the
//! outcome as a single JSON text block.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use mcv_mcp_client::McvClient;
use mcv_mcp_core::{Error, ServerConfig, SessionContext};

use crate::registry::ToolRegistry;
use crate::tools::*;

/// Turn a registry outcome into a tool result.
///
/// Domain errors become tool-level errors (`is_error = true`) carrying a
/// JSON payload; only a failure to serialize a successful value is reported
/// as a protocol error.
fn render<T: Serialize>(
    tool: &str,
    outcome: mcv_mcp_core::Result<T>,
) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).map_err(|e| {
                error!("Failed to serialize {} result: {}", tool, e);
                McpError::new(
                    ErrorCode(-32603), // Internal error
                    format!("Failed to serialize {tool} result: {e}"),
                    None,
                )
            })?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(err) => Ok(error_result(tool, &err)),
    }
}

fn error_result(tool: &str, err: &Error) -> CallToolResult {
    match err {
        Error::Validation(_) => warn!("{} rejected: {}", tool, err),
        _ => error!("{} failed: {}", tool, err),
    }

    let payload = ToolErrorResponse::from(err);
    let text = serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| format!(r#"{{"error": "{}"}}"#, payload.error));
    CallToolResult::error(vec![Content::text(text)])
}

/// MCV MCP Server
///
/// Exposes the MyCourseVille portal through a fixed set of read-only tools.
#[derive(Clone)]
pub struct McvMcpServer {
    /// Parameter validation and dispatch
    registry: Arc<ToolRegistry>,
    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl McvMcpServer {
    /// Create a server over an existing registry.
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server from configuration and a session.
    pub fn from_config(
        config: &ServerConfig,
        session: Arc<SessionContext>,
    ) -> mcv_mcp_core::Result<Self> {
        let client = McvClient::new(config, session)?;
        Ok(Self::new(ToolRegistry::new(client)))
    }

    /// List enrolled courses
    #[tool(
        description = "List the courses you are enrolled in for a term. Year and semester default to the current term."
    )]
    #[instrument(skip_all)]
    pub async fn mcv_get_courses(
        &self,
        Parameters(params): Parameters<CoursesParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(
            "Getting courses: year={:?}, semester={:?}",
            params.year, params.semester
        );
        render("mcv_get_courses", self.registry.get_courses(params).await)
    }

    /// List assignments across all courses
    #[tool(description = "List assignments across all enrolled courses, each tagged with its course id")]
    #[instrument(skip_all)]
    pub async fn mcv_get_assignments(
        &self,
        Parameters(params): Parameters<AssignmentsParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Getting assignments: limit={:?}", params.limit);
        render("mcv_get_assignments", self.registry.get_assignments(params).await)
    }

    /// List assignments of one course
    #[tool(description = "List all assignments of a single course")]
    #[instrument(skip_all)]
    pub async fn mcv_get_course_assignments(
        &self,
        Parameters(params): Parameters<CourseParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Getting assignments for course {}", params.cv_cid);
        render(
            "mcv_get_course_assignments",
            self.registry.get_course_assignments(params).await,
        )
    }

    /// List course materials
    #[tool(description = "List the materials (files, slides, links) of a course, grouped by folder")]
    #[instrument(skip_all)]
    pub async fn mcv_get_course_materials(
        &self,
        Parameters(params): Parameters<CourseParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Getting materials for course {}", params.cv_cid);
        render(
            "mcv_get_course_materials",
            self.registry.get_course_materials(params).await,
        )
    }

    /// Resolve a material download link
    #[tool(
        description = "Get the title and download URL of a course material. Download URLs may expire quickly."
    )]
    #[instrument(skip_all)]
    pub async fn mcv_get_material_content(
        &self,
        Parameters(params): Parameters<MaterialContentParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(
            "Getting material {} of course {}",
            params.material_node_id, params.cv_cid
        );
        render(
            "mcv_get_material_content",
            self.registry.get_material_content(params).await,
        )
    }

    /// List course announcements
    #[tool(description = "List the announcements posted in a course")]
    #[instrument(skip_all)]
    pub async fn mcv_get_announcements(
        &self,
        Parameters(params): Parameters<CourseParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Getting announcements for course {}", params.cv_cid);
        render(
            "mcv_get_announcements",
            self.registry.get_announcements(params).await,
        )
    }

    /// Read an assignment worksheet
    #[tool(
        description = "Get the questions, choices and a readable summary of an assignment worksheet"
    )]
    #[instrument(skip_all)]
    pub async fn mcv_get_assignment_detail(
        &self,
        Parameters(params): Parameters<AssignmentDetailParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(
            "Getting assignment {} of course {}",
            params.assignment_id, params.cv_cid
        );
        render(
            "mcv_get_assignment_detail",
            self.registry.get_assignment_detail(params).await,
        )
    }

    /// Check the session cookie
    #[tool(description = "Check whether the configured MyCourseVille session cookie is still accepted")]
    #[instrument(skip_all)]
    pub async fn mcv_validate_session(
        &self,
        Parameters(params): Parameters<ValidateSessionParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Validating session");
        render(
            "mcv_validate_session",
            self.registry.validate_session(params).await,
        )
    }
}

#[tool_handler]
impl rmcp::ServerHandler for McvMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "MyCourseVille MCP Server - Read your courses, assignments, materials and \
                 announcements from the MyCourseVille portal. \
                 Start with mcv_get_courses to find course ids (cv_cid), then use the per-course tools. \
                 mcv_get_assignments lists assignments across all courses and mcv_get_assignment_detail \
                 reads a worksheet. If a tool reports an authentication_error, run mcv_validate_session \
                 and ask the user for a fresh MCV_COOKIE."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

//! # MCV MCP Server
//!
//! Model Context Protocol server giving AI assistants read access to a
//! student's MyCourseVille portal.
//!
//! ## Overview
//!
//! This server provides MCP tools for:
//! - Courses (list enrolled courses for a term)
//! - Assignments (across all courses, per course, worksheet details)
//! - Materials and announcements
//! - Session validation
//!
//! ## Configuration
//!
//! - `MCV_COOKIE` (required): the portal session cookie
//! - `MCV_CONFIG` (optional): path to a YAML configuration file
//! - `MCV_BASE_URL` (optional): portal base URL override
//! - `RUST_LOG` (optional): log filter, logs go to stderr
//!
//! ## Architecture
//!
//! This is Layer 3 - the MCP server binary that ties together:
//! - mcv-mcp-core: Core types, configuration and session
//! - mcv-mcp-normalizer: Response normalizers
//! - mcv-mcp-client: Portal HTTP client

use std::sync::Arc;

use anyhow::Context;
use rmcp::{transport::stdio, ServiceExt};

use mcv_mcp::McvMcpServer;
use mcv_mcp_core::{ServerConfig, SessionContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("failed to load configuration")?;

    // Initialize logging on stderr; stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        "{} v{} starting...",
        config.server.name,
        env!("CARGO_PKG_VERSION")
    );

    let session = SessionContext::from_env().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    tracing::info!("Loaded session cookie: {:?}", session);

    let server = McvMcpServer::from_config(&config, Arc::new(session))?;

    tracing::info!(
        "Server initialized for {}, starting stdio transport...",
        config.portal.base_url
    );

    // Serve the MCP server over stdio
    let service = server.serve(stdio()).await.map_err(|e| {
        tracing::error!("Error starting server: {}", e);
        e
    })?;

    tracing::info!("{} running on stdio", config.server.name);

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("{} shutting down", config.server.name);

    Ok(())
}

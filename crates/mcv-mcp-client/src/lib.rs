//! # mcv-mcp-client
//!
//! HTTP client adapter for the MyCourseVille portal.
//!
//! This crate provides:
//! - `HttpTransport`: a cookie-authenticated `reqwest` client issuing single
//!   attempt GET/POST calls and mapping failures onto the core error taxonomy
//! - `McvClient`: the portal operations behind each MCP tool, combining the
//!   transport with the normalizers
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on mcv-mcp-core and
//! mcv-mcp-normalizer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod transport;

// Re-export commonly used types
pub use client::McvClient;
pub use transport::HttpTransport;

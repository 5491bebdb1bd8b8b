//! MCV MCP Server Library
//!
//! This library contains the tool registry and the MCP protocol layer.
//! The actual server binary is in main.rs.

pub mod protocol;
pub mod registry;
pub mod tools;

// Re-export commonly used types
pub use protocol::McvMcpServer;
pub use registry::{ToolRegistry, TOOL_NAMES};
pub use tools::*;

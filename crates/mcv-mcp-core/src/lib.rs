//! # mcv-mcp-core
//!
//! Core types for the MCV MCP Server.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other mcv-mcp crates. It provides:
//!
//! - Portal entities (Course, Assignment, Material, Announcement, AssignmentDetail)
//! - The immutable session context holding the portal cookie
//! - Academic term helpers (YearSemester)
//! - Server configuration
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other mcv-mcp crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod term;

// Re-export commonly used types
pub use config::{AssignmentSettings, AssignmentSource, PortalSettings, ServerConfig, ServerSettings};
pub use error::{Error, Result};
pub use model::{
    Announcement, Assignment, AssignmentDetail, Choice, Course, Material, MaterialContent,
    Question, QuestionKind, SessionState,
};
pub use session::SessionContext;
pub use term::YearSemester;

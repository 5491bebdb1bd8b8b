//! # mcv-mcp-normalizer
//!
//! Response normalizers for the MCV MCP Server.
//!
//! The portal has no public API: some endpoints answer JSON, most answer
//! server-rendered HTML. Each module here turns one of those shapes into the
//! stable entities of `mcv-mcp-core`:
//!
//! - `courses`: course list JSON
//! - `home`: home page (current term, login marker)
//! - `assignments`: assignment tables and "load more" pages
//! - `materials` / `material_content`: material listings and view pages
//! - `announcements`: announcement page
//! - `worksheet`: assignment worksheet with questions
//!
//! All functions are pure and never touch the network.
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends only on mcv-mcp-core.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod announcements;
pub mod assignments;
pub mod courses;
pub mod home;
mod html;
pub mod material_content;
pub mod materials;
pub mod worksheet;

// Re-export commonly used items
pub use announcements::parse_announcements;
pub use assignments::{
    parse_course_assignment_page, parse_course_assignment_rows, parse_global_assignment_rows,
    LoadMorePage, LoadMorePanel,
};
pub use courses::parse_course_list;
pub use home::{current_term, is_logged_in, is_login_page};
pub use material_content::parse_material_content;
pub use materials::{parse_course_materials, parse_material_page};
pub use worksheet::parse_worksheet;

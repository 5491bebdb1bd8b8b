//! Portal endpoint paths.
//!
//! The portal serves the same page under both `/courseville/...` and
//! `/?q=courseville/...`; each path below is the form the web UI itself uses.

/// Home page: session check and current term.
pub const HOME: &str = "/";

/// Course list for a term (form POST, JSON).
pub const COURSE_FILTER: &str = "/courseville/ajax/cvhomepanel_get_filter";

/// Paged assignment rows, global or per course (form POST, JSON).
pub const LOAD_MORE_ASSIGNMENTS: &str = "/?q=courseville/ajax/loadmoreassignmentrows";

/// Page size of the global assignment listing.
pub const GLOBAL_ASSIGNMENT_PAGE: u64 = 10;

/// Page size of a course assignment listing.
pub const COURSE_ASSIGNMENT_PAGE: u64 = 5;

/// Assignment page of a course.
pub fn course_assignments(cv_cid: u64) -> String {
    format!("/courseville/course/{cv_cid}/assignment")
}

/// Course home page, where material folders are listed.
pub fn course_home(cv_cid: u64) -> String {
    format!("/?q=courseville/course/{cv_cid}")
}

/// Dedicated material page of a course.
pub fn course_material_page(cv_cid: u64) -> String {
    format!("/?q=courseville/course/{cv_cid}/material")
}

/// View page of a single material.
pub fn material_view(cv_cid: u64, material_node_id: u64) -> String {
    format!("/?q=courseville/course/{cv_cid}/view_content_node_{material_node_id}_material")
}

/// Announcement page of a course.
pub fn course_announcements(cv_cid: u64) -> String {
    format!("/courseville/course/{cv_cid}/announcement")
}

/// Worksheet page of an assignment.
pub fn worksheet(cv_cid: u64, assignment_id: u64) -> String {
    format!("/?q=courseville/worksheet/{cv_cid}/{assignment_id}")
}

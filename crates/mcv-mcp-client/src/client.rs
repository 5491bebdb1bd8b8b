//! Portal operations.
//!
//! `McvClient` issues the requests behind each tool and hands the raw bodies
//! to the normalizers. It holds no mutable state: every call re-fetches.

use std::sync::Arc;
use tracing::{debug, info, warn};

use mcv_mcp_core::{
    Announcement, Assignment, AssignmentDetail, AssignmentSettings, AssignmentSource, Course,
    Error, Material, MaterialContent, Result, ServerConfig, SessionContext, SessionState,
    YearSemester,
};
use mcv_mcp_normalizer::{
    current_term, is_logged_in, parse_announcements, parse_course_assignment_page,
    parse_course_assignment_rows, parse_course_list, parse_course_materials,
    parse_global_assignment_rows, parse_material_content, parse_material_page, parse_worksheet,
    LoadMorePage,
};

use crate::endpoints;
use crate::transport::HttpTransport;

/// Client for the MyCourseVille portal.
#[derive(Debug, Clone)]
pub struct McvClient {
    transport: HttpTransport,
    assignments: AssignmentSettings,
}

impl McvClient {
    /// Create a client from the server configuration and a session.
    pub fn new(config: &ServerConfig, session: Arc<SessionContext>) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(&config.portal, session)?,
            assignments: config.assignments.clone(),
        })
    }

    /// The underlying transport.
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Assignment listing settings.
    pub fn assignment_settings(&self) -> &AssignmentSettings {
        &self.assignments
    }

    /// Fetch the home page to check whether the session cookie is accepted.
    ///
    /// A 401/403 answer, or a page without a logout link, means the session
    /// is no longer valid. Other failures are returned as errors.
    pub async fn validate_session(&self) -> Result<SessionState> {
        let valid = match self.transport.get_text(endpoints::HOME).await {
            Ok(html) => is_logged_in(&html),
            Err(Error::Authentication(_)) => false,
            Err(e) => return Err(e),
        };
        info!("Session valid: {}", valid);
        Ok(SessionState::from_validity(valid))
    }

    /// The term shown on the home page, or the term of today's date.
    pub async fn current_term(&self) -> Result<YearSemester> {
        let html = self.transport.get_text(endpoints::HOME).await?;
        Ok(current_term(&html).unwrap_or_else(|| {
            let term = YearSemester::current();
            debug!("No term on home page, falling back to {}", term);
            term
        }))
    }

    /// Courses enrolled in for a term.
    ///
    /// Missing year or semester values are taken from the current term.
    pub async fn get_courses(&self, year: Option<u32>, semester: Option<u8>) -> Result<Vec<Course>> {
        let term = match (year, semester) {
            (Some(year), Some(semester)) => YearSemester::new(year, semester)?,
            _ => {
                let current = self.current_term().await?;
                YearSemester::new(
                    year.unwrap_or(current.year),
                    semester.unwrap_or(current.semester),
                )?
            }
        };

        let form = [
            ("yearsem", term.to_string()),
            ("role", "student".to_string()),
            ("type", "course".to_string()),
        ];
        let json = self
            .transport
            .post_form_json(endpoints::COURSE_FILTER, &form)
            .await?;

        let courses = parse_course_list(&json, term)?;
        info!("Found {} courses for {}", courses.len(), term);
        Ok(courses)
    }

    /// Assignments across all courses, at most `limit` of them.
    ///
    /// `None` uses the configured default limit.
    pub async fn get_assignments(&self, limit: Option<u32>) -> Result<Vec<Assignment>> {
        let limit = limit.unwrap_or(self.assignments.default_limit) as usize;

        let mut assignments = match self.assignments.source {
            AssignmentSource::Combined => self.combined_assignments(limit).await?,
            AssignmentSource::PerCourse => self.per_course_assignments(limit).await?,
        };
        assignments.truncate(limit);

        info!("Returning {} assignments", assignments.len());
        Ok(assignments)
    }

    /// Page through the global assignment listing.
    async fn combined_assignments(&self, limit: usize) -> Result<Vec<Assignment>> {
        let mut assignments = Vec::new();
        let mut next = 0u64;

        while assignments.len() < limit {
            let form = [("next", next.to_string())];
            let json = self
                .transport
                .post_form_json(endpoints::LOAD_MORE_ASSIGNMENTS, &form)
                .await?;
            let page = LoadMorePage::from_json(&json)?;

            if page.status == 0 || page.html.trim().is_empty() {
                break;
            }

            let rows = parse_global_assignment_rows(&page.html);
            debug!("Assignment page at {}: {} rows", next, rows.len());
            if rows.is_empty() {
                break;
            }
            assignments.extend(rows);

            if page.all {
                break;
            }
            next += endpoints::GLOBAL_ASSIGNMENT_PAGE;
        }

        Ok(assignments)
    }

    /// Visit each current course in turn and collect its assignments.
    async fn per_course_assignments(&self, limit: usize) -> Result<Vec<Assignment>> {
        let courses = self.get_courses(None, None).await?;
        let mut assignments = Vec::new();

        for course in &courses {
            if assignments.len() >= limit {
                break;
            }
            let rows = self.get_course_assignments(course.cv_cid).await?;
            assignments.extend(rows.into_iter().map(|mut a| {
                if a.course_no.is_none() && !course.course_no.is_empty() {
                    a.course_no = Some(course.course_no.clone());
                }
                a
            }));
        }

        Ok(assignments)
    }

    /// All assignments of one course, following its "load more" panel.
    pub async fn get_course_assignments(&self, cv_cid: u64) -> Result<Vec<Assignment>> {
        let html = self
            .transport
            .get_text(&endpoints::course_assignments(cv_cid))
            .await?;
        let (mut assignments, panel) = parse_course_assignment_page(&html);

        if let Some(panel) = panel {
            let mut next = panel.next;
            while next < panel.total {
                let form = [("cv_cid", cv_cid.to_string()), ("next", next.to_string())];
                let json = self
                    .transport
                    .post_form_json(endpoints::LOAD_MORE_ASSIGNMENTS, &form)
                    .await?;
                let page = LoadMorePage::from_json(&json)?;
                if page.status != 1 {
                    warn!("Load-more for course {} stopped with status {}", cv_cid, page.status);
                    break;
                }

                let rows = parse_course_assignment_rows(&page.html);
                if rows.is_empty() {
                    debug!("Load-more for course {} returned no rows at {}", cv_cid, next);
                    break;
                }
                assignments.extend(rows);
                if page.all {
                    break;
                }
                next += endpoints::COURSE_ASSIGNMENT_PAGE;
            }
        }

        info!("Course {}: {} assignments", cv_cid, assignments.len());
        Ok(assignments)
    }

    /// Materials of a course, from the course page or the material page.
    pub async fn get_course_materials(&self, cv_cid: u64) -> Result<Vec<Material>> {
        let base = self.transport.base_url();

        let html = self.transport.get_text(&endpoints::course_home(cv_cid)).await?;
        let materials = parse_course_materials(&html, cv_cid, base);
        if !materials.is_empty() {
            return Ok(materials);
        }

        debug!("No materials on course page {}, trying material page", cv_cid);
        let html = self
            .transport
            .get_text(&endpoints::course_material_page(cv_cid))
            .await?;
        Ok(parse_material_page(&html, cv_cid, base))
    }

    /// Title and download link of one material.
    pub async fn get_material_content(
        &self,
        cv_cid: u64,
        material_node_id: u64,
    ) -> Result<MaterialContent> {
        let path = endpoints::material_view(cv_cid, material_node_id);
        let page_url = self.transport.url(&path)?;
        let html = self.transport.get_text(&path).await?;
        Ok(parse_material_content(
            &html,
            cv_cid,
            material_node_id,
            page_url.as_str(),
        ))
    }

    /// Announcements of a course.
    pub async fn get_announcements(&self, cv_cid: u64) -> Result<Vec<Announcement>> {
        let html = self
            .transport
            .get_text(&endpoints::course_announcements(cv_cid))
            .await?;
        Ok(parse_announcements(&html, cv_cid))
    }

    /// Questions and summary of an assignment worksheet.
    pub async fn get_assignment_detail(
        &self,
        cv_cid: u64,
        assignment_id: u64,
    ) -> Result<AssignmentDetail> {
        let html = self
            .transport
            .get_text(&endpoints::worksheet(cv_cid, assignment_id))
            .await?;
        Ok(parse_worksheet(&html, cv_cid, assignment_id))
    }
}

//! Assignment table normalizers.
//!
//! Assignments show up in three places:
//! - the global "load more" endpoint, whose row links end in `/{cv_cid}/{id}`,
//! - a course's assignment page (`#cv-assignment-table`),
//! - the per-course "load more" endpoint, returning bare `<tr>` rows.
//!
//! Course rows link to `/worksheet/{cv_cid}/{id}`.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use mcv_mcp_core::{Assignment, Error, Result};

use crate::html::{attr, first, inline_text, json_i64, parse_rows_fragment, selector, text_of};

lazy_static! {
    static ref GLOBAL_HREF: Regex = Regex::new(r"/([0-9]+)/([0-9]+)$").unwrap();
    static ref WORKSHEET_HREF: Regex = Regex::new(r"/worksheet/([0-9]+)/([0-9]+)").unwrap();
}

/// The "load more" panel on a course assignment page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadMorePanel {
    /// Total number of assignments in the course
    pub total: u64,
    /// Offset of the next page to request
    pub next: u64,
}

/// One page from `loadmoreassignmentrows`: `{"status", "all", "data": {"html"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadMorePage {
    /// Portal status flag (1 = ok, 0 = nothing more)
    pub status: i64,
    /// Whether this page was the last one
    pub all: bool,
    /// Table rows without the enclosing table
    pub html: String,
}

impl LoadMorePage {
    /// Read a load-more response body.
    pub fn from_json(json: &Value) -> Result<Self> {
        let Value::Object(map) = json else {
            return Err(Error::unexpected_format(
                200,
                "load-more response is not a JSON object",
                &json.to_string(),
            ));
        };

        Ok(Self {
            status: map.get("status").and_then(json_i64).unwrap_or(0),
            all: map.get("all").and_then(Value::as_bool).unwrap_or(false),
            html: map
                .get("data")
                .and_then(|d| d.get("html"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Optional columns found next to an assignment link.
#[derive(Default)]
struct RowExtras {
    course_no: Option<String>,
    due_date: Option<String>,
    status: Option<String>,
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Pick up course number, due date and status cells when a row carries them.
///
/// A `time[datetime]` attribute wins over a due cell's text so the portal's
/// own timestamp is kept untouched.
fn row_extras(row: ElementRef<'_>) -> RowExtras {
    let course_sel = selector("td[class*='course'], td[data-part='course']");
    let time_sel = selector("time[datetime]");
    let due_sel = selector("td[class*='due'], td[class*='deadline'], td[data-part='deadline']");
    let status_sel = selector("td[class*='status'], td[data-part='status']");

    let due_date = first(row, &time_sel)
        .map(|t| attr(t, "datetime").trim().to_string())
        .and_then(non_empty)
        .or_else(|| first(row, &due_sel).map(text_of).and_then(non_empty));

    RowExtras {
        course_no: first(row, &course_sel).map(inline_text).and_then(non_empty),
        due_date,
        status: first(row, &status_sel).map(inline_text).and_then(non_empty),
    }
}

fn rows_to_assignments<'a>(
    rows: impl Iterator<Item = ElementRef<'a>>,
    href_pattern: &Regex,
) -> Vec<Assignment> {
    let link_sel: Selector = selector("td:nth-child(2) a");

    rows.filter_map(|row| {
        let link = first(row, &link_sel)?;
        let caps = href_pattern.captures(attr(link, "href"))?;
        let extras = row_extras(row);
        Some(Assignment {
            mcv_course_id: caps[1].parse().ok()?,
            assignment_id: caps[2].parse().ok()?,
            assignment_name: inline_text(link),
            course_no: extras.course_no,
            due_date: extras.due_date,
            status: extras.status,
        })
    })
    .collect()
}

/// Rows from the global assignment list.
pub fn parse_global_assignment_rows(rows_html: &str) -> Vec<Assignment> {
    let fragment = parse_rows_fragment(rows_html);
    let row_sel = selector("tbody tr");
    rows_to_assignments(fragment.select(&row_sel), &GLOBAL_HREF)
}

/// Rows from a course's "load more" page.
pub fn parse_course_assignment_rows(rows_html: &str) -> Vec<Assignment> {
    let fragment = parse_rows_fragment(rows_html);
    let row_sel = selector("tr");
    rows_to_assignments(fragment.select(&row_sel), &WORKSHEET_HREF)
}

/// A course assignment page: the initial rows plus the load-more panel, if any.
pub fn parse_course_assignment_page(html: &str) -> (Vec<Assignment>, Option<LoadMorePanel>) {
    let document = Html::parse_document(html);

    let row_sel = selector("#cv-assignment-table tbody tr");
    let assignments = rows_to_assignments(document.select(&row_sel), &WORKSHEET_HREF);

    let panel_sel = selector("#courseville-assignment-list-loadmore-panel");
    let panel = document.select(&panel_sel).next().map(|panel| {
        let number = |name: &str| {
            panel
                .value()
                .attr(name)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0)
        };
        LoadMorePanel {
            total: number("data-total"),
            next: number("data-next"),
        }
    });

    (assignments, panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const GLOBAL_ROWS: &str = r#"
        <tr>
            <td class="course-no">2110101</td>
            <td><a href="https://www.mycourseville.com/?q=courseville/worksheet/34567/901234"> Lab 1:
                Variables </a></td>
            <td class="due"><time datetime="2024-09-01T23:59:00+07:00">1 Sep 2024</time></td>
            <td class="status">Submitted</td>
        </tr>
        <tr>
            <td></td>
            <td><a href="/courseville/course/34568/77">Homework</a></td>
        </tr>
        <tr><td></td><td><a href="/courseville/course/abc">Broken</a></td></tr>
    "#;

    #[test]
    fn test_global_rows() {
        let assignments = parse_global_assignment_rows(GLOBAL_ROWS);
        assert_eq!(assignments.len(), 2);

        assert_eq!(assignments[0].mcv_course_id, 34567);
        assert_eq!(assignments[0].assignment_id, 901234);
        assert_eq!(assignments[0].assignment_name, "Lab 1: Variables");
        assert_eq!(assignments[0].course_no.as_deref(), Some("2110101"));
        assert_eq!(
            assignments[0].due_date.as_deref(),
            Some("2024-09-01T23:59:00+07:00")
        );
        assert_eq!(assignments[0].status.as_deref(), Some("Submitted"));

        assert_eq!(assignments[1].mcv_course_id, 34568);
        assert_eq!(assignments[1].assignment_id, 77);
        assert_eq!(assignments[1].course_no, None);
        assert_eq!(assignments[1].due_date, None);
    }

    #[test]
    fn test_course_page_with_panel() {
        let html = r#"
            <table id="cv-assignment-table"><tbody>
                <tr><td>1</td><td><a href="/?q=courseville/worksheet/34567/11">Quiz 1</a></td>
                    <td class="deadline">Due 10 Sep 2024</td></tr>
                <tr><td>2</td><td><a href="/?q=courseville/worksheet/34567/12">Quiz 2</a></td></tr>
                <tr><td>3</td><td>No link</td></tr>
            </tbody></table>
            <div id="courseville-assignment-list-loadmore-panel" data-total="7" data-next="2"></div>
        "#;

        let (assignments, panel) = parse_course_assignment_page(html);
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].assignment_id, 11);
        assert_eq!(assignments[0].due_date.as_deref(), Some("Due 10 Sep 2024"));
        assert_eq!(assignments[1].assignment_name, "Quiz 2");
        assert_eq!(panel, Some(LoadMorePanel { total: 7, next: 2 }));
    }

    #[test]
    fn test_course_page_without_panel() {
        let (assignments, panel) = parse_course_assignment_page("<html><body></body></html>");
        assert!(assignments.is_empty());
        assert_eq!(panel, None);
    }

    #[test]
    fn test_course_rows_require_worksheet_links() {
        let rows = r#"
            <tr><td>3</td><td><a href="/?q=courseville/worksheet/34567/13">Quiz 3</a></td></tr>
            <tr><td>4</td><td><a href="/?q=courseville/course/34567/14">Not a worksheet</a></td></tr>
        "#;
        let assignments = parse_course_assignment_rows(rows);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].assignment_id, 13);
    }

    #[test]
    fn test_load_more_page() {
        let page = LoadMorePage::from_json(&json!({
            "status": 1,
            "all": true,
            "data": {"html": "<tr></tr>"}
        }))
        .unwrap();
        assert_eq!(page.status, 1);
        assert!(page.all);
        assert_eq!(page.html, "<tr></tr>");

        let empty = LoadMorePage::from_json(&json!({"status": "0"})).unwrap();
        assert_eq!(empty.status, 0);
        assert!(!empty.all);
        assert!(empty.html.is_empty());

        assert!(LoadMorePage::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_due_cell_text_kept_verbatim() {
        let rows = r#"<tr><td></td><td><a href="/?q=courseville/worksheet/1/2">Quiz</a></td>
            <td class="due">  15 Sep 2024  23:59  </td></tr>"#;
        let assignments = parse_course_assignment_rows(rows);
        assert_eq!(assignments[0].due_date.as_deref(), Some("15 Sep 2024  23:59"));
    }
}

//! Course list normalizer (`cvhomepanel_get_filter` JSON).

use serde::Deserialize;
use serde_json::Value;

use mcv_mcp_core::{Course, Error, Result, YearSemester};

use crate::html::{json_i64, json_string, json_u64};

/// Envelope of the course list endpoint: `{"status": 1, "data": [...]}`.
#[derive(Debug, Deserialize)]
struct CourseListResponse {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    data: Value,
}

/// One course as the portal sends it. Every field may be a string or a number.
#[derive(Debug, Deserialize)]
struct RawCourse {
    #[serde(default)]
    cv_cid: Value,
    #[serde(default)]
    course_no: Value,
    #[serde(default)]
    title: Value,
    #[serde(default)]
    year: Value,
    #[serde(default)]
    semester: Value,
}

impl RawCourse {
    fn into_course(self, term: YearSemester) -> Result<Course> {
        let cv_cid = json_u64(&self.cv_cid).ok_or_else(|| {
            Error::unexpected_format(
                200,
                "course entry without a numeric cv_cid",
                &self.cv_cid.to_string(),
            )
        })?;

        Ok(Course {
            cv_cid,
            course_no: json_string(&self.course_no).unwrap_or_default(),
            title: json_string(&self.title).unwrap_or_default(),
            year: json_u64(&self.year)
                .and_then(|y| u32::try_from(y).ok())
                .unwrap_or(term.year),
            semester: json_u64(&self.semester)
                .and_then(|s| u8::try_from(s).ok())
                .unwrap_or(term.semester),
        })
    }
}

/// Normalize the course list returned for `term`.
///
/// A response whose `status` is not 1, or that has no `data` array, means
/// "no courses" and yields an empty list. Year and semester fall back to the
/// requested term when an entry omits them.
pub fn parse_course_list(json: &Value, term: YearSemester) -> Result<Vec<Course>> {
    let response: CourseListResponse = serde_json::from_value(json.clone())
        .map_err(|e| Error::unexpected_format(200, format!("course list: {e}"), &json.to_string()))?;

    if json_i64(&response.status) != Some(1) {
        tracing::debug!("Course list status is {}, treating as empty", response.status);
        return Ok(Vec::new());
    }

    let Value::Array(entries) = response.data else {
        return Ok(Vec::new());
    };

    entries
        .into_iter()
        .map(|entry| {
            let raw: RawCourse = serde_json::from_value(entry.clone()).map_err(|e| {
                Error::unexpected_format(200, format!("course entry: {e}"), &entry.to_string())
            })?;
            raw.into_course(term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn term() -> YearSemester {
        YearSemester::new(2567, 1).unwrap()
    }

    #[test]
    fn test_parse_string_and_number_fields() {
        let json = json!({
            "status": 1,
            "data": [
                {"cv_cid": "34567", "course_no": "2110101", "title": "Computer Programming", "year": "2567", "semester": "1"},
                {"cv_cid": 34568, "course_no": 2301107, "title": "Calculus I", "year": 2567, "semester": 1}
            ]
        });

        let courses = parse_course_list(&json, term()).unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(
            courses[0],
            Course {
                cv_cid: 34567,
                course_no: "2110101".to_string(),
                title: "Computer Programming".to_string(),
                year: 2567,
                semester: 1,
            }
        );
        assert_eq!(courses[1].course_no, "2301107");
        assert_eq!(courses[1].cv_cid, 34568);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = json!({"status": "1", "data": [{"cv_cid": 7}]});
        let courses = parse_course_list(&json, term()).unwrap();
        assert_eq!(courses[0].course_no, "");
        assert_eq!(courses[0].title, "");
        assert_eq!(courses[0].year, 2567);
        assert_eq!(courses[0].semester, 1);
    }

    #[test]
    fn test_status_zero_is_empty() {
        let json = json!({"status": 0, "data": [{"cv_cid": 7}]});
        assert!(parse_course_list(&json, term()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_data_is_empty() {
        let json = json!({"status": 1});
        assert!(parse_course_list(&json, term()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_cv_cid_is_format_error() {
        let json = json!({"status": 1, "data": [{"title": "No id"}]});
        let err = parse_course_list(&json, term()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedFormat { .. }));
    }

    #[test]
    fn test_non_object_entry_is_format_error() {
        let json = json!({"status": 1, "data": ["oops"]});
        assert!(parse_course_list(&json, term()).is_err());
    }
}

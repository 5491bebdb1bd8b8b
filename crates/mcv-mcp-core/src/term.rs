//! Academic term (year + semester) helpers.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

lazy_static! {
    static ref YEARSEM_PATTERN: Regex = Regex::new(r"([0-9]{4})/([0-9])\b").unwrap();
}

/// An academic term as the portal keys it: `YEAR/SEMESTER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct YearSemester {
    /// Academic year
    pub year: u32,
    /// Semester number (1, 2, or 3 for summer)
    pub semester: u8,
}

impl YearSemester {
    /// Create a term, rejecting a zero year or a semester outside 1..=3.
    pub fn new(year: u32, semester: u8) -> Result<Self> {
        if year == 0 {
            return Err(Error::Validation("year must be a positive integer".to_string()));
        }
        if !(1..=3).contains(&semester) {
            return Err(Error::Validation(format!(
                "semester must be 1, 2, or 3, got {semester}"
            )));
        }
        Ok(Self { year, semester })
    }

    /// Best-effort term for a calendar date.
    ///
    /// August to December is semester 1, January to May semester 2, June and
    /// July the summer semester 3. The year is the calendar year of `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let semester = match date.month() {
            8..=12 => 1,
            1..=5 => 2,
            _ => 3,
        };
        Self {
            year: date.year().max(1) as u32,
            semester,
        }
    }

    /// Term for today's local date.
    pub fn current() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    /// Parse the first valid `YYYY/S` occurrence in `text`.
    ///
    /// Matches with a semester outside 1..=3 (dates such as `2024/05/01`,
    /// `2567/0`) are skipped.
    pub fn find_in(text: &str) -> Option<Self> {
        YEARSEM_PATTERN.captures_iter(text).find_map(|caps| {
            let year = caps[1].parse().ok()?;
            let semester = caps[2].parse().ok()?;
            Self::new(year, semester).ok()
        })
    }
}

impl fmt::Display for YearSemester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.semester)
    }
}

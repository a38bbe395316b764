//! Releases that came out on a given month/day across a range of years.
//!
//! A submission goes through [`input::resolve`], which validates the form and
//! produces a [`Lookup`] when fetching may proceed, and then through
//! [`aggregate::aggregate`], which runs one catalog search per year. Anything
//! worth telling the user along the way is collected as a [`Notice`].

pub mod aggregate;
pub mod input;

use thiserror::Error;

use crate::fetch::FetchError;

/// A validated request: search `month_day` in every year of
/// `start_year..=end_year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub month_day: String,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    /// The searched year, not necessarily the year in `date`
    pub year: i32,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

#[derive(Error, Debug)]
pub enum Notice {
    #[error("Invalid date. Please use the date picker.")]
    InvalidDate,
    #[error("Start/end year must be numbers.")]
    InvalidYears,
    #[error("Year range too large ({span} years). Showing only {start}–{end}. Try smaller chunks like 1990–2010, then 2011–{current_year}.")]
    SpanClamped {
        span: i64,
        start: i32,
        end: i32,
        current_year: i32,
    },
    #[error("{} for year {}: {}", fetch_kind(.source), .year, .source)]
    Fetch { year: i32, source: FetchError },
}

fn fetch_kind(err: &FetchError) -> &'static str {
    if err.is_status() {
        "HTTP error"
    } else {
        "Error"
    }
}

impl Notice {
    /// Validation failures that prevent any search from running.
    pub fn blocks_fetch(&self) -> bool {
        matches!(self, Notice::InvalidDate | Notice::InvalidYears)
    }
}

/// Joins notices into the single banner line shown above the results.
pub fn banner(notices: &[Notice]) -> Option<String> {
    if notices.is_empty() {
        return None;
    }
    Some(
        notices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | "),
    )
}

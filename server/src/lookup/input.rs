use base::setting::Range;
use base::util::{month_day, parse_iso_date, pretty_month_day};
use std::num::ParseIntError;
use time::Date;

use super::{Lookup, Notice};

#[derive(Debug)]
pub struct Resolution {
    /// Present only when the submission may be searched
    pub lookup: Option<Lookup>,
    /// Empty when the date did not parse
    pub pretty_date: String,
    pub start_year: i32,
    pub end_year: i32,
    pub notices: Vec<Notice>,
}

fn parse_year(input: &str, default: i32) -> Result<i32, ParseIntError> {
    match input.trim() {
        "" => Ok(default),
        s => s.parse(),
    }
}

fn parse_years(start: &str, end: &str, floor: i32, current: i32) -> Result<(i32, i32), ParseIntError> {
    let start = parse_year(start, floor)?;
    let end = parse_year(end, current)?;
    if end < start {
        Ok((end, start))
    } else {
        Ok((start, end))
    }
}

/// Validates the raw form fields. The returned years are always usable to
/// re-render the form, even when validation failed.
pub fn resolve(date: &str, start: &str, end: &str, range: &Range, today: Date) -> Resolution {
    let mut notices = Vec::new();
    let current_year = today.year();

    let (month_day, pretty_date) = match parse_iso_date(date.trim()) {
        Some(date) => (Some(month_day(date)), pretty_month_day(date)),
        None => {
            notices.push(Notice::InvalidDate);
            (None, String::new())
        }
    };

    let (start_year, mut end_year) =
        match parse_years(start, end, range.floor_year, current_year) {
            Ok(years) => years,
            Err(error) => {
                tracing::debug! {%start, %end, %error, "Could not parse year range"};
                notices.push(Notice::InvalidYears);
                (range.floor_year, current_year)
            }
        };

    let month_day = match month_day {
        Some(month_day) if !notices.iter().any(Notice::blocks_fetch) => month_day,
        _ => {
            return Resolution {
                lookup: None,
                pretty_date,
                start_year,
                end_year,
                notices,
            }
        }
    };

    let span = i64::from(end_year) - i64::from(start_year) + 1;
    let max_span = i64::from(range.max_span);
    if span > max_span {
        end_year = (i64::from(start_year) + max_span - 1).min(i64::from(current_year)) as i32;
        tracing::info! {span, start_year, end_year, "Clamped year range"};
        notices.push(Notice::SpanClamped {
            span,
            start: start_year,
            end: end_year,
            current_year,
        });
    }

    Resolution {
        lookup: Some(Lookup {
            month_day,
            start_year,
            end_year,
        }),
        pretty_date,
        start_year,
        end_year,
        notices,
    }
}

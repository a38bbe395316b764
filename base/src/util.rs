use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

const ISO_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const MONTH_DAY_FORMAT: &[FormatItem<'static>] = format_description!("[month]-[day]");
const PRETTY_FORMAT: &[FormatItem<'static>] = format_description!("[month repr:long] [day]");

/// Parses a date in the strict `YYYY-MM-DD` shape submitted by a date picker.
pub fn parse_iso_date(s: &str) -> Option<Date> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    let res = Date::parse(s, ISO_DATE_FORMAT);
    tracing::trace!(date = %s, ?res, "Parsed date");
    res.ok()
}

pub fn iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// The `MM-DD` part of a date, independent of its year.
pub fn month_day(date: Date) -> String {
    date.format(MONTH_DAY_FORMAT)
        .unwrap_or_else(|_| format!("{:02}-{:02}", u8::from(date.month()), date.day()))
}

/// Full month name and zero-padded day, e.g. `November 22`.
pub fn pretty_month_day(date: Date) -> String {
    date.format(PRETTY_FORMAT)
        .unwrap_or_else(|_| format!("{} {:02}", date.month(), date.day()))
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

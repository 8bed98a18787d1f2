//! Source-specific timestamp parsing.
//!
//! Every source hands its raw date string to [`parse_timestamp`] together with
//! the formats it is known to emit. Offset-aware values are converted to UTC
//! so records from different sources order by real instant; values without an
//! offset are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// One accepted timestamp layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Tue, 02 Jan 2024 10:00:00 GMT`, the RSS `pubDate` layout.
    Rfc2822,
    /// `2024-01-02T10:00:00Z`.
    Rfc3339,
    /// A `strftime` pattern that includes an offset (`%z`).
    WithOffset(&'static str),
    /// A `strftime` date-time pattern without offset.
    Naive(&'static str),
    /// A `strftime` date-only pattern; the time is midnight.
    NaiveDate(&'static str),
}

/// Formats seen in RSS and Atom feeds (`pubDate`, `published`, `dc:date`).
pub const FEED_DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc2822,
    DateFormat::Rfc3339,
    DateFormat::Naive("%Y-%m-%d %H:%M:%S"),
];

/// GNews `publishedAt`.
pub const GNEWS_DATE_FORMATS: &[DateFormat] = &[DateFormat::Rfc3339];

/// SerpApi `date` fields. Relative values such as `"2 hours ago"` match none
/// of these and stay unknown.
pub const SERPAPI_DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc3339,
    DateFormat::Rfc2822,
    DateFormat::WithOffset("%m/%d/%Y, %I:%M %p, %z"),
    DateFormat::NaiveDate("%b %d, %Y"),
    DateFormat::NaiveDate("%d/%m/%Y"),
    DateFormat::NaiveDate("%Y-%m-%d"),
];

/// HTML `<time datetime="...">` attributes on scraped pages.
pub const HTML_DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc3339,
    DateFormat::Naive("%Y-%m-%dT%H:%M:%S"),
    DateFormat::NaiveDate("%Y-%m-%d"),
];

/// Try each format in order and return the first successful parse.
///
/// Returns `None` for blank input or when no format matches.
#[must_use]
pub fn parse_timestamp(raw: &str, formats: &[DateFormat]) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    formats.iter().find_map(|format| parse_with(raw, *format))
}

fn parse_with(raw: &str, format: DateFormat) -> Option<DateTime<Utc>> {
    match format {
        DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        DateFormat::WithOffset(pattern) => DateTime::parse_from_str(raw, pattern)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        DateFormat::Naive(pattern) => NaiveDateTime::parse_from_str(raw, pattern)
            .ok()
            .map(|dt| dt.and_utc()),
        DateFormat::NaiveDate(pattern) => NaiveDate::parse_from_str(raw, pattern)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc()),
    }
}

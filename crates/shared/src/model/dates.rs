use chrono::{DateTime, NaiveDate, Utc};

/// The only format accepted when logging an exercise
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Weekday/month/day/year rendering used on every date sent to a client
pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Formats tried, in order, for the lenient `from`/`to` filter bounds
const FILTER_DATE_FORMATS: &[&str] = &[
    ENTRY_DATE_FORMAT,
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d %Y",
    "%B %d, %Y",
];

/// True when the input is exactly four digits, two digits and two digits
/// joined by literal hyphens
fn matches_entry_pattern(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Date an exercise is stored under. Absent input, input that doesn't
/// match the exact `YYYY-MM-DD` pattern, and pattern-valid input naming an
/// impossible calendar date (`2024-02-30`) all resolve to the current UTC
/// date at call time.
pub fn normalize_entry_date(raw: Option<&str>) -> NaiveDate {
    raw.filter(|r| matches_entry_pattern(r))
        .and_then(|r| NaiveDate::parse_from_str(r, ENTRY_DATE_FORMAT).ok())
        .unwrap_or_else(|| Utc::now().date_naive())
}

/// Lenient parser for log filter bounds. `None` means the bound imposes no
/// restriction rather than an error.
pub fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }

    FILTER_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

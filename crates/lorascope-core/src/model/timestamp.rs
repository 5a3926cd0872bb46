// ── Backend timestamp parsing ──
//
// The backend emits Python `isoformat()` strings: usually naive
// (`2025-03-01T10:00:00.123456`), sometimes with an offset. Naive values
// are read as UTC. Parsed values keep their offset so formatting shows
// the wall clock the backend sent.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp. Returns `None` for anything unrecognized;
/// callers fall back to showing the raw string.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Format `raw` with `fmt`, or return `raw` unchanged if it doesn't parse.
pub fn format_or_raw(raw: &str, fmt: &str) -> String {
    parse_timestamp(raw).map_or_else(|| raw.to_owned(), |dt| dt.format(fmt).to_string())
}

use super::{TimeParseError, TimeParser};
use crate::model::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-time layouts tried in order. `%.f` also accepts a missing fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Calendar-format parser.
///
/// Accepts ISO-like date-times, RFC 3339 (the stated wall time is kept, the
/// offset dropped) and bare dates, which resolve to midnight. Blank text
/// yields `Ok(None)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictParser;

impl TimeParser for StrictParser {
    fn parse(&self, text: &str) -> Result<Option<Timestamp>, TimeParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return Ok(Some(dt));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Some(dt.naive_local()));
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
                return Ok(Some(date.and_time(NaiveTime::MIN)));
            }
        }

        Err(TimeParseError::Unrecognized(text.to_string()))
    }
}

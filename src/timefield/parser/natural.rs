//! Natural-language time parsing.
//!
//! Understands, relative to a reference time:
//! - `now`
//! - Day words: `today`, `tomorrow`, `yesterday`
//! - Weekdays: `friday`, `this fri`, `next monday`, `last tuesday`
//! - Clock times: `15:30`, `15:30:10`, `3pm`, `3:30 pm`, `noon`, `midnight`
//! - Day and clock together: `tomorrow at 3pm`, `next friday 09:00`
//! - Offsets: `in 2 days`, `in an hour`, `3 weeks ago`
//!
//! A day without a clock time resolves to noon. Anything else falls through
//! to [`StrictParser`].

use super::{StrictParser, TimeParseError, TimeParser};
use crate::model::Timestamp;
use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const UNIT: &str = r"(?P<unit>minute|min|hour|hr|day|week|month|year)s?";
const COUNT: &str = r"(?P<count>\d+|an?|one)";
const DAY: &str = r"(?P<day>today|tomorrow|yesterday|(?:(?P<rel>next|last|this)\s+)?(?P<weekday>monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun))";
const CLOCK: &str = r"(?P<clock>noon|midnight|(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?(?::(?P<second>\d{2}))?\s*(?P<meridiem>am|pm)?)";

static OFFSET_AHEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^in\s+{COUNT}\s+{UNIT}$")).expect("offset pattern compiles")
});

static OFFSET_BEHIND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{COUNT}\s+{UNIT}\s+ago$")).expect("offset pattern compiles")
});

static DAY_AND_CLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:{DAY})?(?:\s*(?:at\s+)?{CLOCK})?$"))
        .expect("day/clock pattern compiles")
});

/// Where "now" comes from.
#[derive(Debug, Clone, Copy, Default)]
enum Reference {
    #[default]
    Clock,
    Fixed(Timestamp),
}

/// Parser for relative, human-typed times.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalParser {
    reference: Reference,
}

impl NaturalParser {
    /// Resolves relative phrases against the local wall clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative phrases against a fixed instant.
    pub fn at(reference: Timestamp) -> Self {
        Self {
            reference: Reference::Fixed(reference),
        }
    }

    fn now(&self) -> Timestamp {
        match self.reference {
            Reference::Clock => Local::now().naive_local(),
            Reference::Fixed(t) => t,
        }
    }

    fn parse_phrase(&self, phrase: &str) -> Result<Option<Timestamp>, TimeParseError> {
        let now = self.now();

        if phrase == "now" {
            return Ok(Some(now));
        }

        if let Some(caps) = OFFSET_AHEAD.captures(phrase) {
            return offset(now, &caps, true, phrase).map(Some);
        }
        if let Some(caps) = OFFSET_BEHIND.captures(phrase) {
            return offset(now, &caps, false, phrase).map(Some);
        }

        match DAY_AND_CLOCK.captures(phrase) {
            Some(caps) if caps.name("day").is_some() || caps.name("clock").is_some() => {
                let date = resolve_day(now.date(), &caps);
                let time = match caps.name("clock") {
                    Some(_) => resolve_clock(&caps, phrase)?,
                    None => NaiveTime::from_hms_opt(12, 0, 0)
                        .ok_or_else(|| TimeParseError::OutOfRange(phrase.to_string()))?,
                };
                Ok(Some(date.and_time(time)))
            }
            _ => Ok(None),
        }
    }
}

impl TimeParser for NaturalParser {
    fn parse(&self, text: &str) -> Result<Option<Timestamp>, TimeParseError> {
        let phrase = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if phrase.is_empty() {
            return Ok(None);
        }

        match self.parse_phrase(&phrase)? {
            Some(t) => Ok(Some(t)),
            None => StrictParser.parse(text),
        }
    }
}

fn offset(
    now: Timestamp,
    caps: &Captures<'_>,
    ahead: bool,
    phrase: &str,
) -> Result<Timestamp, TimeParseError> {
    let out_of_range = || TimeParseError::OutOfRange(phrase.to_string());

    let count: i64 = match &caps["count"] {
        "a" | "an" | "one" => 1,
        digits => digits.parse().map_err(|_| out_of_range())?,
    };

    let shifted = match &caps["unit"] {
        "minute" | "min" => shift(now, Duration::try_minutes(count), ahead),
        "hour" | "hr" => shift(now, Duration::try_hours(count), ahead),
        "day" => shift(now, Duration::try_days(count), ahead),
        "week" => shift(now, Duration::try_weeks(count), ahead),
        unit => {
            let months = if unit == "year" {
                count.checked_mul(12)
            } else {
                Some(count)
            };
            months
                .and_then(|m| u32::try_from(m).ok())
                .and_then(|m| {
                    if ahead {
                        now.checked_add_months(Months::new(m))
                    } else {
                        now.checked_sub_months(Months::new(m))
                    }
                })
        }
    };

    shifted.ok_or_else(out_of_range)
}

fn shift(now: Timestamp, delta: Option<Duration>, ahead: bool) -> Option<Timestamp> {
    let delta = delta?;
    if ahead {
        now.checked_add_signed(delta)
    } else {
        now.checked_sub_signed(delta)
    }
}

fn resolve_day(today: NaiveDate, caps: &Captures<'_>) -> NaiveDate {
    let Some(day) = caps.name("day") else {
        return today;
    };

    match day.as_str() {
        "today" => today,
        "tomorrow" => today.succ_opt().unwrap_or(today),
        "yesterday" => today.pred_opt().unwrap_or(today),
        _ => {
            let target = caps
                .name("weekday")
                .and_then(|w| weekday(w.as_str()))
                .unwrap_or(today.weekday());
            let current = today.weekday();
            let ahead = (7 + target.num_days_from_monday() as i64
                - current.num_days_from_monday() as i64)
                % 7;
            let days = match caps.name("rel").map(|r| r.as_str()) {
                Some("next") if ahead == 0 => 7,
                Some("last") if ahead == 0 => -7,
                Some("last") => ahead - 7,
                _ => ahead,
            };
            today
                .checked_add_signed(Duration::days(days))
                .unwrap_or(today)
        }
    }
}

fn weekday(name: &str) -> Option<Weekday> {
    match &name[..3] {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn resolve_clock(caps: &Captures<'_>, phrase: &str) -> Result<NaiveTime, TimeParseError> {
    let out_of_range = || TimeParseError::OutOfRange(phrase.to_string());

    match caps.name("clock").map(|c| c.as_str()) {
        Some("noon") => return NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(out_of_range),
        Some("midnight") => return Ok(NaiveTime::MIN),
        _ => {}
    }

    let field = |name: &str| -> Result<u32, TimeParseError> {
        caps.name(name)
            .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| out_of_range()))
    };
    let mut hour = field("hour")?;
    let minute = field("minute")?;
    let second = field("second")?;

    match caps.name("meridiem").map(|m| m.as_str()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return Err(out_of_range());
            }
            hour %= 12;
            if meridiem == "pm" {
                hour += 12;
            }
        }
        // A bare number ("tomorrow 9") is too ambiguous to be a clock time.
        None if caps.name("minute").is_none() => {
            return Err(TimeParseError::Unrecognized(phrase.to_string()));
        }
        None => {}
    }

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(out_of_range)
}

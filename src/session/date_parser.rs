//! Free-form date input.
//!
//! Accepts what people actually type when asked for a date: keywords,
//! relative day offsets, day and month without a year, full numeric dates in
//! either order, and "15 октября 2024" style text. Parsing is relative to a
//! caller-supplied `today` so results are deterministic.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;

use crate::error::{EngineError, EngineResult};

static OFFSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)(\d+)$").expect("OFFSET_REGEX should compile - this is a bug")
});

static DAY_MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[./-](\d{1,2})$").expect("DAY_MONTH_REGEX should compile - this is a bug")
});

static DAY_FIRST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([./-])(\d{1,2})([./-])(\d{4}|\d{2})$")
        .expect("DAY_FIRST_REGEX should compile - this is a bug")
});

static YEAR_FIRST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})([./-])(\d{1,2})([./-])(\d{1,2})$")
        .expect("YEAR_FIRST_REGEX should compile - this is a bug")
});

static MONTH_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+(\p{Cyrillic}+)\s+(\d{4})$")
        .expect("MONTH_NAME_REGEX should compile - this is a bug")
});

/// Genitive and nominative month names.
const MONTH_NAMES: [(&str, u32); 24] = [
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
    ("январь", 1),
    ("февраль", 2),
    ("март", 3),
    ("апрель", 4),
    ("май", 5),
    ("июнь", 6),
    ("июль", 7),
    ("август", 8),
    ("сентябрь", 9),
    ("октябрь", 10),
    ("ноябрь", 11),
    ("декабрь", 12),
];

/// Parses user-typed date text relative to `today`.
///
/// Returns `None` for anything unrecognised or for a calendar-invalid date
/// such as `31.02.2024`.
///
/// # Example
///
/// ```
/// use shift_ledger::session::parse_flexible_date;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
/// assert_eq!(parse_flexible_date("завтра", today), NaiveDate::from_ymd_opt(2024, 10, 16));
/// assert_eq!(parse_flexible_date("-3", today), NaiveDate::from_ymd_opt(2024, 10, 12));
/// assert_eq!(parse_flexible_date("01.03", today), NaiveDate::from_ymd_opt(2025, 3, 1));
/// assert_eq!(parse_flexible_date("5 ноября 2024", today), NaiveDate::from_ymd_opt(2024, 11, 5));
/// assert_eq!(parse_flexible_date("someday", today), None);
/// ```
pub fn parse_flexible_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = text.trim().to_lowercase();

    if let Some(date) = parse_keyword(&input, today) {
        return Some(date);
    }

    if let Some(caps) = OFFSET_REGEX.captures(&input) {
        let days = Days::new(caps[2].parse().ok()?);
        return if &caps[1] == "-" {
            today.checked_sub_days(days)
        } else {
            today.checked_add_days(days)
        };
    }

    if let Some(caps) = DAY_MONTH_REGEX.captures(&input) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        // A date already past this year means next year's occurrence
        let year = if (month, day) < (today.month(), today.day()) {
            today.year() + 1
        } else {
            today.year()
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DAY_FIRST_REGEX.captures(&input) {
        if caps[2] != caps[4] {
            return None;
        }
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[3].parse().ok()?;
        let year = parse_year(&caps[5])?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = YEAR_FIRST_REGEX.captures(&input) {
        if caps[2] != caps[4] {
            return None;
        }
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[3].parse().ok()?;
        let day: u32 = caps[5].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = MONTH_NAME_REGEX.captures(&input) {
        let day: u32 = caps[1].parse().ok()?;
        let month = MONTH_NAMES
            .iter()
            .find(|(name, _)| *name == &caps[2])
            .map(|(_, number)| *number)?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

fn parse_keyword(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input {
        "сегодня" | "today" => Some(today),
        "завтра" | "tomorrow" => today.checked_add_days(Days::new(1)),
        "послезавтра" => today.checked_add_days(Days::new(2)),
        "вчера" | "yesterday" => today.checked_sub_days(Days::new(1)),
        "позавчера" => today.checked_sub_days(Days::new(2)),
        _ => None,
    }
}

/// Four digits are taken as-is; two digits pivot at 69 (69-99 -> 1900s).
fn parse_year(digits: &str) -> Option<i32> {
    let value: i32 = digits.parse().ok()?;
    if digits.len() == 4 {
        Some(value)
    } else if value >= 69 {
        Some(1900 + value)
    } else {
        Some(2000 + value)
    }
}

/// Parses date text like [`parse_flexible_date`], failing with
/// [`EngineError::InvalidDate`] when the text is not understood.
pub fn resolve_date(text: &str, today: NaiveDate) -> EngineResult<NaiveDate> {
    parse_flexible_date(text, today).ok_or_else(|| EngineError::InvalidDate {
        input: text.to_string(),
    })
}

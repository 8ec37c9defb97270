//! Date and datetime text parsing.
//!
//! Formats are matched by shape first, then the captured parts are validated
//! as a calendar date. Ambiguous `a/b/yyyy` dates are tried day-first or
//! month-first according to the configured preference, falling back to the
//! other order when the preferred one is not a real date.

use super::Parsed;
use super::sanitizers::{clean_cell_text, is_missing_marker};
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `2020-01-15`, `2020/1/5`, `2020-01-15T10:30:00Z`, `2020-01-15 10:30`
static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?)?(?:Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("Invalid regex: ISO date")
});

/// `15/01/2020`, `1-5-20`, `15.01.2020 08:00`
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("Invalid regex: numeric date")
});

/// `15 Jan 2020`, `15-March-2020`
static DAY_MONTH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[\s-]+([A-Za-z]{3,9})\.?[\s,-]+(\d{4})$")
        .expect("Invalid regex: day month-name year")
});

/// `Jan 15, 2020`, `March 5 2020`
static MONTH_NAME_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})$")
        .expect("Invalid regex: month-name day year")
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse one text cell as a date or datetime.
pub(crate) fn parse_date_text(raw: &str, day_first: bool) -> Parsed<NaiveDateTime> {
    let text = clean_cell_text(raw);
    if is_missing_marker(&text) {
        return Parsed::Missing;
    }
    match parse_date_inner(&text, day_first) {
        Some(value) => Parsed::Value(value),
        None => Parsed::Unparsable,
    }
}

fn parse_date_inner(text: &str, day_first: bool) -> Option<NaiveDateTime> {
    if let Some(caps) = ISO_DATE.captures(text) {
        let year = number(&caps, 1)? as i32;
        let (month, day) = (number(&caps, 2)?, number(&caps, 3)?);
        return build(year, month, day, &caps, 4);
    }

    if let Some(caps) = NUMERIC_DATE.captures(text) {
        let (a, b) = (number(&caps, 1)?, number(&caps, 2)?);
        let year = expand_year(caps.get(3)?.as_str())?;
        let (preferred, other) = if day_first {
            ((b, a), (a, b))
        } else {
            ((a, b), (b, a))
        };
        return build(year, preferred.0, preferred.1, &caps, 4)
            .or_else(|| build(year, other.0, other.1, &caps, 4));
    }

    if let Some(caps) = DAY_MONTH_NAME.captures(text) {
        let day = number(&caps, 1)?;
        let month = month_from_name(caps.get(2)?.as_str())?;
        let year = number(&caps, 3)? as i32;
        return midnight(year, month, day);
    }

    if let Some(caps) = MONTH_NAME_DAY.captures(text) {
        let month = month_from_name(caps.get(1)?.as_str())?;
        let day = number(&caps, 2)?;
        let year = number(&caps, 3)? as i32;
        return midnight(year, month, day);
    }

    None
}

fn number(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Two-digit years pivot like strptime's `%y`: 00-68 are 20xx, 69-99 are 19xx.
fn expand_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;
    if text.len() == 2 {
        Some(if year < 69 { 2000 + year } else { 1900 + year })
    } else {
        Some(year)
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let prefix = lower.get(..3)?;
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

fn midnight(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Build from captured `(month, day)` plus optional time groups starting at `time_idx`.
fn build(
    year: i32,
    month: u32,
    day: u32,
    caps: &Captures<'_>,
    time_idx: usize,
) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let hour = caps
        .get(time_idx)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    let minute = caps
        .get(time_idx + 1)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    let second = caps
        .get(time_idx + 2)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    date.and_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(
            parse_date_text("2020-01-15", true),
            Parsed::Value(date(2020, 1, 15))
        );
        assert_eq!(
            parse_date_text("2020/1/5", true),
            Parsed::Value(date(2020, 1, 5))
        );
        let with_time = NaiveDate::from_ymd_opt(2020, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(
            parse_date_text("2020-01-15T10:30:00Z", true),
            Parsed::Value(with_time)
        );
        assert_eq!(
            parse_date_text("2020-01-15 10:30", true),
            Parsed::Value(with_time)
        );
    }

    #[test]
    fn test_day_first_preference() {
        assert_eq!(
            parse_date_text("01/02/2020", true),
            Parsed::Value(date(2020, 2, 1))
        );
        assert_eq!(
            parse_date_text("01/02/2020", false),
            Parsed::Value(date(2020, 1, 2))
        );
    }

    #[test]
    fn test_falls_back_to_other_order() {
        // 13 cannot be a month
        assert_eq!(
            parse_date_text("01/13/2020", true),
            Parsed::Value(date(2020, 1, 13))
        );
        assert_eq!(
            parse_date_text("13/01/2020", false),
            Parsed::Value(date(2020, 1, 13))
        );
    }

    #[test]
    fn test_dotted_and_two_digit_years() {
        assert_eq!(
            parse_date_text("15.03.2021", true),
            Parsed::Value(date(2021, 3, 15))
        );
        assert_eq!(
            parse_date_text("5/6/21", true),
            Parsed::Value(date(2021, 6, 5))
        );
        assert_eq!(
            parse_date_text("5/6/95", true),
            Parsed::Value(date(1995, 6, 5))
        );
    }

    #[test]
    fn test_month_names() {
        assert_eq!(
            parse_date_text("15 Jan 2020", true),
            Parsed::Value(date(2020, 1, 15))
        );
        assert_eq!(
            parse_date_text("March 5, 2020", true),
            Parsed::Value(date(2020, 3, 5))
        );
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_date_text("", true), Parsed::Missing);
        assert_eq!(parse_date_text("n/a", true), Parsed::Missing);
        assert_eq!(parse_date_text("2020-02-30", true), Parsed::Unparsable);
        assert_eq!(parse_date_text("hello", true), Parsed::Unparsable);
        assert_eq!(parse_date_text("12345", true), Parsed::Unparsable);
        assert_eq!(parse_date_text("32/13/2020", true), Parsed::Unparsable);
        assert_eq!(parse_date_text("15 Foo 2020", true), Parsed::Unparsable);
    }
}

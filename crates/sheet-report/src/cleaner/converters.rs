//! Numeric text parsing.
//!
//! Handles the formatting found in hand-maintained spreadsheets: currency
//! symbols and codes, thousands separators, decimal commas, accounting
//! negatives and percent signs.

use super::Parsed;
use super::sanitizers::{clean_cell_text, is_missing_marker};
use crate::types::{NumberValue, NumericUnit};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)$").expect("Invalid regex: number grammar")
});

static DOT_THOUSANDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{1,3}(?:\.\d{3})+$").expect("Invalid regex: dot thousands")
});

static COMMA_THOUSANDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{1,3}(?:,\d{3})+(?:\.\d*)?$").expect("Invalid regex: comma thousands")
});

static DECIMAL_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d*,\d{1,2}$").expect("Invalid regex: decimal comma"));

const CURRENCY_SYMBOLS: [char; 6] = ['₪', '$', '€', '£', '¥', '₹'];

const CURRENCY_CODES: [(&str, char); 5] = [
    ("nis", '₪'),
    ("ils", '₪'),
    ("usd", '$'),
    ("eur", '€'),
    ("gbp", '£'),
];

/// Characters used to group digits besides the comma.
const GROUP_SEPARATORS: [char; 6] = [' ', '\u{00A0}', '\u{202F}', '\u{2009}', '\'', '\u{2019}'];

/// Parse one text cell as a number.
///
/// `decimal_comma` lets a lone comma followed by one or two digits act as
/// the decimal point (`"12,5"` is `12.5`); three digits after a comma always
/// mean thousands.
pub(crate) fn parse_number_text(raw: &str, decimal_comma: bool) -> Parsed<NumberValue> {
    let text = clean_cell_text(raw);
    if is_missing_marker(&text) {
        return Parsed::Missing;
    }
    match parse_number_inner(&text, decimal_comma) {
        Some(value) => Parsed::Value(value),
        None => Parsed::Unparsable,
    }
}

/// Accept a number that arrived already typed.
pub(crate) fn accept_number(value: f64) -> Parsed<NumberValue> {
    if value.is_nan() {
        Parsed::Missing
    } else if value.is_finite() {
        Parsed::Value(NumberValue::plain(value))
    } else {
        Parsed::Unparsable
    }
}

fn parse_number_inner(text: &str, decimal_comma: bool) -> Option<NumberValue> {
    let (mut s, mut currency) = strip_currency(text)?;

    let mut negative = false;
    if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        let inner = s[1..s.len() - 1].trim().to_string();
        let (inner, inner_currency) = strip_currency(&inner)?;
        if currency.is_some() && inner_currency.is_some() {
            return None;
        }
        currency = currency.or(inner_currency);
        if inner.starts_with('-') || inner.starts_with('+') {
            return None;
        }
        s = inner;
        negative = true;
    }

    let mut percent = false;
    if let Some(rest) = s.strip_suffix('%') {
        s = rest.trim_end().to_string();
        percent = true;
    }

    if let Some(rest) = s.strip_prefix('+') {
        if negative {
            return None;
        }
        s = rest.trim_start().to_string();
    }

    let s = normalize_separators(&s, decimal_comma)?;
    if !NUMBER_GRAMMAR.is_match(&s) {
        return None;
    }

    let mut value: f64 = s.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    if negative {
        value = -value;
    }

    let unit = if percent {
        value /= 100.0;
        NumericUnit::Percent
    } else if let Some(symbol) = currency {
        NumericUnit::Currency(symbol)
    } else {
        NumericUnit::Plain
    };

    Some(NumberValue { value, unit })
}

/// Remove at most one currency marker. Returns `None` when several are present.
fn strip_currency(text: &str) -> Option<(String, Option<char>)> {
    let mut found: Option<char> = None;
    let mut rest = String::with_capacity(text.len());
    for ch in text.chars() {
        if CURRENCY_SYMBOLS.contains(&ch) {
            if found.is_some() {
                return None;
            }
            found = Some(ch);
        } else {
            rest.push(ch);
        }
    }
    let mut rest = rest.trim().to_string();

    for (code, symbol) in CURRENCY_CODES {
        let as_prefix = rest
            .get(..code.len())
            .filter(|p| p.eq_ignore_ascii_case(code))
            .and_then(|_| rest.get(code.len()..));
        let as_suffix = rest
            .len()
            .checked_sub(code.len())
            .filter(|&i| rest.get(i..).is_some_and(|p| p.eq_ignore_ascii_case(code)))
            .and_then(|i| rest.get(..i));
        if let Some(stripped) = as_prefix.or(as_suffix).map(|r| r.trim().to_string()) {
            if found.is_some() {
                return None;
            }
            found = Some(symbol);
            rest = stripped;
            break;
        }
    }

    Some((rest, found))
}

/// Drop grouping characters and settle which of `,` and `.` is the decimal point.
fn normalize_separators(text: &str, decimal_comma: bool) -> Option<String> {
    let s: String = text
        .chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .collect();

    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');

    match (last_comma, last_dot) {
        (None, None) => Some(s),
        (Some(comma), Some(dot)) if dot > comma => {
            if COMMA_THOUSANDS.is_match(&s) {
                Some(s.replace(',', ""))
            } else {
                None
            }
        }
        (Some(_), Some(_)) => {
            // European style: 1.234,56
            let (int_part, frac_part) = s.rsplit_once(',')?;
            if !DOT_THOUSANDS.is_match(int_part) && int_part.contains('.') {
                return None;
            }
            Some(format!("{}.{}", int_part.replace('.', ""), frac_part))
        }
        (Some(_), None) => {
            if decimal_comma && DECIMAL_COMMA.is_match(&s) {
                Some(s.replace(',', "."))
            } else if COMMA_THOUSANDS.is_match(&s) {
                Some(s.replace(',', ""))
            } else {
                None
            }
        }
        (None, Some(_)) => {
            if s.matches('.').count() == 1 {
                Some(s)
            } else if DOT_THOUSANDS.is_match(&s) {
                Some(s.replace('.', ""))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> NumberValue {
        match parse_number_text(text, true) {
            Parsed::Value(v) => v,
            other => panic!("{text:?} did not parse: {other:?}"),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_currency_with_thousands() {
        let v = value("₪8,500");
        assert!(approx(v.value, 8500.0));
        assert_eq!(v.unit, NumericUnit::Currency('₪'));
    }

    #[test]
    fn test_accounting_negative() {
        assert!(approx(value("(500)").value, -500.0));
        assert!(approx(value("(₪1,200)").value, -1200.0));
    }

    #[test]
    fn test_explicit_plus_and_decimals() {
        assert!(approx(value("+2,500.75").value, 2500.75));
    }

    #[test]
    fn test_percent_is_fraction() {
        let v = value("15%");
        assert!(approx(v.value, 0.15));
        assert_eq!(v.unit, NumericUnit::Percent);
        assert!(approx(v.display_value(), 15.0));
    }

    #[test]
    fn test_space_thousands_with_decimal_comma() {
        assert!(approx(value("1 000,5").value, 1000.5));
        assert!(approx(value("1\u{00A0}234").value, 1234.0));
        assert!(approx(value("1'234'567").value, 1234567.0));
    }

    #[test]
    fn test_european_format() {
        assert!(approx(value("1.234,56").value, 1234.56));
        assert!(approx(value("1.234.567").value, 1234567.0));
    }

    #[test]
    fn test_decimal_comma_disabled() {
        assert_eq!(parse_number_text("12,5", false), Parsed::Unparsable);
        match parse_number_text("12,500", false) {
            Parsed::Value(v) => assert!(approx(v.value, 12500.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_currency_codes() {
        let v = value("500 NIS");
        assert!(approx(v.value, 500.0));
        assert_eq!(v.unit, NumericUnit::Currency('₪'));
        assert_eq!(value("usd 20").unit, NumericUnit::Currency('$'));
        assert!(approx(value("-$75").value, -75.0));
    }

    #[test]
    fn test_missing_and_unparsable() {
        assert_eq!(parse_number_text("", true), Parsed::Missing);
        assert_eq!(parse_number_text(" N/A ", true), Parsed::Missing);
        assert_eq!(parse_number_text("abc", true), Parsed::Unparsable);
        assert_eq!(parse_number_text("12abc", true), Parsed::Unparsable);
        assert_eq!(parse_number_text("$", true), Parsed::Unparsable);
        assert_eq!(parse_number_text("(-5)", true), Parsed::Unparsable);
        assert_eq!(parse_number_text("1.2.3", true), Parsed::Unparsable);
        assert_eq!(parse_number_text("$5€", true), Parsed::Unparsable);
    }

    #[test]
    fn test_overflow_is_unparsable() {
        let huge = "9".repeat(400);
        assert_eq!(parse_number_text(&huge, true), Parsed::Unparsable);
    }

    #[test]
    fn test_accept_number() {
        assert_eq!(accept_number(f64::NAN), Parsed::Missing);
        assert_eq!(accept_number(f64::INFINITY), Parsed::Unparsable);
        assert_eq!(accept_number(2.0), Parsed::Value(NumberValue::plain(2.0)));
    }
}

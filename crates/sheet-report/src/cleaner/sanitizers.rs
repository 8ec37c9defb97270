//! Text sanitization shared by the value parsers and header normalization.

use std::collections::HashMap;

/// Cell texts that mean "no value", compared case-insensitively after trimming.
pub const MISSING_MARKERS: [&str; 9] = ["", "n/a", "na", "-", "—", "null", "none", "nan", "#n/a"];

/// Directional formatting marks that spreadsheet exports wrap Hebrew text in.
const BIDI_MARKS: [char; 12] = [
    '\u{200E}', '\u{200F}', '\u{202A}', '\u{202B}', '\u{202C}', '\u{202D}', '\u{202E}',
    '\u{2066}', '\u{2067}', '\u{2068}', '\u{2069}', '\u{061C}',
];

pub(crate) fn strip_bidi_marks(value: &str) -> String {
    value.chars().filter(|c| !BIDI_MARKS.contains(c)).collect()
}

/// Trim whitespace and bidi marks, then peel off wrapping quotes.
pub(crate) fn clean_cell_text(value: &str) -> String {
    let mut cleaned = strip_bidi_marks(value).trim().to_string();

    // Nested quoting like """x""" comes out of some exporters
    for _ in 0..3 {
        let quoted = (cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\''));
        if !quoted || cleaned.chars().count() < 2 {
            break;
        }
        let inner: String = {
            let mut chars = cleaned.chars();
            chars.next();
            chars.next_back();
            chars.collect()
        };
        cleaned = inner.trim().to_string();
    }
    cleaned
}

/// Check whether already-cleaned text is a missing-value marker.
pub fn is_missing_marker(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

/// Turn a header into a stable identifier.
///
/// Letters and digits of any script survive, everything else becomes
/// `_`. Runs of `_` collapse and edges are trimmed. Case is kept. Hebrew
/// headers therefore keep their letters: `"שם מלא"` becomes `"שם_מלא"`.
pub fn normalize_column_name(header: &str) -> String {
    let stripped = strip_bidi_marks(header);
    let mut out = String::with_capacity(stripped.len());
    let mut last_was_sep = false;

    for ch in stripped.trim().chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "column".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize every header and suffix repeats with `_2`, `_3`, ...
pub fn unique_identifiers<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::new();

    for header in headers {
        let base = normalize_column_name(header);
        let mut candidate = base.clone();
        let mut n = seen.get(&base).copied().unwrap_or(0);
        while seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{}_{}", base, n + 1);
        }
        seen.insert(base.clone(), n);
        seen.insert(candidate.clone(), 0);
        result.push(candidate);
    }

    result
}

/// Header as shown in report text: bidi marks removed, whitespace trimmed.
pub fn display_name(header: &str) -> String {
    let cleaned = strip_bidi_marks(header).trim().to_string();
    if cleaned.is_empty() {
        "column".to_string()
    } else {
        cleaned
    }
}

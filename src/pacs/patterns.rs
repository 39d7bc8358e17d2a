use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Full five-level PACS codes as they appear in preprint listings: 42.50.Gy, 03.67.-a, 98.80.+k
    pub static ref PACS_REGEX: Regex = Regex::new(
        r"[0-9]{2}\.[0-9]{2}\.[a-zA-Z\-\+][a-zA-Z\-]"
    ).unwrap();
}

/// Every PACS code mentioned in `text`, de-duplicated, in first-seen order
pub fn extract_pacs_codes(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PACS_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|code| seen.insert(*code))
        .map(str::to_string)
        .collect()
}

/// Depth of a code in the PACS hierarchy, 1 (broadest) to 5.
///
/// * `40.` or `40.00.00`: a section ending in zero is level 1
/// * `42.`: a bare section is level 2
/// * `42.50.+p`, `03.67.-a`: third segment starting with a sign is level 3
/// * `42.50.Gy`: uppercase third segment is level 4
/// * `42.50.gy`: anything else is level 5
///
/// Returns `None` for strings that are not shaped like a code.
pub fn pacs_level(code: &str) -> Option<u8> {
    let mut segments = code.split('.');
    let section = segments.next()?;
    if section.len() != 2 || !section.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if section.ends_with('0') {
        return Some(1);
    }

    let third = match (segments.next(), segments.next()) {
        (Some(_), None) | (None, _) => return Some(2),
        (Some(_), Some("")) => return Some(2),
        (Some(_), Some(third)) => third,
    };

    let first = third.chars().next()?;
    if first == '+' || first == '-' {
        Some(3)
    } else if first.is_uppercase() {
        Some(4)
    } else {
        Some(5)
    }
}

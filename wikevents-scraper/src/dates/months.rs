//! Month-name table shared by the cleanup rewrites and the pattern cascade.

use regex::Regex;

pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Regex fragment matching full and three-letter month names (lowercase).
pub const MONTH_PATTERN: &str = "jan|january|feb|february|mar|march|apr|april|may|jun|june|jul|july|aug|august|sep|september|oct|october|nov|november|dec|december";

/// Builds a regex with every `{m}` placeholder expanded to the month
/// alternation.
pub fn month_regex(pattern: &str) -> Regex {
    Regex::new(&pattern.replace("{m}", MONTH_PATTERN)).unwrap()
}

/// Maps a (possibly abbreviated) lowercase month name to its 1-based number.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|full| full.starts_with(name))
        .map(|index| index as u32 + 1)
}

/// 1-based month number back to its lowercase name.
pub fn month_name(number: u32) -> Option<&'static str> {
    MONTH_NAMES.get(number.checked_sub(1)? as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_resolve_by_prefix() {
        assert_eq!(month_number("jan"), Some(1));
        assert_eq!(month_number("sep"), Some(9));
        assert_eq!(month_number("september"), Some(9));
        assert_eq!(month_number("smarch"), None);
    }

    #[test]
    fn numbers_round_trip() {
        assert_eq!(month_name(7), Some("july"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}

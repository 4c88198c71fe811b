//! Handles `{{age ...}}` family templates, which carry the event dates as
//! template arguments rather than as prose.

use chrono::{Datelike, NaiveDate};
use wikevents_core::domain::{NormalizedDate, Precision};

use super::DateError;

/// Parses one age template, e.g. `{{age|1881|7|2}}` or
/// `{{age in years|2001-9-11|2001-10-7}}`. The surrounding text has already
/// been scrubbed, so `tag` is exactly the template.
pub(crate) fn parse_age(tag: &str, ongoing: bool) -> Result<NormalizedDate, DateError> {
    let inner = tag.trim_start_matches("{{").trim_end_matches("}}");

    let components: Vec<Vec<&str>> = inner
        .split('|')
        .skip(1)
        .map(|part| part.split('=').map(str::trim).collect())
        .collect();

    // Two bare values means a pair of ISO dates.
    if components.len() == 2 && components[0].len() == 1 && components[1].len() == 1 {
        let first = parse_iso(components[0][0], tag)?;
        let second = parse_iso(components[1][0], tag)?;
        return Ok(NormalizedDate {
            year1: first.year(),
            month1: Some(first.month()),
            day1: Some(first.day()),
            precision1: Precision::Day,
            year2: Some(second.year()),
            month2: Some(second.month()),
            day2: Some(second.day()),
            precision2: Some(Precision::Day),
            ongoing,
        });
    }

    // Otherwise arguments are either keyed or positional in the order
    // year1, month1, day1, year2, month2, day2.
    const POSITIONAL_KEYS: [&str; 6] = ["year1", "month1", "day1", "year2", "month2", "day2"];

    let mut fields: [Option<i32>; 6] = [None; 6];
    for (index, component) in components.iter().enumerate() {
        let (key, value) = match component.as_slice() {
            [value] if value.chars().all(|c| c.is_ascii_digit()) && !value.is_empty() => {
                match POSITIONAL_KEYS.get(index) {
                    Some(key) => (*key, leading_int(value)),
                    None => continue,
                }
            }
            [key, value] => (*key, leading_int(value)),
            _ => continue,
        };
        let Some(value) = value else { continue };

        // Bare "year"/"month"/"day" keys mean the first date.
        let slot = match key {
            "year" | "year1" => 0,
            "month" | "month1" => 1,
            "day" | "day1" => 2,
            "year2" => 3,
            "month2" => 4,
            "day2" => 5,
            _ => continue,
        };
        fields[slot] = Some(value);
    }

    let [year1, month1, day1, year2, month2, day2] = fields;
    let Some(year1) = year1 else {
        return Err(DateError::Unparsed {
            cleaned: tag.to_string(),
        });
    };

    let (year2, month2, day2, precision2) = match year2 {
        Some(year2) => (
            Some(year2),
            month2.map(|m| m as u32),
            day2.map(|d| d as u32),
            Some(side_precision(month2, day2)),
        ),
        None => (None, None, None, None),
    };

    Ok(NormalizedDate {
        year1,
        month1: month1.map(|m| m as u32),
        day1: day1.map(|d| d as u32),
        precision1: side_precision(month1, day1),
        year2,
        month2,
        day2,
        precision2,
        ongoing,
    })
}

fn side_precision(month: Option<i32>, day: Option<i32>) -> Precision {
    if day.is_some() {
        Precision::Day
    } else if month.is_some() {
        Precision::Month
    } else {
        Precision::Year
    }
}

fn parse_iso(value: &str, tag: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| DateError::Unparsed {
        cleaned: tag.to_string(),
    })
}

/// Integer prefix of a value, tolerating trailing junk.
fn leading_int(value: &str) -> Option<i32> {
    let digits: String = value
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

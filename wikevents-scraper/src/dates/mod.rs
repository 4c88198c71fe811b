//! Date normalization: raw infobox date strings to structured dates.
//!
//! The path is fixed: cleanup rewrites, then an age-template shortcut, then
//! the anchored pattern cascade, then a month/day sanity fixup and a
//! calendar check. Strings that survive none of it come back as
//! [`DateError::Unparsed`] carrying the cleaned text for diagnostics.

mod age;
mod cleanup;
mod months;
mod patterns;
mod validate;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use wikevents_core::domain::NormalizedDate;

use months::month_regex;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DateError {
    /// No pattern matched; `cleaned` is the string as it looked after all
    /// cleanup rewrites.
    #[error("no date pattern matched {cleaned:?}")]
    Unparsed { cleaned: String },
    /// Matched a pattern but names a day that does not exist.
    #[error("date does not exist on the calendar")]
    InvalidCalendar { date: NormalizedDate },
}

static AGE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{age.*?\}\}").unwrap());
static AND_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\band\b").unwrap());
static FOUR_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

static PARTIAL_DAY_MONTH: Lazy<Regex> = Lazy::new(|| month_regex(r"^(?:\d{1,2}-)?\d{1,2} ({m})$"));
static PARTIAL_DAY_MONTH_RANGE: Lazy<Regex> =
    Lazy::new(|| month_regex(r"^\d{1,2} ({m})-\d{1,2} ({m})$"));
static PARTIAL_MONTH_DAY_RANGE: Lazy<Regex> =
    Lazy::new(|| month_regex(r"^({m}) \d{1,2}-({m}) \d{1,2}$"));
static PARTIAL_MONTH_DAY: Lazy<Regex> = Lazy::new(|| month_regex(r"^({m}) \d{1,2}$"));

/// Normalizes one raw date string. `title` supplies a year for partial
/// day-month dates on pages like "Gymnastics at the 2014 Asian Games";
/// `context_year` does the same when the infobox carried a separate year
/// field. When nothing matches, one retry rewrites the word "and" to a
/// range dash.
pub fn normalize(
    raw: &str,
    title: &str,
    context_year: Option<i32>,
) -> Result<NormalizedDate, DateError> {
    match normalize_once(raw, title, context_year) {
        Err(DateError::Unparsed { cleaned }) => {
            let retried = AND_WORD.replace_all(raw, "-");
            if retried != raw {
                normalize_once(&retried, title, context_year)
            } else {
                Err(DateError::Unparsed { cleaned })
            }
        }
        result => result,
    }
}

fn normalize_once(
    raw: &str,
    title: &str,
    context_year: Option<i32>,
) -> Result<NormalizedDate, DateError> {
    let scrubbed = cleanup::scrub(raw);

    if let Some(tag) = AGE_TAG.find(&scrubbed.text) {
        let date = fixup(age::parse_age(tag.as_str(), scrubbed.ongoing)?);
        return check_calendar(date);
    }

    let text = cleanup::rewrite(&scrubbed.text);
    let text = backfill_year(text, title, context_year);

    match patterns::match_cascade(&text, scrubbed.ongoing) {
        Some(date) => check_calendar(fixup(date)),
        None => Err(DateError::Unparsed { cleaned: text }),
    }
}

/// Completes partial day-month dates with a year taken from the page title
/// or from the event's own year field.
fn backfill_year(text: String, title: &str, context_year: Option<i32>) -> String {
    let title_year = || FOUR_DIGIT_YEAR.find(title).map(|m| m.as_str());

    if PARTIAL_DAY_MONTH.is_match(&text)
        || PARTIAL_DAY_MONTH_RANGE.is_match(&text)
        || PARTIAL_MONTH_DAY_RANGE.is_match(&text)
    {
        if let Some(year) = title_year() {
            return format!("{} {}", text, year);
        }
    }

    if PARTIAL_MONTH_DAY.is_match(&text) {
        if let Some(year) = context_year {
            return format!("{} {}", text, year);
        }
    }

    text
}

/// An impossible month with a day present means the two were written in the
/// wrong order.
fn fixup(mut date: NormalizedDate) -> NormalizedDate {
    if let (Some(month), Some(day)) = (date.month1, date.day1) {
        if month > 12 {
            date.month1 = Some(day);
            date.day1 = Some(month);
        }
    }
    if let (Some(month), Some(day)) = (date.month2, date.day2) {
        if month > 12 {
            date.month2 = Some(day);
            date.day2 = Some(month);
        }
    }
    date
}

fn check_calendar(date: NormalizedDate) -> Result<NormalizedDate, DateError> {
    if validate::plausible(&date) {
        Ok(date)
    } else {
        Err(DateError::InvalidCalendar { date })
    }
}

//! Calendar plausibility checks on a structured date.

use chrono::NaiveDate;
use wikevents_core::domain::NormalizedDate;

/// True when every fully-specified side names a real proleptic Gregorian
/// day. Partial dates (month or coarser) are accepted as-is.
pub(crate) fn plausible(date: &NormalizedDate) -> bool {
    side_plausible(date.year1, date.month1, date.day1)
        && date
            .year2
            .map_or(true, |year2| side_plausible(year2, date.month2, date.day2))
}

fn side_plausible(year: i32, month: Option<u32>, day: Option<u32>) -> bool {
    match (month, day) {
        (Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day).is_some(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikevents_core::domain::Precision;

    fn day_date(year: i32, month: u32, day: u32) -> NormalizedDate {
        NormalizedDate {
            year1: year,
            month1: Some(month),
            day1: Some(day),
            precision1: Precision::Day,
            ..Default::default()
        }
    }

    #[test]
    fn leap_day_rules() {
        assert!(plausible(&day_date(2020, 2, 29)));
        assert!(!plausible(&day_date(1900, 2, 29)));
        assert!(!plausible(&day_date(2000, 2, 30)));
    }

    #[test]
    fn partial_dates_always_pass() {
        let date = NormalizedDate {
            year1: 1881,
            month1: Some(13),
            precision1: Precision::Month,
            ..Default::default()
        };
        // No day component, so the impossible month is not checked here.
        assert!(plausible(&date));
    }

    #[test]
    fn second_side_is_checked_when_fully_specified() {
        let mut date = day_date(1914, 7, 28);
        date.year2 = Some(1918);
        date.month2 = Some(11);
        date.day2 = Some(31);
        date.precision2 = Some(Precision::Day);
        assert!(!plausible(&date));
    }
}

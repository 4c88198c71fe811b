//! Anchored pattern cascade that turns a cleaned date string into a
//! structured date. Patterns are tried in a fixed order; the first full
//! match wins, so more specific shapes sit above the shapes they overlap.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use wikevents_core::domain::{NormalizedDate, Precision};

use super::months::{month_number, month_regex};

macro_rules! date_pattern {
    ($name:ident, $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| month_regex($pattern));
    };
}

date_pattern!(YMD, r"^(-?\d+)-(\d{1,2})-(\d{1,2})$");
date_pattern!(DMY_TO_Y, r"^(\d{1,2}) ({m}) *(-?\d+) *- *(-?\d+)$");
date_pattern!(DMY_TO_MY, r"^(\d{1,2}) ({m}),? (-?\d+) *- *({m}),? (-?\d+)$");
date_pattern!(
    DMY_TO_DMY,
    r"^(\d{1,2}) ({m}),? (-?\d+) *- *(\d{1,2}) ({m}),? (-?\d+)$"
);
date_pattern!(DM_TO_DMY, r"^(\d{1,2}) ({m}) *- *(\d{1,2}) ({m}),? (-?\d+)$");
date_pattern!(D_TO_DMY, r"^(\d{1,2}) *- *(\d{1,2}) ({m}),? (-?\d+)$");
date_pattern!(DMY, r"^(\d{1,2}) ({m}),? (-?\d+)$");
date_pattern!(MDY, r"^({m}) (\d{1,2}),? (-?\d+)$");
date_pattern!(MY_TO_MY, r"^({m}),? *(-?\d+) *- *({m}),? *(-?\d+)$");
date_pattern!(M_TO_MY, r"^({m}) *- *({m}),? *(-?\d+)$");
date_pattern!(MY_TO_DMY, r"^({m}) *(-?\d+) *- *(\d{1,2}) ({m}) *,? (-?\d+)$");
date_pattern!(MY, r"^({m}),? *(-?\d+)$");
date_pattern!(DECADE_TO_DECADE, r"^(-?\d+)s-(-?\d+)s$");
date_pattern!(DECADE_TO_YEAR, r"^(-?\d+)s-(-?\d+)$");
date_pattern!(DECADE, r"^(-?\d+)s$");
date_pattern!(Y_TO_DMY, r"^(\d+) *- *(\d{1,2}) *({m}),? (-?\d+)$");
date_pattern!(MY_TO_Y, r"^({m}) *(-?\d+) *- *(-?\d+)$");
date_pattern!(Y_TO_MY, r"^(-?\d+) *- *({m}) (-?\d+)$");
date_pattern!(Y_TO_Y, r"^(-?\d+) *- *(-?\d+)$");
date_pattern!(Y, r"^(-?\d+)$");
date_pattern!(CENTURY_TO_CENTURY, r"^(-?\d+) century-(-?\d+) century$");
date_pattern!(CENTURY_RANGE, r"^(-?\d+) *- *(-?\d+) centur(?:y|ies)$");
date_pattern!(CENTURY, r"^(-?\d+) century$");

fn year(caps: &Captures, index: usize) -> Option<i32> {
    caps[index].parse().ok()
}

fn day(caps: &Captures, index: usize) -> Option<u32> {
    caps[index].parse().ok()
}

fn month(caps: &Captures, index: usize) -> Option<u32> {
    month_number(&caps[index])
}

/// Centuries are anchored to their starting year.
fn century_year(caps: &Captures, index: usize) -> Option<i32> {
    Some((year(caps, index)? - 1) * 100)
}

/// Tries every pattern in order against an already-cleaned string.
pub(crate) fn match_cascade(text: &str, ongoing: bool) -> Option<NormalizedDate> {
    let mut date = cascade(text, ongoing)?;
    // A second side exists only when its year parsed; a year too large for
    // i32 drops the whole side rather than leaving precision2 dangling.
    if date.year2.is_none() {
        date.month2 = None;
        date.day2 = None;
        date.precision2 = None;
    }
    Some(date)
}

fn cascade(text: &str, ongoing: bool) -> Option<NormalizedDate> {
    if let Some(caps) = YMD.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            month1: day(&caps, 2),
            day1: day(&caps, 3),
            precision1: Precision::Day,
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = DMY_TO_Y.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 3)?,
            month1: month(&caps, 2),
            day1: day(&caps, 1),
            precision1: Precision::Day,
            year2: year(&caps, 4),
            precision2: Some(Precision::Year),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = DMY_TO_MY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 3)?,
            month1: month(&caps, 2),
            day1: day(&caps, 1),
            precision1: Precision::Day,
            year2: year(&caps, 5),
            month2: month(&caps, 4),
            precision2: Some(Precision::Month),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = DMY_TO_DMY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 3)?,
            month1: month(&caps, 2),
            day1: day(&caps, 1),
            precision1: Precision::Day,
            year2: year(&caps, 6),
            month2: month(&caps, 5),
            day2: day(&caps, 4),
            precision2: Some(Precision::Day),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = DM_TO_DMY.captures(text) {
        // One trailing year covers both ends.
        return Some(NormalizedDate {
            year1: year(&caps, 5)?,
            month1: month(&caps, 2),
            day1: day(&caps, 1),
            precision1: Precision::Day,
            year2: year(&caps, 5),
            month2: month(&caps, 4),
            day2: day(&caps, 3),
            precision2: Some(Precision::Day),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = D_TO_DMY.captures(text) {
        // Requires an ascending day pair; otherwise "1881 - 5 may 1882"
        // style strings would land here.
        let first = day(&caps, 1)?;
        let second = day(&caps, 2)?;
        if second > first {
            return Some(NormalizedDate {
                year1: year(&caps, 4)?,
                month1: month(&caps, 3),
                day1: Some(first),
                precision1: Precision::Day,
                year2: year(&caps, 4),
                month2: month(&caps, 3),
                day2: Some(second),
                precision2: Some(Precision::Day),
                ongoing,
                ..Default::default()
            });
        }
    }

    if let Some(caps) = DMY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 3)?,
            month1: month(&caps, 2),
            day1: day(&caps, 1),
            precision1: Precision::Day,
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = MDY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 3)?,
            month1: month(&caps, 1),
            day1: day(&caps, 2),
            precision1: Precision::Day,
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = MY_TO_MY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 2)?,
            month1: month(&caps, 1),
            precision1: Precision::Month,
            year2: year(&caps, 4),
            month2: month(&caps, 3),
            precision2: Some(Precision::Month),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = M_TO_MY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 3)?,
            month1: month(&caps, 1),
            precision1: Precision::Month,
            year2: year(&caps, 3),
            month2: month(&caps, 2),
            precision2: Some(Precision::Month),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = MY_TO_DMY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 2)?,
            month1: month(&caps, 1),
            precision1: Precision::Month,
            year2: year(&caps, 5),
            month2: month(&caps, 4),
            day2: day(&caps, 3),
            precision2: Some(Precision::Day),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = MY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 2)?,
            month1: month(&caps, 1),
            precision1: Precision::Month,
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = DECADE_TO_DECADE.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            precision1: Precision::Decade,
            year2: year(&caps, 2),
            precision2: Some(Precision::Decade),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = DECADE_TO_YEAR.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            precision1: Precision::Decade,
            year2: year(&caps, 2),
            precision2: Some(Precision::Year),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = DECADE.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            precision1: Precision::Decade,
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = Y_TO_DMY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            precision1: Precision::Year,
            year2: year(&caps, 4),
            month2: month(&caps, 3),
            day2: day(&caps, 2),
            precision2: Some(Precision::Day),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = MY_TO_Y.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 2)?,
            month1: month(&caps, 1),
            precision1: Precision::Month,
            year2: year(&caps, 3),
            precision2: Some(Precision::Year),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = Y_TO_MY.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            precision1: Precision::Year,
            year2: year(&caps, 3),
            month2: month(&caps, 2),
            precision2: Some(Precision::Month),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = Y_TO_Y.captures(text) {
        let first = &caps[1];
        let mut second = caps[2].to_string();
        // "1550-1" reads as 1550-1551; shared leading digits are implied.
        // BC years keep their sign and are never padded.
        if second.len() < first.len() && !first.starts_with('-') && !second.starts_with('-') {
            second = format!("{}{}", &first[..first.len() - second.len()], second);
        }
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            precision1: Precision::Year,
            year2: second.parse().ok(),
            precision2: Some(Precision::Year),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = Y.captures(text) {
        return Some(NormalizedDate {
            year1: year(&caps, 1)?,
            precision1: Precision::Year,
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = CENTURY_TO_CENTURY.captures(text) {
        return Some(NormalizedDate {
            year1: century_year(&caps, 1)?,
            precision1: Precision::Century,
            year2: century_year(&caps, 2),
            precision2: Some(Precision::Century),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = CENTURY_RANGE.captures(text) {
        return Some(NormalizedDate {
            year1: century_year(&caps, 1)?,
            precision1: Precision::Century,
            year2: century_year(&caps, 2),
            precision2: Some(Precision::Century),
            ongoing,
            ..Default::default()
        });
    }

    if let Some(caps) = CENTURY.captures(text) {
        return Some(NormalizedDate {
            year1: century_year(&caps, 1)?,
            precision1: Precision::Century,
            ongoing,
            ..Default::default()
        });
    }

    None
}

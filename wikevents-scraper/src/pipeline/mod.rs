//! Page-to-event pipeline: segmentation, field extraction, date
//! normalization, and the parallel batch driver.
//!
//! Failures stay local. A page that does not parse yields no events; an
//! infobox that does not extract is logged and skipped; a date that does
//! not normalize goes to the bad-dates side channel. One page can never
//! take down a batch.

pub mod io;

use std::panic;
use std::thread;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};
use wikevents_core::domain::{BadDate, BadDateKind, EventRecord, PageRecord, RawPage};

use crate::dates::{self, DateError};
use crate::infobox;

static FOUR_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Everything produced from one page.
#[derive(Debug, Default)]
pub struct PageOutcome {
    /// Present only when at least one event carries a normalized date.
    pub page: Option<PageRecord>,
    pub bad_dates: Vec<BadDate>,
}

/// Aggregated result of a batch run. `pages` preserves input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub pages: Vec<PageRecord>,
    pub bad_dates: Vec<BadDate>,
    /// Events that carried a date field, parsed or not.
    pub event_count: usize,
    pub parsed_count: usize,
}

/// Runs one page through segmentation, extraction and date normalization.
pub fn process_page(page: &RawPage) -> PageOutcome {
    let Some(segmented) = infobox::segment(page) else {
        return PageOutcome::default();
    };

    let mut events = Vec::new();
    let mut bad_dates = Vec::new();

    for raw_infobox in &segmented.infoboxes {
        let record = match infobox::extract(raw_infobox) {
            Ok(record) => record,
            Err(error) => {
                warn!(page = %page.title, %error, "skipping unextractable infobox");
                continue;
            }
        };

        // Infoboxes without a date field describe no event we can place.
        let Some(raw_date) = record.fields.get("date").filter(|d| !d.is_empty()) else {
            debug!(page = %page.title, "infobox has no date field");
            continue;
        };
        let raw_date = raw_date.to_string();

        let title = effective_title(&page.title, record.fields.get("title"));
        let context_year = record
            .fields
            .get("year")
            .and_then(|year| FOUR_DIGIT_YEAR.find(year))
            .and_then(|m| m.as_str().parse::<i32>().ok());

        match dates::normalize(&raw_date, title, context_year) {
            Ok(date) => events.push(EventRecord {
                infobox_type: record.infobox_type,
                fields: record.fields,
                date: Some(date),
            }),
            Err(error) => {
                debug!(page = %page.title, raw = %raw_date, %error, "date failed to normalize");
                bad_dates.push(BadDate {
                    page_title: page.title.clone(),
                    infobox_type: record.infobox_type,
                    raw_date,
                    kind: match error {
                        DateError::Unparsed { cleaned } => BadDateKind::Unparsed { cleaned },
                        DateError::InvalidCalendar { date } => BadDateKind::InvalidCalendar { date },
                    },
                });
            }
        }
    }

    let page = (!events.is_empty()).then(|| PageRecord {
        page_title: segmented.page_title,
        description: segmented.description,
        events,
    });

    PageOutcome { page, bad_dates }
}

/// Event titles like "2014 Asian Games opening" often carry the year the
/// page title lacks; prefer them as date context when they do.
fn effective_title<'a>(page_title: &'a str, event_title: Option<&'a str>) -> &'a str {
    match event_title {
        Some(event_title)
            if !FOUR_DIGIT_YEAR.is_match(page_title) && FOUR_DIGIT_YEAR.is_match(event_title) =>
        {
            event_title
        }
        _ => page_title,
    }
}

/// Processes a batch across `threads` workers. Pages are split into
/// contiguous chunks so the output order always matches the input order,
/// whatever the scheduling.
pub fn process_pages(pages: &[RawPage], threads: usize) -> BatchOutcome {
    let threads = threads.max(1);
    let chunk_size = pages.len().div_ceil(threads).max(1);

    let mut outcomes = Vec::with_capacity(pages.len());
    thread::scope(|scope| {
        let handles: Vec<_> = pages
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().map(process_page).collect::<Vec<_>>()))
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(chunk) => outcomes.extend(chunk),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
    });

    let mut batch = BatchOutcome::default();
    for outcome in outcomes {
        if let Some(page) = outcome.page {
            batch.parsed_count += page.events.len();
            batch.pages.push(page);
        }
        batch.bad_dates.extend(outcome.bad_dates);
    }
    batch.event_count = batch.parsed_count + batch.bad_dates.len();

    if batch.event_count > 0 {
        info!(
            parsed = batch.parsed_count,
            total = batch.event_count,
            ratio = format!(
                "{:.2}%",
                batch.parsed_count as f64 * 100.0 / batch.event_count as f64
            ),
            "date parse rate"
        );
    }

    batch
}

/// Default worker count for the batch driver.
pub fn default_threads() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, wikitext: &str) -> RawPage {
        RawPage {
            title: title.to_string(),
            wikitext: wikitext.to_string(),
        }
    }

    const GARFIELD: &str = concat!(
        "{{Infobox civilian attack\n",
        "| title = {{nowrap|Assassination of James A. Garfield}}\n",
        "| date = July 2, 1881\n",
        "| place = [[Washington, D.C.]]\n",
        "}}\n",
        "President Garfield was shot at the railroad station.\n"
    );

    #[test]
    fn page_becomes_a_dated_event() {
        let outcome = process_page(&page("Assassination of James A. Garfield", GARFIELD));
        let record = outcome.page.unwrap();
        assert_eq!(record.page_title, "Assassination of James A. Garfield");
        assert_eq!(
            record.description,
            "President Garfield was shot at the railroad station."
        );
        assert_eq!(record.events.len(), 1);

        let event = &record.events[0];
        assert_eq!(event.infobox_type.as_deref(), Some("civilian attack"));
        let date = event.date.as_ref().unwrap();
        assert_eq!((date.year1, date.month1, date.day1), (1881, Some(7), Some(2)));
        assert!(outcome.bad_dates.is_empty());
    }

    #[test]
    fn page_without_infobox_yields_nothing() {
        let outcome = process_page(&page("Prose", "Just text, no templates."));
        assert!(outcome.page.is_none());
        assert!(outcome.bad_dates.is_empty());
    }

    #[test]
    fn dateless_infobox_is_skipped_silently() {
        let text = "{{Infobox building\n| place = Paris\n}}\nA building.";
        let outcome = process_page(&page("Tower", text));
        assert!(outcome.page.is_none());
        assert!(outcome.bad_dates.is_empty());
    }

    #[test]
    fn unparseable_date_goes_to_the_side_channel() {
        let text = "{{Infobox event\n| date = sometime in antiquity\n}}\nOld.";
        let outcome = process_page(&page("Mystery", text));
        assert!(outcome.page.is_none());
        assert_eq!(outcome.bad_dates.len(), 1);
        let bad = &outcome.bad_dates[0];
        assert_eq!(bad.page_title, "Mystery");
        assert_eq!(bad.raw_date, "sometime in antiquity");
        assert!(matches!(bad.kind, BadDateKind::Unparsed { .. }));
    }

    #[test]
    fn impossible_date_is_reported_as_invalid() {
        let text = "{{Infobox event\n| date = 30 February 2000\n}}\nOdd.";
        let outcome = process_page(&page("Calendar", text));
        assert_eq!(outcome.bad_dates.len(), 1);
        assert!(matches!(
            outcome.bad_dates[0].kind,
            BadDateKind::InvalidCalendar { .. }
        ));
    }

    #[test]
    fn one_bad_infobox_does_not_lose_the_good_one() {
        let text = concat!(
            "{{Infobox military conflict\n| date = 28 July 1914 – 11 November 1918\n}}\n",
            "The war.\n",
            "{{Infobox military conflict\n| date = who knows\n}}\n"
        );
        let outcome = process_page(&page("The War", text));
        let record = outcome.page.unwrap();
        assert_eq!(record.events.len(), 1);
        assert_eq!(outcome.bad_dates.len(), 1);
    }

    #[test]
    fn event_title_supplies_the_missing_year() {
        let text = concat!(
            "{{Infobox sports event\n",
            "| title = Gymnastics at the 2014 Asian Games\n",
            "| date = 21–23 September\n",
            "}}\nGymnastics.\n"
        );
        let outcome = process_page(&page("Men's artistic team", text));
        let record = outcome.page.unwrap();
        let date = record.events[0].date.as_ref().unwrap();
        assert_eq!(date.year1, 2014);
        assert_eq!((date.day1, date.day2), (Some(21), Some(23)));
    }

    #[test]
    fn batch_preserves_input_order() {
        let pages: Vec<RawPage> = (1900..1910)
            .map(|year| {
                page(
                    &format!("Event {year}"),
                    &format!("{{{{Infobox event\n| date = {year}\n}}}}\nSomething happened."),
                )
            })
            .collect();

        for threads in [1, 3, 16] {
            let batch = process_pages(&pages, threads);
            let titles: Vec<&str> = batch.pages.iter().map(|p| p.page_title.as_str()).collect();
            let expected: Vec<String> = (1900..1910).map(|y| format!("Event {y}")).collect();
            assert_eq!(titles, expected);
            assert_eq!(batch.parsed_count, 10);
            assert_eq!(batch.event_count, 10);
        }
    }

    #[test]
    fn empty_batch_is_fine() {
        let batch = process_pages(&[], 4);
        assert!(batch.pages.is_empty());
        assert_eq!(batch.event_count, 0);
    }
}

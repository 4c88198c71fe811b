//! End-to-end pipeline tests: wikitext pages in, serialized event records
//! and bad-date reports out.

use std::fs;

use wikevents_core::domain::{BadDateKind, PageRecord, Precision};
use wikevents_scraper::pipeline::process_pages;
use wikevents_scraper::RawPage;

fn page(title: &str, wikitext: &str) -> RawPage {
    RawPage {
        title: title.to_string(),
        wikitext: wikitext.to_string(),
    }
}

fn sample_pages() -> Vec<RawPage> {
    vec![
        page(
            "Assassination of James A. Garfield",
            concat!(
                "{{Infobox civilian attack\n",
                "| title = {{nowrap|Assassination of James A. Garfield}}\n",
                "| date = July 2, 1881<ref>Ackerman, p. 92</ref>\n",
                "| place = [[Baltimore and Potomac Railroad Station|the station]]\n",
                "}}\n",
                "<!-- note -->\n",
                "President Garfield was shot at the railroad station.\n"
            ),
        ),
        page(
            "World War II",
            concat!(
                "{{Infobox military conflict\n",
                "| date = 1 September 1939 – 2 September 1945\n",
                "| place = Worldwide\n",
                "}}\n",
                "The deadliest conflict in history.\n"
            ),
        ),
        page(
            "Battle of Marathon",
            "{{Infobox military conflict\n| date = September 490 BC\n}}\nGreeks and Persians.\n",
        ),
        page(
            "COVID-19 pandemic",
            "{{Infobox pandemic\n| date = March 2020 – present\n}}\nAn ongoing pandemic.\n",
        ),
        page(
            "Mystery event",
            "{{Infobox event\n| date = lost to history\n}}\nNobody knows.\n",
        ),
        page("Plain article", "No infobox here, just prose.\n"),
    ]
}

#[test]
fn batch_extracts_events_in_input_order() {
    let batch = process_pages(&sample_pages(), 2);

    let titles: Vec<&str> = batch.pages.iter().map(|p| p.page_title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Assassination of James A. Garfield",
            "World War II",
            "Battle of Marathon",
            "COVID-19 pandemic",
        ]
    );

    // Garfield: single-day event with markup scrubbed from the fields.
    let garfield = &batch.pages[0];
    assert_eq!(
        garfield.description,
        "President Garfield was shot at the railroad station."
    );
    let event = &garfield.events[0];
    assert_eq!(event.infobox_type.as_deref(), Some("civilian attack"));
    assert_eq!(event.fields.get("place"), Some("the station"));
    let date = event.date.as_ref().unwrap();
    assert_eq!((date.year1, date.month1, date.day1), (1881, Some(7), Some(2)));
    assert_eq!(date.precision1, Precision::Day);

    // WWII: full day range.
    let war = batch.pages[1].events[0].date.as_ref().unwrap();
    assert_eq!((war.year1, war.month1, war.day1), (1939, Some(9), Some(1)));
    assert_eq!((war.year2, war.month2, war.day2), (Some(1945), Some(9), Some(2)));

    // Marathon: BC month date on the proleptic axis.
    let marathon = batch.pages[2].events[0].date.as_ref().unwrap();
    assert_eq!(marathon.year1, -489);
    assert_eq!(marathon.month1, Some(9));
    assert_eq!(marathon.precision1, Precision::Month);

    // Pandemic: ongoing flag set, no second side.
    let pandemic = batch.pages[3].events[0].date.as_ref().unwrap();
    assert!(pandemic.ongoing);
    assert_eq!(pandemic.year2, None);

    // The unparseable date lands in the side channel; the page is dropped.
    assert_eq!(batch.bad_dates.len(), 1);
    assert_eq!(batch.bad_dates[0].page_title, "Mystery event");
    assert_eq!(batch.parsed_count, 4);
    assert_eq!(batch.event_count, 5);
}

#[test]
fn thread_count_does_not_change_results() {
    let pages = sample_pages();
    let single = process_pages(&pages, 1);
    let many = process_pages(&pages, 8);

    let single_json = serde_json::to_string(&single.pages).unwrap();
    let many_json = serde_json::to_string(&many.pages).unwrap();
    assert_eq!(single_json, many_json);
}

#[test]
fn results_round_trip_through_json_files() {
    let batch = process_pages(&sample_pages(), 4);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("events.json");
    fs::write(&output, serde_json::to_string_pretty(&batch.pages).unwrap()).unwrap();

    let reloaded: Vec<PageRecord> =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(reloaded.len(), batch.pages.len());

    let date = reloaded[0].events[0].date.as_ref().unwrap();
    assert_eq!((date.year1, date.month1, date.day1), (1881, Some(7), Some(2)));
    assert_eq!(date.precision1, Precision::Day);
}

#[test]
fn bad_dates_serialize_with_their_kind() {
    let batch = process_pages(&sample_pages(), 1);
    let json = serde_json::to_string(&batch.bad_dates).unwrap();
    assert!(json.contains(r#""kind":"unparsed""#));
    assert!(json.contains(r#""raw_date":"lost to history""#));

    match &batch.bad_dates[0].kind {
        BadDateKind::Unparsed { cleaned } => assert_eq!(cleaned, "lost-history"),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn page_with_multiple_infoboxes_yields_multiple_events() {
    let pages = vec![page(
        "Twin battles",
        concat!(
            "{{Infobox military conflict\n| date = 14 June 1800\n}}\n",
            "Two battles, one day apart.\n",
            "{{Infobox military conflict\n| date = 15 June 1800\n}}\n"
        ),
    )];
    let batch = process_pages(&pages, 1);
    assert_eq!(batch.pages.len(), 1);
    let events = &batch.pages[0].events;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].date.as_ref().unwrap().day1, Some(14));
    assert_eq!(events[1].date.as_ref().unwrap().day1, Some(15));
}

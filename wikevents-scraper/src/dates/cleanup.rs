//! Ordered rewrite passes that scrub wiki markup, vandal noise and template
//! wrappers out of a raw date string before pattern matching.
//!
//! Rules run strictly in sequence; several later rules only make sense on the
//! output of earlier ones, so reordering them changes results.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::months::{month_name, month_number, month_regex};

/// A date string after cleanup, plus the ongoing flag extracted from it.
#[derive(Debug, Clone)]
pub(crate) struct Cleaned {
    pub text: String,
    pub ongoing: bool,
}

enum Rule {
    Literal(&'static str, &'static str),
    Pattern(Regex, &'static str),
}

fn plain(from: &'static str, to: &'static str) -> Rule {
    Rule::Literal(from, to)
}

fn re(pattern: &str, to: &'static str) -> Rule {
    Rule::Pattern(Regex::new(pattern).unwrap(), to)
}

fn apply(rules: &[Rule], text: &str) -> String {
    let mut out = text.to_string();
    for rule in rules {
        out = match rule {
            Rule::Literal(from, to) => out.replace(from, to),
            Rule::Pattern(pattern, to) => pattern.replace_all(&out, *to).into_owned(),
        };
    }
    out
}

/// Markup removal and vocabulary normalization, up to the point where an
/// embedded age template would take over.
static SCRUB_HEAD: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // [[a|b]] is taken to mean the date b.
        re(r"\[\[.*?\|(.*?)\]\]", "$1"),
        // A leading link followed by a comma is an alias, not a date.
        re(r"^[a-z ]*\[\[.*?\]\], ", ""),
        plain("&nbsp;", " "),
        plain("{{nbsp}}", " "),
        plain("{{nbs}}", " "),
        plain("<small>", ""),
        plain("</small>", ""),
        plain("bce.", "bc"),
        plain("b.c.", "bc"),
        plain("bc.", "bc"),
        plain("a.d", "ad"),
        plain("ad.", "ad"),
        plain("p.m", "pm"),
        plain("pm.", "pm"),
        plain("a.m", "am"),
        plain("am.", "am"),
        plain("(in progress)", "present"),
        plain("''present''", "present"),
        plain("''ongoing''", "present"),
        plain("ongoing", "present"),
        plain("current", "present"),
        plain(" , ", ", "),
        plain("<br>", " "),
        plain("<br/>", " "),
        plain("<br />", " "),
        plain("\n", " "),
        re(r"<ref .*?/>", ""),
        re(r"<ref.*?>.*?</ref>", ""),
        re(r"<sup.*?>.*?</sup>", ""),
        re(r"<!--.*?-->", ""),
        re(r"\{\{rp.*?\}\}", ""),
        re(r"\{\{cn.*?\}\}", ""),
        re(r"\{\{clarify.*?\}\}", ""),
        re(r"\{\{sfn.*?\}\}", ""),
        re(r"\{\{efn.*?\}\}", ""),
        re(r"\{\{resize.*?\}\}", ""),
        re(r"\{\{dubious.*?\}\}", ""),
        re(r"\{\{cref.*?\}\}", ""),
        re(r"\{\{ref.*?\}\}", ""),
        re(r"\{\{#tag:ref\|.*?\}\}", ""),
        re(r"\{\{citation needed.*?\}\}", ""),
        re(r"\{\{page needed.*?\}\}", ""),
        plain("{{-}}", ""),
        plain("''(cancelled)''", ""),
        plain("{{ubl|", ""),
    ]
});

static SCRUB_TAIL: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        re(r"\{\{nowrap\|(.*?)\}\}", "$1"),
        re(r"\{\{nowr\|(.*?)\}\}", "$1"),
        // Approximation markers carry no precision we can use.
        plain("''circa''", ""),
        plain("{{circa}}", ""),
        re(r"\{\{circa\|(.*?)\}\}", "$1"),
        plain("{{c.}}", ""),
        plain("c.", ""),
        plain("circa", ""),
        re(r"^~", ""),
        re(r"^\(as of\) ", ""),
        plain("ca.", ""),
        plain("'''c'''. ", ""),
        plain("probably", ""),
        // Hard-coded durations such as "(3 years 2 months)".
        re(r"\((\d+ years)? *(\d+ months)? *&? *(\d+ days)?\)", ""),
        re(r"; \d+ years ago", ""),
        re(r"; \{\{age\|\d+\|\d+\|\d+\}\} years ago", ""),
        re(r"(sunday|monday|tuesday|wednesday|thursday|friday|saturday), ", ""),
        plain("{{snd}}", "-"),
        plain("{{snds}}", "-"),
        plain("&mdash;", "-"),
        plain("&ndash;", "-"),
        plain("–", "-"),
        plain("—", "-"),
        plain("−", "-"),
        plain("―", "-"),
        plain("{{dash}}", "-"),
        plain("{{ndash}}", "-"),
        plain("{{endash}}", "-"),
        plain("{{en dash}}", "-"),
        plain("{{spaced endash}}", "-"),
        plain("{{spaced en dash}}", "-"),
        plain("{{spaced ndash}}", "-"),
        plain(" - ", "-"),
        plain(" -", "-"),
        plain("- ", "-"),
        plain(" to ", "-"),
        plain(" through ", "-"),
        plain("－", "-"),
        re(r"between (.*)? and (.*?)", "$1-$2"),
        re(r"^from ", ""),
        plain("night of", ""),
        re(r"mid[- ]", ""),
        plain("predominately", ""),
        plain("early", ""),
        plain("late", ""),
        // Times of day, e.g. "[13:45 pdt]" or "11:45 am-12:30 pm".
        re(r"\[\d\d:\d\d [a-z]+\]", ""),
        re(r"\d?\d:\d\d ?[ap]m-\d?\d:\d\d ?[ap]m", ""),
        re(r"\d?\d:\d\d ?[ap]m", ""),
        re(r"\d\d:\d\d", ""),
        plain("unknown, ", ""),
        plain("shortly after", ""),
        plain("since", ""),
        plain("throughout the", ""),
        re(r"spring( of)?", ""),
        re(r"autumn( of)?", ""),
        re(r"winter( of)?", ""),
        re(r"summer( of)?", ""),
        re(r"beginning( of)?", ""),
        plain("during the night", ""),
        plain("solstice", ""),
        re(r"\bcdt\b", ""),
        re(r"[,\.\|;] *$", ""),
        re(r"^[\.,:;] *", ""),
        plain("?", ""),
        // Ordinal suffixes, then "march of 1287" style connectives.
        re(r"(\d)(st|nd|rd|th)", "$1"),
        re(r"([a-z]+) +of +(\d+)", "$1 $2"),
        plain("  ", " "),
        re(r"\b(\d+)\.", "$1"),
        // Template parameters that never carry date information.
        re(r" *\| *time.*", ""),
        re(r" *\| *page.*", ""),
        re(r" *\| *place.*", ""),
        re(r" *\| *df=[ a-z]+", ""),
        re(r" *\| *mf=[ a-z]+", ""),
        re(r" *\| *p=[ a-z]+", ""),
        re(r" *\| *br=[ a-z]+", ""),
        re(r" *\| *sep=[ a-z]+", ""),
        re(r" *\| *range=[ a-z]+", ""),
        plain("{{date start", "{{start date"),
    ]
});

static BARE_START_WITH_END_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) ([a-z]+)-(\{\{end date\|(\d+)\|.*?\}\})").unwrap());

/// First cleanup phase. Stops where an embedded `{{age ...}}` template would
/// be handled instead; the caller checks for one on the returned text.
pub(crate) fn scrub(raw: &str) -> Cleaned {
    // Cyrillic lookalike seen in the wild.
    let text = raw.replace("Маrch", "March").to_lowercase();
    let text = apply(&SCRUB_HEAD, &text);

    let today = Utc::now();
    let text = text
        .replace("{{presentyear}}", &today.year().to_string())
        .replace("{{presentmonth}}", &today.month().to_string())
        .replace("{{presentday}}", &today.day().to_string());

    let text = apply(&SCRUB_TAIL, &text);

    // "25 july-{{end date|1995|10|17}}" gains its missing start tag.
    let text = BARE_START_WITH_END_TAG
        .replace_all(&text, |caps: &Captures| {
            let month = month_number(&caps[2])
                .map(|n| n.to_string())
                .unwrap_or_default();
            format!(
                "{{{{start date|{}|{}|{}}}}}-{}",
                &caps[4], month, &caps[1], &caps[3]
            )
        })
        .into_owned();

    let ongoing = text.contains("-present");
    let text = if ongoing {
        text.replace("-present", "")
    } else {
        text
    };

    Cleaned { text, ongoing }
}

static PAREN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)$").unwrap());
static ADJACENT_START_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\{\{start-date\|.*?\}\})(\{\{end-date\|.*?\}\})").unwrap());
static DATE_TAG_YMD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{[a-z]* ?date(?: and age)? *(?: and years ago)? *\|(\d+)\|(\d+)\|(\d+)\}\}")
        .unwrap()
});
static START_AND_END_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{start and end dates?\|(\d+)\|(\d+)\|(\d+)\|(\d+)\|(\d+)\|(\d+)\}\}").unwrap()
});
static DATE_TAG_SINGLE_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(?:(?:start|end)-)?date\| *([^\|]+)\}\}").unwrap());
static DATE_TAG_TWO_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(?:(?:start|end)-)?date\| *([^\|]+)\| *(?:[^\|]+)\}\}").unwrap());
static DATE_TAG_YM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[a-z]* *date\|(\d+)\|(\d+)\}\}").unwrap());
static DATE_TAG_Y: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[a-z]* *date\|(\d+)\}\}").unwrap());
static SLASH_PAIR_INNER: Lazy<Regex> = Lazy::new(|| Regex::new(r" (\d+)/(\d+)([ ,])").unwrap());
static SLASH_PAIR_LEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)/(\d+) ").unwrap());
static US_RANGE_TWO_MONTHS: Lazy<Regex> =
    Lazy::new(|| month_regex(r"({m}) (\d{1,2})-({m}) (\d{1,2})\b"));
static US_RANGE_ONE_MONTH: Lazy<Regex> = Lazy::new(|| month_regex(r"({m}) (\d{1,2})-(\d{1,2})\b"));
static US_RANGE_WITH_YEAR: Lazy<Regex> = Lazy::new(|| month_regex(r"({m}) (\d+)-(\d+),? (\d+)"));
static US_SINGLE_WITH_YEAR: Lazy<Regex> = Lazy::new(|| month_regex(r"({m}) (\d+),? (\d+)"));
static BC_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*?\d+)-(.*?) bc").unwrap());
static BC_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) bce?\b").unwrap());
static BC_CENTURY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) century bce?\b").unwrap());
static ISLAMIC_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+ [a-z]+ \d+ ah,(.*\d+)").unwrap());
static ISLAMIC_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*? ce)/.*? ah").unwrap());
static AD_CE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) \b(ad|ce)\b").unwrap());
static AD_CE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(ad|ce)\b (\d+)").unwrap());
static WHOLE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\[(.*?)\]\]$").unwrap());
static OLD_STYLE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*?) \(.*? os\)(.*?)").unwrap());
static OLD_STYLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{oldstyledateny\|(.*?)\|.*?\}\}").unwrap());
static EXTERNAL_LINK_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]$").unwrap());
static TRAILING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\.\|\?\};]* *$").unwrap());
static LEADING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\.,:;] *").unwrap());

fn ymd_tag_to_text(year: &str, month_raw: &str, day_raw: &str) -> String {
    let mut month: u32 = month_raw.parse().unwrap_or(0);
    let mut day: u32 = day_raw.parse().unwrap_or(0);
    if month > 12 {
        std::mem::swap(&mut month, &mut day);
    }
    format!("{} {} {}", day, month_name(month).unwrap_or_default(), year)
}

/// Second cleanup phase: date templates collapse to plain text, American
/// month-first ranges flip to day-first, and era markers resolve to signed
/// years. Applied after the age-template check.
pub(crate) fn rewrite(text: &str) -> String {
    // Parenthesised suffixes are almost always worthless notes.
    let text = PAREN_SUFFIX.replace_all(text, "");
    let text = ADJACENT_START_END.replace_all(&text, "$1-$2");

    let text = DATE_TAG_YMD
        .replace_all(&text, |caps: &Captures| {
            ymd_tag_to_text(&caps[1], &caps[2], &caps[3])
        })
        .into_owned();

    let text = START_AND_END_TAG
        .replace_all(&text, |caps: &Captures| {
            format!(
                "{}-{}",
                ymd_tag_to_text(&caps[1], &caps[2], &caps[3]),
                ymd_tag_to_text(&caps[4], &caps[5], &caps[6])
            )
        })
        .into_owned();

    let text = DATE_TAG_SINGLE_ARG.replace_all(&text, "$1");
    let text = DATE_TAG_TWO_ARGS.replace_all(&text, "$1");

    // {{some date|2013|12}} reads as december 2013.
    let text = DATE_TAG_YM
        .replace_all(&text, |caps: &Captures| {
            let month: u32 = caps[2].parse().unwrap_or(0);
            format!("{} {}", month_name(month).unwrap_or_default(), &caps[1])
        })
        .into_owned();
    let text = DATE_TAG_Y.replace_all(&text, "$1");

    // Two-day events written "5/6 june" become a range.
    let text = SLASH_PAIR_INNER.replace_all(&text, " $1-$2$3");
    let text = SLASH_PAIR_LEADING.replace_all(&text, "$1-$2 ");

    let text = US_RANGE_TWO_MONTHS.replace_all(&text, "$2 $1-$4 $3");
    // Only flip "june 28-29" when the pair reads as an ascending range.
    let text = US_RANGE_ONE_MONTH
        .replace_all(&text, |caps: &Captures| {
            let first: u32 = caps[2].parse().unwrap_or(0);
            let second: u32 = caps[3].parse().unwrap_or(0);
            if first < second {
                format!("{}-{} {}", &caps[2], &caps[3], &caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned();
    let text = US_RANGE_WITH_YEAR.replace_all(&text, "$2-$3 $1 $4");
    let text = US_SINGLE_WITH_YEAR.replace_all(&text, "$2 $1 $3");

    // "589-587 bc" marks both ends of the range as bc.
    let text = BC_RANGE.replace_all(&text, "$1 bc-$2 bc");
    let text = BC_YEAR
        .replace_all(&text, |caps: &Captures| {
            let year: i32 = caps[1].parse().unwrap_or(0);
            (1 - year).to_string()
        })
        .into_owned();
    let text = BC_CENTURY
        .replace_all(&text, |caps: &Captures| {
            let century: i32 = caps[1].parse().unwrap_or(0);
            (1 - century).to_string()
        })
        .into_owned();

    // Islamic calendar dates paired with a Gregorian one lose the former.
    let text = ISLAMIC_PREFIX.replace_all(&text, "$1");
    let text = ISLAMIC_SUFFIX.replace_all(&text, "$1");
    let text = AD_CE_SUFFIX.replace_all(&text, "$1");
    let text = AD_CE_PREFIX.replace_all(&text, "$2");
    let text = WHOLE_LINK.replace_all(&text, "$1");
    // Interstitial Julian dates, e.g. "13 may (2 may os), 1790".
    let text = OLD_STYLE_PAREN.replace_all(&text, "${1}${2}");
    let text = OLD_STYLE_TAG.replace_all(&text, "$1");
    let text = EXTERNAL_LINK_SUFFIX.replace_all(&text, "");

    let text = text.trim();
    let text = TRAILING_PUNCT.replace_all(text, "");
    let text = LEADING_PUNCT.replace_all(&text, "");
    text.into_owned()
}

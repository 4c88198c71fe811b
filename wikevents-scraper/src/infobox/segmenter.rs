//! Splits a page into its infobox templates and a one-line description.

use once_cell::sync::Lazy;
use regex::Regex;
use wikevents_core::domain::RawPage;

use crate::wikitext::template_bounds;

static INFOBOX_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\{\{infobox").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static LINK_ONLY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\[\[.*?\]\]$").unwrap());

const NO_DESCRIPTION: &str = "No description available.";

/// A page broken into raw infobox template strings (in document order) and
/// the free text following the first one.
#[derive(Debug, Clone)]
pub struct SegmentedPage {
    pub page_title: String,
    pub infoboxes: Vec<String>,
    pub description: String,
}

/// Locates every `{{infobox` template on the page. Returns `None` when the
/// page carries no infobox at all; that is ineligibility, not an error.
pub fn segment(page: &RawPage) -> Option<SegmentedPage> {
    let text = &page.wikitext;
    let first = INFOBOX_OPEN.find(text)?;

    let start = first.start();
    let length = template_bounds(text, start);
    let end = (start + length).min(text.len());

    let mut infoboxes = vec![text[start..end].to_string()];
    let description = derive_description(&text[end..]);

    // A page may describe multiple events; pick up every later infobox too.
    let mut search_from = start + 1;
    while let Some(found) = INFOBOX_OPEN.find_at(text, search_from) {
        let start = found.start();
        let length = template_bounds(text, start);
        let end = (start + length).min(text.len());
        infoboxes.push(text[start..end].to_string());
        search_from = start + 1;
    }

    Some(SegmentedPage {
        page_title: page.title.clone(),
        infoboxes,
        description,
    })
}

/// The description is the first substantial line after the infobox: comments
/// stripped, link-only lines and blank lines removed, and any leading
/// templates (hatnotes and the like) consumed whole.
fn derive_description(after_infobox: &str) -> String {
    let stripped = COMMENT.replace_all(after_infobox.trim(), "");
    let stripped = LINK_ONLY_LINE.replace_all(&stripped, "");

    let mut description = stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    while description.starts_with("{{") {
        let length = template_bounds(&description, 0);
        if length >= description.len() {
            return NO_DESCRIPTION.to_string();
        }
        description = description[length..].to_string();
        if !description.starts_with("{{") {
            // Drop the separator left behind by the consumed template.
            let width = description.chars().next().map_or(0, char::len_utf8);
            description = description[width..].to_string();
        }
    }

    let first_line = match description.lines().next() {
        Some(line) if !line.is_empty() => line,
        _ => return NO_DESCRIPTION.to_string(),
    };

    match first_line.strip_prefix("}}") {
        Some(rest) => rest.to_string(),
        None => first_line.to_string(),
    }
}

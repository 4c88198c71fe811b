//! Decomposes one raw infobox template into an ordered field mapping.

use once_cell::sync::Lazy;
use regex::Regex;
use wikevents_core::domain::InfoboxRecord;
use wikevents_core::{ExtractError, Result};

use crate::wikitext::{parse, reduce};

static COMMENT_RESIDUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static PIPE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|.*$").unwrap());

const INFOBOX_PREFIX: &str = "{{infobox ";

/// Runs an infobox through the grammar parser and reducer, then splits the
/// flat result into a key-value mapping and a normalized type string.
///
/// A reduced interior line with no `=` indicates a reducer edge case we do
/// not handle yet; it is surfaced as an error so the caller can decide
/// whether to skip the infobox.
pub fn extract(raw_infobox: &str) -> Result<InfoboxRecord> {
    let tree = parse(raw_infobox)?;
    let flat = reduce(&tree);

    let lines: Vec<&str> = flat.lines().collect();

    let infobox_type = lines.first().and_then(|first| {
        let prefix = first.get(..INFOBOX_PREFIX.len())?;
        if prefix.eq_ignore_ascii_case(INFOBOX_PREFIX) {
            Some(normalize_type(&first[INFOBOX_PREFIX.len()..]))
        } else {
            None
        }
    });

    // First line is the template name, last line the closing braces.
    let interior: &[&str] = if lines.len() > 2 {
        &lines[1..lines.len() - 1]
    } else {
        &[]
    };

    let mut fields = wikevents_core::FieldMap::new();
    for line in interior {
        let line = line.trim();
        let line = line.strip_prefix('|').unwrap_or(line).trim_start();
        let Some(split_at) = line.find('=') else {
            return Err(ExtractError::MalformedField {
                line: line.to_string(),
            });
        };
        let key = line[..split_at].trim().to_lowercase();
        let value = line[split_at + 1..].trim().to_string();
        fields.insert(key, value);
    }

    Ok(InfoboxRecord {
        infobox_type,
        fields,
    })
}

/// Infobox-specific trimming of the template name into a type label.
fn normalize_type(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let lowered = COMMENT_RESIDUE.replace_all(&lowered, "");
    let lowered = PIPE_SUFFIX.replace(&lowered, "");
    lowered
        .replace("/sandbox", "")
        .replace("militärischer konflikt", "military conflict")
        .trim()
        .to_string()
}

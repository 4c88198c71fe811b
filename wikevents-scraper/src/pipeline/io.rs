//! File I/O for the batch driver: NDJSON page dumps in, JSON results out.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use serde::Serialize;
use tracing::warn;
use wikevents_core::domain::RawPage;

use crate::common::error::Result;

/// Reads an NDJSON page dump, one `{"title", "text"}` object per line.
/// A corrupt line loses that page, not the run.
pub fn read_pages(input: &Path) -> Result<Vec<RawPage>> {
    let file = File::open(input)?;

    let mut pages = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawPage>(&line) {
            Ok(page) => pages.push(page),
            Err(error) => warn!(line = number + 1, %error, "skipping malformed input line"),
        }
    }
    Ok(pages)
}

/// Writes a result collection as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_ndjson_and_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pages.ndjson");
        fs::write(
            &input,
            concat!(
                r#"{"title":"A","text":"{{Infobox event}}"}"#,
                "\n\nnot json at all\n",
                r#"{"title":"B","text":"prose"}"#,
                "\n"
            ),
        )
        .unwrap();

        let pages = read_pages(&input).unwrap();
        let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let missing = Path::new("/nonexistent/pages.ndjson");
        assert!(matches!(
            read_pages(missing),
            Err(crate::common::error::ScraperError::Io(_))
        ));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &vec!["a", "b"]).unwrap();
        let back: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec!["a", "b"]);
    }
}

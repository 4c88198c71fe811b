//! Wikitext infobox extraction and date normalization.
//!
//! The pipeline is a pure in-memory transformation: segment a page into
//! infoboxes, extract key-value fields through the wikitext grammar, then
//! normalize each date field into a structured range.

pub mod common;
pub mod dates;
pub mod infobox;
pub mod observability;
pub mod pipeline;
pub mod wikitext;

pub use wikevents_core::domain::RawPage;

//! Infobox location and field extraction.

pub mod extractor;
pub mod segmenter;

pub use extractor::extract;
pub use segmenter::{segment, SegmentedPage};

//! Shared domain types for the wikevents extraction pipeline.

pub mod common;
pub mod domain;

pub use common::error::{ExtractError, Result};
pub use domain::{
    BadDate, BadDateKind, EventRecord, FieldMap, InfoboxRecord, NormalizedDate, PageRecord,
    Precision, RawPage,
};

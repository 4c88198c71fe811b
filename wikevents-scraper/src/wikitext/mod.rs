//! Wikitext parsing: template boundary matching, the grammar parser, and the
//! lossy tree reduction used for infobox field extraction.

pub mod ast;
pub mod bounds;
pub mod parser;
pub mod reduce;

pub use ast::{MacroArgument, ParseNode};
pub use bounds::template_bounds;
pub use parser::parse;
pub use reduce::reduce;

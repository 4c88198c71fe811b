//! Lossy reduction of a parse tree to a flat, line-oriented string.
//!
//! This is not an inverse of parsing: cosmetic markup is flattened, images,
//! comments and references vanish, and infobox templates are re-serialized
//! with one field per line so the extractor can split on `|` and `=`.

use super::ast::{MacroArgument, ParseNode};

/// Decorative macros that reduce to nothing.
const DROPPED_MACROS: &[&str] = &["flagdeco", "flagicon", "flagicon image", "refn", "sfn"];

/// Single-argument wrapper macros that reduce to their sole argument.
const TRANSPARENT_MACROS: &[&str] = &["nowrap", "small"];

/// Folds a parse tree back into a flattened canonical string.
pub fn reduce(tree: &ParseNode) -> String {
    reduce_node(tree).unwrap_or_default()
}

fn reduce_node(node: &ParseNode) -> Option<String> {
    match node {
        ParseNode::Comment(_) | ParseNode::Image { .. } | ParseNode::Ref(_) => None,
        ParseNode::Text(text) => Some(text.clone()),
        ParseNode::Bold(children) | ParseNode::Italics(children) => {
            Some(join_values(children).trim().to_string())
        }
        ParseNode::Link { page, alias } => match alias {
            Some(values) => {
                let joined: String = values.iter().filter_map(reduce_node).collect();
                Some(joined.trim().to_string())
            }
            None => Some(page.clone()),
        },
        ParseNode::ExternalLink { alias, .. } => {
            Some(alias.as_deref().unwrap_or_default().trim().to_string())
        }
        ParseNode::XmlTag { children, .. } => Some(join_values(children)),
        ParseNode::Macro { name, arguments } => reduce_macro(name, arguments),
    }
}

fn reduce_macro(name: &str, arguments: &[MacroArgument]) -> Option<String> {
    if DROPPED_MACROS.contains(&name) {
        return None;
    }
    if arguments.len() == 1 && TRANSPARENT_MACROS.contains(&name) {
        return Some(reduce_argument(&arguments[0]));
    }

    let is_infobox = name.to_lowercase().starts_with("infobox ");
    let separator = if is_infobox { "\n|" } else { "|" };

    let mut out = format!("{{{{{}", name.trim());
    if !arguments.is_empty() {
        for argument in arguments {
            out.push_str(separator);
            out.push_str(&reduce_argument(argument));
        }
    }
    if is_infobox {
        out.push('\n');
    }
    out.push_str("}}");
    Some(out)
}

fn reduce_argument(argument: &MacroArgument) -> String {
    let value = join_values(&argument.values).trim().to_string();
    match &argument.key {
        Some(key) => format!("{}={}", key.trim(), value),
        None => value,
    }
}

fn join_values(values: &[ParseNode]) -> String {
    values
        .iter()
        .filter_map(reduce_node)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A parsed wikitext fragment. Trees are built once per parse call and
/// consumed by the reducer; children are owned exclusively by their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNode {
    Text(String),
    Macro {
        name: String,
        arguments: Vec<MacroArgument>,
    },
    Link {
        page: String,
        alias: Option<Vec<ParseNode>>,
    },
    ExternalLink {
        url: String,
        alias: Option<String>,
    },
    Image {
        name: String,
        arguments: Vec<MacroArgument>,
    },
    Bold(Vec<ParseNode>),
    Italics(Vec<ParseNode>),
    /// Matched open/close pair; self-closing tags carry no children.
    XmlTag {
        tag: String,
        children: Vec<ParseNode>,
    },
    Comment(String),
    /// `<ref>...</ref>` or `<ref .../>`; contents are opaque, citations are
    /// never parsed further.
    Ref(String),
}

/// One `|`-delimited template argument. `key` is absent for positional
/// arguments; an empty argument has neither key nor values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroArgument {
    pub key: Option<String>,
    pub values: Vec<ParseNode>,
}

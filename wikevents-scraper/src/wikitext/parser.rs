//! Recursive-descent parser for the infobox subset of wikitext.
//!
//! Alternatives are tried in a fixed priority order with backtracking, PEG
//! style: comment, ref, hr/br, generic xml tag, macro, image, link, external
//! link, bold, italics, plain text. The first rule that matches at a position
//! wins and is never re-examined.

use wikevents_core::{ExtractError, Result};

use super::ast::{MacroArgument, ParseNode};

/// Parses one wikitext fragment into a tree, consuming the whole input.
///
/// Fails only when no grammar rule matches and the text run is empty, i.e.
/// on genuinely unparseable input; an empty parse is never silently returned
/// in its place.
pub fn parse(fragment: &str) -> Result<ParseNode> {
    let mut cursor = Cursor::new(fragment);
    cursor.skip_spaces();
    let node = match cursor.value() {
        Some(node) => node,
        None => return Err(cursor.parse_error()),
    };
    cursor.skip_spaces();
    if !cursor.at_end() {
        return Err(cursor.parse_error());
    }
    Ok(node)
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn parse_error(&self) -> ExtractError {
        let snippet: String = self.rest().chars().take(40).collect();
        ExtractError::Parse {
            position: self.pos,
            snippet,
        }
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn skip_spaces(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    /// Consumes up to (not including) the first occurrence of `terminator`,
    /// then the terminator itself. Returns the skipped span.
    fn take_until(&mut self, terminator: &str) -> Option<&'a str> {
        let offset = self.rest().find(terminator)?;
        let span = &self.rest()[..offset];
        self.pos += offset + terminator.len();
        Some(span)
    }

    /// One grammar alternative, first match wins.
    fn value(&mut self) -> Option<ParseNode> {
        self.comment()
            .or_else(|| self.reference())
            .or_else(|| self.self_closing("hr"))
            .or_else(|| self.self_closing("br"))
            .or_else(|| self.xml_tag())
            .or_else(|| self.macro_node())
            .or_else(|| self.image())
            .or_else(|| self.link())
            .or_else(|| self.external_link())
            .or_else(|| self.bold())
            .or_else(|| self.italics())
            .or_else(|| self.text())
    }

    fn comment(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("<!--") {
            return None;
        }
        match self.take_until("-->") {
            Some(contents) => Some(ParseNode::Comment(contents.to_string())),
            None => {
                self.pos = mark;
                None
            }
        }
    }

    /// `<ref ...>...</ref>` or self-closing `<ref .../>`; contents stay opaque.
    fn reference(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if self.eat("<ref") {
            if let Some(contents) = self.take_until("/ref>") {
                return Some(ParseNode::Ref(contents.to_string()));
            }
            self.pos = mark;
        }

        // Self-closing form with attributes.
        if self.eat("<") {
            self.skip_spaces();
            if self.eat("ref") {
                self.skip_spaces();
                if let Some(contents) = self.take_until("/>") {
                    if !contents.is_empty() {
                        return Some(ParseNode::Ref(contents.to_string()));
                    }
                }
            }
        }
        self.pos = mark;
        None
    }

    /// `<tag>`, `<tag/>`, `<tag />`: the attribute-free self-closing forms
    /// used for line breaks and rules.
    fn self_closing(&mut self, tag: &str) -> Option<ParseNode> {
        let mark = self.pos;
        if self.eat("<") {
            self.skip_spaces();
            if self.eat(tag) {
                self.skip_spaces();
                self.eat("/");
                if self.eat(">") {
                    return Some(ParseNode::XmlTag {
                        tag: tag.to_string(),
                        children: Vec::new(),
                    });
                }
            }
        }
        self.pos = mark;
        None
    }

    fn tag_name(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(&rest[..end])
    }

    fn xml_tag(&mut self) -> Option<ParseNode> {
        if let Some(node) = self.xml_pair() {
            return Some(node);
        }
        self.xml_self_closing_any()
    }

    /// `<tag ...> children </tag>` with children parsed recursively, at least one.
    fn xml_pair(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("<") {
            return None;
        }
        let Some(tag) = self.tag_name() else {
            self.pos = mark;
            return None;
        };
        let tag = tag.to_string();
        if self.take_until(">").is_none() {
            self.pos = mark;
            return None;
        }

        let mut children = Vec::new();
        loop {
            self.skip_spaces();
            match self.value() {
                Some(child) => children.push(child),
                None => break,
            }
        }
        self.skip_spaces();

        if children.is_empty() {
            self.pos = mark;
            return None;
        }

        // Closing tag must match the opening one.
        if self.eat("</") {
            if let Some(close) = self.tag_name() {
                if close == tag && self.take_until(">").is_some() {
                    return Some(ParseNode::XmlTag { tag, children });
                }
            }
        }
        self.pos = mark;
        None
    }

    /// Generic `<tag ... />`.
    fn xml_self_closing_any(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("<") {
            return None;
        }
        let Some(tag) = self.tag_name() else {
            self.pos = mark;
            return None;
        };
        let tag = tag.to_string();
        if self.take_until("/>").is_some() {
            return Some(ParseNode::XmlTag {
                tag,
                children: Vec::new(),
            });
        }
        self.pos = mark;
        None
    }

    /// `{{name | arg | key=value | ...}}`
    fn macro_node(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("{{") {
            return None;
        }
        self.skip_spaces();
        let Some(ParseNode::Text(name)) = self.text() else {
            self.pos = mark;
            return None;
        };
        let arguments = self.macro_arguments();
        self.skip_spaces();
        if !self.eat("}}") {
            self.pos = mark;
            return None;
        }
        Some(ParseNode::Macro { name, arguments })
    }

    fn macro_arguments(&mut self) -> Vec<MacroArgument> {
        let mut arguments = Vec::new();
        while let Some(argument) = self.macro_argument() {
            arguments.push(argument);
        }
        arguments
    }

    fn macro_argument(&mut self) -> Option<MacroArgument> {
        let mark = self.pos;
        self.skip_spaces();
        if !self.eat("|") {
            self.pos = mark;
            return None;
        }
        self.skip_spaces();

        if let Some(key) = self.argument_key() {
            let values = self.values();
            return Some(MacroArgument {
                key: Some(key),
                values,
            });
        }

        // Positional argument; may be empty.
        let values = self.values();
        Some(MacroArgument { key: None, values })
    }

    /// `key =` where keys are alphanumerics, underscores and spaces. Interior
    /// spaces are part of the key; spaces around it are not.
    fn argument_key(&mut self) -> Option<String> {
        let mark = self.pos;
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == ' '))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        let key = rest[..end].trim();
        self.pos += end;
        self.skip_spaces();
        if self.eat("=") {
            self.skip_spaces();
            Some(key.to_string())
        } else {
            self.pos = mark;
            None
        }
    }

    /// One-or-more values, each followed by optional whitespace.
    fn values(&mut self) -> Vec<ParseNode> {
        let mut values = Vec::new();
        while let Some(value) = self.value() {
            values.push(value);
            self.skip_spaces();
        }
        values
    }

    /// `[[File:name | arg | ...]]`
    fn image(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("[[File:") {
            return None;
        }
        self.skip_spaces();
        let Some(ParseNode::Text(name)) = self.text() else {
            self.pos = mark;
            return None;
        };
        let arguments = self.macro_arguments();
        self.skip_spaces();
        if !self.eat("]]") {
            self.pos = mark;
            return None;
        }
        Some(ParseNode::Image { name, arguments })
    }

    /// `[[page]]` or `[[page|alias]]`; the alias may itself carry markup.
    fn link(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("[[") {
            return None;
        }
        self.skip_spaces();
        let Some(ParseNode::Text(page)) = self.text() else {
            self.pos = mark;
            return None;
        };

        let alias = if self.eat("|") {
            let values = self.values();
            if values.is_empty() {
                self.pos = mark;
                return None;
            }
            Some(values)
        } else {
            None
        };

        self.skip_spaces();
        if !self.eat("]]") {
            self.pos = mark;
            return None;
        }
        Some(ParseNode::Link { page, alias })
    }

    /// `[url rest-until-closing-bracket]`
    fn external_link(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("[") {
            return None;
        }
        self.skip_spaces();

        let rest = self.rest();
        let url_end = rest
            .char_indices()
            .find(|(_, c)| *c == ' ' || *c == ']' || *c == '\n' || *c == '\r')
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if url_end == 0 {
            self.pos = mark;
            return None;
        }
        let url = rest[..url_end].to_string();
        self.pos += url_end;

        let alias = match self.take_until("]") {
            Some(span) => {
                let trimmed = span.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => {
                self.pos = mark;
                return None;
            }
        };

        Some(ParseNode::ExternalLink { url, alias })
    }

    fn bold(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("'''") {
            return None;
        }
        let children = self.surrounded_values();
        if self.eat("'''") {
            Some(ParseNode::Bold(children))
        } else {
            self.pos = mark;
            None
        }
    }

    fn italics(&mut self) -> Option<ParseNode> {
        let mark = self.pos;
        if !self.eat("''") {
            return None;
        }
        let children = self.surrounded_values();
        if self.eat("''") {
            Some(ParseNode::Italics(children))
        } else {
            self.pos = mark;
            None
        }
    }

    fn surrounded_values(&mut self) -> Vec<ParseNode> {
        let mut values = Vec::new();
        while let Some(value) = self.value() {
            values.push(value);
        }
        values
    }

    /// Maximal run of plain-text characters. Single `{`, `}` and `'` are
    /// ordinary text; delimiters and paired braces/quotes are not.
    fn text(&mut self) -> Option<ParseNode> {
        let rest = self.rest();
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            let ahead = &rest[i..];
            if ahead.starts_with("''") || ahead.starts_with("{{") || ahead.starts_with("}}") {
                end = i;
                break;
            }
            if matches!(c, '[' | ']' | '\r' | '\n' | '|' | '<' | '>') {
                end = i;
                break;
            }
        }
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(ParseNode::Text(rest[..end].to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::ast::ParseNode::*;

    fn parse_ok(input: &str) -> ParseNode {
        parse(input).expect(input)
    }

    #[test]
    fn parses_links() {
        let node = parse_ok("[[British Bull Dog revolver|Bulldog Revolver]]");
        match node {
            Link { page, alias } => {
                assert_eq!(page, "British Bull Dog revolver");
                assert_eq!(alias, Some(vec![Text("Bulldog Revolver".into())]));
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn parses_macro_with_keyed_argument() {
        let node = parse_ok("{{tmpl|k=v}}");
        match node {
            Macro { name, arguments } => {
                assert_eq!(name, "tmpl");
                assert_eq!(arguments.len(), 1);
                assert_eq!(arguments[0].key.as_deref(), Some("k"));
                assert_eq!(arguments[0].values, vec![Text("v".into())]);
            }
            other => panic!("expected macro, got {other:?}"),
        }
    }

    #[test]
    fn parses_link_inside_macro_argument() {
        let node = parse_ok("{{attack| type = [[Assassination]]}}");
        match node {
            Macro { arguments, .. } => {
                assert_eq!(arguments[0].key.as_deref(), Some("type"));
                assert_eq!(
                    arguments[0].values,
                    vec![Link {
                        page: "Assassination".into(),
                        alias: None
                    }]
                );
            }
            other => panic!("expected macro, got {other:?}"),
        }
    }

    #[test]
    fn trims_spaces_around_argument_keys() {
        let node = parse_ok("{{attack| death place = Washington}}");
        match node {
            Macro { arguments, .. } => {
                assert_eq!(arguments[0].key.as_deref(), Some("death place"));
            }
            other => panic!("expected macro, got {other:?}"),
        }
    }

    #[test]
    fn parses_external_link_with_label() {
        let node = parse_ok("[http://example.org/a some label]");
        assert_eq!(
            node,
            ExternalLink {
                url: "http://example.org/a".into(),
                alias: Some("some label".into()),
            }
        );
    }

    #[test]
    fn parses_positional_argument_with_plain_text() {
        let node = parse_ok("{{x|Assassination of James A. Garfield}}");
        match node {
            Macro { arguments, .. } => {
                assert_eq!(arguments[0].key, None);
                assert_eq!(
                    arguments[0].values,
                    vec![Text("Assassination of James A. Garfield".into())]
                );
            }
            other => panic!("expected macro, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_macro_argument() {
        parse_ok("{{x| title = {{nowrap|Assassination of James A. Garfield}}}}");
        parse_ok("{{x| coordinates = {{Coord|38|53|31|N|77|01|13|W|region:US-DC_type:event|display=inline,title}}}}");
    }

    #[test]
    fn parses_xml_pair() {
        let node = parse_ok("<small>lol</small>");
        assert_eq!(
            node,
            XmlTag {
                tag: "small".into(),
                children: vec![Text("lol".into())]
            }
        );
    }

    #[test]
    fn parses_refs() {
        assert_eq!(parse_ok("<ref>lol</ref>"), Ref(">lol<".into()));
        assert!(matches!(
            parse_ok(r#"<ref somemeta="garbage">lol</ref>"#),
            Ref(_)
        ));
        assert!(matches!(parse_ok(r#"<ref name="x" />"#), Ref(_)));
    }

    #[test]
    fn parses_line_breaks() {
        assert_eq!(
            parse_ok("<br/>"),
            XmlTag {
                tag: "br".into(),
                children: vec![]
            }
        );
        assert_eq!(
            parse_ok("<br />"),
            XmlTag {
                tag: "br".into(),
                children: vec![]
            }
        );
        assert_eq!(
            parse_ok("<br>"),
            XmlTag {
                tag: "br".into(),
                children: vec![]
            }
        );
    }

    #[test]
    fn parses_comments() {
        assert_eq!(parse_ok("<!--lol-->"), Comment("lol".into()));
    }

    #[test]
    fn parses_location_argument_with_break() {
        parse_ok(
            "{{x| location = [[Baltimore and Potomac Railroad Station]]<br />[[Washington, D.C.]], U.S.}}",
        );
    }

    #[test]
    fn parses_caption_with_ref_and_external_link() {
        parse_ok(concat!(
            "{{x| caption = President Garfield with [[James G. Blaine]] after being shot by ",
            "[[Charles J. Guiteau]]<ref>Cheney, Lynne Vincent. ",
            "[http://www.americanheritage.com/articles/magazine/ah/1975/6/1975_6_42.shtml ",
            "\"Mrs. Frank Leslie's Illustrated Newspaper\"] {{webarchive |url=https://example.org ",
            "|date=September 29, 2007 }}. American Heritage Magazine. October 1975. Volume 26, ",
            "Issue 6. ''URL retrieved on January 24, 2007.''</ref>}}"
        ));
    }

    #[test]
    fn parses_full_infobox() {
        let infobox = r#"{{Infobox civilian attack
| title = {{nowrap|Assassination of James A. Garfield}}
| image = Garfield assassination engraving cropped.jpg
| location = [[Baltimore and Potomac Railroad Station]]<br />[[Washington, D.C.]], U.S.
| coordinates = {{Coord|38|53|31|N|77|01|13|W|region:US-DC_type:event|display=inline,title}}
| target = [[James A. Garfield]]
| date = July 2, 1881, {{age|1881
|07|02}} years ago
| time = 9:30&nbsp;am
| timezone = [[Local mean time]]
| type = [[Assassination]]
| weapons = [[British Bull Dog revolver|Bulldog Revolver]]
| fatalities = 1 (Garfield; died on September 19, 1881 as a result of infection)
| injuries = None
| perp = [[Charles J. Guiteau]]
| motive = Retribution for perceived failure to reward campaign support
}}
"#;
        let node = parse_ok(infobox);
        match node {
            Macro { name, arguments } => {
                assert_eq!(name, "Infobox civilian attack");
                assert_eq!(arguments.len(), 14);
            }
            other => panic!("expected macro, got {other:?}"),
        }
    }

    #[test]
    fn parses_comment_followed_by_macro_in_argument() {
        let node = parse_ok("{{x|result= <!--DO NOT ALTER WITHOUT CONSENSUS-->\n{{Collapsible list}}\n}}");
        match node {
            Macro { arguments, .. } => {
                assert_eq!(arguments[0].key.as_deref(), Some("result"));
                assert_eq!(arguments[0].values.len(), 2);
            }
            other => panic!("expected macro, got {other:?}"),
        }
    }

    #[test]
    fn parses_refn_with_nested_link() {
        parse_ok("{{refn|[[Anglo-French War (1778–83)|(from 1778)]]}}");
        parse_ok("{{refn|The term refers to the [[First French Empire|empire under Napoleon]], but it is used here for brevity}}");
    }

    #[test]
    fn parses_empty_macro_arguments() {
        match parse_ok("{{lol|}}") {
            Macro { arguments, .. } => {
                assert_eq!(arguments.len(), 1);
                assert_eq!(arguments[0].key, None);
                assert!(arguments[0].values.is_empty());
            }
            other => panic!("expected macro, got {other:?}"),
        }
        match parse_ok("{{lol|xyz=}}") {
            Macro { arguments, .. } => {
                assert_eq!(arguments[0].key.as_deref(), Some("xyz"));
                assert!(arguments[0].values.is_empty());
            }
            other => panic!("expected macro, got {other:?}"),
        }
    }

    #[test]
    fn parses_image_tags() {
        parse_ok("[[File:Why This.jpg]]");
        parse_ok("[[File:Why This.jpg|thumb]]");
        parse_ok("[[File:Why This.jpg|thumb|center|page=Lol|Some Image]]");
        parse_ok("[[File:Wappen Brandenburg-Ansbach.svg|19px|link=]] ");
    }

    #[test]
    fn parses_bold_inside_link_alias() {
        let node = parse_ok("[[test|'''lol''']]");
        match node {
            Link { alias, .. } => {
                assert_eq!(alias, Some(vec![Bold(vec![Text("lol".into())])]));
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn single_braces_and_quotes_are_plain_text() {
        assert_eq!(parse_ok("Men's {lone} brace"), Text("Men's {lone} brace".into()));
    }

    #[test]
    fn unparseable_input_is_an_error_not_an_empty_parse() {
        assert!(parse("|").is_err());
        assert!(parse("").is_err());
        assert!(parse("{{unterminated").is_err());
    }
}

// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
use peg::{error::ParseError, str::LineCol};

pub mod ast;

pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_one_of(name: &str, names: &[&str]) -> bool {
    names.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn is_void_element(name: &str) -> bool {
    is_one_of(name, VOID_ELEMENTS)
}

fn is_raw_text_element(name: &str) -> bool {
    is_one_of(name, RAW_TEXT_ELEMENTS)
}

peg::parser! {
    grammar parser() for str {
        use crate::ast::*;

        pub(crate) rule document() -> Document =
            content:(node()*) { Document { content } }

        rule node() -> Node =
            c:comment() { Node::Comment(c) }
            / d:directive() { Node::Directive(d) }
            / e:element() { Node::Element(e) }
            / t:text() { Node::Text(t) }

        rule comment() -> Comment =
            pos:pos() "<!--" content:$((!"-->" [_])*) "-->" {
                Comment { pos, content: content.into() }
            }

        rule directive() -> Directive =
            pos:pos() "<?" content:$((!"?>" [_])*) "?>" {
                Directive { pos, content: content.into() }
            }
            / pos:pos() "<!" content:$((!">" [_])*) ">" {
                Directive { pos, content: content.into() }
            }

        rule element() -> Element =
            pos:pos()
            "<"
            name:tag_name()
            attribs:(attribute()*)
            whitespace()
            children:element_body(name) {
                Element {
                    pos,
                    name: name.into(),
                    attribs,
                    children,
                }
            }

        rule element_body(name: &str) -> Vec<Node> =
            "/>" { Vec::new() }
            / ">" void_element(name) { Vec::new() }
            / ">" raw_text_element(name) text:raw_text(name) end_tag(name) {
                text.into_iter().map(Node::Text).collect()
            }
            / ">" children:(!end_tag(name) n:node() { n })* end_tag(name) { children }

        rule void_element(name: &str) =
            "" {? if crate::is_void_element(name) { Ok(()) } else { Err("void element") } }

        rule raw_text_element(name: &str) =
            "" {? if crate::is_raw_text_element(name) { Ok(()) } else { Err("raw text element") } }

        rule raw_text(name: &str) -> Option<Text> =
            pos:pos() data:$((!end_tag(name) [_])*) {
                if data.is_empty() {
                    None
                } else {
                    Some(Text { pos, data: data.into() })
                }
            }

        rule end_tag(name: &str) =
            "</" end_name:tag_name() whitespace() ">"
            {?
                if end_name.eq_ignore_ascii_case(name) {
                    Ok(())
                } else {
                    Err("matching end tag")
                }
            }

        rule tag_name() -> &'input str =
            $(['a'..='z' | 'A'..='Z'] ['a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | ':' | '.']*)

        rule attribute() -> Attribute =
            space()
            pos:pos()
            name:attribute_name()
            value:(whitespace() "=" whitespace() v:attribute_value() { v })? {
                Attribute {
                    pos,
                    name: name.into(),
                    value,
                }
            }

        rule attribute_name() -> &'input str =
            $((!([' ' | '\t' | '\r' | '\n' | '/' | '>' | '=' | '"' | '\''] / "<") [_])+)

        rule attribute_value() -> String =
            "\"" v:$((!"\"" [_])*) "\"" { v.into() }
            / "'" v:$((!"'" [_])*) "'" { v.into() }
            / v:$((!([' ' | '\t' | '\r' | '\n' | '>'] / "/>") [_])+) { v.into() }

        rule text() -> Text =
            pos:pos() data:$((!tag_start() [_])+) { Text { pos, data: data.into() } }

        // a `<` that doesn't start markup is ordinary text
        rule tag_start() =
            "<" ['a'..='z' | 'A'..='Z' | '/' | '!' | '?']

        rule space() =
            quiet!{[' ' | '\t' | '\r' | '\n']+}

        rule whitespace() =
            quiet!{[' ' | '\t' | '\r' | '\n']*}

        rule pos() -> Pos =
            p:position!() { Pos::new(p) }
    }
}

pub fn parse(input: &str) -> Result<ast::Document, ParseError<LineCol>> {
    parser::document(input)
}

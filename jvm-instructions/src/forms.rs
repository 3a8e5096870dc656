// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

use crate::{
    ast::InstructionForm,
    sections::{significant_nodes, Slot},
};
use markup_parser::ast::{GetPos, Node, Pos};

peg::parser! {
    grammar form_text() for str {
        // `iconst_0 = 3 (0x3)`
        pub rule assignment() -> (&'input str, &'input str) =
            whitespace() name:mnemonic() whitespace() o:opcode_assignment() { (name, o) }

        // ` = 16 (0x10)`
        pub rule opcode_assignment() -> &'input str =
            whitespace() "=" whitespace() opcode:opcode() [_]* { opcode }

        rule mnemonic() -> &'input str =
            $(['a'..='z' | 'A'..='Z' | '0'..='9' | '_']+)

        rule opcode() -> &'input str =
            $(['0'..='9']+)

        rule whitespace() =
            [' ' | '\t' | '\r' | '\n' | '\u{a0}']*
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedForm {
    pub pos: Pos,
    pub text: String,
}

impl GetPos for MalformedForm {
    fn pos(&self) -> Pos {
        self.pos
    }
}

// `<mnemonic> = <opcode>` as plain text, or a mnemonic label then `= <opcode>`
pub fn decode_form_row(row: &Node) -> Result<InstructionForm, MalformedForm> {
    let malformed = || MalformedForm {
        pos: row.pos(),
        text: row.text_content(),
    };
    let cells: Vec<&Node> = match row {
        Node::Element(row) => significant_nodes(&row.children).collect(),
        Node::Text(_) => vec![row],
        Node::Comment(_) | Node::Directive(_) => return Err(malformed()),
    };
    let (name, opcode) = match *cells {
        [Node::Text(text), ..] => {
            let (name, opcode) = form_text::assignment(&text.data).map_err(|_| malformed())?;
            (name.to_string(), opcode)
        }
        [Node::Element(label), Node::Text(text), ..] => {
            let opcode = form_text::opcode_assignment(&text.data).map_err(|_| malformed())?;
            (label.text_content(), opcode)
        }
        _ => return Err(malformed()),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }
    Ok(InstructionForm {
        name: name.into(),
        opcode: opcode.into(),
    })
}

pub fn decode_forms(forms: Option<&Slot<'_>>) -> Result<Vec<InstructionForm>, MalformedForm> {
    forms
        .map_or(&[][..], |forms| forms.nodes.get(1..).unwrap_or_default())
        .iter()
        .map(|row| decode_form_row(row))
        .collect()
}

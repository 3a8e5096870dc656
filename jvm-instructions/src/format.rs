// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

//! Operand layout from an instruction's `Format` subsection.
//!
//! The format is written as a row of tokens, one per encoded byte: the
//! mnemonic, then operands. Operands wider than a byte are written as a run of
//! tokens with the same stem and suffixes `1`, `2`, ... (`indexbyte1
//! indexbyte2`), which are grouped back into one operand here.

use crate::{
    ast::{Operand, TypeTag},
    diagnostic::{Diagnostic, DiagnosticKind},
    sections::{significant_nodes, Slot},
};
use markup_parser::ast::Node;

pub const CONSTANT_LOAD_INSTRUCTION: &str = "ldc";

pub const WIDE_INSTRUCTION: &str = "wide";

pub fn strip_numeric_suffix(token: &str) -> &str {
    token.trim_end_matches(|ch: char| ch.is_ascii_digit())
}

struct OperandGroup<'a> {
    first: &'a str,
    stem: &'a str,
    width: usize,
}

impl<'a> OperandGroup<'a> {
    fn new(token: &'a str) -> Self {
        Self {
            first: token,
            stem: strip_numeric_suffix(token),
            width: 1,
        }
    }
    fn is_continued_by(&self, token: &str) -> bool {
        &self.first[self.stem.len()..] == "1"
            && token.strip_prefix(self.stem) == Some(&*(self.width + 1).to_string())
    }
    fn finish(self) -> Operand {
        Operand::new(self.stem, self.width)
    }
}

/// A run `stem1 stem2 ... stemN` becomes one operand `stem` of width `N`.
/// Other tokens are one byte wide and also lose their numeric suffix, so a
/// literal `0` byte becomes the operand `""`.
pub fn group_operands<'a, I: IntoIterator<Item = &'a str>>(tokens: I) -> Vec<Operand> {
    let mut operands = Vec::new();
    let mut group: Option<OperandGroup<'a>> = None;
    for token in tokens {
        if let Some(group) = group.as_mut().filter(|g| g.is_continued_by(token)) {
            group.width += 1;
            continue;
        }
        operands.extend(group.take().map(OperandGroup::finish));
        group = Some(OperandGroup::new(token));
    }
    operands.extend(group.map(OperandGroup::finish));
    operands
}

pub fn operand_type(instruction: &str, operand: &Operand) -> Option<TypeTag> {
    let tag = match &*operand.name {
        "index" if instruction == CONSTANT_LOAD_INSTRUCTION => "constref",
        "index" => "varref",
        "indexbyte" => "constref",
        "branchbyte" => "offset",
        "dimensions" => "uint8",
        "const" => "byte",
        "byte" if operand.width == 1 => "byte",
        "byte" => "short",
        "atype" => "atype",
        "" => "lit0",
        "count" => "arg_count",
        _ => return None,
    };
    Some(tag.into())
}

pub fn is_wideable(notes: Option<&Slot<'_>>) -> bool {
    let notes = match notes {
        Some(notes) => notes,
        None => return false,
    };
    notes
        .nodes
        .iter()
        .filter_map(|node| node.element())
        .filter(|p| p.is("p", "norm"))
        .flat_map(|p| p.element_children())
        .any(|a| a.name == "a" && a.attr("title") == Some(WIDE_INSTRUCTION))
}

fn format_tokens(format: &Slot<'_>) -> Result<Vec<String>, &'static str> {
    let layout = format
        .nodes
        .get(1)
        .and_then(|node| node.element())
        .ok_or("no layout after the title")?;
    let line = significant_nodes(&layout.children)
        .next()
        .and_then(Node::element)
        .ok_or("no token line in the layout")?;
    let tokens: Vec<String> = line
        .children
        .iter()
        .filter_map(Node::element)
        .filter(|e| e.name == "span")
        .map(|span| span.text_content().trim().to_string())
        .collect();
    if tokens.is_empty() {
        return Err("no mnemonic token");
    }
    Ok(tokens)
}

pub fn decode_format(
    instruction: &str,
    format: &Slot<'_>,
    wideable: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Vec<Operand>> {
    let tokens = match format_tokens(format) {
        Ok(tokens) => tokens,
        Err(reason) => {
            diagnostics.push(Diagnostic::new(
                format,
                instruction,
                DiagnosticKind::MalformedFormat { reason },
            ));
            return None;
        }
    };
    let mut operands = group_operands(tokens.iter().skip(1).map(String::as_str));
    for operand in &mut operands {
        operand.operand_type = operand_type(instruction, operand);
        if operand.operand_type.is_none() {
            diagnostics.push(Diagnostic::new(
                format,
                instruction,
                DiagnosticKind::UnknownOperand {
                    operand: operand.name.clone(),
                },
            ));
        }
        if wideable {
            operand.wide_width = Some(operand.width * 2);
        }
    }
    Some(operands)
}

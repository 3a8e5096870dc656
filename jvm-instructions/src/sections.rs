// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use hashbrown::HashMap;
use markup_parser::ast::{Document, Element, GetPos, Node, Pos};

pub const EXECUTION_SECTION_CLASS: &str = "section-execution";

pub fn significant_nodes(nodes: &[Node]) -> impl Iterator<Item = &Node> + Clone {
    nodes.iter().filter(|node| match node {
        Node::Element(_) => true,
        Node::Text(_) => !node.is_whitespace(),
        Node::Comment(_) | Node::Directive(_) => false,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct InstructionSection<'doc> {
    pub name: &'doc str,
    pub element: &'doc Element,
}

impl GetPos for InstructionSection<'_> {
    fn pos(&self) -> Pos {
        self.element.pos
    }
}

/// A section whose title was already seen replaces the earlier one at the
/// earlier one's position.
pub fn select_sections<'doc>(
    document: &'doc Document,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<InstructionSection<'doc>> {
    let mut sections: Vec<InstructionSection<'doc>> = Vec::new();
    let mut indexes: HashMap<&str, usize> = HashMap::new();
    for element in document.content.iter().filter_map(Node::element) {
        if element.attr("class") != Some(EXECUTION_SECTION_CLASS) {
            continue;
        }
        let name = match element.attr("title") {
            Some(name) => name,
            None => {
                diagnostics.push(Diagnostic {
                    pos: element.pos,
                    instruction: None,
                    kind: DiagnosticKind::UntitledSection,
                });
                continue;
            }
        };
        let section = InstructionSection { name, element };
        match indexes.get(name) {
            Some(&index) => {
                let previous = &mut sections[index];
                diagnostics.push(Diagnostic::new(
                    element,
                    name,
                    DiagnosticKind::DuplicateSection {
                        previous: previous.pos(),
                    },
                ));
                *previous = section;
            }
            None => {
                indexes.insert(name, sections.len());
                sections.push(section);
            }
        }
    }
    sections
}

#[derive(Debug, Clone)]
pub struct Slot<'doc> {
    pub element: &'doc Element,
    pub nodes: Vec<&'doc Node>,
}

impl<'doc> Slot<'doc> {
    fn new(element: &'doc Element) -> Self {
        Self {
            element,
            nodes: significant_nodes(&element.children).collect(),
        }
    }
}

impl GetPos for Slot<'_> {
    fn pos(&self) -> Pos {
        self.element.pos
    }
}

#[derive(Debug, Clone, Default)]
pub struct Subsections<'doc> {
    pub forms: Option<Slot<'doc>>,
    pub format: Option<Slot<'doc>>,
    pub operand_stack: Option<Slot<'doc>>,
    pub description: Option<Slot<'doc>>,
    pub runtime_exceptions: Option<Slot<'doc>>,
    pub notes: Option<Slot<'doc>>,
}

impl<'doc> Subsections<'doc> {
    pub fn classify(children: &'doc [Node]) -> Self {
        let mut retval = Self::default();
        for element in significant_nodes(children).filter_map(Node::element) {
            let slot = match element.attr("title") {
                Some("Forms") => &mut retval.forms,
                Some("Format") | Some("Format 1") => &mut retval.format,
                Some("Operand Stack") => &mut retval.operand_stack,
                Some("Description") => &mut retval.description,
                Some("Run-time Exceptions") => &mut retval.runtime_exceptions,
                Some("Notes") => &mut retval.notes,
                _ => continue,
            };
            *slot = Some(Slot::new(element));
        }
        retval
    }
}

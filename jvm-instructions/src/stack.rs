// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

use crate::{
    ast::{StackEffect, TypeTag},
    sections::Slot,
};
use markup_parser::ast::{Element, Node};

pub const DYNAMIC_INVOCATION_PREFIX: &str = "invoke";

pub fn has_dynamic_stack_effect(instruction: &str) -> bool {
    instruction.starts_with(DYNAMIC_INVOCATION_PREFIX)
}

fn is_type_label(element: &Element) -> bool {
    element.is("span", "emphasis") || element.is("code", "literal")
}

fn column_types(column: &Node) -> Vec<TypeTag> {
    column
        .element()
        .into_iter()
        .flat_map(|e| e.element_children())
        .filter(|e| is_type_label(e))
        .map(|label| label.text_content().trim().into())
        .collect()
}

// title, then the "before" and "after" columns
pub fn decode_stack(
    instruction: &str,
    operand_stack: Option<&Slot<'_>>,
) -> (StackEffect, Vec<TypeTag>) {
    let (popped, pushed) = match operand_stack.map(|v| v.nodes.get(1..).unwrap_or_default()) {
        Some([before, after]) => (column_types(before), column_types(after)),
        _ => (Vec::new(), Vec::new()),
    };
    let popped = if has_dynamic_stack_effect(instruction) {
        StackEffect::Dynamic
    } else {
        StackEffect::Types(popped)
    };
    (popped, pushed)
}

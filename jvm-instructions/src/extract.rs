// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

use crate::{
    ast::{Instruction, InstructionRecord, InstructionTable},
    diagnostic::{Diagnostic, DiagnosticKind, ParseError, Result},
    format, forms,
    sections::{select_sections, InstructionSection, Subsections},
    stack,
};
use log::{debug, trace};
use markup_parser::ast::Document;

pub const MANUAL_IMPLEMENTATION: &[&str] = &["lookupswitch", "tableswitch", "wide"];

pub fn is_manual(instruction: &str) -> bool {
    MANUAL_IMPLEMENTATION.contains(&instruction)
}

fn extract_instruction(
    section: &InstructionSection<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Instruction> {
    let name = section.name;
    let subsections = Subsections::classify(&section.element.children);
    let format = match &subsections.format {
        Some(format) => format,
        None => {
            diagnostics.push(Diagnostic::new(
                section,
                name,
                DiagnosticKind::MissingFormat,
            ));
            return None;
        }
    };
    let wideable = format::is_wideable(subsections.notes.as_ref());
    let args = format::decode_format(name, format, wideable, diagnostics)?;
    let (popped, pushed) = stack::decode_stack(name, subsections.operand_stack.as_ref());
    let forms = match forms::decode_forms(subsections.forms.as_ref()) {
        Ok(forms) => forms,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                e.pos,
                name,
                DiagnosticKind::MalformedForm { text: e.text },
            ));
            return None;
        }
    };
    Some(Instruction {
        wideable,
        args,
        popped,
        pushed,
        forms,
    })
}

pub fn extract(document: &Document) -> (InstructionTable, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut table = InstructionTable::new();
    let sections = select_sections(document, &mut diagnostics);
    debug!("found {} execution sections", sections.len());
    for section in &sections {
        if is_manual(section.name) {
            trace!("{}: manual", section.name);
            table.insert(section.name.into(), InstructionRecord::Manual);
            continue;
        }
        match extract_instruction(section, &mut diagnostics) {
            Some(instruction) => {
                trace!("{}: {:?}", section.name, instruction);
                table.insert(section.name.into(), InstructionRecord::Extracted(instruction));
            }
            None => debug!("{}: not extracted", section.name),
        }
    }
    debug!(
        "extracted {} instructions with {} diagnostics",
        table.len(),
        diagnostics.len()
    );
    (table, diagnostics)
}

pub fn parse(file_name: &str, input: &str) -> Result<(InstructionTable, Vec<Diagnostic>)> {
    let document = markup_parser::parse(input).map_err(|e| {
        ParseError::from_line_col(file_name, e.location, format!("expected: {}", e.expected))
    })?;
    Ok(extract(&document))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ast::StackEffect, diagnostic::Severity};
    use serde_json::json;

    const NOP: &str = concat!(
        r#"<div class="section-execution" title="nop">"#,
        r#"<div class="titlepage"><h3>nop</h3></div>"#,
        r#"<div class="section" title="Operation">Do nothing</div>"#,
        r#"<div class="section" title="Format"><div class="titlepage">Format</div>"#,
        r#"<div class="literallayout"><p><span class="emphasis"><em>nop</em></span><br></p></div>"#,
        r#"</div>"#,
        r#"<div class="section" title="Forms"><div class="titlepage">Forms</div>"#,
        r#"<p class="norm">nop = 0 (0x0)</p>"#,
        r#"</div>"#,
        r#"<div class="section" title="Operand Stack"><div class="titlepage">Operand Stack</div>"#,
        r#"<p class="norm">No change</p>"#,
        r#"</div>"#,
        r#"</div>"#,
    );

    const ILOAD: &str = concat!(
        r#"<div class="section-execution" title="iload">"#,
        r#"<div class="section" title="Format"><div class="titlepage">Format</div>"#,
        r#"<div class="literallayout"><p>"#,
        r#"<span class="emphasis"><em>iload</em></span><br>"#,
        r#"<span class="emphasis"><em>index</em></span><br>"#,
        r#"</p></div></div>"#,
        r#"<div class="section" title="Forms"><div class="titlepage">Forms</div>"#,
        r#"<p class="norm"><span class="emphasis"><em>iload</em></span> = 21 (0x15)</p>"#,
        r#"</div>"#,
        r#"<div class="section" title="Operand Stack"><div class="titlepage">Operand Stack</div>"#,
        r#"<p class="norm">... &#8594;</p>"#,
        r#"<p class="norm">..., <span class="emphasis"><em>value</em></span></p>"#,
        r#"</div>"#,
        r#"<div class="section" title="Notes"><div class="titlepage">Notes</div>"#,
        r#"<p class="norm">The <a class="xref" title="wide">wide</a> opcode can precede it.</p>"#,
        r#"</div>"#,
        r#"</div>"#,
    );

    const INVOKESTATIC: &str = concat!(
        r#"<div class="section-execution" title="invokestatic">"#,
        r#"<div class="section" title="Format"><div class="titlepage">Format</div>"#,
        r#"<div class="literallayout"><p>"#,
        r#"<span class="emphasis"><em>invokestatic</em></span><br>"#,
        r#"<span class="emphasis"><em>indexbyte1</em></span><br>"#,
        r#"<span class="emphasis"><em>indexbyte2</em></span><br>"#,
        r#"</p></div></div>"#,
        r#"<div class="section" title="Forms"><div class="titlepage">Forms</div>"#,
        r#"<p class="norm"><span class="emphasis"><em>invokestatic</em></span> = 184 (0xb8)</p>"#,
        r#"</div>"#,
        r#"<div class="section" title="Operand Stack"><div class="titlepage">Operand Stack</div>"#,
        r#"<p class="norm">..., [<span class="emphasis"><em>arg1</em></span>] &#8594;</p>"#,
        r#"<p class="norm">...</p>"#,
        r#"</div>"#,
        r#"</div>"#,
    );

    fn extract_str(input: &str) -> (InstructionTable, Vec<Diagnostic>) {
        parse("jvm_spec.html", input).unwrap()
    }

    #[test]
    fn test_nop_end_to_end() {
        let (table, diagnostics) = extract_str(NOP);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            json! {
                {
                    "nop": {
                        "args": [],
                        "popped": [],
                        "pushed": [],
                        "forms": [{ "name": "nop", "opcode": "0" }],
                        "wideable": false
                    }
                }
            }
        );
    }

    #[test]
    fn test_wideable_instruction() {
        let (table, diagnostics) = extract_str(ILOAD);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            json! {
                {
                    "iload": {
                        "wideable": true,
                        "args": [{ "name": "index", "width": 1, "type": "varref", "wwidth": 2 }],
                        "popped": [],
                        "pushed": ["value"],
                        "forms": [{ "name": "iload", "opcode": "21" }]
                    }
                }
            }
        );
    }

    #[test]
    fn test_dynamic_invocation() {
        let (table, _) = extract_str(INVOKESTATIC);
        let instruction = table.get("invokestatic").unwrap().instruction().unwrap();
        assert_eq!(instruction.popped, StackEffect::Dynamic);
        assert!(instruction.pushed.is_empty());
        assert_eq!(instruction.args.len(), 1);
        assert_eq!(instruction.args[0].width, 2);
        assert_eq!(instruction.args[0].wide_width, None);
        assert_eq!(
            serde_json::to_value(&instruction.popped).unwrap(),
            json!("dynamic")
        );
    }

    #[test]
    fn test_manual_instructions() {
        let input = concat!(
            r#"<div class="section-execution" title="tableswitch"></div>"#,
            "\n",
            r#"<div class="section-execution" title="wide"><div title="Format">?</div></div>"#,
        );
        let (table, diagnostics) = extract_str(input);
        assert!(diagnostics.is_empty());
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            json!({ "tableswitch": { "manual": true }, "wide": { "manual": true } })
        );
        assert!(table.iter().all(|(_, record)| record.is_manual()));
        assert!(is_manual("lookupswitch"));
        assert!(!is_manual("iload"));
    }

    #[test]
    fn test_missing_format() {
        let input = [
            NOP,
            r#"<div class="section-execution" title="foo"><div title="Forms"></div></div>"#,
        ]
        .concat();
        let (table, diagnostics) = extract_str(&input);
        assert!(table.contains("nop"));
        assert!(!table.contains("foo"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingFormat);
        assert_eq!(diagnostics[0].severity(), Severity::Error);
        assert!(diagnostics[0].skips_instruction());
        let line = diagnostics[0].located("jvm_spec.html", &input).to_string();
        assert!(line.contains("foo"), "{}", line);
    }

    #[test]
    fn test_malformed_form_skips_instruction() {
        let input = NOP.replace("nop = 0 (0x0)", "nop is zero");
        let (table, diagnostics) = extract_str(&input);
        assert!(table.is_empty());
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::MalformedForm {
                text: "nop is zero".into()
            }
        );
    }

    #[test]
    fn test_unknown_operand_keeps_instruction() {
        let input = ILOAD.replace("<em>index</em>", "<em>zork</em>");
        let (table, diagnostics) = extract_str(&input);
        let instruction = table.get("iload").unwrap().instruction().unwrap();
        assert_eq!(instruction.args[0].name, "zork");
        assert_eq!(instruction.args[0].operand_type, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_duplicate_section_last_wins() {
        let input = [NOP, ILOAD, NOP.replace("nop = 0", "nop = 7").as_str()].concat();
        let (table, diagnostics) = extract_str(&input);
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["nop", "iload"]);
        let forms = &table.get("nop").unwrap().instruction().unwrap().forms;
        assert_eq!(forms[0].opcode, "7");
        assert!(matches!(
            diagnostics[..],
            [Diagnostic {
                kind: DiagnosticKind::DuplicateSection { .. },
                ..
            }]
        ));
    }

    #[test]
    fn test_pretty_printed_document() {
        let input = NOP.replace("><", ">\n  <");
        let (table, diagnostics) = extract_str(&input);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let instruction = table.get("nop").unwrap().instruction().unwrap();
        assert!(instruction.args.is_empty());
        assert_eq!(instruction.forms[0].name, "nop");
    }

    #[test]
    fn test_unparsable_document() {
        let error = parse("jvm_spec.html", "<div>\n<p></div>").unwrap_err();
        assert_eq!(error.file_name, "jvm_spec.html");
        assert_eq!(error.line, 2);
        assert!(error.to_string().starts_with("jvm_spec.html:2:"));
    }
}

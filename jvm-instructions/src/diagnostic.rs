// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

use markup_parser::ast::{GetPos, Pos};
use peg::{str::LineCol, Parse};
use std::{error::Error, fmt};

#[derive(Debug)]
pub struct ParseError {
    pub file_name: String,
    pub line: usize,
    pub column: usize,
    pub byte_index: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn from_line_col(file_name: &str, line_col: LineCol, message: String) -> Self {
        ParseError {
            file_name: file_name.into(),
            line: line_col.line,
            column: line_col.column,
            byte_index: line_col.offset,
            message,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: error: {}",
            self.file_name, self.line, self.column, self.message
        )
    }
}

impl Error for ParseError {}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UntitledSection,
    DuplicateSection { previous: Pos },
    MissingFormat,
    MalformedFormat { reason: &'static str },
    UnknownOperand { operand: String },
    MalformedForm { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: Pos,
    pub instruction: Option<String>,
    pub kind: DiagnosticKind,
}

impl GetPos for Diagnostic {
    fn pos(&self) -> Pos {
        self.pos
    }
}

impl Diagnostic {
    pub fn new(pos: impl GetPos, instruction: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            pos: pos.pos(),
            instruction: Some(instruction.into()),
            kind,
        }
    }
    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::UntitledSection
            | DiagnosticKind::DuplicateSection { .. }
            | DiagnosticKind::UnknownOperand { .. } => Severity::Warning,
            DiagnosticKind::MissingFormat
            | DiagnosticKind::MalformedFormat { .. }
            | DiagnosticKind::MalformedForm { .. } => Severity::Error,
        }
    }
    /// true if the instruction this is about was left out of the table
    pub fn skips_instruction(&self) -> bool {
        self.severity() == Severity::Error
    }
    pub fn located<'a>(&'a self, file_name: &'a str, input: &str) -> Located<'a> {
        Located {
            diagnostic: self,
            file_name,
            line_col: input.position_repr(self.pos.byte_index),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.instruction.as_deref().unwrap_or("");
        match &self.kind {
            DiagnosticKind::UntitledSection => {
                write!(f, "execution section has no `title`, skipping it")
            }
            DiagnosticKind::DuplicateSection { previous } => write!(
                f,
                "`{}`: duplicate execution section replaces the one at byte {}",
                name, previous.byte_index
            ),
            DiagnosticKind::MissingFormat => {
                write!(f, "`{}`: no `Format` section, skipping instruction", name)
            }
            DiagnosticKind::MalformedFormat { reason } => write!(
                f,
                "`{}`: malformed `Format` section ({}), skipping instruction",
                name, reason
            ),
            DiagnosticKind::UnknownOperand { operand } => write!(
                f,
                "`{}`: unknown operand name {:?}, leaving its type unset",
                name, operand
            ),
            DiagnosticKind::MalformedForm { text } => write!(
                f,
                "`{}`: malformed `Forms` row {:?}, skipping instruction",
                name, text
            ),
        }
    }
}

pub struct Located<'a> {
    diagnostic: &'a Diagnostic,
    file_name: &'a str,
    line_col: LineCol,
}

impl fmt::Display for Located<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file_name,
            self.line_col.line,
            self.line_col.column,
            self.diagnostic.severity(),
            self.diagnostic
        )
    }
}

// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information
pub mod ast;
pub mod diagnostic;
pub mod extract;
pub mod format;
pub mod forms;
pub mod sections;
pub mod stack;

pub use diagnostic::{Diagnostic, DiagnosticKind, ParseError, Result, Severity};
pub use extract::{extract, parse};

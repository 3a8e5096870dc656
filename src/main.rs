// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

use jvm_instructions::{parse, Severity};
use log::{error, info, warn, LevelFilter};
use std::{
    env, fs,
    io::{self, Write},
    process,
};

const DEFAULT_INPUT: &str = "jvm_spec.html";

fn main() {
    env_logger::Builder::new()
        .filter(None, LevelFilter::Info)
        .init();
    let file_name = env::args().nth(1).unwrap_or_else(|| DEFAULT_INPUT.into());
    let input = match fs::read_to_string(&file_name) {
        Ok(input) => input,
        Err(e) => {
            error!("failed to read {:?}: {}", file_name, e);
            process::exit(1);
        }
    };
    let (table, diagnostics) = match parse(&file_name, &input) {
        Ok(v) => v,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    for diagnostic in &diagnostics {
        let located = diagnostic.located(&file_name, &input);
        match diagnostic.severity() {
            Severity::Warning => warn!("{}", located),
            Severity::Error => error!("{}", located),
        }
    }
    let manual = table.iter().filter(|(_, record)| record.is_manual()).count();
    let skipped = diagnostics.iter().filter(|v| v.skips_instruction()).count();
    info!(
        "{} instructions ({} manual), {} skipped",
        table.len(),
        manual,
        skipped
    );
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let written = serde_json::to_writer_pretty(&mut stdout, &table)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(stdout));
    if let Err(e) = written {
        error!("failed to write the instruction table: {}", e);
        process::exit(1);
    }
}

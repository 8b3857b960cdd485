// SPDX-License-Identifier: MIT
//
// quill: a line-oriented editor for text and markup documents.
//
// This is the main binary that wires the editing engine to a prompt:
//
//   quill-core  → buffers, markup trees, reversible commands, history
//   workspace   → open documents, one history each, file load/save
//   repl        → command-line parsing and dispatch
//   spell       → spell checking over document text
//   command_log → per-document record of editing commands
//   stats       → time spent with each document active
//   dir_tree    → directory listing
//
// Each input line flows through:
//
//   stdin/script → tokenize → dispatch → Command → History → Document
//   status/errors → stdout, diagnostics → stderr (tracing)

mod cli;
mod command_log;
mod dir_tree;
mod logging;
mod repl;
mod spell;
mod stats;
mod workspace;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use crate::cli::CliArgs;
use crate::repl::Repl;
use crate::workspace::Workspace;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::init(args.log_level.as_deref());

    let mut workspace = Workspace::new(args.options());
    for path in &args.paths {
        let name = path.to_string_lossy();
        if let Err(err) = workspace.load(&name) {
            eprintln!("Error: {err:#}");
        }
    }

    let stdout = io::stdout();
    let mut repl = Repl::new(workspace, stdout.lock());

    if let Some(script) = &args.script {
        let file = File::open(script)
            .with_context(|| format!("cannot open script {}", script.display()))?;
        repl.run(BufReader::new(file), false)?;
    } else {
        let stdin = io::stdin();
        let interactive = !args.quiet && stdin.is_terminal();
        if interactive {
            println!("quill {} (type `help` for commands)", env!("CARGO_PKG_VERSION"));
        }
        repl.run(stdin.lock(), interactive)?;
    }

    let unsaved = repl.workspace().unsaved();
    if !unsaved.is_empty() {
        warn!(documents = ?unsaved, "session ended with unsaved changes");
    }
    Ok(())
}

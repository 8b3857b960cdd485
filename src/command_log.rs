// SPDX-License-Identifier: MIT
//
// Per-document command log.
//
// When a document has logging on, every editing command line aimed at it
// is appended to a hidden `.<file name>.log` file next to the document,
// stamped with local time. This is a record for the user and is separate
// from the `tracing` diagnostics on stderr.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// First line of a text document that turns logging on when it is loaded.
pub const LOG_MARKER: &str = "#log";

/// Commands that change a document (or write it) and are therefore logged.
const LOGGED_COMMANDS: &[&str] = &[
    "append",
    "insert",
    "delete",
    "save",
    "insert-before",
    "append-child",
    "edit-id",
    "edit-text",
    "delete-element",
];

/// True if `command` lines are written to the log.
#[must_use]
pub fn is_logged(command: &str) -> bool {
    LOGGED_COMMANDS.contains(&command)
}

/// `dir/.name.log` for a document opened as `dir/name`.
#[must_use]
pub fn log_path(document: &str) -> PathBuf {
    let path = Path::new(document);
    let file = path
        .file_name()
        .map_or_else(|| document.into(), |name| name.to_string_lossy());
    path.with_file_name(format!(".{file}.log"))
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d %H:%M:%S").to_string()
}

/// Appends command lines to document logs.
#[derive(Debug, Default)]
pub struct CommandLog {
    /// Logs already written to this session.
    started: HashSet<PathBuf>,
}

impl CommandLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` to `document`'s log, opening the session in that log
    /// first if this is its first entry.
    ///
    /// # Errors
    ///
    /// The log file cannot be opened or written.
    pub fn record(&mut self, document: &str, line: &str) -> Result<()> {
        let path = log_path(document);
        let now = timestamp();

        let mut entry = String::new();
        if !self.started.contains(&path) {
            let _ = writeln!(entry, "session start at {now}");
        }
        let _ = writeln!(entry, "{now} {line}");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("cannot open log {}", path.display()))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("cannot write log {}", path.display()))?;
        self.started.insert(path);
        Ok(())
    }
}

/// The log for `document`, or `None` if nothing has been logged for it.
///
/// # Errors
///
/// The log exists but cannot be read.
pub fn read(document: &str) -> Result<Option<String>> {
    let path = log_path(document);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("cannot read log {}", path.display())),
    }
}

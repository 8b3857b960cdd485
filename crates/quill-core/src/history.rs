//! Undo/redo history: command-based edit tracking.
//!
//! Every successful edit is a [`Command`] pushed onto the undo stack. Undo
//! pops it, reverses it, and parks it on the redo stack; redo applies it
//! again and moves it back.
//!
//! # Usage
//!
//! ```text
//! history.execute(&mut doc, Command::insert(1, 1, "Start "))?;
//! history.undo(&mut doc)?;   // Undone: insert 1:1 "Start "
//! history.redo(&mut doc)?;   // Redone: insert 1:1 "Start "
//! ```
//!
//! Each document owns its own `History`; stacks are never shared.
//!
//! Executing a new command discards the redo stack (branching history is not
//! supported, any new edit after an undo drops the forward history). A
//! command that fails is never recorded, and leaves both stacks as they were.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, warn};

use crate::command::Command;
use crate::document::Document;
use crate::error::EditResult;

/// Default cap on the undo stack, like Vim's `undolevels`.
pub const DEFAULT_UNDO_LEVELS: usize = 1000;

// ---------------------------------------------------------------------------
// HistoryStatus
// ---------------------------------------------------------------------------

/// What a history operation did, phrased for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStatus {
    /// A new command ran. Holds the command's prompt form.
    Executed(String),
    /// The last command was reversed.
    Undone(String),
    /// The last undone command ran again.
    Redone(String),
    /// Undo requested with an empty undo stack.
    NothingToUndo,
    /// Redo requested with an empty redo stack.
    NothingToRedo,
}

impl HistoryStatus {
    /// `false` only for the two "nothing to do" statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::NothingToUndo | Self::NothingToRedo)
    }
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executed(cmd) => write!(f, "Done: {cmd}"),
            Self::Undone(cmd) => write!(f, "Undone: {cmd}"),
            Self::Redone(cmd) => write!(f, "Redone: {cmd}"),
            Self::NothingToUndo => f.write_str("Nothing to undo"),
            Self::NothingToRedo => f.write_str("Nothing to redo"),
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo history for one document.
///
/// Maintains two stacks: commands that can be undone and commands that can
/// be redone. The undo stack is capped at `limit` entries (0 = unbounded);
/// the oldest entries fall off first.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    limit: usize,
}

impl History {
    /// Create an empty history with the default limit.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LEVELS)
    }

    /// Create an empty history keeping at most `limit` undo steps
    /// (0 = unbounded).
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// The undo cap (0 = unbounded).
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Change the undo cap, dropping the oldest entries if the stack is
    /// already deeper.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// Apply `cmd` to `doc` and record it.
    ///
    /// # Errors
    ///
    /// The command's own error, unchanged. Nothing is recorded and the redo
    /// stack survives.
    pub fn execute(&mut self, doc: &mut Document, mut cmd: Command) -> EditResult<HistoryStatus> {
        if let Err(err) = cmd.apply(doc) {
            debug!(command = %cmd, error = %err, "command rejected");
            return Err(err);
        }

        let summary = cmd.to_string();
        self.redo_stack.clear();
        self.undo_stack.push_back(cmd);
        self.enforce_limit();
        debug!(
            command = %summary,
            undo_depth = self.undo_stack.len(),
            "command executed"
        );
        Ok(HistoryStatus::Executed(summary))
    }

    /// Reverse the most recent command.
    ///
    /// # Errors
    ///
    /// Only if the document was changed outside this history so the inverse
    /// no longer fits; the command stays on the undo stack.
    pub fn undo(&mut self, doc: &mut Document) -> EditResult<HistoryStatus> {
        let Some(cmd) = self.undo_stack.pop_back() else {
            return Ok(HistoryStatus::NothingToUndo);
        };
        if let Err(err) = cmd.reverse(doc) {
            self.undo_stack.push_back(cmd);
            return Err(err);
        }

        let summary = cmd.to_string();
        self.redo_stack.push(cmd);
        debug!(
            command = %summary,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "command undone"
        );
        Ok(HistoryStatus::Undone(summary))
    }

    /// Re-apply the most recently undone command.
    ///
    /// # Errors
    ///
    /// Only if the document was changed outside this history; the command
    /// stays on the redo stack.
    pub fn redo(&mut self, doc: &mut Document) -> EditResult<HistoryStatus> {
        let Some(mut cmd) = self.redo_stack.pop() else {
            return Ok(HistoryStatus::NothingToRedo);
        };
        if let Err(err) = cmd.apply(doc) {
            self.redo_stack.push(cmd);
            return Err(err);
        }

        let summary = cmd.to_string();
        self.undo_stack.push_back(cmd);
        self.enforce_limit();
        debug!(
            command = %summary,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "command redone"
        );
        Ok(HistoryStatus::Redone(summary))
    }

    /// True if there are commands that can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if there are commands that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of commands on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of commands on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget everything (after the document is reloaded from disk).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        if self.limit == 0 {
            return;
        }
        let excess = self.undo_stack.len().saturating_sub(self.limit);
        if excess > 0 {
            self.undo_stack.drain(..excess);
            warn!(dropped = excess, limit = self.limit, "undo history trimmed");
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Error types shared by the line buffer, the document tree, and commands.
//!
//! Every engine operation validates its arguments before touching any state,
//! so an [`EditError`] always means "nothing changed". Callers (the history,
//! the REPL) present the message and carry on: no error here is fatal.
//!
//! Empty undo/redo stacks are deliberately **not** errors; they are reported
//! through [`HistoryStatus`](crate::history::HistoryStatus).

use std::fmt;

use thiserror::Error;

use crate::document::DocumentKind;

/// Result alias used throughout the core.
pub type EditResult<T> = Result<T, EditError>;

// ---------------------------------------------------------------------------
// EditError
// ---------------------------------------------------------------------------

/// Why an edit was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A line, column, or length argument fell outside `[min, max]`.
    #[error("{what} {value} out of range (valid: {min}..={max})")]
    Range {
        what: Coordinate,
        value: usize,
        min: usize,
        max: usize,
    },

    /// An empty buffer accepts insertion only at `1:1`.
    #[error("empty buffer accepts insert only at 1:1, got {line}:{col}")]
    EmptyBufferInsert { line: usize, col: usize },

    /// A delete would run past the end of its line.
    #[error("cannot delete {len} chars at {line}:{col}: line has only {line_len}")]
    DeleteOverrun {
        line: usize,
        col: usize,
        len: usize,
        line_len: usize,
    },

    /// Text passed to a single-line operation contains `\n` or `\r`.
    #[error("text must not contain line breaks")]
    LineBreak,

    /// The id is already used somewhere in the tree.
    #[error("id already exists: {0}")]
    DuplicateId(String),

    /// No node carries this id.
    #[error("no element with id: {0}")]
    NotFound(String),

    /// The edit would break a structural rule of the tree.
    #[error("{0}")]
    Structure(StructureViolation),

    /// A command was aimed at the wrong kind of document.
    #[error("{expected} command cannot run on a {found} document")]
    WrongKind {
        expected: DocumentKind,
        found: DocumentKind,
    },

    /// Markup text could not be read back into a tree.
    #[error("markup parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
}

impl EditError {
    /// The broad category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Range { .. } | Self::EmptyBufferInsert { .. } | Self::DeleteOverrun { .. } => {
                ErrorKind::Range
            }
            Self::LineBreak | Self::WrongKind { .. } => ErrorKind::InvalidInput,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Structure(_) => ErrorKind::Structure,
            Self::Parse { .. } => ErrorKind::Parse,
        }
    }

    pub(crate) const fn range(what: Coordinate, value: usize, min: usize, max: usize) -> Self {
        Self::Range {
            what,
            value,
            min,
            max,
        }
    }
}

/// Error categories, coarse enough for callers to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Line/column/length out of bounds.
    Range,
    /// A structural or rename edit would duplicate an id.
    DuplicateId,
    /// A referenced id does not resolve.
    NotFound,
    /// Root immutability or leaf/branch exclusivity.
    Structure,
    /// Argument rejected before reaching an engine.
    InvalidInput,
    /// Malformed markup.
    Parse,
}

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// Which positional argument a [`EditError::Range`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Line,
    Column,
    Length,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Line => "line",
            Self::Column => "column",
            Self::Length => "length",
        })
    }
}

// ---------------------------------------------------------------------------
// StructureViolation
// ---------------------------------------------------------------------------

/// The tree rules an edit can break.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructureViolation {
    /// The root cannot be deleted.
    RootRemoval,
    /// The root has no siblings, so nothing can be inserted before it.
    RootSibling,
    /// A node with children cannot hold text (no mixed content).
    BranchText(String),
    /// A node holding text cannot take children (no mixed content).
    TextHolderChildren(String),
}

impl fmt::Display for StructureViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootRemoval => f.write_str("the root element cannot be deleted"),
            Self::RootSibling => f.write_str("cannot insert before the root element"),
            Self::BranchText(id) => {
                write!(f, "element {id} has children and cannot hold text")
            }
            Self::TextHolderChildren(id) => {
                write!(f, "element {id} holds text and cannot take children")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

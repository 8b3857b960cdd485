//! Reversible commands: one engine operation plus what it takes to undo it.
//!
//! A [`Command`] is built from literal arguments (line/column/text, or
//! tag/id/text) and later applied to a [`Document`]. On its first successful
//! apply it captures the state needed to invert itself; after that the
//! captured state never changes, so undo → redo → undo cycles replay the same
//! inverse.
//!
//! # Inverse encodings
//!
//! | Command                 | Captured on first apply       | Reverse                          |
//! |-------------------------|-------------------------------|----------------------------------|
//! | `append(text)`          | -                             | remove the last line             |
//! | `insert(l, c, text)`    | whether it created line 1     | `delete(l, c, chars(text))`      |
//! | `delete(l, c, n)`       | the removed substring         | `insert(l, c, removed)`          |
//! | any tree edit           | full clone of the tree        | replace the tree with the clone  |
//!
//! Line edits have a bounded blast radius, so a delta is enough. Structural
//! edits can move or drop whole subtrees, so they snapshot the tree.
//!
//! A command whose apply fails has changed nothing, neither the document
//! nor the command itself, and must not be recorded in history.

use std::fmt;

use crate::document::{Document, DocumentKind};
use crate::error::EditResult;
use crate::tree::Tree;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The forward operation with its literal arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Append {
        text: String,
    },
    Insert {
        line: usize,
        col: usize,
        text: String,
    },
    Delete {
        line: usize,
        col: usize,
        len: usize,
    },
    AppendChild {
        tag: String,
        new_id: String,
        parent_id: String,
        text: Option<String>,
    },
    InsertBefore {
        tag: String,
        new_id: String,
        target_id: String,
        text: Option<String>,
    },
    EditId {
        old_id: String,
        new_id: String,
    },
    EditText {
        id: String,
        text: String,
    },
    DeleteElement {
        id: String,
    },
}

/// State captured on first apply, sufficient to reverse the operation.
#[derive(Debug, Clone)]
enum Inverse {
    /// Undo an append by dropping the last line.
    PopLine,
    /// Undo an insert. `created_line` is set when the insert went into an
    /// empty buffer, in which case the whole line goes.
    Uninsert { created_line: bool },
    /// Undo a delete by putting `removed` back.
    Reinsert { removed: String },
    /// Undo a tree edit by restoring the pre-edit tree.
    Restore(Box<Tree>),
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A reversible edit over one document.
#[derive(Debug, Clone)]
pub struct Command {
    op: Op,
    inverse: Option<Inverse>,
}

impl Command {
    const fn from_op(op: Op) -> Self {
        Self { op, inverse: None }
    }

    // -- Text constructors --------------------------------------------------

    /// Append `text` as a new last line.
    #[must_use]
    pub fn append(text: impl Into<String>) -> Self {
        Self::from_op(Op::Append { text: text.into() })
    }

    /// Insert `text` at `line:col` (1-indexed).
    #[must_use]
    pub fn insert(line: usize, col: usize, text: impl Into<String>) -> Self {
        Self::from_op(Op::Insert {
            line,
            col,
            text: text.into(),
        })
    }

    /// Delete `len` chars at `line:col` (1-indexed).
    #[must_use]
    pub const fn delete(line: usize, col: usize, len: usize) -> Self {
        Self::from_op(Op::Delete { line, col, len })
    }

    // -- Tree constructors --------------------------------------------------

    /// Append a new element under `parent_id`; a leaf when `text` is given.
    #[must_use]
    pub fn append_child(
        tag: impl Into<String>,
        new_id: impl Into<String>,
        parent_id: impl Into<String>,
        text: Option<String>,
    ) -> Self {
        Self::from_op(Op::AppendChild {
            tag: tag.into(),
            new_id: new_id.into(),
            parent_id: parent_id.into(),
            text,
        })
    }

    /// Insert a new element right before `target_id`.
    #[must_use]
    pub fn insert_before(
        tag: impl Into<String>,
        new_id: impl Into<String>,
        target_id: impl Into<String>,
        text: Option<String>,
    ) -> Self {
        Self::from_op(Op::InsertBefore {
            tag: tag.into(),
            new_id: new_id.into(),
            target_id: target_id.into(),
            text,
        })
    }

    /// Rename element `old_id` to `new_id`.
    #[must_use]
    pub fn edit_id(old_id: impl Into<String>, new_id: impl Into<String>) -> Self {
        Self::from_op(Op::EditId {
            old_id: old_id.into(),
            new_id: new_id.into(),
        })
    }

    /// Replace the text of leaf element `id`.
    #[must_use]
    pub fn edit_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_op(Op::EditText {
            id: id.into(),
            text: text.into(),
        })
    }

    /// Delete element `id` with its subtree.
    #[must_use]
    pub fn delete_element(id: impl Into<String>) -> Self {
        Self::from_op(Op::DeleteElement { id: id.into() })
    }

    // -- Introspection ------------------------------------------------------

    /// The kind of document this command edits.
    #[must_use]
    pub const fn target_kind(&self) -> DocumentKind {
        match self.op {
            Op::Append { .. } | Op::Insert { .. } | Op::Delete { .. } => DocumentKind::Text,
            _ => DocumentKind::Markup,
        }
    }

    /// The command's name as typed at the prompt (`insert`, `edit-id`, ...).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.op {
            Op::Append { .. } => "append",
            Op::Insert { .. } => "insert",
            Op::Delete { .. } => "delete",
            Op::AppendChild { .. } => "append-child",
            Op::InsertBefore { .. } => "insert-before",
            Op::EditId { .. } => "edit-id",
            Op::EditText { .. } => "edit-text",
            Op::DeleteElement { .. } => "delete-element",
        }
    }

    /// True once a successful apply has captured the inverse.
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.inverse.is_some()
    }

    /// The text removed by a delete, once applied.
    #[must_use]
    pub fn removed_text(&self) -> Option<&str> {
        match &self.inverse {
            Some(Inverse::Reinsert { removed }) => Some(removed),
            _ => None,
        }
    }

    // -- Apply / reverse ----------------------------------------------------

    /// Perform the operation. The first successful apply captures the
    /// inverse; later applies (redo) reuse it.
    ///
    /// # Errors
    ///
    /// Whatever the engine reports, unchanged, plus
    /// [`EditError::WrongKind`](crate::error::EditError::WrongKind) when the
    /// document is of the other kind. The document is untouched on error.
    pub fn apply(&mut self, doc: &mut Document) -> EditResult<()> {
        let inverse = match &self.op {
            Op::Append { text } => {
                doc.buffer_mut()?.append(text)?;
                Inverse::PopLine
            }
            Op::Insert { line, col, text } => {
                let buf = doc.buffer_mut()?;
                let created_line = buf.is_empty();
                buf.insert(*line, *col, text)?;
                Inverse::Uninsert { created_line }
            }
            Op::Delete { line, col, len } => {
                let removed = doc.buffer_mut()?.delete(*line, *col, *len)?;
                Inverse::Reinsert { removed }
            }
            op => {
                let tree = doc.tree_mut()?;
                let before = self.inverse.is_none().then(|| tree.clone());
                apply_tree_op(op, tree)?;
                match before {
                    Some(snapshot) => Inverse::Restore(Box::new(snapshot)),
                    None => return Ok(()),
                }
            }
        };

        if self.inverse.is_none() {
            self.inverse = Some(inverse);
        }
        Ok(())
    }

    /// Restore the document to its state before the last apply, using only
    /// the captured inverse. Does nothing if the command was never applied.
    ///
    /// # Errors
    ///
    /// Only if the document no longer matches the post-apply state (it was
    /// edited outside the history); the document is untouched in that case.
    pub fn reverse(&self, doc: &mut Document) -> EditResult<()> {
        let Some(inverse) = &self.inverse else {
            return Ok(());
        };

        match (inverse, &self.op) {
            (Inverse::PopLine, _) => {
                doc.buffer_mut()?.pop_line();
            }
            (Inverse::Uninsert { created_line: true }, _) => {
                doc.buffer_mut()?.pop_line();
            }
            (Inverse::Uninsert { created_line: false }, Op::Insert { line, col, text }) => {
                doc.buffer_mut()?.delete(*line, *col, text.chars().count())?;
            }
            (Inverse::Reinsert { removed }, Op::Delete { line, col, .. }) => {
                doc.buffer_mut()?.insert(*line, *col, removed)?;
            }
            (Inverse::Restore(snapshot), _) => {
                let tree = doc.tree_mut()?;
                *tree = (**snapshot).clone();
                tree.set_modified(true);
            }
            (Inverse::Uninsert { .. } | Inverse::Reinsert { .. }, _) => {
                unreachable!("inverse captured for a different operation")
            }
        }
        Ok(())
    }
}

fn apply_tree_op(op: &Op, tree: &mut Tree) -> EditResult<()> {
    match op {
        Op::AppendChild {
            tag,
            new_id,
            parent_id,
            text,
        } => tree
            .append_child(tag, new_id, parent_id, text.as_deref())
            .map(drop),
        Op::InsertBefore {
            tag,
            new_id,
            target_id,
            text,
        } => tree
            .insert_before(tag, new_id, target_id, text.as_deref())
            .map(drop),
        Op::EditId { old_id, new_id } => tree.edit_id(old_id, new_id),
        Op::EditText { id, text } => tree.edit_text(id, text),
        Op::DeleteElement { id } => tree.delete_element(id),
        Op::Append { .. } | Op::Insert { .. } | Op::Delete { .. } => {
            unreachable!("text operation routed to the tree")
        }
    }
}

/// The command as it would be typed at the prompt.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match &self.op {
            Op::Append { text } => write!(f, "{name} \"{text}\""),
            Op::Insert { line, col, text } => write!(f, "{name} {line}:{col} \"{text}\""),
            Op::Delete { line, col, len } => write!(f, "{name} {line}:{col} {len}"),
            Op::AppendChild {
                tag,
                new_id,
                parent_id: anchor,
                text,
            }
            | Op::InsertBefore {
                tag,
                new_id,
                target_id: anchor,
                text,
            } => {
                write!(f, "{name} {tag} {new_id} {anchor}")?;
                match text {
                    Some(text) => write!(f, " \"{text}\""),
                    None => Ok(()),
                }
            }
            Op::EditId { old_id, new_id } => write!(f, "{name} {old_id} {new_id}"),
            Op::EditText { id, text } => write!(f, "{name} {id} \"{text}\""),
            Op::DeleteElement { id } => write!(f, "{name} {id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Document handle: one open file, either a line buffer or a markup tree.
//!
//! `Document` is a closed sum over the two models. Kind-specific editing
//! goes through [`Command`](crate::command::Command); this module only
//! offers what both kinds share: full-content get/set, the modified flag, a
//! kind tag, the spell-check text projection, and a serializable snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::Buffer;
use crate::error::{EditError, EditResult};
use crate::markup::{self, MarkupStyle};
use crate::tree::Tree;

// ---------------------------------------------------------------------------
// DocumentKind
// ---------------------------------------------------------------------------

/// Which model a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Plain text, edited by line and column.
    Text,
    /// Markup tree, edited by element id.
    #[serde(rename = "xml")]
    Markup,
}

impl DocumentKind {
    /// Guess the kind from a file name: `.xml` is markup, anything else text.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        let is_xml = std::path::Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml { Self::Markup } else { Self::Text }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Markup => "xml",
        })
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An open document.
#[derive(Debug, Clone)]
pub enum Document {
    Text(Buffer),
    Markup(Tree),
}

impl Document {
    /// A new, empty document of the given kind. Markup documents start with
    /// a lone `<root id="root">`.
    #[must_use]
    pub fn new(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Text => Self::Text(Buffer::new()),
            DocumentKind::Markup => Self::Markup(Tree::new()),
        }
    }

    /// Build a document of `kind` from file content.
    ///
    /// # Errors
    ///
    /// Markup content that does not parse.
    pub fn from_content(kind: DocumentKind, content: &str) -> EditResult<Self> {
        let mut doc = Self::new(kind);
        doc.set_content(content)?;
        Ok(doc)
    }

    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::Text(_) => DocumentKind::Text,
            Self::Markup(_) => DocumentKind::Markup,
        }
    }

    /// Full content: buffer text, or markup in the default style.
    #[must_use]
    pub fn content(&self) -> String {
        self.render(MarkupStyle::default())
    }

    /// Full content with an explicit markup style (ignored for text).
    #[must_use]
    pub fn render(&self, style: MarkupStyle) -> String {
        match self {
            Self::Text(buf) => buf.text(),
            Self::Markup(tree) => markup::write(tree, style),
        }
    }

    /// Replace the whole content. An empty string gives a markup document a
    /// fresh default root. The document ends up unmodified.
    ///
    /// # Errors
    ///
    /// Markup content that does not parse; the document is left unchanged.
    pub fn set_content(&mut self, content: &str) -> EditResult<()> {
        match self {
            Self::Text(buf) => {
                buf.set_text(content);
                buf.set_modified(false);
            }
            Self::Markup(tree) => {
                *tree = if content.trim().is_empty() {
                    Tree::new()
                } else {
                    markup::parse(content)?
                };
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn is_modified(&self) -> bool {
        match self {
            Self::Text(buf) => buf.is_modified(),
            Self::Markup(tree) => tree.is_modified(),
        }
    }

    pub const fn set_modified(&mut self, modified: bool) {
        match self {
            Self::Text(buf) => buf.set_modified(modified),
            Self::Markup(tree) => tree.set_modified(modified),
        }
    }

    /// The text a spell checker should read: the whole buffer, or every
    /// element's text content joined by spaces.
    #[must_use]
    pub fn spell_text(&self) -> String {
        match self {
            Self::Text(buf) => buf.text(),
            Self::Markup(tree) => tree.collect_text(),
        }
    }

    // -- Kind access --------------------------------------------------------

    #[must_use]
    pub const fn as_buffer(&self) -> Option<&Buffer> {
        match self {
            Self::Text(buf) => Some(buf),
            Self::Markup(_) => None,
        }
    }

    #[must_use]
    pub const fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Markup(tree) => Some(tree),
            Self::Text(_) => None,
        }
    }

    /// The buffer, or [`EditError::WrongKind`] for a markup document.
    pub(crate) fn buffer_mut(&mut self) -> EditResult<&mut Buffer> {
        match self {
            Self::Text(buf) => Ok(buf),
            Self::Markup(_) => Err(EditError::WrongKind {
                expected: DocumentKind::Text,
                found: DocumentKind::Markup,
            }),
        }
    }

    /// The tree, or [`EditError::WrongKind`] for a text document.
    pub(crate) fn tree_mut(&mut self) -> EditResult<&mut Tree> {
        match self {
            Self::Markup(tree) => Ok(tree),
            Self::Text(_) => Err(EditError::WrongKind {
                expected: DocumentKind::Markup,
                found: DocumentKind::Text,
            }),
        }
    }

    // -- Snapshots ----------------------------------------------------------

    /// Capture kind, content, and modified flag in a serializable form.
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            kind: self.kind(),
            content: self.content(),
            modified: self.is_modified(),
        }
    }

    /// Rebuild a document from a snapshot.
    ///
    /// # Errors
    ///
    /// Markup content that does not parse.
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> EditResult<Self> {
        let mut doc = Self::from_content(snapshot.kind, &snapshot.content)?;
        doc.set_modified(snapshot.modified);
        Ok(doc)
    }
}

impl From<Buffer> for Document {
    fn from(buf: Buffer) -> Self {
        Self::Text(buf)
    }
}

impl From<Tree> for Document {
    fn from(tree: Tree) -> Self {
        Self::Markup(tree)
    }
}

/// Plain-data picture of a document, for persisting a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub kind: DocumentKind,
    pub content: String,
    pub modified: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

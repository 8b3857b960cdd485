//! # quill-core: editing engine for quill
//!
//! This crate holds everything that changes a document, with no knowledge
//! of files, prompts, or sessions:
//!
//! - **[`position`]**: 1-indexed `Position` and `LineRange`
//! - **[`buffer`]**: `Buffer`, the line-oriented plain-text model
//! - **[`tree`]**: `Tree`, the id-addressed markup model
//! - **[`markup`]**: reading and writing a `Tree` as markup text
//! - **[`document`]**: `Document`, a closed sum over the two models
//! - **[`command`]**: reversible edits that capture their own inverse
//! - **[`history`]**: per-document undo/redo stacks
//! - **[`options`]**: the `set` option system
//! - **[`error`]**: the shared error type
//!
//! ```
//! use quill_core::{Command, Document, DocumentKind, History};
//!
//! let mut doc = Document::new(DocumentKind::Text);
//! let mut history = History::new();
//! history.execute(&mut doc, Command::append("hello")).unwrap();
//! history.execute(&mut doc, Command::insert(1, 6, " world")).unwrap();
//! assert_eq!(doc.content(), "hello world");
//!
//! history.undo(&mut doc).unwrap();
//! assert_eq!(doc.content(), "hello");
//! ```

pub mod buffer;
pub mod command;
pub mod document;
pub mod error;
pub mod history;
pub mod markup;
pub mod options;
pub mod position;
pub mod tree;

pub use buffer::Buffer;
pub use command::Command;
pub use document::{Document, DocumentKind, DocumentSnapshot};
pub use error::{EditError, EditResult, ErrorKind};
pub use history::{History, HistoryStatus};
pub use markup::MarkupStyle;
pub use options::Options;
pub use position::{LineRange, Position};
pub use tree::{NodeRef, Tree};

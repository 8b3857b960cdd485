//! Line buffer: the plain-text document model.
//!
//! A `Buffer` is an ordered list of lines. Each line is a `String` without
//! any line terminator; the buffer owns its lines exclusively and hands out
//! only borrowed views.
//!
//! # Design choices
//!
//! - **1-indexed API.** Every public operation takes the `line`/`col`
//!   numbers a user types. Conversion to 0-indexed storage happens here and
//!   nowhere else.
//!
//! - **Columns are char offsets**, not byte offsets. Column 4 of `"café"` is
//!   `'é'`. Byte offsets never leak into the public API.
//!
//! - **Zero lines is a real state.** An empty buffer has no lines at all,
//!   not one empty line, so `set_text("")` and a fresh buffer agree.
//!
//! - **Single-line edits.** `insert` and `delete` never cross a line
//!   boundary. Text containing `\n` or `\r` is rejected with
//!   [`EditError::LineBreak`] rather than split, which keeps the
//!   terminator-free invariant without renumbering lines behind the caller's
//!   back.
//!
//! - **Validate, then mutate.** Every check runs before the first write, so
//!   an error always leaves the buffer exactly as it was.
//!
//! - **No undo/redo here.** Edit history wraps buffer operations through
//!   [`Command`](crate::command::Command).

use std::fmt;

use tracing::trace;

use crate::error::{Coordinate, EditError, EditResult};
use crate::position::LineRange;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// An ordered sequence of terminator-free text lines.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    modified: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer (zero lines).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            modified: false,
        }
    }

    /// Create a buffer from a string, split on line breaks.
    ///
    /// The buffer starts unmodified.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text),
            modified: false,
        }
    }

    // -- Text access --------------------------------------------------------

    /// All lines, in order.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines. A fresh buffer has 0.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True when the buffer holds no lines.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by 1-indexed number. Returns `None` when out of range.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// Length of a line in chars. Returns `None` when out of range.
    #[must_use]
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|l| l.chars().count())
    }

    /// The lines of `range` with their 1-indexed numbers, clamped to what
    /// exists. A range entirely past the end yields nothing.
    pub fn lines_in(&self, range: LineRange) -> impl Iterator<Item = (usize, &str)> {
        let start = range.start.max(1);
        let end = range.end.min(self.lines.len());
        let skip = start - 1;
        let take = (end + 1).saturating_sub(start);
        self.lines
            .iter()
            .enumerate()
            .skip(skip)
            .take(take)
            .map(|(idx, l)| (idx + 1, l.as_str()))
    }

    /// The whole buffer, lines joined with `\n` (no trailing newline).
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace all lines by splitting `content` on line breaks (`\n`,
    /// `\r\n`, or `\r`). An empty string yields zero lines.
    ///
    /// Loading content is not an edit: the modified flag is left alone.
    pub fn set_text(&mut self, content: &str) {
        self.lines = split_lines(content);
        trace!(lines = self.lines.len(), "buffer text replaced");
    }

    // -- Editing ------------------------------------------------------------

    /// Add `text` as a new final line.
    ///
    /// # Errors
    ///
    /// [`EditError::LineBreak`] if `text` contains a line terminator.
    pub fn append(&mut self, text: &str) -> EditResult<()> {
        reject_line_breaks(text)?;
        self.lines.push(text.to_string());
        self.modified = true;
        trace!(line = self.lines.len(), "line appended");
        Ok(())
    }

    /// Remove and return the final line, or `None` when the buffer is empty.
    pub fn pop_line(&mut self) -> Option<String> {
        let line = self.lines.pop()?;
        self.modified = true;
        trace!(remaining = self.lines.len(), "last line removed");
        Some(line)
    }

    /// Insert `text` at column `col` of `line`.
    ///
    /// On an empty buffer the only valid target is `1:1`, which creates the
    /// first line equal to `text`.
    ///
    /// # Errors
    ///
    /// - [`EditError::LineBreak`] if `text` contains a line terminator.
    /// - [`EditError::Range`] if `line` is outside `[1, line_count + 1]`, or
    ///   names a line that does not exist, or `col` is outside
    ///   `[1, line_len + 1]`.
    /// - [`EditError::EmptyBufferInsert`] on an empty buffer at anything but `1:1`.
    pub fn insert(&mut self, line: usize, col: usize, text: &str) -> EditResult<()> {
        reject_line_breaks(text)?;

        let count = self.lines.len();
        if line < 1 || line > count + 1 {
            return Err(EditError::range(Coordinate::Line, line, 1, count + 1));
        }

        if self.lines.is_empty() {
            if line != 1 || col != 1 {
                return Err(EditError::EmptyBufferInsert { line, col });
            }
            self.lines.push(text.to_string());
            self.modified = true;
            trace!(line, col, "first line created");
            return Ok(());
        }

        // `count + 1` only makes sense for the empty-buffer case above.
        if line > count {
            return Err(EditError::range(Coordinate::Line, line, 1, count));
        }

        let current = &mut self.lines[line - 1];
        let len = current.chars().count();
        if col < 1 || col > len + 1 {
            return Err(EditError::range(Coordinate::Column, col, 1, len + 1));
        }

        let at = byte_offset(current, col - 1);
        current.insert_str(at, text);
        self.modified = true;
        trace!(line, col, chars = text.chars().count(), "text inserted");
        Ok(())
    }

    /// Remove `len` chars starting at column `col` of `line`, returning the
    /// exact text removed.
    ///
    /// # Errors
    ///
    /// - [`EditError::Range`] if `line` is outside `[1, line_count]` or `col`
    ///   is outside `[1, line_len + 1]`.
    /// - [`EditError::DeleteOverrun`] if fewer than `len` chars follow `col`.
    pub fn delete(&mut self, line: usize, col: usize, len: usize) -> EditResult<String> {
        let count = self.lines.len();
        if line < 1 || line > count {
            return Err(EditError::range(Coordinate::Line, line, 1, count));
        }

        let current = &mut self.lines[line - 1];
        let line_len = current.chars().count();
        if col < 1 || col > line_len + 1 {
            return Err(EditError::range(Coordinate::Column, col, 1, line_len + 1));
        }
        if len > line_len - (col - 1) {
            return Err(EditError::DeleteOverrun {
                line,
                col,
                len,
                line_len,
            });
        }

        let start = byte_offset(current, col - 1);
        let end = byte_offset(current, col - 1 + len);
        let removed: String = current.drain(start..end).collect();
        self.modified = true;
        trace!(line, col, len, "text deleted");
        Ok(removed)
    }

    // -- Metadata -----------------------------------------------------------

    /// True if the buffer has been edited since creation or the last save.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Set or clear the modified flag (cleared after a save).
    #[inline]
    pub const fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.lines.len())
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split text into terminator-free lines. `\r\n` and lone `\r` count as one
/// break each. A trailing break yields a trailing empty line, so
/// `text()` reproduces `\n`-terminated input exactly.
fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    lines.push(current);
    lines
}

/// Byte offset of the `char_idx`-th char of `s`. `char_idx == chars().count()`
/// maps to `s.len()`.
fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(byte, _)| byte)
}

fn reject_line_breaks(text: &str) -> EditResult<()> {
    if text.contains(['\n', '\r']) {
        return Err(EditError::LineBreak);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Text position and line-range types.
//!
//! All coordinates are **1-indexed**, the way users type them: line 1 is the
//! first line, column 1 is the first character. Columns count Unicode scalar
//! values (chars), not bytes. The buffer converts to 0-indexed storage
//! offsets internally: that conversion never leaks out of `buffer.rs`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a line buffer: (line, column), both 1-indexed.
///
/// Column `len + 1` is the slot just past the last character of a line, the
/// place an append-to-line insert goes.
///
/// # Ordering
///
/// Positions are ordered lexicographically: line first, then column.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The first slot of the first line.
    pub const START: Self = Self { line: 1, col: 1 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

// Natural ordering: line first, then column.
impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Parses `"line:col"`, e.g. `"3:7"`.
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, col) = split_pair(s)?;
        Ok(Self::new(line, col))
    }
}

// ---------------------------------------------------------------------------
// LineRange
// ---------------------------------------------------------------------------

/// An inclusive range of 1-indexed line numbers, used for display.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Create a range. The order of the endpoints is normalized.
    #[inline]
    #[must_use]
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A range covering a single line.
    #[inline]
    #[must_use]
    pub const fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// True when `line` falls within `[start, end]`.
    #[inline]
    #[must_use]
    pub const fn contains(self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }
}

impl fmt::Debug for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lines({}..={})", self.start, self.end)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Parses `"start:end"` or a bare `"line"`.
impl FromStr for LineRange {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            let (a, b) = split_pair(s)?;
            Ok(Self::new(a, b))
        } else {
            parse_number(s).map(Self::single)
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A `line:col` or `start:end` argument could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected `N:M` with positive numbers, got `{0}`")]
pub struct ParsePositionError(String);

fn split_pair(s: &str) -> Result<(usize, usize), ParsePositionError> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| ParsePositionError(s.to_string()))?;
    let a = parse_number(a).map_err(|_| ParsePositionError(s.to_string()))?;
    let b = parse_number(b).map_err(|_| ParsePositionError(s.to_string()))?;
    Ok((a, b))
}

fn parse_number(s: &str) -> Result<usize, ParsePositionError> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| ParsePositionError(s.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

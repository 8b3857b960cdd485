//! Editor options and the `set` command that changes them.
//!
//! Each argument to `set` names one option, optionally followed by an
//! operation:
//!
//! | Argument      | Effect                                   |
//! |---------------|------------------------------------------|
//! | `name`        | switch a flag on, or show a number       |
//! | `noname`      | switch a flag off                        |
//! | `name!`       | flip a flag                              |
//! | `name?`       | show the current value                   |
//! | `name=N`      | assign a number                          |
//! | `all`         | show every option                        |
//! | *(nothing)*   | show options that differ from defaults   |
//!
//! | Option       | Short | Kind   | Default | Meaning                              |
//! |--------------|-------|--------|---------|--------------------------------------|
//! | `indent`     | `ind` | number | 2       | spaces per level in markup/outline   |
//! | `undolevels` | `ul`  | number | 1000    | undo depth per document (0 = no cap) |
//! | `escape`     | `esc` | flag   | on      | escape `& < > "` when writing markup |
//!
//! Names are resolved while parsing, so a misspelled or misused option
//! rejects the whole `set` line before anything changes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::history::DEFAULT_UNDO_LEVELS;
use crate::markup::MarkupStyle;
use crate::tree::{DEFAULT_INDENT, MAX_INDENT};

// ---------------------------------------------------------------------------
// Option names
// ---------------------------------------------------------------------------

/// One settable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionName {
    Indent,
    UndoLevels,
    Escape,
}

impl OptionName {
    /// Every option, in display order.
    pub const ALL: [Self; 3] = [Self::Indent, Self::UndoLevels, Self::Escape];

    /// Resolve a full name or its short form.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "indent" | "ind" => Some(Self::Indent),
            "undolevels" | "ul" => Some(Self::UndoLevels),
            "escape" | "esc" => Some(Self::Escape),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indent => "indent",
            Self::UndoLevels => "undolevels",
            Self::Escape => "escape",
        }
    }

    /// True for on/off options.
    #[must_use]
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::Escape)
    }

    /// Check a numeric value against this option's accepted range.
    ///
    /// # Errors
    ///
    /// [`OptionError::OutOfRange`] for an indent wider than [`MAX_INDENT`].
    pub const fn validate(self, value: usize) -> Result<usize, OptionError> {
        match self {
            Self::Indent if value > MAX_INDENT => Err(OptionError::OutOfRange {
                name: self,
                value,
                max: MAX_INDENT,
            }),
            _ => Ok(value),
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionName {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| OptionError::Unknown(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Engine-tunable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub indent: usize,
    pub undo_levels: usize,
    pub escape: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            undo_levels: DEFAULT_UNDO_LEVELS,
            escape: true,
        }
    }
}

impl Options {
    /// The markup layout these options describe.
    #[must_use]
    pub const fn markup_style(&self) -> MarkupStyle {
        MarkupStyle {
            indent: self.indent,
            escape: self.escape,
        }
    }

    /// `name=value` for numbers, `name` or `noname` for flags.
    #[must_use]
    pub fn show(&self, name: OptionName) -> String {
        match name {
            OptionName::Indent => format!("indent={}", self.indent),
            OptionName::UndoLevels => format!("undolevels={}", self.undo_levels),
            OptionName::Escape if self.escape => "escape".to_string(),
            OptionName::Escape => "noescape".to_string(),
        }
    }

    /// Apply one directive. Returns text to show the user, if any.
    ///
    /// Directives come from [`parse_set`], which has already matched each
    /// operation to the option's kind, so only the value range can fail here.
    ///
    /// # Errors
    ///
    /// [`OptionError::OutOfRange`] when an assigned value is outside the
    /// option's range. The options are left unchanged.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match *directive {
            SetDirective::ShowChanged => {
                let defaults = Self::default();
                let changed: Vec<String> = OptionName::ALL
                    .into_iter()
                    .map(|name| (self.show(name), defaults.show(name)))
                    .filter(|(now, default)| now != default)
                    .map(|(now, _)| now)
                    .collect();
                Ok(Some(if changed.is_empty() {
                    "(all options at defaults)".to_string()
                } else {
                    changed.join("  ")
                }))
            }
            SetDirective::ShowAll => Ok(Some(
                OptionName::ALL.map(|name| self.show(name)).join("  "),
            )),
            SetDirective::Show(name) => Ok(Some(self.show(name))),
            SetDirective::Flag(name, op) => {
                let slot = match name {
                    OptionName::Escape => &mut self.escape,
                    other => return Err(OptionError::NotFlag(other)),
                };
                *slot = match op {
                    FlagOp::On => true,
                    FlagOp::Off => false,
                    FlagOp::Toggle => !*slot,
                };
                Ok(None)
            }
            SetDirective::Assign(name, value) => {
                let value = name.validate(value)?;
                match name {
                    OptionName::Indent => self.indent = value,
                    OptionName::UndoLevels => self.undo_levels = value,
                    OptionName::Escape => return Err(OptionError::NotNumber(name)),
                }
                Ok(None)
            }
        }
    }
}

/// Why a `set` argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),
    #[error("{0} is not an on/off option")]
    NotFlag(OptionName),
    #[error("{0} takes a number, not on/off")]
    NotNumber(OptionName),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: OptionName, value: String },
    #[error("{name}={value} is out of range (at most {max})")]
    OutOfRange {
        name: OptionName,
        value: usize,
        max: usize,
    },
}

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// What to do to a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOp {
    On,
    Off,
    Toggle,
}

/// One resolved `set` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetDirective {
    /// Show one option's value.
    Show(OptionName),
    /// Change a flag.
    Flag(OptionName, FlagOp),
    /// Give a numeric option a value.
    Assign(OptionName, usize),
    /// Show options that differ from their defaults.
    ShowChanged,
    /// Show every option.
    ShowAll,
}

/// Parse the arguments of a `set` line.
///
/// No arguments means [`SetDirective::ShowChanged`].
///
/// # Errors
///
/// The first argument that names no option, or asks a flag for a number
/// (or a number to flip), or assigns something that is not a number.
pub fn parse_set(args: &str) -> Result<Vec<SetDirective>, OptionError> {
    let mut words = args.split_whitespace().peekable();
    if words.peek().is_none() {
        return Ok(vec![SetDirective::ShowChanged]);
    }
    words.map(parse_set_arg).collect()
}

/// Parse one `set` argument.
///
/// # Errors
///
/// See [`parse_set`].
pub fn parse_set_arg(arg: &str) -> Result<SetDirective, OptionError> {
    if arg == "all" {
        return Ok(SetDirective::ShowAll);
    }

    if let Some((name, value)) = arg.split_once('=') {
        let name: OptionName = name.parse()?;
        if name.is_flag() {
            return Err(OptionError::NotNumber(name));
        }
        let value = value.parse().map_err(|_| OptionError::InvalidValue {
            name,
            value: value.to_string(),
        })?;
        return Ok(SetDirective::Assign(name, value));
    }

    if let Some(name) = arg.strip_suffix('?') {
        return Ok(SetDirective::Show(name.parse()?));
    }

    let (name, op) = match arg.strip_suffix('!') {
        Some(name) => (name, Some(FlagOp::Toggle)),
        None => (arg, None),
    };
    let (name, op) = match (OptionName::lookup(name), op) {
        (Some(name), op) => (name, op),
        // `no` only negates when the rest is itself a flag.
        (None, None) => match arg.strip_prefix("no").and_then(OptionName::lookup) {
            Some(flag) if flag.is_flag() => (flag, Some(FlagOp::Off)),
            _ => return Err(OptionError::Unknown(arg.to_string())),
        },
        (None, Some(_)) => return Err(OptionError::Unknown(name.to_string())),
    };

    match (name.is_flag(), op) {
        (true, op) => Ok(SetDirective::Flag(name, op.unwrap_or(FlagOp::On))),
        (false, None) => Ok(SetDirective::Show(name)),
        (false, Some(_)) => Err(OptionError::NotFlag(name)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

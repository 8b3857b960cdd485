// SPDX-License-Identifier: MIT
//
// Command-line argument parsing.
//
// Supports:
// - Opening files at startup (kind chosen by extension)
// - Running commands from a script instead of stdin
// - Overriding the indent width and undo depth
// - Choosing a log level

use std::path::PathBuf;

use clap::Parser;
use quill_core::Options;
use quill_core::options::OptionName;

/// A line-oriented editor for text and markup documents with undo/redo
#[derive(Parser, Debug)]
#[command(name = "quill", version, about)]
pub struct CliArgs {
    /// Files to open; `.xml` files open as markup, anything else as text
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Read commands from FILE instead of standard input
    #[arg(short = 's', long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Spaces per nesting level when writing markup and outlines (at most 16)
    #[arg(long, value_name = "N", value_parser = parse_indent)]
    pub indent: Option<usize>,

    /// Maximum undo depth per document (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub undolevels: Option<usize>,

    /// Log filter used when RUST_LOG is unset (e.g. `debug`)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Do not print the `> ` prompt
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Engine options with the CLI overrides applied to the defaults.
    #[must_use]
    pub fn options(&self) -> Options {
        let mut options = Options::default();
        if let Some(indent) = self.indent {
            options.indent = indent;
        }
        if let Some(levels) = self.undolevels {
            options.undo_levels = levels;
        }
        options
    }
}

fn parse_indent(s: &str) -> Result<usize, String> {
    let value = s.parse::<usize>().map_err(|err| err.to_string())?;
    OptionName::Indent.validate(value).map_err(|err| err.to_string())
}

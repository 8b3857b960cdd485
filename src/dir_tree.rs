// SPDX-License-Identifier: MIT
//
// `dir-tree`: an indented listing of a directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Entries further down than this are not listed.
pub const MAX_DEPTH: usize = 20;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
        let path = entry?.path();
        if !is_hidden(&path) {
            entries.push(path);
        }
    }
    entries.sort();
    Ok(entries)
}

/// `root` as given, then every entry below it depth-first in name order,
/// each as `"  " * depth + "|- " + name`. Hidden entries are skipped.
///
/// # Errors
///
/// `root` or one of its directories cannot be read.
pub fn render(root: &Path) -> Result<Vec<String>> {
    let mut lines = vec![root.display().to_string()];
    if !root.is_dir() {
        anyhow::ensure!(root.exists(), "no such directory: {}", root.display());
        return Ok(lines);
    }

    let mut stack: Vec<(PathBuf, usize)> = sorted_entries(root)?
        .into_iter()
        .rev()
        .map(|path| (path, 1))
        .collect();
    while let Some((path, depth)) = stack.pop() {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        lines.push(format!("{}|- {name}", "  ".repeat(depth)));
        if path.is_dir() && depth < MAX_DEPTH {
            let children = sorted_entries(&path)?;
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }
    Ok(lines)
}

// SPDX-License-Identifier: MIT
//
// Line-oriented command prompt.
//
// Each input line is split into words (double quotes group words and keep
// spaces; `\"` and `\\` escape inside quotes), the first word picks the
// command, and the rest are its arguments:
//
//   > load notes.txt
//   > insert 1:1 "Hello, "
//   > show 1:3
//   > undo
//
// A failing command prints `Error: ...` and the session continues. Blank
// lines and lines starting with `#` are ignored, so scripts can carry
// comments. Editing commands on a document with logging on are written to
// its command log before they run.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use quill_core::options::parse_set;
use quill_core::{Command, DocumentKind, LineRange, Position};
use tracing::warn;

use crate::command_log::{self, CommandLog};
use crate::dir_tree;
use crate::spell::{DictionaryChecker, SpellChecker};
use crate::workspace::{LoadOutcome, SaveTarget, Workspace};

// ─── Command table ──────────────────────────────────────────────────────────

/// `(name, usage, summary)` for every command, in `help` order.
const COMMANDS: &[(&str, &str, &str)] = &[
    ("init", "init <text|xml> <file> [with-log]", "open a new empty document"),
    ("load", "load <file>", "open a file or switch to it"),
    ("save", "save [file|all]", "write the active, named, or every document"),
    ("close", "close [file]", "close the active or named document"),
    ("editor-list", "editor-list", "list open documents and time spent in each"),
    ("dir-tree", "dir-tree [path]", "list a directory as a tree"),
    ("snapshot", "snapshot <file>", "write all open documents as JSON"),
    ("restore", "restore <file>", "replace open documents from a snapshot"),
    ("append", "append \"text\"", "add a line at the end"),
    ("insert", "insert <line:col> \"text\"", "insert text at a position"),
    ("delete", "delete <line:col> <len>", "delete chars at a position"),
    ("show", "show [start:end]", "print lines with numbers"),
    (
        "append-child",
        "append-child <tag> <newId> <parentId> [\"text\"]",
        "add an element as last child",
    ),
    (
        "insert-before",
        "insert-before <tag> <newId> <targetId> [\"text\"]",
        "add an element before a sibling",
    ),
    ("edit-id", "edit-id <oldId> <newId>", "rename an element"),
    ("edit-text", "edit-text <id> \"text\"", "replace an element's text"),
    ("delete-element", "delete-element <id>", "remove an element and its subtree"),
    ("xml-tree", "xml-tree", "print the element outline"),
    ("xml", "xml", "print the document as markup"),
    ("undo", "undo", "reverse the last edit"),
    ("redo", "redo", "re-apply the last undone edit"),
    ("spell-check", "spell-check", "flag misspelled words"),
    ("log-on", "log-on [file]", "log editing commands for a document"),
    ("log-off", "log-off [file]", "stop logging editing commands"),
    ("log-show", "log-show [file]", "print a document's command log"),
    ("set", "set [option[=value]|nooption|option!|option?|all] ...", "show or change options"),
    ("help", "help", "show this list"),
    ("exit", "exit[!]", "leave (exit! discards unsaved changes)"),
];

fn usage(command: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(name, _, _)| *name == command)
        .map_or("", |(_, usage, _)| usage)
}

// ─── Tokenizer ──────────────────────────────────────────────────────────────

/// Split a command line into words.
///
/// # Errors
///
/// An unterminated quote.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => bail!("unterminated quote"),
                        },
                        Some(c) => current.push(c),
                        None => bail!("unterminated quote"),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

// ─── Arguments ──────────────────────────────────────────────────────────────

/// The words after the command name.
struct Args<'a> {
    command: &'a str,
    values: &'a [String],
}

impl<'a> Args<'a> {
    fn required(&self, index: usize, what: &str) -> Result<&'a str> {
        self.values.get(index).map(String::as_str).ok_or_else(|| {
            anyhow!(
                "{}: missing {what} (usage: {})",
                self.command,
                usage(self.command)
            )
        })
    }

    fn optional(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).map(String::as_str)
    }

    fn at_most(&self, count: usize) -> Result<()> {
        if self.values.len() > count {
            bail!(
                "{}: too many arguments (usage: {})",
                self.command,
                usage(self.command)
            );
        }
        Ok(())
    }

    fn position(&self, index: usize) -> Result<Position> {
        let raw = self.required(index, "line:col")?;
        raw.parse()
            .with_context(|| format!("{}: bad position", self.command))
    }

    fn count(&self, index: usize, what: &str) -> Result<usize> {
        let raw = self.required(index, what)?;
        raw.parse()
            .map_err(|_| anyhow!("{}: {what} must be a number, got `{raw}`", self.command))
    }
}

// ─── Repl ───────────────────────────────────────────────────────────────────

/// Whether the session goes on after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The prompt: a workspace, its helpers, and somewhere to print.
pub struct Repl<W: Write> {
    workspace: Workspace,
    checker: Box<dyn SpellChecker>,
    log: CommandLog,
    out: W,
}

impl<W: Write> Repl<W> {
    /// A prompt over `workspace` using the built-in dictionary.
    pub fn new(workspace: Workspace, out: W) -> Self {
        Self {
            workspace,
            checker: Box::new(DictionaryChecker::new()),
            log: CommandLog::new(),
            out,
        }
    }

    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Read and run commands until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Only I/O failures on `input` or the output; command failures are
    /// printed and skipped.
    pub fn run<R: BufRead>(&mut self, mut input: R, prompt: bool) -> Result<()> {
        let mut line = String::new();
        loop {
            if prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            match self.execute_line(&line) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => writeln!(self.out, "Error: {err:#}")?,
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Run one command line.
    ///
    /// # Errors
    ///
    /// Bad arguments, engine refusals, and file errors, for the caller to
    /// print.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let words = tokenize(line)?;
        let Some((name, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let args = Args {
            command: name,
            values: rest,
        };
        if command_log::is_logged(name) {
            self.log_command(line);
        }

        match name.as_str() {
            // -- Session --
            "help" => self.cmd_help()?,
            "exit" | "quit" => return self.cmd_exit(false),
            "exit!" | "quit!" => return self.cmd_exit(true),
            "set" => self.cmd_set(&args)?,

            // -- Workspace --
            "init" => self.cmd_init(&args)?,
            "load" => self.cmd_load(&args)?,
            "save" => self.cmd_save(&args)?,
            "close" => self.cmd_close(&args)?,
            "editor-list" => self.cmd_list()?,
            "dir-tree" => {
                args.at_most(1)?;
                let root = args.optional(0).unwrap_or(".");
                for line in dir_tree::render(Path::new(root))? {
                    writeln!(self.out, "{line}")?;
                }
            }
            "snapshot" => {
                args.at_most(1)?;
                let path = args.required(0, "file")?;
                self.workspace.snapshot(Path::new(path))?;
                writeln!(self.out, "Snapshot written: {path}")?;
            }
            "restore" => {
                args.at_most(1)?;
                let path = args.required(0, "file")?;
                let count = self.workspace.restore(Path::new(path))?;
                writeln!(self.out, "Restored {count} document(s) from {path}")?;
            }

            // -- Text editing --
            "append" => {
                args.at_most(1)?;
                let text = args.required(0, "text")?;
                self.execute(Command::append(text))?;
            }
            "insert" => {
                args.at_most(2)?;
                let pos = args.position(0)?;
                let text = args.required(1, "text")?;
                self.execute(Command::insert(pos.line, pos.col, text))?;
            }
            "delete" => {
                args.at_most(2)?;
                let pos = args.position(0)?;
                let len = args.count(1, "length")?;
                self.execute(Command::delete(pos.line, pos.col, len))?;
            }
            "show" => self.cmd_show(&args)?,

            // -- Markup editing --
            "append-child" => {
                args.at_most(4)?;
                let cmd = Command::append_child(
                    args.required(0, "tag")?,
                    args.required(1, "new id")?,
                    args.required(2, "parent id")?,
                    args.optional(3).map(str::to_string),
                );
                self.execute(cmd)?;
            }
            "insert-before" => {
                args.at_most(4)?;
                let cmd = Command::insert_before(
                    args.required(0, "tag")?,
                    args.required(1, "new id")?,
                    args.required(2, "target id")?,
                    args.optional(3).map(str::to_string),
                );
                self.execute(cmd)?;
            }
            "edit-id" => {
                args.at_most(2)?;
                let cmd =
                    Command::edit_id(args.required(0, "old id")?, args.required(1, "new id")?);
                self.execute(cmd)?;
            }
            "edit-text" => {
                args.at_most(2)?;
                let cmd = Command::edit_text(args.required(0, "id")?, args.required(1, "text")?);
                self.execute(cmd)?;
            }
            "delete-element" => {
                args.at_most(1)?;
                self.execute(Command::delete_element(args.required(0, "id")?))?;
            }
            "xml-tree" => self.cmd_xml_tree(&args)?,
            "xml" => self.cmd_xml(&args)?,

            // -- History --
            "undo" => {
                args.at_most(0)?;
                let status = self.workspace.undo()?;
                writeln!(self.out, "{status}")?;
            }
            "redo" => {
                args.at_most(0)?;
                let status = self.workspace.redo()?;
                writeln!(self.out, "{status}")?;
            }

            "spell-check" => self.cmd_spell_check(&args)?,

            // -- Command log --
            "log-on" | "log-off" => {
                args.at_most(1)?;
                let on = name == "log-on";
                let document = self.workspace.set_logging(args.optional(0), on)?;
                let state = if on { "on" } else { "off" };
                writeln!(self.out, "Logging {state}: {document}")?;
            }
            "log-show" => self.cmd_log_show(&args)?,

            other => bail!("unknown command: {other} (try `help`)"),
        }
        Ok(Flow::Continue)
    }

    /// Append `line` to the active document's command log, if it keeps one.
    /// A failed write is reported and otherwise ignored.
    fn log_command(&mut self, line: &str) {
        let Some(document) = self.workspace.logged_document() else {
            return;
        };
        if let Err(err) = self.log.record(document, line) {
            warn!(document, error = %format!("{err:#}"), "command not logged");
        }
    }

    fn execute(&mut self, cmd: Command) -> Result<()> {
        let status = self.workspace.execute(cmd)?;
        writeln!(self.out, "{status}")?;
        Ok(())
    }

    // -- Session -------------------------------------------------------------

    fn cmd_help(&mut self) -> Result<()> {
        let width = COMMANDS
            .iter()
            .map(|(_, usage, _)| usage.len())
            .max()
            .unwrap_or(0);
        for (_, usage, summary) in COMMANDS {
            writeln!(self.out, "  {usage:<width$}  {summary}")?;
        }
        Ok(())
    }

    fn cmd_exit(&mut self, force: bool) -> Result<Flow> {
        let unsaved = self.workspace.unsaved();
        if !unsaved.is_empty() {
            if !force {
                bail!(
                    "unsaved changes in {} (save, or exit! to discard)",
                    unsaved.join(", ")
                );
            }
            writeln!(self.out, "Discarding unsaved changes in {}", unsaved.join(", "))?;
        }
        writeln!(self.out, "Bye.")?;
        Ok(Flow::Exit)
    }

    fn cmd_set(&mut self, args: &Args<'_>) -> Result<()> {
        let mut options = *self.workspace.options();
        let mut messages = Vec::new();
        for directive in parse_set(&args.values.join(" "))? {
            if let Some(message) = options.apply(&directive)? {
                messages.push(message);
            }
        }
        self.workspace.set_options(options);
        for message in messages {
            writeln!(self.out, "{message}")?;
        }
        Ok(())
    }

    // -- Workspace -----------------------------------------------------------

    fn cmd_init(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(3)?;
        let kind = match args.required(0, "kind")? {
            "text" => DocumentKind::Text,
            "xml" => DocumentKind::Markup,
            other => bail!("init: kind must be `text` or `xml`, got `{other}`"),
        };
        let name = args.required(1, "file")?;
        let with_log = match args.optional(2) {
            None => false,
            Some("with-log") => true,
            Some(other) => bail!("init: expected `with-log`, got `{other}`"),
        };
        self.workspace.init(kind, name, with_log)?;
        writeln!(self.out, "Initialized {kind} document: {name}")?;
        Ok(())
    }

    fn cmd_load(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(1)?;
        let name = args.required(0, "file")?;
        let message = match self.workspace.load(name)? {
            LoadOutcome::Activated => "Active",
            LoadOutcome::Loaded => "Loaded",
            LoadOutcome::Created => "New file",
        };
        writeln!(self.out, "{message}: {name}")?;
        Ok(())
    }

    fn cmd_save(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(1)?;
        for name in self.workspace.save(SaveTarget::from_arg(args.optional(0)))? {
            writeln!(self.out, "Saved: {name}")?;
        }
        Ok(())
    }

    fn cmd_close(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(1)?;
        let closed = self.workspace.close(args.optional(0))?;
        if closed.document().is_modified() {
            writeln!(self.out, "Closed: {} (unsaved changes discarded)", closed.name())?;
        } else {
            writeln!(self.out, "Closed: {}", closed.name())?;
        }
        Ok(())
    }

    fn cmd_list(&mut self) -> Result<()> {
        let listing = self.workspace.listing();
        if listing.is_empty() {
            writeln!(self.out, "(no open documents)")?;
        }
        for line in listing {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    // -- Display -------------------------------------------------------------

    fn cmd_show(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(1)?;
        let entry = self
            .workspace
            .active()
            .ok_or_else(|| anyhow!("no active document"))?;
        let Some(buffer) = entry.document().as_buffer() else {
            bail!("show works on text documents; use xml-tree or xml");
        };
        let range = match args.optional(0) {
            Some(raw) => raw
                .parse::<LineRange>()
                .context("show: bad line range")?,
            None => LineRange::new(1, buffer.line_count()),
        };
        for (number, line) in buffer.lines_in(range) {
            writeln!(self.out, "{number}: {line}")?;
        }
        Ok(())
    }

    fn cmd_xml_tree(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(0)?;
        let indent = self.workspace.options().indent;
        let tree = self.active_tree()?;
        let outline = tree.to_outline_with(indent);
        write!(self.out, "{outline}")?;
        Ok(())
    }

    fn cmd_xml(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(0)?;
        let style = self.workspace.options().markup_style();
        let markup = quill_core::markup::write(self.active_tree()?, style);
        write!(self.out, "{markup}")?;
        Ok(())
    }

    fn active_tree(&self) -> Result<&quill_core::Tree> {
        let entry = self
            .workspace
            .active()
            .ok_or_else(|| anyhow!("no active document"))?;
        entry
            .document()
            .as_tree()
            .ok_or_else(|| anyhow!("{} is not an xml document", entry.name()))
    }

    fn cmd_log_show(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(1)?;
        let name = match args.optional(0) {
            Some(name) => name.to_string(),
            None => self
                .workspace
                .active()
                .map(|entry| entry.name().to_string())
                .ok_or_else(|| anyhow!("no active document"))?,
        };
        match command_log::read(&name)? {
            Some(text) => write!(self.out, "{text}")?,
            None => writeln!(self.out, "No log for {name}")?,
        }
        Ok(())
    }

    fn cmd_spell_check(&mut self, args: &Args<'_>) -> Result<()> {
        args.at_most(0)?;
        let entry = self
            .workspace
            .active()
            .ok_or_else(|| anyhow!("no active document"))?;
        let found = self.checker.check(&entry.document().spell_text());
        if found.is_empty() {
            writeln!(self.out, "No misspellings found.")?;
            return Ok(());
        }
        writeln!(self.out, "{} misspelling(s):", found.len())?;
        for misspelling in found {
            writeln!(self.out, "  {misspelling}")?;
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quill_core::Options;
    use tempfile::TempDir;

    use crate::stats::testing::ManualClock;

    struct Session {
        repl: Repl<Vec<u8>>,
        clock: ManualClock,
        dir: TempDir,
    }

    impl Session {
        fn new() -> Self {
            let clock = ManualClock::start();
            let workspace = Workspace::with_clock(Options::default(), Box::new(clock.clone()));
            Self {
                repl: Repl::new(workspace, Vec::new()),
                clock,
                dir: TempDir::new().unwrap(),
            }
        }

        fn path(&self, file: &str) -> String {
            self.dir.path().join(file).to_string_lossy().into_owned()
        }

        /// Run one line, returning what it printed (errors included).
        fn run(&mut self, line: &str) -> String {
            self.repl.out.clear();
            if let Err(err) = self.repl.execute_line(line) {
                writeln!(self.repl.out, "Error: {err:#}").unwrap();
            }
            String::from_utf8(self.repl.out.clone()).unwrap()
        }

        fn open(&mut self, file: &str) {
            let name = self.path(file);
            self.run(&format!("load \"{name}\""));
        }
    }

    // ── Tokenizer ────────────────────────────────────────────────────────

    #[test]
    fn tokenize_words_and_quotes() {
        assert_eq!(
            tokenize(r#"insert 1:1 "Hello, world" x"#).unwrap(),
            ["insert", "1:1", "Hello, world", "x"]
        );
        assert_eq!(tokenize("  spaced   out  ").unwrap(), ["spaced", "out"]);
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn tokenize_empty_quotes_and_escapes() {
        assert_eq!(tokenize(r#"append """#).unwrap(), ["append", ""]);
        assert_eq!(
            tokenize(r#"append "say \"hi\" \\ \n""#).unwrap(),
            ["append", r#"say "hi" \ \n"#]
        );
    }

    #[test]
    fn tokenize_unterminated_quote() {
        assert!(tokenize(r#"append "open"#).is_err());
    }

    // ── Text editing ─────────────────────────────────────────────────────

    #[test]
    fn insert_delete_undo_redo() {
        let mut s = Session::new();
        s.open("a.txt");
        s.run("append \"Hello World\"");
        s.run("insert 1:7 \"big \"");
        assert_eq!(s.run("show"), "1: Hello big World\n");

        assert_eq!(s.run("delete 1:7 4"), "Done: delete 1:7 4\n");
        assert_eq!(s.run("show"), "1: Hello World\n");
        assert_eq!(s.run("undo"), "Undone: delete 1:7 4\n");
        assert_eq!(s.run("show"), "1: Hello big World\n");
        s.run("redo");
        assert_eq!(s.run("show"), "1: Hello World\n");
    }

    #[test]
    fn show_range() {
        let mut s = Session::new();
        s.open("a.txt");
        for line in ["one", "two", "three", "four"] {
            s.run(&format!("append {line}"));
        }
        assert_eq!(s.run("show 2:3"), "2: two\n3: three\n");
        assert_eq!(s.run("show 3:9"), "3: three\n4: four\n");
        assert_eq!(s.run("show 4"), "4: four\n");
    }

    #[test]
    fn engine_errors_print_and_continue() {
        let mut s = Session::new();
        s.open("a.txt");
        s.run("append abc");
        let out = s.run("delete 1:2 9");
        assert!(out.starts_with("Error: cannot delete 9 chars at 1:2"), "{out}");
        assert_eq!(s.run("show"), "1: abc\n");
    }

    #[test]
    fn argument_errors() {
        let mut s = Session::new();
        s.open("a.txt");
        assert_eq!(
            s.run("insert 1:1"),
            "Error: insert: missing text (usage: insert <line:col> \"text\")\n"
        );
        assert!(s.run("insert one \"x\"").starts_with("Error: insert: bad position"));
        assert!(s.run("delete 1:1 many").contains("length must be a number"));
        assert!(s.run("append a b").contains("too many arguments"));
        assert!(s.run("frobnicate").contains("unknown command: frobnicate"));
    }

    #[test]
    fn text_commands_on_markup_document() {
        let mut s = Session::new();
        s.open("a.xml");
        assert!(s.run("append x").contains("cannot run on a xml document"));
        assert!(s.run("show").contains("show works on text documents"));
    }

    #[test]
    fn no_active_document() {
        let mut s = Session::new();
        assert_eq!(s.run("append x"), "Error: no active document\n");
        assert_eq!(s.run("editor-list"), "(no open documents)\n");
    }

    // ── Markup editing ───────────────────────────────────────────────────

    #[test]
    fn markup_session() {
        let mut s = Session::new();
        s.open("lib.xml");
        s.run("append-child book b1 root");
        s.run("append-child title t1 b1 \"Rust & Co\"");
        s.run("insert-before note n0 b1");
        assert_eq!(
            s.run("xml-tree"),
            "|- root [id=root]\n  |- note [id=n0]\n  |- book [id=b1]\n    |- title [id=t1] \"Rust & Co\"\n"
        );
        assert_eq!(
            s.run("xml"),
            "<root id=\"root\">\n  <note id=\"n0\"></note>\n  <book id=\"b1\">\n    <title id=\"t1\">Rust &amp; Co</title>\n  </book>\n</root>\n"
        );

        assert!(s.run("edit-id t1 b1").contains("id already exists: b1"));
        s.run("edit-text t1 \"Go\"");
        s.run("delete-element b1");
        assert_eq!(s.run("xml-tree"), "|- root [id=root]\n  |- note [id=n0]\n");
        s.run("undo");
        s.run("undo");
        assert!(s.run("xml").contains("Rust &amp; Co"));
    }

    #[test]
    fn set_changes_rendering() {
        let mut s = Session::new();
        s.open("lib.xml");
        s.run("append-child a a1 root \"<x>\"");
        s.run("set ind=4 noescape");
        assert_eq!(
            s.run("xml"),
            "<root id=\"root\">\n    <a id=\"a1\"><x></a>\n</root>\n"
        );
        assert_eq!(s.run("set"), "indent=4  noescape\n");
        assert!(s.run("set wrap").contains("unknown option: wrap"));
    }

    #[test]
    fn set_rejects_oversized_indent() {
        let mut s = Session::new();
        s.open("lib.xml");
        s.run("append-child a a1 root");
        assert_eq!(
            s.run("set indent=18446744073709551615"),
            "Error: indent=18446744073709551615 is out of range (at most 16)\n"
        );
        assert_eq!(s.run("xml"), "<root id=\"root\">\n  <a id=\"a1\"></a>\n</root>\n");
    }

    #[test]
    fn set_undolevels_limits_history() {
        let mut s = Session::new();
        s.open("a.txt");
        s.run("set ul=1");
        s.run("append one");
        s.run("append two");
        s.run("undo");
        assert_eq!(s.run("undo"), "Nothing to undo\n");
        assert_eq!(s.run("show"), "1: one\n");
    }

    // ── Workspace ────────────────────────────────────────────────────────

    #[test]
    fn init_save_close_list() {
        let mut s = Session::new();
        let a = s.path("a.txt");
        let b = s.path("b.xml");

        assert_eq!(
            s.run(&format!("init text \"{a}\"")),
            format!("Initialized text document: {a}\n")
        );
        s.clock.advance(125);
        s.run(&format!("init xml \"{b}\""));
        assert_eq!(
            s.run("editor-list"),
            format!("1   {a} [modified] (2m)\n2 * {b} [modified] (0s)\n")
        );

        assert_eq!(s.run("save all"), format!("Saved: {a}\nSaved: {b}\n"));
        assert_eq!(
            std::fs::read_to_string(&b).unwrap(),
            "<root id=\"root\"></root>\n"
        );
        assert_eq!(s.run("close"), format!("Closed: {b}\n"));
        assert_eq!(s.run("editor-list"), format!("1 * {a} (2m)\n"));
        assert!(s.run("init binary x").contains("kind must be `text` or `xml`"));
    }

    // ── Command log ──────────────────────────────────────────────────────

    #[test]
    fn with_log_records_editing_commands() {
        let mut s = Session::new();
        let a = s.path("a.txt");
        s.run(&format!("init text \"{a}\" with-log"));
        s.run("append \"first line\"");
        s.run("show");
        s.run("delete 1:1 99");
        s.run("undo");

        let log = s.run("log-show");
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3, "{log}");
        assert!(lines[0].starts_with("session start at "));
        assert!(lines[1].ends_with(" append \"first line\""));
        // Logged before it runs, so failed edits appear too.
        assert!(lines[2].ends_with(" delete 1:1 99"));

        let log_file = s.dir.path().join(".a.txt.log");
        assert_eq!(std::fs::read_to_string(log_file).unwrap(), log);
    }

    #[test]
    fn log_on_and_off_toggle_recording() {
        let mut s = Session::new();
        let a = s.path("a.txt");
        s.open("a.txt");
        assert_eq!(s.run("log-show"), format!("No log for {a}\n"));

        assert_eq!(s.run("log-on"), format!("Logging on: {a}\n"));
        s.run("append one");
        assert_eq!(s.run("log-off"), format!("Logging off: {a}\n"));
        s.run("append two");

        let log = s.run(&format!("log-show \"{a}\""));
        assert!(log.contains(" append one"));
        assert!(!log.contains("two"));
        assert!(s.run("log-on ghost.txt").contains("ghost.txt is not open"));
    }

    #[test]
    fn loading_marked_file_logs_saves() {
        let mut s = Session::new();
        let a = s.path("a.txt");
        std::fs::write(&a, "#log\nbody").unwrap();
        s.open("a.txt");
        s.run("save");
        assert!(s.run("log-show").lines().any(|l| l.ends_with(" save")));
    }

    #[test]
    fn init_rejects_unknown_trailing_word() {
        let mut s = Session::new();
        let a = s.path("a.txt");
        assert!(
            s.run(&format!("init text \"{a}\" with-logs"))
                .contains("expected `with-log`")
        );
    }

    // ── Directory tree ───────────────────────────────────────────────────

    #[test]
    fn dir_tree_lists_visible_entries() {
        let mut s = Session::new();
        std::fs::create_dir(s.dir.path().join("docs")).unwrap();
        std::fs::write(s.dir.path().join("docs/a.txt"), "").unwrap();
        std::fs::write(s.dir.path().join(".hidden"), "").unwrap();
        let root = s.dir.path().display().to_string();

        assert_eq!(
            s.run(&format!("dir-tree \"{root}\"")),
            format!("{root}\n  |- docs\n    |- a.txt\n")
        );
        assert!(s.run(&format!("dir-tree \"{root}/nope\"")).starts_with("Error: "));
    }

    #[test]
    fn exit_refuses_with_unsaved_changes() {
        let mut s = Session::new();
        s.open("a.txt");
        assert!(s.run("exit").contains("unsaved changes in"));
        assert!(s.run("exit!").ends_with("Bye.\n"));
        assert_eq!(s.repl.execute_line("exit!").unwrap(), Flow::Exit);
    }

    #[test]
    fn spell_check_text_and_markup() {
        let mut s = Session::new();
        s.open("a.txt");
        assert_eq!(s.run("spell-check"), "No misspellings found.\n");
        s.run("append \"teh cat\"");
        assert_eq!(
            s.run("spell-check"),
            "1 misspelling(s):\n  \"teh\" at 0, suggestions: the\n"
        );

        s.open("b.xml");
        s.run("append-child p p1 root \"we recieve\"");
        assert!(s.run("spell-check").contains("\"recieve\" at 3"));
    }

    #[test]
    fn snapshot_round_trip_through_prompt() {
        let mut s = Session::new();
        s.open("a.txt");
        s.run("append kept");
        let snap = s.path("session.json");
        assert!(s.run(&format!("snapshot \"{snap}\"")).starts_with("Snapshot written"));

        s.run("close");
        assert_eq!(
            s.run(&format!("restore \"{snap}\"")),
            format!("Restored 1 document(s) from {snap}\n")
        );
        assert_eq!(s.run("show"), "1: kept\n");
    }

    #[test]
    fn run_reads_until_exit() {
        let script = "# comment\nload quill-repl-unsaved.txt\n\nhelp\nexit!\nappend never\n";
        let mut repl = Repl::new(Workspace::new(Options::default()), Vec::new());
        repl.run(script.as_bytes(), false).unwrap();
        let out = String::from_utf8(repl.out).unwrap();
        assert!(out.contains("New file: quill-repl-unsaved.txt"));
        assert!(out.contains("delete-element <id>"));
        assert!(out.ends_with("Bye.\n"));
        assert_eq!(repl.workspace.len(), 1);
    }

    #[test]
    fn run_prints_prompt_and_errors() {
        let mut repl = Repl::new(Workspace::new(Options::default()), Vec::new());
        repl.run("undo\n".as_bytes(), true).unwrap();
        let out = String::from_utf8(repl.out).unwrap();
        assert_eq!(out, "> Error: no active document\n> ");
    }
}

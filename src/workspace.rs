// SPDX-License-Identifier: MIT
//
// Workspace: the ordered set of open documents.
//
// Each open document is keyed by the name it was opened under (a file
// path) and owns its own undo/redo history, so undo in one document never
// reaches into another. One document at a time is active; editing commands
// from the prompt go to it, and the session statistics time it.
//
// File I/O lives here and nowhere else. Engine errors pass through
// unchanged inside `anyhow::Error` so the prompt can print them and carry
// on.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use quill_core::{
    Command, Document, DocumentKind, DocumentSnapshot, History, HistoryStatus, Options,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command_log::LOG_MARKER;
use crate::stats::{Clock, SessionStats, SystemClock, format_duration};

// ─── Open document ──────────────────────────────────────────────────────────

/// A document plus its history, as held by the workspace.
#[derive(Debug)]
pub struct OpenDocument {
    name: String,
    document: Document,
    history: History,
    /// Editing commands are written to the command log.
    logging: bool,
}

impl OpenDocument {
    fn new(name: &str, document: Document, options: &Options) -> Self {
        Self {
            name: name.to_string(),
            document,
            history: History::with_limit(options.undo_levels),
            logging: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }
}

// ─── Targets ────────────────────────────────────────────────────────────────

/// Which documents `save` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget<'a> {
    Active,
    All,
    Named(&'a str),
}

impl<'a> SaveTarget<'a> {
    /// `None` is the active document; the literal `all` is every document.
    #[must_use]
    pub fn from_arg(arg: Option<&'a str>) -> Self {
        match arg {
            None => Self::Active,
            Some("all") => Self::All,
            Some(name) => Self::Named(name),
        }
    }
}

/// What `load` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document was already open and is now active.
    Activated,
    /// The file was read from disk.
    Loaded,
    /// No such file; a new, modified document was opened under the name.
    Created,
}

// ─── Workspace ──────────────────────────────────────────────────────────────

/// All open documents, in the order they were opened.
#[derive(Debug)]
pub struct Workspace {
    documents: Vec<OpenDocument>,
    active: Option<usize>,
    options: Options,
    stats: SessionStats,
}

impl Workspace {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_clock(options, Box::new(SystemClock))
    }

    /// A workspace whose session statistics read time from `clock`.
    #[must_use]
    pub fn with_clock(options: Options, clock: Box<dyn Clock>) -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            options,
            stats: SessionStats::new(clock),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options, resizing every history to the new undo depth.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
        for entry in &mut self.documents {
            entry.history.set_limit(options.undo_levels);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn active(&self) -> Option<&OpenDocument> {
        self.active.map(|i| &self.documents[i])
    }

    /// Names of documents with unsaved changes.
    #[must_use]
    pub fn unsaved(&self) -> Vec<&str> {
        self.documents
            .iter()
            .filter(|entry| entry.document.is_modified())
            .map(OpenDocument::name)
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.documents.iter().position(|entry| entry.name == name)
    }

    /// Index of `name`, or of the active document when no name is given.
    fn target(&self, name: Option<&str>) -> Result<usize> {
        match name {
            Some(name) => match self.position(name) {
                Some(i) => Ok(i),
                None => bail!("{name} is not open"),
            },
            None => match self.active {
                Some(i) => Ok(i),
                None => bail!("no active document"),
            },
        }
    }

    fn active_mut(&mut self) -> Result<&mut OpenDocument> {
        match self.active {
            Some(i) => Ok(&mut self.documents[i]),
            None => bail!("no active document"),
        }
    }

    fn activate(&mut self, index: usize) {
        self.active = Some(index);
        self.stats.activate(&self.documents[index].name);
    }

    /// Open `document` as a fresh entry and make it active. Its session
    /// time starts from zero.
    fn push(&mut self, name: &str, document: Document, logging: bool) {
        let mut entry = OpenDocument::new(name, document, &self.options);
        entry.logging = logging;
        self.documents.push(entry);
        self.stats.reset(name);
        self.activate(self.documents.len() - 1);
    }

    // -- Opening and closing -------------------------------------------------

    /// Open a new, empty document under `name` without touching the disk.
    /// It starts modified so a later `save` creates the file.
    ///
    /// With `with_log`, logging starts on; a text document also gets the
    /// `#log` marker as its first line so reloading it keeps logging on.
    ///
    /// # Errors
    ///
    /// `name` is already open, or a file by that name already exists.
    pub fn init(&mut self, kind: DocumentKind, name: &str, with_log: bool) -> Result<()> {
        if self.position(name).is_some() {
            bail!("{name} is already open");
        }
        if Path::new(name).exists() {
            bail!("file already exists: {name}");
        }
        let mut document = if with_log && kind == DocumentKind::Text {
            Document::from_content(kind, LOG_MARKER)?
        } else {
            Document::new(kind)
        };
        document.set_modified(true);
        self.push(name, document, with_log);
        info!(name, %kind, with_log, "document initialized");
        Ok(())
    }

    /// Make `name` active, reading it from disk first if it is not open.
    /// `.xml` files open as markup, everything else as text. A text file
    /// whose first line is `#log` opens with logging on.
    ///
    /// # Errors
    ///
    /// The file exists but cannot be read, or its markup does not parse.
    pub fn load(&mut self, name: &str) -> Result<LoadOutcome> {
        if let Some(i) = self.position(name) {
            self.activate(i);
            return Ok(LoadOutcome::Activated);
        }

        let kind = DocumentKind::from_file_name(name);
        let path = Path::new(name);
        let (document, outcome, logging) = if path.exists() {
            let content =
                fs::read_to_string(path).with_context(|| format!("cannot read {name}"))?;
            let document = Document::from_content(kind, &content)
                .with_context(|| format!("cannot load {name}"))?;
            let marked = kind == DocumentKind::Text
                && content.lines().next().is_some_and(|first| first.trim() == LOG_MARKER);
            (document, LoadOutcome::Loaded, marked)
        } else {
            let mut document = Document::new(kind);
            document.set_modified(true);
            (document, LoadOutcome::Created, false)
        };

        self.push(name, document, logging);
        info!(name, %kind, ?outcome, "document opened");
        Ok(outcome)
    }

    /// Write documents to their files and clear their modified flags.
    /// Returns the names written.
    ///
    /// # Errors
    ///
    /// No such document, or a write failed. With [`SaveTarget::All`] the
    /// documents before the failing one stay saved.
    pub fn save(&mut self, target: SaveTarget<'_>) -> Result<Vec<String>> {
        let indices: Vec<usize> = match target {
            SaveTarget::Active => match self.active {
                Some(i) => vec![i],
                None => bail!("no active document"),
            },
            SaveTarget::All => (0..self.documents.len()).collect(),
            SaveTarget::Named(name) => match self.position(name) {
                Some(i) => vec![i],
                None => bail!("{name} is not open"),
            },
        };

        let style = self.options.markup_style();
        let mut saved = Vec::with_capacity(indices.len());
        for i in indices {
            let entry = &mut self.documents[i];
            fs::write(&entry.name, entry.document.render(style))
                .with_context(|| format!("cannot write {}", entry.name))?;
            entry.document.set_modified(false);
            debug!(name = %entry.name, "document saved");
            saved.push(entry.name.clone());
        }
        Ok(saved)
    }

    /// Close `name` (or the active document), discarding unsaved changes.
    /// If the active document closes, the first remaining one becomes
    /// active.
    ///
    /// # Errors
    ///
    /// No such document, or nothing is open.
    pub fn close(&mut self, name: Option<&str>) -> Result<OpenDocument> {
        let index = self.target(name)?;

        let closed = self.documents.remove(index);
        self.stats.deactivate(&closed.name);
        match self.active {
            Some(a) if a == index => {
                self.active = None;
                if !self.documents.is_empty() {
                    self.activate(0);
                }
            }
            Some(a) if a > index => self.active = Some(a - 1),
            _ => {}
        }
        info!(name = %closed.name, "document closed");
        Ok(closed)
    }

    /// One line per open document: position, `*` for the active one, name,
    /// `[modified]` when there are unsaved changes, and the time spent with
    /// the document active.
    #[must_use]
    pub fn listing(&self) -> Vec<String> {
        self.documents
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mark = if Some(i) == self.active { "*" } else { " " };
                let modified = if entry.document.is_modified() {
                    " [modified]"
                } else {
                    ""
                };
                let active_for = format_duration(self.stats.duration(&entry.name));
                format!("{} {mark} {}{modified} ({active_for})", i + 1, entry.name)
            })
            .collect()
    }

    /// Name of the active document if its editing commands are logged.
    #[must_use]
    pub fn logged_document(&self) -> Option<&str> {
        self.active()
            .filter(|entry| entry.logging)
            .map(OpenDocument::name)
    }

    /// Turn logging on or off for `name` (or the active document).
    /// Returns the document's name.
    ///
    /// # Errors
    ///
    /// No such document, or nothing is open.
    pub fn set_logging(&mut self, name: Option<&str>, on: bool) -> Result<&str> {
        let index = self.target(name)?;
        let entry = &mut self.documents[index];
        entry.logging = on;
        debug!(name = %entry.name, on, "command logging changed");
        Ok(&entry.name)
    }

    // -- Editing the active document -----------------------------------------

    /// Run `cmd` against the active document through its history.
    ///
    /// # Errors
    ///
    /// No active document, or the engine rejected the command.
    pub fn execute(&mut self, cmd: Command) -> Result<HistoryStatus> {
        let entry = self.active_mut()?;
        Ok(entry.history.execute(&mut entry.document, cmd)?)
    }

    /// Undo the last command on the active document.
    ///
    /// # Errors
    ///
    /// No active document.
    pub fn undo(&mut self) -> Result<HistoryStatus> {
        let entry = self.active_mut()?;
        Ok(entry.history.undo(&mut entry.document)?)
    }

    /// Redo the last undone command on the active document.
    ///
    /// # Errors
    ///
    /// No active document.
    pub fn redo(&mut self) -> Result<HistoryStatus> {
        let entry = self.active_mut()?;
        Ok(entry.history.redo(&mut entry.document)?)
    }

    // -- Snapshots -----------------------------------------------------------

    /// Write every open document (content, kind, modified flag) and the
    /// active name to `path` as JSON. Histories are not included.
    ///
    /// # Errors
    ///
    /// Serialization or write failure.
    pub fn snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = WorkspaceSnapshot {
            active: self.active().map(|entry| entry.name.clone()),
            documents: self
                .documents
                .iter()
                .map(|entry| NamedSnapshot {
                    name: entry.name.clone(),
                    document: entry.document.snapshot(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, json)
            .with_context(|| format!("cannot write snapshot {}", path.display()))?;
        debug!(path = %path.display(), documents = self.documents.len(), "snapshot written");
        Ok(())
    }

    /// Replace every open document with those in the snapshot at `path`.
    /// Histories start empty. Returns the number of documents restored.
    ///
    /// # Errors
    ///
    /// Unreadable or malformed snapshot; the workspace is left unchanged.
    pub fn restore(&mut self, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("cannot read snapshot {}", path.display()))?;
        let snapshot: WorkspaceSnapshot = serde_json::from_str(&json)
            .with_context(|| format!("malformed snapshot {}", path.display()))?;

        let mut documents = Vec::with_capacity(snapshot.documents.len());
        for named in &snapshot.documents {
            let document = Document::from_snapshot(&named.document)
                .with_context(|| format!("cannot restore {}", named.name))?;
            documents.push(OpenDocument::new(&named.name, document, &self.options));
        }

        self.documents = documents;
        self.active = None;
        for entry in &self.documents {
            self.stats.reset(&entry.name);
        }
        let active = snapshot
            .active
            .as_deref()
            .and_then(|name| self.position(name))
            .or_else(|| (!self.documents.is_empty()).then_some(0));
        if let Some(i) = active {
            self.activate(i);
        }
        info!(path = %path.display(), documents = self.documents.len(), "snapshot restored");
        Ok(self.documents.len())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkspaceSnapshot {
    active: Option<String>,
    documents: Vec<NamedSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NamedSnapshot {
    name: String,
    #[serde(flatten)]
    document: DocumentSnapshot,
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::testing::ManualClock;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn path_in(dir: &TempDir, file: &str) -> String {
        dir.path().join(file).to_string_lossy().into_owned()
    }

    fn workspace() -> Workspace {
        Workspace::new(Options::default())
    }

    impl Workspace {
        fn get(&self, name: &str) -> Option<&OpenDocument> {
            self.position(name).map(|i| &self.documents[i])
        }
    }

    impl OpenDocument {
        const fn history(&self) -> &History {
            &self.history
        }
    }

    // ── Open / close ─────────────────────────────────────────────────────

    #[test]
    fn load_missing_file_creates_modified_document() {
        let dir = TempDir::new().unwrap();
        let name = path_in(&dir, "new.txt");
        let mut ws = workspace();

        assert_eq!(ws.load(&name).unwrap(), LoadOutcome::Created);
        let active = ws.active().unwrap();
        assert_eq!(active.name(), name);
        assert!(active.document().is_modified());
        assert_eq!(active.document().kind(), DocumentKind::Text);
    }

    #[test]
    fn load_reads_text_and_markup() {
        let dir = TempDir::new().unwrap();
        let txt = path_in(&dir, "a.txt");
        let xml = path_in(&dir, "b.xml");
        fs::write(&txt, "one\ntwo").unwrap();
        fs::write(&xml, "<lib id=\"l\"><b id=\"b1\">Rust</b></lib>").unwrap();

        let mut ws = workspace();
        assert_eq!(ws.load(&txt).unwrap(), LoadOutcome::Loaded);
        assert_eq!(ws.load(&xml).unwrap(), LoadOutcome::Loaded);
        assert_eq!(ws.len(), 2);

        let doc = ws.get(&xml).unwrap().document();
        assert_eq!(doc.kind(), DocumentKind::Markup);
        assert!(!doc.is_modified());
        assert_eq!(ws.get(&txt).unwrap().document().content(), "one\ntwo");
    }

    #[test]
    fn load_already_open_activates() {
        let dir = TempDir::new().unwrap();
        let a = path_in(&dir, "a.txt");
        let b = path_in(&dir, "b.txt");
        let mut ws = workspace();
        ws.load(&a).unwrap();
        ws.load(&b).unwrap();

        assert_eq!(ws.load(&a).unwrap(), LoadOutcome::Activated);
        assert_eq!(ws.active().unwrap().name(), a);
        assert_eq!(ws.len(), 2);
    }

    #[test]
    fn load_bad_markup_fails_and_opens_nothing() {
        let dir = TempDir::new().unwrap();
        let xml = path_in(&dir, "bad.xml");
        fs::write(&xml, "<lib>").unwrap();

        let mut ws = workspace();
        assert!(ws.load(&xml).is_err());
        assert!(ws.is_empty());
    }

    #[test]
    fn init_rejects_existing_file_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let existing = path_in(&dir, "there.txt");
        fs::write(&existing, "x").unwrap();
        let fresh = path_in(&dir, "fresh.xml");

        let mut ws = workspace();
        assert!(ws.init(DocumentKind::Text, &existing, false).is_err());
        ws.init(DocumentKind::Markup, &fresh, false).unwrap();
        assert!(ws.init(DocumentKind::Markup, &fresh, false).is_err());

        let doc = ws.active().unwrap().document();
        assert_eq!(doc.kind(), DocumentKind::Markup);
        assert!(doc.is_modified());
        assert!(!Path::new(&fresh).exists());
    }

    #[test]
    fn close_moves_active_to_first() {
        let dir = TempDir::new().unwrap();
        let (a, b, c) = (path_in(&dir, "a"), path_in(&dir, "b"), path_in(&dir, "c"));
        let mut ws = workspace();
        for name in [&a, &b, &c] {
            ws.load(name).unwrap();
        }

        let closed = ws.close(None).unwrap();
        assert_eq!(closed.name(), c);
        assert_eq!(ws.active().unwrap().name(), a);

        ws.load(&b).unwrap();
        ws.close(Some(&a)).unwrap();
        assert_eq!(ws.active().unwrap().name(), b);

        ws.close(None).unwrap();
        assert!(ws.active().is_none());
        assert!(ws.close(None).is_err());
        assert!(ws.close(Some("nope")).is_err());
    }

    #[test]
    fn listing_marks_active_and_modified() {
        let dir = TempDir::new().unwrap();
        let a = path_in(&dir, "a.txt");
        let b = path_in(&dir, "b.txt");
        fs::write(&a, "saved").unwrap();

        let clock = ManualClock::start();
        let mut ws = Workspace::with_clock(Options::default(), Box::new(clock.clone()));
        ws.load(&a).unwrap();
        clock.advance(90);
        ws.load(&b).unwrap();
        clock.advance(5);
        assert_eq!(
            ws.listing(),
            vec![format!("1   {a} (1m)"), format!("2 * {b} [modified] (5s)")]
        );
        assert_eq!(ws.unsaved(), vec![b.as_str()]);
    }

    #[test]
    fn active_time_follows_switching_and_closing() {
        let dir = TempDir::new().unwrap();
        let a = path_in(&dir, "a.txt");
        let b = path_in(&dir, "b.txt");
        let clock = ManualClock::start();
        let mut ws = Workspace::with_clock(Options::default(), Box::new(clock.clone()));

        ws.load(&a).unwrap();
        clock.advance(10);
        ws.load(&b).unwrap();
        clock.advance(20);
        ws.load(&a).unwrap();
        clock.advance(30);
        assert_eq!(ws.stats.duration(&a), std::time::Duration::from_secs(40));
        assert_eq!(ws.stats.duration(&b), std::time::Duration::from_secs(20));

        // Closing `a` hands the timer to `b`.
        ws.close(Some(&a)).unwrap();
        clock.advance(7);
        assert_eq!(ws.stats.duration(&b), std::time::Duration::from_secs(27));

        // Reopening starts from zero.
        ws.load(&a).unwrap();
        assert_eq!(ws.stats.duration(&a), std::time::Duration::ZERO);
    }

    // ── Command logging ──────────────────────────────────────────────────

    #[test]
    fn init_with_log_marks_text_documents() {
        let dir = TempDir::new().unwrap();
        let txt = path_in(&dir, "a.txt");
        let xml = path_in(&dir, "b.xml");
        let mut ws = workspace();

        ws.init(DocumentKind::Text, &txt, true).unwrap();
        assert_eq!(ws.active().unwrap().document().content(), "#log");
        assert_eq!(ws.logged_document(), Some(txt.as_str()));

        ws.init(DocumentKind::Markup, &xml, true).unwrap();
        assert_eq!(ws.logged_document(), Some(xml.as_str()));
        assert!(!ws.active().unwrap().document().content().contains("#log"));
    }

    #[test]
    fn load_turns_logging_on_for_marked_files() {
        let dir = TempDir::new().unwrap();
        let marked = path_in(&dir, "marked.txt");
        let plain = path_in(&dir, "plain.txt");
        fs::write(&marked, "  #log  \nbody").unwrap();
        fs::write(&plain, "body\n#log").unwrap();

        let mut ws = workspace();
        ws.load(&marked).unwrap();
        assert_eq!(ws.logged_document(), Some(marked.as_str()));
        ws.load(&plain).unwrap();
        assert_eq!(ws.logged_document(), None);
    }

    #[test]
    fn set_logging_on_named_or_active() {
        let dir = TempDir::new().unwrap();
        let a = path_in(&dir, "a.txt");
        let b = path_in(&dir, "b.txt");
        let mut ws = workspace();
        assert!(ws.set_logging(None, true).is_err());

        ws.load(&a).unwrap();
        ws.load(&b).unwrap();
        assert_eq!(ws.set_logging(Some(&a), true).unwrap(), a);
        assert_eq!(ws.logged_document(), None);
        assert!(ws.get(&a).unwrap().logging);

        assert_eq!(ws.set_logging(None, true).unwrap(), b);
        assert_eq!(ws.logged_document(), Some(b.as_str()));
        ws.set_logging(None, false).unwrap();
        assert_eq!(ws.logged_document(), None);
        assert!(ws.set_logging(Some("ghost.txt"), true).is_err());
    }

    // ── Editing ──────────────────────────────────────────────────────────

    #[test]
    fn histories_are_per_document() {
        let dir = TempDir::new().unwrap();
        let a = path_in(&dir, "a.txt");
        let b = path_in(&dir, "b.txt");
        let mut ws = workspace();

        ws.load(&a).unwrap();
        ws.execute(Command::append("in a")).unwrap();
        ws.load(&b).unwrap();
        ws.execute(Command::append("in b")).unwrap();

        ws.undo().unwrap();
        assert_eq!(ws.get(&b).unwrap().document().content(), "");
        assert_eq!(ws.get(&a).unwrap().document().content(), "in a");
        assert_eq!(ws.undo().unwrap(), HistoryStatus::NothingToUndo);
    }

    #[test]
    fn editing_without_active_document_fails() {
        let mut ws = workspace();
        let err = ws.execute(Command::append("x")).unwrap_err();
        assert_eq!(err.to_string(), "no active document");
        assert!(ws.undo().is_err());
    }

    #[test]
    fn engine_errors_pass_through() {
        let dir = TempDir::new().unwrap();
        let mut ws = workspace();
        ws.load(&path_in(&dir, "a.txt")).unwrap();
        let err = ws.execute(Command::delete(1, 1, 1)).unwrap_err();
        assert!(err.downcast_ref::<quill_core::EditError>().is_some());
    }

    #[test]
    fn set_options_resizes_histories() {
        let dir = TempDir::new().unwrap();
        let mut ws = workspace();
        ws.load(&path_in(&dir, "a.txt")).unwrap();
        for line in ["1", "2", "3"] {
            ws.execute(Command::append(line)).unwrap();
        }
        ws.set_options(Options {
            undo_levels: 1,
            ..Options::default()
        });
        assert_eq!(ws.active().unwrap().history().undo_count(), 1);
    }

    // ── Save ─────────────────────────────────────────────────────────────

    #[test]
    fn save_writes_and_clears_modified() {
        let dir = TempDir::new().unwrap();
        let name = path_in(&dir, "out.txt");
        let mut ws = workspace();
        ws.load(&name).unwrap();
        ws.execute(Command::append("hello")).unwrap();

        assert_eq!(ws.save(SaveTarget::Active).unwrap(), vec![name.clone()]);
        assert_eq!(fs::read_to_string(&name).unwrap(), "hello");
        assert!(ws.unsaved().is_empty());
    }

    #[test]
    fn save_all_writes_markup_with_indent() {
        let dir = TempDir::new().unwrap();
        let txt = path_in(&dir, "a.txt");
        let xml = path_in(&dir, "b.xml");
        let mut ws = Workspace::new(Options {
            indent: 4,
            ..Options::default()
        });
        ws.load(&txt).unwrap();
        ws.load(&xml).unwrap();
        ws.execute(Command::append_child("item", "i1", "root", Some("milk".into())))
            .unwrap();

        let saved = ws.save(SaveTarget::from_arg(Some("all"))).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(
            fs::read_to_string(&xml).unwrap(),
            "<root id=\"root\">\n    <item id=\"i1\">milk</item>\n</root>\n"
        );
        assert_eq!(fs::read_to_string(&txt).unwrap(), "");
    }

    #[test]
    fn save_unknown_name_fails() {
        let mut ws = workspace();
        assert!(ws.save(SaveTarget::Named("ghost.txt")).is_err());
        assert!(ws.save(SaveTarget::Active).is_err());
    }

    #[test]
    fn save_target_from_arg() {
        assert_eq!(SaveTarget::from_arg(None), SaveTarget::Active);
        assert_eq!(SaveTarget::from_arg(Some("all")), SaveTarget::All);
        assert_eq!(SaveTarget::from_arg(Some("x")), SaveTarget::Named("x"));
    }

    // ── Snapshots ────────────────────────────────────────────────────────

    #[test]
    fn snapshot_and_restore() {
        let dir = TempDir::new().unwrap();
        let a = path_in(&dir, "a.txt");
        let b = path_in(&dir, "b.xml");
        let snap = dir.path().join("session.json");

        let mut ws = workspace();
        ws.load(&a).unwrap();
        ws.execute(Command::append("kept")).unwrap();
        ws.load(&b).unwrap();
        ws.execute(Command::append_child("p", "p1", "root", None))
            .unwrap();
        ws.load(&a).unwrap();
        ws.snapshot(&snap).unwrap();

        let mut other = workspace();
        assert_eq!(other.restore(&snap).unwrap(), 2);
        assert_eq!(other.active().unwrap().name(), a);
        assert_eq!(other.get(&a).unwrap().document().content(), "kept");
        let tree = other.get(&b).unwrap().document().as_tree().unwrap();
        assert!(tree.contains_id("p1"));
        assert!(other.get(&b).unwrap().document().is_modified());
        assert!(!other.active().unwrap().history().can_undo());
    }

    #[test]
    fn restore_malformed_leaves_workspace() {
        let dir = TempDir::new().unwrap();
        let snap = dir.path().join("bad.json");
        fs::write(&snap, "{ not json").unwrap();

        let mut ws = workspace();
        ws.load(&path_in(&dir, "a.txt")).unwrap();
        assert!(ws.restore(&snap).is_err());
        assert_eq!(ws.len(), 1);
    }
}

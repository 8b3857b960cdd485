//! Document tree: the markup document model.
//!
//! A `Tree` is a hierarchy of tagged elements. Every element carries an `id`
//! that is unique across the **whole** tree, an ordered list of children, and
//! optionally a text payload. An element is either a leaf that may hold text
//! or a branch that holds children, never both ("mixed content").
//!
//! # Storage
//!
//! Nodes live in an arena (`Vec` of slots) and refer to each other by
//! [`NodeKey`]. Ownership runs strictly downward: a node's `children` list is
//! the only thing that keeps a subtree reachable. The `parent` key is a
//! back-reference used for navigation (finding a target's siblings, refusing
//! root edits) and is never followed when cloning or freeing.
//!
//! Freed slots go on a free list and are reused by later insertions.
//! [`Clone`] compacts: the copy contains only reachable nodes, in pre-order.
//!
//! # Validation
//!
//! Every mutation checks all of its preconditions before writing anything.
//! Id uniqueness is checked by walking the entire tree, O(n), which is fine
//! for hand-edited documents.

use std::fmt::Write as _;

use tracing::trace;

use crate::error::{EditError, EditResult, StructureViolation};

/// Tag and id given to the root of a fresh tree.
pub const DEFAULT_ROOT: &str = "root";

/// Indentation width used by [`Tree::to_outline`] when none is given.
pub const DEFAULT_INDENT: usize = 2;

/// Widest indentation rendered per nesting level.
pub const MAX_INDENT: usize = 16;

// ---------------------------------------------------------------------------
// NodeKey / Node
// ---------------------------------------------------------------------------

/// Stable handle to a node slot inside one [`Tree`].
///
/// Keys are only meaningful for the tree that produced them and are
/// invalidated when the node is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: String,
    text: Option<String>,
    children: Vec<NodeKey>,
    parent: Option<NodeKey>,
}

impl Node {
    fn new(tag: &str, id: &str, text: Option<&str>) -> Self {
        Self {
            tag: tag.to_string(),
            id: id.to_string(),
            text: text.map(str::to_string),
            children: Vec::new(),
            parent: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A tree of uniquely identified, tagged elements.
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeKey,
    modified: bool,
}

impl Tree {
    // -- Construction -------------------------------------------------------

    /// A tree holding only `<root id="root">`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(DEFAULT_ROOT, DEFAULT_ROOT)
    }

    /// A tree holding a single empty root element.
    #[must_use]
    pub fn with_root(tag: &str, id: &str) -> Self {
        Self {
            slots: vec![Some(Node::new(tag, id, None))],
            free: Vec::new(),
            root: NodeKey(0),
            modified: false,
        }
    }

    // -- Read access --------------------------------------------------------

    /// The root element.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            key: self.root,
        }
    }

    /// Number of elements in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always `false`, a tree has at least its root.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first, pre-order search for the element with `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<NodeRef<'_>> {
        self.find_key(id).map(|key| NodeRef { tree: self, key })
    }

    /// True when any element in the tree carries `id`.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.find_key(id).is_some()
    }

    /// All elements in depth-first pre-order, root first.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.preorder(self.root)
            .map(move |key| NodeRef { tree: self, key })
    }

    /// Text of every element that holds text, in pre-order.
    pub fn leaf_texts(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(|node| node.text())
    }

    /// All text content joined with single spaces, the projection a
    /// spell checker reads.
    #[must_use]
    pub fn collect_text(&self) -> String {
        self.leaf_texts()
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    // -- Mutation -----------------------------------------------------------

    /// Append a new element as the last child of `parent_id`. With `text`
    /// the new element is a leaf holding it; without, an empty branch.
    ///
    /// # Errors
    ///
    /// - [`EditError::DuplicateId`] if `new_id` exists anywhere.
    /// - [`EditError::NotFound`] if `parent_id` does not resolve.
    /// - [`EditError::Structure`] if the parent holds text.
    pub fn append_child(
        &mut self,
        tag: &str,
        new_id: &str,
        parent_id: &str,
        text: Option<&str>,
    ) -> EditResult<NodeKey> {
        self.ensure_free_id(new_id)?;
        let parent = self.resolve(parent_id)?;
        if self.node(parent).text.is_some() {
            return Err(EditError::Structure(
                StructureViolation::TextHolderChildren(parent_id.to_string()),
            ));
        }

        let key = self.alloc(Node::new(tag, new_id, text));
        self.node_mut(key).parent = Some(parent);
        self.node_mut(parent).children.push(key);
        self.modified = true;
        trace!(tag, id = new_id, parent = parent_id, "child appended");
        Ok(key)
    }

    /// Insert a new element immediately before `target_id` among its
    /// siblings.
    ///
    /// # Errors
    ///
    /// - [`EditError::DuplicateId`] if `new_id` exists anywhere.
    /// - [`EditError::NotFound`] if `target_id` does not resolve.
    /// - [`EditError::Structure`] if the target is the root.
    pub fn insert_before(
        &mut self,
        tag: &str,
        new_id: &str,
        target_id: &str,
        text: Option<&str>,
    ) -> EditResult<NodeKey> {
        self.ensure_free_id(new_id)?;
        let target = self.resolve(target_id)?;
        let Some(parent) = self.node(target).parent else {
            return Err(EditError::Structure(StructureViolation::RootSibling));
        };
        let index = self.child_index(parent, target);

        let key = self.alloc(Node::new(tag, new_id, text));
        self.node_mut(key).parent = Some(parent);
        self.node_mut(parent).children.insert(index, key);
        self.modified = true;
        trace!(tag, id = new_id, target = target_id, "sibling inserted");
        Ok(key)
    }

    /// Rename an element in place.
    ///
    /// # Errors
    ///
    /// - [`EditError::DuplicateId`] if `new_id` exists anywhere (including
    ///   `new_id == old_id`).
    /// - [`EditError::NotFound`] if `old_id` does not resolve.
    pub fn edit_id(&mut self, old_id: &str, new_id: &str) -> EditResult<()> {
        self.ensure_free_id(new_id)?;
        let key = self.resolve(old_id)?;
        new_id.clone_into(&mut self.node_mut(key).id);
        self.modified = true;
        trace!(old = old_id, new = new_id, "id renamed");
        Ok(())
    }

    /// Replace the text of a leaf element.
    ///
    /// # Errors
    ///
    /// - [`EditError::NotFound`] if `id` does not resolve.
    /// - [`EditError::Structure`] if the element has children.
    pub fn edit_text(&mut self, id: &str, text: &str) -> EditResult<()> {
        let key = self.resolve(id)?;
        let node = self.node_mut(key);
        if !node.children.is_empty() {
            return Err(EditError::Structure(StructureViolation::BranchText(
                id.to_string(),
            )));
        }
        node.text = Some(text.to_string());
        self.modified = true;
        trace!(id, "text replaced");
        Ok(())
    }

    /// Remove an element and its whole subtree. Every id in the subtree
    /// becomes available again.
    ///
    /// # Errors
    ///
    /// - [`EditError::NotFound`] if `id` does not resolve.
    /// - [`EditError::Structure`] if `id` is the root.
    pub fn delete_element(&mut self, id: &str) -> EditResult<()> {
        let key = self.resolve(id)?;
        let Some(parent) = self.node(key).parent else {
            return Err(EditError::Structure(StructureViolation::RootRemoval));
        };

        let index = self.child_index(parent, key);
        self.node_mut(parent).children.remove(index);

        let doomed: Vec<NodeKey> = self.preorder(key).collect();
        for dead in &doomed {
            self.slots[dead.0] = None;
            self.free.push(dead.0);
        }
        self.modified = true;
        trace!(id, removed = doomed.len(), "subtree deleted");
        Ok(())
    }

    /// Deep-copy the subtree rooted at `id` into a standalone tree whose
    /// root has no parent.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if `id` does not resolve.
    pub fn clone_subtree(&self, id: &str) -> EditResult<Self> {
        let key = self.resolve(id)?;
        Ok(self.compact_from(key))
    }

    // -- Rendering ----------------------------------------------------------

    /// Indented outline, one element per line:
    ///
    /// ```text
    /// |- root [id=root]
    ///   |- title [id=t1] "Rust"
    /// ```
    #[must_use]
    pub fn to_outline(&self) -> String {
        self.to_outline_with(DEFAULT_INDENT)
    }

    /// [`to_outline`](Self::to_outline) with a custom indent width, clamped
    /// to [`MAX_INDENT`].
    #[must_use]
    pub fn to_outline_with(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_outline(indent, &mut out);
        out
    }

    fn write_outline(&self, indent: usize, out: &mut String) {
        let mut stack = vec![(self.root, 0)];
        while let Some((key, depth)) = stack.pop() {
            let node = self.node(key);
            let _ = write!(out, "{}|- {} [id={}]", padding(depth, indent), node.tag, node.id);
            if let Some(text) = &node.text {
                let _ = write!(out, " \"{text}\"");
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
    }

    // -- Metadata -----------------------------------------------------------

    /// True if the tree has been edited since creation or the last save.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Set or clear the modified flag.
    #[inline]
    pub const fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    // -- Internals ----------------------------------------------------------

    fn node(&self, key: NodeKey) -> &Node {
        self.slots[key.0]
            .as_ref()
            .unwrap_or_else(|| unreachable!("stale node key {}", key.0))
    }

    fn node_mut(&mut self, key: NodeKey) -> &mut Node {
        self.slots[key.0]
            .as_mut()
            .unwrap_or_else(|| unreachable!("stale node key {}", key.0))
    }

    fn alloc(&mut self, node: Node) -> NodeKey {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            NodeKey(idx)
        } else {
            self.slots.push(Some(node));
            NodeKey(self.slots.len() - 1)
        }
    }

    fn find_key(&self, id: &str) -> Option<NodeKey> {
        self.preorder(self.root).find(|&key| self.node(key).id == id)
    }

    fn resolve(&self, id: &str) -> EditResult<NodeKey> {
        self.find_key(id)
            .ok_or_else(|| EditError::NotFound(id.to_string()))
    }

    fn ensure_free_id(&self, id: &str) -> EditResult<()> {
        if self.contains_id(id) {
            return Err(EditError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn child_index(&self, parent: NodeKey, child: NodeKey) -> usize {
        self.node(parent)
            .children
            .iter()
            .position(|&k| k == child)
            .unwrap_or_else(|| unreachable!("child not linked to its parent"))
    }

    fn preorder(&self, start: NodeKey) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![start],
        }
    }

    /// Copy the subtree at `start` into a fresh, hole-free arena.
    fn compact_from(&self, start: NodeKey) -> Self {
        let mut slots: Vec<Option<Node>> = Vec::with_capacity(self.len());
        let mut remap = std::collections::HashMap::new();

        for old in self.preorder(start) {
            let src = self.node(old);
            let new = NodeKey(slots.len());
            remap.insert(old, new);
            let parent = if old == start {
                None
            } else {
                src.parent.map(|p| remap[&p])
            };
            slots.push(Some(Node {
                tag: src.tag.clone(),
                id: src.id.clone(),
                text: src.text.clone(),
                children: Vec::with_capacity(src.children.len()),
                parent,
            }));
            if let Some(p) = parent {
                if let Some(node) = slots[p.0].as_mut() {
                    node.children.push(new);
                }
            }
        }

        Self {
            slots,
            free: Vec::new(),
            root: NodeKey(0),
            modified: self.modified,
        }
    }
}

/// Leading spaces for an element `depth` levels down.
pub(crate) fn padding(depth: usize, indent: usize) -> String {
    " ".repeat(depth.saturating_mul(indent.min(MAX_INDENT)))
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy of the reachable tree, compacted. Undo snapshots are made this
/// way.
impl Clone for Tree {
    fn clone(&self) -> Self {
        self.compact_from(self.root)
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Depth-first pre-order walk over node keys.
struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeKey>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(key).children.iter().rev().copied());
        Some(key)
    }
}

// ---------------------------------------------------------------------------
// NodeRef
// ---------------------------------------------------------------------------

/// Read-only view of one element.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    key: NodeKey,
}

impl<'a> NodeRef<'a> {
    /// The arena handle of this element.
    #[must_use]
    pub const fn key(self) -> NodeKey {
        self.key
    }

    #[must_use]
    pub fn tag(self) -> &'a str {
        &self.tree.node(self.key).tag
    }

    #[must_use]
    pub fn id(self) -> &'a str {
        &self.tree.node(self.key).id
    }

    #[must_use]
    pub fn text(self) -> Option<&'a str> {
        self.tree.node(self.key).text.as_deref()
    }

    /// The parent element, `None` for the root.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        self.tree.node(self.key).parent.map(|key| Self {
            tree: self.tree,
            key,
        })
    }

    /// Children in document order.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.node(self.key)
            .children
            .iter()
            .map(move |&key| NodeRef { tree, key })
    }

    #[must_use]
    pub fn child_count(self) -> usize {
        self.tree.node(self.key).children.len()
    }

    /// True when the element has no children.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        self.tree.node(self.key).children.is_empty()
    }

    #[must_use]
    pub fn is_root(self) -> bool {
        self.key == self.tree.root
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("tag", &self.tag())
            .field("id", &self.id())
            .field("text", &self.text())
            .field("children", &self.child_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    /// root > [book b1 > [title t1 "Rust", author a1 "Ferris"], note n1]
    fn library() -> Tree {
        let mut t = Tree::new();
        t.append_child("book", "b1", "root", None).unwrap();
        t.append_child("title", "t1", "b1", Some("Rust")).unwrap();
        t.append_child("author", "a1", "b1", Some("Ferris")).unwrap();
        t.append_child("note", "n1", "root", None).unwrap();
        t
    }

    fn child_ids(t: &Tree, id: &str) -> Vec<String> {
        t.find_by_id(id)
            .unwrap()
            .children()
            .map(|c| c.id().to_string())
            .collect()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_tree_has_root_only() {
        let t = Tree::new();
        let root = t.root();
        assert_eq!(root.tag(), "root");
        assert_eq!(root.id(), "root");
        assert!(root.is_root());
        assert!(root.parent().is_none());
        assert_eq!(root.child_count(), 0);
        assert_eq!(t.len(), 1);
        assert!(!t.is_modified());
    }

    // -- Search -------------------------------------------------------------

    #[test]
    fn find_by_id_anywhere() {
        let t = library();
        let title = t.find_by_id("t1").unwrap();
        assert_eq!(title.tag(), "title");
        assert_eq!(title.text(), Some("Rust"));
        assert_eq!(title.parent().unwrap().id(), "b1");
        assert!(t.find_by_id("nope").is_none());
    }

    #[test]
    fn iter_is_preorder() {
        let t = library();
        let ids: Vec<_> = t.iter().map(NodeRef::id).collect();
        assert_eq!(ids, ["root", "b1", "t1", "a1", "n1"]);
    }

    // -- append_child -------------------------------------------------------

    #[test]
    fn append_child_adds_last() {
        let mut t = Tree::new();
        t.append_child("book", "b1", "root", None).unwrap();
        t.append_child("book", "b2", "root", None).unwrap();
        assert_eq!(child_ids(&t, "root"), ["b1", "b2"]);
        assert!(t.is_modified());
    }

    #[test]
    fn append_child_duplicate_anywhere_fails() {
        let mut t = library();
        let before = t.to_outline();
        // t1 lives two levels down, not under `note`.
        let err = t.append_child("x", "t1", "n1", None).unwrap_err();
        assert_eq!(err, EditError::DuplicateId("t1".into()));
        assert_eq!(t.to_outline(), before);
    }

    #[test]
    fn append_child_unknown_parent() {
        let mut t = Tree::new();
        let err = t.append_child("x", "x1", "ghost", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn append_child_to_text_holder_fails() {
        let mut t = library();
        let err = t.append_child("x", "x1", "t1", None).unwrap_err();
        assert_eq!(
            err,
            EditError::Structure(StructureViolation::TextHolderChildren("t1".into()))
        );
        assert!(t.find_by_id("t1").unwrap().is_leaf());
    }

    // -- insert_before ------------------------------------------------------

    #[test]
    fn insert_before_places_sibling() {
        let mut t = library();
        t.insert_before("subtitle", "s1", "a1", Some("2nd ed."))
            .unwrap();
        assert_eq!(child_ids(&t, "b1"), ["t1", "s1", "a1"]);
        assert_eq!(t.find_by_id("s1").unwrap().parent().unwrap().id(), "b1");
    }

    #[test]
    fn insert_before_first_child() {
        let mut t = library();
        t.insert_before("preface", "p1", "b1", None).unwrap();
        assert_eq!(child_ids(&t, "root"), ["p1", "b1", "n1"]);
    }

    #[test]
    fn insert_before_root_fails() {
        let mut t = library();
        let err = t.insert_before("x", "x1", "root", None).unwrap_err();
        assert_eq!(err, EditError::Structure(StructureViolation::RootSibling));
        assert!(!t.contains_id("x1"));
    }

    #[test]
    fn insert_before_duplicate_and_missing() {
        let mut t = library();
        assert_eq!(
            t.insert_before("x", "n1", "a1", None),
            Err(EditError::DuplicateId("n1".into()))
        );
        assert_eq!(
            t.insert_before("x", "x1", "ghost", None),
            Err(EditError::NotFound("ghost".into()))
        );
    }

    // -- edit_id ------------------------------------------------------------

    #[test]
    fn edit_id_renames_in_place() {
        let mut t = library();
        t.edit_id("b1", "book-1").unwrap();
        assert!(t.find_by_id("b1").is_none());
        assert_eq!(child_ids(&t, "book-1"), ["t1", "a1"]);
        assert_eq!(child_ids(&t, "root"), ["book-1", "n1"]);
    }

    #[test]
    fn edit_id_rejects_existing_and_same() {
        let mut t = library();
        assert_eq!(
            t.edit_id("b1", "a1"),
            Err(EditError::DuplicateId("a1".into()))
        );
        assert_eq!(
            t.edit_id("b1", "b1"),
            Err(EditError::DuplicateId("b1".into()))
        );
        assert_eq!(
            t.edit_id("zz", "yy"),
            Err(EditError::NotFound("zz".into()))
        );
    }

    #[test]
    fn edit_root_id_is_allowed() {
        let mut t = Tree::new();
        t.edit_id("root", "doc").unwrap();
        assert_eq!(t.root().id(), "doc");
    }

    // -- edit_text ----------------------------------------------------------

    #[test]
    fn edit_text_on_leaf() {
        let mut t = library();
        t.edit_text("t1", "The Rust Book").unwrap();
        assert_eq!(t.find_by_id("t1").unwrap().text(), Some("The Rust Book"));
    }

    #[test]
    fn edit_text_on_empty_branch_makes_leaf() {
        let mut t = library();
        t.edit_text("n1", "remember").unwrap();
        assert_eq!(t.find_by_id("n1").unwrap().text(), Some("remember"));
    }

    #[test]
    fn edit_text_on_branch_fails() {
        let mut t = Tree::new();
        t.append_child("parent", "p1", "root", None).unwrap();
        t.append_child("child", "c1", "p1", None).unwrap();
        let err = t.edit_text("p1", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure);
        assert_eq!(t.find_by_id("p1").unwrap().text(), None);
    }

    // -- delete_element -----------------------------------------------------

    #[test]
    fn delete_removes_whole_subtree() {
        let mut t = library();
        t.delete_element("b1").unwrap();
        for id in ["b1", "t1", "a1"] {
            assert!(t.find_by_id(id).is_none(), "{id} should be gone");
        }
        assert_eq!(child_ids(&t, "root"), ["n1"]);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn deleted_ids_are_reusable() {
        let mut t = library();
        t.delete_element("b1").unwrap();
        t.append_child("title", "t1", "n1", None).unwrap();
        assert_eq!(t.find_by_id("t1").unwrap().parent().unwrap().id(), "n1");
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn delete_root_or_missing_fails() {
        let mut t = library();
        assert_eq!(
            t.delete_element("root"),
            Err(EditError::Structure(StructureViolation::RootRemoval))
        );
        assert_eq!(
            t.delete_element("ghost"),
            Err(EditError::NotFound("ghost".into()))
        );
        assert_eq!(t.len(), 5);
    }

    // -- Clone --------------------------------------------------------------

    #[test]
    fn clone_is_deep_and_compact() {
        let mut t = library();
        t.delete_element("t1").unwrap();
        let copy = t.clone();
        assert_eq!(copy.to_outline(), t.to_outline());
        assert_eq!(copy.slots.len(), copy.len());

        t.edit_text("a1", "Corro").unwrap();
        assert_eq!(copy.find_by_id("a1").unwrap().text(), Some("Ferris"));
    }

    #[test]
    fn clone_subtree_detaches_root() {
        let t = library();
        let sub = t.clone_subtree("b1").unwrap();
        assert_eq!(sub.root().id(), "b1");
        assert!(sub.root().parent().is_none());
        assert_eq!(sub.len(), 3);
        assert!(!sub.contains_id("n1"));
        assert!(t.clone_subtree("ghost").is_err());
    }

    // -- Rendering ----------------------------------------------------------

    #[test]
    fn outline_format() {
        let t = library();
        assert_eq!(
            t.to_outline(),
            "|- root [id=root]\n\
             \x20 |- book [id=b1]\n\
             \x20   |- title [id=t1] \"Rust\"\n\
             \x20   |- author [id=a1] \"Ferris\"\n\
             \x20 |- note [id=n1]\n"
        );
    }

    #[test]
    fn outline_custom_indent() {
        let mut t = Tree::new();
        t.append_child("a", "a1", "root", None).unwrap();
        assert_eq!(t.to_outline_with(4), "|- root [id=root]\n    |- a [id=a1]\n");
    }

    #[test]
    fn outline_clamps_huge_indent() {
        let mut t = Tree::new();
        t.append_child("a", "a1", "root", None).unwrap();
        let pad = " ".repeat(MAX_INDENT);
        assert_eq!(
            t.to_outline_with(usize::MAX),
            format!("|- root [id=root]\n{pad}|- a [id=a1]\n")
        );
    }

    #[test]
    fn outline_of_deep_chain() {
        let mut t = Tree::new();
        let mut parent = "root".to_string();
        for i in 0..3000 {
            let id = format!("n{i}");
            t.append_child("n", &id, &parent, None).unwrap();
            parent = id;
        }
        let outline = t.to_outline_with(0);
        assert_eq!(outline.lines().count(), 3001);
        assert_eq!(outline.lines().last(), Some("|- n [id=n2999]"));
    }

    #[test]
    fn collect_text_joins_leaves() {
        let t = library();
        assert_eq!(t.collect_text(), "Rust Ferris");
        assert_eq!(Tree::new().collect_text(), "");
    }
}

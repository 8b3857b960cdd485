//! Markup text ⇄ [`Tree`].
//!
//! The writer emits one element per line, indented by depth, with the `id`
//! attribute on every open tag and leaf text inlined:
//!
//! ```text
//! <root id="root">
//!   <book id="b1">
//!     <title id="t1">Rust</title>
//!   </book>
//!   <note id="n1"></note>
//! </root>
//! ```
//!
//! The reader accepts that output back, plus the small amount of slack a
//! hand-edited file needs: an `<?xml ...?>` prolog, `<!-- comments -->`,
//! self-closing `<tag id="x"/>`, either quote style, and the five predefined
//! entities plus numeric character references. It enforces what the tree
//! enforces: an `id` on every element, ids unique, no mixed content, and
//! rejects anything else (other attributes, DTDs, CDATA).

use crate::error::{EditError, EditResult};
use crate::tree::{DEFAULT_INDENT, NodeRef, Tree, padding};

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// How [`write`] lays out markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupStyle {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Escape `&`, `<`, `>` in text and `"` in attribute values.
    pub escape: bool,
}

impl Default for MarkupStyle {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            escape: true,
        }
    }
}

/// Render the tree as markup using the default style.
#[must_use]
pub fn to_markup(tree: &Tree) -> String {
    write(tree, MarkupStyle::default())
}

/// Render the tree as markup.
///
/// Indent widths above [`MAX_INDENT`](crate::tree::MAX_INDENT) are clamped.
#[must_use]
pub fn write(tree: &Tree, style: MarkupStyle) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open(tree.root(), 0)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(node, depth) => {
                out.push_str(&padding(depth, style.indent));
                out.push('<');
                out.push_str(node.tag());
                out.push_str(" id=\"");
                push_escaped(&mut out, node.id(), style.escape, true);
                out.push_str("\">");

                if let Some(text) = node.text() {
                    push_escaped(&mut out, text, style.escape, false);
                    push_close(&mut out, node.tag());
                } else if node.is_leaf() {
                    push_close(&mut out, node.tag());
                } else {
                    out.push('\n');
                    stack.push(Step::Close(node, depth));
                    let children: Vec<_> = node.children().collect();
                    stack.extend(children.into_iter().rev().map(|c| Step::Open(c, depth + 1)));
                }
            }
            Step::Close(node, depth) => {
                out.push_str(&padding(depth, style.indent));
                push_close(&mut out, node.tag());
            }
        }
    }
    out
}

/// Pending work for [`write`]: open an element, or close one whose
/// children have been written.
enum Step<'a> {
    Open(NodeRef<'a>, usize),
    Close(NodeRef<'a>, usize),
}

fn push_close(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

fn push_escaped(out: &mut String, s: &str, escape: bool, attribute: bool) {
    if !escape {
        out.push_str(s);
        return;
    }
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Parse markup into a tree. The result starts unmodified.
///
/// # Errors
///
/// - [`EditError::Parse`] on malformed markup.
/// - [`EditError::DuplicateId`] when two elements share an id.
pub fn parse(src: &str) -> EditResult<Tree> {
    let mut reader = Reader {
        src,
        pos: 0,
        depth: 0,
    };
    reader.skip_misc()?;
    if reader.eat("<?") {
        reader.skip_past("?>")?;
        reader.skip_misc()?;
    }

    let root = reader.element()?;
    reader.skip_misc()?;
    if reader.pos < src.len() {
        return Err(reader.error("unexpected content after the root element"));
    }

    let mut tree = Tree::with_root(&root.tag, &root.id);
    if let Some(text) = &root.text {
        tree.edit_text(&root.id, text)?;
    }
    attach(&mut tree, &root)?;
    tree.set_modified(false);
    Ok(tree)
}

/// Deepest element nesting [`parse`] accepts.
pub const MAX_DEPTH: usize = 256;

/// An element as read, before it is placed in a tree.
#[derive(Debug)]
struct Element {
    tag: String,
    id: String,
    text: Option<String>,
    children: Vec<Element>,
}

/// Place `el`'s descendants under it, parents before children.
fn attach(tree: &mut Tree, el: &Element) -> EditResult<()> {
    let mut pending: Vec<(&str, &Element)> =
        el.children.iter().rev().map(|c| (el.id.as_str(), c)).collect();
    while let Some((parent_id, child)) = pending.pop() {
        tree.append_child(&child.tag, &child.id, parent_id, child.text.as_deref())?;
        pending.extend(child.children.iter().rev().map(|c| (child.id.as_str(), c)));
    }
    Ok(())
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    /// Elements currently open.
    depth: usize,
}

impl Reader<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn error(&self, message: &str) -> EditError {
        EditError::Parse {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> EditResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{token}`")))
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn skip_past(&mut self, token: &str) -> EditResult<()> {
        match self.rest().find(token) {
            Some(at) => {
                self.pos += at + token.len();
                Ok(())
            }
            None => Err(self.error(&format!("unterminated construct, missing `{token}`"))),
        }
    }

    /// Skip whitespace and comments.
    fn skip_misc(&mut self) -> EditResult<()> {
        loop {
            self.skip_ws();
            if self.eat("<!--") {
                self.skip_past("-->")?;
            } else {
                return Ok(());
            }
        }
    }

    fn name(&mut self) -> EditResult<String> {
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(self.error("expected a name"));
        }
        let name = self.rest()[..len].to_string();
        self.pos += len;
        Ok(name)
    }

    fn quoted(&mut self) -> EditResult<String> {
        let quote = match self.rest().chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected a quoted attribute value")),
        };
        self.pos += 1;
        let Some(end) = self.rest().find(quote) else {
            return Err(self.error("unterminated attribute value"));
        };
        let start = self.pos;
        let raw = &self.src[start..start + end];
        self.pos += end + 1;
        unescape(raw, start)
    }

    fn element(&mut self) -> EditResult<Element> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(&format!("elements nested deeper than {MAX_DEPTH} levels")));
        }
        self.depth += 1;
        let element = self.element_body();
        self.depth -= 1;
        element
    }

    fn element_body(&mut self) -> EditResult<Element> {
        self.expect("<")?;
        let tag = self.name()?;

        let mut id = None;
        loop {
            self.skip_ws();
            if self.eat("/>") {
                let id = id.ok_or_else(|| self.error(&format!("<{tag}> has no id")))?;
                return Ok(Element {
                    tag,
                    id,
                    text: None,
                    children: Vec::new(),
                });
            }
            if self.eat(">") {
                break;
            }
            let attr_at = self.pos;
            let attr = self.name()?;
            self.skip_ws();
            self.expect("=")?;
            self.skip_ws();
            let value = self.quoted()?;
            if attr != "id" {
                return Err(EditError::Parse {
                    offset: attr_at,
                    message: format!("unsupported attribute `{attr}`"),
                });
            }
            if id.replace(value).is_some() {
                return Err(EditError::Parse {
                    offset: attr_at,
                    message: "duplicate id attribute".to_string(),
                });
            }
        }
        let id = id.ok_or_else(|| self.error(&format!("<{tag}> has no id")))?;

        let mut children = Vec::new();
        let mut text = String::new();
        let text_start = self.pos;
        loop {
            let Some(lt) = self.rest().find('<') else {
                return Err(self.error(&format!("<{tag}> is never closed")));
            };
            text.push_str(&self.rest()[..lt]);
            self.pos += lt;

            if self.rest().starts_with("<!--") {
                self.pos += 4;
                self.skip_past("-->")?;
            } else if self.eat("</") {
                let close = self.name()?;
                if close != tag {
                    return Err(self.error(&format!("expected </{tag}>, found </{close}>")));
                }
                self.skip_ws();
                self.expect(">")?;
                break;
            } else if self.rest().starts_with("<!") || self.rest().starts_with("<?") {
                return Err(self.error("unsupported markup declaration"));
            } else {
                children.push(self.element()?);
            }
        }

        let text = if children.is_empty() {
            (!text.is_empty())
                .then(|| unescape(&text, text_start))
                .transpose()?
        } else if text.trim().is_empty() {
            None
        } else {
            return Err(EditError::Parse {
                offset: text_start,
                message: format!("<{tag} id=\"{id}\"> mixes text and child elements"),
            });
        };

        Ok(Element {
            tag,
            id,
            text,
            children,
        })
    }
}

/// Resolve entity and character references.
fn unescape(raw: &str, offset: usize) -> EditResult<String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            return Err(EditError::Parse {
                offset: offset + raw.len() - rest.len() + amp,
                message: "unterminated entity".to_string(),
            });
        };
        let entity = &after[..semi];
        let ch = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity.strip_prefix('#').and_then(|num| {
                num.strip_prefix('x')
                    .map_or_else(|| num.parse().ok(), |hex| u32::from_str_radix(hex, 16).ok())
                    .and_then(char::from_u32)
            }),
        };
        let Some(ch) = ch else {
            return Err(EditError::Parse {
                offset: offset + raw.len() - rest.len() + amp,
                message: format!("unknown entity `&{entity};`"),
            });
        };
        out.push(ch);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

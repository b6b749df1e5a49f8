//! Document index outline.
//!
//! The help center index is a markdown file (`SUMMARY.md`) made of indented
//! link list items:
//!
//! ```text
//! - [Guide](guide/README.md)
//!   - [Rules](guide/rules.md)
//!   - [OML](guide/oml.md)
//! - [FAQ](faq.md)
//! ```
//!
//! [`parse`] turns it into a flat list of [`OutlineEntry`] values and
//! [`build`] folds that list into a forest of [`OutlineNode`]s using only the
//! indentation level of each entry.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Spaces per indentation level.
pub const INDENT_UNIT: usize = 2;

static LINK_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)- \[(.+?)\]\((.+?)\)").expect("link item pattern"));

/// One parsed index line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// `"{title}-{path}"`. Entries with the same title and target collide.
    pub id: String,
    pub title: String,
    pub path: String,
    pub level: usize,
}

impl OutlineEntry {
    pub fn new(title: impl Into<String>, path: impl Into<String>, level: usize) -> Self {
        let title = title.into();
        let path = path.into();
        Self {
            id: format!("{title}-{path}"),
            title,
            path,
            level,
        }
    }

    /// Whether the entry links to a markdown document.
    pub fn is_document(&self) -> bool {
        self.path.ends_with(".md")
    }
}

/// A node of the navigation forest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub title: String,
    /// The id of the entry this node was built from.
    pub key: String,
    pub path: String,
    pub level: usize,
    pub children: Vec<OutlineNode>,
}

impl From<&OutlineEntry> for OutlineNode {
    fn from(entry: &OutlineEntry) -> Self {
        Self {
            title: entry.title.clone(),
            key: entry.id.clone(),
            path: entry.path.clone(),
            level: entry.level,
            children: Vec::new(),
        }
    }
}

impl OutlineNode {
    /// Depth-first search by key.
    pub fn find(&self, key: &str) -> Option<&OutlineNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::len).sum::<usize>()
    }
}

/// Parse index markdown into entries, in document order.
///
/// Lines that are not indented link items are skipped. Both `\n` and
/// `\r\n` line endings are accepted.
pub fn parse(markdown: &str) -> Vec<OutlineEntry> {
    markdown
        .lines()
        .filter_map(|line| {
            let captures = LINK_ITEM.captures(line)?;
            let indent = captures.get(1).map_or(0, |m| m.as_str().chars().count());
            Some(OutlineEntry::new(
                &captures[2],
                &captures[3],
                indent / INDENT_UNIT,
            ))
        })
        .collect()
}

/// Fold entries into a forest.
///
/// Keeps a stack of open nodes. Each entry first closes every open node at
/// its own level or deeper, then becomes a child of whatever is left on top
/// (or a root when nothing is). Entries at equal levels are therefore
/// siblings, and an entry that skips levels attaches to the nearest open
/// ancestor.
pub fn build(entries: &[OutlineEntry]) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    // Open nodes are owned by the stack until they are closed, then moved
    // into their parent (or the roots).
    let mut stack: Vec<OutlineNode> = Vec::new();

    for entry in entries {
        while stack.last().is_some_and(|top| top.level >= entry.level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineNode::from(entry));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn close_top(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    let Some(node) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// The entry a viewer opens first: the first markdown document, else the
/// first entry.
pub fn first_document(entries: &[OutlineEntry]) -> Option<&OutlineEntry> {
    entries
        .iter()
        .find(|entry| entry.is_document())
        .or_else(|| entries.first())
}

/// Keep nodes whose title contains `query` (case-insensitive) along with
/// their ancestors. A matching node keeps its whole subtree. An empty query
/// keeps everything.
pub fn filter_forest(forest: &[OutlineNode], query: &str) -> Vec<OutlineNode> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return forest.to_vec();
    }
    forest
        .iter()
        .filter_map(|node| filter_node(node, &query))
        .collect()
}

fn filter_node(node: &OutlineNode, query: &str) -> Option<OutlineNode> {
    if node.title.to_lowercase().contains(query) {
        return Some(node.clone());
    }
    let children: Vec<OutlineNode> = node
        .children
        .iter()
        .filter_map(|child| filter_node(child, query))
        .collect();
    if children.is_empty() {
        return None;
    }
    Some(OutlineNode {
        title: node.title.clone(),
        key: node.key.clone(),
        path: node.path.clone(),
        level: node.level,
        children,
    })
}

/// Plain-text rendering, two spaces per tree depth.
pub fn render_outline(forest: &[OutlineNode]) -> String {
    let mut out = String::new();
    for node in forest {
        render_node(&mut out, node, 0);
    }
    out
}

fn render_node(out: &mut String, node: &OutlineNode, depth: usize) {
    let _ = writeln!(
        out,
        "{:indent$}- {} ({})",
        "",
        node.title,
        node.path,
        indent = depth * INDENT_UNIT
    );
    for child in &node.children {
        render_node(out, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, level: usize) -> OutlineEntry {
        OutlineEntry::new(title, format!("{}.md", title.to_lowercase()), level)
    }

    fn titles(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.title.as_str()).collect()
    }

    #[test]
    fn parses_levels_and_ids() {
        let entries = parse("- [Intro](intro.md)\n    - [Deep](a/deep.md)\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "Intro-intro.md");
        assert_eq!(entries[0].level, 0);
        assert_eq!(entries[1].level, 2);
        assert_eq!(entries[1].path, "a/deep.md");
    }

    #[test]
    fn odd_indent_rounds_down() {
        let entries = parse("   - [Three](three.md)");
        assert_eq!(entries[0].level, 1);
    }

    #[test]
    fn crlf_lines() {
        let entries = parse("- [A](a.md)\r\n  - [B](b.md)\r\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].path, "b.md");
    }

    #[test]
    fn siblings_and_roots() {
        let forest = build(&[entry("A", 0), entry("B", 1), entry("C", 1), entry("D", 0)]);
        assert_eq!(titles(&forest), ["A", "D"]);
        assert_eq!(titles(&forest[0].children), ["B", "C"]);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn skipped_depth_attaches_to_open_ancestor() {
        let forest = build(&[entry("A", 0), entry("B", 2)]);
        assert_eq!(titles(&forest), ["A"]);
        assert_eq!(titles(&forest[0].children), ["B"]);
        assert_eq!(forest[0].children[0].level, 2);
    }

    #[test]
    fn shallower_entry_closes_deeper_scopes() {
        let forest = build(&[
            entry("A", 0),
            entry("B", 1),
            entry("C", 2),
            entry("D", 1),
        ]);
        assert_eq!(titles(&forest[0].children), ["B", "D"]);
        assert_eq!(titles(&forest[0].children[0].children), ["C"]);
    }

    #[test]
    fn first_level_above_zero_is_still_a_root() {
        let forest = build(&[entry("A", 1), entry("B", 0)]);
        assert_eq!(titles(&forest), ["A", "B"]);
    }

    #[test]
    fn empty_input() {
        assert!(build(&parse("just prose\n\n")).is_empty());
    }

    #[test]
    fn first_document_prefers_markdown() {
        let entries = vec![
            OutlineEntry::new("Home", "https://example.org", 0),
            OutlineEntry::new("Start", "start.md", 0),
        ];
        assert_eq!(first_document(&entries).map(|e| e.title.as_str()), Some("Start"));
        assert_eq!(
            first_document(&entries[..1]).map(|e| e.title.as_str()),
            Some("Home")
        );
        assert!(first_document(&[]).is_none());
    }

    #[test]
    fn filter_keeps_ancestors() {
        let forest = build(&[
            entry("Guide", 0),
            entry("Rules", 1),
            entry("Oml", 1),
            entry("Faq", 0),
        ]);
        let filtered = filter_forest(&forest, "OML");
        assert_eq!(titles(&filtered), ["Guide"]);
        assert_eq!(titles(&filtered[0].children), ["Oml"]);

        let whole = filter_forest(&forest, "guide");
        assert_eq!(whole[0].children.len(), 2);

        assert_eq!(filter_forest(&forest, "  "), forest);
        assert!(filter_forest(&forest, "nothing").is_empty());
    }

    #[test]
    fn find_and_len() {
        let forest = build(&[entry("A", 0), entry("B", 1), entry("C", 2)]);
        assert_eq!(forest[0].len(), 3);
        assert_eq!(forest[0].find("C-c.md").map(|n| n.level), Some(2));
        assert!(forest[0].find("missing").is_none());
    }
}

//! Document structure: headings, the heading tree, and section access.

use serde::{Deserialize, Serialize};

/// One detected heading line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading depth, 1-6 (number of leading `#` characters).
    pub level: usize,
    /// Trimmed heading content, marker stripped.
    pub text: String,
    /// Zero-based source line index.
    pub line: usize,
    /// Byte offset of the heading line in the source text.
    pub offset: usize,
    /// Byte offset one past the end of the heading line (newline excluded).
    pub end_offset: usize,
}

/// One node of the outline tree, owning its subtree.
///
/// Every child is strictly deeper than its parent and siblings are ordered
/// by ascending source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingNode {
    pub heading: Heading,
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    pub fn new(heading: Heading) -> Self {
        Self {
            heading,
            children: Vec::new(),
        }
    }

    /// Render this subtree with Unicode box-drawing characters.
    pub fn render_box_tree(&self, prefix: &str, is_last: bool) -> String {
        let connector = if is_last { "└── " } else { "├── " };
        let mut out = format!("{}{}{}\n", prefix, connector, self.heading.text);

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        for (i, child) in self.children.iter().enumerate() {
            out.push_str(&child.render_box_tree(&child_prefix, i == self.children.len() - 1));
        }
        out
    }
}

/// Build the heading forest from a flat, ordered heading list.
///
/// Single left-to-right pass over the records with an explicit stack of
/// currently open ancestors: each incoming heading closes every open node at
/// its own level or deeper, then attaches to the nearest remaining ancestor,
/// or becomes a root when none is left. Parent assignment depends only on
/// level and original order.
pub fn build_forest(headings: &[Heading]) -> Vec<HeadingNode> {
    let mut roots: Vec<HeadingNode> = Vec::new();
    let mut stack: Vec<HeadingNode> = Vec::new();

    fn close(stack: &mut Vec<HeadingNode>, roots: &mut Vec<HeadingNode>) {
        if let Some(done) = stack.pop() {
            match stack.last_mut() {
                Some(parent) => parent.children.push(done),
                None => roots.push(done),
            }
        }
    }

    for heading in headings {
        while stack
            .last()
            .is_some_and(|open| open.heading.level >= heading.level)
        {
            close(&mut stack, &mut roots);
        }
        stack.push(HeadingNode::new(heading.clone()));
    }
    while !stack.is_empty() {
        close(&mut stack, &mut roots);
    }

    roots
}

/// A parsed markdown document: the full text snapshot plus its headings.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub content: String,
    pub headings: Vec<Heading>,
}

impl Document {
    pub fn new(content: String, headings: Vec<Heading>) -> Self {
        Self { content, headings }
    }

    /// Build the heading tree for this document.
    pub fn build_tree(&self) -> Vec<HeadingNode> {
        build_forest(&self.headings)
    }

    /// Find a heading by exact text.
    pub fn find_heading(&self, text: &str) -> Option<&Heading> {
        self.headings.iter().find(|h| h.text == text)
    }

    /// Headings at one specific level.
    pub fn headings_at_level(&self, level: usize) -> Vec<&Heading> {
        self.headings.iter().filter(|h| h.level == level).collect()
    }

    /// Headings whose text contains `pattern` case-insensitively.
    pub fn filter_headings(&self, pattern: &str) -> Vec<&Heading> {
        let needle = pattern.to_lowercase();
        self.headings
            .iter()
            .filter(|h| h.text.to_lowercase().contains(&needle))
            .collect()
    }

    /// The last heading at or before `line`, if any.
    ///
    /// Drives active-heading tracking while the content pane scrolls.
    pub fn heading_at_or_before(&self, line: usize) -> Option<&Heading> {
        self.headings.iter().take_while(|h| h.line <= line).last()
    }

    /// Extract the body of a section by heading text.
    ///
    /// Returns the content between the heading line and the next heading at
    /// the same or a shallower level (end of document otherwise), trimmed.
    pub fn extract_section(&self, text: &str) -> Option<String> {
        let index = self.headings.iter().position(|h| h.text == text)?;
        let heading = &self.headings[index];

        let start = (heading.end_offset + 1).min(self.content.len());
        let end = self.headings[index + 1..]
            .iter()
            .find(|h| h.level <= heading.level)
            .map(|h| h.offset)
            .unwrap_or(self.content.len());

        Some(self.content[start..end].trim().to_string())
    }

    /// Number of source lines in the snapshot.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markdown;

    fn levels_preorder(nodes: &[HeadingNode], out: &mut Vec<(usize, String)>) {
        for node in nodes {
            out.push((node.heading.level, node.heading.text.clone()));
            levels_preorder(&node.children, out);
        }
    }

    #[test]
    fn test_forest_shape() {
        // B's subtree is closed by D at the same level; E opens a new root.
        let doc = parse_markdown("# A\n## B\ntext\n### C\n## D\n# E\n");
        let tree = doc.build_tree();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].heading.text, "A");
        assert_eq!(tree[1].heading.text, "E");

        let a = &tree[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].heading.text, "B");
        assert_eq!(a.children[1].heading.text, "D");
        assert_eq!(a.children[0].children.len(), 1);
        assert_eq!(a.children[0].children[0].heading.text, "C");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_children_strictly_deeper_and_ordered() {
        let doc = parse_markdown("# A\n### Deep\n## B\n#### Deeper\n## C\n");
        let tree = doc.build_tree();

        fn check(node: &HeadingNode) {
            let mut last_line = None;
            for child in &node.children {
                assert!(child.heading.level > node.heading.level);
                if let Some(prev) = last_line {
                    assert!(child.heading.line > prev);
                }
                last_line = Some(child.heading.line);
                check(child);
            }
        }
        for root in &tree {
            check(root);
        }
    }

    #[test]
    fn test_preorder_flatten_round_trip() {
        let md = "## Skipped root level\n# One\n### Three\n## Two\n# Another\n###### Six\n";
        let doc = parse_markdown(md);
        let tree = doc.build_tree();

        let mut flattened = Vec::new();
        levels_preorder(&tree, &mut flattened);

        let original: Vec<(usize, String)> = doc
            .headings
            .iter()
            .map(|h| (h.level, h.text.clone()))
            .collect();
        assert_eq!(flattened, original);
    }

    #[test]
    fn test_same_level_never_nests() {
        let doc = parse_markdown("## X\n## Y\n## Z\n");
        let tree = doc.build_tree();
        assert_eq!(tree.len(), 3);
        assert!(tree.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_empty_forest() {
        let doc = parse_markdown("no headings here\n");
        assert!(doc.build_tree().is_empty());
    }

    #[test]
    fn test_extract_section() {
        let md = "# Main\nintro\n\n## First\nfirst body\n\n## Second\nsecond body\n";
        let doc = parse_markdown(md);

        assert_eq!(doc.find_heading("First").unwrap().level, 2);
        assert!(doc.find_heading("Third").is_none());

        let first = doc.extract_section("First").unwrap();
        assert!(first.contains("first body"));
        assert!(!first.contains("second body"));
        assert!(!first.contains("## Second"));

        // Last section runs to the end of the document
        let second = doc.extract_section("Second").unwrap();
        assert_eq!(second, "second body");

        assert!(doc.extract_section("Missing").is_none());
    }

    #[test]
    fn test_heading_at_or_before() {
        let doc = parse_markdown("intro\n# A\ntext\n## B\nmore\n");
        assert!(doc.heading_at_or_before(0).is_none());
        assert_eq!(doc.heading_at_or_before(1).unwrap().text, "A");
        assert_eq!(doc.heading_at_or_before(2).unwrap().text, "A");
        assert_eq!(doc.heading_at_or_before(4).unwrap().text, "B");
        assert_eq!(doc.heading_at_or_before(100).unwrap().text, "B");
    }

    #[test]
    fn test_render_box_tree() {
        let doc = parse_markdown("# A\n## B\n## C\n");
        let tree = doc.build_tree();
        let rendered = tree[0].render_box_tree("", true);
        assert!(rendered.contains("└── A"));
        assert!(rendered.contains("├── B"));
        assert!(rendered.contains("└── C"));
    }
}

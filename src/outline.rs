//! Outline view state: collapse set, heading filter, and active heading.
//!
//! This is a pure store with no rendering types in it. The TUI reads the
//! derived [`OutlineState::visible_items`] list and dispatches the mutation
//! commands below; every command is total and takes effect on the next
//! derivation, so the store is fully testable without a terminal.

use crate::parser::HeadingNode;
use std::collections::HashSet;

/// Identity of an outline node for collapse tracking.
///
/// The key is the node's position in the pre-order traversal of the current
/// forest. It is stable only for one parse: collapse state does not survive
/// a structural edit of the document, and callers reset the store whenever
/// the forest is rebuilt.
pub type NodeKey = usize;

/// One row of the derived, render-ready outline list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub key: NodeKey,
    pub level: usize,
    pub text: String,
    /// Zero-based source line of the heading, for navigation.
    pub line: usize,
    pub has_children: bool,
    pub collapsed: bool,
    /// Whether this is the current (last navigated-to) heading.
    pub active: bool,
}

/// Per-view outline state. One instance per open document view, never
/// shared between documents, never persisted.
#[derive(Debug, Clone, Default)]
pub struct OutlineState {
    collapsed: HashSet<NodeKey>,
    query: String,
    active_line: Option<usize>,
}

impl OutlineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter query. Empty means "no filter".
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_filtering(&self) -> bool {
        !self.query.is_empty()
    }

    /// Flip the collapsed state of one node.
    ///
    /// A key that no node currently carries simply becomes newly collapsed;
    /// toggling twice always restores the original set.
    pub fn toggle_collapse(&mut self, key: NodeKey) {
        if !self.collapsed.remove(&key) {
            self.collapsed.insert(key);
        }
    }

    pub fn is_collapsed(&self, key: NodeKey) -> bool {
        self.collapsed.contains(&key)
    }

    /// Collapse every node deeper than level 1. Top-level headings are never
    /// auto-collapsed; applying this twice yields the same set as once.
    pub fn collapse_all(&mut self, forest: &[HeadingNode]) {
        let mut key = 0;
        for node in forest {
            Self::collapse_subtree(node, &mut key, &mut self.collapsed);
        }
    }

    fn collapse_subtree(node: &HeadingNode, key: &mut NodeKey, set: &mut HashSet<NodeKey>) {
        if node.heading.level > 1 {
            set.insert(*key);
        }
        *key += 1;
        for child in &node.children {
            Self::collapse_subtree(child, key, set);
        }
    }

    /// Expand everything.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Record the most recently navigated-to heading line. Used only for
    /// highlighting, never for filtering.
    pub fn set_active_line(&mut self, line: usize) {
        self.active_line = Some(line);
    }

    pub fn clear_active(&mut self) {
        self.active_line = None;
    }

    pub fn active_line(&self) -> Option<usize> {
        self.active_line
    }

    /// Reset everything: collapse set, query, and active line. Called when
    /// the view closes or the document is replaced.
    pub fn reset(&mut self) {
        self.collapsed.clear();
        self.query.clear();
        self.active_line = None;
    }

    /// Derive the render-ready outline list for the given forest.
    ///
    /// Without a query this is the pre-order flattening with the children of
    /// collapsed nodes skipped (they stay in the forest, they just don't
    /// render). With a query, a heading is listed iff its own text contains
    /// the query case-insensitively, independent of its ancestors and
    /// descendants; the collapse set does not apply while filtering. A match
    /// whose ancestors are filtered out is shown without them.
    pub fn visible_items(&self, forest: &[HeadingNode]) -> Vec<OutlineItem> {
        let mut items = Vec::new();
        let mut key = 0;
        let needle = (!self.query.is_empty()).then(|| self.query.to_lowercase());

        for node in forest {
            self.walk(node, &mut key, needle.as_deref(), true, &mut items);
        }
        items
    }

    fn walk(
        &self,
        node: &HeadingNode,
        key: &mut NodeKey,
        needle: Option<&str>,
        render: bool,
        items: &mut Vec<OutlineItem>,
    ) {
        let k = *key;
        *key += 1;
        let collapsed = self.collapsed.contains(&k);

        let included = match needle {
            // Filter mode: self-match only, collapse ignored
            Some(needle) => node.heading.text.to_lowercase().contains(needle),
            None => render,
        };
        if included {
            items.push(OutlineItem {
                key: k,
                level: node.heading.level,
                text: node.heading.text.clone(),
                line: node.heading.line,
                has_children: !node.children.is_empty(),
                collapsed,
                active: self.active_line == Some(node.heading.line),
            });
        }

        // Keys must advance through hidden subtrees to stay aligned with
        // the pre-order numbering.
        let child_render = render && !collapsed;
        for child in &node.children {
            self.walk(child, key, needle, child_render, items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markdown;

    fn forest(md: &str) -> Vec<HeadingNode> {
        parse_markdown(md).build_tree()
    }

    fn texts(items: &[OutlineItem]) -> Vec<String> {
        items.iter().map(|i| i.text.clone()).collect()
    }

    const MD: &str = "# A\n## B\n### C\n## D\n# E\n";

    #[test]
    fn test_full_flatten_is_preorder() {
        let forest = forest(MD);
        let state = OutlineState::new();
        let items = state.visible_items(&forest);
        assert_eq!(texts(&items), vec!["A", "B", "C", "D", "E"]);
        // Pre-order keys are dense and ordered
        let keys: Vec<NodeKey> = items.iter().map(|i| i.key).collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_collapse_hides_subtree_but_not_node() {
        let forest = forest(MD);
        let mut state = OutlineState::new();

        // Collapse B (key 1): C disappears, B and D stay
        state.toggle_collapse(1);
        let items = state.visible_items(&forest);
        assert_eq!(texts(&items), vec!["A", "B", "D", "E"]);
        assert!(items[1].collapsed);

        // Keys stay aligned with the full pre-order numbering
        assert_eq!(items[2].text, "D");
        assert_eq!(items[2].key, 3);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        let before = state.visible_items(&forest);

        state.toggle_collapse(1);
        state.toggle_collapse(1);
        assert_eq!(state.visible_items(&forest), before);
    }

    #[test]
    fn test_toggle_unknown_key_is_total() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        state.toggle_collapse(999);
        assert!(state.is_collapsed(999));
        // No visible effect: no node carries that key
        assert_eq!(texts(&state.visible_items(&forest)), vec![
            "A", "B", "C", "D", "E"
        ]);
    }

    #[test]
    fn test_toggle_leaf_has_no_visible_effect() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        let before = state.visible_items(&forest);

        // C (key 2) has no children to hide
        state.toggle_collapse(2);
        let after = state.visible_items(&forest);
        assert_eq!(texts(&after), texts(&before));
        assert!(after[2].collapsed);
    }

    #[test]
    fn test_collapse_all_spares_level_one() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        state.collapse_all(&forest);

        let items = state.visible_items(&forest);
        // Only the roots and their immediate (now collapsed) children remain
        assert_eq!(texts(&items), vec!["A", "B", "D", "E"]);
        assert!(!items[0].collapsed);
        assert!(items[1].collapsed);
        assert!(!items[3].collapsed);

        // Idempotent
        let once: Vec<NodeKey> = (0..5).filter(|k| state.is_collapsed(*k)).collect();
        state.collapse_all(&forest);
        let twice: Vec<NodeKey> = (0..5).filter(|k| state.is_collapsed(*k)).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_expand_all_clears() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        state.collapse_all(&forest);
        state.expand_all();
        assert_eq!(texts(&state.visible_items(&forest)), vec![
            "A", "B", "C", "D", "E"
        ]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let forest = forest("# Alpha\n## Beta\n## ALPHABET\n# Gamma\n");
        let mut state = OutlineState::new();
        state.set_query("alpha");

        let items = state.visible_items(&forest);
        assert_eq!(texts(&items), vec!["Alpha", "ALPHABET"]);
        for item in &items {
            assert!(item.text.to_lowercase().contains("alpha"));
        }
    }

    #[test]
    fn test_filter_orphans_matches_with_filtered_ancestors() {
        // Flat semantics: C matches even though its ancestors A and B do
        // not; they are not pulled in as context.
        let forest = forest("# A\n## B\n### Cherry\n# E\n");
        let mut state = OutlineState::new();
        state.set_query("cherry");
        assert_eq!(texts(&state.visible_items(&forest)), vec!["Cherry"]);
    }

    #[test]
    fn test_filter_ignores_collapse() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        state.toggle_collapse(1); // hide C under B
        state.set_query("c");
        assert_eq!(texts(&state.visible_items(&forest)), vec!["C"]);
    }

    #[test]
    fn test_filter_widening_is_monotonic() {
        let forest = forest("# Install\n## Installation notes\n## Usage\n### Inst\n");
        let mut state = OutlineState::new();

        state.set_query("installa");
        let strict: HashSet<NodeKey> =
            state.visible_items(&forest).iter().map(|i| i.key).collect();

        state.set_query("insta");
        let wide: HashSet<NodeKey> = state.visible_items(&forest).iter().map(|i| i.key).collect();

        assert!(strict.is_subset(&wide));
    }

    #[test]
    fn test_clearing_query_restores_collapse_view() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        state.toggle_collapse(1);
        state.set_query("c");
        state.set_query("");
        assert_eq!(texts(&state.visible_items(&forest)), vec![
            "A", "B", "D", "E"
        ]);
    }

    #[test]
    fn test_active_annotation() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        state.set_active_line(1); // B's line

        let items = state.visible_items(&forest);
        let active: Vec<&OutlineItem> = items.iter().filter(|i| i.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "B");

        state.clear_active();
        assert!(state.visible_items(&forest).iter().all(|i| !i.active));
    }

    #[test]
    fn test_reset_clears_everything() {
        let forest = forest(MD);
        let mut state = OutlineState::new();
        state.toggle_collapse(1);
        state.set_query("b");
        state.set_active_line(1);

        state.reset();
        assert!(!state.is_filtering());
        assert!(state.active_line().is_none());
        assert_eq!(state.visible_items(&forest).len(), 5);
    }
}

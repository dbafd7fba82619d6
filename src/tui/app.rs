use crate::archive;
use crate::config::Config;
use crate::metadata::{DerivedMetadata, HeadingMetadataProvider, NativeMetadata};
use crate::outline::{NodeKey, OutlineItem, OutlineState};
use crate::parser::{Document, HeadingNode, build_forest};
use crate::tui::theme::Theme;
use ratatui::widgets::{ListState, ScrollbarState};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Outline,
    Content,
}

/// Per-view application state.
///
/// Holds the one decompressed snapshot, the derived heading forest, and the
/// outline state for the open document. Mutated only by the event loop;
/// opening another document replaces everything wholesale.
pub struct App {
    /// The open document, or `None` when nothing is loaded (e.g. the load
    /// failed) and the panes show their empty states.
    pub document: Option<Document>,
    pub filename: String,
    pub current_file_path: PathBuf,
    /// Whether the open file is a compressed document.
    pub compressed: bool,
    pub forest: Vec<HeadingNode>,
    pub outline: OutlineState,
    pub outline_items: Vec<OutlineItem>,
    pub outline_list: ListState,
    pub outline_scroll: ScrollbarState,
    pub focus: Focus,
    pub show_outline: bool,
    pub outline_width: u16, // Percentage: 20, 30, or 40
    pub show_search: bool,
    pub content_scroll: u16,
    pub content_scroll_state: ScrollbarState,
    pub content_height: u16,
    pub status_message: Option<String>,
    pub theme: Theme,
    metadata: DerivedMetadata<NativeMetadata>,
    config: Config,
}

impl App {
    /// Maximum filter query length to prevent performance issues
    const MAX_SEARCH_LEN: usize = 256;

    /// Create an app with no document loaded.
    pub fn new(config: Config) -> Self {
        let outline_width = config.ui.outline_width;

        Self {
            document: None,
            filename: String::new(),
            current_file_path: PathBuf::new(),
            compressed: false,
            forest: Vec::new(),
            outline: OutlineState::new(),
            outline_items: Vec::new(),
            outline_list: ListState::default(),
            outline_scroll: ScrollbarState::new(0),
            focus: Focus::Outline,
            show_outline: true,
            outline_width,
            show_search: false,
            content_scroll: 0,
            content_scroll_state: ScrollbarState::new(0),
            content_height: 0,
            status_message: None,
            theme: Theme::default(),
            metadata: DerivedMetadata::new(NativeMetadata::new()),
            config,
        }
    }

    fn doc_id(path: &Path) -> String {
        path.display().to_string()
    }

    /// Install a freshly parsed document, replacing the previous snapshot,
    /// forest, and outline state wholesale.
    ///
    /// The derived heading records go through the metadata seam: they are
    /// installed under the document id and the forest is built from the
    /// provider's answer, so whatever else queries structural metadata sees
    /// exactly what the outline shows.
    pub fn load_document(&mut self, document: Document, path: PathBuf) {
        if !self.current_file_path.as_os_str().is_empty() {
            self.metadata.remove(&Self::doc_id(&self.current_file_path));
        }

        let doc_id = Self::doc_id(&path);
        self.metadata
            .install(doc_id.as_str(), document.headings.clone());

        let records = self.metadata.headings(&doc_id).unwrap_or_default();
        self.forest = build_forest(&records);

        self.filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        self.compressed = archive::is_compressed_path(&path);
        self.current_file_path = path;

        self.content_height = document.line_count() as u16;
        self.content_scroll = 0;
        self.content_scroll_state = ScrollbarState::new(self.content_height as usize);
        self.document = Some(document);

        // Fresh view state: collapse keys are only valid for this parse
        self.outline.reset();
        self.show_search = false;
        self.refresh_outline();
        self.outline_list = ListState::default();
        if !self.outline_items.is_empty() {
            self.outline_list.select(Some(0));
        }
    }

    /// Close the current document, if any, and return to the empty state.
    pub fn close_document(&mut self) {
        if !self.current_file_path.as_os_str().is_empty() {
            self.metadata.remove(&Self::doc_id(&self.current_file_path));
        }
        self.document = None;
        self.forest.clear();
        self.outline.reset();
        self.refresh_outline();
    }

    /// Reload the open file from disk and rebuild the outline.
    ///
    /// The snapshot is replaced wholesale; collapse state does not survive
    /// (node identity is per-parse). The selection clamps to a valid index.
    pub fn reload_current_file(&mut self) -> Result<(), String> {
        let path = self.current_file_path.clone();
        if path.as_os_str().is_empty() {
            return Err("no document open".to_string());
        }
        let selected = self.outline_list.selected();

        let document = crate::parser::parse_file(&path)
            .map_err(|e| format!("failed to reload {}: {}", path.display(), e))?;
        self.load_document(document, path);

        if let Some(idx) = selected {
            let clamped = idx.min(self.outline_items.len().saturating_sub(1));
            if !self.outline_items.is_empty() {
                self.outline_list.select(Some(clamped));
                self.outline_scroll = self.outline_scroll.position(clamped);
            }
        }
        Ok(())
    }

    /// Re-derive the visible outline list from the current state.
    pub fn refresh_outline(&mut self) {
        self.outline_items = self.outline.visible_items(&self.forest);
        self.outline_scroll = ScrollbarState::new(self.outline_items.len());

        // Keep the selection on a valid row
        match self.outline_list.selected() {
            Some(idx) if !self.outline_items.is_empty() => {
                let clamped = idx.min(self.outline_items.len() - 1);
                self.outline_list.select(Some(clamped));
                self.outline_scroll = self.outline_scroll.position(clamped);
            }
            Some(_) => self.outline_list.select(None),
            None if !self.outline_items.is_empty() => {
                self.outline_list.select(Some(0));
            }
            None => {}
        }
    }

    /// Text for the outline pane when there is nothing to list.
    pub fn outline_empty_text(&self) -> Option<&'static str> {
        if self.document.is_none() {
            Some("open a document to see its outline")
        } else if self.outline_items.is_empty() {
            if self.outline.is_filtering() {
                Some("no matching headings")
            } else {
                Some("no headings found")
            }
        } else {
            None
        }
    }

    pub fn selected_item(&self) -> Option<&OutlineItem> {
        self.outline_list
            .selected()
            .and_then(|i| self.outline_items.get(i))
    }

    /// Move the selection to the row carrying `key`. Returns true if found.
    fn select_key(&mut self, key: NodeKey) -> bool {
        if let Some(idx) = self.outline_items.iter().position(|item| item.key == key) {
            self.outline_list.select(Some(idx));
            self.outline_scroll = self.outline_scroll.position(idx);
            return true;
        }
        false
    }

    pub fn next(&mut self) {
        if self.focus == Focus::Outline {
            let i = match self.outline_list.selected() {
                Some(i) => {
                    if i >= self.outline_items.len().saturating_sub(1) {
                        i
                    } else {
                        i + 1
                    }
                }
                None => 0,
            };
            if !self.outline_items.is_empty() {
                self.outline_list.select(Some(i));
                self.outline_scroll = self.outline_scroll.position(i);
            }
        } else {
            self.scroll_content_by(1);
        }
    }

    pub fn previous(&mut self) {
        if self.focus == Focus::Outline {
            let i = self.outline_list.selected().map_or(0, |i| i.saturating_sub(1));
            if !self.outline_items.is_empty() {
                self.outline_list.select(Some(i));
                self.outline_scroll = self.outline_scroll.position(i);
            }
        } else {
            self.scroll_content_by(-1);
        }
    }

    pub fn first(&mut self) {
        if self.focus == Focus::Outline {
            if !self.outline_items.is_empty() {
                self.outline_list.select(Some(0));
                self.outline_scroll = self.outline_scroll.position(0);
            }
        } else {
            self.content_scroll = 0;
            self.content_scroll_state = self.content_scroll_state.position(0);
            self.sync_active_to_scroll();
        }
    }

    pub fn last(&mut self) {
        if self.focus == Focus::Outline {
            if !self.outline_items.is_empty() {
                let last = self.outline_items.len() - 1;
                self.outline_list.select(Some(last));
                self.outline_scroll = self.outline_scroll.position(last);
            }
        } else {
            let last = self.content_height.saturating_sub(1);
            self.content_scroll = last;
            self.content_scroll_state = self.content_scroll_state.position(last as usize);
            self.sync_active_to_scroll();
        }
    }

    /// Jump to the nearest preceding row with a shallower level.
    pub fn jump_to_parent(&mut self) {
        if self.focus != Focus::Outline {
            return;
        }
        let Some(current) = self.outline_list.selected() else {
            return;
        };
        let Some(item) = self.outline_items.get(current) else {
            return;
        };
        let level = item.level;

        for i in (0..current).rev() {
            if self.outline_items[i].level < level {
                self.outline_list.select(Some(i));
                self.outline_scroll = self.outline_scroll.position(i);
                return;
            }
        }
    }

    /// Toggle the disclosure state of the selected node.
    pub fn toggle_collapse_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let key = item.key;
        self.outline.toggle_collapse(key);
        self.refresh_outline();
        self.select_key(key);
    }

    /// Expand the selected node.
    pub fn expand_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.collapsed {
            let key = item.key;
            self.outline.toggle_collapse(key);
            self.refresh_outline();
            self.select_key(key);
        }
    }

    /// Collapse the selected node, or its parent when the selection is a
    /// leaf (the selection follows the node that actually collapsed).
    pub fn collapse_selected(&mut self) {
        let Some(current) = self.outline_list.selected() else {
            return;
        };
        let Some(item) = self.outline_items.get(current) else {
            return;
        };

        if item.has_children && !item.collapsed {
            let key = item.key;
            self.outline.toggle_collapse(key);
            self.refresh_outline();
            self.select_key(key);
            return;
        }

        // Leaf: walk back to the parent and collapse that instead
        let level = item.level;
        for i in (0..current).rev() {
            if self.outline_items[i].level < level {
                let key = self.outline_items[i].key;
                if !self.outline.is_collapsed(key) {
                    self.outline.toggle_collapse(key);
                }
                self.refresh_outline();
                self.select_key(key);
                return;
            }
        }
    }

    /// Collapse every heading deeper than level 1.
    pub fn collapse_all(&mut self) {
        let selected_key = self.selected_item().map(|i| i.key);
        self.outline.collapse_all(&self.forest);
        self.refresh_outline();
        if let Some(key) = selected_key
            && !self.select_key(key)
            && !self.outline_items.is_empty()
        {
            self.outline_list.select(Some(0));
            self.outline_scroll = self.outline_scroll.position(0);
        }
    }

    /// Expand every heading.
    pub fn expand_all(&mut self) {
        let selected_key = self.selected_item().map(|i| i.key);
        self.outline.expand_all();
        self.refresh_outline();
        if let Some(key) = selected_key {
            self.select_key(key);
        }
    }

    pub fn toggle_search(&mut self) {
        self.show_search = !self.show_search;
        if !self.show_search {
            self.clear_search();
        }
    }

    pub fn search_input(&mut self, c: char) {
        if self.outline.query().len() >= Self::MAX_SEARCH_LEN {
            return;
        }
        // Filter control characters (except tab)
        if c.is_control() && c != '\t' {
            return;
        }

        let query = format!("{}{}", self.outline.query(), c);
        self.apply_query(&query);
    }

    pub fn search_backspace(&mut self) {
        let mut query = self.outline.query().to_string();
        query.pop();
        self.apply_query(&query);
    }

    pub fn clear_search(&mut self) {
        self.apply_query("");
    }

    fn apply_query(&mut self, query: &str) {
        let selected_key = self.selected_item().map(|i| i.key);
        self.outline.set_query(query);
        self.refresh_outline();

        // Keep the previous selection when it survived the filter change
        let restored = selected_key.is_some_and(|key| self.select_key(key));
        if !restored && !self.outline_items.is_empty() {
            self.outline_list.select(Some(0));
            self.outline_scroll = self.outline_scroll.position(0);
        }
    }

    /// Navigate the content pane to the selected heading and mark it active.
    ///
    /// When the recorded line no longer resolves in the snapshot (stale
    /// after an external edit), fall back to the first content line whose
    /// text equals the heading; if none matches, the navigation silently
    /// does nothing — heading text is not unique, so this is expected.
    pub fn activate_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let (level, text, line) = (item.level, item.text.clone(), item.line);

        let Some(target) = self.resolve_heading_line(level, &text, line) else {
            return;
        };

        self.content_scroll = (target as u16).min(self.content_height.saturating_sub(1));
        self.content_scroll_state = self.content_scroll_state.position(self.content_scroll as usize);
        self.outline.set_active_line(target);
        self.refresh_outline();
    }

    fn resolve_heading_line(&self, level: usize, text: &str, line: usize) -> Option<usize> {
        let document = self.document.as_ref()?;
        if line < document.line_count() {
            return Some(line);
        }

        let rendered = format!("{} {}", "#".repeat(level), text);
        document
            .content
            .split('\n')
            .position(|l| l.trim() == rendered || l.trim() == text)
    }

    fn scroll_content_by(&mut self, delta: i32) {
        let scroll = self.content_scroll as i32 + delta;
        let max = self.content_height.saturating_sub(1) as i32;
        self.content_scroll = scroll.clamp(0, max.max(0)) as u16;
        self.content_scroll_state = self.content_scroll_state.position(self.content_scroll as usize);
        self.sync_active_to_scroll();
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_content_by(10);
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_content_by(-10);
    }

    /// Re-derive the active heading from the content scroll position: the
    /// last heading at or before the top visible line.
    fn sync_active_to_scroll(&mut self) {
        let Some(document) = self.document.as_ref() else {
            return;
        };
        match document.heading_at_or_before(self.content_scroll as usize) {
            Some(heading) => self.outline.set_active_line(heading.line),
            None => self.outline.clear_active(),
        }
        self.refresh_outline();
    }

    pub fn toggle_focus(&mut self) {
        if self.show_outline {
            self.focus = match self.focus {
                Focus::Outline => Focus::Content,
                Focus::Content => Focus::Outline,
            };
        }
    }

    pub fn toggle_outline(&mut self) {
        self.show_outline = !self.show_outline;
        if self.show_outline {
            self.focus = Focus::Outline;
        } else {
            self.focus = Focus::Content;
        }
    }

    pub fn cycle_outline_width(&mut self, increase: bool) {
        self.outline_width = if increase {
            match self.outline_width {
                20 => 30,
                30 => 40,
                _ => 40,
            }
        } else {
            match self.outline_width {
                40 => 30,
                30 => 20,
                _ => 20,
            }
        };

        // Save to config (silently ignore errors)
        let _ = self.config.set_outline_width(self.outline_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markdown;

    const MD: &str = "# A\n## B\n### C\nbody\n## D\n# E\n";

    fn app_with(md: &str) -> App {
        let mut app = App::new(Config::default());
        app.load_document(parse_markdown(md), PathBuf::from("test.md.gz"));
        app
    }

    #[test]
    fn test_load_document_builds_outline() {
        let app = app_with(MD);
        assert_eq!(app.outline_items.len(), 5);
        assert_eq!(app.outline_list.selected(), Some(0));
        assert!(app.compressed);
        assert!(app.outline_empty_text().is_none());
    }

    #[test]
    fn test_empty_states() {
        let app = App::new(Config::default());
        assert_eq!(
            app.outline_empty_text(),
            Some("open a document to see its outline")
        );

        let app = app_with("plain text, no headings\n");
        assert_eq!(app.outline_empty_text(), Some("no headings found"));

        let mut app = app_with(MD);
        app.search_input('z');
        app.search_input('q');
        assert_eq!(app.outline_empty_text(), Some("no matching headings"));
    }

    #[test]
    fn test_activate_scrolls_and_marks_active() {
        let mut app = app_with(MD);
        app.next(); // select B (line 1)
        app.activate_selected();

        assert_eq!(app.content_scroll, 1);
        assert_eq!(app.outline.active_line(), Some(1));
        assert!(app.selected_item().unwrap().active);
    }

    #[test]
    fn test_activate_stale_line_falls_back_to_text_match() {
        let mut app = app_with(MD);
        // Fake a stale record pointing past the end of the snapshot
        app.outline_items[1].line = 999;
        app.outline_list.select(Some(1));

        app.activate_selected();
        // Found "## B" by text equality at its real line
        assert_eq!(app.outline.active_line(), Some(1));
    }

    #[test]
    fn test_activate_missing_target_is_silent_noop() {
        let mut app = app_with(MD);
        app.outline_items[1].line = 999;
        app.outline_items[1].text = "Not In Document".to_string();
        app.outline_list.select(Some(1));

        app.activate_selected();
        assert_eq!(app.content_scroll, 0);
        assert_eq!(app.outline.active_line(), None);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_collapse_selected_on_leaf_collapses_parent() {
        let mut app = app_with(MD);
        app.next();
        app.next(); // select C, a leaf
        app.collapse_selected();

        // Selection moved to B, which is now collapsed and hides C
        let selected = app.selected_item().unwrap();
        assert_eq!(selected.text, "B");
        assert!(selected.collapsed);
        assert!(!app.outline_items.iter().any(|i| i.text == "C"));
    }

    #[test]
    fn test_toggle_collapse_keeps_selection() {
        let mut app = app_with(MD);
        app.next(); // B
        app.toggle_collapse_selected();
        assert_eq!(app.selected_item().unwrap().text, "B");
        app.toggle_collapse_selected();
        assert_eq!(app.selected_item().unwrap().text, "B");
        assert_eq!(app.outline_items.len(), 5);
    }

    #[test]
    fn test_scroll_sync_updates_active_heading() {
        let mut app = app_with(MD);
        app.focus = Focus::Content;

        app.next(); // scroll to line 1 (## B)
        assert_eq!(app.outline.active_line(), Some(1));

        app.scroll_page_down(); // clamped to the last line (# E)
        assert_eq!(app.outline.active_line(), Some(5));

        app.first(); // back to line 0 (# A)
        assert_eq!(app.outline.active_line(), Some(0));
    }

    #[test]
    fn test_search_input_guards() {
        let mut app = app_with(MD);
        app.search_input('\u{1b}'); // control characters are ignored
        assert_eq!(app.outline.query(), "");

        app.search_input('b');
        assert_eq!(app.outline.query(), "b");
        assert_eq!(app.outline_items.len(), 1);

        app.search_backspace();
        assert_eq!(app.outline.query(), "");
        assert_eq!(app.outline_items.len(), 5);
    }

    #[test]
    fn test_jump_to_parent() {
        let mut app = app_with(MD);
        app.next();
        app.next(); // C
        app.jump_to_parent();
        assert_eq!(app.selected_item().unwrap().text, "B");
        app.jump_to_parent();
        assert_eq!(app.selected_item().unwrap().text, "A");
        // Already at a root: stays put
        app.jump_to_parent();
        assert_eq!(app.selected_item().unwrap().text, "A");
    }

    #[test]
    fn test_close_document_resets_to_empty_state() {
        let mut app = app_with(MD);
        app.close_document();
        assert!(app.document.is_none());
        assert!(app.outline_items.is_empty());
        assert_eq!(
            app.outline_empty_text(),
            Some("open a document to see its outline")
        );
    }

    #[test]
    fn test_load_replaces_state_wholesale() {
        let mut app = app_with(MD);
        app.toggle_collapse_selected();
        app.search_input('b');

        app.load_document(parse_markdown("# Fresh\n## Start\n"), PathBuf::from("new.md"));
        assert_eq!(app.outline_items.len(), 2);
        assert_eq!(app.outline.query(), "");
        assert!(!app.compressed);
        assert_eq!(app.outline_list.selected(), Some(0));
    }
}

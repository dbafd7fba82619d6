mod app;
pub mod theme;
mod ui;
mod watcher;

pub use app::{App, Focus};
pub use theme::Theme;

use color_eyre::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;

/// Run the interactive viewer until the user quits.
///
/// Everything the outline does — extraction, tree building, state
/// derivation — happens synchronously inside one turn of this loop, so a
/// render never sees a half-built tree. The watcher thread only posts
/// events into a channel drained here between input polls.
pub fn run(terminal: &mut DefaultTerminal, app: App) -> Result<()> {
    let mut app = app;

    let mut file_watcher = watcher::ReloadWatcher::new().ok();
    if app.document.is_some()
        && let Some(ref mut watcher) = file_watcher
    {
        let _ = watcher.watch(&app.current_file_path);
    }

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Poll with a timeout so external file changes surface promptly
        if !crossterm::event::poll(Duration::from_millis(100))? {
            let changed = app.document.is_some()
                && file_watcher
                    .as_mut()
                    .is_some_and(|watcher| watcher.check_for_changes());
            if changed {
                reload(&mut app, &mut file_watcher);
            }
            continue;
        }

        let Event::Key(key) = crossterm::event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Filter input mode
        if app.show_search {
            match key.code {
                KeyCode::Esc => {
                    // Esc drops the filter and closes the bar
                    app.clear_search();
                    app.show_search = false;
                }
                KeyCode::Enter => {
                    // Enter keeps the filtered list but closes the bar
                    app.show_search = false;
                }
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::Backspace => app.search_backspace(),
                KeyCode::Char(c) => app.search_input(c),
                _ => {}
            }
            continue;
        }

        // Clear transient status on any key press in normal mode
        if app.status_message.is_some() {
            app.status_message = None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Char('s') | KeyCode::Char('/') => app.toggle_search(),
            KeyCode::Char('j') | KeyCode::Down => app.next(),
            KeyCode::Char('k') | KeyCode::Up => app.previous(),
            KeyCode::Char('g') => app.first(),
            KeyCode::Char('G') => app.last(),
            KeyCode::Char('d') | KeyCode::PageDown => app.scroll_page_down(),
            KeyCode::Char('u') | KeyCode::PageUp => app.scroll_page_up(),
            KeyCode::Char('p') if app.focus == Focus::Outline => app.jump_to_parent(),
            KeyCode::Enter if app.focus == Focus::Outline => app.activate_selected(),
            KeyCode::Char(' ') if app.focus == Focus::Outline => app.toggle_collapse_selected(),
            KeyCode::Char('h') | KeyCode::Left if app.focus == Focus::Outline => {
                app.collapse_selected()
            }
            KeyCode::Char('l') | KeyCode::Right if app.focus == Focus::Outline => {
                app.expand_selected()
            }
            KeyCode::Char('c') => app.collapse_all(),
            KeyCode::Char('e') => app.expand_all(),
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::Char('w') => app.toggle_outline(),
            KeyCode::Char('[') => app.cycle_outline_width(false),
            KeyCode::Char(']') => app.cycle_outline_width(true),
            KeyCode::Char('r') => reload(&mut app, &mut file_watcher),
            _ => {}
        }
    }
}

fn reload(app: &mut App, file_watcher: &mut Option<watcher::ReloadWatcher>) {
    match app.reload_current_file() {
        Ok(()) => {
            app.status_message = Some("↻ File reloaded".to_string());
            // Re-arm the watch: editors that replace the file atomically
            // leave the old inode watched otherwise
            if let Some(watcher) = file_watcher {
                let _ = watcher.watch(&app.current_file_path);
            }
        }
        Err(e) => {
            app.status_message = Some(format!("✗ Reload failed: {}", e));
        }
    }
}

//! Colors and styles for the TUI panes.

use ratatui::style::{Color, Modifier, Style};

/// The built-in color theme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title_bar_fg: Color,
    pub scrollbar_fg: Color,
    pub status_bar_fg: Color,
    pub status_bar_bg: Color,
    pub border_focused: Color,
    pub border_unfocused: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
    pub active_heading_fg: Color,
    pub empty_state_fg: Color,
    pub search_fg: Color,
    heading_colors: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title_bar_fg: Color::Cyan,
            scrollbar_fg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Rgb(30, 30, 50),
            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,
            selection_fg: Color::Black,
            selection_bg: Color::Cyan,
            active_heading_fg: Color::Yellow,
            empty_state_fg: Color::DarkGray,
            search_fg: Color::Yellow,
            heading_colors: [
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Magenta,
                Color::Blue,
                Color::Red,
            ],
        }
    }
}

impl Theme {
    /// Color for a heading of the given level (1-6).
    pub fn heading_color(&self, level: usize) -> Color {
        let idx = level.clamp(1, 6) - 1;
        self.heading_colors[idx]
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border_unfocused)
        }
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn active_style(&self) -> Style {
        Style::default()
            .fg(self.active_heading_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn empty_state_style(&self) -> Style {
        Style::default()
            .fg(self.empty_state_fg)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.status_bar_fg).bg(self.status_bar_bg)
    }
}

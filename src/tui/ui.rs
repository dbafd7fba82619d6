//! Rendering for the dual-pane interface: outline tree on the left, raw
//! document text on the right.

use crate::tui::app::{App, Focus};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, Wrap,
};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let constraints = if app.show_search {
        vec![
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ]
    } else {
        vec![
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ]
    };
    let chunks = Layout::vertical(constraints).split(area);

    render_title_bar(frame, app, chunks[0]);

    let (content_area, status_area) = if app.show_search {
        render_search_bar(frame, app, chunks[1]);
        (chunks[2], chunks[3])
    } else {
        (chunks[1], chunks[2])
    };

    if app.show_outline {
        let panes = Layout::horizontal([
            Constraint::Percentage(app.outline_width),
            Constraint::Percentage(100 - app.outline_width),
        ])
        .split(content_area);
        render_outline(frame, app, panes[0]);
        render_content(frame, app, panes[1]);
    } else {
        render_content(frame, app, content_area);
    }

    render_status_bar(frame, app, status_area);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title_text = match app.document.as_ref() {
        Some(document) => {
            let marker = if app.compressed { " [gz]" } else { "" };
            format!(
                "gzmd - {}{} - {} headings",
                app.filename,
                marker,
                document.headings.len()
            )
        }
        None => "gzmd - no document".to_string(),
    };

    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(app.theme.title_bar_fg)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::raw("Filter: "),
        Span::styled(
            format!("{}_", app.outline.query()),
            Style::default()
                .fg(app.theme.search_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  (Esc: clear, Enter: keep)",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.search_fg))
            .title(" Filter Headings "),
    );
    frame.render_widget(paragraph, area);
}

fn render_outline(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme.clone();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(app.focus == Focus::Outline))
        .title(" Outline ");

    if let Some(empty_text) = app.outline_empty_text() {
        let paragraph = Paragraph::new(empty_text)
            .style(theme.empty_state_style())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let label_width = area.width.saturating_sub(3) as usize;
    let items: Vec<ListItem> = app
        .outline_items
        .iter()
        .map(|item| {
            let indent = "  ".repeat(item.level.saturating_sub(1));

            let disclosure = if item.has_children {
                if item.collapsed { "▶ " } else { "▼ " }
            } else {
                "  "
            };

            let prefix = "#".repeat(item.level);
            let text = truncate_label(
                &format!("{}{}{} {}", indent, disclosure, prefix, item.text),
                label_width,
            );

            let style = if item.active {
                theme.active_style()
            } else {
                Style::default().fg(theme.heading_color(item.level))
            };
            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selection_style())
        .highlight_symbol("► ");
    frame.render_stateful_widget(list, area, &mut app.outline_list);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .style(Style::default().fg(theme.scrollbar_fg));
    frame.render_stateful_widget(
        scrollbar,
        area.inner(ratatui::layout::Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app.outline_scroll,
    );
}

fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme.clone();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(app.focus == Focus::Content))
        .title(format!(" {} ", if app.filename.is_empty() {
            "Document"
        } else {
            &app.filename
        }));

    let Some(document) = app.document.as_ref() else {
        let paragraph = Paragraph::new("no document open")
            .style(theme.empty_state_style())
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    // Style heading lines by level; everything else renders as-is
    let heading_levels: std::collections::HashMap<usize, usize> = document
        .headings
        .iter()
        .map(|h| (h.line, h.level))
        .collect();
    let active_line = app.outline.active_line();

    let lines: Vec<Line> = document
        .content
        .split('\n')
        .enumerate()
        .map(|(i, raw)| match heading_levels.get(&i) {
            Some(level) => {
                let style = if active_line == Some(i) {
                    theme.active_style()
                } else {
                    Style::default()
                        .fg(theme.heading_color(*level))
                        .add_modifier(Modifier::BOLD)
                };
                Line::from(Span::styled(raw.to_string(), style))
            }
            None => Line::from(raw.to_string()),
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.content_scroll, 0));
    frame.render_widget(paragraph, area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .style(Style::default().fg(theme.scrollbar_fg));
    frame.render_stateful_widget(
        scrollbar,
        area.inner(ratatui::layout::Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app.content_scroll_state,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref message) = app.status_message {
        message.clone()
    } else {
        let position = match (app.outline_list.selected(), app.outline_items.len()) {
            (Some(idx), total) if total > 0 => format!("{}/{}", idx + 1, total),
            _ => "-".to_string(),
        };
        let pane = match app.focus {
            Focus::Outline => "outline",
            Focus::Content => "content",
        };
        format!(
            " {} | {} | s:filter Space:fold Enter:go c/e:fold-all Tab:pane q:quit",
            position, pane
        )
    };

    let status = Paragraph::new(text).style(app.theme.status_bar_style());
    frame.render_widget(status, area);
}

fn truncate_label(label: &str, width: usize) -> String {
    if width == 0 || label.width() <= width {
        return label.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

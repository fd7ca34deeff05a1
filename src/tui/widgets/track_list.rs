//! The scrolling track listing shared by the History and Search screens.

use crate::app::state::{AppState, Screen, SearchFocus};
use crate::tui::theme::Theme;
use crate::tui::ellipsize;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};

use super::{fg, pane};

pub fn render_query_box(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let focused = state.search_focus == SearchFocus::Query;
    let block = pane(theme, theme.icons.magnifier, "Query").border_style(fg(if focused {
        theme.palette.accent
    } else {
        theme.palette.border
    }));

    let text = if state.results.busy {
        format!("{} {}", state.query, theme.icons.hourglass)
    } else if focused {
        format!("{}▏", state.query)
    } else {
        state.query.clone()
    };

    frame.render_widget(
        Paragraph::new(text).style(fg(theme.palette.text)).block(block),
        area,
    );
}

pub fn render(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let Some(list) = state.pane() else {
        return;
    };

    if list.busy {
        let note = format!("{} Fetching…", theme.icons.hourglass);
        frame.render_widget(Paragraph::new(note).style(fg(theme.palette.dim)), area);
        return;
    }

    if list.rows.is_empty() {
        let note = match state.screen {
            Screen::History => "Nothing played yet.",
            _ => "Type a query and press Enter.",
        };
        frame.render_widget(Paragraph::new(note).style(fg(theme.palette.dim)), area);
        return;
    }

    let view = area.height as usize;
    let width = area.width.saturating_sub(3) as usize;
    let window_end = (list.top + view).min(list.rows.len());

    let mut items: Vec<ListItem> = list
        .rows
        .iter()
        .enumerate()
        .skip(list.top)
        .take(view)
        .map(|(i, row)| {
            let (marker, style) = if i == list.cursor {
                (
                    theme.icons.caret,
                    fg(theme.palette.bg)
                        .bg(theme.palette.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (" ", fg(theme.palette.text))
            };
            ListItem::new(Line::from(Span::styled(
                format!("{marker} {}", ellipsize(row, width)),
                style,
            )))
        })
        .collect();

    // Pagination footers only make sense at the very end of the list.
    if window_end == list.rows.len() {
        if list.busy_more {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("  {} Fetching more…", theme.icons.hourglass),
                fg(theme.palette.dim),
            ))));
        } else if list.next_page.is_some() {
            items.push(ListItem::new(Line::from(Span::styled(
                "  ↓ Scroll for more",
                fg(theme.palette.dim),
            ))));
        }
    }

    frame.render_widget(List::new(items), area);
}

use crate::app::state::{AppState, Screen};
use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem};

use super::{fg, pane};

pub fn render(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let icons = &theme.icons;
    let glyphs = [
        icons.clock,
        icons.magnifier,
        icons.stack,
        icons.gear,
        icons.question,
    ];

    let items: Vec<ListItem> = Screen::ALL
        .iter()
        .zip(glyphs)
        .map(|(screen, glyph)| {
            let here = *screen == state.screen;
            let marker = if here { icons.caret } else { " " };
            let label = if here {
                fg(theme.palette.accent).add_modifier(Modifier::BOLD)
            } else {
                fg(theme.palette.text)
            };
            let trim = if here {
                fg(theme.palette.accent)
            } else {
                fg(theme.palette.dim)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} {glyph} "), trim),
                Span::styled(screen.title(), label),
            ]))
        })
        .collect();

    frame.render_widget(
        List::new(items).block(pane(theme, icons.note, "Menu")),
        area,
    );
}

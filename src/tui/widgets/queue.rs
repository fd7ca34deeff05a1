use crate::app::state::{AppState, song_line};
use crate::tui::theme::Theme;
use crate::tui::ellipsize;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};

use super::fg;

pub fn render(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let icons = &theme.icons;

    if state.queue.is_empty() {
        frame.render_widget(
            Paragraph::new(" Queue is empty. Press 'a' on a track to add it here.")
                .style(fg(theme.palette.dim)),
            area,
        );
        return;
    }

    let [head, body, foot] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)])
            .areas(area);

    let shuffle_style = if state.queue.shuffling() {
        fg(theme.palette.accent)
    } else {
        fg(theme.palette.dim)
    };
    let shuffle_label = if state.queue.shuffling() { "on" } else { "off" };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {} tracks", state.queue.len()), fg(theme.palette.dim)),
            Span::styled(
                format!("   {} shuffle {shuffle_label}", icons.shuffle),
                shuffle_style,
            ),
        ])),
        head,
    );

    let playing = state.queue.playing_index();
    let view = body.height as usize;
    let width = body.width.saturating_sub(9) as usize;

    let items: Vec<ListItem> = state
        .queue
        .entries()
        .iter()
        .enumerate()
        .skip(state.queue_cursor.top)
        .take(view)
        .map(|(i, track)| {
            let marker = if playing == Some(i) { icons.play } else { " " };
            let style = if i == state.queue_cursor.cursor {
                fg(theme.palette.text)
                    .bg(theme.palette.raised)
                    .add_modifier(Modifier::BOLD)
            } else if playing == Some(i) {
                fg(theme.palette.accent).add_modifier(Modifier::BOLD)
            } else {
                fg(theme.palette.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {marker} "), fg(theme.palette.accent)),
                Span::styled(format!("{:>3}. ", i + 1), fg(theme.palette.dim)),
                Span::styled(ellipsize(&song_line(track), width), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), body);

    frame.render_widget(
        Paragraph::new(" Enter play  d remove  c clear  s shuffle  K/J move")
            .style(fg(theme.palette.dim)),
        foot,
    );
}

//! Bottom-bar lyrics pane.
//!
//! Synced lyrics follow the playback clock: the active line is looked
//! up from the current position and shown with one line of context on
//! each side. Plain lyrics just show from the top.

use crate::app::state::AppState;
use crate::tui::theme::Theme;
use crate::tui::ellipsize;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{fg, pane};

pub fn render(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let block = pane(theme, theme.icons.script, "Lyrics");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [_, body, _] = Layout::horizontal([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let doc = match &state.lyrics {
        Some(doc) if !doc.lines.is_empty() => doc,
        _ => {
            let note = if state.lyrics_pending {
                "Fetching…"
            } else {
                "No lyrics available"
            };
            frame.render_widget(
                Paragraph::new(note)
                    .style(fg(theme.palette.dim))
                    .alignment(Alignment::Center),
                body,
            );
            return;
        }
    };

    let active = if doc.synced {
        doc.active_line_at(state.elapsed)
    } else {
        None
    };
    let (start, slice) = doc.window(active.unwrap_or(0), 1);

    let width = body.width.saturating_sub(4) as usize;
    let mut rows: Vec<Line> = slice
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            if active == Some(start + offset) {
                let style = fg(theme.palette.accent).add_modifier(Modifier::BOLD);
                Line::from(vec![
                    Span::styled("♪ ", style),
                    Span::styled(ellipsize(&line.text, width), style),
                ])
            } else {
                Line::from(Span::styled(
                    format!("  {}", ellipsize(&line.text, width)),
                    fg(theme.palette.dim),
                ))
            }
        })
        .collect();

    // Center the little window vertically in the pane.
    let gap = (body.height as usize).saturating_sub(rows.len()) / 2;
    let mut padded = vec![Line::default(); gap];
    padded.append(&mut rows);

    frame.render_widget(Paragraph::new(padded), body);
}

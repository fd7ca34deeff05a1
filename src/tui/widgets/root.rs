//! Frame layout and per-screen dispatch.
//!
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │  Menu    │   History / Search / Queue /            │
//! │          │   Settings / Help                       │
//! ├──────────┴──────────────┬──────────────────────────┤
//! │        Player           │          Lyrics          │
//! ├─────────────────────────┴──────────────────────────┤
//! │ status                                             │
//! └────────────────────────────────────────────────────┘
//! ```

use crate::app::state::{AppState, Screen};
use crate::config::Config;
use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::{fg, help, lyrics, pane, player, queue, settings, sidebar, track_list};

pub fn render(frame: &mut Frame, theme: &Theme, cfg: &Config, state: &mut AppState) {
    let [top, bottom, footer] = Layout::vertical([
        Constraint::Min(8),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [side, main] =
        Layout::horizontal([Constraint::Length(20), Constraint::Min(40)]).areas(top);
    let [transport, lyric_pane] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .areas(bottom);

    sidebar::render(frame, theme, state, side);
    content(frame, theme, cfg, state, main);
    player::render(frame, theme, state, transport);
    lyrics::render(frame, theme, state, lyric_pane);
    status_line(frame, theme, state, footer);
}

fn content(frame: &mut Frame, theme: &Theme, cfg: &Config, state: &mut AppState, area: Rect) {
    let icons = &theme.icons;
    let icon = match state.screen {
        Screen::History => icons.clock,
        Screen::Search => icons.magnifier,
        Screen::Queue => icons.stack,
        Screen::Settings => icons.gear,
        Screen::Help => icons.question,
    };

    let frame_block = pane(theme, icon, state.screen.title());
    let inner = frame_block.inner(area);
    frame.render_widget(frame_block, area);

    match state.screen {
        Screen::Search => {
            let [query, results] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(inner);
            track_list::render_query_box(frame, theme, state, query);
            track_list::render(frame, theme, state, results);
        }
        Screen::History => track_list::render(frame, theme, state, inner),
        Screen::Queue => queue::render(frame, theme, state, inner),
        Screen::Settings => settings::render(frame, theme, cfg, state, inner),
        Screen::Help => help::render(frame, theme, inner),
    }
}

fn status_line(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    if state.status.is_empty() {
        return;
    }
    let text = crate::tui::ellipsize(&state.status, area.width.saturating_sub(2) as usize);
    frame.render_widget(
        Paragraph::new(Line::from(format!(" {text}"))).style(fg(theme.palette.dim)),
        area,
    );
}

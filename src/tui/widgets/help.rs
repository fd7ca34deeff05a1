use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::fg;

const NAVIGATION: &[(&str, &str)] = &[
    ("j / k", "Move down / up"),
    ("g / G", "Jump to top / bottom"),
    ("Ctrl+d / Ctrl+u", "Page down / up"),
    ("h / l", "Previous / next screen"),
    ("Tab", "Next screen"),
    ("1-5", "Go to screen"),
];

const PLAYBACK: &[(&str, &str)] = &[
    ("Enter", "Play selected track"),
    ("Space", "Pause / resume"),
    ("n / p", "Next / previous in queue"),
    ("[ / ]", "Seek 10s back / ahead"),
    ("- / =", "Volume down / up"),
    ("R", "Cycle repeat mode"),
];

const QUEUE: &[(&str, &str)] = &[
    ("a", "Add selected track"),
    ("Q", "Open the queue"),
    ("d / Del", "Remove entry"),
    ("c", "Clear"),
    ("s", "Toggle shuffle"),
    ("K / J", "Move entry up / down"),
];

const OTHER: &[(&str, &str)] = &[
    ("/ or i", "Back to the search box"),
    ("Ctrl+u", "Clear the query"),
    ("F5 / Ctrl+r", "Reload current screen"),
    ("q / Esc", "Quit"),
];

pub fn render(frame: &mut Frame, theme: &Theme, area: Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    frame.render_widget(
        Paragraph::new(column(theme, &[("Navigation", NAVIGATION), ("Playback", PLAYBACK)])),
        left,
    );
    frame.render_widget(
        Paragraph::new(column(theme, &[("Queue", QUEUE), ("Search & General", OTHER)])),
        right,
    );
}

fn column<'a>(theme: &Theme, sections: &[(&'a str, &'a [(&'a str, &'a str)])]) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for (title, binds) in sections {
        lines.push(Line::from(Span::styled(
            format!("━━ {title} ━━"),
            fg(theme.palette.accent).add_modifier(Modifier::BOLD),
        )));
        for &(keys, what) in *binds {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {keys:<16}"),
                    fg(theme.palette.soft).add_modifier(Modifier::BOLD),
                ),
                Span::styled(what, fg(theme.palette.text)),
            ]));
        }
        lines.push(Line::default());
    }
    lines
}

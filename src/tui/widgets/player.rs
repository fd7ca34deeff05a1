//! Bottom-bar transport pane: track, progress, controls, notices.

use crate::app::state::{AppState, NoticeLevel, Repeat};
use crate::tui::theme::{Icons, Theme};
use crate::tui::ellipsize;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{fg, pane};

pub fn render(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let icons = &theme.icons;

    let block = pane(theme, icons.note, "Player");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [_, body, _] = Layout::horizontal([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let [title_row, artist_row, _, meter_row, controls_row, notice_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(body);

    let width = body.width.saturating_sub(1) as usize;

    let title = state
        .playing
        .as_ref()
        .map(|t| t.title.as_str())
        .unwrap_or("Not playing");
    frame.render_widget(
        Paragraph::new(Span::styled(
            ellipsize(title, width),
            fg(theme.palette.text).add_modifier(Modifier::BOLD),
        )),
        title_row,
    );

    let mut byline = vec![Span::styled(
        ellipsize(
            &state
                .playing
                .as_ref()
                .map(|t| t.artists.join(", "))
                .unwrap_or_default(),
            width,
        ),
        fg(theme.palette.dim),
    )];
    if let Some(tag) = &state.stream_quality {
        byline.push(Span::styled(format!("  [{tag}]"), fg(theme.palette.soft)));
    }
    frame.render_widget(Paragraph::new(Line::from(byline)), artist_row);

    let ratio = if state.runtime > 0.0 {
        (state.elapsed / state.runtime).clamp(0.0, 1.0)
    } else {
        0.0
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            meter(meter_row.width as usize, ratio, icons),
            fg(theme.palette.accent),
        )),
        meter_row,
    );

    frame.render_widget(Paragraph::new(controls(state, icons, theme)), controls_row);

    if let Some(notice) = &state.notice {
        let (glyph, color) = match notice.level {
            NoticeLevel::Info => (icons.check, theme.palette.active),
            NoticeLevel::Fail => (icons.cross, theme.palette.alert),
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{glyph} "), fg(color)),
                Span::styled(
                    ellipsize(&notice.text, width.saturating_sub(3)),
                    fg(color),
                ),
            ])),
            notice_row,
        );
    }
}

fn controls<'a>(state: &AppState, icons: &Icons, theme: &Theme) -> Line<'a> {
    let mid = if state.paused { icons.play } else { icons.pause };
    let vol = match state.volume {
        0 => icons.vol_mute,
        1..50 => icons.vol_low,
        _ => icons.vol_high,
    };

    let mut spans = vec![
        Span::styled(
            format!("{}/{}", clock(state.elapsed), clock(state.runtime)),
            fg(theme.palette.dim),
        ),
        Span::styled(format!(" {} ", icons.prev), fg(theme.palette.dim)),
        Span::styled(mid.to_string(), fg(theme.palette.active)),
        Span::styled(format!(" {}  ", icons.next), fg(theme.palette.dim)),
        Span::styled(format!("{vol} {}%", state.volume), fg(theme.palette.dim)),
    ];
    match state.repeat {
        Repeat::Off => {}
        Repeat::One => spans.push(Span::styled(
            format!(" {}", icons.repeat_one),
            fg(theme.palette.soft),
        )),
        Repeat::All => spans.push(Span::styled(
            format!(" {}", icons.repeat_all),
            fg(theme.palette.soft),
        )),
    }
    Line::from(spans)
}

fn clock(secs: f64) -> String {
    let whole = secs.max(0.0) as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

fn meter(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }
    let lead = ((width - 1) as f64 * ratio).round() as usize;
    format!(
        "{}{}{}",
        icons.bar_fill.repeat(lead),
        icons.bar_knob,
        icons.bar_rest.repeat(width - 1 - lead)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_formatting() {
        assert_eq!(clock(0.0), "00:00");
        assert_eq!(clock(65.4), "01:05");
        assert_eq!(clock(-3.0), "00:00");
    }

    #[test]
    fn test_meter_spans_width() {
        let icons = Icons::default();
        for w in [3usize, 10, 40] {
            for ratio in [0.0, 0.5, 1.0] {
                assert_eq!(meter(w, ratio, &icons).chars().count(), w);
            }
        }
        assert!(meter(2, 0.5, &icons).is_empty());
    }
}

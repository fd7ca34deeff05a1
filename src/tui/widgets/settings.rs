use crate::app::state::{AppState, SettingsSection};
use crate::catalog::QualityTier;
use crate::config::Config;
use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};

use super::{fg, pane};

pub fn render(frame: &mut Frame, theme: &Theme, cfg: &Config, state: &AppState, area: Rect) {
    let [quality, output, lyrics, storage, hint] = Layout::vertical([
        Constraint::Length(9),
        Constraint::Min(5),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .areas(area);

    quality_section(frame, theme, cfg, state, quality);
    output_section(frame, theme, cfg, state, output);
    lyrics_section(frame, theme, cfg, state, lyrics);
    storage_section(frame, theme, state, storage);

    frame.render_widget(
        Paragraph::new(" Tab section   j/k move   Enter apply").style(fg(theme.palette.dim)),
        hint,
    );
}

fn section_pane(
    theme: &Theme,
    focused: bool,
    icon: &str,
    title: &str,
) -> ratatui::widgets::Block<'static> {
    let border = if focused {
        theme.palette.accent
    } else {
        theme.palette.border
    };
    pane(theme, icon, title).border_style(fg(border))
}

fn quality_section(frame: &mut Frame, theme: &Theme, cfg: &Config, state: &AppState, area: Rect) {
    let focused = state.section == SettingsSection::Quality;
    let block = section_pane(theme, focused, theme.icons.gauge, "Stream Quality");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [status, tiers] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

    // A preference with no matching rendition silently plays the best
    // available, so the resolved tag is worth showing next to it.
    let configured = cfg.quality_tier();
    let mut summary = vec![
        Span::styled("Preference: ", fg(theme.palette.dim)),
        Span::styled(configured.label(), fg(theme.palette.active)),
    ];
    if let Some(tag) = &state.stream_quality {
        summary.push(Span::styled(
            format!("  (playing at {tag})"),
            fg(theme.palette.dim),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(summary)), status);

    let items: Vec<ListItem> = QualityTier::ALL
        .iter()
        .enumerate()
        .map(|(i, tier)| {
            choice_row(
                theme,
                focused && i == state.tier_cursor,
                *tier == configured,
                tier.label(),
            )
        })
        .collect();
    frame.render_widget(List::new(items), tiers);
}

fn output_section(frame: &mut Frame, theme: &Theme, cfg: &Config, state: &AppState, area: Rect) {
    let focused = state.section == SettingsSection::Output;
    let block = section_pane(theme, focused, theme.icons.vol_high, "Audio Output");

    if !state.devices_ready {
        frame.render_widget(
            Paragraph::new(format!(
                "{} Listing audio devices… (F5 to retry)",
                theme.icons.hourglass
            ))
            .style(fg(theme.palette.dim))
            .block(block),
            area,
        );
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = cfg.player.audio_device.as_deref().unwrap_or("auto");
    let items: Vec<ListItem> = state
        .devices
        .iter()
        .enumerate()
        .map(|(i, name)| {
            choice_row(
                theme,
                focused && i == state.device_cursor,
                name.as_str() == active,
                name,
            )
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

fn lyrics_section(frame: &mut Frame, theme: &Theme, cfg: &Config, state: &AppState, area: Rect) {
    let icons = &theme.icons;
    let block = pane(theme, icons.script, "Lyrics");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (glyph, text, color) = if state.lyrics.is_some() {
        (icons.check, "Loaded", theme.palette.active)
    } else if state.lyrics_pending {
        (icons.hourglass, "Fetching…", theme.palette.dim)
    } else {
        (icons.dot, "Not loaded", theme.palette.dim)
    };
    let kind = match &state.lyrics {
        Some(doc) if doc.synced => "synced",
        Some(_) => "plain",
        None => "-",
    };

    let mut row = vec![
        Span::styled(format!("{glyph} "), fg(color)),
        Span::styled(text, fg(color)),
        Span::styled(format!("  ({kind})"), fg(theme.palette.dim)),
    ];
    if cfg.player.lyrics_offset_ms != 0 {
        row.push(Span::styled(
            format!("  offset {}ms", cfg.player.lyrics_offset_ms),
            fg(theme.palette.dim),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(row)), inner);
}

fn storage_section(frame: &mut Frame, theme: &Theme, state: &AppState, area: Rect) {
    let focused = state.section == SettingsSection::Storage;
    let block = section_pane(theme, focused, theme.icons.disk, "Cache & Data");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = vec![
        Line::from(vec![
            Span::styled("Database size: ", fg(theme.palette.dim)),
            Span::styled(human_size(state.db_bytes), fg(theme.palette.text)),
        ]),
        Line::from(Span::styled(
            format!("{} 'c' wipes history and caches", theme.icons.info),
            fg(theme.palette.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(rows), inner);
}

fn choice_row(theme: &Theme, under_cursor: bool, active: bool, label: &str) -> ListItem<'static> {
    let marker = if under_cursor { "▸" } else { " " };
    let note = if active { "  (current)" } else { "" };
    let style = if under_cursor {
        fg(theme.palette.bg)
            .bg(theme.palette.accent)
            .add_modifier(Modifier::BOLD)
    } else if active {
        fg(theme.palette.active).add_modifier(Modifier::BOLD)
    } else {
        fg(theme.palette.text)
    };
    ListItem::new(Line::from(Span::styled(
        format!("{marker} {label}{note}"),
        style,
    )))
}

fn human_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GB", b / GB)
    } else if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::human_size;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.00 MB");
    }
}

pub mod help;
pub mod lyrics;
pub mod player;
pub mod queue;
pub mod root;
pub mod settings;
pub mod sidebar;
pub mod track_list;

use super::theme::Theme;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

/// Standard pane frame: rounded border, icon and title in the corner.
fn pane(theme: &Theme, icon: &str, title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(theme.borders())
        .border_style(fg(theme.palette.border))
        .title(format!(" {icon} {title} "))
        .title_style(fg(theme.palette.accent))
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

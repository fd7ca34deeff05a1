use crate::app::state::AppState;
use crate::config::Config;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use theme::Theme;

pub mod theme;
pub mod widgets;

pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw-mode RAII: entering takes over the terminal, dropping restores
/// it even on unwind.
pub struct TerminalGuard {
    terminal: TuiTerminal,
    mouse: bool,
}

impl TerminalGuard {
    pub fn enter(mouse: bool) -> anyhow::Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen).context("enter alternate screen")?;
        if mouse {
            execute!(out, EnableMouseCapture).context("enable mouse capture")?;
        }
        let terminal =
            Terminal::new(CrosstermBackend::new(out)).context("create terminal")?;
        Ok(Self { terminal, mouse })
    }

    pub fn terminal_mut(&mut self) -> &mut TuiTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Never panic while unwinding.
        let _ = disable_raw_mode();
        let mut out = io::stdout();
        if self.mouse {
            let _ = execute!(out, DisableMouseCapture);
        }
        let _ = execute!(out, LeaveAlternateScreen);
    }
}

pub fn draw(terminal: &mut TuiTerminal, cfg: &Config, state: &mut AppState) -> anyhow::Result<()> {
    if state.notice.as_ref().is_some_and(|n| n.faded()) {
        state.notice = None;
    }
    let theme = Theme::named(&cfg.ui.theme);
    terminal
        .draw(|frame| widgets::root::render(frame, &theme, cfg, state))
        .context("draw frame")?;
    Ok(())
}

/// Clip to `max` characters, marking the cut with an ellipsis.
pub(crate) fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut clipped: String = text.chars().take(max - 1).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::ellipsize;

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("exactly ten..", 13), "exactly ten..");
        assert_eq!(ellipsize("a longer title here", 10), "a longer …");
        assert_eq!(ellipsize("abc", 2), "ab");
        assert_eq!(ellipsize("anything", 0), "");
    }
}

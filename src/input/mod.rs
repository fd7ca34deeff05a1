//! Terminal input: a blocking crossterm reader task plus the key map.
//!
//! Key handling is layered: the search box captures typing outright,
//! each screen may claim a few keys, and whatever is left falls through
//! to the shared bindings. Screens therefore get vim-style navigation
//! and the transport keys for free.

use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, Screen, SearchFocus, SettingsSection};
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_listener(tx: mpsc::Sender<Event>, mouse: bool) {
    tokio::task::spawn_blocking(move || {
        loop {
            if !event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            let forwarded = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => {
                    Some(InputEvent::Key(k))
                }
                Ok(CtEvent::Mouse(m)) if mouse => Some(InputEvent::Mouse(m)),
                Ok(CtEvent::Resize(_, _)) => Some(InputEvent::Resize),
                _ => None,
            };
            if let Some(ev) = forwarded
                && tx.blocking_send(Event::Input(ev)).is_err()
            {
                // Main loop is gone.
                return;
            }
        }
    });
}

pub fn action_for(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Redraw),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::CursorUp),
            MouseEventKind::ScrollDown => Some(Action::CursorDown),
            _ => None,
        },
        InputEvent::Key(k) => {
            if state.screen == Screen::Search && state.search_focus == SearchFocus::Query {
                return query_keys(state, k);
            }
            screen_keys(state, k).or_else(|| shared_keys(k))
        }
    }
}

/// Bindings while the search box has focus: nearly every key is text.
fn query_keys(state: &AppState, k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::SubmitSearch),
        KeyCode::Backspace => Some(Action::EraseChar),
        KeyCode::Tab => Some(Action::ScreenForward),
        KeyCode::BackTab => Some(Action::ScreenBackward),
        KeyCode::Left => Some(Action::ScreenBackward),
        KeyCode::Right => Some(Action::ScreenForward),
        KeyCode::Down if !state.results.rows.is_empty() => {
            Some(Action::FocusSearch(SearchFocus::List))
        }
        KeyCode::F(5) => Some(Action::Reload),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ClearQuery)
        }
        KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::TypeChar(c))
        }
        _ => None,
    }
}

/// Per-screen overrides, consulted before the shared bindings.
fn screen_keys(state: &AppState, k: KeyEvent) -> Option<Action> {
    match state.screen {
        Screen::Search => match k.code {
            KeyCode::Esc | KeyCode::Char('/') | KeyCode::Char('i') => {
                Some(Action::FocusSearch(SearchFocus::Query))
            }
            _ => None,
        },
        Screen::Queue => match k.code {
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::Unqueue),
            KeyCode::Char('c') => Some(Action::ClearQueue),
            KeyCode::Char('s') => Some(Action::ToggleShuffle),
            KeyCode::Char('K') => Some(Action::MoveUp),
            KeyCode::Char('J') => Some(Action::MoveDown),
            _ => None,
        },
        Screen::Settings => match k.code {
            KeyCode::Tab => Some(Action::SectionNext),
            KeyCode::BackTab => Some(Action::SectionPrev),
            KeyCode::Enter => Some(Action::ApplySelection),
            KeyCode::Char('c') if state.section == SettingsSection::Storage => {
                Some(Action::WipeCache)
            }
            _ => None,
        },
        Screen::History | Screen::Help => None,
    }
}

fn shared_keys(k: KeyEvent) -> Option<Action> {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    match k.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),

        KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
        KeyCode::Char('g') => Some(Action::CursorTop),
        KeyCode::Char('G') => Some(Action::CursorBottom),
        KeyCode::Char('d') if ctrl => Some(Action::PageDown),
        KeyCode::Char('u') if ctrl => Some(Action::PageUp),

        KeyCode::Left | KeyCode::Char('h') => Some(Action::ScreenBackward),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::ScreenForward),
        KeyCode::Tab => Some(Action::ScreenForward),
        KeyCode::BackTab => Some(Action::ScreenBackward),
        KeyCode::Char(c @ '1'..='5') => {
            Some(Action::ShowScreen(Screen::at(c as usize - '1' as usize)))
        }
        KeyCode::Char('Q') => Some(Action::ShowScreen(Screen::Queue)),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Action::ShowScreen(Screen::Help)),

        KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char('a') => Some(Action::Enqueue),
        KeyCode::Char('n') => Some(Action::PlayNext),
        KeyCode::Char('p') => Some(Action::PlayPrev),

        KeyCode::Char(' ') => Some(Action::PlayPause),
        KeyCode::Char('R') => Some(Action::CycleRepeat),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
        KeyCode::Char(']') => Some(Action::SeekAhead),
        KeyCode::Char('[') => Some(Action::SeekBack),

        KeyCode::Char('r') if ctrl => Some(Action::Reload),
        KeyCode::F(5) => Some(Action::Reload),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_typing_goes_to_query_when_search_box_focused() {
        let mut state = AppState::default();
        state.show(Screen::Search);

        assert_eq!(
            action_for(&state, key(KeyCode::Char('q'))),
            Some(Action::TypeChar('q'))
        );
        assert_eq!(
            action_for(&state, key(KeyCode::Enter)),
            Some(Action::SubmitSearch)
        );
    }

    #[test]
    fn test_result_list_releases_typing_keys() {
        let mut state = AppState::default();
        state.show(Screen::Search);
        state.search_focus = SearchFocus::List;

        assert_eq!(action_for(&state, key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            action_for(&state, key(KeyCode::Char('/'))),
            Some(Action::FocusSearch(SearchFocus::Query))
        );
        assert_eq!(
            action_for(&state, key(KeyCode::Enter)),
            Some(Action::PlaySelected)
        );
    }

    #[test]
    fn test_queue_screen_claims_its_keys_over_shared() {
        let mut state = AppState::default();
        state.show(Screen::Queue);

        assert_eq!(action_for(&state, key(KeyCode::Char('d'))), Some(Action::Unqueue));
        assert_eq!(action_for(&state, key(KeyCode::Char('s'))), Some(Action::ToggleShuffle));
        // Untouched keys still fall through.
        assert_eq!(action_for(&state, key(KeyCode::Char('j'))), Some(Action::CursorDown));
    }

    #[test]
    fn test_settings_enter_applies_instead_of_playing() {
        let mut state = AppState::default();
        state.show(Screen::Settings);

        assert_eq!(
            action_for(&state, key(KeyCode::Enter)),
            Some(Action::ApplySelection)
        );
        assert_eq!(action_for(&state, key(KeyCode::Tab)), Some(Action::SectionNext));
    }

    #[test]
    fn test_digit_keys_switch_screens() {
        let state = AppState::default();
        assert_eq!(
            action_for(&state, key(KeyCode::Char('3'))),
            Some(Action::ShowScreen(Screen::Queue))
        );
        assert_eq!(
            action_for(&state, key(KeyCode::Char('5'))),
            Some(Action::ShowScreen(Screen::Help))
        );
    }
}

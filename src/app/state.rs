use crate::catalog::models::Track;
use crate::lyrics::ParsedLyrics;
use crate::queue::Queue;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    History,
    Search,
    Queue,
    Settings,
    Help,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::History,
        Screen::Search,
        Screen::Queue,
        Screen::Settings,
        Screen::Help,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::History => "History",
            Screen::Search => "Search",
            Screen::Queue => "Queue",
            Screen::Settings => "Settings",
            Screen::Help => "Help",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Screen::History => 0,
            Screen::Search => 1,
            Screen::Queue => 2,
            Screen::Settings => 3,
            Screen::Help => 4,
        }
    }

    pub fn at(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn forward(self) -> Self {
        Self::at((self.index() + 1) % Self::ALL.len())
    }

    pub fn backward(self) -> Self {
        Self::at((self.index() + Self::ALL.len() - 1) % Self::ALL.len())
    }

    /// Config key for restoring the screen across runs.
    pub fn key(self) -> &'static str {
        match self {
            Screen::History => "history",
            Screen::Search => "search",
            Screen::Queue => "queue",
            Screen::Settings => "settings",
            Screen::Help => "help",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Query,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Quality,
    Output,
    Storage,
}

impl SettingsSection {
    pub fn next(self) -> Self {
        match self {
            SettingsSection::Quality => SettingsSection::Output,
            SettingsSection::Output => SettingsSection::Storage,
            SettingsSection::Storage => SettingsSection::Quality,
        }
    }

    pub fn prev(self) -> Self {
        self.next().next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Off,
    One,
    All,
}

impl Repeat {
    pub fn cycle(self) -> Self {
        match self {
            Repeat::Off => Repeat::One,
            Repeat::One => Repeat::All,
            Repeat::All => Repeat::Off,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Repeat::Off => "Repeat: Off",
            Repeat::One => "Repeat: One",
            Repeat::All => "Repeat: All",
        }
    }
}

/// Transient message shown in the player pane for a few seconds.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    born: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Fail,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Info,
            born: Instant::now(),
        }
    }

    pub fn fail(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Fail,
            born: Instant::now(),
        }
    }

    pub fn faded(&self) -> bool {
        self.born.elapsed() > Duration::from_secs(3)
    }
}

/// A scrollable track listing (history and search results each own one).
///
/// `rows` caches the rendered labels so drawing never re-joins artist
/// strings. `top` is the first visible row; cursor movement drags it
/// along so the selection stays inside the viewport.
#[derive(Debug, Clone, Default)]
pub struct TrackPane {
    pub tracks: Vec<Track>,
    pub rows: Vec<String>,
    pub cursor: usize,
    pub top: usize,
    pub busy: bool,
    pub filled: bool,
    pub next_page: Option<u32>,
    pub busy_more: bool,
}

impl TrackPane {
    pub fn put(&mut self, tracks: Vec<Track>) {
        self.rows = tracks.iter().map(song_line).collect();
        self.tracks = tracks;
        self.cursor = 0;
        self.top = 0;
        self.busy = false;
        self.filled = true;
    }

    pub fn extend(&mut self, tracks: Vec<Track>) {
        self.rows.extend(tracks.iter().map(song_line));
        self.tracks.extend(tracks);
        self.busy_more = false;
    }

    /// Move an already-listed track to the front, or insert it fresh.
    pub fn promote(&mut self, track: Track) {
        if let Some(i) = self.tracks.iter().position(|t| t.id == track.id) {
            self.tracks.remove(i);
            self.rows.remove(i);
        }
        self.rows.insert(0, song_line(&track));
        self.tracks.insert(0, track);
        self.filled = true;
    }

    pub fn cursor_track(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    /// Move the cursor by `delta` rows, clamped, keeping it visible
    /// within a viewport of `view` rows.
    pub fn step(&mut self, delta: isize, view: usize) {
        let last = self.rows.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.follow(view);
    }

    pub fn jump(&mut self, index: usize, view: usize) {
        self.cursor = index.min(self.rows.len().saturating_sub(1));
        self.follow(view);
    }

    pub fn follow(&mut self, view: usize) {
        if view == 0 {
            return;
        }
        if self.cursor < self.top {
            self.top = self.cursor;
        } else if self.cursor >= self.top + view {
            self.top = self.cursor + 1 - view;
        }
    }

    /// True when the cursor is close enough to the end that the next
    /// result page should be requested.
    pub fn wants_more(&self) -> bool {
        const LEAD: usize = 5;
        !self.busy_more && self.next_page.is_some() && self.cursor + LEAD >= self.rows.len()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn song_line(t: &Track) -> String {
    if t.artists.is_empty() {
        t.title.clone()
    } else {
        format!("{} - {}", t.title, t.artists.join(", "))
    }
}

/// Cursor for the queue screen; the entries themselves live in
/// [`crate::queue::Queue`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueCursor {
    pub cursor: usize,
    pub top: usize,
}

impl QueueCursor {
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn follow(&mut self, view: usize) {
        if view == 0 {
            return;
        }
        if self.cursor < self.top {
            self.top = self.cursor;
        } else if self.cursor >= self.top + view {
            self.top = self.cursor + 1 - view;
        }
    }
}

/// Everything the UI draws from, owned by the event loop and updated in
/// one place per event. No globals; widgets get a shared borrow.
#[derive(Default)]
pub struct AppState {
    pub quit: bool,

    pub screen: Screen,

    pub history: TrackPane,
    pub results: TrackPane,

    pub query: String,
    pub submitted: Option<String>,
    pub search_focus: SearchFocus,

    pub playing: Option<Track>,
    pub stream_url: Option<String>,
    pub stream_quality: Option<String>,
    pub paused: bool,
    pub elapsed: f64,
    pub runtime: f64,
    pub volume: u8,

    pub queue: Queue,
    pub queue_cursor: QueueCursor,

    pub lyrics: Option<ParsedLyrics>,
    pub lyrics_for: Option<String>,
    pub lyrics_pending: bool,

    pub tier_cursor: usize,
    pub devices: Vec<String>,
    pub device_cursor: usize,
    pub devices_ready: bool,
    pub section: SettingsSection,

    pub db_bytes: u64,

    pub repeat: Repeat,
    pub notice: Option<Notice>,
    pub status: String,
}

impl AppState {
    pub fn show(&mut self, screen: Screen) {
        self.screen = screen;
        if screen == Screen::Search {
            self.search_focus = SearchFocus::Query;
        }
    }

    /// The track pane behind the current screen, when it has one.
    pub fn pane(&self) -> Option<&TrackPane> {
        match self.screen {
            Screen::History => Some(&self.history),
            Screen::Search => Some(&self.results),
            _ => None,
        }
    }

    pub fn pane_mut(&mut self) -> Option<&mut TrackPane> {
        match self.screen {
            Screen::History => Some(&mut self.history),
            Screen::Search => Some(&mut self.results),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            title: format!("Song {id}"),
            artists: vec!["Someone".into()],
            album: None,
            duration_seconds: None,
            downloads: Vec::new(),
        }
    }

    #[test]
    fn test_screen_cycle_wraps() {
        assert_eq!(Screen::Help.forward(), Screen::History);
        assert_eq!(Screen::History.backward(), Screen::Help);
        for s in Screen::ALL {
            assert_eq!(Screen::from_key(s.key()), Some(s));
        }
    }

    #[test]
    fn test_pane_step_drags_viewport() {
        let mut pane = TrackPane::default();
        pane.put((0..30).map(|i| track(&i.to_string())).collect());

        pane.step(9, 10);
        assert_eq!(pane.cursor, 9);
        assert_eq!(pane.top, 0);

        pane.step(1, 10);
        assert_eq!(pane.cursor, 10);
        assert_eq!(pane.top, 1);

        pane.jump(0, 10);
        assert_eq!(pane.top, 0);

        // Clamped at the end.
        pane.step(100, 10);
        assert_eq!(pane.cursor, 29);
    }

    #[test]
    fn test_pane_promote_dedups() {
        let mut pane = TrackPane::default();
        pane.put(vec![track("a"), track("b"), track("c")]);

        pane.promote(track("c"));
        assert_eq!(pane.tracks.len(), 3);
        assert_eq!(pane.tracks[0].id, "c");

        pane.promote(track("new"));
        assert_eq!(pane.tracks.len(), 4);
        assert_eq!(pane.tracks[0].id, "new");
        assert_eq!(pane.rows.len(), 4);
    }

    #[test]
    fn test_pane_wants_more_needs_page_and_proximity() {
        let mut pane = TrackPane::default();
        pane.put((0..20).map(|i| track(&i.to_string())).collect());
        pane.next_page = Some(2);

        assert!(!pane.wants_more());
        pane.jump(16, 20);
        assert!(pane.wants_more());

        pane.busy_more = true;
        assert!(!pane.wants_more());
    }
}

use crate::catalog::models::Track;
use crate::lyrics::ParsedLyrics;

/// Everything that can wake the main loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Task(TaskEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

/// Reports from the mpv transport.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Playing,
    Paused,
    Position(f64),
    Duration(f64),
    Finished,
    Failed(String),
}

/// Completions from spawned network and storage tasks.
#[derive(Debug, Clone)]
pub enum TaskEvent {
    SearchPage {
        query: String,
        tracks: Vec<Track>,
        next_page: Option<u32>,
    },
    ExtraPage {
        tracks: Vec<Track>,
        next_page: Option<u32>,
    },
    RecentTracks(Vec<Track>),
    /// A play was written to the history table.
    Played(Track),
    /// The stream URL for a track was resolved at the configured tier.
    StreamReady { track: Box<Track>, url: String },
    Devices(Vec<String>),
    LyricsReady {
        track_id: String,
        lyrics: ParsedLyrics,
    },
    LyricsMissing {
        track_id: String,
    },
    Failed(String),
}

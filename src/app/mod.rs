//! The event loop: input, player, and task events funnel into one mpsc
//! channel; every event updates [`AppState`] and triggers a redraw.

pub mod actions;
pub mod events;
pub mod state;
mod tasks;

use crate::catalog::{CatalogClient, QualityTier};
use crate::config::Config;
use crate::input;
use crate::lyrics::LrclibClient;
use crate::player::mpv::MpvPlayer;
use crate::storage::Store;
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, PlayerEvent, TaskEvent};
use state::{AppState, Notice, QueueCursor, Repeat, Screen, SettingsSection};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Rows a list screen shows at once; keeps cursors inside the viewport
/// between draws without threading the real height through every event.
const VIEW_ROWS: usize = 20;

type Tx = mpsc::Sender<Event>;

pub struct App {
    cfg: Config,
    cfg_path: PathBuf,
    state: AppState,
    catalog: CatalogClient,
    lrclib: LrclibClient,
    player: Option<MpvPlayer>,
}

impl App {
    pub fn new(cfg: Config, cfg_path: PathBuf) -> anyhow::Result<Self> {
        // Create the database up front so the settings screen has a
        // size to report even before the first play.
        Store::open(&cfg.db_path())?;

        let mut state = AppState::default();
        state.volume = cfg.player.volume;
        state.tier_cursor = QualityTier::ALL
            .iter()
            .position(|t| *t == cfg.quality_tier())
            .unwrap_or(0);
        if let Some(key) = &cfg.ui.last_screen
            && let Some(screen) = Screen::from_key(key)
        {
            state.show(screen);
        }

        Ok(Self {
            catalog: CatalogClient::new(cfg.api.base_url.clone()),
            lrclib: LrclibClient::new(),
            cfg,
            cfg_path,
            state,
            player: None,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_listener(tx.clone(), self.cfg.ui.mouse);
        self.start_player(&tx).await;

        self.state.history.busy = true;
        tasks::load_history(self.cfg.db_path(), tx.clone());
        if self.state.screen == Screen::Settings {
            self.enter(Screen::Settings, &tx);
        }

        tui::draw(terminal, &self.cfg, &mut self.state)?;

        // Redraw per event; there is no idle ticker.
        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(iev) => {
                    if let Some(action) = input::action_for(&self.state, iev) {
                        self.act(action, &tx).await;
                    }
                }
                Event::Player(pe) => self.on_player(pe, &tx),
                Event::Task(te) => self.on_task(te, &tx).await,
            }
            if self.state.quit {
                break;
            }
            tui::draw(terminal, &self.cfg, &mut self.state)?;
        }

        self.persist_session();
        Ok(())
    }

    async fn start_player(&mut self, tx: &Tx) {
        let log = self.cfg.storage.data_dir.join("mpv.log");
        match MpvPlayer::spawn(tx.clone(), self.cfg.player.audio_device.as_deref(), Some(&log))
            .await
        {
            Ok(p) => self.player = Some(p),
            Err(e) => {
                self.state.notice = Some(Notice::fail(format!("mpv unavailable: {e:#}")));
                self.player = None;
            }
        }
    }

    fn persist_session(&mut self) {
        self.cfg.player.volume = self.state.volume;
        self.cfg.ui.last_screen = Some(self.state.screen.key().into());
        if let Err(e) = self.cfg.store(&self.cfg_path) {
            tracing::warn!("config save failed: {e:#}");
        }
    }

    async fn act(&mut self, action: Action, tx: &Tx) {
        match action {
            Action::Quit => self.state.quit = true,
            Action::Redraw => {}

            Action::ShowScreen(s) => self.enter(s, tx),
            Action::ScreenForward => self.enter(self.state.screen.forward(), tx),
            Action::ScreenBackward => self.enter(self.state.screen.backward(), tx),
            Action::FocusSearch(f) => self.state.search_focus = f,

            Action::CursorUp => self.move_cursor(-1, tx),
            Action::CursorDown => self.move_cursor(1, tx),
            Action::PageUp => self.move_cursor(-10, tx),
            Action::PageDown => self.move_cursor(10, tx),
            Action::CursorTop => self.cursor_edge(true),
            Action::CursorBottom => {
                self.cursor_edge(false);
                self.maybe_fetch_more(tx);
            }

            Action::TypeChar(c) => self.state.query.push(c),
            Action::EraseChar => {
                self.state.query.pop();
            }
            Action::ClearQuery => self.state.query.clear(),
            Action::SubmitSearch => self.submit_search(tx),
            Action::Reload => self.reload(tx),

            Action::PlaySelected => self.play_selected(tx),
            Action::Enqueue => self.enqueue_selected(),
            Action::Unqueue => {
                let i = self.state.queue_cursor.cursor;
                if self.state.queue.remove_at(i).is_some() {
                    self.state.queue_cursor.clamp(self.state.queue.len());
                }
            }
            Action::ClearQueue => {
                self.state.queue.clear();
                self.state.queue_cursor = QueueCursor::default();
            }
            Action::ToggleShuffle => {
                let on = self.state.queue.toggle_shuffle();
                self.state.status = format!("Shuffle {}", if on { "on" } else { "off" });
            }
            Action::MoveUp => {
                let i = self.state.queue_cursor.cursor;
                if i > 0 {
                    self.state.queue.reorder(i, i - 1);
                    self.state.queue_cursor.cursor = i - 1;
                    self.state.queue_cursor.follow(VIEW_ROWS);
                }
            }
            Action::MoveDown => {
                let i = self.state.queue_cursor.cursor;
                if i + 1 < self.state.queue.len() {
                    self.state.queue.reorder(i, i + 1);
                    self.state.queue_cursor.cursor = i + 1;
                    self.state.queue_cursor.follow(VIEW_ROWS);
                }
            }
            Action::PlayNext => match self.state.queue.step_forward().cloned() {
                Some(track) => self.play_track(track, tx),
                None => self.state.status = "End of queue".into(),
            },
            Action::PlayPrev => match self.state.queue.step_back().cloned() {
                Some(track) => self.play_track(track, tx),
                None => self.state.status = "Start of queue".into(),
            },

            Action::PlayPause => {
                if let Some(p) = &self.player
                    && let Err(e) = p.toggle_pause().await
                {
                    self.state.status = format!("mpv: {e:#}");
                }
            }
            Action::CycleRepeat => {
                self.state.repeat = self.state.repeat.cycle();
                self.state.status = self.state.repeat.describe().into();
            }
            Action::VolumeUp => self.nudge_volume(5).await,
            Action::VolumeDown => self.nudge_volume(-5).await,
            Action::SeekAhead => {
                if let Some(p) = &self.player {
                    let _ = p.seek(10.0).await;
                }
            }
            Action::SeekBack => {
                if let Some(p) = &self.player {
                    let _ = p.seek(-10.0).await;
                }
            }

            Action::SectionNext => self.state.section = self.state.section.next(),
            Action::SectionPrev => self.state.section = self.state.section.prev(),
            Action::ApplySelection => self.apply_selection(tx).await,
            Action::WipeCache => self.wipe_cache(),
        }
    }

    /// Switch screens, kicking off whatever the target needs loaded.
    fn enter(&mut self, screen: Screen, tx: &Tx) {
        self.state.show(screen);
        match screen {
            Screen::Settings => {
                self.state.devices_ready = false;
                tasks::list_devices(tx.clone());
                self.refresh_db_size();
            }
            Screen::History if !self.state.history.filled && !self.state.history.busy => {
                self.state.history.busy = true;
                tasks::load_history(self.cfg.db_path(), tx.clone());
            }
            _ => {}
        }
    }

    fn reload(&mut self, tx: &Tx) {
        match self.state.screen {
            Screen::History => {
                if !self.state.history.busy {
                    self.state.history.busy = true;
                    tasks::load_history(self.cfg.db_path(), tx.clone());
                }
            }
            Screen::Search => self.submit_search(tx),
            Screen::Settings => {
                self.state.devices_ready = false;
                tasks::list_devices(tx.clone());
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize, tx: &Tx) {
        match self.state.screen {
            Screen::Settings => self.move_section_cursor(delta),
            Screen::Queue => {
                let len = self.state.queue.len();
                if len == 0 {
                    return;
                }
                let qc = &mut self.state.queue_cursor;
                qc.cursor = qc.cursor.saturating_add_signed(delta).min(len - 1);
                qc.follow(VIEW_ROWS);
            }
            _ => {
                if let Some(pane) = self.state.pane_mut() {
                    pane.step(delta, VIEW_ROWS);
                }
                self.maybe_fetch_more(tx);
            }
        }
    }

    fn move_section_cursor(&mut self, delta: isize) {
        match self.state.section {
            SettingsSection::Quality => {
                self.state.tier_cursor = self
                    .state
                    .tier_cursor
                    .saturating_add_signed(delta)
                    .min(QualityTier::ALL.len() - 1);
            }
            SettingsSection::Output => {
                let last = self.state.devices.len().saturating_sub(1);
                self.state.device_cursor =
                    self.state.device_cursor.saturating_add_signed(delta).min(last);
            }
            SettingsSection::Storage => {}
        }
    }

    fn cursor_edge(&mut self, top: bool) {
        match self.state.screen {
            Screen::Settings => {}
            Screen::Queue => {
                let len = self.state.queue.len();
                let qc = &mut self.state.queue_cursor;
                qc.cursor = if top { 0 } else { len.saturating_sub(1) };
                if top {
                    qc.top = 0;
                }
                qc.follow(VIEW_ROWS);
            }
            _ => {
                if let Some(pane) = self.state.pane_mut() {
                    let end = pane.rows.len().saturating_sub(1);
                    pane.jump(if top { 0 } else { end }, VIEW_ROWS);
                }
            }
        }
    }

    fn submit_search(&mut self, tx: &Tx) {
        if self.state.results.busy {
            return;
        }
        let query = self.state.query.trim().to_string();
        if query.is_empty() {
            self.state.status = "Type a query first".into();
            return;
        }
        self.state.results.busy = true;
        self.state.results.next_page = None;
        self.state.status = format!("Searching: {query}");
        tasks::search(self.catalog.clone(), self.cfg.db_path(), query, tx.clone());
    }

    fn maybe_fetch_more(&mut self, tx: &Tx) {
        if self.state.screen != Screen::Search || !self.state.results.wants_more() {
            return;
        }
        let Some(page) = self.state.results.next_page else {
            return;
        };
        let Some(query) = self.state.submitted.clone() else {
            return;
        };
        self.state.results.busy_more = true;
        self.state.status = "Fetching more…".into();
        tasks::search_more(self.catalog.clone(), query, page, tx.clone());
    }

    fn play_selected(&mut self, tx: &Tx) {
        if self.state.screen == Screen::Queue {
            self.state.queue.jump(self.state.queue_cursor.cursor);
            if let Some(track) = self.state.queue.playing().cloned() {
                self.play_track(track, tx);
            }
            return;
        }
        if let Some(track) = self.state.pane().and_then(|p| p.cursor_track()).cloned() {
            self.play_track(track, tx);
        }
    }

    fn enqueue_selected(&mut self) {
        if let Some(track) = self.state.pane().and_then(|p| p.cursor_track()).cloned() {
            self.state.notice = Some(Notice::info(format!("Queued: {}", track.title)));
            self.state.queue.push(track);
        }
    }

    /// Start playing a track: record the play, kick off the lyrics
    /// fetch, and resolve the stream URL at the configured tier. The
    /// actual mpv load happens when StreamReady comes back.
    fn play_track(&mut self, track: crate::catalog::models::Track, tx: &Tx) {
        self.state.playing = Some(track.clone());
        self.state.stream_url = None;
        self.state.status = format!("Resolving: {}", track.title);

        tasks::record_play(self.cfg.db_path(), track.clone(), tx.clone());
        self.request_lyrics(&track, tx);
        tasks::resolve_stream(
            self.catalog.clone(),
            track,
            self.cfg.quality_tier(),
            tx.clone(),
        );
    }

    fn request_lyrics(&mut self, track: &crate::catalog::models::Track, tx: &Tx) {
        // Replaying the same track keeps the lyrics we already have.
        if self.state.lyrics_for.as_deref() == Some(track.id.as_str()) {
            return;
        }
        self.state.lyrics = None;
        self.state.lyrics_pending = true;
        self.state.lyrics_for = Some(track.id.clone());
        tasks::fetch_lyrics(self.lrclib.clone(), self.cfg.db_path(), track.clone(), tx.clone());
    }

    async fn nudge_volume(&mut self, delta: i16) {
        self.state.volume = (self.state.volume as i16 + delta).clamp(0, 100) as u8;
        if let Some(p) = &self.player {
            let _ = p.set_volume(self.state.volume).await;
        }
    }

    fn on_player(&mut self, ev: PlayerEvent, tx: &Tx) {
        match ev {
            PlayerEvent::Playing => self.state.paused = false,
            PlayerEvent::Paused => self.state.paused = true,
            PlayerEvent::Position(p) => self.state.elapsed = p,
            PlayerEvent::Duration(d) => self.state.runtime = d,
            PlayerEvent::Finished => self.on_finished(tx),
            PlayerEvent::Failed(e) => self.state.status = e,
        }
    }

    fn on_finished(&mut self, tx: &Tx) {
        self.state.elapsed = 0.0;
        self.state.runtime = 0.0;

        if self.state.repeat == Repeat::One
            && let Some(track) = self.state.playing.clone()
        {
            self.state.status = format!("Repeating: {}", track.title);
            self.play_track(track, tx);
            return;
        }

        if let Some(next) = self.state.queue.step_forward().cloned() {
            self.play_track(next, tx);
            return;
        }

        if self.state.repeat == Repeat::All
            && let Some(first) = self.state.queue.restart().cloned()
        {
            self.play_track(first, tx);
            return;
        }

        self.state.status = "Playback ended".into();
    }

    async fn on_task(&mut self, ev: TaskEvent, _tx: &Tx) {
        match ev {
            TaskEvent::Failed(e) => {
                self.state.history.busy = false;
                self.state.results.busy = false;
                self.state.results.busy_more = false;
                self.state.notice = Some(Notice::fail(e.clone()));
                self.state.status = format!("Error: {e}");
            }
            TaskEvent::SearchPage {
                query,
                tracks,
                next_page,
            } => {
                self.state.submitted = Some(query);
                self.state.results.put(tracks);
                self.state.results.next_page = next_page;
                self.state.status = format!("Results: {}", self.state.results.rows.len());
                if !self.state.results.rows.is_empty() {
                    self.state.search_focus = state::SearchFocus::List;
                }
            }
            TaskEvent::ExtraPage { tracks, next_page } => {
                let added = tracks.len();
                self.state.results.extend(tracks);
                self.state.results.next_page = next_page;
                self.state.status =
                    format!("Results: {} (+{added})", self.state.results.rows.len());
            }
            TaskEvent::RecentTracks(tracks) => {
                self.state.history.put(tracks);
                self.state.status = if self.state.history.rows.is_empty() {
                    "Nothing played yet".into()
                } else {
                    format!("History: {} tracks", self.state.history.rows.len())
                };
            }
            TaskEvent::Played(track) => {
                self.state.history.promote(track);
                self.refresh_db_size();
            }
            TaskEvent::StreamReady { track, url } => {
                let track = *track;
                // A resolve that lost the race against another play
                // request must not hijack the transport.
                if self.state.playing.as_ref().is_none_or(|t| t.id != track.id) {
                    return;
                }
                self.state.stream_quality = track
                    .downloads
                    .iter()
                    .find(|c| c.url == url)
                    .map(|c| c.quality.clone());
                self.state.playing = Some(track);
                match &self.player {
                    Some(p) => {
                        let _ = p.set_volume(self.state.volume).await;
                        match p.load(&url).await {
                            Ok(()) => {
                                self.state.stream_url = Some(url);
                                self.state.status = "Playing".into();
                            }
                            Err(e) => self.state.status = format!("mpv load failed: {e:#}"),
                        }
                    }
                    None => self.state.status = "mpv not available".into(),
                }
            }
            TaskEvent::Devices(names) => {
                self.state.devices_ready = true;
                self.state.device_cursor = self
                    .state
                    .device_cursor
                    .min(names.len().saturating_sub(1));
                self.state.devices = names;
            }
            TaskEvent::LyricsReady { track_id, lyrics } => {
                if self.state.lyrics_for.as_deref() == Some(track_id.as_str()) {
                    let offset = self.cfg.player.lyrics_offset_ms;
                    self.state.lyrics = Some(if offset != 0 && lyrics.synced {
                        lyrics.with_offset(offset)
                    } else {
                        lyrics
                    });
                    self.state.lyrics_pending = false;
                }
            }
            TaskEvent::LyricsMissing { track_id } => {
                if self.state.lyrics_for.as_deref() == Some(track_id.as_str()) {
                    self.state.lyrics = None;
                    self.state.lyrics_pending = false;
                }
            }
        }
    }

    async fn apply_selection(&mut self, tx: &Tx) {
        match self.state.section {
            SettingsSection::Quality => self.set_quality(tx),
            SettingsSection::Output => self.apply_device(tx).await,
            SettingsSection::Storage => self.wipe_cache(),
        }
    }

    fn set_quality(&mut self, tx: &Tx) {
        let tier = QualityTier::ALL[self.state.tier_cursor.min(QualityTier::ALL.len() - 1)];
        self.cfg.player.quality = tier.key().into();
        if let Err(e) = self.cfg.store(&self.cfg_path) {
            self.state.notice = Some(Notice::fail(format!("config save failed: {e:#}")));
            return;
        }
        self.state.notice = Some(Notice::info(format!("Quality: {}", tier.label())));

        // Re-resolve whatever is playing at the new tier.
        if let Some(track) = self.state.playing.clone() {
            self.state.status = "Switching quality…".into();
            tasks::resolve_stream(self.catalog.clone(), track, tier, tx.clone());
        }
    }

    async fn apply_device(&mut self, tx: &Tx) {
        let Some(name) = self.state.devices.get(self.state.device_cursor).cloned() else {
            self.state.notice = Some(Notice::fail("No audio devices listed"));
            return;
        };

        self.cfg.player.audio_device = (name != "auto").then_some(name.clone());
        if let Err(e) = self.cfg.store(&self.cfg_path) {
            self.state.notice = Some(Notice::fail(format!("config save failed: {e:#}")));
        }

        // The device is fixed at spawn time, so swap the process and
        // reload whatever was playing.
        self.state.status = format!("Switching output to {name}");
        self.player = None;
        self.start_player(tx).await;
        if let Some(p) = &self.player {
            let _ = p.set_volume(self.state.volume).await;
            if let Some(url) = self.state.stream_url.clone() {
                let _ = p.load(&url).await;
            }
            self.state.status = "Audio output applied".into();
        }
    }

    fn wipe_cache(&mut self) {
        let db = self.cfg.db_path();
        if let Err(e) = std::fs::remove_file(&db)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            self.state.notice = Some(Notice::fail(format!("wipe failed: {e}")));
            return;
        }
        if let Err(e) = Store::open(&db) {
            self.state.notice = Some(Notice::fail(format!("recreate failed: {e:#}")));
        }

        self.state.history.reset();
        self.state.results.reset();
        self.state.submitted = None;
        self.state.lyrics = None;
        self.state.lyrics_for = None;
        self.refresh_db_size();
        self.state.notice = Some(Notice::info("Cache cleared"));
    }

    fn refresh_db_size(&mut self) {
        self.state.db_bytes = std::fs::metadata(self.cfg.db_path())
            .map(|m| m.len())
            .unwrap_or(0);
    }
}

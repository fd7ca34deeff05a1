//! Background work. Every network or disk touch runs in its own tokio
//! task and reports back through the event channel; the main loop never
//! blocks on IO.

use crate::app::events::{Event, TaskEvent};
use crate::catalog::models::Track;
use crate::catalog::{self, CatalogClient, QualityTier};
use crate::lyrics::{self, LrclibClient};
use crate::storage::Store;
use anyhow::Context;
use std::path::PathBuf;
use tokio::sync::mpsc;

type Tx = mpsc::Sender<Event>;

async fn report(tx: &Tx, ev: TaskEvent) {
    let _ = tx.send(Event::Task(ev)).await;
}

/// Run a rusqlite operation off the async threads, flattening the join
/// error into the result.
async fn blocking<T: Send + 'static>(
    work: impl FnOnce() -> anyhow::Result<T> + Send + 'static,
) -> anyhow::Result<T> {
    tokio::task::spawn_blocking(work).await.context("blocking task")?
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// First page of a catalog search, served from the search cache when
/// the same query was run before.
pub fn search(catalog: CatalogClient, db: PathBuf, query: String, tx: Tx) {
    tokio::spawn(async move {
        let cached = {
            let db = db.clone();
            let q = query.clone();
            blocking(move || Store::open(&db)?.load_search(&q)).await
        };
        if let Ok(Some((raw, _at))) = cached
            && let Ok(tracks) = serde_json::from_str::<Vec<Track>>(&raw)
        {
            report(
                &tx,
                TaskEvent::SearchPage {
                    query,
                    tracks,
                    next_page: None,
                },
            )
            .await;
            return;
        }

        match catalog.search_tracks(&query, 1).await {
            Ok(page) => {
                if let Ok(raw) = serde_json::to_string(&page.tracks) {
                    let db = db.clone();
                    let q = query.clone();
                    let _ = blocking(move || Store::open(&db)?.save_search(&q, &raw, now_unix()))
                        .await;
                }
                report(
                    &tx,
                    TaskEvent::SearchPage {
                        query,
                        tracks: page.tracks,
                        next_page: page.next_page,
                    },
                )
                .await;
            }
            Err(e) => report(&tx, TaskEvent::Failed(format!("{e:#}"))).await,
        }
    });
}

pub fn search_more(catalog: CatalogClient, query: String, page: u32, tx: Tx) {
    tokio::spawn(async move {
        match catalog.search_tracks(&query, page).await {
            Ok(more) => {
                report(
                    &tx,
                    TaskEvent::ExtraPage {
                        tracks: more.tracks,
                        next_page: more.next_page,
                    },
                )
                .await;
            }
            Err(e) => report(&tx, TaskEvent::Failed(format!("next page: {e:#}"))).await,
        }
    });
}

pub fn load_history(db: PathBuf, tx: Tx) {
    tokio::spawn(async move {
        match blocking(move || Store::open(&db)?.recent(100)).await {
            Ok(tracks) => report(&tx, TaskEvent::RecentTracks(tracks)).await,
            Err(e) => report(&tx, TaskEvent::Failed(format!("{e:#}"))).await,
        }
    });
}

pub fn record_play(db: PathBuf, track: Track, tx: Tx) {
    tokio::spawn(async move {
        let written = {
            let t = track.clone();
            blocking(move || Store::open(&db)?.record_play(&t, now_unix())).await
        };
        match written {
            Ok(()) => report(&tx, TaskEvent::Played(track)).await,
            Err(e) => tracing::warn!("history write failed: {e:#}"),
        }
    });
}

/// Pick the stream URL for `track` at `tier`. Tracks that came out of
/// the history table before candidates were stored get refreshed from
/// the catalog first.
pub fn resolve_stream(catalog: CatalogClient, track: Track, tier: QualityTier, tx: Tx) {
    tokio::spawn(async move {
        let track = if track.downloads.is_empty() {
            match catalog.track(&track.id).await {
                Ok(Some(fresh)) => fresh,
                Ok(None) => {
                    report(
                        &tx,
                        TaskEvent::Failed(format!("not in catalog: {}", track.title)),
                    )
                    .await;
                    return;
                }
                Err(e) => {
                    report(&tx, TaskEvent::Failed(format!("{e:#}"))).await;
                    return;
                }
            }
        } else {
            track
        };

        match catalog::select_url(&track.downloads, tier) {
            Some(url) => {
                let url = url.to_string();
                report(
                    &tx,
                    TaskEvent::StreamReady {
                        track: Box::new(track),
                        url,
                    },
                )
                .await;
            }
            None => {
                report(
                    &tx,
                    TaskEvent::Failed(format!("no stream candidates: {}", track.title)),
                )
                .await;
            }
        }
    });
}

/// Lyrics for a track: the local cache first, then LRCLIB. A miss or a
/// fetch failure both end as LyricsMissing; lyrics never block playback.
pub fn fetch_lyrics(client: LrclibClient, db: PathBuf, track: Track, tx: Tx) {
    tokio::spawn(async move {
        let track_id = track.id.clone();

        let cached = {
            let db = db.clone();
            let id = track_id.clone();
            blocking(move || Store::open(&db)?.load_lyrics(&id)).await
        };
        if let Ok(Some((body, synced))) = cached {
            let lyrics = lyrics::ParsedLyrics::parse(&body, synced);
            report(&tx, TaskEvent::LyricsReady { track_id, lyrics }).await;
            return;
        }

        let artist = track.artists.first().map(String::as_str).unwrap_or("");
        let found = lyrics::fetch_lyrics(
            &client,
            &track.title,
            artist,
            track.album.as_deref(),
            track.duration_seconds,
        )
        .await;

        match found {
            Ok(Some(lyrics)) => {
                let body = lyrics.to_lrc();
                let synced = lyrics.synced;
                let db = db.clone();
                let id = track_id.clone();
                let _ = blocking(move || Store::open(&db)?.save_lyrics(&id, &body, synced, now_unix()))
                    .await;
                report(&tx, TaskEvent::LyricsReady { track_id, lyrics }).await;
            }
            Ok(None) => report(&tx, TaskEvent::LyricsMissing { track_id }).await,
            Err(e) => {
                tracing::debug!("lyrics fetch failed: {e:#}");
                report(&tx, TaskEvent::LyricsMissing { track_id }).await;
            }
        }
    });
}

/// Ask mpv for its audio device list.
pub fn list_devices(tx: Tx) {
    tokio::spawn(async move {
        let out = tokio::process::Command::new("mpv")
            .args(["--audio-device=help", "--no-video", "--idle=no"])
            .output()
            .await;
        match out {
            Ok(out) => {
                let names = parse_devices(&String::from_utf8_lossy(&out.stdout));
                report(&tx, TaskEvent::Devices(names)).await;
            }
            Err(e) => report(&tx, TaskEvent::Failed(format!("device listing: {e}"))).await,
        }
    });
}

/// mpv prints one device per line as `'name' (description)`.
fn parse_devices(help: &str) -> Vec<String> {
    let mut names: Vec<String> = help
        .lines()
        .filter_map(|line| {
            let line = line.trim().strip_prefix('\'')?;
            let end = line.find('\'')?;
            Some(line[..end].to_string())
        })
        .collect();
    if names.is_empty() {
        names.push("auto".into());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::parse_devices;

    #[test]
    fn test_parse_devices() {
        let help = "List of detected audio devices:\n\
                    'auto' (Autoselect device)\n\
                    'pipewire' (Default (pipewire))\n\
                    'alsa/hw:0,0' (HDA Intel)\n";
        assert_eq!(parse_devices(help), ["auto", "pipewire", "alsa/hw:0,0"]);
    }

    #[test]
    fn test_parse_devices_empty_falls_back_to_auto() {
        assert_eq!(parse_devices(""), ["auto"]);
        assert_eq!(parse_devices("garbage without quotes"), ["auto"]);
    }
}

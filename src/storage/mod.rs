//! SQLite persistence: play history, search results, fetched lyrics.
//!
//! Connections are cheap to open, so async callers open a fresh
//! [`Store`] inside `spawn_blocking` per operation instead of sharing a
//! connection across tasks.

use crate::catalog::models::{MediaCandidate, Track};
use anyhow::Context;
use rusqlite::{Connection, Row, params};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS plays (
  track_id   TEXT PRIMARY KEY,
  title      TEXT NOT NULL,
  artists    TEXT NOT NULL,
  album      TEXT,
  duration   INTEGER,
  downloads  TEXT NOT NULL DEFAULT '[]',
  played_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS plays_recency ON plays(played_at DESC);

CREATE TABLE IF NOT EXISTS searches (
  query      TEXT PRIMARY KEY,
  results    TEXT NOT NULL,
  stored_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS lyrics (
  track_id   TEXT PRIMARY KEY,
  body       TEXT NOT NULL,
  synced     INTEGER NOT NULL,
  stored_at  INTEGER NOT NULL
);
";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create dir {}", dir.display()))?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        conn.execute_batch(SCHEMA).context("apply schema")?;
        Ok(Self { conn })
    }

    /// Record a play. One row per track; replaying only refreshes the
    /// timestamp, so the history stays deduplicated at write time.
    pub fn record_play(&self, track: &Track, at: i64) -> anyhow::Result<()> {
        let artists = serde_json::to_string(&track.artists).context("encode artists")?;
        let downloads = serde_json::to_string(&track.downloads).context("encode downloads")?;
        self.conn
            .execute(
                "INSERT INTO plays (track_id, title, artists, album, duration, downloads, played_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
                 ON CONFLICT(track_id) DO UPDATE SET \
                   title = excluded.title, artists = excluded.artists, \
                   album = excluded.album, duration = excluded.duration, \
                   downloads = excluded.downloads, played_at = excluded.played_at",
                params![
                    track.id,
                    track.title,
                    artists,
                    track.album,
                    track.duration_seconds,
                    downloads,
                    at
                ],
            )
            .context("record play")?;
        Ok(())
    }

    /// Most recently played tracks, newest first.
    pub fn recent(&self, limit: usize) -> anyhow::Result<Vec<Track>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT track_id, title, artists, album, duration, downloads \
                 FROM plays ORDER BY played_at DESC LIMIT ?1",
            )
            .context("prepare recent")?;
        let rows = stmt
            .query_map(params![limit as i64], track_row)
            .context("query recent")?;
        Ok(rows.filter_map(Result::ok).collect())
    }

    pub fn save_search(&self, query: &str, results: &str, at: i64) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO searches (query, results, stored_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(query) DO UPDATE SET \
                   results = excluded.results, stored_at = excluded.stored_at",
                params![query, results, at],
            )
            .context("save search")?;
        Ok(())
    }

    pub fn load_search(&self, query: &str) -> anyhow::Result<Option<(String, i64)>> {
        self.conn
            .query_row(
                "SELECT results, stored_at FROM searches WHERE query = ?1",
                params![query],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map(Some)
            .or_else(none_when_missing)
            .context("load search")
    }

    pub fn save_lyrics(
        &self,
        track_id: &str,
        body: &str,
        synced: bool,
        at: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                "INSERT INTO lyrics (track_id, body, synced, stored_at) VALUES (?1, ?2, ?3, ?4) \
                 ON CONFLICT(track_id) DO UPDATE SET \
                   body = excluded.body, synced = excluded.synced, stored_at = excluded.stored_at",
                params![track_id, body, synced as i64, at],
            )
            .context("save lyrics")?;
        Ok(())
    }

    pub fn load_lyrics(&self, track_id: &str) -> anyhow::Result<Option<(String, bool)>> {
        self.conn
            .query_row(
                "SELECT body, synced FROM lyrics WHERE track_id = ?1",
                params![track_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? != 0)),
            )
            .map(Some)
            .or_else(none_when_missing)
            .context("load lyrics")
    }
}

fn none_when_missing<T>(err: rusqlite::Error) -> Result<Option<T>, rusqlite::Error> {
    match err {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other),
    }
}

fn track_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    let artists: String = row.get(2)?;
    let downloads: String = row.get(5)?;
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        // Rows written by older builds may carry malformed JSON; treat
        // those fields as empty rather than dropping the track.
        artists: serde_json::from_str(&artists).unwrap_or_default(),
        album: row.get(3)?,
        duration_seconds: row.get(4)?,
        downloads: serde_json::from_str::<Vec<MediaCandidate>>(&downloads).unwrap_or_default(),
    })
}

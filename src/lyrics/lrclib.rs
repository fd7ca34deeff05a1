//! LRCLIB client. A free lyrics API serving LRC-format synchronized
//! lyrics; documentation at https://lrclib.net/docs.

use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

/// One lyrics record as LRCLIB returns it. Either field may be absent
/// or empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsDoc {
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LrclibClient {
    http: reqwest::Client,
    base: String,
}

impl LrclibClient {
    const BASE: &'static str = "https://lrclib.net/api";
    const AGENT: &'static str = "ripple/0.1.0 (https://github.com/ripple)";

    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(Self::AGENT)
                .timeout(Duration::from_secs(10))
                .build()
                .expect("build reqwest client"),
            base: Self::BASE.to_string(),
        }
    }

    /// Exact signature lookup first, then a free-text search. A miss on
    /// both is Ok(None), not an error.
    pub async fn lookup(
        &self,
        title: &str,
        artist: &str,
        album: Option<&str>,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<LyricsDoc>> {
        if let Some(doc) = self.exact(title, artist, album, duration_secs).await? {
            return Ok(Some(doc));
        }
        self.search(title, artist).await
    }

    async fn exact(
        &self,
        title: &str,
        artist: &str,
        album: Option<&str>,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<LyricsDoc>> {
        let mut url = format!(
            "{}/get?track_name={}&artist_name={}",
            self.base,
            urlencoding::encode(title),
            urlencoding::encode(artist)
        );
        if let Some(album) = album {
            url.push_str(&format!("&album_name={}", urlencoding::encode(album)));
        }
        if let Some(secs) = duration_secs {
            url.push_str(&format!("&duration={secs}"));
        }

        let resp = self.http.get(&url).send().await.context("lrclib get")?;
        let status = resp.status();
        if status.is_success() {
            Ok(Some(resp.json().await.context("lrclib get payload")?))
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("lrclib get: {status}")
        }
    }

    async fn search(&self, title: &str, artist: &str) -> anyhow::Result<Option<LyricsDoc>> {
        let url = format!(
            "{}/search?q={}",
            self.base,
            urlencoding::encode(&format!("{title} {artist}"))
        );

        let resp = self.http.get(&url).send().await.context("lrclib search")?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("lrclib search: {status}");
        }

        let mut hits: Vec<LyricsDoc> = resp.json().await.context("lrclib search payload")?;
        if hits.is_empty() {
            return Ok(None);
        }
        // A hit with synced lyrics beats the first plain one.
        let pick = hits
            .iter()
            .position(|d| d.synced_lyrics.is_some())
            .unwrap_or(0);
        Ok(Some(hits.swap_remove(pick)))
    }
}

impl Default for LrclibClient {
    fn default() -> Self {
        Self::new()
    }
}

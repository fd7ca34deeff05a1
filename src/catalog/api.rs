//! Catalog API client
//!
//! Typed client for a JioSaavn-style catalog API: paginated song
//! search, album browsing, and single-track lookup. Every track comes
//! with its `downloadUrl` candidates, ordered ascending by bitrate.

use crate::catalog::models::{MediaCandidate, Track};
use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://saavn.dev/api";

const PAGE_SIZE: u32 = 20;

/// One page of search results
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub tracks: Vec<Track>,
    /// Page number to request next, when more results exist
    pub next_page: Option<u32>,
}

/// Catalog API client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    const USER_AGENT: &'static str = "ripple/0.1.0 (https://github.com/ripple)";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("failed to create reqwest client"),
            base_url: base_url.into(),
        }
    }

    /// Search songs, one page at a time. Pages start at 1.
    pub async fn search_tracks(&self, query: &str, page: u32) -> anyhow::Result<SearchResult> {
        let url = format!(
            "{}/search/songs?query={}&page={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            page,
            PAGE_SIZE
        );

        let envelope: Envelope<SearchData> = self
            .client
            .get(&url)
            .send()
            .await
            .context("send search request")?
            .error_for_status()
            .context("search http status")?
            .json()
            .await
            .context("parse search json")?;

        let data = envelope.into_data().context("search rejected by api")?;
        let tracks: Vec<Track> = data.results.into_iter().map(Track::from).collect();
        let next_page = next_page_number(data.start, tracks.len() as u32, data.total, page);

        Ok(SearchResult { tracks, next_page })
    }

    /// Fetch an album with its track list.
    pub async fn album_tracks(&self, album_id: &str) -> anyhow::Result<(String, Vec<Track>)> {
        let url = format!(
            "{}/albums?id={}",
            self.base_url,
            urlencoding::encode(album_id)
        );

        let envelope: Envelope<AlbumData> = self
            .client
            .get(&url)
            .send()
            .await
            .context("send album request")?
            .error_for_status()
            .context("album http status")?
            .json()
            .await
            .context("parse album json")?;

        let data = envelope.into_data().context("album rejected by api")?;
        let tracks = data.songs.into_iter().map(Track::from).collect();
        Ok((data.name, tracks))
    }

    /// Fetch a single track, mainly to refresh its download candidates
    /// when a history entry was stored without them.
    pub async fn track(&self, track_id: &str) -> anyhow::Result<Option<Track>> {
        let url = format!(
            "{}/songs/{}",
            self.base_url,
            urlencoding::encode(track_id)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("send track request")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let envelope: Envelope<Vec<ApiSong>> = response
            .error_for_status()
            .context("track http status")?
            .json()
            .await
            .context("parse track json")?;

        let songs = envelope.into_data().unwrap_or_default();
        Ok(songs.into_iter().next().map(Track::from))
    }
}

fn next_page_number(start: u32, count: u32, total: u32, page: u32) -> Option<u32> {
    if count == 0 || start.saturating_add(count) >= total {
        None
    } else {
        Some(page + 1)
    }
}

// Wire types. The API speaks camelCase and wraps every payload in a
// success envelope.

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    total: u32,
    #[serde(default)]
    start: u32,
    #[serde(default)]
    results: Vec<ApiSong>,
}

#[derive(Debug, Deserialize)]
struct AlbumData {
    name: String,
    #[serde(default)]
    songs: Vec<ApiSong>,
}

#[derive(Debug, Deserialize)]
struct ApiSong {
    id: String,
    name: String,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    album: Option<ApiAlbumRef>,
    #[serde(default)]
    artists: ApiArtists,
    #[serde(rename = "downloadUrl", default)]
    download_url: Vec<ApiDownload>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiArtists {
    #[serde(default)]
    primary: Vec<ApiArtist>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbumRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDownload {
    quality: String,
    url: String,
}

impl From<ApiSong> for Track {
    fn from(s: ApiSong) -> Self {
        Track {
            id: s.id,
            title: s.name,
            artists: s.artists.primary.into_iter().map(|a| a.name).collect(),
            album: s.album.and_then(|a| a.name),
            duration_seconds: s.duration,
            downloads: s
                .download_url
                .into_iter()
                .map(|d| MediaCandidate {
                    quality: d.quality,
                    url: d.url,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_conversion() {
        let raw = r#"{
            "success": true,
            "data": {
                "total": 45,
                "start": 1,
                "results": [{
                    "id": "abc123",
                    "name": "Some Song",
                    "duration": 215,
                    "album": {"name": "Some Album"},
                    "artists": {"primary": [{"name": "Artist A"}, {"name": "Artist B"}]},
                    "downloadUrl": [
                        {"quality": "48kbps", "url": "http://cdn/48"},
                        {"quality": "320kbps", "url": "http://cdn/320"}
                    ]
                }]
            }
        }"#;

        let envelope: Envelope<SearchData> = serde_json::from_str(raw).unwrap();
        let data = envelope.into_data().unwrap();
        assert_eq!(data.total, 45);

        let track = Track::from(data.results.into_iter().next().unwrap());
        assert_eq!(track.id, "abc123");
        assert_eq!(track.artists, vec!["Artist A", "Artist B"]);
        assert_eq!(track.album.as_deref(), Some("Some Album"));
        assert_eq!(track.downloads.len(), 2);
        assert_eq!(track.downloads[1].quality, "320kbps");
    }

    #[test]
    fn test_failed_envelope_carries_no_data() {
        let raw = r#"{"success": false, "data": null}"#;
        let envelope: Envelope<SearchData> = serde_json::from_str(raw).unwrap();
        assert!(envelope.into_data().is_none());
    }

    #[test]
    fn test_next_page_number() {
        assert_eq!(next_page_number(1, 20, 45, 1), Some(2));
        assert_eq!(next_page_number(41, 5, 45, 3), None);
        assert_eq!(next_page_number(0, 0, 45, 1), None);
        assert_eq!(next_page_number(0, 20, 20, 1), None);
    }
}

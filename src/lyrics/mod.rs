//! Lyrics: LRCLIB fetching plus LRC parsing and playback sync.

pub mod lrclib;
pub mod parser;

pub use lrclib::LrclibClient;
pub use parser::{LyricLine, ParsedLyrics, is_synced};

/// Fetch and parse lyrics for a track.
///
/// The synced field wins when present. Providers sometimes ship LRC
/// tagged text in the plain field, so the fallback runs format
/// detection instead of trusting the label.
pub async fn fetch_lyrics(
    client: &LrclibClient,
    title: &str,
    artist: &str,
    album: Option<&str>,
    duration_secs: Option<u32>,
) -> anyhow::Result<Option<ParsedLyrics>> {
    let Some(doc) = client.lookup(title, artist, album, duration_secs).await? else {
        return Ok(None);
    };

    if let Some(synced) = doc.synced_lyrics.as_deref().filter(|s| !s.is_empty()) {
        return Ok(Some(ParsedLyrics::parse(synced, true)));
    }
    if let Some(plain) = doc.plain_lyrics.as_deref().filter(|s| !s.is_empty()) {
        return Ok(Some(ParsedLyrics::parse(plain, is_synced(plain))));
    }
    Ok(None)
}

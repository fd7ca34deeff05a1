use serde::{Deserialize, Serialize};

/// One downloadable rendition of a track.
///
/// The catalog lists candidates ascending by bitrate, so the last entry
/// is the highest quality available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCandidate {
    pub quality: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub downloads: Vec<MediaCandidate>,
}

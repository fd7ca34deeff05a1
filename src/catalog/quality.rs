//! Audio quality tiers and stream URL selection

use crate::catalog::models::MediaCandidate;

/// User-facing audio quality preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityTier {
    Lowest,
    Low,
    Medium,
    High,
    #[default]
    Auto,
}

impl QualityTier {
    /// Display order for the settings list.
    pub const ALL: [QualityTier; 5] = [
        QualityTier::Auto,
        QualityTier::Lowest,
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
    ];

    /// Bitrate substring matched against candidate quality tags.
    /// Auto matches nothing and takes the best available.
    fn token(self) -> Option<&'static str> {
        match self {
            QualityTier::Lowest => Some("12kbps"),
            QualityTier::Low => Some("48kbps"),
            QualityTier::Medium => Some("160kbps"),
            QualityTier::High => Some("320kbps"),
            QualityTier::Auto => None,
        }
    }

    /// Stable key used in the config file.
    pub fn key(self) -> &'static str {
        match self {
            QualityTier::Lowest => "lowest",
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
            QualityTier::Auto => "auto",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "lowest" => Some(Self::Lowest),
            "low" => Some(Self::Low),
            "medium" | "mid" => Some(Self::Medium),
            "high" => Some(Self::High),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Lowest => "Lowest (12 kbps)",
            QualityTier::Low => "Low (48 kbps)",
            QualityTier::Medium => "Medium (160 kbps)",
            QualityTier::High => "High (320 kbps)",
            QualityTier::Auto => "Auto (best available)",
        }
    }
}

/// Pick the stream URL for the requested tier.
///
/// The first candidate whose quality tag contains the tier's bitrate
/// token (case-insensitive) wins. No match, or the Auto tier, resolves
/// to the last candidate, which the catalog orders as the highest
/// bitrate. Returns None only for an empty candidate list, so a missing
/// quality degrades to best-available instead of blocking playback.
pub fn select_url(candidates: &[MediaCandidate], tier: QualityTier) -> Option<&str> {
    let last = candidates.last()?;

    let Some(token) = tier.token() else {
        return Some(&last.url);
    };

    candidates
        .iter()
        .find(|c| c.quality.to_ascii_lowercase().contains(token))
        .map(|c| c.url.as_str())
        .or(Some(&last.url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<MediaCandidate> {
        vec![
            MediaCandidate {
                quality: "48kbps".into(),
                url: "http://cdn/a".into(),
            },
            MediaCandidate {
                quality: "160kbps".into(),
                url: "http://cdn/b".into(),
            },
            MediaCandidate {
                quality: "320kbps".into(),
                url: "http://cdn/c".into(),
            },
        ]
    }

    #[test]
    fn test_select_matching_tier() {
        let c = candidates();
        assert_eq!(select_url(&c, QualityTier::Low), Some("http://cdn/a"));
        assert_eq!(select_url(&c, QualityTier::Medium), Some("http://cdn/b"));
        assert_eq!(select_url(&c, QualityTier::High), Some("http://cdn/c"));
    }

    #[test]
    fn test_auto_takes_last() {
        assert_eq!(
            select_url(&candidates(), QualityTier::Auto),
            Some("http://cdn/c")
        );
    }

    #[test]
    fn test_unmatched_tier_falls_back_to_last() {
        // No 12kbps rendition in the list.
        assert_eq!(
            select_url(&candidates(), QualityTier::Lowest),
            Some("http://cdn/c")
        );
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let c = vec![MediaCandidate {
            quality: "320KBPS".into(),
            url: "http://cdn/x".into(),
        }];
        assert_eq!(select_url(&c, QualityTier::High), Some("http://cdn/x"));
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(select_url(&[], QualityTier::Auto), None);
        assert_eq!(select_url(&[], QualityTier::High), None);
    }

    #[test]
    fn test_keys_round_trip() {
        for tier in QualityTier::ALL {
            assert_eq!(QualityTier::from_key(tier.key()), Some(tier));
        }
        assert_eq!(QualityTier::from_key("ultra"), None);
    }
}

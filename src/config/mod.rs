use crate::catalog::QualityTier;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub api: ApiConfig,
    pub player: PlayerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: String,
    pub mouse: bool,
    /// Screen to restore on the next launch.
    pub last_screen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the catalog API.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv output device name (see `mpv --audio-device=help`); None
    /// leaves the choice to mpv.
    pub audio_device: Option<String>,
    /// Volume, 0-100.
    pub volume: u8,
    /// Preferred stream quality key: auto, lowest, low, medium, high.
    pub quality: String,
    /// Shifts lyric timing; positive makes lines appear later.
    pub lyrics_offset_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "mono".into(),
            mouse: true,
            last_screen: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: crate::catalog::api::DEFAULT_BASE_URL.into(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_device: None,
            volume: 80,
            quality: QualityTier::Auto.key().into(),
            lyrics_offset_ms: 0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("dev", "ripple", "ripple")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("ripple"));
        Self { data_dir }
    }
}

impl Config {
    /// The configured tier. An unrecognized key plays the best
    /// available stream instead of refusing to start.
    pub fn quality_tier(&self) -> QualityTier {
        QualityTier::from_key(&self.player.quality).unwrap_or_default()
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage.data_dir.join("ripple.sqlite3")
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "ripple", "ripple").context("no home directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Read the config, writing one with defaults on first run.
    pub fn load_or_init(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let cfg = Self::default();
            cfg.store(path)?;
            return Ok(cfg);
        }
        let raw =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))
    }

    pub fn store(&self, path: &Path) -> anyhow::Result<()> {
        let raw = toml::to_string_pretty(self).context("serialize config")?;
        write_private(path, &raw)
    }
}

/// Write with owner-only permissions; the config can name local devices
/// and a private API endpoint.
fn write_private(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    }
    fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

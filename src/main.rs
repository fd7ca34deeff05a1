mod app;
mod catalog;
mod config;
mod input;
mod lyrics;
mod player;
mod queue;
mod storage;
mod tui;

use anyhow::Context;
use catalog::{CatalogClient, QualityTier};
use clap::{Parser, Subcommand};
use config::Config;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "ripple", version, about = "Terminal music streaming client")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Search the catalog and print matches (headless).
    Search { query: String },
    /// Print an album's track list (headless).
    Album { album_id: String },
    /// Print the stream URL for a track at a quality tier.
    Resolve {
        track_id: String,
        /// auto, lowest, low, medium or high; defaults to the
        /// configured preference.
        #[arg(long)]
        quality: Option<String>,
    },
    /// Fetch lyrics for a track and print them (headless).
    Lyrics { title: String, artist: String },
    /// Show or set the preferred stream quality.
    Quality {
        /// Omit to print the current setting.
        tier: Option<String>,
    },
    /// Audio output device management (mpv).
    Audio {
        #[command(subcommand)]
        cmd: AudioCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AudioCommand {
    /// List mpv audio devices.
    List,
    /// Pin the audio device (name as shown by list).
    Set { device: String },
    /// Let mpv pick the device again.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg_path = match &cli.config {
        Some(p) => p.clone(),
        None => Config::default_path()?,
    };
    let cfg = Config::load_or_init(&cfg_path).context("load config")?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(cfg, cfg_path).await,
        Command::Search { query } => run_search(&cfg, &query).await,
        Command::Album { album_id } => run_album(&cfg, &album_id).await,
        Command::Resolve { track_id, quality } => {
            run_resolve(&cfg, &track_id, quality.as_deref()).await
        }
        Command::Lyrics { title, artist } => run_lyrics(&title, &artist).await,
        Command::Quality { tier } => set_quality(cfg, &cfg_path, tier.as_deref()),
        Command::Audio { cmd } => audio_command(cfg, &cfg_path, cmd).await,
    }
}

async fn run_tui(cfg: Config, cfg_path: PathBuf) -> anyhow::Result<()> {
    let mut terminal = tui::TerminalGuard::enter(cfg.ui.mouse).context("take over terminal")?;
    let mut app = app::App::new(cfg, cfg_path)?;
    app.run(terminal.terminal_mut()).await
}

async fn run_search(cfg: &Config, query: &str) -> anyhow::Result<()> {
    let client = CatalogClient::new(cfg.api.base_url.clone());
    let page = client.search_tracks(query, 1).await?;
    print_tracks(&page.tracks);
    Ok(())
}

async fn run_album(cfg: &Config, album_id: &str) -> anyhow::Result<()> {
    let client = CatalogClient::new(cfg.api.base_url.clone());
    let (name, tracks) = client.album_tracks(album_id).await?;
    println!("Album: {name}");
    print_tracks(&tracks);
    Ok(())
}

async fn run_resolve(cfg: &Config, track_id: &str, quality: Option<&str>) -> anyhow::Result<()> {
    let tier = match quality {
        Some(key) => parse_tier(key)?,
        None => cfg.quality_tier(),
    };
    let client = CatalogClient::new(cfg.api.base_url.clone());
    let track = client
        .track(track_id)
        .await?
        .with_context(|| format!("track not found: {track_id}"))?;
    match catalog::select_url(&track.downloads, tier) {
        Some(url) => println!("{url}"),
        None => anyhow::bail!("no stream candidates for {}", track.title),
    }
    Ok(())
}

async fn run_lyrics(title: &str, artist: &str) -> anyhow::Result<()> {
    let client = lyrics::LrclibClient::new();
    match lyrics::fetch_lyrics(&client, title, artist, None, None).await? {
        Some(parsed) if parsed.synced => println!("{}", parsed.to_lrc()),
        Some(parsed) => {
            for line in &parsed.lines {
                println!("{}", line.text);
            }
        }
        None => println!("No lyrics found."),
    }
    Ok(())
}

fn set_quality(mut cfg: Config, path: &Path, tier: Option<&str>) -> anyhow::Result<()> {
    match tier {
        None => println!("Quality preference: {}", cfg.quality_tier().label()),
        Some(key) => {
            let tier = parse_tier(key)?;
            cfg.player.quality = tier.key().into();
            cfg.store(path).context("save config")?;
            println!("Quality preference set to {}.", tier.label());
        }
    }
    Ok(())
}

async fn audio_command(mut cfg: Config, path: &Path, cmd: AudioCommand) -> anyhow::Result<()> {
    match cmd {
        AudioCommand::List => {
            let out = tokio::process::Command::new("mpv")
                .args(["--audio-device=help", "--no-video", "--idle=no"])
                .output()
                .await
                .context("run mpv --audio-device=help")?;
            print!("{}", String::from_utf8_lossy(&out.stdout));
            eprint!("{}", String::from_utf8_lossy(&out.stderr));
        }
        AudioCommand::Set { device } => {
            cfg.player.audio_device = Some(device);
            cfg.store(path).context("save config")?;
            println!("Audio device saved.");
        }
        AudioCommand::Clear => {
            cfg.player.audio_device = None;
            cfg.store(path).context("save config")?;
            println!("Audio device cleared.");
        }
    }
    Ok(())
}

fn parse_tier(key: &str) -> anyhow::Result<QualityTier> {
    QualityTier::from_key(key)
        .with_context(|| format!("unknown quality tier {key:?} (auto, lowest, low, medium, high)"))
}

fn print_tracks(tracks: &[catalog::models::Track]) {
    for (i, t) in tracks.iter().enumerate() {
        let artists = if t.artists.is_empty() {
            String::new()
        } else {
            format!(" - {}", t.artists.join(", "))
        };
        println!("{:02}. {}{}  (id={})", i + 1, t.title, artists, t.id);
    }
}

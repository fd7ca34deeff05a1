//! Playback transport: an external mpv process driven over JSON IPC.
//!
//! Observed properties (time-pos, duration, pause) and end-file events
//! are translated into [`PlayerEvent`]s; the position stream doubles as
//! the clock the lyrics pane follows.

use crate::app::events::{Event, PlayerEvent};
use anyhow::Context;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, mpsc};

const OBSERVED: &[&str] = &["time-pos", "duration", "pause"];

pub struct MpvPlayer {
    proc: Child,
    sock: PathBuf,
    ipc: Mutex<OwnedWriteHalf>,
    next_req: AtomicU64,
}

impl MpvPlayer {
    pub async fn spawn(
        events: mpsc::Sender<Event>,
        device: Option<&str>,
        log: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let sock = std::env::temp_dir().join(format!("ripple-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&sock);

        let mut cmd = Command::new("mpv");
        cmd.arg("--no-video")
            .arg("--idle=yes")
            .arg("--input-terminal=no")
            .arg("--really-quiet")
            .arg(format!("--input-ipc-server={}", sock.display()));
        if let Some(d) = device {
            cmd.arg(format!("--audio-device={d}"));
        }
        if let Some(p) = log {
            cmd.arg(format!("--log-file={}", p.display()));
        }
        let proc = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("spawn mpv")?;

        let stream = await_socket(&sock).await?;
        let (read_half, write_half) = stream.into_split();
        tokio::spawn(pump_events(read_half, events));

        let player = Self {
            proc,
            sock,
            ipc: Mutex::new(write_half),
            next_req: AtomicU64::new(1),
        };

        // Warnings and errors come back as log-message events so load
        // failures can be shown in the UI.
        player.send(json!(["request_log_messages", "warn"])).await?;
        for (i, prop) in OBSERVED.iter().enumerate() {
            player.send(json!(["observe_property", i + 1, prop])).await?;
        }

        Ok(player)
    }

    pub async fn load(&self, url: &str) -> anyhow::Result<()> {
        self.send(json!(["loadfile", url, "replace"])).await
    }

    pub async fn toggle_pause(&self) -> anyhow::Result<()> {
        self.send(json!(["cycle", "pause"])).await
    }

    pub async fn seek(&self, secs: f64) -> anyhow::Result<()> {
        self.send(json!(["seek", secs, "relative"])).await
    }

    pub async fn set_volume(&self, volume: u8) -> anyhow::Result<()> {
        self.send(json!(["set_property", "volume", volume])).await
    }

    async fn send(&self, command: Value) -> anyhow::Result<()> {
        let id = self.next_req.fetch_add(1, Ordering::Relaxed);
        let mut line =
            serde_json::to_vec(&json!({"command": command, "request_id": id}))
                .context("encode mpv command")?;
        line.push(b'\n');

        let mut ipc = self.ipc.lock().await;
        ipc.write_all(&line).await.context("write mpv ipc")?;
        ipc.flush().await.context("flush mpv ipc")?;
        Ok(())
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        let _ = self.proc.start_kill();
        let _ = std::fs::remove_file(&self.sock);
    }
}

/// mpv creates the socket shortly after starting; poll until it accepts.
async fn await_socket(path: &Path) -> anyhow::Result<UnixStream> {
    let mut last = None;
    for _ in 0..100 {
        match UnixStream::connect(path).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last = Some(e),
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let err = last.map_or_else(|| anyhow::anyhow!("timed out"), anyhow::Error::from);
    Err(err.context(format!("connect to mpv ipc at {}", path.display())))
}

/// Everything mpv writes on the IPC stream, command replies and events
/// alike, in one permissive shape.
#[derive(Debug, Deserialize)]
struct IpcMessage {
    event: Option<String>,
    name: Option<String>,
    data: Option<Value>,
    reason: Option<String>,
    error: Option<String>,
    request_id: Option<u64>,
    level: Option<String>,
    text: Option<String>,
}

async fn pump_events(reader: OwnedReadHalf, events: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(msg) = serde_json::from_str::<IpcMessage>(&line) else {
            continue;
        };

        // Failed command replies surface as player errors.
        if msg.request_id.is_some()
            && let Some(err) = msg.error.as_deref()
            && err != "success"
            && events
                .send(Event::Player(PlayerEvent::Failed(format!("mpv: {err}"))))
                .await
                .is_err()
        {
            return;
        }

        if let Some(pe) = translate(&msg)
            && events.send(Event::Player(pe)).await.is_err()
        {
            return;
        }
    }
}

fn translate(msg: &IpcMessage) -> Option<PlayerEvent> {
    match msg.event.as_deref()? {
        "property-change" => {
            // A null data field means the property is unset (player
            // idle); emitting nothing beats a fake zero.
            let data = msg.data.as_ref()?;
            match msg.name.as_deref()? {
                "time-pos" => Some(PlayerEvent::Position(data.as_f64()?)),
                "duration" => Some(PlayerEvent::Duration(data.as_f64()?)),
                "pause" => Some(if data.as_bool()? {
                    PlayerEvent::Paused
                } else {
                    PlayerEvent::Playing
                }),
                _ => None,
            }
        }
        // Only a natural end advances the queue; stop/replace fire the
        // same event when a new URL is loaded and must not.
        "end-file" => match msg.reason.as_deref() {
            Some("eof") => Some(PlayerEvent::Finished),
            Some("error") => Some(PlayerEvent::Failed(format!(
                "playback failed: {}",
                msg.error.as_deref().unwrap_or("unknown")
            ))),
            _ => None,
        },
        "log-message" => {
            let level = msg.level.as_deref()?;
            let text = msg.text.as_deref()?.trim();
            if matches!(level, "warn" | "error") && !text.is_empty() {
                Some(PlayerEvent::Failed(format!("mpv {level}: {text}")))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Option<PlayerEvent> {
        translate(&serde_json::from_str::<IpcMessage>(raw).unwrap())
    }

    #[test]
    fn test_position_and_duration_events() {
        assert!(matches!(
            parse(r#"{"event":"property-change","name":"time-pos","data":12.5}"#),
            Some(PlayerEvent::Position(p)) if p == 12.5
        ));
        assert!(matches!(
            parse(r#"{"event":"property-change","name":"duration","data":240.0}"#),
            Some(PlayerEvent::Duration(d)) if d == 240.0
        ));
        // Unset property while idle: no event.
        assert!(parse(r#"{"event":"property-change","name":"time-pos","data":null}"#).is_none());
    }

    #[test]
    fn test_pause_toggling() {
        assert!(matches!(
            parse(r#"{"event":"property-change","name":"pause","data":true}"#),
            Some(PlayerEvent::Paused)
        ));
        assert!(matches!(
            parse(r#"{"event":"property-change","name":"pause","data":false}"#),
            Some(PlayerEvent::Playing)
        ));
    }

    #[test]
    fn test_end_file_reasons() {
        assert!(matches!(
            parse(r#"{"event":"end-file","reason":"eof"}"#),
            Some(PlayerEvent::Finished)
        ));
        assert!(matches!(
            parse(r#"{"event":"end-file","reason":"error","error":"no stream"}"#),
            Some(PlayerEvent::Failed(_))
        ));
        // Loading a replacement URL is not a track ending.
        assert!(parse(r#"{"event":"end-file","reason":"stop"}"#).is_none());
    }

    #[test]
    fn test_log_messages_below_warn_are_dropped() {
        assert!(parse(r#"{"event":"log-message","level":"info","text":"hi"}"#).is_none());
        assert!(matches!(
            parse(r#"{"event":"log-message","level":"error","text":"boom"}"#),
            Some(PlayerEvent::Failed(_))
        ));
    }
}

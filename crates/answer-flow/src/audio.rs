//! On-disk store for synthesized speech chunks

use crate::{FlowError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;

const AUDIO_EXT: &str = "mp3";

/// URL path under which stored audio is served
pub const AUDIO_ROUTE: &str = "/static/audio";

#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one chunk as `<uuid>.mp3` and return its public URL.
    pub async fn save(&self, audio: &[u8], base_url: &str) -> Result<String> {
        fs::create_dir_all(&self.dir).await?;
        let name = format!("{}.{AUDIO_EXT}", uuid::Uuid::new_v4());
        let path = self.dir.join(&name);
        fs::write(&path, audio).await?;

        let url = format!("{}{AUDIO_ROUTE}/{name}", base_url.trim_end_matches('/'));
        tracing::info!("TTS saved: {} -> {}", path.display(), url);
        Ok(url)
    }

    /// Read a stored chunk by file name. Names must be a bare `*.mp3` file
    /// name; anything that could escape the audio directory is rejected.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && Path::new(name).extension().is_some_and(|e| e == AUDIO_EXT);
        if !valid {
            return Err(FlowError::InvalidAudioName(name.to_string()));
        }
        Ok(fs::read(self.dir.join(name)).await?)
    }

    /// Delete stored chunks whose modification time is older than `max_age`.
    /// Returns the number of files removed; per-file failures are logged.
    pub async fn sweep(&self, max_age: Duration) -> Result<usize> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let cutoff = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(true, |e| e != AUDIO_EXT) {
                continue;
            }
            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!("Cannot stat audio file {}: {}", path.display(), e);
                    continue;
                }
            };
            if modified < cutoff {
                match fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) => {
                        tracing::error!("Error removing old audio file {}: {}", path.display(), e)
                    }
                }
            }
        }
        if removed > 0 {
            tracing::debug!("Swept {} old audio files", removed);
        }
        Ok(removed)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Languages the assistant answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bangla
    Bn,
    /// English
    En,
}

impl Language {
    /// Resolve the `lang` query parameter: absent or `bn` is Bangla,
    /// anything else is English.
    pub fn from_query(lang: Option<&str>) -> Self {
        match lang {
            None | Some("bn") => Language::Bn,
            Some(_) => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Bn => "bn",
            Language::En => "en",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Bn => "Bangla",
            Language::En => "English",
        }
    }

    /// The counterpart language used for the secondary answer
    pub fn other(&self) -> Self {
        match self {
            Language::Bn => Language::En,
            Language::En => Language::Bn,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Body returned to the chat page after a question is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer_bn: String,
    pub answer_en: String,
    pub audio_urls_bn: Vec<String>,
    pub audio_urls_en: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Directory the synthesized `.mp3` chunks are written to
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    /// Audio files older than this are swept after each answer
    #[serde(default = "default_audio_max_age_secs")]
    pub audio_max_age_secs: u64,
    /// Maximum characters per speech chunk
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,
    #[serde(default = "default_tts_attempts")]
    pub tts_attempts: u32,
    /// Initial backoff between synthesis attempts, doubled each retry
    #[serde(default = "default_tts_backoff_ms")]
    pub tts_backoff_ms: u64,
    /// Pause after each synthesized chunk to stay under speech API rate limits
    #[serde(default = "default_tts_pause_ms")]
    pub tts_pause_ms: u64,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("static/audio")
}

fn default_audio_max_age_secs() -> u64 {
    3600
}

fn default_chunk_chars() -> usize {
    150
}

fn default_tts_attempts() -> u32 {
    3
}

fn default_tts_backoff_ms() -> u64 {
    500
}

fn default_tts_pause_ms() -> u64 {
    1000
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            audio_max_age_secs: default_audio_max_age_secs(),
            chunk_chars: default_chunk_chars(),
            tts_attempts: default_tts_attempts(),
            tts_backoff_ms: default_tts_backoff_ms(),
            tts_pause_ms: default_tts_pause_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_query() {
        assert_eq!(Language::from_query(None), Language::Bn);
        assert_eq!(Language::from_query(Some("bn")), Language::Bn);
        assert_eq!(Language::from_query(Some("en")), Language::En);
        assert_eq!(Language::from_query(Some("BN")), Language::En);
        assert_eq!(Language::Bn.other(), Language::En);
    }

    #[test]
    fn test_flow_config_defaults_from_empty_json() {
        let cfg: FlowConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.audio_dir, PathBuf::from("static/audio"));
        assert_eq!(cfg.audio_max_age_secs, 3600);
        assert_eq!(cfg.chunk_chars, 150);
        assert_eq!(cfg.tts_attempts, 3);
    }
}

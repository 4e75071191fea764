use answer_flow::{FlowConfig, Language};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "0.0.0.0:10000";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gateway settings, loaded from YAML and then overridden from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind: String,
    /// Origin used in audio links; derived from the request `Host` when unset
    pub public_url: Option<String>,
    /// Phrase overrides merged over the built-in table
    pub phrases: Option<PathBuf>,
    pub instructions_bn: PathBuf,
    pub instructions_en: PathBuf,
    /// `mock` or `gemini`
    pub answer_backend: String,
    pub gemini_model: String,
    /// Language used when `/ask` has no `lang` parameter
    pub default_lang: Language,
    pub flow: FlowConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            public_url: None,
            phrases: None,
            instructions_bn: PathBuf::from("USER_INSTRUCTIONS_BN.txt"),
            instructions_en: PathBuf::from("USER_INSTRUCTIONS_EN.txt"),
            answer_backend: "gemini".to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            default_lang: Language::Bn,
            flow: FlowConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        // an empty document means "all defaults"
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.bind, "0.0.0.0:10000");
        assert_eq!(cfg.gemini_model, "gemini-2.0-flash");
        assert_eq!(cfg.default_lang, Language::Bn);
        assert_eq!(cfg.flow.chunk_chars, 150);
        assert_eq!(cfg.flow.audio_max_age_secs, 3600);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = GatewayConfig::from_yaml_str(
            "bind: 127.0.0.1:8080\nanswer_backend: mock\ndefault_lang: en\nflow:\n  chunk_chars: 90\n",
        )
        .unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:8080");
        assert_eq!(cfg.answer_backend, "mock");
        assert_eq!(cfg.default_lang, Language::En);
        assert_eq!(cfg.flow.chunk_chars, 90);
        assert_eq!(cfg.flow.tts_attempts, 3);
        assert_eq!(cfg.instructions_bn, PathBuf::from("USER_INSTRUCTIONS_BN.txt"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "public_url: http://rover.local:10000").unwrap();
        let cfg = GatewayConfig::load(file.path()).unwrap();
        assert_eq!(cfg.public_url.as_deref(), Some("http://rover.local:10000"));

        assert!(GatewayConfig::load("/nonexistent/gateway.yaml").is_err());
        assert!(GatewayConfig::from_yaml_str("bind: [1, 2").is_err());
    }
}

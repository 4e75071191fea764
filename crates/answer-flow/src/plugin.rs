#[cfg(feature = "gemini")]
use crate::{GeminiClient, GeminiGenerator, GeminiTranslator, GoogleSpeech};
#[cfg(feature = "mock")]
use crate::{MockGenerator, MockSpeech, MockTranslator};
use crate::{Backends, FlowError, Result};
#[cfg(any(feature = "mock", feature = "gemini"))]
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BackendKind {
    Mock,
    Gemini,
}

impl std::str::FromStr for BackendKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(BackendKind::Mock),
            "gemini" => Ok(BackendKind::Gemini),
            other => Err(FlowError::Backend(format!("unknown answer backend '{other}'"))),
        }
    }
}

/// Settings consumed by the backend factory
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub model: String,
    /// Falls back to `GEMINI_API_KEY` when unset
    pub api_key: Option<String>,
}

pub fn new_backends(kind: BackendKind, cfg: &BackendConfig) -> Result<Backends> {
    match kind {
        BackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                let _ = cfg;
                Ok(Backends {
                    generator: Arc::new(MockGenerator::default()),
                    translator: Arc::new(MockTranslator::default()),
                    speech: Arc::new(MockSpeech::default()),
                })
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = cfg;
                Err(FlowError::Backend("mock feature not enabled".into()))
            }
        }
        BackendKind::Gemini => {
            #[cfg(feature = "gemini")]
            {
                let client = match &cfg.api_key {
                    Some(key) => GeminiClient::new(cfg.model.clone(), key.clone())?,
                    None => GeminiClient::from_env(cfg.model.clone())?,
                };
                Ok(Backends {
                    generator: Arc::new(GeminiGenerator::new(client.clone())),
                    translator: Arc::new(GeminiTranslator::new(client)),
                    speech: Arc::new(GoogleSpeech::new()?),
                })
            }
            #[cfg(not(feature = "gemini"))]
            {
                let _ = cfg;
                Err(FlowError::Backend("gemini feature not enabled".into()))
            }
        }
    }
}

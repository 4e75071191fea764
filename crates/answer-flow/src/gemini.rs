//! Google-hosted backends over HTTP
//!
//! Answers and free-form translations come from the Gemini `generateContent`
//! REST call; speech comes from the Google Translate TTS endpoint.

use crate::{AnswerGenerator, FlowError, Language, Result, SpeechSynthesizer, Translator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Thin client for one Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(FlowError::Backend(format!("{API_KEY_ENV} is empty")));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| FlowError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            model: model.into(),
            api_key,
        })
    }

    /// Build a client from `GEMINI_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| FlowError::Backend(format!("{API_KEY_ENV} is not set")))?;
        Self::new(model, key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_text(&self, prompt: &str) -> std::result::Result<String, String> {
        let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", self.model);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("gemini: HTTP {}", resp.status()));
        }
        let parsed: GenerateResponse = resp.json().await.map_err(|e| e.to_string())?;
        tracing::debug!("gemini {} replied in {:?}", self.model, start.elapsed());

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err("gemini: empty response".into());
        }
        Ok(text)
    }
}

pub struct GeminiGenerator {
    client: GeminiClient,
}

impl GeminiGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnswerGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .generate_text(prompt)
            .await
            .map_err(FlowError::Generation)
    }

    fn name(&self) -> &str {
        self.client.model()
    }
}

/// Translator that asks the model for a bare translation.
pub struct GeminiTranslator {
    client: GeminiClient,
}

impl GeminiTranslator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        let prompt = translation_prompt(text, from, to);
        self.client
            .generate_text(&prompt)
            .await
            .map(|t| t.trim().to_string())
            .map_err(FlowError::Translation)
    }
}

fn translation_prompt(text: &str, from: Language, to: Language) -> String {
    format!(
        "Translate the following {} text to {}. Reply with the translation only.\n\n{}",
        from.name(),
        to.name(),
        text
    )
}

/// Speech from the Google Translate TTS endpoint (MP3).
pub struct GoogleSpeech {
    client: reqwest::Client,
}

impl GoogleSpeech {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FlowError::Backend(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeech {
    async fn synthesize(&self, text: &str, lang: Language) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(TTS_ENDPOINT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang.code()),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| FlowError::Synthesis(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FlowError::Synthesis(format!("tts: HTTP {}", resp.status())));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FlowError::Synthesis(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn test_response_parts_are_joined() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Starting "},{"text":"rover."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "Starting rover.");
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(matches!(
            GeminiClient::new(DEFAULT_MODEL, ""),
            Err(FlowError::Backend(_))
        ));
    }

    #[test]
    fn test_translation_prompt_names_languages() {
        let prompt = translation_prompt("রোভার", Language::Bn, Language::En);
        assert!(prompt.starts_with("Translate the following Bangla text to English."));
        assert!(prompt.ends_with("\n\nরোভার"));
    }
}

use crate::{Language, Result};
use async_trait::async_trait;

/// Produces the assistant's answer for a fully built prompt.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String>;
}

/// Turns text into encoded speech audio (MP3 bytes).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, lang: Language) -> Result<Vec<u8>>;
}

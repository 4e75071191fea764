use crate::{AnswerGenerator, FlowError, Language, Result, SpeechSynthesizer, Translator};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Offline generator. Replies with a fixed answer, or echoes the question
/// found at the end of the prompt.
#[derive(Debug, Default)]
pub struct MockGenerator {
    reply: Option<String>,
    fail_with: Option<String>,
}

impl MockGenerator {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            fail_with: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: None,
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl AnswerGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Some(msg) = &self.fail_with {
            return Err(FlowError::Generation(msg.clone()));
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }
        // prompt layout: "<instruction>\n\n<label>: <question>\n\n<answer label>"
        let question = prompt
            .rsplit("\n\n")
            .nth(1)
            .and_then(|q| q.split_once(": ").map(|(_, q)| q))
            .unwrap_or(prompt);
        Ok(question.to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Offline translator that hands the text back unchanged.
#[derive(Debug, Default)]
pub struct MockTranslator {
    fail: bool,
}

impl MockTranslator {
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        if self.fail {
            return Err(FlowError::Translation(format!("mock {from}->{to} unavailable")));
        }
        Ok(text.to_string())
    }
}

/// Offline synthesizer producing a tiny ID3-tagged placeholder per chunk.
#[derive(Debug, Default)]
pub struct MockSpeech {
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl MockSpeech {
    /// Fail the first `failures` calls, then succeed
    pub fn flaky(failures: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str, lang: Language) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FlowError::Synthesis("mock speech backend busy".into()));
        }
        let mut out = b"ID3".to_vec();
        out.extend_from_slice(lang.code().as_bytes());
        out.extend_from_slice(text.as_bytes());
        Ok(out)
    }
}

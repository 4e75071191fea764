//! Question-answering orchestration
//!
//! One question goes through generation, cross-language translation, a single
//! publish of the answer pair, chunked speech synthesis and an audio sweep.

use crate::{
    canned_translation, sanitize_question, split_text, unavailable_marker, AnswerGenerator,
    AskResponse, AudioStore, FlowConfig, FlowError, Language, Result, SpeechSynthesizer,
    SystemInstructions, Translator,
};
use command_classifier::{AnswerPair, AnswerStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// External collaborators used to answer a question
pub struct Backends {
    pub generator: Arc<dyn AnswerGenerator>,
    pub translator: Arc<dyn Translator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
}

pub struct AnswerFlow {
    backends: Backends,
    answers: Arc<AnswerStore>,
    audio: AudioStore,
    instructions: SystemInstructions,
    config: FlowConfig,
}

impl AnswerFlow {
    pub fn new(
        backends: Backends,
        answers: Arc<AnswerStore>,
        instructions: SystemInstructions,
        config: FlowConfig,
    ) -> Self {
        let audio = AudioStore::new(config.audio_dir.clone());
        Self {
            backends,
            answers,
            audio,
            instructions,
            config,
        }
    }

    pub fn audio(&self) -> &AudioStore {
        &self.audio
    }

    pub fn answers(&self) -> &Arc<AnswerStore> {
        &self.answers
    }

    /// Answer a question in `lang` and publish the bilingual answer.
    ///
    /// `base_url` is the externally visible origin used for audio links.
    pub async fn ask(&self, question: &str, lang: Language, base_url: &str) -> Result<AskResponse> {
        let question = sanitize_question(question.trim());
        if question.is_empty() {
            return Err(FlowError::MissingQuestion);
        }

        // the actuator must not act on the previous answer while this one is pending
        self.answers.reset();

        let prompt = self.instructions.build_prompt(&question, lang);
        let primary = self
            .backends
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| {
                error!("Answer generation via {} failed: {}", self.backends.generator.name(), e);
                e
            })?
            .trim()
            .to_string();

        let secondary = self.translate(&primary, lang, lang.other()).await;
        self.answers
            .publish(AnswerPair::new(primary.clone(), secondary.clone()));
        info!("Published answer ({}): {}", lang, primary);

        let primary_urls = self.speak(&primary, lang, base_url).await;
        let secondary_urls = self.speak(&secondary, lang.other(), base_url).await;
        info!("Audio URLs primary: {:?}", primary_urls);
        info!("Audio URLs secondary: {:?}", secondary_urls);
        if primary_urls.is_empty() {
            warn!("Primary audio failed; falling back to text-only");
        }

        let max_age = Duration::from_secs(self.config.audio_max_age_secs);
        if let Err(e) = self.audio.sweep(max_age).await {
            warn!("Audio sweep failed: {}", e);
        }

        Ok(match lang {
            Language::Bn => AskResponse {
                answer_bn: primary,
                answer_en: secondary,
                audio_urls_bn: primary_urls,
                audio_urls_en: secondary_urls,
            },
            Language::En => AskResponse {
                answer_bn: secondary,
                answer_en: primary,
                audio_urls_bn: secondary_urls,
                audio_urls_en: primary_urls,
            },
        })
    }

    async fn translate(&self, text: &str, from: Language, to: Language) -> String {
        if let Some(known) = canned_translation(text, from, to) {
            return known.to_string();
        }
        match self.backends.translator.translate(text, from, to).await {
            Ok(translated) => translated,
            Err(e) => {
                error!("Translation error: {}", e);
                unavailable_marker(text, to)
            }
        }
    }

    /// Synthesize every chunk of `text`; chunks that keep failing are skipped.
    async fn speak(&self, text: &str, lang: Language, base_url: &str) -> Vec<String> {
        let mut urls = Vec::new();
        for chunk in split_text(text, self.config.chunk_chars) {
            match self.synthesize_with_retry(&chunk, lang).await {
                Ok(audio) => match self.audio.save(&audio, base_url).await {
                    Ok(url) => urls.push(url),
                    Err(e) => error!("TTS error saving chunk: {}", e),
                },
                Err(e) => error!("TTS error saving chunk after retries: {}", e),
            }
            if self.config.tts_pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.tts_pause_ms)).await;
            }
        }
        urls
    }

    async fn synthesize_with_retry(&self, chunk: &str, lang: Language) -> Result<Vec<u8>> {
        let attempts = self.config.tts_attempts.max(1);
        let mut delay = Duration::from_millis(self.config.tts_backoff_ms);
        let mut attempt = 1;
        loop {
            match self.backends.speech.synthesize(chunk, lang).await {
                Ok(audio) => return Ok(audio),
                Err(e) if attempt < attempts => {
                    warn!("TTS attempt {}/{} failed: {}", attempt, attempts, e);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::{MockGenerator, MockSpeech, MockTranslator};
    use command_classifier::{classify_default, Command};

    struct Harness {
        flow: AnswerFlow,
        answers: Arc<AnswerStore>,
        speech: Arc<MockSpeech>,
        _dir: tempfile::TempDir,
    }

    fn harness(generator: MockGenerator, translator: MockTranslator, speech: MockSpeech) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let answers = Arc::new(AnswerStore::new());
        let speech = Arc::new(speech);
        let config = FlowConfig {
            audio_dir: dir.path().to_path_buf(),
            tts_backoff_ms: 1,
            tts_pause_ms: 0,
            ..FlowConfig::default()
        };
        let backends = Backends {
            generator: Arc::new(generator),
            translator: Arc::new(translator),
            speech: speech.clone(),
        };
        let flow = AnswerFlow::new(
            backends,
            answers.clone(),
            SystemInstructions::default(),
            config,
        );
        Harness {
            flow,
            answers,
            speech,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_bangla_control_answer_uses_canned_translation() {
        let h = harness(
            MockGenerator::with_reply("  লাইটটি চালু হয়েছে  "),
            MockTranslator::failing(),
            MockSpeech::default(),
        );
        let resp = h.flow.ask("লাইট জ্বালাও", Language::Bn, "http://rover").await.unwrap();

        assert_eq!(resp.answer_bn, "লাইটটি চালু হয়েছে");
        assert_eq!(resp.answer_en, "The light has been turned on");
        assert_eq!(resp.audio_urls_bn.len(), 1);
        assert_eq!(resp.audio_urls_en.len(), 1);

        let current = h.answers.current();
        assert_eq!(current.primary_text, "লাইটটি চালু হয়েছে");
        assert_eq!(current.secondary_text, "The light has been turned on");
        assert_eq!(classify_default(&current), Command::LightOn);
    }

    #[tokio::test]
    async fn test_english_answer_maps_fields_by_language() {
        let h = harness(
            MockGenerator::with_reply("Starting rover."),
            MockTranslator::default(),
            MockSpeech::default(),
        );
        let resp = h.flow.ask("start the rover", Language::En, "http://rover").await.unwrap();
        assert_eq!(resp.answer_en, "Starting rover.");
        assert_eq!(resp.answer_bn, "রোভার শুরু হচ্ছে।");
        assert!(resp.audio_urls_en[0].starts_with("http://rover/static/audio/"));
    }

    #[tokio::test]
    async fn test_translator_failure_marks_secondary() {
        let h = harness(
            MockGenerator::with_reply("Soil looks dry today."),
            MockTranslator::failing(),
            MockSpeech::default(),
        );
        let resp = h.flow.ask("how is the soil", Language::En, "http://rover").await.unwrap();
        assert_eq!(resp.answer_bn, "Soil looks dry today. (অনুবাদ অনুপলব্ধ)");
    }

    #[tokio::test]
    async fn test_missing_question() {
        let h = harness(
            MockGenerator::default(),
            MockTranslator::default(),
            MockSpeech::default(),
        );
        assert!(matches!(
            h.flow.ask("   ", Language::Bn, "http://rover").await,
            Err(FlowError::MissingQuestion)
        ));
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_sentinel() {
        let h = harness(
            MockGenerator::failing("quota exceeded"),
            MockTranslator::default(),
            MockSpeech::default(),
        );
        h.answers
            .publish(AnswerPair::new("Stopping rover.", "রোভার বন্ধ হচ্ছে।"));

        let err = h.flow.ask("hello", Language::En, "http://rover").await.unwrap_err();
        assert!(matches!(err, FlowError::Generation(_)));
        assert!(h.answers.current().is_sentinel());
    }

    #[tokio::test]
    async fn test_speech_is_retried_then_skipped() {
        // 3 attempts per chunk: the first chunk fails twice then succeeds
        let h = harness(
            MockGenerator::with_reply("Water pump has been turned ON"),
            MockTranslator::default(),
            MockSpeech::flaky(2),
        );
        let resp = h.flow.ask("pump", Language::En, "http://rover").await.unwrap();
        assert_eq!(resp.audio_urls_en.len(), 1);
        assert_eq!(h.speech.calls(), 4);

        // every attempt fails for the first chunk, which is skipped
        let h = harness(
            MockGenerator::with_reply("Water pump has been turned ON"),
            MockTranslator::default(),
            MockSpeech::flaky(3),
        );
        let resp = h.flow.ask("pump", Language::En, "http://rover").await.unwrap();
        assert!(resp.audio_urls_en.is_empty());
        assert_eq!(resp.audio_urls_bn.len(), 1);
        assert_eq!(classify_default(&h.answers.current()), Command::WaterPumpOn);
    }

    #[tokio::test]
    async fn test_question_is_sanitized_before_prompting() {
        let h = harness(
            MockGenerator::default(),
            MockTranslator::default(),
            MockSpeech::default(),
        );
        let resp = h.flow.ask("<b>hi</b>", Language::En, "http://rover").await.unwrap();
        assert_eq!(resp.answer_en, "&lt;b&gt;hi&lt;/b&gt;");
    }
}

//! answer-flow: question answering for the rover assistant
//!
//! Generates an answer with a pluggable backend, pairs it with its
//! translation, publishes the pair for the actuator and renders speech audio.

mod types;
pub use types::{AskResponse, FlowConfig, Language};

mod error;
pub use error::{FlowError, Result};

mod traits;
pub use traits::{AnswerGenerator, SpeechSynthesizer, Translator};

mod translations;
pub use translations::{canned_translation, unavailable_marker, CANNED_ANSWERS};

mod chunking;
pub use chunking::{split_text, DARI};

mod prompt;
pub use prompt::{sanitize_question, SystemInstructions};

mod audio;
pub use audio::{AudioStore, AUDIO_ROUTE};

mod flow;
pub use flow::{AnswerFlow, Backends};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockGenerator, MockSpeech, MockTranslator};

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "gemini")]
pub use gemini::{
    GeminiClient, GeminiGenerator, GeminiTranslator, GoogleSpeech, API_KEY_ENV, DEFAULT_MODEL,
};

pub mod plugin;

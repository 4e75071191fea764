//! command-classifier: maps spoken answers onto rover actuator commands
//!
//! The answer model replies in Bangla and English with some formatting drift,
//! so classification is a case-insensitive substring scan over a fixed
//! bilingual phrase table. The latest answer is held in an [`AnswerStore`]
//! that the actuator poll reads without ever seeing a half-updated pair.

mod classifier;
mod command;
mod error;
mod phrases;
mod store;

pub use classifier::{classify, CommandClassifier};
pub use command::{Command, UnknownCommand, NONE_WIRE_NAME};
pub use error::{PhraseTableError, Result};
pub use phrases::{load_phrase_file, Phrase, PhraseTable};
pub use store::{AnswerPair, AnswerStore};

/// Initialize the command classifier
pub fn init() {
    tracing::info!("Initializing command classifier");
}

/// Classify with the built-in phrase table
pub fn classify_default(pair: &AnswerPair) -> Command {
    classify(&PhraseTable::default(), pair)
}

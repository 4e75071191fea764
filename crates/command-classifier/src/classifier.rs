//! Answer-to-command classification

use crate::{AnswerPair, Command, PhraseTable};

/// Maps the latest answer onto an actuator command.
///
/// Both texts are lower-cased once; then, for each command in priority order
/// and each of its phrases in order, the phrase is searched for in the primary
/// text and then the secondary text. The first hit wins. An unmatched answer
/// yields [`Command::None`].
pub fn classify(table: &PhraseTable, pair: &AnswerPair) -> Command {
    let candidates = [
        pair.primary_text.to_lowercase(),
        pair.secondary_text.to_lowercase(),
    ];

    for (cmd, phrases) in table.iter() {
        for phrase in phrases {
            if candidates.iter().any(|text| text.contains(phrase.key())) {
                tracing::debug!("Matched '{}' -> {}", phrase.text, cmd);
                return cmd;
            }
        }
    }

    Command::None
}

/// Classifier bound to one phrase table
#[derive(Debug, Clone, Default)]
pub struct CommandClassifier {
    table: PhraseTable,
}

impl CommandClassifier {
    pub fn new(table: PhraseTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, pair: &AnswerPair) -> Command {
        classify(&self.table, pair)
    }

    pub fn table(&self) -> &PhraseTable {
        &self.table
    }
}

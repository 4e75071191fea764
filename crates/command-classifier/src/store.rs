//! Latest-answer snapshot shared between the question flow and the actuator poll

use crate::NONE_WIRE_NAME;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The most recent answer in both languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPair {
    pub primary_text: String,
    pub secondary_text: String,
}

impl AnswerPair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary_text: primary.into(),
            secondary_text: secondary.into(),
        }
    }

    /// "No answer yet" value held before the first publish.
    pub fn sentinel() -> Self {
        Self::new(NONE_WIRE_NAME, NONE_WIRE_NAME)
    }

    pub fn is_sentinel(&self) -> bool {
        self.primary_text == NONE_WIRE_NAME && self.secondary_text == NONE_WIRE_NAME
    }
}

impl Default for AnswerPair {
    fn default() -> Self {
        Self::sentinel()
    }
}

/// Single-slot store for the latest [`AnswerPair`].
///
/// The pair lives behind one `Arc` that is swapped whole under a write lock.
/// Readers clone the `Arc` and drop the lock straight away, so a reader
/// always sees both texts from the same publish.
#[derive(Debug)]
pub struct AnswerStore {
    current: RwLock<Arc<AnswerPair>>,
}

impl Default for AnswerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(AnswerPair::sentinel())),
        }
    }

    pub fn publish(&self, pair: AnswerPair) {
        let next = Arc::new(pair);
        *self.current.write() = next;
    }

    pub fn current(&self) -> Arc<AnswerPair> {
        self.current.read().clone()
    }

    /// Go back to the sentinel pair
    pub fn reset(&self) {
        self.publish(AnswerPair::sentinel());
    }
}

//! Bilingual trigger phrase table
//!
//! Each command owns an ordered list of phrases, in Bangla and English with the
//! casings the answer model tends to produce. The built-in table can be
//! partially overridden from a YAML file at startup.

use crate::{Command, PhraseTableError, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Built-in trigger phrases, in command priority order.
const DEFAULT_PHRASES: &[(Command, &[&str])] = &[
    (
        Command::LightOn,
        &[
            "লাইটটি চালু হয়েছে",
            "The light has been turned on",
            "Light has been turned ON",
        ],
    ),
    (
        Command::LightOff,
        &[
            "লাইটটি বন্ধ হয়েছে",
            "The light has been turned off",
            "Light has been turned OFF",
        ],
    ),
    (
        Command::SeedSowOn,
        &[
            "বীজ বপন ব্যবস্থা চালু হয়েছে",
            "The seed sowing system has been turned on",
            "Seed sowing system has been turned ON",
        ],
    ),
    (
        Command::SeedSowOff,
        &[
            "বীজ বপন ব্যবস্থা বন্ধ হয়েছে",
            "The seed sowing system has been turned off",
            "Seed sowing system has been turned OFF",
        ],
    ),
    (
        Command::FertilizerOn,
        &[
            "কীটনাশক ব্যবস্থা চালু হয়েছে",
            "The fertilizer system has been turned on",
            "Fertilizer system has been turned ON",
        ],
    ),
    (
        Command::FertilizerOff,
        &[
            "কীটনাশক ব্যবস্থা বন্ধ হয়েছে",
            "The fertilizer system has been turned off",
            "Fertilizer system has been turned OFF",
        ],
    ),
    (
        Command::WaterPumpOn,
        &[
            "ওয়াটার পাম্প চালু হয়েছে",
            "The water pump has been turned on",
            "Water pump has been turned ON",
        ],
    ),
    (
        Command::WaterPumpOff,
        &[
            "ওয়াটার পাম্প বন্ধ হয়েছে",
            "The water pump has been turned off",
            "Water pump has been turned OFF",
        ],
    ),
    (
        Command::StartMeasuringSoilMoisture,
        &[
            "পরিমাপ করা হচ্ছে... LCD প্যানেল দেখুন",
            "Measuring... Look at the LCD panel",
            "MEASURING.... LOOK AT THE LCD PANEL",
        ],
    ),
    (
        Command::StopMeasuringSoilMoisture,
        &[
            "বন্ধ করা হচ্ছে...",
            "Stopping....",
            "STOPPING....",
        ],
    ),
    (
        Command::StartRover,
        &[
            "রোভার শুরু হচ্ছে।",
            "Starting rover.",
            "STARTING ROVER.",
        ],
    ),
    (
        Command::StopRover,
        &[
            "রোভার বন্ধ হচ্ছে।",
            "Stopping rover.",
            "STOPPING ROVER.",
        ],
    ),
];

/// A single trigger phrase together with its lower-cased match key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub text: String,
    key: String,
}

impl Phrase {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let key = text.to_lowercase();
        Self { text, key }
    }

    /// Lower-cased form used for substring tests
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Immutable mapping from command to its trigger phrases.
///
/// Entries are always held in command priority order regardless of how the
/// table was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseTable {
    entries: Vec<(Command, Vec<Phrase>)>,
}

impl Default for PhraseTable {
    fn default() -> Self {
        let entries = DEFAULT_PHRASES
            .iter()
            .map(|(cmd, phrases)| (*cmd, phrases.iter().map(|p| Phrase::new(*p)).collect()))
            .collect();
        Self { entries }
    }
}

impl PhraseTable {
    /// Build a table from explicit entries. Commands are reordered by priority;
    /// commands that are absent get no phrases.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Command, Vec<S>)>,
        S: Into<String>,
    {
        let mut by_cmd: BTreeMap<usize, (Command, Vec<Phrase>)> = BTreeMap::new();
        for (cmd, phrases) in entries {
            if cmd.is_none() {
                return Err(PhraseTableError::SentinelCommand);
            }
            let phrases: Vec<Phrase> = phrases
                .into_iter()
                .map(Phrase::new)
                .filter(|p| !p.key.trim().is_empty())
                .collect();
            if phrases.is_empty() {
                return Err(PhraseTableError::EmptyPhraseList(cmd));
            }
            by_cmd.insert(cmd.priority(), (cmd, phrases));
        }
        Ok(Self {
            entries: by_cmd.into_values().collect(),
        })
    }

    /// Replace the phrase lists of the commands present in `overrides`,
    /// keeping every other command's built-in phrases.
    pub fn with_overrides(self, overrides: PhraseTable) -> Self {
        let mut merged: BTreeMap<usize, (Command, Vec<Phrase>)> = self
            .entries
            .into_iter()
            .map(|(cmd, phrases)| (cmd.priority(), (cmd, phrases)))
            .collect();
        for (cmd, phrases) in overrides.entries {
            merged.insert(cmd.priority(), (cmd, phrases));
        }
        Self {
            entries: merged.into_values().collect(),
        }
    }

    /// Parse a YAML mapping of command wire name to phrase list.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let parsed: BTreeMap<String, Vec<String>> = serde_yaml::from_str(raw)?;
        let mut entries = Vec::with_capacity(parsed.len());
        for (name, phrases) in parsed {
            let cmd: Command = name.parse()?;
            entries.push((cmd, phrases));
        }
        Self::from_entries(entries)
    }

    /// Iterate `(command, phrases)` in priority order
    pub fn iter(&self) -> impl Iterator<Item = (Command, &[Phrase])> {
        self.entries.iter().map(|(cmd, p)| (*cmd, p.as_slice()))
    }

    pub fn phrases_for(&self, cmd: Command) -> &[Phrase] {
        self.entries
            .iter()
            .find(|(c, _)| *c == cmd)
            .map(|(_, p)| p.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, p)| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load a phrase override file and merge it over the built-in table.
pub fn load_phrase_file(path: impl AsRef<Path>) -> anyhow::Result<PhraseTable> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading phrase table: {}", path.display()))?;
    let overrides = PhraseTable::from_yaml_str(&raw)
        .with_context(|| format!("parsing phrase table: {}", path.display()))?;
    tracing::info!(
        "Loaded {} override phrases from {}",
        overrides.len(),
        path.display()
    );
    Ok(PhraseTable::default().with_overrides(overrides))
}

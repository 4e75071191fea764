//! Canned answer translations
//!
//! The device-control answers are short fixed sentences. Translating them
//! through the table keeps both halves of the answer pair byte-exact, which
//! the command classifier relies on.

use crate::Language;

/// Bangla control answer and its English counterpart.
pub const CANNED_ANSWERS: &[(&str, &str)] = &[
    ("লাইটটি চালু হয়েছে", "The light has been turned on"),
    ("লাইটটি বন্ধ হয়েছে", "The light has been turned off"),
    ("বীজ বপন ব্যবস্থা চালু হয়েছে", "The seed sowing system has been turned on"),
    ("বীজ বপন ব্যবস্থা বন্ধ হয়েছে", "The seed sowing system has been turned off"),
    ("কীটনাশক ব্যবস্থা চালু হয়েছে", "The fertilizer system has been turned on"),
    ("কীটনাশক ব্যবস্থা বন্ধ হয়েছে", "The fertilizer system has been turned off"),
    ("ওয়াটার পাম্প চালু হয়েছে", "The water pump has been turned on"),
    ("ওয়াটার পাম্প বন্ধ হয়েছে", "The water pump has been turned off"),
    ("পরিমাপ করা হচ্ছে... LCD প্যানেল দেখুন", "Measuring... Look at the LCD panel"),
    ("বন্ধ করা হচ্ছে...", "Stopping...."),
    ("রোভার শুরু হচ্ছে।", "Starting rover."),
    ("রোভার বন্ধ হচ্ছে।", "Stopping rover."),
];

/// Look up the counterpart of a control answer, matching the whole text.
pub fn canned_translation(text: &str, from: Language, to: Language) -> Option<&'static str> {
    match (from, to) {
        (Language::Bn, Language::En) => CANNED_ANSWERS
            .iter()
            .find(|(bn, _)| *bn == text)
            .map(|(_, en)| *en),
        (Language::En, Language::Bn) => CANNED_ANSWERS
            .iter()
            .find(|(_, en)| *en == text)
            .map(|(bn, _)| *bn),
        _ => None,
    }
}

/// Text used when no translation could be produced.
pub fn unavailable_marker(text: &str, to: Language) -> String {
    match to {
        Language::En => format!("{text} (Translation unavailable)"),
        Language::Bn => format!("{text} (অনুবাদ অনুপলব্ধ)"),
    }
}

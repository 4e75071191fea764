use crate::Language;
use std::path::Path;

/// System instructions prepended to every question, one per language.
#[derive(Debug, Clone, Default)]
pub struct SystemInstructions {
    pub bn: String,
    pub en: String,
}

impl SystemInstructions {
    /// Load both instruction files. A missing or unreadable file leaves that
    /// language with an empty instruction.
    pub fn load(bn_path: impl AsRef<Path>, en_path: impl AsRef<Path>) -> Self {
        Self {
            bn: read_instruction(bn_path.as_ref()),
            en: read_instruction(en_path.as_ref()),
        }
    }

    pub fn for_language(&self, lang: Language) -> &str {
        match lang {
            Language::Bn => &self.bn,
            Language::En => &self.en,
        }
    }

    pub fn build_prompt(&self, question: &str, lang: Language) -> String {
        let instruction = self.for_language(lang);
        match lang {
            Language::Bn => format!("{instruction}\n\nপ্রশ্ন: {question}\n\nউত্তর দিন:"),
            Language::En => format!("{instruction}\n\nQuestion: {question}\n\nAnswer:"),
        }
    }
}

fn read_instruction(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("No system instruction at {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Escape HTML markup in a user question so it is treated as plain text.
pub fn sanitize_question(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_prompt_layout() {
        let instructions = SystemInstructions {
            bn: "সংক্ষেপে উত্তর দিন".into(),
            en: "Answer briefly".into(),
        };
        assert_eq!(
            instructions.build_prompt("Turn on the light", Language::En),
            "Answer briefly\n\nQuestion: Turn on the light\n\nAnswer:"
        );
        assert!(instructions
            .build_prompt("লাইট চালু করো", Language::Bn)
            .starts_with("সংক্ষেপে উত্তর দিন\n\nপ্রশ্ন: লাইট চালু করো"));
    }

    #[test]
    fn test_load_with_missing_file() {
        let mut en = tempfile::NamedTempFile::new().unwrap();
        write!(en, "You control a farm rover.").unwrap();

        let instructions = SystemInstructions::load("/nonexistent/bn.txt", en.path());
        assert_eq!(instructions.bn, "");
        assert_eq!(instructions.en, "You control a farm rover.");
    }

    #[test]
    fn test_sanitize_question() {
        assert_eq!(
            sanitize_question("<script>alert(1)</script> & light"),
            "&lt;script&gt;alert(1)&lt;/script&gt; &amp; light"
        );
        assert_eq!(sanitize_question("plain"), "plain");
    }
}

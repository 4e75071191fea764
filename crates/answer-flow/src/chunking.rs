/// Bangla full stop (dari)
pub const DARI: char = '।';

/// Split an answer into speech-sized chunks on sentence boundaries.
///
/// Sentences end at `.` when the text contains one, otherwise at the Bangla
/// dari. Sentences are packed greedily while the chunk so far plus the next
/// sentence stays within `max_chars` characters. A single sentence longer
/// than the limit becomes its own chunk.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let delimiter = if text.contains('.') { '.' } else { DARI };
    let suffix = format!("{delimiter} ");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in text.split(delimiter).map(str::trim) {
        if sentence.is_empty() {
            continue;
        }
        let sentence_len = sentence.chars().count();
        if current_len + sentence_len <= max_chars {
            current.push_str(sentence);
            current.push_str(&suffix);
        } else {
            if !current.is_empty() {
                chunks.push(current.trim().to_string());
            }
            current = format!("{sentence}{suffix}");
        }
        current_len = current.chars().count();
    }
    if !current.is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}

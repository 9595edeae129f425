//! Local extractive summarizer
//!
//! Used when generation is disabled, unavailable, or fails.

/// Default summary length in characters
pub const DEFAULT_SUMMARY_CHARS: usize = 600;

/// Returned when there are no chunks to summarize
pub const NO_CHUNKS_MESSAGE: &str = "No relevant top chunk found.";

/// Returned when the chunks hold no text
pub const NO_CONTEXT_MESSAGE: &str = "No relevant context found.";

const ELLIPSIS: &str = "...";

/// Join chunk texts and trim the result to `max_chars` characters
///
/// Prefers cutting after the last period inside the limit, as long as that
/// keeps more than half of it; otherwise hard-cuts and appends an ellipsis.
pub fn summarize<S: AsRef<str>>(texts: &[S], max_chars: usize) -> String {
    if texts.is_empty() {
        return NO_CHUNKS_MESSAGE.to_string();
    }

    let combined = texts.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join("\n\n");
    let text = combined.trim();
    if text.is_empty() {
        return NO_CONTEXT_MESSAGE.to_string();
    }

    // Byte offset of the first character past the limit
    let Some((limit, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let head = &text[..limit];

    if let Some(cut) = head.rfind('.') {
        if head[..cut].chars().count() > max_chars / 2 {
            return text[..=cut].to_string();
        }
    }

    format!("{}{}", head, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_chunks() {
        let empty: [&str; 0] = [];
        assert_eq!(summarize(&empty, 600), NO_CHUNKS_MESSAGE);
        assert_eq!(summarize(&["  ", ""], 600), NO_CONTEXT_MESSAGE);
    }

    #[test]
    fn test_short_text_verbatim() {
        let summary = summarize(&["First chunk.", "Second chunk."], 600);
        assert_eq!(summary, "First chunk.\n\nSecond chunk.");
    }

    #[test]
    fn test_exact_length_kept() {
        let text = "a".repeat(20);
        assert_eq!(summarize(&[text.as_str()], 20), text);
    }

    #[test]
    fn test_cuts_at_last_period_past_midpoint() {
        // Period at index 12, limit 20, midpoint 10
        let text = "Sentence one. Sentence two continues on.";
        assert_eq!(summarize(&[text], 20), "Sentence one.");
    }

    #[test]
    fn test_hard_cut_when_period_too_early() {
        // Only period is at index 2, before the midpoint
        let text = "Hi. this text keeps going without a stop for a while";
        let summary = summarize(&[text], 20);
        assert_eq!(summary, format!("{}...", &text[..20]));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(30);
        let summary = summarize(&[text.as_str()], 10);
        assert_eq!(summary, format!("{}...", "é".repeat(10)));
    }
}

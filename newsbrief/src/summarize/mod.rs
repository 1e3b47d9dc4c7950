mod lang;
mod lexrank;

pub use lang::{content_terms, split_sentences, Language};

use std::cmp::Ordering;
use tracing::warn;

/// Fallback size when ranking is impossible: the original text is cut to
/// this many characters and marked as truncated.
const FALLBACK_CHARS: usize = 500;
const FALLBACK_MARKER: &str = " [...]";

/// Language-aware extractive summarizer.
///
/// Sentences are ranked by centrality in a similarity graph and the top ones
/// are emitted joined by single spaces, in rank order. The rank order (rather
/// than document order) is the delivered contract; equal centrality breaks
/// toward the earlier sentence so output is deterministic.
pub struct Summarizer {
    sentence_count: usize,
}

impl Summarizer {
    pub fn new(sentence_count: usize) -> Self {
        Self { sentence_count }
    }

    /// Summarize `text`. Never fails: when segmentation or ranking cannot
    /// produce a result (empty input, no content terms), the first 500
    /// characters plus a truncation marker are returned instead.
    pub fn summarize(&self, text: &str, language: Language) -> String {
        match self.extract(text, language) {
            Some(summary) => summary,
            None => {
                warn!(language = %language, "summarization fell back to truncation");
                truncation_fallback(text)
            }
        }
    }

    fn extract(&self, text: &str, language: Language) -> Option<String> {
        let sentences = split_sentences(text, language);
        if sentences.is_empty() {
            return None;
        }

        let sentence_terms: Vec<Vec<String>> = sentences
            .iter()
            .map(|s| content_terms(s, language))
            .collect();
        let centrality = lexrank::rank(&sentence_terms)?;

        let mut order: Vec<usize> = (0..sentences.len()).collect();
        order.sort_by(|&a, &b| {
            centrality[b]
                .partial_cmp(&centrality[a])
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });

        let picked: Vec<&str> = order
            .iter()
            .take(self.sentence_count)
            .map(|&i| sentences[i].as_str())
            .collect();
        Some(picked.join(" "))
    }
}

fn truncation_fallback(text: &str) -> String {
    let truncated: String = text.chars().take(FALLBACK_CHARS).collect();
    format!("{truncated}{FALLBACK_MARKER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_falls_back_without_panicking() {
        let summarizer = Summarizer::new(3);
        let summary = summarizer.summarize("", Language::En);
        assert_eq!(summary, " [...]");
    }

    #[test]
    fn stop_word_only_input_falls_back() {
        let summarizer = Summarizer::new(3);
        let summary = summarizer.summarize("The and of. To from with.", Language::En);
        assert!(summary.ends_with(" [...]"));
    }

    #[test]
    fn fallback_truncates_long_text_to_500_chars() {
        let summarizer = Summarizer::new(3);
        // stop words only, so ranking is impossible and the fallback kicks in
        let long: String = "and the of to ".repeat(100);
        let summary = summarizer.summarize(&long, Language::En);
        assert!(summary.ends_with(" [...]"));
        assert_eq!(summary.chars().count(), 500 + " [...]".chars().count());
    }

    #[test]
    fn summary_has_at_most_the_configured_sentences() {
        let summarizer = Summarizer::new(2);
        let text = "The council approved the budget plan. The budget plan doubles road funding. \
                    Critics called the budget plan rushed. Meanwhile a local cat won a prize.";
        let summary = summarizer.summarize(text, Language::En);
        let terminator_count = summary.matches('.').count();
        assert_eq!(terminator_count, 2);
    }

    #[test]
    fn short_texts_return_all_sentences() {
        let summarizer = Summarizer::new(3);
        let text = "Parliament votes today. The outcome is open.";
        let summary = summarizer.summarize(text, Language::En);
        assert!(summary.contains("Parliament votes today."));
        assert!(summary.contains("The outcome is open."));
    }

    #[test]
    fn selected_sentences_keep_their_original_text() {
        let summarizer = Summarizer::new(1);
        let text = "The budget vote passed narrowly. The budget vote surprised analysts. \
                    Unrelated weather was mild.";
        let summary = summarizer.summarize(text, Language::En);
        // exactly one of the input sentences, verbatim
        assert!(text.contains(&summary));
        assert!(summary.ends_with('.'));
    }

    #[test]
    fn single_sentence_input_is_returned_as_is() {
        let summarizer = Summarizer::new(3);
        let text = "Die Regierung stellt den Haushalt vor.";
        assert_eq!(summarizer.summarize(text, Language::De), text);
    }
}

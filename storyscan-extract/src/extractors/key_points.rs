// Key point selection
//
// A sentence is a key point when it has at least 4 words and carries a
// signal: a category keyword, an urgency phrase, an amount marker, or "need".
// At most 7, distinct (case-insensitive), in source order.

use crate::extractors::text::{contains_phrase, word_count};
use crate::tables::{CATEGORY_KEYWORDS, URGENCY_TIERS};
use std::collections::HashSet;
use tracing::debug;

const MAX_KEY_POINTS: usize = 7;
const MIN_WORDS: usize = 4;

const AMOUNT_MARKERS: &[&str] = &["dollars", "bucks", "hundred", "thousand"];

/// Select up to 7 signal-bearing sentences
pub fn extract_key_points<S: AsRef<str>>(sentences: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut points = Vec::new();

    for sentence in sentences {
        let sentence = sentence.as_ref().trim();
        if word_count(sentence) < MIN_WORDS {
            continue;
        }
        let lower = sentence.to_lowercase();
        if !has_signal(&lower) {
            continue;
        }
        if !seen.insert(lower) {
            continue;
        }
        points.push(sentence.to_string());
        if points.len() == MAX_KEY_POINTS {
            break;
        }
    }

    debug!(count = points.len(), "Key points selected");
    points
}

fn has_signal(lower: &str) -> bool {
    if contains_phrase(lower, "need") || lower.contains('$') || lower.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    if AMOUNT_MARKERS.iter().any(|m| contains_phrase(lower, m)) {
        return true;
    }
    let category_hit = CATEGORY_KEYWORDS
        .iter()
        .any(|(_, keywords)| keywords.iter().any(|k| contains_phrase(lower, k)));
    category_hit
        || URGENCY_TIERS
            .iter()
            .any(|tier| tier.phrases.iter().any(|p| contains_phrase(lower, p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_sentences_kept_in_order() {
        let sentences = [
            "Hi there, how are you today?",
            "I need help paying my rent.",
            "The weather has been lovely lately.",
            "My landlord gave me an eviction notice.",
        ];
        assert_eq!(
            extract_key_points(&sentences),
            vec!["I need help paying my rent.", "My landlord gave me an eviction notice."]
        );
    }

    #[test]
    fn test_short_sentences_skipped() {
        assert!(extract_key_points(&["Need rent.", "Help."]).is_empty());
    }

    #[test]
    fn test_duplicates_and_cap() {
        let mut sentences: Vec<String> = (0..10).map(|i| format!("I need {} hundred dollars now.", i + 1)).collect();
        sentences.insert(1, "I need 1 hundred dollars now.".to_string());
        let points = extract_key_points(&sentences);
        assert_eq!(points.len(), 7);
        assert_eq!(points[1], "I need 2 hundred dollars now.");
    }
}

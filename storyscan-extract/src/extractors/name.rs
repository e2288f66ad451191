// Name extractor
//
// Ordered introduction patterns (most specific first) applied across all
// sentences before the next pattern is tried:
//   1. Title-prefixed      "Mrs. Alvarez", "Dr Patel"
//   2. Real-name phrase    "my real name is Dana Cole"
//   3. Introductions       "my name is / my name's / call me / this is / I'm / I am"
//
// Confidence: 0.5 base, +0.3 explicit introduction, +0.1 consistent
// capitalization, +0.1 for a 2-3 token name; capped at 1.0.

use crate::extractors::text::strip_token;
use crate::tables::{is_stopword, NAME_REJECTION_PHRASES};
use crate::types::{ExtractionSource, ExtractorResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const MAX_NAME_TOKENS: usize = 4;

const REJECTION_WINDOW_WORDS: usize = 3;

struct IntroPattern {
    label: &'static str,
    /// Matches the intro phrase (group 1) and the whitespace after it
    regex: Regex,
    explicit: fn(&str) -> bool,
}

static INTRO_PATTERNS: Lazy<Vec<IntroPattern>> = Lazy::new(|| {
    vec![
        IntroPattern {
            label: "title",
            regex: Regex::new(r"\b(Mr|Mrs|Ms|Miss|Dr)\.?\s+").expect("title pattern"),
            explicit: |_| true,
        },
        IntroPattern {
            label: "real_name",
            regex: Regex::new(r"(?i)\b(real name is)\s+").expect("real name pattern"),
            explicit: |_| true,
        },
        IntroPattern {
            label: "introduction",
            regex: Regex::new(r"(?i)\b(my name is|my name's|call me|this is|i'm|i am)\s+")
                .expect("introduction pattern"),
            explicit: |phrase| {
                matches!(
                    phrase.to_lowercase().as_str(),
                    "my name is" | "my name's" | "call me"
                )
            },
        },
    ]
});

/// Extract a name candidate from sentences
pub fn extract_name<S: AsRef<str>>(sentences: &[S]) -> ExtractorResult<String> {
    for pattern in INTRO_PATTERNS.iter() {
        for sentence in sentences {
            let sentence = sentence.as_ref();
            for caps in pattern.regex.captures_iter(sentence) {
                let (Some(whole), Some(phrase)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let Some(tokens) = name_tokens(&sentence[whole.end()..]) else {
                    continue;
                };

                let confidence = name_confidence(&tokens, (pattern.explicit)(phrase.as_str()));
                let name = tokens.join(" ");
                debug!(name = %name, pattern = pattern.label, confidence, "Name candidate found");
                return ExtractorResult::found(name, confidence, ExtractionSource::NamePatterns);
            }
        }
    }
    ExtractorResult::miss(ExtractionSource::NamePatterns)
}

/// Leading capitalized tokens of the text after an intro phrase, or `None` when rejected
fn name_tokens(rest: &str) -> Option<Vec<String>> {
    let window = rest
        .split_whitespace()
        .take(REJECTION_WINDOW_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if NAME_REJECTION_PHRASES.iter().any(|p| window.contains(p)) {
        return None;
    }

    let mut tokens = Vec::new();
    for raw in rest.split_whitespace() {
        let core = strip_token(raw);
        if !is_name_token(core) {
            break;
        }
        tokens.push(core.to_string());
        let ends_clause = raw
            .trim_end_matches(['"', '\'', ')'])
            .ends_with(|c: char| !c.is_alphanumeric());
        if ends_clause || tokens.len() == MAX_NAME_TOKENS {
            break;
        }
    }

    // Drop a trailing stopword ("Sarah Just") but keep at least one token
    while tokens.len() > 1 && tokens.last().map_or(false, |t| is_stopword(t)) {
        tokens.pop();
    }

    if tokens.is_empty() || tokens.iter().all(|t| is_stopword(t)) {
        return None;
    }
    Some(tokens)
}

fn is_name_token(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            token.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')
        }
        _ => false,
    }
}

/// First letter upper, rest lower (allowing inner capitals after ' or -, and Mc/Mac)
fn is_title_case(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() == 1 {
        return chars[0].is_uppercase();
    }
    if chars.iter().skip(1).all(|c| !c.is_uppercase()) {
        return true;
    }
    // O'Brien, Smith-Jones, McDonald
    chars.windows(2).skip(1).all(|w| !w[1].is_uppercase() || matches!(w[0], '\'' | '-'))
        || token.starts_with("Mc")
        || token.starts_with("Mac")
}

fn name_confidence(tokens: &[String], explicit_intro: bool) -> f64 {
    let mut confidence: f64 = 0.5;
    if explicit_intro {
        confidence += 0.3;
    }
    if tokens.iter().all(|t| is_title_case(t)) {
        confidence += 0.1;
    }
    if (2..=3).contains(&tokens.len()) {
        confidence += 0.1;
    }
    confidence.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(sentences: &[&str]) -> Option<String> {
        extract_name(sentences).value
    }

    #[test]
    fn test_my_name_is() {
        let result = extract_name(&["Hi, my name is Sarah Johnson.", "I need help."]);
        assert_eq!(result.value.as_deref(), Some("Sarah Johnson"));
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_title_pattern_wins_over_intro() {
        assert_eq!(
            name_of(&["I'm Dana.", "Everyone calls me Mrs. Alvarez."]).as_deref(),
            Some("Alvarez")
        );
    }

    #[test]
    fn test_real_name_pattern() {
        assert_eq!(
            name_of(&["People call me Dee but my real name is Deborah Kline."]).as_deref(),
            Some("Deborah Kline")
        );
    }

    #[test]
    fn test_rejection_phrase() {
        assert_eq!(name_of(&["I'm behind on Rent and Bills."]), None);
        assert_eq!(name_of(&["I am going to Lose everything."]), None);
    }

    #[test]
    fn test_stoplist_only_rejected() {
        assert_eq!(name_of(&["I'm Sorry.", "I am Desperate."]), None);
        assert_eq!(name_of(&["I'm so scared."]), None);
    }

    #[test]
    fn test_lowercase_capture_not_a_name() {
        assert_eq!(name_of(&["This is hard for me."]), None);
        assert_eq!(name_of(&["Call me at 555-123-4567."]), None);
    }

    #[test]
    fn test_later_intro_in_same_sentence() {
        assert_eq!(
            name_of(&["I'm so sorry, my name is Dana Cole."]).as_deref(),
            Some("Dana Cole")
        );
        assert_eq!(
            name_of(&["My name is Sarah and I'm behind on rent."]).as_deref(),
            Some("Sarah")
        );
    }

    #[test]
    fn test_stops_at_clause_end() {
        assert_eq!(
            name_of(&["I'm Marcus, And I live in Denver."]).as_deref(),
            Some("Marcus")
        );
    }

    #[test]
    fn test_at_most_four_tokens() {
        assert_eq!(
            name_of(&["My name is Ana Maria Lopez Garcia Ruiz"]).as_deref(),
            Some("Ana Maria Lopez Garcia")
        );
    }

    #[test]
    fn test_implicit_intro_confidence() {
        let result = extract_name(&["I'm Marcus."]);
        // 0.5 base + 0.1 capitalization
        assert!((result.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_no_sentences() {
        let empty: [&str; 0] = [];
        let result = extract_name(&empty);
        assert!(!result.is_found());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_title_case() {
        assert!(is_title_case("Sarah"));
        assert!(is_title_case("O'Brien"));
        assert!(is_title_case("McDonald"));
        assert!(!is_title_case("SARAH"));
    }
}

//! Fragment Normalizer
//!
//! Turns a raw speech-to-text transcript into cleaned text plus an
//! incompleteness penalty.
//!
//! # Processing Order
//!
//! 1. Strip control characters
//! 2. Remove emotional / bracketed artifacts (`*sigh*`, `[crying]`, `{inaudible}`, `(pause)`)
//! 3. Remove standard fillers (um, uh, er, hmm, ...)
//! 4. Remove conversational fillers (only when requested and frequent)
//! 5. Collapse stutters and letter elongations
//! 6. Reconstruct fragments (optional)
//! 7. Normalize whitespace
//!
//! Never fails: empty or whitespace-only input yields an empty cleaned text
//! with penalty 1.0.
//!
//! The penalty is divided by the content word count: cleaned words minus any
//! conversational fillers still present, so adding fillers never lowers it.

mod cleanup;
mod penalty;
mod reconstruction;
mod stutter;

pub use penalty::MarkerCounts;

use crate::extractors::text::{split_segments, word_count};
use crate::types::NormalizationResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static ELLIPSIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{3,}|…").expect("ellipsis pattern"));
static DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}|—").expect("dash pattern"));
static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,;:!?.…])").expect("punctuation spacing pattern"));
static REPEATED_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?:\s*,)+").expect("comma pattern"));

/// Normalizer switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Keep conversational fillers (like, you know, ...) unless `aggressive_mode` is set
    pub preserve_story_content: bool,
    pub aggressive_mode: bool,
    pub reconstruct_fragments: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            preserve_story_content: true,
            aggressive_mode: false,
            reconstruct_fragments: true,
        }
    }
}

impl NormalizeOptions {
    /// Options used for caller-provided sentences (already segmented)
    pub fn without_reconstruction(self) -> Self {
        Self {
            reconstruct_fragments: false,
            ..self
        }
    }

    fn strips_conversational_fillers(&self) -> bool {
        self.aggressive_mode || !self.preserve_story_content
    }
}

/// Normalize a transcript
pub fn normalize(text: &str, options: &NormalizeOptions) -> NormalizationResult {
    let (result, counts) = normalize_with_counts(text, options);
    debug!(
        cleaned_words = word_count(&result.cleaned_text),
        fillers_removed = result.removed_fillers.len(),
        reconstructions = result.reconstructions.len(),
        penalty = result.incompleteness_penalty,
        stutters = counts.stutters,
        "Normalized transcript"
    );
    result
}

/// Normalize and also return the raw marker counts behind the penalty
pub fn normalize_with_counts(text: &str, options: &NormalizeOptions) -> (NormalizationResult, MarkerCounts) {
    if text.trim().is_empty() {
        return (NormalizationResult::unusable(text), MarkerCounts::default());
    }

    let mut counts = MarkerCounts::default();
    let mut removed_fillers = Vec::new();

    let stripped = strip_control_chars(text);
    counts.ellipses = ELLIPSIS_RE.find_iter(&stripped).count();
    counts.dashes = DASH_RE.find_iter(&stripped).count();

    let (working, artifacts) = cleanup::remove_artifacts(&stripped);
    counts.emotional_artifacts = artifacts;

    let scan = cleanup::scan_fillers(&working);
    counts.fillers = scan.fillers;
    counts.filler_runs = scan.runs;

    let mut working = cleanup::remove_standard_fillers(&working, &mut removed_fillers);
    if options.strips_conversational_fillers() {
        working = cleanup::remove_conversational_fillers(&working, &mut removed_fillers);
    }

    let (working, stutters) = stutter::collapse_stutters(&working);
    let (working, elongations) = stutter::collapse_elongations(&working);
    counts.stutters = stutters + elongations;

    let segments = split_segments(&working);
    counts.hanging_conjunctions = reconstruction::count_hanging_conjunctions(&segments);

    let (working, reconstructions) = if options.reconstruct_fragments {
        reconstruction::reconstruct(segments)
    } else {
        (working, Vec::new())
    };

    let cleaned_text = normalize_whitespace(&working);
    let cleaned_words = word_count(&cleaned_text);
    // Conversational fillers left in the text are markers, not content
    let content_words =
        cleaned_words.saturating_sub(cleanup::conversational_word_count(&cleaned_text));
    let incompleteness_penalty = if cleaned_words == 0 {
        1.0
    } else {
        counts.penalty(content_words)
    };

    let result = NormalizationResult {
        cleaned_text: if cleaned_words == 0 { String::new() } else { cleaned_text },
        original_text: text.to_string(),
        removed_fillers,
        reconstructions,
        incompleteness_penalty,
    };
    (result, counts)
}

fn strip_control_chars(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Collapse whitespace, drop space before punctuation and stray leading punctuation
fn normalize_whitespace(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let tightened = SPACE_BEFORE_PUNCT_RE.replace_all(&collapsed, "$1");
    let commas = REPEATED_COMMA_RE.replace_all(&tightened, ",");
    commas
        .trim_start_matches(|c: char| matches!(c, ',' | ';' | ':') || c.is_whitespace())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str) -> String {
        normalize(text, &NormalizeOptions::default()).cleaned_text
    }

    #[test]
    fn test_empty_input_is_maximally_uncertain() {
        let result = normalize("   \n\t ", &NormalizeOptions::default());
        assert_eq!(result.cleaned_text, "");
        assert_eq!(result.incompleteness_penalty, 1.0);
        assert!(result.removed_fillers.is_empty());
    }

    #[test]
    fn test_only_fillers_is_unusable() {
        let result = normalize("um uh hmm", &NormalizeOptions::default());
        assert_eq!(result.cleaned_text, "");
        assert_eq!(result.incompleteness_penalty, 1.0);
        assert_eq!(result.removed_fillers, vec!["um", "uh", "hmm"]);
    }

    #[test]
    fn test_full_cleanup() {
        let text = "Um, hi, my name is... Sarah Johnson. *sigh* I i i need, uh, help with rent. It's sooo hard.";
        let result = normalize(text, &NormalizeOptions::default());
        assert_eq!(
            result.cleaned_text,
            "hi, my name is Sarah Johnson. I need help with rent. It's so hard."
        );
        assert_eq!(result.original_text, text);
        assert_eq!(result.reconstructions.len(), 1);
        assert!(result.incompleteness_penalty > 0.0);
        assert!(result.incompleteness_penalty <= 1.0);
    }

    #[test]
    fn test_clean_text_is_fixed_point() {
        let text = "Hi, my name is Sarah Johnson. I need help with rent money.";
        let once = clean(text);
        assert_eq!(once, text);
        assert_eq!(clean(&once), once);
        assert_eq!(normalize(text, &NormalizeOptions::default()).incompleteness_penalty, 0.0);
    }

    #[test]
    fn test_conversational_fillers_kept_by_default() {
        let text = "I like my job but like I was like laid off";
        assert_eq!(clean(text), text);

        let aggressive = NormalizeOptions {
            aggressive_mode: true,
            ..Default::default()
        };
        let result = normalize(text, &aggressive);
        assert!(!result.cleaned_text.contains("like"));
        assert_eq!(result.removed_fillers.iter().filter(|f| *f == "like").count(), 3);
    }

    #[test]
    fn test_reconstruction_can_be_disabled() {
        let options = NormalizeOptions::default().without_reconstruction();
        let result = normalize("My name is... Dana.", &options);
        assert_eq!(result.cleaned_text, "My name is... Dana.");
        assert!(result.reconstructions.is_empty());
    }

    #[test]
    fn test_control_chars_stripped() {
        assert_eq!(clean("I\u{0007} need\u{0000} help"), "I need help");
    }

    #[test]
    fn test_phone_and_email_survive() {
        let text = "Call (555) 123-4567 or mail sarah.j@example.com today.";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_penalty_grows_with_fillers() {
        let base = "I need help paying my rent this month because I lost my job recently";
        let noisy = "I need um uh help paying my rent um uh this month because I lost my job recently";
        let p0 = normalize(base, &NormalizeOptions::default()).incompleteness_penalty;
        let p1 = normalize(noisy, &NormalizeOptions::default()).incompleteness_penalty;
        assert!(p1 > p0);
        assert_eq!(clean(noisy), base);
    }

    #[test]
    fn test_kept_conversational_fillers_never_lower_penalty() {
        let options = NormalizeOptions::default();
        let base = "um uh I need help with my rent";
        let padded = "um uh I need help with my you know, like, you know rent";
        let p0 = normalize(base, &options).incompleteness_penalty;
        let p1 = normalize(padded, &options).incompleteness_penalty;
        assert!(p1 >= p0, "{} < {}", p1, p0);

        let long = "I need help paying my rent this month because I lost my job recently";
        let long_padded =
            "I need help you know paying my rent like this month because I lost my job you know recently";
        let q0 = normalize(long, &options).incompleteness_penalty;
        let q1 = normalize(long_padded, &options).incompleteness_penalty;
        assert!(q1 > q0, "{} <= {}", q1, q0);
    }
}

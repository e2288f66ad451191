// Missing-Field / Validation Reporter
//
// Concept: Flag fields a profile draft still needs, with a suggestion each
// Synchronization: Accepts coordinated fields + raw signals, outputs DataValidation
//
// Field identifiers, in report order:
//   name, category, goalAmount, story, contact, location,
//   medicalContext (HEALTHCARE without medical terms),
//   safetyContext  (SAFETY without safety terms)

use crate::extractors::text::{contains_phrase, word_count};
use crate::tables::{amount_range, is_stopword, MEDICAL_TERMS, SAFETY_TERMS, URGENCY_WORDS};
use crate::types::{Category, ContactCandidates, DataValidation, FieldExtraction};
use std::collections::BTreeMap;
use tracing::debug;

/// Everything the reporter looks at
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub fields: &'a FieldExtraction,
    pub contacts: &'a ContactCandidates,
    pub locations: &'a [String],
    /// Cleaned transcript
    pub story: &'a str,
    pub sentences: &'a [String],
}

/// Story thresholds
#[derive(Debug, Clone, Copy)]
pub struct StoryThresholds {
    pub min_words: usize,
    pub min_sentences: usize,
}

impl Default for StoryThresholds {
    fn default() -> Self {
        Self {
            min_words: 25,
            min_sentences: 2,
        }
    }
}

/// Missing-field reporter
///
/// **Legible Software Principle:**
/// - Independent module: pure function of its context
/// - Transparent behavior: thresholds are explicit
/// - Integrity: always returns a report, never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingFieldReporter {
    thresholds: StoryThresholds,
}

impl MissingFieldReporter {
    pub fn new(thresholds: StoryThresholds) -> Self {
        Self { thresholds }
    }

    pub fn report(&self, ctx: &ValidationContext<'_>) -> DataValidation {
        let story_word_count = word_count(ctx.story);
        let story_sentence_count = ctx.sentences.iter().filter(|s| word_count(s) > 0).count();
        let lower = ctx.story.to_lowercase();

        let mut missing: Vec<(&str, String)> = Vec::new();

        match ctx.fields.name.as_deref() {
            None => missing.push(("name", "Ask for the person's first and last name".to_string())),
            Some(name) if !looks_like_name(name) => missing.push((
                "name",
                format!("'{}' does not look like a name; confirm the person's name", name),
            )),
            Some(_) => {}
        }

        if ctx.fields.category.is_none() {
            missing.push((
                "category",
                "Ask what the funds are for (rent, medical bills, car repair, ...)".to_string(),
            ));
        }

        match (ctx.fields.goal_amount, ctx.fields.category) {
            (None, _) => missing.push(("goalAmount", "Ask how much money is needed".to_string())),
            (Some(amount), Some(category)) if !amount_range(category).is_plausible(amount) => {
                let range = amount_range(category);
                missing.push((
                    "goalAmount",
                    format!(
                        "${:.0} is outside the expected ${:.0}-${:.0} range for {}; confirm the amount",
                        amount,
                        0.5 * range.typical_low,
                        range.max_allowed,
                        category
                    ),
                ));
            }
            _ => {}
        }

        if story_word_count < self.thresholds.min_words || story_sentence_count < self.thresholds.min_sentences {
            missing.push((
                "story",
                format!(
                    "Story is short ({} words, {} sentences); ask what happened and how the funds will help",
                    story_word_count, story_sentence_count
                ),
            ));
        }

        if ctx.contacts.is_empty() {
            missing.push(("contact", "Ask for a phone number or email address".to_string()));
        }

        if ctx.locations.is_empty() {
            missing.push(("location", "Ask which city and state they live in".to_string()));
        }

        if ctx.fields.category == Some(Category::Healthcare)
            && !MEDICAL_TERMS.iter().any(|t| contains_phrase(&lower, t))
        {
            missing.push((
                "medicalContext",
                "Ask about the medical condition or treatment involved".to_string(),
            ));
        }

        if ctx.fields.category == Some(Category::Safety)
            && !SAFETY_TERMS.iter().any(|t| contains_phrase(&lower, t))
        {
            missing.push((
                "safetyContext",
                "Ask whether they are currently safe and what the safety concern is".to_string(),
            ));
        }

        debug!(
            missing = missing.len(),
            story_word_count, story_sentence_count, "Validation report built"
        );

        let missing_fields = missing.iter().map(|(field, _)| field.to_string()).collect();
        let suggestions: BTreeMap<String, String> = missing
            .into_iter()
            .map(|(field, suggestion)| (field.to_string(), suggestion))
            .collect();

        DataValidation {
            missing_fields,
            suggestions,
            story_word_count,
            story_sentence_count,
        }
    }
}

/// A name made only of stopwords or urgency words ("Just", "Critical", "Help Me") is not a name
fn looks_like_name(name: &str) -> bool {
    !name.split_whitespace().all(|word| {
        is_stopword(word) || URGENCY_WORDS.contains(&word.to_lowercase().as_str())
    })
}

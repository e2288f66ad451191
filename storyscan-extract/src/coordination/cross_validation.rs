// Round 1: cross-field validation
//
// Four independent pairwise checks. A check runs only when both of its
// fields are present.
//
// | Check              | Base | Adjustments                                              |
// |--------------------|------|----------------------------------------------------------|
// | category <-> amount| 0.9  | < 0.5 x typical low -0.3, > max -0.4, in typical +0.1    |
// | urgency <-> category| 1.0 | SAFETY low/med + safety terms -0.3,                      |
// |                    |      | CRITICAL w/o urgent category or temporal word -0.2,      |
// |                    |      | LOW + EMERGENCY -0.5                                     |
// | urgency <-> amount | 1.0  | LOW and > 10,000 -0.15, CRITICAL and < 200 -0.15         |
// | name <-> context   | 0.8  | contradiction -0.3, repeated mention +0.15,              |
// |                    |      | name is an urgency word -0.6                             |
//
// Confidences clamp to [0, 1]; consistent means confidence >= 0.6.

use crate::extractors::text::{contains_phrase, strip_token};
use crate::tables::{
    amount_range, CRITICAL_TEMPORAL_PHRASES, NAME_CONTRADICTION_PHRASES, SAFETY_TERMS,
    URGENCY_WORDS,
};
use crate::types::{Category, CrossValidationReport, FieldExtraction, UrgencyLevel, ValidationCheck};
use strsim::jaro_winkler;

/// Minimum confidence for a check to count as consistent
pub const CONSISTENT_THRESHOLD: f64 = 0.6;

/// Jaro-Winkler similarity for a transcript token to count as a name mention
const NAME_MENTION_SIMILARITY: f64 = 0.92;

const LARGE_AMOUNT_FOR_LOW_URGENCY: f64 = 10_000.0;
const SMALL_AMOUNT_FOR_CRITICAL_URGENCY: f64 = 200.0;

/// Accumulates a check's confidence and suggestions
struct CheckBuilder {
    confidence: f64,
    suggestions: Vec<String>,
}

impl CheckBuilder {
    fn new(base: f64) -> Self {
        Self {
            confidence: base,
            suggestions: Vec::new(),
        }
    }

    fn adjust(&mut self, delta: f64, suggestion: Option<String>) {
        self.confidence += delta;
        if let Some(s) = suggestion {
            self.suggestions.push(s);
        }
    }

    fn finish(self) -> ValidationCheck {
        let confidence = self.confidence.clamp(0.0, 1.0);
        ValidationCheck {
            is_consistent: confidence >= CONSISTENT_THRESHOLD,
            confidence,
            suggestions: self.suggestions,
        }
    }
}

/// Cross-field validator
///
/// **Legible Software Principle:**
/// - Independent module: pure function of fields and transcript
/// - Transparent behavior: every penalty is a visible constant
/// - Integrity: always returns a report, never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossValidator;

impl CrossValidator {
    /// Run every check whose fields are present
    pub fn validate(&self, fields: &FieldExtraction, transcript: &str) -> CrossValidationReport {
        let lower = transcript.to_lowercase();

        CrossValidationReport {
            category_amount: match (fields.category, fields.goal_amount) {
                (Some(category), Some(amount)) => Some(self.category_amount(category, amount)),
                _ => None,
            },
            urgency_category: match (fields.urgency_level, fields.category) {
                (Some(urgency), Some(category)) => Some(self.urgency_category(urgency, category, &lower)),
                _ => None,
            },
            urgency_amount: match (fields.urgency_level, fields.goal_amount) {
                (Some(urgency), Some(amount)) => Some(self.urgency_amount(urgency, amount)),
                _ => None,
            },
            name_context: fields
                .name
                .as_deref()
                .map(|name| self.name_context(name, &lower)),
        }
    }

    pub fn category_amount(&self, category: Category, amount: f64) -> ValidationCheck {
        let range = amount_range(category);
        let mut check = CheckBuilder::new(0.9);

        if amount < 0.5 * range.typical_low {
            check.adjust(
                -0.3,
                Some(format!(
                    "Amount ${:.0} is unusually low for {}; typical requests start around ${:.0}",
                    amount, category, range.typical_low
                )),
            );
        } else if amount > range.max_allowed {
            check.adjust(
                -0.4,
                Some(format!(
                    "Amount ${:.0} exceeds the ${:.0} maximum expected for {}",
                    amount, range.max_allowed, category
                )),
            );
        } else if amount >= range.typical_low && amount <= range.typical_high {
            check.adjust(0.1, None);
        }
        check.finish()
    }

    pub fn urgency_category(&self, urgency: UrgencyLevel, category: Category, lower: &str) -> ValidationCheck {
        let mut check = CheckBuilder::new(1.0);

        let safety_terms = SAFETY_TERMS.iter().any(|t| contains_phrase(lower, t));
        if category == Category::Safety
            && matches!(urgency, UrgencyLevel::Low | UrgencyLevel::Medium)
            && safety_terms
        {
            check.adjust(
                -0.3,
                Some("Safety concerns are described but urgency is low; review urgency".to_string()),
            );
        }

        let critical_words = CRITICAL_TEMPORAL_PHRASES.iter().any(|t| contains_phrase(lower, t));
        if urgency == UrgencyLevel::Critical && !category.is_urgent() && !critical_words {
            check.adjust(
                -0.2,
                Some(format!(
                    "CRITICAL urgency for {} without time-critical language; confirm urgency",
                    category
                )),
            );
        }

        if urgency == UrgencyLevel::Low && category == Category::Emergency {
            check.adjust(
                -0.5,
                Some("Emergency category with LOW urgency is contradictory".to_string()),
            );
        }
        check.finish()
    }

    pub fn urgency_amount(&self, urgency: UrgencyLevel, amount: f64) -> ValidationCheck {
        let mut check = CheckBuilder::new(1.0);

        if urgency == UrgencyLevel::Low && amount > LARGE_AMOUNT_FOR_LOW_URGENCY {
            check.adjust(
                -0.15,
                Some("Large amount requested with low urgency; confirm timeline".to_string()),
            );
        }
        if urgency == UrgencyLevel::Critical && amount < SMALL_AMOUNT_FOR_CRITICAL_URGENCY {
            check.adjust(
                -0.15,
                Some("Very small amount for a critical need; confirm the goal amount".to_string()),
            );
        }
        check.finish()
    }

    pub fn name_context(&self, name: &str, lower: &str) -> ValidationCheck {
        let mut check = CheckBuilder::new(0.8);

        if NAME_CONTRADICTION_PHRASES.iter().any(|p| contains_phrase(lower, p)) {
            check.adjust(
                -0.3,
                Some("Speaker corrected their name; confirm the name".to_string()),
            );
        }

        if let Some(first) = name.split_whitespace().next() {
            let first = first.to_lowercase();
            let mentions = lower
                .split_whitespace()
                .map(strip_token)
                .filter(|t| !t.is_empty() && jaro_winkler(t, &first) >= NAME_MENTION_SIMILARITY)
                .count();
            if mentions >= 2 {
                check.adjust(0.15, None);
            }
        }

        if URGENCY_WORDS.contains(&name.trim().to_lowercase().as_str()) {
            check.adjust(
                -0.6,
                Some(format!("'{}' looks like an urgency word, not a name", name)),
            );
        }
        check.finish()
    }
}

// Round 3: field enhancement
//
// Targeted overrides, applied in order:
//   1. OTHER -> SAFETY / HEALTHCARE / HOUSING on strong indicators
//   2. "personal situation ... not housing related ... not medical" forces OTHER
//   3. SAFETY + safety terms + LOW/MEDIUM urgency -> HIGH
//   4. critical-temporal words -> CRITICAL
//   5. HEALTHCARE amount < 500 with surgery/hospital/treatment -> x10 (if <= 20,000)
// Every override appends "<field>: <before> -> <after> (<reason>)".
//
// Rule 5 guesses at a dropped order of magnitude in a spoken number. It can
// misfire on a genuinely small medical ask, so its adjustment entry is the
// signal for human review.

use crate::extractors::text::contains_phrase;
use crate::tables::{AMOUNT_RECOVERY_TERMS, CRITICAL_TEMPORAL_PHRASES, SAFETY_TERMS, STRONG_INDICATORS};
use crate::types::{Category, FieldConfidences, FieldExtraction, UrgencyLevel};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Display;
use tracing::info;

/// Confidence floor for a promoted urgency
const PROMOTED_URGENCY_CONFIDENCE: f64 = 0.7;
/// Confidence given to a category forced from nothing to OTHER
const FORCED_OTHER_CONFIDENCE: f64 = 0.5;

const RECOVERY_THRESHOLD: f64 = 500.0;
const RECOVERY_FACTOR: f64 = 10.0;
const RECOVERY_CEILING: f64 = 20_000.0;

static VAGUE_DISCLOSURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)personal situation.{0,80}not housing[ -]related.{0,80}not medical")
        .expect("vague disclosure pattern")
});

/// Mutable working copy plus the adjustment log
pub struct Enhancer<'a> {
    fields: &'a mut FieldExtraction,
    confidences: &'a mut FieldConfidences,
    adjustments: &'a mut Vec<String>,
}

impl<'a> Enhancer<'a> {
    pub fn new(
        fields: &'a mut FieldExtraction,
        confidences: &'a mut FieldConfidences,
        adjustments: &'a mut Vec<String>,
    ) -> Self {
        Self {
            fields,
            confidences,
            adjustments,
        }
    }

    /// Apply every rule in order
    pub fn apply(mut self, transcript: &str) {
        let lower = transcript.to_lowercase();
        self.reclassify_other(&lower);
        self.guard_vague_disclosure(transcript);
        self.promote_safety_urgency(&lower);
        self.promote_critical_urgency(&lower);
        self.recover_healthcare_amount(&lower);
    }

    fn record(&mut self, field: &str, before: impl Display, after: impl Display, reason: &str) {
        let entry = format!("{}: {} -> {} ({})", field, before, after, reason);
        info!(adjustment = %entry, "Coordination adjustment");
        self.adjustments.push(entry);
    }

    fn reclassify_other(&mut self, lower: &str) {
        if self.fields.category != Some(Category::Other) {
            return;
        }
        let Some((category, indicator)) = STRONG_INDICATORS.iter().find_map(|(category, indicators)| {
            indicators
                .iter()
                .find(|i| contains_phrase(lower, i))
                .map(|i| (*category, *i))
        }) else {
            return;
        };
        self.fields.category = Some(category);
        self.record(
            "category",
            Category::Other,
            category,
            &format!("strong indicator '{}'", indicator),
        );
    }

    fn guard_vague_disclosure(&mut self, transcript: &str) {
        if !VAGUE_DISCLOSURE_RE.is_match(transcript) {
            return;
        }
        match self.fields.category {
            Some(Category::Other) => {}
            Some(before) => {
                self.fields.category = Some(Category::Other);
                self.record("category", before, Category::Other, "deliberately vague disclosure");
            }
            None => {
                self.fields.category = Some(Category::Other);
                self.confidences.category = FORCED_OTHER_CONFIDENCE;
                self.record("category", "none", Category::Other, "deliberately vague disclosure");
            }
        }
    }

    fn promote_safety_urgency(&mut self, lower: &str) {
        if self.fields.category != Some(Category::Safety) {
            return;
        }
        let Some(term) = SAFETY_TERMS.iter().find(|t| contains_phrase(lower, t)) else {
            return;
        };
        let before = self.fields.urgency_level;
        if !matches!(before, None | Some(UrgencyLevel::Low) | Some(UrgencyLevel::Medium)) {
            return;
        }
        self.fields.urgency_level = Some(UrgencyLevel::High);
        self.confidences.urgency = self.confidences.urgency.max(PROMOTED_URGENCY_CONFIDENCE);
        self.record(
            "urgencyLevel",
            level_label(before),
            UrgencyLevel::High,
            &format!("safety concern '{}'", term),
        );
    }

    fn promote_critical_urgency(&mut self, lower: &str) {
        let Some(word) = CRITICAL_TEMPORAL_PHRASES.iter().find(|t| contains_phrase(lower, t)) else {
            return;
        };
        let before = self.fields.urgency_level;
        if before == Some(UrgencyLevel::Critical) {
            return;
        }
        self.fields.urgency_level = Some(UrgencyLevel::Critical);
        self.confidences.urgency = self.confidences.urgency.max(PROMOTED_URGENCY_CONFIDENCE);
        self.record(
            "urgencyLevel",
            level_label(before),
            UrgencyLevel::Critical,
            &format!("time-critical word '{}'", word),
        );
    }

    fn recover_healthcare_amount(&mut self, lower: &str) {
        if self.fields.category != Some(Category::Healthcare) {
            return;
        }
        let Some(amount) = self.fields.goal_amount else {
            return;
        };
        if amount <= 0.0 || amount >= RECOVERY_THRESHOLD {
            return;
        }
        let Some(term) = AMOUNT_RECOVERY_TERMS.iter().find(|t| contains_phrase(lower, t)) else {
            return;
        };
        let recovered = amount * RECOVERY_FACTOR;
        if recovered > RECOVERY_CEILING {
            return;
        }
        self.fields.goal_amount = Some(recovered);
        self.record(
            "goalAmount",
            amount,
            recovered,
            &format!("low amount for '{}', assumed dropped magnitude", term),
        );
    }
}

fn level_label(level: Option<UrgencyLevel>) -> &'static str {
    level.map_or("none", UrgencyLevel::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enhance(fields: FieldExtraction, transcript: &str) -> (FieldExtraction, FieldConfidences, Vec<String>) {
        let mut fields = fields;
        let mut confidences = FieldConfidences {
            name: 0.0,
            category: 0.4,
            urgency: 0.3,
            goal_amount: 0.6,
        };
        let mut adjustments = Vec::new();
        Enhancer::new(&mut fields, &mut confidences, &mut adjustments).apply(transcript);
        (fields, confidences, adjustments)
    }

    #[test]
    fn test_other_reclassified_by_strong_indicator() {
        let (fields, _, adj) = enhance(
            FieldExtraction {
                category: Some(Category::Other),
                ..Default::default()
            },
            "I have been sleeping in my car for a week",
        );
        assert_eq!(fields.category, Some(Category::Housing));
        assert_eq!(adj, vec!["category: OTHER -> HOUSING (strong indicator 'sleeping in my car')"]);
    }

    #[test]
    fn test_vague_disclosure_forces_other() {
        let (fields, confidences, adj) = enhance(
            FieldExtraction::default(),
            "It's a personal situation. It's not housing related and it's not medical.",
        );
        assert_eq!(fields.category, Some(Category::Other));
        assert_eq!(confidences.category, 0.5);
        assert_eq!(adj.len(), 1);
    }

    #[test]
    fn test_safety_promotion_to_high() {
        let (fields, confidences, adj) = enhance(
            FieldExtraction {
                category: Some(Category::Safety),
                urgency_level: Some(UrgencyLevel::Low),
                ..Default::default()
            },
            "My ex keeps making threats and I live with abuse",
        );
        assert_eq!(fields.urgency_level, Some(UrgencyLevel::High));
        assert_eq!(confidences.urgency, 0.7);
        assert!(adj[0].starts_with("urgencyLevel: LOW -> HIGH"));
    }

    #[test]
    fn test_critical_temporal_promotion() {
        let (fields, _, adj) = enhance(
            FieldExtraction {
                category: Some(Category::Utilities),
                urgency_level: Some(UrgencyLevel::Medium),
                ..Default::default()
            },
            "The power gets shut off tomorrow",
        );
        assert_eq!(fields.urgency_level, Some(UrgencyLevel::Critical));
        assert_eq!(adj, vec!["urgencyLevel: MEDIUM -> CRITICAL (time-critical word 'tomorrow')"]);
    }

    #[test]
    fn test_healthcare_amount_recovery() {
        let (fields, _, adj) = enhance(
            FieldExtraction {
                category: Some(Category::Healthcare),
                goal_amount: Some(300.0),
                ..Default::default()
            },
            "I need surgery on my knee",
        );
        assert_eq!(fields.goal_amount, Some(3000.0));
        assert_eq!(adj.len(), 1);
        assert!(adj[0].starts_with("goalAmount: 300 -> 3000"));
    }

    #[test]
    fn test_no_recovery_without_terms() {
        let (fields, _, adj) = enhance(
            FieldExtraction {
                category: Some(Category::Healthcare),
                goal_amount: Some(300.0),
                ..Default::default()
            },
            "I need help with my prescription",
        );
        assert_eq!(fields.goal_amount, Some(300.0));
        assert!(adj.is_empty());
    }
}

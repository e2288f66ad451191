// Need category detector
//
// A category is emitted when at least one of its keywords is present and the
// transcript does not explicitly negate it ("not housing related").
//
// Weighting:
//   Flat           confidence = min(matched / 3, 1)
//   PhraseWeighted multi-word keywords count double
//
// Ordering: confidence desc, then the employment override, then the fixed
// category priority (Safety > Legal > Healthcare > ... > Other).

use crate::extractors::text::{contains_phrase, matched_phrases};
use crate::tables::{
    negation_labels, CATEGORY_KEYWORDS, FINANCIAL_DISTRESS_PHRASES, GENERIC_HELP_PHRASES,
    JOB_LOSS_PHRASES,
};
use crate::types::{Category, NeedCategory};
use std::cmp::Ordering;
use tracing::debug;

const KEYWORDS_FOR_FULL_CONFIDENCE: f64 = 3.0;
const GENERIC_HELP_CONFIDENCE: f64 = 0.3;

/// How matched keywords are weighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordWeighting {
    Flat,
    PhraseWeighted,
}

/// Detect need categories, sorted with the primary category first
pub fn detect_categories(text: &str, weighting: KeywordWeighting) -> Vec<NeedCategory> {
    let lower = text.to_lowercase();
    let mut entries: Vec<NeedCategory> = Vec::new();

    for (category, keywords) in CATEGORY_KEYWORDS {
        let matched = matched_phrases(&lower, keywords);
        if matched.is_empty() {
            continue;
        }
        if is_negated(&lower, *category) {
            debug!(category = %category, "Category explicitly negated");
            continue;
        }
        let weight: f64 = matched
            .iter()
            .map(|k| match weighting {
                KeywordWeighting::PhraseWeighted if k.contains(' ') => 2.0,
                _ => 1.0,
            })
            .sum();
        entries.push(NeedCategory {
            category: *category,
            keywords: matched.iter().map(|k| k.to_string()).collect(),
            confidence: (weight / KEYWORDS_FOR_FULL_CONFIDENCE).min(1.0),
        });
    }

    let employment_override = has_employment_override(&lower) && !is_negated(&lower, Category::Employment);
    if employment_override {
        apply_employment_override(&lower, &mut entries);
    }

    entries.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let a_promoted = employment_override && a.category == Category::Employment;
                let b_promoted = employment_override && b.category == Category::Employment;
                b_promoted.cmp(&a_promoted)
            })
            .then_with(|| a.category.priority_rank().cmp(&b.category.priority_rank()))
    });

    if entries.is_empty() {
        let help = matched_phrases(&lower, GENERIC_HELP_PHRASES);
        if !help.is_empty() {
            entries.push(NeedCategory {
                category: Category::Other,
                keywords: help.iter().map(|k| k.to_string()).collect(),
                confidence: GENERIC_HELP_CONFIDENCE,
            });
        }
    }

    debug!(
        primary = ?entries.first().map(|e| e.category),
        count = entries.len(),
        "Category detection complete"
    );
    entries
}

/// "not housing related" / "not housing-related"
pub fn is_negated(lower: &str, category: Category) -> bool {
    negation_labels(category).iter().any(|label| {
        contains_phrase(lower, &format!("not {} related", label))
            || contains_phrase(lower, &format!("not {}-related", label))
    })
}

/// Job loss and financial distress mentioned together
pub fn has_employment_override(lower: &str) -> bool {
    JOB_LOSS_PHRASES.iter().any(|p| contains_phrase(lower, p))
        && FINANCIAL_DISTRESS_PHRASES.iter().any(|p| contains_phrase(lower, p))
}

fn apply_employment_override(lower: &str, entries: &mut Vec<NeedCategory>) {
    let top = entries.iter().map(|e| e.confidence).fold(0.0_f64, f64::max);
    match entries.iter_mut().find(|e| e.category == Category::Employment) {
        Some(entry) => entry.confidence = entry.confidence.max(top),
        None => {
            let keywords: Vec<String> = matched_phrases(lower, JOB_LOSS_PHRASES)
                .iter()
                .map(|k| k.to_string())
                .collect();
            entries.push(NeedCategory {
                category: Category::Employment,
                keywords,
                confidence: top.max(1.0 / KEYWORDS_FOR_FULL_CONFIDENCE),
            });
        }
    }
    debug!("Employment override applied");
}

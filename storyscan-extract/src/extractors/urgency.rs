// Urgency assessment
//
// Legacy: keyword tiers critical/high/medium/low map to score ceilings
// 0.85/0.6/0.4/0.2; the highest matched tier wins, no match -> 0.3.
// Low-tier phrases are blanked out before the higher tiers are matched so
// "not urgent" never counts as "urgent".
//
// Layered: legacy score, then
//   temporal     +0.10
//   consequence  +0.10
//   intensifier  +0.05 per hit (max +0.10)
//   mitigation   -0.20
// clamped to [0, 1]; confidence 0.5 + 0.1 per layer fired, capped at 0.9.

use crate::extractors::text::{blank_phrase, matched_phrases};
use crate::tables::{
    CONSEQUENCE_PHRASES, INTENSIFIER_PHRASES, LOW_URGENCY_TIER, MITIGATION_PHRASES,
    TEMPORAL_PHRASES, URGENCY_TIERS,
};
use crate::types::{UrgencyAssessment, UrgencyLevel};
use tracing::debug;

const DEFAULT_SCORE: f64 = 0.3;

const TEMPORAL_BOOST: f64 = 0.10;
const CONSEQUENCE_BOOST: f64 = 0.10;
const INTENSIFIER_STEP: f64 = 0.05;
const INTENSIFIER_MAX: f64 = 0.10;
const MITIGATION_DROP: f64 = 0.20;

fn legacy_confidence(hits: usize) -> f64 {
    match hits {
        0 => 0.3,
        1 => 0.6,
        _ => 0.8,
    }
}

/// Keyword-tier urgency
pub fn assess_urgency(text: &str) -> UrgencyAssessment {
    let lower = text.to_lowercase();
    let (score, matched) = tier_score(&lower);
    let assessment = UrgencyAssessment {
        level: UrgencyLevel::from_score(score),
        score,
        confidence: legacy_confidence(matched.len()),
        matched,
    };
    debug!(
        level = %assessment.level,
        score = assessment.score,
        hits = assessment.matched.len(),
        "Legacy urgency assessed"
    );
    assessment
}

/// Highest matched tier score and every matched phrase
fn tier_score(lower: &str) -> (f64, Vec<String>) {
    let mut working = lower.to_string();
    let mut matched = Vec::new();
    let mut score: Option<f64> = None;

    let low_hits = matched_phrases(lower, LOW_URGENCY_TIER.phrases);
    if !low_hits.is_empty() {
        score = Some(LOW_URGENCY_TIER.score);
    }
    for phrase in low_hits {
        working = blank_phrase(&working, phrase);
        matched.push(phrase.to_string());
    }

    for tier in URGENCY_TIERS {
        let hits = matched_phrases(&working, tier.phrases);
        if hits.is_empty() {
            continue;
        }
        score = Some(score.map_or(tier.score, |s| s.max(tier.score)));
        matched.extend(hits.iter().map(|h| h.to_string()));
    }

    (score.unwrap_or(DEFAULT_SCORE), matched)
}

/// Multi-layer urgency built on top of the keyword tiers
pub fn assess_urgency_layered(text: &str) -> UrgencyAssessment {
    let lower = text.to_lowercase();
    let (base, mut matched) = tier_score(&lower);

    let mut score = base;
    let mut layers = usize::from(!matched.is_empty());

    let temporal = matched_phrases(&lower, TEMPORAL_PHRASES);
    if !temporal.is_empty() {
        score += TEMPORAL_BOOST;
        layers += 1;
    }

    let consequences = matched_phrases(&lower, CONSEQUENCE_PHRASES);
    if !consequences.is_empty() {
        score += CONSEQUENCE_BOOST;
        layers += 1;
    }

    let intensifiers = matched_phrases(&lower, INTENSIFIER_PHRASES);
    if !intensifiers.is_empty() {
        score += (INTENSIFIER_STEP * intensifiers.len() as f64).min(INTENSIFIER_MAX);
        layers += 1;
    }

    let mitigation = matched_phrases(&lower, MITIGATION_PHRASES);
    if !mitigation.is_empty() {
        score -= MITIGATION_DROP;
        layers += 1;
    }

    for phrase in temporal.iter().chain(&consequences).chain(&intensifiers).chain(&mitigation) {
        if !matched.iter().any(|m| m == phrase) {
            matched.push(phrase.to_string());
        }
    }

    let score = score.clamp(0.0, 1.0);
    let assessment = UrgencyAssessment {
        level: UrgencyLevel::from_score(score),
        score,
        confidence: (0.5 + 0.1 * layers as f64).min(0.9),
        matched,
    };
    debug!(
        level = %assessment.level,
        base,
        score = assessment.score,
        layers,
        "Layered urgency assessed"
    );
    assessment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_medium_low() {
        let a = assess_urgency("I would like some help.");
        assert_eq!(a.score, 0.3);
        assert_eq!(a.level, UrgencyLevel::Medium);
        assert_eq!(a.confidence, 0.3);
    }

    #[test]
    fn test_highest_tier_wins() {
        let a = assess_urgency("It's urgent, this is an emergency.");
        assert_eq!(a.score, 0.85);
        assert_eq!(a.level, UrgencyLevel::Critical);
        assert_eq!(a.confidence, 0.8);
    }

    #[test]
    fn test_not_urgent_is_low() {
        let a = assess_urgency("It's not urgent, no rush at all.");
        assert_eq!(a.score, 0.2);
        assert_eq!(a.level, UrgencyLevel::Low);
        assert!(!a.matched.contains(&"urgent".to_string()));
    }

    #[test]
    fn test_high_tier() {
        let a = assess_urgency("I'm behind on rent.");
        assert_eq!(a.level, UrgencyLevel::High);
        assert_eq!(a.confidence, 0.6);
    }

    #[test]
    fn test_layers_raise_score() {
        let legacy = assess_urgency("I'm behind on rent and will be evicted by friday, please.");
        let layered = assess_urgency_layered("I'm behind on rent and will be evicted by friday, please.");
        assert!(layered.score > legacy.score);
        // tiers + temporal + consequence + intensifier
        assert!((layered.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_mitigation_lowers_score() {
        let a = assess_urgency_layered("No rush, things are manageable.");
        assert_eq!(a.level, UrgencyLevel::Low);
        assert!(a.score < 0.2);
    }

    #[test]
    fn test_layered_score_bounded() {
        let a = assess_urgency_layered(
            "Emergency! Today, right now, evicted, shut off, really very extremely desperately please",
        );
        assert!(a.score <= 1.0);
        assert_eq!(a.level, UrgencyLevel::Critical);
    }
}

// Scoring strategies for the category and urgency signals
//
// One strategy trait per signal, selected by configuration and injected into
// the pipeline. Fixed fallback chain:
//   configured scorer -> legacy scorer (infallible)
// The optional remote urgency scorer is async and sits in front of the local
// chain: remote -> configured -> legacy.
//
// Contract: a scorer error never reaches the caller. The fallback result is
// returned together with the engine that actually produced it and a warning tag.

pub mod remote;
pub mod strategies;

pub use remote::{score_remote, RemoteUrgencyScorer};
pub use strategies::{
    EnhancedCategoryScorer, LegacyCategoryScorer, LegacyUrgencyScorer, MultiLayerUrgencyScorer,
};

use crate::types::{NeedCategory, ScoringError, UrgencyAssessment};
use tracing::warn;

pub const CATEGORY_FALLBACK_WARNING: &str = "category_scorer_fallback";
pub const URGENCY_FALLBACK_WARNING: &str = "urgency_scorer_fallback";

/// Category scoring strategy
pub trait CategoryScorer: Send + Sync {
    /// Engine identifier reported in `ExtractedSignals::engines`
    fn name(&self) -> &'static str;

    /// Need categories sorted with the primary category first
    fn score(&self, text: &str) -> Result<Vec<NeedCategory>, ScoringError>;
}

/// Urgency scoring strategy
pub trait UrgencyScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, text: &str) -> Result<UrgencyAssessment, ScoringError>;
}

/// Scorer output plus the engine that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSignal<T> {
    pub value: T,
    pub engine: String,
    pub warning: Option<&'static str>,
}

impl<T> ScoredSignal<T> {
    fn primary(value: T, engine: &str) -> Self {
        Self {
            value,
            engine: engine.to_string(),
            warning: None,
        }
    }

    fn fallback(value: T, engine: &str, warning: &'static str) -> Self {
        Self {
            value,
            engine: format!("{} (fallback)", engine),
            warning: Some(warning),
        }
    }
}

/// Run a category scorer, falling back to the legacy scorer on error
pub fn score_categories(scorer: &dyn CategoryScorer, text: &str) -> ScoredSignal<Vec<NeedCategory>> {
    match scorer.score(text) {
        Ok(categories) => ScoredSignal::primary(categories, scorer.name()),
        Err(e) => {
            warn!(engine = scorer.name(), error = %e, "Category scorer failed, using legacy");
            let legacy = LegacyCategoryScorer;
            ScoredSignal::fallback(legacy.detect(text), legacy.name(), CATEGORY_FALLBACK_WARNING)
        }
    }
}

/// Run an urgency scorer, falling back to the legacy scorer on error
pub fn score_urgency(scorer: &dyn UrgencyScorer, text: &str) -> ScoredSignal<UrgencyAssessment> {
    match scorer.score(text) {
        Ok(assessment) => ScoredSignal::primary(assessment, scorer.name()),
        Err(e) => {
            warn!(engine = scorer.name(), error = %e, "Urgency scorer failed, using legacy");
            let legacy = LegacyUrgencyScorer;
            ScoredSignal::fallback(legacy.assess(text), legacy.name(), URGENCY_FALLBACK_WARNING)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    struct FailingCategory;

    impl CategoryScorer for FailingCategory {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn score(&self, _text: &str) -> Result<Vec<NeedCategory>, ScoringError> {
            Err(ScoringError::Internal("boom".to_string()))
        }
    }

    struct FailingUrgency;

    impl UrgencyScorer for FailingUrgency {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn score(&self, _text: &str) -> Result<UrgencyAssessment, ScoringError> {
            Err(ScoringError::InputTooLarge { len: 10, limit: 5 })
        }
    }

    #[test]
    fn test_primary_engine_reported() {
        let scored = score_categories(&EnhancedCategoryScorer::default(), "I need rent money");
        assert_eq!(scored.engine, "enhanced");
        assert!(scored.warning.is_none());
        assert_eq!(scored.value[0].category, Category::Housing);
    }

    #[test]
    fn test_category_fallback_to_legacy() {
        let scored = score_categories(&FailingCategory, "I need rent money");
        assert_eq!(scored.engine, "legacy (fallback)");
        assert_eq!(scored.warning, Some(CATEGORY_FALLBACK_WARNING));
        assert_eq!(scored.value[0].category, Category::Housing);
    }

    #[test]
    fn test_urgency_fallback_to_legacy() {
        let scored = score_urgency(&FailingUrgency, "this is an emergency");
        assert_eq!(scored.engine, "legacy (fallback)");
        assert_eq!(scored.warning, Some(URGENCY_FALLBACK_WARNING));
        assert_eq!(scored.value.score, 0.85);
    }
}

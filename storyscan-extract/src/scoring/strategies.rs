//! Local scoring strategies
//!
//! The legacy scorers are infallible and terminate every fallback chain.
//! The enhanced scorers refuse transcripts longer than `max_chars`.

use super::{CategoryScorer, UrgencyScorer};
use crate::extractors::category::{detect_categories, KeywordWeighting};
use crate::extractors::urgency::{assess_urgency, assess_urgency_layered};
use crate::types::{NeedCategory, ScoringError, UrgencyAssessment};

/// Default input limit for the enhanced scorers
pub const DEFAULT_MAX_CHARS: usize = 20_000;

fn check_length(text: &str, limit: usize) -> Result<(), ScoringError> {
    let len = text.chars().count();
    if len > limit {
        return Err(ScoringError::InputTooLarge { len, limit });
    }
    Ok(())
}

/// Flat keyword-count category scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCategoryScorer;

impl LegacyCategoryScorer {
    pub fn detect(&self, text: &str) -> Vec<NeedCategory> {
        detect_categories(text, KeywordWeighting::Flat)
    }
}

impl CategoryScorer for LegacyCategoryScorer {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn score(&self, text: &str) -> Result<Vec<NeedCategory>, ScoringError> {
        Ok(self.detect(text))
    }
}

/// Phrase-weighted category scorer
#[derive(Debug, Clone, Copy)]
pub struct EnhancedCategoryScorer {
    max_chars: usize,
}

impl EnhancedCategoryScorer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for EnhancedCategoryScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl CategoryScorer for EnhancedCategoryScorer {
    fn name(&self) -> &'static str {
        "enhanced"
    }

    fn score(&self, text: &str) -> Result<Vec<NeedCategory>, ScoringError> {
        check_length(text, self.max_chars)?;
        Ok(detect_categories(text, KeywordWeighting::PhraseWeighted))
    }
}

/// Keyword-tier urgency scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyUrgencyScorer;

impl LegacyUrgencyScorer {
    pub fn assess(&self, text: &str) -> UrgencyAssessment {
        assess_urgency(text)
    }
}

impl UrgencyScorer for LegacyUrgencyScorer {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn score(&self, text: &str) -> Result<UrgencyAssessment, ScoringError> {
        Ok(self.assess(text))
    }
}

/// Layered urgency scorer (temporal, consequence, intensifier, mitigation)
#[derive(Debug, Clone, Copy)]
pub struct MultiLayerUrgencyScorer {
    max_chars: usize,
}

impl MultiLayerUrgencyScorer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for MultiLayerUrgencyScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl UrgencyScorer for MultiLayerUrgencyScorer {
    fn name(&self) -> &'static str {
        "multilayer"
    }

    fn score(&self, text: &str) -> Result<UrgencyAssessment, ScoringError> {
        check_length(text, self.max_chars)?;
        Ok(assess_urgency_layered(text))
    }
}

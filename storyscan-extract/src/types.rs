//! Shared Types and Data Contracts
//!
//! Defines the explicit contracts between the pipeline stages:
//! raw transcript → normalized text → atomic signals → coordinated signals → validation report.
//!
//! Every record here is created fresh per call. The coordination engine produces a new
//! `FieldExtraction` / `FieldConfidences` pair instead of mutating the extractor outputs,
//! and logs each override in `CoordinationResult::adjustments`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Input
// ============================================================================

/// Transcript handed to the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptInput {
    pub text: String,
    /// Pre-segmented sentences; derived from `text` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
}

impl TranscriptInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sentences: None,
            language_hint: None,
        }
    }

    pub fn with_sentences(mut self, sentences: Vec<String>) -> Self {
        self.sentences = Some(sentences);
        self
    }

    pub fn with_language_hint(mut self, hint: impl Into<String>) -> Self {
        self.language_hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Output of the fragment normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationResult {
    pub cleaned_text: String,
    pub original_text: String,
    pub removed_fillers: Vec<String>,
    pub reconstructions: Vec<String>,
    /// [0.0, 1.0]
    pub incompleteness_penalty: f64,
}

impl NormalizationResult {
    /// Maximally uncertain result for empty or unusable input
    pub fn unusable(original: &str) -> Self {
        Self {
            cleaned_text: String::new(),
            original_text: original.to_string(),
            removed_fillers: Vec::new(),
            reconstructions: Vec::new(),
            incompleteness_penalty: 1.0,
        }
    }
}

// ============================================================================
// Signal vocabularies
// ============================================================================

/// Need category labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Safety,
    Legal,
    Healthcare,
    Housing,
    Utilities,
    Employment,
    Food,
    Transportation,
    Education,
    Childcare,
    Family,
    MentalHealth,
    Addiction,
    Emergency,
    Other,
}

impl Category {
    /// All categories in conflict-resolution priority order (highest first)
    pub const PRIORITY_ORDER: [Category; 15] = [
        Category::Safety,
        Category::Legal,
        Category::Healthcare,
        Category::Housing,
        Category::Utilities,
        Category::Employment,
        Category::Food,
        Category::Transportation,
        Category::Education,
        Category::Childcare,
        Category::Family,
        Category::MentalHealth,
        Category::Addiction,
        Category::Emergency,
        Category::Other,
    ];

    /// Position in the priority order; lower wins
    pub fn priority_rank(self) -> usize {
        Self::PRIORITY_ORDER
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::PRIORITY_ORDER.len())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safety => "SAFETY",
            Self::Legal => "LEGAL",
            Self::Healthcare => "HEALTHCARE",
            Self::Housing => "HOUSING",
            Self::Utilities => "UTILITIES",
            Self::Employment => "EMPLOYMENT",
            Self::Food => "FOOD",
            Self::Transportation => "TRANSPORTATION",
            Self::Education => "EDUCATION",
            Self::Childcare => "CHILDCARE",
            Self::Family => "FAMILY",
            Self::MentalHealth => "MENTAL_HEALTH",
            Self::Addiction => "ADDICTION",
            Self::Emergency => "EMERGENCY",
            Self::Other => "OTHER",
        }
    }

    /// Categories that justify CRITICAL urgency on their own
    pub fn is_urgent(self) -> bool {
        matches!(self, Self::Safety | Self::Healthcare | Self::Emergency)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency level, ordered LOW < MEDIUM < HIGH < CRITICAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    /// Map an urgency score to a level
    ///
    /// ≥ 0.8 CRITICAL, ≥ 0.55 HIGH, ≥ 0.3 MEDIUM, else LOW
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Critical
        } else if score >= 0.55 {
            Self::High
        } else if score >= 0.3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lowest score that maps to this level
    pub fn floor_score(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 0.3,
            Self::High => 0.55,
            Self::Critical => 0.8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Atomic extractor outputs
// ============================================================================

/// Which extractor or scorer produced a value (provenance)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    NamePatterns,
    ContactPatterns,
    LocationPatterns,
    LegacyCategory,
    EnhancedCategory,
    LegacyUrgency,
    MultiLayerUrgency,
    RemoteUrgency,
    AmountPatterns,
}

/// Value (or its absence) plus confidence from one extractor
///
/// Contract: a miss is `value: None, confidence: 0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorResult<T> {
    pub value: Option<T>,
    /// [0.0, 1.0]
    pub confidence: f64,
    pub source: ExtractionSource,
}

impl<T> ExtractorResult<T> {
    pub fn found(value: T, confidence: f64, source: ExtractionSource) -> Self {
        Self {
            value: Some(value),
            confidence: confidence.clamp(0.0, 1.0),
            source,
        }
    }

    pub fn miss(source: ExtractionSource) -> Self {
        Self {
            value: None,
            confidence: 0.0,
            source,
        }
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

/// Detected need category with its matched keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedCategory {
    pub category: Category,
    /// Never empty
    pub keywords: Vec<String>,
    pub confidence: f64,
}

/// Urgency assessment from a scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyAssessment {
    pub level: UrgencyLevel,
    pub score: f64,
    pub confidence: f64,
    pub matched: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCandidates {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactCandidates {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

// ============================================================================
// Coordination
// ============================================================================

/// The coordinatable record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldExtraction {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub urgency_level: Option<UrgencyLevel>,
    pub goal_amount: Option<f64>,
}

/// Per-field confidences parallel to `FieldExtraction`; absent fields carry 0.0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfidences {
    pub name: f64,
    pub category: f64,
    pub urgency: f64,
    pub goal_amount: f64,
}

impl FieldConfidences {
    pub fn all(&self) -> [f64; 4] {
        [self.name, self.category, self.urgency, self.goal_amount]
    }
}

/// Result of one pairwise cross-field check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationCheck {
    pub is_consistent: bool,
    pub confidence: f64,
    pub suggestions: Vec<String>,
}

/// The four pairwise checks; `None` when a check's fields were absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossValidationReport {
    pub category_amount: Option<ValidationCheck>,
    pub urgency_category: Option<ValidationCheck>,
    pub urgency_amount: Option<ValidationCheck>,
    pub name_context: Option<ValidationCheck>,
}

impl CrossValidationReport {
    /// Confidences of the checks that actually ran
    pub fn confidences(&self) -> Vec<f64> {
        [
            self.category_amount.as_ref(),
            self.urgency_category.as_ref(),
            self.urgency_amount.as_ref(),
            self.name_context.as_ref(),
        ]
        .into_iter()
        .flatten()
        .map(|c| c.confidence)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinationResult {
    pub fields: FieldExtraction,
    pub confidences: FieldConfidences,
    /// [0.0, 1.0]
    pub consistency_score: f64,
    pub warnings: Vec<String>,
    /// One entry per overridden value, with before/after and reason
    pub adjustments: Vec<String>,
    pub validations: CrossValidationReport,
}

// ============================================================================
// Final output
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValidation {
    pub missing_fields: Vec<String>,
    pub suggestions: BTreeMap<String, String>,
    pub story_word_count: usize,
    pub story_sentence_count: usize,
}

/// Which engines actually produced category and urgency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineReport {
    pub category: String,
    pub urgency: String,
}

/// Complete pipeline output, always fully populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSignals {
    pub name_candidate: Option<String>,
    pub name_confidence: f64,
    pub contact_candidates: ContactCandidates,
    pub location_candidates: Vec<String>,
    pub location_confidence: f64,
    pub needs_categories: Vec<NeedCategory>,
    pub primary_category: Option<Category>,
    pub urgency_level: UrgencyLevel,
    pub urgency_score: f64,
    pub goal_amount: Option<f64>,
    /// At most 7, in source order
    pub key_points: Vec<String>,
    pub normalization: NormalizationResult,
    pub coordination: CoordinationResult,
    pub missing_fields: Vec<String>,
    pub data_validation: DataValidation,
    pub warnings: Vec<String>,
    pub engines: EngineReport,
}

impl ExtractedSignals {
    /// Every confidence value carried by this record
    pub fn all_confidences(&self) -> Vec<f64> {
        let mut values = vec![
            self.name_confidence,
            self.location_confidence,
            self.urgency_score,
            self.coordination.consistency_score,
            self.normalization.incompleteness_penalty,
        ];
        values.extend(self.coordination.confidences.all());
        values.extend(self.needs_categories.iter().map(|c| c.confidence));
        values.extend(self.coordination.validations.confidences());
        values
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure inside an optional scoring strategy; always recovered by fallback
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Input too large: {len} chars exceeds limit {limit}")]
    InputTooLarge { len: usize, limit: usize },

    #[error("Scorer timed out after {0} ms")]
    Timeout(u64),

    #[error("Scorer cancelled")]
    Cancelled,

    #[error("Remote scorer error: {0}")]
    Remote(String),

    #[error("Internal scorer error: {0}")]
    Internal(String),
}

/// Failure inside the coordination engine; recovered by the uncoordinated fallback
#[derive(Debug, Error)]
pub enum CoordinationError {
    #[error("Goal amount is not a finite number: {0}")]
    NonFiniteAmount(f64),

    #[error("Confidence for '{field}' is not a finite number")]
    NonFiniteConfidence { field: &'static str },

    #[error("Internal coordination error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_level_ordering() {
        assert!(UrgencyLevel::Low < UrgencyLevel::Medium);
        assert!(UrgencyLevel::High < UrgencyLevel::Critical);
    }

    #[test]
    fn test_urgency_from_score_thresholds() {
        assert_eq!(UrgencyLevel::from_score(0.85), UrgencyLevel::Critical);
        assert_eq!(UrgencyLevel::from_score(0.6), UrgencyLevel::High);
        assert_eq!(UrgencyLevel::from_score(0.3), UrgencyLevel::Medium);
        assert_eq!(UrgencyLevel::from_score(0.2), UrgencyLevel::Low);
    }

    #[test]
    fn test_category_priority() {
        assert_eq!(Category::Safety.priority_rank(), 0);
        assert!(Category::Housing.priority_rank() < Category::Employment.priority_rank());
        assert_eq!(Category::Other.priority_rank(), 14);
    }

    #[test]
    fn test_serialization_labels() {
        assert_eq!(
            serde_json::to_string(&Category::MentalHealth).unwrap(),
            "\"MENTAL_HEALTH\""
        );
        assert_eq!(serde_json::to_string(&UrgencyLevel::Critical).unwrap(), "\"CRITICAL\"");
    }

    #[test]
    fn test_extractor_result_clamps() {
        let r = ExtractorResult::found("x", 1.7, ExtractionSource::NamePatterns);
        assert_eq!(r.confidence, 1.0);
        let miss: ExtractorResult<String> = ExtractorResult::miss(ExtractionSource::NamePatterns);
        assert!(!miss.is_found());
        assert_eq!(miss.confidence, 0.0);
    }
}

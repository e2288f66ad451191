//! Coordination Engine
//!
//! Three rounds applied once per call over the atomic extractor outputs:
//!
//! 1. **Cross-field validation** ([`cross_validation`]): four pairwise checks
//! 2. **Confidence calibration** ([`calibration`]): nudge field confidences by
//!    the checks, compute the consistency score
//! 3. **Field enhancement** ([`enhancement`]): targeted, logged overrides
//!
//! The engine never fails. Invalid input (non-finite amount or confidence)
//! produces the uncoordinated fields with `consistency_score = 0.5` and a
//! single `"coordination_failed"` warning.

pub mod calibration;
pub mod cross_validation;
pub mod enhancement;

use crate::types::{
    CoordinationError, CoordinationResult, CrossValidationReport, FieldConfidences, FieldExtraction,
};
use calibration::{calibrate, consistency_score};
use cross_validation::CrossValidator;
use enhancement::Enhancer;
use tracing::{debug, warn};

pub const COORDINATION_FAILED_WARNING: &str = "coordination_failed";

const FALLBACK_CONSISTENCY: f64 = 0.5;

/// Coordination engine
///
/// **Legible Software Principle:**
/// - Independent module: consumes extractor outputs, returns a new record
/// - Explicit synchronization: `FieldExtraction` + `FieldConfidences` in, `CoordinationResult` out
/// - Transparent behavior: every override is logged in `adjustments`
/// - Integrity: failures degrade to the uncoordinated fields
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinationEngine {
    validator: CrossValidator,
}

impl CoordinationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinate extracted fields; always returns a result
    pub fn coordinate(
        &self,
        fields: &FieldExtraction,
        confidences: &FieldConfidences,
        transcript: &str,
    ) -> CoordinationResult {
        match self.try_coordinate(fields, confidences, transcript) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Coordination failed, returning uncoordinated fields");
                Self::uncoordinated(fields, confidences)
            }
        }
    }

    /// Coordinate extracted fields, surfacing invalid input as an error
    pub fn try_coordinate(
        &self,
        fields: &FieldExtraction,
        confidences: &FieldConfidences,
        transcript: &str,
    ) -> Result<CoordinationResult, CoordinationError> {
        Self::check_inputs(fields, confidences)?;

        // Round 1
        let validations = self.validator.validate(fields, transcript);
        let warnings = inconsistency_warnings(&validations);

        // Round 2
        let mut coordinated_confidences = calibrate(fields, confidences, &validations);
        let consistency = consistency_score(&validations);

        // Round 3
        let mut coordinated = fields.clone();
        let mut adjustments = Vec::new();
        Enhancer::new(&mut coordinated, &mut coordinated_confidences, &mut adjustments).apply(transcript);

        if coordinated.goal_amount.map_or(false, |a| !a.is_finite()) {
            return Err(CoordinationError::Internal(
                "enhancement produced a non-finite amount".to_string(),
            ));
        }

        debug!(
            consistency,
            checks = validations.confidences().len(),
            adjustments = adjustments.len(),
            "Coordination complete"
        );

        Ok(CoordinationResult {
            fields: coordinated,
            confidences: coordinated_confidences,
            consistency_score: consistency,
            warnings,
            adjustments,
            validations,
        })
    }

    fn check_inputs(fields: &FieldExtraction, confidences: &FieldConfidences) -> Result<(), CoordinationError> {
        if let Some(amount) = fields.goal_amount {
            if !amount.is_finite() {
                return Err(CoordinationError::NonFiniteAmount(amount));
            }
        }
        let named = [
            ("name", confidences.name),
            ("category", confidences.category),
            ("urgency", confidences.urgency),
            ("goalAmount", confidences.goal_amount),
        ];
        if let Some((field, _)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CoordinationError::NonFiniteConfidence { field: *field });
        }
        Ok(())
    }

    /// Fallback result: input fields as-is, sanitized
    fn uncoordinated(fields: &FieldExtraction, confidences: &FieldConfidences) -> CoordinationResult {
        let sanitize = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        let mut fields = fields.clone();
        fields.goal_amount = fields.goal_amount.filter(|a| a.is_finite());

        CoordinationResult {
            fields,
            confidences: FieldConfidences {
                name: sanitize(confidences.name),
                category: sanitize(confidences.category),
                urgency: sanitize(confidences.urgency),
                goal_amount: sanitize(confidences.goal_amount),
            },
            consistency_score: FALLBACK_CONSISTENCY,
            warnings: vec![COORDINATION_FAILED_WARNING.to_string()],
            adjustments: Vec::new(),
            validations: CrossValidationReport::default(),
        }
    }
}

fn inconsistency_warnings(report: &CrossValidationReport) -> Vec<String> {
    let checks = [
        ("category_amount_inconsistent", report.category_amount.as_ref()),
        ("urgency_category_inconsistent", report.urgency_category.as_ref()),
        ("urgency_amount_inconsistent", report.urgency_amount.as_ref()),
        ("name_context_inconsistent", report.name_context.as_ref()),
    ];
    checks
        .into_iter()
        .filter(|(_, check)| check.map_or(false, |c| !c.is_consistent))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, UrgencyLevel};

    fn confidences() -> FieldConfidences {
        FieldConfidences {
            name: 0.9,
            category: 0.6,
            urgency: 0.6,
            goal_amount: 0.85,
        }
    }

    #[test]
    fn test_nan_amount_falls_back() {
        let fields = FieldExtraction {
            name: Some("Sarah".to_string()),
            category: Some(Category::Housing),
            urgency_level: Some(UrgencyLevel::High),
            goal_amount: Some(f64::NAN),
        };
        let result = CoordinationEngine::new().coordinate(&fields, &confidences(), "rent");
        assert_eq!(result.consistency_score, 0.5);
        assert_eq!(result.warnings, vec!["coordination_failed"]);
        assert_eq!(result.fields.goal_amount, None);
        assert_eq!(result.fields.category, Some(Category::Housing));
    }

    #[test]
    fn test_nan_confidence_falls_back() {
        let mut c = confidences();
        c.urgency = f64::INFINITY;
        let result = CoordinationEngine::new().coordinate(&FieldExtraction::default(), &c, "");
        assert_eq!(result.warnings, vec!["coordination_failed"]);
        assert_eq!(result.confidences.urgency, 0.0);
        assert!(matches!(
            CoordinationEngine::new().try_coordinate(&FieldExtraction::default(), &c, ""),
            Err(CoordinationError::NonFiniteConfidence { field: "urgency" })
        ));
    }

    #[test]
    fn test_empty_fields_fully_consistent() {
        let result = CoordinationEngine::new().coordinate(
            &FieldExtraction::default(),
            &FieldConfidences::default(),
            "",
        );
        assert_eq!(result.consistency_score, 1.0);
        assert!(result.warnings.is_empty());
        assert!(result.adjustments.is_empty());
        assert_eq!(result.confidences, FieldConfidences::default());
    }

    #[test]
    fn test_safety_low_urgency_promoted() {
        let fields = FieldExtraction {
            name: None,
            category: Some(Category::Safety),
            urgency_level: Some(UrgencyLevel::Low),
            goal_amount: None,
        };
        let result = CoordinationEngine::new().coordinate(
            &fields,
            &confidences(),
            "My partner is abusive and made a threat against me",
        );
        assert!(result.fields.urgency_level >= Some(UrgencyLevel::High));
        assert!(result.adjustments.iter().any(|a| a.starts_with("urgencyLevel: LOW -> HIGH")));
        // validation ran on the uncoordinated urgency
        assert!(result.validations.urgency_category.as_ref().map_or(false, |c| c.confidence < 1.0));
    }

    #[test]
    fn test_inconsistency_warning() {
        let fields = FieldExtraction {
            category: Some(Category::Food),
            goal_amount: Some(90_000.0),
            ..Default::default()
        };
        let result = CoordinationEngine::new().coordinate(&fields, &confidences(), "groceries");
        assert!(result.warnings.contains(&"category_amount_inconsistent".to_string()));
        assert!(result.consistency_score < 0.6);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let fields = FieldExtraction {
            category: Some(Category::Other),
            ..Default::default()
        };
        let result = CoordinationEngine::new().coordinate(&fields, &confidences(), "chemo starts soon");
        assert_eq!(fields.category, Some(Category::Other));
        assert_eq!(result.fields.category, Some(Category::Healthcare));
    }
}

// Round 2: confidence calibration
//
// Each present field's confidence shifts by its related check:
//   category     0.2 x (category<->amount   - 1)
//   urgency      0.3 x (urgency<->category  - 1)
//   goal amount  0.2 x (category<->amount   - 1)
//   name         0.3 x (name<->context      - 1)
// then clamps to [0.1, 0.95]. Absent fields keep confidence 0.
//
// Consistency score: mean of the check confidences, minus 0.1 per check
// below 0.6, clamped to [0.1, 1.0]; 1.0 when no check ran.

use super::cross_validation::CONSISTENT_THRESHOLD;
use crate::types::{CrossValidationReport, FieldConfidences, FieldExtraction, ValidationCheck};

const CALIBRATED_MIN: f64 = 0.1;
const CALIBRATED_MAX: f64 = 0.95;
const INCONSISTENCY_PENALTY: f64 = 0.1;

fn shifted(confidence: f64, present: bool, weight: f64, check: Option<&ValidationCheck>) -> f64 {
    if !present {
        return 0.0;
    }
    let shift = check.map_or(0.0, |c| weight * (c.confidence - 1.0));
    (confidence + shift).clamp(CALIBRATED_MIN, CALIBRATED_MAX)
}

/// Calibrate field confidences against the validation report
pub fn calibrate(
    fields: &FieldExtraction,
    confidences: &FieldConfidences,
    report: &CrossValidationReport,
) -> FieldConfidences {
    FieldConfidences {
        category: shifted(
            confidences.category,
            fields.category.is_some(),
            0.2,
            report.category_amount.as_ref(),
        ),
        urgency: shifted(
            confidences.urgency,
            fields.urgency_level.is_some(),
            0.3,
            report.urgency_category.as_ref(),
        ),
        goal_amount: shifted(
            confidences.goal_amount,
            fields.goal_amount.is_some(),
            0.2,
            report.category_amount.as_ref(),
        ),
        name: shifted(
            confidences.name,
            fields.name.is_some(),
            0.3,
            report.name_context.as_ref(),
        ),
    }
}

/// Aggregate consistency of the checks that ran
pub fn consistency_score(report: &CrossValidationReport) -> f64 {
    let values = report.confidences();
    if values.is_empty() {
        return 1.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let failing = values.iter().filter(|v| **v < CONSISTENT_THRESHOLD).count();
    (mean - INCONSISTENCY_PENALTY * failing as f64).clamp(0.1, 1.0)
}

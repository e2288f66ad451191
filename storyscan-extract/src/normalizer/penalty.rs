// Incompleteness penalty
//
// S = 0.15·ellipses + 0.10·dashes + 0.10·emotional + 0.15·fillerRuns
//   + 0.03·fillers + 0.10·stutters + 0.15·hangingConjunctions
// penalty = 10·S / max(contentWords, 1)  (+0.2 when contentWords < 10 and any marker fired)
// contentWords excludes conversational fillers kept in the cleaned text
// clamped to [0, 1]

use serde::{Deserialize, Serialize};

const ELLIPSIS_WEIGHT: f64 = 0.15;
const DASH_WEIGHT: f64 = 0.10;
const EMOTIONAL_WEIGHT: f64 = 0.10;
const FILLER_RUN_WEIGHT: f64 = 0.15;
const FILLER_WEIGHT: f64 = 0.03;
const STUTTER_WEIGHT: f64 = 0.10;
const HANGING_WEIGHT: f64 = 0.15;

const SCALE: f64 = 10.0;
const SHORT_TEXT_WORDS: usize = 10;
const SHORT_TEXT_PENALTY: f64 = 0.2;

/// Fragment marker frequencies observed while normalizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCounts {
    pub ellipses: usize,
    pub dashes: usize,
    pub emotional_artifacts: usize,
    pub filler_runs: usize,
    pub fillers: usize,
    pub stutters: usize,
    pub hanging_conjunctions: usize,
}

impl MarkerCounts {
    pub fn weighted_sum(&self) -> f64 {
        ELLIPSIS_WEIGHT * self.ellipses as f64
            + DASH_WEIGHT * self.dashes as f64
            + EMOTIONAL_WEIGHT * self.emotional_artifacts as f64
            + FILLER_RUN_WEIGHT * self.filler_runs as f64
            + FILLER_WEIGHT * self.fillers as f64
            + STUTTER_WEIGHT * self.stutters as f64
            + HANGING_WEIGHT * self.hanging_conjunctions as f64
    }

    pub fn any(&self) -> bool {
        self.weighted_sum() > 0.0
    }

    pub fn penalty(&self, cleaned_word_count: usize) -> f64 {
        let mut penalty = SCALE * self.weighted_sum() / cleaned_word_count.max(1) as f64;
        if cleaned_word_count < SHORT_TEXT_WORDS && self.any() {
            penalty += SHORT_TEXT_PENALTY;
        }
        penalty.clamp(0.0, 1.0)
    }
}

// Optional remote urgency scorer
//
// Host-injected async service. Every call is bounded by a timeout and a
// cancellation token; any failure is mapped to a ScoringError so the caller
// can fall back to the local chain.

use crate::types::{ScoringError, UrgencyAssessment};
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const REMOTE_TIMEOUT_WARNING: &str = "remote_urgency_timeout";
pub const REMOTE_FAILED_WARNING: &str = "remote_urgency_failed";
pub const REMOTE_CANCELLED_WARNING: &str = "remote_urgency_cancelled";
pub const REMOTE_UNAVAILABLE_WARNING: &str = "remote_urgency_unavailable";

/// External multi-layer urgency service
#[async_trait]
pub trait RemoteUrgencyScorer: Send + Sync {
    /// Service identifier (e.g. "urgency-service")
    fn name(&self) -> &'static str;

    /// Score a cleaned transcript
    ///
    /// # Returns
    /// * `Ok(UrgencyAssessment)` - Remote assessment
    /// * `Err(ScoringError)` - Service failure (local fallback is used)
    async fn score(&self, text: &str) -> Result<UrgencyAssessment, ScoringError>;
}

/// Call the remote scorer, racing the timeout and the cancellation token
pub async fn score_remote(
    scorer: &dyn RemoteUrgencyScorer,
    text: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<UrgencyAssessment, ScoringError> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

    let assessment = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ScoringError::Cancelled),
        result = tokio::time::timeout(timeout, scorer.score(text)) => match result {
            Ok(inner) => inner?,
            Err(_) => return Err(ScoringError::Timeout(timeout_ms)),
        },
    };

    let assessment = sanitize(assessment)?;
    debug!(
        engine = scorer.name(),
        level = %assessment.level,
        score = assessment.score,
        "Remote urgency assessed"
    );
    Ok(assessment)
}

/// Warning tag recorded when the remote call fails
pub fn warning_for(error: &ScoringError) -> &'static str {
    match error {
        ScoringError::Timeout(_) => REMOTE_TIMEOUT_WARNING,
        ScoringError::Cancelled => REMOTE_CANCELLED_WARNING,
        _ => REMOTE_FAILED_WARNING,
    }
}

/// Reject non-finite values and clamp the rest into [0, 1]
fn sanitize(mut assessment: UrgencyAssessment) -> Result<UrgencyAssessment, ScoringError> {
    if !assessment.score.is_finite() || !assessment.confidence.is_finite() {
        return Err(ScoringError::Remote("non-finite score in response".to_string()));
    }
    assessment.score = assessment.score.clamp(0.0, 1.0);
    assessment.confidence = assessment.confidence.clamp(0.0, 1.0);
    Ok(assessment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UrgencyLevel;

    struct FixedRemote {
        score: f64,
        delay: Duration,
    }

    #[async_trait]
    impl RemoteUrgencyScorer for FixedRemote {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn score(&self, _text: &str) -> Result<UrgencyAssessment, ScoringError> {
            tokio::time::sleep(self.delay).await;
            Ok(UrgencyAssessment {
                level: UrgencyLevel::from_score(self.score),
                score: self.score,
                confidence: 1.5,
                matched: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_remote_success_is_clamped() {
        let remote = FixedRemote {
            score: 0.9,
            delay: Duration::ZERO,
        };
        let token = CancellationToken::new();
        let a = score_remote(&remote, "text", Duration::from_millis(500), &token)
            .await
            .unwrap();
        assert_eq!(a.level, UrgencyLevel::Critical);
        assert_eq!(a.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_remote_timeout() {
        let remote = FixedRemote {
            score: 0.9,
            delay: Duration::from_millis(200),
        };
        let token = CancellationToken::new();
        let err = score_remote(&remote, "text", Duration::from_millis(10), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::Timeout(10)));
        assert_eq!(warning_for(&err), REMOTE_TIMEOUT_WARNING);
    }

    #[tokio::test]
    async fn test_remote_cancelled() {
        let remote = FixedRemote {
            score: 0.9,
            delay: Duration::from_millis(200),
        };
        let token = CancellationToken::new();
        token.cancel();
        let err = score_remote(&remote, "text", Duration::from_secs(1), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::Cancelled));
    }

    #[tokio::test]
    async fn test_remote_nan_rejected() {
        let remote = FixedRemote {
            score: f64::NAN,
            delay: Duration::ZERO,
        };
        let token = CancellationToken::new();
        let err = score_remote(&remote, "text", Duration::from_secs(1), &token)
            .await
            .unwrap_err();
        assert_eq!(warning_for(&err), REMOTE_FAILED_WARNING);
    }
}

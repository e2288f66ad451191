//! Signal extraction pipeline
//!
//! raw transcript → normalized text → atomic signals → coordinated signals → validation report
//!
//! # Contract
//!
//! Neither entry point fails. Empty input yields a mostly-null, low-confidence
//! `ExtractedSignals`; scorer failures fall back to the legacy scorers;
//! coordination failures fall back to the uncoordinated fields. Each
//! degradation is visible in `warnings`.
//!
//! `extract` is synchronous and never calls the remote urgency scorer.
//! `extract_async` races the remote scorer (when configured and injected)
//! against a timeout and a cancellation token.

use crate::config::PipelineConfig;
use crate::coordination::CoordinationEngine;
use crate::extractors::{
    extract_amount, extract_contacts, extract_key_points, extract_locations, extract_name,
    split_sentences,
};
use crate::normalizer::normalize;
use crate::scoring::remote::{warning_for, REMOTE_UNAVAILABLE_WARNING};
use crate::scoring::{
    score_categories, score_remote, score_urgency, CategoryScorer, EnhancedCategoryScorer,
    LegacyCategoryScorer, LegacyUrgencyScorer, MultiLayerUrgencyScorer, RemoteUrgencyScorer,
    ScoredSignal, UrgencyScorer,
};
use crate::types::{
    EngineReport, ExtractedSignals, FieldConfidences, FieldExtraction, NormalizationResult,
    TranscriptInput, UrgencyAssessment,
};
use crate::validators::{MissingFieldReporter, ValidationContext};
use std::sync::Arc;
use storyscan_common::config::{CategoryEngine, UrgencyEngine};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const LANGUAGE_UNSUPPORTED_WARNING: &str = "language_hint_unsupported";

/// Normalized transcript plus pipeline-level warnings
struct PreparedTranscript {
    normalization: NormalizationResult,
    sentences: Vec<String>,
    warnings: Vec<String>,
}

/// Transcript signal extraction pipeline
///
/// Scorers are selected from `PipelineConfig` at construction and can be
/// replaced with injected strategies.
pub struct SignalPipeline {
    config: PipelineConfig,
    category_scorer: Box<dyn CategoryScorer>,
    urgency_scorer: Box<dyn UrgencyScorer>,
    remote_urgency: Option<Arc<dyn RemoteUrgencyScorer>>,
    coordinator: CoordinationEngine,
    reporter: MissingFieldReporter,
}

impl Default for SignalPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl SignalPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let category_scorer: Box<dyn CategoryScorer> = match config.category_engine {
            CategoryEngine::Legacy => Box::new(LegacyCategoryScorer),
            CategoryEngine::Enhanced => Box::new(EnhancedCategoryScorer::new(config.max_transcript_chars)),
        };
        let urgency_scorer: Box<dyn UrgencyScorer> = match config.urgency_engine {
            UrgencyEngine::Legacy => Box::new(LegacyUrgencyScorer),
            UrgencyEngine::Multilayer | UrgencyEngine::Remote => {
                Box::new(MultiLayerUrgencyScorer::new(config.max_transcript_chars))
            }
        };

        Self {
            config,
            category_scorer,
            urgency_scorer,
            remote_urgency: None,
            coordinator: CoordinationEngine::new(),
            reporter: MissingFieldReporter::default(),
        }
    }

    pub fn with_category_scorer(mut self, scorer: Box<dyn CategoryScorer>) -> Self {
        self.category_scorer = scorer;
        self
    }

    pub fn with_urgency_scorer(mut self, scorer: Box<dyn UrgencyScorer>) -> Self {
        self.urgency_scorer = scorer;
        self
    }

    /// Inject the remote urgency scorer used by `extract_async`
    pub fn with_remote_urgency(mut self, scorer: Arc<dyn RemoteUrgencyScorer>) -> Self {
        self.remote_urgency = Some(scorer);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract signals using only the local scorers
    pub fn extract(&self, input: &TranscriptInput) -> ExtractedSignals {
        let mut prepared = self.prepare(input);
        if self.config.urgency_engine == UrgencyEngine::Remote {
            debug!("Remote urgency engine skipped by synchronous extraction");
            prepared.warnings.push(REMOTE_UNAVAILABLE_WARNING.to_string());
        }
        let urgency = score_urgency(self.urgency_scorer.as_ref(), &prepared.normalization.cleaned_text);
        self.finish(prepared, urgency)
    }

    /// Extract signals, consulting the remote urgency scorer when configured
    pub async fn extract_async(&self, input: &TranscriptInput, cancel: CancellationToken) -> ExtractedSignals {
        let mut prepared = self.prepare(input);
        let text = prepared.normalization.cleaned_text.clone();

        let urgency = match (self.config.urgency_engine, self.remote_urgency.as_ref()) {
            (UrgencyEngine::Remote, Some(remote)) => {
                match score_remote(remote.as_ref(), &text, self.config.remote_timeout, &cancel).await {
                    Ok(assessment) => ScoredSignal {
                        value: assessment,
                        engine: remote.name().to_string(),
                        warning: None,
                    },
                    Err(e) => {
                        warn!(engine = remote.name(), error = %e, "Remote urgency failed, using local scorer");
                        prepared.warnings.push(warning_for(&e).to_string());
                        self.local_urgency_fallback(&text)
                    }
                }
            }
            (UrgencyEngine::Remote, None) => {
                warn!("Remote urgency engine configured but no remote scorer injected");
                prepared.warnings.push(REMOTE_UNAVAILABLE_WARNING.to_string());
                self.local_urgency_fallback(&text)
            }
            _ => score_urgency(self.urgency_scorer.as_ref(), &text),
        };

        self.finish(prepared, urgency)
    }

    /// Local chain behind the remote scorer, reported as a fallback
    fn local_urgency_fallback(&self, text: &str) -> ScoredSignal<UrgencyAssessment> {
        let mut local = score_urgency(self.urgency_scorer.as_ref(), text);
        if local.warning.is_none() {
            local.engine = format!("{} (fallback)", local.engine);
        }
        local
    }

    fn prepare(&self, input: &TranscriptInput) -> PreparedTranscript {
        let mut warnings = Vec::new();

        if let Some(hint) = input.language_hint.as_deref() {
            if !hint.trim().to_ascii_lowercase().starts_with("en") {
                warn!(language = hint, "Unsupported language hint, extracting anyway");
                warnings.push(LANGUAGE_UNSUPPORTED_WARNING.to_string());
            }
        }

        let text = match input.sentences.as_ref() {
            Some(sentences) if input.text.trim().is_empty() => sentences.join(" "),
            _ => input.text.clone(),
        };

        let normalization = normalize(&text, &self.config.normalize);

        let sentences = match input.sentences.as_ref() {
            Some(provided) => {
                let options = self.config.normalize.without_reconstruction();
                provided
                    .iter()
                    .map(|s| normalize(s, &options).cleaned_text)
                    .filter(|s| !s.is_empty())
                    .collect()
            }
            None => split_sentences(&normalization.cleaned_text),
        };

        PreparedTranscript {
            normalization,
            sentences,
            warnings,
        }
    }

    fn finish(&self, prepared: PreparedTranscript, urgency: ScoredSignal<UrgencyAssessment>) -> ExtractedSignals {
        let PreparedTranscript {
            normalization,
            sentences,
            mut warnings,
        } = prepared;
        let text = normalization.cleaned_text.as_str();

        let categories = score_categories(self.category_scorer.as_ref(), text);
        warnings.extend(categories.warning.map(str::to_string));
        warnings.extend(urgency.warning.map(str::to_string));

        let name = extract_name(&sentences);
        let contacts = extract_contacts(text);
        let locations = extract_locations(text);
        let amount = extract_amount(text);
        let key_points = extract_key_points(&sentences);

        let primary = categories.value.first();
        let assessment = &urgency.value;

        let fields = FieldExtraction {
            name: name.value.clone(),
            category: primary.map(|c| c.category),
            urgency_level: Some(assessment.level),
            goal_amount: amount.value,
        };
        let confidences = FieldConfidences {
            name: name.confidence,
            category: primary.map_or(0.0, |c| c.confidence),
            urgency: assessment.confidence,
            goal_amount: amount.confidence,
        };

        let coordination = self.coordinator.coordinate(&fields, &confidences, text);
        warnings.extend(coordination.warnings.iter().cloned());

        let urgency_level = coordination.fields.urgency_level.unwrap_or(assessment.level);
        let urgency_score = if urgency_level > assessment.level {
            assessment.score.max(urgency_level.floor_score())
        } else {
            assessment.score
        };

        let location_candidates = locations.value.unwrap_or_default();
        let data_validation = self.reporter.report(&ValidationContext {
            fields: &coordination.fields,
            contacts: &contacts,
            locations: &location_candidates,
            story: text,
            sentences: &sentences,
        });

        let signals = ExtractedSignals {
            name_candidate: coordination.fields.name.clone(),
            name_confidence: coordination.confidences.name,
            contact_candidates: contacts,
            location_candidates,
            location_confidence: locations.confidence,
            primary_category: coordination.fields.category,
            needs_categories: categories.value,
            urgency_level,
            urgency_score,
            goal_amount: coordination.fields.goal_amount,
            key_points,
            missing_fields: data_validation.missing_fields.clone(),
            data_validation,
            warnings,
            engines: EngineReport {
                category: categories.engine,
                urgency: urgency.engine,
            },
            normalization,
            coordination,
        };

        info!(
            name = ?signals.name_candidate,
            category = ?signals.primary_category,
            urgency = %signals.urgency_level,
            goal_amount = ?signals.goal_amount,
            missing = signals.missing_fields.len(),
            warnings = signals.warnings.len(),
            "Extraction complete"
        );
        signals
    }
}

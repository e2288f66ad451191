//! Pipeline configuration
//!
//! Converts the shared TOML model into the settings the pipeline reads once
//! at construction.

use crate::normalizer::NormalizeOptions;
use std::time::Duration;
use storyscan_common::config::{CategoryEngine, EngineConfig, NormalizerConfig, TomlConfig, UrgencyEngine};

/// Settings consumed by `SignalPipeline`
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub category_engine: CategoryEngine,
    pub urgency_engine: UrgencyEngine,
    pub remote_timeout: Duration,
    pub max_transcript_chars: usize,
    pub normalize: NormalizeOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&TomlConfig::default())
    }
}

impl From<&TomlConfig> for PipelineConfig {
    fn from(config: &TomlConfig) -> Self {
        let EngineConfig {
            category,
            urgency,
            remote_timeout_ms,
            max_transcript_chars,
        } = config.engines.clone();

        Self {
            category_engine: category,
            urgency_engine: urgency,
            remote_timeout: Duration::from_millis(remote_timeout_ms),
            max_transcript_chars,
            normalize: NormalizeOptions::from(&config.normalizer),
        }
    }
}

impl From<&NormalizerConfig> for NormalizeOptions {
    fn from(config: &NormalizerConfig) -> Self {
        Self {
            preserve_story_content: config.preserve_story_content,
            aggressive_mode: config.aggressive_mode,
            reconstruct_fragments: config.reconstruct_fragments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.category_engine, CategoryEngine::Enhanced);
        assert_eq!(config.urgency_engine, UrgencyEngine::Multilayer);
        assert_eq!(config.remote_timeout, Duration::from_millis(3000));
        assert_eq!(config.max_transcript_chars, 20_000);
        assert_eq!(config.normalize, NormalizeOptions::default());
    }

    #[test]
    fn test_from_toml() {
        let mut toml = TomlConfig::default();
        toml.engines.urgency = UrgencyEngine::Legacy;
        toml.engines.remote_timeout_ms = 250;
        toml.normalizer.aggressive_mode = true;
        let config = PipelineConfig::from(&toml);
        assert_eq!(config.urgency_engine, UrgencyEngine::Legacy);
        assert_eq!(config.remote_timeout, Duration::from_millis(250));
        assert!(config.normalize.aggressive_mode);
    }
}

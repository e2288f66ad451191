//! storyscan-extract library interface
//!
//! Deterministic signal extraction from speech-to-text transcripts of people
//! describing a financial need: name, contact, location, need categories,
//! urgency and goal amount, cross-checked by a coordination engine and
//! summarized by a missing-field report.
//!
//! Entry point: [`SignalPipeline`].

pub mod config;
pub mod coordination;
pub mod extractors;
pub mod normalizer;
pub mod pipeline;
pub mod scoring;
pub mod tables;
pub mod types;
pub mod validators;

pub use config::PipelineConfig;
pub use pipeline::SignalPipeline;
pub use types::{ExtractedSignals, TranscriptInput};

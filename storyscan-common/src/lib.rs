//! # Storyscan Common Library
//!
//! Shared code for the storyscan workspace:
//! - Error and result types
//! - TOML configuration model, path resolution and env overrides
//! - Logging configuration

pub mod config;
pub mod error;

pub use error::{Error, Result};

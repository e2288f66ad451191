//! Configuration loading and config-file resolution
//!
//! Priority order for the config file path:
//! 1. Command-line argument (highest priority)
//! 2. `STORYSCAN_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/storyscan/config.toml` on Linux)
//! 4. Compiled defaults (no file)
//!
//! A missing or partial TOML file never fails startup: every section is
//! `#[serde(default)]` and absent files fall back to compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "STORYSCAN_CONFIG";
/// Environment override for the category engine
pub const CATEGORY_ENGINE_ENV_VAR: &str = "STORYSCAN_CATEGORY_ENGINE";
/// Environment override for the urgency engine
pub const URGENCY_ENGINE_ENV_VAR: &str = "STORYSCAN_URGENCY_ENGINE";
/// Environment override for the remote urgency timeout
pub const REMOTE_TIMEOUT_ENV_VAR: &str = "STORYSCAN_REMOTE_TIMEOUT_MS";
/// Environment override for the log level
pub const LOG_LEVEL_ENV_VAR: &str = "STORYSCAN_LOG_LEVEL";

/// Complete TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub engines: EngineConfig,
    pub normalizer: NormalizerConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (e.g. "info", "storyscan_extract=debug")
    pub level: String,
    /// Emit ANSI colors on stderr
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Scoring engine selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub category: CategoryEngine,
    pub urgency: UrgencyEngine,
    /// Timeout for the optional remote urgency scorer
    pub remote_timeout_ms: u64,
    /// Transcripts longer than this are refused by the enhanced engines
    pub max_transcript_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            category: CategoryEngine::Enhanced,
            urgency: UrgencyEngine::Multilayer,
            remote_timeout_ms: 3000,
            max_transcript_chars: 20_000,
        }
    }
}

/// Fragment normalizer switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub preserve_story_content: bool,
    pub aggressive_mode: bool,
    pub reconstruct_fragments: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            preserve_story_content: true,
            aggressive_mode: false,
            reconstruct_fragments: true,
        }
    }
}

/// Category scoring engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryEngine {
    Legacy,
    Enhanced,
}

/// Urgency scoring engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyEngine {
    Legacy,
    Multilayer,
    /// Host-injected remote scorer, local multilayer as fallback
    Remote,
}

impl FromStr for CategoryEngine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "enhanced" => Ok(Self::Enhanced),
            other => Err(Error::InvalidInput(format!(
                "unknown category engine '{}' (expected legacy|enhanced)",
                other
            ))),
        }
    }
}

impl FromStr for UrgencyEngine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "multilayer" | "v2" => Ok(Self::Multilayer),
            "remote" => Ok(Self::Remote),
            other => Err(Error::InvalidInput(format!(
                "unknown urgency engine '{}' (expected legacy|multilayer|remote)",
                other
            ))),
        }
    }
}

impl fmt::Display for CategoryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Enhanced => write!(f, "enhanced"),
        }
    }
}

impl fmt::Display for UrgencyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Multilayer => write!(f, "multilayer"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Resolves which config file (if any) to load
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Resolve the config file path following the documented priority order.
    ///
    /// Returns `None` when no candidate exists; callers then use compiled defaults.
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            debug!(path = %path.display(), "Config path from command line");
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                debug!(path = %path, "Config path from {}", CONFIG_ENV_VAR);
                return Some(PathBuf::from(path));
            }
        }

        default_config_path().filter(|p| p.exists())
    }

    /// Resolve, load and apply env overrides in one step.
    ///
    /// An explicitly named file that fails to parse is an error; a missing
    /// file degrades to compiled defaults with a warning.
    pub fn load(&self) -> Result<TomlConfig> {
        let mut config = match self.resolve() {
            Some(path) if path.exists() => load_toml_config(&path)?,
            Some(path) => {
                warn!(
                    path = %path.display(),
                    "Config file not found, using compiled defaults"
                );
                TomlConfig::default()
            }
            None => {
                debug!("No config file found, using compiled defaults");
                TomlConfig::default()
            }
        };
        apply_env_overrides(&mut config)?;
        Ok(config)
    }
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("storyscan").join("config.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Apply `STORYSCAN_*` environment overrides on top of a loaded config
pub fn apply_env_overrides(config: &mut TomlConfig) -> Result<()> {
    if let Ok(value) = std::env::var(CATEGORY_ENGINE_ENV_VAR) {
        config.engines.category = value.parse()?;
        debug!(engine = %config.engines.category, "Category engine from environment");
    }

    if let Ok(value) = std::env::var(URGENCY_ENGINE_ENV_VAR) {
        config.engines.urgency = value.parse()?;
        debug!(engine = %config.engines.urgency, "Urgency engine from environment");
    }

    if let Ok(value) = std::env::var(REMOTE_TIMEOUT_ENV_VAR) {
        config.engines.remote_timeout_ms = value.trim().parse().map_err(|_| {
            Error::Config(format!(
                "{} must be an integer number of milliseconds, got '{}'",
                REMOTE_TIMEOUT_ENV_VAR, value
            ))
        })?;
    }

    if let Ok(value) = std::env::var(LOG_LEVEL_ENV_VAR) {
        if !value.trim().is_empty() {
            config.logging.level = value.trim().to_string();
        }
    }

    Ok(())
}

/// Write config to disk atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = target.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, target)?;

    info!(path = %target.display(), "Wrote configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.engines.category, CategoryEngine::Enhanced);
        assert_eq!(config.engines.urgency, UrgencyEngine::Multilayer);
        assert_eq!(config.engines.remote_timeout_ms, 3000);
        assert!(config.normalizer.preserve_story_content);
        assert!(!config.normalizer.aggressive_mode);
        assert!(config.normalizer.reconstruct_fragments);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("[engines]\nurgency = \"legacy\"\n").unwrap();
        assert_eq!(config.engines.urgency, UrgencyEngine::Legacy);
        assert_eq!(config.engines.category, CategoryEngine::Enhanced);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_engine_parsing() {
        assert_eq!("LEGACY".parse::<CategoryEngine>().unwrap(), CategoryEngine::Legacy);
        assert_eq!("v2".parse::<UrgencyEngine>().unwrap(), UrgencyEngine::Multilayer);
        assert!("quantum".parse::<UrgencyEngine>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for engine in [UrgencyEngine::Legacy, UrgencyEngine::Multilayer, UrgencyEngine::Remote] {
            assert_eq!(engine.to_string().parse::<UrgencyEngine>().unwrap(), engine);
        }
    }
}

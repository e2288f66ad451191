//! Configuration loading and graceful degradation tests
//!
//! Tests that manipulate STORYSCAN_* environment variables are marked
//! #[serial] so they never run concurrently.

use serial_test::serial;
use std::env;
use storyscan_common::config::{
    load_toml_config, write_toml_config, CategoryEngine, ConfigResolver, TomlConfig,
    UrgencyEngine, CATEGORY_ENGINE_ENV_VAR, CONFIG_ENV_VAR, LOG_LEVEL_ENV_VAR,
    REMOTE_TIMEOUT_ENV_VAR, URGENCY_ENGINE_ENV_VAR,
};
use tempfile::TempDir;

fn clear_env() {
    for var in [
        CONFIG_ENV_VAR,
        CATEGORY_ENGINE_ENV_VAR,
        URGENCY_ENGINE_ENV_VAR,
        REMOTE_TIMEOUT_ENV_VAR,
        LOG_LEVEL_ENV_VAR,
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_missing_explicit_file_falls_back_to_defaults() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let config = ConfigResolver::new(Some(missing)).load().unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_cli_path_beats_env_path() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let cli_file = temp_dir.path().join("cli.toml");
    let env_file = temp_dir.path().join("env.toml");
    std::fs::write(&cli_file, "[engines]\ncategory = \"legacy\"\n").unwrap();
    std::fs::write(&env_file, "[engines]\nurgency = \"legacy\"\n").unwrap();
    env::set_var(CONFIG_ENV_VAR, &env_file);

    let resolver = ConfigResolver::new(Some(cli_file.clone()));
    assert_eq!(resolver.resolve(), Some(cli_file));

    let config = resolver.load().unwrap();
    assert_eq!(config.engines.category, CategoryEngine::Legacy);
    assert_eq!(config.engines.urgency, UrgencyEngine::Multilayer);

    clear_env();
}

#[test]
#[serial]
fn test_env_path_used_without_cli() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let env_file = temp_dir.path().join("env.toml");
    std::fs::write(&env_file, "[logging]\nlevel = \"debug\"\n").unwrap();
    env::set_var(CONFIG_ENV_VAR, &env_file);

    let config = ConfigResolver::new(None).load().unwrap();
    assert_eq!(config.logging.level, "debug");

    clear_env();
}

#[test]
#[serial]
fn test_env_overrides_applied_after_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("config.toml");
    std::fs::write(&file, "[engines]\nurgency = \"multilayer\"\nremote_timeout_ms = 900\n").unwrap();

    env::set_var(URGENCY_ENGINE_ENV_VAR, "remote");
    env::set_var(REMOTE_TIMEOUT_ENV_VAR, "1500");
    env::set_var(LOG_LEVEL_ENV_VAR, "warn");

    let config = ConfigResolver::new(Some(file)).load().unwrap();
    assert_eq!(config.engines.urgency, UrgencyEngine::Remote);
    assert_eq!(config.engines.remote_timeout_ms, 1500);
    assert_eq!(config.logging.level, "warn");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_override_is_an_error() {
    clear_env();
    env::set_var(REMOTE_TIMEOUT_ENV_VAR, "soon");

    let temp_dir = TempDir::new().unwrap();
    let result = ConfigResolver::new(Some(temp_dir.path().join("absent.toml"))).load();
    assert!(result.is_err());

    clear_env();
}

#[test]
fn test_malformed_toml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("bad.toml");
    std::fs::write(&file, "[engines\ncategory = ").unwrap();

    assert!(load_toml_config(&file).is_err());
}

#[test]
fn test_atomic_write_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("config.toml");

    let mut config = TomlConfig::default();
    config.engines.category = CategoryEngine::Legacy;
    config.normalizer.aggressive_mode = true;

    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!target.with_extension("toml.tmp").exists());
    assert_eq!(load_toml_config(&target).unwrap(), config);
}

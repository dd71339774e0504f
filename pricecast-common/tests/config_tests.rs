//! Tests for config file resolution and graceful degradation
//!
//! Uses serial_test to prevent environment variable races: every test that
//! reads or writes PRICECAST_CONFIG is marked #[serial].

mod helpers;

use std::env;
use std::path::PathBuf;

use helpers::write_file;
use pricecast_common::catalog::MalformedPricePolicy;
use pricecast_common::config::{ConfigResolver, ConfigSource, TomlConfig, CONFIG_ENV_VAR};
use pricecast_common::ConfigError;
use serial_test::serial;
use tempfile::TempDir;

/// Resolver that only looks inside `dir` for discovered files
fn isolated_resolver(cli_path: Option<PathBuf>, dir: &TempDir) -> ConfigResolver {
    ConfigResolver::new(cli_path).with_search_dirs(
        Some(dir.path().join("cwd")),
        Some(dir.path().join("user")),
    )
}

#[test]
#[serial]
fn test_no_config_anywhere_uses_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();

    let loaded = isolated_resolver(None, &dir).load().unwrap();

    assert_eq!(loaded.source, ConfigSource::CompiledDefaults);
    assert_eq!(loaded.config, TomlConfig::default());
}

#[test]
#[serial]
fn test_cli_path_wins_over_env() {
    let dir = TempDir::new().unwrap();
    let cli = write_file(dir.path(), "cli.toml", "[server]\nbind = \"0.0.0.0:8080\"\n");
    let from_env = write_file(dir.path(), "env.toml", "[server]\nbind = \"0.0.0.0:9090\"\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let loaded = isolated_resolver(Some(cli.clone()), &dir).load().unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(loaded.source, ConfigSource::CommandLine(cli));
    assert_eq!(loaded.config.server.bind, "0.0.0.0:8080");
}

#[test]
#[serial]
fn test_env_var_wins_over_discovered_files() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "cwd/pricecast.toml", "[logging]\nlevel = \"warn\"\n");
    let from_env = write_file(dir.path(), "env.toml", "[logging]\nlevel = \"debug\"\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let loaded = isolated_resolver(None, &dir).load().unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(loaded.source, ConfigSource::Environment(from_env));
    assert_eq!(loaded.config.logging.level, "debug");
}

#[test]
#[serial]
fn test_working_directory_before_user_dir() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let local = write_file(dir.path(), "cwd/pricecast.toml", "[logging]\nlevel = \"warn\"\n");
    write_file(dir.path(), "user/config.toml", "[logging]\nlevel = \"trace\"\n");

    let loaded = isolated_resolver(None, &dir).load().unwrap();

    assert_eq!(loaded.source, ConfigSource::WorkingDirectory(local));
    assert_eq!(loaded.config.logging.level, "warn");
}

#[test]
#[serial]
fn test_user_config_dir_fallback() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let user = write_file(
        dir.path(),
        "user/config.toml",
        "[dataset]\non_malformed_price = \"reject\"\n",
    );

    let loaded = isolated_resolver(None, &dir).load().unwrap();

    assert_eq!(loaded.source, ConfigSource::UserConfigDir(user));
    assert_eq!(loaded.config.dataset.on_malformed_price, MalformedPricePolicy::Reject);
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();

    let err = isolated_resolver(Some(dir.path().join("nope.toml")), &dir)
        .load()
        .unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
#[serial]
fn test_malformed_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let bad = write_file(dir.path(), "bad.toml", "[server\nbind = 1\n");

    let err = isolated_resolver(Some(bad), &dir).load().unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
#[serial]
fn test_relative_paths_follow_config_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let config = write_file(
        dir.path(),
        "deploy/pricecast.toml",
        "[dataset]\npath = \"catalog.csv\"\n\n[models]\nprimary = \"/abs/rf.json\"\n",
    );

    let loaded = isolated_resolver(Some(config), &dir).load().unwrap();

    assert_eq!(loaded.config.dataset.path, dir.path().join("deploy/catalog.csv"));
    assert_eq!(loaded.config.models.primary, PathBuf::from("/abs/rf.json"));
    assert_eq!(
        loaded.config.models.secondary,
        dir.path().join("deploy/models/xgboost.json")
    );
}

#[test]
#[serial]
fn test_invalid_bind_fails_validation() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let config = write_file(dir.path(), "pricecast.toml", "[server]\nbind = \"not-an-address\"\n");

    let err = isolated_resolver(Some(config), &dir).load().unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_example_config_matches_defaults() {
    let text = include_str!("../../pricecast.example.toml");
    let config = TomlConfig::parse(text, std::path::Path::new("pricecast.example.toml")).unwrap();
    assert_eq!(config, TomlConfig::default());
}

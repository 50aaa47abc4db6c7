//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;

use scenic::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("SCENIC_DEBUG__LOG_LEVEL", "trace");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.debug.log_level, "trace");
    std::env::remove_var("SCENIC_DEBUG__LOG_LEVEL");
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("SCENIC_DEBUG__LOG_LEVEL");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    assert_eq!(config.script.path.as_deref(), Some("scenes/cornell_box.ron"));
    assert_eq!(config.rendering.backend, "flat");
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = std::env::temp_dir().join("scenic_config_layers");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("default.toml"),
        "[output]\ndirectory = \"renders\"\n[plugins]\npreload = [\"PlasticShader\"]\n",
    )
    .unwrap();
    fs::write(dir.join("user.toml"), "[output]\ndirectory = \"mine\"\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.output.directory, "mine");
    assert_eq!(config.plugins.preload, vec!["PlasticShader".to_string()]);
    // Sections absent from both files keep their defaults
    assert_eq!(config.debug.log_level, "info");
}

#[test]
#[serial]
fn test_env_beats_user_file() {
    let dir = std::env::temp_dir().join("scenic_config_env");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("user.toml"), "[output]\ndirectory = \"from_file\"\n").unwrap();

    std::env::set_var("SCENIC_OUTPUT__DIRECTORY", "from_env");
    let config = AppConfig::load_from(&dir).unwrap();
    std::env::remove_var("SCENIC_OUTPUT__DIRECTORY");

    assert_eq!(config.output.directory, "from_env");
}

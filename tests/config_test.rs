use std::env;
use std::fs;
use std::path::Path;

use avrcp_codec::config::{BufferConfig, CodecConfig, DEFAULT_LARGE_CAPACITY};
use avrcp_codec::error::{CodecError, Result};
use serial_test::serial;
use tracing::Level;

const ENV_VARS: [&str; 3] =
    ["AVRCP_CODEC_SMALL_BUFFER", "AVRCP_CODEC_LARGE_BUFFER", "AVRCP_CODEC_LOG_LEVEL"];

fn clear_env() {
    for name in ENV_VARS {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_config_loading() -> Result<()> {
    let test_config = r#"
    [buffers]
    small_capacity = 256
    large_capacity = 2048

    [logging]
    app_name = "config-test"
    log_level = "debug"
    json_format = true
    "#;

    let test_config_path = Path::new("avrcp_test_config.toml");
    fs::write(test_config_path, test_config)?;
    let loaded = CodecConfig::from_file(test_config_path);
    fs::remove_file(test_config_path)?;
    let file_config = loaded?;

    assert_eq!(file_config.buffers.small_capacity, 256);
    assert_eq!(file_config.buffers.large_capacity, 2048);
    assert_eq!(file_config.logging.app_name, "config-test");
    assert_eq!(file_config.logging.log_level, Level::DEBUG);
    assert!(file_config.logging.json_format);
    assert_eq!(file_config.logging.log_dir, None);
    Ok(())
}

#[test]
#[serial]
fn test_partial_file_uses_defaults() -> Result<()> {
    let path = Path::new("avrcp_partial_config.toml");
    fs::write(path, "[buffers]\nsmall_capacity = 128\n")?;
    let loaded = CodecConfig::from_file(path);
    fs::remove_file(path)?;

    let config = loaded?;
    assert_eq!(config.buffers.small_capacity, 128);
    assert_eq!(config.buffers.large_capacity, DEFAULT_LARGE_CAPACITY);
    assert_eq!(config.logging.log_level, Level::INFO);
    Ok(())
}

#[test]
#[serial]
fn test_invalid_file_is_rejected() -> Result<()> {
    let path = Path::new("avrcp_invalid_config.toml");
    fs::write(path, "[buffers]\nsmall_capacity = 1024\nlarge_capacity = 512\n")?;
    let loaded = CodecConfig::from_file(path);
    fs::remove_file(path)?;

    assert!(matches!(loaded, Err(CodecError::Config(_))));
    assert!(matches!(CodecConfig::from_file("does_not_exist.toml"), Err(CodecError::Io(_))));
    Ok(())
}

#[test]
#[serial]
fn test_env_overrides() -> Result<()> {
    clear_env();
    env::set_var("AVRCP_CODEC_SMALL_BUFFER", "1024");
    env::set_var("AVRCP_CODEC_LOG_LEVEL", "trace");

    let config = CodecConfig::from_env();
    clear_env();
    let config = config?;

    assert_eq!(config.buffers.small_capacity, 1024);
    assert_eq!(config.buffers.large_capacity, DEFAULT_LARGE_CAPACITY);
    assert_eq!(config.logging.log_level, Level::TRACE);
    Ok(())
}

#[test]
#[serial]
fn test_bad_env_value() {
    clear_env();
    env::set_var("AVRCP_CODEC_LARGE_BUFFER", "lots");
    let config = CodecConfig::from_env();
    clear_env();

    match config {
        Err(CodecError::Config(message)) => assert!(message.contains("AVRCP_CODEC_LARGE_BUFFER")),
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn test_default_with_overrides() {
    let config = CodecConfig::default_with_overrides(|c| {
        c.buffers.large_capacity = 8192;
        c.logging.app_name = "avrcp-test".to_string();
    });

    assert_eq!(config.buffers.large_capacity, 8192);
    assert_eq!(config.buffers.small_capacity, BufferConfig::default().small_capacity);
    assert_eq!(config.logging.app_name, "avrcp-test");
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_small_capacity() {
    let config = CodecConfig::default_with_overrides(|c| c.buffers.small_capacity = 4);
    assert!(matches!(config.validate(), Err(CodecError::Config(_))));
}

#[test]
#[serial]
fn test_save_and_reload() -> Result<()> {
    let config = CodecConfig::default_with_overrides(|c| {
        c.buffers.small_capacity = 300;
        c.logging.log_level = Level::WARN;
        c.logging.log_dir = Some("logs".to_string());
    });

    let path = Path::new("avrcp_saved_config.toml");
    config.save_to_file(path)?;
    let reloaded = CodecConfig::from_file(path);
    fs::remove_file(path)?;

    assert_eq!(reloaded?, config);
    Ok(())
}

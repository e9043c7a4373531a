//! Integration tests for logging system

use core_runtime::logging::{init_logging, strip_path, LogFormat, LogLevel, LoggingConfig};

#[test]
fn test_logging_initialization() {
    // Only one global subscriber per process: the first init succeeds,
    // the second must be rejected rather than silently replacing it.
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    assert!(init_logging(config.clone()).is_ok());
    assert!(init_logging(config).is_err());

    // The installed filter admits our crates at the configured level only.
    assert!(tracing::enabled!(target: "core_runtime", tracing::Level::DEBUG));
    assert!(tracing::enabled!(target: "core_playback::reader", tracing::Level::DEBUG));
    assert!(!tracing::enabled!(target: "core_playback::reader", tracing::Level::TRACE));
    assert!(!tracing::enabled!(target: "symphonia_format_wav", tracing::Level::INFO));
    tracing::info!(target: "core_runtime", "logging integration test event");
}

#[test]
fn test_invalid_filter_is_rejected() {
    let config = LoggingConfig::default().with_filter("core_playback=notalevel");
    assert!(init_logging(config).is_err());
}

#[test]
fn test_config_from_json() {
    let config: LoggingConfig =
        serde_json::from_str(r#"{ "format": "json", "level": "warn" }"#).unwrap();

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(config.filter.is_none());
    assert!(config.enable_spans);
    assert!(config.display_target);
    assert!(!config.display_thread_info);
}

#[test]
fn test_path_stripping() {
    // Unix paths
    assert_eq!(strip_path("/home/user/music/song.flac"), "song.flac");

    // Windows paths
    assert_eq!(strip_path("D:\\audio\\take1.wav"), "take1.wav");

    // Edge cases
    assert_eq!(strip_path(""), "");
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

//! Integration tests for logging functionality

use dhis_mediator::config::LoggingConfig;
use dhis_mediator::domain::MediatorError;
use dhis_mediator::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_is_rejected() {
    let result = init_logging("verbose", &LoggingConfig::default());
    assert!(matches!(result, Err(MediatorError::Configuration(_))));
}

// Only this test installs a subscriber; a process gets one global subscriber
#[test]
fn test_file_logging_creates_rotated_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        level: "debug".to_string(),
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };

    let guard = init_logging(&config.level, &config).unwrap();
    tracing::info!(port = 3001, "Mediator listening");
    dhis_mediator::log_heartbeat_failure!("connection refused");
    dhis_mediator::log_request_failure!(404, "DHIS2 responded with status 404");
    drop(guard);

    assert!(log_path.is_dir());
    let files: Vec<String> = std::fs::read_dir(&log_path)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    assert!(files.iter().any(|name| name.starts_with("mediator.log")));
}

#[test]
fn test_logging_macros_usage() {
    // Without a subscriber the macros are no-ops; this checks they expand
    let error = MediatorError::Configuration("Invalid config".to_string());
    dhis_mediator::log_error_with_context!(&error, "Failed to load configuration");
    dhis_mediator::log_request_failure!(500, error);
    dhis_mediator::log_heartbeat_failure!(String::from("timeout"));
}

//! Logging and observability
//!
//! Structured logging via `tracing`, plus macros for the events the mediator
//! logs repeatedly so their field names stay consistent.
//!
//! # Example
//!
//! ```no_run
//! use dhis_mediator::logging::init_logging;
//! use dhis_mediator::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(port = 3001, "Mediator listening");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a failed heartbeat
///
/// # Example
///
/// ```no_run
/// use dhis_mediator::log_heartbeat_failure;
///
/// log_heartbeat_failure!("connection refused");
/// ```
#[macro_export]
macro_rules! log_heartbeat_failure {
    ($detail:expr) => {
        tracing::error!(detail = %$detail, "Heartbeat failed");
    };
}

/// Log a `/facilities` request that produced a `Failed` envelope
///
/// # Example
///
/// ```no_run
/// use dhis_mediator::log_request_failure;
///
/// log_request_failure!(404, "DHIS2 responded with status 404");
/// ```
#[macro_export]
macro_rules! log_request_failure {
    ($status:expr, $reason:expr) => {
        tracing::error!(
            status = $status,
            reason = %$reason,
            "Facility request failed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use dhis_mediator::log_error_with_context;
/// use dhis_mediator::domain::MediatorError;
///
/// let error = MediatorError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

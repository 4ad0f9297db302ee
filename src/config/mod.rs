//! Process configuration for the mediator.
//!
//! This is the configuration read once at startup (listener port, OpenHIM
//! credentials, log level). It is distinct from [`MediatorConfig`], which
//! OpenHIM pushes at runtime.
//!
//! [`MediatorConfig`]: crate::domain::MediatorConfig
//!
//! # Sources
//!
//! Settings are resolved in this order, later sources winning:
//! 1. Built-in defaults
//! 2. An optional TOML file, with `${VAR_NAME}` substitution
//! 3. Environment variables
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! port = 3001
//! heartbeat = true
//!
//! [openhim]
//! api_url = "https://openhim-core:8080"
//! username = "root@openhim.org"
//! password = "${OPENHIM_PASSWORD}"
//! trust_self_signed = true
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `MEDIATOR_PORT` | `server.port` |
//! | `MEDIATOR_HEARTBEAT` | `server.heartbeat` (`false` disables) |
//! | `MEDIATOR_HEARTBEAT_INTERVAL_SECONDS` | `server.heartbeat_interval_seconds` |
//! | `MEDIATOR_REGISTRATION_FILE` | `server.registration_file` |
//! | `OPENHIM_API_URL` | `openhim.api_url` |
//! | `OPENHIM_USERNAME` | `openhim.username` |
//! | `OPENHIM_PASSWORD` | `openhim.password` |
//! | `OPENHIM_TRUST_SELF_SIGNED` | `openhim.trust_self_signed` (`true` enables) |
//! | `DHIS_TIMEOUT_SECONDS` | `upstream.timeout_seconds` |
//! | `LOG_LEVEL` | `logging.level` |

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{LoggingConfig, MediatorSettings, OpenHimConfig, ServerConfig, UpstreamConfig};
pub use secret::{secret_string, SecretString, SecretValue};

//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MediatorSettings;
use super::secret_string;
use crate::domain::errors::MediatorError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads the mediator configuration
///
/// This function:
/// 1. Reads the TOML file, if a path is given (otherwise starts from defaults)
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MediatorSettings
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - The given file cannot be read
/// - TOML parsing fails
/// - A referenced `${VAR}` is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use dhis_mediator::config::loader::load_config;
///
/// let settings = load_config(Some("mediator.toml")).expect("Failed to load config");
/// let from_env_only = load_config(None::<&str>).expect("Failed to load config");
/// ```
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<MediatorSettings> {
    let mut config = match path {
        Some(path) => read_config_file(path.as_ref())?,
        None => MediatorSettings::default(),
    };

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MediatorError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<MediatorSettings> {
    if !path.exists() {
        return Err(MediatorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MediatorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    toml::from_str(&contents)
        .map_err(|e| MediatorError::Configuration(format!("Failed to parse TOML: {}", e)))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MediatorError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MediatorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// Variable names match the ones OpenHIM mediators are conventionally
/// deployed with (`MEDIATOR_PORT`, `OPENHIM_API_URL`, ...).
fn apply_env_overrides(config: &mut MediatorSettings) -> Result<()> {
    // Server overrides
    if let Ok(val) = std::env::var("MEDIATOR_PORT") {
        config.server.port = val.parse().map_err(|_| {
            MediatorError::Configuration(format!("MEDIATOR_PORT is not a valid port: {val}"))
        })?;
    }
    if let Ok(val) = std::env::var("MEDIATOR_HEARTBEAT") {
        // Heartbeat stays on unless explicitly disabled
        config.server.heartbeat = val != "false";
    }
    if let Ok(val) = std::env::var("MEDIATOR_HEARTBEAT_INTERVAL_SECONDS") {
        if let Ok(interval) = val.parse() {
            config.server.heartbeat_interval_seconds = interval;
        }
    }
    if let Ok(val) = std::env::var("MEDIATOR_REGISTRATION_FILE") {
        config.server.registration_file = Some(val);
    }

    // OpenHIM overrides
    if let Ok(val) = std::env::var("OPENHIM_API_URL") {
        config.openhim.api_url = val;
    }
    if let Ok(val) = std::env::var("OPENHIM_USERNAME") {
        config.openhim.username = val;
    }
    if let Ok(val) = std::env::var("OPENHIM_PASSWORD") {
        config.openhim.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("OPENHIM_TRUST_SELF_SIGNED") {
        // Self-signed trust stays off unless explicitly enabled
        config.openhim.trust_self_signed = val == "true";
    }

    // Upstream overrides
    if let Ok(val) = std::env::var("DHIS_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.upstream.timeout_seconds = timeout;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LOG_LEVEL") {
        config.logging.level = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("MEDIATOR_TEST_SUBST_VAR", "test_value");
        let input = "password = \"${MEDIATOR_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("MEDIATOR_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("MEDIATOR_TEST_MISSING_VAR");
        let input = "password = \"${MEDIATOR_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("MEDIATOR_TEST_COMMENTED_VAR");
        let input = "# password = \"${MEDIATOR_TEST_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some("nonexistent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_config_file_valid() {
        let toml_content = r#"
[server]
port = 3101
heartbeat = false

[openhim]
api_url = "https://openhim-core:8080"
username = "mediator@openhim.org"
password = "secret"
trust_self_signed = true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = read_config_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3101);
        assert!(!config.server.heartbeat);
        assert_eq!(config.openhim.api_url, "https://openhim-core:8080");
        assert!(config.openhim.trust_self_signed);
    }
}

//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::XmlSyncConfig;
use crate::config::secret_string;
use crate::domain::errors::XmlSyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into XmlSyncConfig
/// 4. Applies environment variable overrides (XMLSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use xmlsync::config::loader::load_config;
///
/// let config = load_config("xmlsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<XmlSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(XmlSyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        XmlSyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration text
///
/// # Errors
///
/// Same as [`load_config`], minus file access.
pub fn parse_config(contents: &str) -> Result<XmlSyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: XmlSyncConfig = toml::from_str(&contents)
        .map_err(|e| XmlSyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        XmlSyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
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
        .map_err(|e| XmlSyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(XmlSyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the XMLSYNC_* prefix
///
/// Environment variables follow the pattern: XMLSYNC_<SECTION>_<KEY>
/// For example: XMLSYNC_SYNC_PATH, XMLSYNC_APPLICATION_DRY_RUN
fn apply_env_overrides(config: &mut XmlSyncConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("XMLSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("XMLSYNC_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Sync overrides
    if let Ok(val) = std::env::var("XMLSYNC_SYNC_PATH") {
        config.sync.sync_path = val;
    }
    if let Ok(val) = std::env::var("XMLSYNC_SYNC_STALE_THRESHOLD_SECS") {
        if let Ok(secs) = val.parse() {
            config.sync.stale_threshold_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("XMLSYNC_SYNC_IMPORT_COUNT_THRESHOLD") {
        if let Ok(threshold) = val.parse() {
            config.sync.import_count_threshold = threshold;
        }
    }

    // PostgreSQL overrides (only if PostgreSQL is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("XMLSYNC_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
    }

    // Alert overrides
    if let Ok(val) = std::env::var("XMLSYNC_ALERT_WEBHOOK_URL") {
        config.alert.webhook_url = Some(secret_string(val));
    }
}

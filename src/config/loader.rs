//! Configuration loader with TOML parsing and environment variable overrides

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::{AnonymizatorConfig, CipherConfig};
use super::secret::secret_string;
use crate::domain::errors::AnonymizatorError;
use crate::domain::result::Result;

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern compiles"));

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`AnonymizatorConfig`]
/// 4. Applies environment variable overrides (`ANONYMIZATOR_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`AnonymizatorError::Configuration`] if the file cannot be read,
/// a referenced variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use anonymizator::config::load_config;
///
/// let config = load_config("anonymizator.toml").expect("Failed to load config");
/// println!("log level: {}", config.application.log_level);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnonymizatorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymizatorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymizatorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying the same substitution, overrides and
/// validation as [`load_config`].
pub fn parse_config(contents: &str) -> Result<AnonymizatorConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AnonymizatorConfig = toml::from_str(&contents)
        .map_err(|e| AnonymizatorError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        AnonymizatorError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(
        has_cipher = config.cipher.is_some(),
        keys = config.keys.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`.
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = ENV_PLACEHOLDER.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                if !missing_vars.iter().any(|v| v == var_name) {
                    missing_vars.push(var_name.to_string());
                }
                String::new()
            })
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymizatorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `ANONYMIZATOR_*` prefix
///
/// Variables follow the pattern `ANONYMIZATOR_<SECTION>_<KEY>`, for example
/// `ANONYMIZATOR_CIPHER_KEY` or `ANONYMIZATOR_LOGGING_LOCAL_PATH`.
fn apply_env_overrides(config: &mut AnonymizatorConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ANONYMIZATOR_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Cipher overrides; a key alone is enough to create the section
    if let Ok(val) = std::env::var("ANONYMIZATOR_CIPHER_KEY") {
        match config.cipher.as_mut() {
            Some(cipher) => cipher.key = secret_string(val),
            None => {
                config.cipher = Some(CipherConfig {
                    key: secret_string(val),
                    tweak: None,
                    radix: None,
                    alphabet: None,
                })
            }
        }
    }
    if let Some(cipher) = config.cipher.as_mut() {
        if let Ok(val) = std::env::var("ANONYMIZATOR_CIPHER_TWEAK") {
            cipher.tweak = Some(val);
        }
        if let Ok(val) = std::env::var("ANONYMIZATOR_CIPHER_RADIX") {
            let radix = val.parse().map_err(|_| {
                AnonymizatorError::Configuration(format!("Invalid ANONYMIZATOR_CIPHER_RADIX: {val}"))
            })?;
            cipher.radix = Some(radix);
            cipher.alphabet = None;
        }
    }

    // Anonymizer overrides
    config
        .anonymizers
        .apply_env_overrides()
        .map_err(|e| AnonymizatorError::Configuration(format!("{e:#}")))?;

    // Logging overrides
    if let Ok(val) = std::env::var("ANONYMIZATOR_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ANONYMIZATOR_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

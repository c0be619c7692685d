//! Configuration schema types
//!
//! Maps the sections of `anonymizator.toml` onto typed structs. Each section
//! validates itself and reports problems as a message naming the offending
//! key.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::anonymization::{AnonymizationScope, AnonymizerOptions};
use crate::config::SecretString;
use crate::domain::Result as AnonymizatorResult;
use crate::fpe::{parse_tweak, Alphabet, FpeCipher, Tweak, ZERO_TWEAK};
use crate::keys::{KeyRing, KeyTweakPair};

/// Main configuration
///
/// Root structure of the TOML file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizatorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Cipher used when no key name is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher: Option<CipherConfig>,

    /// Named key/tweak pairs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyEntry>,

    /// Per-kind anonymizer settings
    #[serde(default)]
    pub anonymizers: AnonymizerOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AnonymizatorConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        if let Some(cipher) = &self.cipher {
            cipher.validate()?;
        }

        let mut names = std::collections::HashSet::new();
        for entry in &self.keys {
            entry.validate()?;
            if !names.insert(entry.name.as_str()) {
                return Err(format!("Duplicate key name '{}' in [[keys]]", entry.name));
            }
        }

        self.anonymizers
            .validate()
            .map_err(|e| format!("anonymizers: {e:#}"))?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the cipher of the `[cipher]` section, if there is one.
    pub fn build_cipher(&self) -> AnonymizatorResult<Option<FpeCipher>> {
        self.cipher.as_ref().map(CipherConfig::build).transpose()
    }

    /// Key ring holding every `[[keys]]` entry.
    pub fn key_ring(&self) -> AnonymizatorResult<KeyRing> {
        self.keys.iter().map(KeyEntry::to_pair).collect()
    }

    /// Scope over the `[cipher]` section, or an empty scope without one.
    pub fn scope(&self) -> AnonymizatorResult<AnonymizationScope> {
        Ok(AnonymizationScope::new(self.build_cipher()?.map(Arc::new)))
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Default cipher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherConfig {
    /// AES-128/192/256 key as hex, zeroized on drop
    pub key: SecretString,

    /// 14 hex characters, seven zero bytes when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweak: Option<String>,

    /// Radix of the default alphabet (2..=62)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radix: Option<usize>,

    /// Custom alphabet, mutually exclusive with `radix`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,
}

impl CipherConfig {
    fn validate(&self) -> Result<(), String> {
        validate_key("cipher.key", &self.key)?;
        if let Some(tweak) = &self.tweak {
            parse_tweak(tweak).map_err(|e| format!("Invalid cipher.tweak: {e}"))?;
        }
        if self.radix.is_some() && self.alphabet.is_some() {
            return Err("cipher.radix and cipher.alphabet cannot both be set".to_string());
        }
        self.alphabet()
            .map_err(|e| format!("Invalid cipher alphabet: {e}"))?;
        Ok(())
    }

    /// Alphabet from `alphabet`, else the default alphabet of `radix`
    /// (decimal digits when neither is set).
    pub fn alphabet(&self) -> AnonymizatorResult<Alphabet> {
        let alphabet = match (&self.alphabet, self.radix) {
            (Some(symbols), _) => Alphabet::new(symbols)?,
            (None, Some(radix)) => Alphabet::for_radix(radix)?,
            (None, None) => Alphabet::digits(),
        };
        Ok(alphabet)
    }

    pub fn tweak(&self) -> AnonymizatorResult<Tweak> {
        match &self.tweak {
            Some(tweak) => Ok(parse_tweak(tweak)?),
            None => Ok(ZERO_TWEAK),
        }
    }

    pub fn build(&self) -> AnonymizatorResult<FpeCipher> {
        let pair = KeyTweakPair::from_secret("default", self.key.clone(), self.tweak()?);
        Ok(pair.cipher_with_alphabet(self.alphabet()?)?)
    }
}

/// One `[[keys]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEntry {
    pub name: String,

    /// Key as hex
    pub key: SecretString,

    /// 14 hex characters, seven zero bytes when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweak: Option<String>,
}

impl KeyEntry {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("keys.name cannot be empty".to_string());
        }
        validate_key(&format!("keys.{}.key", self.name), &self.key)?;
        if let Some(tweak) = &self.tweak {
            parse_tweak(tweak).map_err(|e| format!("Invalid keys.{}.tweak: {e}", self.name))?;
        }
        Ok(())
    }

    pub fn to_pair(&self) -> AnonymizatorResult<KeyTweakPair> {
        let tweak = match &self.tweak {
            Some(tweak) => parse_tweak(tweak)?,
            None => ZERO_TWEAK,
        };
        Ok(KeyTweakPair::from_secret(
            self.name.clone(),
            self.key.clone(),
            tweak,
        ))
    }
}

fn validate_key(field: &str, key: &SecretString) -> Result<(), String> {
    let key = key.expose_secret();
    if key.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    let bytes = key
        .decode_hex()
        .map_err(|e| format!("{field} is not valid hex: {e}"))?;
    if ![16, 24, 32].contains(&bytes.len()) {
        return Err(format!(
            "{field} must be 16, 24 or 32 bytes (got {})",
            bytes.len()
        ));
    }
    Ok(())
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory of the log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn cipher_config() -> CipherConfig {
        CipherConfig {
            key: secret_string("2b".repeat(32)),
            tweak: Some("A1B2C3D4E5F678".to_string()),
            radix: Some(10),
            alphabet: None,
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cipher_config_validation() {
        let mut config = cipher_config();
        assert!(config.validate().is_ok());

        config.tweak = Some("A1B2".to_string());
        assert!(config.validate().is_err());

        let mut config = cipher_config();
        config.key = secret_string("abc".to_string());
        assert!(config.validate().is_err());

        let mut config = cipher_config();
        config.key = secret_string("00".repeat(20));
        let err = config.validate().unwrap_err();
        assert!(err.contains("16, 24 or 32"));

        let mut config = cipher_config();
        config.alphabet = Some("abc".to_string());
        assert!(config.validate().is_err());

        let mut config = cipher_config();
        config.radix = Some(63);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cipher_config_builds_cipher() {
        let cipher = cipher_config().build().unwrap();
        assert_eq!(cipher.radix(), 10);
        assert_eq!(cipher.tweak(), &[0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6, 0x78]);

        let mut config = cipher_config();
        config.radix = None;
        config.alphabet = Some("ACGT".to_string());
        config.tweak = None;
        let cipher = config.build().unwrap();
        assert_eq!(cipher.radix(), 4);
        assert_eq!(cipher.tweak(), &ZERO_TWEAK);

        config.alphabet = Some("0123456789abcdefghijklmnopqrstuvwxyz".to_string());
        let cipher = config.build().unwrap();
        assert_eq!(cipher.radix(), 36);
        assert_eq!(cipher.tweak(), &ZERO_TWEAK);
    }

    #[test]
    fn test_key_entries() {
        let config = AnonymizatorConfig {
            keys: vec![
                KeyEntry {
                    name: "customers".to_string(),
                    key: secret_string("00".repeat(32)),
                    tweak: None,
                },
                KeyEntry {
                    name: "customers".to_string(),
                    key: secret_string("11".repeat(32)),
                    tweak: None,
                },
            ],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("Duplicate"));

        let ring = config.key_ring().unwrap();
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_scope_without_cipher() {
        let config = AnonymizatorConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.scope().unwrap().has_cipher());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_path, "./logs");
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let config = LoggingConfig {
            local_rotation: "size".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

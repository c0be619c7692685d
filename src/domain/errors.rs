//! Domain error types
//!
//! This module defines the error hierarchy for Anonymizator. Cipher failures
//! are kept in their own enum so that callers working only with
//! [`crate::fpe::FpeCipher`] never see configuration or I/O variants.

use thiserror::Error;

/// Errors raised by the format-preserving cipher
///
/// Every variant carries the offending value so that a caller can report
/// what went wrong without echoing the (possibly sensitive) input itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// A symbol of the input is not part of the cipher alphabet
    #[error("Invalid character '{0}' for the cipher alphabet")]
    InvalidCharacter(char),

    /// Input length is outside the range the cipher supports
    #[error("Invalid input length {length}: must be between {min} and {max}")]
    InvalidLength { length: usize, min: usize, max: usize },

    /// Tweak is not exactly 7 bytes long
    #[error("Invalid tweak length {0}: must be exactly 7 bytes")]
    InvalidTweak(usize),

    /// Radix/alphabet is too small to provide a domain of at least one million values
    #[error("Insufficient domain size for radix {0}")]
    InsufficientDomain(usize),

    /// Default alphabet requested for a radix it cannot cover
    #[error("Unsupported radix {0}: provide a custom alphabet for radix above 62")]
    UnsupportedRadix(usize),

    /// Key material could not be used as an AES key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Alphabet has duplicate symbols or fewer than two symbols
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),
}

/// Main Anonymizator error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum AnonymizatorError {
    /// Cipher construction or encryption errors
    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// An anonymizer was requested from a scope without a cipher
    #[error("No active cipher: create the anonymization scope with a cipher first")]
    NoActiveCipher,

    /// Preservation pattern failed to compile
    #[error("Invalid preservation pattern: {0}")]
    InvalidPattern(String),

    /// Key generation, derivation or lookup errors
    #[error("Key management error: {0}")]
    KeyManagement(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymizatorError {
    fn from(err: std::io::Error) -> Self {
        AnonymizatorError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AnonymizatorError {
    fn from(err: serde_json::Error) -> Self {
        AnonymizatorError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymizatorError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizatorError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<regex::Error> for AnonymizatorError {
    fn from(err: regex::Error) -> Self {
        AnonymizatorError::InvalidPattern(err.to_string())
    }
}

impl From<hex::FromHexError> for AnonymizatorError {
    fn from(err: hex::FromHexError) -> Self {
        AnonymizatorError::KeyManagement(format!("invalid hex: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_error_display() {
        let err = CipherError::InvalidLength {
            length: 1,
            min: 2,
            max: 56,
        };
        assert_eq!(
            err.to_string(),
            "Invalid input length 1: must be between 2 and 56"
        );
        assert_eq!(
            CipherError::InvalidTweak(8).to_string(),
            "Invalid tweak length 8: must be exactly 7 bytes"
        );
    }

    #[test]
    fn test_cipher_error_conversion() {
        let err: AnonymizatorError = CipherError::InvalidCharacter('x').into();
        assert!(matches!(
            err,
            AnonymizatorError::Cipher(CipherError::InvalidCharacter('x'))
        ));
        assert!(err.to_string().starts_with("Cipher error:"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: AnonymizatorError = io_err.into();
        assert!(matches!(err, AnonymizatorError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: AnonymizatorError = toml_err.into();
        assert!(matches!(err, AnonymizatorError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_regex_error_conversion() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: AnonymizatorError = regex_err.into();
        assert!(matches!(err, AnonymizatorError::InvalidPattern(_)));
    }

    #[test]
    fn test_hex_error_conversion() {
        let hex_err = hex::decode("zz").unwrap_err();
        let err: AnonymizatorError = hex_err.into();
        assert!(matches!(err, AnonymizatorError::KeyManagement(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = AnonymizatorError::NoActiveCipher;
        let _: &dyn std::error::Error = &err;
        let err = CipherError::InsufficientDomain(2);
        let _: &dyn std::error::Error = &err;
    }
}

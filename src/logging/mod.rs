//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - human readable console output on stderr
//! - optional JSON log files with daily or hourly rotation
//!
//! Plaintext values never reach the logs. Anonymizers report field kinds and
//! lengths only.
//!
//! # Example
//!
//! ```no_run
//! use anonymizator::logging::init_logging;
//! use anonymizator::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(kind = "phone", "Anonymizer ready");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use anonymizator::log_error_with_context;
/// use anonymizator::domain::AnonymizatorError;
///
/// let error = AnonymizatorError::Configuration("Invalid config".to_string());
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

/// Log a value that was passed through unchanged because it could not be
/// decrypted. Only the length of the value is recorded.
///
/// # Example
///
/// ```no_run
/// use anonymizator::log_field_fallback;
/// use anonymizator::domain::CipherError;
///
/// let error = CipherError::InvalidCharacter('@');
/// log_field_fallback!("email", 12, &error);
/// ```
#[macro_export]
macro_rules! log_field_fallback {
    ($kind:expr, $length:expr, $error:expr) => {
        tracing::debug!(
            kind = $kind,
            length = $length,
            error = %$error,
            "Value left unchanged after failed decryption"
        );
    };
}

/// Log a value routed to substitution because it does not fit the
/// anonymizer's expected format.
#[macro_export]
macro_rules! log_format_fallback {
    ($kind:expr, $length:expr) => {
        tracing::debug!(
            kind = $kind,
            length = $length,
            "Value does not match the expected format, using substitution"
        );
    };
}

//! Configuration management
//!
//! TOML configuration with `${VAR}` substitution, `ANONYMIZATOR_*`
//! environment overrides and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use anonymizator::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("anonymizator.toml")?;
//! let scope = config.scope()?;
//! println!("cipher configured: {}", scope.has_cipher());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [cipher]
//! key = "${ANONYMIZATOR_KEY}"
//! tweak = "00000000000000"
//! radix = 10
//!
//! [[keys]]
//! name = "customers"
//! key = "${ANONYMIZATOR_CUSTOMERS_KEY}"
//! tweak = "A1B2C3D4E5F678"
//!
//! [anonymizers.phone]
//! preserve_country_code = true
//! policy = "country_code_table"
//!
//! [logging]
//! local_enabled = false
//! local_path = "./logs"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{AnonymizatorConfig, ApplicationConfig, CipherConfig, KeyEntry, LoggingConfig};
pub use secret::{secret_string, SecretString, SecretValue};

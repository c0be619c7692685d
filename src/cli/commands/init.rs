//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "anonymizator.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Anonymizator configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Create a key: anonymizator generate-key");
                println!("  2. Put the key in a .env file as ANONYMIZATOR_KEY");
                println!("  3. Validate configuration: anonymizator validate-config");
                println!("  4. Anonymize: anonymizator anonymize --kind phone \"+40 721 234 567\"");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Anonymizator Configuration File

[application]
log_level = "info"

[cipher]
key = "${ANONYMIZATOR_KEY}"
tweak = "00000000000000"
radix = 10

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Anonymizator Configuration File
#
# Values may reference environment variables with ${VAR_NAME}. Any key can
# also be overridden with ANONYMIZATOR_<SECTION>_<KEY>, for example
# ANONYMIZATOR_CIPHER_KEY or ANONYMIZATOR_LOGGING_LOCAL_PATH.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Default Cipher
# ============================================================================
[cipher]
# AES key as hex: 32, 48 or 64 characters (AES-128/192/256)
key = "${ANONYMIZATOR_KEY}"

# Seven byte tweak as 14 hex characters
tweak = "00000000000000"

# Radix of the default alphabet (2..=62): digits, then a-z, then A-Z
radix = 10

# Or a custom alphabet instead of radix
# alphabet = "0123456789abcdef"

# ============================================================================
# Named Keys (used with --key-name)
# ============================================================================
# [[keys]]
# name = "customers"
# key = "${ANONYMIZATOR_CUSTOMERS_KEY}"
# tweak = "A1B2C3D4E5F678"

# ============================================================================
# Anonymizers
# ============================================================================
[anonymizers.preservation]
# Characters kept at their position by every anonymizer's fallback
preserve_characters = ""
# Regular expression whose capture groups are encrypted individually
# preserve_pattern = "([0-9]{3})-([0-9]{4})"

[anonymizers.string]
preserve_case = true
preserve_spaces = true
preserve_punctuation = true

[anonymizers.name]
preserve_capitalization = true
preserve_special_chars = false

[anonymizers.numeric]
preserve_sign = true
preserve_decimal_point = true
# preserve_decimal_places = 2
preserve_magnitude = false

[anonymizers.phone]
# country_code_table | fixed_nanp
policy = "country_code_table"
preserve_country_code = true
preserve_area_code = false
preserve_leading_digits = 0

[anonymizers.email]
preserve_domain = true
preserve_dots = false
preserve_underscores = false

[anonymizers.credit_card]
preserve_first_four = false
preserve_last_four = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files next to the console output
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnonymizatorConfig;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "anonymizator.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "anonymizator.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: AnonymizatorConfig = toml::from_str(&content).unwrap();
            assert_eq!(config.application.log_level, "info");
            assert!(config.cipher.is_some());
            assert!(config.anonymizers.validate().is_ok());
        }
    }

    #[test]
    fn test_existing_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("anonymizator.toml");
        fs::write(&output, "# mine").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# mine");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&output).unwrap().contains("[cipher]"));
    }
}

//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the configuration file.

use clap::Args;

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also build every configured cipher
    #[arg(long)]
    pub build_ciphers: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if self.build_ciphers {
            if let Err(e) = config.build_cipher() {
                println!("❌ Failed to build the [cipher] cipher");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
            for entry in &config.keys {
                if let Err(e) = entry.to_pair().and_then(|pair| pair.cipher(10).map_err(Into::into)) {
                    println!("❌ Failed to build cipher for key '{}'", entry.name);
                    println!("   Error: {e}");
                    return Ok(EXIT_CONFIG);
                }
            }
            println!("✅ All ciphers built");
        }

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        match &config.cipher {
            Some(cipher) => {
                let alphabet = cipher
                    .alphabet()
                    .map(|a| a.radix().to_string())
                    .unwrap_or_else(|_| "?".to_string());
                println!("  Cipher: configured (radix {alphabet})");
            }
            None => println!("  Cipher: not configured"),
        }
        let names: Vec<&str> = config.keys.iter().map(|k| k.name.as_str()).collect();
        if names.is_empty() {
            println!("  Named Keys: none");
        } else {
            println!("  Named Keys: {}", names.join(", "));
        }
        println!("  Phone Policy: {:?}", config.anonymizers.phone.policy);
        println!(
            "  Email Domain Preserved: {}",
            config.anonymizers.email.preserve_domain
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[cipher]\nkey = \"000102030405060708090a0b0c0d0e0f\"\nradix = 36\n")
            .unwrap();
        file.flush().unwrap();

        let args = ValidateArgs { build_ciphers: true };
        let code = args.execute(&file.path().to_string_lossy()).unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[application]\nlog_level = \"loud\"\n").unwrap();
        file.flush().unwrap();

        let args = ValidateArgs { build_ciphers: false };
        let code = args.execute(&file.path().to_string_lossy()).unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}

//! Key generation commands
//!
//! `generate-key` prints a random pair, `derive-key` a pair derived from a
//! master key. Output is TOML that can be pasted into a `[[keys]]` entry.

use anyhow::Context;
use clap::Args;
use secrecy::ExposeSecret;

use super::EXIT_OK;
use crate::keys::{KeyGenerator, KeyTweakPair};

/// Arguments for the generate-key command
#[derive(Args, Debug)]
pub struct GenerateKeyArgs {
    /// Name of the generated pair
    #[arg(short, long, default_value = "default")]
    pub name: String,
}

impl GenerateKeyArgs {
    /// Execute the generate-key command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(name = %self.name, "Generating key/tweak pair");
        let pair = KeyGenerator::new().generate(&self.name);
        print!("{}", key_entry(&pair));
        Ok(EXIT_OK)
    }
}

/// Arguments for the derive-key command
#[derive(Args, Debug)]
pub struct DeriveKeyArgs {
    /// Master key as hex
    #[arg(short, long, env = "ANONYMIZATOR_MASTER_KEY", hide_env_values = true)]
    pub master: String,

    /// Identifier the pair is derived for
    #[arg(short, long)]
    pub identifier: String,

    /// Treat the identifier as a phone number and derive from its digits
    #[arg(long)]
    pub phone: bool,
}

impl DeriveKeyArgs {
    /// Execute the derive-key command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(phone = self.phone, "Deriving key/tweak pair");
        let generator = KeyGenerator::new();
        let pair = if self.phone {
            generator.derive_for_phone(&self.master, &self.identifier)
        } else {
            generator.derive(&self.master, &self.identifier)
        }
        .context("Failed to derive key/tweak pair")?;

        print!("{}", key_entry(&pair));
        Ok(EXIT_OK)
    }
}

/// Renders a pair as a `[[keys]]` TOML entry.
fn key_entry(pair: &KeyTweakPair) -> String {
    format!(
        "[[keys]]\nname = {:?}\nkey = \"{}\"\ntweak = \"{}\"\n",
        pair.name(),
        pair.key().expose_secret().as_ref(),
        pair.tweak_hex()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnonymizatorConfig;

    #[test]
    fn test_key_entry_is_loadable() {
        let pair = KeyGenerator::new().generate("customers");
        let config: AnonymizatorConfig = toml::from_str(&key_entry(&pair)).unwrap();

        assert!(config.validate().is_ok());
        let ring = config.key_ring().unwrap();
        assert!(ring.contains("customers"));
    }

    #[test]
    fn test_derive_rejects_bad_master() {
        let args = DeriveKeyArgs {
            master: "not-hex".to_string(),
            identifier: "id".to_string(),
            phone: false,
        };
        assert!(args.execute().is_err());
    }
}

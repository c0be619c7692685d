//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Anonymizator using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Anonymizator - format-preserving anonymization toolkit
#[derive(Parser, Debug)]
#[command(name = "anonymizator")]
#[command(version, about, long_about = None)]
#[command(author = "Anonymizator Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "anonymizator.toml",
        env = "ANONYMIZATOR_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ANONYMIZATOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize values with the configured cipher
    Anonymize(commands::transform::TransformArgs),

    /// Restore values produced by `anonymize`
    Deanonymize(commands::transform::TransformArgs),

    /// Print a random key/tweak pair
    GenerateKey(commands::keys::GenerateKeyArgs),

    /// Print a key/tweak pair derived from a master key
    DeriveKey(commands::keys::DeriveKeyArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

//! Anonymize and deanonymize command implementation
//!
//! Both commands share their arguments: the value kind, an optional key name
//! from the `[[keys]]` table and the values to transform. Results are printed
//! one per line on stdout, in input order.

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::anonymization::{AnonymizationScope, AnonymizerKind};
use crate::config::{load_config, AnonymizatorConfig};
use crate::log_error_with_context;

/// Which way values are transformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Anonymize,
    Deanonymize,
}

/// Arguments for the anonymize and deanonymize commands
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Value kind (generic, string, name, numeric, phone, email, credit-card)
    #[arg(short, long)]
    pub kind: AnonymizerKind,

    /// Use this `[[keys]]` entry instead of the `[cipher]` section
    #[arg(long)]
    pub key_name: Option<String>,

    /// Radix of the default alphabet used with --key-name
    #[arg(long, default_value_t = 10)]
    pub radix: usize,

    /// Print a JSON array of results instead of one value per line
    #[arg(long)]
    pub json: bool,

    /// Values to transform
    #[arg(required = true)]
    pub values: Vec<String>,
}

/// One entry of the `--json` output
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Value(String),
    Error(String),
}

impl TransformArgs {
    /// Execute the command
    pub fn execute(&self, config_path: &str, direction: Direction) -> anyhow::Result<i32> {
        tracing::info!(
            kind = %self.kind,
            direction = ?direction,
            values = self.values.len(),
            "Transforming values"
        );

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load configuration file: {config_path}");
                eprintln!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let scope = match self.scope(&config) {
            Ok(scope) if scope.has_cipher() => scope,
            Ok(_) => {
                eprintln!("❌ No cipher configured");
                eprintln!("   Add a [cipher] section or pass --key-name");
                return Ok(EXIT_CONFIG);
            }
            Err(e) => {
                eprintln!("❌ Failed to set up the cipher");
                eprintln!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let results = match direction {
            Direction::Anonymize => {
                scope.anonymize_batch(self.kind, &config.anonymizers, &self.values)
            }
            Direction::Deanonymize => {
                scope.deanonymize_batch(self.kind, &config.anonymizers, &self.values)
            }
        }
        .with_context(|| format!("Failed to build the {} anonymizer", self.kind))?;

        let mut failed = 0usize;
        let mut outcomes = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(output) if self.json => outcomes.push(Outcome::Value(output)),
                Ok(output) => println!("{output}"),
                Err(e) => {
                    failed += 1;
                    log_error_with_context!(&e, "Value could not be transformed");
                    if self.json {
                        outcomes.push(Outcome::Error(e.to_string()));
                    } else {
                        eprintln!(
                            "❌ Value #{} ({} chars): {e}",
                            index + 1,
                            self.values[index].chars().count()
                        );
                    }
                }
            }
        }
        if self.json {
            let rendered = serde_json::to_string_pretty(&outcomes)
                .context("Failed to render results as JSON")?;
            println!("{rendered}");
        }

        if failed > 0 {
            tracing::warn!(
                failed,
                total = self.values.len(),
                "Some values were not transformed"
            );
            return Ok(EXIT_FATAL);
        }
        Ok(EXIT_OK)
    }

    fn scope(&self, config: &AnonymizatorConfig) -> crate::domain::Result<AnonymizationScope> {
        match &self.key_name {
            Some(name) => {
                let ring = config.key_ring()?;
                AnonymizationScope::from_resolver(&ring, name, self.radix)
            }
            None => config.scope(),
        }
    }
}

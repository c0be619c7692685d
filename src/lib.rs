// Anonymizator - Format-preserving anonymization toolkit
// Copyright (c) 2025 Anonymizator Contributors
// Licensed under the MIT License

//! # Anonymizator
//!
//! Reversible, format-preserving anonymization of personal data. Values keep
//! their length, alphabet and layout, so anonymized data still passes the
//! validation of the systems it flows through, and the key holder can
//! restore the originals.
//!
//! ## Architecture
//!
//! - [`fpe`] - FF3-1 style Feistel cipher over an arbitrary alphabet
//! - [`anonymization`] - Anonymizers for phone numbers, emails, names,
//!   numerals, card numbers and free text, plus preservation rules
//! - [`keys`] - Key/tweak pairs, generation, derivation and resolution
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use anonymizator::anonymization::{AnonymizationScope, AnonymizerKind, AnonymizerOptions};
//! use anonymizator::keys::KeyGenerator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pair = KeyGenerator::new().generate("customers");
//! let scope = AnonymizationScope::with_cipher(Arc::new(pair.cipher(10)?));
//!
//! let email = scope.anonymizer(AnonymizerKind::Email, &AnonymizerOptions::default())?;
//! let anonymized = email.anonymize("john.doe@example.com")?;
//! assert!(anonymized.ends_with("@example.com"));
//! assert_eq!(email.deanonymize(&anonymized)?, "john.doe@example.com");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Cipher failures are [`domain::CipherError`]; everything else is a
//! [`domain::AnonymizatorError`]. Deanonymization fails open: a field that
//! cannot be decrypted is returned unchanged.
//!
//! ## Logging
//!
//! Anonymizers log with `tracing` and only ever record kinds and lengths,
//! never the values themselves.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod fpe;
pub mod keys;
pub mod logging;

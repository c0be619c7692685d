//! Anonymization layer
//!
//! Builds on the [`crate::fpe`] cipher:
//! - **Preservation**: keep chosen characters or text outside regex capture
//!   groups unchanged ([`preserve`])
//! - **Anonymizers**: one per value kind, all behind the [`Anonymizer`] trait
//!   ([`anonymizer`])
//! - **Scope**: owns the active cipher and builds configured anonymizers
//!   ([`engine`])
//! - **Configuration**: per-kind options loaded from TOML ([`config`])

pub mod anonymizer;
pub mod config;
pub mod engine;
pub mod preserve;

pub use anonymizer::{Anonymizer, AnonymizerKind};
pub use config::AnonymizerOptions;
pub use engine::AnonymizationScope;

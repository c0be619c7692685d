//! Anonymization strategy module
//!
//! Every value kind has its own anonymizer. All of them implement
//! [`Anonymizer`]; [`AnonymizerKind`] names them in configuration and on the
//! command line.

pub mod credit_card;
pub mod email;
pub mod generic;
pub mod name;
pub mod numeric;
pub mod phone;
pub mod string;
pub mod substitution;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{AnonymizatorError, Result};

pub use credit_card::CreditCardAnonymizer;
pub use email::EmailAnonymizer;
pub use generic::GenericAnonymizer;
pub use name::NameAnonymizer;
pub use numeric::NumericAnonymizer;
pub use phone::{PhoneAnonymizer, PhonePolicy};
pub use string::StringAnonymizer;

/// Trait for anonymizer implementations
///
/// Implementations are configured before they are shared and are read-only
/// afterwards, so one instance can serve many threads.
pub trait Anonymizer: Send + Sync {
    /// Kind of values this anonymizer is built for
    fn kind(&self) -> AnonymizerKind;

    /// Replace `input` with a format-preserving substitute
    fn anonymize(&self, input: &str) -> Result<String>;

    /// Recover the value `input` was produced from.
    ///
    /// Fields that cannot be decrypted are returned unchanged; errors are
    /// reserved for configuration problems.
    fn deanonymize(&self, input: &str) -> Result<String>;
}

/// Closed set of value kinds with a dedicated anonymizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnonymizerKind {
    Generic,
    String,
    Name,
    Numeric,
    Phone,
    Email,
    CreditCard,
}

impl AnonymizerKind {
    pub const ALL: [AnonymizerKind; 7] = [
        AnonymizerKind::Generic,
        AnonymizerKind::String,
        AnonymizerKind::Name,
        AnonymizerKind::Numeric,
        AnonymizerKind::Phone,
        AnonymizerKind::Email,
        AnonymizerKind::CreditCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnonymizerKind::Generic => "generic",
            AnonymizerKind::String => "string",
            AnonymizerKind::Name => "name",
            AnonymizerKind::Numeric => "numeric",
            AnonymizerKind::Phone => "phone",
            AnonymizerKind::Email => "email",
            AnonymizerKind::CreditCard => "credit-card",
        }
    }
}

impl fmt::Display for AnonymizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnonymizerKind {
    type Err = AnonymizatorError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        AnonymizerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                AnonymizatorError::Configuration(format!(
                    "Unknown anonymizer kind '{s}'. Expected one of: generic, string, name, numeric, phone, email, credit-card"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in AnonymizerKind::ALL {
            assert_eq!(kind.to_string().parse::<AnonymizerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_parse_variants() {
        assert_eq!(
            "credit_card".parse::<AnonymizerKind>().unwrap(),
            AnonymizerKind::CreditCard
        );
        assert_eq!(
            " Phone ".parse::<AnonymizerKind>().unwrap(),
            AnonymizerKind::Phone
        );
        assert!("address".parse::<AnonymizerKind>().is_err());
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&AnonymizerKind::CreditCard).unwrap();
        assert_eq!(json, "\"credit-card\"");
        let kind: AnonymizerKind = serde_json::from_str("\"email\"").unwrap();
        assert_eq!(kind, AnonymizerKind::Email);
    }
}

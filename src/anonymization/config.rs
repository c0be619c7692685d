//! Anonymizer configuration
//!
//! One table per anonymizer kind under `[anonymizers]`. Every field has a
//! default, so an empty section yields the behaviour of a freshly built
//! anonymizer.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::anonymizer::PhonePolicy;
use super::preserve::PatternPreservation;

/// Preservation settings shared by every anonymizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreservationOptions {
    /// Characters kept at their position, e.g. `"-/ "`
    pub preserve_characters: String,

    /// Regular expression whose capture groups are encrypted individually
    pub preserve_pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringOptions {
    pub preserve_case: bool,
    pub preserve_spaces: bool,
    pub preserve_punctuation: bool,
}

impl Default for StringOptions {
    fn default() -> Self {
        Self {
            preserve_case: true,
            preserve_spaces: true,
            preserve_punctuation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameOptions {
    pub preserve_capitalization: bool,
    pub preserve_special_chars: bool,
}

impl Default for NameOptions {
    fn default() -> Self {
        Self {
            preserve_capitalization: true,
            preserve_special_chars: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericOptions {
    pub preserve_sign: bool,
    pub preserve_decimal_point: bool,
    /// Leading fractional digits kept in clear
    pub preserve_decimal_places: Option<usize>,
    pub preserve_magnitude: bool,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            preserve_sign: true,
            preserve_decimal_point: true,
            preserve_decimal_places: None,
            preserve_magnitude: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneOptions {
    pub policy: PhonePolicy,
    pub preserve_country_code: bool,
    pub preserve_area_code: bool,
    pub preserve_leading_digits: usize,
}

impl Default for PhoneOptions {
    fn default() -> Self {
        Self {
            policy: PhonePolicy::CountryCodeTable,
            preserve_country_code: true,
            preserve_area_code: false,
            preserve_leading_digits: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailOptions {
    pub preserve_domain: bool,
    pub preserve_dots: bool,
    pub preserve_underscores: bool,
}

impl Default for EmailOptions {
    fn default() -> Self {
        Self {
            preserve_domain: true,
            preserve_dots: false,
            preserve_underscores: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditCardOptions {
    pub preserve_first_four: bool,
    pub preserve_last_four: bool,
}

impl Default for CreditCardOptions {
    fn default() -> Self {
        Self {
            preserve_first_four: false,
            preserve_last_four: true,
        }
    }
}

/// Settings for every anonymizer kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizerOptions {
    pub preservation: PreservationOptions,
    pub string: StringOptions,
    pub name: NameOptions,
    pub numeric: NumericOptions,
    pub phone: PhoneOptions,
    pub email: EmailOptions,
    pub credit_card: CreditCardOptions,
}

impl AnonymizerOptions {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = self.preservation.preserve_pattern.as_deref() {
            if !pattern.is_empty() {
                PatternPreservation::new(pattern)
                    .with_context(|| format!("Invalid preserve_pattern '{pattern}'"))?;
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("ANONYMIZATOR_PHONE_POLICY") {
            self.phone.policy = match val.to_lowercase().as_str() {
                "country_code_table" => PhonePolicy::CountryCodeTable,
                "fixed_nanp" => PhonePolicy::FixedNanp,
                _ => anyhow::bail!("Invalid ANONYMIZATOR_PHONE_POLICY: {}", val),
            };
        }

        if let Ok(val) = std::env::var("ANONYMIZATOR_EMAIL_PRESERVE_DOMAIN") {
            self.email.preserve_domain = val
                .parse()
                .context("Invalid ANONYMIZATOR_EMAIL_PRESERVE_DOMAIN value")?;
        }

        if let Ok(val) = std::env::var("ANONYMIZATOR_CREDIT_CARD_PRESERVE_LAST_FOUR") {
            self.credit_card.preserve_last_four = val
                .parse()
                .context("Invalid ANONYMIZATOR_CREDIT_CARD_PRESERVE_LAST_FOUR value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = AnonymizerOptions::default();
        assert!(options.string.preserve_case);
        assert!(options.name.preserve_capitalization);
        assert!(!options.name.preserve_special_chars);
        assert!(options.numeric.preserve_sign);
        assert_eq!(options.numeric.preserve_decimal_places, None);
        assert_eq!(options.phone.policy, PhonePolicy::CountryCodeTable);
        assert!(options.phone.preserve_country_code);
        assert!(options.email.preserve_domain);
        assert!(options.credit_card.preserve_last_four);
        assert!(!options.credit_card.preserve_first_four);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options: AnonymizerOptions = toml::from_str(
            r#"
            [phone]
            policy = "fixed_nanp"
            preserve_area_code = true

            [numeric]
            preserve_decimal_places = 2
            "#,
        )
        .unwrap();

        assert_eq!(options.phone.policy, PhonePolicy::FixedNanp);
        assert!(options.phone.preserve_area_code);
        assert!(options.phone.preserve_country_code);
        assert_eq!(options.numeric.preserve_decimal_places, Some(2));
        assert!(options.numeric.preserve_decimal_point);
    }

    #[test]
    fn test_validation_rejects_bad_pattern() {
        let mut options = AnonymizerOptions::default();
        assert!(options.validate().is_ok());
        options.preservation.preserve_pattern = Some("(\\d+".to_string());
        assert!(options.validate().is_err());
    }
}

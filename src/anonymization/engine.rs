//! Anonymization scope
//!
//! An [`AnonymizationScope`] owns the active cipher and hands out configured
//! anonymizers. Callers never pass keys to anonymizers directly: they build a
//! scope from a cipher (or from a named key in a [`KeyResolver`]) and request
//! the anonymizer for the kind of value they hold.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use anonymizator::anonymization::{AnonymizationScope, AnonymizerKind, AnonymizerOptions};
//! use anonymizator::fpe::FpeCipher;
//!
//! # fn example() -> anonymizator::domain::Result<()> {
//! let cipher = FpeCipher::new(&"00".repeat(32), &[0u8; 7], 10)?;
//! let scope = AnonymizationScope::with_cipher(Arc::new(cipher));
//!
//! let phone = scope.anonymizer(AnonymizerKind::Phone, &AnonymizerOptions::default())?;
//! let anonymized = phone.anonymize("+40 721 234 567")?;
//! assert!(anonymized.starts_with("+40 "));
//! assert_eq!(phone.deanonymize(&anonymized)?, "+40 721 234 567");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::sync::Arc;

use crate::anonymization::anonymizer::{
    Anonymizer, AnonymizerKind, CreditCardAnonymizer, EmailAnonymizer, GenericAnonymizer,
    NameAnonymizer, NumericAnonymizer, PhoneAnonymizer, StringAnonymizer,
};
use crate::anonymization::config::{AnonymizerOptions, PreservationOptions};
use crate::domain::{AnonymizatorError, Result};
use crate::fpe::FpeCipher;
use crate::keys::KeyResolver;

/// Holds the cipher anonymizers are built with.
///
/// A scope without a cipher is valid to construct but every request for an
/// anonymizer fails with [`AnonymizatorError::NoActiveCipher`].
#[derive(Debug, Clone, Default)]
pub struct AnonymizationScope {
    cipher: Option<Arc<FpeCipher>>,
}

impl AnonymizationScope {
    pub fn new(cipher: Option<Arc<FpeCipher>>) -> Self {
        Self { cipher }
    }

    pub fn with_cipher(cipher: Arc<FpeCipher>) -> Self {
        Self::new(Some(cipher))
    }

    /// Scope over the named key of `resolver`, using the default alphabet of
    /// `radix`.
    pub fn from_resolver(resolver: &dyn KeyResolver, name: &str, radix: usize) -> Result<Self> {
        let pair = resolver.resolve(name)?;
        let cipher = pair.cipher(radix)?;
        tracing::debug!(key = name, radix, "Anonymization scope opened");
        Ok(Self::with_cipher(Arc::new(cipher)))
    }

    /// The active cipher.
    ///
    /// # Errors
    ///
    /// [`AnonymizatorError::NoActiveCipher`] if the scope has none.
    pub fn cipher(&self) -> Result<&Arc<FpeCipher>> {
        self.cipher.as_ref().ok_or(AnonymizatorError::NoActiveCipher)
    }

    pub fn has_cipher(&self) -> bool {
        self.cipher.is_some()
    }

    /// Builds the anonymizer for `kind`, configured from `options`.
    pub fn anonymizer(
        &self,
        kind: AnonymizerKind,
        options: &AnonymizerOptions,
    ) -> Result<Box<dyn Anonymizer>> {
        let cipher = Arc::clone(self.cipher()?);
        let preservation = &options.preservation;
        let preserved_chars: Vec<char> = preservation.preserve_characters.chars().collect();

        let anonymizer: Box<dyn Anonymizer> = match kind {
            AnonymizerKind::Generic => {
                let mut anonymizer = GenericAnonymizer::new(cipher);
                anonymizer.set_preserve_characters(&preserved_chars);
                anonymizer.set_preserve_pattern(pattern_of(preservation))?;
                Box::new(anonymizer)
            }
            AnonymizerKind::String => {
                let mut anonymizer = StringAnonymizer::new(cipher)?;
                anonymizer.set_preserve_case(options.string.preserve_case);
                anonymizer.set_preserve_spaces(options.string.preserve_spaces);
                anonymizer.set_preserve_punctuation(options.string.preserve_punctuation);
                anonymizer.set_preserve_characters(&preserved_chars);
                anonymizer.set_preserve_pattern(pattern_of(preservation))?;
                Box::new(anonymizer)
            }
            AnonymizerKind::Name => {
                let mut anonymizer = NameAnonymizer::new(cipher)?;
                anonymizer.set_preserve_capitalization(options.name.preserve_capitalization);
                anonymizer.set_preserve_special_chars(options.name.preserve_special_chars);
                anonymizer.set_preserve_characters(&preserved_chars);
                anonymizer.set_preserve_pattern(pattern_of(preservation))?;
                Box::new(anonymizer)
            }
            AnonymizerKind::Numeric => {
                let mut anonymizer = NumericAnonymizer::new(cipher)?;
                anonymizer.set_preserve_sign(options.numeric.preserve_sign);
                anonymizer.set_preserve_decimal_point(options.numeric.preserve_decimal_point);
                anonymizer.set_preserve_decimal_places(options.numeric.preserve_decimal_places);
                anonymizer.set_preserve_magnitude(options.numeric.preserve_magnitude);
                anonymizer.set_preserve_characters(&preserved_chars);
                anonymizer.set_preserve_pattern(pattern_of(preservation))?;
                Box::new(anonymizer)
            }
            AnonymizerKind::Phone => {
                let mut anonymizer = PhoneAnonymizer::new(cipher)?;
                anonymizer.set_policy(options.phone.policy);
                anonymizer.set_preserve_country_code(options.phone.preserve_country_code);
                anonymizer.set_preserve_area_code(options.phone.preserve_area_code);
                anonymizer.set_preserve_leading_digits(options.phone.preserve_leading_digits);
                anonymizer.set_preserve_characters(&preserved_chars);
                anonymizer.set_preserve_pattern(pattern_of(preservation))?;
                Box::new(anonymizer)
            }
            AnonymizerKind::Email => {
                let mut anonymizer = EmailAnonymizer::new(cipher)?;
                anonymizer.set_preserve_domain(options.email.preserve_domain);
                anonymizer.set_preserve_dots(options.email.preserve_dots);
                anonymizer.set_preserve_underscores(options.email.preserve_underscores);
                anonymizer.set_preserve_characters(&preserved_chars);
                anonymizer.set_preserve_pattern(pattern_of(preservation))?;
                Box::new(anonymizer)
            }
            AnonymizerKind::CreditCard => {
                let mut anonymizer = CreditCardAnonymizer::new(cipher)?;
                anonymizer.set_preserve_first_four(options.credit_card.preserve_first_four);
                anonymizer.set_preserve_last_four(options.credit_card.preserve_last_four);
                anonymizer.set_preserve_characters(&preserved_chars);
                anonymizer.set_preserve_pattern(pattern_of(preservation))?;
                Box::new(anonymizer)
            }
        };

        tracing::debug!(kind = %kind, "Anonymizer configured");
        Ok(anonymizer)
    }

    /// Anonymizes every value with one anonymizer of `kind`. Results are
    /// returned per value, in order.
    pub fn anonymize_batch(
        &self,
        kind: AnonymizerKind,
        options: &AnonymizerOptions,
        values: &[String],
    ) -> Result<Vec<Result<String>>> {
        let anonymizer = self.anonymizer(kind, options)?;
        Ok(values.iter().map(|v| anonymizer.anonymize(v)).collect())
    }

    /// Deanonymizes every value with one anonymizer of `kind`.
    pub fn deanonymize_batch(
        &self,
        kind: AnonymizerKind,
        options: &AnonymizerOptions,
        values: &[String],
    ) -> Result<Vec<Result<String>>> {
        let anonymizer = self.anonymizer(kind, options)?;
        Ok(values.iter().map(|v| anonymizer.deanonymize(v)).collect())
    }
}

fn pattern_of(preservation: &PreservationOptions) -> &str {
    preservation.preserve_pattern.as_deref().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeyRing, KeyTweakPair};

    fn scope() -> AnonymizationScope {
        let cipher = FpeCipher::new(&"9d".repeat(32), &[6u8; 7], 10).unwrap();
        AnonymizationScope::with_cipher(Arc::new(cipher))
    }

    #[test]
    fn test_empty_scope_has_no_cipher() {
        let scope = AnonymizationScope::new(None);
        assert!(!scope.has_cipher());
        assert!(matches!(scope.cipher(), Err(AnonymizatorError::NoActiveCipher)));
        assert!(matches!(
            scope.anonymizer(AnonymizerKind::Phone, &AnonymizerOptions::default()),
            Err(AnonymizatorError::NoActiveCipher)
        ));
    }

    #[test]
    fn test_every_kind_is_built() {
        let scope = scope();
        for kind in AnonymizerKind::ALL {
            let anonymizer = scope.anonymizer(kind, &AnonymizerOptions::default()).unwrap();
            assert_eq!(anonymizer.kind(), kind);
        }
    }

    #[test]
    fn test_options_are_applied() {
        let mut options = AnonymizerOptions::default();
        options.email.preserve_domain = false;
        let email = scope().anonymizer(AnonymizerKind::Email, &options).unwrap();

        let anonymized = email.anonymize("alice@example.com").unwrap();
        assert!(!anonymized.ends_with("@example.com"));
        assert_eq!(email.deanonymize(&anonymized).unwrap(), "alice@example.com");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut options = AnonymizerOptions::default();
        options.preservation.preserve_pattern = Some("([0-9]".to_string());
        assert!(matches!(
            scope().anonymizer(AnonymizerKind::Generic, &options),
            Err(AnonymizatorError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_batch_reports_per_value() {
        let values = vec!["123456".to_string(), "1".to_string()];
        let results = scope()
            .anonymize_batch(AnonymizerKind::Generic, &AnonymizerOptions::default(), &values)
            .unwrap();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_scope_from_resolver() {
        let mut ring = KeyRing::new();
        ring.insert(KeyTweakPair::new("customers", "00".repeat(32), [0u8; 7]));

        let scope = AnonymizationScope::from_resolver(&ring, "customers", 10).unwrap();
        assert_eq!(scope.cipher().unwrap().radix(), 10);
        assert!(AnonymizationScope::from_resolver(&ring, "missing", 10).is_err());
    }
}

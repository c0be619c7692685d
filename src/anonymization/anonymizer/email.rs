//! Email address anonymization.

use std::sync::Arc;

use super::{Anonymizer, AnonymizerKind, StringAnonymizer};
use crate::anonymization::preserve::CharacterPreservation;
use crate::domain::Result;
use crate::fpe::{Alphabet, FpeCipher};
use crate::{log_field_fallback, log_format_fallback};

/// Encrypts the local part of an address and, unless preserved, its domain.
///
/// Each part is encrypted over `0-9a-zA-Z._-` when it fits that alphabet and
/// the cipher's length bounds; other parts are substituted. Values without
/// an `@` separating two non-empty parts are substituted as a whole.
#[derive(Debug, Clone)]
pub struct EmailAnonymizer {
    cipher: FpeCipher,
    fallback: StringAnonymizer,
    preserve_domain: bool,
    preserve_dots: bool,
    preserve_underscores: bool,
}

impl EmailAnonymizer {
    pub fn new(cipher: Arc<FpeCipher>) -> Result<Self> {
        Ok(Self {
            cipher: cipher.with_alphabet_value(Alphabet::email())?,
            fallback: StringAnonymizer::new(cipher)?,
            preserve_domain: true,
            preserve_dots: false,
            preserve_underscores: false,
        })
    }

    pub fn set_preserve_domain(&mut self, preserve: bool) {
        self.preserve_domain = preserve;
    }

    /// With `true`, the whole address goes through character preservation
    /// keeping `@`, dots and, if requested, underscores in place.
    pub fn set_preserve_dots(&mut self, preserve: bool) {
        self.preserve_dots = preserve;
    }

    pub fn set_preserve_underscores(&mut self, preserve: bool) {
        self.preserve_underscores = preserve;
    }

    pub fn set_preserve_characters(&mut self, chars: &[char]) {
        self.fallback.set_preserve_characters(chars);
    }

    pub fn set_preserve_pattern(&mut self, pattern: &str) -> Result<()> {
        self.fallback.set_preserve_pattern(pattern)
    }

    fn separators(&self) -> Option<CharacterPreservation> {
        if !self.preserve_dots && !self.preserve_underscores {
            return None;
        }
        let mut kept = vec!['@'];
        if self.preserve_dots {
            kept.push('.');
        }
        if self.preserve_underscores {
            kept.push('_');
        }
        Some(CharacterPreservation::new(&kept))
    }

    fn anonymize_part(&self, part: &str) -> Result<String> {
        if self.cipher.accepts(part) {
            Ok(self.cipher.encrypt(part)?)
        } else {
            self.fallback.anonymize(part)
        }
    }

    fn deanonymize_part(&self, part: &str) -> Result<String> {
        if self.cipher.accepts(part) {
            Ok(self.cipher.decrypt(part).unwrap_or_else(|e| {
                log_field_fallback!(AnonymizerKind::Email.as_str(), part.chars().count(), &e);
                part.to_string()
            }))
        } else {
            self.fallback.deanonymize(part)
        }
    }

    /// Addresses too long for separator preservation: substitution keeps
    /// dots, underscores and the `@` in place on its own.
    fn substitute_parts(
        &self,
        local: &str,
        domain: &str,
        substitute: impl Fn(&str) -> Result<String>,
    ) -> Result<String> {
        let local = substitute(local)?;
        let domain = if self.preserve_domain {
            domain.to_string()
        } else {
            substitute(domain)?
        };
        Ok(format!("{local}@{domain}"))
    }
}

fn split_address(input: &str) -> Option<(&str, &str)> {
    input
        .split_once('@')
        .filter(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

impl Anonymizer for EmailAnonymizer {
    fn kind(&self) -> AnonymizerKind {
        AnonymizerKind::Email
    }

    fn anonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        let Some((local, domain)) = split_address(input) else {
            log_format_fallback!(AnonymizerKind::Email.as_str(), input.chars().count());
            return self.fallback.anonymize(input);
        };
        if let Some(separators) = self.separators() {
            if separators.fits(input) {
                return separators.anonymize(&self.cipher, input);
            }
            log_format_fallback!(AnonymizerKind::Email.as_str(), input.chars().count());
            return self.substitute_parts(local, domain, |part| self.fallback.anonymize(part));
        }

        let local = self.anonymize_part(local)?;
        let domain = if self.preserve_domain {
            domain.to_string()
        } else {
            self.anonymize_part(domain)?
        };
        Ok(format!("{local}@{domain}"))
    }

    fn deanonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        let Some((local, domain)) = split_address(input) else {
            return self.fallback.deanonymize(input);
        };
        if let Some(separators) = self.separators() {
            if separators.fits(input) {
                return Ok(separators.deanonymize(&self.cipher, input));
            }
            return self.substitute_parts(local, domain, |part| self.fallback.deanonymize(part));
        }

        let local = self.deanonymize_part(local)?;
        let domain = if self.preserve_domain {
            domain.to_string()
        } else {
            self.deanonymize_part(domain)?
        };
        Ok(format!("{local}@{domain}"))
    }
}

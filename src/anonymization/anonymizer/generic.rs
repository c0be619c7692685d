//! Whole-value encryption with optional character or pattern preservation.

use std::sync::Arc;

use super::{Anonymizer, AnonymizerKind};
use crate::anonymization::preserve::Preservation;
use crate::domain::Result;
use crate::fpe::FpeCipher;
use crate::log_field_fallback;

/// Encrypts values with the scope's cipher as they are.
///
/// Without preservation the value must consist of 2..=max_len symbols of the
/// cipher alphabet, otherwise anonymization fails with a cipher error.
#[derive(Debug, Clone)]
pub struct GenericAnonymizer {
    cipher: Arc<FpeCipher>,
    preservation: Preservation,
}

impl GenericAnonymizer {
    pub fn new(cipher: Arc<FpeCipher>) -> Self {
        Self {
            cipher,
            preservation: Preservation::default(),
        }
    }

    pub fn cipher(&self) -> &Arc<FpeCipher> {
        &self.cipher
    }

    /// Characters that keep their position; an empty slice disables this.
    pub fn set_preserve_characters(&mut self, chars: &[char]) {
        self.preservation.set_characters(chars);
    }

    /// Regular expression whose capture groups are encrypted individually;
    /// an empty pattern disables this.
    pub fn set_preserve_pattern(&mut self, pattern: &str) -> Result<()> {
        self.preservation.set_pattern(pattern)
    }

    pub fn has_preservation(&self) -> bool {
        self.preservation.is_active()
    }

    /// Preservation-aware anonymization, `None` when nothing is preserved.
    pub(crate) fn anonymize_preserved(&self, input: &str) -> Result<Option<String>> {
        self.preservation.anonymize(&self.cipher, input)
    }

    /// Preservation-aware deanonymization, `None` when nothing is preserved.
    pub(crate) fn deanonymize_preserved(&self, input: &str) -> Option<String> {
        self.preservation.deanonymize(&self.cipher, input)
    }
}

impl Anonymizer for GenericAnonymizer {
    fn kind(&self) -> AnonymizerKind {
        AnonymizerKind::Generic
    }

    fn anonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        if let Some(output) = self.anonymize_preserved(input)? {
            return Ok(output);
        }
        Ok(self.cipher.encrypt(input)?)
    }

    fn deanonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        if let Some(output) = self.deanonymize_preserved(input) {
            return Ok(output);
        }
        Ok(self.cipher.decrypt(input).unwrap_or_else(|e| {
            log_field_fallback!(AnonymizerKind::Generic.as_str(), input.chars().count(), &e);
            input.to_string()
        }))
    }
}

//! Personal name anonymization.

use std::sync::Arc;

use super::substitution::{KeyedSeeds, SubstitutionTable, SPECIAL_LOWER, SPECIAL_UPPER};
use super::{Anonymizer, AnonymizerKind, GenericAnonymizer};
use crate::domain::Result;
use crate::fpe::alphabet::{LOWER_ALPHA, UPPER_ALPHA};
use crate::fpe::FpeCipher;

/// Separators between name tokens, kept verbatim
pub const NAME_SEPARATORS: [char; 3] = [' ', '-', '.'];

/// Substitutes the letters of each name token.
///
/// With capitalization preserved, lowercase letters map to lowercase and
/// uppercase to uppercase, so "Ana-Maria" keeps its shape. Accented letters
/// are permuted among themselves unless special characters are preserved.
#[derive(Debug, Clone)]
pub struct NameAnonymizer {
    base: GenericAnonymizer,
    lower: SubstitutionTable,
    upper: SubstitutionTable,
    letters: SubstitutionTable,
    special_lower: SubstitutionTable,
    special_upper: SubstitutionTable,
    preserve_capitalization: bool,
    preserve_special_chars: bool,
}

impl NameAnonymizer {
    pub fn new(cipher: Arc<FpeCipher>) -> Result<Self> {
        let seeds = KeyedSeeds::derive(&cipher)?;
        let letters_source = format!("{LOWER_ALPHA}{UPPER_ALPHA}");

        Ok(Self {
            base: GenericAnonymizer::new(cipher),
            lower: SubstitutionTable::shuffled(LOWER_ALPHA, seeds.lower),
            upper: SubstitutionTable::shuffled(UPPER_ALPHA, seeds.upper),
            letters: SubstitutionTable::shuffled(&letters_source, seeds.letters),
            special_lower: SubstitutionTable::shuffled(SPECIAL_LOWER, seeds.special),
            special_upper: SubstitutionTable::shuffled(SPECIAL_UPPER, seeds.special),
            preserve_capitalization: true,
            preserve_special_chars: false,
        })
    }

    pub fn set_preserve_capitalization(&mut self, preserve: bool) {
        self.preserve_capitalization = preserve;
    }

    /// With `true`, accented letters are kept as they are.
    pub fn set_preserve_special_chars(&mut self, preserve: bool) {
        self.preserve_special_chars = preserve;
    }

    pub fn set_preserve_characters(&mut self, chars: &[char]) {
        self.base.set_preserve_characters(chars);
    }

    pub fn set_preserve_pattern(&mut self, pattern: &str) -> Result<()> {
        self.base.set_preserve_pattern(pattern)
    }

    fn table_for(&self, c: char) -> Option<&SubstitutionTable> {
        if c.is_ascii_alphabetic() {
            Some(if !self.preserve_capitalization {
                &self.letters
            } else if c.is_ascii_uppercase() {
                &self.upper
            } else {
                &self.lower
            })
        } else if self.preserve_special_chars {
            None
        } else if SPECIAL_LOWER.contains(c) {
            Some(&self.special_lower)
        } else if SPECIAL_UPPER.contains(c) {
            Some(&self.special_upper)
        } else {
            None
        }
    }

    fn map_letters(
        &self,
        input: &str,
        map: impl Fn(&SubstitutionTable, char) -> Option<char>,
    ) -> String {
        input
            .chars()
            .map(|c| {
                if NAME_SEPARATORS.contains(&c) {
                    return c;
                }
                self.table_for(c)
                    .and_then(|table| map(table, c))
                    .unwrap_or(c)
            })
            .collect()
    }
}

impl Anonymizer for NameAnonymizer {
    fn kind(&self) -> AnonymizerKind {
        AnonymizerKind::Name
    }

    fn anonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        if let Some(output) = self.base.anonymize_preserved(input)? {
            return Ok(output);
        }
        Ok(self.map_letters(input, SubstitutionTable::substitute))
    }

    fn deanonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        if let Some(output) = self.base.deanonymize_preserved(input) {
            return Ok(output);
        }
        Ok(self.map_letters(input, SubstitutionTable::restore))
    }
}

//! Keyed substitution of free text.

use std::sync::Arc;

use super::substitution::{ascii_punctuation, KeyedSeeds, SubstitutionTable};
use super::{Anonymizer, AnonymizerKind, GenericAnonymizer};
use crate::domain::Result;
use crate::fpe::alphabet::{DIGITS, LOWER_ALPHA, UPPER_ALPHA};
use crate::fpe::FpeCipher;

/// Replaces ASCII letters and digits through keyed permutations, keeping the
/// length of the text and, by default, its case, spaces and punctuation.
///
/// Substitution works one character at a time, so it never fails on input of
/// any length. It is also the fallback the domain anonymizers use for values
/// that do not look like a phone number, an email or a card number.
#[derive(Debug, Clone)]
pub struct StringAnonymizer {
    base: GenericAnonymizer,
    seeds: KeyedSeeds,
    lower: SubstitutionTable,
    upper: SubstitutionTable,
    letters: SubstitutionTable,
    digits: SubstitutionTable,
    symbols: Option<SubstitutionTable>,
    preserve_case: bool,
    preserve_spaces: bool,
    preserve_punctuation: bool,
}

impl StringAnonymizer {
    /// Builds the substitution tables for `cipher`'s key.
    pub fn new(cipher: Arc<FpeCipher>) -> Result<Self> {
        let seeds = KeyedSeeds::derive(&cipher)?;
        let letters_source = format!("{LOWER_ALPHA}{UPPER_ALPHA}");

        Ok(Self {
            base: GenericAnonymizer::new(cipher),
            seeds,
            lower: SubstitutionTable::shuffled(LOWER_ALPHA, seeds.lower),
            upper: SubstitutionTable::shuffled(UPPER_ALPHA, seeds.upper),
            letters: SubstitutionTable::shuffled(&letters_source, seeds.letters),
            digits: SubstitutionTable::shuffled(DIGITS, seeds.digits),
            symbols: None,
            preserve_case: true,
            preserve_spaces: true,
            preserve_punctuation: true,
        })
    }

    /// With `false`, letters are substituted across both cases.
    pub fn set_preserve_case(&mut self, preserve: bool) {
        self.preserve_case = preserve;
    }

    /// With `false`, spaces are permuted together with the other symbols.
    pub fn set_preserve_spaces(&mut self, preserve: bool) {
        self.preserve_spaces = preserve;
        self.rebuild_symbols();
    }

    /// With `false`, ASCII punctuation is permuted among itself.
    pub fn set_preserve_punctuation(&mut self, preserve: bool) {
        self.preserve_punctuation = preserve;
        self.rebuild_symbols();
    }

    pub fn set_preserve_characters(&mut self, chars: &[char]) {
        self.base.set_preserve_characters(chars);
    }

    pub fn set_preserve_pattern(&mut self, pattern: &str) -> Result<()> {
        self.base.set_preserve_pattern(pattern)
    }

    fn rebuild_symbols(&mut self) {
        let mut class = String::new();
        if !self.preserve_punctuation {
            class.push_str(&ascii_punctuation());
        }
        if !self.preserve_spaces {
            class.push(' ');
        }
        self.symbols = (class.chars().count() > 1)
            .then(|| SubstitutionTable::shuffled(&class, self.seeds.symbols));
    }

    fn substitute(&self, c: char) -> char {
        if !c.is_ascii() {
            return c;
        }
        if let Some(symbol) = self.symbols.as_ref().and_then(|t| t.substitute(c)) {
            return symbol;
        }
        let table = if c.is_ascii_digit() {
            &self.digits
        } else if !self.preserve_case {
            &self.letters
        } else if c.is_ascii_uppercase() {
            &self.upper
        } else {
            &self.lower
        };
        table.substitute(c).unwrap_or(c)
    }

    fn restore(&self, c: char) -> char {
        if !c.is_ascii() {
            return c;
        }
        if let Some(symbol) = self.symbols.as_ref().and_then(|t| t.restore(c)) {
            return symbol;
        }
        let table = if c.is_ascii_digit() {
            &self.digits
        } else if !self.preserve_case {
            &self.letters
        } else if c.is_ascii_uppercase() {
            &self.upper
        } else {
            &self.lower
        };
        table.restore(c).unwrap_or(c)
    }
}

impl Anonymizer for StringAnonymizer {
    fn kind(&self) -> AnonymizerKind {
        AnonymizerKind::String
    }

    fn anonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        if let Some(output) = self.base.anonymize_preserved(input)? {
            return Ok(output);
        }
        Ok(input.chars().map(|c| self.substitute(c)).collect())
    }

    fn deanonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        if let Some(output) = self.base.deanonymize_preserved(input) {
            return Ok(output);
        }
        Ok(input.chars().map(|c| self.restore(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymizer() -> StringAnonymizer {
        let cipher = FpeCipher::new(&"5a".repeat(32), &[0u8; 7], 10).unwrap();
        StringAnonymizer::new(Arc::new(cipher)).unwrap()
    }

    #[test]
    fn test_default_keeps_shape() {
        let anonymizer = anonymizer();
        let anonymized = anonymizer.anonymize("Hello, World 42!").unwrap();

        assert_eq!(anonymized.chars().count(), 16);
        for (original, replaced) in "Hello, World 42!".chars().zip(anonymized.chars()) {
            assert_eq!(original.is_ascii_uppercase(), replaced.is_ascii_uppercase());
            assert_eq!(original.is_ascii_lowercase(), replaced.is_ascii_lowercase());
            assert_eq!(original.is_ascii_digit(), replaced.is_ascii_digit());
            if !original.is_ascii_alphanumeric() {
                assert_eq!(original, replaced);
            }
        }
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "Hello, World 42!");
    }

    #[test]
    fn test_non_ascii_passes_through() {
        let anonymizer = anonymizer();
        let anonymized = anonymizer.anonymize("café ß").unwrap();
        assert_eq!(anonymized.chars().nth(3), Some('é'));
        assert_eq!(anonymized.chars().nth(5), Some('ß'));
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "café ß");
    }

    #[test]
    fn test_case_mixing_roundtrip() {
        let mut anonymizer = anonymizer();
        anonymizer.set_preserve_case(false);
        let anonymized = anonymizer.anonymize("MixedCase Text").unwrap();
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "MixedCase Text");
    }

    #[test]
    fn test_symbols_permuted_roundtrip() {
        let mut anonymizer = anonymizer();
        anonymizer.set_preserve_punctuation(false);
        anonymizer.set_preserve_spaces(false);

        let input = "a-b c_d, e!f (g) @h";
        let anonymized = anonymizer.anonymize(input).unwrap();
        assert_eq!(anonymized.chars().count(), input.chars().count());
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), input);
    }

    #[test]
    fn test_same_key_same_output() {
        assert_eq!(
            anonymizer().anonymize("deterministic").unwrap(),
            anonymizer().anonymize("deterministic").unwrap()
        );
    }

    #[test]
    fn test_long_text_with_preserved_characters_is_substituted() {
        let mut anonymizer = anonymizer();
        anonymizer.set_preserve_characters(&['-']);
        let input = "order-2024-customer-reference-number-000123";
        let anonymized = anonymizer.anonymize(input).unwrap();

        assert_eq!(anonymized.len(), input.len());
        assert_eq!(anonymized.find('-'), Some(5));
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), input);
    }

    #[test]
    fn test_single_character() {
        let anonymizer = anonymizer();
        let anonymized = anonymizer.anonymize("q").unwrap();
        assert_eq!(anonymized.len(), 1);
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "q");
    }
}

//! Character and pattern preservation.
//!
//! Character preservation lifts chosen characters out of a value, encrypts
//! what remains and puts the lifted characters back at their original
//! positions. Pattern preservation encrypts only the capture groups of a
//! regular expression and leaves the text around them untouched.

use rand::Rng;
use regex::{Captures, Match, Regex};

use crate::domain::{AnonymizatorError, Result};
use crate::fpe::alphabet::UPPER_ALPHA;
use crate::fpe::cipher::max_input_len;
use crate::fpe::{Alphabet, FpeCipher};
use crate::log_field_fallback;

/// Characters kept at fixed positions while the rest of the value is
/// encrypted over a letters-and-digits alphabet.
///
/// Characters outside the alphabet are dropped before encryption and values
/// with fewer than two encryptable characters are lengthened with filler
/// symbols, so anonymization of such values is not reversible.
#[derive(Debug, Clone)]
pub struct CharacterPreservation {
    chars: Vec<char>,
    alphabet: Alphabet,
}

impl CharacterPreservation {
    pub fn new(chars: &[char]) -> Self {
        Self {
            chars: chars.to_vec(),
            alphabet: Alphabet::letters_and_digits(),
        }
    }

    /// Replaces the alphabet remaining characters are encrypted over.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Whether `input` is short enough to be encrypted over this alphabet.
    ///
    /// Decided on the whole character count, which anonymization and every
    /// fallback leave unchanged, so both directions reach the same answer.
    pub fn fits(&self, input: &str) -> bool {
        input.chars().count() <= max_input_len(self.alphabet.radix())
    }

    pub fn anonymize(&self, cipher: &FpeCipher, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }

        let (preserved, remainder) = self.split(input);
        if remainder.is_empty() {
            return Ok(input.to_string());
        }

        let mut working = remainder;
        while working.chars().count() < 2 {
            working.push(self.alphabet.filler());
        }
        let mut working = self.alphabet.filter(&working);
        if working.chars().count() < 2 {
            working = self.alphabet.placeholder();
        }

        let sibling = cipher.with_alphabet_value(self.alphabet.clone())?;
        let encrypted = sibling.encrypt(&working)?;
        Ok(reinsert(&encrypted, &preserved))
    }

    /// Inverse of [`CharacterPreservation::anonymize`]. Values that cannot be
    /// decrypted come back unchanged.
    pub fn deanonymize(&self, cipher: &FpeCipher, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }

        let (preserved, remainder) = self.split(input);
        if remainder.chars().count() < 2 {
            return input.to_string();
        }

        let decrypted = cipher
            .with_alphabet_value(self.alphabet.clone())
            .and_then(|sibling| sibling.decrypt(&remainder));
        match decrypted {
            Ok(plain) => reinsert(&plain, &preserved),
            Err(e) => {
                log_field_fallback!("preserved", remainder.chars().count(), &e);
                input.to_string()
            }
        }
    }

    fn split(&self, input: &str) -> (Vec<(usize, char)>, String) {
        let mut preserved = Vec::new();
        let mut remainder = String::with_capacity(input.len());
        for (position, c) in input.chars().enumerate() {
            if self.chars.contains(&c) {
                preserved.push((position, c));
            } else {
                remainder.push(c);
            }
        }
        (preserved, remainder)
    }
}

fn reinsert(text: &str, preserved: &[(usize, char)]) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    for &(position, c) in preserved {
        if position <= chars.len() {
            chars.insert(position, c);
        } else {
            chars.push(c);
        }
    }
    chars.into_iter().collect()
}

/// Encrypts the capture groups of a regular expression, leaving the rest of
/// the value verbatim.
///
/// Groups are processed left to right; a group that overlaps an earlier one
/// is skipped, as are empty groups. Single character groups are replaced by
/// a random letter and are therefore not recoverable.
#[derive(Debug, Clone)]
pub struct PatternPreservation {
    regex: Regex,
}

impl PatternPreservation {
    /// # Errors
    ///
    /// [`AnonymizatorError::InvalidPattern`] if `pattern` does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn anonymize(&self, cipher: &FpeCipher, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }

        let Some(captures) = self.regex.captures(input) else {
            return encrypt_filtered(cipher, input);
        };

        let mut output = String::with_capacity(input.len());
        let mut cursor = 0;
        for group in capture_groups(&captures) {
            output.push_str(&input[cursor..group.start()]);
            if group.as_str().chars().count() < 2 {
                output.push(random_letter());
            } else {
                output.push_str(&encrypt_filtered(cipher, group.as_str())?);
            }
            cursor = group.end();
        }
        output.push_str(&input[cursor..]);
        Ok(output)
    }

    /// Inverse of [`PatternPreservation::anonymize`]. Groups that cannot be
    /// decrypted are left as they are.
    pub fn deanonymize(&self, cipher: &FpeCipher, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }

        let Some(captures) = self.regex.captures(input) else {
            return decrypt_or_keep(cipher, input);
        };

        let mut output = String::with_capacity(input.len());
        let mut cursor = 0;
        for group in capture_groups(&captures) {
            output.push_str(&input[cursor..group.start()]);
            if group.as_str().chars().count() < 2 {
                output.push_str(group.as_str());
            } else {
                output.push_str(&decrypt_or_keep(cipher, group.as_str()));
            }
            cursor = group.end();
        }
        output.push_str(&input[cursor..]);
        output
    }
}

/// Non-empty, non-overlapping capture groups in order of position.
fn capture_groups<'h>(captures: &Captures<'h>) -> Vec<Match<'h>> {
    let mut groups: Vec<Match<'h>> = captures
        .iter()
        .skip(1)
        .flatten()
        .filter(|m| !m.is_empty())
        .collect();
    groups.sort_by_key(|m| (m.start(), m.end()));

    let mut accepted: Vec<Match<'h>> = Vec::with_capacity(groups.len());
    for group in groups {
        if accepted.last().map_or(true, |last| group.start() >= last.end()) {
            accepted.push(group);
        }
    }
    accepted
}

fn encrypt_filtered(cipher: &FpeCipher, value: &str) -> Result<String> {
    let mut filtered = cipher.alphabet().filter(value);
    if filtered.chars().count() < 2 {
        filtered = cipher.alphabet().placeholder();
    }
    Ok(cipher.encrypt(&filtered)?)
}

fn decrypt_or_keep(cipher: &FpeCipher, value: &str) -> String {
    cipher.decrypt(value).unwrap_or_else(|e| {
        log_field_fallback!("pattern", value.chars().count(), &e);
        value.to_string()
    })
}

fn random_letter() -> char {
    let letters = UPPER_ALPHA.as_bytes();
    char::from(letters[rand::thread_rng().gen_range(0..letters.len())])
}

/// Combined preservation settings of an anonymizer. A pattern, when set,
/// takes precedence over preserved characters. Values too long for character
/// preservation are left to the anonymizer's own path.
#[derive(Debug, Clone, Default)]
pub struct Preservation {
    characters: Option<CharacterPreservation>,
    pattern: Option<PatternPreservation>,
}

impl Preservation {
    /// Sets the preserved characters; an empty slice clears them.
    pub fn set_characters(&mut self, chars: &[char]) {
        self.characters = if chars.is_empty() {
            None
        } else {
            Some(CharacterPreservation::new(chars))
        };
    }

    /// Sets the preservation pattern; an empty pattern clears it.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<()> {
        self.pattern = if pattern.is_empty() {
            None
        } else {
            Some(PatternPreservation::new(pattern).map_err(|e| match e {
                AnonymizatorError::InvalidPattern(msg) => {
                    AnonymizatorError::InvalidPattern(format!("{pattern}: {msg}"))
                }
                other => other,
            })?)
        };
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.characters.is_some() || self.pattern.is_some()
    }

    /// `None` when no preservation is configured.
    pub fn anonymize(&self, cipher: &FpeCipher, input: &str) -> Result<Option<String>> {
        if let Some(pattern) = &self.pattern {
            return pattern.anonymize(cipher, input).map(Some);
        }
        match &self.characters {
            Some(characters) if characters.fits(input) => {
                characters.anonymize(cipher, input).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// `None` when no preservation is configured.
    pub fn deanonymize(&self, cipher: &FpeCipher, input: &str) -> Option<String> {
        if let Some(pattern) = &self.pattern {
            return Some(pattern.deanonymize(cipher, input));
        }
        self.characters
            .as_ref()
            .filter(|characters| characters.fits(input))
            .map(|characters| characters.deanonymize(cipher, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(radix: usize) -> FpeCipher {
        FpeCipher::new(&"11".repeat(32), &[9, 8, 7, 6, 5, 4, 3], radix).unwrap()
    }

    #[test]
    fn test_reinsert_positions() {
        assert_eq!(reinsert("abcd", &[(1, '-'), (4, '-')]), "a-bc-d");
        assert_eq!(reinsert("ab", &[(5, '!')]), "ab!");
        assert_eq!(reinsert("", &[(0, '@')]), "@");
    }

    #[test]
    fn test_characters_keep_positions() {
        let preservation = CharacterPreservation::new(&['-', ' ']);
        let cipher = cipher(10);
        let anonymized = preservation.anonymize(&cipher, "AB-12 cd-34").unwrap();

        assert_eq!(anonymized.chars().count(), 11);
        assert_eq!(anonymized.chars().nth(2), Some('-'));
        assert_eq!(anonymized.chars().nth(5), Some(' '));
        assert_eq!(anonymized.chars().nth(8), Some('-'));
        assert_eq!(preservation.deanonymize(&cipher, &anonymized), "AB-12 cd-34");
    }

    #[test]
    fn test_characters_only_preserved_is_identity() {
        let preservation = CharacterPreservation::new(&['-']);
        assert_eq!(preservation.anonymize(&cipher(10), "---").unwrap(), "---");
        assert_eq!(preservation.deanonymize(&cipher(10), "---"), "---");
    }

    #[test]
    fn test_characters_short_remainder_is_padded() {
        let preservation = CharacterPreservation::new(&['-']);
        let anonymized = preservation.anonymize(&cipher(10), "a-").unwrap();
        assert_eq!(anonymized.chars().count(), 3);
        assert_eq!(anonymized.chars().nth(1), Some('-'));
    }

    #[test]
    fn test_pattern_encrypts_groups_only() {
        let preservation = PatternPreservation::new(r"^(\d{4})-(\d{4})$").unwrap();
        let cipher = cipher(10);
        let anonymized = preservation.anonymize(&cipher, "1234-5678").unwrap();

        assert_eq!(anonymized.len(), 9);
        assert_eq!(&anonymized[4..5], "-");
        assert_eq!(preservation.deanonymize(&cipher, &anonymized), "1234-5678");
    }

    #[test]
    fn test_pattern_without_match_encrypts_whole_value() {
        let preservation = PatternPreservation::new(r"^(\d+)-(\d+)$").unwrap();
        let cipher = cipher(10);
        let anonymized = preservation.anonymize(&cipher, "12 34 56").unwrap();
        assert_eq!(anonymized.len(), 6);
        assert!(anonymized.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_pattern_single_character_group_is_random_letter() {
        let preservation = PatternPreservation::new(r"^(\d)-(\d{3})$").unwrap();
        let anonymized = preservation.anonymize(&cipher(10), "1-234").unwrap();
        let first = anonymized.chars().next().unwrap();
        assert!(first.is_ascii_uppercase());
        assert_eq!(&anonymized[1..2], "-");
    }

    #[test]
    fn test_pattern_skips_overlapping_groups() {
        let preservation = PatternPreservation::new(r"^((\d{2})\d{2})-(\d{2})$").unwrap();
        let cipher = cipher(10);
        let anonymized = preservation.anonymize(&cipher, "1234-56").unwrap();
        assert_eq!(anonymized.len(), 7);
        assert_eq!(preservation.deanonymize(&cipher, &anonymized), "1234-56");
    }

    #[test]
    fn test_invalid_pattern() {
        let mut preservation = Preservation::default();
        assert!(matches!(
            preservation.set_pattern("([a-"),
            Err(AnonymizatorError::InvalidPattern(_))
        ));
        assert!(!preservation.is_active());
    }

    #[test]
    fn test_pattern_takes_precedence() {
        let mut preservation = Preservation::default();
        preservation.set_characters(&['-']);
        preservation.set_pattern(r"^(\d+)-(\d+)$").unwrap();
        let cipher = cipher(10);

        let anonymized = preservation.anonymize(&cipher, "123-456").unwrap().unwrap();
        assert_eq!(&anonymized[3..4], "-");
        assert!(anonymized.chars().filter(|c| *c != '-').all(|c| c.is_ascii_digit()));
        assert_eq!(
            preservation.deanonymize(&cipher, &anonymized).unwrap(),
            "123-456"
        );
    }

    #[test]
    fn test_fits_counts_every_character() {
        let preservation = CharacterPreservation::new(&['.']);
        assert!(preservation.fits(&"a.".repeat(16)));
        assert!(!preservation.fits(&format!("{}b", "a.".repeat(16))));
    }

    #[test]
    fn test_overlong_characters_are_left_to_caller() {
        let mut preservation = Preservation::default();
        preservation.set_characters(&['-']);
        let long = "abcd-".repeat(10);

        assert!(preservation.anonymize(&cipher(10), &long).unwrap().is_none());
        assert!(preservation.deanonymize(&cipher(10), &long).is_none());
    }

    #[test]
    fn test_inactive_preservation() {
        let preservation = Preservation::default();
        assert!(preservation.anonymize(&cipher(10), "abc").unwrap().is_none());
        assert!(preservation.deanonymize(&cipher(10), "abc").is_none());
    }
}

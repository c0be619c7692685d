//! Payment card number anonymization.

use std::ops::RangeInclusive;
use std::sync::Arc;

use super::{Anonymizer, AnonymizerKind, StringAnonymizer};
use crate::domain::Result;
use crate::fpe::{Alphabet, FpeCipher};
use crate::{log_field_fallback, log_format_fallback};

/// Digit counts of valid card numbers
pub const CARD_DIGITS: RangeInclusive<usize> = 13..=19;

const GROUP_LEN: usize = 4;

/// Encrypts the middle digits of a card number and regroups the result in
/// blocks of four with the separator found in the input.
#[derive(Debug, Clone)]
pub struct CreditCardAnonymizer {
    digits: FpeCipher,
    fallback: StringAnonymizer,
    preserve_first_four: bool,
    preserve_last_four: bool,
}

impl CreditCardAnonymizer {
    pub fn new(cipher: Arc<FpeCipher>) -> Result<Self> {
        Ok(Self {
            digits: cipher.with_alphabet_value(Alphabet::digits())?,
            fallback: StringAnonymizer::new(cipher)?,
            preserve_first_four: false,
            preserve_last_four: true,
        })
    }

    pub fn set_preserve_first_four(&mut self, preserve: bool) {
        self.preserve_first_four = preserve;
    }

    pub fn set_preserve_last_four(&mut self, preserve: bool) {
        self.preserve_last_four = preserve;
    }

    pub fn set_preserve_characters(&mut self, chars: &[char]) {
        self.fallback.set_preserve_characters(chars);
    }

    pub fn set_preserve_pattern(&mut self, pattern: &str) -> Result<()> {
        self.fallback.set_preserve_pattern(pattern)
    }

    /// Splits into (kept head, transformed middle, kept tail).
    fn split<'a>(&self, digits: &'a str) -> (&'a str, &'a str, &'a str) {
        let head_len = if self.preserve_first_four { GROUP_LEN } else { 0 };
        let tail_len = if self.preserve_last_four { GROUP_LEN } else { 0 };
        let (head, rest) = digits.split_at(head_len);
        let (middle, tail) = rest.split_at(rest.len() - tail_len);
        (head, middle, tail)
    }

    fn transform(
        &self,
        input: &str,
        middle: impl Fn(&str) -> Result<String>,
    ) -> Result<Option<String>> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if !CARD_DIGITS.contains(&digits.len()) {
            return Ok(None);
        }

        let (head, secret, tail) = self.split(&digits);
        let output = format!("{head}{}{tail}", middle(secret)?);
        Ok(Some(regroup(&output, separator(input))))
    }
}

/// `-` when the input contains one, else a space when it contains one.
fn separator(input: &str) -> Option<char> {
    ['-', ' '].into_iter().find(|c| input.contains(*c))
}

fn regroup(digits: &str, separator: Option<char>) -> String {
    let Some(separator) = separator else {
        return digits.to_string();
    };
    let mut output = String::with_capacity(digits.len() + digits.len() / GROUP_LEN);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && index % GROUP_LEN == 0 {
            output.push(separator);
        }
        output.push(digit);
    }
    output
}

impl Anonymizer for CreditCardAnonymizer {
    fn kind(&self) -> AnonymizerKind {
        AnonymizerKind::CreditCard
    }

    fn anonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        match self.transform(input, |middle| Ok(self.digits.encrypt(middle)?))? {
            Some(output) => Ok(output),
            None => {
                log_format_fallback!(AnonymizerKind::CreditCard.as_str(), input.chars().count());
                self.fallback.anonymize(input)
            }
        }
    }

    fn deanonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        let decrypt = |middle: &str| -> Result<String> {
            Ok(self.digits.decrypt(middle).unwrap_or_else(|e| {
                log_field_fallback!(AnonymizerKind::CreditCard.as_str(), middle.len(), &e);
                middle.to_string()
            }))
        };
        match self.transform(input, decrypt)? {
            Some(output) => Ok(output),
            None => self.fallback.deanonymize(input),
        }
    }
}

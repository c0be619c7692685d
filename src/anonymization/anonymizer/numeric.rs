//! Anonymization of decimal numerals.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Anonymizer, AnonymizerKind, StringAnonymizer};
use crate::domain::Result;
use crate::fpe::{Alphabet, FpeCipher};
use crate::{log_field_fallback, log_format_fallback};

/// Longest digit run encrypted in one piece
pub const CHUNK_SIZE: usize = 16;

static NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?)([0-9]+)(?:\.([0-9]+))?$").expect("numeral pattern compiles"));

/// Encrypts the digits of a numeral while keeping its sign and decimal point.
///
/// Values are handled as text, so numerals of any size keep every digit.
/// Integer and fractional digits are encrypted in chunks of [`CHUNK_SIZE`]
/// over the decimal alphabet. A chunk of a single digit is right-padded with
/// `0` first, which lengthens the output by one digit.
#[derive(Debug, Clone)]
pub struct NumericAnonymizer {
    digits: FpeCipher,
    fallback: StringAnonymizer,
    preserve_sign: bool,
    preserve_decimal_point: bool,
    preserve_decimal_places: Option<usize>,
    preserve_magnitude: bool,
}

impl NumericAnonymizer {
    pub fn new(cipher: Arc<FpeCipher>) -> Result<Self> {
        Ok(Self {
            digits: cipher.with_alphabet_value(Alphabet::digits())?,
            fallback: StringAnonymizer::new(cipher)?,
            preserve_sign: true,
            preserve_decimal_point: true,
            preserve_decimal_places: None,
            preserve_magnitude: false,
        })
    }

    /// With `false`, the sign is dropped.
    pub fn set_preserve_sign(&mut self, preserve: bool) {
        self.preserve_sign = preserve;
    }

    /// With `false`, the fractional part is dropped.
    pub fn set_preserve_decimal_point(&mut self, preserve: bool) {
        self.preserve_decimal_point = preserve;
    }

    /// Keeps the first `places` fractional digits in clear.
    pub fn set_preserve_decimal_places(&mut self, places: Option<usize>) {
        self.preserve_decimal_places = places;
    }

    /// With `true`, the encrypted integer part is padded or truncated to the
    /// digit count of the original.
    pub fn set_preserve_magnitude(&mut self, preserve: bool) {
        self.preserve_magnitude = preserve;
    }

    pub fn set_preserve_characters(&mut self, chars: &[char]) {
        self.fallback.set_preserve_characters(chars);
    }

    pub fn set_preserve_pattern(&mut self, pattern: &str) -> Result<()> {
        self.fallback.set_preserve_pattern(pattern)
    }

    fn encrypt_chunks(&self, digits: &str) -> Result<String> {
        let mut output = String::with_capacity(digits.len() + 1);
        let chars: Vec<char> = digits.chars().collect();
        for chunk in chars.chunks(CHUNK_SIZE) {
            let mut piece: String = chunk.iter().collect();
            if piece.len() < 2 {
                piece.push('0');
            }
            output.push_str(&self.digits.encrypt(&piece)?);
        }
        Ok(output)
    }

    fn decrypt_chunks(&self, digits: &str) -> String {
        let mut output = String::with_capacity(digits.len());
        let chars: Vec<char> = digits.chars().collect();
        for chunk in chars.chunks(CHUNK_SIZE) {
            let piece: String = chunk.iter().collect();
            if piece.len() < 2 {
                output.push_str(&piece);
                continue;
            }
            match self.digits.decrypt(&piece) {
                Ok(plain) => output.push_str(&plain),
                Err(e) => {
                    log_field_fallback!(AnonymizerKind::Numeric.as_str(), piece.len(), &e);
                    output.push_str(&piece);
                }
            }
        }
        output
    }

    fn keeps_decimals(&self, decimals: &str) -> bool {
        matches!(self.preserve_decimal_places, Some(places) if places >= decimals.len())
    }

    fn assemble(&self, sign: &str, integer: String, decimals: String) -> String {
        let mut output = String::with_capacity(integer.len() + decimals.len() + 2);
        if self.preserve_sign {
            output.push_str(sign);
        }
        output.push_str(&integer);
        if !decimals.is_empty() {
            output.push('.');
            output.push_str(&decimals);
        }
        output
    }
}

/// Left-pads with `0` or drops trailing digits so that `digits` is exactly
/// `width` long.
fn fit_width(digits: String, width: usize) -> String {
    match digits.len() {
        len if len < width => format!("{digits:0>width$}"),
        len if len > width => digits[..width].to_string(),
        _ => digits,
    }
}

impl Anonymizer for NumericAnonymizer {
    fn kind(&self) -> AnonymizerKind {
        AnonymizerKind::Numeric
    }

    fn anonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        let Some(captures) = NUMERAL.captures(input) else {
            log_format_fallback!(AnonymizerKind::Numeric.as_str(), input.chars().count());
            return self.fallback.anonymize(input);
        };
        let sign = captures.get(1).map_or("", |m| m.as_str());
        let integer = captures.get(2).map_or("", |m| m.as_str());
        let decimals = captures.get(3).map_or("", |m| m.as_str());

        let mut encrypted_integer = self.encrypt_chunks(integer)?;
        if self.preserve_magnitude {
            encrypted_integer = fit_width(encrypted_integer, integer.len());
        }

        let encrypted_decimals = if !self.preserve_decimal_point || decimals.is_empty() {
            String::new()
        } else if self.keeps_decimals(decimals) {
            decimals.to_string()
        } else {
            let kept = self.preserve_decimal_places.unwrap_or(0);
            format!("{}{}", &decimals[..kept], self.encrypt_chunks(&decimals[kept..])?)
        };

        Ok(self.assemble(sign, encrypted_integer, encrypted_decimals))
    }

    fn deanonymize(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        let Some(captures) = NUMERAL.captures(input) else {
            return self.fallback.deanonymize(input);
        };
        let sign = captures.get(1).map_or("", |m| m.as_str());
        let integer = captures.get(2).map_or("", |m| m.as_str());
        let decimals = captures.get(3).map_or("", |m| m.as_str());

        let mut decrypted_integer = self.decrypt_chunks(integer);
        if self.preserve_magnitude {
            decrypted_integer = fit_width(decrypted_integer, integer.len());
        }

        let decrypted_decimals = if !self.preserve_decimal_point || decimals.is_empty() {
            String::new()
        } else if self.keeps_decimals(decimals) {
            decimals.to_string()
        } else {
            let kept = self.preserve_decimal_places.unwrap_or(0);
            format!("{}{}", &decimals[..kept], self.decrypt_chunks(&decimals[kept..]))
        };

        Ok(self.assemble(sign, decrypted_integer, decrypted_decimals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymizer() -> NumericAnonymizer {
        let cipher = FpeCipher::new(&"7e".repeat(32), &[3u8; 7], 10).unwrap();
        NumericAnonymizer::new(Arc::new(cipher)).unwrap()
    }

    #[test]
    fn test_integer_roundtrip() {
        let anonymizer = anonymizer();
        let anonymized = anonymizer.anonymize("987654321").unwrap();
        assert_eq!(anonymized.len(), 9);
        assert!(anonymized.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "987654321");
    }

    #[test]
    fn test_sign_and_decimals_roundtrip() {
        let anonymizer = anonymizer();
        let anonymized = anonymizer.anonymize("-1234.5678").unwrap();
        assert!(anonymized.starts_with('-'));
        assert_eq!(anonymized.find('.'), Some(5));
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "-1234.5678");
    }

    #[test]
    fn test_preserved_decimal_places() {
        let mut anonymizer = anonymizer();
        anonymizer.set_preserve_decimal_places(Some(2));
        let anonymized = anonymizer.anonymize("-123.4567").unwrap();

        assert!(anonymized.starts_with('-'));
        let (_, decimals) = anonymized.split_once('.').unwrap();
        assert!(decimals.starts_with("45"));
        assert_eq!(decimals.len(), 4);
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "-123.4567");
    }

    #[test]
    fn test_all_decimals_preserved() {
        let mut anonymizer = anonymizer();
        anonymizer.set_preserve_decimal_places(Some(5));
        let anonymized = anonymizer.anonymize("42.125").unwrap();
        assert!(anonymized.ends_with(".125"));
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "42.125");
    }

    #[test]
    fn test_long_numeral_is_chunked() {
        let anonymizer = anonymizer();
        let input = "12345678901234567890123456789012345";
        let anonymized = anonymizer.anonymize(input).unwrap();
        // 16 + 16 + 3 digits
        assert_eq!(anonymized.len(), input.len());
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), input);
    }

    #[test]
    fn test_single_digit_is_padded() {
        let anonymizer = anonymizer();
        let anonymized = anonymizer.anonymize("7").unwrap();
        assert_eq!(anonymized.len(), 2);
    }

    #[test]
    fn test_magnitude_preserved() {
        let mut anonymizer = anonymizer();
        anonymizer.set_preserve_magnitude(true);
        let padded = anonymizer.digits.encrypt("70").unwrap();
        assert_eq!(anonymizer.anonymize("7").unwrap(), padded[..1]);
        let anonymized = anonymizer.anonymize("123456").unwrap();
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "123456");
    }

    #[test]
    fn test_sign_and_fraction_dropped() {
        let mut anonymizer = anonymizer();
        anonymizer.set_preserve_sign(false);
        anonymizer.set_preserve_decimal_point(false);
        let anonymized = anonymizer.anonymize("-55.25").unwrap();
        assert_eq!(anonymized.len(), 2);
        assert!(anonymized.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_non_numeric_falls_back() {
        let anonymizer = anonymizer();
        let anonymized = anonymizer.anonymize("12abc").unwrap();
        assert_eq!(anonymized.len(), 5);
        assert_eq!(anonymizer.deanonymize(&anonymized).unwrap(), "12abc");
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("42".to_string(), 4), "0042");
        assert_eq!(fit_width("12345".to_string(), 3), "123");
        assert_eq!(fit_width("123".to_string(), 3), "123");
    }
}

//! Phone number anonymization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Anonymizer, AnonymizerKind, StringAnonymizer};
use crate::domain::Result;
use crate::fpe::{Alphabet, FpeCipher};
use crate::{log_field_fallback, log_format_fallback};

/// Digits of an area code
pub const AREA_CODE_LEN: usize = 3;

/// Symbol written into digit positions when the output runs out of digits
pub const PLACEHOLDER: char = 'X';

/// Calling codes recognised by [`PhonePolicy::CountryCodeTable`], with the
/// country or region they belong to.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("1", "United States/Canada"),
    ("7", "Russia/Kazakhstan"),
    ("20", "Egypt"),
    ("27", "South Africa"),
    ("40", "Romania"),
    ("41", "Switzerland"),
    ("43", "Austria"),
    ("44", "United Kingdom"),
    ("45", "Denmark"),
    ("46", "Sweden"),
    ("47", "Norway"),
    ("48", "Poland"),
    ("49", "Germany"),
    ("51", "Peru"),
    ("52", "Mexico"),
    ("53", "Cuba"),
    ("54", "Argentina"),
    ("55", "Brazil"),
    ("56", "Chile"),
    ("57", "Colombia"),
    ("58", "Venezuela"),
    ("60", "Malaysia"),
    ("61", "Australia"),
    ("62", "Indonesia"),
    ("63", "Philippines"),
    ("64", "New Zealand"),
    ("65", "Singapore"),
    ("66", "Thailand"),
    ("81", "Japan"),
    ("82", "South Korea"),
    ("84", "Vietnam"),
    ("86", "China"),
    ("90", "Turkey"),
    ("91", "India"),
    ("92", "Pakistan"),
    ("93", "Afghanistan"),
    ("94", "Sri Lanka"),
    ("95", "Myanmar"),
    ("98", "Iran"),
    ("373", "Moldova"),
    ("670", "East Timor"),
    ("672", "Norfolk Island"),
    ("673", "Brunei"),
    ("674", "Nauru"),
    ("675", "Papua New Guinea"),
    ("676", "Tonga"),
    ("677", "Solomon Islands"),
    ("678", "Vanuatu"),
    ("679", "Fiji"),
    ("680", "Palau"),
    ("682", "Cook Islands"),
    ("683", "Niue"),
    ("685", "Samoa"),
    ("686", "Kiribati"),
    ("687", "New Caledonia"),
    ("688", "Tuvalu"),
    ("689", "French Polynesia"),
    ("690", "Tokelau"),
    ("691", "Micronesia"),
    ("692", "Marshall Islands"),
];

/// Looks up the longest calling code `digits` starts with.
pub fn country_code(digits: &str) -> Option<(&'static str, &'static str)> {
    (1..=3).rev().find_map(|len| {
        let prefix = digits.get(..len)?;
        COUNTRY_CODES
            .iter()
            .find(|(code, _)| *code == prefix)
            .copied()
    })
}

/// Length of the shortest prefix of `digits` that no calling code starts
/// with, or of all digits when every prefix could still begin one.
fn neutral_prefix_len(digits: &str) -> usize {
    (1..=digits.len())
        .find(|&len| {
            let prefix = &digits[..len];
            !COUNTRY_CODES.iter().any(|(code, _)| code.starts_with(prefix))
        })
        .unwrap_or(digits.len())
}

/// Digits of a NANP number written with its leading `1`
const NANP_INTERNATIONAL_LEN: usize = 11;

/// How the leading digits of a number are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonePolicy {
    /// Country code from [`COUNTRY_CODES`], longest match first
    #[default]
    CountryCodeTable,
    /// North American numbering: ten national digits, optionally after a `1`
    FixedNanp,
}

/// Encrypts the digits of a phone number and writes them back into the
/// original layout, so separators and parentheses stay where they were.
///
/// The kept prefix is contiguous: the country code when preserved, then the
/// area code when requested, then a number of leading digits.
#[derive(Debug, Clone)]
pub struct PhoneAnonymizer {
    digits: FpeCipher,
    fallback: StringAnonymizer,
    policy: PhonePolicy,
    preserve_country_code: bool,
    preserve_area_code: bool,
    preserve_leading_digits: usize,
}

impl PhoneAnonymizer {
    pub fn new(cipher: Arc<FpeCipher>) -> Result<Self> {
        Ok(Self {
            digits: cipher.with_alphabet_value(Alphabet::digits())?,
            fallback: StringAnonymizer::new(cipher)?,
            policy: PhonePolicy::default(),
            preserve_country_code: true,
            preserve_area_code: false,
            preserve_leading_digits: 0,
        })
    }

    pub fn set_policy(&mut self, policy: PhonePolicy) {
        self.policy = policy;
    }

    pub fn set_preserve_country_code(&mut self, preserve: bool) {
        self.preserve_country_code = preserve;
    }

    pub fn set_preserve_area_code(&mut self, preserve: bool) {
        self.preserve_area_code = preserve;
    }

    /// Keeps `count` digits after the country and area codes.
    pub fn set_preserve_leading_digits(&mut self, count: usize) {
        self.preserve_leading_digits = count;
    }

    pub fn set_preserve_characters(&mut self, chars: &[char]) {
        self.fallback.set_preserve_characters(chars);
    }

    pub fn set_preserve_pattern(&mut self, pattern: &str) -> Result<()> {
        self.fallback.set_preserve_pattern(pattern)
    }

    /// Leading digits kept in clear as the country code.
    ///
    /// Encrypted digits must never read back as a code, so without one the
    /// prefix that rules every code out stays in clear instead: the shortest
    /// prefix no table code starts with, or the first of eleven NANP digits.
    fn country_code_len(&self, digits: &str) -> usize {
        match self.policy {
            PhonePolicy::CountryCodeTable => match country_code(digits) {
                Some((code, _)) => code.len(),
                None => neutral_prefix_len(digits),
            },
            PhonePolicy::FixedNanp => usize::from(digits.len() == NANP_INTERNATIONAL_LEN),
        }
    }

    /// Number of leading digits that stay in clear.
    fn kept_prefix_len(&self, digits: &str) -> usize {
        let mut kept = if self.preserve_country_code {
            self.country_code_len(digits)
        } else {
            0
        };
        if self.preserve_area_code && digits.len() - kept > AREA_CODE_LEN {
            kept += AREA_CODE_LEN;
        }
        let leading = self.preserve_leading_digits;
        if leading > 0 && digits.len() - kept > leading {
            kept += leading;
        }
        kept
    }

    fn transform(
        &self,
        input: &str,
        secret: impl Fn(&str) -> Result<String>,
    ) -> Result<Option<String>> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.len() > self.digits.max_len() {
            return Ok(None);
        }

        let (kept, rest) = digits.split_at(self.kept_prefix_len(&digits));
        let transformed = if rest.len() < 2 {
            rest.to_string()
        } else {
            secret(rest)?
        };

        let mut replacement = kept.chars().chain(transformed.chars());
        let output = input
            .chars()
            .map(|c| {
                if c.is_ascii_digit() {
                    replacement.next().unwrap_or(PLACEHOLDER)
                } else {
                    c
                }
            })
            .collect();
        Ok(Some(output))
    }
}

impl Anonymizer for PhoneAnonymizer {
    fn kind(&self) -> AnonymizerKind {
        AnonymizerKind::Phone
    }

    fn anonymize(&self, input: &str) -> Result<String> {
        if !input.chars().any(|c| c.is_ascii_digit()) {
            return Ok(input.to_string());
        }
        match self.transform(input, |rest| Ok(self.digits.encrypt(rest)?))? {
            Some(output) => Ok(output),
            None => {
                log_format_fallback!(AnonymizerKind::Phone.as_str(), input.chars().count());
                self.fallback.anonymize(input)
            }
        }
    }

    fn deanonymize(&self, input: &str) -> Result<String> {
        if !input.chars().any(|c| c.is_ascii_digit()) {
            return Ok(input.to_string());
        }
        let decrypt = |rest: &str| -> Result<String> {
            Ok(self.digits.decrypt(rest).unwrap_or_else(|e| {
                log_field_fallback!(AnonymizerKind::Phone.as_str(), rest.len(), &e);
                rest.to_string()
            }))
        };
        match self.transform(input, decrypt)? {
            Some(output) => Ok(output),
            None => self.fallback.deanonymize(input),
        }
    }
}

//! Ordered symbol sets used as the numeral system of the cipher.

use std::collections::HashMap;
use std::fmt;

use crate::domain::errors::CipherError;

/// Decimal digits
pub const DIGITS: &str = "0123456789";

/// Lowercase hexadecimal digits
pub const HEX: &str = "0123456789abcdef";

/// ASCII lowercase letters
pub const LOWER_ALPHA: &str = "abcdefghijklmnopqrstuvwxyz";

/// ASCII uppercase letters
pub const UPPER_ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Digits, then lowercase, then uppercase. Prefixes of this string form the
/// default alphabet of every radix up to 62.
pub const ALPHANUMERIC: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Symbols allowed in either half of an email address
pub const EMAIL: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ._-";

/// Letters first, then digits. Used by character preservation.
pub const LETTERS_AND_DIGITS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest radix served by the default alphabet
pub const MAX_DEFAULT_RADIX: usize = 62;

/// An ordered set of distinct symbols; symbol `i` is the digit with value `i`.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, u32>,
}

impl Alphabet {
    /// Builds an alphabet from the symbols of `symbols`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidAlphabet`] if fewer than two symbols are
    /// given or a symbol repeats.
    pub fn new(symbols: &str) -> Result<Self, CipherError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() < 2 {
            return Err(CipherError::InvalidAlphabet(format!(
                "at least 2 symbols required, got {}",
                symbols.len()
            )));
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (position, &symbol) in symbols.iter().enumerate() {
            if index.insert(symbol, position as u32).is_some() {
                return Err(CipherError::InvalidAlphabet(format!(
                    "duplicate symbol '{symbol}'"
                )));
            }
        }

        Ok(Self { symbols, index })
    }

    /// Default alphabet for `radix`: the first `radix` symbols of
    /// [`ALPHANUMERIC`].
    ///
    /// # Errors
    ///
    /// [`CipherError::UnsupportedRadix`] above 62 and
    /// [`CipherError::InsufficientDomain`] below 2.
    pub fn for_radix(radix: usize) -> Result<Self, CipherError> {
        if radix > MAX_DEFAULT_RADIX {
            return Err(CipherError::UnsupportedRadix(radix));
        }
        if radix < 2 {
            return Err(CipherError::InsufficientDomain(radix));
        }
        Self::new(&ALPHANUMERIC[..radix])
    }

    /// Decimal digits alphabet
    pub fn digits() -> Self {
        Self::from_distinct(DIGITS)
    }

    /// Alphabet of [`EMAIL`]
    pub fn email() -> Self {
        Self::from_distinct(EMAIL)
    }

    /// Alphabet of [`LETTERS_AND_DIGITS`]
    pub fn letters_and_digits() -> Self {
        Self::from_distinct(LETTERS_AND_DIGITS)
    }

    /// Alphabet of [`HEX`]
    pub fn hex() -> Self {
        Self::from_distinct(HEX)
    }

    // Only for the constants above, which are known to hold distinct symbols.
    fn from_distinct(symbols: &str) -> Self {
        let symbols: Vec<char> = symbols.chars().collect();
        let index = symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| (symbol, position as u32))
            .collect();
        Self { symbols, index }
    }

    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Digit value of `symbol`, if it belongs to the alphabet
    pub fn index_of(&self, symbol: char) -> Option<u32> {
        self.index.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    /// Symbol for digit value `value`. `value` must be below the radix.
    pub fn symbol(&self, value: usize) -> char {
        self.symbols[value]
    }

    /// Symbol for zero, used for left padding
    pub fn zero(&self) -> char {
        self.symbols[0]
    }

    /// Keeps only the characters of `input` that belong to the alphabet.
    pub fn filter(&self, input: &str) -> String {
        input.chars().filter(|c| self.contains(*c)).collect()
    }

    /// Filler symbol used to lengthen inputs that are too short to encrypt:
    /// `'X'` when available, otherwise the last symbol.
    pub fn filler(&self) -> char {
        if self.contains('X') {
            'X'
        } else {
            self.symbols[self.symbols.len() - 1]
        }
    }

    /// Two filler symbols, substituted for inputs with nothing left to encrypt
    pub fn placeholder(&self) -> String {
        let filler = self.filler();
        [filler, filler].iter().collect()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("radix", &self.radix())
            .field("symbols", &self.to_string())
            .finish()
    }
}

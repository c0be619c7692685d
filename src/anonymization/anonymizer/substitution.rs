//! Keyed, reversible character substitution.
//!
//! A substitution table is a Fisher-Yates shuffle of a symbol class, seeded
//! by folding the FPE encryption of a fixed hex string. The same key always
//! yields the same tables; different keys yield unrelated ones.

use std::collections::HashMap;

use crate::domain::Result;
use crate::fpe::alphabet::HEX;
use crate::fpe::FpeCipher;

const SEED_MODULUS: u32 = 997;
const SEED_MULTIPLIER: u32 = 31;

/// Accented letters permuted by the name anonymizer, lowercase half
pub const SPECIAL_LOWER: &str = "ăîâșțüöäéèêëàáíìñç";

/// Uppercase counterparts of [`SPECIAL_LOWER`], in the same order
pub const SPECIAL_UPPER: &str = "ĂÎÂȘȚÜÖÄÉÈÊËÀÁÍÌÑÇ";

/// A bijection between a symbol class and a permutation of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable {
    forward: HashMap<char, char>,
    reverse: HashMap<char, char>,
}

impl SubstitutionTable {
    /// Shuffles `source` with the given seed.
    pub fn shuffled(source: &str, seed: u32) -> Self {
        let original: Vec<char> = source.chars().collect();
        let mut permuted = original.clone();
        let mut seed = seed % SEED_MODULUS;
        for i in (1..permuted.len()).rev() {
            seed = (seed * SEED_MULTIPLIER + i as u32) % SEED_MODULUS;
            let j = seed as usize % (i + 1);
            permuted.swap(i, j);
        }

        let forward: HashMap<char, char> = original
            .iter()
            .copied()
            .zip(permuted.iter().copied())
            .collect();
        let reverse = forward.iter().map(|(&from, &to)| (to, from)).collect();
        Self { forward, reverse }
    }

    pub fn substitute(&self, c: char) -> Option<char> {
        self.forward.get(&c).copied()
    }

    pub fn restore(&self, c: char) -> Option<char> {
        self.reverse.get(&c).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Folds a string into a seed in `0..997`.
pub fn fold_seed(text: &str) -> u32 {
    text.chars()
        .fold(0, |seed, c| (seed * SEED_MULTIPLIER + c as u32) % SEED_MODULUS)
}

/// Seeds for every table the substitution anonymizers use, derived once from
/// a cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyedSeeds {
    pub lower: u32,
    pub upper: u32,
    pub digits: u32,
    pub letters: u32,
    pub symbols: u32,
    pub special: u32,
}

impl KeyedSeeds {
    /// Encrypts one fixed hex plaintext per table with `cipher`'s key over the
    /// hex alphabet and folds each ciphertext into a seed.
    pub fn derive(cipher: &FpeCipher) -> Result<Self> {
        let hex = cipher.with_alphabet(HEX)?;
        let seed = |plaintext: &str| -> Result<u32> { Ok(fold_seed(&hex.encrypt(plaintext)?)) };

        Ok(Self {
            lower: seed("a1b2c3d4e5f6")?,
            upper: seed("f6e5d4c3b2a1")?,
            digits: seed("1a2b3c4d5e6f")?,
            letters: seed("c4e3a1b3d0f3")?,
            symbols: seed("9f8e7d6c5b4a")?,
            special: seed("5ec1a1c4a2e5")?,
        })
    }
}

/// Printable ASCII punctuation in code point order.
pub fn ascii_punctuation() -> String {
    (0x21u8..0x7f)
        .map(char::from)
        .filter(char::is_ascii_punctuation)
        .collect()
}

//! FF3-1 style format-preserving cipher.
//!
//! The input is split into two halves that are mixed over eight Feistel
//! rounds. Each round encrypts a single 16-byte block with AES, reads the
//! result as an unsigned integer and adds it to one half modulo
//! `radix ^ half_length`. The output therefore has the same length and
//! alphabet as the input.
//!
//! Round inputs interleave the seven tweak bytes and a four byte window of
//! the other half's two's-complement encoding, so outputs of this cipher are
//! only interoperable with implementations that follow the same layout.

use std::fmt;
use std::sync::Arc;

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use num_bigint::BigUint;
use zeroize::Zeroizing;

use super::alphabet::Alphabet;
use super::radix;
use crate::domain::errors::CipherError;

/// Length of a tweak in bytes
pub const TWEAK_LEN: usize = 7;

/// Number of Feistel rounds
pub const ROUNDS: u8 = 8;

/// Shortest input the cipher accepts
pub const MIN_INPUT_LEN: usize = 2;

/// Smallest acceptable domain, `radix ^ min_len >= DOMAIN_MIN`
pub const DOMAIN_MIN: u64 = 1_000_000;

/// Seven byte tweak
pub type Tweak = [u8; TWEAK_LEN];

/// All-zero tweak
pub const ZERO_TWEAK: Tweak = [0u8; TWEAK_LEN];

/// Parses a 14 character hex string into a tweak.
///
/// # Errors
///
/// [`CipherError::InvalidTweak`] carrying the decoded byte length.
pub fn parse_tweak(hex_tweak: &str) -> Result<Tweak, CipherError> {
    let bytes =
        hex::decode(hex_tweak.trim()).map_err(|_| CipherError::InvalidTweak(hex_tweak.len() / 2))?;
    tweak_from_slice(&bytes)
}

fn tweak_from_slice(bytes: &[u8]) -> Result<Tweak, CipherError> {
    <Tweak>::try_from(bytes).map_err(|_| CipherError::InvalidTweak(bytes.len()))
}

#[derive(Clone)]
enum BlockCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl BlockCipher {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKey(format!("{} byte key rejected", key.len()));
        match key.len() {
            16 => Aes128::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            other => Err(CipherError::InvalidKey(format!(
                "AES keys are 16, 24 or 32 bytes, got {other}"
            ))),
        }
    }

    fn encrypt_block(&self, input: &[u8; 16]) -> [u8; 16] {
        let mut block = aes::Block::clone_from_slice(input);
        match self {
            Self::Aes128(cipher) => cipher.encrypt_block(&mut block),
            Self::Aes192(cipher) => cipher.encrypt_block(&mut block),
            Self::Aes256(cipher) => cipher.encrypt_block(&mut block),
        }
        let mut output = [0u8; 16];
        output.copy_from_slice(&block);
        output
    }

    fn key_bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// Format-preserving cipher bound to a key, a default tweak and an alphabet.
///
/// Cheap to clone: siblings created with [`FpeCipher::with_alphabet`] share
/// the expanded AES key schedule.
///
/// # Examples
///
/// ```
/// use anonymizator::fpe::FpeCipher;
///
/// let cipher = FpeCipher::new(&"2b".repeat(32), &[1, 2, 3, 4, 5, 6, 7], 10).unwrap();
/// let encrypted = cipher.encrypt("4000123412341234").unwrap();
/// assert_eq!(encrypted.len(), 16);
/// assert!(encrypted.chars().all(|c| c.is_ascii_digit()));
/// assert_eq!(cipher.decrypt(&encrypted).unwrap(), "4000123412341234");
/// ```
#[derive(Clone)]
pub struct FpeCipher {
    block: Arc<BlockCipher>,
    tweak: Tweak,
    alphabet: Alphabet,
    max_len: usize,
}

impl FpeCipher {
    /// Creates a cipher over the default alphabet of `radix`.
    ///
    /// # Arguments
    ///
    /// * `key_hex` - AES-128/192/256 key as hex
    /// * `tweak` - default tweak, exactly 7 bytes
    /// * `radix` - 2..=62
    ///
    /// # Errors
    ///
    /// Fails on a malformed key, a tweak that is not 7 bytes, or a radix
    /// without a default alphabet or with too small a domain.
    pub fn new(key_hex: &str, tweak: &[u8], radix: usize) -> Result<Self, CipherError> {
        Self::with_custom_alphabet(key_hex, tweak, &Alphabet::for_radix(radix)?)
    }

    /// Creates a cipher whose radix is the size of `alphabet`.
    pub fn with_custom_alphabet(
        key_hex: &str,
        tweak: &[u8],
        alphabet: &Alphabet,
    ) -> Result<Self, CipherError> {
        let key = Zeroizing::new(
            hex::decode(key_hex.trim())
                .map_err(|e| CipherError::InvalidKey(format!("key is not valid hex: {e}")))?,
        );
        Self::from_key_bytes(&key, tweak, alphabet.clone())
    }

    /// Creates a cipher from raw key bytes.
    pub fn from_key_bytes(
        key: &[u8],
        tweak: &[u8],
        alphabet: Alphabet,
    ) -> Result<Self, CipherError> {
        let tweak = tweak_from_slice(tweak)?;
        let block = Arc::new(BlockCipher::new(key)?);
        Self::assemble(block, tweak, alphabet)
    }

    fn assemble(
        block: Arc<BlockCipher>,
        tweak: Tweak,
        alphabet: Alphabet,
    ) -> Result<Self, CipherError> {
        let radix = alphabet.radix();
        if min_domain_len(radix) < MIN_INPUT_LEN {
            return Err(CipherError::InsufficientDomain(radix));
        }
        let max_len = max_input_len(radix);
        if max_len < MIN_INPUT_LEN {
            return Err(CipherError::InsufficientDomain(radix));
        }

        Ok(Self {
            block,
            tweak,
            alphabet,
            max_len,
        })
    }

    /// Sibling cipher with the same key and tweak over another alphabet.
    ///
    /// # Errors
    ///
    /// [`CipherError::InvalidAlphabet`] or [`CipherError::InsufficientDomain`].
    pub fn with_alphabet(&self, symbols: &str) -> Result<Self, CipherError> {
        self.with_alphabet_value(Alphabet::new(symbols)?)
    }

    /// Like [`FpeCipher::with_alphabet`] for an already built alphabet.
    pub fn with_alphabet_value(&self, alphabet: Alphabet) -> Result<Self, CipherError> {
        Self::assemble(Arc::clone(&self.block), self.tweak, alphabet)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn radix(&self) -> usize {
        self.alphabet.radix()
    }

    pub fn tweak(&self) -> &Tweak {
        &self.tweak
    }

    /// Longest input accepted, `2 * floor(96 / log2(radix))`
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn key_bits(&self) -> usize {
        self.block.key_bits()
    }

    /// Whether `input` has an acceptable length and only alphabet symbols.
    pub fn accepts(&self, input: &str) -> bool {
        let length = input.chars().count();
        (MIN_INPUT_LEN..=self.max_len).contains(&length)
            && input.chars().all(|c| self.alphabet.contains(c))
    }

    /// Encrypts with the default tweak.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        self.transform(plaintext, &self.tweak, Direction::Encrypt)
    }

    /// Decrypts with the default tweak.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        self.transform(ciphertext, &self.tweak, Direction::Decrypt)
    }

    /// Encrypts with a per-call tweak instead of the default one.
    pub fn encrypt_with_tweak(&self, plaintext: &str, tweak: &[u8]) -> Result<String, CipherError> {
        let tweak = tweak_from_slice(tweak)?;
        self.transform(plaintext, &tweak, Direction::Encrypt)
    }

    /// Decrypts with a per-call tweak instead of the default one.
    pub fn decrypt_with_tweak(
        &self,
        ciphertext: &str,
        tweak: &[u8],
    ) -> Result<String, CipherError> {
        let tweak = tweak_from_slice(tweak)?;
        self.transform(ciphertext, &tweak, Direction::Decrypt)
    }

    fn transform(
        &self,
        input: &str,
        tweak: &Tweak,
        direction: Direction,
    ) -> Result<String, CipherError> {
        let symbols: Vec<char> = input.chars().collect();
        let length = symbols.len();
        if !(MIN_INPUT_LEN..=self.max_len).contains(&length) {
            return Err(CipherError::InvalidLength {
                length,
                min: MIN_INPUT_LEN,
                max: self.max_len,
            });
        }

        let u = length / 2;
        let v = length - u;
        let mut a = radix::decode(symbols[..u].iter().copied(), &self.alphabet)?;
        let mut b = radix::decode(symbols[u..].iter().copied(), &self.alphabet)?;
        let modulus_u = radix::modulus(self.radix(), u);
        let modulus_v = radix::modulus(self.radix(), v);

        let rounds: Vec<u8> = match direction {
            Direction::Encrypt => (0..ROUNDS).collect(),
            Direction::Decrypt => (0..ROUNDS).rev().collect(),
        };

        for round in rounds {
            if round % 2 == 0 {
                let y = self.round_value(round, tweak, &b);
                a = match direction {
                    Direction::Encrypt => radix::add_mod(&a, &y, &modulus_u),
                    Direction::Decrypt => radix::sub_mod(&a, &y, &modulus_u),
                };
            } else {
                let y = self.round_value(round, tweak, &a);
                b = match direction {
                    Direction::Encrypt => radix::add_mod(&b, &y, &modulus_v),
                    Direction::Decrypt => radix::sub_mod(&b, &y, &modulus_v),
                };
            }
        }

        let mut output = radix::encode(&a, &self.alphabet, u);
        output.push_str(&radix::encode(&b, &self.alphabet, v));
        Ok(output)
    }

    fn round_value(&self, round: u8, tweak: &Tweak, half: &BigUint) -> BigUint {
        let block = self.block.encrypt_block(&round_input(round, tweak, half));
        BigUint::from_bytes_be(&block)
    }
}

impl fmt::Debug for FpeCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FpeCipher")
            .field("key", &"[REDACTED]")
            .field("key_bits", &self.key_bits())
            .field("radix", &self.radix())
            .field("max_len", &self.max_len)
            .finish()
    }
}

/// Builds the 16-byte AES input for `round`.
///
/// Byte 0 is the round index. Even rounds place tweak bytes 0..3 at 1..4 and
/// 3..7 at 8..12; odd rounds place tweak bytes 3..6 at 1..4 and 0..3 at
/// 8..11. The last four bytes hold, right-aligned, at most the first four
/// bytes of the other half's two's-complement encoding.
fn round_input(round: u8, tweak: &Tweak, half: &BigUint) -> [u8; 16] {
    let mut input = [0u8; 16];
    input[0] = round;

    if round % 2 == 0 {
        input[1..4].copy_from_slice(&tweak[0..3]);
        input[8..12].copy_from_slice(&tweak[3..7]);
    } else {
        input[1..4].copy_from_slice(&tweak[3..6]);
        input[8..11].copy_from_slice(&tweak[0..3]);
    }

    let numeral = radix::signed_be_bytes(half);
    let take = numeral.len().min(4);
    input[16 - take..].copy_from_slice(&numeral[..take]);
    input
}

/// Smallest length whose domain holds at least [`DOMAIN_MIN`] values.
fn min_domain_len(radix: usize) -> usize {
    if radix < 2 {
        return usize::MAX;
    }
    let mut length = 0;
    let mut size: u64 = 1;
    while size < DOMAIN_MIN {
        size = size.saturating_mul(radix as u64);
        length += 1;
    }
    length
}

/// Longest input a cipher over `radix` symbols accepts.
pub(crate) fn max_input_len(radix: usize) -> usize {
    2 * (96.0 / (radix as f64).log2()).floor() as usize
}

//! Key/tweak pair

use std::fmt;

use secrecy::ExposeSecret;

use crate::config::{secret_string, SecretString};
use crate::domain::errors::CipherError;
use crate::fpe::{Alphabet, FpeCipher, Tweak};

/// Named cipher key with its default tweak.
///
/// The key is kept as hex inside a [`SecretString`]; it is decoded only while
/// a cipher is being built.
#[derive(Clone)]
pub struct KeyTweakPair {
    name: String,
    key: SecretString,
    tweak: Tweak,
}

impl KeyTweakPair {
    pub fn new(name: impl Into<String>, key_hex: impl Into<String>, tweak: Tweak) -> Self {
        Self::from_secret(name, secret_string(key_hex.into()), tweak)
    }

    pub fn from_secret(name: impl Into<String>, key: SecretString, tweak: Tweak) -> Self {
        Self {
            name: name.into(),
            key,
            tweak,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &SecretString {
        &self.key
    }

    pub fn tweak(&self) -> &Tweak {
        &self.tweak
    }

    /// Tweak as 14 uppercase hex characters
    pub fn tweak_hex(&self) -> String {
        hex::encode_upper(self.tweak)
    }

    /// Builds a cipher over the default alphabet of `radix`.
    pub fn cipher(&self, radix: usize) -> Result<FpeCipher, CipherError> {
        self.cipher_with_alphabet(Alphabet::for_radix(radix)?)
    }

    pub fn cipher_with_alphabet(&self, alphabet: Alphabet) -> Result<FpeCipher, CipherError> {
        let key = self
            .key
            .expose_secret()
            .decode_hex()
            .map_err(|e| CipherError::InvalidKey(format!("key '{}' is not valid hex: {e}", self.name)))?;
        FpeCipher::from_key_bytes(&key, &self.tweak, alphabet)
    }
}

impl fmt::Debug for KeyTweakPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyTweakPair")
            .field("name", &self.name)
            .field("key", &"[REDACTED]")
            .field("tweak", &self.tweak_hex())
            .finish()
    }
}

//! Key generation and derivation

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::pair::KeyTweakPair;
use crate::domain::{AnonymizatorError, Result};
use crate::fpe::{Tweak, TWEAK_LEN};

/// Length of generated keys in bytes (AES-256)
pub const KEY_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Produces key/tweak pairs, either at random or derived from a master key.
///
/// Derivation is deterministic: the same master key and identifier always
/// give the same pair, so per-entity keys never have to be stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Random 256-bit key and random tweak from the operating system RNG.
    pub fn generate(&self, name: &str) -> KeyTweakPair {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut key[..]);
        let mut tweak: Tweak = [0u8; TWEAK_LEN];
        OsRng.fill_bytes(&mut tweak);

        tracing::debug!(name, "Generated random key/tweak pair");
        KeyTweakPair::new(name, hex::encode_upper(&key[..]), tweak)
    }

    /// Derives a pair for `identifier` with HMAC-SHA256 under `master_hex`.
    ///
    /// The key is the MAC of `identifier + "KEY"`; the tweak is the first
    /// seven bytes of the MAC of `identifier + "TWEAK"`. The pair is named
    /// after the identifier.
    ///
    /// # Errors
    ///
    /// [`AnonymizatorError::KeyManagement`] when the master key is empty or
    /// not hex.
    pub fn derive(&self, master_hex: &str, identifier: &str) -> Result<KeyTweakPair> {
        let master = Zeroizing::new(hex::decode(master_hex.trim())?);
        if master.is_empty() {
            return Err(AnonymizatorError::KeyManagement(
                "master key must not be empty".to_string(),
            ));
        }

        let key = Zeroizing::new(mac(&master, identifier, "KEY")?);
        let tweak_mac = mac(&master, identifier, "TWEAK")?;
        let mut tweak: Tweak = [0u8; TWEAK_LEN];
        tweak.copy_from_slice(&tweak_mac[..TWEAK_LEN]);

        tracing::debug!(identifier_len = identifier.len(), "Derived key/tweak pair");
        Ok(KeyTweakPair::new(
            identifier,
            hex::encode_upper(key.as_slice()),
            tweak,
        ))
    }

    /// Derives a pair from the digits of a phone number, so differently
    /// formatted spellings of one number share a key.
    pub fn derive_for_phone(&self, master_hex: &str, phone: &str) -> Result<KeyTweakPair> {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        self.derive(master_hex, &digits)
    }
}

fn mac(master: &[u8], identifier: &str, label: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(master)
        .map_err(|e| AnonymizatorError::KeyManagement(format!("HMAC key rejected: {e}")))?;
    mac.update(identifier.as_bytes());
    mac.update(label.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

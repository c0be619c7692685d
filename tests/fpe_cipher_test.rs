//! Integration tests for the format-preserving cipher

use anonymizator::domain::CipherError;
use anonymizator::fpe::{Alphabet, FpeCipher, ZERO_TWEAK};
use proptest::prelude::*;
use test_case::test_case;

const ZERO_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Alphabet size, plaintext symbol indices, key and tweak
fn cipher_input() -> impl Strategy<Value = (usize, Vec<usize>, [u8; 32], [u8; 7])> {
    (2usize..=62)
        .prop_flat_map(|radix| {
            let max_len = 2 * (96.0 / (radix as f64).log2()).floor() as usize;
            (
                Just(radix),
                prop::collection::vec(0..radix, 2..=max_len),
                any::<[u8; 32]>(),
                any::<[u8; 7]>(),
            )
        })
}

fn render(alphabet: &Alphabet, indices: &[usize]) -> String {
    indices.iter().map(|&i| alphabet.symbol(i)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_preserves_length((radix, indices, key, tweak) in cipher_input()) {
        let cipher = FpeCipher::new(&hex::encode(key), &tweak, radix).unwrap();
        let plaintext = render(cipher.alphabet(), &indices);

        let ciphertext = cipher.encrypt(&plaintext).unwrap();
        prop_assert_eq!(ciphertext.chars().count(), plaintext.chars().count());
        prop_assert!(ciphertext.chars().all(|c| cipher.alphabet().contains(c)));
        prop_assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn prop_encryption_is_deterministic((radix, indices, key, tweak) in cipher_input()) {
        let key = hex::encode(key);
        let first = FpeCipher::new(&key, &tweak, radix).unwrap();
        let second = FpeCipher::new(&key, &tweak, radix).unwrap();
        let plaintext = render(first.alphabet(), &indices);

        prop_assert_eq!(first.encrypt(&plaintext).unwrap(), second.encrypt(&plaintext).unwrap());
    }
}

#[test]
fn test_zero_key_decimal_round_trip() {
    let cipher = FpeCipher::new(ZERO_KEY, &ZERO_TWEAK, 10).unwrap();
    let ciphertext = cipher.encrypt("123456").unwrap();

    assert_eq!(ciphertext.len(), 6);
    assert!(ciphertext.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(cipher.decrypt(&ciphertext).unwrap(), "123456");
}

#[test]
fn test_tweaks_separate_domains() {
    let cipher = FpeCipher::new(ZERO_KEY, &ZERO_TWEAK, 10).unwrap();
    let plaintext = "0123456789012345";

    let with_zero = cipher.encrypt(plaintext).unwrap();
    let with_other = cipher
        .encrypt_with_tweak(plaintext, &[1, 2, 3, 4, 5, 6, 7])
        .unwrap();
    assert_ne!(with_zero, with_other);
    assert_eq!(
        cipher
            .decrypt_with_tweak(&with_other, &[1, 2, 3, 4, 5, 6, 7])
            .unwrap(),
        plaintext
    );
}

#[test]
fn test_keys_separate_domains() {
    let first = FpeCipher::new(ZERO_KEY, &ZERO_TWEAK, 10).unwrap();
    let second = FpeCipher::new(&"01".repeat(32), &ZERO_TWEAK, 10).unwrap();
    let plaintext = "9876543210987654";
    assert_ne!(
        first.encrypt(plaintext).unwrap(),
        second.encrypt(plaintext).unwrap()
    );
}

#[test_case(16 ; "aes-128")]
#[test_case(24 ; "aes-192")]
#[test_case(32 ; "aes-256")]
fn test_key_sizes(bytes: usize) {
    let cipher = FpeCipher::new(&"ab".repeat(bytes), &ZERO_TWEAK, 36).unwrap();
    assert_eq!(cipher.key_bits(), bytes * 8);
    let ciphertext = cipher.encrypt("hello42world").unwrap();
    assert_eq!(cipher.decrypt(&ciphertext).unwrap(), "hello42world");
}

#[test_case(10, 56 ; "decimal")]
#[test_case(16, 48 ; "hex")]
#[test_case(36, 36 ; "base36")]
#[test_case(62, 32 ; "base62")]
#[test_case(2, 192 ; "binary")]
fn test_maximum_length(radix: usize, max_len: usize) {
    let cipher = FpeCipher::new(ZERO_KEY, &ZERO_TWEAK, radix).unwrap();
    assert_eq!(cipher.max_len(), max_len);

    let zero = cipher.alphabet().zero();
    let longest: String = std::iter::repeat(zero).take(max_len).collect();
    assert!(cipher.encrypt(&longest).is_ok());

    let too_long: String = std::iter::repeat(zero).take(max_len + 1).collect();
    assert!(matches!(
        cipher.encrypt(&too_long),
        Err(CipherError::InvalidLength { .. })
    ));
}

#[test]
fn test_single_symbol_is_rejected() {
    let cipher = FpeCipher::new(ZERO_KEY, &ZERO_TWEAK, 10).unwrap();
    assert!(matches!(
        cipher.encrypt("7"),
        Err(CipherError::InvalidLength { length: 1, .. })
    ));
    assert!(matches!(
        cipher.decrypt("7"),
        Err(CipherError::InvalidLength { length: 1, .. })
    ));
}

#[test]
fn test_foreign_symbol_is_rejected() {
    let cipher = FpeCipher::new(ZERO_KEY, &ZERO_TWEAK, 10).unwrap();
    assert_eq!(
        cipher.encrypt("12a4"),
        Err(CipherError::InvalidCharacter('a'))
    );
}

#[test]
fn test_invalid_construction() {
    assert!(matches!(
        FpeCipher::new(ZERO_KEY, &[0u8; 6], 10),
        Err(CipherError::InvalidTweak(6))
    ));
    assert!(matches!(
        FpeCipher::new(ZERO_KEY, &ZERO_TWEAK, 63),
        Err(CipherError::UnsupportedRadix(63))
    ));
    assert!(matches!(
        FpeCipher::new("abcd", &ZERO_TWEAK, 10),
        Err(CipherError::InvalidKey(_))
    ));
    assert!(matches!(
        Alphabet::new("aa"),
        Err(CipherError::InvalidAlphabet(_))
    ));
}

#[test]
fn test_custom_alphabet_round_trip() {
    let alphabet = Alphabet::new("ACGT").unwrap();
    let cipher = FpeCipher::with_custom_alphabet(ZERO_KEY, &ZERO_TWEAK, &alphabet).unwrap();
    let ciphertext = cipher.encrypt("GATTACAGATTACA").unwrap();
    assert!(ciphertext.chars().all(|c| "ACGT".contains(c)));
    assert_eq!(cipher.decrypt(&ciphertext).unwrap(), "GATTACAGATTACA");
}

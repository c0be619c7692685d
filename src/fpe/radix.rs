//! Conversion between symbol strings and arbitrary-precision integers.
//!
//! A string over an [`Alphabet`] of radix `r` is read as a big-endian
//! base-`r` numeral. Values are [`BigUint`] because halves of long inputs
//! overflow every fixed-width integer.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use super::alphabet::Alphabet;
use crate::domain::errors::CipherError;

/// Reads `symbols` as a numeral over `alphabet`.
///
/// # Errors
///
/// [`CipherError::InvalidCharacter`] for the first symbol not in the alphabet.
pub fn decode<I>(symbols: I, alphabet: &Alphabet) -> Result<BigUint, CipherError>
where
    I: IntoIterator<Item = char>,
{
    let radix = BigUint::from(alphabet.radix());
    let mut value = BigUint::zero();
    for symbol in symbols {
        let digit = alphabet
            .index_of(symbol)
            .ok_or(CipherError::InvalidCharacter(symbol))?;
        value = value * &radix + digit;
    }
    Ok(value)
}

/// Writes `value` as a numeral over `alphabet`, left-padded with the zero
/// symbol to at least `min_length` symbols. Zero is written as one zero
/// symbol before padding.
pub fn encode(value: &BigUint, alphabet: &Alphabet, min_length: usize) -> String {
    let radix = BigUint::from(alphabet.radix());
    let mut reversed = Vec::new();
    let mut rest = value.clone();

    while !rest.is_zero() {
        let digit = (&rest % &radix).to_usize().unwrap_or_default();
        reversed.push(alphabet.symbol(digit));
        rest /= &radix;
    }
    if reversed.is_empty() {
        reversed.push(alphabet.zero());
    }
    while reversed.len() < min_length {
        reversed.push(alphabet.zero());
    }

    reversed.iter().rev().collect()
}

/// `radix ^ length`, the number of distinct numerals of that length
pub fn modulus(radix: usize, length: usize) -> BigUint {
    BigUint::from(radix).pow(length as u32)
}

/// `(a + b) mod m`
pub fn add_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// `(a - b) mod m`, always non-negative
pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    ((a % m) + m - (b % m)) % m
}

/// Minimal big-endian two's-complement encoding of a non-negative value:
/// a leading zero byte is kept when the top bit would otherwise be set, and
/// zero encodes as a single zero byte.
pub fn signed_be_bytes(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        bytes.insert(0, 0);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> Alphabet {
        Alphabet::digits()
    }

    #[test]
    fn test_decode_decimal() {
        assert_eq!(decode("00123".chars(), &digits()).unwrap(), BigUint::from(123u32));
        assert_eq!(decode("".chars(), &digits()).unwrap(), BigUint::zero());
    }

    #[test]
    fn test_decode_rejects_foreign_symbol() {
        assert_eq!(
            decode("12a".chars(), &digits()),
            Err(CipherError::InvalidCharacter('a'))
        );
    }

    #[test]
    fn test_encode_pads_to_min_length() {
        assert_eq!(encode(&BigUint::from(123u32), &digits(), 5), "00123");
        assert_eq!(encode(&BigUint::from(123u32), &digits(), 2), "123");
        assert_eq!(encode(&BigUint::zero(), &digits(), 0), "0");
        assert_eq!(encode(&BigUint::zero(), &digits(), 3), "000");
    }

    #[test]
    fn test_encode_custom_alphabet() {
        let alphabet = Alphabet::new("ab").unwrap();
        assert_eq!(encode(&BigUint::from(5u32), &alphabet, 4), "abab");
        assert_eq!(decode("abab".chars(), &alphabet).unwrap(), BigUint::from(5u32));
    }

    #[test]
    fn test_modular_arithmetic() {
        let m = modulus(10, 3);
        assert_eq!(m, BigUint::from(1000u32));
        let a = BigUint::from(950u32);
        let b = BigUint::from(75u32);
        assert_eq!(add_mod(&a, &b, &m), BigUint::from(25u32));
        assert_eq!(sub_mod(&b, &a, &m), BigUint::from(125u32));
        assert_eq!(sub_mod(&add_mod(&a, &b, &m), &b, &m), a);
    }

    #[test]
    fn test_signed_be_bytes() {
        assert_eq!(signed_be_bytes(&BigUint::zero()), vec![0]);
        assert_eq!(signed_be_bytes(&BigUint::from(0x7fu32)), vec![0x7f]);
        assert_eq!(signed_be_bytes(&BigUint::from(0x80u32)), vec![0x00, 0x80]);
        assert_eq!(signed_be_bytes(&BigUint::from(0x1234u32)), vec![0x12, 0x34]);
    }
}

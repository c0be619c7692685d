//! Format-preserving encryption core.
//!
//! - [`alphabet`] - ordered symbol sets and the built-in alphabets
//! - [`radix`] - numeral/integer conversion and modular arithmetic
//! - [`cipher`] - the eight round Feistel cipher

pub mod alphabet;
pub mod cipher;
pub mod radix;

pub use alphabet::Alphabet;
pub use cipher::{parse_tweak, FpeCipher, Tweak, TWEAK_LEN, ZERO_TWEAK};

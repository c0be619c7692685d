//! Domain error types and the crate-wide result alias.
//!
//! All fallible operations outside the cipher core return
//! [`Result<T, AnonymizatorError>`](Result). Cipher operations return
//! [`CipherError`] directly and convert into [`AnonymizatorError`] through `?`:
//!
//! ```rust
//! use anonymizator::domain::Result;
//! use anonymizator::fpe::FpeCipher;
//!
//! fn example() -> Result<String> {
//!     let cipher = FpeCipher::new(&"00".repeat(32), &[0u8; 7], 10)?;
//!     Ok(cipher.encrypt("123456")?)
//! }
//! # assert_eq!(example().unwrap().len(), 6);
//! ```

pub mod errors;
pub mod result;

pub use errors::{AnonymizatorError, CipherError};
pub use result::Result;

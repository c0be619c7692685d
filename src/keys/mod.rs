//! Key management
//!
//! Named key/tweak pairs, random and HMAC-derived generation, and the
//! resolver that maps a key name to the material a cipher is built from.

pub mod generator;
pub mod pair;
pub mod resolver;

pub use generator::{KeyGenerator, KEY_LEN};
pub use pair::KeyTweakPair;
pub use resolver::{KeyResolver, KeyRing};

//! Key resolution by name

use std::collections::BTreeMap;

use super::pair::KeyTweakPair;
use crate::domain::{AnonymizatorError, Result};

/// Looks up key material by name.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<KeyTweakPair>;
}

/// In-memory key store, usually filled from the `[[keys]]` configuration
/// entries.
#[derive(Debug, Clone, Default)]
pub struct KeyRing {
    pairs: BTreeMap<String, KeyTweakPair>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair, replacing any pair with the same name.
    pub fn insert(&mut self, pair: KeyTweakPair) -> Option<KeyTweakPair> {
        let replaced = self.pairs.insert(pair.name().to_string(), pair);
        if let Some(old) = &replaced {
            tracing::debug!(name = old.name(), "Replaced key in key ring");
        }
        replaced
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.contains_key(name)
    }

    /// Key names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<KeyTweakPair> for KeyRing {
    fn from_iter<I: IntoIterator<Item = KeyTweakPair>>(iter: I) -> Self {
        let mut ring = Self::new();
        for pair in iter {
            ring.insert(pair);
        }
        ring
    }
}

impl KeyResolver for KeyRing {
    fn resolve(&self, name: &str) -> Result<KeyTweakPair> {
        self.pairs
            .get(name)
            .cloned()
            .ok_or_else(|| AnonymizatorError::KeyManagement(format!("Unknown key '{name}'")))
    }
}

//! Per-provider API keys.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::catalog::Provider;

/// Provider → key. Every provider has an entry, empty until typed in.
///
/// `Debug` prints fingerprints only; keys never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeySet {
    keys: BTreeMap<Provider, String>,
}

impl Default for ApiKeySet {
    fn default() -> Self {
        Self {
            keys: Provider::ALL
                .into_iter()
                .map(|p| (p, String::new()))
                .collect(),
        }
    }
}

impl ApiKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, provider: Provider) -> &str {
        self.keys.get(&provider).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, provider: Provider, key: impl Into<String>) {
        self.keys.insert(provider, key.into());
    }

    /// True if every entry is blank.
    pub fn is_empty(&self) -> bool {
        self.keys.values().all(|k| k.trim().is_empty())
    }
}

impl std::fmt::Debug for ApiKeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.keys.iter().map(|(p, k)| (p.as_str(), key_fingerprint(k))))
            .finish()
    }
}

/// First 12 hex chars of the SHA-256 of the trimmed key, or `"<empty>"`.
pub fn key_fingerprint(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "<empty>".to_string();
    }
    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    digest[..12].to_string()
}

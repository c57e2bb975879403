//! Content-addressed memoization of pipeline results.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use derive_more::Display;
use sha2::{Digest, Sha256};
use tracing::trace;

/// Short hex digest of `bytes`: the first 16 characters of its SHA-256.
#[must_use]
pub fn bytes_hash(bytes: &[u8]) -> String {
    let mut digest = hex::encode(Sha256::digest(bytes));
    digest.truncate(16);
    digest
}

/// Cache key built from input contents and the z-score window.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
#[display("{digest}:{min_periods}")]
pub struct ContentKey {
    /// Hash over the length-prefixed input parts.
    pub digest: String,
    /// Expanding z-score minimum periods used with these inputs.
    pub min_periods: usize,
}

impl ContentKey {
    /// Key over the concatenated inputs.
    ///
    /// Each part is prefixed with its length so that moving bytes between
    /// adjacent parts changes the key.
    #[must_use]
    pub fn new(parts: &[&[u8]], min_periods: usize) -> Self {
        let mut buf = Vec::with_capacity(parts.iter().map(|p| p.len() + 8).sum());
        for part in parts {
            buf.extend_from_slice(&(part.len() as u64).to_le_bytes());
            buf.extend_from_slice(part);
        }
        Self { digest: bytes_hash(&buf), min_periods }
    }
}

/// Thread-safe map from content keys to shared results.
#[derive(Debug)]
pub struct ContentCache<V> {
    entries: RwLock<HashMap<ContentKey, Arc<V>>>,
}

impl<V> Default for ContentCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ContentCache<V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: RwLock::new(HashMap::new()) }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached value for `key`.
    #[must_use]
    pub fn get(&self, key: &ContentKey) -> Option<Arc<V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    /// Store `value` under `key`, returning the shared handle.
    pub fn insert(&self, key: ContentKey, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&value));
        value
    }

    /// Cached value for `key`, computing and storing it on a miss.
    ///
    /// The lock is not held while `f` runs; concurrent misses on the same key
    /// may both compute, and the first stored value wins.
    ///
    /// # Errors
    /// Returns whatever `f` returns on failure; nothing is stored in that case.
    pub fn get_or_try_insert_with<E, F>(&self, key: ContentKey, f: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            trace!(%key, "cache hit");
            return Ok(hit);
        }
        trace!(%key, "cache miss");
        let value = Arc::new(f()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(value)))
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_short_sha256() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
        assert_eq!(bytes_hash(b"abc"), "ba7816bf8f01cfea");
        assert_eq!(bytes_hash(b"").len(), 16);
    }

    #[test]
    fn key_depends_on_boundaries_and_window() {
        let a = ContentKey::new(&[&b"ab"[..], &b"c"[..]], 24);
        let b = ContentKey::new(&[&b"a"[..], &b"bc"[..]], 24);
        let c = ContentKey::new(&[&b"ab"[..], &b"c"[..]], 36);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ContentKey::new(&[&b"ab"[..], &b"c"[..]], 24));
        assert!(a.to_string().ends_with(":24"));
    }

    #[test]
    fn compute_once() {
        let cache = ContentCache::new();
        let key = ContentKey::new(&[&b"factors"[..], &b"returns"[..]], 24);
        let mut calls = 0;

        let first = cache
            .get_or_try_insert_with(key.clone(), || {
                calls += 1;
                Ok::<_, ()>(42)
            })
            .unwrap();
        let second = cache
            .get_or_try_insert_with(key, || {
                calls += 1;
                Ok::<_, ()>(7)
            })
            .unwrap();

        assert_eq!(*first, 42);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache: ContentCache<u32> = ContentCache::new();
        let key = ContentKey::new(&[&b"x"[..]], 24);

        assert!(cache.get_or_try_insert_with(key.clone(), || Err("boom")).is_err());
        assert!(cache.is_empty());

        cache.insert(key.clone(), 1);
        assert_eq!(cache.get(&key).as_deref(), Some(&1));
        cache.clear();
        assert!(cache.get(&key).is_none());
    }
}

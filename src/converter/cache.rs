//! # Converter Cache
//!
//! Concurrency-safe store of compiled converters, one per type pair, kept for
//! the lifetime of the owning mapper. Entries are never evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::compiled::CompiledConverter;
use crate::error::Result;
use crate::key::TypePairKey;

/// Counters describing cache activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub compilations: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct ConverterCache {
    entries: RwLock<HashMap<TypePairKey, Arc<CompiledConverter>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    compilations: AtomicU64,
}

impl ConverterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TypePairKey) -> Option<Arc<CompiledConverter>> {
        // Entries are inserted whole, so a poisoned map is still consistent
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Return the converter for `key`, compiling and publishing it on a miss
    ///
    /// Compilation runs without holding the lock. When two threads race on the
    /// same key both may compile, but only the first published converter is
    /// kept and both callers receive it.
    pub fn get_or_compile<F>(&self, key: &TypePairKey, compile: F) -> Result<Arc<CompiledConverter>>
    where
        F: FnOnce(&TypePairKey) -> Result<CompiledConverter>,
    {
        if let Some(converter) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(converter);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let compiled = Arc::new(compile(key)?);
        self.compilations.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let published = Arc::clone(entries.entry(key.clone()).or_insert(compiled));
        tracing::debug!("[CACHE] Published converter {} ({} entries)", key, entries.len());
        Ok(published)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            compilations: self.compilations.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

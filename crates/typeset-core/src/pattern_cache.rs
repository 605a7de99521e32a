//! Per-typeface shaping-pattern cache
//!
//! Shaping engines compile a pattern (a shaping plan for one direction,
//! script, language and feature set) before they can shape a run. Every typeface owns one of these caches
//! so that layouts sharing a typeface reuse the compiled patterns.
//!
//! Lookup and insert happen under one lock; building a pattern happens
//! outside it. Two threads missing the same key at once may both build the
//! pattern, and the later insert wins.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache_config;
use crate::types::{Tag, WritingDirection};

/// Identifies a compiled shaping pattern
///
/// The engine name keeps patterns of different engines apart when they
/// share a typeface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternKey {
    pub engine: &'static str,
    pub direction: WritingDirection,
    pub script: Tag,
    pub language: Option<String>,
    pub features: Vec<(Tag, u32)>,
}

impl PatternKey {
    pub fn new(
        engine: &'static str,
        direction: WritingDirection,
        script: Tag,
        language: Option<String>,
        features: Vec<(Tag, u32)>,
    ) -> Self {
        Self {
            engine,
            direction,
            script,
            language,
            features,
        }
    }
}

type Pattern = Arc<dyn Any + Send + Sync>;

/// Lock-guarded map from pattern keys to compiled patterns
#[derive(Default)]
pub struct PatternCache {
    patterns: Mutex<HashMap<PatternKey, Pattern>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the pattern for `key`, building and storing it on a miss
    ///
    /// When caching is globally disabled the pattern is built every time.
    pub fn get_or_insert_with<T, F>(&self, key: &PatternKey, build: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        if !cache_config::is_pattern_caching_enabled() {
            return Arc::new(build());
        }

        let cached = self.patterns.lock().get(key).cloned();
        if let Some(pattern) = cached {
            if let Ok(pattern) = pattern.downcast::<T>() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return pattern;
            }
            log::warn!("Pattern for {key:?} has an unexpected type, rebuilding");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let pattern = Arc::new(build());
        self.patterns
            .lock()
            .insert(key.clone(), pattern.clone() as Pattern);
        pattern
    }

    /// Number of stored patterns
    pub fn len(&self) -> usize {
        self.patterns.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored pattern and reset statistics
    pub fn clear(&self) {
        self.patterns.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            hits,
            misses,
            entries: self.len(),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn key(script: &[u8; 4]) -> PatternKey {
        PatternKey::new(
            "test",
            WritingDirection::LeftToRight,
            Tag::new(script),
            None,
            vec![],
        )
    }

    #[test]
    fn test_builds_once_per_key() {
        let cache = PatternCache::new();
        let builds = AtomicUsize::new(0);

        for _ in 0..3 {
            let pattern = cache.get_or_insert_with(&key(b"latn"), || {
                builds.fetch_add(1, Ordering::SeqCst);
                String::from("latin pattern")
            });
            assert_eq!(pattern.as_str(), "latin pattern");
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_different_keys() {
        let cache = PatternCache::new();
        cache.get_or_insert_with(&key(b"latn"), || 1u32);
        cache.get_or_insert_with(&key(b"arab"), || 2u32);

        let with_language = PatternKey {
            language: Some("en".into()),
            ..key(b"latn")
        };
        assert_ne!(key(b"latn"), with_language);
        assert_eq!(*cache.get_or_insert_with(&with_language, || 3u32), 3);

        let right_to_left = PatternKey {
            direction: WritingDirection::RightToLeft,
            ..key(b"latn")
        };
        assert_eq!(*cache.get_or_insert_with(&right_to_left, || 4u32), 4);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_type_mismatch_rebuilds() {
        let cache = PatternCache::new();
        cache.get_or_insert_with(&key(b"latn"), || 1u32);
        let rebuilt = cache.get_or_insert_with(&key(b"latn"), || String::from("other"));
        assert_eq!(rebuilt.as_str(), "other");
    }

    #[test]
    fn test_clear_resets() {
        let cache = PatternCache::new();
        cache.get_or_insert_with(&key(b"latn"), || 1u32);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(PatternCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    let script = if i % 2 == 0 { b"latn" } else { b"arab" };
                    for _ in 0..100 {
                        let value = cache.get_or_insert_with(&key(script), || i % 2);
                        assert_eq!(*value, i % 2);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 2);
    }
}

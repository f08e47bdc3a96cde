//! Pattern Cache (component B) — LRU+TTL caches of compiled globs and
//! compiled ignore matchers, shared as a process-wide singleton.
//!
//! Backed by `dashmap` (already used throughout the indexing pipeline for
//! concurrent maps) instead of a dedicated LRU crate: capacities here are in
//! the hundreds, so an O(n) scan for the least-recently-accessed entry on
//! eviction is cheap and keeps the dependency list aligned with the rest of
//! the workspace.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Compiled glob set, cheaply shareable once built.
pub type CompiledGlob = Arc<GlobSet>;
/// Compiled ignore matcher, cheaply shareable once built.
pub type CompiledIgnore = Arc<Gitignore>;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    last_accessed_at: Instant,
}

/// Point-in-time hit/miss snapshot for one sub-cache.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub hit_rate: f64,
}

impl CacheStats {
    fn combine(a: CacheStats, b: CacheStats) -> CacheStats {
        let hits = a.hits + b.hits;
        let misses = a.misses + b.misses;
        let total = hits + misses;
        CacheStats {
            hits,
            misses,
            size: a.size + b.size,
            hit_rate: if total == 0 { 0.0 } else { hits as f64 / total as f64 },
        }
    }
}

struct TtlLruCache<V: Clone> {
    entries: DashMap<String, CacheEntry<V>>,
    capacity: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlLruCache<V> {
    fn new(capacity: usize, ttl: Duration) -> Self {
        Self { entries: DashMap::new(), capacity, ttl, hits: AtomicU64::new(0), misses: AtomicU64::new(0) }
    }

    fn get_or_insert_with(&self, key: String, compute: impl FnOnce() -> V) -> V {
        if let Some(mut entry) = self.entries.get_mut(&key) {
            if entry.inserted_at.elapsed() <= self.ttl {
                entry.last_accessed_at = Instant::now();
                self.hits.fetch_add(1, Ordering::Relaxed);
                return entry.value.clone();
            }
        }
        // Miss: either absent or expired. Drop a stale entry before recomputing.
        self.entries.remove(&key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.cleanup();

        let value = compute();
        let now = Instant::now();
        self.entries.insert(key, CacheEntry { value: value.clone(), inserted_at: now, last_accessed_at: now });
        self.evict_if_over_capacity();
        value
    }

    /// Sweep TTL-expired entries. Runs opportunistically on each miss and can
    /// also be invoked periodically by a caller.
    fn cleanup(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() <= ttl);
    }

    fn evict_if_over_capacity(&self) {
        while self.entries.len() > self.capacity {
            let oldest_key = self
                .entries
                .iter()
                .min_by_key(|e| e.value().last_accessed_at)
                .map(|e| e.key().clone());
            match oldest_key {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            hits,
            misses,
            size: self.entries.len(),
            hit_rate: if total == 0 { 0.0 } else { hits as f64 / total as f64 },
        }
    }
}

/// Combined stats view: glob sub-cache, ignore sub-cache, and their sum.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct PatternCacheStats {
    pub glob: CacheStats,
    pub ignore: CacheStats,
    pub combined: CacheStats,
}

/// Sizing/TTL knobs for one sub-cache. Individual sub-caches default to
/// size 1000 / TTL 5 minutes.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub size: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { size: 1000, ttl: Duration::from_secs(5 * 60) }
    }
}

/// The two LRU+TTL caches: compiled globs and compiled ignore matchers.
/// Combined defaults (size 500 / TTL 10 minutes) describe the aggregate
/// working set this struct is tuned for; each sub-cache carries its own
/// (larger, shorter-lived) capacity per [`CacheConfig::default`].
pub struct PatternCache {
    globs: TtlLruCache<CompiledGlob>,
    ignores: TtlLruCache<CompiledIgnore>,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(CacheConfig::default(), CacheConfig::default())
    }
}

impl PatternCache {
    pub fn new(glob_config: CacheConfig, ignore_config: CacheConfig) -> Self {
        Self {
            globs: TtlLruCache::new(glob_config.size, glob_config.ttl),
            ignores: TtlLruCache::new(ignore_config.size, ignore_config.ttl),
        }
    }

    /// Compiles (or returns the cached compilation of) a glob set for
    /// `patterns` under `options`. Patterns are expected to have already
    /// passed [`crate::pattern::validate_patterns`].
    pub fn get_glob(&self, patterns: &[String], options: &serde_json::Value) -> CompiledGlob {
        let key = glob_cache_key(patterns, options);
        self.globs.get_or_insert_with(key, || compile_glob(patterns))
    }

    /// Compiles (or returns the cached compilation of) an ignore matcher
    /// for `patterns`, relative to an implicit root (patterns themselves
    /// carry no root; callers key by root + patterns if they need to
    /// distinguish roots).
    pub fn get_ignore(&self, patterns: &[String]) -> CompiledIgnore {
        let key = ignore_cache_key(patterns);
        self.ignores.get_or_insert_with(key, || compile_ignore(patterns))
    }

    pub fn stats(&self) -> PatternCacheStats {
        let glob = self.globs.stats();
        let ignore = self.ignores.stats();
        PatternCacheStats { glob, ignore, combined: CacheStats::combine(glob, ignore) }
    }

    pub fn clear(&self) {
        self.globs.clear();
        self.ignores.clear();
    }

    pub fn cleanup(&self) {
        self.globs.cleanup();
        self.ignores.cleanup();
    }
}

fn sorted_joined(patterns: &[String]) -> String {
    let mut sorted: Vec<&str> = patterns.iter().map(|s| s.as_str()).collect();
    sorted.sort_unstable();
    sorted.join("|")
}

/// Canonicalizes a JSON options value by recursively sorting object keys,
/// then serializes it — giving a stable cache key regardless of the
/// caller's field order.
fn canonicalize_options(options: &serde_json::Value) -> String {
    fn sort_value(v: &serde_json::Value) -> serde_json::Value {
        match v {
            serde_json::Value::Object(map) => {
                let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
                entries.sort_by_key(|(k, _)| k.as_str());
                let mut out = serde_json::Map::new();
                for (k, val) in entries {
                    out.insert(k.clone(), sort_value(val));
                }
                serde_json::Value::Object(out)
            }
            serde_json::Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(sort_value).collect())
            }
            other => other.clone(),
        }
    }
    sort_value(options).to_string()
}

fn glob_cache_key(patterns: &[String], options: &serde_json::Value) -> String {
    format!("{}::{}", sorted_joined(patterns), canonicalize_options(options))
}

fn ignore_cache_key(patterns: &[String]) -> String {
    sorted_joined(patterns)
}

fn compile_glob(patterns: &[String]) -> CompiledGlob {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    Arc::new(builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap()))
}

fn compile_ignore(patterns: &[String]) -> CompiledIgnore {
    let mut builder = GitignoreBuilder::new("");
    for pattern in patterns {
        let _ = builder.add_line(None, pattern);
    }
    Arc::new(builder.build().unwrap_or_else(|_| GitignoreBuilder::new("").build().unwrap()))
}

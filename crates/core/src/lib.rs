//! codetopo-core — project index assembly, dependency resolution, and
//! compact formatters for TypeScript/JavaScript codebases.
//!
//! The pipeline: [`discovery`] walks a root into a sorted file list,
//! [`tree`] lifts it into a directory tree, an external [`parser::Parser`]
//! extracts per-file declarations and imports, [`resolver`] turns those
//! imports into a dependency graph, and [`assembler`] drives all of it into
//! a single [`model::ProjectIndex`]. [`incremental`] and [`filter`] operate
//! on an already-assembled index without rescanning; [`format`] renders one
//! to text.

pub mod assembler;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod format;
pub mod ignore_engine;
pub mod incremental;
pub mod model;
pub mod parser;
pub mod persist;
pub mod pattern;
pub mod resolver;
pub mod tree;

use cache::PatternCache;
use once_cell::sync::OnceCell;
use std::sync::{Arc, RwLock};

static SINGLETON: OnceCell<RwLock<Arc<PatternCache>>> = OnceCell::new();

fn cell() -> &'static RwLock<Arc<PatternCache>> {
    SINGLETON.get_or_init(|| RwLock::new(Arc::new(PatternCache::default())))
}

/// The process-wide Pattern Cache singleton (§9 design note). Lazily
/// initialized to [`PatternCache::default`] on first access.
pub fn pattern_cache() -> Arc<PatternCache> {
    cell().read().expect("pattern cache lock poisoned").clone()
}

/// Explicitly replaces the singleton, e.g. to install non-default sizing
/// loaded from [`config::ProjectConfig`].
pub fn init_pattern_cache(cache: PatternCache) {
    *cell().write().expect("pattern cache lock poisoned") = Arc::new(cache);
}

/// Resets the singleton back to defaults. Intended for test isolation —
/// production callers should not need this.
pub fn reset_pattern_cache() {
    init_pattern_cache(PatternCache::default());
}

//! Config (component M, ambient) — optional `.codetopo.toml` project
//! config: scan roots and cache sizing. Absent file or absent fields fall
//! back to the defaults already built into discovery and the pattern
//! cache.

use crate::cache::CacheConfig;
use crate::discovery::FilterOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    scan: RawScan,
    #[serde(default)]
    cache: RawCache,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawScan {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawCache {
    glob_size: Option<usize>,
    glob_ttl_secs: Option<u64>,
    ignore_size: Option<usize>,
    ignore_ttl_secs: Option<u64>,
}

/// The resolved project configuration: scan patterns plus cache sizing.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub scan: FilterOptions,
    pub glob_cache: CacheConfig,
    pub ignore_cache: CacheConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            scan: FilterOptions::default(),
            glob_cache: CacheConfig::default(),
            ignore_cache: CacheConfig::default(),
        }
    }
}

/// Loads `<root>/.codetopo.toml` if present. A missing file yields
/// [`ProjectConfig::default`]; a malformed file is reported via the return
/// `Err`, mirroring the teacher's `ScanConfig` load pattern of failing loud
/// on parse errors but silent on absence.
pub fn load_config(root: &Path) -> crate::error::Result<ProjectConfig> {
    let path = root.join(".codetopo.toml");
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ProjectConfig::default()),
        Err(e) => {
            return Err(crate::error::CoreError::Filesystem {
                path,
                operation: "reading .codetopo.toml".to_string(),
                source: e,
            })
        }
    };

    let raw: RawConfig = toml::from_str(&contents).map_err(|e| crate::error::CoreError::Unexpected {
        operation: "parsing .codetopo.toml".to_string(),
        cause: e.to_string(),
    })?;

    let defaults = CacheConfig::default();
    Ok(ProjectConfig {
        scan: FilterOptions { include: raw.scan.include, exclude: raw.scan.exclude },
        glob_cache: CacheConfig {
            size: raw.cache.glob_size.unwrap_or(defaults.size),
            ttl: raw.cache.glob_ttl_secs.map(Duration::from_secs).unwrap_or(defaults.ttl),
        },
        ignore_cache: CacheConfig {
            size: raw.cache.ignore_size.unwrap_or(defaults.size),
            ttl: raw.cache.ignore_ttl_secs.map(Duration::from_secs).unwrap_or(defaults.ttl),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.scan.include.is_empty());
    }

    #[test]
    fn parses_scan_and_cache_sections() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".codetopo.toml"),
            "[scan]\ninclude = [\"src/**\"]\nexclude = [\"**/*.test.ts\"]\n\n[cache]\nglob_size = 250\nglob_ttl_secs = 60\n",
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.scan.include, vec!["src/**".to_string()]);
        assert_eq!(config.scan.exclude, vec!["**/*.test.ts".to_string()]);
        assert_eq!(config.glob_cache.size, 250);
        assert_eq!(config.glob_cache.ttl, Duration::from_secs(60));
        assert_eq!(config.ignore_cache.size, CacheConfig::default().size);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".codetopo.toml"), "not valid toml [[[").unwrap();
        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn unreadable_file_is_an_error_not_silent_defaults() {
        let dir = TempDir::new().unwrap();
        // A directory at the expected path makes `read_to_string` fail with
        // something other than `NotFound` without relying on permission bits.
        std::fs::create_dir(dir.path().join(".codetopo.toml")).unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Filesystem { .. }));
    }
}

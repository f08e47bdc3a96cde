//! Index Filter (component I) — pure, in-memory re-filtering of an already
//! assembled [`ProjectIndex`] using the same include/exclude pattern
//! language as discovery. Never touches the filesystem.

use crate::cache::PatternCache;
use crate::discovery::FilterOptions;
use crate::error::{PatternRole, Result};
use crate::model::ProjectIndex;
use crate::pattern::{self, normalize_include_pattern};
use crate::tree;
use std::collections::HashSet;

/// Before/after counts and the derived reduction percentages.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct FilterStats {
    pub files_before: usize,
    pub files_after: usize,
    pub edges_before: usize,
    pub edges_after: usize,
    pub file_reduction_pct: f64,
    pub edge_reduction_pct: f64,
}

fn reduction_pct(before: usize, after: usize) -> f64 {
    if before == 0 {
        0.0
    } else {
        (1.0 - after as f64 / before as f64) * 100.0
    }
}

/// Returns `{files, edges}` reduction stats between two indexes, as
/// produced by one [`filter_index`] call (`options` is carried for context
/// only — this never re-runs the match).
pub fn stats(before: &ProjectIndex, after: &ProjectIndex, _options: &FilterOptions) -> FilterStats {
    FilterStats {
        files_before: before.nodes.len(),
        files_after: after.nodes.len(),
        edges_before: before.edges.len(),
        edges_after: after.edges.len(),
        file_reduction_pct: reduction_pct(before.nodes.len(), after.nodes.len()),
        edge_reduction_pct: reduction_pct(before.edges.len(), after.edges.len()),
    }
}

/// Filters `index` to the files selected by `options`, rebuilding `files`,
/// `edges`, and `tree` accordingly. `filter_index(index, &FilterOptions::default())`
/// returns a structurally equivalent index (only `metadata.updatedAt` may
/// change).
pub fn filter_index(
    index: &ProjectIndex,
    options: &FilterOptions,
    cache: &PatternCache,
) -> Result<ProjectIndex> {
    pattern::validate_patterns(&options.include, PatternRole::Include)?;
    pattern::validate_patterns(&options.exclude, PatternRole::Exclude)?;

    let mut result = index.clone();

    if !options.include.is_empty() || !options.exclude.is_empty() {
        let normalized_include: Vec<String> =
            options.include.iter().map(|p| normalize_include_pattern(p)).collect();
        let include_glob = (!normalized_include.is_empty())
            .then(|| cache.get_glob(&normalized_include, &serde_json::json!({})));
        let exclude_glob =
            (!options.exclude.is_empty()).then(|| cache.get_glob(&options.exclude, &serde_json::json!({})));

        let kept: Vec<String> = index
            .nodes
            .iter()
            .filter(|path| {
                let included = include_glob.as_ref().map_or(true, |g| g.is_match(path.as_str()));
                let excluded = exclude_glob.as_ref().is_some_and(|g| g.is_match(path.as_str()));
                included && !excluded
            })
            .cloned()
            .collect();

        let kept_set: HashSet<&str> = kept.iter().map(|s| s.as_str()).collect();

        result.nodes = kept;
        result.files = index
            .files
            .iter()
            .filter(|(path, _)| kept_set.contains(path.as_str()))
            .map(|(path, info)| (path.clone(), info.clone()))
            .collect();
        result.edges = index
            .edges
            .iter()
            .filter(|e| kept_set.contains(e.from.as_str()) && kept_set.contains(e.to.as_str()))
            .cloned()
            .collect();
        result.tree = tree::build_tree(&result.nodes, &index.tree.name);
    }

    result.metadata.total_files = result.nodes.len();
    result.metadata.updated_at = chrono::Utc::now().to_rfc3339();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::process_project;
    use crate::parser::RegexParser;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn sample_index(dir: &Path) -> ProjectIndex {
        write(dir, "src/index.ts", "import './utils.js';\n");
        write(dir, "src/utils.ts", "");
        write(dir, "examples/basic.ts", "");

        let cache = PatternCache::default();
        process_project(dir, &FilterOptions::default(), &RegexParser, &cache, None).unwrap()
    }

    #[test]
    fn property_8_default_options_round_trip() {
        let dir = TempDir::new().unwrap();
        let index = sample_index(dir.path());
        let cache = PatternCache::default();
        let filtered = filter_index(&index, &FilterOptions::default(), &cache).unwrap();

        assert_eq!(filtered.nodes, index.nodes);
        assert_eq!(filtered.edges, index.edges);
        assert_eq!(filtered.files, index.files);
        assert_eq!(filtered.tree, index.tree);
        assert_eq!(filtered.metadata.total_files, index.metadata.total_files);
    }

    #[test]
    fn include_narrows_files_edges_and_tree() {
        let dir = TempDir::new().unwrap();
        let index = sample_index(dir.path());
        let cache = PatternCache::default();
        let opts = FilterOptions { include: vec!["src".to_string()], exclude: vec![] };
        let filtered = filter_index(&index, &opts, &cache).unwrap();

        assert_eq!(filtered.nodes, vec!["src/index.ts".to_string(), "src/utils.ts".to_string()]);
        assert!(filtered.edges.iter().all(|e| e.from.starts_with("src/")));
        assert_eq!(tree::leaf_paths(&filtered.tree).len(), 2);
    }

    #[test]
    fn stats_report_reduction_percentages() {
        let dir = TempDir::new().unwrap();
        let index = sample_index(dir.path());
        let cache = PatternCache::default();
        let opts = FilterOptions { include: vec!["src".to_string()], exclude: vec![] };
        let filtered = filter_index(&index, &opts, &cache).unwrap();
        let s = stats(&index, &filtered, &opts);

        assert_eq!(s.files_before, 3);
        assert_eq!(s.files_after, 2);
        assert!(s.file_reduction_pct > 0.0);
    }
}

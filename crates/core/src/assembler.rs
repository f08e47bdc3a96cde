//! Project Index Assembler (component G) — drives discovery, the tree
//! builder, the external parser, and the dependency resolver to produce a
//! complete [`ProjectIndex`].

use crate::cache::PatternCache;
use crate::discovery::{self, FilterOptions};
use crate::error::{CoreError, Result};
use crate::model::{Edge, FileInfo, IndexMetadata, ProjectIndex, SCHEMA_VERSION};
use crate::parser::Parser;
use crate::resolver;
use crate::tree;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// A single named step in the assembler's 4-step pipeline, reported through
/// an optional progress callback.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent<'a> {
    pub stage: &'a str,
    pub step: u8,
    pub total_steps: u8,
}

pub type ProgressCallback<'a> = &'a dyn Fn(ProgressEvent);

const BATCH_SIZE: usize = 10;

fn report(progress: Option<ProgressCallback>, stage: &str, step: u8) {
    if let Some(cb) = progress {
        cb(ProgressEvent { stage, step, total_steps: 4 });
    }
}

/// Parses one file, never letting a misbehaving [`Parser`] implementation
/// abort the run: a panic inside `parse_file` is caught, logged, and
/// substituted with an empty [`FileInfo`].
fn parse_one(parser: &dyn Parser, path: &Path, rel: &str) -> FileInfo {
    let result = panic::catch_unwind(AssertUnwindSafe(|| parser.parse_file(path)));
    match result {
        Ok(info) => info,
        Err(_) => {
            tracing::warn!(file = rel, "parser panicked, substituting empty FileInfo");
            FileInfo::empty()
        }
    }
}

/// Parses `files` (root-relative, forward-slash paths) in serial batches of
/// [`BATCH_SIZE`], each batch parsed concurrently via `rayon`.
fn parse_all(root: &Path, files: &[String], parser: &dyn Parser) -> BTreeMap<String, FileInfo> {
    let mut out = BTreeMap::new();
    for batch in files.chunks(BATCH_SIZE) {
        let parsed: Vec<(String, FileInfo)> = batch
            .par_iter()
            .map(|rel| {
                let abs = root.join(rel);
                (rel.clone(), parse_one(parser, &abs, rel))
            })
            .collect();
        out.extend(parsed);
    }
    out
}

/// Runs the full pipeline: discover -> build tree -> parse -> resolve ->
/// stamp metadata. Fails with [`CoreError::NoFilesFound`] if discovery
/// yields an empty set with no patterns supplied (a pattern-driven empty
/// result is instead reported by discovery itself as `PatternConflict`).
pub fn process_project(
    root: &Path,
    options: &FilterOptions,
    parser: &dyn Parser,
    cache: &PatternCache,
    progress: Option<ProgressCallback>,
) -> Result<ProjectIndex> {
    report(progress, "Discovering files", 0);
    let nodes = discovery::discover(root, options, cache)?;
    if nodes.is_empty() {
        return Err(CoreError::NoFilesFound { root: root.to_path_buf() });
    }

    report(progress, "Building tree structure", 1);
    let root_name = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(".")
        .to_string();
    let tree = tree::build_tree(&nodes, &root_name);

    report(progress, "Parsing files", 2);
    let mut files = parse_all(root, &nodes, parser);

    report(progress, "Resolving dependencies", 3);
    let all_files: HashSet<String> = nodes.iter().cloned().collect();
    let mut edges = Vec::new();
    for (path, info) in files.iter_mut() {
        info.dependencies = resolver::resolve_imports(&info.imports, path, &all_files);
        edges.extend(
            info.dependencies.iter().map(|dep| Edge { from: path.clone(), to: dep.clone() }),
        );
    }

    let now = chrono::Utc::now().to_rfc3339();
    let metadata = IndexMetadata {
        version: SCHEMA_VERSION,
        root: root.to_string_lossy().to_string(),
        created_at: now.clone(),
        updated_at: now,
        total_files: nodes.len(),
    };

    report(progress, "Complete", 4);

    Ok(ProjectIndex { metadata, tree, nodes, edges, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RegexParser;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn assembles_consistent_index() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/index.ts", "import './utils.js';\n");
        write(dir.path(), "src/utils.ts", "export const x = 1;\n");

        let cache = PatternCache::default();
        let index =
            process_project(dir.path(), &FilterOptions::default(), &RegexParser, &cache, None)
                .unwrap();

        assert_eq!(index.metadata.total_files, 2);
        assert_eq!(index.nodes.len(), 2);
        assert_eq!(
            index.files["src/index.ts"].dependencies,
            vec!["src/utils.ts".to_string()]
        );
        assert_eq!(
            index.edges,
            vec![crate::model::Edge { from: "src/index.ts".into(), to: "src/utils.ts".into() }]
        );
    }

    #[test]
    fn empty_project_without_patterns_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "README.md", "nothing indexable\n");

        let cache = PatternCache::default();
        let err =
            process_project(dir.path(), &FilterOptions::default(), &RegexParser, &cache, None)
                .unwrap_err();
        assert!(matches!(err, CoreError::NoFilesFound { .. }));
    }

    #[test]
    fn progress_callback_is_invoked_four_times() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.ts", "");

        let cache = PatternCache::default();
        let seen = AtomicUsize::new(0);
        let cb = |_event: ProgressEvent| {
            seen.fetch_add(1, Ordering::Relaxed);
        };
        process_project(dir.path(), &FilterOptions::default(), &RegexParser, &cache, Some(&cb))
            .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn batches_larger_than_ten_files_all_parse() {
        let dir = TempDir::new().unwrap();
        for i in 0..25 {
            write(dir.path(), &format!("file{i}.ts"), "");
        }

        let cache = PatternCache::default();
        let index =
            process_project(dir.path(), &FilterOptions::default(), &RegexParser, &cache, None)
                .unwrap();
        assert_eq!(index.nodes.len(), 25);
        assert_eq!(index.files.len(), 25);
    }
}

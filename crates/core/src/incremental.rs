//! Incremental Updater (component H) — applies a single-file add/update/
//! remove to an existing [`ProjectIndex`] without rescanning the tree.
//! Neither operation touches the filesystem beyond parsing the one changed
//! file; `update_file` never adds a new node to `nodes` — that remains the
//! assembler's job.

use crate::discovery;
use crate::error::{CoreError, Result};
use crate::model::{Edge, FileInfo, ProjectIndex};
use crate::parser::Parser;
use crate::resolver;
use crate::tree;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

fn parse_or_empty(parser: &dyn Parser, abs: &Path, rel: &str) -> FileInfo {
    match panic::catch_unwind(AssertUnwindSafe(|| parser.parse_file(abs))) {
        Ok(info) => info,
        Err(_) => {
            tracing::warn!(file = rel, "parser panicked during incremental update, substituting empty FileInfo");
            FileInfo::empty()
        }
    }
}

fn has_supported_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(discovery::is_supported_extension)
}

/// Re-parses `path` (already present in `index.nodes`) and rewrites its
/// `FileInfo` plus every edge touching it. Fails with
/// [`CoreError::UnsupportedExtension`] if `path`'s extension isn't one of
/// the four supported ones.
pub fn update_file(
    path: &str,
    mut index: ProjectIndex,
    root: &Path,
    parser: &dyn Parser,
) -> Result<ProjectIndex> {
    if !has_supported_extension(path) {
        return Err(CoreError::UnsupportedExtension { path: path.to_string() });
    }

    let abs = root.join(path);
    let mut info = parse_or_empty(parser, &abs, path);

    let all_files: HashSet<String> = index.nodes.iter().cloned().collect();
    info.dependencies = resolver::resolve_imports(&info.imports, path, &all_files);

    index.edges.retain(|e| e.from != path && e.to != path);
    for dep in &info.dependencies {
        index.edges.push(Edge { from: path.to_string(), to: dep.clone() });
    }
    for (other_path, other_info) in index.files.iter() {
        if other_path != path && other_info.dependencies.iter().any(|d| d == path) {
            index.edges.push(Edge { from: other_path.clone(), to: path.to_string() });
        }
    }
    index.edges.sort();
    index.edges.dedup();

    index.files.insert(path.to_string(), info);
    index.metadata.updated_at = chrono::Utc::now().to_rfc3339();

    Ok(index)
}

/// Drops `path` entirely: its `FileInfo`, its slot in `nodes`, every edge
/// touching it, and rebuilds `tree` over the surviving node set.
pub fn remove_file(path: &str, mut index: ProjectIndex) -> ProjectIndex {
    index.files.remove(path);
    index.nodes.retain(|p| p != path);
    index.edges.retain(|e| e.from != path && e.to != path);
    for info in index.files.values_mut() {
        info.dependencies.retain(|d| d != path);
    }

    let root_name = index.tree.name.clone();
    index.tree = tree::build_tree(&index.nodes, &root_name);

    index.metadata.total_files = index.nodes.len();
    index.metadata.updated_at = chrono::Utc::now().to_rfc3339();

    index
}

use super::{format_class_sig, format_const_sig, format_func_sig};
use crate::model::ProjectIndex;
use std::collections::BTreeMap;
use std::fmt::Write;

fn dir_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => ".",
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Files grouped under `## dir/` headings, each rendered as a `### file`
/// section with `**Dependencies:**`/`**Functions:**`/`**Classes:**`/
/// `**Constants:**` bullets (only non-empty categories are shown), followed
/// by a trailing `## Dependencies` summary.
pub fn format_markdown(index: &ProjectIndex) -> String {
    let mut by_dir: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for path in &index.nodes {
        by_dir.entry(dir_of(path)).or_default().push(path.as_str());
    }

    let mut out = String::new();
    for (dir, paths) in &by_dir {
        let _ = writeln!(out, "## {dir}/\n");
        for path in paths {
            let _ = writeln!(out, "### {}\n", base_name(path));
            let Some(info) = index.files.get(*path) else { continue };

            if !info.dependencies.is_empty() {
                let _ = writeln!(out, "**Dependencies:** {}", info.dependencies.join(", "));
            }
            if !info.functions.is_empty() {
                let sigs: Vec<String> = info.functions.iter().map(format_func_sig).collect();
                let _ = writeln!(out, "**Functions:** {}", sigs.join(", "));
            }
            if !info.classes.is_empty() {
                let sigs: Vec<String> = info.classes.iter().map(format_class_sig).collect();
                let _ = writeln!(out, "**Classes:** {}", sigs.join(", "));
            }
            if !info.constants.is_empty() {
                let sigs: Vec<String> = info.constants.iter().map(format_const_sig).collect();
                let _ = writeln!(out, "**Constants:** {}", sigs.join(", "));
            }
            out.push('\n');
        }
    }

    let _ = writeln!(out, "## Dependencies\n");
    let _ = writeln!(out, "- Total files: {}", index.nodes.len());
    let _ = writeln!(out, "- Total edges: {}", index.edges.len());

    out
}

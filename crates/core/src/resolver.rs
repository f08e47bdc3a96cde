//! Dependency Resolver (component F) — resolves relative specifiers to
//! indexed files, builds the edge list, and analyzes the resulting graph
//! (cycles, entry points, leaves). Never touches the filesystem: resolution
//! is purely a set-membership check against the discovered file set.

use crate::model::{Edge, ImportInfo};
use std::collections::{BTreeMap, HashMap, HashSet};

const EXTENSION_ORDER: &[&str] = &["ts", "tsx", "js", "jsx"];
const INDEX_FILES: &[&str] = &["index.ts", "index.tsx", "index.js", "index.jsx"];

/// `normalize(dirname(current_file) + '/' + specifier)` with POSIX `..`
/// canonicalization, leading-`/` stripped.
fn join_normalize(dir: &str, specifier: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    let combined = if dir.is_empty() { specifier.to_string() } else { format!("{dir}/{specifier}") };
    for part in combined.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}

fn dirname(file: &str) -> &str {
    match file.rfind('/') {
        Some(idx) => &file[..idx],
        None => "",
    }
}

fn replace_extension(joined: &str, new_ext: &str) -> String {
    let last_slash = joined.rfind('/').map(|i| i + 1).unwrap_or(0);
    let (dir_part, file_part) = joined.split_at(last_slash);
    let stem = file_part.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_part);
    format!("{dir_part}{stem}.{new_ext}")
}

fn candidates_for(joined: &str) -> Vec<String> {
    let last_segment = joined.rsplit('/').next().unwrap_or(joined);
    let ext = last_segment.rsplit_once('.').map(|(_, e)| e);

    match ext {
        Some("js") => vec![replace_extension(joined, "ts"), joined.to_string()],
        Some("jsx") => vec![replace_extension(joined, "tsx"), joined.to_string()],
        Some(_) => vec![joined.to_string()],
        None => {
            let mut out: Vec<String> =
                EXTENSION_ORDER.iter().map(|ext| format!("{joined}.{ext}")).collect();
            out.extend(INDEX_FILES.iter().map(|idx| format!("{joined}/{idx}")));
            out
        }
    }
}

/// Resolves one relative specifier written inside `current_file` against
/// `all_files`. Returns `None` if no candidate is a member of the set.
pub fn resolve_specifier(
    current_file: &str,
    specifier: &str,
    all_files: &HashSet<String>,
) -> Option<String> {
    let joined = join_normalize(dirname(current_file), specifier);
    candidates_for(&joined).into_iter().find(|c| all_files.contains(c))
}

/// Resolves every relative import in `imports`, returning the sorted,
/// deduplicated set of dependencies. Non-relative and unresolvable
/// specifiers are silently dropped.
pub fn resolve_imports(
    imports: &[ImportInfo],
    current_file: &str,
    all_files: &HashSet<String>,
) -> Vec<String> {
    let mut resolved: Vec<String> = imports
        .iter()
        .filter(|i| i.is_relative())
        .filter_map(|i| resolve_specifier(current_file, &i.from, all_files))
        .collect();
    resolved.sort();
    resolved.dedup();
    resolved
}

/// Resolves every file's imports and emits one edge per `(file, dependency)`
/// pair. O(N*K): each specifier resolution is a constant-time hash-set
/// membership check per candidate.
pub fn build_graph(
    files_to_imports: &BTreeMap<String, Vec<ImportInfo>>,
    all_files: &HashSet<String>,
) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (file, imports) in files_to_imports {
        for dep in resolve_imports(imports, file, all_files) {
            edges.push(Edge { from: file.clone(), to: dep });
        }
    }
    edges
}

/// Iterative DFS cycle detection over the adjacency list induced by
/// `edges`. A self-loop `a -> a` is reported as the 2-element cycle
/// `[a, a]`. Traversal continues after recording a cycle instead of
/// aborting, so multiple independent cycles are all found.
pub fn find_circular_dependencies(edges: &[Edge]) -> Vec<Vec<String>> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut all_nodes: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for edge in edges {
        adjacency.entry(edge.from.clone()).or_default().push(edge.to.clone());
        for node in [&edge.from, &edge.to] {
            if seen.insert(node.clone()) {
                all_nodes.push(node.clone());
            }
        }
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut cycles: Vec<Vec<String>> = Vec::new();
    let empty: Vec<String> = Vec::new();

    for start in &all_nodes {
        if visited.contains(start) {
            continue;
        }

        let mut path: Vec<String> = vec![start.clone()];
        let mut on_stack: HashSet<String> = HashSet::from([start.clone()]);
        let mut frames: Vec<(String, usize)> = vec![(start.clone(), 0)];
        visited.insert(start.clone());

        while let Some((node, idx)) = frames.last().cloned() {
            let neighbors = adjacency.get(&node).unwrap_or(&empty);
            if idx < neighbors.len() {
                let next = neighbors[idx].clone();
                frames.last_mut().unwrap().1 += 1;

                if on_stack.contains(&next) {
                    let pos = path.iter().position(|p| p == &next).expect("next is on stack");
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(next);
                    cycles.push(cycle);
                } else if !visited.contains(&next) {
                    visited.insert(next.clone());
                    path.push(next.clone());
                    on_stack.insert(next.clone());
                    frames.push((next, 0));
                }
            } else {
                frames.pop();
                path.pop();
                on_stack.remove(&node);
            }
        }
    }

    cycles
}

/// Out-degree and in-degree maps over the edge list.
pub fn dependency_counts(edges: &[Edge]) -> (BTreeMap<String, usize>, BTreeMap<String, usize>) {
    let mut out_degree: BTreeMap<String, usize> = BTreeMap::new();
    let mut in_degree: BTreeMap<String, usize> = BTreeMap::new();
    for edge in edges {
        *out_degree.entry(edge.from.clone()).or_insert(0) += 1;
        *in_degree.entry(edge.to.clone()).or_insert(0) += 1;
    }
    (out_degree, in_degree)
}

/// Files with no outgoing dependency edge, in `files`' input order.
pub fn entry_points(edges: &[Edge], files: &[String]) -> Vec<String> {
    let has_outgoing: HashSet<&str> = edges.iter().map(|e| e.from.as_str()).collect();
    files.iter().filter(|f| !has_outgoing.contains(f.as_str())).cloned().collect()
}

/// Files with no incoming dependency edge, in `files`' input order.
pub fn leaf_files(edges: &[Edge], files: &[String]) -> Vec<String> {
    let has_incoming: HashSet<&str> = edges.iter().map(|e| e.to.as_str()).collect();
    files.iter().filter(|f| !has_incoming.contains(f.as_str())).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpecifierKind;

    fn files(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn scenario_s1_relative_resolution_prefers_ts_over_js() {
        let all = files(&["src/index.ts", "src/utils.ts", "src/components/Button.ts"]);
        let imports = vec![
            ImportInfo::new("./utils.js", SpecifierKind::Import),
            ImportInfo::new("./components/Button.js", SpecifierKind::Import),
        ];
        let mut deps = resolve_imports(&imports, "src/index.ts", &all);
        deps.sort();
        assert_eq!(
            deps,
            vec!["src/components/Button.ts".to_string(), "src/utils.ts".to_string()]
        );
    }

    #[test]
    fn scenario_s2_directory_index_resolution() {
        let all = files(&["src/index.ts", "src/components/index.ts"]);
        let imports = vec![ImportInfo::new("./components", SpecifierKind::Import)];
        let deps = resolve_imports(&imports, "src/index.ts", &all);
        assert_eq!(deps, vec!["src/components/index.ts".to_string()]);
    }

    #[test]
    fn jsx_specifier_prefers_tsx() {
        let all = files(&["src/a.tsx", "src/a.jsx"]);
        let imports = vec![ImportInfo::new("./a.jsx", SpecifierKind::Import)];
        let deps = resolve_imports(&imports, "src/b.ts", &all);
        assert_eq!(deps, vec!["src/a.tsx".to_string()]);
    }

    #[test]
    fn jsx_specifier_falls_back_to_original_extension() {
        let all = files(&["src/a.jsx"]);
        let imports = vec![ImportInfo::new("./a.jsx", SpecifierKind::Import)];
        let deps = resolve_imports(&imports, "src/b.ts", &all);
        assert_eq!(deps, vec!["src/a.jsx".to_string()]);
    }

    #[test]
    fn non_relative_specifiers_are_ignored() {
        let all = files(&["src/index.ts"]);
        let imports = vec![ImportInfo::new("react", SpecifierKind::Import)];
        assert!(resolve_imports(&imports, "src/index.ts", &all).is_empty());
    }

    #[test]
    fn parent_traversal_is_resolved() {
        let all = files(&["shared/util.ts", "src/index.ts"]);
        let imports = vec![ImportInfo::new("../shared/util", SpecifierKind::Import)];
        let deps = resolve_imports(&imports, "src/index.ts", &all);
        assert_eq!(deps, vec!["shared/util.ts".to_string()]);
    }

    #[test]
    fn scenario_s3_simple_cycle() {
        let edges = vec![
            Edge { from: "a".into(), to: "b".into() },
            Edge { from: "b".into(), to: "c".into() },
            Edge { from: "c".into(), to: "d".into() },
            Edge { from: "d".into(), to: "b".into() },
        ];
        let cycles = find_circular_dependencies(&edges);
        assert_eq!(cycles, vec![vec!["b", "c", "d", "b"]]);
    }

    #[test]
    fn scenario_s4_multiple_independent_cycles() {
        let edges = vec![
            Edge { from: "a".into(), to: "b".into() },
            Edge { from: "b".into(), to: "a".into() },
            Edge { from: "x".into(), to: "y".into() },
            Edge { from: "y".into(), to: "z".into() },
            Edge { from: "z".into(), to: "x".into() },
        ];
        let mut cycles = find_circular_dependencies(&edges);
        cycles.sort_by(|a, b| a[0].cmp(&b[0]));
        assert_eq!(cycles, vec![vec!["a", "b", "a"], vec!["x", "y", "z", "x"]]);
    }

    #[test]
    fn self_loop_is_a_two_element_cycle() {
        let edges = vec![Edge { from: "a".into(), to: "a".into() }];
        let cycles = find_circular_dependencies(&edges);
        assert_eq!(cycles, vec![vec!["a", "a"]]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let edges = vec![
            Edge { from: "a".into(), to: "b".into() },
            Edge { from: "b".into(), to: "c".into() },
        ];
        assert!(find_circular_dependencies(&edges).is_empty());
    }

    #[test]
    fn dependency_counts_sum_matches_edge_count() {
        let edges = vec![
            Edge { from: "a".into(), to: "b".into() },
            Edge { from: "a".into(), to: "c".into() },
            Edge { from: "b".into(), to: "c".into() },
        ];
        let (out_degree, in_degree) = dependency_counts(&edges);
        let out_sum: usize = out_degree.values().sum();
        let in_sum: usize = in_degree.values().sum();
        assert_eq!(out_sum, edges.len());
        assert_eq!(in_sum, edges.len());
    }

    #[test]
    fn entry_points_and_leaves() {
        let files_list = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let edges = vec![
            Edge { from: "a".into(), to: "b".into() },
            Edge { from: "b".into(), to: "c".into() },
        ];
        assert_eq!(entry_points(&edges, &files_list), vec!["c".to_string()]);
        assert_eq!(leaf_files(&edges, &files_list), vec!["a".to_string()]);
    }
}

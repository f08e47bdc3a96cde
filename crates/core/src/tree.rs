//! Tree Builder (component E) — lifts a flat, sorted file list into a
//! directory tree. Pure: never touches the filesystem, deterministic for a
//! fixed input.

use crate::model::{NodeType, TreeNode};
use std::collections::BTreeMap;

enum Builder {
    Dir(BTreeMap<String, Builder>),
    File,
}

/// Builds a [`TreeNode`] rooted at `root_name` from a sorted file list.
/// Directory children are ordered directories-first, then alphabetically
/// within each group; running this twice on the same input yields a
/// byte-identical tree.
pub fn build_tree(files: &[String], root_name: &str) -> TreeNode {
    let mut root = BTreeMap::new();

    for path in files {
        let mut node = &mut root;
        let parts: Vec<&str> = path.split('/').collect();
        for (i, part) in parts.iter().enumerate() {
            let is_last = i == parts.len() - 1;
            if is_last {
                // Don't clobber a directory already built under this name with a
                // file leaf — keep the directory, matching the file-then-dir case
                // handled below.
                node.entry(part.to_string()).or_insert(Builder::File);
            } else {
                node = match node.entry(part.to_string()).or_insert_with(|| Builder::Dir(BTreeMap::new())) {
                    Builder::Dir(children) => children,
                    Builder::File => {
                        // A file and a directory share a path segment — keep the
                        // directory; later files passing through it still resolve.
                        *node.get_mut(*part).unwrap() = Builder::Dir(BTreeMap::new());
                        match node.get_mut(*part).unwrap() {
                            Builder::Dir(children) => children,
                            Builder::File => unreachable!(),
                        }
                    }
                };
            }
        }
    }

    to_tree_node(root_name, Builder::Dir(root))
}

fn to_tree_node(name: &str, builder: Builder) -> TreeNode {
    match builder {
        Builder::File => TreeNode::file(name),
        Builder::Dir(children) => {
            let mut dirs = Vec::new();
            let mut files = Vec::new();
            for (child_name, child) in children {
                let node = to_tree_node(&child_name, child);
                match node.node_type {
                    NodeType::Dir => dirs.push(node),
                    NodeType::File => files.push(node),
                }
            }
            dirs.sort_by(|a, b| a.name.cmp(&b.name));
            files.sort_by(|a, b| a.name.cmp(&b.name));
            dirs.extend(files);
            TreeNode::dir(name, dirs)
        }
    }
}

/// Returns every leaf (file) path present in `tree`, forward-slash joined
/// relative to the tree's root.
pub fn leaf_paths(tree: &TreeNode) -> Vec<String> {
    let mut out = Vec::new();
    collect_leaves(tree, &mut Vec::new(), &mut out, true);
    out
}

fn collect_leaves(node: &TreeNode, prefix: &mut Vec<String>, out: &mut Vec<String>, is_root: bool) {
    match &node.children {
        Some(children) => {
            if !is_root {
                prefix.push(node.name.clone());
            }
            for child in children {
                collect_leaves(child, prefix, out, false);
            }
            if !is_root {
                prefix.pop();
            }
        }
        None => {
            let mut parts = prefix.clone();
            parts.push(node.name.clone());
            out.push(parts.join("/"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_sort_before_files_alphabetically_within_groups() {
        let files = vec![
            "b.ts".to_string(),
            "a/index.ts".to_string(),
            "a.ts".to_string(),
        ];
        let tree = build_tree(&files, "root");
        let children = tree.children.unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a.ts", "b.ts"]);
        assert_eq!(children[0].node_type, NodeType::Dir);
    }

    #[test]
    fn a_directory_built_from_an_earlier_path_is_not_clobbered_by_a_later_file_leaf() {
        let files = vec!["a/index.ts".to_string(), "a".to_string()];
        let tree = build_tree(&files, "root");
        let children = tree.children.unwrap();
        let a = children.iter().find(|c| c.name == "a").unwrap();
        assert_eq!(a.node_type, NodeType::Dir);
        assert_eq!(leaf_paths(&tree), vec!["a/index.ts".to_string()]);
    }

    #[test]
    fn build_tree_is_idempotent() {
        let files =
            vec!["src/index.ts".to_string(), "src/components/Button.ts".to_string()];
        let first = build_tree(&files, "proj");
        let second = build_tree(&files, "proj");
        assert_eq!(first, second);
    }

    #[test]
    fn leaf_paths_round_trip_the_input_set() {
        let mut files = vec![
            "src/index.ts".to_string(),
            "src/components/Button.ts".to_string(),
            "src/utils.ts".to_string(),
        ];
        files.sort();
        let tree = build_tree(&files, "proj");
        let mut leaves = leaf_paths(&tree);
        leaves.sort();
        assert_eq!(leaves, files);
    }
}

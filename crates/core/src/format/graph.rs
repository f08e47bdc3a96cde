use super::short_path;
use crate::model::ProjectIndex;
use std::fmt::Write;

fn class_repr(class: &crate::model::ClassInfo) -> String {
    format!("{}({}m,{}p)", class.name, class.methods.len(), class.properties.len())
}

/// `DEPS:` block of shortened `from→to` lines, then a `SIGS:` block with one
/// line per file carrying declarations (files with none are omitted).
/// Terser than [`super::format_dsl`]: class entries drop `extends`, constant
/// entries drop their type.
pub fn format_graph(index: &ProjectIndex) -> String {
    let mut out = String::new();

    out.push_str("DEPS:\n");
    for edge in &index.edges {
        let _ = writeln!(out, "{}→{}", short_path(&edge.from), short_path(&edge.to));
    }

    out.push_str("SIGS:\n");
    for path in &index.nodes {
        let Some(info) = index.files.get(path) else { continue };
        if info.functions.is_empty() && info.classes.is_empty() && info.constants.is_empty() {
            continue;
        }

        let mut groups = Vec::new();
        if !info.functions.is_empty() {
            let names: Vec<&str> = info.functions.iter().map(|f| f.name.as_str()).collect();
            groups.push(format!("fn:{}", names.join(",")));
        }
        if !info.classes.is_empty() {
            let reprs: Vec<String> = info.classes.iter().map(class_repr).collect();
            groups.push(format!("cl:{}", reprs.join(",")));
        }
        if !info.constants.is_empty() {
            let names: Vec<&str> = info.constants.iter().map(|c| c.name.as_str()).collect();
            groups.push(format!("cn:{}", names.join(",")));
        }

        let _ = writeln!(out, "{}: {}", short_path(path), groups.join(" "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassInfo, Edge, FileInfo, FuncSig, IndexMetadata, ProjectIndex, TreeNode};
    use std::collections::BTreeMap;

    #[test]
    fn deps_block_shortens_paths() {
        let mut files = BTreeMap::new();
        files.insert("src/index.ts".to_string(), FileInfo::empty());
        files.insert("src/utils.ts".to_string(), FileInfo::empty());
        let index = ProjectIndex {
            metadata: IndexMetadata {
                version: 1,
                root: "/p".into(),
                created_at: "now".into(),
                updated_at: "now".into(),
                total_files: 2,
            },
            tree: TreeNode::dir("p", vec![]),
            nodes: vec!["src/index.ts".into(), "src/utils.ts".into()],
            edges: vec![Edge { from: "src/index.ts".into(), to: "src/utils.ts".into() }],
            files,
        };

        let out = format_graph(&index);
        assert!(out.contains("DEPS:\nindex→utils\n"));
        assert!(out.contains("SIGS:\n"));
    }

    #[test]
    fn sigs_block_omits_files_without_declarations() {
        let mut with_class = FileInfo::empty();
        with_class.classes = vec![ClassInfo {
            name: "Widget".into(),
            methods: vec!["a".into()],
            properties: vec![],
            extends: None,
        }];
        let mut files = BTreeMap::new();
        files.insert("a.ts".to_string(), FileInfo::empty());
        files.insert("b.ts".to_string(), with_class);
        let index = ProjectIndex {
            metadata: IndexMetadata {
                version: 1,
                root: "/p".into(),
                created_at: "now".into(),
                updated_at: "now".into(),
                total_files: 2,
            },
            tree: TreeNode::dir("p", vec![]),
            nodes: vec!["a.ts".into(), "b.ts".into()],
            edges: vec![],
            files,
        };

        let out = format_graph(&index);
        assert!(!out.contains("a.ts:"));
        assert!(out.contains("b: cl:Widget(1m,0p)"));
    }

    #[test]
    fn function_group_lists_bare_names() {
        let mut info = FileInfo::empty();
        info.functions = vec![FuncSig {
            name: "run".into(),
            params: vec![],
            return_type: None,
            is_async: true,
        }];
        let mut files = BTreeMap::new();
        files.insert("a.ts".to_string(), info);
        let index = ProjectIndex {
            metadata: IndexMetadata {
                version: 1,
                root: "/p".into(),
                created_at: "now".into(),
                updated_at: "now".into(),
                total_files: 1,
            },
            tree: TreeNode::dir("p", vec![]),
            nodes: vec!["a.ts".into()],
            edges: vec![],
            files,
        };
        assert!(format_graph(&index).contains("a: fn:run"));
    }
}

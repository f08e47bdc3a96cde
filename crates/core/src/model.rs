//! Core data model: the value types every other module reads and writes.
//!
//! Plain records only — no polymorphism beyond the specifier-kind and
//! tree-node variants (see DESIGN NOTES in the spec this crate implements).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------------

/// How a module specifier reached the file: `import`, `export ... from`,
/// `require(...)`, or a dynamic `import(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecifierKind {
    Import,
    Export,
    Require,
    DynamicImport,
}

/// One raw module reference extracted from a file. `named` is opaque
/// binding metadata the resolver never inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub from: String,
    pub kind: SpecifierKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named: Option<Vec<String>>,
}

impl ImportInfo {
    pub fn new(from: impl Into<String>, kind: SpecifierKind) -> Self {
        Self { from: from.into(), kind, named: None }
    }

    /// A specifier is relative iff it starts with `./` or `../`.
    pub fn is_relative(&self) -> bool {
        is_relative_specifier(&self.from)
    }
}

/// A specifier starting with `./` or `../` is relative; everything else
/// (bare names, scoped names, absolute paths) is ignored by the resolver.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

// ---------------------------------------------------------------------------
// Declarations — opaque payloads produced by the external parser
// ---------------------------------------------------------------------------

/// A function/method parameter. `type_` is `None` when the source carries no
/// type annotation (formatted as `?` by the DSL formatter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Param {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncSig {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

// ---------------------------------------------------------------------------
// FileInfo
// ---------------------------------------------------------------------------

/// Per-file record. `dependencies` is owned by the index and mutated only
/// by the incremental updater or when the whole file is rebuilt by the
/// assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileInfo {
    #[serde(default)]
    pub imports: Vec<ImportInfo>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub functions: Vec<FuncSig>,
    #[serde(default)]
    pub classes: Vec<ClassInfo>,
    #[serde(default)]
    pub constants: Vec<ConstInfo>,
}

impl FileInfo {
    /// An empty record with no imports or declarations — used when the
    /// external parser fails and the pipeline substitutes a placeholder.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.dependencies.is_empty()
            && self.functions.is_empty()
            && self.classes.is_empty()
            && self.constants.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Dir,
    File,
}

/// Recursive directory tree. Children of a directory are ordered
/// directories-first, then alphabetically within each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn dir(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self { name: name.into(), node_type: NodeType::Dir, children: Some(children) }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), node_type: NodeType::File, children: None }
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

// ---------------------------------------------------------------------------
// Metadata and the project index
// ---------------------------------------------------------------------------

/// Schema version stamped on every freshly assembled index.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub version: u32,
    pub root: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub metadata: IndexMetadata,
    pub tree: TreeNode,
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
    pub files: BTreeMap<String, FileInfo>,
}

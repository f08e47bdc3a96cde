//! Parser boundary — the external AST extractor this crate consumes.
//!
//! `Parser::parse_file` is specified as total: it never propagates an I/O or
//! syntax error, it returns the best [`FileInfo`] it can. Callers (the
//! assembler) are responsible for substituting an empty [`FileInfo`] and
//! logging a warning when a parser implementation does fail internally.

use crate::model::{FileInfo, ImportInfo, SpecifierKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Extracts a [`FileInfo`] from a single source file.
pub trait Parser: Send + Sync {
    fn parse_file(&self, path: &Path) -> FileInfo;
}

// `import ... from './x'` / `import './x'`
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:[^'"]*?\sfrom\s+)?['"]([^'"]+)['"]"#).unwrap()
});
// `export ... from './x'`
static EXPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*export\s+(?:[^'"]*?\sfrom\s+)?['"]([^'"]+)['"]"#).unwrap());
// `require('./x')`
static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
// `import('./x')`
static DYNAMIC_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

/// A lightweight, line-oriented regex scanner. This is a deliberate stand-in
/// for a real AST-backed extractor: it recognizes the four import forms
/// (`import`, `export ... from`, `require`, dynamic `import()`) but never
/// populates `functions`, `classes`, or `constants` — those fields are
/// always empty on a `RegexParser` result.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexParser;

impl Parser for RegexParser {
    fn parse_file(&self, path: &Path) -> FileInfo {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return FileInfo::empty(),
        };
        FileInfo { imports: extract_imports(&source), ..FileInfo::empty() }
    }
}

fn extract_imports(source: &str) -> Vec<ImportInfo> {
    let mut imports = Vec::new();
    for caps in IMPORT_RE.captures_iter(source) {
        imports.push(ImportInfo::new(caps[1].to_string(), SpecifierKind::Import));
    }
    for caps in EXPORT_RE.captures_iter(source) {
        imports.push(ImportInfo::new(caps[1].to_string(), SpecifierKind::Export));
    }
    for caps in REQUIRE_RE.captures_iter(source) {
        imports.push(ImportInfo::new(caps[1].to_string(), SpecifierKind::Require));
    }
    for caps in DYNAMIC_IMPORT_RE.captures_iter(source) {
        imports.push(ImportInfo::new(caps[1].to_string(), SpecifierKind::DynamicImport));
    }
    imports
}

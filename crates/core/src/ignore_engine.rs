//! Ignore Engine (component C) — composes `.gitignore`, built-in defaults,
//! and walker-level directory pruning into a single matcher.

use crate::cache::{CompiledIgnore, PatternCache};
use std::path::Path;

/// Directory names pruned at walk time — never descended into, regardless
/// of `.gitignore` contents.
pub const BUILTIN_PRUNE_DIRS: &[&str] =
    &["node_modules", "dist", "build", ".next", ".turbo", ".git", "coverage", ".nyc_output"];

/// Default ignore lines appended after the user's `.gitignore`.
pub const BUILTIN_IGNORE_LINES: &[&str] = &[
    // Editor junk
    "*.swp",
    "*.swo",
    "*~",
    ".DS_Store",
    // Logs
    "*.log",
    "npm-debug.log*",
    // Environment files
    ".env",
    ".env.*",
    // Temp dirs
    "tmp/",
    "temp/",
    // Dependency lockfiles
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
];

pub fn is_builtin_prune_dir(name: &str) -> bool {
    BUILTIN_PRUNE_DIRS.contains(&name)
}

/// Reads `<root>/.gitignore` into its constituent lines. Read errors
/// (missing file, permission denied, non-UTF8) are swallowed: discovery
/// continues with the built-in defaults only.
fn read_gitignore_lines(root: &Path) -> Vec<String> {
    match std::fs::read_to_string(root.join(".gitignore")) {
        Ok(contents) => contents.lines().map(|l| l.to_string()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Builds the composite `.gitignore` + built-in-defaults matcher for
/// `root`, memoized through the shared [`PatternCache`].
pub fn load_ignore(root: &Path, cache: &PatternCache) -> CompiledIgnore {
    let mut lines = read_gitignore_lines(root);
    lines.extend(BUILTIN_IGNORE_LINES.iter().map(|s| s.to_string()));
    cache.get_ignore(&lines)
}

/// Project-relative, forward-slash match test.
pub fn matches(matcher: &CompiledIgnore, rel_path: &str, is_dir: bool) -> bool {
    matcher.matched(rel_path, is_dir).is_ignore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_gitignore_degrades_to_builtins_only() {
        let dir = TempDir::new().unwrap();
        let cache = PatternCache::default();
        let matcher = load_ignore(dir.path(), &cache);
        assert!(matches(&matcher, "package-lock.json", false));
        assert!(!matches(&matcher, "src/index.ts", false));
    }

    #[test]
    fn user_gitignore_lines_are_honored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.generated.ts\n").unwrap();
        let cache = PatternCache::default();
        let matcher = load_ignore(dir.path(), &cache);
        assert!(matches(&matcher, "src/foo.generated.ts", false));
    }

    #[test]
    fn builtin_prune_dirs_include_node_modules() {
        assert!(is_builtin_prune_dir("node_modules"));
        assert!(!is_builtin_prune_dir("src"));
    }
}

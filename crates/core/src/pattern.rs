//! Pattern Validator (component A) — syntactic and security validation of
//! glob patterns. Performs no I/O; every check here is pure.

use crate::error::{CoreError, PatternRole, Result};

const MAX_PATTERN_LEN: usize = 1000;
const MAX_PATTERN_COUNT: usize = 100;
const MAX_DOUBLE_STAR: usize = 10;

const FORBIDDEN_SUBSTRINGS: &[&str] = &["$(", "`", ";", "&", ">", "<"];

/// Validate a single pattern string, reporting failures tagged with `role`
/// and an optional array index (when validating one element of a list).
pub fn validate_pattern(pattern: &str, role: PatternRole, index: Option<usize>) -> Result<()> {
    if pattern.is_empty() {
        return Err(CoreError::InvalidPatternSyntax {
            pattern: pattern.to_string(),
            reason: "pattern must be a non-empty string".to_string(),
            index,
            role: Some(role),
        });
    }

    if pattern.len() > MAX_PATTERN_LEN {
        return Err(CoreError::InvalidPatternSyntax {
            pattern: pattern.to_string(),
            reason: format!("pattern exceeds {MAX_PATTERN_LEN} characters"),
            index,
            role: Some(role),
        });
    }

    check_security(pattern, role, index)?;
    check_performance(pattern, role, index)?;
    check_syntax(pattern, role, index)?;

    Ok(())
}

/// Validate a pattern array: array-length bound, then each element in order.
pub fn validate_patterns(patterns: &[String], role: PatternRole) -> Result<()> {
    if patterns.len() > MAX_PATTERN_COUNT {
        return Err(CoreError::InvalidPatternSyntax {
            pattern: String::new(),
            reason: format!("pattern array exceeds {MAX_PATTERN_COUNT} entries"),
            index: None,
            role: Some(role),
        });
    }
    for (i, pattern) in patterns.iter().enumerate() {
        validate_pattern(pattern, role, Some(i))?;
    }
    Ok(())
}

fn check_security(pattern: &str, role: PatternRole, index: Option<usize>) -> Result<()> {
    let violation = |rule: &str| CoreError::SecurityViolation {
        pattern: pattern.to_string(),
        rule: rule.to_string(),
    };
    let _ = (role, index); // role/index are carried on InvalidPatternSyntax, not SecurityViolation

    if pattern.contains("../") {
        return Err(violation("path traversal (`../`) is not allowed"));
    }
    if pattern.starts_with('/') {
        return Err(violation("absolute patterns are not allowed"));
    }
    for needle in FORBIDDEN_SUBSTRINGS {
        if pattern.contains(needle) {
            return Err(violation(&format!("forbidden character sequence `{needle}`")));
        }
    }
    if has_unbalanced_pipe(pattern) {
        return Err(violation("`|` must be enclosed in balanced parentheses"));
    }
    Ok(())
}

/// A `|` is only permitted as extglob alternation, i.e. inside balanced
/// parentheses. A `|` encountered at paren depth 0 is rejected.
fn has_unbalanced_pipe(pattern: &str) -> bool {
    let mut depth: i32 = 0;
    for c in pattern.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = (depth - 1).max(0),
            '|' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

fn check_performance(pattern: &str, _role: PatternRole, _index: Option<usize>) -> Result<()> {
    let double_star_count = pattern.matches("**").count();
    if double_star_count > MAX_DOUBLE_STAR {
        return Err(CoreError::Performance {
            patterns: vec![pattern.to_string()],
            metric: format!(
                "pattern contains {double_star_count} occurrences of `**` (max {MAX_DOUBLE_STAR})"
            ),
        });
    }
    Ok(())
}

fn check_syntax(pattern: &str, role: PatternRole, index: Option<usize>) -> Result<()> {
    globset::Glob::new(pattern).map(|_| ()).map_err(|e| CoreError::InvalidPatternSyntax {
        pattern: pattern.to_string(),
        reason: e.to_string(),
        index,
        role: Some(role),
    })
}

/// A pattern with no glob metacharacters, no leading `!`, no trailing `/`,
/// and no `.` is a directory shorthand; this normalizes it to `<pattern>/**`.
/// Idempotent: already-normalized patterns are returned unchanged.
pub fn normalize_include_pattern(pattern: &str) -> String {
    let has_metachar = pattern.chars().any(|c| matches!(c, '*' | '?' | '[' | '{'));
    let is_shorthand = !has_metachar
        && !pattern.starts_with('!')
        && !pattern.ends_with('/')
        && !pattern.contains('.');
    if is_shorthand {
        format!("{pattern}/**")
    } else {
        pattern.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_traversal() {
        let err = validate_pattern("../etc/passwd", PatternRole::Include, None).unwrap_err();
        assert!(matches!(err, CoreError::SecurityViolation { .. }));
    }

    #[test]
    fn rejects_leading_slash() {
        let err = validate_pattern("/etc/**", PatternRole::Include, None).unwrap_err();
        assert!(matches!(err, CoreError::SecurityViolation { .. }));
    }

    #[test]
    fn rejects_unenclosed_pipe() {
        let err = validate_pattern("src/a|b", PatternRole::Include, None).unwrap_err();
        assert!(matches!(err, CoreError::SecurityViolation { .. }));
    }

    #[test]
    fn allows_extglob_alternation() {
        validate_pattern("src/@(a|b).ts", PatternRole::Include, None).unwrap();
    }

    #[test]
    fn rejects_excessive_globstars() {
        let many = "**/".repeat(11);
        let err = validate_pattern(&many, PatternRole::Include, None).unwrap_err();
        assert!(matches!(err, CoreError::Performance { .. }));
    }

    #[test]
    fn rejects_invalid_glob_syntax() {
        let err = validate_pattern("src/[", PatternRole::Include, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPatternSyntax { .. }));
    }

    #[test]
    fn array_length_bound_enforced() {
        let patterns: Vec<String> = (0..101).map(|i| format!("src{i}/**")).collect();
        let err = validate_patterns(&patterns, PatternRole::Include).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPatternSyntax { .. }));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_include_pattern("examples");
        let twice = normalize_include_pattern(&once);
        assert_eq!(once, "examples/**");
        assert_eq!(once, twice);
    }

    #[test]
    fn normalization_skips_patterns_with_metacharacters() {
        assert_eq!(normalize_include_pattern("examples/**"), "examples/**");
        assert_eq!(normalize_include_pattern("*.ts"), "*.ts");
        assert_eq!(normalize_include_pattern("README.md"), "README.md");
    }
}

//! File Discovery (component D) — pattern-driven enumeration of candidate
//! files under a root, with include -> exclude -> ignore composition.

use crate::cache::PatternCache;
use crate::error::{CoreError, PatternConflictKind, PatternRole, Result};
use crate::ignore_engine::{self, is_builtin_prune_dir};
use crate::pattern;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// File extensions this indexer understands.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    NoMatch,
    ExcludesMajority,
    NarrowSelection,
    ComplexPattern,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryWarning {
    pub kind: WarningKind,
    pub pattern: Option<String>,
    pub message: String,
}

/// A non-fatal pattern-conflict observation (§7): `Contradictory` and
/// `Ineffective` are advisory here because the final file count was
/// non-zero — a zero-count conflict is raised as a [`CoreError::PatternConflict`]
/// before these are ever computed.
#[derive(Debug, Clone, Serialize)]
pub struct PatternConflictAdvisory {
    pub kind: PatternConflictKind,
    pub pattern: String,
    pub message: String,
}

struct CandidateCounts {
    candidate: usize,
    after_include: usize,
    after_exclude: usize,
    final_count: usize,
}

/// Walks `root`, pruning the built-in directory set, and returns every file
/// with a supported extension as a root-relative, forward-slash path.
/// Symlinks are not followed; the crate's hidden-file default (matching the
/// walker's built-in dotfile skip) means a dotfile is only ever produced
/// here if a pattern explicitly names it — see DESIGN.md.
fn enumerate_candidates(root: &Path) -> Vec<String> {
    let mut out = Vec::new();
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .follow_links(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(|entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                let name = entry.file_name().to_string_lossy();
                return !is_builtin_prune_dir(name.as_ref());
            }
            true
        })
        .build();

    for entry in walker.flatten() {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !is_supported_extension(ext) {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy().replace('\\', "/");
        out.push(rel);
    }
    out
}

fn normalize_includes(include: &[String]) -> Vec<String> {
    include.iter().map(|p| pattern::normalize_include_pattern(p)).collect()
}

/// Discovers the sorted, deduplicated set of supported files under `root`.
pub fn discover(root: &Path, options: &FilterOptions, cache: &PatternCache) -> Result<Vec<String>> {
    let (files, _counts, _warnings, _advisories) = discover_inner(root, options, cache)?;
    Ok(files)
}

/// Same as [`discover`], additionally returning warnings/suggestions about
/// the supplied patterns (no-match patterns, excludes dominating the
/// include set, very narrow selections, overly complex patterns) and any
/// advisory pattern-conflict observations (`CONTRADICTORY` / `INEFFECTIVE`).
pub fn discover_with_analysis(
    root: &Path,
    options: &FilterOptions,
    cache: &PatternCache,
) -> Result<(Vec<String>, Vec<DiscoveryWarning>, Vec<PatternConflictAdvisory>)> {
    let (files, _counts, warnings, advisories) = discover_inner(root, options, cache)?;
    Ok((files, warnings, advisories))
}

/// Whether `pattern`, compiled alone, matches none of `candidates` —
/// shared by the include- and exclude-side no-match checks.
fn include_pattern_matches_nothing(cache: &PatternCache, pattern: &str, candidates: &[String]) -> bool {
    let normalized = pattern::normalize_include_pattern(pattern);
    let glob = cache.get_glob(&[normalized], &serde_json::json!({}));
    !candidates.iter().any(|p| glob.is_match(p))
}

fn exclude_pattern_matches_nothing(cache: &PatternCache, pattern: &str, files: &[String]) -> bool {
    let matcher = cache.get_ignore(&[pattern.to_string()]);
    !files.iter().any(|p| ignore_engine::matches(&matcher, p, false))
}

fn discover_inner(
    root: &Path,
    options: &FilterOptions,
    cache: &PatternCache,
) -> Result<(Vec<String>, CandidateCounts, Vec<DiscoveryWarning>, Vec<PatternConflictAdvisory>)> {
    pattern::validate_patterns(&options.include, PatternRole::Include)?;
    pattern::validate_patterns(&options.exclude, PatternRole::Exclude)?;

    let candidates = enumerate_candidates(root);
    let candidate_count = candidates.len();

    let normalized_include = normalize_includes(&options.include);

    let after_include: Vec<String> = if normalized_include.is_empty() {
        candidates.clone()
    } else {
        let glob = cache.get_glob(&normalized_include, &serde_json::json!({}));
        candidates.iter().filter(|p| glob.is_match(p)).cloned().collect()
    };
    let after_include_count = after_include.len();

    let user_exclude = cache.get_ignore(&options.exclude);
    let ignore_matcher = ignore_engine::load_ignore(root, cache);

    let kept: BTreeSet<String> = after_include
        .iter()
        .filter(|p| {
            !ignore_engine::matches(&user_exclude, p, false)
                && !ignore_engine::matches(&ignore_matcher, p, false)
        })
        .cloned()
        .collect();
    let after_exclude_count = kept.len();

    let result: Vec<String> = kept.into_iter().collect();
    let final_count = result.len();

    let has_patterns = !options.include.is_empty() || !options.exclude.is_empty();
    if final_count == 0 && candidate_count > 0 && has_patterns {
        return Err(CoreError::PatternConflict {
            kind: PatternConflictKind::AllExcluded,
            include: options.include.clone(),
            exclude: options.exclude.clone(),
            included_count: after_include_count,
            excluded_count: after_include_count.saturating_sub(after_exclude_count),
        });
    }

    let counts = CandidateCounts {
        candidate: candidate_count,
        after_include: after_include_count,
        after_exclude: after_exclude_count,
        final_count,
    };
    let warnings = analyze_warnings(cache, options, &counts, &candidates);
    let advisories =
        analyze_conflict_advisories(cache, options, &normalized_include, &after_include);

    Ok((result, counts, warnings, advisories))
}

/// Advisory-only `CONTRADICTORY` / `INEFFECTIVE` observations (§7). Only
/// reached once the hard `ALL_EXCLUDED` case above has been ruled out, so
/// these never fire for a zero-file result.
fn analyze_conflict_advisories(
    cache: &PatternCache,
    options: &FilterOptions,
    normalized_include: &[String],
    after_include: &[String],
) -> Vec<PatternConflictAdvisory> {
    let mut advisories = Vec::new();

    for (raw, normalized) in options.include.iter().zip(normalized_include.iter()) {
        if options.exclude.iter().any(|ex| ex == normalized) {
            advisories.push(PatternConflictAdvisory {
                kind: PatternConflictKind::Contradictory,
                pattern: raw.clone(),
                message: format!(
                    "include pattern `{raw}` is wholly canceled by an identical exclude pattern"
                ),
            });
        }
    }

    if !after_include.is_empty() {
        for pattern in &options.exclude {
            if exclude_pattern_matches_nothing(cache, pattern, after_include) {
                advisories.push(PatternConflictAdvisory {
                    kind: PatternConflictKind::Ineffective,
                    pattern: pattern.clone(),
                    message: format!(
                        "exclude pattern `{pattern}` removed none of the included files"
                    ),
                });
            }
        }
    }

    advisories
}

fn analyze_warnings(
    cache: &PatternCache,
    options: &FilterOptions,
    counts: &CandidateCounts,
    candidates: &[String],
) -> Vec<DiscoveryWarning> {
    let mut warnings = Vec::new();

    for pattern in options.include.iter().chain(options.exclude.iter()) {
        if pattern.matches("**").count() > 3 {
            warnings.push(DiscoveryWarning {
                kind: WarningKind::ComplexPattern,
                pattern: Some(pattern.clone()),
                message: format!("pattern `{pattern}` uses more than 3 `**` segments"),
            });
        }
    }

    if counts.candidate > 0 {
        for pattern in &options.include {
            if include_pattern_matches_nothing(cache, pattern, candidates) {
                warnings.push(DiscoveryWarning {
                    kind: WarningKind::NoMatch,
                    pattern: Some(pattern.clone()),
                    message: format!("include pattern `{pattern}` matched zero candidate files"),
                });
            }
        }
        for pattern in &options.exclude {
            if exclude_pattern_matches_nothing(cache, pattern, candidates) {
                warnings.push(DiscoveryWarning {
                    kind: WarningKind::NoMatch,
                    pattern: Some(pattern.clone()),
                    message: format!("exclude pattern `{pattern}` matched zero candidate files"),
                });
            }
        }
    }

    if counts.after_include > 0 {
        let excluded = counts.after_include.saturating_sub(counts.after_exclude);
        if excluded * 2 > counts.after_include {
            warnings.push(DiscoveryWarning {
                kind: WarningKind::ExcludesMajority,
                pattern: None,
                message: format!(
                    "exclude patterns removed {excluded} of {} included files (> 50%)",
                    counts.after_include
                ),
            });
        }
    }

    if counts.candidate > 0 && counts.final_count > 0 {
        let ratio = counts.final_count as f64 / counts.candidate as f64;
        if ratio < 0.05 {
            warnings.push(DiscoveryWarning {
                kind: WarningKind::NarrowSelection,
                pattern: None,
                message: format!(
                    "selection kept only {} of {} candidate files (< 5%)",
                    counts.final_count, counts.candidate
                ),
            });
        }
    }

    warnings
}

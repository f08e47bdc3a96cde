//! codetopo CLI — indexes a project and writes a `.codebasemap`.
//!
//! Thin shell over `codetopo-core`: argument parsing, progress rendering,
//! and exit-code mapping live here; everything else is delegated to the
//! core library.

use clap::{Parser, Subcommand};
use codetopo_core::assembler::{process_project, ProgressEvent};
use codetopo_core::config;
use codetopo_core::discovery::FilterOptions;
use codetopo_core::error::CoreError;
use codetopo_core::parser::RegexParser;
use codetopo_core::persist;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Filenames/directories whose presence marks a project root (§6).
const ROOT_MARKERS: &[&str] = &[
    ".codebasemap",
    "PROJECT_INDEX.json",
    "package.json",
    ".git",
    "tsconfig.json",
    "pyproject.toml",
    "Cargo.toml",
    "go.mod",
];

/// codetopo — index a TypeScript/JavaScript project into a compact map.
#[derive(Parser)]
#[command(name = "codetopo", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and write its project index
    Scan {
        /// Project root (default: discovered by walking up from the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Include glob, may be repeated
        #[arg(long = "include")]
        include: Vec<String>,

        /// Exclude glob, may be repeated
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Output path (default: `.codebasemap` under the root)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit per-file evaluation traces
        #[arg(long)]
        verbose: bool,
    },
}

/// Ascends from `start`, stopping at the first ancestor containing any of
/// [`ROOT_MARKERS`]. Falls back to `start` itself if no marker is found.
fn find_project_root(start: &Path) -> PathBuf {
    let mut dir = start;
    loop {
        if ROOT_MARKERS.iter().any(|marker| dir.join(marker).exists()) {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return start.to_path_buf(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "codetopo=debug" } else { "codetopo=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
        )
        .init();
}

fn run_scan(
    root: Option<PathBuf>,
    include: Vec<String>,
    exclude: Vec<String>,
    out: Option<PathBuf>,
    verbose: bool,
) -> Result<(), CoreError> {
    init_tracing(verbose);

    let cwd = std::env::current_dir().map_err(|e| CoreError::Filesystem {
        path: PathBuf::from("."),
        operation: "reading current directory".to_string(),
        source: e,
    })?;
    let root = root.unwrap_or_else(|| find_project_root(&cwd));

    let project_config = config::load_config(&root)?;
    codetopo_core::init_pattern_cache(codetopo_core::cache::PatternCache::new(
        project_config.glob_cache,
        project_config.ignore_cache,
    ));
    let cache = codetopo_core::pattern_cache();

    let options = FilterOptions {
        include: if include.is_empty() { project_config.scan.include } else { include },
        exclude: if exclude.is_empty() { project_config.scan.exclude } else { exclude },
    };

    info!(root = %root.display(), "Discovering files");
    let progress = |event: ProgressEvent| {
        info!(step = event.step, total = event.total_steps, "{}", event.stage);
    };

    let index = process_project(&root, &options, &RegexParser, &cache, Some(&progress))?;

    let out_path = out.unwrap_or_else(|| root.join(persist::DEFAULT_INDEX_FILENAME));
    persist::save_index(&index, &out_path)?;

    info!(
        files = index.metadata.total_files,
        edges = index.edges.len(),
        out = %out_path.display(),
        "Scan complete"
    );
    if verbose {
        for path in &index.nodes {
            tracing::debug!(file = path.as_str(), "indexed");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Scan { root, include, exclude, out, verbose } = cli.command;

    match run_scan(root, include, exclude, out, verbose) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            warn!(error = %err, "scan failed");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_root_marker_in_an_ancestor() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let nested = dir.path().join("src/components");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), dir.path());
    }

    #[test]
    fn falls_back_to_start_dir_when_no_marker_found() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        // No root marker anywhere up to the filesystem root within this
        // throwaway tree, so the walk bottoms out and falls back to `start`.
        assert_eq!(find_project_root(&nested), nested);
    }
}

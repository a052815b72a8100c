//! CLI argument parsing and pipeline orchestration
//!
//! Flags select the git references to compare (a commit always takes
//! precedence over a branch), the output destination, and the cache
//! directory. The pipeline is fetch, compare, write.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use canasta_diff::comparer;
use canasta_diff::fetcher::Fetcher;
use canasta_diff::version;

/// Compare Taqasta's values.yml with Canasta's recommended revisions
#[derive(Parser, Debug)]
#[command(name = "canasta-diff")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Branch of the Taqasta repository to compare
    #[arg(long, value_name = "BRANCH", default_value = "master")]
    taqasta_branch: String,

    /// Branch of the Canasta repository to compare
    #[arg(long, value_name = "BRANCH", default_value = "main")]
    canasta_branch: String,

    /// Specific commit hash of the Taqasta repository (overrides --taqasta-branch)
    #[arg(long, value_name = "COMMIT")]
    taqasta_commit: Option<String>,

    /// Specific commit hash of the Canasta repository (overrides --canasta-branch)
    #[arg(long, value_name = "COMMIT")]
    canasta_commit: Option<String>,

    /// Output file to save the diff (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Directory to cache downloaded YAML files.
    ///
    /// Defaults to the system cache directory (`~/.cache/canasta-diff` on
    /// Linux, `~/Library/Caches/canasta-diff` on macOS).
    #[arg(long, value_name = "DIR", env = "CANASTA_DIFF_CACHE")]
    cache_dir: Option<PathBuf>,
}

/// Where the cache lives when neither `--cache-dir` nor the env var is
/// given: the platform cache directory, or a dotted directory next to the
/// invocation when the platform has none.
fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".canasta-diff-cache"))
        .join("canasta-diff")
}

/// Resolve a git reference, giving precedence to commit over branch.
pub fn resolve_git_reference(
    commit: Option<&str>,
    branch: Option<&str>,
    default_branch: &str,
) -> String {
    commit
        .or(branch)
        .unwrap_or(default_branch)
        .to_string()
}

impl Cli {
    /// Execute the comparison pipeline.
    pub fn execute(self) -> Result<()> {
        let cache_dir = self.cache_dir.unwrap_or_else(default_cache_root);
        let fetcher = Fetcher::new(cache_dir)?;

        let taqasta_ref = resolve_git_reference(
            self.taqasta_commit.as_deref(),
            Some(&self.taqasta_branch),
            "master",
        );
        let canasta_ref = resolve_git_reference(
            self.canasta_commit.as_deref(),
            Some(&self.canasta_branch),
            "main",
        );

        let taqasta = fetcher.fetch_taqasta_values(&taqasta_ref)?;
        let canasta = fetcher.fetch_canasta_revisions(&canasta_ref, Some(&taqasta))?;

        let mw_version = version::detect_mediawiki_version(&taqasta);
        let report = comparer::compare(
            &taqasta,
            &canasta,
            &taqasta_ref,
            &canasta_ref,
            Some(&mw_version),
        );

        match self.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent).with_context(|| {
                            format!("write to output file {}", path.display())
                        })?;
                    }
                }
                fs::write(&path, &report)
                    .with_context(|| format!("write to output file {}", path.display()))?;
                println!("Diff saved to {}", path.display());
            }
            None => println!("{report}"),
        }

        Ok(())
    }
}

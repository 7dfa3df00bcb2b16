//! Command-line interface
//!
//! Every action input is accepted as a flag or through the `INPUT_*`
//! environment variable GitHub Actions sets for it.

pub mod context;
pub mod run;
pub mod style;

use anstream::eprintln;
use clap::{Args, Parser};
use combine_prs::config::RawInputs;
use std::path::PathBuf;
use style::Stylize;

/// Combine many similar pull requests into a single integration PR
#[derive(Debug, Parser)]
#[command(name = "combine-prs", version, about, long_about = None)]
pub struct Cli {
    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Token used for API calls (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// REST API base URL, for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// TOML file with input defaults; flags and environment override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Select candidates and print the plan without creating branches or PRs
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Action inputs
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Combine PRs whose head branch starts with this prefix
    #[arg(long, env = "INPUT_BRANCH_PREFIX")]
    pub branch_prefix: Option<String>,

    /// Combine PRs whose head branch matches this pattern (overrides --branch-prefix)
    #[arg(long, env = "INPUT_BRANCH_REGEX")]
    pub branch_regex: Option<String>,

    /// Only combine PRs whose CI rollup is successful (default: true)
    #[arg(long, env = "INPUT_CI_REQUIRED")]
    pub ci_required: Option<bool>,

    /// Only combine PRs that are approved or need no review (default: false)
    #[arg(long, env = "INPUT_REVIEW_REQUIRED")]
    pub review_required: Option<bool>,

    /// Only combine PRs carrying this label
    #[arg(long, env = "INPUT_SELECT_LABEL")]
    pub select_label: Option<String>,

    /// Never combine PRs carrying this label
    #[arg(long, env = "INPUT_IGNORE_LABEL")]
    pub ignore_label: Option<String>,

    /// Comma-separated labels to add to the combined PR
    #[arg(long, env = "INPUT_LABELS")]
    pub labels: Option<String>,

    /// Name of the integration branch
    #[arg(long, env = "INPUT_COMBINE_BRANCH_NAME")]
    pub combine_branch_name: Option<String>,

    /// Title of the combined PR
    #[arg(long, env = "INPUT_PR_TITLE")]
    pub pr_title: Option<String>,

    /// Header of the combined PR body
    #[arg(long, env = "INPUT_PR_BODY_HEADER")]
    pub pr_body_header: Option<String>,

    /// Minimum number of matching PRs needed to open a combined PR
    #[arg(long, env = "INPUT_MIN_COMBINE_NUMBER")]
    pub min_combine_number: Option<u32>,
}

impl From<InputArgs> for RawInputs {
    fn from(args: InputArgs) -> Self {
        Self {
            branch_prefix: args.branch_prefix,
            branch_regex: args.branch_regex,
            ci_required: args.ci_required,
            review_required: args.review_required,
            select_label: args.select_label,
            ignore_label: args.ignore_label,
            labels: args.labels,
            combine_branch_name: args.combine_branch_name,
            pr_title: args.pr_title,
            pr_body_header: args.pr_body_header,
            min_combine_number: args.min_combine_number,
        }
    }
}

/// Whether we are running inside a GitHub Actions job
pub fn in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Report a fatal message to the user
///
/// Inside Actions an `::error::` workflow command is emitted as well so the
/// failure shows up as a job annotation.
pub fn report_error(message: &str) {
    if in_github_actions() {
        println!("::error::{}", message.replace('\n', "%0A"));
    }
    eprintln!("{} {message}", "error:".error());
}

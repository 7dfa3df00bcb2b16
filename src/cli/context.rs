//! Shared command context
//!
//! Resolves repository, token, and host from flags and the Actions
//! environment, and builds the platform service.

use anyhow::{Context, Result, anyhow};
use combine_prs::platform::{GitHubService, PlatformService};
use combine_prs::types::PlatformConfig;
use std::path::PathBuf;

/// Context for a command that talks to the host
///
/// Built only after the run configuration has been validated, so invalid
/// inputs never trigger network calls.
pub struct CommandContext {
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// File to append action outputs to, if running under Actions
    pub output_path: Option<PathBuf>,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// The token comes from `--token`/`INPUT_GITHUB_TOKEN`, then `GITHUB_TOKEN`.
    pub fn new(repo: Option<&str>, token: Option<&str>, api_url: Option<&str>) -> Result<Self> {
        let slug = repo
            .filter(|r| !r.is_empty())
            .ok_or_else(|| anyhow!("no repository given; pass --repo owner/name or set GITHUB_REPOSITORY"))?;
        let platform_config = PlatformConfig::parse(slug)
            .ok_or_else(|| anyhow!("invalid repository {slug:?}; expected owner/name"))?;

        let token = token
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
            .ok_or_else(|| anyhow!("no GitHub token; pass --token or set GITHUB_TOKEN"))?;

        let platform = GitHubService::new(&token, platform_config, api_url)
            .context("failed to create GitHub client")?;

        Ok(Self {
            platform: Box::new(platform),
            output_path: output_path(),
        })
    }
}

/// Path named by `GITHUB_OUTPUT`, if set
pub fn output_path() -> Option<PathBuf> {
    std::env::var_os("GITHUB_OUTPUT")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

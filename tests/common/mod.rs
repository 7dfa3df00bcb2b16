//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::*;

use combine_prs::config::{CombineConfig, RawInputs};
use combine_prs::types::{PlatformConfig, PullRequestCandidate};

/// Platform config for the mock repository
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
    }
}

/// Build an open PR targeting `main`
pub fn make_pr(number: u64, head: &str, labels: &[&str]) -> PullRequestCandidate {
    PullRequestCandidate {
        number,
        title: format!("Update dependency {number}"),
        head_ref: head.to_string(),
        base_ref: "main".to_string(),
        base_sha: "base_sha_main".to_string(),
        labels: labels.iter().map(ToString::to_string).collect(),
    }
}

/// Inputs with `branch_prefix = "dependabot"` and everything else default
pub fn dependabot_inputs() -> RawInputs {
    RawInputs {
        branch_prefix: Some("dependabot".to_string()),
        ..RawInputs::default()
    }
}

/// Validated config from inputs
pub fn config_from(inputs: RawInputs) -> CombineConfig {
    CombineConfig::from_inputs(inputs).expect("valid test config")
}

//! Run configuration
//!
//! Inputs arrive from three places: a TOML file, CLI flags, and the
//! `INPUT_*` environment variables GitHub Actions sets for each action input.
//! They are collected into [`RawInputs`], layered, and validated exactly once
//! into an immutable [`CombineConfig`] before any network call is made.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default name of the integration branch
pub const DEFAULT_COMBINE_BRANCH_NAME: &str = "combined-prs-branch";

/// Default title of the combined PR
pub const DEFAULT_PR_TITLE: &str = "Combined PRs";

/// Default header placed at the top of the combined PR body
pub const DEFAULT_PR_BODY_HEADER: &str = "# Combined PRs ➡️📦⬅️";

/// Default minimum number of accepted candidates needed to open a combined PR
pub const DEFAULT_MIN_COMBINE_NUMBER: u32 = 2;

/// Message when no branch matching mode is configured
pub const MISSING_BRANCH_MATCHER: &str = "Must specify either branch_prefix or branch_regex";

/// Message when select and ignore labels collide
pub const CONFLICTING_LABELS: &str = "ignore_label and select_label cannot have the same value";

/// Unvalidated inputs, every field optional
///
/// Empty strings are treated the same as absent values, since Actions passes
/// unset inputs as empty strings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RawInputs {
    /// Head branch prefix to match
    pub branch_prefix: Option<String>,
    /// Head branch pattern to match; takes precedence over the prefix
    pub branch_regex: Option<String>,
    /// Require a successful CI rollup
    pub ci_required: Option<bool>,
    /// Require an approved (or not required) review decision
    pub review_required: Option<bool>,
    /// Only PRs carrying this label are combined
    pub select_label: Option<String>,
    /// PRs carrying this label are never combined
    pub ignore_label: Option<String>,
    /// Comma-separated labels to add to the combined PR
    pub labels: Option<String>,
    /// Integration branch name
    pub combine_branch_name: Option<String>,
    /// Combined PR title
    pub pr_title: Option<String>,
    /// Combined PR body header
    pub pr_body_header: Option<String>,
    /// Minimum number of accepted candidates
    pub min_combine_number: Option<u32>,
}

impl RawInputs {
    /// Layer `overrides` on top of `self`; any value set in `overrides` wins.
    #[must_use]
    pub fn overlay(self, overrides: Self) -> Self {
        Self {
            branch_prefix: overrides.branch_prefix.or(self.branch_prefix),
            branch_regex: overrides.branch_regex.or(self.branch_regex),
            ci_required: overrides.ci_required.or(self.ci_required),
            review_required: overrides.review_required.or(self.review_required),
            select_label: overrides.select_label.or(self.select_label),
            ignore_label: overrides.ignore_label.or(self.ignore_label),
            labels: overrides.labels.or(self.labels),
            combine_branch_name: overrides.combine_branch_name.or(self.combine_branch_name),
            pr_title: overrides.pr_title.or(self.pr_title),
            pr_body_header: overrides.pr_body_header.or(self.pr_body_header),
            min_combine_number: overrides.min_combine_number.or(self.min_combine_number),
        }
    }
}

/// Load inputs from a TOML file.
pub fn load_config_file(path: &Path) -> Result<RawInputs> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::ConfigFile(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::ConfigFile(format!("failed to parse {}: {e}", path.display())))
}

/// How head branch names are matched
///
/// Exactly one mode is active per run.
#[derive(Debug, Clone)]
pub enum BranchMatcher {
    /// Head branch must start with this prefix
    Prefix(String),
    /// Head branch must match this pattern (unanchored)
    Regex(Regex),
}

impl BranchMatcher {
    /// Whether `branch` is eligible under this matcher
    pub fn matches(&self, branch: &str) -> bool {
        match self {
            Self::Prefix(prefix) => branch.starts_with(prefix.as_str()),
            Self::Regex(re) => re.is_match(branch),
        }
    }

    /// Human-readable name of the active mode, for logs
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Prefix(_) => "prefix",
            Self::Regex(_) => "regex",
        }
    }
}

/// Eligibility rules applied to each open PR
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    /// Branch name matching mode
    pub branch_matcher: BranchMatcher,
    /// Require a successful CI rollup
    pub ci_required: bool,
    /// Require an approved (or not required) review decision
    pub review_required: bool,
    /// Only PRs carrying this label are combined
    pub select_label: Option<String>,
    /// PRs carrying this label are never combined
    pub ignore_label: Option<String>,
    /// Minimum number of accepted candidates (at least 1)
    pub min_combine_number: usize,
}

impl SelectionCriteria {
    /// Whether a status query is needed per candidate
    pub const fn needs_status(&self) -> bool {
        self.ci_required || self.review_required
    }
}

/// Validated, immutable configuration for one run
#[derive(Debug, Clone)]
pub struct CombineConfig {
    /// Eligibility rules
    pub criteria: SelectionCriteria,
    /// Integration branch name
    pub combine_branch_name: String,
    /// Combined PR title
    pub pr_title: String,
    /// Combined PR body header
    pub pr_body_header: String,
    /// Labels added to the combined PR after it is published
    pub labels: Vec<String>,
}

impl CombineConfig {
    /// Validate raw inputs and apply defaults.
    pub fn from_inputs(inputs: RawInputs) -> Result<Self> {
        let branch_prefix = non_empty(inputs.branch_prefix);
        let branch_regex = non_empty(inputs.branch_regex);

        let branch_matcher = match (branch_regex, branch_prefix) {
            (Some(pattern), _) => BranchMatcher::Regex(Regex::new(&pattern)?),
            (None, Some(prefix)) => BranchMatcher::Prefix(prefix),
            (None, None) => return Err(Error::Config(MISSING_BRANCH_MATCHER.to_string())),
        };

        let select_label = non_empty(inputs.select_label);
        let ignore_label = non_empty(inputs.ignore_label);
        if let (Some(select), Some(ignore)) = (&select_label, &ignore_label)
            && select == ignore
        {
            return Err(Error::Config(CONFLICTING_LABELS.to_string()));
        }

        let min_combine_number = inputs
            .min_combine_number
            .unwrap_or(DEFAULT_MIN_COMBINE_NUMBER);
        if min_combine_number == 0 {
            return Err(Error::Config(
                "min_combine_number must be at least 1".to_string(),
            ));
        }

        let combine_branch_name = non_empty(inputs.combine_branch_name)
            .unwrap_or_else(|| DEFAULT_COMBINE_BRANCH_NAME.to_string());

        Ok(Self {
            criteria: SelectionCriteria {
                branch_matcher,
                ci_required: inputs.ci_required.unwrap_or(true),
                review_required: inputs.review_required.unwrap_or(false),
                select_label,
                ignore_label,
                min_combine_number: min_combine_number as usize,
            },
            combine_branch_name,
            pr_title: non_empty(inputs.pr_title).unwrap_or_else(|| DEFAULT_PR_TITLE.to_string()),
            pr_body_header: non_empty(inputs.pr_body_header)
                .unwrap_or_else(|| DEFAULT_PR_BODY_HEADER.to_string()),
            labels: inputs.labels.as_deref().map(parse_labels).unwrap_or_default(),
        })
    }
}

/// Split a comma-separated label list, dropping blanks
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

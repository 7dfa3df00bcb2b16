//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use combine_prs::error::{Error, Result};
use combine_prs::platform::PlatformService;
use combine_prs::types::{
    CiState, CombinedPullRequest, PlatformConfig, PrState, PullRequestCandidate, ReviewDecision,
    StatusOutcome,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBranchCall {
    pub name: String,
    pub from_sha: String,
}

/// Call record for `merge_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub base: String,
    pub head: String,
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `update_pr_body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBodyCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelsCall {
    pub pr_number: u64,
    pub labels: Vec<String>,
}

/// A PR held by the mock host
#[derive(Debug, Clone)]
pub struct StoredPr {
    pub pr: CombinedPullRequest,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// Stateful mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall.
///
/// Features:
/// - Branches and combined PRs persist across runs on the same mock, so
///   re-runs hit the "already exists" paths like a real host
/// - Call tracking for verification
/// - Configurable status per PR and merge failures per head branch
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    open_prs: Mutex<Vec<PullRequestCandidate>>,
    status_responses: Mutex<HashMap<u64, StatusOutcome>>,
    branches: Mutex<HashSet<String>>,
    merge_failures: Mutex<HashSet<String>>,
    prs: Mutex<Vec<StoredPr>>,
    find_pr_override: Mutex<Option<CombinedPullRequest>>,
    // Call tracking
    status_calls: Mutex<Vec<u64>>,
    create_branch_calls: Mutex<Vec<CreateBranchCall>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    find_pr_calls: Mutex<Vec<(String, String)>>,
    update_body_calls: Mutex<Vec<UpdateBodyCall>>,
    reopen_calls: Mutex<Vec<u64>>,
    add_labels_calls: Mutex<Vec<AddLabelsCall>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    error_on_status: Mutex<Option<String>>,
    error_on_create_branch: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    deny_create_pr: Mutex<Option<String>>,
    report_pr_exists: Mutex<bool>,
    error_on_reopen: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    ///
    /// Combined PRs are numbered from 100 to keep them apart from candidates.
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(100),
            open_prs: Mutex::new(Vec::new()),
            status_responses: Mutex::new(HashMap::new()),
            branches: Mutex::new(HashSet::new()),
            merge_failures: Mutex::new(HashSet::new()),
            prs: Mutex::new(Vec::new()),
            find_pr_override: Mutex::new(None),
            status_calls: Mutex::new(Vec::new()),
            create_branch_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            find_pr_calls: Mutex::new(Vec::new()),
            update_body_calls: Mutex::new(Vec::new()),
            reopen_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            error_on_status: Mutex::new(None),
            error_on_create_branch: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            deny_create_pr: Mutex::new(None),
            report_pr_exists: Mutex::new(false),
            error_on_reopen: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
        }
    }

    // === Setup methods ===

    /// Set the PRs returned by `list_open_prs`
    pub fn set_open_prs(&self, prs: Vec<PullRequestCandidate>) {
        *self.open_prs.lock().unwrap() = prs;
    }

    /// Set the status returned for a specific PR
    pub fn set_status(&self, pr_number: u64, ci_state: CiState, review_decision: ReviewDecision) {
        self.status_responses.lock().unwrap().insert(
            pr_number,
            StatusOutcome {
                ci_state,
                review_decision,
            },
        );
    }

    /// Pretend a branch already exists on the host
    pub fn add_branch(&self, name: &str) {
        self.branches.lock().unwrap().insert(name.to_string());
    }

    /// Make merges of this head branch fail
    pub fn fail_merge_of(&self, head: &str) {
        self.merge_failures.lock().unwrap().insert(head.to_string());
    }

    /// Seed an existing PR on the host; returns its number
    pub fn add_existing_pr(&self, head: &str, base: &str, state: PrState) -> u64 {
        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        self.prs.lock().unwrap().push(StoredPr {
            pr: make_combined_pr(number, state),
            head: head.to_string(),
            base: base.to_string(),
            body: "old body".to_string(),
        });
        number
    }

    /// Make `find_open_pr` return exactly this PR
    pub fn set_find_pr_override(&self, pr: Option<CombinedPullRequest>) {
        *self.find_pr_override.lock().unwrap() = pr;
    }

    // === Error injection methods ===

    /// Make `list_open_prs` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `query_status` return an error
    pub fn fail_status(&self, msg: &str) {
        *self.error_on_status.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_branch` return a non-"exists" error
    pub fn fail_create_branch(&self, msg: &str) {
        *self.error_on_create_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` return a generic error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` return a permission error
    pub fn deny_create_pr(&self, msg: &str) {
        *self.deny_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` report an existing PR even when none is stored
    pub fn report_pr_exists(&self) {
        *self.report_pr_exists.lock().unwrap() = true;
    }

    /// Make `reopen_pr` return an error
    pub fn fail_reopen(&self, msg: &str) {
        *self.error_on_reopen.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_labels` return an error
    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// PR numbers `query_status` was called with
    pub fn get_status_calls(&self) -> Vec<u64> {
        self.status_calls.lock().unwrap().clone()
    }

    /// All `create_branch` calls
    pub fn get_create_branch_calls(&self) -> Vec<CreateBranchCall> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    /// All `merge_branch` calls
    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Head branches merged, in call order
    pub fn merged_heads(&self) -> Vec<String> {
        self.get_merge_calls().into_iter().map(|c| c.head).collect()
    }

    /// All `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// All `find_open_pr` calls as (head, base)
    pub fn get_find_pr_calls(&self) -> Vec<(String, String)> {
        self.find_pr_calls.lock().unwrap().clone()
    }

    /// All `update_pr_body` calls
    pub fn get_update_body_calls(&self) -> Vec<UpdateBodyCall> {
        self.update_body_calls.lock().unwrap().clone()
    }

    /// All `reopen_pr` calls
    pub fn get_reopen_calls(&self) -> Vec<u64> {
        self.reopen_calls.lock().unwrap().clone()
    }

    /// All `add_labels` calls
    pub fn get_add_labels_calls(&self) -> Vec<AddLabelsCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    /// PRs currently held by the mock host
    pub fn stored_prs(&self) -> Vec<StoredPr> {
        self.prs.lock().unwrap().clone()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that no write call reached the host
    pub fn assert_no_writes(&self) {
        assert!(self.get_create_branch_calls().is_empty());
        assert!(self.get_merge_calls().is_empty());
        assert!(self.get_create_pr_calls().is_empty());
        assert!(self.get_update_body_calls().is_empty());
    }
}

/// Build a `CombinedPullRequest` with a predictable URL
pub fn make_combined_pr(number: u64, state: PrState) -> CombinedPullRequest {
    CombinedPullRequest {
        number,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        state,
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequestCandidate>> {
        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self.open_prs.lock().unwrap().clone())
    }

    async fn query_status(&self, pr_number: u64) -> Result<StatusOutcome> {
        self.status_calls.lock().unwrap().push(pr_number);

        if let Some(msg) = self.error_on_status.lock().unwrap().as_ref() {
            return Err(Error::StatusQuery {
                pr_number,
                message: msg.clone(),
            });
        }

        let responses = self.status_responses.lock().unwrap();
        responses.get(&pr_number).cloned().ok_or_else(|| Error::StatusQuery {
            pr_number,
            message: "query_status: no response configured".to_string(),
        })
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()> {
        self.create_branch_calls
            .lock()
            .unwrap()
            .push(CreateBranchCall {
                name: name.to_string(),
                from_sha: from_sha.to_string(),
            });

        if let Some(msg) = self.error_on_create_branch.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        if !self.branches.lock().unwrap().insert(name.to_string()) {
            return Err(Error::BranchExists(name.to_string()));
        }
        Ok(())
    }

    async fn merge_branch(&self, base: &str, head: &str) -> Result<()> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            base: base.to_string(),
            head: head.to_string(),
        });

        if self.merge_failures.lock().unwrap().contains(head) {
            return Err(Error::MergeFailed {
                base: base.to_string(),
                head: head.to_string(),
                message: "merge conflict".to_string(),
            });
        }
        Ok(())
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<CombinedPullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some(msg) = self.deny_create_pr.lock().unwrap().as_ref() {
            return Err(Error::PrCreateNotPermitted(msg.clone()));
        }
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let mut prs = self.prs.lock().unwrap();
        if *self.report_pr_exists.lock().unwrap()
            || prs
                .iter()
                .any(|p| p.head == head && p.base == base && p.pr.state == PrState::Open)
        {
            return Err(Error::PullRequestExists {
                head: head.to_string(),
                base: base.to_string(),
            });
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = make_combined_pr(number, PrState::Open);
        prs.push(StoredPr {
            pr: pr.clone(),
            head: head.to_string(),
            base: base.to_string(),
            body: body.to_string(),
        });
        Ok(pr)
    }

    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<CombinedPullRequest>> {
        self.find_pr_calls
            .lock()
            .unwrap()
            .push((head.to_string(), base.to_string()));

        if let Some(pr) = self.find_pr_override.lock().unwrap().clone() {
            return Ok(Some(pr));
        }

        let prs = self.prs.lock().unwrap();
        Ok(prs
            .iter()
            .find(|p| p.head == head && p.base == base && p.pr.state == PrState::Open)
            .map(|p| p.pr.clone()))
    }

    async fn update_pr_body(&self, pr_number: u64, body: &str) -> Result<()> {
        self.update_body_calls.lock().unwrap().push(UpdateBodyCall {
            pr_number,
            body: body.to_string(),
        });

        let mut prs = self.prs.lock().unwrap();
        if let Some(stored) = prs.iter_mut().find(|p| p.pr.number == pr_number) {
            stored.body = body.to_string();
        }
        Ok(())
    }

    async fn reopen_pr(&self, pr_number: u64) -> Result<()> {
        self.reopen_calls.lock().unwrap().push(pr_number);

        if let Some(msg) = self.error_on_reopen.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let mut prs = self.prs.lock().unwrap();
        if let Some(stored) = prs.iter_mut().find(|p| p.pr.number == pr_number) {
            stored.pr.state = PrState::Open;
        }
        Ok(())
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.add_labels_calls.lock().unwrap().push(AddLabelsCall {
            pr_number,
            labels: labels.to_vec(),
        });

        if let Some(msg) = self.error_on_add_labels.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

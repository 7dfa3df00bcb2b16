//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CiState, CombinedPullRequest, PlatformConfig, PrState, PullRequestCandidate, ReviewDecision,
    StatusOutcome,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// Text GitHub returns when the Actions token may not open pull requests
const ACTIONS_PR_POLICY_MESSAGE: &str = "not permitted to create or approve pull requests";

const STATUS_QUERY: &str = r"
    query($owner: String!, $repo: String!, $pull_number: Int!) {
        repository(owner: $owner, name: $repo) {
            pullRequest(number: $pull_number) {
                reviewDecision
                commits(last: 1) {
                    nodes {
                        commit {
                            statusCheckRollup {
                                state
                            }
                        }
                    }
                }
            }
        }
    }
";

// GraphQL response types for the status query

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct StatusData {
    repository: Option<StatusRepository>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusRepository {
    pull_request: Option<StatusPullRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusPullRequest {
    review_decision: Option<String>,
    commits: CommitConnection,
}

#[derive(Deserialize)]
struct CommitConnection {
    nodes: Vec<CommitNode>,
}

#[derive(Deserialize)]
struct CommitNode {
    commit: Commit,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Commit {
    status_check_rollup: Option<StatusCheckRollup>,
}

#[derive(Deserialize)]
struct StatusCheckRollup {
    state: String,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: Option<String>,
}

/// Derive the GraphQL endpoint from a REST API base URL
///
/// GitHub Enterprise serves REST under `/api/v3` and GraphQL under
/// `/api/graphql`; github.com serves GraphQL at `/graphql`.
pub fn graphql_url_for(api_url: &str) -> String {
    let base = api_url.trim_end_matches('/');
    base.strip_suffix("/api/v3").map_or_else(
        || format!("{base}/graphql"),
        |root| format!("{root}/api/graphql"),
    )
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests (status query, branch merges)
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// REST API base URL, without trailing slash
    api_url: String,
    /// GraphQL endpoint
    graphql_url: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` defaults to `https://api.github.com`; pass the value of
    /// `GITHUB_API_URL` for GitHub Enterprise.
    pub fn new(token: &str, config: PlatformConfig, api_url: Option<&str>) -> Result<Self> {
        let api_url = api_url
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        Url::parse(&api_url)
            .map_err(|e| Error::Config(format!("invalid GitHub API URL {api_url}: {e}")))?;

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("combine-prs")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            graphql_url: graphql_url_for(&api_url),
            api_url,
        })
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

/// HTTP status of an octocrab error, when GitHub answered at all
fn status_code(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

fn github_message(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => source.message.clone(),
        other => other.to_string(),
    }
}

/// Whether GitHub refused because Actions may not open pull requests
///
/// The text shows up in `message` or in one of the `errors` entries
/// depending on the endpoint version.
fn is_actions_pr_policy(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            source.message.contains(ACTIONS_PR_POLICY_MESSAGE)
                || source
                    .errors
                    .iter()
                    .flatten()
                    .any(|e| e.to_string().contains(ACTIONS_PR_POLICY_MESSAGE))
        }
        _ => false,
    }
}

/// Helper to convert octocrab PR to a candidate
fn candidate_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequestCandidate {
    PullRequestCandidate {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
        base_sha: pr.base.sha.clone(),
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
    }
}

fn combined_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> CombinedPullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => PrState::Merged,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    CombinedPullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        state,
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequestCandidate>> {
        debug!(repo = %self.config, "listing open PRs");
        let first_page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;

        let prs = self.client.all_pages(first_page).await?;
        let result: Vec<_> = prs.iter().map(candidate_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn query_status(&self, pr_number: u64) -> Result<StatusOutcome> {
        debug!(pr_number, "querying status");
        let status_err = |message: String| Error::StatusQuery { pr_number, message };

        let response = self
            .post(&self.graphql_url)
            .json(&serde_json::json!({
                "query": STATUS_QUERY,
                "variables": {
                    "owner": self.config.owner,
                    "repo": self.config.repo,
                    "pull_number": pr_number,
                }
            }))
            .send()
            .await
            .map_err(|e| status_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_err(format!("HTTP {}", response.status())));
        }

        let body: GraphQlResponse<StatusData> = response
            .json()
            .await
            .map_err(|e| status_err(format!("failed to parse response: {e}")))?;

        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(status_err(messages.join(", ")));
        }

        let pull = body
            .data
            .and_then(|d| d.repository)
            .and_then(|r| r.pull_request)
            .ok_or_else(|| status_err("pull request not found".to_string()))?;

        let rollup = pull
            .commits
            .nodes
            .last()
            .and_then(|n| n.commit.status_check_rollup.as_ref())
            .map(|r| r.state.as_str());

        let outcome = StatusOutcome {
            ci_state: CiState::from_rollup(rollup),
            review_decision: ReviewDecision::from_graphql(pull.review_decision.as_deref()),
        };
        debug!(
            pr_number,
            ci_state = %outcome.ci_state,
            review_decision = %outcome.review_decision,
            "queried status"
        );
        Ok(outcome)
    }

    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()> {
        debug!(name, from_sha, "creating branch");
        let reference = octocrab::params::repos::Reference::Branch(name.to_string());
        match self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .create_ref(&reference, from_sha)
            .await
        {
            Ok(_) => {
                debug!(name, "created branch");
                Ok(())
            }
            Err(e) if status_code(&e) == Some(422) => Err(Error::BranchExists(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn merge_branch(&self, base: &str, head: &str) -> Result<()> {
        debug!(base, head, "merging branch");
        let url = format!(
            "{}/repos/{}/{}/merges",
            self.api_url, self.config.owner, self.config.repo
        );

        let response = self
            .post(&url)
            .json(&serde_json::json!({ "base": base, "head": head }))
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                debug!(base, head, "merged branch");
                Ok(())
            }
            StatusCode::NO_CONTENT => {
                debug!(base, head, "nothing to merge, base already contains head");
                Ok(())
            }
            status => {
                let message = if status == StatusCode::CONFLICT {
                    "merge conflict".to_string()
                } else {
                    let detail = response
                        .json::<ApiMessage>()
                        .await
                        .ok()
                        .and_then(|m| m.message)
                        .unwrap_or_default();
                    format!("HTTP {status} {detail}").trim_end().to_string()
                };
                Err(Error::MergeFailed {
                    base: base.to_string(),
                    head: head.to_string(),
                    message,
                })
            }
        }
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<CombinedPullRequest> {
        debug!(head, base, "creating PR");
        let pulls = self.client.pulls(&self.config.owner, &self.config.repo);

        match pulls.create(title, head, base).body(body).send().await {
            Ok(pr) => {
                let result = combined_from_octocrab(&pr);
                debug!(pr_number = result.number, "created PR");
                Ok(result)
            }
            Err(e) if is_actions_pr_policy(&e) => {
                Err(Error::PrCreateNotPermitted(github_message(&e)))
            }
            Err(e) if status_code(&e) == Some(422) => Err(Error::PullRequestExists {
                head: head.to_string(),
                base: base.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<CombinedPullRequest>> {
        debug!(head, base, "finding existing PR");
        let qualified_head = format!("{}:{}", self.config.owner, head);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(qualified_head)
            .base(base)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        let result = prs.items.first().map(combined_from_octocrab);
        if let Some(ref pr) = result {
            debug!(pr_number = pr.number, "found existing PR");
        } else {
            debug!("no existing PR found");
        }
        Ok(result)
    }

    async fn update_pr_body(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "updating PR body");
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .body(body)
            .send()
            .await?;
        debug!(pr_number, "updated PR body");
        Ok(())
    }

    async fn reopen_pr(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "reopening PR");
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .state(octocrab::params::pulls::State::Open)
            .send()
            .await?;
        debug!(pr_number, "reopened PR");
        Ok(())
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "adding labels");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, labels)
            .await?;
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

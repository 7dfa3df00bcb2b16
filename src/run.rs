//! One complete combine run
//!
//! Three-phase pattern:
//! 1. Gather - list open PRs (effectful)
//! 2. Select - filter into a `CombinationPlan` (status queries as needed)
//! 3. Execute - merge branches and publish the combined PR (effectful)

use crate::combine::execute_combination;
use crate::config::CombineConfig;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::report::RunOutcome;
use crate::select::{SelectionOutcome, select_candidates};
use tracing::info;

/// Gather and select without writing anything to the host
///
/// Used by dry runs; `run` builds on it.
pub async fn plan_run(
    config: &CombineConfig,
    platform: &dyn PlatformService,
) -> Result<SelectionOutcome> {
    // Gather
    let pulls = platform.list_open_prs().await?;
    info!(count = pulls.len(), repo = %platform.config(), "Fetched open pull requests");

    // Select
    select_candidates(&pulls, &config.criteria, platform).await
}

/// Run selection and combination against a host
///
/// Returns `Err` only for failures that abort the run without a classified
/// outcome (listing or status queries).
pub async fn run(config: &CombineConfig, platform: &dyn PlatformService) -> Result<RunOutcome> {
    let plan = match plan_run(config, platform).await? {
        SelectionOutcome::Plan(plan) => plan,
        SelectionOutcome::NoCandidates => return Ok(RunOutcome::NoCandidates),
        SelectionOutcome::InsufficientCandidates { found, required } => {
            return Ok(RunOutcome::InsufficientCandidates { found, required });
        }
    };

    // Execute
    Ok(execute_combination(&plan, config, platform).await.into())
}

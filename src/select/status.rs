//! Status policy - CI rollup and review decision

use super::{Eligibility, Rejection};
use crate::config::SelectionCriteria;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{CiState, PullRequestCandidate, ReviewDecision, StatusOutcome};
use tracing::{debug, info};

/// Evaluate a status outcome against the required checks (PURE)
///
/// A missing CI rollup passes: repositories without required checks report
/// no rollup at all. A null review decision passes for the same reason.
pub fn evaluate_status(
    outcome: &StatusOutcome,
    ci_required: bool,
    review_required: bool,
) -> Eligibility {
    if ci_required {
        match &outcome.ci_state {
            CiState::Success => {}
            CiState::Undefined => debug!("no status checks configured, treating as success"),
            other => return Eligibility::Rejected(Rejection::CiNotPassing(other.clone())),
        }
    }

    if review_required {
        match &outcome.review_decision {
            ReviewDecision::Approved | ReviewDecision::NotRequired => {}
            other => return Eligibility::Rejected(Rejection::NotApproved(other.clone())),
        }
    }

    Eligibility::Accepted
}

/// Query and evaluate a candidate's status (EFFECTFUL)
///
/// No query is made unless CI or review is required. Query failures are
/// returned as errors rather than rejecting the candidate.
pub async fn check_status(
    candidate: &PullRequestCandidate,
    criteria: &SelectionCriteria,
    platform: &dyn PlatformService,
) -> Result<Eligibility> {
    if !criteria.needs_status() {
        return Ok(Eligibility::Accepted);
    }

    info!(branch = %candidate.head_ref, "Checking green status");
    let outcome = platform.query_status(candidate.number).await?;
    info!(
        branch = %candidate.head_ref,
        ci_state = %outcome.ci_state,
        review_decision = %outcome.review_decision,
        "Validating status"
    );

    Ok(evaluate_status(
        &outcome,
        criteria.ci_required,
        criteria.review_required,
    ))
}

//! Label policy - pure

use super::{Eligibility, Rejection};

/// Decide eligibility from a PR's labels
///
/// `select_label` is checked first: when set, at least one label must equal it
/// exactly. `ignore_label` is checked second and always wins, even when the
/// select label matched. An empty label set never satisfies a select label.
pub fn check_labels(
    labels: &[String],
    select_label: Option<&str>,
    ignore_label: Option<&str>,
) -> Eligibility {
    if let Some(select) = select_label
        && !labels.iter().any(|l| l == select)
    {
        return Eligibility::Rejected(Rejection::MissingSelectLabel);
    }

    if let Some(ignore) = ignore_label
        && let Some(found) = labels.iter().find(|l| *l == ignore)
    {
        return Eligibility::Rejected(Rejection::IgnoredLabel(found.clone()));
    }

    Eligibility::Accepted
}

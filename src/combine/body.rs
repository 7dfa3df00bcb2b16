//! Combined PR body rendering

use crate::types::{MergeOutcome, MergeRecord};

const COMBINED_HEADING: &str =
    "✅ The following pull requests have been successfully combined on this PR:";
const LEFT_OUT_HEADING: &str = "⚠️ The following PRs were left out due to merge conflicts:";
const FOOTER: &str = "> This PR was created by the [`github/combine-prs`](https://github.com/github/combine-prs) action";

/// Render the combined PR body from merge records
///
/// Merged PRs appear as a checked list; conflicted PRs get their own
/// unchecked list, omitted entirely when empty. Records keep plan order.
pub fn render_body(header: &str, records: &[MergeRecord]) -> String {
    let mut body = format!("{header}\n\n{COMBINED_HEADING}");
    for record in records
        .iter()
        .filter(|r| r.outcome == MergeOutcome::Merged)
    {
        body.push_str(&format!("\n- [x] {}", record.candidate.summary()));
    }

    let mut left_out = records
        .iter()
        .filter(|r| r.outcome == MergeOutcome::Conflicted)
        .peekable();
    if left_out.peek().is_some() {
        body.push_str(&format!("\n\n{LEFT_OUT_HEADING}"));
        for record in left_out {
            body.push_str(&format!("\n- [ ] {}", record.candidate.summary()));
        }
    }

    body.push_str(&format!("\n\n{FOOTER}"));
    body
}

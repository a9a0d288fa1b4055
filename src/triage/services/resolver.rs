//! Resolves the work items a merged pull request links.

use crate::triage::domain::{PullRequest, UnresolvablePullRequest, WorkItemId};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

#[expect(clippy::expect_used, reason = "literal pattern is covered by tests")]
static COMMIT_MESSAGE_ITEMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Related work items:[ \t]*(?P<items>[^\r\n]*)").expect("valid commit pattern")
});

#[expect(clippy::expect_used, reason = "literal pattern is covered by tests")]
static BRANCH_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?P<items>\d{6})(?:$|\D)").expect("valid branch pattern")
});

#[expect(clippy::expect_used, reason = "literal pattern is covered by tests")]
static ITEM_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#?(?P<number>\d+)").expect("valid number pattern"));

/// Extracts linked work item identifiers from pull requests.
///
/// A merge commit message, when the field exists, is authoritative: its
/// `Related work items:` line lists the items, and a message without that
/// line legitimately links nothing. Only when the field is missing is the
/// source branch searched for a six-digit `/123456` segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkItemResolver;

impl WorkItemResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the linked identifiers in order of appearance. Duplicates are
    /// passed through.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvablePullRequest`] when there is no merge commit
    /// message and the source branch has no six-digit segment.
    pub fn resolve(
        &self,
        pull_request: &PullRequest,
    ) -> Result<Vec<WorkItemId>, UnresolvablePullRequest> {
        let fragment = match pull_request.merge_commit_message() {
            Some(message) => {
                let Some(captures) = COMMIT_MESSAGE_ITEMS.captures(message) else {
                    debug!(
                        pull_request = %pull_request.id(),
                        "no work items line in merge commit message"
                    );
                    return Ok(Vec::new());
                };
                captures.name("items").map_or("", |items| items.as_str())
            }
            None => {
                let source_branch = pull_request.source_branch();
                debug!(
                    pull_request = %pull_request.id(),
                    source_branch,
                    "no merge commit message, parsing work items from source branch"
                );
                BRANCH_ITEM
                    .captures(source_branch)
                    .and_then(|captures| captures.name("items"))
                    .map(|items| items.as_str())
                    .ok_or_else(|| UnresolvablePullRequest {
                        pull_request: pull_request.id().clone(),
                        source_branch: source_branch.to_owned(),
                    })?
            }
        };
        Ok(parse_item_numbers(fragment))
    }
}

fn parse_item_numbers(fragment: &str) -> Vec<WorkItemId> {
    ITEM_NUMBER
        .captures_iter(fragment)
        .filter_map(|captures| captures.name("number"))
        .filter_map(|number| match WorkItemId::parse(number.as_str()) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(%err, "ignoring unusable work item number");
                None
            }
        })
        .collect()
}

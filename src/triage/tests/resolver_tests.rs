//! Tests for pull request work item resolution.

use super::support::{id, merged_pull_request, pr_id};
use crate::triage::domain::{MergeStatus, PullRequest, UserIdentity, WorkItemId};
use crate::triage::services::WorkItemResolver;
use rstest::{fixture, rstest};

#[fixture]
fn resolver() -> WorkItemResolver {
    WorkItemResolver::new()
}

fn from_branch(source_branch: &str) -> PullRequest {
    PullRequest::new(
        pr_id("5"),
        UserIdentity::new("Dana Dev", "CORP\\dana"),
        MergeStatus::Succeeded,
        source_branch,
    )
}

#[rstest]
fn commit_message_items_keep_their_order(resolver: WorkItemResolver) {
    let pull_request = merged_pull_request(
        "5",
        "Merged PR 5: Fix voucher totals\n\nRelated work items: #1234, 5678",
    );

    let resolved = resolver.resolve(&pull_request).expect("resolvable");

    assert_eq!(resolved, vec![id(1234), id(5678)]);
}

#[rstest]
fn commit_message_duplicates_are_passed_through(resolver: WorkItemResolver) {
    let pull_request = merged_pull_request("5", "Related work items: #12, #12");

    let resolved = resolver.resolve(&pull_request).expect("resolvable");

    assert_eq!(resolved, vec![id(12), id(12)]);
}

#[rstest]
fn commit_message_without_items_line_links_nothing(resolver: WorkItemResolver) {
    let pull_request = merged_pull_request("5", "Merged PR 5: tidy imports");

    let resolved = resolver.resolve(&pull_request).expect("resolvable");

    assert!(resolved.is_empty());
}

#[rstest]
#[case("Merged PR 5: tidy\n\nRelated work items:\n\nReviewed in 2 rounds")]
#[case("Related work items:   \r\nSee #77 for context")]
fn empty_items_line_does_not_borrow_the_next_line(
    resolver: WorkItemResolver,
    #[case] message: &str,
) {
    let pull_request = merged_pull_request("5", message);

    let resolved = resolver.resolve(&pull_request).expect("resolvable");

    assert!(resolved.is_empty());
}

#[rstest]
fn commit_message_wins_over_branch_name(resolver: WorkItemResolver) {
    let pull_request = from_branch("refs/heads/users/alice/123456-fix")
        .with_merge_commit_message("Related work items: #42");

    let resolved = resolver.resolve(&pull_request).expect("resolvable");

    assert_eq!(resolved, vec![id(42)]);
}

#[rstest]
#[case("refs/heads/users/alice/123456-fix", 123_456)]
#[case("refs/heads/bugfix/654321", 654_321)]
fn branch_with_six_digit_segment_resolves(
    resolver: WorkItemResolver,
    #[case] source_branch: &str,
    #[case] expected: u32,
) {
    let resolved = resolver
        .resolve(&from_branch(source_branch))
        .expect("resolvable");

    assert_eq!(resolved, vec![id(expected)]);
}

#[rstest]
#[case("refs/heads/users/alice/fix-login")]
#[case("refs/heads/users/alice/12345-short")]
fn branch_without_six_digit_segment_is_unresolvable(
    resolver: WorkItemResolver,
    #[case] source_branch: &str,
) {
    let err = resolver
        .resolve(&from_branch(source_branch))
        .expect_err("branch carries no work item");

    assert_eq!(err.source_branch, source_branch);
    assert_eq!(err.pull_request, pr_id("5"));
}

#[rstest]
fn resolved_identifiers_are_positive(resolver: WorkItemResolver) {
    let pull_request = merged_pull_request("5", "Related work items: #0, #7");

    let resolved: Vec<WorkItemId> = resolver.resolve(&pull_request).expect("resolvable");

    assert_eq!(resolved, vec![id(7)]);
}

//! Shared builders for triage tests.

use std::sync::Arc;

use crate::config::Settings;
use crate::triage::domain::{
    Activity, MergeStatus, PullRequest, PullRequestId, Relation, RelationKind, TagSet,
    UserIdentity, WorkItem, WorkItemId, WorkItemState, WorkItemType,
};

pub(super) const SETTINGS: &str = r#"
base_url = "https://tracker.example.com/tfs/Collection/"
project = "Shop"
repositories = ["Shop[develop]"]
default_tester = "CORP\\qa.lead"
default_domain = "CORP"
tester_mapping = ["anna:CORP\\anna.k"]
titles_to_skip = ["[no qa]"]
"#;

pub(super) fn settings() -> Arc<Settings> {
    settings_from(SETTINGS)
}

pub(super) fn settings_from(toml: &str) -> Arc<Settings> {
    Arc::new(Settings::from_toml_str(toml).expect("test settings should be valid"))
}

pub(super) fn id(value: u32) -> WorkItemId {
    WorkItemId::new(value).expect("positive work item id")
}

pub(super) fn pr_id(value: &str) -> PullRequestId {
    PullRequestId::new(value).expect("non-empty pull request id")
}

pub(super) fn child_link(child: u32) -> Relation {
    Relation::new(
        RelationKind::HierarchyForward,
        format!("https://tracker.example.com/tfs/Collection/_apis/wit/workItems/{child}"),
    )
}

pub(super) fn bug(value: u32) -> WorkItem {
    WorkItem::new(
        id(value),
        WorkItemType::Bug,
        WorkItemState::ToDo,
        "Checkout total ignores vouchers",
    )
    .with_tags(TagSet::new())
}

pub(super) fn task(
    value: u32,
    state: WorkItemState,
    activity: Activity,
    assignee: Option<&str>,
) -> WorkItem {
    let item = WorkItem::new(id(value), WorkItemType::Task, state, "Task").with_activity(activity);
    match assignee {
        Some(assignee) => item.with_assigned_to(assignee),
        None => item,
    }
}

pub(super) fn merged_pull_request(value: &str, message: &str) -> PullRequest {
    PullRequest::new(
        pr_id(value),
        UserIdentity::new("Dana Dev", "CORP\\dana"),
        MergeStatus::Succeeded,
        "refs/heads/feature/checkout",
    )
    .with_merge_commit_message(message)
}

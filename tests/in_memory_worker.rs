//! Integration tests for the polling worker over in-memory adapters.
//!
//! These tests drive whole iterations: every monitored branch pass followed
//! by sub-task creation, checking what reaches the tracker and the processed
//! log across consecutive iterations.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;
#[cfg(unix)]
use std::time::Duration;

use mockable::DefaultClock;
use qa_triage::config::Settings;
use qa_triage::triage::{
    adapters::memory::{InMemoryProcessedLog, InMemoryTracker},
    domain::{
        Activity, MergeStatus, MonitoredBranch, PullRequest, PullRequestId, UserIdentity,
        WorkItem, WorkItemId, WorkItemState, WorkItemType,
    },
};
use qa_triage::worker::Worker;
#[cfg(unix)]
use qa_triage::worker::interrupt_signal;
use rstest::{fixture, rstest};

const SETTINGS: &str = r#"
base_url = "https://tracker.example.com/tfs/Collection"
project = "Shop"
repositories = ["Shop[develop]", "Shop[release]"]
default_tester = "CORP\\qa.lead"
default_domain = "CORP"

[subtasks]
developers = ["CORP\\dana:Team Shop"]
qa_team = ["CORP\\quinn"]
"#;

type TestWorker = Worker<InMemoryTracker, InMemoryProcessedLog, DefaultClock>;

struct Harness {
    tracker: Arc<InMemoryTracker>,
    processed: Arc<InMemoryProcessedLog>,
    worker: TestWorker,
}

#[fixture]
fn harness() -> Harness {
    let settings = Arc::new(Settings::from_toml_str(SETTINGS).expect("worker settings are valid"));
    let tracker = Arc::new(InMemoryTracker::new());
    let processed = Arc::new(InMemoryProcessedLog::new());
    let worker = Worker::new(
        Arc::clone(&tracker),
        Arc::clone(&processed),
        Arc::new(DefaultClock),
        settings,
    );
    Harness {
        tracker,
        processed,
        worker,
    }
}

fn id(value: u32) -> WorkItemId {
    WorkItemId::new(value).expect("positive work item id")
}

fn merged(pull_request: &str, message: &str) -> PullRequest {
    PullRequest::new(
        PullRequestId::new(pull_request).expect("non-empty pull request id"),
        UserIdentity::new("Dana Dev", "CORP\\dana"),
        MergeStatus::Succeeded,
        "refs/heads/feature/vouchers",
    )
    .with_merge_commit_message(message)
}

fn develop() -> MonitoredBranch {
    MonitoredBranch::new("Shop", "develop")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn processed_pull_requests_are_skipped_on_the_next_iteration(harness: Harness) {
    harness
        .tracker
        .insert_work_item(WorkItem::new(
            id(100),
            WorkItemType::Bug,
            WorkItemState::ToDo,
            "Voucher total rounds down",
        ))
        .expect("insert bug");
    harness
        .tracker
        .add_pull_request(&develop(), merged("981", "Merged PR 981\n\nRelated work items: #100"))
        .expect("add pull request");

    let first = harness.worker.run_iteration().await;
    let second = harness.worker.run_iteration().await;

    assert_eq!(first.failed_passes, 0);
    assert_eq!(first.reports.len(), 2);
    let develop_report = first
        .reports
        .iter()
        .find(|report| report.branch == develop())
        .expect("develop pass report");
    assert_eq!(develop_report.handled_pull_requests, 1);
    assert_eq!(develop_report.tally.successes(), 1);

    assert!(
        second
            .reports
            .iter()
            .all(|report| report.handled_pull_requests == 0)
    );
    assert_eq!(
        harness
            .tracker
            .work_item_fetch_count(id(100))
            .expect("fetch count"),
        1
    );
    assert_eq!(
        harness.processed.entries().expect("processed entries"),
        vec!["981".to_owned()]
    );

    let updates = harness.tracker.applied_updates().expect("applied updates");
    assert_eq!(updates.len(), 1);
    let update = updates.first().expect("bug update");
    assert_eq!(update.work_item_id(), id(100));
    assert_eq!(update.assigned_to(), Some("CORP\\qa.lead"));
    assert!(
        update
            .tags()
            .is_some_and(|tags| tags.contains("Ready For Test"))
    );
    assert!(update.state().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn iteration_splits_pending_parents_into_sub_tasks(harness: Harness) {
    harness
        .tracker
        .insert_work_item(
            WorkItem::new(
                id(700),
                WorkItemType::ProductBacklogItem,
                WorkItemState::Other("Committed".to_owned()),
                "Vouchers  checkout->basket",
            )
            .with_created_by("Quinn Tester <CORP\\quinn>")
            .with_effort(5.0),
        )
        .expect("insert parent");
    harness
        .tracker
        .set_pending_parents("CORP\\dana", [id(700)])
        .expect("set pending parents");

    let summary = harness.worker.run_iteration().await;

    let tally = summary.subtasks.expect("sub-task creation is enabled");
    assert_eq!(tally.successes(), 1);
    assert_eq!(tally.failures(), 0);

    let created = harness.tracker.created_tasks().expect("created tasks");
    assert_eq!(created.len(), 2);
    let dev_task = created.first().expect("development task");
    assert_eq!(dev_task.title, "Dev: Vouchers checkout → basket");
    assert_eq!(dev_task.activity, Activity::Development);
    assert_eq!(dev_task.assigned_to.as_deref(), Some("CORP\\dana"));
    assert_eq!(dev_task.remaining_work, Some(5.0));
    let qa_task = created.get(1).expect("QA task");
    assert_eq!(qa_task.title, "QA: Vouchers checkout → basket");
    assert_eq!(qa_task.activity, Activity::Testing);
    assert_eq!(qa_task.assigned_to.as_deref(), Some("CORP\\quinn"));

    let updates = harness.tracker.applied_updates().expect("applied updates");
    let parent_update = updates.first().expect("parent update");
    assert_eq!(parent_update.work_item_id(), id(700));
    assert_eq!(parent_update.title(), Some("Vouchers checkout → basket"));
    assert!(
        parent_update
            .tags()
            .is_some_and(|tags| tags.contains("Team Shop"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_stops_the_polling_loop(harness: Harness) {
    harness.worker.run_until(async {}).await;

    assert_eq!(harness.tracker.listing_calls().expect("listing calls"), 2);
}

#[cfg(unix)]
fn interrupt_this_process() {
    let status = std::process::Command::new("kill")
        .args(["-INT", &std::process::id().to_string()])
        .status()
        .expect("run kill");
    assert!(status.success());
}

#[cfg(unix)]
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn interrupt_before_the_first_check_finishes_the_pass(harness: Harness) {
    let shutdown = interrupt_signal().expect("install interrupt handler");
    interrupt_this_process();

    tokio::time::timeout(Duration::from_secs(10), harness.worker.run_until(shutdown))
        .await
        .expect("loop stops after the interrupted iteration");

    assert_eq!(harness.tracker.listing_calls().expect("listing calls"), 2);
}

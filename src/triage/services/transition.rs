//! Decides and applies the post-merge transition of a work item.

use crate::config::{CommentNotification, Settings};
use crate::triage::{
    domain::{
        CycleTally, PullRequestId, TagSet, TargetState, TesterDiscovery, UpdateRequest, WorkItem,
        WorkItemId, WorkItemState, add_tag,
    },
    ports::WorkItemTracker,
    services::{
        TesterDiscoveryService,
        error::{TriageServiceError, TriageServiceResult},
    },
};
use minijinja::Environment;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

/// The merge that triggered an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeContext {
    /// Merged pull request.
    pub pull_request: PullRequestId,
    /// Display name of the pull request creator.
    pub creator: String,
    /// Monitored branch name the pull request merged into.
    pub branch: String,
}

/// Why an item was left untouched. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The title contains a configured skip fragment.
    TitleSkipped(String),
    /// Only backlog items and bugs are triaged.
    UnsupportedType(String),
    /// The item is already `Done` or `Removed`.
    AlreadyClosed,
    /// The item already carries the ready-for-test tag.
    AlreadyReadyForTest,
    /// A non-testable item still has child tasks to do or in progress.
    ChildTasksOpen,
    /// A development task is still open.
    DeveloperTaskOpen {
        /// Assignee of the open development task.
        developer: String,
    },
}

/// Outcome of evaluating one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave the item alone.
    Skip(SkipReason),
    /// Apply this update.
    Update(UpdateRequest),
}

/// Outcome of processing one linked work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The update was applied.
    Updated(UpdateRequest),
    /// Nothing needed doing.
    Skipped(SkipReason),
    /// Fetching, deciding or updating failed.
    Failed,
}

/// Work item transition engine.
pub struct TransitionService<T>
where
    T: WorkItemTracker,
{
    tracker: Arc<T>,
    settings: Arc<Settings>,
    discovery: TesterDiscoveryService<T>,
}

impl<T> TransitionService<T>
where
    T: WorkItemTracker,
{
    /// Creates a transition service.
    #[must_use]
    pub fn new(tracker: Arc<T>, settings: Arc<Settings>) -> Self {
        let discovery = TesterDiscoveryService::new(Arc::clone(&tracker), Arc::clone(&settings));
        Self {
            tracker,
            settings,
            discovery,
        }
    }

    /// Fetches, evaluates and updates one work item, recording the result
    /// in `tally`. Failures are logged and counted, never propagated, so a
    /// single item cannot abort the batch.
    pub async fn process(
        &self,
        id: WorkItemId,
        context: &MergeContext,
        tally: &mut CycleTally,
    ) -> ItemOutcome {
        match self.try_process(id, context).await {
            Ok(Decision::Update(request)) => {
                tally.record_success();
                debug!(work_item = %id, "work item updated");
                ItemOutcome::Updated(request)
            }
            Ok(Decision::Skip(reason)) => {
                debug!(work_item = %id, ?reason, "work item skipped");
                ItemOutcome::Skipped(reason)
            }
            Err(err) => {
                tally.record_failure();
                error!(work_item = %id, %err, "failed to process work item");
                ItemOutcome::Failed
            }
        }
    }

    async fn try_process(
        &self,
        id: WorkItemId,
        context: &MergeContext,
    ) -> TriageServiceResult<Decision> {
        debug!(work_item = %id, "fetching work item");
        let item = self
            .tracker
            .fetch_work_item(id)
            .await?
            .ok_or_else(|| TriageServiceError::WorkItemNotFound(id.to_string()))?;
        debug!(
            work_item = %id,
            item_type = item.item_type().as_str(),
            state = item.state().as_str(),
            assigned_to = item.assigned_to().unwrap_or("Unassigned"),
            title = item.title(),
            "evaluating work item"
        );

        let decision = self.evaluate(&item, context).await?;
        if let Decision::Update(request) = &decision {
            self.tracker.apply_update(request).await?;
        }
        Ok(decision)
    }

    /// Decides what to do with `item` without applying anything.
    ///
    /// # Errors
    ///
    /// Returns [`TriageServiceError`] when a linked item cannot be fetched or
    /// the notification comment cannot be rendered.
    pub async fn evaluate(
        &self,
        item: &WorkItem,
        context: &MergeContext,
    ) -> TriageServiceResult<Decision> {
        if let Some(reason) = self.precondition_skip(item) {
            return Ok(Decision::Skip(reason));
        }

        if item.tags().contains(&self.settings.non_testable_tag) {
            return self.close_non_testable(item).await;
        }

        let tester = match self.discovery.discover(item).await? {
            TesterDiscovery::Blocked { developer } => {
                return Ok(Decision::Skip(SkipReason::DeveloperTaskOpen { developer }));
            }
            TesterDiscovery::Found(account) => Some(account),
            TesterDiscovery::NotFound => {
                let fallback = self.settings.default_tester().map(str::to_owned);
                debug!(work_item = %item.id(), tester = ?fallback, "using default tester");
                fallback
            }
        };

        let tags = TagSet::parse(&add_tag(
            &item.tags().to_wire(),
            &self.settings.ready_for_test_tag,
        ));
        let mut request = UpdateRequest::new(item.id(), item.existing_fields()).with_tags(tags);
        if let Some(account) = &tester {
            request = request.with_assigned_to(account.clone());
        }
        if let Some(notification) = self
            .settings
            .notification
            .as_ref()
            .filter(|notification| notification.applies_to(&context.branch))
        {
            let comment = render_comment(notification, context, tester.as_deref(), item.id())?;
            request = request.with_comment(comment);
        }
        info!(
            work_item = %item.id(),
            tester = tester.as_deref().unwrap_or("nobody"),
            "marking ready for test"
        );
        Ok(Decision::Update(request))
    }

    fn precondition_skip(&self, item: &WorkItem) -> Option<SkipReason> {
        if let Some(fragment) = self.settings.skipped_title_fragment(item.title()) {
            return Some(SkipReason::TitleSkipped(fragment.to_owned()));
        }
        if !item.item_type().is_triaged() {
            return Some(SkipReason::UnsupportedType(
                item.item_type().as_str().to_owned(),
            ));
        }
        if item.state().is_closed() {
            return Some(SkipReason::AlreadyClosed);
        }
        if item.tags().contains(&self.settings.ready_for_test_tag) {
            return Some(SkipReason::AlreadyReadyForTest);
        }
        None
    }

    async fn close_non_testable(&self, item: &WorkItem) -> TriageServiceResult<Decision> {
        for relation in item.child_links() {
            let Some(child) = self.tracker.fetch_related(relation).await? else {
                continue;
            };
            let unfinished = matches!(
                child.state(),
                WorkItemState::ToDo | WorkItemState::InProgress
            );
            if child.is_open_task() && unfinished {
                debug!(
                    work_item = %item.id(),
                    task = %child.id(),
                    "non-testable item still has unfinished tasks"
                );
                return Ok(Decision::Skip(SkipReason::ChildTasksOpen));
            }
        }
        info!(work_item = %item.id(), "closing non-testable work item");
        Ok(Decision::Update(
            UpdateRequest::new(item.id(), item.existing_fields()).with_state(TargetState::Done),
        ))
    }
}

fn render_comment(
    notification: &CommentNotification,
    context: &MergeContext,
    tester: Option<&str>,
    work_item: WorkItemId,
) -> TriageServiceResult<String> {
    let environment = Environment::new();
    let mut values = Map::new();
    values.insert(
        "pull_request_id".to_owned(),
        Value::String(context.pull_request.to_string()),
    );
    values.insert("branch".to_owned(), Value::String(context.branch.clone()));
    values.insert("creator".to_owned(), Value::String(context.creator.clone()));
    values.insert(
        "tester".to_owned(),
        tester.map_or(Value::Null, |account| Value::String(account.to_owned())),
    );
    values.insert("work_item_id".to_owned(), Value::from(work_item.value()));

    let rendered = environment
        .render_str(&notification.template, values)
        .map_err(|err| TriageServiceError::CommentRender {
            work_item: work_item.to_string(),
            reason: err.to_string(),
        })?;
    Ok(format!("{}{rendered}", notification.prefix))
}

//! Creates development and QA sub-tasks under freshly committed parents.

use crate::config::{DeveloperEntry, Settings, SubtaskSettings};
use crate::triage::{
    domain::{
        Activity, CycleTally, NewTaskRequest, TagSet, UpdateRequest, WorkItem, WorkItemId,
        add_tag, extract_domain_user,
    },
    ports::{TrackerResult, WorkItemTracker},
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, info};

#[expect(clippy::expect_used, reason = "literal pattern is covered by tests")]
static ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*->\s*").expect("valid arrow pattern"));

/// Title prefix of development tasks.
pub const DEV_TASK_PREFIX: &str = "Dev: ";
/// Title prefix of QA tasks.
pub const QA_TASK_PREFIX: &str = "QA: ";

/// Normalises a parent title: double spaces collapse once and `->` becomes
/// an arrow.
///
/// # Examples
///
///     use qa_triage::triage::services::normalise_title;
///
///     assert_eq!(normalise_title("Import  CSV->JSON"), "Import CSV → JSON");
#[must_use]
pub fn normalise_title(title: &str) -> String {
    let collapsed = title.replace("  ", " ");
    ARROW.replace_all(&collapsed, " → ").into_owned()
}

/// Sub-task creation for configured developers.
pub struct SubtaskService<T>
where
    T: WorkItemTracker,
{
    tracker: Arc<T>,
    settings: Arc<Settings>,
    subtasks: SubtaskSettings,
}

impl<T> SubtaskService<T>
where
    T: WorkItemTracker,
{
    /// Creates a sub-task service.
    #[must_use]
    pub const fn new(tracker: Arc<T>, settings: Arc<Settings>, subtasks: SubtaskSettings) -> Self {
        Self {
            tracker,
            settings,
            subtasks,
        }
    }

    /// Processes every configured developer's pending parents. Each parent
    /// counts once in the returned tally.
    pub async fn run(&self) -> CycleTally {
        let mut tally = CycleTally::new();
        for developer in &self.subtasks.developers {
            let parents = match self.tracker.find_pending_parents(&developer.user).await {
                Ok(parents) => parents,
                Err(err) => {
                    error!(developer = %developer.user, %err, "pending parent query failed");
                    tally.record_failure();
                    continue;
                }
            };
            debug!(developer = %developer.user, count = parents.len(), "pending parents");
            for parent in parents {
                match self.split_parent(parent, developer).await {
                    Ok(()) => tally.record_success(),
                    Err(err) => {
                        error!(work_item = %parent, %err, "sub-task creation failed");
                        tally.record_failure();
                    }
                }
            }
        }
        info!(
            successes = tally.successes(),
            failures = tally.failures(),
            "sub-task creation complete"
        );
        tally
    }

    async fn split_parent(&self, id: WorkItemId, developer: &DeveloperEntry) -> TrackerResult<()> {
        let Some(parent) = self.tracker.fetch_work_item(id).await? else {
            debug!(work_item = %id, "pending parent vanished");
            return Ok(());
        };

        let title = normalise_title(parent.title());
        self.tidy_parent(&parent, &title, developer).await?;

        let dev_task = NewTaskRequest {
            parent: id,
            title: format!("{DEV_TASK_PREFIX}{title}"),
            activity: Activity::Development,
            remaining_work: parent.effort().filter(|effort| *effort > 0.0),
            assigned_to: Some(developer.user.clone()),
            planning: parent.planning().clone(),
        };
        let dev_task_id = self.tracker.create_child_task(&dev_task).await?;
        info!(work_item = %id, task = %dev_task_id, "created development task");

        if parent.tags().contains(&self.settings.non_testable_tag) {
            return Ok(());
        }
        let qa_task = NewTaskRequest {
            parent: id,
            title: format!("{QA_TASK_PREFIX}{title}"),
            activity: Activity::Testing,
            remaining_work: None,
            assigned_to: self.qa_owner(&parent),
            planning: parent.planning().clone(),
        };
        let qa_task_id = self.tracker.create_child_task(&qa_task).await?;
        info!(work_item = %id, task = %qa_task_id, "created QA task");
        Ok(())
    }

    async fn tidy_parent(
        &self,
        parent: &WorkItem,
        title: &str,
        developer: &DeveloperEntry,
    ) -> TrackerResult<()> {
        let current_tags = parent.tags().to_wire();
        let tags = developer
            .team_tag
            .as_deref()
            .map_or_else(|| current_tags.clone(), |tag| add_tag(&current_tags, tag));

        let mut request = UpdateRequest::new(parent.id(), parent.existing_fields());
        if title != parent.title() {
            request = request.with_title(title);
        }
        if tags != current_tags {
            request = request.with_tags(TagSet::parse(&tags));
        }
        if request.is_empty() {
            return Ok(());
        }
        debug!(work_item = %parent.id(), "updating parent title and tags");
        self.tracker.apply_update(&request).await
    }

    fn qa_owner(&self, parent: &WorkItem) -> Option<String> {
        let creator = parent
            .created_by()
            .and_then(|created_by| extract_domain_user(created_by, true));
        creator
            .filter(|account| {
                self.subtasks
                    .qa_team
                    .iter()
                    .any(|member| member.eq_ignore_ascii_case(account))
            })
            .or_else(|| self.settings.default_tester().map(str::to_owned))
    }
}

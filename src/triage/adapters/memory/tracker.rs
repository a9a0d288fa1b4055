//! In-memory tracking service for triage tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::triage::{
    domain::{MonitoredBranch, NewTaskRequest, PullRequest, UpdateRequest, WorkItem, WorkItemId},
    ports::{TrackerError, TrackerResult, WorkItemTracker},
};

const FIRST_CREATED_ID: u32 = 900_000;
const INJECTED_FAILURE_STATUS: u16 = 500;

const fn injected_failure(body: String) -> TrackerError {
    TrackerError::Status {
        status: INJECTED_FAILURE_STATUS,
        body,
    }
}

/// Thread-safe in-memory tracking service.
///
/// Updates and created tasks are recorded rather than applied, so tests can
/// assert on exactly what a service asked for.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTracker {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    pull_requests: HashMap<MonitoredBranch, Vec<PullRequest>>,
    work_items: HashMap<WorkItemId, WorkItem>,
    pending_parents: HashMap<String, Vec<WorkItemId>>,
    failing_updates: HashSet<WorkItemId>,
    failing_fetches: HashSet<WorkItemId>,
    applied_updates: Vec<UpdateRequest>,
    created_tasks: Vec<NewTaskRequest>,
    fetch_counts: HashMap<WorkItemId, usize>,
    listing_calls: usize,
}

impl InMemoryTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackerResult<RwLockReadGuard<'_, InMemoryTrackerState>> {
        self.state
            .read()
            .map_err(|err| TrackerError::transport(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TrackerResult<RwLockWriteGuard<'_, InMemoryTrackerState>> {
        self.state
            .write()
            .map_err(|err| TrackerError::transport(std::io::Error::other(err.to_string())))
    }

    /// Lists `pull_request` as completed into `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn add_pull_request(
        &self,
        branch: &MonitoredBranch,
        pull_request: PullRequest,
    ) -> TrackerResult<()> {
        self.write()?
            .pull_requests
            .entry(branch.clone())
            .or_default()
            .push(pull_request);
        Ok(())
    }

    /// Stores or replaces a work item.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn insert_work_item(&self, item: WorkItem) -> TrackerResult<()> {
        self.write()?.work_items.insert(item.id(), item);
        Ok(())
    }

    /// Sets the pending parents returned for `developer`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn set_pending_parents(
        &self,
        developer: &str,
        parents: impl IntoIterator<Item = WorkItemId>,
    ) -> TrackerResult<()> {
        self.write()?
            .pending_parents
            .insert(developer.to_owned(), parents.into_iter().collect());
        Ok(())
    }

    /// Makes every update of `id`, and task creation under it, fail with a
    /// server error status.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn fail_updates_for(&self, id: WorkItemId) -> TrackerResult<()> {
        self.write()?.failing_updates.insert(id);
        Ok(())
    }

    /// Makes every fetch of `id` fail with a server error status.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn fail_fetches_for(&self, id: WorkItemId) -> TrackerResult<()> {
        self.write()?.failing_fetches.insert(id);
        Ok(())
    }

    /// Returns the updates applied so far, in order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn applied_updates(&self) -> TrackerResult<Vec<UpdateRequest>> {
        Ok(self.read()?.applied_updates.clone())
    }

    /// Returns the tasks created so far, in order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn created_tasks(&self) -> TrackerResult<Vec<NewTaskRequest>> {
        Ok(self.read()?.created_tasks.clone())
    }

    /// Returns how often `id` was fetched.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn work_item_fetch_count(&self, id: WorkItemId) -> TrackerResult<usize> {
        Ok(self.read()?.fetch_counts.get(&id).copied().unwrap_or_default())
    }

    /// Returns how often pull requests were listed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the state lock is poisoned.
    pub fn listing_calls(&self) -> TrackerResult<usize> {
        Ok(self.read()?.listing_calls)
    }
}

#[async_trait]
impl WorkItemTracker for InMemoryTracker {
    async fn fetch_pull_requests(
        &self,
        branch: &MonitoredBranch,
    ) -> TrackerResult<Vec<PullRequest>> {
        let mut state = self.write()?;
        state.listing_calls = state.listing_calls.saturating_add(1);
        Ok(state.pull_requests.get(branch).cloned().unwrap_or_default())
    }

    async fn fetch_work_item(&self, id: WorkItemId) -> TrackerResult<Option<WorkItem>> {
        let mut state = self.write()?;
        let count = state.fetch_counts.entry(id).or_default();
        *count = count.saturating_add(1);
        if state.failing_fetches.contains(&id) {
            return Err(injected_failure(format!("fetch of {id} failed")));
        }
        Ok(state.work_items.get(&id).cloned())
    }

    async fn apply_update(&self, request: &UpdateRequest) -> TrackerResult<()> {
        let mut state = self.write()?;
        if state.failing_updates.contains(&request.work_item_id()) {
            return Err(injected_failure(format!(
                "update of {} failed",
                request.work_item_id()
            )));
        }
        state.applied_updates.push(request.clone());
        Ok(())
    }

    async fn find_pending_parents(&self, developer: &str) -> TrackerResult<Vec<WorkItemId>> {
        Ok(self
            .read()?
            .pending_parents
            .get(developer)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_child_task(&self, request: &NewTaskRequest) -> TrackerResult<WorkItemId> {
        let mut state = self.write()?;
        if state.failing_updates.contains(&request.parent) {
            return Err(injected_failure(format!(
                "task creation under {} failed",
                request.parent
            )));
        }
        let offset = u32::try_from(state.created_tasks.len())
            .map_err(|err| TrackerError::Decode(err.to_string()))?;
        let id = WorkItemId::new(FIRST_CREATED_ID.saturating_add(offset))
            .map_err(|err| TrackerError::Decode(err.to_string()))?;
        state.created_tasks.push(request.clone());
        Ok(id)
    }
}

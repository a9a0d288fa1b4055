//! One triage pass over the pull requests merged into a monitored branch.

use crate::config::Settings;
use crate::triage::{
    domain::{CycleTally, MonitoredBranch, PullRequest},
    ports::{ProcessedLog, WorkItemTracker},
    services::{
        WorkItemResolver,
        error::TriageServiceResult,
        transition::{MergeContext, TransitionService},
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Summary of one pass over a monitored branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Branch the pass covered.
    pub branch: MonitoredBranch,
    /// When the pass started.
    pub started_at: DateTime<Utc>,
    /// When the pass finished.
    pub finished_at: DateTime<Utc>,
    /// Pull requests whose work items reached the transition engine.
    pub handled_pull_requests: u32,
    /// Work item outcomes.
    pub tally: CycleTally,
}

/// Orchestrates triage passes for a single monitored branch.
pub struct CycleService<T, P, C>
where
    T: WorkItemTracker,
    P: ProcessedLog,
    C: Clock + Send + Sync,
{
    branch: MonitoredBranch,
    tracker: Arc<T>,
    processed: Arc<P>,
    clock: Arc<C>,
    settings: Arc<Settings>,
    resolver: WorkItemResolver,
    transitions: TransitionService<T>,
}

impl<T, P, C> CycleService<T, P, C>
where
    T: WorkItemTracker,
    P: ProcessedLog,
    C: Clock + Send + Sync,
{
    /// Creates a cycle service for `branch`.
    #[must_use]
    pub fn new(
        branch: MonitoredBranch,
        tracker: Arc<T>,
        processed: Arc<P>,
        clock: Arc<C>,
        settings: Arc<Settings>,
    ) -> Self {
        let transitions = TransitionService::new(Arc::clone(&tracker), Arc::clone(&settings));
        Self {
            branch,
            tracker,
            processed,
            clock,
            settings,
            resolver: WorkItemResolver::new(),
            transitions,
        }
    }

    /// Returns the branch this service covers.
    #[must_use]
    pub const fn branch(&self) -> &MonitoredBranch {
        &self.branch
    }

    /// Runs one pass: every unprocessed pull request is checked, its work
    /// items evaluated, and then it is marked processed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::triage::services::TriageServiceError`] when the
    /// pull request listing fails or the processed log cannot be read or
    /// written. Work item failures are counted in the report instead.
    pub async fn run_pass(&self) -> TriageServiceResult<CycleReport> {
        let started_at = self.clock.utc();
        let mut tally = CycleTally::new();
        let mut handled_pull_requests = 0_u32;

        let pull_requests = self.tracker.fetch_pull_requests(&self.branch).await?;
        debug!(branch = %self.branch, count = pull_requests.len(), "fetched pull requests");

        for pull_request in &pull_requests {
            if self.processed.is_processed(pull_request.id()).await? {
                continue;
            }
            if self.handle(pull_request, &mut tally).await {
                handled_pull_requests = handled_pull_requests.saturating_add(1);
            }
            self.processed.mark_processed(pull_request.id()).await?;
        }

        if handled_pull_requests > 0 {
            info!(
                branch = %self.branch,
                successes = tally.successes(),
                failures = tally.failures(),
                "pass complete"
            );
        } else {
            debug!(branch = %self.branch, "pass complete, nothing handled");
        }
        Ok(CycleReport {
            branch: self.branch.clone(),
            started_at,
            finished_at: self.clock.utc(),
            handled_pull_requests,
            tally,
        })
    }

    async fn handle(&self, pull_request: &PullRequest, tally: &mut CycleTally) -> bool {
        let creator = pull_request.creator();
        if !self.settings.allowed_creators.permits(creator.unique_name()) {
            debug!(
                pull_request = %pull_request.id(),
                creator = creator.unique_name(),
                "creator not in allow list"
            );
            return false;
        }
        if !pull_request.is_merged() {
            warn!(pull_request = %pull_request.id(), "pull request did not merge cleanly");
            return false;
        }

        let work_items = match self.resolver.resolve(pull_request) {
            Ok(work_items) => work_items,
            Err(err) => {
                error!(%err, "could not resolve work items");
                return false;
            }
        };
        if work_items.is_empty() {
            debug!(pull_request = %pull_request.id(), "no linked work items");
            return false;
        }

        let context = MergeContext {
            pull_request: pull_request.id().clone(),
            creator: creator.display_name().to_owned(),
            branch: self.branch.branch().to_owned(),
        };
        info!(
            pull_request = %pull_request.id(),
            work_items = work_items.len(),
            "processing merged pull request"
        );
        for id in work_items {
            self.transitions.process(id, &context, tally).await;
        }
        true
    }
}

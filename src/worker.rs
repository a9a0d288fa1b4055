//! Polling loop driving triage passes and sub-task creation.

use crate::config::Settings;
use crate::triage::{
    domain::CycleTally,
    ports::{ProcessedLog, WorkItemTracker},
    services::{CycleReport, CycleService, SubtaskService},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Outcome of one polling iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationSummary {
    /// Reports of the branch passes that completed.
    pub reports: Vec<CycleReport>,
    /// Branch passes that aborted, for example because listing failed.
    pub failed_passes: u32,
    /// Sub-task creation tally, when enabled.
    pub subtasks: Option<CycleTally>,
}

/// Runs every monitored branch, then sub-task creation, on an interval.
pub struct Worker<T, P, C>
where
    T: WorkItemTracker,
    P: ProcessedLog,
    C: Clock + Send + Sync,
{
    passes: Vec<CycleService<T, P, C>>,
    subtasks: Option<SubtaskService<T>>,
    interval: Duration,
}

impl<T, P, C> Worker<T, P, C>
where
    T: WorkItemTracker,
    P: ProcessedLog,
    C: Clock + Send + Sync,
{
    /// Builds one cycle service per monitored branch and the optional
    /// sub-task service.
    #[must_use]
    pub fn new(tracker: Arc<T>, processed: Arc<P>, clock: Arc<C>, settings: Arc<Settings>) -> Self {
        let passes = settings
            .monitored_branches
            .iter()
            .map(|branch| {
                CycleService::new(
                    branch.clone(),
                    Arc::clone(&tracker),
                    Arc::clone(&processed),
                    Arc::clone(&clock),
                    Arc::clone(&settings),
                )
            })
            .collect();
        let subtasks = settings.subtasks.clone().map(|subtask_settings| {
            SubtaskService::new(Arc::clone(&tracker), Arc::clone(&settings), subtask_settings)
        });
        Self {
            passes,
            subtasks,
            interval: settings.update_interval,
        }
    }

    /// Runs each branch pass in order, then sub-task creation. A failed
    /// pass is logged and the remaining passes still run.
    pub async fn run_iteration(&self) -> IterationSummary {
        let mut summary = IterationSummary::default();
        for pass in &self.passes {
            match pass.run_pass().await {
                Ok(report) => summary.reports.push(report),
                Err(err) => {
                    error!(branch = %pass.branch(), %err, "pass failed");
                    summary.failed_passes = summary.failed_passes.saturating_add(1);
                }
            }
        }
        if let Some(subtasks) = &self.subtasks {
            summary.subtasks = Some(subtasks.run().await);
        }
        summary
    }

    /// Repeats [`Self::run_iteration`] until `shutdown` resolves. Shutdown is
    /// only observed between iterations, so a running pass always finishes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            self.run_iteration().await;
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                () = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

/// Installs the interrupt handler now and returns a future that resolves on
/// the first Ctrl-C.
///
/// The handler is registered before the future is first polled, so an
/// interrupt arriving while a pass runs is held until [`Worker::run_until`]
/// checks for shutdown instead of terminating the process mid-pass.
///
/// # Errors
///
/// Returns the I/O error raised when the handler cannot be installed.
#[cfg(unix)]
pub fn interrupt_signal() -> std::io::Result<impl Future<Output = ()> + Send> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(async move {
        if interrupt.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    })
}

/// Installs the Ctrl-C handler now and returns a future that resolves on
/// the first Ctrl-C.
///
/// # Errors
///
/// Returns the I/O error raised when the handler cannot be installed.
#[cfg(windows)]
pub fn interrupt_signal() -> std::io::Result<impl Future<Output = ()> + Send> {
    let mut interrupt = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        if interrupt.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    })
}

//! Application services: resolution, discovery, transitions and passes.

mod cycle;
mod error;
mod resolver;
mod subtasks;
mod tester;
mod transition;

pub use cycle::{CycleReport, CycleService};
pub use error::{TriageServiceError, TriageServiceResult};
pub use resolver::WorkItemResolver;
pub use subtasks::{DEV_TASK_PREFIX, QA_TASK_PREFIX, SubtaskService, normalise_title};
pub use tester::TesterDiscoveryService;
pub use transition::{Decision, ItemOutcome, MergeContext, SkipReason, TransitionService};

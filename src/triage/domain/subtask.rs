//! Child task creation requests.

use super::{Activity, WorkItemId};
use serde::{Deserialize, Serialize};

/// Iteration, area and team project shared between a parent and its
/// sub-tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningFields {
    /// Iteration (sprint) path.
    pub iteration_path: Option<String>,
    /// Area path.
    pub area_path: Option<String>,
    /// Team project.
    pub team_project: Option<String>,
}

/// Request to create a task under a parent work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTaskRequest {
    /// Parent the task is linked under.
    pub parent: WorkItemId,
    /// Task title.
    pub title: String,
    /// Activity classification.
    pub activity: Activity,
    /// Remaining work and original estimate, sent only when positive.
    pub remaining_work: Option<f64>,
    /// Assignee, if any.
    pub assigned_to: Option<String>,
    /// Planning fields copied from the parent.
    pub planning: PlanningFields,
}

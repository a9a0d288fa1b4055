//! Work item aggregate and its classification enums.

use super::{ExistingFields, PlanningFields, TagSet, WorkItemId};
use serde::{Deserialize, Serialize};

/// Work item type as reported by the tracking service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkItemType {
    /// A product backlog item.
    ProductBacklogItem,
    /// A bug.
    Bug,
    /// A task, usually a child of a backlog item or bug.
    Task,
    /// Any other type, kept verbatim for logging.
    Other(String),
}

impl WorkItemType {
    /// Maps the `System.WorkItemType` field value.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "Product Backlog Item" => Self::ProductBacklogItem,
            "Bug" => Self::Bug,
            "Task" => Self::Task,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ProductBacklogItem => "Product Backlog Item",
            Self::Bug => "Bug",
            Self::Task => "Task",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` for the types that go through QA triage.
    #[must_use]
    pub const fn is_triaged(&self) -> bool {
        matches!(self, Self::ProductBacklogItem | Self::Bug)
    }
}

/// Work item state observed on entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkItemState {
    /// Work has not started.
    ToDo,
    /// Work is under way.
    InProgress,
    /// Work finished.
    Done,
    /// The item was abandoned.
    Removed,
    /// Any other state (`New`, `Approved`, `Committed`, ...).
    Other(String),
}

impl WorkItemState {
    /// Maps the `System.State` field value.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "To Do" => Self::ToDo,
            "In Progress" => Self::InProgress,
            "Done" => Self::Done,
            "Removed" => Self::Removed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Removed => "Removed",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` for `Done` and `Removed`.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Done | Self::Removed)
    }
}

/// Activity classification of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    /// Implementation work.
    Development,
    /// QA work.
    Testing,
    /// Anything else.
    Other(String),
}

impl Activity {
    /// Maps the `Microsoft.VSTS.Common.Activity` field value.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "Development" => Self::Development,
            "Testing" => Self::Testing,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "Development",
            Self::Testing => "Testing",
            Self::Other(value) => value,
        }
    }
}

/// Kind of a link between two work items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Parent to child.
    HierarchyForward,
    /// Any other link type; ignored by triage.
    Other(String),
}

impl RelationKind {
    /// Link type name of parent-to-child relations.
    pub const HIERARCHY_FORWARD: &'static str = "System.LinkTypes.Hierarchy-Forward";

    /// Maps the relation `rel` value.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value == Self::HIERARCHY_FORWARD {
            Self::HierarchyForward
        } else {
            Self::Other(value.to_owned())
        }
    }
}

/// Directed typed edge from a work item to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    kind: RelationKind,
    url: String,
}

impl Relation {
    /// Creates a relation to the item at `url`.
    #[must_use]
    pub fn new(kind: RelationKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }

    /// Returns the relation kind.
    #[must_use]
    pub const fn kind(&self) -> &RelationKind {
        &self.kind
    }

    /// Returns the linked item's URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `true` for parent-to-child links.
    #[must_use]
    pub const fn is_child_link(&self) -> bool {
        matches!(self.kind, RelationKind::HierarchyForward)
    }

    /// Extracts the linked item's identifier from the trailing URL segment.
    #[must_use]
    pub fn target_id(&self) -> Option<WorkItemId> {
        let (_, last_segment) = self.url.trim_end_matches('/').rsplit_once('/')?;
        if last_segment.is_empty() || !last_segment.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        WorkItemId::parse(last_segment).ok()
    }
}

/// Free-text fields searched for a "tested by" note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTextFields {
    /// Acceptance criteria.
    pub acceptance_criteria: Option<String>,
    /// System or environment information.
    pub system_info: Option<String>,
    /// Description.
    pub description: Option<String>,
}

impl FreeTextFields {
    /// Returns the present fields in search order: acceptance criteria,
    /// system info, description.
    pub fn in_search_order(&self) -> impl Iterator<Item = &str> {
        [
            self.acceptance_criteria.as_deref(),
            self.system_info.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Work item aggregate with the fields triage reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    id: WorkItemId,
    item_type: WorkItemType,
    state: WorkItemState,
    title: String,
    tags: TagSet,
    assigned_to: Option<String>,
    text: FreeTextFields,
    activity: Option<Activity>,
    relations: Vec<Relation>,
    created_by: Option<String>,
    planning: PlanningFields,
    effort: Option<f64>,
    existing: ExistingFields,
}

impl WorkItem {
    /// Creates a work item with the always-present fields.
    #[must_use]
    pub fn new(
        id: WorkItemId,
        item_type: WorkItemType,
        state: WorkItemState,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            item_type,
            state,
            title: title.into(),
            tags: TagSet::new(),
            assigned_to: None,
            text: FreeTextFields::default(),
            activity: None,
            relations: Vec::new(),
            created_by: None,
            planning: PlanningFields::default(),
            effort: None,
            existing: ExistingFields {
                title: true,
                tags: false,
                assigned_to: false,
            },
        }
    }

    /// Records the title field as absent, so a new title is added rather
    /// than replaced.
    #[must_use]
    pub const fn without_title_field(mut self) -> Self {
        self.existing.title = false;
        self
    }

    /// Sets the tags and records the tags field as present.
    #[must_use]
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self.existing.tags = true;
        self
    }

    /// Sets the assignee and records the assignee field as present.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self.existing.assigned_to = true;
        self
    }

    /// Sets the free-text fields.
    #[must_use]
    pub fn with_text(mut self, text: FreeTextFields) -> Self {
        self.text = text;
        self
    }

    /// Sets the activity classification.
    #[must_use]
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activity = Some(activity);
        self
    }

    /// Appends a relation.
    #[must_use]
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Sets the creator annotation (`Name <DOMAIN\user>`).
    #[must_use]
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    /// Sets iteration, area and team project.
    #[must_use]
    pub fn with_planning(mut self, planning: PlanningFields) -> Self {
        self.planning = planning;
        self
    }

    /// Sets the effort estimate.
    #[must_use]
    pub fn with_effort(mut self, effort: f64) -> Self {
        self.effort = Some(effort);
        self
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> WorkItemId {
        self.id
    }

    /// Returns the work item type.
    #[must_use]
    pub const fn item_type(&self) -> &WorkItemType {
        &self.item_type
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &WorkItemState {
        &self.state
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the tag set.
    #[must_use]
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Returns the assignee annotation, or `None` when unassigned.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns the free-text fields.
    #[must_use]
    pub const fn text(&self) -> &FreeTextFields {
        &self.text
    }

    /// Returns the activity classification, if any.
    #[must_use]
    pub const fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    /// Returns all relations.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Returns parent-to-child relations only.
    pub fn child_links(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(|relation| relation.is_child_link())
    }

    /// Returns the creator annotation, if any.
    #[must_use]
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Returns iteration, area and team project.
    #[must_use]
    pub const fn planning(&self) -> &PlanningFields {
        &self.planning
    }

    /// Returns the effort estimate, if any.
    #[must_use]
    pub const fn effort(&self) -> Option<f64> {
        self.effort
    }

    /// Returns which updatable fields were present when fetched.
    #[must_use]
    pub const fn existing_fields(&self) -> ExistingFields {
        self.existing
    }

    /// Returns `true` for an open task (not `Done` or `Removed`).
    #[must_use]
    pub fn is_open_task(&self) -> bool {
        self.item_type == WorkItemType::Task && !self.state.is_closed()
    }
}

//! Update requests issued back to the tracking service.

use super::{TagSet, WorkItemId};
use serde::{Deserialize, Serialize};

/// Closed set of states an update may transition a work item to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetState {
    /// `To Do`.
    ToDo,
    /// `In Progress`.
    InProgress,
    /// `Done`.
    Done,
    /// `Removed`.
    Removed,
}

impl TargetState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Removed => "Removed",
        }
    }
}

/// Which updatable fields were present on the work item when it was read.
///
/// Present fields are patched with `replace`, absent ones with `add`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExistingFields {
    /// The title field was present.
    pub title: bool,
    /// The tags field was present.
    pub tags: bool,
    /// The assignee field was present.
    pub assigned_to: bool,
}

/// Patch operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOp {
    /// Add a field that does not exist yet.
    Add,
    /// Replace an existing field.
    Replace,
}

impl FieldOp {
    const fn for_presence(present: bool) -> Self {
        if present { Self::Replace } else { Self::Add }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Replace => "replace",
        }
    }
}

/// Work item field touched by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateField {
    /// Workflow state.
    State,
    /// Title.
    Title,
    /// Tags.
    Tags,
    /// Assignee.
    AssignedTo,
    /// Discussion comment.
    Comment,
}

/// One field change within an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPatch {
    /// Add or replace.
    pub op: FieldOp,
    /// Field to change.
    pub field: UpdateField,
    /// New value.
    pub value: String,
}

/// Patch describing changes to a single work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    work_item_id: WorkItemId,
    existing: ExistingFields,
    tags: Option<TagSet>,
    assigned_to: Option<String>,
    title: Option<String>,
    state: Option<TargetState>,
    comment: Option<String>,
}

impl UpdateRequest {
    /// Creates an empty update for `work_item_id` against the fields that
    /// were present when the item was read.
    #[must_use]
    pub const fn new(work_item_id: WorkItemId, existing: ExistingFields) -> Self {
        Self {
            work_item_id,
            existing,
            tags: None,
            assigned_to: None,
            title: None,
            state: None,
            comment: None,
        }
    }

    /// Sets new tags.
    #[must_use]
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Sets a new assignee.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Requests a state transition.
    #[must_use]
    pub const fn with_state(mut self, state: TargetState) -> Self {
        self.state = Some(state);
        self
    }

    /// Posts a comment alongside the update.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns the target work item.
    #[must_use]
    pub const fn work_item_id(&self) -> WorkItemId {
        self.work_item_id
    }

    /// Returns the existing-fields snapshot.
    #[must_use]
    pub const fn existing_fields(&self) -> ExistingFields {
        self.existing
    }

    /// Returns the new tags, if any.
    #[must_use]
    pub const fn tags(&self) -> Option<&TagSet> {
        self.tags.as_ref()
    }

    /// Returns the new assignee, if any.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns the new title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the requested state, if any.
    #[must_use]
    pub const fn state(&self) -> Option<TargetState> {
        self.state
    }

    /// Returns the comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns `true` when the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tags.is_none()
            && self.assigned_to.is_none()
            && self.title.is_none()
            && self.state.is_none()
            && self.comment.is_none()
    }

    /// Lists the field changes in wire order: state, title, tags,
    /// assignee, comment.
    ///
    /// State is always replaced and comments are always added; the other
    /// fields are replaced when present in the existing-fields snapshot.
    #[must_use]
    pub fn operations(&self) -> Vec<FieldPatch> {
        let mut operations = Vec::new();
        if let Some(state) = self.state {
            operations.push(FieldPatch {
                op: FieldOp::Replace,
                field: UpdateField::State,
                value: state.as_str().to_owned(),
            });
        }
        if let Some(title) = &self.title {
            operations.push(FieldPatch {
                op: FieldOp::for_presence(self.existing.title),
                field: UpdateField::Title,
                value: title.clone(),
            });
        }
        if let Some(tags) = &self.tags {
            operations.push(FieldPatch {
                op: FieldOp::for_presence(self.existing.tags),
                field: UpdateField::Tags,
                value: tags.to_wire(),
            });
        }
        if let Some(assigned_to) = &self.assigned_to {
            operations.push(FieldPatch {
                op: FieldOp::for_presence(self.existing.assigned_to),
                field: UpdateField::AssignedTo,
                value: assigned_to.clone(),
            });
        }
        if let Some(comment) = &self.comment {
            operations.push(FieldPatch {
                op: FieldOp::Add,
                field: UpdateField::Comment,
                value: comment.clone(),
            });
        }
        operations
    }
}

//! Domain model for post-merge triage.
//!
//! Work items, pull requests and update requests are strongly typed here;
//! wire field names are mapped onto these types by the transport adapter so
//! nothing in this module touches raw key-value documents.

mod branch;
mod discovery;
mod error;
mod ids;
mod pull_request;
mod subtask;
mod tally;
mod text;
mod update;
mod work_item;

pub use branch::MonitoredBranch;
pub use discovery::TesterDiscovery;
pub use error::{TriageDomainError, UnresolvablePullRequest};
pub use ids::{PullRequestId, WorkItemId};
pub use pull_request::{MergeStatus, PullRequest, UserIdentity};
pub use subtask::{NewTaskRequest, PlanningFields};
pub use tally::CycleTally;
pub use text::{TagSet, add_tag, extract_domain_user};
pub use update::{ExistingFields, FieldOp, FieldPatch, TargetState, UpdateField, UpdateRequest};
pub use work_item::{
    Activity, FreeTextFields, Relation, RelationKind, WorkItem, WorkItemState, WorkItemType,
};

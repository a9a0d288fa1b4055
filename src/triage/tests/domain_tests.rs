//! Tests for identifiers, branches, relations and update requests.

use super::support::{child_link, id};
use crate::triage::domain::{
    ExistingFields, FieldOp, FieldPatch, MonitoredBranch, PullRequestId, Relation, RelationKind,
    TagSet, TargetState, TriageDomainError, UpdateField, UpdateRequest, WorkItemId,
    WorkItemState, WorkItemType,
};
use rstest::rstest;

#[rstest]
#[case("42", 42)]
#[case(" 123456 ", 123_456)]
fn work_item_id_parses_positive_integers(#[case] text: &str, #[case] expected: u32) {
    let parsed = WorkItemId::parse(text).expect("valid identifier");
    assert_eq!(parsed.value(), expected);
}

#[rstest]
#[case("0")]
#[case("-4")]
#[case("abc")]
#[case("")]
fn work_item_id_rejects_invalid_text(#[case] text: &str) {
    assert!(matches!(
        WorkItemId::parse(text),
        Err(TriageDomainError::InvalidWorkItemId(_))
    ));
}

#[test]
fn pull_request_id_is_trimmed_and_required() {
    let parsed = PullRequestId::new("  981 ").expect("valid identifier");

    assert_eq!(parsed.as_str(), "981");
    assert_eq!(
        PullRequestId::new("   "),
        Err(TriageDomainError::EmptyPullRequestId)
    );
}

#[test]
fn monitored_branch_entry_expands_each_branch() {
    let branches = MonitoredBranch::parse_entry("Shop[ develop , release/2.1 ]")
        .expect("valid repository entry");

    assert_eq!(
        branches,
        vec![
            MonitoredBranch::new("Shop", "develop"),
            MonitoredBranch::new("Shop", "release/2.1"),
        ]
    );
    assert_eq!(
        branches.last().map(MonitoredBranch::ref_name).as_deref(),
        Some("refs/heads/release/2.1")
    );
}

#[rstest]
#[case("Shop")]
#[case("[develop]")]
#[case("Shop[]")]
#[case("Shop[develop")]
fn monitored_branch_entry_rejects_malformed_text(#[case] entry: &str) {
    assert!(matches!(
        MonitoredBranch::parse_entry(entry),
        Err(TriageDomainError::InvalidMonitoredBranch(_))
    ));
}

#[rstest]
#[case("https://tracker/_apis/wit/workItems/123456", Some(123_456))]
#[case("https://tracker/_apis/wit/workItems/77/", Some(77))]
#[case("https://tracker/_apis/wit/workItems/abc", None)]
#[case("no-slashes", None)]
fn relation_target_id_reads_trailing_segment(#[case] url: &str, #[case] expected: Option<u32>) {
    let relation = Relation::new(RelationKind::HierarchyForward, url);
    assert_eq!(relation.target_id().map(WorkItemId::value), expected);
}

#[test]
fn only_hierarchy_forward_relations_are_child_links() {
    let parent = Relation::new(
        RelationKind::from_wire("System.LinkTypes.Hierarchy-Reverse"),
        "https://tracker/_apis/wit/workItems/5",
    );

    assert!(child_link(6).is_child_link());
    assert!(!parent.is_child_link());
}

#[rstest]
#[case("Product Backlog Item", true)]
#[case("Bug", true)]
#[case("Task", false)]
#[case("Feature", false)]
fn only_backlog_items_and_bugs_are_triaged(#[case] wire: &str, #[case] triaged: bool) {
    assert_eq!(WorkItemType::from_wire(wire).is_triaged(), triaged);
}

#[rstest]
#[case("Done", true)]
#[case("Removed", true)]
#[case("To Do", false)]
#[case("In Progress", false)]
#[case("Committed", false)]
fn closed_states_are_done_and_removed(#[case] wire: &str, #[case] closed: bool) {
    assert_eq!(WorkItemState::from_wire(wire).is_closed(), closed);
}

#[test]
fn update_operations_follow_field_presence() {
    let existing = ExistingFields {
        title: true,
        tags: true,
        assigned_to: false,
    };
    let request = UpdateRequest::new(id(17), existing)
        .with_tags(TagSet::parse("UI; Ready For Test"))
        .with_assigned_to("CORP\\qa.lead")
        .with_comment("Merged");

    assert_eq!(
        request.operations(),
        vec![
            FieldPatch {
                op: FieldOp::Replace,
                field: UpdateField::Tags,
                value: "UI; Ready For Test".to_owned(),
            },
            FieldPatch {
                op: FieldOp::Add,
                field: UpdateField::AssignedTo,
                value: "CORP\\qa.lead".to_owned(),
            },
            FieldPatch {
                op: FieldOp::Add,
                field: UpdateField::Comment,
                value: "Merged".to_owned(),
            },
        ]
    );
}

#[test]
fn state_transition_is_always_a_replace() {
    let request = UpdateRequest::new(id(3), ExistingFields::default()).with_state(TargetState::Done);

    assert_eq!(
        request.operations(),
        vec![FieldPatch {
            op: FieldOp::Replace,
            field: UpdateField::State,
            value: "Done".to_owned(),
        }]
    );
}

#[test]
fn new_update_request_is_empty() {
    assert!(UpdateRequest::new(id(3), ExistingFields::default()).is_empty());
}

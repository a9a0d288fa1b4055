//! Given steps for ready-for-test BDD scenarios.

use super::world::TriageWorld;
use qa_triage::triage::domain::{
    Activity, FreeTextFields, Relation, RelationKind, WorkItem, WorkItemId, WorkItemState,
    WorkItemType,
};
use rstest_bdd_macros::given;

#[given(r#"a "{item_type}" work item {id:u32} in state "{state}""#)]
fn work_item(
    world: &mut TriageWorld,
    item_type: String,
    id: u32,
    state: String,
) -> Result<(), eyre::Report> {
    let item = WorkItem::new(
        WorkItemId::new(id)?,
        WorkItemType::from_wire(&item_type),
        WorkItemState::from_wire(&state),
        format!("Scenario item {id}"),
    );
    world.pending_items.insert(id, item);
    Ok(())
}

#[given(r#"work item {id:u32} is tagged "{tag}""#)]
fn work_item_tagged(world: &mut TriageWorld, id: u32, tag: String) -> Result<(), eyre::Report> {
    let item = world.pending_item(id)?;
    let tags = item.tags().with_tag(&tag);
    *item = item.clone().with_tags(tags);
    Ok(())
}

#[given(r#"work item {id:u32} has acceptance criteria "{text}""#)]
fn work_item_acceptance_criteria(
    world: &mut TriageWorld,
    id: u32,
    text: String,
) -> Result<(), eyre::Report> {
    let item = world.pending_item(id)?;
    *item = item.clone().with_text(FreeTextFields {
        acceptance_criteria: Some(text),
        ..FreeTextFields::default()
    });
    Ok(())
}

#[given(
    r#"work item {parent:u32} has a "{activity}" task {task:u32} in state "{state}" assigned to "{assignee}""#
)]
fn work_item_task(
    world: &mut TriageWorld,
    parent: u32,
    activity: String,
    task: u32,
    state: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let child = WorkItem::new(
        WorkItemId::new(task)?,
        WorkItemType::Task,
        WorkItemState::from_wire(&state),
        format!("Task {task}"),
    )
    .with_activity(Activity::from_wire(&activity))
    .with_assigned_to(assignee);
    world.tracker.insert_work_item(child)?;

    let item = world.pending_item(parent)?;
    *item = item.clone().with_relation(Relation::new(
        RelationKind::HierarchyForward,
        format!("https://tracker.example.com/tfs/Collection/_apis/wit/workItems/{task}"),
    ));
    Ok(())
}

//! Then steps for ready-for-test BDD scenarios.

use super::world::{TriageWorld, run_async};
use qa_triage::triage::{
    domain::{PullRequestId, TargetState, WorkItemId},
    ports::ProcessedLog,
};
use rstest_bdd_macros::then;

#[then(r#"work item {id:u32} gains the "{tag}" tag"#)]
fn work_item_gains_tag(world: &TriageWorld, id: u32, tag: String) -> Result<(), eyre::Report> {
    let update = world.only_update_for(id)?;
    let tagged = update.tags().is_some_and(|tags| tags.contains(&tag));
    if !tagged {
        return Err(eyre::eyre!(
            "expected work item {id} to be tagged {tag}, update was {update:?}"
        ));
    }
    Ok(())
}

#[then(r#"work item {id:u32} is assigned to "{assignee}""#)]
fn work_item_is_assigned(
    world: &TriageWorld,
    id: u32,
    assignee: String,
) -> Result<(), eyre::Report> {
    let update = world.only_update_for(id)?;
    if update.assigned_to() != Some(assignee.as_str()) {
        return Err(eyre::eyre!(
            "expected work item {id} to be assigned to {assignee}, found {:?}",
            update.assigned_to()
        ));
    }
    Ok(())
}

#[then(r#"work item {id:u32} is moved to "{state}""#)]
fn work_item_is_moved(world: &TriageWorld, id: u32, state: String) -> Result<(), eyre::Report> {
    let update = world.only_update_for(id)?;
    let moved_to = update.state().map(TargetState::as_str);
    if moved_to != Some(state.as_str()) {
        return Err(eyre::eyre!(
            "expected work item {id} to move to {state}, found {moved_to:?}"
        ));
    }
    Ok(())
}

#[then(r#"work item {id:u32} keeps its tags and assignee"#)]
fn work_item_keeps_fields(world: &TriageWorld, id: u32) -> Result<(), eyre::Report> {
    let update = world.only_update_for(id)?;
    if update.tags().is_some() || update.assigned_to().is_some() {
        return Err(eyre::eyre!(
            "expected work item {id} to keep tags and assignee, update was {update:?}"
        ));
    }
    Ok(())
}

#[then(r#"no update is sent for work item {id:u32}"#)]
fn no_update_sent(world: &TriageWorld, id: u32) -> Result<(), eyre::Report> {
    let updates = world.updates_for(id)?;
    if !updates.is_empty() {
        return Err(eyre::eyre!(
            "expected no update for work item {id}, found {updates:?}"
        ));
    }
    Ok(())
}

#[then(r#"pull request "{id}" is marked processed"#)]
fn pull_request_marked(world: &TriageWorld, id: String) -> Result<(), eyre::Report> {
    let processed = run_async(world.processed.is_processed(&PullRequestId::new(id.as_str())?))?;
    if !processed {
        return Err(eyre::eyre!("expected pull request {id} to be marked processed"));
    }
    Ok(())
}

#[then(r#"work item {id:u32} was fetched {count:usize} time"#)]
fn work_item_fetch_count(
    world: &TriageWorld,
    id: u32,
    count: usize,
) -> Result<(), eyre::Report> {
    let fetched = world.tracker.work_item_fetch_count(WorkItemId::new(id)?)?;
    if fetched != count {
        return Err(eyre::eyre!(
            "expected work item {id} to be fetched {count} time(s), found {fetched}"
        ));
    }
    Ok(())
}

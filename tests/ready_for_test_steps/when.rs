//! When steps for ready-for-test BDD scenarios.

use super::world::{TriageWorld, run_async};
use eyre::WrapErr;
use qa_triage::triage::domain::{
    MergeStatus, MonitoredBranch, PullRequest, PullRequestId, UserIdentity,
};
use rstest_bdd_macros::when;

#[when(r#"pull request "{id}" linking "{items}" merges into "{branch}""#)]
fn pull_request_merges(
    world: &mut TriageWorld,
    id: String,
    items: String,
    branch: String,
) -> Result<(), eyre::Report> {
    for item in std::mem::take(&mut world.pending_items).into_values() {
        world.tracker.insert_work_item(item)?;
    }
    let pull_request = PullRequest::new(
        PullRequestId::new(id.as_str())?,
        UserIdentity::new("Dana Dev", "CORP\\dana"),
        MergeStatus::Succeeded,
        "refs/heads/feature/scenario",
    )
    .with_merge_commit_message(format!("Merged PR {id}\n\nRelated work items: {items}"));
    world
        .tracker
        .add_pull_request(&MonitoredBranch::new("Shop", branch.as_str()), pull_request)?;

    let service = world.service_for(&branch);
    run_async(service.run_pass()).wrap_err("run triage pass")?;
    Ok(())
}

#[when("the triage pass runs again")]
fn triage_pass_runs_again(world: &mut TriageWorld) -> Result<(), eyre::Report> {
    let service = world
        .service
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no triage pass has run yet"))?;
    run_async(service.run_pass()).wrap_err("rerun triage pass")?;
    Ok(())
}

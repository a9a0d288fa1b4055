//! Shared world state for ready-for-test BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::DefaultClock;
use qa_triage::config::Settings;
use qa_triage::triage::{
    adapters::memory::{InMemoryProcessedLog, InMemoryTracker},
    domain::{MonitoredBranch, UpdateRequest, WorkItem, WorkItemId},
    services::CycleService,
};
use rstest::fixture;

const SETTINGS: &str = r#"
base_url = "https://tracker.example.com/tfs/Collection"
project = "Shop"
repositories = ["Shop[develop]"]
default_tester = "CORP\\qa.lead"
default_domain = "CORP"
"#;

/// Cycle service type used by the BDD world.
pub type TestCycleService = CycleService<InMemoryTracker, InMemoryProcessedLog, DefaultClock>;

/// Scenario world for ready-for-test behaviour tests.
pub struct TriageWorld {
    pub tracker: Arc<InMemoryTracker>,
    pub processed: Arc<InMemoryProcessedLog>,
    pub settings: Arc<Settings>,
    pub pending_items: BTreeMap<u32, WorkItem>,
    pub service: Option<TestCycleService>,
}

impl TriageWorld {
    /// Creates a world with an empty tracker and processed log.
    ///
    /// # Panics
    ///
    /// Panics when the embedded settings are invalid.
    #[must_use]
    #[expect(clippy::expect_used, reason = "scenario settings are a literal")]
    pub fn new() -> Self {
        let settings = Settings::from_toml_str(SETTINGS).expect("scenario settings are valid");
        Self {
            tracker: Arc::new(InMemoryTracker::new()),
            processed: Arc::new(InMemoryProcessedLog::new()),
            settings: Arc::new(settings),
            pending_items: BTreeMap::new(),
            service: None,
        }
    }

    /// Returns the cycle service for `branch`, building it on first use.
    pub fn service_for(&mut self, branch: &str) -> &TestCycleService {
        let tracker = Arc::clone(&self.tracker);
        let processed = Arc::clone(&self.processed);
        let settings = Arc::clone(&self.settings);
        self.service.get_or_insert_with(|| {
            CycleService::new(
                MonitoredBranch::new("Shop", branch),
                tracker,
                processed,
                Arc::new(DefaultClock),
                settings,
            )
        })
    }

    /// Returns the pending item with `id`.
    pub fn pending_item(&mut self, id: u32) -> Result<&mut WorkItem, eyre::Report> {
        self.pending_items
            .get_mut(&id)
            .ok_or_else(|| eyre::eyre!("work item {id} was not declared in the scenario"))
    }

    /// Returns the updates sent for work item `id`.
    pub fn updates_for(&self, id: u32) -> Result<Vec<UpdateRequest>, eyre::Report> {
        let wanted = WorkItemId::new(id)?;
        Ok(self
            .tracker
            .applied_updates()?
            .into_iter()
            .filter(|update| update.work_item_id() == wanted)
            .collect())
    }

    /// Returns the single update sent for work item `id`.
    pub fn only_update_for(&self, id: u32) -> Result<UpdateRequest, eyre::Report> {
        let mut updates = self.updates_for(id)?;
        match (updates.pop(), updates.is_empty()) {
            (Some(update), true) => Ok(update),
            (None, _) => Err(eyre::eyre!("no update was sent for work item {id}")),
            (Some(_), false) => Err(eyre::eyre!("several updates were sent for work item {id}")),
        }
    }
}

impl Default for TriageWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TriageWorld {
    TriageWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

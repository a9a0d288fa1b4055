//! Discovers who should test a work item.

use crate::config::Settings;
use crate::triage::{
    domain::{Activity, TesterDiscovery, WorkItem, extract_domain_user},
    ports::{TrackerResult, WorkItemTracker},
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

#[expect(clippy::expect_used, reason = "literal pattern is covered by tests")]
static TESTED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)test(?:ed)? by[:\-\s]*(?:&nbsp;)?\s*(?P<name>[A-Za-z\\]+)")
        .expect("valid tester pattern")
});

/// Finds the tester for a work item.
///
/// Free text is consulted first ("tested by NAME" in acceptance criteria,
/// system info, then description). A name is used when an alias matches it
/// or when it already carries the default domain prefix. Otherwise the
/// item's direct child tasks are inspected: a single open assigned task
/// names the tester, and any open development task blocks evaluation.
pub struct TesterDiscoveryService<T>
where
    T: WorkItemTracker,
{
    tracker: Arc<T>,
    settings: Arc<Settings>,
}

impl<T> Clone for TesterDiscoveryService<T>
where
    T: WorkItemTracker,
{
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<T> TesterDiscoveryService<T>
where
    T: WorkItemTracker,
{
    /// Creates a discovery service.
    #[must_use]
    pub const fn new(tracker: Arc<T>, settings: Arc<Settings>) -> Self {
        Self { tracker, settings }
    }

    /// Determines the tester for `item`.
    ///
    /// # Errors
    ///
    /// Returns a tracker error when a linked child cannot be fetched.
    pub async fn discover(&self, item: &WorkItem) -> TrackerResult<TesterDiscovery> {
        if let Some(name) = tester_from_text(item)
            && let Some(account) = self.account_for(&name)
        {
            return Ok(TesterDiscovery::Found(account));
        }
        self.tester_from_children(item).await
    }

    fn account_for(&self, name: &str) -> Option<String> {
        let lowered = name.to_lowercase();
        if let Some(alias) = self
            .settings
            .tester_mapping
            .iter()
            .find(|alias| lowered.contains(&alias.name.to_lowercase()))
        {
            return Some(alias.account.clone());
        }

        let domain = &self.settings.default_domain;
        if name.starts_with(domain.as_str()) {
            info!(tester = name, "using tester named in the work item");
            return Some(name.to_owned());
        }
        info!(
            tester = name,
            default_domain = %domain,
            "ignoring tester named in the work item, it lacks the default domain"
        );
        None
    }

    async fn tester_from_children(&self, item: &WorkItem) -> TrackerResult<TesterDiscovery> {
        let mut candidates = Vec::new();
        for relation in item.child_links() {
            let Some(child) = self.tracker.fetch_related(relation).await? else {
                debug!(url = relation.url(), "linked item not found");
                continue;
            };
            if !child.is_open_task() {
                continue;
            }
            let Some(assignee) = child.assigned_to() else {
                continue;
            };
            let account =
                extract_domain_user(assignee, true).unwrap_or_else(|| assignee.trim().to_owned());
            if child.activity() == Some(&Activity::Development) {
                info!(
                    work_item = %item.id(),
                    task = %child.id(),
                    developer = %account,
                    "development task still open"
                );
                return Ok(TesterDiscovery::Blocked { developer: account });
            }
            candidates.push(account);
        }

        match candidates.as_slice() {
            [single] => {
                info!(tester = %single, "found the only open task assignee");
                Ok(TesterDiscovery::Found(single.clone()))
            }
            [] => {
                debug!(work_item = %item.id(), "no open assigned child tasks");
                Ok(TesterDiscovery::NotFound)
            }
            many => {
                info!(
                    work_item = %item.id(),
                    count = many.len(),
                    "several open task assignees, cannot pick a tester"
                );
                Ok(TesterDiscovery::NotFound)
            }
        }
    }
}

/// Returns the first "tested by" name found in the item's free text.
fn tester_from_text(item: &WorkItem) -> Option<String> {
    item.text().in_search_order().find_map(|text| {
        TESTED_BY
            .captures(text)
            .and_then(|captures| captures.name("name"))
            .map(|name| name.as_str().to_owned())
    })
}

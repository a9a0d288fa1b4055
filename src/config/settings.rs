//! Validated settings and their TOML schema.

use super::ConfigError;
use crate::triage::domain::MonitoredBranch;
use camino::{Utf8Path, Utf8PathBuf};
use minijinja::Environment;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable overriding `access_token`.
pub const ACCESS_TOKEN_ENV: &str = "QA_TRIAGE_TOKEN";

const ALL_SENTINEL: &str = "all";
const DEFAULT_READY_FOR_TEST_TAG: &str = "Ready For Test";
const DEFAULT_NON_TESTABLE_TAG: &str = "Non-Testable";
const DEFAULT_PROCESSED_LOG: &str = "processed.txt";
const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_INTERVAL_MINUTES: f64 = 5.0;
const DEFAULT_COMMENT_TEMPLATE: &str =
    "Merged into {{ branch }} with pull request {{ pull_request_id }} by {{ creator }}.";

/// Case-insensitive alias mapping a name found in free text to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesterAlias {
    /// Substring searched for in the captured tester name.
    pub name: String,
    /// Domain-qualified account assigned when the alias matches.
    pub account: String,
}

impl TesterAlias {
    /// Parses a `name:DOMAIN\account` entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TesterMapping`] unless the entry splits into
    /// exactly two non-empty parts on `:`.
    pub fn parse(entry: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [name, account] if !name.is_empty() && !account.is_empty() => Ok(Self {
                name: (*name).to_owned(),
                account: (*account).to_owned(),
            }),
            _ => Err(ConfigError::TesterMapping(entry.to_owned())),
        }
    }
}

/// Pull request creators whose merges are triaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedCreators {
    /// Every creator.
    All,
    /// Only the listed domain-qualified unique names.
    Only(Vec<String>),
}

impl AllowedCreators {
    fn from_entries(entries: Vec<String>) -> Self {
        if entries
            .iter()
            .any(|entry| entry.trim().eq_ignore_ascii_case(ALL_SENTINEL))
        {
            return Self::All;
        }
        Self::Only(entries.into_iter().map(|entry| entry.trim().to_owned()).collect())
    }

    /// Returns `true` when pull requests by `unique_name` are triaged.
    #[must_use]
    pub fn permits(&self, unique_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|name| name.eq_ignore_ascii_case(unique_name)),
        }
    }
}

/// How many pull requests to request per listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// Omit the limit.
    All,
    /// Request at most this many.
    Top(u32),
}

/// Comment posted on readied items when a monitored branch matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNotification {
    /// Branch name (without `refs/heads/`) whose merges trigger a comment.
    pub branch: String,
    /// Plain text prepended to the rendered comment.
    pub prefix: String,
    /// `minijinja` template with `pull_request_id`, `branch`, `creator`,
    /// `tester` and `work_item_id` in scope.
    pub template: String,
}

impl CommentNotification {
    /// Returns `true` when merges into `branch` trigger the comment.
    #[must_use]
    pub fn applies_to(&self, branch: &str) -> bool {
        let wanted = self.branch.trim_start_matches("refs/heads/");
        branch.trim_start_matches("refs/heads/").eq_ignore_ascii_case(wanted)
    }
}

/// Developer whose open parents receive sub-tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperEntry {
    /// Account the parents are assigned to.
    pub user: String,
    /// Team tag added to each parent, if any.
    pub team_tag: Option<String>,
}

impl DeveloperEntry {
    /// Parses a `user` or `user:team tag` entry.
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        let trimmed = entry.trim();
        match trimmed.split_once(':') {
            Some((user, tag)) => {
                let tag = tag.trim();
                Self {
                    user: user.trim().to_owned(),
                    team_tag: (!tag.is_empty()).then(|| tag.to_owned()),
                }
            }
            None => Self {
                user: trimmed.to_owned(),
                team_tag: None,
            },
        }
    }
}

/// Sub-task creation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskSettings {
    /// Developers whose parents receive sub-tasks.
    pub developers: Vec<DeveloperEntry>,
    /// Accounts allowed to own the QA task of parents they created.
    pub qa_team: Vec<String>,
}

/// Immutable runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Tracking service collection URL without trailing slash.
    pub base_url: String,
    /// Project name.
    pub project: String,
    /// Personal access token, if any.
    pub access_token: Option<String>,
    /// Repository branches whose merges are triaged.
    pub monitored_branches: Vec<MonitoredBranch>,
    /// Pause between polling iterations.
    pub update_interval: Duration,
    /// Tag marking an item ready for test.
    pub ready_for_test_tag: String,
    /// Tag marking an item as closing without QA.
    pub non_testable_tag: String,
    /// Account assigned when no tester is discovered.
    pub default_tester: Option<String>,
    /// Prefix a free-text tester name must start with to be used verbatim.
    pub default_domain: String,
    /// Name aliases, checked in order.
    pub tester_mapping: Vec<TesterAlias>,
    /// Creators whose pull requests are triaged.
    pub allowed_creators: AllowedCreators,
    /// Case-insensitive title substrings that exclude an item.
    pub titles_to_skip: Vec<String>,
    /// Optional comment on readied items.
    pub notification: Option<CommentNotification>,
    /// Pull request listing page size.
    pub pull_requests_to_take: PageSize,
    /// Location of the processed pull request log.
    pub processed_log: Utf8PathBuf,
    /// Sub-task creation, when enabled.
    pub subtasks: Option<SubtaskSettings>,
}

impl Settings {
    /// Loads settings from a TOML file, applying the
    /// [`ACCESS_TOKEN_ENV`] override.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or any value
    /// is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut settings = Self::from_toml_str(&content)?;
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            settings.access_token = non_empty(token);
        }
        Ok(settings)
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when any value is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = toml::from_str(content)?;
        raw.validate()
    }

    /// Returns the default tester, if configured.
    #[must_use]
    pub fn default_tester(&self) -> Option<&str> {
        self.default_tester.as_deref()
    }

    /// Returns the title fragment from `titles_to_skip` that `title`
    /// contains, ignoring case.
    #[must_use]
    pub fn skipped_title_fragment(&self, title: &str) -> Option<&str> {
        let lowered = title.to_lowercase();
        self.titles_to_skip
            .iter()
            .find(|fragment| lowered.contains(&fragment.to_lowercase()))
            .map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    base_url: String,
    project: String,
    #[serde(default)]
    access_token: Option<String>,
    repositories: Vec<String>,
    #[serde(default = "default_interval_minutes")]
    update_interval_minutes: f64,
    #[serde(default = "default_ready_for_test_tag")]
    ready_for_test_tag: String,
    #[serde(default = "default_non_testable_tag")]
    non_testable_tag: String,
    #[serde(default)]
    default_tester: String,
    #[serde(default)]
    default_domain: String,
    #[serde(default)]
    tester_mapping: Vec<String>,
    #[serde(default = "default_allowed_creators")]
    allowed_creators: Vec<String>,
    #[serde(default)]
    titles_to_skip: Vec<String>,
    #[serde(default)]
    notify_branch: Option<String>,
    #[serde(default)]
    comment_prefix: String,
    #[serde(default = "default_comment_template")]
    comment_template: String,
    #[serde(default)]
    pull_requests_to_take: Option<RawPageSize>,
    #[serde(default = "default_processed_log")]
    processed_log: String,
    #[serde(default)]
    subtasks: Option<RawSubtasks>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPageSize {
    Count(i64),
    Keyword(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSubtasks {
    developers: Vec<String>,
    #[serde(default)]
    qa_team: Vec<String>,
}

const fn default_interval_minutes() -> f64 {
    DEFAULT_INTERVAL_MINUTES
}

fn default_ready_for_test_tag() -> String {
    DEFAULT_READY_FOR_TEST_TAG.to_owned()
}

fn default_non_testable_tag() -> String {
    DEFAULT_NON_TESTABLE_TAG.to_owned()
}

fn default_allowed_creators() -> Vec<String> {
    vec![ALL_SENTINEL.to_owned()]
}

fn default_comment_template() -> String {
    DEFAULT_COMMENT_TEMPLATE.to_owned()
}

fn default_processed_log() -> String {
    DEFAULT_PROCESSED_LOG.to_owned()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn required(value: String, name: &'static str) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::Missing(name))
}

impl RawSettings {
    fn validate(self) -> Result<Settings, ConfigError> {
        let base_url = required(self.base_url, "base_url")?
            .trim_end_matches('/')
            .to_owned();
        let project = required(self.project, "project")?;

        let mut monitored_branches = Vec::new();
        for entry in &self.repositories {
            let branches = MonitoredBranch::parse_entry(entry)
                .map_err(|_| ConfigError::Repository(entry.clone()))?;
            monitored_branches.extend(branches);
        }
        if monitored_branches.is_empty() {
            return Err(ConfigError::Missing("repositories"));
        }

        let update_interval = interval_from_minutes(self.update_interval_minutes)?;
        let tester_mapping = self
            .tester_mapping
            .iter()
            .map(|entry| TesterAlias::parse(entry))
            .collect::<Result<Vec<_>, _>>()?;

        let notification = match self.notify_branch.and_then(non_empty) {
            Some(branch) => {
                Environment::new()
                    .template_from_str(&self.comment_template)
                    .map_err(|err| ConfigError::Template(err.to_string()))?;
                Some(CommentNotification {
                    branch,
                    prefix: self.comment_prefix,
                    template: self.comment_template,
                })
            }
            None => None,
        };

        let subtasks = self.subtasks.map(|raw| SubtaskSettings {
            developers: raw
                .developers
                .iter()
                .map(|entry| DeveloperEntry::parse(entry))
                .filter(|developer| !developer.user.is_empty())
                .collect(),
            qa_team: raw
                .qa_team
                .into_iter()
                .filter_map(non_empty)
                .collect(),
        });

        Ok(Settings {
            base_url,
            project,
            access_token: self.access_token.and_then(non_empty),
            monitored_branches,
            update_interval,
            ready_for_test_tag: required(self.ready_for_test_tag, "ready_for_test_tag")?,
            non_testable_tag: required(self.non_testable_tag, "non_testable_tag")?,
            default_tester: non_empty(self.default_tester),
            default_domain: self.default_domain.trim().to_owned(),
            tester_mapping,
            allowed_creators: AllowedCreators::from_entries(self.allowed_creators),
            titles_to_skip: self.titles_to_skip.into_iter().filter_map(non_empty).collect(),
            notification,
            pull_requests_to_take: page_size(self.pull_requests_to_take)?,
            processed_log: Utf8PathBuf::from(self.processed_log),
            subtasks,
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "the interval is configured in fractional minutes"
)]
fn interval_from_minutes(minutes: f64) -> Result<Duration, ConfigError> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(ConfigError::Interval(minutes));
    }
    Duration::try_from_secs_f64(minutes * 60.0).map_err(|_| ConfigError::Interval(minutes))
}

fn page_size(raw: Option<RawPageSize>) -> Result<PageSize, ConfigError> {
    match raw {
        None => Ok(PageSize::Top(DEFAULT_PAGE_SIZE)),
        Some(RawPageSize::Count(count)) => u32::try_from(count)
            .ok()
            .filter(|value| *value > 0)
            .map(PageSize::Top)
            .ok_or_else(|| ConfigError::PageSize(count.to_string())),
        Some(RawPageSize::Keyword(keyword)) => {
            let trimmed = keyword.trim();
            if trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
                return Ok(PageSize::All);
            }
            trimmed
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .map(PageSize::Top)
                .ok_or_else(|| ConfigError::PageSize(keyword))
        }
    }
}

//! Text extraction helpers and the work item tag set.

use serde::{Deserialize, Serialize};

/// Separator the tracking service uses between tags on the wire.
const TAG_SEPARATOR: &str = "; ";

/// Appends `new_tag` to a semicolon-delimited tag string.
///
/// Returns `tags` unchanged when `new_tag` already occurs in it as a
/// substring, so applying the same tag twice equals applying it once.
///
/// # Examples
///
///     use qa_triage::triage::domain::add_tag;
///
///     assert_eq!(add_tag("", "Ready For Test"), "Ready For Test");
///     assert_eq!(add_tag("A", "B"), "A; B");
#[must_use]
pub fn add_tag(tags: &str, new_tag: &str) -> String {
    if tags.contains(new_tag) {
        return tags.to_owned();
    }
    if tags.trim().is_empty() {
        return new_tag.to_owned();
    }
    format!("{tags}{TAG_SEPARATOR}{new_tag}")
}

/// Extracts a user from an `Display Name <DOMAIN\name>` annotation.
///
/// With `want_domain_part` the bracketed account is returned, otherwise the
/// trimmed text preceding the bracket. Returns `None` when the text has no
/// non-empty bracketed annotation.
///
/// # Examples
///
///     use qa_triage::triage::domain::extract_domain_user;
///
///     let assignee = r"Bob Stone <CORP\bob>";
///     assert_eq!(extract_domain_user(assignee, true).as_deref(), Some(r"CORP\bob"));
///     assert_eq!(extract_domain_user(assignee, false).as_deref(), Some("Bob Stone"));
#[must_use]
pub fn extract_domain_user(text: &str, want_domain_part: bool) -> Option<String> {
    let (display, rest) = text.split_once('<')?;
    let (account, _) = rest.split_once('>')?;
    if account.is_empty() {
        return None;
    }
    let picked = if want_domain_part {
        account
    } else {
        display.trim()
    };
    Some(picked.to_owned())
}

/// Ordered set of work item tags.
///
/// Insertion order is preserved and a token never occurs twice; tokens are
/// compared case-insensitively because the tracking service treats tags that
/// way. The wire form is the tokens joined with `"; "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Creates an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses the semicolon-delimited wire representation.
    #[must_use]
    pub fn parse(wire: &str) -> Self {
        let mut tags = Self::new();
        for token in wire.split(';').map(str::trim).filter(|token| !token.is_empty()) {
            if !tags.contains(token) {
                tags.0.push(token.to_owned());
            }
        }
        tags
    }

    /// Returns `true` when the set holds `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        let wanted = tag.trim();
        self.0.iter().any(|token| token.eq_ignore_ascii_case(wanted))
    }

    /// Returns a copy of the set with `tag` appended unless already held.
    #[must_use]
    pub fn with_tag(&self, tag: &str) -> Self {
        let mut tags = self.clone();
        let token = tag.trim();
        if !token.is_empty() && !tags.contains(token) {
            tags.0.push(token.to_owned());
        }
        tags
    }

    /// Returns `true` when the set holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the tags in insertion order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Produces the wire representation.
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.0.join(TAG_SEPARATOR)
    }
}

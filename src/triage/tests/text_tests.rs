//! Tests for tag and annotation helpers.

use crate::triage::domain::{TagSet, add_tag, extract_domain_user};
use rstest::rstest;

#[rstest]
#[case("", "Ready For Test", "Ready For Test")]
#[case("   ", "Ready For Test", "Ready For Test")]
#[case("A", "B", "A; B")]
#[case("Blocked; UI", "Ready For Test", "Blocked; UI; Ready For Test")]
#[case("Blocked; Ready For Test", "Ready For Test", "Blocked; Ready For Test")]
fn add_tag_appends_when_absent(#[case] tags: &str, #[case] tag: &str, #[case] expected: &str) {
    assert_eq!(add_tag(tags, tag), expected);
}

#[rstest]
#[case("")]
#[case("Frontend")]
#[case("Frontend; Hotfix")]
#[case("Ready For Test")]
fn add_tag_is_idempotent(#[case] tags: &str) {
    let once = add_tag(tags, "Ready For Test");
    assert_eq!(add_tag(&once, "Ready For Test"), once);
}

#[test]
fn add_tag_treats_substrings_as_present() {
    assert_eq!(add_tag("Not Ready For Testing", "Ready For Test"), "Not Ready For Testing");
}

#[rstest]
#[case("Bob Stone <CORP\\bob>", true, Some("CORP\\bob"))]
#[case("Bob Stone <CORP\\bob>", false, Some("Bob Stone"))]
#[case("  Bob Stone   <CORP\\bob>", false, Some("Bob Stone"))]
#[case("Bob Stone", true, None)]
#[case("Bob Stone <CORP\\bob", true, None)]
#[case("Bob Stone <>", true, None)]
fn extract_domain_user_reads_annotation(
    #[case] text: &str,
    #[case] want_domain_part: bool,
    #[case] expected: Option<&str>,
) {
    assert_eq!(
        extract_domain_user(text, want_domain_part).as_deref(),
        expected
    );
}

#[test]
fn tag_set_parses_trims_and_dedupes() {
    let tags = TagSet::parse(" UI ;Hotfix;; ui ; Backend");

    assert_eq!(tags.tokens(), ["UI", "Hotfix", "Backend"]);
    assert_eq!(tags.to_wire(), "UI; Hotfix; Backend");
}

#[test]
fn tag_set_matches_whole_tokens_ignoring_case() {
    let tags = TagSet::parse("Not Ready For Testing; non-testable");

    assert!(tags.contains("Non-Testable"));
    assert!(!tags.contains("Ready For Test"));
}

#[test]
fn tag_set_with_tag_keeps_existing_order() {
    let tags = TagSet::parse("Frontend").with_tag("Ready For Test");

    assert_eq!(tags.to_wire(), "Frontend; Ready For Test");
    assert_eq!(tags.with_tag("ready for test"), tags);
}

#[test]
fn empty_tag_set_has_empty_wire_form() {
    let tags = TagSet::parse("");

    assert!(tags.is_empty());
    assert_eq!(tags.to_wire(), "");
}

//! Pluggable staff-page extraction rules.
//!
//! Staff pages couple the extractor to a specific markup shape (container
//! class, heading tag, degrees class). That coupling is isolated behind the
//! [`StaffPageRule`] trait so a markup change only requires a rule update,
//! not a pipeline change.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use steeplescout_shared::{PersonRecord, UNKNOWN_INSTITUTION};
use tracing::warn;

/// Captures the institution from trailing `from <institution>` credential text.
static INSTITUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+(.*)").expect("institution regex"));

/// Split credential text into an institution, falling back to the sentinel.
///
/// `"M.Div. from Westminster Seminary"` → `"Westminster Seminary"`;
/// `"B.A."` → `"Unknown"`. A match whose capture trims to nothing (text
/// ending in a bare `from`) also falls back to the sentinel, keeping the
/// institution non-empty for every record.
pub fn split_institution(credential_text: &str) -> String {
    INSTITUTION_RE
        .captures(credential_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_INSTITUTION.to_string())
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Trait for markup-shape-specific staff record extraction.
pub trait StaffPageRule: Send + Sync {
    /// Extract all well-formed staff records from a parsed staff page.
    fn extract(&self, doc: &Html) -> Vec<PersonRecord>;

    /// Human-readable rule name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Default rule
// ---------------------------------------------------------------------------

/// Default extraction rule keyed on class markers.
///
/// Each staff member sits in a `div.staff-member` container; the name is the
/// first heading element's trimmed text and the credential text comes from a
/// `p.degrees` element. A container missing either element is skipped with a
/// warning rather than aborting the page.
pub struct ClassMarkerRule {
    container: Selector,
    heading: Selector,
    degrees: Selector,
}

impl ClassMarkerRule {
    /// Build the rule with custom selectors. Returns `None` if any selector
    /// string is invalid.
    pub fn with_selectors(container: &str, heading: &str, degrees: &str) -> Option<Self> {
        Some(Self {
            container: Selector::parse(container).ok()?,
            heading: Selector::parse(heading).ok()?,
            degrees: Selector::parse(degrees).ok()?,
        })
    }

    fn record_from(&self, container: ElementRef<'_>) -> Option<PersonRecord> {
        let name = container
            .select(&self.heading)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())?;

        let credential_text = container
            .select(&self.degrees)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())?;

        let institution = split_institution(&credential_text);

        Some(PersonRecord {
            name,
            credential_text,
            institution,
        })
    }
}

impl Default for ClassMarkerRule {
    fn default() -> Self {
        Self::with_selectors("div.staff-member", "h1, h2, h3, h4, h5, h6", "p.degrees")
            .expect("default selectors")
    }
}

impl StaffPageRule for ClassMarkerRule {
    fn extract(&self, doc: &Html) -> Vec<PersonRecord> {
        let mut records = Vec::new();

        for (index, container) in doc.select(&self.container).enumerate() {
            match self.record_from(container) {
                Some(record) => records.push(record),
                None => {
                    warn!(index, "staff container missing heading or degrees, skipping");
                }
            }
        }

        records
    }

    fn name(&self) -> &str {
        "class-marker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn institution_split_with_from() {
        assert_eq!(
            split_institution("M.Div. from Westminster Seminary"),
            "Westminster Seminary"
        );
    }

    #[test]
    fn institution_split_without_from() {
        assert_eq!(split_institution("B.A."), "Unknown");
        assert_eq!(split_institution(""), "Unknown");
    }

    #[test]
    fn institution_split_with_trailing_from() {
        assert_eq!(split_institution("M.Div. from "), "Unknown");
        assert_eq!(split_institution("M.Div. from \u{a0} "), "Unknown");
    }

    #[test]
    fn institution_captures_rest_of_text() {
        assert_eq!(
            split_institution("B.A., M.Div. from Covenant Theological Seminary, St. Louis"),
            "Covenant Theological Seminary, St. Louis"
        );
    }

    #[test]
    fn extracts_records_from_fixture() {
        let content =
            std::fs::read_to_string("../../../fixtures/html/staff.html").expect("read fixture");
        let doc = Html::parse_document(&content);

        let rule = ClassMarkerRule::default();
        let records = rule.extract(&doc);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Jane Doe");
        assert_eq!(records[0].credential_text, "D.Min. from Covenant Seminary");
        assert_eq!(records[0].institution, "Covenant Seminary");
        assert_eq!(records[1].name, "John Smith");
        assert_eq!(records[1].institution, "Unknown");
    }

    #[test]
    fn malformed_container_is_skipped() {
        let html = r#"
            <div class="staff-member">
                <h3>Complete Person</h3>
                <p class="degrees">M.Div. from Westminster Seminary</p>
            </div>
            <div class="staff-member">
                <h3>No Degrees Listed</h3>
            </div>
            <div class="staff-member">
                <p class="degrees">Th.M. from Somewhere</p>
            </div>"#;
        let doc = Html::parse_document(html);

        let rule = ClassMarkerRule::default();
        let records = rule.extract(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Complete Person");
    }

    #[test]
    fn no_containers_yields_empty() {
        let doc = Html::parse_document("<html><body><p>No staff here</p></body></html>");
        let rule = ClassMarkerRule::default();
        assert!(rule.extract(&doc).is_empty());
    }

    #[test]
    fn custom_selectors() {
        let html = r#"
            <li class="minister">
                <h2>Alice</h2>
                <span class="education">Ph.D. from Old College</span>
            </li>"#;
        let doc = Html::parse_document(html);

        let rule =
            ClassMarkerRule::with_selectors("li.minister", "h2", "span.education").unwrap();
        let records = rule.extract(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].institution, "Old College");
    }

    #[test]
    fn invalid_selector_rejected() {
        assert!(ClassMarkerRule::with_selectors("div..", "h3", "p").is_none());
    }
}

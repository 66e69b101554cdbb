//! Staff page link heuristics.
//!
//! Scans a homepage for the first anchor that looks like it points at a
//! staff/leadership page. First match in document order wins; there is no
//! ranking among candidates.

use scraper::{Html, Selector};
use url::Url;

/// Href substrings (matched case-insensitively) that mark a staff page link.
const STAFF_KEYWORDS: [&str; 4] = ["staff", "team", "leadership", "pastors"];

/// Find the first staff-page anchor in the document, resolved to an absolute
/// URL against `base`. Returns `None` when no anchor matches or the matched
/// href cannot be resolved.
pub(crate) fn first_staff_anchor(doc: &Html, base: &Url) -> Option<Url> {
    let anchor_sel = Selector::parse("a[href]").expect("anchor selector");

    for el in doc.select(&anchor_sel) {
        let href = el.value().attr("href")?;
        let lowered = href.to_lowercase();
        if STAFF_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            return resolve(href, base);
        }
    }

    None
}

/// Resolve an href to an absolute URL, joining relative hrefs against `base`.
fn resolve(href: &str, base: &Url) -> Option<Url> {
    match Url::parse(href) {
        Ok(absolute) => Some(absolute),
        Err(_) => base.join(href).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.org").unwrap()
    }

    #[test]
    fn relative_href_resolves_against_base() {
        let doc = Html::parse_document(r#"<a href="/about/staff">Our Staff</a>"#);
        let found = first_staff_anchor(&doc, &base()).unwrap();
        assert_eq!(found.as_str(), "http://example.org/about/staff");
    }

    #[test]
    fn absolute_href_is_kept() {
        let doc =
            Html::parse_document(r#"<a href="https://other.example/leadership">Leaders</a>"#);
        let found = first_staff_anchor(&doc, &base()).unwrap();
        assert_eq!(found.as_str(), "https://other.example/leadership");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let doc = Html::parse_document(r#"<a href="/Our-STAFF">Staff</a>"#);
        let found = first_staff_anchor(&doc, &base()).unwrap();
        assert_eq!(found.path(), "/Our-STAFF");
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let doc = Html::parse_document(
            r#"<a href="/about">About</a>
               <a href="/team">Team</a>
               <a href="/staff">Staff</a>"#,
        );
        let found = first_staff_anchor(&doc, &base()).unwrap();
        assert_eq!(found.path(), "/team");
    }

    #[test]
    fn keyword_matches_pastors() {
        let doc = Html::parse_document(r#"<a href="/our-pastors.html">Pastors</a>"#);
        assert!(first_staff_anchor(&doc, &base()).is_some());
    }

    #[test]
    fn no_matching_anchor_yields_none() {
        let doc = Html::parse_document(
            r#"<a href="/about">About</a><a href="/contact">Contact</a>"#,
        );
        assert!(first_staff_anchor(&doc, &base()).is_none());
    }

    #[test]
    fn homepage_fixture_finds_leadership_link() {
        let content = std::fs::read_to_string("../../../fixtures/html/homepage.html")
            .expect("read fixture");
        let doc = Html::parse_document(&content);
        let found = first_staff_anchor(&doc, &base()).unwrap();
        assert_eq!(found.as_str(), "http://example.org/leadership");
    }
}

//! Directory page parser.
//!
//! The seed directory lists organizations in a table. A row's "Website" cell
//! carries an anchor to the organization's own site:
//!
//! ```html
//! <tr>
//!   <td>First Church</td>
//!   <td>Website: <a href="http://church.example">link</a></td>
//! </tr>
//! ```

use scraper::{Html, Selector};

/// Literal marker identifying the website cell within a directory row.
const WEBSITE_MARKER: &str = "Website";

/// Extract organization site links from the directory page markup.
///
/// Walks table rows in document order; any cell whose visible text contains
/// the `"Website"` marker contributes the `href` of its first anchor.
/// Duplicates are kept and order is preserved. Rows without a marker cell
/// contribute nothing; a page with no matches yields an empty vec.
pub(crate) fn parse_org_links(body: &str) -> Vec<String> {
    let doc = Html::parse_document(body);

    let row_sel = Selector::parse("tr").expect("tr selector");
    let cell_sel = Selector::parse("td").expect("td selector");
    let anchor_sel = Selector::parse("a[href]").expect("anchor selector");

    let mut links = Vec::new();

    for row in doc.select(&row_sel) {
        for cell in row.select(&cell_sel) {
            let text: String = cell.text().collect();
            if !text.contains(WEBSITE_MARKER) {
                continue;
            }
            if let Some(anchor) = cell.select(&anchor_sel).next() {
                if let Some(href) = anchor.value().attr("href") {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_directory_fixture() {
        let content = std::fs::read_to_string("../../../fixtures/html/directory.html")
            .expect("read fixture");
        let links = parse_org_links(&content);

        assert_eq!(
            links,
            vec![
                "http://first.church.example",
                "http://second.church.example",
                "https://third.church.example/home",
            ]
        );
    }

    #[test]
    fn no_website_cells_yields_empty() {
        let html = r#"<table>
            <tr><td>First Church</td><td>Anytown</td></tr>
            <tr><td>Second Church</td><td>Elsewhere</td></tr>
        </table>"#;
        assert!(parse_org_links(html).is_empty());
    }

    #[test]
    fn marker_cell_without_anchor_contributes_nothing() {
        let html = r#"<table>
            <tr><td>Website: pending</td></tr>
            <tr><td>Website: <a href="http://a.example">link</a></td></tr>
        </table>"#;
        assert_eq!(parse_org_links(html), vec!["http://a.example"]);
    }

    #[test]
    fn first_anchor_in_cell_wins() {
        let html = r#"<table><tr><td>Website:
            <a href="http://primary.example">primary</a>
            <a href="http://secondary.example">secondary</a>
        </td></tr></table>"#;
        assert_eq!(parse_org_links(html), vec!["http://primary.example"]);
    }

    #[test]
    fn duplicates_and_order_are_preserved() {
        let html = r#"<table>
            <tr><td>Website: <a href="http://b.example">b</a></td></tr>
            <tr><td>Website: <a href="http://a.example">a</a></td></tr>
            <tr><td>Website: <a href="http://b.example">b again</a></td></tr>
        </table>"#;
        assert_eq!(
            parse_org_links(html),
            vec!["http://b.example", "http://a.example", "http://b.example"]
        );
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let html =
            r#"<table><tr><td>website: <a href="http://a.example">a</a></td></tr></table>"#;
        assert!(parse_org_links(html).is_empty());
    }
}

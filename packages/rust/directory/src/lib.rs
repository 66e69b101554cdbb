//! Seed directory enumeration.
//!
//! The first pipeline stage: fetch the seed directory page and extract the
//! ordered list of organization website links. This is the only stage whose
//! failure is fatal for a run — without the directory there is nothing to
//! crawl.

mod parser;

use reqwest::Client;
use steeplescout_shared::{FetchConfig, Result, SteepleScoutError};
use tracing::{info, instrument};
use url::Url;

/// Fetch the seed directory page and return organization site links.
///
/// Links are returned in document order with duplicates kept. A reachable
/// page with zero "Website" cells yields an empty vec, not an error; any
/// network or transport failure is a fatal [`SteepleScoutError::Directory`].
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_org_links(url: &Url, config: &FetchConfig) -> Result<Vec<String>> {
    let client = build_client(config)?;

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| SteepleScoutError::Directory(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SteepleScoutError::Directory(format!("{url}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SteepleScoutError::Directory(format!("{url}: failed to read body: {e}")))?;

    let links = parser::parse_org_links(&body);

    info!(count = links.len(), "organization links discovered");

    Ok(links)
}

/// Build a reqwest client with the configured agent, timeout, and redirects.
fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(&config.user_agent)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| SteepleScoutError::Directory(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FetchConfig {
        FetchConfig {
            timeout_secs: 5,
            ..FetchConfig::default()
        }
    }

    #[tokio::test]
    async fn fetch_links_from_mock_directory() {
        let server = wiremock::MockServer::start().await;

        let content = std::fs::read_to_string("../../../fixtures/html/directory.html")
            .expect("read fixture");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/directory"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(&content))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/directory", server.uri())).unwrap();
        let links = fetch_org_links(&url, &test_config()).await.unwrap();

        assert_eq!(links.len(), 3);
        assert_eq!(links[0], "http://first.church.example");
    }

    #[tokio::test]
    async fn empty_directory_is_not_an_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/directory"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("<table><tr><td>No links here</td></tr></table>"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/directory", server.uri())).unwrap();
        let links = fetch_org_links(&url, &test_config()).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn http_error_is_fatal() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/directory"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/directory", server.uri())).unwrap();
        let err = fetch_org_links(&url, &test_config()).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn unreachable_host_is_fatal() {
        // Port 1 on localhost is expected to refuse connections.
        let url = Url::parse("http://127.0.0.1:1/directory").unwrap();
        let err = fetch_org_links(&url, &test_config()).await.unwrap_err();
        assert!(matches!(err, SteepleScoutError::Directory(_)));
    }
}

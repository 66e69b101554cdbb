//! Per-organization crawling: staff page location and record extraction.
//!
//! This crate provides:
//! - [`SiteScanner`] — fetches an organization's pages with a shared client
//! - [`locator`] — heuristic staff-link matching over homepage anchors
//! - [`rules`] — pluggable markup extraction rules ([`StaffPageRule`])

mod locator;
pub mod rules;

use reqwest::Client;
use scraper::Html;
use steeplescout_shared::{FetchConfig, PersonRecord, Result, SteepleScoutError};
use tracing::{debug, info, instrument};
use url::Url;

pub use rules::{ClassMarkerRule, StaffPageRule, split_institution};

/// Fetches organization pages and applies the configured extraction rule.
///
/// One scanner (and its HTTP client) is shared across all organizations in a
/// run; each call handles a single page fetch.
pub struct SiteScanner {
    client: Client,
    rule: Box<dyn StaffPageRule>,
}

impl SiteScanner {
    /// Create a scanner with the given fetch configuration and the default
    /// class-marker extraction rule.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SteepleScoutError::config(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            rule: Box::new(ClassMarkerRule::default()),
        })
    }

    /// Replace the extraction rule.
    pub fn with_rule(mut self, rule: Box<dyn StaffPageRule>) -> Self {
        self.rule = rule;
        self
    }

    /// Fetch an organization's homepage and look for a staff page link.
    ///
    /// `Ok(None)` means the homepage was reachable but no anchor matched.
    /// Network failures surface as [`SteepleScoutError::SitePage`]; the
    /// caller treats both the same way — skip the organization.
    #[instrument(skip_all, fields(url = %org_url))]
    pub async fn locate_staff_page(&self, org_url: &Url) -> Result<Option<Url>> {
        let body = self
            .fetch(org_url)
            .await
            .map_err(SteepleScoutError::SitePage)?;

        let doc = Html::parse_document(&body);
        let staff_url = locator::first_staff_anchor(&doc, org_url);

        match &staff_url {
            Some(url) => debug!(staff_url = %url, "staff page link found"),
            None => info!("no staff page link found"),
        }

        Ok(staff_url)
    }

    /// Fetch a staff page and extract personnel records with the configured
    /// rule. A page with no matching containers yields an empty vec.
    #[instrument(skip_all, fields(url = %staff_url, rule = self.rule.name()))]
    pub async fn extract_staff(&self, staff_url: &Url) -> Result<Vec<PersonRecord>> {
        let body = self
            .fetch(staff_url)
            .await
            .map_err(SteepleScoutError::Extraction)?;

        let doc = Html::parse_document(&body);
        let records = self.rule.extract(&doc);

        info!(count = records.len(), "staff records extracted");

        Ok(records)
    }

    /// GET a page and return its body, with a uniform error message shape.
    async fn fetch(&self, url: &Url) -> std::result::Result<String, String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| format!("{url}: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("{url}: HTTP {status}"));
        }

        response
            .text()
            .await
            .map_err(|e| format!("{url}: failed to read body: {e}"))
    }
}

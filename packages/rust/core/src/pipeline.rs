//! End-to-end crawl pipeline with per-organization failure isolation.
//!
//! Organizations are processed strictly sequentially, in directory order.
//! Only two failures abort a run: the store connection at startup and the
//! seed directory fetch. Every per-organization failure is caught at its
//! stage boundary, logged with context, and converted into "contribute
//! nothing for this organization".

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{error, info, instrument, warn};
use url::Url;

use steeplescout_crawler::SiteScanner;
use steeplescout_shared::{FetchConfig, OrgOutcome, Result, RunReport};
use steeplescout_storage::Storage;

/// Configuration for one crawl run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Seed directory URL to enumerate organizations from.
    pub directory_url: Url,
    /// Path to the local database file.
    pub db_path: PathBuf,
    /// Outbound HTTP behavior shared by all stages.
    pub fetch: FetchConfig,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when an organization's processing begins.
    fn org_started(&self, url: &str, current: usize, total: usize);
    /// Called when an organization reaches a terminal state.
    fn org_finished(&self, url: &str, outcome: &OrgOutcome);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn org_started(&self, _url: &str, _current: usize, _total: usize) {}
    fn org_finished(&self, _url: &str, _outcome: &OrgOutcome) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run the full crawl pipeline.
///
/// 1. Open the store (fatal on failure)
/// 2. Enumerate the seed directory (fatal on failure)
/// 3. Per organization, sequentially: locate → extract → persist
/// 4. Finish the run row and release the connection
///
/// Setting `cancel` stops the run between organizations; the in-flight
/// organization always completes or rolls back cleanly first.
#[instrument(skip_all, fields(directory_url = %config.directory_url))]
pub async fn run(
    config: &RunConfig,
    cancel: &AtomicBool,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();

    progress.phase("Connecting to store");
    let storage = match Storage::open(&config.db_path).await {
        Ok(storage) => storage,
        Err(e) => {
            // Nothing to release: the connection was never established.
            warn!(error = %e, "store connection was never established");
            return Err(e);
        }
    };

    let run_id = storage.insert_run().await?;
    let scanner = SiteScanner::new(&config.fetch)?;

    progress.phase("Enumerating directory");
    let links =
        match steeplescout_directory::fetch_org_links(&config.directory_url, &config.fetch).await
        {
            Ok(links) => links,
            Err(e) => {
                error!(error = %e, "directory enumeration failed, aborting run");
                let report = RunReport {
                    elapsed: start.elapsed(),
                    aborted: true,
                    ..RunReport::default()
                };
                let _ = storage.finish_run(&run_id, &report.stats_json()).await;
                info!("database connection closed");
                return Err(e);
            }
        };

    let total = links.len();
    let mut report = RunReport {
        orgs_discovered: total,
        ..RunReport::default()
    };

    progress.phase("Processing organizations");
    for (i, link) in links.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            warn!(
                processed = i,
                remaining = total - i,
                "cancellation requested, stopping run"
            );
            report.cancelled = true;
            break;
        }

        progress.org_started(link, i + 1, total);
        let outcome = process_org(&scanner, &storage, link).await;

        match &outcome {
            OrgOutcome::Persisted { rows } => {
                report.orgs_persisted += 1;
                report.records_written += rows;
            }
            OrgOutcome::Skipped { .. } => report.orgs_skipped += 1,
            OrgOutcome::Failed { .. } => report.orgs_failed += 1,
        }
        progress.org_finished(link, &outcome);
    }

    report.elapsed = start.elapsed();
    let _ = storage.finish_run(&run_id, &report.stats_json()).await;

    info!(
        orgs_discovered = report.orgs_discovered,
        orgs_persisted = report.orgs_persisted,
        orgs_skipped = report.orgs_skipped,
        orgs_failed = report.orgs_failed,
        records_written = report.records_written,
        cancelled = report.cancelled,
        elapsed_ms = report.elapsed.as_millis(),
        "run complete"
    );

    progress.done(&report);
    drop(storage);
    info!("database connection closed");

    Ok(report)
}

/// Take one organization through locate → extract → persist.
///
/// Never returns an error: every stage failure maps to a terminal
/// [`OrgOutcome`] so one bad site cannot abort the run.
async fn process_org(scanner: &SiteScanner, storage: &Storage, link: &str) -> OrgOutcome {
    let org_url = match Url::parse(link) {
        Ok(url) => url,
        Err(e) => {
            warn!(link, error = %e, "invalid organization URL");
            return OrgOutcome::Failed {
                stage: format!("parse URL: {e}"),
            };
        }
    };

    let staff_url = match scanner.locate_staff_page(&org_url).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            info!(org = link, "no staff page found, skipping");
            return OrgOutcome::Skipped {
                reason: "no staff page found".into(),
            };
        }
        Err(e) => {
            warn!(org = link, error = %e, "homepage scan failed, skipping");
            return OrgOutcome::Skipped {
                reason: e.to_string(),
            };
        }
    };

    // Extraction failure contributes zero records but the organization still
    // reaches the sink, matching the locate-then-save flow.
    let records = match scanner.extract_staff(&staff_url).await {
        Ok(records) => records,
        Err(e) => {
            warn!(org = link, staff_url = %staff_url, error = %e, "staff extraction failed");
            Vec::new()
        }
    };

    match storage.save_batch(link, &records).await {
        Ok(rows) => OrgOutcome::Persisted { rows },
        Err(e) => {
            error!(org = link, error = %e, "batch write failed, rolled back");
            OrgOutcome::Failed {
                stage: format!("persist: {e}"),
            }
        }
    }
}

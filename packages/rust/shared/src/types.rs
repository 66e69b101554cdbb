//! Core domain types for SteepleScout crawl runs.

use serde::{Deserialize, Serialize};

/// Sentinel institution value when credential text names no seminary.
pub const UNKNOWN_INSTITUTION: &str = "Unknown";

// ---------------------------------------------------------------------------
// PersonRecord
// ---------------------------------------------------------------------------

/// One staff member extracted from an organization's staff page.
///
/// `institution` is always set: either the seminary captured from the
/// trailing `from <institution>` pattern in the credential text, or the
/// [`UNKNOWN_INSTITUTION`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Trimmed display name.
    pub name: String,
    /// Raw trimmed credential text (degrees, free text, may be empty).
    pub credential_text: String,
    /// Seminary name extracted from the credential text, or the sentinel.
    pub institution: String,
}

// ---------------------------------------------------------------------------
// PersistedRow
// ---------------------------------------------------------------------------

/// The durable representation of one staff member, as read back from the
/// `ordained` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedRow {
    /// Row identifier (UUID v7).
    pub id: String,
    /// The organization's site URL, used verbatim as the grouping key.
    pub church_url: String,
    /// Person's name.
    pub name: String,
    /// Raw credential text.
    pub degree: String,
    /// Extracted seminary or "Unknown".
    pub seminary: String,
    /// When the row was written (RFC 3339).
    pub recorded_at: String,
}

// ---------------------------------------------------------------------------
// OrgOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one organization's trip through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgOutcome {
    /// All records for the organization were committed.
    Persisted {
        /// Number of rows written.
        rows: usize,
    },
    /// No staff page was found; nothing was extracted or written.
    Skipped {
        /// Why the organization was skipped.
        reason: String,
    },
    /// A stage failed; the failure was logged and contained.
    Failed {
        /// Which stage failed and how.
        stage: String,
    },
}

impl OrgOutcome {
    /// Short label for logs and progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Persisted { .. } => "persisted",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

/// Summary of a completed (or cancelled) crawl run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Organizations returned by the directory enumerator.
    pub orgs_discovered: usize,
    /// Organizations whose batch committed.
    pub orgs_persisted: usize,
    /// Organizations skipped (no staff page found).
    pub orgs_skipped: usize,
    /// Organizations where a stage failed.
    pub orgs_failed: usize,
    /// Total rows written across all batches.
    pub records_written: usize,
    /// Wall-clock duration of the run.
    pub elapsed: std::time::Duration,
    /// Whether the run stopped early on a cancellation request.
    pub cancelled: bool,
    /// Whether the run aborted on a fatal error before processing.
    pub aborted: bool,
}

impl RunReport {
    /// JSON stats blob stored on the run row.
    pub fn stats_json(&self) -> String {
        serde_json::json!({
            "orgs_discovered": self.orgs_discovered,
            "orgs_persisted": self.orgs_persisted,
            "orgs_skipped": self.orgs_skipped,
            "orgs_failed": self.orgs_failed,
            "records_written": self.records_written,
            "cancelled": self.cancelled,
            "aborted": self.aborted,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(OrgOutcome::Persisted { rows: 3 }.label(), "persisted");
        assert_eq!(
            OrgOutcome::Skipped {
                reason: "no staff page".into()
            }
            .label(),
            "skipped"
        );
        assert_eq!(
            OrgOutcome::Failed {
                stage: "persist".into()
            }
            .label(),
            "failed"
        );
    }

    #[test]
    fn report_stats_json() {
        let report = RunReport {
            orgs_discovered: 4,
            orgs_persisted: 2,
            orgs_skipped: 1,
            orgs_failed: 1,
            records_written: 9,
            elapsed: std::time::Duration::from_secs(1),
            cancelled: false,
            aborted: false,
        };
        let stats = report.stats_json();
        assert!(stats.contains("\"orgs_discovered\":4"));
        assert!(stats.contains("\"records_written\":9"));
        assert!(stats.contains("\"cancelled\":false"));
        assert!(stats.contains("\"aborted\":false"));
    }

    #[test]
    fn person_record_serialization() {
        let record = PersonRecord {
            name: "Jane Doe".into(),
            credential_text: "D.Min. from Covenant Seminary".into(),
            institution: "Covenant Seminary".into(),
        };
        let json = serde_json::to_string(&record).expect("serialize");
        let parsed: PersonRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record);
    }
}

//! libSQL persistence layer.
//!
//! The [`Storage`] struct wraps a local libSQL database holding extracted
//! personnel records and run history. One handle (and its connection) is
//! held open for a whole run and reused across all organizations.
//!
//! Batches are the one place requiring a true transaction: all rows for an
//! organization commit atomically or not at all.

mod migrations;

use std::path::Path;

use chrono::Utc;
use libsql::{Connection, Database, params};
use steeplescout_shared::{PersistedRow, PersonRecord, Result, SteepleScoutError};
use uuid::Uuid;

/// One row from the `runs` history table.
#[derive(Debug, Clone)]
pub struct RunRow {
    /// Run identifier (UUID v7).
    pub id: String,
    /// When the run started (RFC 3339).
    pub started_at: String,
    /// When the run finished, if it did.
    pub finished_at: Option<String>,
    /// JSON stats summary written at finish.
    pub stats_json: Option<String>,
}

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl Storage {
    /// Open or create a database at `path` and apply pending migrations.
    ///
    /// Any failure here is the fatal connection-setup error: the pipeline
    /// aborts before processing anything.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SteepleScoutError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| SteepleScoutError::Connection(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| SteepleScoutError::Connection(e.to_string()))?;

        let storage = Self { db, conn };
        storage.run_migrations().await?;

        tracing::info!(path = %path.display(), "database connection established");
        Ok(storage)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await.map_err(|e| {
                    SteepleScoutError::Connection(format!(
                        "migration v{} failed: {e}",
                        migration.version
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    // -----------------------------------------------------------------------
    // Record batches
    // -----------------------------------------------------------------------

    /// Write all records for one organization as a single transaction.
    ///
    /// Either every row commits or none do: a failure on any insert rolls
    /// the whole batch back so an organization never shows a partial record
    /// set. Returns the number of rows written.
    pub async fn save_batch(&self, church_url: &str, records: &[PersonRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| SteepleScoutError::Storage(format!("begin transaction: {e}")))?;

        let now = Utc::now().to_rfc3339();

        for record in records {
            let id = Uuid::now_v7().to_string();
            let insert = tx
                .execute(
                    "INSERT INTO ordained (id, church_url, name, degree, seminary, recorded_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        id.as_str(),
                        church_url,
                        record.name.as_str(),
                        record.credential_text.as_str(),
                        record.institution.as_str(),
                        now.as_str(),
                    ],
                )
                .await;

            if let Err(e) = insert {
                let _ = tx.rollback().await;
                return Err(SteepleScoutError::Storage(format!(
                    "insert for {church_url} failed, batch rolled back: {e}"
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| SteepleScoutError::Storage(format!("commit for {church_url}: {e}")))?;

        tracing::info!(church_url, rows = records.len(), "batch saved");
        Ok(records.len())
    }

    /// List persisted records, optionally filtered to one organization,
    /// newest first.
    pub async fn list_records(
        &self,
        church_url: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PersistedRow>> {
        let mut rows = match church_url {
            Some(church) => self
                .conn
                .query(
                    "SELECT id, church_url, name, degree, seminary, recorded_at
                     FROM ordained WHERE church_url = ?1
                     ORDER BY recorded_at DESC, id DESC LIMIT ?2",
                    params![church, limit],
                )
                .await,
            None => self
                .conn
                .query(
                    "SELECT id, church_url, name, degree, seminary, recorded_at
                     FROM ordained ORDER BY recorded_at DESC, id DESC LIMIT ?1",
                    params![limit],
                )
                .await,
        }
        .map_err(|e| SteepleScoutError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_persisted(&row)?);
        }
        Ok(results)
    }

    /// Total number of persisted records.
    pub async fn count_records(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM ordained", params![])
            .await
            .map_err(|e| SteepleScoutError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get::<i64>(0)
                .map(|v| v as u64)
                .map_err(|e| SteepleScoutError::Storage(e.to_string())),
            Ok(None) => Ok(0),
            Err(e) => Err(SteepleScoutError::Storage(e.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Run history
    // -----------------------------------------------------------------------

    /// Insert a new run row. Returns the generated run ID.
    pub async fn insert_run(&self) -> Result<String> {
        let id = Uuid::now_v7().to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO runs (id, started_at) VALUES (?1, ?2)",
                params![id.as_str(), now.as_str()],
            )
            .await
            .map_err(|e| SteepleScoutError::Storage(e.to_string()))?;
        Ok(id)
    }

    /// Read back the most recently started run, if any.
    pub async fn latest_run(&self) -> Result<Option<RunRow>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, started_at, finished_at, stats_json
                 FROM runs ORDER BY started_at DESC, id DESC LIMIT 1",
                params![],
            )
            .await
            .map_err(|e| SteepleScoutError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let get = |i: i32| {
                    row.get::<String>(i)
                        .map_err(|e| SteepleScoutError::Storage(e.to_string()))
                };
                Ok(Some(RunRow {
                    id: get(0)?,
                    started_at: get(1)?,
                    finished_at: row.get::<Option<String>>(2).unwrap_or(None),
                    stats_json: row.get::<Option<String>>(3).unwrap_or(None),
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(SteepleScoutError::Storage(e.to_string())),
        }
    }

    /// Mark a run finished with its stats summary.
    pub async fn finish_run(&self, run_id: &str, stats_json: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "UPDATE runs SET finished_at = ?1, stats_json = ?2 WHERE id = ?3",
                params![now.as_str(), stats_json, run_id],
            )
            .await
            .map_err(|e| SteepleScoutError::Storage(e.to_string()))?;
        Ok(())
    }
}

/// Convert a database row to a [`PersistedRow`].
fn row_to_persisted(row: &libsql::Row) -> Result<PersistedRow> {
    let col = |i: i32| {
        row.get::<String>(i)
            .map_err(|e| SteepleScoutError::Storage(e.to_string()))
    };
    Ok(PersistedRow {
        id: col(0)?,
        church_url: col(1)?,
        name: col(2)?,
        degree: col(3)?,
        seminary: col(4)?,
        recorded_at: col(5)?,
    })
}

//! SQL migration definitions for the SteepleScout database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a set of SQL statements executed within a transaction.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: ordained, runs",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Extracted personnel records, append-only. church_url is the organization's
-- site URL used verbatim as the grouping key. seminary is always set: either
-- the extracted institution or the 'Unknown' sentinel.
CREATE TABLE IF NOT EXISTS ordained (
    id          TEXT PRIMARY KEY,
    church_url  TEXT NOT NULL,
    name        TEXT NOT NULL,
    degree      TEXT NOT NULL,
    seminary    TEXT NOT NULL CHECK (seminary <> ''),
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ordained_church ON ordained(church_url);

-- Run history
CREATE TABLE IF NOT EXISTS runs (
    id          TEXT PRIMARY KEY,
    started_at  TEXT NOT NULL,
    finished_at TEXT,
    stats_json  TEXT
);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}

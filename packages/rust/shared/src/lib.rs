//! Shared types, error model, and configuration for SteepleScout.
//!
//! This crate is the foundation depended on by all other SteepleScout crates.
//! It provides:
//! - [`SteepleScoutError`] — the unified error type
//! - Domain types ([`PersonRecord`], [`PersistedRow`], [`OrgOutcome`], [`RunReport`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_DIRECTORY_URL, DEFAULT_USER_AGENT, DefaultsConfig, FetchConfig,
    HttpConfig, config_dir, config_file_path, expand_home, init_config, load_config,
    load_config_from,
};
pub use error::{Result, SteepleScoutError};
pub use types::{OrgOutcome, PersistedRow, PersonRecord, RunReport, UNKNOWN_INSTITUTION};

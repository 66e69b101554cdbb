//! Application configuration for SteepleScout.
//!
//! User config lives at `~/.steeplescout/steeplescout.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SteepleScoutError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "steeplescout.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".steeplescout";

/// Seed directory page listing organizations and their website links.
pub const DEFAULT_DIRECTORY_URL: &str = "https://presbyteryportal.pcanet.org/ac/directory";

/// Browser User-Agent sent on every outbound request. Some directory hosts
/// reject requests with non-browser agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

// ---------------------------------------------------------------------------
// Config structs (matching steeplescout.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Outbound HTTP behavior.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Seed directory URL to enumerate organizations from.
    #[serde(default = "default_directory_url")]
    pub directory_url: String,

    /// Path to the local database file.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            db_path: default_db_path(),
        }
    }
}

fn default_directory_url() -> String {
    DEFAULT_DIRECTORY_URL.into()
}
fn default_db_path() -> String {
    "~/.steeplescout/steeplescout.db".into()
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects to follow per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent header for all outbound requests.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum redirects to follow.
    pub max_redirects: usize,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.http.user_agent.clone(),
            timeout_secs: config.http.timeout_secs,
            max_redirects: config.http.max_redirects,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.steeplescout/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SteepleScoutError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.steeplescout/steeplescout.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SteepleScoutError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SteepleScoutError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SteepleScoutError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SteepleScoutError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SteepleScoutError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Expand a leading `~/` in a configured path against the user's home.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

//! Layered settings: defaults, platform config file, explicit file, environment

use anyhow::Context;
use directories::ProjectDirs;
use queue_listing_core::application::PollConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "queue-listing.toml";
const CONFIG_PATH_ENV: &str = "QUEUE_LISTING_CONFIG";
const ENV_PREFIX: &str = "QUEUE_LISTING";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base for relative URIs, e.g. `http://localhost:8080/nifi-api/`
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub poll: PollConfig,
    /// Node to read flow units from in a cluster
    #[serde(default)]
    pub cluster_node_id: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll: PollConfig::default(),
            cluster_node_id: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `queue-listing.toml` in the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "queue-listing").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load settings; `explicit` wins over `QUEUE_LISTING_CONFIG`
///
/// Environment variables (`QUEUE_LISTING__POLL__MAX_DELAY_SECS=8`) have the
/// highest precedence.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = default_config_path() {
        builder = builder.add_source(::config::File::from(path).required(false));
    }

    let custom = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
    if let Some(path) = custom {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        builder = builder.add_source(::config::File::from(path));
    }

    builder = builder.add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    let settings: Settings = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> anyhow::Result<()> {
    if settings.request_timeout_secs == 0 {
        return Err(anyhow::anyhow!("request_timeout_secs must be > 0"));
    }
    settings.poll.validate()?;
    Ok(())
}

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_NBU_BASE_URL: &str = "https://bank.gov.ua";

/// Written by `fxrates setup`.
pub const EXAMPLE_CONFIG: &str = r#"---
# Example configuration file for fxrates
providers:
  nbu:
    base_url: "https://bank.gov.ua"
    # Transport retries for failed requests (0 disables)
    retries: 2
    retry_delay_ms: 500

# Currencies shown by `fxrates chart`; leave empty to show all
pinned:
  - USD
  - EUR
"#;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NbuProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_NBU_BASE_URL.to_string()
}

fn default_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for NbuProviderConfig {
    fn default() -> Self {
        NbuProviderConfig {
            base_url: default_base_url(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub nbu: NbuProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Currency codes the chart is limited to. Empty means all.
    #[serde(default)]
    pub pinned: Vec<String>,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ua", "fxrates", "fxrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.pinned = config
            .pinned
            .iter()
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .collect();
        debug!("Successfully loaded config");
        Ok(config)
    }
}

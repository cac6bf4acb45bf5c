use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::constants::{
    DEFAULT_COMMUNITY, HTTP_TIMEOUT_SECS, REDDIT_API_URL, REDDIT_SITE_URL, USER_AGENT,
};
use crate::common::TimeWindow;
use crate::trend_fetcher::FetcherConfig;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

fn default_community() -> String {
    DEFAULT_COMMUNITY.to_string()
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    HTTP_TIMEOUT_SECS
}

fn default_api_base_url() -> String {
    REDDIT_API_URL.to_string()
}

fn default_site_base_url() -> String {
    REDDIT_SITE_URL.to_string()
}

/// Initial preferences. Every field is optional in the file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_community")]
    pub community: String,
    #[serde(default)]
    pub time_window: TimeWindow,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            community: default_community(),
            time_window: TimeWindow::default(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            api_base_url: default_api_base_url(),
            site_base_url: default_site_base_url(),
        }
    }
}

impl Settings {
    pub fn load(settings_file: &Path) -> Result<Self> {
        if !settings_file.exists() {
            return Err(anyhow::anyhow!(
                "settings file not found at '{}'",
                settings_file.display()
            ));
        }

        let contents = fs::read_to_string(settings_file)
            .with_context(|| format!("Failed to read settings file: {}", settings_file.display()))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", settings_file.display()))?;

        info!("Settings loaded from '{}'.", settings_file.display());
        Ok(settings.normalized())
    }

    /// An explicit path must exist. Without one the per-user file is used
    /// when present, built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn normalized(mut self) -> Self {
        if self.community.is_empty() {
            self.community = default_community();
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
        self
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            base_url: self.api_base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reddit-trends").join(SETTINGS_FILE_NAME))
}

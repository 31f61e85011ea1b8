use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::draft::DEFAULT_CHAR_LIMIT;

pub const SERVER_ENV: &str = "MSGBOARD_SERVER";

/// Keys accepted by [`Config::set`], in file order.
pub const KEYS: [&str; 6] = [
    "server_url",
    "fetch_limit",
    "refresh_interval_secs",
    "notice_timeout_secs",
    "request_timeout_secs",
    "max_message_chars",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub fetch_limit: Option<usize>,
    pub refresh_interval_secs: u64,
    pub notice_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_message_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            fetch_limit: None,
            refresh_interval_secs: 30,
            notice_timeout_secs: 5,
            request_timeout_secs: 10,
            max_message_chars: DEFAULT_CHAR_LIMIT,
        }
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist. `MSGBOARD_SERVER` overrides the server url.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::get_config_path()?)?;

        if let Ok(server) = std::env::var(SERVER_ENV) {
            if !server.trim().is_empty() {
                config.server_url = server.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config file {:?}: {}", config_path, e))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Set one field from its string form. `fetch_limit` accepts `none` to
    /// go back to no limit.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "server_url" => {
                if value.is_empty() {
                    return Err(anyhow!("server_url cannot be empty"));
                }
                self.server_url = value.to_string();
            }
            "fetch_limit" => {
                self.fetch_limit = match value {
                    "" | "none" => None,
                    n => Some(parse_number(key, n)?),
                };
            }
            "refresh_interval_secs" => self.refresh_interval_secs = parse_number(key, value)?,
            "notice_timeout_secs" => self.notice_timeout_secs = parse_number(key, value)?,
            "request_timeout_secs" => self.request_timeout_secs = parse_number(key, value)?,
            "max_message_chars" => self.max_message_chars = parse_number(key, value)?,
            _ => {
                return Err(anyhow!(
                    "Unknown config key '{}'. Known keys: {}",
                    key,
                    KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn notice_timeout(&self) -> Duration {
        Duration::from_secs(self.notice_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("msgboard").join("config.json"))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("{} expects a whole number, got '{}'", key, value))
}

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{ArcPath, ArcStr, log::LogLevel};

/// Options for path-based configuration values that can be accessed and modified.
#[derive(Debug, Clone, Copy)]
pub enum PathOpt {
    /// Directory where log files are stored
    LogDir,
}

/// Options for numeric configuration values that can be accessed and modified.
#[derive(Debug, Clone, Copy)]
pub enum USizeOpt {
    /// How long a fetched item stays cached, in minutes
    ItemTtlMinutes,
    /// Maximum number of item fetches in flight at once
    MaxConcurrency,
    /// Timeout for network requests in seconds
    Timeout,
}

/// Options for string configuration values.
#[derive(Debug, Clone, Copy)]
pub enum StrOpt {
    /// Base URL of the Hacker News API, without the `/v0` suffix
    BaseUrl,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{0}` must be a positive integer")]
    NotPositive(&'static str),
    #[error("`base_url` must not be empty")]
    EmptyBaseUrl,
    #[error("`{name}` must be at most {max}")]
    TooLarge { name: &'static str, max: usize },
}

/// Longest accepted item TTL: one year.
pub const MAX_ITEM_TTL_MINUTES: usize = 365 * 24 * 60;

/// Converts an item TTL in minutes to a [`Duration`].
///
/// # Errors
/// Fails on zero or on anything above [`MAX_ITEM_TTL_MINUTES`].
pub fn item_ttl(minutes: usize) -> Result<Duration, ConfigError> {
    if minutes == 0 {
        return Err(ConfigError::NotPositive("item_ttl_minutes"));
    }
    if minutes > MAX_ITEM_TTL_MINUTES {
        return Err(ConfigError::TooLarge {
            name: "item_ttl_minutes",
            max: MAX_ITEM_TTL_MINUTES,
        });
    }
    let secs = u64::try_from(minutes)
        .ok()
        .and_then(|minutes| minutes.checked_mul(60))
        .ok_or(ConfigError::TooLarge {
            name: "item_ttl_minutes",
            max: MAX_ITEM_TTL_MINUTES,
        })?;
    Ok(Duration::from_secs(secs))
}

/// The configuration data structure that holds all configurable values.
///
/// Missing keys in the TOML file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    /// Base URL of the Hacker News API
    base_url: String,
    /// How long a fetched item stays cached, in minutes
    item_ttl_minutes: usize,
    /// Maximum number of item fetches in flight at once
    max_concurrency: usize,
    /// Timeout for network requests in seconds
    timeout: usize,
    /// Directory where log files are stored
    log_dir: PathBuf,
    /// Minimum level echoed to stderr
    log_level: LogLevel,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            base_url: "https://hacker-news.firebaseio.com".to_string(),
            item_ttl_minutes: 20,
            max_concurrency: 8,
            timeout: 30,
            log_dir: PathBuf::from("/tmp/best-stories/logs"),
            log_level: LogLevel::Warning,
        }
    }
}

impl Data {
    /// Checks the values the fetch pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        item_ttl(self.item_ttl_minutes)?;
        for (name, value) in [
            ("max_concurrency", self.max_concurrency),
            ("timeout", self.timeout),
        ] {
            if value == 0 {
                return Err(ConfigError::NotPositive(name));
            }
        }
        Ok(())
    }

    pub fn path(&self, opt: PathOpt) -> ArcPath {
        match opt {
            PathOpt::LogDir => ArcPath::from(self.log_dir.as_path()),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    pub fn usize(&self, opt: USizeOpt) -> usize {
        match opt {
            USizeOpt::ItemTtlMinutes => self.item_ttl_minutes,
            USizeOpt::MaxConcurrency => self.max_concurrency,
            USizeOpt::Timeout => self.timeout,
        }
    }

    pub fn set_usize(&mut self, opt: USizeOpt, value: usize) {
        match opt {
            USizeOpt::ItemTtlMinutes => self.item_ttl_minutes = value,
            USizeOpt::MaxConcurrency => self.max_concurrency = value,
            USizeOpt::Timeout => self.timeout = value,
        }
    }

    pub fn str(&self, opt: StrOpt) -> ArcStr {
        match opt {
            StrOpt::BaseUrl => ArcStr::from(self.base_url.trim_end_matches('/')),
        }
    }

    pub fn set_str(&mut self, opt: StrOpt, value: &str) {
        match opt {
            StrOpt::BaseUrl => self.base_url = value.to_string(),
        }
    }
}

//! Configuration for Taskdesk.
//!
//! The file lives at `~/.taskdesk/config.toml` (or wherever `TASKDESK_CONFIG`
//! points). Every section is optional:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3001"
//! auth_url = "https://api.escuelajs.co/api/v1"
//! timeout_seconds = 30
//!
//! [list]
//! page_size = 5
//! debounce_ms = 500
//!
//! [ui]
//! ascii_only = false
//! ```
//!
//! [`TaskdeskConfig`] is the raw file. [`Settings`] is what the application
//! runs with: file values layered over defaults, then environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use taskdesk_types::{DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE};

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_AUTH_URL: &str = "https://api.escuelajs.co/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_CONFIG_PATH: &str = "TASKDESK_CONFIG";
pub const ENV_API_URL: &str = "TASKDESK_API_URL";
pub const ENV_AUTH_URL: &str = "TASKDESK_AUTH_URL";

#[derive(Debug, Default, Deserialize)]
pub struct TaskdeskConfig {
    pub api: Option<ApiSection>,
    pub list: Option<ListSection>,
    pub ui: Option<UiSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    /// Task API root. Supports `${VAR}` expansion.
    pub base_url: Option<String>,
    /// Auth API root. Supports `${VAR}` expansion.
    pub auth_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSection {
    pub page_size: Option<u32>,
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UiSection {
    /// Use ASCII-only glyphs for arrows and spinners.
    #[serde(default)]
    pub ascii_only: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {key} {value:?}: {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        source: url::ParseError,
    },
}

impl TaskdeskConfig {
    /// Load the config file. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Url,
    pub auth_url: Url,
    pub timeout: Duration,
    pub page_size: u32,
    pub debounce: Duration,
    pub ascii_only: bool,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn resolve(config: Option<&TaskdeskConfig>) -> Result<Self, ConfigError> {
        Self::resolve_with(config, |key| env::var(key).ok())
    }

    /// Built-in values only: no config file, no environment overrides.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::resolve_with(None, |_| None)
    }

    /// Resolve with an injected environment lookup.
    pub fn resolve_with<F>(config: Option<&TaskdeskConfig>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api = config.and_then(|c| c.api.as_ref());
        let list = config.and_then(|c| c.list.as_ref());
        let ui = config.and_then(|c| c.ui.as_ref());

        let api_url = lookup(ENV_API_URL)
            .or_else(|| api.and_then(|a| a.base_url.as_deref()).map(|v| expand_env_vars(v, &lookup)))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let auth_url = lookup(ENV_AUTH_URL)
            .or_else(|| api.and_then(|a| a.auth_url.as_deref()).map(|v| expand_env_vars(v, &lookup)))
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());

        Ok(Self {
            api_url: parse_base_url("api.base_url", &api_url)?,
            auth_url: parse_base_url("api.auth_url", &auth_url)?,
            timeout: Duration::from_secs(
                api.and_then(|a| a.timeout_seconds)
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            page_size: list
                .and_then(|l| l.page_size)
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            debounce: Duration::from_millis(
                list.and_then(|l| l.debounce_ms).unwrap_or(DEFAULT_DEBOUNCE_MS),
            ),
            ascii_only: ui.is_some_and(|u| u.ascii_only),
        })
    }
}

/// Parse a base URL so that `join("tasks")` appends instead of replacing the
/// last path segment.
fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        key,
        value: raw.to_string(),
        source,
    })
}

/// Replace `${VAR}` references using `lookup`. Missing variables expand to
/// the empty string; an unclosed `${` is kept verbatim.
pub fn expand_env_vars<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&lookup(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// `~/.taskdesk`, home of the config file, local storage and logs.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".taskdesk"))
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(ENV_CONFIG_PATH)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    data_dir().map(|dir| dir.join("config.toml"))
}

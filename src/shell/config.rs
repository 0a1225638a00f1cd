// Runtime configuration read from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::modules::repository_charts::adapters::outbound::github::GITHUB_API_BASE;

const DEFAULT_FONT: &str = "Noto Sans JP";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}={value:?} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    File,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CacheBackend::File),
            "memory" => Ok(CacheBackend::Memory),
            _ => Err("expected `file` or `memory`".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub cache_backend: CacheBackend,
    pub cache_dir: PathBuf,
    pub cache_prune_stale: bool,
    pub github_api_base: String,
    pub github_timeout: Duration,
    pub github_max_pages: u32,
    pub font_dir: PathBuf,
    pub default_font: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let github_timeout_secs: u64 = parse(&lookup, "GITHUB_TIMEOUT_SECS", "10")?;
        if github_timeout_secs == 0 {
            return Err(invalid("GITHUB_TIMEOUT_SECS", "0", "must be positive"));
        }
        let github_max_pages: u32 = parse(&lookup, "GITHUB_MAX_PAGES", "1")?;
        if github_max_pages == 0 {
            return Err(invalid("GITHUB_MAX_PAGES", "0", "must be positive"));
        }

        Ok(Self {
            bind_addr: parse(&lookup, "BIND_ADDR", "0.0.0.0:8080")?,
            cache_backend: parse(&lookup, "CACHE_BACKEND", "file")?,
            cache_dir: PathBuf::from(text("CACHE_DIR", "tmp")),
            cache_prune_stale: parse_bool(&lookup, "CACHE_PRUNE_STALE")?,
            github_api_base: text("GITHUB_API_BASE", GITHUB_API_BASE),
            github_timeout: Duration::from_secs(github_timeout_secs),
            github_max_pages,
            font_dir: PathBuf::from(text("FONT_DIR", "fonts")),
            default_font: text("DEFAULT_FONT", DEFAULT_FONT),
        })
    }
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    let value = lookup(name)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|e: T::Err| invalid(name, &value, e))
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<bool, ConfigError> {
    let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, &value, "expected a boolean")),
    }
}

// tariffscope.toml
// Every section is optional; a missing file means all defaults.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tariffscope_fetch::{EndpointConfig, DEFAULT_TIMEOUT_SECS};
use tariffscope_recon::cache::DEFAULT_TTL_HOURS;
use tariffscope_recon::Reprieve;

use crate::error::ConfigError;

/// Overrides `[document] path`.
pub const ENV_DOCUMENT: &str = "TARIFFSCOPE_DOCUMENT";
/// Overrides `[live_api] enabled` (`1/true/on`, `0/false/off`).
pub const ENV_LIVE_API: &str = "TARIFFSCOPE_LIVE_API";

const MAX_TIMEOUT_SECS: u64 = 120;
/// Ten years; effectively "never expire" for a running process.
const MAX_TTL_HOURS: i64 = 87_600;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    pub enabled: bool,
    /// Relative paths are taken from the config file's directory.
    pub path: Option<PathBuf>,
    /// Worksheet name; first sheet when unset.
    pub sheet: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            sheet: None,
        }
    }
}

impl DocumentConfig {
    pub fn effective_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_document_path)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LiveApiConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    pub endpoints: Vec<EndpointConfig>,
}

impl Default for LiveApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Vec::new(),
        }
    }
}

impl LiveApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub verified_tracker: bool,
    pub static_fallback: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            verified_tracker: true,
            static_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub ttl_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_TTL_HOURS,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    pub document: DocumentConfig,
    pub live_api: LiveApiConfig,
    pub sources: SourcesConfig,
    pub cache: CacheConfig,
    pub reprieves: Vec<Reprieve>,
}

/// `<config dir>/tariffscope/tariffscope.toml`
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tariffscope")
        .join("tariffscope.toml")
}

/// `<data dir>/tariffscope/tariff_annex.xlsx`
pub fn default_document_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tariffscope")
        .join("tariff_annex.xlsx")
}

impl TariffConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: TariffConfig = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load, apply environment overrides, validate.
    ///
    /// An explicit `path` must exist. The default location may be absent,
    /// in which case defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = config_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    log::debug!("no config at {}, using defaults", default.display());
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&contents)?;

        if let (Some(doc), Some(base)) = (&config.document.path, path.parent()) {
            if doc.is_relative() {
                config.document.path = Some(base.join(doc));
            }
        }
        Ok(config)
    }

    /// Apply `TARIFFSCOPE_*` overrides; `lookup` is the environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(path) = lookup(ENV_DOCUMENT).filter(|p| !p.trim().is_empty()) {
            self.document.path = Some(PathBuf::from(path.trim()));
        }
        if let Some(raw) = lookup(ENV_LIVE_API) {
            self.live_api.enabled = parse_flag(&raw)
                .ok_or_else(|| ConfigError::Validation(format!("{ENV_LIVE_API}: expected on/off, got '{raw}'")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ttl = self.cache.ttl_hours;
        if !(1..=MAX_TTL_HOURS).contains(&ttl) {
            return Err(ConfigError::Validation(format!(
                "cache.ttl_hours must be between 1 and {MAX_TTL_HOURS}, got {ttl}"
            )));
        }

        let timeout = self.live_api.timeout_secs;
        if !(1..=MAX_TIMEOUT_SECS).contains(&timeout) {
            return Err(ConfigError::Validation(format!(
                "live_api.timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {timeout}"
            )));
        }

        let mut names = HashSet::new();
        for endpoint in &self.live_api.endpoints {
            endpoint.validate().map_err(ConfigError::Validation)?;
            if !names.insert(endpoint.name.trim().to_lowercase()) {
                return Err(ConfigError::Validation(format!("duplicate endpoint name '{}'", endpoint.name)));
            }
        }
        if self.live_api.enabled && self.live_api.endpoints.is_empty() {
            log::warn!("live_api.enabled is set but no endpoints are configured");
        }

        if let Some(r) = self.reprieves.iter().find(|r| r.country.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("reprieve with empty country (note: '{}')", r.note)));
        }

        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

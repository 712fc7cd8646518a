//! Endpoint configuration and response → entry mapping.
//!
//! An endpoint is a URL template with a `{country}` placeholder plus JSON
//! paths telling us where the entry array lives and where each field sits
//! inside one entry.
//!
//! ```toml
//! [[live_api.endpoints]]
//! name = "USITC DataWeb"
//! url = "https://example.gov/tariffs?country={country}"
//! root = "$.tariffs"
//! [live_api.endpoints.fields]
//! rate = "$.additional_duty"
//! ```

use serde::Deserialize;
use tariffscope_recon::model::{country_key, ALL_HTS, ALL_SECTORS};
use tariffscope_recon::{try_normalize, RateReading, RawRate, TariffEntry, TariffStatus};

use crate::json_path::{json_extract, json_value_to_string};

/// Placeholder substituted with the URL-encoded country name.
pub const COUNTRY_PLACEHOLDER: &str = "{country}";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
    /// JSON path to the entry array.
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default)]
    pub fields: FieldPaths,
    /// Environment variable holding a bearer token, if the API wants one.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

fn default_root() -> String {
    "$".to_string()
}

/// Per-field JSON paths, relative to one entry. Fields left out fall back
/// to their defaults (queried country, sector "All", status from the rate).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldPaths {
    pub country: Option<String>,
    pub sector: Option<String>,
    pub rate: String,
    pub status: Option<String>,
    pub hts_codes: Option<String>,
    pub effective_date: Option<String>,
    pub notes: Option<String>,
    pub authority: Option<String>,
}

impl Default for FieldPaths {
    fn default() -> Self {
        Self {
            country: Some("$.country".into()),
            sector: Some("$.sector".into()),
            rate: "$.rate".into(),
            status: Some("$.status".into()),
            hts_codes: Some("$.hts_codes".into()),
            effective_date: Some("$.effective_date".into()),
            notes: Some("$.notes".into()),
            authority: Some("$.authority".into()),
        }
    }
}

impl EndpointConfig {
    pub fn new(name: &str, url: &str, root: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            root: root.to_string(),
            fields: FieldPaths::default(),
            api_key_env: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("endpoint name must not be empty".into());
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(format!("endpoint '{}': url must start with http:// or https://", self.name));
        }
        if !self.url.contains(COUNTRY_PLACEHOLDER) {
            return Err(format!("endpoint '{}': url must contain {COUNTRY_PLACEHOLDER}", self.name));
        }
        Ok(())
    }

    /// URL for `country`, with the name percent-encoded.
    pub fn url_for(&self, country: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(country.trim().as_bytes()).collect();
        self.url.replace(COUNTRY_PLACEHOLDER, &encoded)
    }

    /// Map a response body to entries for `country`.
    ///
    /// Items naming a different country are skipped; items whose rate or
    /// status cannot be read are dropped with a warning. Fails only when
    /// the root path does not lead to an array.
    pub fn map_response(&self, body: &serde_json::Value, country: &str) -> Result<Vec<TariffEntry>, String> {
        let items = json_extract(body, &self.root)
            .and_then(|v| v.as_array())
            .ok_or_else(|| format!("'{}' is not an array in the response", self.root))?;

        let verification = format!("Live response from {}", self.name);
        Ok(items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| self.map_item(item, idx, country, &verification))
            .collect())
    }

    fn map_item(&self, item: &serde_json::Value, idx: usize, country: &str, verification: &str) -> Option<TariffEntry> {
        let f = &self.fields;
        let text = |path: &Option<String>| -> String {
            path.as_deref()
                .and_then(|p| json_extract(item, p))
                .map(json_value_to_string)
                .unwrap_or_default()
        };

        let item_country = text(&f.country);
        if !item_country.is_empty() && country_key(&item_country) != country_key(country) {
            return None;
        }
        let country_name = if item_country.is_empty() { country.trim().to_string() } else { item_country };

        let sector = or_default(text(&f.sector), ALL_SECTORS);

        let raw_rate = json_extract(item, &f.rate).map(RawRate::from).unwrap_or(RawRate::Missing);
        let reading = match try_normalize(raw_rate) {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("{}: item {idx} ({country_name} / {sector}): {e}; dropped", self.name);
                return None;
            }
        };

        let status_text = text(&f.status);
        let status = if status_text.is_empty() {
            match reading {
                RateReading::Unresolved => TariffStatus::UnderInvestigation,
                RateReading::Rate(_) => TariffStatus::Active,
            }
        } else {
            match status_text.parse::<TariffStatus>() {
                Ok(status) => status,
                Err(e) => {
                    log::warn!("{}: item {idx} ({country_name} / {sector}): {e}; dropped", self.name);
                    return None;
                }
            }
        };

        let hts = f
            .hts_codes
            .as_deref()
            .and_then(|p| json_extract(item, p))
            .map(hts_list)
            .unwrap_or_default();
        let hts: Vec<&str> = if hts.is_empty() { vec![ALL_HTS] } else { hts.iter().map(String::as_str).collect() };

        let authority = or_default(text(&f.authority), &self.name);

        Some(
            TariffEntry::new(&country_name, &sector, reading.pct(), status, &authority)
                .with_hts(&hts)
                .with_effective_date(&text(&f.effective_date))
                .with_notes(&text(&f.notes))
                .with_verification(verification),
        )
    }
}

/// HTS codes as either a JSON array or a comma/semicolon separated string.
fn hts_list(value: &serde_json::Value) -> Vec<String> {
    let parts: Vec<String> = match value {
        serde_json::Value::Array(items) => items.iter().map(json_value_to_string).collect(),
        other => json_value_to_string(other).split([',', ';']).map(str::to_string).collect(),
    };
    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn or_default(text: String, default: &str) -> String {
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

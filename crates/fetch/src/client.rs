//! Blocking HTTP client for tariff endpoints (no Tokio runtime required).
//!
//! One GET per endpoint per resolution. No retries: a failed or slow
//! endpoint falls through to the next source instead.

use std::time::Duration;

use tariffscope_recon::TariffEntry;

use crate::endpoint::EndpointConfig;
use crate::error::FetchError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const USER_AGENT: &str = concat!("tariffscope/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct LiveApiClient {
    http: reqwest::blocking::Client,
}

impl LiveApiClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { http })
    }

    /// GET `url` as JSON. `Ok(None)` on 404: the API does not know the country.
    pub fn get_json(&self, url: &str, bearer: Option<&str>) -> Result<Option<serde_json::Value>, FetchError> {
        let mut request = self.http.get(url).header("accept", "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            let body = truncate(&body, 200);
            return Err(match status {
                401 | 403 => FetchError::Auth(status, body),
                429 => FetchError::RateLimited(body),
                _ => FetchError::Upstream(status, body),
            });
        }

        let text = response.text()?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| FetchError::Parse(format!("{url}: {e}")))
    }

    /// Query one endpoint for `country` and map the response.
    pub fn fetch_endpoint(&self, endpoint: &EndpointConfig, country: &str) -> Result<Vec<TariffEntry>, FetchError> {
        let token = match &endpoint.api_key_env {
            Some(var) => match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => Some(value),
                _ => return Err(FetchError::MissingApiKey(var.clone())),
            },
            None => None,
        };

        let url = endpoint.url_for(country);
        log::debug!("{}: GET {url}", endpoint.name);
        let Some(body) = self.get_json(&url, token.as_deref())? else {
            log::debug!("{}: 404 for '{}'", endpoint.name, country.trim());
            return Ok(Vec::new());
        };

        endpoint
            .map_response(&body, country)
            .map_err(|msg| FetchError::Parse(format!("{}: {msg}", endpoint.name)))
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

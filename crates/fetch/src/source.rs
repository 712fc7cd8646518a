use std::time::Duration;

use tariffscope_recon::{SourceError, SourceTier, TariffEntry, TariffSource};

use crate::client::{LiveApiClient, DEFAULT_TIMEOUT_SECS};
use crate::endpoint::EndpointConfig;
use crate::error::FetchError;

pub const LIVE_API_NAME: &str = "Live Government API";

/// Highest-priority source: every configured endpoint is queried in
/// parallel and their entries are concatenated.
///
/// Endpoints that fail are logged and skipped as long as one succeeds.
/// When all of them fail the first error is returned, which the resolver
/// treats as "nothing here".
pub struct LiveApiSource {
    client: LiveApiClient,
    endpoints: Vec<EndpointConfig>,
}

impl LiveApiSource {
    pub fn new(endpoints: Vec<EndpointConfig>, timeout: Duration) -> Result<Self, FetchError> {
        for endpoint in &endpoints {
            endpoint.validate().map_err(FetchError::InvalidEndpoint)?;
        }
        Ok(Self {
            client: LiveApiClient::new(timeout)?,
            endpoints,
        })
    }

    pub fn with_default_timeout(endpoints: Vec<EndpointConfig>) -> Result<Self, FetchError> {
        Self::new(endpoints, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn endpoints(&self) -> &[EndpointConfig] {
        &self.endpoints
    }

    /// Per-endpoint outcomes for `country`, in configuration order.
    pub fn fetch_all(&self, country: &str) -> Vec<(&str, Result<Vec<TariffEntry>, FetchError>)> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .endpoints
                .iter()
                .map(|endpoint| scope.spawn(move || self.client.fetch_endpoint(endpoint, country)))
                .collect();

            handles
                .into_iter()
                .zip(&self.endpoints)
                .map(|(handle, endpoint)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(FetchError::Network(format!("{} worker panicked", endpoint.name))));
                    (endpoint.name.as_str(), result)
                })
                .collect()
        })
    }
}

impl TariffSource for LiveApiSource {
    fn name(&self) -> &str {
        LIVE_API_NAME
    }

    fn tier(&self) -> SourceTier {
        SourceTier::LiveApi
    }

    fn fetch(&self, country: &str, _sector: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
        if self.endpoints.is_empty() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut first_error = None;
        let mut any_ok = false;

        for (name, result) in self.fetch_all(country) {
            match result {
                Ok(found) => {
                    any_ok = true;
                    entries.extend(found);
                }
                Err(e) => {
                    log::warn!("{name}: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if !any_ok => Err(e.into()),
            _ => Ok(entries),
        }
    }
}

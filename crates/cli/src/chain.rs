// Adapter chain assembly from configuration.

use tariffscope_config::TariffConfig;
use tariffscope_fetch::{FetchError, LiveApiSource};
use tariffscope_io::DocumentSource;
use tariffscope_recon::tables::{static_fallback, verified_tracker};
use tariffscope_recon::{ReprieveOverlay, Resolver, TariffSource};

/// Build the resolver for one CLI invocation.
///
/// Sources are added in priority order (the resolver re-sorts by tier
/// anyway). `offline` drops the live API regardless of config.
pub fn build_resolver(config: &TariffConfig, offline: bool) -> Result<Resolver, FetchError> {
    let mut sources: Vec<Box<dyn TariffSource>> = Vec::new();

    if config.live_api.enabled && !offline && !config.live_api.endpoints.is_empty() {
        let live = LiveApiSource::new(config.live_api.endpoints.clone(), config.live_api.timeout())?;
        sources.push(Box::new(live));
    } else if config.live_api.enabled && offline {
        log::debug!("--offline: live API skipped");
    }

    if config.document.enabled {
        let path = config.document.effective_path();
        log::debug!("structured document: {}", path.display());
        sources.push(Box::new(DocumentSource::new(path).with_sheet(config.document.sheet.as_deref())));
    }

    if config.sources.verified_tracker {
        sources.push(Box::new(verified_tracker()));
    }
    if config.sources.static_fallback {
        sources.push(Box::new(static_fallback()));
    }

    if !config.reprieves.is_empty() {
        sources = sources
            .into_iter()
            .map(|source| -> Box<dyn TariffSource> {
                Box::new(ReprieveOverlay::new(source, config.reprieves.clone()))
            })
            .collect();
    }

    let ttl = chrono::Duration::try_hours(config.cache.ttl_hours).unwrap_or(chrono::Duration::MAX);
    Ok(Resolver::new(sources).with_ttl(ttl))
}

//! Priority-ordered resolution of one effective tariff rate per country.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::aggregate::aggregate_entries;
use crate::cache::TariffCache;
use crate::model::{
    country_key, source_label, Confidence, CountryTariffView, ResolvedCountryTariff, SourceTier, TariffEntry,
};
use crate::source::TariffSource;

/// One row of [`Resolver::source_summaries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub position: usize,
    pub name: String,
    pub tier: SourceTier,
    pub confidence: Confidence,
}

/// Walks the adapter chain for a country and memoizes the answer.
///
/// Construct once at startup and share (`Arc<Resolver>`); it holds no
/// global state.
pub struct Resolver {
    sources: Vec<Box<dyn TariffSource>>,
    cache: TariffCache,
}

impl Resolver {
    /// Adapters are ordered by tier. Within a tier the given order is kept.
    pub fn new(mut sources: Vec<Box<dyn TariffSource>>) -> Self {
        sources.sort_by_key(|s| s.tier());
        Self {
            sources,
            cache: TariffCache::default(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = TariffCache::new(ttl);
        self
    }

    pub fn cache(&self) -> &TariffCache {
        &self.cache
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn resolve(&self, country: &str) -> ResolvedCountryTariff {
        self.resolve_at(country, Utc::now())
    }

    /// Cached answer if still valid at `now`, otherwise a fresh walk of the
    /// chain. Never fails; the worst case is a "No Data" answer.
    pub fn resolve_at(&self, country: &str, now: DateTime<Utc>) -> ResolvedCountryTariff {
        if country_key(country).is_empty() {
            return ResolvedCountryTariff::no_data(country, now);
        }

        if let Some(hit) = self.cache.get_at(country, now) {
            log::debug!("cache hit for '{}'", country.trim());
            return hit;
        }

        let resolved = self.walk(country, None, now);
        self.cache.insert_at(country, resolved.clone(), now);
        resolved
    }

    /// Drop any cached answer for `country` and resolve again.
    pub fn refresh(&self, country: &str) -> ResolvedCountryTariff {
        self.cache.invalidate(country);
        self.resolve(country)
    }

    /// Sector-filtered resolution. Same chain and short-circuit rules,
    /// but the answer is not cached.
    pub fn resolve_sector(&self, country: &str, sector: &str) -> ResolvedCountryTariff {
        let now = Utc::now();
        if country_key(country).is_empty() {
            return ResolvedCountryTariff::no_data(country, now);
        }
        self.walk(country, Some(sector), now)
    }

    /// Country answer narrowed to entries covering `hts_code`.
    pub fn resolve_hts(&self, country: &str, hts_code: &str) -> ResolvedCountryTariff {
        let mut resolved = self.resolve(country);
        if !resolved.has_data() {
            return resolved;
        }
        resolved.entries.retain(|e| e.covers_hts(hts_code));
        let agg = aggregate_entries(&resolved.entries);
        resolved.average_rate_pct = agg.average_rate_pct;
        resolved.affected_sectors = agg.affected_sectors;
        resolved
    }

    pub fn resolve_many<S: AsRef<str>>(&self, countries: &[S]) -> Vec<ResolvedCountryTariff> {
        countries.iter().map(|c| self.resolve(c.as_ref())).collect()
    }

    /// Union of every enumerable source's countries, sorted, first spelling wins.
    pub fn known_countries(&self) -> Vec<String> {
        let mut by_key: std::collections::BTreeMap<String, String> = std::collections::BTreeMap::new();
        for source in &self.sources {
            for name in source.countries() {
                by_key.entry(country_key(&name)).or_insert(name);
            }
        }
        by_key.into_values().collect()
    }

    pub fn source_summaries(&self) -> Vec<SourceSummary> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, s)| SourceSummary {
                position: i + 1,
                name: s.name().to_string(),
                tier: s.tier(),
                confidence: s.tier().confidence(),
            })
            .collect()
    }

    fn walk(&self, country: &str, sector: Option<&str>, now: DateTime<Utc>) -> ResolvedCountryTariff {
        for source in &self.sources {
            let entries = query_guarded(source.as_ref(), country, sector);
            if entries.is_empty() {
                log::debug!("{}: nothing for '{}', falling through", source.name(), country.trim());
                continue;
            }
            log::debug!("{}: {} entries for '{}'", source.name(), entries.len(), country.trim());
            return build_resolution(source.as_ref(), entries, now);
        }

        log::debug!("no source knows '{}'", country.trim());
        ResolvedCountryTariff::no_data(country, now)
    }
}

/// `query` already swallows errors; this also contains adapter panics so a
/// misbehaving source cannot take resolution down with it.
fn query_guarded(source: &dyn TariffSource, country: &str, sector: Option<&str>) -> Vec<TariffEntry> {
    match catch_unwind(AssertUnwindSafe(|| source.query(country, sector))) {
        Ok(entries) => entries,
        Err(_) => {
            log::error!("{} panicked while resolving '{}'; skipping", source.name(), country.trim());
            Vec::new()
        }
    }
}

fn build_resolution(source: &dyn TariffSource, entries: Vec<TariffEntry>, now: DateTime<Utc>) -> ResolvedCountryTariff {
    let agg = aggregate_entries(&entries);
    let country = entries.first().map(|e| e.country.clone()).unwrap_or_default();
    ResolvedCountryTariff {
        country,
        average_rate_pct: agg.average_rate_pct,
        source_label: source_label(source.name(), &entries),
        confidence: source.tier().confidence(),
        affected_sectors: agg.affected_sectors,
        entries,
        tier: Some(source.tier()),
        resolved_at: now,
    }
}

/// The one operation collaborators (HTTP routes, CLI, dashboards) call.
pub fn resolve_country_tariff(resolver: &Resolver, country_name: &str) -> CountryTariffView {
    resolver.resolve(country_name).view()
}

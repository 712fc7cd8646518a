//! Built-in hardcoded tables exposed as [`TariffSource`] adapters.
//!
//! Rates are kept as the raw text the upstream tables used (`"25%"`,
//! `"TBD"`, `"120% or $100 per item"`) and run through the normalizer once,
//! when the table is built. Rows that fail normalization are dropped.

mod fallback;
mod tracker;

use std::collections::HashMap;

use crate::error::SourceError;
use crate::model::{country_key, SourceTier, TariffEntry, TariffStatus};
use crate::normalize::try_normalize;
use crate::source::TariffSource;

pub use fallback::{static_fallback, STATIC_FALLBACK_NAME};
pub use tracker::{verified_tracker, TRACKER_AUTHORITY, VERIFIED_TRACKER_NAME};

// ---------------------------------------------------------------------------
// Row literal
// ---------------------------------------------------------------------------

/// One hardcoded row before normalization.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableRow {
    pub country: &'static str,
    pub sector: &'static str,
    pub rate: &'static str,
    pub status: TariffStatus,
    pub hts: &'static [&'static str],
    pub effective: &'static str,
    pub authority: &'static str,
    pub notes: &'static str,
}

#[allow(clippy::too_many_arguments)]
pub(crate) const fn row(
    country: &'static str,
    sector: &'static str,
    rate: &'static str,
    status: TariffStatus,
    hts: &'static [&'static str],
    effective: &'static str,
    authority: &'static str,
    notes: &'static str,
) -> TableRow {
    TableRow {
        country,
        sector,
        rate,
        status,
        hts,
        effective,
        authority,
        notes,
    }
}

impl TableRow {
    /// Normalized entry, or `None` when the rate text is unreadable.
    pub(crate) fn to_entry(&self, verification: &str) -> Option<TariffEntry> {
        let rate = match try_normalize(self.rate) {
            Ok(reading) => reading.pct(),
            Err(e) => {
                log::warn!("dropping {} / {}: {e}", self.country, self.sector);
                return None;
            }
        };
        Some(
            TariffEntry::new(self.country, self.sector, rate, self.status, self.authority)
                .with_hts(self.hts)
                .with_effective_date(self.effective)
                .with_notes(self.notes)
                .with_verification(verification),
        )
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// In-memory table keyed by country. Always available.
#[derive(Debug, Clone)]
pub struct TableSource {
    name: String,
    tier: SourceTier,
    by_country: HashMap<String, Vec<TariffEntry>>,
    countries: Vec<String>,
}

impl TableSource {
    pub fn from_entries(name: &str, tier: SourceTier, entries: Vec<TariffEntry>) -> Self {
        let mut by_country: HashMap<String, Vec<TariffEntry>> = HashMap::new();
        let mut countries = Vec::new();
        for entry in entries {
            let key = country_key(&entry.country);
            if !by_country.contains_key(&key) {
                countries.push(entry.country.clone());
            }
            by_country.entry(key).or_default().push(entry);
        }
        Self {
            name: name.to_string(),
            tier,
            by_country,
            countries,
        }
    }

    pub(crate) fn from_rows(name: &str, tier: SourceTier, rows: &[TableRow], verification: &str) -> Self {
        let entries = rows.iter().filter_map(|r| r.to_entry(verification)).collect();
        Self::from_entries(name, tier, entries)
    }

    pub fn entry_count(&self) -> usize {
        self.by_country.values().map(Vec::len).sum()
    }
}

impl TariffSource for TableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> SourceTier {
        self.tier
    }

    fn fetch(&self, country: &str, _sector: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
        Ok(self.by_country.get(&country_key(country)).cloned().unwrap_or_default())
    }

    fn countries(&self) -> Vec<String> {
        self.countries.clone()
    }
}

//! The uniform adapter contract every tariff data source implements.

use crate::error::SourceError;
use crate::model::{SourceTier, TariffEntry};

/// One tariff data source (live API, annex spreadsheet, tracker table, ...).
///
/// Implementors write [`fetch`](TariffSource::fetch) and may fail freely.
/// Callers use [`query`](TariffSource::query), which turns any failure into
/// an empty list so that "unavailable" and "no data for this country" look
/// the same to the resolver.
pub trait TariffSource: Send + Sync {
    /// Provenance label for this adapter.
    fn name(&self) -> &str;

    fn tier(&self) -> SourceTier;

    /// All known entries for `country`. An empty `Ok` means the country is
    /// unknown to this source. `sector` is a hint; [`query`](TariffSource::query)
    /// filters the result regardless.
    fn fetch(&self, country: &str, sector: Option<&str>) -> Result<Vec<TariffEntry>, SourceError>;

    /// Country names this source can enumerate. Empty for sources that can
    /// only be asked about one country at a time.
    fn countries(&self) -> Vec<String> {
        Vec::new()
    }

    fn query(&self, country: &str, sector: Option<&str>) -> Vec<TariffEntry> {
        match self.fetch(country, sector) {
            Ok(entries) => filter_sector(entries, sector),
            Err(e) => {
                log::warn!("{} [{}]: {e}; treating as empty for '{}'", self.name(), self.tier(), country.trim());
                Vec::new()
            }
        }
    }
}

impl<S: TariffSource + ?Sized> TariffSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn tier(&self) -> SourceTier {
        (**self).tier()
    }

    fn fetch(&self, country: &str, sector: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
        (**self).fetch(country, sector)
    }

    fn countries(&self) -> Vec<String> {
        (**self).countries()
    }

    fn query(&self, country: &str, sector: Option<&str>) -> Vec<TariffEntry> {
        (**self).query(country, sector)
    }
}

/// Keep entries for `sector` (case-insensitive) plus country-wide "All" rows.
pub fn filter_sector(entries: Vec<TariffEntry>, sector: Option<&str>) -> Vec<TariffEntry> {
    let Some(wanted) = sector.map(str::trim).filter(|s| !s.is_empty()) else {
        return entries;
    };
    entries
        .into_iter()
        .filter(|e| e.is_country_wide() || e.sector.trim().eq_ignore_ascii_case(wanted))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TariffStatus;

    struct Failing;

    impl TariffSource for Failing {
        fn name(&self) -> &str {
            "Failing"
        }

        fn tier(&self) -> SourceTier {
            SourceTier::LiveApi
        }

        fn fetch(&self, _: &str, _: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }
    }

    struct Fixed;

    impl TariffSource for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn tier(&self) -> SourceTier {
            SourceTier::StaticFallback
        }

        fn fetch(&self, country: &str, _: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
            Ok(vec![
                TariffEntry::new(country, "Steel and Aluminum", 25.0, TariffStatus::Active, "Fixed"),
                TariffEntry::new(country, "Autos", 25.0, TariffStatus::Active, "Fixed"),
                TariffEntry::new(country, "All", 10.0, TariffStatus::Active, "Fixed"),
            ])
        }
    }

    #[test]
    fn query_swallows_errors() {
        assert!(Failing.query("China", None).is_empty());
    }

    #[test]
    fn query_filters_sector_but_keeps_country_wide() {
        let rows = Fixed.query("Japan", Some("steel and aluminum"));
        let sectors: Vec<&str> = rows.iter().map(|e| e.sector.as_str()).collect();
        assert_eq!(sectors, vec!["Steel and Aluminum", "All"]);

        assert_eq!(Fixed.query("Japan", None).len(), 3);
        assert_eq!(Fixed.query("Japan", Some("  ")).len(), 3);
    }

    #[test]
    fn boxed_sources_delegate() {
        let boxed: Box<dyn TariffSource> = Box::new(Fixed);
        assert_eq!(boxed.name(), "Fixed");
        assert_eq!(boxed.query("Japan", Some("Autos")).len(), 2);
    }
}

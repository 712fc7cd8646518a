//! Operator-declared reprieves layered over any source.
//!
//! A reprieve marks every currently Active entry for a country as
//! Reprieved, so it stops counting toward the average while the rows stay
//! visible. Used for pauses announced after a table was last updated.

use serde::Deserialize;

use crate::error::SourceError;
use crate::model::{country_key, SourceTier, TariffEntry, TariffStatus};
use crate::source::TariffSource;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reprieve {
    pub country: String,
    #[serde(default)]
    pub note: String,
}

impl Reprieve {
    pub fn new(country: &str, note: &str) -> Self {
        Self {
            country: country.to_string(),
            note: note.to_string(),
        }
    }

    fn applies_to(&self, country: &str) -> bool {
        country_key(&self.country) == country_key(country)
    }

    fn apply(&self, entry: &mut TariffEntry) {
        if entry.status != TariffStatus::Active {
            return;
        }
        entry.status = TariffStatus::Reprieved;
        if self.note.is_empty() {
            return;
        }
        if entry.notes.is_empty() {
            entry.notes = self.note.clone();
        } else {
            entry.notes = format!("{}; {}", entry.notes, self.note);
        }
    }
}

/// Wraps a source and rewrites its rows for reprieved countries.
///
/// Name, tier and country list pass through untouched, so the overlay is
/// invisible in source listings.
pub struct ReprieveOverlay<S> {
    inner: S,
    reprieves: Vec<Reprieve>,
}

impl<S: TariffSource> ReprieveOverlay<S> {
    pub fn new(inner: S, reprieves: Vec<Reprieve>) -> Self {
        Self { inner, reprieves }
    }

    pub fn reprieves(&self) -> &[Reprieve] {
        &self.reprieves
    }
}

impl<S: TariffSource> TariffSource for ReprieveOverlay<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn tier(&self) -> SourceTier {
        self.inner.tier()
    }

    fn fetch(&self, country: &str, sector: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
        let mut entries = self.inner.fetch(country, sector)?;
        for reprieve in self.reprieves.iter().filter(|r| r.applies_to(country)) {
            log::debug!("reprieve applied to '{}' rows from {}", country.trim(), self.inner.name());
            entries.iter_mut().for_each(|e| reprieve.apply(e));
        }
        Ok(entries)
    }

    fn countries(&self) -> Vec<String> {
        self.inner.countries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_entries;
    use crate::tables::TableSource;

    fn table() -> TableSource {
        TableSource::from_entries(
            "Static",
            SourceTier::StaticFallback,
            vec![
                TariffEntry::new("Mexico", "Autos", 25.0, TariffStatus::Active, "IEEPA").with_notes("Non-USMCA"),
                TariffEntry::new("Mexico", "Steel", 25.0, TariffStatus::Active, "Section 232"),
                TariffEntry::new("Mexico", "USMCA", 0.0, TariffStatus::Exempt, "USMCA"),
                TariffEntry::new("Canada", "Steel", 25.0, TariffStatus::Active, "Section 232"),
            ],
        )
    }

    #[test]
    fn active_rows_become_reprieved() {
        let overlay = ReprieveOverlay::new(table(), vec![Reprieve::new("mexico", "90-day pause")]);
        let rows = overlay.query("Mexico", None);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].status, TariffStatus::Reprieved);
        assert_eq!(rows[0].notes, "Non-USMCA; 90-day pause");
        assert_eq!(rows[1].notes, "90-day pause");
        assert_eq!(rows[2].status, TariffStatus::Exempt);
        assert_eq!(rows[2].notes, "");
        assert_eq!(aggregate_entries(&rows).average_rate_pct, 0.0);
    }

    #[test]
    fn other_countries_untouched() {
        let overlay = ReprieveOverlay::new(table(), vec![Reprieve::new("Mexico", "")]);
        let rows = overlay.query("Canada", None);
        assert_eq!(rows[0].status, TariffStatus::Active);
        assert_eq!(overlay.name(), "Static");
        assert_eq!(overlay.tier(), SourceTier::StaticFallback);
        assert_eq!(overlay.countries(), vec!["Mexico", "Canada"]);
    }
}

use std::collections::HashSet;

use crate::model::TariffEntry;

/// Aggregate view over one country's entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RateAggregate {
    /// Mean `rate_pct` of Active entries, `0.0` when there are none.
    pub average_rate_pct: f64,
    /// Sectors of Active entries in first-seen order, without duplicates.
    pub affected_sectors: Vec<String>,
    pub active_count: usize,
}

/// Average over Active entries only. Exempt, reprieved, quota and
/// under-investigation rows never pull the mean toward zero.
pub fn aggregate_entries(entries: &[TariffEntry]) -> RateAggregate {
    let mut sum = 0.0;
    let mut active_count = 0;
    let mut seen = HashSet::new();
    let mut affected_sectors = Vec::new();

    for entry in entries.iter().filter(|e| e.status.is_active()) {
        sum += entry.rate_pct;
        active_count += 1;
        if seen.insert(entry.sector.to_ascii_lowercase()) {
            affected_sectors.push(entry.sector.clone());
        }
    }

    let average_rate_pct = if active_count == 0 { 0.0 } else { sum / active_count as f64 };

    RateAggregate {
        average_rate_pct,
        affected_sectors,
        active_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TariffStatus;

    fn entry(sector: &str, rate: f64, status: TariffStatus) -> TariffEntry {
        TariffEntry::new("Testland", sector, rate, status, "test")
    }

    #[test]
    fn exempt_rows_do_not_dilute_the_mean() {
        let agg = aggregate_entries(&[
            entry("Steel", 25.0, TariffStatus::Active),
            entry("Pharma", 0.0, TariffStatus::Exempt),
        ]);
        assert_eq!(agg.average_rate_pct, 25.0);
        assert_eq!(agg.affected_sectors, vec!["Steel"]);
        assert_eq!(agg.active_count, 1);
    }

    #[test]
    fn no_active_rows_means_zero() {
        let agg = aggregate_entries(&[
            entry("Autos", 25.0, TariffStatus::Reprieved),
            entry("Energy", 10.0, TariffStatus::UnderInvestigation),
            entry("Sugar", 12.0, TariffStatus::Quota),
        ]);
        assert_eq!(agg.average_rate_pct, 0.0);
        assert!(agg.affected_sectors.is_empty());
    }

    #[test]
    fn sectors_deduplicate_case_insensitively() {
        let agg = aggregate_entries(&[
            entry("Steel", 50.0, TariffStatus::Active),
            entry("steel", 25.0, TariffStatus::Active),
            entry("Autos", 15.0, TariffStatus::Active),
        ]);
        assert_eq!(agg.average_rate_pct, 30.0);
        assert_eq!(agg.affected_sectors, vec!["Steel", "Autos"]);
    }

    #[test]
    fn active_zero_rate_still_counts() {
        let agg = aggregate_entries(&[
            entry("All", 0.0, TariffStatus::Active),
            entry("Steel", 20.0, TariffStatus::Active),
        ]);
        assert_eq!(agg.average_rate_pct, 10.0);
    }
}

//! Verified third-party tracker table (Atlantic Council Trump Tariff Tracker).
//!
//! Three layers per country: the reciprocal IEEPA rate (sector "All"),
//! country-specific actions, and the global Section 232 sectoral rates.
//! A country-specific row replaces the global row for the same sector.
//! EU member states inherit the European Union rows under their own name.

use std::collections::HashSet;

use crate::model::{SourceTier, TariffStatus, TariffStatus::*};

use super::{row, TableRow, TableSource};

pub const VERIFIED_TRACKER_NAME: &str = "Verified Tracker";
pub const TRACKER_AUTHORITY: &str = "Atlantic Council Tracker";

const VERIFICATION: &str = "Cross-checked against Atlantic Council Trump Tariff Tracker (Aug 2025)";

/// (country, reciprocal rate, effective date, legal basis)
const RECIPROCAL: &[(&str, &str, &str, &str)] = &[
    ("European Union", "15%", "8/7/2025", "IEEPA reciprocal; 15% all-in ceiling incl. MFN"),
    ("China", "10%", "5/14/2025", "IEEPA reciprocal; 34% suspended to 10% pending talks"),
    ("Canada", "0%", "8/1/2025", "Not subject to reciprocal schedule"),
    ("Mexico", "0%", "8/1/2025", "Not subject to reciprocal schedule"),
    ("Japan", "15%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("South Korea", "15%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("United Kingdom", "10%", "4/5/2025", "IEEPA baseline; Economic Prosperity Deal"),
    ("Switzerland", "39%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Vietnam", "20%", "8/7/2025", "IEEPA reciprocal; 40% on transshipment"),
    ("India", "25%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Brazil", "10%", "4/5/2025", "IEEPA baseline"),
    ("Taiwan", "20%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Thailand", "19%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Indonesia", "19%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Philippines", "19%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Malaysia", "19%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Cambodia", "19%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Pakistan", "19%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Bangladesh", "20%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Sri Lanka", "20%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("South Africa", "30%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Laos", "40%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Myanmar", "40%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Syria", "41%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Iraq", "35%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Serbia", "35%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Algeria", "30%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Kazakhstan", "25%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Tunisia", "25%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Israel", "15%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Turkey", "15%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("New Zealand", "15%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Norway", "15%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Nicaragua", "18%", "8/7/2025", "IEEPA reciprocal (EO 14326)"),
    ("Australia", "10%", "4/5/2025", "IEEPA baseline"),
    ("Singapore", "10%", "4/5/2025", "IEEPA baseline"),
    ("Chile", "10%", "4/5/2025", "IEEPA baseline"),
    ("Saudi Arabia", "10%", "4/5/2025", "IEEPA baseline"),
];

const EU_MEMBERS: &[&str] = &[
    "Germany", "France", "Italy", "Netherlands", "Ireland", "Spain", "Belgium", "Poland", "Austria", "Sweden",
];

const COUNTRY_ROWS: &[TableRow] = &[
    // China
    row("China", "Fentanyl Emergency (IEEPA)", "20%", Active, &["All"], "3/4/2025", TRACKER_AUTHORITY, "IEEPA fentanyl action, raised from 10%"),
    row("China", "Electronics and Technology", "25%", Active, &["8471", "8517", "8542"], "2018-2020", TRACKER_AUTHORITY, "Section 301 Lists 1-3"),
    row("China", "Electric Vehicles", "100%", Active, &["8703.80"], "9/27/2024", TRACKER_AUTHORITY, "Section 301 four-year review"),
    // Canada
    row("Canada", "Fentanyl Emergency (IEEPA)", "35%", Active, &["All"], "8/1/2025", TRACKER_AUTHORITY, "Non-USMCA goods only"),
    row("Canada", "USMCA-Compliant Goods", "0%", Exempt, &["All"], "3/7/2025", TRACKER_AUTHORITY, "USMCA exemption"),
    row("Canada", "Energy and Potash", "10%", Active, &["2709", "2711", "3104"], "3/4/2025", TRACKER_AUTHORITY, "Non-USMCA energy"),
    // Mexico
    row("Mexico", "Fentanyl Emergency (IEEPA)", "25%", Active, &["All"], "3/4/2025", TRACKER_AUTHORITY, "Non-USMCA goods; increase to 30% paused 90 days"),
    row("Mexico", "USMCA-Compliant Goods", "0%", Exempt, &["All"], "3/7/2025", TRACKER_AUTHORITY, "USMCA exemption"),
    // Japan / South Korea / EU deal rates
    row("Japan", "Automobiles and Parts", "15%", Active, &["8703", "8708"], "9/16/2025", TRACKER_AUTHORITY, "Section 232 deal rate"),
    row("South Korea", "Automobiles and Parts", "15%", Active, &["8703", "8708"], "11/1/2025", TRACKER_AUTHORITY, "Section 232 deal rate"),
    row("European Union", "Automobiles and Parts", "15%", Active, &["8703", "8708"], "8/1/2025", TRACKER_AUTHORITY, "Section 232 deal rate"),
    row("European Union", "Pharmaceuticals", "15%", Active, &["3004"], "9/1/2025", TRACKER_AUTHORITY, "Deal ceiling on future 232 action"),
    // United Kingdom
    row("United Kingdom", "Steel and Aluminum", "25%", Active, &["72", "73", "76"], "6/4/2025", TRACKER_AUTHORITY, "Section 232 at UK rate"),
    row("United Kingdom", "Automobiles and Parts", "10%", Quota, &["8703"], "6/30/2025", TRACKER_AUTHORITY, "100,000-vehicle quota"),
    // India
    row("India", "Russian Oil Penalty (IEEPA)", "25%", Active, &["All"], "8/27/2025", TRACKER_AUTHORITY, "EO 14329"),
    row("India", "Pharmaceuticals", "0%", Exempt, &["3004"], "4/5/2025", TRACKER_AUTHORITY, "Annex II exemption"),
    // Brazil
    row("Brazil", "Brazil Emergency (IEEPA)", "40%", Active, &["All"], "8/6/2025", TRACKER_AUTHORITY, "EO 14323"),
    row("Brazil", "Civil Aircraft", "0%", Exempt, &["8802"], "8/6/2025", TRACKER_AUTHORITY, "EO 14323 Annex I exemption"),
    row("Brazil", "Orange Juice", "0%", Exempt, &["2009.11", "2009.12"], "8/6/2025", TRACKER_AUTHORITY, "EO 14323 Annex I exemption"),
    // Vietnam
    row("Vietnam", "Transshipped Goods", "40%", Active, &["All"], "8/7/2025", TRACKER_AUTHORITY, "Applies to goods deemed transshipped"),
    // Switzerland
    row("Switzerland", "Pharmaceuticals", "0%", Exempt, &["3004"], "4/5/2025", TRACKER_AUTHORITY, "Annex II exemption"),
];

/// (sector, rate, status, hts, effective, notes) applied to every country.
const SECTORAL: &[(&str, &str, TariffStatus, &[&str], &str, &str)] = &[
    ("Steel and Aluminum", "50%", Active, &["72", "73", "76"], "6/4/2025", "Section 232"),
    ("Automobiles and Parts", "25%", Active, &["8703", "8708"], "4/3/2025", "Section 232"),
    ("Copper", "50%", Active, &["7403", "7407", "7408"], "8/1/2025", "Section 232 semi-finished copper"),
    ("Semiconductors", "TBD", UnderInvestigation, &["8541", "8542"], "TBD", "Section 232 investigation"),
];

fn tracker_rows() -> Vec<TableRow> {
    let eu_rows: Vec<TableRow> = country_rows("European Union");

    let mut rows = Vec::new();
    for &(country, ..) in RECIPROCAL {
        rows.extend(country_rows(country));
    }
    for &member in EU_MEMBERS {
        rows.extend(eu_rows.iter().map(|r| TableRow { country: member, ..*r }));
    }
    rows
}

fn country_rows(country: &'static str) -> Vec<TableRow> {
    let mut rows = Vec::new();
    if let Some(&(_, rate, effective, notes)) = RECIPROCAL.iter().find(|(c, ..)| *c == country) {
        rows.push(row(country, "All", rate, Active, &["All"], effective, TRACKER_AUTHORITY, notes));
    }

    let specific: Vec<TableRow> = COUNTRY_ROWS.iter().filter(|r| r.country == country).copied().collect();
    let overridden: HashSet<&str> = specific.iter().map(|r| r.sector).collect();
    rows.extend(specific);

    for &(sector, rate, status, hts, effective, notes) in SECTORAL {
        if !overridden.contains(sector) {
            rows.push(row(country, sector, rate, status, hts, effective, TRACKER_AUTHORITY, notes));
        }
    }
    rows
}

/// The verified tracker table (Medium confidence).
pub fn verified_tracker() -> TableSource {
    TableSource::from_rows(VERIFIED_TRACKER_NAME, SourceTier::VerifiedTracker, &tracker_rows(), VERIFICATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_entries;
    use crate::source::TariffSource;

    #[test]
    fn covers_reciprocal_and_eu_members() {
        let tracker = verified_tracker();
        assert_eq!(tracker.countries().len(), RECIPROCAL.len() + EU_MEMBERS.len());
        assert!(!tracker.query("Germany", None).is_empty());
        assert!(tracker.query("Russia", None).is_empty());
    }

    #[test]
    fn country_rows_override_global_sectoral_rate() {
        let autos = verified_tracker().query("Japan", Some("Automobiles and Parts"));
        let auto_rows: Vec<_> = autos.iter().filter(|e| e.sector == "Automobiles and Parts").collect();
        assert_eq!(auto_rows.len(), 1);
        assert_eq!(auto_rows[0].rate_pct, 15.0);
    }

    #[test]
    fn investigations_do_not_count() {
        let entries = verified_tracker().query("Thailand", None);
        let agg = aggregate_entries(&entries);
        // All 19, steel 50, autos 25, copper 50; semiconductors pending.
        assert_eq!(agg.average_rate_pct, (19.0 + 50.0 + 25.0 + 50.0) / 4.0);
        assert!(!agg.affected_sectors.contains(&"Semiconductors".to_string()));
    }

    #[test]
    fn provenance_names_the_tracker() {
        let entries = verified_tracker().query("Vietnam", None);
        assert!(entries.iter().all(|e| e.source_name == TRACKER_AUTHORITY));
        assert!(entries.iter().all(|e| e.verification.contains("Atlantic Council")));
    }
}

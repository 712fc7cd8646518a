//! Lowest-priority static table: per-country sector rates, always available.
//!
//! Reflects the Section 301 / 232 era schedule plus the early-2025 IEEPA
//! actions. Only consulted when nothing above it knows the country.

use crate::model::{SourceTier, TariffStatus::*};

use super::{row, TableRow, TableSource};

pub const STATIC_FALLBACK_NAME: &str = "Static Fallback Table";

const VERIFICATION: &str = "Static schedule; not independently verified";

const ROWS: &[TableRow] = &[
    // China
    row("China", "Electronics and Technology", "25%", Active, &["8471", "8473", "8517", "8542"], "2018-2020", "Section 301", "Lists 1-3"),
    row("China", "Steel and Aluminum", "25%", Active, &["7206", "7207", "7208", "7601"], "3/23/2018", "Section 232", ""),
    row("China", "Industrial Machinery", "25%", Active, &["8401", "8402", "8479"], "2018-2020", "Section 301", "List 1"),
    row("China", "Consumer Goods", "30%", Active, &["9503", "6403", "9401"], "3/4/2025", "Section 301 + IEEPA", "List 4A 7.5% plus fentanyl action"),
    row("China", "Solar Panels and Cells", "50%", Active, &["8541.42", "8541.43"], "1/1/2025", "Section 301", "Four-year review increase"),
    row("China", "Agricultural Products", "TBD", UnderInvestigation, &["All"], "TBD", "Section 301", "Phase One compliance review"),
    // Hong Kong
    row("Hong Kong", "Low-Value Parcels (De Minimis)", "120% or $100 per item", Active, &["9802"], "5/2/2025", "IEEPA", "Postal shipments under $800"),
    row("Hong Kong", "Electronics and Technology", "25%", Active, &["8471", "8517"], "2018-2020", "Section 301", "Treated as China origin"),
    // Mexico: USMCA reprieve
    row("Mexico", "Automobiles and Parts", "25%", Reprieved, &["8703", "8708"], "3/6/2025", "IEEPA", "USMCA-compliant goods reprieved"),
    row("Mexico", "Steel and Aluminum", "25%", Reprieved, &["7206", "7601"], "3/12/2025", "Section 232", "USMCA reprieve"),
    row("Mexico", "Agricultural Products", "25%", Reprieved, &["0702", "0804"], "3/6/2025", "IEEPA", "USMCA reprieve"),
    // Canada: USMCA reprieve, lumber duties stand
    row("Canada", "Steel and Aluminum", "25%", Reprieved, &["7206", "7601"], "3/12/2025", "Section 232", "USMCA reprieve"),
    row("Canada", "Energy and Potash", "10%", Reprieved, &["2709", "2711", "3104"], "3/4/2025", "IEEPA", "USMCA reprieve"),
    row("Canada", "Softwood Lumber", "14.54%", Active, &["4407"], "8/13/2024", "AD/CVD", "Combined antidumping and countervailing rate"),
    row("Canada", "Dairy Products", "245.5%", Quota, &["0401", "0402", "0406"], "1/1/2020", "USMCA TRQ", "Over-quota rate"),
    // Vietnam
    row("Vietnam", "Electronics and Technology", "46%", Reprieved, &["8471", "8517"], "4/9/2025", "IEEPA", "90-day pause"),
    row("Vietnam", "Textiles and Apparel", "10%", Active, &["61", "62"], "4/5/2025", "IEEPA", "Baseline rate"),
    row("Vietnam", "Furniture", "10%", Active, &["9401", "9403"], "4/5/2025", "IEEPA", "Baseline rate"),
    // India
    row("India", "Pharmaceuticals", "0%", Exempt, &["3004"], "4/5/2025", "IEEPA", "Annex II exemption"),
    row("India", "Textiles and Apparel", "10%", Active, &["61", "62", "63"], "4/5/2025", "IEEPA", "Baseline rate"),
    row("India", "Steel and Aluminum", "25%", Active, &["7206", "7601"], "3/12/2025", "Section 232", ""),
    // Japan
    row("Japan", "Automobiles and Parts", "25%", Active, &["8703", "8708"], "4/3/2025", "Section 232", ""),
    row("Japan", "Steel and Aluminum", "25%", Active, &["7206", "7601"], "3/12/2025", "Section 232", ""),
    row("Japan", "Electronics and Technology", "10%", Active, &["8471", "8528"], "4/5/2025", "IEEPA", "Baseline rate"),
    // Germany
    row("Germany", "Automobiles and Parts", "25%", Active, &["8703", "8708"], "4/3/2025", "Section 232", ""),
    row("Germany", "Steel and Aluminum", "25%", Active, &["7206", "7601"], "3/12/2025", "Section 232", ""),
    row("Germany", "Industrial Machinery", "10%", Active, &["84"], "4/5/2025", "IEEPA", "Baseline rate"),
    // South Korea
    row("South Korea", "Automobiles and Parts", "25%", Active, &["8703", "8708"], "4/3/2025", "Section 232", ""),
    row("South Korea", "Steel and Aluminum", "25%", Quota, &["7206"], "5/1/2018", "Section 232", "Absolute quota arrangement"),
    row("South Korea", "Electronics and Technology", "10%", Active, &["8471", "8542"], "4/5/2025", "IEEPA", "Baseline rate"),
    // Taiwan
    row("Taiwan", "Semiconductors", "TBD", UnderInvestigation, &["8541", "8542"], "TBD", "Section 232", "Investigation opened 4/1/2025"),
    row("Taiwan", "Electronics and Technology", "10%", Active, &["8471", "8517"], "4/5/2025", "IEEPA", "Baseline rate"),
    // United Kingdom
    row("United Kingdom", "Automobiles and Parts", "10%", Quota, &["8703"], "6/30/2025", "Economic Prosperity Deal", "100,000-vehicle quota"),
    row("United Kingdom", "Steel and Aluminum", "25%", Active, &["7206", "7601"], "3/12/2025", "Section 232", ""),
    row("United Kingdom", "All", "10%", Active, &["All"], "4/5/2025", "IEEPA", "Baseline rate"),
    // Brazil
    row("Brazil", "Steel and Aluminum", "25%", Active, &["7206", "7601"], "3/12/2025", "Section 232", ""),
    row("Brazil", "Agricultural Products", "10%", Active, &["0901", "2009"], "4/5/2025", "IEEPA", "Baseline rate"),
    // Russia: outside the reciprocal schedule
    row("Russia", "Energy Products", "35%", Active, &["2709", "2710"], "4/9/2022", "Column 2", "PNTR revoked"),
    row("Russia", "Steel and Aluminum", "200%", Active, &["7601"], "3/10/2023", "Section 232", "Russian-origin aluminum"),
    // Australia
    row("Australia", "All", "10%", Active, &["All"], "4/5/2025", "IEEPA", "Baseline rate"),
    row("Australia", "Pharmaceuticals", "0%", Exempt, &["3004"], "4/5/2025", "IEEPA", "Annex II exemption"),
];

/// The always-available, lowest-priority table.
pub fn static_fallback() -> TableSource {
    TableSource::from_rows(STATIC_FALLBACK_NAME, SourceTier::StaticFallback, ROWS, VERIFICATION)
}

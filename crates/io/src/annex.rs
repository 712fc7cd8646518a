//! Executive-order annex layout: one row per (country, sector) determination.
//!
//! The header row is located by its `Country` column and may sit below a
//! title block. Columns are matched case-insensitively against a few
//! common spellings. Each row carries a duty rule:
//!
//! - **EU top-up** (`"EU top-up to 15%"`): the addon lifts the base duty to
//!   the target, `max(0, target - base)`. Target defaults to 15%.
//! - **Fixed addon**: the addon column as written.
//! - **Exempt**: rate 0 with status Exempt.
//!
//! A row with no recognizable rule is treated as fixed when it has an
//! addon, and skipped otherwise. Rows whose rate cannot be read are dropped.

use std::collections::HashMap;

use tariffscope_recon::model::{ALL_HTS, ALL_SECTORS};
use tariffscope_recon::{try_normalize, RateReading, TariffEntry, TariffStatus};

use crate::error::DocumentError;
use crate::reader::{CellValue, Grid};

/// Fallback authority when the annex has no authority column.
pub const DEFAULT_AUTHORITY: &str = "Executive Order Annex";

/// Top-up target when the rule text names none.
pub const DEFAULT_TOP_UP_TARGET_PCT: f64 = 15.0;

/// Rows scanned for the header before giving up.
const HEADER_SCAN_ROWS: usize = 20;

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Country,
    Sector,
    Rule,
    BaseDuty,
    Addon,
    Hts,
    EffectiveDate,
    Notes,
    Authority,
    Status,
}

const ALIASES: &[(Column, &[&str])] = &[
    (Column::Country, &["country", "country/region", "trading partner", "partner"]),
    (Column::Sector, &["sector", "product category", "category", "industry"]),
    (Column::Rule, &["rule", "rule type", "duty rule", "calculation"]),
    (Column::BaseDuty, &["base duty", "base rate", "mfn", "mfn rate", "base"]),
    (Column::Addon, &["addon", "additional duty", "additional rate", "rate", "tariff rate"]),
    (Column::Hts, &["hts", "hts code", "hts codes", "hs codes", "heading"]),
    (Column::EffectiveDate, &["effective date", "effective", "date"]),
    (Column::Notes, &["notes", "note", "remarks"]),
    (Column::Authority, &["authority", "source", "legal authority", "legal basis"]),
    (Column::Status, &["status"]),
];

/// Lowercase, drop `-()%`, collapse whitespace: `"Add-on (%)"` → `"addon"`.
fn header_key(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '(' | ')' | '%'))
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn column_for(header: &str) -> Option<Column> {
    let key = header_key(header);
    ALIASES
        .iter()
        .find(|(_, names)| names.contains(&key.as_str()))
        .map(|(column, _)| *column)
}

struct Header {
    row: usize,
    columns: HashMap<Column, usize>,
}

impl Header {
    fn locate(grid: &Grid) -> Result<Self, DocumentError> {
        for (row, cells) in grid.iter().enumerate().take(HEADER_SCAN_ROWS) {
            let mut columns = HashMap::new();
            for (idx, cell) in cells.iter().enumerate() {
                if let Some(column) = column_for(&cell.as_text()) {
                    columns.entry(column).or_insert(idx);
                }
            }
            if columns.contains_key(&Column::Country) {
                return Ok(Self { row, columns });
            }
        }
        Err(DocumentError::MissingColumn("Country"))
    }

    fn has(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    fn cell<'a>(&self, cells: &'a [CellValue], column: Column) -> &'a CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.columns
            .get(&column)
            .and_then(|&idx| cells.get(idx))
            .unwrap_or(EMPTY)
    }

    fn text(&self, cells: &[CellValue], column: Column) -> String {
        self.cell(cells, column).as_text()
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DutyRule {
    TopUp { target_pct: f64 },
    FixedAddon,
    Exempt,
}

impl DutyRule {
    /// `None` for blank or unrecognized rule text.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if ["top-up", "top up", "topup"].iter().any(|k| lower.contains(k)) {
            let target_pct = match try_normalize(text) {
                Ok(RateReading::Rate(pct)) if text.contains('%') => pct,
                _ => DEFAULT_TOP_UP_TARGET_PCT,
            };
            return Some(Self::TopUp { target_pct });
        }
        if lower.contains("exempt") {
            return Some(Self::Exempt);
        }
        if lower.contains("fixed") || lower.contains("addon") || lower.contains("add-on") {
            return Some(Self::FixedAddon);
        }
        None
    }
}

/// Addon under the top-up rule: whatever lifts `base` to `target`, never negative.
pub fn top_up_addon(target_pct: f64, base_pct: f64) -> f64 {
    (target_pct - base_pct).max(0.0)
}

// ---------------------------------------------------------------------------
// Rows → entries
// ---------------------------------------------------------------------------

/// Parse an annex grid into entries. `verification` is stamped on every entry.
pub fn parse_annex(grid: &Grid, verification: &str) -> Result<Vec<TariffEntry>, DocumentError> {
    if grid.is_empty() {
        return Err(DocumentError::Empty);
    }
    let header = Header::locate(grid)?;
    if !header.has(Column::Addon) && !header.has(Column::Rule) {
        return Err(DocumentError::MissingColumn("Addon"));
    }

    let mut entries = Vec::new();
    for (offset, cells) in grid.iter().enumerate().skip(header.row + 1) {
        let line = offset + 1;
        if let Some(entry) = parse_row(&header, cells, line, verification) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn parse_row(header: &Header, cells: &[CellValue], line: usize, verification: &str) -> Option<TariffEntry> {
    let country = header.text(cells, Column::Country);
    if country.is_empty() {
        return None;
    }
    let sector = non_empty_or(header.text(cells, Column::Sector), ALL_SECTORS);
    let addon = header.cell(cells, Column::Addon);

    let rule = match DutyRule::parse(&header.text(cells, Column::Rule)) {
        Some(rule) => rule,
        None if !addon.is_empty() => DutyRule::FixedAddon,
        None => {
            log::warn!("row {line} ({country} / {sector}): no duty rule and no addon; skipped");
            return None;
        }
    };

    let (rate, mut status) = match rule {
        DutyRule::Exempt => (0.0, TariffStatus::Exempt),
        DutyRule::FixedAddon => match try_normalize(addon.to_raw_rate()) {
            Ok(RateReading::Rate(pct)) => (pct, TariffStatus::Active),
            Ok(RateReading::Unresolved) => (0.0, TariffStatus::UnderInvestigation),
            Err(e) => {
                log::warn!("row {line} ({country} / {sector}): {e}; dropped");
                return None;
            }
        },
        DutyRule::TopUp { target_pct } => {
            match try_normalize(header.cell(cells, Column::BaseDuty).to_raw_rate()) {
                Ok(RateReading::Rate(base)) => (top_up_addon(target_pct, base), TariffStatus::Active),
                // No base, no addon
                Ok(RateReading::Unresolved) => (0.0, TariffStatus::UnderInvestigation),
                Err(e) => {
                    log::warn!("row {line} ({country} / {sector}): base duty {e}; dropped");
                    return None;
                }
            }
        }
    };

    let status_text = header.text(cells, Column::Status);
    if rule != DutyRule::Exempt && !status_text.is_empty() {
        match status_text.parse::<TariffStatus>() {
            Ok(parsed) => status = parsed,
            Err(_) => {
                log::warn!("row {line} ({country} / {sector}): unknown status '{status_text}'; dropped");
                return None;
            }
        }
    }

    let hts_text = header.text(cells, Column::Hts);
    let hts: Vec<&str> = hts_text
        .split([',', ';'])
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect();
    let hts = if hts.is_empty() { vec![ALL_HTS] } else { hts };

    let authority = non_empty_or(header.text(cells, Column::Authority), DEFAULT_AUTHORITY);

    Some(
        TariffEntry::new(&country, &sector, rate, status, &authority)
            .with_hts(&hts)
            .with_effective_date(&header.text(cells, Column::EffectiveDate))
            .with_notes(&header.text(cells, Column::Notes))
            .with_verification(verification),
    )
}

fn non_empty_or(text: String, default: &str) -> String {
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Sector label for country-wide rates.
pub const ALL_SECTORS: &str = "All";

/// HTS sentinel meaning "every tariff line".
pub const ALL_HTS: &str = "All";

/// Source label for a country no adapter knows about.
pub const NO_DATA: &str = "No Data";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Legal state of one tariff determination.
///
/// Only `Active` entries count toward the aggregate rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffStatus {
    Active,
    Exempt,
    Reprieved,
    UnderInvestigation,
    Quota,
}

impl TariffStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for TariffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Exempt => write!(f, "Exempt"),
            Self::Reprieved => write!(f, "Reprieved"),
            Self::UnderInvestigation => write!(f, "Under Investigation"),
            Self::Quota => write!(f, "Quota"),
        }
    }
}

/// Parses the status wording used by trackers, annex sheets and API payloads.
impl FromStr for TariffStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();

        match folded.as_str() {
            "active" | "in effect" | "effective" | "imposed" => Ok(Self::Active),
            "exempt" | "exempted" | "excluded" => Ok(Self::Exempt),
            "reprieved" | "reprieve" | "paused" | "suspended" | "delayed" => Ok(Self::Reprieved),
            "under investigation" | "investigation" | "pending" | "tbd" | "proposed" => {
                Ok(Self::UnderInvestigation)
            }
            "quota" | "trq" | "tariff rate quota" => Ok(Self::Quota),
            _ => Err(format!("unknown tariff status '{}'", s.trim())),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One tariff determination for a (country, sector) pair.
///
/// Built fresh on every adapter query and never mutated afterwards.
/// `rate_pct == 0.0` means either "no tariff" or "not yet determined";
/// `status` is what tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffEntry {
    pub country: String,
    pub sector: String,
    pub rate_pct: f64,
    pub status: TariffStatus,
    pub hts_codes: Vec<String>,
    pub effective_date: String,
    pub source_name: String,
    pub notes: String,
    pub verification: String,
}

impl TariffEntry {
    /// Entry with country-wide HTS coverage and empty provenance text.
    pub fn new(country: &str, sector: &str, rate_pct: f64, status: TariffStatus, source_name: &str) -> Self {
        Self {
            country: country.to_string(),
            sector: sector.to_string(),
            rate_pct,
            status,
            hts_codes: vec![ALL_HTS.to_string()],
            effective_date: String::new(),
            source_name: source_name.to_string(),
            notes: String::new(),
            verification: String::new(),
        }
    }

    pub fn with_hts(mut self, codes: &[&str]) -> Self {
        self.hts_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_effective_date(mut self, date: &str) -> Self {
        self.effective_date = date.to_string();
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    pub fn with_verification(mut self, verification: &str) -> Self {
        self.verification = verification.to_string();
        self
    }

    pub fn covers_all_hts(&self) -> bool {
        self.hts_codes.is_empty() || self.hts_codes.iter().any(|c| c.eq_ignore_ascii_case(ALL_HTS))
    }

    /// True when one of this entry's HTS codes is a prefix of `code`.
    /// Dots and spaces are ignored on both sides ("8471.30" covers "8471300100").
    pub fn covers_hts(&self, code: &str) -> bool {
        if self.covers_all_hts() {
            return true;
        }
        let wanted = hts_digits(code);
        if wanted.is_empty() {
            return false;
        }
        self.hts_codes.iter().any(|c| {
            let prefix = hts_digits(c);
            !prefix.is_empty() && wanted.starts_with(&prefix)
        })
    }

    pub fn is_country_wide(&self) -> bool {
        self.sector.eq_ignore_ascii_case(ALL_SECTORS)
    }
}

fn hts_digits(code: &str) -> String {
    code.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Lookup key for a country name: trimmed and ASCII-lowercased.
pub fn country_key(country: &str) -> String {
    country.trim().to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Tier + Confidence
// ---------------------------------------------------------------------------

/// Adapter category, in descending resolver priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    LiveApi,
    StructuredDocument,
    VerifiedTracker,
    StaticFallback,
}

impl SourceTier {
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::LiveApi => Confidence::Highest,
            Self::StructuredDocument => Confidence::High,
            Self::VerifiedTracker => Confidence::Medium,
            Self::StaticFallback => Confidence::Low,
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiveApi => write!(f, "live_api"),
            Self::StructuredDocument => write!(f, "structured_document"),
            Self::VerifiedTracker => write!(f, "verified_tracker"),
            Self::StaticFallback => write!(f, "static_fallback"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
    Highest,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Highest => write!(f, "Highest"),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution output
// ---------------------------------------------------------------------------

/// Resolver output for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCountryTariff {
    pub country: String,
    pub average_rate_pct: f64,
    pub source_label: String,
    pub confidence: Confidence,
    pub affected_sectors: Vec<String>,
    pub entries: Vec<TariffEntry>,
    /// Tier that produced the entries. `None` for a "No Data" answer.
    pub tier: Option<SourceTier>,
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedCountryTariff {
    pub fn no_data(country: &str, resolved_at: DateTime<Utc>) -> Self {
        Self {
            country: country.trim().to_string(),
            average_rate_pct: 0.0,
            source_label: NO_DATA.to_string(),
            confidence: Confidence::Low,
            affected_sectors: Vec::new(),
            entries: Vec::new(),
            tier: None,
            resolved_at,
        }
    }

    pub fn has_data(&self) -> bool {
        self.tier.is_some()
    }

    pub fn view(&self) -> CountryTariffView {
        CountryTariffView {
            country_name: self.country.clone(),
            average_tariff_rate: self.average_rate_pct,
            affected_sectors: self.affected_sectors.clone(),
            data_source: self.source_label.clone(),
            confidence: self.confidence.to_string(),
            last_updated: self.resolved_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Collaborator-facing JSON shape served by API routes and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTariffView {
    pub country_name: String,
    pub average_tariff_rate: f64,
    pub affected_sectors: Vec<String>,
    pub data_source: String,
    pub confidence: String,
    pub last_updated: String,
}

/// Label for the resolved answer: the adapter name, plus the distinct
/// authorities behind its entries when they differ from it.
pub fn source_label(adapter_name: &str, entries: &[TariffEntry]) -> String {
    let mut seen = HashSet::new();
    let contributors: Vec<&str> = entries
        .iter()
        .map(|e| e.source_name.as_str())
        .filter(|name| !name.is_empty() && *name != adapter_name)
        .filter(|name| seen.insert(*name))
        .collect();

    if contributors.is_empty() {
        adapter_name.to_string()
    } else {
        format!("{adapter_name} ({})", contributors.join(", "))
    }
}

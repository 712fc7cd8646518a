// Human-readable output for resolve / verify / sources.

use serde::Serialize;
use tariffscope_recon::{CountryTariffView, ResolvedCountryTariff, SourceSummary};

/// One line of `tariffs verify --json`.
#[derive(Debug, Serialize)]
pub struct VerifyRow {
    pub country: String,
    pub ok: bool,
    #[serde(flatten)]
    pub view: CountryTariffView,
}

impl VerifyRow {
    pub fn new(resolved: &ResolvedCountryTariff) -> Self {
        Self {
            country: resolved.country.clone(),
            ok: resolved.has_data(),
            view: resolved.view(),
        }
    }
}

pub fn format_pct(pct: f64) -> String {
    format!("{pct:.2}%")
}

/// Block for one resolved country. `detail` adds one line per entry.
pub fn resolution_block(r: &ResolvedCountryTariff, detail: bool) -> String {
    let mut out = String::new();
    out.push_str(&r.country);
    out.push('\n');
    out.push_str(&format!("  rate:        {}\n", format_pct(r.average_rate_pct)));
    out.push_str(&format!("  source:      {}\n", r.source_label));
    out.push_str(&format!("  confidence:  {}\n", r.confidence));
    let sectors = if r.affected_sectors.is_empty() {
        "-".to_string()
    } else {
        r.affected_sectors.join(", ")
    };
    out.push_str(&format!("  sectors:     {sectors}\n"));

    if detail {
        let width = r.entries.iter().map(|e| e.sector.chars().count()).max().unwrap_or(0);
        for e in &r.entries {
            out.push_str(&format!(
                "    {:<width$}  {:>8}  {:<19}  {}\n",
                e.sector,
                format_pct(e.rate_pct),
                e.status.to_string(),
                e.hts_codes.join(", "),
            ));
        }
    }
    out
}

/// One `verify` line: `ok` or `MISSING`, then the answer summary.
pub fn verify_line(r: &ResolvedCountryTariff) -> String {
    if r.has_data() {
        format!(
            "ok       {:<20} {:>8}  {} [{}]",
            r.country,
            format_pct(r.average_rate_pct),
            r.source_label,
            r.confidence
        )
    } else {
        format!("MISSING  {}", r.country)
    }
}

pub fn sources_table(summaries: &[SourceSummary]) -> String {
    if summaries.is_empty() {
        return "(no sources enabled)\n".to_string();
    }
    let width = summaries.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for s in summaries {
        out.push_str(&format!(
            "{}. {:<width$}  {:<20}  {}\n",
            s.position,
            s.name,
            s.tier.to_string(),
            s.confidence
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tariffscope_recon::tables::static_fallback;
    use tariffscope_recon::Resolver;

    #[test]
    fn block_for_no_data() {
        let r = ResolvedCountryTariff::no_data("Atlantis", Utc::now());
        let block = resolution_block(&r, true);
        assert!(block.starts_with("Atlantis\n"));
        assert!(block.contains("rate:        0.00%"));
        assert!(block.contains("source:      No Data"));
        assert!(block.contains("sectors:     -"));
        assert_eq!(verify_line(&r), "MISSING  Atlantis");
    }

    #[test]
    fn detail_lists_every_entry() {
        let resolver = Resolver::new(vec![Box::new(static_fallback())]);
        let r = resolver.resolve("China");
        let block = resolution_block(&r, true);
        assert_eq!(block.lines().count(), 5 + r.entries.len());
        assert!(block.contains("Under Investigation"));
        assert!(verify_line(&r).starts_with("ok       China"));
    }

    #[test]
    fn verify_row_flattens_the_view() {
        let r = ResolvedCountryTariff::no_data("Atlantis", Utc::now());
        let json = serde_json::to_value(VerifyRow::new(&r)).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["data_source"], "No Data");
        assert_eq!(json["country_name"], "Atlantis");
    }
}

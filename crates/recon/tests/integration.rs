use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use tariffscope_recon::model::NO_DATA;
use tariffscope_recon::tables::{static_fallback, verified_tracker, TableSource};
use tariffscope_recon::{
    resolve_country_tariff, Confidence, Reprieve, ReprieveOverlay, Resolver, SourceError, SourceTier, TariffEntry,
    TariffSource, TariffStatus,
};

/// Wraps a source and counts how often the resolver asks it.
struct Counted<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
}

impl<S: TariffSource> Counted<S> {
    fn wrap(inner: S) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { inner, calls: calls.clone() }, calls)
    }
}

impl<S: TariffSource> TariffSource for Counted<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn tier(&self) -> SourceTier {
        self.inner.tier()
    }

    fn fetch(&self, country: &str, sector: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(country, sector)
    }
}

struct Offline(SourceTier);

impl TariffSource for Offline {
    fn name(&self) -> &str {
        "Offline"
    }

    fn tier(&self) -> SourceTier {
        self.0
    }

    fn fetch(&self, _: &str, _: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
        Err(SourceError::Unavailable("connection refused".into()))
    }
}

fn builtin_chain() -> Resolver {
    Resolver::new(vec![Box::new(static_fallback()), Box::new(verified_tracker())])
}

// -------------------------------------------------------------------------
// Built-in chain
// -------------------------------------------------------------------------

#[test]
fn static_only_china() {
    let resolver = Resolver::new(vec![Box::new(static_fallback())]);
    let r = resolver.resolve("China");

    assert_eq!(r.average_rate_pct, 31.0);
    assert_eq!(r.confidence, Confidence::Low);
    assert_eq!(r.tier, Some(SourceTier::StaticFallback));
    assert!(r.source_label.starts_with("Static Fallback Table ("));
    assert!(r.source_label.contains("Section 301"));
    assert!(r.source_label.contains("Section 232"));
    assert!(!r.affected_sectors.iter().any(|s| s == "Agricultural Products"));
}

#[test]
fn tracker_shadows_static_table() {
    let resolver = builtin_chain();
    let r = resolver.resolve("china");

    assert_eq!(r.tier, Some(SourceTier::VerifiedTracker));
    assert_eq!(r.confidence, Confidence::Medium);
    assert_eq!(r.country, "China");
    assert!(r.entries.iter().all(|e| e.source_name == "Atlantic Council Tracker"));
    assert!((r.average_rate_pct - 40.0).abs() < 1e-9);
}

#[test]
fn country_missing_from_tracker_falls_to_static() {
    let resolver = builtin_chain();
    let r = resolver.resolve("Russia");
    assert_eq!(r.tier, Some(SourceTier::StaticFallback));
    assert_eq!(r.confidence, Confidence::Low);
    assert!(r.has_data());
}

#[test]
fn mexico_reprieve_zeroes_the_average() {
    let resolver = Resolver::new(vec![Box::new(static_fallback())]);
    let r = resolver.resolve("Mexico");
    assert!(r.has_data());
    assert_eq!(r.average_rate_pct, 0.0);
    assert!(r.affected_sectors.is_empty());
    assert!(r.entries.iter().all(|e| e.status == TariffStatus::Reprieved));
}

#[test]
fn configured_reprieve_overlays_tracker() {
    let overlay = ReprieveOverlay::new(verified_tracker(), vec![Reprieve::new("Mexico", "Paused pending talks")]);
    let resolver = Resolver::new(vec![Box::new(overlay), Box::new(static_fallback())]);
    let r = resolver.resolve("Mexico");

    assert_eq!(r.tier, Some(SourceTier::VerifiedTracker));
    assert_eq!(r.average_rate_pct, 0.0);
    assert!(r.entries.iter().any(|e| e.notes.ends_with("Paused pending talks")));
    assert!(r.entries.iter().any(|e| e.status == TariffStatus::Exempt));
}

#[test]
fn unknown_country_reports_no_data() {
    let view = resolve_country_tariff(&builtin_chain(), "Atlantis");
    assert_eq!(view.country_name, "Atlantis");
    assert_eq!(view.average_tariff_rate, 0.0);
    assert_eq!(view.data_source, NO_DATA);
    assert_eq!(view.confidence, "Low");
    assert!(view.affected_sectors.is_empty());
}

#[test]
fn known_countries_merge_both_tables() {
    let countries = builtin_chain().known_countries();
    for name in ["China", "Germany", "Hong Kong", "Russia", "Thailand"] {
        assert!(countries.iter().any(|c| c == name), "{name} missing");
    }
    let mut sorted = countries.clone();
    sorted.sort_by_key(|c| c.to_ascii_lowercase());
    assert_eq!(countries, sorted);
}

// -------------------------------------------------------------------------
// Priority and failure handling
// -------------------------------------------------------------------------

#[test]
fn failing_high_tier_is_skipped() {
    let resolver = Resolver::new(vec![Box::new(Offline(SourceTier::LiveApi)), Box::new(verified_tracker())]);
    let r = resolver.resolve("India");
    assert_eq!(r.tier, Some(SourceTier::VerifiedTracker));
}

#[test]
fn lower_tiers_are_not_consulted_once_answered() {
    let (tracker, tracker_calls) = Counted::wrap(verified_tracker());
    let (fallback, fallback_calls) = Counted::wrap(static_fallback());
    let resolver = Resolver::new(vec![Box::new(fallback), Box::new(tracker)]);

    resolver.resolve("Japan");
    assert_eq!(tracker_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn document_tier_outranks_tracker() {
    let annex = TableSource::from_entries(
        "Executive Order Annex",
        SourceTier::StructuredDocument,
        vec![TariffEntry::new("Germany", "All", 15.0, TariffStatus::Active, "EO 14326 Annex I")],
    );
    let resolver = Resolver::new(vec![Box::new(verified_tracker()), Box::new(annex)]);
    let r = resolver.resolve("Germany");
    assert_eq!(r.confidence, Confidence::High);
    assert_eq!(r.average_rate_pct, 15.0);
    assert_eq!(r.source_label, "Executive Order Annex (EO 14326 Annex I)");
}

// -------------------------------------------------------------------------
// Cache
// -------------------------------------------------------------------------

#[test]
fn repeated_resolution_hits_cache() {
    let (fallback, calls) = Counted::wrap(static_fallback());
    let resolver = Resolver::new(vec![Box::new(fallback)]);

    let first = resolver.resolve("Vietnam");
    let second = resolver.resolve("  VIETNAM ");
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn no_data_answers_are_cached_too() {
    let (fallback, calls) = Counted::wrap(static_fallback());
    let resolver = Resolver::new(vec![Box::new(fallback)]);
    resolver.resolve("Atlantis");
    resolver.resolve("Atlantis");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn expired_entries_are_recomputed() {
    let (fallback, calls) = Counted::wrap(static_fallback());
    let resolver = Resolver::new(vec![Box::new(fallback)]).with_ttl(Duration::minutes(30));
    let t0 = Utc::now();

    resolver.resolve_at("Brazil", t0);
    resolver.resolve_at("Brazil", t0 + Duration::minutes(29));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let later = resolver.resolve_at("Brazil", t0 + Duration::minutes(31));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(later.resolved_at, t0 + Duration::minutes(31));
}

#[test]
fn concurrent_resolution_agrees() {
    let resolver = Arc::new(builtin_chain());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            std::thread::spawn(move || resolver.resolve("Taiwan").average_rate_pct)
        })
        .collect();
    let rates: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(rates.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(resolver.cache().len(), 1);
}

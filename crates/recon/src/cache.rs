//! Per-country memo of resolved tariffs.
//!
//! Flat map with lazy expiry on read. Values are replaced wholesale, never
//! patched, so last-writer-wins is all the coordination it needs.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::model::{country_key, ResolvedCountryTariff};

/// Default time-to-live for resolved answers.
pub const DEFAULT_TTL_HOURS: i64 = 6;

#[derive(Debug, Clone)]
struct CachedTariff {
    value: ResolvedCountryTariff,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TariffCache {
    entries: RwLock<HashMap<String, CachedTariff>>,
    ttl: Duration,
}

impl Default for TariffCache {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TTL_HOURS))
    }
}

impl TariffCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, country: &str) -> Option<ResolvedCountryTariff> {
        self.get_at(country, Utc::now())
    }

    /// Cached value for `country` if it has not expired at `now`.
    pub fn get_at(&self, country: &str, now: DateTime<Utc>) -> Option<ResolvedCountryTariff> {
        let entries = self.entries.read();
        entries
            .get(&country_key(country))
            .filter(|cached| now < cached.expires_at)
            .map(|cached| cached.value.clone())
    }

    pub fn insert(&self, country: &str, value: ResolvedCountryTariff) {
        self.insert_at(country, value, Utc::now());
    }

    pub fn insert_at(&self, country: &str, value: ResolvedCountryTariff, now: DateTime<Utc>) {
        let cached = CachedTariff {
            value,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.entries.write().insert(country_key(country), cached);
    }

    pub fn is_valid(&self, country: &str) -> bool {
        self.is_valid_at(country, Utc::now())
    }

    pub fn is_valid_at(&self, country: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .read()
            .get(&country_key(country))
            .is_some_and(|cached| now < cached.expires_at)
    }

    pub fn invalidate(&self, country: &str) -> bool {
        self.entries.write().remove(&country_key(country)).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Stored entries, expired ones included until they are overwritten.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn expires_after_ttl() {
        let cache = TariffCache::new(Duration::hours(6));
        let t0 = at("2025-08-07T00:00:00Z");
        cache.insert_at("China", ResolvedCountryTariff::no_data("China", t0), t0);

        assert!(cache.is_valid_at("China", at("2025-08-07T05:59:59Z")));
        assert!(cache.get_at("china", at("2025-08-07T05:59:59Z")).is_some());
        assert!(!cache.is_valid_at("China", at("2025-08-07T06:00:00Z")));
        assert!(cache.get_at("China", at("2025-08-07T06:00:00Z")).is_none());
    }

    #[test]
    fn huge_ttl_saturates_instead_of_overflowing() {
        let cache = TariffCache::new(Duration::MAX);
        let t0 = at("2025-08-07T00:00:00Z");
        cache.insert_at("China", ResolvedCountryTariff::no_data("China", t0), t0);
        assert!(cache.is_valid_at("China", at("9999-12-31T23:59:59Z")));

        let years = TariffCache::new(Duration::hours(3_000_000_000));
        years.insert_at("Japan", ResolvedCountryTariff::no_data("Japan", t0), t0);
        assert!(years.get_at("Japan", at("9999-01-01T00:00:00Z")).is_some());
    }

    #[test]
    fn keys_are_case_and_space_insensitive() {
        let cache = TariffCache::default();
        let t0 = Utc::now();
        cache.insert_at("  Viet Nam ", ResolvedCountryTariff::no_data("Viet Nam", t0), t0);
        assert!(cache.is_valid_at("viet nam", t0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_replaces_wholesale() {
        let cache = TariffCache::default();
        let t0 = at("2025-08-07T00:00:00Z");
        let t1 = at("2025-08-07T01:00:00Z");
        cache.insert_at("India", ResolvedCountryTariff::no_data("India", t0), t0);
        cache.insert_at("India", ResolvedCountryTariff::no_data("India", t1), t1);
        assert_eq!(cache.get_at("India", t1).unwrap().resolved_at, t1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = TariffCache::default();
        let t0 = Utc::now();
        cache.insert_at("Japan", ResolvedCountryTariff::no_data("Japan", t0), t0);
        cache.insert_at("Brazil", ResolvedCountryTariff::no_data("Brazil", t0), t0);
        assert!(cache.invalidate("JAPAN"));
        assert!(!cache.invalidate("Japan"));
        cache.clear();
        assert!(cache.is_empty());
    }
}

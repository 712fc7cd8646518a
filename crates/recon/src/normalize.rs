//! Raw tariff-rate values → canonical percentages.
//!
//! Sources disagree on how they write a rate: `"25%"`, `0.25`, `25`,
//! `"TBD"`, `"120% or $100 per item"`. Everything funnels through
//! [`try_normalize`] (fallible, used by adapters that drop bad rows) or
//! [`normalize`] (infallible, degrades to `0.0`).
//!
//! # Rules, in order
//!
//! 1. Missing / NaN / empty → unresolved (`0.0`).
//! 2. Sentinels `tbd`, `pending`, `under investigation` → unresolved (`0.0`).
//! 3. Text with `%` → first number right before a `%`. When the text is a
//!    compound `"A or B"` and `A` carries a percentage, only `A` is read.
//!    Thousands separators are accepted; a leading minus is an error, as
//!    it is for numeric input.
//! 4. Plain numeric text → parsed as-is (no fraction rule).
//! 5. **Fraction rule**: a numeric (non-text) value in `(0, 1.0]` is a
//!    fraction and is scaled by 100; above `1.0` it is already a
//!    percentage. A genuine 1% stored as the number `1.0` reads as 100%.
//! 6. Anything else is a [`RateParseError`]; `normalize` logs it and
//!    returns `0.0`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RateParseError;

/// Group 1 is a minus sign directly before the number (a `-` after a digit
/// is a range, not a sign); group 2 the number, with optional thousands
/// separators.
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(-?)(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)\s*%").expect("valid percent pattern")
});

static SENTINEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(tbd|pending|under\s+investigation)\b").expect("valid sentinel pattern")
});

/// Upper bound of the fraction rule (inclusive).
pub const FRACTION_CEILING: f64 = 1.0;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A rate exactly as a source delivered it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRate {
    Missing,
    Number(f64),
    Text(String),
}

impl From<f64> for RawRate {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for RawRate {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for RawRate {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawRate {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<RawRate>> From<Option<T>> for RawRate {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}

impl From<&serde_json::Value> for RawRate {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Missing,
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Missing),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl RawRate {
    fn describe(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Outcome of normalizing one raw value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateReading {
    /// A percentage (may be a genuine `0.0`).
    Rate(f64),
    /// Missing, empty or a "not yet determined" sentinel.
    Unresolved,
}

impl RateReading {
    /// Collapse to the overloaded float convention (`Unresolved` → `0.0`).
    pub fn pct(&self) -> f64 {
        match self {
            Self::Rate(r) => *r,
            Self::Unresolved => 0.0,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a raw rate, reporting values that cannot be read.
pub fn try_normalize(raw: impl Into<RawRate>) -> Result<RateReading, RateParseError> {
    match raw.into() {
        RawRate::Missing => Ok(RateReading::Unresolved),
        RawRate::Number(n) => normalize_number(n),
        RawRate::Text(s) => normalize_text(&s),
    }
}

/// Normalize a raw rate to a percentage. Never fails: unreadable input is
/// logged at `warn` and becomes `0.0`.
pub fn normalize(raw: impl Into<RawRate>) -> f64 {
    let raw = raw.into();
    let described = raw.describe();
    match try_normalize(raw) {
        Ok(reading) => reading.pct(),
        Err(e) => {
            log::warn!("{e}; using 0.0 (raw: {described:?})");
            0.0
        }
    }
}

fn normalize_number(n: f64) -> Result<RateReading, RateParseError> {
    if n.is_nan() {
        return Ok(RateReading::Unresolved);
    }
    if n.is_infinite() {
        return Err(RateParseError { raw: n.to_string(), reason: "not a finite number" });
    }
    if n < 0.0 {
        return Err(RateParseError { raw: n.to_string(), reason: "negative rate" });
    }
    if n > 0.0 && n <= FRACTION_CEILING {
        return Ok(RateReading::Rate(n * 100.0));
    }
    Ok(RateReading::Rate(n))
}

fn normalize_text(raw: &str) -> Result<RateReading, RateParseError> {
    let s = raw.trim();
    if s.is_empty() || SENTINEL_RE.is_match(s) {
        return Ok(RateReading::Unresolved);
    }

    if s.contains('%') {
        let clause = leading_clause(s);
        let caps = PERCENT_RE.captures(clause).ok_or_else(|| RateParseError {
            raw: raw.to_string(),
            reason: "no number before '%'",
        })?;
        if !caps[1].is_empty() {
            return Err(RateParseError { raw: raw.to_string(), reason: "negative rate" });
        }
        let pct: f64 = caps[2].replace(',', "").parse().map_err(|_| RateParseError {
            raw: raw.to_string(),
            reason: "bad number before '%'",
        })?;
        return Ok(RateReading::Rate(pct));
    }

    let n: f64 = s.parse().map_err(|_| RateParseError {
        raw: raw.to_string(),
        reason: "not a number or percentage",
    })?;
    if n.is_nan() {
        return Ok(RateReading::Unresolved);
    }
    if !n.is_finite() || n < 0.0 {
        return Err(RateParseError { raw: raw.to_string(), reason: "not a non-negative finite number" });
    }
    Ok(RateReading::Rate(n))
}

/// For `"A or B"`, the `A` part when it carries a percentage; otherwise `s`.
fn leading_clause(s: &str) -> &str {
    match s.to_ascii_lowercase().find(" or ") {
        Some(idx) if s[..idx].contains('%') => &s[..idx],
        _ => s,
    }
}

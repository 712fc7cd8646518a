use std::fmt;

/// Why an adapter produced nothing. The resolver treats every variant the
/// same way: fall through to the next source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Backing resource (network, file) could not be reached or read.
    Unavailable(String),
    /// External call exceeded its time budget.
    Timeout(String),
    /// Resource was reachable but its content could not be interpreted.
    Malformed(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "source unavailable: {msg}"),
            Self::Timeout(msg) => write!(f, "source timed out: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed source data: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// A raw rate value that does not normalize to a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct RateParseError {
    pub raw: String,
    pub reason: &'static str,
}

impl fmt::Display for RateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse rate '{}': {}", self.raw, self.reason)
    }
}

impl std::error::Error for RateParseError {}

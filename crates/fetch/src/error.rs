use tariffscope_recon::SourceError;

/// Error type for live API calls.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Endpoint configuration is unusable (bad URL template, etc.)
    InvalidEndpoint(String),
    /// HTTP client could not be constructed
    Client(String),
    /// `api_key_env` names a variable that is unset or empty
    MissingApiKey(String),
    /// 401 / 403
    Auth(u16, String),
    /// 429
    RateLimited(String),
    /// Any other non-success status
    Upstream(u16, String),
    /// Connection, DNS, TLS
    Network(String),
    /// Request exceeded the configured timeout
    Timeout(String),
    /// Body was not JSON or did not have the configured shape
    Parse(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::InvalidEndpoint(msg) => write!(f, "Invalid endpoint: {}", msg),
            FetchError::Client(msg) => write!(f, "HTTP client error: {}", msg),
            FetchError::MissingApiKey(var) => write!(f, "API key not set (export {})", var),
            FetchError::Auth(code, msg) => write!(f, "Auth failed ({}): {}", code, msg),
            FetchError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            FetchError::Upstream(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

impl From<FetchError> for SourceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Timeout(_) => SourceError::Timeout(e.to_string()),
            FetchError::Parse(_) => SourceError::Malformed(e.to_string()),
            _ => SourceError::Unavailable(e.to_string()),
        }
    }
}

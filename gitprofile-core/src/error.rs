use std::fmt;

/// Custom error type for GitProfile operations
#[derive(Debug)]
pub enum ExploreError {
    /// Caller-supplied input rejected before any fetch
    InvalidInput(String),
    /// Upstream rate limit or access denial (HTTP 403/429); transient,
    /// the caller may retry later, this library never retries itself
    UpstreamUnavailable(String),
    /// Upstream response shape violates the expected contract
    MalformedData(String),
    /// HTTP request errors
    Http(reqwest::Error),
    /// JSON parsing errors
    Json(serde_json::Error),
    /// Time parsing errors
    Time(chrono::ParseError),
    /// Generic errors with message
    Generic(String),
}

impl fmt::Display for ExploreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExploreError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ExploreError::UpstreamUnavailable(msg) => {
                write!(f, "GitHub unavailable (try again later): {}", msg)
            }
            ExploreError::MalformedData(msg) => write!(f, "Malformed GitHub response: {}", msg),
            ExploreError::Http(err) => write!(f, "HTTP error: {}", err),
            ExploreError::Json(err) => write!(f, "JSON error: {}", err),
            ExploreError::Time(err) => write!(f, "Time parsing error: {}", err),
            ExploreError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ExploreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExploreError::Http(err) => Some(err),
            ExploreError::Json(err) => Some(err),
            ExploreError::Time(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExploreError {
    fn from(err: reqwest::Error) -> Self {
        ExploreError::Http(err)
    }
}

impl From<serde_json::Error> for ExploreError {
    fn from(err: serde_json::Error) -> Self {
        ExploreError::Json(err)
    }
}

impl From<chrono::ParseError> for ExploreError {
    fn from(err: chrono::ParseError) -> Self {
        ExploreError::Time(err)
    }
}

impl From<std::net::AddrParseError> for ExploreError {
    fn from(err: std::net::AddrParseError) -> Self {
        ExploreError::Generic(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ExploreError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        ExploreError::Generic(err.to_string())
    }
}

impl From<String> for ExploreError {
    fn from(err: String) -> Self {
        ExploreError::Generic(err)
    }
}

impl From<anyhow::Error> for ExploreError {
    fn from(err: anyhow::Error) -> Self {
        ExploreError::Generic(err.to_string())
    }
}

/// Result type alias for GitProfile operations
pub type Result<T> = std::result::Result<T, ExploreError>;

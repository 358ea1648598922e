use std::fmt;

/// Custom error type for cleanup operations
#[derive(Debug)]
pub enum CleanerError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// API returned an error response
    Api { status: u16, message: String },
    /// JSON parsing error
    Json(String),
    /// Secret fetch or token exchange failed
    Auth(String),
    /// Secret store rejected the request for a reason other than throttling
    Secret { path: String, message: String },
    /// Secret store kept throttling after all retries
    Throttled { path: String, attempts: u32 },
    /// Link chain did not terminate within the page cap
    PaginationLimitExceeded { url: String, limit: usize },
    /// Trigger event could not be read or carries no instance id
    Event(String),
    /// Configuration error
    Config(String),
}

impl fmt::Display for CleanerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanerError::Http(e) => write!(f, "HTTP request failed: {}", e),
            CleanerError::Api { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            CleanerError::Json(msg) => write!(f, "JSON error: {}", msg),
            CleanerError::Auth(msg) => write!(f, "Authentication failed: {}", msg),
            CleanerError::Secret { path, message } => {
                write!(f, "Failed to read secret '{}': {}", path, message)
            }
            CleanerError::Throttled { path, attempts } => write!(
                f,
                "Secret '{}' still throttled after {} attempts",
                path, attempts
            ),
            CleanerError::PaginationLimitExceeded { url, limit } => write!(
                f,
                "Pagination did not finish within {} pages (last link: {})",
                limit, url
            ),
            CleanerError::Event(msg) => write!(f, "Invalid trigger event: {}", msg),
            CleanerError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CleanerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CleanerError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CleanerError {
    fn from(err: reqwest::Error) -> Self {
        CleanerError::Http(err)
    }
}

impl From<serde_json::Error> for CleanerError {
    fn from(err: serde_json::Error) -> Self {
        CleanerError::Json(err.to_string())
    }
}

impl From<std::io::Error> for CleanerError {
    fn from(err: std::io::Error) -> Self {
        CleanerError::Event(err.to_string())
    }
}

/// Result type alias for cleanup operations
pub type Result<T> = std::result::Result<T, CleanerError>;

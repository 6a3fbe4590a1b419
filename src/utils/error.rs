use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of a single scrape attempt for one URL.
///
/// Every variant is retried by the retry controller; none of them reaches the
/// batch orchestrator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("Failed to open page session for {url}: {message}")]
    Session { url: String, message: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },
}

impl AttemptError {
    pub fn is_retryable(&self) -> bool {
        true
    }

    pub(crate) fn navigation(url: &str, err: impl std::fmt::Display) -> Self {
        AttemptError::Navigation {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn extraction(url: &str, err: impl std::fmt::Display) -> Self {
        AttemptError::Extraction {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

//! Error types for the scraping client.

use thiserror::Error;

/// Errors that can occur while fetching or converting a response.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport failure, invalid header, redirect loop or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The body was not valid JSON, or did not fit the requested type.
    #[error(transparent)]
    Json(#[from] dynamic_json::JsonError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The response declared a charset this crate cannot decode.
    #[error("Unsupported charset: {0}")]
    Charset(String),

    /// A `Set-Cookie` string could not be parsed or does not apply to its URL.
    #[error("Invalid cookie: {0}")]
    Cookie(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout scraping-client.
pub type Result<T> = std::result::Result<T, ScrapeError>;

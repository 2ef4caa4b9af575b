//! Error types for the metadata scraper.

use thiserror::Error;

/// Top-level error type for a scrape run.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Required configuration missing or left at its placeholder
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Listing the bucket failed
    #[error("Failed to list objects under prefix {prefix:?}: {message}")]
    List {
        prefix: Option<String>,
        message: String,
    },

    /// Fetching the metadata of a single object failed
    #[error("Failed to fetch metadata for {key}: {message}")]
    Fetch { key: String, message: String },

    /// Writing a CSV record failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Opening or flushing the output file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors, one per offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Value is unset, empty, or still the placeholder
    #[error("{0} not set! Provide it with --{1} or the {0} environment variable.")]
    NotSet(&'static str, &'static str),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

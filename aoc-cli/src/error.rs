//! Error types for the CLI

use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Settings(#[from] aoc_runner::ConfigError),

    /// HTTP client error
    #[error(transparent)]
    Http(#[from] aoc_http_client::AocError),

    #[error(transparent)]
    Site(#[from] aoc_runner::SiteError),

    #[error("Cache error: {0}")]
    Cache(#[from] aoc_runner::CacheError),

    /// Example extraction error
    #[error(transparent)]
    Examples(#[from] aoc_examples::ExampleError),

    #[error(transparent)]
    Run(#[from] aoc_runner::RunError),

    /// Malformed override or extra-test file
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to format JSON: {0}")]
    Output(#[from] serde_json::Error),

    #[error("No solver registered for {year} day {day}")]
    NoSolver { year: u16, day: u8 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

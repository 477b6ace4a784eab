//! Candidate Directory Library
//!
//! A Rust library for loading the published electoral candidates list from a
//! quoted CSV export and serving a searchable, filterable in-memory view of it.
//!
//! This library provides tools for:
//! - Parsing CSV text with full RFC4180 quoting (embedded commas, quotes and newlines)
//! - Holding the parsed records in a directory with free-text search and a district filter
//! - Fetching `candidates.csv` from a local path or an HTTP endpoint
//! - Debouncing free-text queries and windowing long result lists for display
//! - Layered configuration and a small reporting CLI

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod candidate_directory;
        pub mod csv_parser;
        pub mod debounce;
        pub mod source;
        pub mod viewport;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Candidate, CandidateField, Header, Record};
pub use app::services::candidate_directory::{CandidateDirectory, Category, DirectoryState};
pub use app::services::csv_parser::{parse, parse_with_stats};
pub use config::DirectoryConfig;

/// Result type alias for the candidate directory
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for loading and querying the candidate directory
///
/// CSV parsing is deliberately absent: the parser degrades to an empty or
/// partial result instead of failing.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote source could not be reached
    #[error("Failed to fetch '{url}': {message}")]
    Fetch {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Remote source answered with a non-success status
    #[error("Fetching '{url}' returned HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Local source file does not exist
    #[error("Candidates file not found: {path}")]
    SourceNotFound { path: String },

    /// Source location could not be interpreted
    #[error("Invalid source location '{location}': {message}")]
    InvalidSource { location: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Expected columns are absent from the header row
    #[error("Missing expected columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// Report rendering or writing failed
    #[error("Output error: {message}")]
    Output { message: String },

    /// Command interrupted by the user
    #[error("Interrupted: {message}")]
    Interrupted { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a fetch error, optionally wrapping the HTTP client error
    pub fn fetch(
        url: impl Into<String>,
        message: impl Into<String>,
        source: Option<reqwest::Error>,
    ) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an HTTP status error
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create a source not found error
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create an invalid source error
    pub fn invalid_source(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSource {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing columns error
    pub fn missing_columns(missing: Vec<String>) -> Self {
        Self::MissingColumns { missing }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create an interrupted error
    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::Interrupted {
            message: message.into(),
        }
    }

    /// Whether the error came from reaching the source rather than from local setup.
    ///
    /// The CLI offers a retry hint for these.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::HttpStatus { .. } | Self::Io { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Output {
            message: format!("CSV writing failed: {}", error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Output {
            message: format!("JSON serialization failed: {}", error),
        }
    }
}

impl From<figment::Error> for Error {
    fn from(error: figment::Error) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}

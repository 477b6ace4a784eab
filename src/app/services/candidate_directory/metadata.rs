//! Directory metadata and load statistics tracking
//!
//! This module defines the data structures for reporting how a record set
//! was loaded and where it came from.

use crate::app::services::csv_parser::ParseStats;
use std::time::{Duration, Instant};

/// Statistics about a single load of the candidates file
#[derive(Debug, Clone)]
pub struct LoadStats {
    /// Source the text was read from
    pub source: String,

    /// Size of the fetched text in bytes
    pub bytes_read: usize,

    /// Row admission statistics from the parser
    pub parse: ParseStats,

    /// Records now held by the directory
    pub records_loaded: usize,

    /// Configured search, category or identifier columns absent from the header
    pub missing_columns: Vec<String>,

    /// Time taken to fetch and parse
    pub load_duration: Duration,
}

impl LoadStats {
    /// Create new empty load statistics for a source
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            bytes_read: 0,
            parse: ParseStats::new(),
            records_loaded: 0,
            missing_columns: Vec::new(),
            load_duration: Duration::ZERO,
        }
    }

    /// Number of malformed rows the parser discarded
    pub fn rows_dropped(&self) -> usize {
        self.parse.rows_dropped
    }

    /// Calculate the loading rate in records per second
    pub fn loading_rate(&self) -> f64 {
        if self.load_duration.is_zero() {
            0.0
        } else {
            self.records_loaded as f64 / self.load_duration.as_secs_f64()
        }
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} records from {} ({} bytes, {} rows dropped) in {:.2}s",
            self.records_loaded,
            self.source,
            self.bytes_read,
            self.rows_dropped(),
            self.load_duration.as_secs_f64()
        )
    }
}

/// Provenance of the record set currently held by a directory
#[derive(Debug, Clone)]
pub struct DirectoryMetadata {
    /// Source of the records, `None` when records were handed over directly
    pub source: Option<String>,

    /// Number of records loaded
    pub record_count: usize,

    /// Rows dropped while parsing the source
    pub rows_dropped: usize,

    /// When the record set was loaded
    pub load_time: Instant,
}

impl DirectoryMetadata {
    pub fn new(source: Option<String>, record_count: usize, rows_dropped: usize) -> Self {
        Self {
            source,
            record_count,
            rows_dropped,
            load_time: Instant::now(),
        }
    }

    /// Get the age of the record set since loading
    pub fn age(&self) -> Duration {
        self.load_time.elapsed()
    }

    /// Get a summary string of the directory contents
    pub fn summary(&self) -> String {
        format!(
            "{} records from {} (age: {:.1}s)",
            self.record_count,
            self.source.as_deref().unwrap_or("memory"),
            self.age().as_secs_f64()
        )
    }
}

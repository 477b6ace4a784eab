//! Candidate directory loading
//!
//! This module handles fetching the candidates file, parsing it, and
//! replacing the directory's record set. Fetching happens before any state
//! is touched, so a failed load leaves the previous record set in place.

use super::CandidateDirectory;
use super::metadata::{DirectoryMetadata, LoadStats};
use crate::app::models::{Header, validate_headers};
use crate::app::services::csv_parser::parse_with_stats;
use crate::app::services::source::{SourceLocation, fetch_text};
use crate::config::SourceConfig;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{info, warn};

impl CandidateDirectory {
    /// Fetch, parse and load the candidates file
    ///
    /// # Arguments
    /// * `location` - Local path or URL of the candidates file
    /// * `config` - Source settings such as the fetch timeout
    /// * `show_progress` - Whether to display a spinner while fetching
    ///
    /// # Errors
    /// * Returns `Error::SourceNotFound` if a local file doesn't exist
    /// * Returns `Error::HttpStatus` for non-success HTTP responses
    /// * Returns `Error::Fetch` or `Error::Io` when the source can't be read
    ///
    /// On error the directory keeps its previous records, query and category.
    pub async fn load_from_source(
        &mut self,
        location: &SourceLocation,
        config: &SourceConfig,
        show_progress: bool,
    ) -> Result<LoadStats> {
        info!("Loading candidates from {}", location);
        let start_time = Instant::now();

        let spinner = if show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message(format!("Fetching {}", location));
            Some(pb)
        } else {
            None
        };

        let text = match fetch_text(location, config).await {
            Ok(text) => text,
            Err(e) => {
                if let Some(pb) = &spinner {
                    pb.abandon_with_message("Loading candidates failed");
                }
                warn!("Failed to load candidates from {}: {}", location, e);
                return Err(e);
            }
        };

        if let Some(pb) = &spinner {
            pb.set_message("Parsing candidates...");
        }

        let mut stats = self.load_text(&text);
        stats.source = location.to_string();
        stats.load_duration = start_time.elapsed();

        if let Some(metadata) = self.metadata.as_mut() {
            metadata.source = Some(location.to_string());
        }

        if let Some(pb) = &spinner {
            pb.finish_with_message(format!("Loaded {} candidates", stats.records_loaded));
        }

        info!("{}", stats.summary());
        Ok(stats)
    }

    /// Parse already fetched text and replace the record set with the result
    pub fn load_text(&mut self, text: &str) -> LoadStats {
        let start_time = Instant::now();
        let result = parse_with_stats(text);

        if result.stats.has_dropped_rows() {
            warn!(
                "Dropped {} malformed rows out of {} (expected {} fields each)",
                result.stats.rows_dropped, result.stats.total_rows, result.stats.expected_fields
            );
        }

        let mut stats = LoadStats::new("memory");
        if !result.header.is_empty() {
            stats.missing_columns = self.missing_columns(&result.header);
        }
        stats.bytes_read = text.len();
        stats.records_loaded = result.records.len();
        stats.parse = result.stats;

        self.load(result.records);
        self.metadata = Some(DirectoryMetadata::new(
            None,
            stats.records_loaded,
            stats.parse.rows_dropped,
        ));

        stats.load_duration = start_time.elapsed();
        stats
    }

    fn missing_columns(&self, header: &Header) -> Vec<String> {
        let mut required: Vec<&str> = self.search.fields.iter().map(String::as_str).collect();
        required.push(&self.search.category_field);
        required.push(&self.search.id_field);
        required.sort_unstable();
        required.dedup();

        match validate_headers(header, &required) {
            Ok(()) => Vec::new(),
            Err(Error::MissingColumns { missing }) => {
                warn!("Candidates file is missing columns: {}", missing.join(", "));
                missing
            }
            Err(_) => Vec::new(),
        }
    }
}

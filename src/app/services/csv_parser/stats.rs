//! Parsing statistics and result structures for CSV processing
//!
//! Row loss is silent by default; these types make it observable to callers
//! and tests without changing what the parser returns.

use crate::app::models::{Header, Record};
use serde::{Deserialize, Serialize};

/// Parsing result with records, the header they were keyed by, and statistics
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Trimmed header row, empty when the input had no rows
    pub header: Header,

    /// Admitted data rows in input order
    pub records: Vec<Record>,

    /// Row admission statistics
    pub stats: ParseStats,
}

impl ParseResult {
    /// Number of admitted records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A data row rejected for having the wrong number of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// 1-based input line on which the row starts
    pub line: usize,

    /// Number of fields the row actually had
    pub field_count: usize,
}

/// Row admission statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Number of columns in the header row
    pub expected_fields: usize,

    /// Non-blank data rows encountered after the header
    pub total_rows: usize,

    /// Rows admitted as records
    pub records_parsed: usize,

    /// Rows discarded for a field count mismatch
    pub rows_dropped: usize,

    /// Blank lines skipped anywhere in the input
    pub blank_lines_skipped: usize,

    /// Where the dropped rows were, for diagnostics
    pub dropped_rows: Vec<DroppedRow>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            expected_fields: 0,
            total_rows: 0,
            records_parsed: 0,
            rows_dropped: 0,
            blank_lines_skipped: 0,
            dropped_rows: Vec::new(),
        }
    }

    /// Calculate admission rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% of rows admitted)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }

    pub fn has_dropped_rows(&self) -> bool {
        self.rows_dropped > 0
    }

    /// Record a rejected row
    pub(crate) fn record_dropped(&mut self, line: usize, field_count: usize) {
        self.rows_dropped += 1;
        self.dropped_rows.push(DroppedRow { line, field_count });
    }

    /// Get a summary string of the parse
    pub fn summary(&self) -> String {
        format!(
            "{} of {} rows admitted ({:.1}%), {} dropped, {} blank lines skipped",
            self.records_parsed,
            self.total_rows,
            self.success_rate(),
            self.rows_dropped,
            self.blank_lines_skipped
        )
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}

//! Core CSV parser implementation
//!
//! Scans the whole text once, character by character, splitting it into rows
//! of fields while honouring quotes, then keys every data row by the header.

use std::iter::Peekable;
use std::str::Chars;
use tracing::debug;

use super::stats::{ParseResult, ParseStats};
use crate::app::models::{Header, Record};
use crate::constants::UTF8_BOM;

/// Parse CSV text into records keyed by the header row
///
/// Rows with the wrong number of fields are silently dropped; use
/// [`parse_with_stats`] to see how many.
pub fn parse(text: &str) -> Vec<Record> {
    parse_with_stats(text).records
}

/// Parse CSV text and report row admission statistics alongside the records
pub fn parse_with_stats(text: &str) -> ParseResult {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut stats = ParseStats::new();
    let mut scanner = RowScanner::new(text);

    let header = loop {
        match scanner.next_row() {
            Some(ScannedRow::Blank) => stats.blank_lines_skipped += 1,
            Some(ScannedRow::Fields { fields, .. }) => break Header::from_fields(fields),
            None => {
                debug!("CSV input contained no header row");
                return ParseResult {
                    stats,
                    ..ParseResult::default()
                };
            }
        }
    };
    stats.expected_fields = header.len();

    let mut records = Vec::new();
    while let Some(row) = scanner.next_row() {
        match row {
            ScannedRow::Blank => stats.blank_lines_skipped += 1,
            ScannedRow::Fields { line, fields } => {
                stats.total_rows += 1;
                let field_count = fields.len();

                match header.zip(fields) {
                    Some(record) => {
                        records.push(record);
                        stats.records_parsed += 1;
                    }
                    None => {
                        debug!(
                            "Dropped row at line {}: {} fields, expected {}",
                            line,
                            field_count,
                            header.len()
                        );
                        stats.record_dropped(line, field_count);
                    }
                }
            }
        }
    }

    debug!("Parsed CSV: {}", stats.summary());

    ParseResult {
        header,
        records,
        stats,
    }
}

/// One row produced by the scanner
#[derive(Debug, PartialEq)]
enum ScannedRow {
    /// Line holding nothing but whitespace
    Blank,

    /// Row of fields starting on the given 1-based line
    Fields { line: usize, fields: Vec<String> },
}

/// Field currently being accumulated
#[derive(Debug, Default)]
struct FieldBuffer {
    text: String,

    /// Field opened with a quote, so its content is not trimmed
    quoted: bool,

    /// Length of `text` when the last quoted section closed
    quoted_end: usize,
}

impl FieldBuffer {
    /// Finish the field, trimming unquoted text and whitespace outside quotes
    fn take(&mut self) -> String {
        let buffer = std::mem::take(self);

        if buffer.quoted {
            let (inside, tail) = buffer.text.split_at(buffer.quoted_end);
            let mut value = inside.to_string();
            value.push_str(tail.trim_end());
            value
        } else {
            buffer.text.trim().to_string()
        }
    }
}

/// Splits text into rows of raw fields
struct RowScanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> RowScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    /// Scan the next row, `None` once the input is exhausted
    fn next_row(&mut self) -> Option<ScannedRow> {
        self.chars.peek()?;

        let start_line = self.line;
        let mut fields = Vec::new();
        let mut field = FieldBuffer::default();
        let mut in_quotes = false;
        let mut has_content = false;

        while let Some(c) = self.chars.next() {
            if in_quotes {
                match c {
                    '"' if self.chars.peek() == Some(&'"') => {
                        self.chars.next();
                        field.text.push('"');
                    }
                    '"' => {
                        in_quotes = false;
                        field.quoted_end = field.text.len();
                    }
                    '\n' => {
                        self.line += 1;
                        field.text.push(c);
                    }
                    '\r' => {
                        if self.chars.peek() != Some(&'\n') {
                            self.line += 1;
                        }
                        field.text.push(c);
                    }
                    _ => field.text.push(c),
                }
                continue;
            }

            match c {
                '"' => {
                    has_content = true;
                    in_quotes = true;
                    if !field.quoted && field.text.trim().is_empty() {
                        field.text.clear();
                        field.quoted = true;
                    }
                }
                ',' => {
                    has_content = true;
                    fields.push(field.take());
                }
                '\r' | '\n' => {
                    if c == '\r' && self.chars.peek() == Some(&'\n') {
                        self.chars.next();
                    }
                    self.line += 1;
                    return Some(Self::finish_row(start_line, fields, field, has_content));
                }
                _ => {
                    if !c.is_whitespace() {
                        has_content = true;
                    }
                    field.text.push(c);
                }
            }
        }

        // End of input; an unterminated quoted field keeps everything it swallowed
        if in_quotes {
            field.quoted_end = field.text.len();
        }
        Some(Self::finish_row(start_line, fields, field, has_content))
    }

    fn finish_row(
        line: usize,
        mut fields: Vec<String>,
        mut field: FieldBuffer,
        has_content: bool,
    ) -> ScannedRow {
        if !has_content {
            return ScannedRow::Blank;
        }
        fields.push(field.take());
        ScannedRow::Fields { line, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(text: &str) -> Vec<ScannedRow> {
        let mut scanner = RowScanner::new(text);
        let mut rows = Vec::new();
        while let Some(row) = scanner.next_row() {
            rows.push(row);
        }
        rows
    }

    fn fields(line: usize, values: &[&str]) -> ScannedRow {
        ScannedRow::Fields {
            line,
            fields: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_scanner_splits_rows_and_fields() {
        let rows = scan_all("a,b\r\n1,2\n");
        assert_eq!(rows, vec![fields(1, &["a", "b"]), fields(2, &["1", "2"])]);
    }

    #[test]
    fn test_scanner_trailing_newline_adds_no_row() {
        assert_eq!(scan_all("a\n").len(), 1);
        assert_eq!(scan_all("a").len(), 1);
        assert!(scan_all("").is_empty());
    }

    #[test]
    fn test_scanner_blank_lines() {
        let rows = scan_all("a\n   \n\nb\n");
        assert_eq!(
            rows,
            vec![
                fields(1, &["a"]),
                ScannedRow::Blank,
                ScannedRow::Blank,
                fields(4, &["b"]),
            ]
        );
    }

    #[test]
    fn test_scanner_tracks_lines_through_quoted_newlines() {
        let rows = scan_all("h\n\"x\ny\"\nz\n");
        assert_eq!(rows, vec![fields(1, &["h"]), fields(2, &["x\ny"]), fields(4, &["z"])]);
    }

    #[test]
    fn test_scanner_bare_carriage_return_ends_row() {
        let rows = scan_all("a\rb");
        assert_eq!(rows, vec![fields(1, &["a"]), fields(2, &["b"])]);
    }

    #[test]
    fn test_quoted_field_keeps_inner_whitespace() {
        let rows = scan_all("  \"  padded  \"  ,x");
        assert_eq!(rows, vec![fields(1, &["  padded  ", "x"])]);
    }

    #[test]
    fn test_commas_only_row_is_not_blank() {
        let rows = scan_all(",,");
        assert_eq!(rows, vec![fields(1, &["", "", ""])]);
    }

    #[test]
    fn test_quote_in_middle_of_field_toggles() {
        let rows = scan_all("ab\"c,d\"e,f");
        assert_eq!(rows, vec![fields(1, &["abc,de", "f"])]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let rows = scan_all("a,\"open\nstill open");
        assert_eq!(rows, vec![fields(1, &["a", "open\nstill open"])]);
    }
}

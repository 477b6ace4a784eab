//! CSV parser for the published candidates file
//!
//! A single-pass, dependency-free parser with RFC4180 quoting: fields may be
//! wrapped in double quotes, a doubled quote inside a quoted field is one
//! literal quote, and commas and line breaks inside quotes are literal text.
//!
//! ## Architecture
//!
//! - [`parser`] - character scanner and header/row assembly
//! - [`stats`] - row admission statistics and result structures
//!
//! Parsing never fails. Rows whose field count differs from the header are
//! dropped and counted in [`ParseStats`], blank lines are skipped, and empty
//! or header-only input yields no records.
//!
//! ## Usage
//!
//! ```rust
//! use candidate_directory::app::services::csv_parser::{parse, parse_with_stats};
//!
//! let text = "id,full_name\n1,\"Ali, Ahmed\"\n2,too,many\n";
//! assert_eq!(parse(text).len(), 1);
//!
//! let result = parse_with_stats(text);
//! assert_eq!(result.stats.rows_dropped, 1);
//! assert_eq!(result.records[0].get("full_name"), Some("Ali, Ahmed"));
//! ```

pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::{parse, parse_with_stats};
pub use stats::{DroppedRow, ParseResult, ParseStats};

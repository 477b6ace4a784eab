//! Test utilities and fixtures for CSV parser testing
//!
//! This module provides sample candidates files and helpers used across the
//! parser test modules.

mod parser_tests;

/// Header row of the published candidates export
pub const CANDIDATES_HEADER: &str =
    "id,full_name,ballot_name,electoral_district,sex,data_quality,last_updated";

/// Helper to create a well-formed candidates file with `rows` data rows
pub fn create_candidates_csv(rows: usize) -> String {
    let mut content = String::from(CANDIDATES_HEADER);
    content.push('\n');

    for i in 1..=rows {
        let district = if i % 2 == 0 { "Basra" } else { "Baghdad" };
        content.push_str(&format!(
            "{},Candidate {},\"List {}, Coalition\",{},{},verified,2025-01-{:02} 10:00:00\n",
            i,
            i,
            i % 5,
            district,
            if i % 3 == 0 { "F" } else { "M" },
            (i % 28) + 1
        ));
    }

    content
}

/// Quote a value the way a spreadsheet export would
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

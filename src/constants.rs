//! Application constants for the candidate directory
//!
//! This module contains the expected column names of the published
//! candidates file, filter sentinels, and default values used throughout
//! the application.

// =============================================================================
// Candidates File Columns
// =============================================================================

/// Column names of the published candidates export
pub mod columns {
    /// Unique candidate identifier
    pub const ID: &str = "id";

    /// Candidate full name as registered
    pub const FULL_NAME: &str = "full_name";

    /// Name of the list, party or coalition shown on the ballot
    pub const BALLOT_NAME: &str = "ballot_name";

    /// Electoral district the candidate stands in
    pub const DISTRICT: &str = "electoral_district";

    /// Candidate sex as recorded by the commission
    pub const SEX: &str = "sex";

    /// Curation marker set by the data team
    pub const DATA_QUALITY: &str = "data_quality";

    /// Last time the row was revised, free-form timestamp string
    pub const LAST_UPDATED: &str = "last_updated";

    /// Every column the export is expected to carry, in export order
    pub const ALL: &[&str] = &[
        ID,
        FULL_NAME,
        BALLOT_NAME,
        DISTRICT,
        SEX,
        DATA_QUALITY,
        LAST_UPDATED,
    ];
}

// =============================================================================
// Search and Filter Defaults
// =============================================================================

/// Sentinel category value that disables the district filter
pub const ALL_CATEGORIES: &str = "All";

/// Columns the free-text query looks at by default
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &[columns::FULL_NAME, columns::BALLOT_NAME, columns::ID];

/// Column the category filter applies to by default
pub const DEFAULT_CATEGORY_FIELD: &str = columns::DISTRICT;

/// Quiescence interval before a typed query is applied
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

// =============================================================================
// Source Defaults
// =============================================================================

/// Conventional location of the candidates file
pub const DEFAULT_SOURCE_LOCATION: &str = "candidates.csv";

/// Timeout for fetching a remote candidates file
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Leading byte order mark some spreadsheet exports prepend
pub const UTF8_BOM: char = '\u{feff}';

// =============================================================================
// Viewport Defaults
// =============================================================================

/// Height of one rendered row, in the viewport's units
pub const DEFAULT_ROW_HEIGHT: usize = 1;

/// Number of rows a terminal page shows
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Rows rendered beyond each edge of the viewport
pub const DEFAULT_OVERSCAN: usize = 2;

// =============================================================================
// Configuration
// =============================================================================

/// Application directory name under the user's config dir
pub const APP_DIR_NAME: &str = "candidate-directory";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CANDIDATE_DIRECTORY_";

/// Accepted layouts for the last-updated column, tried in order
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d",
];

//! Candidate directory: the in-memory holder of loaded candidate records
//!
//! The directory owns the full record set from the last successful load and
//! two pieces of filter state, a free-text query and a category selection.
//! The visible subset is recomputed from those three inputs on demand and is
//! never stored.

use crate::app::models::Record;
use crate::config::SearchConfig;
use crate::constants::ALL_CATEGORIES;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub mod loader;
pub mod metadata;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use metadata::{DirectoryMetadata, LoadStats};
pub use query::SearchCriteria;

/// Category filter selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Filter disabled
    #[default]
    All,

    /// Exact match on the category field
    Value(String),
}

impl Category {
    /// Interpret a selector value, treating the "All" sentinel as no filter
    pub fn parse(value: &str) -> Self {
        Category::from(value.to_string())
    }

    /// Whether a selector value is the "All" sentinel (case-sensitive)
    pub fn is_all_selector(value: &str) -> bool {
        value == ALL_CATEGORIES
    }

    /// Whether a record's category value passes this filter
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Category::All => true,
            Category::Value(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Category::All)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::parse(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        if Category::is_all_selector(&value) {
            Category::All
        } else {
            Category::Value(value)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str(ALL_CATEGORIES),
            Category::Value(value) => f.write_str(value),
        }
    }
}

/// Lifecycle state of the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    /// Nothing loaded yet
    Empty,

    /// A record set has been loaded
    Loaded,
}

/// In-memory candidate directory with search and category filter state
///
/// Construct one per view and inject it; there is no shared global instance.
#[derive(Debug, Clone)]
pub struct CandidateDirectory {
    /// Records from the last load, in source order
    pub(crate) records: Vec<Record>,

    /// Field designations for search, filter and identity
    pub(crate) search: SearchConfig,

    /// Free-text query as set by the caller
    pub(crate) query: String,

    /// Lowercased query used for matching
    pub(crate) query_folded: String,

    /// Current category selection
    pub(crate) category: Category,

    /// Set once a non-empty record set has been loaded
    pub(crate) loaded: bool,

    /// Provenance of the current record set
    pub(crate) metadata: Option<DirectoryMetadata>,
}

impl CandidateDirectory {
    /// Create a new empty directory
    pub fn new(search: SearchConfig) -> Self {
        Self {
            records: Vec::new(),
            search,
            query: String::new(),
            query_folded: String::new(),
            category: Category::All,
            loaded: false,
            metadata: None,
        }
    }

    /// Replace the entire record set
    ///
    /// Query and category are left as they are. Loading an empty set into a
    /// loaded directory keeps it loaded with zero records.
    pub fn load(&mut self, records: Vec<Record>) {
        debug!(
            "Replacing {} records with {}",
            self.records.len(),
            records.len()
        );

        if !records.is_empty() {
            self.loaded = true;
        }
        self.metadata = Some(DirectoryMetadata::new(None, records.len(), 0));
        self.records = records;
    }

    /// Update the free-text query
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.query_folded = self.query.to_lowercase();
    }

    /// Update the category filter
    pub fn set_category(&mut self, category: impl Into<Category>) {
        self.category = category.into();
    }

    /// Current query as set by the caller
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn state(&self) -> DirectoryState {
        if self.loaded {
            DirectoryState::Loaded
        } else {
            DirectoryState::Empty
        }
    }

    /// All loaded records in source order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of loaded records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field designations in use
    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Provenance of the current record set, `None` before the first load
    pub fn metadata(&self) -> Option<&DirectoryMetadata> {
        self.metadata.as_ref()
    }
}

impl Default for CandidateDirectory {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

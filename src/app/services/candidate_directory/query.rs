//! Candidate search and filter functionality
//!
//! This module provides the query methods of the directory: the visible
//! subset under the current query and category, stateless criteria searches,
//! and the distinct category values used to populate a filter selector.
//! Every method is a single linear scan over the loaded records.

use super::{CandidateDirectory, Category};
use crate::app::models::Record;
use std::collections::BTreeMap;

/// Search criteria for a one-off query that leaves the directory state alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring over the designated search fields
    pub query: Option<String>,

    /// Category filter
    pub category: Category,
}

impl SearchCriteria {
    pub fn new(query: impl Into<String>, category: impl Into<Category>) -> Self {
        Self {
            query: Some(query.into()),
            category: category.into(),
        }
    }
}

impl CandidateDirectory {
    /// Records satisfying both the current query and the current category
    ///
    /// Recomputed on every call and never cached; calling it repeatedly with
    /// unchanged state returns the same records in the same order.
    pub fn visible_records(&self) -> Vec<&Record> {
        self.filter(&self.query_folded, &self.category)
    }

    /// Number of records that `visible_records` would return
    pub fn visible_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| self.matches(record, &self.query_folded, &self.category))
            .count()
    }

    /// Records matching the given criteria, ignoring the stored query and category
    ///
    /// # Examples
    /// ```
    /// # use candidate_directory::app::services::candidate_directory::{CandidateDirectory, SearchCriteria};
    /// let directory = CandidateDirectory::default();
    /// let baghdad = directory.find_by_criteria(&SearchCriteria::new("ali", "Baghdad"));
    /// assert!(baghdad.is_empty());
    /// ```
    pub fn find_by_criteria(&self, criteria: &SearchCriteria) -> Vec<&Record> {
        let folded = criteria
            .query
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        self.filter(&folded, &criteria.category)
    }

    /// Whether a record passes the current query and category
    pub fn is_visible(&self, record: &Record) -> bool {
        self.matches(record, &self.query_folded, &self.category)
    }

    /// Look up a record by its identifier field
    pub fn find_by_id(&self, id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.get(&self.search.id_field) == Some(id))
    }

    /// Distinct non-empty category values, sorted
    pub fn available_categories(&self) -> Vec<String> {
        self.category_counts()
            .into_iter()
            .map(|(value, _)| value)
            .collect()
    }

    /// Distinct non-empty category values with their record counts, sorted by value
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.value_counts(&self.search.category_field)
            .into_iter()
            .filter(|(value, _)| !value.is_empty())
            .collect()
    }

    /// Record counts per distinct value of any field, sorted by value
    ///
    /// Records without the field are counted under the empty string.
    pub fn value_counts(&self, field: &str) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.get(field).unwrap_or("")).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect()
    }

    fn filter(&self, query_folded: &str, category: &Category) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| self.matches(record, query_folded, category))
            .collect()
    }

    fn matches(&self, record: &Record, query_folded: &str, category: &Category) -> bool {
        category.matches(record.get(&self.search.category_field))
            && self.matches_query(record, query_folded)
    }

    fn matches_query(&self, record: &Record, query_folded: &str) -> bool {
        if query_folded.is_empty() {
            return true;
        }

        self.search.fields.iter().any(|field| {
            record
                .get(field)
                .is_some_and(|value| contains_folded(value, query_folded))
        })
    }
}

/// Case-insensitive substring test against an already lowercased needle
fn contains_folded(haystack: &str, needle_folded: &str) -> bool {
    if needle_folded.is_empty() {
        return true;
    }

    if haystack.is_ascii() && needle_folded.is_ascii() {
        let needle = needle_folded.as_bytes();
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle));
    }

    haystack.to_lowercase().contains(needle_folded)
}

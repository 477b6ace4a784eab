//! Data models for the candidate directory
//!
//! This module contains the core data structures: the parsed [`Header`] and
//! [`Record`] produced by the CSV parser, plus a typed, borrowed
//! [`Candidate`] view over a record for callers that want named accessors.

use crate::constants::{self, columns};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// Header
// =============================================================================

/// Ordered column names taken from the first row of a CSV table
///
/// Names are trimmed but not deduplicated; two columns may share a name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    names: Vec<Arc<str>>,
}

impl Header {
    /// Build a header from raw header cells, trimming each one
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: fields
                .into_iter()
                .map(|field| Arc::from(field.as_ref().trim()))
                .collect(),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_ref())
    }

    /// Position of the first column with the given name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_ref() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Zip a row of values against the header.
    ///
    /// Returns `None` when the field count differs from the column count.
    pub fn zip(&self, values: Vec<String>) -> Option<Record> {
        if values.len() != self.names.len() {
            return None;
        }

        let mut record = Record::with_capacity(values.len());
        for (name, value) in self.names.iter().zip(values) {
            record.insert(Arc::clone(name), value);
        }
        Some(record)
    }
}

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.names.len()))?;
        for name in &self.names {
            seq.serialize_element(name.as_ref())?;
        }
        seq.end()
    }
}

/// Check that every required column is present in the header.
///
/// The parser never calls this; it is for callers that want stricter typing
/// on top of the schemaless records.
pub fn validate_headers(header: &Header, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !header.contains(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing_columns(missing))
    }
}

// =============================================================================
// Record
// =============================================================================

/// One parsed data row: an insertion-ordered mapping of column name to cell value
///
/// Inserting an existing key overwrites the value but keeps the key's original
/// position, so with duplicate header names the later column wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(Arc<str>, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous value for the key if any
    pub fn insert(&mut self, key: impl Into<Arc<str>>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_ref())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<Arc<str>>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}

// =============================================================================
// Candidate Fields
// =============================================================================

/// Closed set of columns the candidates export is expected to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateField {
    Id,
    FullName,
    BallotName,
    District,
    Sex,
    DataQuality,
    LastUpdated,
}

impl CandidateField {
    /// Every field in export order
    pub fn all() -> &'static [CandidateField] {
        &[
            CandidateField::Id,
            CandidateField::FullName,
            CandidateField::BallotName,
            CandidateField::District,
            CandidateField::Sex,
            CandidateField::DataQuality,
            CandidateField::LastUpdated,
        ]
    }

    /// Column name of this field in the CSV header
    pub fn header_name(&self) -> &'static str {
        match self {
            CandidateField::Id => columns::ID,
            CandidateField::FullName => columns::FULL_NAME,
            CandidateField::BallotName => columns::BALLOT_NAME,
            CandidateField::District => columns::DISTRICT,
            CandidateField::Sex => columns::SEX,
            CandidateField::DataQuality => columns::DATA_QUALITY,
            CandidateField::LastUpdated => columns::LAST_UPDATED,
        }
    }
}

impl fmt::Display for CandidateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

impl FromStr for CandidateField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        CandidateField::all()
            .iter()
            .copied()
            .find(|field| field.header_name() == name)
            .ok_or_else(|| Error::configuration(format!("Unknown candidate field '{}'", name)))
    }
}

// =============================================================================
// Candidate View
// =============================================================================

/// Typed, borrowed view of a candidate record
///
/// Missing columns read as empty strings so a partially curated export can
/// still be displayed.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    record: &'a Record,
}

impl<'a> Candidate<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    pub fn field(&self, field: CandidateField) -> &'a str {
        self.record.get(field.header_name()).unwrap_or("")
    }

    pub fn id(&self) -> &'a str {
        self.field(CandidateField::Id)
    }

    pub fn full_name(&self) -> &'a str {
        self.field(CandidateField::FullName)
    }

    pub fn ballot_name(&self) -> &'a str {
        self.field(CandidateField::BallotName)
    }

    pub fn district(&self) -> &'a str {
        self.field(CandidateField::District)
    }

    pub fn sex(&self) -> &'a str {
        self.field(CandidateField::Sex)
    }

    pub fn data_quality(&self) -> &'a str {
        self.field(CandidateField::DataQuality)
    }

    pub fn last_updated(&self) -> &'a str {
        self.field(CandidateField::LastUpdated)
    }

    /// Parse the last-updated column, `None` if empty or in an unknown layout
    pub fn last_updated_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self.last_updated())
    }

    /// Underlying record
    pub fn record(&self) -> &'a Record {
        self.record
    }
}

impl<'a> From<&'a Record> for Candidate<'a> {
    fn from(record: &'a Record) -> Self {
        Self::new(record)
    }
}

/// Parse a timestamp string in any of the accepted layouts
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in constants::TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(timestamp);
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

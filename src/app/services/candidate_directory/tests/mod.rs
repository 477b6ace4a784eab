//! Shared test utilities and fixtures for candidate directory tests

use crate::app::models::Record;
use crate::app::services::candidate_directory::CandidateDirectory;
use crate::constants::columns;


/// Create a test record with the core candidate fields
pub fn create_test_record(id: &str, full_name: &str, district: &str) -> Record {
    let mut record = Record::with_capacity(3);
    record.insert(columns::ID, id);
    record.insert(columns::FULL_NAME, full_name);
    record.insert(columns::DISTRICT, district);
    record
}

/// The three candidates used throughout the search examples
pub fn sample_records() -> Vec<Record> {
    vec![
        create_test_record("1", "Ahmed Ali", "Baghdad"),
        create_test_record("2", "Layla Hassan", "Basra"),
        create_test_record("3", "Ali Hassan", "Baghdad"),
    ]
}

/// Directory loaded with `sample_records`
pub fn create_test_directory() -> CandidateDirectory {
    let mut directory = CandidateDirectory::default();
    directory.load(sample_records());
    directory
}

/// Identifiers of the given records, in order
pub fn ids<'a>(records: &[&'a Record]) -> Vec<&'a str> {
    records.iter().filter_map(|&r| r.get(columns::ID)).collect()
}

/// Candidates file text equivalent to `sample_records`
pub const SAMPLE_CSV: &str = "id,full_name,electoral_district
1,Ahmed Ali,Baghdad
2,Layla Hassan,Basra
3,Ali Hassan,Baghdad
";

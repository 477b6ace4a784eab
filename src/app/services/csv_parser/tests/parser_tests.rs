//! Tests for the CSV parser

use super::*;
use crate::app::services::csv_parser::{parse, parse_with_stats};
use crate::constants::columns;

#[test]
fn test_well_formed_file_yields_every_row() {
    let content = create_candidates_csv(25);
    let records = parse(&content);

    assert_eq!(records.len(), 25);
    for record in &records {
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, columns::ALL);
    }
    assert_eq!(records[0].get("id"), Some("1"));
    assert_eq!(records[24].get("id"), Some("25"));
    assert_eq!(records[3].get("ballot_name"), Some("List 4, Coalition"));
}

#[test]
fn test_quoted_value_survives_parsing() {
    let original = "Al-Rasheed, \"The Reformer\"\nSecond line";
    let content = format!("id,full_name\n7,{}\n", quote_field(original));

    let records = parse(&content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("full_name"), Some(original));
}

#[test]
fn test_quoted_value_written_by_csv_writer() {
    let original = "Hassan, \"Abu Ali\"\r\nBasra branch";

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "full_name"]).unwrap();
    writer.write_record(["9", original]).unwrap();
    let content = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    let records = parse(&content);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("full_name"), Some(original));
}

#[test]
fn test_mismatched_rows_are_dropped() {
    let content = "id,full_name,electoral_district
1,Ahmed Ali,Baghdad
2,Layla Hassan
3,Ali Hassan,Baghdad,extra
4,Sara Kareem,Erbil
";

    let result = parse_with_stats(content);
    let ids: Vec<&str> = result
        .records
        .iter()
        .filter_map(|r| r.get("id"))
        .collect();

    assert_eq!(ids, vec!["1", "4"]);
    assert_eq!(result.stats.total_rows, 4);
    assert_eq!(result.stats.rows_dropped, 2);
    assert_eq!(result.stats.dropped_rows[0].line, 3);
    assert_eq!(result.stats.dropped_rows[0].field_count, 2);
    assert_eq!(result.stats.dropped_rows[1].line, 4);
    assert_eq!(result.stats.dropped_rows[1].field_count, 4);
}

#[test]
fn test_quoted_comma_does_not_split_field() {
    let content = "id,ballot_name,district\n1,\"Unity, Justice\",Basra\n";
    let records = parse(content);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("ballot_name"), Some("Unity, Justice"));
    assert_eq!(records[0].get("district"), Some("Basra"));
}

#[test]
fn test_parsing_is_idempotent() {
    let content = create_candidates_csv(10);
    assert_eq!(parse(&content), parse(&content));
}

#[test]
fn test_degenerate_inputs_yield_nothing() {
    assert!(parse("").is_empty());
    assert!(parse("id,full_name").is_empty());
    assert!(parse("id,full_name\n").is_empty());
    assert!(parse("\n\n   \n").is_empty());
    assert!(parse("\n\nid,full_name\n\n").is_empty());
}

#[test]
fn test_blank_lines_are_skipped_not_counted() {
    let content = "\nid,name\n\n1,a\n   \n2,b\n\n";
    let result = parse_with_stats(content);

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.stats.total_rows, 2);
    assert_eq!(result.stats.blank_lines_skipped, 4);
    assert!(!result.stats.has_dropped_rows());
}

#[test]
fn test_header_and_unquoted_fields_are_trimmed() {
    let content = "  id , full_name \n 12 ,  Noor Jabbar  \n";
    let records = parse(content);

    assert_eq!(records[0].get("id"), Some("12"));
    assert_eq!(records[0].get("full_name"), Some("Noor Jabbar"));
}

#[test]
fn test_quoted_header_is_trimmed() {
    let content = "\" id \",name\n1,a\n";
    let result = parse_with_stats(content);

    let names: Vec<&str> = result.header.names().collect();
    assert_eq!(names, vec!["id", "name"]);
    assert_eq!(result.records[0].get("id"), Some("1"));
}

#[test]
fn test_crlf_line_endings() {
    let content = "id,name\r\n1,Ahmed\r\n2,Layla\r\n";
    let records = parse(content);

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("name"), Some("Layla"));
}

#[test]
fn test_byte_order_mark_is_stripped() {
    let content = "\u{feff}id,name\n1,Ahmed\n";
    let records = parse(content);

    assert_eq!(records[0].get("id"), Some("1"));
}

#[test]
fn test_empty_fields_are_kept() {
    let content = "id,name,district\n1,,\n";
    let records = parse(content);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some(""));
    assert_eq!(records[0].get("district"), Some(""));
}

#[test]
fn test_arabic_and_kurdish_text() {
    let content = "id,full_name,electoral_district\n1,أحمد علي,بغداد\n2,\"ئازاد، کەریم\",هەولێر\n";
    let records = parse(content);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("full_name"), Some("أحمد علي"));
    assert_eq!(records[1].get("full_name"), Some("ئازاد، کەریم"));
    assert_eq!(records[1].get("electoral_district"), Some("هەولێر"));
}

#[test]
fn test_duplicate_header_names_later_column_wins() {
    let content = "id,name,name\n1,old,new\n";
    let result = parse_with_stats(content);

    assert_eq!(result.header.len(), 3);
    assert_eq!(result.records[0].len(), 2);
    assert_eq!(result.records[0].get("name"), Some("new"));
}

#[test]
fn test_large_dataset_with_sprinkled_corruption() {
    let mut content = create_candidates_csv(7000);
    content.push_str("7001,truncated row\n");
    content.push_str("7002,a,b,c,d,e,f,g,h\n");

    let result = parse_with_stats(&content);
    assert_eq!(result.records.len(), 7000);
    assert_eq!(result.stats.rows_dropped, 2);
    assert_eq!(result.stats.expected_fields, 7);
    assert!(result.stats.is_successful());
}

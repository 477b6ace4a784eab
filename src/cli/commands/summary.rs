//! Summary command implementation
//!
//! Reports what a load produced: how many rows were admitted or dropped,
//! how many districts the records span, and breakdowns by sex and by the
//! data-quality marker.

use super::shared::{RunStats, load_configuration, load_directory, output_error, setup_logging};
use crate::Result;
use crate::app::models::Candidate;
use crate::app::services::candidate_directory::{CandidateDirectory, LoadStats};
use crate::cli::args::{OutputFormat, SummaryArgs};
use crate::constants::columns;
use chrono::NaiveDateTime;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

/// Everything the summary command reports about a load
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub source: String,
    pub records_loaded: usize,
    pub rows_dropped: usize,
    pub blank_lines_skipped: usize,
    pub admission_rate: f64,
    /// Input lines on which dropped rows started
    pub dropped_lines: Vec<usize>,
    pub missing_columns: Vec<String>,
    pub district_count: usize,
    pub by_sex: BTreeMap<String, usize>,
    pub by_data_quality: BTreeMap<String, usize>,
    /// Most recent parseable last-updated timestamp
    pub latest_update: Option<NaiveDateTime>,
    pub load_seconds: f64,
}

impl CandidateSummary {
    pub fn build(directory: &CandidateDirectory, load_stats: &LoadStats) -> Self {
        let latest_update = directory
            .records()
            .iter()
            .filter_map(|record| Candidate::new(record).last_updated_at())
            .max();

        Self {
            source: load_stats.source.clone(),
            records_loaded: load_stats.records_loaded,
            rows_dropped: load_stats.rows_dropped(),
            blank_lines_skipped: load_stats.parse.blank_lines_skipped,
            admission_rate: load_stats.parse.success_rate(),
            dropped_lines: load_stats
                .parse
                .dropped_rows
                .iter()
                .map(|row| row.line)
                .collect(),
            missing_columns: load_stats.missing_columns.clone(),
            district_count: directory.available_categories().len(),
            by_sex: directory.value_counts(columns::SEX).into_iter().collect(),
            by_data_quality: directory
                .value_counts(columns::DATA_QUALITY)
                .into_iter()
                .collect(),
            latest_update,
            load_seconds: load_stats.load_duration.as_secs_f64(),
        }
    }

    /// Flatten into `(metric, value)` rows for CSV output
    fn metric_rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("source".to_string(), self.source.clone()),
            ("records_loaded".to_string(), self.records_loaded.to_string()),
            ("rows_dropped".to_string(), self.rows_dropped.to_string()),
            (
                "blank_lines_skipped".to_string(),
                self.blank_lines_skipped.to_string(),
            ),
            (
                "admission_rate".to_string(),
                format!("{:.1}", self.admission_rate),
            ),
            ("district_count".to_string(), self.district_count.to_string()),
        ];

        for (value, count) in &self.by_sex {
            rows.push((format!("sex:{}", value), count.to_string()));
        }
        for (value, count) in &self.by_data_quality {
            rows.push((format!("data_quality:{}", value), count.to_string()));
        }
        if let Some(latest) = self.latest_update {
            rows.push(("latest_update".to_string(), latest.to_string()));
        }

        rows
    }
}

/// Summary command runner
pub async fn run_summary(args: SummaryArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args.common)?;

    info!("Summarizing candidates file");
    debug!("Summary arguments: {:?}", args);

    let config = load_configuration(&args.common)?;
    let (directory, load_stats) = load_directory(&config, args.common.show_progress()).await?;
    let mut stats = RunStats::from_load(&load_stats);

    let summary = CandidateSummary::build(&directory, &load_stats);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_summary(&mut out, &summary, args.output_format)?;

    stats.run_time = start_time.elapsed();
    Ok(stats)
}

/// Write the summary in the requested format
pub fn render_summary<W: Write>(
    out: &mut W,
    summary: &CandidateSummary,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => render_human_summary(out, summary),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, summary)?;
            writeln!(out).map_err(output_error)?;
            Ok(())
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["metric", "value"])?;
            for (metric, value) in summary.metric_rows() {
                writer.write_record([metric, value])?;
            }
            writer.flush().map_err(output_error)?;
            Ok(())
        }
    }
}

fn render_human_summary<W: Write>(out: &mut W, summary: &CandidateSummary) -> Result<()> {
    let mut report = format!(
        "{}\n  Source: {}\n  Records: {} ({:.1}% of rows admitted, loaded in {:.2}s)\n  Districts: {}\n",
        "Candidates Summary".bright_green().bold(),
        summary.source,
        summary.records_loaded.to_string().bright_white().bold(),
        summary.admission_rate,
        summary.load_seconds,
        summary.district_count
    );

    if summary.rows_dropped > 0 {
        let lines: Vec<String> = summary
            .dropped_lines
            .iter()
            .take(10)
            .map(|line| line.to_string())
            .collect();
        report.push_str(&format!(
            "  Dropped rows: {} (lines {}{})\n",
            summary.rows_dropped.to_string().bright_red().bold(),
            lines.join(", "),
            if summary.dropped_lines.len() > 10 { ", ..." } else { "" }
        ));
    }

    if summary.blank_lines_skipped > 0 {
        report.push_str(&format!(
            "  Blank lines skipped: {}\n",
            summary.blank_lines_skipped
        ));
    }

    if !summary.missing_columns.is_empty() {
        report.push_str(&format!(
            "  {} {}\n",
            "Missing columns:".yellow(),
            summary.missing_columns.join(", ")
        ));
    }

    report.push_str(&format!("\n{}\n", "By sex".bold()));
    push_breakdown(&mut report, &summary.by_sex, summary.records_loaded);

    report.push_str(&format!("\n{}\n", "By data quality".bold()));
    push_breakdown(&mut report, &summary.by_data_quality, summary.records_loaded);

    if let Some(latest) = summary.latest_update {
        report.push_str(&format!("\n  Last updated: {}\n", latest));
    }

    write!(out, "{}", report).map_err(output_error)?;
    Ok(())
}

fn push_breakdown(report: &mut String, counts: &BTreeMap<String, usize>, total: usize) {
    for (value, count) in counts {
        let percentage = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        let shown = if value.is_empty() { "(blank)" } else { value.as_str() };
        report.push_str(&format!("  • {}: {} ({:.1}%)\n", shown, count, percentage));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::csv_parser::tests::create_candidates_csv;

    fn summary_for(text: &str) -> CandidateSummary {
        let mut directory = CandidateDirectory::default();
        let stats = directory.load_text(text);
        CandidateSummary::build(&directory, &stats)
    }

    #[test]
    fn test_build_summary() {
        let summary = summary_for(&create_candidates_csv(10));

        assert_eq!(summary.records_loaded, 10);
        assert_eq!(summary.rows_dropped, 0);
        assert_eq!(summary.district_count, 2);
        assert_eq!(summary.by_sex.get("F"), Some(&3));
        assert_eq!(summary.by_sex.get("M"), Some(&7));
        assert_eq!(summary.by_data_quality.get("verified"), Some(&10));
        assert_eq!(
            summary.latest_update.map(|t| t.to_string()),
            Some("2025-01-11 10:00:00".to_string())
        );
        assert!(summary.missing_columns.is_empty());
    }

    #[test]
    fn test_summary_reports_dropped_lines() {
        let mut text = create_candidates_csv(3);
        text.push_str("4,Broken Row\n");

        let summary = summary_for(&text);
        assert_eq!(summary.rows_dropped, 1);
        assert_eq!(summary.dropped_lines, vec![5]);
    }

    #[test]
    fn test_render_human_summary() {
        colored::control::set_override(false);
        let mut text = create_candidates_csv(4);
        text.push_str("5,Broken Row\n");
        let summary = summary_for(&text);

        let mut out = Vec::new();
        render_summary(&mut out, &summary, OutputFormat::Human).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("Candidates Summary"));
        assert!(output.contains("Records: 4"));
        assert!(output.contains("Dropped rows: 1 (lines 6)"));
        assert!(output.contains("• M: 3 (75.0%)"));
    }

    #[test]
    fn test_render_csv_summary() {
        let summary = summary_for(&create_candidates_csv(3));

        let mut out = Vec::new();
        render_summary(&mut out, &summary, OutputFormat::Csv).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("metric,value\nsource,memory\nrecords_loaded,3\n"));
        assert!(output.contains("sex:F,1\n"));
        assert!(output.contains("data_quality:verified,3\n"));
    }

    #[test]
    fn test_render_json_summary() {
        let summary = summary_for(&create_candidates_csv(2));

        let mut out = Vec::new();
        render_summary(&mut out, &summary, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["records_loaded"], 2);
        assert_eq!(value["by_sex"]["M"], 2);
        assert_eq!(value["district_count"], 2);
    }
}

//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! the command implementations: logging setup, layered configuration,
//! directory loading and record rendering.

use crate::app::models::{Candidate, Record};
use crate::app::services::candidate_directory::{CandidateDirectory, Category, LoadStats};
use crate::app::services::source::SourceLocation;
use crate::cli::args::{CommonArgs, OutputFormat};
use crate::config::DirectoryConfig;
use crate::{Error, Result};
use colored::*;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// Run statistics reported back to `main`
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Records held by the directory after loading
    pub records_loaded: usize,
    /// Rows dropped by the parser
    pub rows_dropped: usize,
    /// Records written to the output
    pub records_shown: usize,
    /// Total command time
    pub run_time: Duration,
}

impl RunStats {
    pub fn from_load(stats: &LoadStats) -> Self {
        Self {
            records_loaded: stats.records_loaded,
            rows_dropped: stats.rows_dropped(),
            ..Default::default()
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("candidate_directory={}", log_level)));

    let initialized = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    initialized
        .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (defaults -> file -> env -> args)
pub fn load_configuration(args: &CommonArgs) -> Result<DirectoryConfig> {
    let default_config_path = if args.config_file.is_none() {
        DirectoryConfig::default_config_path()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_deref()
            .filter(|path| path.exists()),
    };

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using defaults and environment variables");
    }

    let mut config = DirectoryConfig::load_layered(config_file)?;

    if let Some(source) = &args.source {
        config = config.with_source(source.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Build a directory from the configuration and load its source
pub async fn load_directory(
    config: &DirectoryConfig,
    show_progress: bool,
) -> Result<(CandidateDirectory, LoadStats)> {
    let location: SourceLocation = config.source.location.parse()?;

    let mut directory = CandidateDirectory::new(config.search.clone());
    let stats = directory
        .load_from_source(&location, &config.source, show_progress)
        .await?;

    Ok((directory, stats))
}

/// Line printed in place of an empty result list
pub fn no_matches_message(query: &str, category: &Category) -> String {
    let query = query.trim();
    match (query.is_empty(), category) {
        (true, Category::All) => "No candidates loaded.".to_string(),
        (true, Category::Value(district)) => {
            format!("No candidates found in district \"{}\".", district)
        }
        (false, Category::All) => format!("No candidates match \"{}\".", query),
        (false, Category::Value(district)) => format!(
            "No candidates match \"{}\" in district \"{}\".",
            query, district
        ),
    }
}

/// Write records in the requested format
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[&Record],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => write_human_records(out, records),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out).map_err(output_error)?;
            Ok(())
        }
        OutputFormat::Csv => write_csv_records(out, records),
    }
}

fn write_human_records<W: Write>(out: &mut W, records: &[&Record]) -> Result<()> {
    for &record in records {
        let candidate = Candidate::new(record);
        writeln!(
            out,
            "{:>6}  {}  {}  {}",
            candidate.id().bright_white().bold(),
            candidate.full_name(),
            format!("[{}]", candidate.district()).as_str().cyan(),
            candidate.ballot_name().dimmed()
        )
        .map_err(output_error)?;
    }
    Ok(())
}

/// Write records as CSV, using the first record's columns as the header
fn write_csv_records<W: Write>(out: &mut W, records: &[&Record]) -> Result<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };

    let columns: Vec<&str> = first.keys().collect();
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&columns)?;

    for record in records {
        writer.write_record(columns.iter().map(|column| record.get(column).unwrap_or("")))?;
    }

    writer.flush().map_err(output_error)?;
    Ok(())
}

/// Write `(value, count)` pairs as a two-column table
pub fn write_counts<W: Write>(
    out: &mut W,
    label: &str,
    counts: &[(String, usize)],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            let width = counts
                .iter()
                .map(|(value, _)| value.chars().count())
                .max()
                .unwrap_or(0)
                .max(label.len());

            writeln!(out, "{:<width$}  {}", label.bold(), "count".bold(), width = width)
                .map_err(output_error)?;
            for (value, count) in counts {
                let shown = if value.is_empty() { "(blank)" } else { value.as_str() };
                writeln!(out, "{:<width$}  {}", shown, count, width = width)
                    .map_err(output_error)?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            let rows: Vec<_> = counts
                .iter()
                .map(|(value, count)| serde_json::json!({ label: value, "count": count }))
                .collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out).map_err(output_error)?;
            Ok(())
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record([label, "count"])?;
            for (value, count) in counts {
                writer.write_record([value.as_str(), count.to_string().as_str()])?;
            }
            writer.flush().map_err(output_error)?;
            Ok(())
        }
    }
}

pub(crate) fn output_error(e: std::io::Error) -> Error {
    Error::output(format!("Failed to write output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::candidate_directory::tests::{create_test_directory, sample_records};
    use tempfile::NamedTempFile;

    fn render(records: &[&Record], format: OutputFormat) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_records(&mut out, records, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_no_matches_message() {
        assert_eq!(
            no_matches_message("ali", &Category::Value("Basra".into())),
            "No candidates match \"ali\" in district \"Basra\"."
        );
        assert_eq!(no_matches_message(" ali ", &Category::All), "No candidates match \"ali\".");
        assert_eq!(
            no_matches_message("", &Category::Value("Erbil".into())),
            "No candidates found in district \"Erbil\"."
        );
        assert_eq!(no_matches_message("", &Category::All), "No candidates loaded.");
    }

    #[test]
    fn test_write_human_records() {
        let records = sample_records();
        let refs: Vec<&Record> = records.iter().collect();

        let output = render(&refs, OutputFormat::Human);
        assert_eq!(output.lines().count(), 3);
        assert!(output.contains("Ahmed Ali"));
        assert!(output.contains("[Basra]"));
    }

    #[test]
    fn test_write_json_records() {
        let records = sample_records();
        let refs: Vec<&Record> = records.iter().collect();

        let output = render(&refs[..1], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["full_name"], "Ahmed Ali");
    }

    #[test]
    fn test_write_csv_records_requotes_fields() {
        let mut record = Record::new();
        record.insert("id", "7");
        record.insert("full_name", "Al-Rasheed, \"The Reformer\"");

        let output = render(&[&record], OutputFormat::Csv);
        assert_eq!(
            output,
            "id,full_name\n7,\"Al-Rasheed, \"\"The Reformer\"\"\"\n"
        );

        // Re-parsing the output gives back the same record
        assert_eq!(crate::parse(&output), vec![record]);
    }

    #[test]
    fn test_write_csv_records_empty() {
        assert_eq!(render(&[], OutputFormat::Csv), "");
    }

    #[test]
    fn test_write_counts_formats() {
        colored::control::set_override(false);
        let directory = create_test_directory();
        let counts = directory.category_counts();

        let mut human = Vec::new();
        write_counts(&mut human, "district", &counts, OutputFormat::Human).unwrap();
        let human = String::from_utf8(human).unwrap();
        assert!(human.starts_with("district"));
        assert!(human.contains("Baghdad   2"));

        let mut csv = Vec::new();
        write_counts(&mut csv, "district", &counts, OutputFormat::Csv).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "district,count\nBaghdad,2\nBasra,1\n"
        );

        let mut json = Vec::new();
        write_counts(&mut json, "district", &counts, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value[1]["district"], "Basra");
        assert_eq!(value[1]["count"], 1);
    }

    #[test]
    fn test_load_configuration_applies_source_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nlocation = \"from-file.csv\"\ntimeout_secs = 5").unwrap();

        let mut args = CommonArgs {
            config_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = load_configuration(&args).unwrap();
        assert_eq!(config.source.location, "from-file.csv");
        assert_eq!(config.source.timeout_secs, 5);

        args.source = Some("https://example.org/candidates.csv".to_string());
        let config = load_configuration(&args).unwrap();
        assert_eq!(config.source.location, "https://example.org/candidates.csv");
    }

    #[test]
    fn test_load_configuration_missing_file() {
        let args = CommonArgs {
            config_file: Some("/nonexistent/config.toml".into()),
            ..Default::default()
        };
        assert!(matches!(
            load_configuration(&args),
            Err(Error::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_directory_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            crate::app::services::candidate_directory::tests::SAMPLE_CSV.as_bytes(),
        )
        .unwrap();

        let config = DirectoryConfig::default().with_source(file.path().display().to_string());
        let (directory, stats) = load_directory(&config, false).await.unwrap();

        assert_eq!(directory.len(), 3);
        assert_eq!(RunStats::from_load(&stats).records_loaded, 3);
    }
}

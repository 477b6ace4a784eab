//! Command-line argument definitions for the candidate directory
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::constants::ALL_CATEGORIES;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the candidate directory
///
/// Loads the published candidates list and lets you search it by name,
/// filter it by electoral district, and summarize what was loaded.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "candidate-directory",
    version,
    about = "Search and filter the electoral candidates list",
    long_about = "Loads the published candidates list from a local file or an HTTP endpoint, \
                  parses its quoted CSV, and serves searchable, district-filtered views of the \
                  records. Malformed rows are skipped and reported rather than aborting the load."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Search candidates by name and district
    Search(SearchArgs),
    /// List electoral districts with candidate counts
    Districts(DistrictsArgs),
    /// Summarize the loaded candidates file
    Summary(SummaryArgs),
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Candidates file location
    ///
    /// A local path or an http(s) URL. Overrides the configured source.
    #[arg(
        short = 's',
        long = "source",
        value_name = "PATH|URL",
        help = "Local path or URL of the candidates file"
    )]
    pub source: Option<String>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// config.toml in the platform config directory under candidate-directory/.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides progress spinners.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the search command
#[derive(Debug, Clone, Parser)]
pub struct SearchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Free-text query
    ///
    /// Matched case-insensitively against the configured search fields
    /// (full name, ballot name and identifier by default).
    #[arg(
        long = "query",
        value_name = "TEXT",
        help = "Case-insensitive text to search for"
    )]
    pub query: Option<String>,

    /// Electoral district to restrict results to
    #[arg(
        short = 'd',
        long = "district",
        value_name = "NAME",
        default_value = ALL_CATEGORIES,
        help = "Exact district name, or \"All\" for every district"
    )]
    pub district: String,

    /// Page of results to show, starting at 1
    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        default_value_t = 1,
        help = "Page of results to show (1-based)"
    )]
    pub page: usize,

    /// Rows per page
    ///
    /// Defaults to the configured viewport height.
    #[arg(long = "page-size", value_name = "ROWS", help = "Number of rows per page")]
    pub page_size: Option<usize>,

    /// Read queries from stdin, one per line, applying each after a pause
    #[arg(
        short = 'i',
        long = "interactive",
        help = "Read queries from stdin and refresh results as you type"
    )]
    pub interactive: bool,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the districts command
#[derive(Debug, Clone, Parser)]
pub struct DistrictsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the district list"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the summary command
#[derive(Debug, Clone, Parser)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the summary"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for spreadsheets
    Csv,
}

impl CommonArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl SearchArgs {
    /// Validate the search arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(Error::configuration("Pages are numbered from 1"));
        }

        if self.page_size == Some(0) {
            return Err(Error::configuration(
                "Page size must be greater than 0",
            ));
        }

        if self.district.trim().is_empty() {
            return Err(Error::configuration(format!(
                "District cannot be empty; use \"{}\" to disable the filter",
                ALL_CATEGORIES
            )));
        }

        Ok(())
    }
}

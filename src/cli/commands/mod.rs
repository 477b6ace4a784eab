//! Command implementations for the candidate directory CLI
//!
//! Each subcommand lives in its own module and shares loading, logging and
//! rendering helpers from `shared`.

pub mod districts;
pub mod search;
pub mod shared;
pub mod summary;

pub use shared::RunStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Dispatches to the subcommand handler:
/// - `search`: query and district filtered, paged record listing
/// - `districts`: distinct districts with candidate counts
/// - `summary`: load statistics and field breakdowns
pub async fn run(args: Args) -> Result<RunStats> {
    match args.command {
        Some(Commands::Search(search_args)) => search::run_search(search_args).await,
        Some(Commands::Districts(districts_args)) => {
            districts::run_districts(districts_args).await
        }
        Some(Commands::Summary(summary_args)) => summary::run_summary(summary_args).await,
        None => Err(Error::configuration("No command given")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_without_command() {
        let result = run(Args { command: None }).await;
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_run_stats_default() {
        let stats = RunStats::default();
        assert_eq!(stats.records_loaded, 0);
        assert_eq!(stats.records_shown, 0);
    }
}

//! Districts command implementation
//!
//! Lists the distinct values of the category field with candidate counts,
//! the same list a district selector would be populated from.

use super::shared::{
    RunStats, load_configuration, load_directory, output_error, setup_logging, write_counts,
};
use crate::Result;
use crate::app::services::candidate_directory::CandidateDirectory;
use crate::cli::args::{DistrictsArgs, OutputFormat};
use colored::*;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

/// Districts command runner
pub async fn run_districts(args: DistrictsArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args.common)?;

    info!("Listing electoral districts");
    debug!("Districts arguments: {:?}", args);

    let config = load_configuration(&args.common)?;
    let (directory, load_stats) = load_directory(&config, args.common.show_progress()).await?;
    let mut stats = RunStats::from_load(&load_stats);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    stats.records_shown = render_districts(&mut out, &directory, args.output_format)?;
    stats.run_time = start_time.elapsed();

    Ok(stats)
}

/// Write the district list, returning how many districts were written
pub fn render_districts<W: Write>(
    out: &mut W,
    directory: &CandidateDirectory,
    format: OutputFormat,
) -> Result<usize> {
    let counts = directory.category_counts();

    if counts.is_empty() && format == OutputFormat::Human {
        writeln!(out, "{}", "No districts found.".yellow()).map_err(output_error)?;
        return Ok(0);
    }

    write_counts(out, "district", &counts, format)?;
    Ok(counts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::candidate_directory::tests::create_test_directory;

    #[test]
    fn test_render_districts() {
        colored::control::set_override(false);
        let directory = create_test_directory();

        let mut out = Vec::new();
        let shown = render_districts(&mut out, &directory, OutputFormat::Csv).unwrap();
        assert_eq!(shown, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "district,count\nBaghdad,2\nBasra,1\n"
        );
    }

    #[test]
    fn test_render_districts_empty() {
        colored::control::set_override(false);
        let directory = CandidateDirectory::default();

        let mut out = Vec::new();
        let shown = render_districts(&mut out, &directory, OutputFormat::Human).unwrap();
        assert_eq!(shown, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "No districts found.\n");
    }
}

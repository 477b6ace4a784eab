//! Search command implementation
//!
//! Loads the directory, applies the query and district filter, and prints one
//! page of the visible records. In interactive mode queries are read from
//! stdin and applied once typing pauses for the configured debounce interval.

use super::shared::{
    RunStats, load_configuration, load_directory, no_matches_message, output_error,
    setup_logging, write_records,
};
use crate::app::services::candidate_directory::CandidateDirectory;
use crate::app::services::debounce::QueryDebouncer;
use crate::app::services::viewport::Viewport;
use crate::cli::args::{OutputFormat, SearchArgs};
use crate::config::ViewConfig;
use crate::constants::ALL_CATEGORIES;
use crate::{Error, Result};
use colored::*;
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Prefix of the interactive command that changes the district filter
const DISTRICT_COMMAND: &str = "/district";

/// Search command runner
pub async fn run_search(args: SearchArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args.common)?;

    info!("Starting candidate search");
    debug!("Search arguments: {:?}", args);

    args.validate()?;

    let config = load_configuration(&args.common)?;
    let (mut directory, load_stats) =
        load_directory(&config, args.common.show_progress()).await?;
    let mut stats = RunStats::from_load(&load_stats);

    directory.set_category(args.district.as_str());
    if let Some(query) = &args.query {
        directory.set_query(query.as_str());
    }

    let viewport = page_viewport(&config.view, args.page_size);

    stats.records_shown = if args.interactive {
        run_interactive(
            &mut directory,
            &viewport,
            config.search.debounce_interval(),
            args.output_format,
        )
        .await?
    } else {
        print_page(&directory, &viewport, args.page - 1, args.output_format)?
    };

    stats.run_time = start_time.elapsed();
    info!(
        "Search completed in {:.2}s, {} of {} candidates shown",
        stats.run_time.as_secs_f64(),
        stats.records_shown,
        stats.records_loaded
    );

    Ok(stats)
}

/// Viewport used for paging, with an optional explicit page size
pub fn page_viewport(view: &ViewConfig, page_size: Option<usize>) -> Viewport {
    match page_size {
        Some(rows) => Viewport::new(1, rows, view.overscan),
        None => Viewport::from(view),
    }
}

/// Render one zero-based page of the visible records, returning how many were written
pub fn render_page<W: Write>(
    out: &mut W,
    directory: &CandidateDirectory,
    viewport: &Viewport,
    page: usize,
    format: OutputFormat,
) -> Result<usize> {
    let visible = directory.visible_records();

    if visible.is_empty() {
        let message = no_matches_message(directory.query(), directory.category());
        if format == OutputFormat::Human {
            writeln!(out, "{}", message.as_str().yellow()).map_err(output_error)?;
        } else {
            info!("{}", message);
            write_records(out, &[], format)?;
        }
        return Ok(0);
    }

    let range = viewport.page_range(visible.len(), page);
    let shown = viewport.page(&visible, range.clone());

    if format == OutputFormat::Human {
        let page_count = viewport.page_count(visible.len());
        if shown.is_empty() {
            writeln!(
                out,
                "{}",
                format!(
                    "Page {} is past the last page ({} of {} candidates on {} pages)",
                    page + 1,
                    visible.len(),
                    directory.len(),
                    page_count
                )
                .as_str()
                .yellow()
            )
            .map_err(output_error)?;
            return Ok(0);
        }

        writeln!(
            out,
            "{}",
            format!(
                "Showing {}-{} of {} matching candidates ({} loaded), page {} of {}",
                range.start + 1,
                range.end,
                visible.len(),
                directory.len(),
                page + 1,
                page_count
            )
            .as_str()
            .bright_green()
            .bold()
        )
        .map_err(output_error)?;
    }

    write_records(out, shown, format)?;
    Ok(shown.len())
}

fn print_page(
    directory: &CandidateDirectory,
    viewport: &Viewport,
    page: usize,
    format: OutputFormat,
) -> Result<usize> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_page(&mut out, directory, viewport, page, format)
}

/// Apply a line typed in interactive mode
///
/// Returns `true` when the line changed the district filter and the results
/// should be redrawn immediately. Anything else is a query and waits in the
/// debouncer.
pub fn apply_input_line(
    directory: &mut CandidateDirectory,
    debouncer: &mut QueryDebouncer,
    line: &str,
    now: Instant,
) -> bool {
    if let Some(rest) = line.trim_start().strip_prefix(DISTRICT_COMMAND) {
        let district = rest.trim();
        directory.set_category(if district.is_empty() {
            ALL_CATEGORIES
        } else {
            district
        });
        if let Some(query) = debouncer.flush() {
            directory.set_query(query);
        }
        return true;
    }

    debouncer.push(line, now);
    false
}

async fn run_interactive(
    directory: &mut CandidateDirectory,
    viewport: &Viewport,
    interval: Duration,
    format: OutputFormat,
) -> Result<usize> {
    let mut debouncer = QueryDebouncer::new(interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!(
        "{}",
        "Type a query and press Enter. \"/district NAME\" changes the district, Ctrl-D exits."
            .dimmed()
    );
    let mut shown = print_page(directory, viewport, 0, format)?;

    loop {
        let pending = debouncer.is_pending();
        let wake = debouncer.deadline().unwrap_or_else(Instant::now);

        tokio::select! {
            line = lines.next_line() => {
                let line = line.map_err(|e| Error::io("Failed to read query from stdin", e))?;
                match line {
                    Some(line) => {
                        if apply_input_line(directory, &mut debouncer, &line, Instant::now()) {
                            shown = print_page(directory, viewport, 0, format)?;
                        }
                    }
                    None => {
                        if let Some(query) = debouncer.flush() {
                            directory.set_query(query);
                            shown = print_page(directory, viewport, 0, format)?;
                        }
                        break;
                    }
                }
            }
            _ = tokio::time::sleep_until(tokio::time::Instant::from_std(wake)), if pending => {
                if let Some(query) = debouncer.poll(Instant::now()) {
                    debug!("Applying query '{}'", query);
                    directory.set_query(query);
                    shown = print_page(directory, viewport, 0, format)?;
                }
            }
        }
    }

    Ok(shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::candidate_directory::Category;
    use crate::app::services::candidate_directory::tests::create_test_directory;

    fn render(directory: &CandidateDirectory, viewport: &Viewport, page: usize) -> (usize, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let shown = render_page(&mut out, directory, viewport, page, OutputFormat::Human).unwrap();
        (shown, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_render_first_page() {
        let mut directory = create_test_directory();
        directory.set_query("ali");

        let (shown, output) = render(&directory, &Viewport::new(1, 20, 2), 0);
        assert_eq!(shown, 2);
        assert!(output.starts_with("Showing 1-2 of 2 matching candidates (3 loaded), page 1 of 1"));
        assert!(output.contains("Ahmed Ali"));
        assert!(output.contains("Ali Hassan"));
        assert!(!output.contains("Layla"));
    }

    #[test]
    fn test_render_second_page() {
        let directory = create_test_directory();

        let (shown, output) = render(&directory, &Viewport::new(1, 2, 0), 1);
        assert_eq!(shown, 1);
        assert!(output.starts_with("Showing 3-3 of 3"));
        assert!(output.contains("Ali Hassan"));
    }

    #[test]
    fn test_render_page_past_end() {
        let directory = create_test_directory();

        let (shown, output) = render(&directory, &Viewport::new(1, 2, 0), 5);
        assert_eq!(shown, 0);
        assert!(output.contains("Page 6 is past the last page"));
    }

    #[test]
    fn test_render_no_matches() {
        let mut directory = create_test_directory();
        directory.set_query("ali");
        directory.set_category("Basra");

        let (shown, output) = render(&directory, &Viewport::default(), 0);
        assert_eq!(shown, 0);
        assert_eq!(output, "No candidates match \"ali\" in district \"Basra\".\n");
    }

    #[test]
    fn test_render_no_matches_json() {
        let mut directory = create_test_directory();
        directory.set_query("zzz");

        let mut out = Vec::new();
        let shown = render_page(
            &mut out,
            &directory,
            &Viewport::default(),
            0,
            OutputFormat::Json,
        )
        .unwrap();
        assert_eq!(shown, 0);
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }

    #[test]
    fn test_page_viewport() {
        let view = ViewConfig::default();
        assert_eq!(page_viewport(&view, None), Viewport::from(&view));
        assert_eq!(page_viewport(&view, Some(5)).rows_per_page(), 5);
    }

    #[test]
    fn test_apply_input_line_queries_wait_for_debounce() {
        let mut directory = create_test_directory();
        let mut debouncer = QueryDebouncer::new(Duration::from_millis(300));
        let start = Instant::now();

        assert!(!apply_input_line(&mut directory, &mut debouncer, "al", start));
        assert!(!apply_input_line(&mut directory, &mut debouncer, "ali", start));
        assert_eq!(directory.query(), "");
        assert!(debouncer.is_pending());

        let query = debouncer.poll(start + Duration::from_millis(300)).unwrap();
        assert_eq!(query, "ali");
    }

    #[test]
    fn test_apply_input_line_district_command() {
        let mut directory = create_test_directory();
        let mut debouncer = QueryDebouncer::new(Duration::from_millis(300));
        let now = Instant::now();

        apply_input_line(&mut directory, &mut debouncer, "hassan", now);
        assert!(apply_input_line(&mut directory, &mut debouncer, "/district Basra", now));

        // A pending query is applied together with the filter change
        assert_eq!(directory.query(), "hassan");
        assert_eq!(directory.category(), &Category::Value("Basra".to_string()));
        assert!(!debouncer.is_pending());

        assert!(apply_input_line(&mut directory, &mut debouncer, "/district", now));
        assert_eq!(directory.category(), &Category::All);
    }
}

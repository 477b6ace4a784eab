use candidate_directory::Error;
use candidate_directory::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(Error::interrupted("Interrupted by user"))
            }
        }
    });

    match result {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            if error.is_retryable() {
                eprintln!("The candidates source could not be reached. Check your connection and run the command again.");
            } else if matches!(error, Error::SourceNotFound { .. }) {
                eprintln!("Check --source or source.location in your config and run the command again.");
            }
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Candidate Directory - Electoral Candidates Search");
    println!("=================================================");
    println!();
    println!("Load the published candidates list and search it by name,");
    println!("filter it by electoral district, or summarize what it contains.");
    println!();
    println!("USAGE:");
    println!("    candidate-directory <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    search       Search candidates by name and district");
    println!("    districts    List electoral districts with candidate counts");
    println!("    summary      Summarize the loaded candidates file");
    println!("    help         Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Search the local candidates.csv:");
    println!("    candidate-directory search --query ali");
    println!();
    println!("    # Restrict to one district and fetch the file over HTTP:");
    println!("    candidate-directory search --query ali --district Baghdad \\");
    println!("                               --source https://example.org/candidates.csv");
    println!();
    println!("    # Type queries interactively:");
    println!("    candidate-directory search --interactive");
    println!();
    println!("    # District counts as CSV:");
    println!("    candidate-directory districts --format csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    candidate-directory <COMMAND> --help");
}

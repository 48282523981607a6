use clap::Parser;
use consar_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(consar_processor::Error::cancelled(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CONSAR Processor - Regulatory Interchange File Parser");
    println!("=====================================================");
    println!();
    println!("Classify, parse and structurally validate the fixed-width text files");
    println!("exchanged between AFOREs and the pension regulator.");
    println!();
    println!("USAGE:");
    println!("    consar-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    detect      Classify a file from its name and first line");
    println!("    parse       Parse a file into typed records with diagnostics");
    println!("    validate    Run the structural checks over a parsed file");
    println!("    scan        Walk a directory and parse every recognized data file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Classify a file from its name and header:");
    println!("    consar-processor detect 20240115_CF_044_123456.0300");
    println!();
    println!("    # Parse a portfolio file and print the summary:");
    println!("    consar-processor parse 20240115_CF_044_123456.0300");
    println!();
    println!("    # Parse with an explicit kind and JSON output:");
    println!("    consar-processor parse positions.dat --kind portfolio --format json");
    println!();
    println!("    # Validate the structure of a withdrawal file:");
    println!("    consar-processor validate 20240115_RT_044_123456.0500");
    println!();
    println!("    # Scan a drop directory with 8 workers:");
    println!("    consar-processor scan /var/spool/consar --workers 8");
    println!();
    println!("For detailed help on any command, use:");
    println!("    consar-processor <COMMAND> --help");
}

//! Command-line argument definitions for the CONSAR processor
//!
//! The complete CLI interface using the clap derive API: one subcommand per
//! workflow (detect, parse, validate, scan) with shared conventions for
//! verbosity and output format.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

use crate::app::models::FileKind;
use crate::constants::DEFAULT_SCAN_WORKERS;
use crate::{Error, Result};

/// CLI arguments for the CONSAR file processor
///
/// Classifies, parses and structurally validates the fixed-width text files
/// exchanged under the CONSAR file-interchange specification.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "consar-processor",
    version,
    about = "Parse and validate CONSAR fixed-width interchange files",
    long_about = "Classifies, parses and structurally validates the fixed-width text files \
                  exchanged between AFOREs and the pension regulator: payroll, accounting, \
                  corrections, withdrawals, transfers, voluntary contributions, investment \
                  portfolios, derivatives positions and reconciliation totals."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Classify a file from its name and first line
    Detect(DetectArgs),
    /// Parse a file into typed records with per-line diagnostics
    Parse(ParseArgs),
    /// Parse a file and run the structural checks over the result
    Validate(ValidateArgs),
    /// Walk a directory and parse every recognized data file
    Scan(ScanArgs),
}

/// Arguments for the detect command
#[derive(Debug, Clone, Parser)]
pub struct DetectArgs {
    /// File to classify
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Classify from the filename only, without reading the first line
    #[arg(long = "name-only", help = "Skip content-based detection")]
    pub name_only: bool,

    /// Output format for the detection result
    #[arg(long = "format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// File to parse
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// File kind, bypassing detection
    ///
    /// One of: payroll, accounting, correction, withdrawal, transfer,
    /// contribution, portfolio, derivatives, reconciliation.
    /// If not specified, the kind is detected from the name and first line.
    #[arg(
        short = 'k',
        long = "kind",
        value_name = "KIND",
        help = "File kind, bypassing detection"
    )]
    pub kind: Option<KindName>,

    /// Layout version to decode against
    ///
    /// If not specified, uses the baseline layout for the kind.
    #[arg(long = "layout-version", value_name = "VERSION")]
    pub layout_version: Option<String>,

    /// Treat unparseable numeric fields as record-level failures
    ///
    /// By default a garbled amount decodes to zero with a field diagnostic.
    #[arg(long = "strict-numeric", help = "Mark records with garbled numerics invalid")]
    pub strict_numeric: bool,

    /// Maximum number of line errors to keep in the result
    #[arg(
        long = "max-errors",
        value_name = "COUNT",
        help = "Cap on recorded line errors; further errors are counted only"
    )]
    pub max_errors: Option<usize>,

    /// Print every decoded record, not just the summary
    #[arg(long = "records", help = "Print decoded records in addition to the summary")]
    pub show_records: bool,

    /// Output format for the parse result
    #[arg(long = "format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// File to validate
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// File kind, bypassing detection
    #[arg(short = 'k', long = "kind", value_name = "KIND")]
    pub kind: Option<KindName>,

    /// Treat header/footer count mismatches as errors instead of warnings
    #[arg(long = "strict-counts", help = "Elevate declared-count mismatches to errors")]
    pub strict_counts: bool,

    /// Output format for the structural report
    #[arg(long = "format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Arguments for the scan command
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Directory to walk
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Only scan files of this kind
    #[arg(short = 'k', long = "kind", value_name = "KIND")]
    pub kind: Option<KindName>,

    /// Number of files parsed concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = DEFAULT_SCAN_WORKERS,
        help = "Number of files parsed concurrently"
    )]
    pub workers: usize,

    /// Output format for the aggregate summary
    #[arg(long = "format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Text,
    /// JSON format for scripting
    Json,
}

/// Wrapper for parsing a file kind name from the command line
#[derive(Debug, Clone, Copy)]
pub struct KindName(pub FileKind);

impl FromStr for KindName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let kind = FileKind::all()
            .iter()
            .copied()
            .find(|kind| kind.to_string() == lowered);

        match kind {
            Some(kind) => Ok(KindName(kind)),
            None => Err(Error::configuration(format!(
                "Unknown file kind '{}'. Available kinds: {}",
                s,
                FileKind::all()
                    .iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

fn require_existing_file(path: &PathBuf) -> Result<()> {
    if !path.exists() {
        return Err(Error::configuration(format!(
            "Input file does not exist: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(Error::configuration(format!(
            "Input path is a directory, not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

impl DetectArgs {
    /// Validate the detect command arguments
    pub fn validate(&self) -> Result<()> {
        // Name-only detection never opens the file, so the path may be
        // hypothetical
        if !self.name_only {
            require_existing_file(&self.path)?;
        }
        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, false)
    }
}

impl ParseArgs {
    /// Validate the parse command arguments
    pub fn validate(&self) -> Result<()> {
        require_existing_file(&self.path)?;

        if let Some(max_errors) = self.max_errors {
            if max_errors == 0 {
                return Err(Error::configuration(
                    "Maximum recorded errors must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, self.quiet)
    }

    /// Whether to show a progress bar while parsing
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Text
    }
}

impl ValidateArgs {
    /// Validate the validate command arguments
    pub fn validate(&self) -> Result<()> {
        require_existing_file(&self.path)
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, false)
    }
}

impl ScanArgs {
    /// Validate the scan command arguments
    pub fn validate(&self) -> Result<()> {
        if !self.directory.exists() {
            return Err(Error::configuration(format!(
                "Scan directory does not exist: {}",
                self.directory.display()
            )));
        }
        if !self.directory.is_dir() {
            return Err(Error::configuration(format!(
                "Scan path is not a directory: {}",
                self.directory.display()
            )));
        }

        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }
        if self.workers > 64 {
            return Err(Error::configuration(
                "Number of workers cannot exceed 64".to_string(),
            ));
        }

        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose, self.quiet)
    }

    /// Whether to show a progress bar while scanning
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Text
    }
}

fn log_level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

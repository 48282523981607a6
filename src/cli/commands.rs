//! Command implementations for the CONSAR processor CLI
//!
//! Main command execution logic, progress reporting and report formatting
//! for the detect, parse, validate and scan workflows.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;
use encoding_rs::WINDOWS_1252;
use futures::stream::{self, StreamExt};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::app::models::{DetectionResult, FileKind, ParseResult, Severity, StructuralReport};
use crate::app::services::file_detector::FileTypeDetector;
use crate::app::services::stream_parser::{
    ParseProgress, ParseSummary, ProgressSink, StreamParser,
};
use crate::app::services::structural_validator::StructuralValidator;
use crate::app::services::validator_catalog::ValidatorCatalog;
use crate::cli::args::{
    Args, Commands, DetectArgs, KindName, OutputFormat, ParseArgs, ScanArgs, ValidateArgs,
};
use crate::config::ParserConfig;
use crate::{Error, Result};

/// Maximum line errors echoed to the terminal in text output
const MAX_PRINTED_ERRORS: usize = 20;

/// Main command dispatcher
pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    match args.get_command() {
        Commands::Detect(args) => {
            setup_logging(args.get_log_level())?;
            args.validate()?;
            run_detect(args)
        }
        Commands::Parse(args) => {
            setup_logging(args.get_log_level())?;
            args.validate()?;
            run_parse(args, cancel).await
        }
        Commands::Validate(args) => {
            setup_logging(args.get_log_level())?;
            args.validate()?;
            run_validate(args, cancel).await
        }
        Commands::Scan(args) => {
            setup_logging(args.get_log_level())?;
            args.validate()?;
            run_scan(args, cancel).await
        }
    }
}

/// Set up structured logging on stderr
fn setup_logging(log_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("consar_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

// =============================================================================
// detect
// =============================================================================

fn run_detect(args: DetectArgs) -> Result<()> {
    let detector = FileTypeDetector::new();
    let filename = args.path.to_string_lossy();

    let detection = if args.name_only {
        detector.detect_from_name(&filename)
    } else {
        let first_line = read_first_line(&args.path)?;
        detector.detect_combined(&filename, &first_line)
    };

    match args.output_format {
        OutputFormat::Text => print_detection(&args.path, &detection),
        OutputFormat::Json => print_json(&detection),
    }

    Ok(())
}

fn print_detection(path: &Path, detection: &DetectionResult) {
    println!("\n{}", path.display().to_string().bold());
    println!("  Kind:        {}", detection.kind.to_string().cyan());
    println!("  Confidence:  {}%", detection.confidence);
    println!("  Method:      {:?}", detection.method);
    println!("  Data file:   {}", yes_no(detection.is_data_file));

    let attrs = &detection.attributes;
    if let Some(layout) = &attrs.layout_code {
        println!("  Layout code: {}", layout);
    }
    if let Some(issuer) = &attrs.issuer_code {
        println!("  Issuer:      {}", issuer);
    }
    if let Some(fund) = &attrs.fund_code {
        println!("  Fund:        {}", fund);
    }
    if let Some(count) = attrs.expected_records {
        println!("  Records:     {} declared", count);
    }
    if let Some(date) = attrs.file_date {
        println!("  File date:   {}", date);
    }
    if let Some(category) = &attrs.category {
        println!("  Category:    {}", category);
    }

    for warning in &detection.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    println!();
}

// =============================================================================
// parse
// =============================================================================

async fn run_parse(args: ParseArgs, cancel: CancellationToken) -> Result<()> {
    let kind = resolve_kind(&args.path, args.kind)?;
    let config = parser_config_from(&args);

    let parser = StreamParser::with_version(kind, config, args.layout_version.as_deref())?;

    let bar = if args.show_progress() {
        Some(spinner("Parsing"))
    } else {
        None
    };
    let sink = bar.clone().map(BarSink);

    let result = parser
        .parse_file(
            &args.path,
            sink.as_ref().map(|s| s as &dyn ProgressSink),
            &cancel,
        )
        .await?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    match args.output_format {
        OutputFormat::Text => {
            print_parse_summary(&args.path, &result);
            if args.show_records {
                print_records(&result);
            }
        }
        OutputFormat::Json => print_json(&result),
    }

    Ok(())
}

fn parser_config_from(args: &ParseArgs) -> ParserConfig {
    let mut config = ParserConfig::default().with_strict_numeric(args.strict_numeric);
    if let Some(max_errors) = args.max_errors {
        config = config.with_max_recorded_errors(max_errors);
    }
    config
}

fn print_parse_summary(path: &Path, result: &ParseResult) {
    let summary = ParseSummary::from_result(result);
    let verdict = if result.is_success() {
        "parsed cleanly".green()
    } else {
        "parsed with errors".red()
    };

    println!("\n{} {}", path.display().to_string().bold(), verdict);
    println!(
        "  Lines:          {} ({} blank)",
        summary.total_lines, summary.blank_lines
    );
    println!("  Detail records: {}", summary.detail_records);
    if let Some(declared) = result.declared_record_count() {
        println!("  Declared:       {}", declared);
    }
    println!(
        "  Header: {}   Footer: {}",
        yes_no(summary.has_header),
        yes_no(summary.has_footer)
    );
    println!(
        "  Errors: {}   Warnings: {}",
        summary.errors, summary.warnings
    );
    println!("  Success rate:   {:.1}%", summary.success_rate());
    println!(
        "  Elapsed:        {}",
        HumanDuration(std::time::Duration::from_millis(summary.duration_ms as u64))
    );

    for error in result.errors.iter().take(MAX_PRINTED_ERRORS) {
        println!(
            "  {} line {}: {}",
            "error:".red(),
            error.line_number,
            error.message
        );
    }
    let unprinted = result.errors.len().saturating_sub(MAX_PRINTED_ERRORS) + result.errors_truncated;
    if unprinted > 0 {
        println!("  {} {} more errors not shown", "error:".red(), unprinted);
    }
    for warning in &result.warnings {
        println!("  {} {}", "warning:".yellow(), warning.message);
    }
    println!();
}

/// Print every decoded record as one JSON object per line
fn print_records(result: &ParseResult) {
    let records = result
        .header
        .iter()
        .chain(result.details.iter())
        .chain(result.controls.iter())
        .chain(result.subtotals.iter())
        .chain(result.footer.iter());

    for record in records {
        println!("{}", serde_json::to_string(record).unwrap_or_default());
    }
}

// =============================================================================
// validate
// =============================================================================

async fn run_validate(args: ValidateArgs, cancel: CancellationToken) -> Result<()> {
    let kind = resolve_kind(&args.path, args.kind)?;
    let config = ParserConfig {
        strict_record_count: args.strict_counts,
        ..Default::default()
    };

    let validator = StructuralValidator::new(kind, config)?;
    let report = validator.validate_file(&args.path, &cancel).await?;

    match args.output_format {
        OutputFormat::Text => print_structural_report(&args.path, &report),
        OutputFormat::Json => print_json(&report),
    }

    if report.is_structurally_valid() {
        Ok(())
    } else {
        Err(Error::file_format(
            args.path.display().to_string(),
            format!(
                "structural validation failed with {} findings",
                report.findings.len()
            ),
        ))
    }
}

fn print_structural_report(path: &Path, report: &StructuralReport) {
    let verdict = if report.is_structurally_valid() {
        "structurally valid".green()
    } else if report.has_critical() {
        "structurally broken".red().bold()
    } else {
        "structurally invalid".red()
    };

    println!(
        "\n{} ({}) {}",
        path.display().to_string().bold(),
        report.kind,
        verdict
    );
    println!("  Detail records: {}", report.parse.detail_count());

    for finding in &report.findings {
        let tag = match finding.severity {
            Severity::Critical => "CRITICAL".red().bold(),
            Severity::Error => "ERROR".red(),
            Severity::Warning => "WARNING".yellow(),
        };
        match finding.line_number {
            Some(line) => println!("  {} line {}: {}", tag, line, finding.message),
            None => println!("  {} {}", tag, finding.message),
        }
    }

    // A critical finding means semantic validation will not run at all
    if !report.has_critical() {
        let catalog = ValidatorCatalog::builtin();
        let rules = catalog.rules_for(report.kind);
        if !rules.is_empty() {
            println!("  Semantic rules to run next:");
            for rule in rules {
                println!("    {} ({})", rule.code, rule.display_name);
            }
        }
    }
    println!();
}

// =============================================================================
// scan
// =============================================================================

/// Outcome of parsing one file during a directory scan
#[derive(Debug, Serialize)]
struct ScanOutcome {
    path: PathBuf,
    kind: FileKind,
    ok: bool,
    detail_records: u64,
    errors: usize,
    warnings: usize,
}

/// Aggregate statistics for a directory scan
#[derive(Debug, Default, Serialize)]
struct ScanStats {
    files_found: usize,
    files_clean: usize,
    files_with_errors: usize,
    total_detail_records: u64,
    total_errors: usize,
    total_warnings: usize,
    elapsed_seconds: f64,
}

async fn run_scan(args: ScanArgs, cancel: CancellationToken) -> Result<()> {
    let start = Instant::now();
    let candidates = discover_files(&args)?;

    if candidates.is_empty() {
        warn!(
            "No recognized data files under {}",
            args.directory.display()
        );
    }
    info!(
        "Scanning {} files with {} workers",
        candidates.len(),
        args.workers
    );

    let bar = if args.show_progress() {
        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let config = ParserConfig::default();
    let outcomes: Vec<Result<ScanOutcome>> = stream::iter(candidates)
        .map(|(path, kind)| {
            let cancel = cancel.clone();
            let config = config.clone();
            let bar = bar.clone();
            async move {
                let outcome = parse_one(&path, kind, config, &cancel).await;
                if let Some(bar) = &bar {
                    bar.inc(1);
                    bar.set_message(path.display().to_string());
                }
                outcome
            }
        })
        .buffer_unordered(args.workers)
        .collect()
        .await;

    if let Some(bar) = bar {
        bar.finish_with_message("Scan complete");
    }

    let mut stats = ScanStats {
        files_found: outcomes.len(),
        ..Default::default()
    };
    let mut per_file = Vec::new();

    for outcome in outcomes {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            // A cancelled worker aborts the whole scan
            Err(error @ Error::Cancelled { .. }) => return Err(error),
            Err(error) => {
                warn!("Scan worker failed: {}", error);
                stats.files_with_errors += 1;
                continue;
            }
        };

        if outcome.ok {
            stats.files_clean += 1;
        } else {
            stats.files_with_errors += 1;
        }
        stats.total_detail_records += outcome.detail_records;
        stats.total_errors += outcome.errors;
        stats.total_warnings += outcome.warnings;
        per_file.push(outcome);
    }
    stats.elapsed_seconds = start.elapsed().as_secs_f64();

    match args.output_format {
        OutputFormat::Text => print_scan_summary(&args.directory, &stats, &per_file),
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "summary": stats,
                "files": per_file,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).unwrap_or_default()
            );
        }
    }

    Ok(())
}

/// Walk the scan directory and keep the recognizable data files
fn discover_files(args: &ScanArgs) -> Result<Vec<(PathBuf, FileKind)>> {
    let detector = FileTypeDetector::new();
    let mut candidates = Vec::new();

    for entry in WalkDir::new(&args.directory) {
        let entry = entry
            .map_err(|e| Error::directory_traversal("failed to walk scan directory", e))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let detection = detector.detect_from_name(&name);
        if !detection.is_data_file || detection.kind == FileKind::Unknown {
            debug!("Skipping {}: not a recognizable data file", name);
            continue;
        }
        if let Some(KindName(kind)) = args.kind {
            if detection.kind != kind {
                continue;
            }
        }

        candidates.push((entry.into_path(), detection.kind));
    }

    candidates.sort();
    Ok(candidates)
}

async fn parse_one(
    path: &Path,
    kind: FileKind,
    config: ParserConfig,
    cancel: &CancellationToken,
) -> Result<ScanOutcome> {
    let parser = StreamParser::new(kind, config)?;
    let result = parser.parse_file(path, None, cancel).await?;

    Ok(ScanOutcome {
        path: path.to_path_buf(),
        kind,
        ok: result.is_success(),
        detail_records: result.detail_count(),
        errors: result.errors.len() + result.errors_truncated,
        warnings: result.warnings.len(),
    })
}

fn print_scan_summary(directory: &Path, stats: &ScanStats, per_file: &[ScanOutcome]) {
    println!("\n{}", directory.display().to_string().bold());
    println!("  Files scanned:  {}", stats.files_found);
    println!("  Clean:          {}", stats.files_clean.to_string().green());
    if stats.files_with_errors > 0 {
        println!(
            "  With errors:    {}",
            stats.files_with_errors.to_string().red()
        );
    }
    println!("  Detail records: {}", stats.total_detail_records);
    println!(
        "  Errors: {}   Warnings: {}",
        stats.total_errors, stats.total_warnings
    );
    println!(
        "  Elapsed:        {}",
        HumanDuration(std::time::Duration::from_secs_f64(stats.elapsed_seconds))
    );

    for outcome in per_file.iter().filter(|o| !o.ok) {
        println!(
            "  {} {} ({}): {} errors",
            "error:".red(),
            outcome.path.display(),
            outcome.kind,
            outcome.errors
        );
    }
    println!();
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Determine the file kind from the flag or by combined detection
fn resolve_kind(path: &Path, flag: Option<KindName>) -> Result<FileKind> {
    if let Some(KindName(kind)) = flag {
        return Ok(kind);
    }

    let detector = FileTypeDetector::new();
    let first_line = read_first_line(path)?;
    let detection = detector.detect_combined(&path.to_string_lossy(), &first_line);

    if detection.kind == FileKind::Unknown {
        return Err(Error::file_format(
            path.display().to_string(),
            "unable to determine the file kind; pass --kind explicitly",
        ));
    }

    info!(
        "Detected {} file at {}% confidence",
        detection.kind, detection.confidence
    );
    for warning in &detection.warnings {
        warn!("{}", warning);
    }

    Ok(detection.kind)
}

/// Read and decode the first line of a file
fn read_first_line(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.display().to_string())
        } else {
            Error::io(format!("failed to open {}", path.display()), e)
        }
    })?;

    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader
        .read_until(b'\n', &mut buffer)
        .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;

    let (text, _, malformed) = WINDOWS_1252.decode(&buffer);
    if malformed {
        return Err(Error::encoding(
            path.display().to_string(),
            "first line is not single-byte text",
        ));
    }

    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

/// Progress sink that feeds an indicatif spinner
#[derive(Clone)]
struct BarSink(ProgressBar);

impl ProgressSink for BarSink {
    fn report(&self, progress: ParseProgress) {
        self.0.set_position(progress.lines_read);
        self.0.set_message(format!(
            "{} lines, {} records, {} errors",
            progress.lines_read, progress.details_parsed, progress.errors
        ));
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn yes_no(flag: bool) -> colored::ColoredString {
    if flag {
        "yes".green()
    } else {
        "no".yellow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_first_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "sample.0300", "00000002030004412345620240115001\n301...\n");

        let line = read_first_line(&path).unwrap();
        assert_eq!(line, "00000002030004412345620240115001");
    }

    #[test]
    fn test_read_first_line_missing_file() {
        let result = read_first_line(Path::new("/nonexistent/file.0300"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_resolve_kind_prefers_flag() {
        let kind = resolve_kind(
            Path::new("/nonexistent/whatever.bin"),
            Some(KindName(FileKind::Transfer)),
        )
        .unwrap();
        assert_eq!(kind, FileKind::Transfer);
    }

    #[test]
    fn test_resolve_kind_by_detection() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "20240115_CF_044_123456.0300",
            "00000002030004412345620240115001\n",
        );

        let kind = resolve_kind(&path, None).unwrap();
        assert_eq!(kind, FileKind::Portfolio);
    }

    #[test]
    fn test_resolve_kind_unknown_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "notes.txt.bin", "not a consar file\n");

        let result = resolve_kind(&path, None);
        assert!(matches!(result, Err(Error::FileFormat { .. })));
    }

    #[test]
    fn test_discover_files_filters_by_kind() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "20240115_CF_044_123456.0300", "ignored");
        write_file(&dir, "20240115_RT_044_123456.0500", "ignored");
        write_file(&dir, "readme.md5", "ignored");
        write_file(&dir, "archive.zip", "ignored");

        let args = ScanArgs {
            directory: dir.path().to_path_buf(),
            kind: None,
            workers: 2,
            output_format: OutputFormat::Text,
            verbose: 0,
            quiet: true,
        };
        let all = discover_files(&args).unwrap();
        assert_eq!(all.len(), 2);

        let mut filtered_args = args;
        filtered_args.kind = Some(KindName(FileKind::Withdrawal));
        let filtered = discover_files(&filtered_args).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].1, FileKind::Withdrawal);
    }

    #[tokio::test]
    async fn test_parse_one_counts_records() {
        let dir = TempDir::new().unwrap();
        let header = "00000001030004412345620240115001";
        let detail = format!(
            "301MX0MGO000078{:<40}{:<10}{:018}{:015}20240905MXN",
            "BONOS DE DESARROLLO", "M240905", 1_000_000_000_000u64, 100_000_000u64
        );
        let path = write_file(
            &dir,
            "20240115_CF_044_123456.0300",
            &format!("{}\n{}\n", header, detail),
        );

        let cancel = CancellationToken::new();
        let outcome = parse_one(&path, FileKind::Portfolio, ParserConfig::default(), &cancel)
            .await
            .unwrap();

        assert!(outcome.ok);
        assert_eq!(outcome.detail_records, 1);
        assert_eq!(outcome.errors, 0);
    }
}

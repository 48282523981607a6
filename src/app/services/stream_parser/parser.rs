//! Core stream parsing implementation

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;

use encoding_rs::WINDOWS_1252;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::models::{
    DecodedRecord, DiagnosticCode, ParseError, ParseResult, ParseWarning, RecordCategory,
};
use crate::app::services::layout_catalog::LayoutCatalog;
use crate::app::services::record_decoder::RecordDecoder;
use crate::app::models::FileKind;
use crate::config::ParserConfig;
use crate::{Error, Result};

/// Snapshot handed to a progress sink at the configured cadence
#[derive(Debug, Clone, Copy)]
pub struct ParseProgress {
    pub lines_read: u64,
    pub details_parsed: u64,
    pub errors: u64,
}

/// Caller-supplied progress receiver. Advisory only: parsing is correct
/// without one.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: ParseProgress);
}

/// Single-pass parser for one file kind.
///
/// One instance processes one stream start-to-finish with no internal
/// parallelism; independent instances may run concurrently since no mutable
/// state is shared between them.
#[derive(Debug)]
pub struct StreamParser {
    kind: FileKind,
    decoder: RecordDecoder,
    config: ParserConfig,
}

impl StreamParser {
    /// Create a parser for a file kind using the baseline layout
    pub fn new(kind: FileKind, config: ParserConfig) -> Result<Self> {
        Self::with_version(kind, config, None)
    }

    /// Create a parser pinned to a specific layout version
    pub fn with_version(
        kind: FileKind,
        config: ParserConfig,
        version: Option<&str>,
    ) -> Result<Self> {
        config.validate()?;
        let catalog = LayoutCatalog::new();
        let decoder = RecordDecoder::with_version(kind, &catalog, &config, version)?;

        Ok(Self {
            kind,
            decoder,
            config,
        })
    }

    /// The file kind this parser decodes
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Parse a file from disk.
    ///
    /// Convenience wrapper over [`StreamParser::parse_reader`].
    pub async fn parse_file(
        &self,
        path: &Path,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<ParseResult> {
        info!("Parsing {} file: {}", self.kind, path.display());

        let file = std::fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path.display().to_string())
            } else {
                Error::io(format!("failed to open {}", path.display()), e)
            }
        })?;

        self.parse_reader(file, progress, cancel)
    }

    /// Parse a byte stream to completion.
    ///
    /// Line-level problems are captured in the result; only unreadable
    /// streams and cancellation return `Err`.
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<ParseResult> {
        let started = Instant::now();
        let mut reader = BufReader::new(reader);

        let mut header: Option<DecodedRecord> = None;
        let mut footer: Option<DecodedRecord> = None;
        let mut details: Vec<DecodedRecord> = Vec::new();
        let mut subtotals: Vec<DecodedRecord> = Vec::new();
        let mut controls: Vec<DecodedRecord> = Vec::new();
        let mut errors: Vec<ParseError> = Vec::new();
        let mut warnings: Vec<ParseWarning> = Vec::new();
        let mut errors_truncated = 0usize;

        let mut line_number = 0u64;
        let mut blank_lines = 0u64;
        let mut buf = Vec::with_capacity(256);

        loop {
            // Cooperative cancellation, once per line boundary
            if cancel.is_cancelled() {
                return Err(Error::cancelled(format!(
                    "parse cancelled after {} lines",
                    line_number
                )));
            }

            buf.clear();
            let bytes_read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::io(format!("read failed at line {}", line_number + 1), e))?;
            if bytes_read == 0 {
                break;
            }

            line_number += 1;

            // The regulator's files are not UTF-8; decode each line from the
            // single-byte encoding
            let (decoded, _, malformed) = WINDOWS_1252.decode(&buf);
            if malformed {
                return Err(Error::encoding(
                    "<stream>",
                    format!("undecodable byte sequence at line {}", line_number),
                ));
            }
            let line = decoded.trim_end_matches(['\r', '\n']);

            // Blank lines count toward the line total but not the details
            if line.trim().is_empty() {
                blank_lines += 1;
                continue;
            }

            let record = self.decoder.decode_line(line, line_number);

            if let Some(code) = record.failure {
                if errors.len() < self.config.max_recorded_errors {
                    errors.push(ParseError {
                        line_number,
                        code,
                        message: record.diagnostics.join("; "),
                        raw_line: record.raw_line,
                    });
                } else {
                    errors_truncated += 1;
                }
            } else {
                match record.category {
                    RecordCategory::Header => {
                        if header.is_some() {
                            warnings.push(ParseWarning {
                                line_number: Some(line_number),
                                code: DiagnosticCode::DuplicateRecord,
                                message: format!(
                                    "duplicate header record on line {}; keeping the first",
                                    line_number
                                ),
                            });
                        } else {
                            header = Some(record);
                        }
                    }
                    // Footer families can carry several codes per file (a
                    // section subtotal below the control total); only a
                    // repeat of the same code is a duplicate. The control
                    // total is the highest-numbered code.
                    RecordCategory::Footer => match footer.take() {
                        None => footer = Some(record),
                        Some(existing) if existing.record_type == record.record_type => {
                            warnings.push(ParseWarning {
                                line_number: Some(line_number),
                                code: DiagnosticCode::DuplicateRecord,
                                message: format!(
                                    "repeated {} footer record on line {}; keeping the first",
                                    record.record_type, line_number
                                ),
                            });
                            footer = Some(existing);
                        }
                        Some(existing) if existing.record_type < record.record_type => {
                            subtotals.push(existing);
                            footer = Some(record);
                        }
                        Some(existing) => {
                            subtotals.push(record);
                            footer = Some(existing);
                        }
                    },
                    RecordCategory::Control => controls.push(record),
                    RecordCategory::Detail => details.push(record),
                }
            }

            if line_number % self.config.progress_interval == 0 {
                if let Some(sink) = progress {
                    sink.report(ParseProgress {
                        lines_read: line_number,
                        details_parsed: details.len() as u64,
                        errors: errors.len() as u64 + errors_truncated as u64,
                    });
                }
            }
        }

        // Lenient count check: historical files with off-by-one header counts
        // exist, so a mismatch warns instead of failing
        let declared = header
            .as_ref()
            .and_then(|h| h.integer("record_count"))
            .and_then(|n| u64::try_from(n).ok());
        if let Some(expected) = declared {
            let actual = details.len() as u64;
            if expected != actual {
                warn!(
                    "Header declares {} records but {} were parsed",
                    expected, actual
                );
                warnings.push(ParseWarning {
                    line_number: None,
                    code: DiagnosticCode::RecordCountMismatch,
                    message: format!(
                        "header declares {} detail records but {} were parsed",
                        expected, actual
                    ),
                });
            }
        }

        if let Some(sink) = progress {
            sink.report(ParseProgress {
                lines_read: line_number,
                details_parsed: details.len() as u64,
                errors: errors.len() as u64 + errors_truncated as u64,
            });
        }

        debug!(
            "Parsed {} lines: {} details, {} errors, {} warnings",
            line_number,
            details.len(),
            errors.len(),
            warnings.len()
        );

        Ok(ParseResult {
            kind: self.kind,
            header,
            footer,
            details,
            subtotals,
            controls,
            errors,
            warnings,
            total_lines: line_number,
            blank_lines,
            errors_truncated,
            duration: started.elapsed(),
        })
    }
}

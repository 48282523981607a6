//! Structural validation of parsed interchange files
//!
//! Cross-checks the decoded header and footer against what the stream parser
//! actually saw: header presence, footer presence for type-marker families,
//! declared-versus-parsed record counts, and the issuer/date attributes a
//! count header must carry. All parser-level decode errors are folded into
//! the same report.
//!
//! A critical finding short-circuits downstream semantic validation (the
//! caller's responsibility); the report itself is always fully populated up
//! to the first unrecoverable stream error.

#[cfg(test)]
pub mod tests;

use std::io::Read;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::app::models::{
    DiagnosticCode, FileKind, ParseResult, Severity, StructuralFinding, StructuralReport,
};
use crate::config::ParserConfig;
use crate::Result;

use super::stream_parser::StreamParser;

/// Post-parse structural validator for one file kind
#[derive(Debug)]
pub struct StructuralValidator {
    parser: StreamParser,
    strict_record_count: bool,
}

impl StructuralValidator {
    /// Create a validator for a file kind
    pub fn new(kind: FileKind, config: ParserConfig) -> Result<Self> {
        let strict_record_count = config.strict_record_count;
        Ok(Self {
            parser: StreamParser::new(kind, config)?,
            strict_record_count,
        })
    }

    /// Parse a stream and assess its structure
    pub fn validate_structure<R: Read>(
        &self,
        reader: R,
        cancel: &CancellationToken,
    ) -> Result<StructuralReport> {
        let parse = self.parser.parse_reader(reader, None, cancel)?;
        Ok(self.assess(parse))
    }

    /// Parse a file from disk and assess its structure
    pub async fn validate_file(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<StructuralReport> {
        let parse = self.parser.parse_file(path, None, cancel).await?;
        Ok(self.assess(parse))
    }

    /// Run the structural assertions over a completed parse
    pub fn assess(&self, parse: ParseResult) -> StructuralReport {
        let kind = parse.kind;
        let mut findings = Vec::new();

        if parse.header.is_none() {
            findings.push(StructuralFinding {
                severity: Severity::Critical,
                code: DiagnosticCode::MissingHeader,
                message: "no header record found".to_string(),
                line_number: None,
            });
        }

        if kind.uses_count_header() {
            self.assess_count_header(&parse, &mut findings);
        } else {
            self.assess_marker_footer(&parse, &mut findings);
        }

        // Fold line-level decode errors into the report
        for error in &parse.errors {
            findings.push(StructuralFinding {
                severity: Severity::Error,
                code: error.code,
                message: error.message.clone(),
                line_number: Some(error.line_number),
            });
        }

        for warning in &parse.warnings {
            let count_mismatch = warning.code == DiagnosticCode::RecordCountMismatch;
            let severity = if count_mismatch && self.strict_record_count {
                Severity::Error
            } else {
                Severity::Warning
            };
            findings.push(StructuralFinding {
                severity,
                code: warning.code,
                message: warning.message.clone(),
                line_number: warning.line_number,
            });
        }

        debug!(
            "Structural assessment of {} file: {} findings",
            kind,
            findings.len()
        );

        StructuralReport {
            kind,
            findings,
            parse,
        }
    }

    /// Count-header families: issuer code and generation date live in the
    /// header; there is no mandatory footer
    fn assess_count_header(&self, parse: &ParseResult, findings: &mut Vec<StructuralFinding>) {
        let Some(header) = parse.header.as_ref() else {
            return;
        };

        if header.text("issuer_code").is_none() {
            findings.push(StructuralFinding {
                severity: Severity::Error,
                code: DiagnosticCode::MissingIssuer,
                message: "header carries no issuer code".to_string(),
                line_number: Some(header.line_number),
            });
        }

        if header.date("generation_date").is_none() {
            findings.push(StructuralFinding {
                severity: Severity::Warning,
                code: DiagnosticCode::BadGenerationDate,
                message: "header generation date is missing or not a calendar date".to_string(),
                line_number: Some(header.line_number),
            });
        }
    }

    /// Type-marker families: the footer is mandatory and its declared count
    /// must match the parsed detail count
    fn assess_marker_footer(&self, parse: &ParseResult, findings: &mut Vec<StructuralFinding>) {
        let Some(footer) = parse.footer.as_ref() else {
            findings.push(StructuralFinding {
                severity: Severity::Critical,
                code: DiagnosticCode::MissingFooter,
                message: "no footer record found".to_string(),
                line_number: None,
            });
            return;
        };

        if let Some(declared) = footer.integer("record_count") {
            let actual = parse.detail_count();
            if declared >= 0 && declared as u64 != actual {
                // An error per the interchange rules, never critical:
                // semantic validation can still proceed
                findings.push(StructuralFinding {
                    severity: Severity::Error,
                    code: DiagnosticCode::RecordCountMismatch,
                    message: format!(
                        "footer declares {} detail records but {} were parsed",
                        declared, actual
                    ),
                    line_number: Some(footer.line_number),
                });
            }
        }
    }
}

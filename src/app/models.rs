//! Data models for CONSAR file processing
//!
//! This module contains the core data structures for representing classified
//! files, decoded fixed-width records and aggregated parse results, following
//! the CONSAR file-interchange specification.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::constants;

// =============================================================================
// File Classification
// =============================================================================

/// The supported regulatory file families.
///
/// Set once per parse run; the record-type prefix width and the header style
/// are both functions of the kind and never vary within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileKind {
    /// AFORE payroll movement files
    Payroll,
    /// Accounting ledger interface files
    Accounting,
    /// Movement correction files
    Correction,
    /// Pension withdrawal files
    Withdrawal,
    /// Account transfer (traspaso) files
    Transfer,
    /// Voluntary contribution files
    Contribution,
    /// SIEFORE investment portfolio position files
    Portfolio,
    /// Derivatives position files
    Derivatives,
    /// Account reconciliation total files
    Reconciliation,
    /// Unclassified input; callers must handle this explicitly
    Unknown,
}

impl FileKind {
    /// Width of the record-type code prefix for this file family.
    ///
    /// Count-header kinds ignore the prefix on line 1, which is always the
    /// header regardless of content.
    pub fn record_code_width(&self) -> usize {
        match self {
            FileKind::Portfolio => 3,
            FileKind::Derivatives => 4,
            FileKind::Reconciliation => 5,
            _ => 2,
        }
    }

    /// Whether this family uses a record-count header on line 1 instead of a
    /// "01" type marker
    pub fn uses_count_header(&self) -> bool {
        matches!(
            self,
            FileKind::Portfolio | FileKind::Derivatives | FileKind::Reconciliation
        )
    }

    /// Resolve a file kind from the 4-digit filename extension
    pub fn from_extension(extension: &str) -> Self {
        match constants::file_kind_name_for_extension(extension) {
            Some(name) => Self::from_name(name),
            None => FileKind::Unknown,
        }
    }

    /// Resolve a file kind from the 4-character layout code inside a count
    /// header. Layout codes reuse the extension numbering.
    pub fn from_layout_code(code: &str) -> Self {
        Self::from_extension(code)
    }

    fn from_name(name: &str) -> Self {
        match name {
            "payroll" => FileKind::Payroll,
            "accounting" => FileKind::Accounting,
            "correction" => FileKind::Correction,
            "withdrawal" => FileKind::Withdrawal,
            "transfer" => FileKind::Transfer,
            "contribution" => FileKind::Contribution,
            "portfolio" => FileKind::Portfolio,
            "derivatives" => FileKind::Derivatives,
            "reconciliation" => FileKind::Reconciliation,
            _ => FileKind::Unknown,
        }
    }

    /// All concrete (non-Unknown) file kinds
    pub fn all() -> &'static [FileKind] {
        &[
            FileKind::Payroll,
            FileKind::Accounting,
            FileKind::Correction,
            FileKind::Withdrawal,
            FileKind::Transfer,
            FileKind::Contribution,
            FileKind::Portfolio,
            FileKind::Derivatives,
            FileKind::Reconciliation,
        ]
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Payroll => "payroll",
            FileKind::Accounting => "accounting",
            FileKind::Correction => "correction",
            FileKind::Withdrawal => "withdrawal",
            FileKind::Transfer => "transfer",
            FileKind::Contribution => "contribution",
            FileKind::Portfolio => "portfolio",
            FileKind::Derivatives => "derivatives",
            FileKind::Reconciliation => "reconciliation",
            FileKind::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Structural role of a single line within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordCategory {
    Header,
    Detail,
    Footer,
    Control,
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordCategory::Header => "header",
            RecordCategory::Detail => "detail",
            RecordCategory::Footer => "footer",
            RecordCategory::Control => "control",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Field Schema Types
// =============================================================================

/// Semantic type of a fixed-width field, driving its conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Trimmed text, empty becomes null
    Text,
    /// Digits-only integer; garbage defaults to 0 with a diagnostic
    Integer,
    /// Digits-only integer divided by 10^scale, exact arithmetic
    Decimal { scale: u32 },
    /// Calendar date encoded YYYYMMDD; all-zero or invalid decodes to null
    DateYmd8,
    /// Calendar date encoded YYMMDD with a dual-century pivot
    DateYmd6,
    /// 12-character instrument identifier
    Isin,
    /// 20-character legal entity identifier
    Lei,
    /// 3-letter currency code
    Currency,
    /// Single-character boolean ("1"/"S" true, everything else false)
    Flag,
}

/// A decoded, typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Flag(bool),
}

impl FieldValue {
    /// Render the value for human-readable diagnostics and CLI output
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }
}

// =============================================================================
// Decoded Records
// =============================================================================

/// A single decoded line.
///
/// Created once per input line and never mutated after decoding completes.
/// The raw line is owned so diagnostics can always reproduce the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    /// 1-based line number within the stream
    pub line_number: u64,

    /// Record-type code sliced from the line prefix ("HDR" for the implicit
    /// header of count-header files)
    pub record_type: String,

    /// Structural role of the record
    pub category: RecordCategory,

    /// Human-readable label from the layout catalog
    pub label: String,

    /// The raw input line, untrimmed
    pub raw_line: String,

    /// Field name to decoded value; `None` marks an absent or undecodable field
    pub fields: BTreeMap<String, Option<FieldValue>>,

    /// False when decoding failed outright or strict mode flagged a field
    pub is_valid: bool,

    /// Set when the line could not be decoded at all; field-level problems
    /// leave this unset and accumulate in `diagnostics` instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<DiagnosticCode>,

    /// Per-field and per-line diagnostic messages
    pub diagnostics: Vec<String>,
}

impl DecodedRecord {
    /// Get a text field value
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get an integer field value
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.fields.get(name)? {
            Some(FieldValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get a decimal field value
    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        match self.fields.get(name)? {
            Some(FieldValue::Decimal(d)) => Some(*d),
            _ => None,
        }
    }

    /// Get a date field value
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.fields.get(name)? {
            Some(FieldValue::Date(d)) => Some(*d),
            _ => None,
        }
    }

    /// Get a derived boolean flag
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name)? {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }
}

// =============================================================================
// Detection Results
// =============================================================================

/// How a detection result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMethod {
    /// Canonical filename pattern
    FileName,
    /// Numeric extension only (pattern did not match)
    Extension,
    /// Archive/encrypted container suffix
    Container,
    /// Metadata sidecar, not a data file
    Sidecar,
    /// First-line header content
    HeaderContent,
    /// Name and content detection merged
    Combined,
}

/// Attributes extracted from a filename or header during detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderAttributes {
    /// 4-character layout code from a count header
    pub layout_code: Option<String>,
    /// 3-digit AFORE issuer key
    pub issuer_code: Option<String>,
    /// 6-digit SIEFORE fund code
    pub fund_code: Option<String>,
    /// Declared number of detail records
    pub expected_records: Option<u64>,
    /// File generation date
    pub file_date: Option<NaiveDate>,
    /// Display name of the 2-letter filename category
    pub category: Option<String>,
}

/// Outcome of a file-type detection call. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub kind: FileKind,
    /// 0-100; 0 always pairs with `FileKind::Unknown`
    pub confidence: u8,
    pub method: DetectionMethod,
    pub attributes: HeaderAttributes,
    pub warnings: Vec<String>,
    /// True for sidecar files that carry no records
    pub is_data_file: bool,
}

impl DetectionResult {
    /// An unclassifiable input with an explanatory warning
    pub fn unknown(method: DetectionMethod, warning: impl Into<String>) -> Self {
        Self {
            kind: FileKind::Unknown,
            confidence: 0,
            method,
            attributes: HeaderAttributes::default(),
            warnings: vec![warning.into()],
            is_data_file: true,
        }
    }
}

// =============================================================================
// Parse Errors and Warnings
// =============================================================================

/// Machine-readable codes for structural and line-level diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    LineTooShort,
    UnknownRecordType,
    FieldExtraction,
    MissingHeader,
    MissingFooter,
    DuplicateRecord,
    RecordCountMismatch,
    MissingIssuer,
    BadGenerationDate,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticCode::LineTooShort => "LineTooShort",
            DiagnosticCode::UnknownRecordType => "UnknownRecordType",
            DiagnosticCode::FieldExtraction => "FieldExtraction",
            DiagnosticCode::MissingHeader => "MissingHeader",
            DiagnosticCode::MissingFooter => "MissingFooter",
            DiagnosticCode::DuplicateRecord => "DuplicateRecord",
            DiagnosticCode::RecordCountMismatch => "RecordCountMismatch",
            DiagnosticCode::MissingIssuer => "MissingIssuer",
            DiagnosticCode::BadGenerationDate => "BadGenerationDate",
        };
        write!(f, "{}", name)
    }
}

/// A line-level decode failure, recorded without aborting the parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    pub line_number: u64,
    pub code: DiagnosticCode,
    pub message: String,
    /// Raw input preserved for diagnostics
    pub raw_line: String,
}

/// A non-fatal observation about the file as a whole or a single line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// None for file-level warnings
    pub line_number: Option<u64>,
    pub code: DiagnosticCode,
    pub message: String,
}

// =============================================================================
// Parse Result
// =============================================================================

/// Aggregated outcome of parsing one stream. Owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub kind: FileKind,
    pub header: Option<DecodedRecord>,
    pub footer: Option<DecodedRecord>,
    /// Detail records in stream order
    pub details: Vec<DecodedRecord>,
    /// Section subtotal footers ("398"-style codes); the control total
    /// stays in `footer`
    pub subtotals: Vec<DecodedRecord>,
    /// Control records ("04" markers), outside the detail count
    pub controls: Vec<DecodedRecord>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
    /// Total lines read, including blank and failed lines
    pub total_lines: u64,
    /// Whitespace-only lines skipped without decoding
    pub blank_lines: u64,
    /// Per-line errors beyond the recorded cap
    pub errors_truncated: usize,
    pub duration: Duration,
}

impl ParseResult {
    /// Number of parsed detail records
    pub fn detail_count(&self) -> u64 {
        self.details.len() as u64
    }

    /// Record count declared by the header, if the header carried one
    pub fn declared_record_count(&self) -> Option<u64> {
        self.header
            .as_ref()
            .and_then(|h| h.integer("record_count"))
            .and_then(|n| u64::try_from(n).ok())
    }

    /// True when every line decoded without a line-level failure; warnings
    /// do not count against success
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.errors_truncated == 0
    }
}

// =============================================================================
// Structural Report
// =============================================================================

/// Severity of a structural finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
    /// Short-circuits downstream semantic validation
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

/// One structural anomaly found by the structural validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralFinding {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub line_number: Option<u64>,
}

/// Full structural assessment of a parsed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralReport {
    pub kind: FileKind,
    pub findings: Vec<StructuralFinding>,
    /// The underlying parse, always fully populated
    pub parse: ParseResult,
}

impl StructuralReport {
    /// True when any finding is critical
    pub fn has_critical(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Critical)
    }

    /// True when no finding is an error or worse
    pub fn is_structurally_valid(&self) -> bool {
        self.findings.iter().all(|f| f.severity == Severity::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_code_widths() {
        assert_eq!(FileKind::Payroll.record_code_width(), 2);
        assert_eq!(FileKind::Portfolio.record_code_width(), 3);
        assert_eq!(FileKind::Derivatives.record_code_width(), 4);
        assert_eq!(FileKind::Reconciliation.record_code_width(), 5);
    }

    #[test]
    fn test_count_header_kinds() {
        assert!(FileKind::Portfolio.uses_count_header());
        assert!(FileKind::Derivatives.uses_count_header());
        assert!(FileKind::Reconciliation.uses_count_header());
        assert!(!FileKind::Withdrawal.uses_count_header());
        assert!(!FileKind::Payroll.uses_count_header());
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(FileKind::from_extension("0300"), FileKind::Portfolio);
        assert_eq!(FileKind::from_extension("0314"), FileKind::Derivatives);
        assert_eq!(FileKind::from_extension("0500"), FileKind::Withdrawal);
        assert_eq!(FileKind::from_extension("0000"), FileKind::Unknown);
    }

    #[test]
    fn test_unknown_detection_result() {
        let result = DetectionResult::unknown(DetectionMethod::FileName, "no match");
        assert_eq!(result.kind, FileKind::Unknown);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.warnings.len(), 1);
    }

    fn empty_parse(kind: FileKind) -> ParseResult {
        ParseResult {
            kind,
            header: None,
            footer: None,
            details: Vec::new(),
            subtotals: Vec::new(),
            controls: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            total_lines: 0,
            blank_lines: 0,
            errors_truncated: 0,
            duration: Duration::default(),
        }
    }

    #[test]
    fn test_success_tracks_line_errors_not_warnings() {
        let mut result = empty_parse(FileKind::Portfolio);
        assert!(result.is_success());

        result.warnings.push(ParseWarning {
            line_number: None,
            code: DiagnosticCode::RecordCountMismatch,
            message: "header declares 3 detail records but 2 were parsed".to_string(),
        });
        assert!(result.is_success());

        result.errors.push(ParseError {
            line_number: 4,
            code: DiagnosticCode::LineTooShort,
            message: "line shorter than the 301 layout minimum".to_string(),
            raw_line: "301SHORT".to_string(),
        });
        assert!(!result.is_success());

        result.errors.clear();
        result.errors_truncated = 5;
        assert!(!result.is_success());
    }

    #[test]
    fn test_structural_report_severity_helpers() {
        let parse = empty_parse(FileKind::Withdrawal);

        let mut report = StructuralReport {
            kind: FileKind::Withdrawal,
            findings: vec![StructuralFinding {
                severity: Severity::Warning,
                code: DiagnosticCode::RecordCountMismatch,
                message: "declared 3, parsed 2".to_string(),
                line_number: None,
            }],
            parse,
        };

        assert!(report.is_structurally_valid());
        assert!(!report.has_critical());

        report.findings.push(StructuralFinding {
            severity: Severity::Critical,
            code: DiagnosticCode::MissingHeader,
            message: "no header record found".to_string(),
            line_number: None,
        });

        assert!(!report.is_structurally_valid());
        assert!(report.has_critical());
    }
}

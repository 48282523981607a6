//! Integration tests for the streaming parser and structural validator
//!
//! These tests write complete interchange files to disk with tempfile and
//! exercise the full path from file open through decoding to the structural
//! report, the way the CLI drives it.

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use consar_processor::app::models::{DiagnosticCode, FieldValue, Severity};
use consar_processor::app::services::structural_validator::StructuralValidator;
use consar_processor::{Error, FileKind, FileTypeDetector, ParserConfig, StreamParser};

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

/// A 3-line portfolio file: count header and two government bond positions
fn portfolio_content(declared_count: u64) -> String {
    let header = format!("{:08}030004412345620240115001", declared_count);
    let detail = format!(
        "301MX0MGO000078{:<40}{:<10}{:018}{:015}20240905MXN",
        "BONOS DE DESARROLLO GOB FEDERAL", "M240905", 1_234_500_000_000u64, 123_456_789u64
    );
    format!("{}\n{}\n{}\n", header, detail, detail)
}

/// A 4-line withdrawal file: 01 header, two 02 details, 03 footer
fn withdrawal_content() -> String {
    let header = format!("010500{}{}{}{:08}", "044", "123456", "20240115", 2u64);
    let detail = format!(
        "0212345678901GODE561231HDFABC09GODE561231AB10120240110{:018}{:018}240215",
        12_345_678u64, 1_000_000u64
    );
    let footer = format!("03{:08}{:018}", 2, 24_691_356u64);
    format!("{}\n{}\n{}\n{}\n", header, detail, detail, footer)
}

#[tokio::test]
async fn test_parse_portfolio_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "20240115_CF_044_123456.0300",
        portfolio_content(2).as_bytes(),
    );

    let parser = StreamParser::new(FileKind::Portfolio, ParserConfig::default()).unwrap();
    let cancel = CancellationToken::new();
    let result = parser.parse_file(&path, None, &cancel).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.total_lines, 3);
    assert_eq!(result.detail_count(), 2);

    let header = result.header.as_ref().unwrap();
    assert_eq!(header.integer("record_count"), Some(2));
    assert_eq!(header.text("issuer_code"), Some("044"));

    let detail = &result.details[0];
    assert_eq!(detail.text("isin"), Some("MX0MGO000078"));
    assert_eq!(detail.text("currency"), Some("MXN"));
    assert_eq!(detail.flag("is_government_instrument"), Some(true));
    let nominal = detail.decimal("nominal_amount").unwrap();
    assert_eq!(nominal.to_string(), "12345.00000000");
}

#[tokio::test]
async fn test_detect_then_parse_matches_explicit_kind() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "20240115_RT_044_123456.0500",
        withdrawal_content().as_bytes(),
    );

    let detector = FileTypeDetector::new();
    let detection = detector.detect_from_name(&path.file_name().unwrap().to_string_lossy());
    assert_eq!(detection.kind, FileKind::Withdrawal);

    let parser = StreamParser::new(detection.kind, ParserConfig::default()).unwrap();
    let cancel = CancellationToken::new();
    let result = parser.parse_file(&path, None, &cancel).await.unwrap();

    assert!(result.header.is_some());
    assert!(result.footer.is_some());
    assert_eq!(result.detail_count(), 2);
    assert_eq!(
        result.details[0].text("nss"),
        Some("12345678901")
    );
}

#[tokio::test]
async fn test_validate_file_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "20240115_CF_044_123456.0300",
        portfolio_content(2).as_bytes(),
    );

    let validator =
        StructuralValidator::new(FileKind::Portfolio, ParserConfig::default()).unwrap();
    let cancel = CancellationToken::new();
    let report = validator.validate_file(&path, &cancel).await.unwrap();

    assert!(report.is_structurally_valid());
    assert_eq!(report.parse.detail_count(), 2);
}

#[tokio::test]
async fn test_validate_reports_declared_count_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "20240115_CF_044_123456.0300",
        portfolio_content(7).as_bytes(),
    );

    let validator =
        StructuralValidator::new(FileKind::Portfolio, ParserConfig::default()).unwrap();
    let cancel = CancellationToken::new();
    let report = validator.validate_file(&path, &cancel).await.unwrap();

    // A header-count mismatch is a warning unless strict counts are on
    assert!(report.is_structurally_valid());
    assert!(report
        .findings
        .iter()
        .any(|f| f.code == DiagnosticCode::RecordCountMismatch
            && f.severity == Severity::Warning));
}

#[tokio::test]
async fn test_latin1_file_decodes_without_loss() {
    let dir = TempDir::new().unwrap();

    // Instrument name containing Latin-1 0xD1 (Ñ), as production files carry
    let mut content = portfolio_content(2).into_bytes();
    let pos = content.iter().position(|&b| b == b'B').unwrap();
    content[pos..pos + 7].copy_from_slice(b"PE\xD1OLES");
    let path = write_file(&dir, "20240115_CF_044_123456.0300", &content);

    let parser = StreamParser::new(FileKind::Portfolio, ParserConfig::default()).unwrap();
    let cancel = CancellationToken::new();
    let result = parser.parse_file(&path, None, &cancel).await.unwrap();

    let name = result.details[0].text("instrument_name").unwrap();
    assert!(name.starts_with("PEÑOLES"), "got '{}'", name);
}

#[tokio::test]
async fn test_missing_file_is_a_clean_error() {
    let parser = StreamParser::new(FileKind::Portfolio, ParserConfig::default()).unwrap();
    let cancel = CancellationToken::new();
    let result = parser
        .parse_file(std::path::Path::new("/nonexistent/file.0300"), None, &cancel)
        .await;

    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}

#[tokio::test]
async fn test_garbled_amount_defaults_to_zero_with_diagnostic() {
    let dir = TempDir::new().unwrap();

    // Corrupt the nominal amount of the first detail with letters
    let mut content = portfolio_content(2);
    let detail_start = content.find("\n301").unwrap() + 1;
    let nominal_start = detail_start + 65;
    content.replace_range(nominal_start..nominal_start + 6, "XXXXXX");
    let path = write_file(&dir, "20240115_CF_044_123456.0300", content.as_bytes());

    let parser = StreamParser::new(FileKind::Portfolio, ParserConfig::default()).unwrap();
    let cancel = CancellationToken::new();
    let result = parser.parse_file(&path, None, &cancel).await.unwrap();

    // The record still parses; the garbled field decodes to zero and the
    // diagnostic says which field was coerced
    assert_eq!(result.detail_count(), 2);
    let detail = &result.details[0];
    assert!(detail.is_valid);
    match detail.fields.get("nominal_amount") {
        Some(Some(FieldValue::Decimal(value))) => assert!(value.is_zero()),
        other => panic!("unexpected nominal_amount: {:?}", other),
    }
    assert!(detail
        .diagnostics
        .iter()
        .any(|d| d.contains("nominal_amount")));
}

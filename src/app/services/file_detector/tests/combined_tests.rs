//! Tests for merged name-plus-content detection

use super::{derivatives_header, portfolio_header};
use crate::app::models::{DetectionMethod, FileKind};
use crate::app::services::file_detector::FileTypeDetector;

/// A content header that scores below a canonical filename: non-numeric
/// record count and no recoverable issuer key, leaving only the plausible
/// start, layout code, and generation date signals
fn weak_portfolio_header() -> String {
    let mut line = String::new();
    line.push_str("0A000002");
    line.push_str("0300");
    line.push_str("999");
    line.push_str("XXXXXX");
    line.push_str("20240115");
    line.push_str("XYZ");
    line
}

#[test]
fn test_agreement_boosts_confidence() {
    let detector = FileTypeDetector::new();
    let result =
        detector.detect_combined("20240115_CF_044_123456.0300", &portfolio_header());

    assert_eq!(result.kind, FileKind::Portfolio);
    assert_eq!(result.method, DetectionMethod::Combined);
    // Both signals max out; the boost cannot push past the cap
    assert_eq!(result.confidence, 100);
}

#[test]
fn test_agreement_merges_attributes_from_both_signals() {
    let detector = FileTypeDetector::new();
    let result =
        detector.detect_combined("20240115_CF_044_123456.0300", &portfolio_header());

    // Record count only the content knows; category only the name knows
    assert_eq!(result.attributes.expected_records, Some(2));
    assert_eq!(result.attributes.category.as_deref(), Some("Confronta"));
    assert_eq!(result.attributes.issuer_code.as_deref(), Some("044"));
    assert_eq!(result.attributes.fund_code.as_deref(), Some("123456"));
}

#[test]
fn test_disagreement_warns_and_higher_confidence_wins() {
    let detector = FileTypeDetector::new();
    // Name says derivatives at 95, content says portfolio at 100
    let result =
        detector.detect_combined("20240115_CF_044_123456.0314", &portfolio_header());

    assert_eq!(result.kind, FileKind::Portfolio);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("derivatives") && w.contains("portfolio")));
}

#[test]
fn test_disagreement_tie_prefers_name() {
    let detector = FileTypeDetector::new();
    // Extension-only name detection and the weak content header both land
    // at the same confidence; the name-based kind wins the tie
    let result = detector.detect_combined("quarterly_dump.0314", &weak_portfolio_header());

    assert_eq!(result.kind, FileKind::Derivatives);
    assert!(result.warnings.iter().any(|w| w.contains("portfolio")));
}

#[test]
fn test_unknown_name_falls_back_to_content() {
    let detector = FileTypeDetector::new();
    let result = detector.detect_combined("notes.bin", &derivatives_header());

    assert_eq!(result.kind, FileKind::Derivatives);
    assert_eq!(result.method, DetectionMethod::Combined);
    assert_eq!(result.attributes.expected_records, Some(5));
}

#[test]
fn test_unknown_content_falls_back_to_name() {
    let detector = FileTypeDetector::new();
    let result = detector.detect_combined("20240115_PS_044_123456.0100", "short");

    assert_eq!(result.kind, FileKind::Payroll);
    assert_eq!(result.method, DetectionMethod::Combined);
    assert_eq!(result.attributes.issuer_code.as_deref(), Some("044"));
}

#[test]
fn test_both_unknown_merges_warnings() {
    let detector = FileTypeDetector::new();
    let result = detector.detect_combined("notes.bin", "not a header");

    assert_eq!(result.kind, FileKind::Unknown);
    assert_eq!(result.confidence, 0);
    assert_eq!(result.method, DetectionMethod::Combined);
    assert!(result.warnings.len() >= 2);
}

#[test]
fn test_container_short_circuits_content() {
    let detector = FileTypeDetector::new();
    // The first line of an archive is meaningless; the suffix decides
    let result = detector.detect_combined("batch_20240115.zip", &portfolio_header());

    assert_eq!(result.method, DetectionMethod::Container);
    assert!(!result.is_data_file);
}

#[test]
fn test_sidecar_short_circuits_content() {
    let detector = FileTypeDetector::new();
    let result = detector.detect_combined("20240115_PS_044_123456.0100.md5", &portfolio_header());

    assert_eq!(result.method, DetectionMethod::Sidecar);
    assert!(!result.is_data_file);
}

//! Tests for schema-driven record decoding

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::*;
use crate::app::models::{FileKind, RecordCategory};
use crate::app::services::layout_catalog::LayoutCatalog;
use crate::app::services::record_decoder::{RecordDecoder, COUNT_HEADER_CODE};

#[test]
fn test_portfolio_government_detail_decodes_fully() {
    let decoder = decoder_for(FileKind::Portfolio);
    let record = decoder.decode_line(&portfolio_government_line(), 2);

    assert!(record.is_valid, "diagnostics: {:?}", record.diagnostics);
    assert_eq!(record.record_type, "301");
    assert_eq!(record.category, RecordCategory::Detail);
    assert_eq!(record.text("isin"), Some("MX0MGO000078"));
    assert_eq!(
        record.text("instrument_name"),
        Some("BONOS DE DESARROLLO GOB FEDERAL")
    );
    assert_eq!(
        record.decimal("nominal_amount"),
        Some(Decimal::from_i128_with_scale(1_234_500_000_000, 8))
    );
    assert_eq!(
        record.decimal("market_value"),
        Some(Decimal::new(123_456_789, 2))
    );
    assert_eq!(
        record.date("maturity_date"),
        NaiveDate::from_ymd_opt(2024, 9, 5)
    );
    assert_eq!(record.text("currency"), Some("MXN"));
    assert_eq!(record.flag("is_government_instrument"), Some(true));
}

#[test]
fn test_count_header_line_one_uses_header_schema() {
    let decoder = decoder_for(FileKind::Portfolio);
    // Line 1 content is a count header, not a 3-digit code
    let record = decoder.decode_line("00000002030004412345620240115001", 1);

    assert_eq!(record.record_type, COUNT_HEADER_CODE);
    assert_eq!(record.category, RecordCategory::Header);
    assert_eq!(record.integer("record_count"), Some(2));
    assert_eq!(record.text("layout_code"), Some("0300"));
    assert_eq!(record.text("issuer_code"), Some("044"));
}

#[test]
fn test_line_too_short_yields_single_diagnostic_and_no_fields() {
    let decoder = decoder_for(FileKind::Portfolio);
    let record = decoder.decode_line("301MX0MGO000078", 3);

    assert!(!record.is_valid);
    assert_eq!(record.diagnostics.len(), 1);
    assert!(record.diagnostics[0].contains("at least 109"));
    assert!(record.fields.is_empty());
}

#[test]
fn test_unknown_record_type() {
    let decoder = decoder_for(FileKind::Portfolio);
    let record = decoder.decode_line(&format!("777{}", " ".repeat(200)), 4);

    assert!(!record.is_valid);
    assert_eq!(record.record_type, "777");
    assert!(record.diagnostics[0].contains("not defined"));
    // Unrecognized codes still classify as detail
    assert_eq!(record.category, RecordCategory::Detail);
}

#[test]
fn test_bad_field_degrades_without_losing_the_rest() {
    let decoder = decoder_for(FileKind::Portfolio);
    let mut line = portfolio_government_line();
    // Corrupt the nominal amount with letters
    line.replace_range(65..83, "0000000000ABCDEF00");

    let record = decoder.decode_line(&line, 2);

    // Lenient default keeps the record valid but records the diagnostic
    assert!(record.is_valid);
    assert_eq!(
        record.decimal("nominal_amount"),
        Some(Decimal::new(0, 8))
    );
    assert_eq!(record.diagnostics.len(), 1);
    // Every other field still decoded
    assert_eq!(record.text("isin"), Some("MX0MGO000078"));
    assert_eq!(
        record.decimal("market_value"),
        Some(Decimal::new(123_456_789, 2))
    );
}

#[test]
fn test_strict_numeric_marks_record_invalid() {
    let catalog = LayoutCatalog::new();
    let config = crate::config::ParserConfig::default().with_strict_numeric(true);
    let decoder = RecordDecoder::new(FileKind::Portfolio, &catalog, &config).unwrap();

    let mut line = portfolio_government_line();
    line.replace_range(65..83, "0000000000ABCDEF00");

    let record = decoder.decode_line(&line, 2);
    assert!(!record.is_valid);
}

#[test]
fn test_optional_trailing_fields_absent_without_error() {
    let decoder = decoder_for(FileKind::Withdrawal);
    // Truncate before the optional payment date
    let line = &withdrawal_detail_line()[..90];
    let record = decoder.decode_line(line, 2);

    assert!(record.is_valid, "diagnostics: {:?}", record.diagnostics);
    assert_eq!(record.fields.get("payment_date"), Some(&None));
    assert_eq!(record.decimal("amount"), Some(Decimal::new(12_345_678, 2)));
}

#[test]
fn test_withdrawal_detail_with_dual_century_payment_date() {
    let decoder = decoder_for(FileKind::Withdrawal);
    let record = decoder.decode_line(&withdrawal_detail_line(), 2);

    assert!(record.is_valid);
    assert_eq!(record.text("nss"), Some("12345678901"));
    assert_eq!(record.text("curp"), Some("GODE561231HDFABC09"));
    assert_eq!(record.text("disposition_type"), Some("01"));
    assert_eq!(
        record.date("payment_date"),
        NaiveDate::from_ymd_opt(2024, 2, 15)
    );
}

#[test]
fn test_marker_header_and_footer_classification() {
    let decoder = decoder_for(FileKind::Withdrawal);

    let header = decoder.decode_line(&marker_header_line("0500", "044", 3), 1);
    assert_eq!(header.category, RecordCategory::Header);
    assert_eq!(header.text("issuer_code"), Some("044"));
    assert_eq!(
        header.date("generation_date"),
        NaiveDate::from_ymd_opt(2024, 1, 15)
    );

    let footer = decoder.decode_line(&marker_footer_line(3, 0), 5);
    assert_eq!(footer.category, RecordCategory::Footer);
    assert_eq!(footer.integer("record_count"), Some(3));

    // "99" is an alternate footer marker
    let alt = decoder.decode_line(&format!("99{}", &marker_footer_line(3, 0)[2..]), 6);
    assert_eq!(alt.category, RecordCategory::Footer);
}

#[test]
fn test_cross_currency_swap_flag() {
    let decoder = decoder_for(FileKind::Derivatives);

    let cross = decoder.decode_line(&derivatives_swap_line("MXN", "USD"), 2);
    assert!(cross.is_valid, "diagnostics: {:?}", cross.diagnostics);
    assert_eq!(cross.flag("is_cross_currency"), Some(true));
    assert_eq!(cross.text("lei"), Some("5493001RKR55V4X61F71"));

    let single = decoder.decode_line(&derivatives_swap_line("MXN", "MXN"), 3);
    assert_eq!(single.flag("is_cross_currency"), Some(false));
}

#[test]
fn test_etf_flag_from_name_containment() {
    let decoder = decoder_for(FileKind::Portfolio);

    let mut line = String::new();
    line.push_str("304");
    line.push_str("US4642872000"); // isin
    line.push_str(&padded("ISHARES SP500 ETF TRAC", 40));
    line.push_str(&zeroed(1_000_000_000, 18)); // shares
    line.push_str(&zeroed(55_000_000, 15)); // market value
    line.push_str("USD");

    let record = decoder.decode_line(&line, 2);
    assert!(record.is_valid, "diagnostics: {:?}", record.diagnostics);
    assert_eq!(record.flag("is_etf"), Some(true));
}

#[test]
fn test_decoding_is_deterministic() {
    let decoder = decoder_for(FileKind::Portfolio);
    let line = portfolio_government_line();

    let first = decoder.decode_line(&line, 2);
    let second = decoder.decode_line(&line, 2);
    assert_eq!(first, second);
}

#[test]
fn test_reconciliation_five_digit_prefix() {
    let decoder = decoder_for(FileKind::Reconciliation);

    let mut line = String::new();
    line.push_str("11011");
    line.push_str("12345678901"); // account
    line.push_str("RCV1"); // subaccount
    line.push_str(&zeroed(99_999_99, 18)); // balance: 99999.99
    line.push_str("20240131");
    line.push_str("MXN");

    let record = decoder.decode_line(&line, 2);
    assert!(record.is_valid, "diagnostics: {:?}", record.diagnostics);
    assert_eq!(record.record_type, "11011");
    assert_eq!(record.decimal("balance"), Some(Decimal::new(9_999_999, 2)));
}

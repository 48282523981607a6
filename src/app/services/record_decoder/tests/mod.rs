//! Test utilities and fixture lines for record decoding
//!
//! Builders for well-formed fixed-width lines of the formats exercised in
//! the decoder tests.

mod decoder_tests;

use crate::app::services::layout_catalog::LayoutCatalog;
use crate::app::services::record_decoder::RecordDecoder;
use crate::app::models::FileKind;
use crate::config::ParserConfig;

/// Build a decoder for a kind with default config
pub fn decoder_for(kind: FileKind) -> RecordDecoder {
    let catalog = LayoutCatalog::new();
    RecordDecoder::new(kind, &catalog, &ParserConfig::default()).unwrap()
}

/// Right-pad a value to a fixed width with spaces
pub fn padded(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}

/// Left-pad a number to a fixed width with zeros
pub fn zeroed(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// A valid portfolio government-instrument detail line (type 301), padded to
/// 200 characters the way production files arrive
pub fn portfolio_government_line() -> String {
    let mut line = String::new();
    line.push_str("301");
    line.push_str("MX0MGO000078"); // isin
    line.push_str(&padded("BONOS DE DESARROLLO GOB FEDERAL", 40)); // instrument_name
    line.push_str(&padded("M240905", 10)); // series
    line.push_str(&zeroed(1_234_500_000_000, 18)); // nominal: 12345.00000000
    line.push_str(&zeroed(123_456_789, 15)); // market value: 1234567.89
    line.push_str("20240905"); // maturity
    line.push_str("MXN");
    padded(&line, 200)
}

/// A valid portfolio section-subtotal footer (type 398)
pub fn portfolio_subtotal_line(section: &str, record_count: u64) -> String {
    let mut line = String::new();
    line.push_str("398");
    line.push_str(section);
    line.push_str(&zeroed(record_count, 8));
    line.push_str(&zeroed(123_456_789, 18)); // 1234567.89
    line
}

/// A valid portfolio control-total footer (type 399)
pub fn portfolio_control_line(record_count: u64) -> String {
    let mut line = String::new();
    line.push_str("399");
    line.push_str(&zeroed(record_count, 8));
    line.push_str(&zeroed(246_913_578, 18)); // 2469135.78
    line
}

/// A valid derivatives swap detail line (type 2001)
pub fn derivatives_swap_line(pay: &str, receive: &str) -> String {
    let mut line = String::new();
    line.push_str("2001");
    line.push_str("5493001RKR55V4X61F71"); // lei
    line.push_str(&padded("BANCO GLOBAL SA", 40)); // counterparty
    line.push_str(pay);
    line.push_str(receive);
    line.push_str(&zeroed(50_000_000_00, 18)); // notional: 50000000.00
    line.push_str("20240131"); // fixing
    line.push_str("20290131"); // maturity
    line
}

/// A valid withdrawal detail line (type 02) with the optional YYMMDD
/// payment date present
pub fn withdrawal_detail_line() -> String {
    let mut line = String::new();
    line.push_str("02");
    line.push_str("12345678901"); // nss
    line.push_str("GODE561231HDFABC09"); // curp
    line.push_str("GODE561231AB1"); // rfc
    line.push_str("01"); // disposition type
    line.push_str("20240110"); // request date
    line.push_str(&zeroed(12_345_678, 18)); // amount: 123456.78
    line.push_str(&zeroed(1_000_000, 18)); // tax withheld: 10000.00
    line.push_str("240215"); // payment date
    line
}

/// A marker-file header line (type 01)
pub fn marker_header_line(layout_code: &str, issuer: &str, record_count: u64) -> String {
    let mut line = String::new();
    line.push_str("01");
    line.push_str(layout_code);
    line.push_str(issuer);
    line.push_str("123456"); // fund
    line.push_str("20240115"); // generation date
    line.push_str(&zeroed(record_count, 8));
    line
}

/// A marker-file footer line (type 03)
pub fn marker_footer_line(record_count: u64, total: u64) -> String {
    let mut line = String::new();
    line.push_str("03");
    line.push_str(&zeroed(record_count, 8));
    line.push_str(&zeroed(total, 18));
    line
}

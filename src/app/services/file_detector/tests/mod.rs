//! Test utilities for file-type detection
//!
//! Shared fixture builders for name- and content-based detection tests.

mod combined_tests;

/// A well-formed portfolio count header: 2 records, layout 0300, issuer 044,
/// fund 123456, generated 2024-01-15
pub fn portfolio_header() -> String {
    let mut line = String::new();
    line.push_str("00000002");
    line.push_str("0300");
    line.push_str("044");
    line.push_str("123456");
    line.push_str("20240115");
    line.push_str("001");
    line
}

/// A derivatives count header with the same issuer and fund
pub fn derivatives_header() -> String {
    let mut line = String::new();
    line.push_str("00000005");
    line.push_str("0314");
    line.push_str("044");
    line.push_str("123456");
    line.push_str("20240115");
    line.push_str("001");
    line
}

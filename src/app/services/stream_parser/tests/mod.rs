//! Test utilities for stream parsing
//!
//! File fixtures reuse the line builders from the record-decoder tests.


use crate::app::services::record_decoder::tests::{
    marker_footer_line, marker_header_line, portfolio_control_line, portfolio_government_line,
    portfolio_subtotal_line, withdrawal_detail_line,
};

/// A complete 3-line portfolio file: count header plus two government
/// instrument details
pub fn portfolio_file(declared_count: u64) -> String {
    let header = format!("{:08}030004412345620240115001", declared_count);
    format!(
        "{}\n{}\n{}\n",
        header,
        portfolio_government_line(),
        portfolio_government_line()
    )
}

/// A portfolio file with a control-total footer appended
pub fn portfolio_file_with_footer(declared_count: u64) -> String {
    format!(
        "{}{}\n",
        portfolio_file(declared_count),
        portfolio_control_line(2)
    )
}

/// A portfolio file closed the nominal way: section subtotal then control
/// total
pub fn portfolio_file_with_both_footers(declared_count: u64) -> String {
    format!(
        "{}{}\n{}\n",
        portfolio_file(declared_count),
        portfolio_subtotal_line("01", 2),
        portfolio_control_line(2)
    )
}

/// A complete withdrawal file: 01 header, two 02 details, 03 footer
pub fn withdrawal_file(footer_count: u64) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        marker_header_line("0500", "044", 2),
        withdrawal_detail_line(),
        withdrawal_detail_line(),
        marker_footer_line(footer_count, 24_691_356)
    )
}

//! Derived parsing statistics for reporting

use serde::{Deserialize, Serialize};

use crate::app::models::ParseResult;

/// Compact summary of a parse, suitable for logs and CLI output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseSummary {
    pub kind: String,
    pub total_lines: u64,
    pub blank_lines: u64,
    pub detail_records: u64,
    pub has_header: bool,
    pub has_footer: bool,
    pub errors: usize,
    pub warnings: usize,
    pub duration_ms: u128,
}

impl ParseSummary {
    /// Summarize a parse result
    pub fn from_result(result: &ParseResult) -> Self {
        Self {
            kind: result.kind.to_string(),
            total_lines: result.total_lines,
            blank_lines: result.blank_lines,
            detail_records: result.detail_count(),
            has_header: result.header.is_some(),
            has_footer: result.footer.is_some(),
            errors: result.errors.len() + result.errors_truncated,
            warnings: result.warnings.len(),
            duration_ms: result.duration.as_millis(),
        }
    }

    /// Share of non-blank lines that decoded cleanly, as a percentage
    pub fn success_rate(&self) -> f64 {
        let data_lines = self.total_lines.saturating_sub(self.blank_lines);
        if data_lines == 0 {
            return 100.0;
        }
        let failed = self.errors as u64;
        ((data_lines.saturating_sub(failed)) as f64 / data_lines as f64) * 100.0
    }
}

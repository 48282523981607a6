//! Configuration management and validation
//!
//! Provides the parser configuration shared by the stream parser and the
//! structural validator. A configuration value is constructed once per parse
//! run and never mutated afterwards; independent runs may freely clone it.

use crate::constants::{DEFAULT_MAX_RECORDED_ERRORS, PROGRESS_UPDATE_INTERVAL};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parser configuration for a single parse run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Mark records invalid when a numeric field fails to parse, instead of
    /// silently defaulting the value to zero. The diagnostic is recorded
    /// either way.
    pub strict_numeric: bool,

    /// Maximum number of per-line errors kept in the result; errors beyond
    /// this cap are counted but their raw lines are discarded.
    pub max_recorded_errors: usize,

    /// Lines between progress-sink notifications
    pub progress_interval: u64,

    /// Treat a header/detail record-count mismatch as an error instead of a
    /// warning. Off by default: historical files with off-by-one header
    /// counts are known to exist.
    pub strict_record_count: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_numeric: false,
            max_recorded_errors: DEFAULT_MAX_RECORDED_ERRORS,
            progress_interval: PROGRESS_UPDATE_INTERVAL,
            strict_record_count: false,
        }
    }
}

impl ParserConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            return Err(Error::configuration(
                "progress_interval must be at least 1",
            ));
        }

        if self.max_recorded_errors == 0 {
            return Err(Error::configuration(
                "max_recorded_errors must be at least 1",
            ));
        }

        Ok(())
    }

    /// Builder-style setter for strict numeric parsing
    pub fn with_strict_numeric(mut self, strict: bool) -> Self {
        self.strict_numeric = strict;
        self
    }

    /// Builder-style setter for the recorded-error cap
    pub fn with_max_recorded_errors(mut self, cap: usize) -> Self {
        self.max_recorded_errors = cap;
        self
    }
}

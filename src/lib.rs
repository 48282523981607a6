//! CONSAR Processor Library
//!
//! A Rust library for parsing the fixed-width text files exchanged under the
//! CONSAR file-interchange specification: payroll, accounting, corrections,
//! withdrawals, transfers, voluntary contributions, SIEFORE investment
//! portfolios and derivatives positions.
//!
//! This library provides tools for:
//! - Classifying files by name and/or header content with a confidence score
//! - Decoding fixed-width lines into typed records via a versioned layout catalog
//! - Streaming line-by-line parsing with per-line diagnostics and progress reporting
//! - Structural validation of header/footer presence and declared record counts
//! - Enumerating the semantic rule metadata a downstream validation engine runs
//!
//! Parsing is deliberately lenient: a single malformed field never aborts a
//! parse. Callers must inspect both the success flag and the diagnostics
//! lists, since "parsed" does not imply "valid".

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod file_detector;
        pub mod layout_catalog;
        pub mod record_decoder;
        pub mod stream_parser;
        pub mod structural_validator;
        pub mod validator_catalog;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{DecodedRecord, DetectionResult, FileKind, ParseResult, RecordCategory};
pub use app::services::file_detector::FileTypeDetector;
pub use app::services::layout_catalog::LayoutCatalog;
pub use app::services::stream_parser::StreamParser;
pub use app::services::structural_validator::StructuralValidator;
pub use app::services::validator_catalog::{RuleDescriptor, ValidatorCatalog};
pub use config::ParserConfig;

/// Result type alias for the CONSAR processor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for CONSAR file processing operations
///
/// Only stream-level failures surface here. Line-level decode problems and
/// structural anomalies are carried as data inside [`ParseResult`] and never
/// abort a parse.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File could not be decoded as single-byte text
    #[error("Encoding error in file '{file}': {message}")]
    Encoding { file: String, message: String },

    /// File layout does not match any supported interchange format
    #[error("File format error in file '{file}': {message}")]
    FileFormat { file: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Requested file kind has no layout in the catalog
    #[error("No layout registered for file kind '{kind}'")]
    UnknownLayout { kind: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted by cancellation
    #[error("Processing interrupted: {reason}")]
    Cancelled { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an encoding error
    pub fn encoding(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a file format error
    pub fn file_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown layout error
    pub fn unknown_layout(kind: impl Into<String>) -> Self {
        Self::UnknownLayout { kind: kind.into() }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a cancellation error
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
    }
}

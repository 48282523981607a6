//! Fixed-width record decoding for CONSAR interchange files
//!
//! The decoder slices a record-type prefix whose width depends on the file
//! family, dispatches into the layout catalog's field tables and converts
//! each fixed-width slice to a typed value. Decoding is total: malformed
//! input degrades to per-field or per-record diagnostics, never a panic or
//! an error return.
//!
//! ## Components
//!
//! - [`decoder`] - The generic schema-driven extraction routine
//! - [`field_parsers`] - Per-type slice conversions and their leniencies
//! - [`classify`] - Header/footer/detail classification rules
//! - [`derived`] - Convenience flags computed from decoded fields

pub mod classify;
pub mod decoder;
pub mod derived;
pub mod field_parsers;

#[cfg(test)]
pub mod tests;

pub use decoder::{RecordDecoder, COUNT_HEADER_CODE};

//! Versioned layout schema catalog for CONSAR interchange formats
//!
//! The catalog is a pure lookup structure over compiled-in field-position
//! tables. It performs no I/O, is immutable after construction and safe to
//! share read-only across concurrent parses.
//!
//! Version lookup defaults to the baseline ("1.0") and falls back to the
//! lexicographically latest version registered for a file kind when an exact
//! match is absent, so callers keep working across regulator layout
//! revisions.

pub mod layouts;
pub mod schema;

#[cfg(test)]
pub mod tests;

pub use schema::{FieldSchema, LayoutSchema, RecordSchema};

use crate::app::models::FileKind;

/// Catalog baseline version used when callers do not ask for one
pub const BASELINE_VERSION: &str = "1.0";

/// Static, versioned table of record layouts per file kind
#[derive(Debug, Clone, Default)]
pub struct LayoutCatalog;

impl LayoutCatalog {
    /// Create a catalog over the compiled-in layout tables
    pub fn new() -> Self {
        Self
    }

    /// Look up a layout for a file kind.
    ///
    /// `version: None` asks for the baseline. When the requested version is
    /// not registered, the lexicographically latest version for the kind is
    /// returned instead; `None` only when the kind has no layouts at all.
    pub fn get_schema(&self, kind: FileKind, version: Option<&str>) -> Option<&'static LayoutSchema> {
        let requested = version.unwrap_or(BASELINE_VERSION);

        let exact = layouts::ALL_LAYOUTS
            .iter()
            .find(|l| l.kind == kind && l.version == requested);

        exact.or_else(|| {
            layouts::ALL_LAYOUTS
                .iter()
                .filter(|l| l.kind == kind)
                .max_by_key(|l| l.version)
        })
    }

    /// All versions registered for a file kind, ascending
    pub fn list_versions(&self, kind: FileKind) -> Vec<&'static str> {
        let mut versions: Vec<&'static str> = layouts::ALL_LAYOUTS
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.version)
            .collect();
        versions.sort_unstable();
        versions
    }
}

//! Schema types for the layout catalog
//!
//! These types describe field positions and semantic types per record-type
//! code. They are pure data: the record decoder consults them for offsets so
//! that a layout revision never touches decoder logic.

use chrono::NaiveDate;

use crate::app::models::{FieldType, FileKind, RecordCategory};

/// Position, width and semantic type of one fixed-width field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    /// 0-based byte offset within the line
    pub start: usize,
    pub length: usize,
    pub field_type: FieldType,
    /// Optional trailing fields are extracted only when the line is long enough
    pub required: bool,
}

impl FieldSchema {
    /// End offset (exclusive) of this field
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Layout of one record type within a file family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    /// Record-type code as it appears on the wire; "HDR" marks the implicit
    /// line-1 header of count-header files
    pub code: &'static str,
    pub category: RecordCategory,
    pub label: &'static str,
    /// Lines shorter than this fail fast without any field extraction
    pub min_length: usize,
    pub fields: &'static [FieldSchema],
}

/// A complete versioned layout for one file family
#[derive(Debug, Clone, Copy)]
pub struct LayoutSchema {
    pub kind: FileKind,
    pub version: &'static str,
    /// Effective-date window, stored as (year, month, day) so layouts can be
    /// declared in consts
    pub effective_from: Option<(i32, u32, u32)>,
    pub effective_to: Option<(i32, u32, u32)>,
    /// Header layout for count-header kinds; marker kinds carry their header
    /// as an ordinary "01" record schema
    pub header: Option<&'static RecordSchema>,
    pub records: &'static [RecordSchema],
}

impl LayoutSchema {
    /// Look up the record schema for a record-type code
    pub fn record(&self, code: &str) -> Option<&'static RecordSchema> {
        self.records.iter().find(|r| r.code == code)
    }

    /// Start of the effective-date window
    pub fn effective_from_date(&self) -> Option<NaiveDate> {
        self.effective_from
            .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    }

    /// End of the effective-date window
    pub fn effective_to_date(&self) -> Option<NaiveDate> {
        self.effective_to
            .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    }

    /// All record-type codes this layout accepts
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.records.iter().map(|r| r.code)
    }
}

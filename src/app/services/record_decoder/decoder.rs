//! Core fixed-width record decoding
//!
//! One generic extraction routine, parameterized by the layout catalog's
//! record schemas, replaces per-record-type decoder functions. Decoding
//! never panics and never raises for a single bad field: diagnostics
//! accumulate on the record while remaining fields are still extracted.

use std::collections::BTreeMap;

use tracing::debug;

use crate::app::models::{DecodedRecord, DiagnosticCode, FieldType, FileKind, RecordCategory};
use crate::app::services::layout_catalog::{LayoutCatalog, LayoutSchema, RecordSchema};
use crate::config::ParserConfig;
use crate::{Error, Result};

use super::classify::classify_code;
use super::derived::add_derived_flags;
use super::field_parsers::{self, FieldOutcome};

/// Record-type code assigned to the implicit line-1 header of count-header
/// files
pub const COUNT_HEADER_CODE: &str = "HDR";

/// Schema-driven decoder for one file kind.
///
/// Immutable after construction; one instance may decode any number of lines
/// and is safe to share read-only across threads.
#[derive(Debug)]
pub struct RecordDecoder {
    kind: FileKind,
    layout: &'static LayoutSchema,
    strict_numeric: bool,
}

impl RecordDecoder {
    /// Create a decoder for a file kind, resolving its layout from the catalog
    pub fn new(kind: FileKind, catalog: &LayoutCatalog, config: &ParserConfig) -> Result<Self> {
        Self::with_version(kind, catalog, config, None)
    }

    /// Create a decoder pinned to a specific layout version
    pub fn with_version(
        kind: FileKind,
        catalog: &LayoutCatalog,
        config: &ParserConfig,
        version: Option<&str>,
    ) -> Result<Self> {
        let layout = catalog
            .get_schema(kind, version)
            .ok_or_else(|| Error::unknown_layout(kind.to_string()))?;

        Ok(Self {
            kind,
            layout,
            strict_numeric: config.strict_numeric,
        })
    }

    /// The layout this decoder resolves against
    pub fn layout(&self) -> &'static LayoutSchema {
        self.layout
    }

    /// Decode a single line into a typed record.
    ///
    /// Never fails: a line below the minimum length or with an unrecognized
    /// record-type code yields an invalid record carrying the diagnostic,
    /// with the raw line preserved.
    pub fn decode_line(&self, raw_line: &str, line_number: u64) -> DecodedRecord {
        let line = raw_line.trim_end_matches(['\r', '\n']);
        let line_len = field_parsers::line_length(line);

        // Line 1 of a count-header file is the header regardless of content
        if self.kind.uses_count_header() && line_number == 1 {
            if let Some(header) = self.layout.header {
                return self.decode_with_schema(
                    line,
                    line_len,
                    line_number,
                    COUNT_HEADER_CODE.to_string(),
                    RecordCategory::Header,
                    header,
                );
            }
        }

        let width = self.kind.record_code_width();
        let code = match field_parsers::slice_field(line, 0, width) {
            Some(prefix) if prefix.chars().all(|c| c.is_ascii_digit()) => prefix.to_string(),
            Some(prefix) => {
                return self.failed_record(
                    line,
                    line_number,
                    prefix.to_string(),
                    DiagnosticCode::UnknownRecordType,
                    format!("record-type prefix '{}' is not numeric", prefix),
                );
            }
            None => {
                return self.failed_record(
                    line,
                    line_number,
                    String::new(),
                    DiagnosticCode::LineTooShort,
                    format!(
                        "line has {} characters, shorter than the {}-digit record-type prefix",
                        line_len, width
                    ),
                );
            }
        };

        let category = classify_code(self.kind, &code, line_number, Some(self.layout));

        let Some(schema) = self.layout.record(&code) else {
            debug!("Unknown record type '{}' on line {}", code, line_number);
            return self.failed_record(
                line,
                line_number,
                code.clone(),
                DiagnosticCode::UnknownRecordType,
                format!(
                    "record type '{}' is not defined for {} files",
                    code, self.kind
                ),
            );
        };

        self.decode_with_schema(line, line_len, line_number, code, category, schema)
    }

    /// The generic fixed-width extraction routine
    fn decode_with_schema(
        &self,
        line: &str,
        line_len: usize,
        line_number: u64,
        code: String,
        category: RecordCategory,
        schema: &'static RecordSchema,
    ) -> DecodedRecord {
        let mut diagnostics = Vec::new();
        let mut fields = BTreeMap::new();
        let mut is_valid = true;

        // Minimum-length gate: no field extraction below the declared floor
        if line_len < schema.min_length {
            diagnostics.push(format!(
                "line has {} characters, record type '{}' requires at least {}",
                line_len, schema.code, schema.min_length
            ));
            return DecodedRecord {
                line_number,
                record_type: code,
                category,
                label: schema.label.to_string(),
                raw_line: line.to_string(),
                fields,
                is_valid: false,
                failure: Some(DiagnosticCode::LineTooShort),
                diagnostics,
            };
        }

        for field in schema.fields {
            // Optional trailing fields exist only when the line is long enough
            if line_len < field.end() {
                if field.required {
                    // Unreachable when the catalog is consistent; degrade per
                    // field instead of panicking
                    diagnostics.push(format!(
                        "field '{}': line too short for required field",
                        field.name
                    ));
                    is_valid = false;
                }
                fields.insert(field.name.to_string(), None);
                continue;
            }

            let Some(raw) = field_parsers::slice_field(line, field.start, field.length) else {
                diagnostics.push(format!("field '{}': extraction failed", field.name));
                fields.insert(field.name.to_string(), None);
                is_valid = false;
                continue;
            };

            let FieldOutcome { value, diagnostic } = convert(field.name, raw, field.field_type);
            if let Some(message) = diagnostic {
                if self.strict_numeric {
                    is_valid = false;
                }
                diagnostics.push(message);
            }
            fields.insert(field.name.to_string(), value);
        }

        add_derived_flags(self.kind, &code, &mut fields);

        DecodedRecord {
            line_number,
            record_type: code,
            category,
            label: schema.label.to_string(),
            raw_line: line.to_string(),
            fields,
            is_valid,
            failure: None,
            diagnostics,
        }
    }

    /// An invalid record with a single diagnostic and no field values
    fn failed_record(
        &self,
        line: &str,
        line_number: u64,
        code: String,
        failure: DiagnosticCode,
        diagnostic: String,
    ) -> DecodedRecord {
        let category = if code.is_empty() {
            RecordCategory::Detail
        } else {
            classify_code(self.kind, &code, line_number, Some(self.layout))
        };

        DecodedRecord {
            line_number,
            record_type: code,
            category,
            label: String::new(),
            raw_line: line.to_string(),
            fields: BTreeMap::new(),
            is_valid: false,
            failure: Some(failure),
            diagnostics: vec![diagnostic],
        }
    }
}

/// Convert one raw slice per its semantic type
fn convert(name: &str, raw: &str, field_type: FieldType) -> FieldOutcome {
    match field_type {
        FieldType::Text => field_parsers::parse_text(raw),
        FieldType::Integer => field_parsers::parse_integer(name, raw),
        FieldType::Decimal { scale } => field_parsers::parse_decimal(name, raw, scale),
        FieldType::DateYmd8 => field_parsers::parse_date_ymd8(raw),
        FieldType::DateYmd6 => field_parsers::parse_date_ymd6(raw),
        FieldType::Isin => field_parsers::parse_isin(name, raw),
        FieldType::Lei => field_parsers::parse_lei(name, raw),
        FieldType::Currency => field_parsers::parse_currency(raw),
        FieldType::Flag => field_parsers::parse_flag(raw),
    }
}

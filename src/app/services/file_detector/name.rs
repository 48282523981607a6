//! Name-based file classification
//!
//! Recognizes the canonical interchange naming convention
//! `YYYYMMDD_<2-letter category>_<3-digit issuer>_<6-digit fund>[_<seq>].<4-digit extension>`
//! plus archive containers and metadata sidecars. When the full pattern
//! fails, a reduced-confidence fallback classifies on the numeric extension
//! alone.

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::app::models::{
    DetectionMethod, DetectionResult, FileKind, HeaderAttributes,
};
use crate::constants::{self, detection_weights, CONTAINER_EXTENSIONS, SIDECAR_EXTENSIONS};

/// Compile the canonical filename pattern
pub fn canonical_pattern() -> Regex {
    // The pattern is a compile-time constant; a failure here is a programming
    // error caught by the constructor tests.
    Regex::new(r"^(\d{8})_([A-Za-z]{2})_(\d{3})_(\d{6})(?:_(\d+))?\.(\d{4})$")
        .unwrap_or_else(|e| panic!("invalid canonical filename pattern: {}", e))
}

/// Classify a file from its name
pub fn detect(pattern: &Regex, filename: &str) -> DetectionResult {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if basename.is_empty() {
        return DetectionResult::unknown(DetectionMethod::FileName, "empty filename");
    }

    if let Some(result) = detect_special_suffix(basename) {
        return result;
    }

    if let Some(captures) = pattern.captures(basename) {
        return detect_canonical(basename, &captures);
    }

    // Fallback: classify on the numeric extension alone
    detect_extension_only(basename)
}

/// Containers and sidecars are classified by suffix alone
fn detect_special_suffix(basename: &str) -> Option<DetectionResult> {
    let extension = basename.rsplit('.').next()?.to_ascii_lowercase();

    if CONTAINER_EXTENSIONS.contains(&extension.as_str()) {
        return Some(DetectionResult {
            kind: FileKind::Unknown,
            confidence: 100,
            method: DetectionMethod::Container,
            attributes: HeaderAttributes::default(),
            warnings: vec![format!(
                "'{}' is a {} container; extract it before parsing",
                basename, extension
            )],
            is_data_file: false,
        });
    }

    if SIDECAR_EXTENSIONS.contains(&extension.as_str()) {
        return Some(DetectionResult {
            kind: FileKind::Unknown,
            confidence: 100,
            method: DetectionMethod::Sidecar,
            attributes: HeaderAttributes::default(),
            warnings: vec![format!("'{}' is a metadata sidecar, not a data file", basename)],
            is_data_file: false,
        });
    }

    None
}

/// Full canonical pattern matched; extract every attribute it carries
fn detect_canonical(basename: &str, captures: &regex::Captures<'_>) -> DetectionResult {
    let mut warnings = Vec::new();
    let mut attributes = HeaderAttributes::default();

    let date_str = &captures[1];
    attributes.file_date = NaiveDate::parse_from_str(date_str, "%Y%m%d").ok();
    if attributes.file_date.is_none() {
        warnings.push(format!("filename date '{}' is not a calendar date", date_str));
    }

    let category_code = &captures[2];
    attributes.category = constants::category_name(category_code).map(str::to_string);
    if attributes.category.is_none() {
        warnings.push(format!("unrecognized filename category '{}'", category_code));
    }

    attributes.issuer_code = Some(captures[3].to_string());
    attributes.fund_code = Some(captures[4].to_string());

    let extension = &captures[6];
    attributes.layout_code = Some(extension.to_string());
    let kind = FileKind::from_extension(extension);

    if kind == FileKind::Unknown {
        warnings.push(format!(
            "filename '{}' matches the naming convention but extension '{}' maps to no known format",
            basename, extension
        ));
        return DetectionResult {
            kind,
            confidence: 0,
            method: DetectionMethod::FileName,
            attributes,
            warnings,
            is_data_file: true,
        };
    }

    debug!("Canonical filename match: {} -> {}", basename, kind);

    DetectionResult {
        kind,
        confidence: detection_weights::NAME_PATTERN,
        method: DetectionMethod::FileName,
        attributes,
        warnings,
        is_data_file: true,
    }
}

/// The full pattern failed; try the numeric extension at reduced confidence
fn detect_extension_only(basename: &str) -> DetectionResult {
    let extension = match basename.rsplit('.').next() {
        Some(ext) if ext.len() == 4 && ext.chars().all(|c| c.is_ascii_digit()) => ext,
        _ => {
            return DetectionResult::unknown(
                DetectionMethod::FileName,
                format!("filename '{}' matches no known naming convention", basename),
            );
        }
    };

    let kind = FileKind::from_extension(extension);
    if kind == FileKind::Unknown {
        return DetectionResult::unknown(
            DetectionMethod::Extension,
            format!("numeric extension '{}' maps to no known format", extension),
        );
    }

    let mut attributes = HeaderAttributes::default();
    attributes.layout_code = Some(extension.to_string());

    DetectionResult {
        kind,
        confidence: detection_weights::NAME_EXTENSION_ONLY,
        method: DetectionMethod::Extension,
        attributes,
        warnings: vec![format!(
            "filename '{}' does not follow the naming convention; classified on extension alone",
            basename
        )],
        is_data_file: true,
    }
}

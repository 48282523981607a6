//! Content-based file classification
//!
//! Inspects the first line of a file. Count-header files open with an
//! 8-digit record count followed by a 4-character layout code; the issuer
//! key and generation date are recovered heuristically from a bounded
//! offset window. This path is best-effort by design and layered behind
//! schema-driven header decoding.

use chrono::NaiveDate;
use tracing::debug;

use crate::app::models::{DetectionMethod, DetectionResult, FileKind, HeaderAttributes};
use crate::constants::{
    self, detection_weights, ISSUER_SCAN_END, ISSUER_SCAN_START, LAYOUT_CODE_LENGTH,
    LAYOUT_CODE_OFFSET, MIN_CONTENT_HEADER_LENGTH,
};

/// Classify a file from its first line
pub fn detect(header_line: &str) -> DetectionResult {
    let line = header_line.trim_end_matches(['\r', '\n']);

    if line.len() < MIN_CONTENT_HEADER_LENGTH {
        return DetectionResult::unknown(
            DetectionMethod::HeaderContent,
            format!(
                "header line has {} characters, {} required for content detection",
                line.len(),
                MIN_CONTENT_HEADER_LENGTH
            ),
        );
    }

    if !line.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        return DetectionResult::unknown(
            DetectionMethod::HeaderContent,
            "header line does not start with a digit",
        );
    }

    let mut confidence = detection_weights::PLAUSIBLE_HEADER;
    let mut warnings = Vec::new();
    let mut attributes = HeaderAttributes::default();

    // 8-digit record count at offset 0
    match line.get(..constants::COUNT_HEADER_DIGITS) {
        Some(count_field) if count_field.chars().all(|c| c.is_ascii_digit()) => {
            attributes.expected_records = count_field.parse::<u64>().ok();
            confidence += detection_weights::RECORD_COUNT;
        }
        Some(count_field) => {
            warnings.push(format!(
                "leading record-count field '{}' is not numeric",
                count_field
            ));
        }
        None => {
            warnings.push("header line is not single-byte text".to_string());
        }
    }

    // 4-character layout code at a fixed offset
    let kind = match line.get(LAYOUT_CODE_OFFSET..LAYOUT_CODE_OFFSET + LAYOUT_CODE_LENGTH) {
        Some(code) => {
            let kind = FileKind::from_layout_code(code);
            if kind != FileKind::Unknown {
                attributes.layout_code = Some(code.to_string());
                confidence += detection_weights::LAYOUT_CODE;
            } else {
                warnings.push(format!("layout code '{}' maps to no known format", code));
            }
            kind
        }
        None => FileKind::Unknown,
    };

    // Heuristic issuer-key scan over a bounded window
    if let Some(issuer) = scan_issuer_key(line) {
        attributes.issuer_code = Some(issuer);
        confidence += detection_weights::ISSUER_KEY;
    }

    // Generation date directly after the fund code, where count headers put it
    if let Some(date) = scan_generation_date(line) {
        attributes.file_date = Some(date);
        confidence += detection_weights::FILE_DATE;
    }

    if kind == FileKind::Unknown {
        warnings.push("header content matches no known layout".to_string());
        return DetectionResult {
            kind,
            confidence: 0,
            method: DetectionMethod::HeaderContent,
            attributes,
            warnings,
            is_data_file: true,
        };
    }

    debug!("Content detection: {} at {}%", kind, confidence.min(100));

    DetectionResult {
        kind,
        confidence: confidence.min(100),
        method: DetectionMethod::HeaderContent,
        attributes,
        warnings,
        is_data_file: true,
    }
}

/// Scan the bounded offset window for a 3-digit issuer-key candidate.
///
/// The schema position (directly after the layout code) is tried first; the
/// rest of the window is a fallback that rejects candidates embedded in a
/// longer digit run.
fn scan_issuer_key(line: &str) -> Option<String> {
    if let Some(candidate) = line.get(ISSUER_SCAN_START..ISSUER_SCAN_START + 3) {
        if constants::is_plausible_issuer_key(candidate) {
            return Some(candidate.to_string());
        }
    }

    let bytes = line.as_bytes();
    let end = ISSUER_SCAN_END.min(bytes.len().saturating_sub(2));

    for start in ISSUER_SCAN_START + 1..end {
        let Some(candidate) = line.get(start..start + 3) else {
            continue;
        };
        if !constants::is_plausible_issuer_key(candidate) {
            continue;
        }
        // Reject candidates embedded in a longer digit run (amounts, dates)
        let followed_by_digit = bytes
            .get(start + 3)
            .map(|b| b.is_ascii_digit())
            .unwrap_or(false);
        if !followed_by_digit {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Look for a parseable YYYYMMDD generation date at the count-header offset
fn scan_generation_date(line: &str) -> Option<NaiveDate> {
    let field = line.get(
        constants::GENERATION_DATE_OFFSET
            ..constants::GENERATION_DATE_OFFSET + constants::GENERATION_DATE_LENGTH,
    )?;
    if field == constants::EMPTY_DATE_YMD8 {
        return None;
    }
    NaiveDate::parse_from_str(field, "%Y%m%d").ok()
}

//! File type detection for CONSAR interchange files
//!
//! Classifies a file from its name and/or first line, producing a
//! [`DetectionResult`] with a 0-100 confidence score and any header
//! attributes that could be extracted along the way.
//!
//! Detection never fails hard: the worst case is `FileKind::Unknown` at
//! confidence 0 with an explanatory warning. Callers must handle `Unknown`
//! explicitly.

pub mod content;
pub mod name;

#[cfg(test)]
pub mod tests;

use tracing::debug;

use crate::app::models::{DetectionMethod, DetectionResult, FileKind};
use crate::constants::detection_weights;

/// Stateless detector, safe to share read-only across concurrent parses
#[derive(Debug)]
pub struct FileTypeDetector {
    name_pattern: regex::Regex,
}

impl Default for FileTypeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTypeDetector {
    /// Create a detector with the canonical filename pattern compiled
    pub fn new() -> Self {
        Self {
            name_pattern: name::canonical_pattern(),
        }
    }

    /// Classify a file from its name alone
    pub fn detect_from_name(&self, filename: &str) -> DetectionResult {
        name::detect(&self.name_pattern, filename)
    }

    /// Classify a file from its first line alone
    pub fn detect_from_content(&self, header_line: &str) -> DetectionResult {
        content::detect(header_line)
    }

    /// Classify a file from both signals, merging the outcomes.
    ///
    /// Agreement boosts confidence; disagreement surfaces a warning naming
    /// both candidates and returns the higher-confidence result. On a tie
    /// the name-based result wins: it is cheaper and less heuristic.
    pub fn detect_combined(&self, filename: &str, header_line: &str) -> DetectionResult {
        let by_name = self.detect_from_name(filename);
        let by_content = self.detect_from_content(header_line);

        debug!(
            "Combined detection: name={}@{} content={}@{}",
            by_name.kind, by_name.confidence, by_content.kind, by_content.confidence
        );

        // Containers and sidecars are classified by suffix alone; the first
        // line of a zip archive is not a header.
        if matches!(
            by_name.method,
            DetectionMethod::Container | DetectionMethod::Sidecar
        ) {
            return by_name;
        }

        let mut merged = match (by_name.kind, by_content.kind) {
            (FileKind::Unknown, FileKind::Unknown) => {
                let mut result = by_content;
                result.warnings.extend(by_name.warnings);
                result.method = DetectionMethod::Combined;
                return result;
            }
            (FileKind::Unknown, _) => by_content,
            (_, FileKind::Unknown) => by_name,
            (a, b) if a == b => {
                let mut result = if by_name.confidence >= by_content.confidence {
                    merge_attributes(by_name, &by_content)
                } else {
                    merge_attributes(by_content, &by_name)
                };
                result.confidence = result
                    .confidence
                    .saturating_add(detection_weights::AGREEMENT_BOOST)
                    .min(100);
                result
            }
            (a, b) => {
                let warning = format!(
                    "name-based detection suggests '{}' ({}%) but header content suggests '{}' ({}%)",
                    a, by_name.confidence, b, by_content.confidence
                );
                let mut result = if by_name.confidence >= by_content.confidence {
                    by_name
                } else {
                    by_content
                };
                result.warnings.push(warning);
                result
            }
        };

        merged.method = DetectionMethod::Combined;
        merged
    }
}

/// Keep the winner's classification but fill attribute gaps from the loser
fn merge_attributes(mut winner: DetectionResult, other: &DetectionResult) -> DetectionResult {
    let attrs = &mut winner.attributes;
    let fallback = &other.attributes;

    if attrs.layout_code.is_none() {
        attrs.layout_code = fallback.layout_code.clone();
    }
    if attrs.issuer_code.is_none() {
        attrs.issuer_code = fallback.issuer_code.clone();
    }
    if attrs.fund_code.is_none() {
        attrs.fund_code = fallback.fund_code.clone();
    }
    if attrs.expected_records.is_none() {
        attrs.expected_records = fallback.expected_records;
    }
    if attrs.file_date.is_none() {
        attrs.file_date = fallback.file_date;
    }
    if attrs.category.is_none() {
        attrs.category = fallback.category.clone();
    }

    winner.warnings.extend(other.warnings.iter().cloned());
    winner
}

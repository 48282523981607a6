//! Application constants for the CONSAR processor
//!
//! This module contains the static classification tables and default values
//! used throughout the processor: numeric-extension and layout-code mappings,
//! filename category codes, issuer-key prefixes and progress cadences.

// =============================================================================
// File Extension and Layout Code Mappings
// =============================================================================

/// Mapping from the 4-digit filename extension to the interchange file family.
///
/// The extension is the authoritative signal in name-based detection; the
/// same codes appear as the 4-character layout code inside count-header files.
pub const EXTENSION_FILE_KINDS: &[(&str, &str)] = &[
    ("0100", "payroll"),
    ("0200", "accounting"),
    ("0210", "correction"),
    ("0300", "portfolio"),
    ("0314", "derivatives"),
    ("0500", "withdrawal"),
    ("0600", "transfer"),
    ("0700", "contribution"),
    ("1101", "reconciliation"),
];

/// Container extensions classified by suffix alone, at full confidence
pub const CONTAINER_EXTENSIONS: &[&str] = &["zip", "gpg"];

/// Sidecar extensions that accompany data files but carry no records
pub const SIDECAR_EXTENSIONS: &[&str] = &["md5", "sha256", "sig", "txt"];

/// Two-letter filename category codes used in the canonical naming convention
pub const CATEGORY_CODES: &[(&str, &str)] = &[
    ("PS", "Pensiones"),
    ("RT", "Retiros"),
    ("TR", "Traspasos"),
    ("AV", "AportacionesVoluntarias"),
    ("CT", "Contabilidad"),
    ("NM", "Nomina"),
    ("CF", "Confronta"),
    ("SB", "Subcuentas"),
];

// =============================================================================
// Issuer (AFORE) Key Constants
// =============================================================================

/// Leading digits of valid 3-digit AFORE issuer keys.
///
/// Historic keys run 001-099; keys assigned after the 2008 consolidation run
/// in the 5xx series. Anything else found in a header scan window is noise.
pub const ISSUER_KEY_PREFIXES: &[char] = &['0', '5'];

/// Offset window scanned for an issuer-key candidate in content detection
pub const ISSUER_SCAN_START: usize = 12;
pub const ISSUER_SCAN_END: usize = 40;

// =============================================================================
// Header Layout Constants (count-header file kinds)
// =============================================================================

/// Width of the leading record-count field in count-header files
pub const COUNT_HEADER_DIGITS: usize = 8;

/// Offset of the 4-character layout code within a count header
pub const LAYOUT_CODE_OFFSET: usize = 8;
pub const LAYOUT_CODE_LENGTH: usize = 4;

/// Offset of the YYYYMMDD generation date within a count header
pub const GENERATION_DATE_OFFSET: usize = 21;
pub const GENERATION_DATE_LENGTH: usize = 8;

/// Minimum header length required for content-based detection
pub const MIN_CONTENT_HEADER_LENGTH: usize = 30;

// =============================================================================
// Detection Confidence Weights
// =============================================================================

/// Confidence contributions for content-based detection, capped at 100
pub mod detection_weights {
    /// Header starts with a digit and meets the minimum length
    pub const PLAUSIBLE_HEADER: u8 = 10;

    /// 8-digit record count extracted
    pub const RECORD_COUNT: u8 = 25;

    /// Layout code recognized in the static table
    pub const LAYOUT_CODE: u8 = 40;

    /// Issuer-key candidate found in the scan window
    pub const ISSUER_KEY: u8 = 15;

    /// Generation date parsed from the header
    pub const FILE_DATE: u8 = 10;

    /// Full canonical filename pattern matched
    pub const NAME_PATTERN: u8 = 95;

    /// Extension-only fallback when the full pattern fails
    pub const NAME_EXTENSION_ONLY: u8 = 60;

    /// Boost applied when name and content detection agree
    pub const AGREEMENT_BOOST: u8 = 5;
}

// =============================================================================
// Record Type Marker Constants (type-marker file kinds)
// =============================================================================

/// Two-digit structural markers for generic interchange files
pub mod type_markers {
    pub const HEADER: &str = "01";
    pub const DETAIL: &str = "02";
    pub const FOOTER: &str = "03";
    pub const CONTROL: &str = "04";
    pub const ALT_FOOTER: &str = "99";
}

// =============================================================================
// Date Handling Constants
// =============================================================================

/// All-zero placeholders that decode to "no date" rather than an error
pub const EMPTY_DATE_YMD8: &str = "00000000";
pub const EMPTY_DATE_YMD6: &str = "000000";

/// Two-digit years below this pivot belong to the 2000s, the rest to the 1900s
pub const CENTURY_PIVOT_YY: u32 = 50;

// =============================================================================
// Performance and Monitoring Constants
// =============================================================================

/// Progress reporting cadence (lines between sink notifications)
pub const PROGRESS_UPDATE_INTERVAL: u64 = 1000;

/// Default cap on recorded per-line errors before further ones are counted only
pub const DEFAULT_MAX_RECORDED_ERRORS: usize = 10_000;

/// Default number of files parsed concurrently during a directory scan
pub const DEFAULT_SCAN_WORKERS: usize = 4;

// =============================================================================
// Helper Functions
// =============================================================================

/// Look up the file-kind name for a 4-digit numeric extension
pub fn file_kind_name_for_extension(extension: &str) -> Option<&'static str> {
    EXTENSION_FILE_KINDS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, name)| *name)
}

/// Look up the display name for a 2-letter filename category code
pub fn category_name(code: &str) -> Option<&'static str> {
    let upper = code.to_ascii_uppercase();
    CATEGORY_CODES
        .iter()
        .find(|(c, _)| *c == upper)
        .map(|(_, name)| *name)
}

/// Check whether a 3-digit candidate looks like a valid AFORE issuer key
pub fn is_plausible_issuer_key(candidate: &str) -> bool {
    candidate.len() == 3
        && candidate.chars().all(|c| c.is_ascii_digit())
        && candidate
            .chars()
            .next()
            .map(|c| ISSUER_KEY_PREFIXES.contains(&c))
            .unwrap_or(false)
        && candidate != "000"
}

//! Derived classification flags
//!
//! Convenience projections computed from already-decoded fields. These are
//! not part of the wire format; they exist so downstream consumers do not
//! re-implement substring and prefix heuristics.

use std::collections::BTreeMap;

use crate::app::models::{FieldValue, FileKind};

/// ISIN prefix used by Mexican federal government issues
const GOVERNMENT_ISIN_PREFIX: &str = "MX";

/// Instrument-name fragments that mark government paper
const GOVERNMENT_NAME_HINTS: &[&str] = &["BONO", "CETE", "UDIBONO", "BONDES", "GUBER"];

/// Instrument-name fragments that mark exchange-traded funds
const ETF_NAME_HINTS: &[&str] = &["ETF", "TRAC", "ISHARES"];

/// Compute the derived flags for a decoded record and insert them into the
/// field map
pub fn add_derived_flags(
    kind: FileKind,
    code: &str,
    fields: &mut BTreeMap<String, Option<FieldValue>>,
) {
    match (kind, code) {
        (FileKind::Portfolio, "301") | (FileKind::Portfolio, "302") => {
            let is_government = is_government_instrument(fields);
            fields.insert(
                "is_government_instrument".to_string(),
                Some(FieldValue::Flag(is_government)),
            );
        }
        (FileKind::Portfolio, "303") | (FileKind::Portfolio, "304") => {
            let is_etf = name_contains(fields, ETF_NAME_HINTS);
            fields.insert("is_etf".to_string(), Some(FieldValue::Flag(is_etf)));
        }
        (FileKind::Derivatives, "2001") => {
            let cross = is_cross_currency(fields);
            fields.insert(
                "is_cross_currency".to_string(),
                Some(FieldValue::Flag(cross)),
            );
        }
        _ => {}
    }
}

fn text<'a>(fields: &'a BTreeMap<String, Option<FieldValue>>, name: &str) -> Option<&'a str> {
    match fields.get(name) {
        Some(Some(FieldValue::Text(s))) => Some(s.as_str()),
        _ => None,
    }
}

/// Government paper carries an MX-prefixed ISIN; the instrument name is a
/// fallback for positions reported with foreign clearing identifiers
fn is_government_instrument(fields: &BTreeMap<String, Option<FieldValue>>) -> bool {
    if let Some(isin) = text(fields, "isin") {
        if isin.starts_with(GOVERNMENT_ISIN_PREFIX) {
            return true;
        }
    }
    name_contains(fields, GOVERNMENT_NAME_HINTS)
}

fn name_contains(fields: &BTreeMap<String, Option<FieldValue>>, hints: &[&str]) -> bool {
    for field in ["instrument_name", "issuer_name", "fund_name"] {
        if let Some(name) = text(fields, field) {
            let upper = name.to_ascii_uppercase();
            if hints.iter().any(|h| upper.contains(h)) {
                return true;
            }
        }
    }
    false
}

/// A swap paying and receiving in different currencies is cross-currency
fn is_cross_currency(fields: &BTreeMap<String, Option<FieldValue>>) -> bool {
    match (text(fields, "pay_currency"), text(fields, "receive_currency")) {
        (Some(pay), Some(receive)) => pay != receive,
        _ => false,
    }
}

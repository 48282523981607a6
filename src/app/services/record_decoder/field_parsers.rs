//! Field conversion utilities for fixed-width records
//!
//! Each function converts one trimmed fixed-width slice into a typed value.
//! Conversions are deliberately lenient: numeric garbage defaults to zero
//! with a diagnostic, and placeholder or impossible dates decode to "no
//! date" rather than an error. Callers needing strictness re-validate.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::app::models::FieldValue;
use crate::constants::{CENTURY_PIVOT_YY, EMPTY_DATE_YMD6, EMPTY_DATE_YMD8};

/// Outcome of converting one field slice
pub struct FieldOutcome {
    pub value: Option<FieldValue>,
    /// Lenient-default diagnostic, when the raw text had to be coerced
    pub diagnostic: Option<String>,
}

impl FieldOutcome {
    fn clean(value: Option<FieldValue>) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    fn coerced(value: FieldValue, diagnostic: String) -> Self {
        Self {
            value: Some(value),
            diagnostic: Some(diagnostic),
        }
    }
}

/// Slice a fixed-width field out of a line by character position.
///
/// Returns `None` when the line is too short for the full field. Lines are
/// Latin-1 decoded, so a character maps 1:1 to a source byte.
pub fn slice_field(line: &str, start: usize, length: usize) -> Option<&str> {
    if line.is_ascii() {
        return line.get(start..start + length);
    }

    let mut indices = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let begin = indices.nth(start)?;
    let end = indices.nth(length - 1)?;
    line.get(begin..end)
}

/// Number of characters in a decoded line
pub fn line_length(line: &str) -> usize {
    if line.is_ascii() {
        line.len()
    } else {
        line.chars().count()
    }
}

/// Trimmed text; empty decodes to null
pub fn parse_text(raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FieldOutcome::clean(None)
    } else {
        FieldOutcome::clean(Some(FieldValue::Text(trimmed.to_string())))
    }
}

/// Digits-only integer; blank is zero, garbage defaults to zero with a
/// diagnostic
pub fn parse_integer(name: &str, raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldOutcome::clean(Some(FieldValue::Integer(0)));
    }

    match trimmed.parse::<i64>() {
        Ok(value) => FieldOutcome::clean(Some(FieldValue::Integer(value))),
        Err(_) => FieldOutcome::coerced(
            FieldValue::Integer(0),
            format!("field '{}': unparseable integer '{}', defaulted to 0", name, trimmed),
        ),
    }
}

/// Implied-decimal field: the digit string D decodes to exactly D / 10^scale.
///
/// Uses exact decimal arithmetic so an 18-digit scale-8 amount round-trips
/// without drift. Garbage defaults to zero with a diagnostic.
pub fn parse_decimal(name: &str, raw: &str, scale: u32) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldOutcome::clean(Some(FieldValue::Decimal(Decimal::new(0, scale))));
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return FieldOutcome::coerced(
            FieldValue::Decimal(Decimal::new(0, scale)),
            format!("field '{}': unparseable amount '{}', defaulted to 0", name, trimmed),
        );
    }

    match digits.parse::<i128>() {
        Ok(unscaled) => {
            let signed = if negative { -unscaled } else { unscaled };
            FieldOutcome::clean(Some(FieldValue::Decimal(Decimal::from_i128_with_scale(
                signed, scale,
            ))))
        }
        Err(_) => FieldOutcome::coerced(
            FieldValue::Decimal(Decimal::new(0, scale)),
            format!("field '{}': amount '{}' overflows, defaulted to 0", name, trimmed),
        ),
    }
}

/// Calendar date encoded YYYYMMDD.
///
/// The all-zero placeholder and impossible calendar dates both decode to
/// "no date", not an error.
pub fn parse_date_ymd8(raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == EMPTY_DATE_YMD8 {
        return FieldOutcome::clean(None);
    }

    FieldOutcome::clean(
        NaiveDate::parse_from_str(trimmed, "%Y%m%d")
            .ok()
            .map(FieldValue::Date),
    )
}

/// Calendar date encoded YYMMDD with the dual-century pivot:
/// years below the pivot belong to the 2000s, the rest to the 1900s.
pub fn parse_date_ymd6(raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == EMPTY_DATE_YMD6 {
        return FieldOutcome::clean(None);
    }

    if trimmed.len() != 6 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return FieldOutcome::clean(None);
    }

    let yy: u32 = trimmed[..2].parse().unwrap_or(0);
    let year = if yy < CENTURY_PIVOT_YY {
        2000 + yy as i32
    } else {
        1900 + yy as i32
    };
    let month: u32 = trimmed[2..4].parse().unwrap_or(0);
    let day: u32 = trimmed[4..6].parse().unwrap_or(0);

    FieldOutcome::clean(NaiveDate::from_ymd_opt(year, month, day).map(FieldValue::Date))
}

/// 12-character ISIN; a wrong-length non-empty value is kept with a
/// diagnostic so partially malformed input still yields data
pub fn parse_isin(name: &str, raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldOutcome::clean(None);
    }

    let value = FieldValue::Text(trimmed.to_ascii_uppercase());
    if trimmed.len() != 12 {
        FieldOutcome::coerced(
            value,
            format!("field '{}': ISIN '{}' is not 12 characters", name, trimmed),
        )
    } else {
        FieldOutcome::clean(Some(value))
    }
}

/// 20-character LEI, same leniency as ISIN
pub fn parse_lei(name: &str, raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldOutcome::clean(None);
    }

    let value = FieldValue::Text(trimmed.to_ascii_uppercase());
    if trimmed.len() != 20 {
        FieldOutcome::coerced(
            value,
            format!("field '{}': LEI '{}' is not 20 characters", name, trimmed),
        )
    } else {
        FieldOutcome::clean(Some(value))
    }
}

/// 3-letter currency code, uppercased
pub fn parse_currency(raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FieldOutcome::clean(None)
    } else {
        FieldOutcome::clean(Some(FieldValue::Text(trimmed.to_ascii_uppercase())))
    }
}

/// Single-character wire flag: "1" and "S" (sí) are true
pub fn parse_flag(raw: &str) -> FieldOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldOutcome::clean(None);
    }

    let truthy = matches!(trimmed, "1" | "S" | "s");
    FieldOutcome::clean(Some(FieldValue::Flag(truthy)))
}

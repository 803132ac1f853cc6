// 🇧🇷 Attribute Formatter
// Paired storage <-> presentation conversions for the pt-BR locale
//
// Every function here is total: wrong types, nulls and unparsable strings
// resolve to the documented default for that kind instead of an error.

use crate::attributes::AttributeKind;
use crate::value::{AttributeValue, STORAGE_DATETIME_FORMAT};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

// ============================================================================
// FORMATS & DEFAULTS
// ============================================================================

pub const PRESENTATION_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";
pub const PRESENTATION_DATETIME_SECONDS_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
pub const PRESENTATION_DATE_FORMAT: &str = "%d/%m/%Y";

pub const EMPTY_DATE: &str = "00/00/0000";
pub const EMPTY_MONEY: &str = "R$ 0,00";
pub const EMPTY_NUMERIC: &str = "0,00";
pub const CURRENCY_PREFIX: &str = "R$";

pub const YES: &str = "Sim";
pub const NO: &str = "Não";

/// Storage layouts accepted for plain dates, besides full datetimes
const STORAGE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

// ============================================================================
// DIRECTION
// ============================================================================

/// Which way a value travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Storage → pt-BR display (record just loaded)
    TowardPresentation,
    /// pt-BR display → storage (record about to be saved)
    TowardStorage,
}

impl Direction {
    pub fn name(&self) -> &str {
        match self {
            Direction::TowardPresentation => "presentation",
            Direction::TowardStorage => "storage",
        }
    }
}

/// Convert one value of the given kind in the given direction
pub fn format_value(kind: AttributeKind, direction: Direction, value: &AttributeValue) -> AttributeValue {
    match (kind, direction) {
        (AttributeKind::Datetime, Direction::TowardPresentation) => datetime_to_presentation(value),
        (AttributeKind::Datetime, Direction::TowardStorage) => datetime_to_storage(value),
        (AttributeKind::Date, Direction::TowardPresentation) => date_to_presentation(value),
        (AttributeKind::Date, Direction::TowardStorage) => date_to_storage(value),
        (AttributeKind::Money, Direction::TowardPresentation) => money_to_presentation(value),
        (AttributeKind::Money, Direction::TowardStorage) => money_to_storage(value),
        (AttributeKind::Numeric, Direction::TowardPresentation) => numeric_to_presentation(value),
        (AttributeKind::Numeric, Direction::TowardStorage) => numeric_to_storage(value),
        (AttributeKind::Boolean, Direction::TowardPresentation) => boolean_to_presentation(value),
        (AttributeKind::Boolean, Direction::TowardStorage) => boolean_to_storage(value),
    }
}

// ============================================================================
// DATETIME
// ============================================================================

/// `2024-03-15 14:30:00` (or `2024-03-15T14:30:00`) → `15/03/2024 14:30`.
///
/// Seconds are dropped. Anything that is not a parsable string or a date
/// value becomes `Null`.
pub fn datetime_to_presentation(value: &AttributeValue) -> AttributeValue {
    match value {
        AttributeValue::Date(dt) => AttributeValue::String(dt.format(PRESENTATION_DATETIME_FORMAT).to_string()),
        AttributeValue::String(s) => parse_storage_datetime(s)
            .map(|dt| AttributeValue::String(dt.format(PRESENTATION_DATETIME_FORMAT).to_string()))
            .unwrap_or(AttributeValue::Null),
        _ => AttributeValue::Null,
    }
}

/// `15/03/2024 14:30` or `15/03/2024 14:30:45` → date value.
///
/// Date values pass through untouched.
pub fn datetime_to_storage(value: &AttributeValue) -> AttributeValue {
    match value {
        AttributeValue::Date(dt) => AttributeValue::Date(*dt),
        AttributeValue::String(s) => {
            let s = s.trim();
            // Seconds are optional on input
            let format = if s.matches(':').count() == 1 {
                PRESENTATION_DATETIME_FORMAT
            } else {
                PRESENTATION_DATETIME_SECONDS_FORMAT
            };

            NaiveDateTime::parse_from_str(s, format)
                .map(AttributeValue::Date)
                .unwrap_or(AttributeValue::Null)
        }
        _ => AttributeValue::Null,
    }
}

fn parse_storage_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    NaiveDateTime::parse_from_str(s, STORAGE_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
}

// ============================================================================
// DATE
// ============================================================================

/// Any recognized storage date → `DD/MM/YYYY`; otherwise `00/00/0000`
pub fn date_to_presentation(value: &AttributeValue) -> AttributeValue {
    let formatted = match value {
        AttributeValue::String(s) => parse_storage_date(s).map(|d| d.format(PRESENTATION_DATE_FORMAT).to_string()),
        _ => None,
    };

    AttributeValue::String(formatted.unwrap_or_else(|| EMPTY_DATE.to_string()))
}

/// `DD/MM/YYYY` → date value at midnight; otherwise `Null`
pub fn date_to_storage(value: &AttributeValue) -> AttributeValue {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), PRESENTATION_DATE_FORMAT).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(AttributeValue::Date)
        .unwrap_or(AttributeValue::Null)
}

fn parse_storage_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();

    STORAGE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| parse_storage_datetime(trimmed).map(|dt| dt.date()))
}

// ============================================================================
// MONEY & NUMERIC
// ============================================================================

/// `1234.5` → `R$ 1.234,50`; non-numeric → `R$ 0,00`
pub fn money_to_presentation(value: &AttributeValue) -> AttributeValue {
    match numeric_value(value) {
        Some(n) => AttributeValue::String(format!("{} {}", CURRENCY_PREFIX, format_decimal(n))),
        None => AttributeValue::String(EMPTY_MONEY.to_string()),
    }
}

/// `R$ 1.234,50` → `"1234.50"`; numeric input unchanged; otherwise `0`
pub fn money_to_storage(value: &AttributeValue) -> AttributeValue {
    decimal_to_storage(value, Some(CURRENCY_PREFIX))
}

/// `1234.5` → `1.234,50`; non-numeric → `0,00`
pub fn numeric_to_presentation(value: &AttributeValue) -> AttributeValue {
    match numeric_value(value) {
        Some(n) => AttributeValue::String(format_decimal(n)),
        None => AttributeValue::String(EMPTY_NUMERIC.to_string()),
    }
}

/// `1.234,50` → `"1234.50"`; numeric input unchanged; otherwise `0`
pub fn numeric_to_storage(value: &AttributeValue) -> AttributeValue {
    decimal_to_storage(value, None)
}

fn decimal_to_storage(value: &AttributeValue, prefix: Option<&str>) -> AttributeValue {
    match value {
        AttributeValue::String(s) if s.contains(',') => {
            let stripped = match prefix {
                Some(prefix) => s.replace(prefix, ""),
                None => s.clone(),
            };
            // Drop thousands separators, then swap the decimal comma
            let normalized = stripped.replace('.', "").replace(',', ".");
            AttributeValue::String(normalized.trim().to_string())
        }
        AttributeValue::String(s) if is_numeric_str(s) => value.clone(),
        AttributeValue::Integer(_) => value.clone(),
        AttributeValue::Float(f) if f.is_finite() => value.clone(),
        _ => AttributeValue::Integer(0),
    }
}

/// Numbers, and strings holding a plain decimal number
pub fn numeric_value(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Integer(i) => Some(*i as f64),
        AttributeValue::Float(f) if f.is_finite() => Some(*f),
        AttributeValue::String(s) if is_numeric_str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Optional sign, digits, optional fraction and exponent; surrounding
/// whitespace allowed. Rejects `inf`/`NaN` spellings and comma decimals.
pub fn is_numeric_str(s: &str) -> bool {
    let trimmed = s.trim();

    !trimmed.is_empty()
        && trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && trimmed.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// Two decimals, `.` thousands separator, `,` decimal separator.
///
/// Rounds half away from zero on the decimal value, so `1.005` gives `1,01`.
pub fn format_decimal(value: f64) -> String {
    let cents = round_half_away(value.abs() * 100.0);
    let rendered = format!("{:.2}", cents / 100.0);
    let (units, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let sign = if value < 0.0 && cents > 0.0 { "-" } else { "" };

    format!("{}{},{}", sign, group_thousands(units), fraction)
}

/// Trim to 15 significant digits, then round half away from zero.
///
/// The trim absorbs binary noise (`1.005 * 100` is `100.49999999999999`)
/// without pulling genuinely sub-half values such as `0.4999999` upward.
fn round_half_away(scaled: f64) -> f64 {
    format!("{:.14e}", scaled)
        .parse::<f64>()
        .unwrap_or(scaled)
        .round()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    grouped
}

// ============================================================================
// BOOLEAN
// ============================================================================

/// Values loosely equal to 1 → `Sim`; everything else → `Não`
pub fn boolean_to_presentation(value: &AttributeValue) -> AttributeValue {
    let truthy = match value {
        AttributeValue::Boolean(b) => *b,
        AttributeValue::Integer(i) => *i == 1,
        AttributeValue::Float(f) => *f == 1.0,
        AttributeValue::String(s) => is_numeric_str(s) && s.trim().parse::<f64>().map(|n| n == 1.0).unwrap_or(false),
        AttributeValue::Null | AttributeValue::Date(_) => false,
    };

    let label = if truthy { YES } else { NO };
    AttributeValue::String(label.to_string())
}

/// `Sim`, `1`, `"true"`, `true` → `1`; everything else → `0`
pub fn boolean_to_storage(value: &AttributeValue) -> AttributeValue {
    let truthy = match value {
        AttributeValue::String(s) => s == YES || s == "true",
        AttributeValue::Integer(i) => *i == 1,
        AttributeValue::Boolean(b) => *b,
        _ => false,
    };

    AttributeValue::Integer(i64::from(truthy))
}

// ============================================================================
// TESTS
// ============================================================================

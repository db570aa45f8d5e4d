//! Canonicalization applied at every ingestion boundary.
//!
//! Joins across the three input tables are keyed on the canonical SKU string,
//! so these rules must be applied consistently or rows silently drop out of
//! the joins.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::types::{DataQuality, Money, Qty};

/// Largest float that still converts to i64 without losing integer precision.
const MAX_EXACT_INT: f64 = 9.0e15;

/// Canonical SKU identity: numeric-looking identifiers are normalized to
/// integer string form ("1023.0" and "001023" both become "1023"); anything
/// else is the trimmed string as-is.
///
/// Idempotent: `canon_item(canon_item(x)) == canon_item(x)`.
pub fn canon_item(raw: &str) -> String {
    let s = raw.trim();
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT {
            return format!("{}", f as i64);
        }
    }
    s.to_string()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Parse a date-ish string and truncate to the first of its month.
/// Returns None for anything unparseable.
pub fn canon_month(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return first_of_month(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return first_of_month(d);
        }
    }
    // Bare "YYYY-MM" months, as exported by some sheets
    if s.len() == 7 && s.as_bytes()[4] == b'-' {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return first_of_month(d);
        }
    }
    None
}

fn first_of_month(d: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1)
}

/// Parse a quantity field, stripping thousands separators and currency
/// noise. Returns None when nothing numeric remains.
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Quantity coercion for sum columns: unparseable values become zero, never
/// null, so downstream sums stay well-defined. Failures are counted.
pub fn coerce_quantity(raw: &str, quality: &mut DataQuality) -> Qty {
    match parse_quantity(raw) {
        Some(q) => q,
        None => {
            if !raw.trim().is_empty() {
                quality.unparseable_quantities += 1;
            }
            Decimal::ZERO
        }
    }
}

/// Price coercion for average columns: unparseable values stay out of the
/// mean instead of dragging it to zero. Failures are counted.
pub fn coerce_price(raw: &str, quality: &mut DataQuality) -> Option<Money> {
    let parsed = parse_quantity(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        quality.unparseable_prices += 1;
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_canon_item_strips_float_artifacts() {
        assert_eq!(canon_item("1023"), "1023");
        assert_eq!(canon_item("1023.0"), "1023");
        assert_eq!(canon_item("1023.00"), "1023");
        assert_eq!(canon_item(" 001023 "), "1023");
    }

    #[test]
    fn test_canon_item_keeps_non_numeric() {
        assert_eq!(canon_item("ABC-1"), "ABC-1");
        assert_eq!(canon_item("  ABC-1  "), "ABC-1");
        assert_eq!(canon_item("10.5"), "10.5");
        assert_eq!(canon_item(""), "");
    }

    #[test]
    fn test_canon_item_is_idempotent() {
        for raw in ["1023.0", "ABC-1", "10.5", "0", "-42.0", "nan"] {
            let once = canon_item(raw);
            assert_eq!(canon_item(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_canon_month_truncates_to_first() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(canon_month("2025-03-17"), Some(d));
        assert_eq!(canon_month("2025-03-17 08:30:00"), Some(d));
        assert_eq!(canon_month("17/03/2025"), Some(d));
        assert_eq!(canon_month("2025-03"), Some(d));
    }

    #[test]
    fn test_canon_month_unparseable_is_none() {
        assert_eq!(canon_month(""), None);
        assert_eq!(canon_month("not a date"), None);
        assert_eq!(canon_month("2025-13-01"), None);
    }

    #[test]
    fn test_parse_quantity_strips_separators() {
        assert_eq!(parse_quantity("1,234.5"), Some(dec!(1234.5)));
        assert_eq!(parse_quantity("$ 1,000"), Some(dec!(1000)));
        assert_eq!(parse_quantity("12"), Some(dec!(12)));
        assert_eq!(parse_quantity("junk"), None);
    }

    #[test]
    fn test_coerce_quantity_defaults_to_zero_and_counts() {
        let mut q = DataQuality::default();
        assert_eq!(coerce_quantity("n/a", &mut q), Decimal::ZERO);
        assert_eq!(q.unparseable_quantities, 1);
        // Empty cells are ordinary missing data, not a quality signal
        assert_eq!(coerce_quantity("", &mut q), Decimal::ZERO);
        assert_eq!(q.unparseable_quantities, 1);
    }

    #[test]
    fn test_coerce_price_keeps_missing_out_of_mean() {
        let mut q = DataQuality::default();
        assert_eq!(coerce_price("10.50", &mut q), Some(dec!(10.50)));
        assert_eq!(coerce_price("??", &mut q), None);
        assert_eq!(q.unparseable_prices, 1);
    }
}

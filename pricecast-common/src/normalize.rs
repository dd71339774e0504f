//! Price and rating normalization
//!
//! Catalog exports carry prices as display strings ("₹1,299") and rating
//! columns with free-text placeholders ("Get", "N/A"). These helpers turn
//! both into plain `f64` values before anything else sees them.
//!
//! Prices are strict: a value that cannot be read is a [`ParseError`].
//! Ratings are lenient: anything unreadable counts as "no rating" (`0.0`).

use crate::error::ParseError;

/// Glyphs stripped from the front of price strings
const CURRENCY_GLYPHS: &[char] = &['₹', '$', '€', '£'];

const THOUSANDS_SEPARATOR: char = ',';

/// A cell value as it arrives from a dataset, before normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(text: &'a str) -> Self {
        RawValue::Text(text)
    }
}

impl From<f64> for RawValue<'_> {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl<'a, T: Into<RawValue<'a>>> From<Option<T>> for RawValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Missing, Into::into)
    }
}

/// Normalize a price to a finite `f64`.
///
/// Text has currency glyphs and thousands separators removed and is trimmed
/// before parsing. Numbers pass through unchanged.
///
/// # Examples
/// ```
/// use pricecast_common::normalize::normalize_price;
///
/// assert_eq!(normalize_price("₹12,345.67").unwrap(), 12345.67);
/// assert_eq!(normalize_price(499.0).unwrap(), 499.0);
/// assert!(normalize_price("call for price").is_err());
/// ```
pub fn normalize_price<'a>(value: impl Into<RawValue<'a>>) -> Result<f64, ParseError> {
    match value.into() {
        RawValue::Number(number) => {
            if number.is_finite() {
                Ok(number)
            } else {
                Err(ParseError::NotFinite {
                    raw: number.to_string(),
                })
            }
        }
        RawValue::Text(text) => {
            let stripped: String = text
                .chars()
                .filter(|c| !CURRENCY_GLYPHS.contains(c) && *c != THOUSANDS_SEPARATOR)
                .collect();

            let parsed: f64 = stripped
                .trim()
                .parse()
                .map_err(|_| ParseError::NotANumber {
                    raw: text.to_string(),
                })?;

            if parsed.is_finite() {
                Ok(parsed)
            } else {
                Err(ParseError::NotFinite {
                    raw: text.to_string(),
                })
            }
        }
        RawValue::Missing => Err(ParseError::Missing),
    }
}

/// Normalize a rating or rating count, falling back to `0.0`.
///
/// Only surrounding whitespace is removed. Grouped counts such as "2,255"
/// are not valid numbers here and become `0.0`, like every other
/// unreadable value.
///
/// # Examples
/// ```
/// use pricecast_common::normalize::normalize_rating;
///
/// assert_eq!(normalize_rating("4.3"), 4.3);
/// assert_eq!(normalize_rating("N/A"), 0.0);
/// assert_eq!(normalize_rating(""), 0.0);
/// ```
pub fn normalize_rating<'a>(value: impl Into<RawValue<'a>>) -> f64 {
    let parsed = match value.into() {
        RawValue::Number(number) => Some(number),
        RawValue::Text(text) => text.trim().parse::<f64>().ok(),
        RawValue::Missing => None,
    };

    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

//! Lenient numeric ingestion.
//!
//! Prices and volumes arrive either as JSON numbers or as strings carrying
//! thousands separators (`"1,234.50"`, `"2,000"`). Separators are stripped
//! before conversion.

use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumericError {
    #[error("empty numeric value")]
    Empty,
    #[error("invalid number `{0}`")]
    Invalid(String),
    #[error("`{0}` is not a whole number")]
    Fractional(String),
    #[error("`{0}` does not fit a 64-bit volume")]
    OutOfRange(String),
}

fn strip_separators(text: &str) -> String {
    text.trim().chars().filter(|c| *c != ',').collect()
}

/// Parse a price such as `"1,234.50"`.
pub fn parse_price(text: &str) -> Result<f64, NumericError> {
    let cleaned = strip_separators(text);
    if cleaned.is_empty() {
        return Err(NumericError::Empty);
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(NumericError::Invalid(text.to_string())),
    }
}

/// Parse a share count such as `"2,000"`; `"2,000.00"` is accepted, `"2.5"` is not.
pub fn parse_volume(text: &str) -> Result<i64, NumericError> {
    let cleaned = strip_separators(text);
    if cleaned.is_empty() {
        return Err(NumericError::Empty);
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return Ok(v);
    }
    let f = cleaned
        .parse::<f64>()
        .map_err(|_| NumericError::Invalid(text.to_string()))?;
    whole_number(f, text)
}

/// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
fn whole_number(f: f64, text: &str) -> Result<i64, NumericError> {
    if !f.is_finite() {
        return Err(NumericError::Invalid(text.to_string()));
    }
    if f.fract() != 0.0 {
        return Err(NumericError::Fractional(text.to_string()));
    }
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(NumericError::OutOfRange(text.to_string()));
    }
    Ok(f as i64)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

pub fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(v) => Ok(v as f64),
        Lenient::Float(v) => Ok(v),
        Lenient::Text(s) => parse_price(&s).map_err(de::Error::custom),
    }
}

pub fn de_volume<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(v) => Ok(v),
        Lenient::Float(v) => whole_number(v, &v.to_string()).map_err(de::Error::custom),
        Lenient::Text(s) => parse_volume(&s).map_err(de::Error::custom),
    }
}

//! Numeric coercion for values entering the model from editors and documents.
//!
//! Malformed numbers never propagate as errors: anything that is not a
//! finite, non-negative number collapses to `0`. Board coordinates may be
//! negative and fall back to their neutral value instead.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Clamp a raw number to a finite, non-negative value.
pub fn coerce_number(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Clamp a raw number to a whole, non-negative count.
pub fn coerce_count(value: f64) -> u32 {
    let value = coerce_number(value).trunc();
    if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

/// Parse free text as a number, falling back to `0`.
pub fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().map(coerce_number).unwrap_or(0.0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Loose {
    fn into_number(self) -> f64 {
        match self {
            Loose::Number(value) => coerce_number(value),
            Loose::Text(text) => parse_number(&text),
            Loose::Other(_) => 0.0,
        }
    }

    fn into_finite(self) -> Option<f64> {
        let value = match self {
            Loose::Number(value) => value,
            Loose::Text(text) => text.trim().parse::<f64>().ok()?,
            Loose::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// `deserialize_with` helper for non-negative numeric fields.
pub fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.into_number())
}

/// `deserialize_with` helper for signed coordinates; unreadable input is `0`.
pub fn signed<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.into_finite().unwrap_or(0.0))
}

/// `deserialize_with` helper for zoom factors; anything not positive is `1`.
pub fn zoom<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?
        .into_finite()
        .filter(|k| *k > 0.0)
        .unwrap_or(1.0))
}

/// `deserialize_with` helper for count fields.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_count(Loose::deserialize(deserializer)?.into_number()))
}

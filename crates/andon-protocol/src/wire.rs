//! Lenient scalar decoding
//!
//! The backend is loose about scalar types: flags and counters arrive as
//! strings most of the time, but numbers and nulls show up too.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Flag(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Flag(true) => "1".to_string(),
            Scalar::Flag(false) => INACTIVE.to_string(),
        }
    }
}

/// Wire value of an inactive alarm flag
pub(crate) const INACTIVE: &str = "0";

/// Default for absent flags. A missing or null flag always reads as
/// inactive, so a partial record can never raise an alarm on its own.
pub(crate) fn inactive() -> String {
    INACTIVE.to_string()
}

/// String field that may arrive as a number, bool or null. Null maps to "0".
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .unwrap_or_else(inactive))
}

/// Optional string field that may arrive as a number.
pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text))
}

/// Number that may arrive as a numeric string.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n as f64)),
        Some(Scalar::Float(f)) => Ok(Some(f)),
        Some(Scalar::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not a number: {s:?}"))),
        Some(Scalar::Flag(_)) => Err(serde::de::Error::custom("expected a number, got a bool")),
    }
}

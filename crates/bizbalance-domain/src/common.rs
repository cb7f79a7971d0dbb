//! Shared traits, identifiers, and serde helpers for dashboard records.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque identifier of a record, unique within its owning collection.
///
/// Stored as a string so identifiers written by earlier versions of the
/// dashboard (plain counters such as `"1"`) keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Produces a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to address a record from the shell.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Exposes a stable identifier for entities stored in a collection.
pub trait Identifiable {
    fn id(&self) -> &RecordId;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Largest magnitude an amount may carry. Sums of bounded amounts stay finite.
pub const MAX_AMOUNT: f64 = 1e15;

/// Maps anything that is not a finite number to zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Accepts finite amounts up to [`MAX_AMOUNT`] in magnitude; anything else is zero.
pub fn bounded_amount(value: f64) -> f64 {
    let value = finite_or_zero(value);
    if value.abs() > MAX_AMOUNT {
        0.0
    } else {
        value
    }
}

/// Reads an amount that may be absent, `null`, a number, or a numeric string.
///
/// Browser stores serialize `NaN` as `null`, so every non-numeric shape
/// collapses to `0.0` instead of failing the whole document.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> de::Visitor<'de> for AmountVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number, numeric string, or null")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(bounded_amount(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(bounded_amount(value as f64))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(bounded_amount(value as f64))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            Ok(value
                .trim()
                .parse::<f64>()
                .map(bounded_amount)
                .unwrap_or(0.0))
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<f64, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

use serde_json::Value;
use tracing::debug;

use crate::core::{AnalysisResult, GroundingSource, ScanError, ScanOutcome};
use crate::llm::TOTAL_VENDORS;

/// Parse a located payload into a scan outcome.
///
/// The payload must be an object with a `security` object; beyond that only
/// JSON syntax is enforced. Missing or mistyped fields degrade to their
/// defaults, and `totalVendors` is always overwritten with the engine count.
pub fn coerce(payload: &str, sources: Vec<GroundingSource>) -> Result<ScanOutcome, ScanError> {
    let value: Value = serde_json::from_str(payload)?;
    if !value.get("security").is_some_and(Value::is_object) {
        return Err(ScanError::MissingReport);
    }

    let mut data: AnalysisResult = lenient::from_value(value);
    if data.security.total_vendors != TOTAL_VENDORS {
        debug!(
            "Overriding model-reported totalVendors {} with {}",
            data.security.total_vendors, TOTAL_VENDORS
        );
    }
    data.security.total_vendors = TOTAL_VENDORS;

    Ok(ScanOutcome { data, sources })
}

/// `deserialize_with` helpers that never reject a value.
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Objects deserialize normally; anything else becomes `T::default()`.
    pub fn from_value<T: DeserializeOwned + Default>(value: Value) -> T {
        if !value.is_object() {
            return T::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(from_value(Value::deserialize(deserializer)?))
    }

    /// Keeps object elements in order and drops everything else.
    pub fn sequence<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .map(from_value)
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0.0,
        })
    }

    /// Non-negative integer; fractions round, negatives and garbage become 0.
    pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0.0,
        };
        Ok(if number.is_finite() && number > 0.0 {
            number.round().min(u32::MAX as f64) as u32
        } else {
            0
        })
    }
}

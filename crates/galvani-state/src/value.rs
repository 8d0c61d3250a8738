use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A constraint value: numeric target or qualitative tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Num(f64),
    Text(String),
}

impl Value {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Num(_) => None,
            Value::Text(s) => Some(s.as_str()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// User-supplied target requirements, keyed by constraint name.
pub type ConstraintMap = BTreeMap<String, Value>;

/// Physical component parameters, keyed by parameter name.
pub type SizingMap = BTreeMap<String, f64>;

/// Estimated performance metrics, keyed by metric name.
pub type MetricsMap = BTreeMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Num(3.5).as_num(), Some(3.5));
        assert_eq!(Value::Num(3.5).as_text(), None);
        assert_eq!(Value::from("rc_lowpass").as_text(), Some("rc_lowpass"));
        assert_eq!(Value::from("rc_lowpass").as_num(), None);
    }

    #[test]
    fn test_untagged_json_shape() {
        let mut constraints = ConstraintMap::new();
        constraints.insert("circuit_type".into(), "rc_lowpass".into());
        constraints.insert("target_fc_hz".into(), 1000.0.into());

        let json = serde_json::to_string(&constraints).unwrap();
        assert_eq!(json, r#"{"circuit_type":"rc_lowpass","target_fc_hz":1000.0}"#);

        let back: ConstraintMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, constraints);
    }
}

//! Typed leaf values carried by get and set requests.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A value attached to an update.
///
/// Scalars map onto JSON scalars; the two JSON variants carry encoded JSON
/// text supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypedValue {
    /// UTF-8 string.
    StringVal(String),
    /// Signed 64-bit integer.
    IntVal(i64),
    /// Unsigned 64-bit integer.
    UintVal(u64),
    /// Boolean.
    BoolVal(bool),
    /// 32-bit float.
    FloatVal(f32),
    /// 64-bit float.
    DoubleVal(f64),
    /// ASCII text.
    AsciiVal(String),
    /// Plain JSON document.
    JsonVal(Vec<u8>),
    /// RFC 7951 (JSON-IETF) document.
    JsonIetfVal(Vec<u8>),
}

impl TypedValue {
    /// Create a JSON-IETF value from encoded JSON text.
    pub fn json_ietf(bytes: impl Into<Vec<u8>>) -> Self {
        TypedValue::JsonIetfVal(bytes.into())
    }

    /// Check whether this value holds an encoded JSON document.
    pub fn is_json(&self) -> bool {
        matches!(self, TypedValue::JsonVal(_) | TypedValue::JsonIetfVal(_))
    }

    /// Convert to the JSON payload the backend consumes.
    ///
    /// Encoded JSON documents are parsed; non-finite floats are rejected.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        use serde_json::Value;

        let value = match self {
            TypedValue::StringVal(s) | TypedValue::AsciiVal(s) => Value::String(s.clone()),
            TypedValue::IntVal(i) => Value::from(*i),
            TypedValue::UintVal(u) => Value::from(*u),
            TypedValue::BoolVal(b) => Value::Bool(*b),
            TypedValue::FloatVal(f) => float_to_json(f64::from(*f))?,
            TypedValue::DoubleVal(f) => float_to_json(*f)?,
            TypedValue::JsonVal(bytes) | TypedValue::JsonIetfVal(bytes) => {
                serde_json::from_slice(bytes)
                    .map_err(|e| Error::InvalidValue(format!("malformed JSON content: {}", e)))?
            }
        };
        Ok(value)
    }
}

fn float_to_json(f: f64) -> Result<serde_json::Value> {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .ok_or_else(|| Error::InvalidValue(format!("{} is not representable in JSON", f)))
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::StringVal(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::StringVal(s)
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::IntVal(i)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::BoolVal(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_to_json() {
        assert_eq!(TypedValue::from("up").to_json().unwrap(), json!("up"));
        assert_eq!(TypedValue::IntVal(-3).to_json().unwrap(), json!(-3));
        assert_eq!(TypedValue::UintVal(9000).to_json().unwrap(), json!(9000));
        assert_eq!(TypedValue::BoolVal(true).to_json().unwrap(), json!(true));
        assert_eq!(TypedValue::FloatVal(1.5).to_json().unwrap(), json!(1.5));
    }

    #[test]
    fn test_json_ietf_parsed() {
        let value = TypedValue::json_ietf(r#"{"openconfig-vlan:vlan": [{"vlan-id": 10}]}"#);
        assert!(value.is_json());
        assert_eq!(
            value.to_json().unwrap(),
            json!({"openconfig-vlan:vlan": [{"vlan-id": 10}]})
        );
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = TypedValue::json_ietf("{not json").to_json().unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(TypedValue::DoubleVal(f64::NAN).to_json().is_err());
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(TypedValue::IntVal(7)).unwrap();
        assert_eq!(json, json!({"int_val": 7}));
    }
}

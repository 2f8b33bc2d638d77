//! JSON interop for [`Value`].
//!
//! Decoding goes bytes -> `serde_json::Value` -> [`Value`] -> typed
//! destination; encoding runs the same chain backwards. Both directions go
//! through [`crate::convert`], so path annotations apply.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::converter::convert;
use crate::error::ConvertError;
use crate::handle::Structural;
use crate::value::Value;

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}

/// Integer-keyed tables become objects with decimal keys; non-finite floats
/// become `null`.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::UInt(u) => serde_json::Value::from(u),
            Value::Float(x) => serde_json::Number::from_f64(x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Table(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Serializes in place, with the same mapping as the conversion into
/// `serde_json::Value` above.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            Value::Float(_) => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
            Value::Table(map) => {
                serializer.collect_map(map.iter().map(|(k, v)| (k.to_string(), v)))
            }
        }
    }
}

pub fn from_json(bytes: &[u8]) -> Result<Value, JsonError> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;
    Ok(Value::from(json))
}

pub fn to_json(value: &Value) -> Result<Vec<u8>, JsonError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode JSON bytes into an open tree and convert it into `dst`.
pub fn decode_into(dst: &mut dyn Structural, bytes: &[u8]) -> Result<(), JsonError> {
    let tree = from_json(bytes)?;
    convert(dst, &tree)?;
    Ok(())
}

/// Convert `src` into an open tree and serialize it as JSON.
pub fn encode(src: &dyn Structural) -> Result<Vec<u8>, JsonError> {
    let mut tree = Value::Null;
    convert(&mut tree, src)?;
    to_json(&tree)
}

use std::collections::BTreeMap;

use crate::handle::{OpenSlot, Scalar, Structural, View, ViewMut};
use crate::key::{Key, KeyKind};

/// Open value: a tree whose shape is only known at runtime.
///
/// This is what wire decoders produce and what typed records are converted
/// into before serialization. `Null` is the absent state.
///
/// Mappings come in two key flavors: `Object` for string keys (produced from
/// records and string-keyed mappings) and `Table` for integer keys (produced
/// from sequences and integer-keyed mappings).
///
/// A round trip through `Value` is not lossless for optional fields. An
/// absent `Option` becomes `Null`, and converting `Null` back into an absent
/// `Option` allocates it and zeroes the interior: `None` comes back as
/// `Some(T::default())`. Only an absent `Option` source keeps an absent
/// destination absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Table(BTreeMap<i64, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable name of the current variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Table(_) => "table",
        }
    }

    /// Child at `key`. String keys address objects, integer keys address
    /// arrays and tables; a numeric string also addresses an array or table.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Value::Object(m), Key::Str(s)) => m.get(s),
            (Value::Object(m), Key::Int(i)) => m.get(&i.to_string()),
            (Value::Table(m), Key::Int(i)) => m.get(i),
            (Value::Table(m), Key::Str(s)) => s.parse::<i64>().ok().and_then(|i| m.get(&i)),
            (Value::Array(v), key) => key.as_index().and_then(|i| v.get(i)),
            _ => None,
        }
    }

    /// Child at a string key.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.get(&Key::Str(name.to_string()))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&BTreeMap<i64, Value>> {
        match self {
            Value::Table(m) => Some(m),
            _ => None,
        }
    }
}

impl Structural for Value {
    fn view(&self) -> View<'_> {
        View::Open(match self {
            Value::Null => None,
            Value::Bool(b) => Some(b as &dyn Structural),
            Value::Int(i) => Some(i as &dyn Structural),
            Value::UInt(u) => Some(u as &dyn Structural),
            Value::Float(x) => Some(x as &dyn Structural),
            Value::String(s) => Some(s as &dyn Structural),
            Value::Array(v) => Some(v as &dyn Structural),
            Value::Object(m) => Some(m as &dyn Structural),
            Value::Table(m) => Some(m as &dyn Structural),
        })
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Open(self)
    }

    fn set_zero(&mut self) {
        *self = Value::Null;
    }
}

impl OpenSlot for Value {
    fn is_absent(&self) -> bool {
        self.is_null()
    }

    fn interior_mut(&mut self) -> Option<&mut dyn Structural> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b as &mut dyn Structural),
            Value::Int(i) => Some(i as &mut dyn Structural),
            Value::UInt(u) => Some(u as &mut dyn Structural),
            Value::Float(x) => Some(x as &mut dyn Structural),
            Value::String(s) => Some(s as &mut dyn Structural),
            Value::Array(v) => Some(v as &mut dyn Structural),
            Value::Object(m) => Some(m as &mut dyn Structural),
            Value::Table(m) => Some(m as &mut dyn Structural),
        }
    }

    fn manufacture(&mut self, kind: KeyKind) {
        *self = match kind {
            KeyKind::Str => Value::Object(BTreeMap::new()),
            KeyKind::Int => Value::Table(BTreeMap::new()),
        };
    }

    fn assign(&mut self, scalar: &Scalar<'_>) {
        *self = Value::from(*scalar);
    }
}

impl From<Scalar<'_>> for Value {
    fn from(scalar: Scalar<'_>) -> Self {
        match scalar {
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::Int(i),
            Scalar::UInt(u) => Value::UInt(u),
            Scalar::Float(x) => Value::Float(x),
            Scalar::Char(c) => Value::String(c.to_string()),
            Scalar::Str(s) => Value::String(s.to_string()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

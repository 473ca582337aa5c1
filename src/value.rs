use std::{collections::BTreeMap, fmt, rc::Rc};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Attribute value stored in a record.
///
/// Primitives are unboxed; heap-backed variants use `Rc` so cloning a value
/// into a materialized record is O(1). Values are immutable after
/// construction, so the shared `Rc` data is never observed mid-mutation and
/// value graphs stay acyclic.
///
/// `None` is a real stored value, distinct from an attribute that was never
/// assigned: reading an unassigned name yields `Option::None` at the record
/// API, while a stored `Value::None` reads back as `Some(&Value::None)`.
///
/// Hashes are keyed by `String` and backed by `BTreeMap` so rendering and
/// serialization are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// UTF-8 string value.
    String(Rc<str>),
    /// Explicitly-stored absence of a value.
    None,
    /// Ordered collection of values.
    Array(Rc<Vec<Value>>),
    /// String-keyed map of values.
    Hash(Rc<BTreeMap<String, Value>>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::None => write!(f, "None"),
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Hash(pairs) => {
                let items: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}

impl Value {
    /// Returns the canonical type label used in renderings and assertions.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Int",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Bool",
            Value::String(_) => "String",
            Value::None => "None",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
        }
    }

    /// Converts a JSON value into a fixture value.
    ///
    /// JSON numbers outside the `i64` range and all non-integer numbers map
    /// to `Float`; JSON `null` maps to `Value::None`.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(v) => Value::Boolean(*v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(Rc::from(s.as_str())),
            serde_json::Value::Array(items) => {
                Value::Array(Rc::new(items.iter().map(Value::from_json).collect()))
            }
            serde_json::Value::Object(fields) => Value::Hash(Rc::new(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            )),
        }
    }

    /// Converts this value into a JSON value.
    ///
    /// Non-finite floats have no JSON representation and map to `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Boolean(v) => serde_json::Value::from(*v),
            Value::String(v) => serde_json::Value::from(v.as_ref()),
            Value::None => serde_json::Value::Null,
            Value::Array(elements) => {
                serde_json::Value::Array(elements.iter().map(Value::to_json).collect())
            }
            Value::Hash(pairs) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Boolean(v) => serializer.serialize_bool(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::None => serializer.serialize_unit(),
            Value::Array(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements.iter() {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Hash(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Rc::from(v.as_str()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(Rc::new(v))
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Hash(Rc::new(v))
    }
}

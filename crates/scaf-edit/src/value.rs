//! The structured value model shared by all editors
//!
//! A closed set of value shapes the editors can set, append, or merge into a
//! target file. `Raw` carries verbatim source text (a function call, a lambda)
//! that must be emitted unevaluated; only the PHP source editors can consume
//! it.

use serde::{Deserialize, Serialize};

/// An editable value.
///
/// Maps preserve insertion order and keep keys unique; inserting an existing
/// key replaces the value in place without moving the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    /// Verbatim source text, emitted as-is by the PHP editors.
    Raw(String),
}

impl Value {
    /// Shorthand for a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Shorthand for a raw source expression.
    pub fn raw(s: impl Into<String>) -> Self {
        Self::Raw(s.into())
    }

    /// Build a map from key/value pairs, keeping first-seen key positions.
    pub fn map(pairs: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
        let mut entries: Vec<(String, Value)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
        Self::Map(entries)
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

/// Convert a value into its JSON representation.
///
/// Total over the variant set except `Raw`, which has no JSON encoding and is
/// reported with the document path it was aimed at.
pub fn to_json(value: &Value, path: &str) -> crate::Result<serde_json::Value> {
    use serde_json::Value as Json;

    Ok(match value {
        Value::Str(s) => Json::String(s.clone()),
        Value::Int(n) => Json::Number((*n).into()),
        Value::Float(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Bool(b) => Json::Bool(*b),
        Value::Null => Json::Null,
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|v| to_json(v, path))
                .collect::<crate::Result<Vec<_>>>()?,
        ),
        Value::Map(entries) => {
            let mut map = serde_json::Map::new();
            for (key, v) in entries {
                map.insert(key.clone(), to_json(v, path)?);
            }
            Json::Object(map)
        }
        Value::Raw(_) => {
            return Err(crate::Error::RawValueInDocument {
                path: path.to_string(),
            });
        }
    })
}

/// Convert a JSON value into the editor value model.
pub fn from_json(json: &serde_json::Value) -> Value {
    use serde_json::Value as Json;

    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Json::String(s) => Value::Str(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(from_json).collect()),
        Json::Object(map) => {
            Value::Map(map.iter().map(|(k, v)| (k.clone(), from_json(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_insertion_order() {
        let v = Value::map([("b", Value::Int(1)), ("a", Value::Int(2))]);
        let Value::Map(entries) = v else {
            panic!("expected map")
        };
        assert_eq!(entries[0].0, "b");
        assert_eq!(entries[1].0, "a");
    }

    #[test]
    fn test_map_duplicate_key_replaces_in_place() {
        let v = Value::map([
            ("a", Value::Int(1)),
            ("b", Value::Int(2)),
            ("a", Value::Int(3)),
        ]);
        let Value::Map(entries) = v else {
            panic!("expected map")
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("a".to_string(), Value::Int(3)));
    }

    #[test]
    fn test_raw_has_no_json_encoding() {
        let err = to_json(&Value::raw("env('APP_KEY')"), "app.key").unwrap_err();
        assert!(matches!(err, crate::Error::RawValueInDocument { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let v = Value::map([
            ("name", Value::str("demo")),
            ("count", Value::Int(3)),
            ("tags", Value::list([Value::str("a"), Value::str("b")])),
        ]);
        let json = to_json(&v, "").unwrap();
        assert_eq!(from_json(&json), v);
    }
}

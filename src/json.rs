//! Conversion between JSON documents and the merge value model.
//!
//! Used to express fixtures and layered config files as `Value`s and to read
//! merged results back as JSON.

use std::collections::BTreeMap;

use serde_json::{Map, Number};

use crate::value::{address_of, Key, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let entries: BTreeMap<Key, Value> =
                    map.into_iter().map(|(k, v)| (Key::Str(k), Value::from(v))).collect();
                Value::Mapping(entries)
            }
        }
    }
}

impl Value {
    /// Render as JSON.
    ///
    /// Records become objects, every sequence-like value becomes an array and
    /// references are followed. A reference revisited on the current path is
    /// rendered as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut path = Vec::new();
        self.to_json_inner(&mut path)
    }

    fn to_json_inner(&self, path: &mut Vec<usize>) -> serde_json::Value {
        match self {
            Value::Invalid | Value::Reference(None) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::UInt(u) => serde_json::Value::Number((*u).into()),
            Value::Float(x) => Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Record(r) => {
                let mut map = Map::new();
                for field in &r.fields {
                    map.insert(field.name.clone(), field.value.to_json_inner(path));
                }
                serde_json::Value::Object(map)
            }
            Value::Sequence(_) | Value::Fixed(_) | Value::Stream(_) => {
                let items = self.elements().unwrap_or_default();
                serde_json::Value::Array(items.into_iter().map(|v| v.to_json_inner(path)).collect())
            }
            Value::Mapping(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.to_string(), v.to_json_inner(path));
                }
                serde_json::Value::Object(map)
            }
            Value::Reference(Some(ptr)) => {
                let addr = address_of(ptr);
                if path.contains(&addr) {
                    return serde_json::Value::Null;
                }
                path.push(addr);
                let rendered = ptr.borrow().to_json_inner(path);
                path.pop();
                rendered
            }
        }
    }
}

//! Plain values produced by the decoder.
//!
//! A `PlainValue` carries no tracker type information: it is the tree a
//! caller walks after the server's `[type, payload]` tagging has been
//! stripped.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Detagged value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<PlainValue>),
    /// Key/value pairs in the order the server emitted them.
    ///
    /// Keys are kept exactly as sent, so integer, double and MAC keyed maps
    /// are all representable. Callers must not depend on the order.
    Map(Vec<(PlainValue, PlainValue)>),
}

impl PlainValue {
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed view of an integer value, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Unsigned view of an integer value, if it is non-negative.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(n) => Some(*n),
            Self::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Numeric view of any number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            Self::UInt(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PlainValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(PlainValue, PlainValue)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a string key in a map value.
    pub fn get(&self, key: &str) -> Option<&PlainValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Whether a map value holds the given string key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Walk a `/`-separated field path through nested maps.
    ///
    /// `"dot11.device/dot11.device.last_beaconed_ssid"` resolves the same
    /// way the server resolves field paths.
    pub fn pointer(&self, path: &str) -> Option<&PlainValue> {
        path.split('/')
            .filter(|seg| !seg.is_empty())
            .try_fold(self, |node, seg| node.get(seg))
    }

    /// Number of elements in an array or entries in a map.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Map(entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render a map key as a JSON object key.
    fn key_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::UInt(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Nil => "null".to_string(),
            Self::Bytes(b) => b.iter().map(|byte| format!("{byte:02x}")).collect(),
            other => other.to_json().to_string(),
        }
    }

    /// Convert to a JSON tree. Non-string map keys become strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Self::Nil => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(n) => Json::from(*n),
            Self::UInt(n) => Json::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Self::String(s) => Json::String(s.clone()),
            Self::Bytes(b) => Json::Array(b.iter().map(|byte| Json::from(*byte)).collect()),
            Self::Array(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.key_string(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PlainValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PlainValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PlainValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for PlainValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl Serialize for PlainValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::UInt(n) => serializer.serialize_u64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_bytes(b),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(&k.key_string(), v)?;
                }
                map.end()
            }
        }
    }
}

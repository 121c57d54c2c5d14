//! Tagged-value decoder.
//!
//! Converts the server's `[type, payload]` msgpack trees into [`PlainValue`]
//! trees:
//! - vectors decode element by element, keeping order
//! - every map variant decodes its values and keeps its keys unchanged
//! - MAC addresses keep only the first payload element
//! - every other tag passes its payload through
//!
//! Unknown tags and payloads of the wrong shape are decode errors.

use kismet_core::error::{KisError, KisResult};
use rmpv::Value;

use crate::tracker::{kind_name, TaggedValue, TrackerType};
use crate::value::PlainValue;

/// Parse a msgpack response body and strip its tracker tags.
pub fn decode_bytes(bytes: &[u8]) -> KisResult<PlainValue> {
    let mut reader = bytes;
    let value = rmpv::decode::read_value(&mut reader)?;
    if !reader.is_empty() {
        tracing::debug!(trailing = reader.len(), "ignoring bytes after msgpack value");
    }
    simplify(value)
}

/// Strip tracker tags from a parsed msgpack value.
pub fn simplify(value: Value) -> KisResult<PlainValue> {
    simplify_tagged(TaggedValue::from_msgpack(value)?)
}

/// Strip tags from an already split `[type, payload]` pair.
pub fn simplify_tagged(tagged: TaggedValue) -> KisResult<PlainValue> {
    let TaggedValue { tag, payload } = tagged;

    match tag {
        TrackerType::Vector => match payload {
            Value::Array(items) => items
                .into_iter()
                .map(simplify)
                .collect::<KisResult<Vec<_>>>()
                .map(PlainValue::Array),
            other => Err(shape_error(tag, &other)),
        },

        TrackerType::Map
        | TrackerType::IntMap
        | TrackerType::MacMap
        | TrackerType::StringMap
        | TrackerType::DoubleMap => match payload {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((plain_scalar(k)?, simplify(v)?)))
                .collect::<KisResult<Vec<_>>>()
                .map(PlainValue::Map),
            other => Err(shape_error(tag, &other)),
        },

        TrackerType::Mac => match payload {
            Value::Array(items) => match items.into_iter().next() {
                Some(first) => plain_scalar(first),
                None => Err(KisError::Decode("empty mac payload".into())),
            },
            other => Err(shape_error(tag, &other)),
        },

        TrackerType::String | TrackerType::Uuid => match payload {
            Value::String(_) | Value::Binary(_) | Value::Nil => plain_scalar(payload),
            other => Err(shape_error(tag, &other)),
        },

        TrackerType::Int8
        | TrackerType::UInt8
        | TrackerType::Int16
        | TrackerType::UInt16
        | TrackerType::Int32
        | TrackerType::UInt32
        | TrackerType::Int64
        | TrackerType::UInt64
        | TrackerType::Float
        | TrackerType::Double => match payload {
            Value::Integer(_) | Value::F32(_) | Value::F64(_) | Value::Boolean(_) => {
                plain_scalar(payload)
            }
            other => Err(shape_error(tag, &other)),
        },
    }
}

/// Convert an untagged msgpack scalar (a payload or a map key) as-is.
fn plain_scalar(value: Value) -> KisResult<PlainValue> {
    let plain = match value {
        Value::Nil => PlainValue::Nil,
        Value::Boolean(b) => PlainValue::Bool(b),
        Value::Integer(n) => match (n.as_u64(), n.as_i64()) {
            (Some(u), _) => PlainValue::UInt(u),
            (None, Some(i)) => PlainValue::Int(i),
            (None, None) => {
                return Err(KisError::Decode(format!("integer out of range: {n}")));
            }
        },
        Value::F32(f) => PlainValue::Float(f64::from(f)),
        Value::F64(f) => PlainValue::Float(f),
        // SSIDs and other raw radio fields arrive as str but need not be utf-8.
        Value::String(s) => match String::from_utf8(s.into_bytes()) {
            Ok(s) => PlainValue::String(s),
            Err(e) => PlainValue::Bytes(e.into_bytes()),
        },
        Value::Binary(b) => PlainValue::Bytes(b),
        other => {
            return Err(KisError::Decode(format!(
                "expected scalar, got {}",
                kind_name(&other)
            )));
        }
    };
    Ok(plain)
}

fn shape_error(tag: TrackerType, payload: &Value) -> KisError {
    KisError::Decode(format!(
        "{tag} element has {} payload",
        kind_name(payload)
    ))
}

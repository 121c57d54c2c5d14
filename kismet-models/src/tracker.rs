//! Tracker type tags and tagged wire values.

use std::fmt;

use kismet_core::error::{KisError, KisResult};
use rmpv::Value;

/// Type tag carried in the first slot of every serialized tracked element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TrackerType {
    String = 0,
    Int8 = 1,
    UInt8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Int64 = 7,
    UInt64 = 8,
    Float = 9,
    Double = 10,
    Mac = 11,
    Uuid = 12,
    Vector = 13,
    Map = 14,
    IntMap = 15,
    MacMap = 16,
    StringMap = 17,
    DoubleMap = 18,
}

impl TrackerType {
    /// Convert a wire code to a tag. Unknown codes are a decode error.
    pub fn from_code(code: u64) -> KisResult<Self> {
        let tag = match code {
            0 => Self::String,
            1 => Self::Int8,
            2 => Self::UInt8,
            3 => Self::Int16,
            4 => Self::UInt16,
            5 => Self::Int32,
            6 => Self::UInt32,
            7 => Self::Int64,
            8 => Self::UInt64,
            9 => Self::Float,
            10 => Self::Double,
            11 => Self::Mac,
            12 => Self::Uuid,
            13 => Self::Vector,
            14 => Self::Map,
            15 => Self::IntMap,
            16 => Self::MacMap,
            17 => Self::StringMap,
            18 => Self::DoubleMap,
            other => {
                return Err(KisError::Decode(format!("unknown tracker type {other}")));
            }
        };
        Ok(tag)
    }

    /// Get the wire code for this tag.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the payload is a key/value map.
    pub fn is_map(self) -> bool {
        matches!(
            self,
            Self::Map | Self::IntMap | Self::MacMap | Self::StringMap | Self::DoubleMap
        )
    }

    /// Whether the payload is a single scalar passed through unchanged.
    pub fn is_scalar(self) -> bool {
        !self.is_map() && !matches!(self, Self::Vector | Self::Mac)
    }

    /// Whether the tag carries a fixed-width integer.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::UInt8
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
        )
    }
}

impl fmt::Display for TrackerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Mac => "mac",
            Self::Uuid => "uuid",
            Self::Vector => "vector",
            Self::Map => "map",
            Self::IntMap => "intmap",
            Self::MacMap => "macmap",
            Self::StringMap => "stringmap",
            Self::DoubleMap => "doublemap",
        };
        f.write_str(name)
    }
}

/// A `[type, payload]` pair exactly as it came off the wire.
///
/// Tagged values are built only from freshly parsed msgpack and consumed
/// once by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedValue {
    pub tag: TrackerType,
    pub payload: Value,
}

impl TaggedValue {
    /// Pair an already known tag with its payload.
    pub fn new(tag: TrackerType, payload: Value) -> Self {
        Self { tag, payload }
    }

    /// Split a raw msgpack value into its tag and payload.
    ///
    /// The value must be a two-element array whose first element is a
    /// known tracker type code.
    pub fn from_msgpack(value: Value) -> KisResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(KisError::Decode(format!(
                    "expected [type, payload] pair, got {}",
                    kind_name(&other)
                )));
            }
        };

        let [code, payload]: [Value; 2] = items.try_into().map_err(|items: Vec<Value>| {
            KisError::Decode(format!(
                "expected [type, payload] pair, got array of {}",
                items.len()
            ))
        })?;

        let code = code.as_u64().ok_or_else(|| {
            KisError::Decode(format!("tracker type must be an unsigned integer, got {code}"))
        })?;

        Ok(Self {
            tag: TrackerType::from_code(code)?,
            payload,
        })
    }
}

/// Short name for a msgpack value kind, used in decode errors.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::F32(_) => "float32",
        Value::F64(_) => "float64",
        Value::String(_) => "string",
        Value::Binary(_) => "binary",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Ext(..) => "ext",
    }
}

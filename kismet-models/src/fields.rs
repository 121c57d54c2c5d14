//! Field selection and regex filter specifications.
//!
//! Several endpoints accept a list of fields to return. A field is either a
//! path such as `kismet.device.base.signal/kismet.common.signal.last_signal_dbm`
//! or a `[path, alias]` pair; the returned device then carries the field
//! under the final path element or under the alias.
//!
//! Filters are `[multifield, regex]` pairs. A multifield path expands
//! value-maps and vectors found along the way, and a device is included
//! when it matches any of the filters.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

/// One entry of a field selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// A field name or path, returned under its final element.
    Path(String),
    /// A field path returned under `alias`.
    Aliased { path: String, alias: String },
}

impl FieldSpec {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Aliased {
            path: path.into(),
            alias: alias.into(),
        }
    }

    /// The key this field will appear under in returned records.
    pub fn output_name(&self) -> &str {
        match self {
            Self::Path(path) => path.rsplit('/').next().unwrap_or(path),
            Self::Aliased { alias, .. } => alias,
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<(&str, &str)> for FieldSpec {
    fn from((path, alias): (&str, &str)) -> Self {
        Self::aliased(path, alias)
    }
}

impl Serialize for FieldSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Path(path) => serializer.serialize_str(path),
            Self::Aliased { path, alias } => {
                let mut tup = serializer.serialize_tuple(2)?;
                tup.serialize_element(path)?;
                tup.serialize_element(alias)?;
                tup.end()
            }
        }
    }
}

/// A `[multifield, regex]` device filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexFilter {
    pub multifield: String,
    pub regex: String,
}

impl RegexFilter {
    pub fn new(multifield: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            multifield: multifield.into(),
            regex: regex.into(),
        }
    }

    /// Match advertised SSIDs of dot11 devices.
    pub fn advertised_ssid(regex: impl Into<String>) -> Self {
        Self::new(
            "dot11.device/dot11.device.advertised_ssid_map/dot11.advertisedssid.ssid",
            regex,
        )
    }
}

impl Serialize for RegexFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.multifield)?;
        tup.serialize_element(&self.regex)?;
        tup.end()
    }
}

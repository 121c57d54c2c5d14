//! Command payloads for the server's `.cmd` endpoints.
//!
//! Commands travel as a msgpack map, base64-encoded into the `msgpack`
//! form field of a POST.

use base64::Engine;
use serde::Serialize;

use kismet_core::error::KisResult;

use crate::fields::{FieldSpec, RegexFilter};

/// Field-restricted (and optionally filtered) device summary.
#[derive(Debug, Clone, Serialize)]
pub struct SmartSummaryCommand {
    pub fields: Vec<FieldSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<Vec<RegexFilter>>,
}

/// Lock a source to one channel. The channel may be a complex one such as `6HT40+`.
#[derive(Debug, Clone, Serialize)]
pub struct SetChannelCommand {
    pub channel: String,
}

/// Change the hop rate without touching the hop list.
#[derive(Debug, Clone, Serialize)]
pub struct SetHopRateCommand {
    pub hoprate: f64,
}

/// Hop at `hoprate` over `channels`.
#[derive(Debug, Clone, Serialize)]
pub struct SetHopChannelsCommand {
    pub hoprate: f64,
    pub channels: Vec<String>,
}

/// Resume hopping with the source's existing settings.
#[derive(Debug, Clone, Serialize)]
pub struct SetHopCommand {
    pub hop: bool,
}

impl Default for SetHopCommand {
    fn default() -> Self {
        Self { hop: true }
    }
}

/// Add a data source from a standard source definition line.
#[derive(Debug, Clone, Serialize)]
pub struct AddSourceCommand {
    pub definition: String,
}

/// Position update for the web GPS.
#[derive(Debug, Clone, Serialize)]
pub struct GpsUpdateCommand {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub spd: f64,
}

/// Dot11 SSID (or probed SSID) regex filter.
#[derive(Debug, Clone, Serialize)]
pub struct SsidRegexCommand {
    pub essid: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldSpec>>,
}

/// Encode a command as base64 msgpack for the `msgpack` form field.
pub fn encode_command<T: Serialize + ?Sized>(cmd: &T) -> KisResult<String> {
    let packed = rmp_serde::to_vec_named(cmd)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(packed))
}

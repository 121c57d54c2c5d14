//! Device listing endpoints.

use tracing::{debug, warn};

use kismet_core::constants::{fields, paths};
use kismet_core::error::KisResult;
use kismet_models::commands::SmartSummaryCommand;
use kismet_models::{FieldSpec, PlainValue, RegexFilter};

use crate::client::KismetClient;

impl KismetClient {
    /// Summary of all devices.
    pub async fn device_summary(&self) -> KisResult<PlainValue> {
        self.unpack_url(paths::ALL_DEVICES).await
    }

    /// Devices added or changed since `ts`, plus timestamp info.
    pub async fn device_summary_since(&self, ts: i64) -> KisResult<PlainValue> {
        self.unpack_url(&paths::devices_since(ts)).await
    }

    /// Devices added or changed since `ts`, restricted to `fields`.
    ///
    /// When `regex` is given only devices matching at least one filter are
    /// returned.
    pub async fn smart_summary_since(
        &self,
        ts: i64,
        fields: Vec<FieldSpec>,
        regex: Option<Vec<RegexFilter>>,
    ) -> KisResult<PlainValue> {
        let cmd = SmartSummaryCommand { fields, regex };
        self.unpack_post_msgpack_url(&paths::devices_since(ts), &cmd)
            .await
    }

    /// Complete record of the device with the given key.
    pub async fn device(&self, key: &str) -> KisResult<PlainValue> {
        self.unpack_url(&paths::device_by_key(key)).await
    }

    /// A single field of a device, e.g.
    /// `dot11.device/dot11.device.last_beaconed_ssid`.
    pub async fn device_field(&self, key: &str, field: &str) -> KisResult<PlainValue> {
        self.unpack_url(&paths::device_field(key, field)).await
    }

    /// All devices, in every phy type, matching `mac`.
    pub async fn device_by_mac(&self, mac: &str) -> KisResult<PlainValue> {
        self.unpack_url(&paths::devices_by_mac(mac)).await
    }

    /// Full records of every client associated with a dot11 device.
    ///
    /// Returns an empty list when `device` is not a dot11 device or carries
    /// no associated client map. Clients the server no longer tracks (any
    /// non-200 reply) are logged and skipped; transport and auth failures
    /// abort the whole lookup.
    pub async fn device_dot11_clients(&self, device: &PlainValue) -> KisResult<Vec<PlainValue>> {
        let Some(dot11) = device.get(fields::DOT11_DEVICE) else {
            debug!("not a dot11 device");
            return Ok(Vec::new());
        };

        let Some(client_map) = dot11
            .get(fields::DOT11_ASSOCIATED_CLIENT_MAP)
            .and_then(PlainValue::as_map)
        else {
            debug!("missing associated client map");
            return Ok(Vec::new());
        };

        let mut devices = Vec::with_capacity(client_map.len());
        for (mac, key) in client_map {
            debug!("client {}", mac.to_json());
            let key = client_key(key);
            match self.device(&key).await {
                Ok(dev) => devices.push(dev),
                Err(e) if e.status().is_some() => warn!("skipping client {key}: {e}"),
                Err(e) => return Err(e),
            }
        }
        Ok(devices)
    }
}

/// Render a device key from the client map as it appears in URLs.
fn client_key(key: &PlainValue) -> String {
    match key {
        PlainValue::String(s) => s.clone(),
        PlainValue::UInt(n) => n.to_string(),
        PlainValue::Int(n) => n.to_string(),
        other => other.to_json().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_key_rendering() {
        assert_eq!(
            client_key(&"4202770D00000000_0E4B2A1C0BD5".into()),
            "4202770D00000000_0E4B2A1C0BD5"
        );
        assert_eq!(client_key(&PlainValue::UInt(42)), "42");
    }
}

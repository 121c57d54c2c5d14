//! 802.11 SSID filter endpoints.

use tracing::warn;

use kismet_core::constants::paths;
use kismet_core::error::KisResult;
use kismet_models::commands::SsidRegexCommand;
use kismet_models::{FieldSpec, PlainValue};

use crate::client::KismetClient;

impl KismetClient {
    /// Summary of devices advertising an SSID that matches any of `essid`.
    pub async fn device_filtered_dot11_summary(
        &self,
        essid: &[String],
        fields: Option<Vec<FieldSpec>>,
    ) -> KisResult<PlainValue> {
        self.ssid_regex(paths::DOT11_SSID_REGEX, essid, fields).await
    }

    /// Summary of devices probing for an SSID that matches any of `essid`.
    pub async fn device_filtered_dot11_probe_summary(
        &self,
        essid: &[String],
        fields: Option<Vec<FieldSpec>>,
    ) -> KisResult<PlainValue> {
        self.ssid_regex(paths::DOT11_PROBE_REGEX, essid, fields).await
    }

    async fn ssid_regex(
        &self,
        path: &str,
        essid: &[String],
        fields: Option<Vec<FieldSpec>>,
    ) -> KisResult<PlainValue> {
        let cmd = SsidRegexCommand {
            essid: essid.to_vec(),
            fields,
        };
        self.unpack_post_msgpack_url(path, &cmd)
            .await
            .inspect_err(|e| warn!("could not fetch summary from {path}: {e}"))
    }
}

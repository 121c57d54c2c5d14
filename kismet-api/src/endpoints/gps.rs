//! Web GPS endpoint.

use tracing::warn;

use kismet_core::constants::paths;
use kismet_core::error::KisResult;
use kismet_models::commands::GpsUpdateCommand;

use crate::client::KismetClient;

impl KismetClient {
    /// Send a GPS position over the HTTP POST interface.
    ///
    /// Requires a valid login.
    pub async fn send_gps(&self, lat: f64, lon: f64, alt: f64, speed: f64) -> KisResult<()> {
        let cmd = GpsUpdateCommand {
            lat,
            lon,
            alt,
            spd: speed,
        };
        self.post_msgpack_url(paths::GPS_UPDATE, &cmd)
            .await
            .inspect_err(|e| warn!("gps update failed: {e}"))?;
        Ok(())
    }
}

//! Data source listing and configuration endpoints.
//!
//! Every configuration call requires a valid login.

use tracing::{debug, info};

use kismet_core::constants::paths;
use kismet_core::error::KisResult;
use kismet_models::commands::{
    AddSourceCommand, SetChannelCommand, SetHopChannelsCommand, SetHopCommand, SetHopRateCommand,
};
use kismet_models::PlainValue;

use crate::client::KismetClient;

impl KismetClient {
    /// List all data sources.
    pub async fn datasources(&self) -> KisResult<PlainValue> {
        self.unpack_url(paths::ALL_SOURCES).await
    }

    /// Lock a source to a channel or frequency, e.g. `"6"` or `"6HT40+"`.
    pub async fn config_datasource_set_channel(&self, uuid: &str, channel: &str) -> KisResult<()> {
        let cmd = SetChannelCommand {
            channel: channel.to_string(),
        };
        self.post_msgpack_url(&paths::source_set_channel(uuid), &cmd)
            .await?;
        debug!("source {uuid} locked to channel {channel}");
        Ok(())
    }

    /// Change the hop rate of a source, keeping its channel list.
    pub async fn config_datasource_set_hop_rate(&self, uuid: &str, rate: f64) -> KisResult<()> {
        let cmd = SetHopRateCommand { hoprate: rate };
        self.post_msgpack_url(&paths::source_set_channel(uuid), &cmd)
            .await?;
        Ok(())
    }

    /// Hop a source at `rate` over `channels`.
    pub async fn config_datasource_set_hop_channels(
        &self,
        uuid: &str,
        rate: f64,
        channels: &[String],
    ) -> KisResult<()> {
        let cmd = SetHopChannelsCommand {
            hoprate: rate,
            channels: channels.to_vec(),
        };
        self.post_msgpack_url(&paths::source_set_channel(uuid), &cmd)
            .await?;
        Ok(())
    }

    /// Put a source back into hopping with its existing hop settings.
    pub async fn config_datasource_set_hop(&self, uuid: &str) -> KisResult<()> {
        self.post_msgpack_url(&paths::source_set_hop(uuid), &SetHopCommand::default())
            .await?;
        Ok(())
    }

    /// Add a source from a standard source definition line, e.g. `wlan0:name=foo`.
    pub async fn add_datasource(&self, definition: &str) -> KisResult<()> {
        let cmd = AddSourceCommand {
            definition: definition.to_string(),
        };
        self.post_msgpack_url(paths::ADD_SOURCE, &cmd).await?;
        info!("added data source {definition}");
        Ok(())
    }
}

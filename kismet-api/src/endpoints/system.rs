//! System status endpoint.

use kismet_core::constants::paths;
use kismet_core::error::KisResult;
use kismet_models::PlainValue;

use crate::client::KismetClient;

impl KismetClient {
    /// Fetch the server's system status record.
    pub async fn system_status(&self) -> KisResult<PlainValue> {
        self.unpack_url(paths::SYSTEM_STATUS).await
    }
}

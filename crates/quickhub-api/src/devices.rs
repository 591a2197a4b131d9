// Device endpoints
//
// Listing by capability tag and single-device fetch. The listing is
// filtered server-side via the `interface` query parameter.

use serde_json::Value;
use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::models::Device;

impl HubClient {
    /// List devices exposing a capability tag.
    ///
    /// `GET /api/devices?interface={interface}`
    ///
    /// A body that isn't a device array decodes as an empty list.
    pub async fn list_devices(&self, interface: &str) -> Result<Vec<Device>, Error> {
        debug!(interface, "listing devices");
        let value: Value = self.get(&format!("devices?interface={interface}")).await?;
        let Value::Array(items) = value else {
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    /// Fetch a single device.
    ///
    /// `GET /api/devices/{id}`
    pub async fn get_device(&self, id: u64) -> Result<Device, Error> {
        debug!(id, "fetching device");
        self.get(&format!("devices/{id}")).await
    }

    /// Fetch a single device as raw JSON, for display.
    pub async fn get_device_raw(&self, id: u64) -> Result<Value, Error> {
        self.get(&format!("devices/{id}")).await
    }
}

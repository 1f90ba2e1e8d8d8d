//! Device endpoints

use super::error::ApiError;
use super::models::Device;
use super::Client;

pub struct DevicesApi<'a> {
    client: &'a Client,
    site: &'a str,
}

impl<'a> DevicesApi<'a> {
    pub fn new(client: &'a Client, site: &'a str) -> Self {
        Self { client, site }
    }

    /// GET /api/s/{site}/stat/device
    pub async fn list(&self) -> Result<Vec<Device>, ApiError> {
        self.client.get(self.site, "stat/device").await
    }

    /// GET /api/s/{site}/stat/device/{mac}
    pub async fn get_by_mac(&self, mac: &str) -> Result<Device, ApiError> {
        let devices: Vec<Device> = self
            .client
            .get(self.site, &format!("stat/device/{}", mac))
            .await?;
        devices.into_iter().next().ok_or(ApiError::NotFound)
    }

    /// The controller has no single-device GET by id, so this filters the site listing
    pub async fn get(&self, id: &str) -> Result<Device, ApiError> {
        self.list()
            .await?
            .into_iter()
            .find(|device| device.id.as_deref() == Some(id))
            .ok_or(ApiError::NotFound)
    }

    /// PUT /api/s/{site}/rest/device/{id}
    ///
    /// Some controller versions answer an update that changes nothing with an
    /// empty data list, which surfaces as `NotFound`.
    pub async fn update(&self, id: &str, device: &Device) -> Result<Device, ApiError> {
        let devices: Vec<Device> = self
            .client
            .put(self.site, &format!("rest/device/{}", id), device)
            .await?;
        devices.into_iter().next().ok_or(ApiError::NotFound)
    }
}

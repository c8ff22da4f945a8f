use reqwest::Method;

use super::{reply, ApiReply, DispatchClient, MaintenanceUpdate, PriceUpdate};
use crate::error::Result;
use crate::normalize::{normalize_settings, Settings};

const SETTINGS_DISABLED: &str = "Settings endpoint not implemented in backend";
const CHANGE_PRICE_DISABLED: &str = "Change price endpoint not implemented in backend";
const APP_STATUS_DISABLED: &str = "App control endpoint not implemented in backend";

impl DispatchClient {
    pub async fn get_settings(&self) -> Result<Settings> {
        Self::require(self.options.features.settings, SETTINGS_DISABLED)?;

        let response = self.request(Method::GET, "/settings").execute().await?;
        let reply = reply(response, "load settings")?;
        Ok(normalize_settings(&reply.body))
    }

    /// Change the global base price and per-mile rate
    pub async fn change_price(&self, update: &PriceUpdate) -> Result<ApiReply> {
        Self::require(self.options.features.settings, CHANGE_PRICE_DISABLED)?;
        update.validate()?;

        let response = self
            .request(Method::PUT, "/settings")
            .json(update)?
            .execute()
            .await?;

        reply(response, "change price")
    }

    /// Switch maintenance mode and return the settings as stored
    pub async fn update_maintenance_mode(&self, update: &MaintenanceUpdate) -> Result<Settings> {
        Self::require(self.options.features.settings, SETTINGS_DISABLED)?;

        let response = self
            .request(Method::PUT, "/settings/maintenance-mode")
            .json(update)?
            .execute()
            .await?;

        let reply = reply(response, "update maintenance mode")?;
        Ok(normalize_settings(&reply.body))
    }

    /// Whether the app is open for bookings
    pub async fn app_status(&self) -> Result<ApiReply> {
        Self::require(self.options.features.settings, APP_STATUS_DISABLED)?;

        let response = self.request(Method::GET, "/settings/app-status").execute().await?;
        reply(response, "load app status")
    }
}

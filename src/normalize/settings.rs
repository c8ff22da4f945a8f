//! Application settings: maintenance mode and base pricing

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{resolve, resolve_flag, resolve_text, to_number, FieldPath};

const DEFAULT_MAINTENANCE_MESSAGE: &str =
    "The app is currently under maintenance. Please try again later.";

/// Where the settings object sits inside a response, checked in order
const ROOT: &[FieldPath] = &["/data", "/settings"];

/// Canonical application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub maintenance_mode: bool,
    pub maintenance_message: String,
    pub affected_services: Vec<String>,
    pub maintenance_start_time: Option<String>,
    pub maintenance_end_time: Option<String>,
    pub base_price: Option<f64>,
    pub per_miles: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            maintenance_message: DEFAULT_MAINTENANCE_MESSAGE.to_string(),
            affected_services: vec!["all".to_string()],
            maintenance_start_time: None,
            maintenance_end_time: None,
            base_price: None,
            per_miles: None,
        }
    }
}

/// Normalize a settings response. The settings may be wrapped in `data` or
/// `settings`, or sit at the top level.
pub fn normalize_settings(payload: &Value) -> Settings {
    let record = ROOT
        .iter()
        .filter_map(|path| payload.pointer(path))
        .find(|v| v.is_object())
        .unwrap_or(payload);
    let defaults = Settings::default();

    let affected_services = match resolve(record, &["/affectedServices"]) {
        Some(Value::Array(list)) => list.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        _ => defaults.affected_services,
    };

    Settings {
        maintenance_mode: resolve_flag(record, &["/maintenanceMode"]).unwrap_or(false),
        maintenance_message: resolve_text(record, &["/maintenanceMessage"])
            .unwrap_or(defaults.maintenance_message),
        affected_services,
        maintenance_start_time: resolve_text(record, &["/maintenanceStartTime"]),
        maintenance_end_time: resolve_text(record, &["/maintenanceEndTime"]),
        base_price: resolve(record, &["/basePrice", "/base_price"]).map(to_number),
        per_miles: resolve(record, &["/perMiles", "/per_miles"]).map(to_number),
    }
}

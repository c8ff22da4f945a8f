//! Driver records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::customer::{display_name, ACCOUNT_ID, CREATED_AT, EMAIL, PHONE};
use super::{now_rfc3339, resolve_flag, resolve_number, resolve_text, FieldPath};

const ACTIVE: &[FieldPath] = &["/isActive", "/is_active", "/active", "/status"];
const AVAILABLE: &[FieldPath] = &["/isAvailable", "/is_available"];
const RATING: &[FieldPath] = &["/rating"];
const PROFILE_IMAGE: &[FieldPath] = &["/profileImage", "/profile_image"];

// Newer backends nest the vehicle under `carDetails`; older ones keep it flat.
const CAR_NAME: &[FieldPath] = &["/carDetails/carName", "/carName", "/car_name"];
const CAR_NUMBER: &[FieldPath] = &["/carDetails/carNumber", "/carNumber", "/car_number", "/vehiclePlate"];
const CAR_MODEL: &[FieldPath] = &["/carDetails/carModel", "/carModel", "/car_model", "/vehicleModel"];
const CAR_COLOR: &[FieldPath] = &["/carDetails/carColor", "/carColor", "/car_color"];

/// The car a driver is registered with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDescriptor {
    pub car_name: String,
    pub car_number: String,
    pub car_model: String,
    pub car_color: String,
}

impl VehicleDescriptor {
    fn from_record(record: &Value) -> Option<Self> {
        let field = |paths: &[FieldPath]| resolve_text(record, paths).unwrap_or_default();
        let vehicle = Self {
            car_name: field(CAR_NAME),
            car_number: field(CAR_NUMBER),
            car_model: field(CAR_MODEL),
            car_color: field(CAR_COLOR),
        };
        (vehicle != Self::default()).then(|| vehicle)
    }
}

/// Canonical driver record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
    pub is_available: bool,
    pub vehicle: Option<VehicleDescriptor>,
    pub rating: f64,
    pub total_rides: u32,
    pub profile_image: Option<String>,
    pub joined_date: String,
}

/// Normalize a backend driver account.
///
/// Drivers are active unless the backend says otherwise, and available
/// whenever they are active unless an availability flag is present.
pub fn normalize_driver(record: &Value) -> Driver {
    let id = resolve_text(record, ACCOUNT_ID).unwrap_or_default();
    let phone = resolve_text(record, PHONE);
    let email = resolve_text(record, EMAIL);
    let is_active = resolve_flag(record, ACTIVE).unwrap_or(true);

    Driver {
        name: display_name(record, &id, phone.as_deref(), email.as_deref()),
        email: email.unwrap_or_else(|| "-".to_string()),
        phone: phone.unwrap_or_else(|| "-".to_string()),
        is_active,
        is_available: resolve_flag(record, AVAILABLE).unwrap_or(is_active),
        vehicle: VehicleDescriptor::from_record(record),
        rating: resolve_number(record, RATING),
        total_rides: 0,
        profile_image: resolve_text(record, PROFILE_IMAGE),
        joined_date: resolve_text(record, CREATED_AT).unwrap_or_else(now_rfc3339),
        id,
    }
}

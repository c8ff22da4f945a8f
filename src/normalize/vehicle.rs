//! Vehicle classes and their pricing

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{resolve_flag, resolve_number, resolve_text, FieldPath};

/// A bookable vehicle class with its fare structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub capacity: u32,
    pub base_fare: f64,
    pub base_mileage_limit: f64,
    pub price_per_mile_after_base: f64,
    pub is_active: bool,
}

const ID: &[FieldPath] = &["/_id", "/id"];

/// Normalize a backend vehicle class
pub fn normalize_vehicle(record: &Value) -> Vehicle {
    Vehicle {
        id: resolve_text(record, ID).unwrap_or_default(),
        name: resolve_text(record, &["/name"]).unwrap_or_else(|| "-".to_string()),
        vehicle_type: resolve_text(record, &["/type", "/vehicleType"]).unwrap_or_else(|| "-".to_string()),
        capacity: resolve_number(record, &["/capacity"]).max(0.0) as u32,
        base_fare: resolve_number(record, &["/baseFare", "/base_fare"]),
        base_mileage_limit: resolve_number(record, &["/baseMileageLimit", "/base_mileage_limit"]),
        price_per_mile_after_base: resolve_number(
            record,
            &["/pricePerMileAfterBase", "/price_per_mile_after_base", "/perMiles"],
        ),
        is_active: resolve_flag(record, &["/isActive", "/is_active"]).unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_vehicle_shape() {
        let vehicle = normalize_vehicle(&json!({
            "_id": "v1",
            "name": "Saloon",
            "type": "saloon",
            "capacity": 4,
            "baseFare": 4.5,
            "baseMileageLimit": 2,
            "pricePerMileAfterBase": "1.75",
            "isActive": true
        }));
        assert_eq!(vehicle.id, "v1");
        assert_eq!(vehicle.capacity, 4);
        assert_eq!(vehicle.base_fare, 4.5);
        assert_eq!(vehicle.price_per_mile_after_base, 1.75);
        assert!(vehicle.is_active);
        assert_eq!(serde_json::to_value(&vehicle).unwrap()["type"], json!("saloon"));
    }

    #[test]
    fn negative_capacity_clamps_to_zero() {
        assert_eq!(normalize_vehicle(&json!({"capacity": -3})).capacity, 0);
    }
}

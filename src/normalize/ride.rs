//! Ride records

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{
    join_name, now_rfc3339, resolve, resolve_flag, resolve_number, resolve_text, FieldPath,
};

const ID: &[FieldPath] = &["/id", "/_id", "/rideId", "/ride_id", "/reference"];
const CUSTOMER_ID: &[FieldPath] = &["/customerId", "/user_id", "/customer_id", "/rider/_id", "/user/_id"];
const CUSTOMER_NAME: &[FieldPath] = &["/customerName"];
const CUSTOMER_FIRST_NAME: &[FieldPath] = &[
    "/customerFirstName",
    "/first_name",
    "/user_first_name",
    "/user/first_name",
];
const CUSTOMER_LAST_NAME: &[FieldPath] = &[
    "/customerLastName",
    "/last_name",
    "/user_last_name",
    "/user/last_name",
];
const CUSTOMER_NAME_FALLBACK: &[FieldPath] = &[
    "/user/name",
    "/customer/name",
    "/user/fullName",
    "/rider/fullName",
    "/user/phonenumber",
    "/user/email",
];
const CUSTOMER_PHONE: &[FieldPath] = &[
    "/customerPhone",
    "/phonenumber",
    "/customer/phonenumber",
    "/user/phonenumber",
    "/customer_phone",
    "/rider/phoneNumber",
];
const DRIVER_ID: &[FieldPath] = &["/driverId", "/driver/id", "/driver/_id"];
const DRIVER_NAME: &[FieldPath] = &["/driverName"];
const DRIVER_FIRST_NAME: &[FieldPath] = &["/driverFirstName", "/driver/first_name"];
const DRIVER_LAST_NAME: &[FieldPath] = &["/driverLastName", "/driver/last_name"];
const DRIVER_NAME_FALLBACK: &[FieldPath] = &["/driver/name", "/driver/fullName"];
const FROM: &[FieldPath] = &[
    "/from",
    "/pickup",
    "/start",
    "/pickupAddress",
    "/source",
    "/pickupLocation/address",
];
const TO: &[FieldPath] = &[
    "/to",
    "/dropoff",
    "/end",
    "/dropoffAddress",
    "/destination",
    "/dropoffLocation/address",
];
const REQUESTED_AT: &[FieldPath] = &["/requestedAt", "/createdAt", "/date", "/created"];
const COMPLETED_AT: &[FieldPath] = &["/completedAt", "/endTime", "/end_trip_time"];
const COST: &[FieldPath] = &[
    "/cost",
    "/fare",
    "/amount",
    "/price",
    "/customer_total",
    "/finalFare",
    "/estimatedFare",
];
const DISTANCE: &[FieldPath] = &["/distance", "/km", "/miles", "/distance_km"];
const DURATION: &[FieldPath] = &["/duration", "/time", "/duration_time"];
const STATUS: &[FieldPath] = &["/status", "/ride_status"];
const ASAP: &[FieldPath] = &["/asap", "/is_asap"];

const PLACEHOLDER: &str = "-";
const DEFAULT_CUSTOMER_NAME: &str = "Customer";

/// Lifecycle state of a ride.
///
/// Values outside the five known states are kept verbatim in
/// [`RideStatus::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RideStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl RideStatus {
    /// Map a backend spelling onto a status, accepting known aliases
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Self::Pending,
            "confirmed" | "accepted" => Self::Confirmed,
            "in-progress" | "in_progress" | "inprogress" | "ongoing" => Self::InProgress,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    /// False for statuses the backend sent that are not one of the five states
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for RideStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RideStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<RideStatus> for String {
    fn from(status: RideStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Canonical ride record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub driver_id: Option<String>,
    pub driver_name: Option<String>,
    pub from: String,
    pub to: String,
    pub cost: f64,
    pub distance: String,
    pub duration: String,
    pub status: RideStatus,
    pub requested_at: String,
    pub completed_at: Option<String>,
    /// `paid`, `unpaid`, or whatever label the backend sent
    pub payment_status: Option<String>,
    pub asap: Option<bool>,
}

/// Normalize a backend ride record
pub fn normalize_ride(record: &Value) -> Ride {
    let id = resolve_text(record, ID).unwrap_or_else(|| Uuid::new_v4().to_string());

    let customer_name = resolve_text(record, CUSTOMER_NAME)
        .or_else(|| {
            join_name(
                resolve_text(record, CUSTOMER_FIRST_NAME),
                resolve_text(record, CUSTOMER_LAST_NAME),
            )
        })
        .or_else(|| resolve_text(record, CUSTOMER_NAME_FALLBACK))
        .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string());

    let driver_name = resolve_text(record, DRIVER_NAME)
        .or_else(|| {
            join_name(
                resolve_text(record, DRIVER_FIRST_NAME),
                resolve_text(record, DRIVER_LAST_NAME),
            )
        })
        .or_else(|| resolve_text(record, DRIVER_NAME_FALLBACK));

    let status = resolve_text(record, STATUS)
        .map(|raw| RideStatus::parse(&raw))
        .unwrap_or_default();

    Ride {
        id,
        customer_id: resolve_text(record, CUSTOMER_ID).unwrap_or_default(),
        customer_name,
        customer_phone: resolve_text(record, CUSTOMER_PHONE),
        driver_id: resolve_text(record, DRIVER_ID),
        driver_name,
        from: resolve_text(record, FROM).unwrap_or_else(|| PLACEHOLDER.to_string()),
        to: resolve_text(record, TO).unwrap_or_else(|| PLACEHOLDER.to_string()),
        cost: resolve_number(record, COST),
        distance: resolve_text(record, DISTANCE).unwrap_or_else(|| PLACEHOLDER.to_string()),
        duration: resolve_text(record, DURATION).unwrap_or_else(|| PLACEHOLDER.to_string()),
        status,
        requested_at: resolve_text(record, REQUESTED_AT).unwrap_or_else(now_rfc3339),
        completed_at: resolve_text(record, COMPLETED_AT),
        payment_status: payment_status(record),
        asap: resolve_flag(record, ASAP),
    }
}

/// `paymentStatus` wins and keeps its label when it is a string. Otherwise
/// the first present paid flag decides between `paid` and `unpaid`.
fn payment_status(record: &Value) -> Option<String> {
    let label = |paid: bool| if paid { "paid" } else { "unpaid" }.to_string();

    if let Some(value) = resolve(record, &["/paymentStatus"]) {
        return Some(match value {
            Value::String(s) => s.clone(),
            Value::Bool(b) => label(*b),
            Value::Number(n) => label(n.as_f64().map_or(false, |n| n != 0.0)),
            _ => label(false),
        });
    }
    resolve_flag(record, &["/customer_paid", "/customerPaid"]).map(label)
}

/// Aggregate ride counters shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_bookings: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub pending_confirmations: usize,
    pub total_revenue: f64,
    pub active_drivers: usize,
}

impl DashboardStats {
    /// Count rides by status; revenue sums the cost of completed rides
    pub fn from_rides(rides: &[Ride]) -> Self {
        let count = |status: RideStatus| rides.iter().filter(|r| r.status == status).count();

        Self {
            total_bookings: rides.len(),
            in_progress: count(RideStatus::InProgress),
            completed: count(RideStatus::Completed),
            pending_confirmations: count(RideStatus::Pending),
            total_revenue: rides
                .iter()
                .filter(|r| r.status == RideStatus::Completed)
                .map(|r| r.cost)
                .sum(),
            active_drivers: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_minimal_ride() {
        let ride = normalize_ride(&json!({"id": "r9", "fare": "12.50", "pickup": "A", "dropoff": "B"}));
        assert_eq!(ride.id, "r9");
        assert_eq!(ride.cost, 12.5);
        assert_eq!(ride.from, "A");
        assert_eq!(ride.to, "B");
        assert_eq!(ride.status, RideStatus::Pending);
        assert_eq!(ride.customer_name, "Customer");
        assert_eq!(ride.customer_id, "");
        assert_eq!(ride.distance, "-");
        assert_eq!(ride.duration, "-");
        assert_eq!(ride.driver_id, None);
        assert_eq!(ride.payment_status, None);
        assert_eq!(ride.asap, None);
    }

    #[test]
    fn empty_record_gets_defaults() {
        let ride = normalize_ride(&json!({}));
        assert!(Uuid::parse_str(&ride.id).is_ok());
        assert_eq!(ride.from, "-");
        assert_eq!(ride.to, "-");
        assert_eq!(ride.cost, 0.0);
        assert_eq!(ride.status, RideStatus::Pending);
        assert!(!ride.requested_at.is_empty());
    }

    #[test]
    fn origin_priority_order() {
        let ride = normalize_ride(&json!({
            "source": "E",
            "pickupAddress": "D",
            "start": "C",
            "pickup": "B"
        }));
        assert_eq!(ride.from, "B");

        let ride = normalize_ride(&json!({"pickupLocation": {"address": "High Street"}}));
        assert_eq!(ride.from, "High Street");
    }

    #[test]
    fn numeric_id_is_stringified() {
        let ride = normalize_ride(&json!({"ride_id": 42}));
        assert_eq!(ride.id, "42");
    }

    #[test]
    fn customer_name_from_parts_or_nested_user() {
        let ride = normalize_ride(&json!({"first_name": "Jane", "user": {"last_name": "Doe"}}));
        assert_eq!(ride.customer_name, "Jane Doe");

        let ride = normalize_ride(&json!({"user": {"phonenumber": "+447700900000"}}));
        assert_eq!(ride.customer_name, "+447700900000");
        assert_eq!(ride.customer_phone.as_deref(), Some("+447700900000"));

        let ride = normalize_ride(&json!({"customerName": "Explicit", "first_name": "Ignored"}));
        assert_eq!(ride.customer_name, "Explicit");
    }

    #[test]
    fn driver_from_nested_object() {
        let ride = normalize_ride(&json!({"driver": {"id": 7, "first_name": "Sam", "last_name": "Lee"}}));
        assert_eq!(ride.driver_id.as_deref(), Some("7"));
        assert_eq!(ride.driver_name.as_deref(), Some("Sam Lee"));
    }

    #[test]
    fn non_numeric_cost_is_zero() {
        assert_eq!(normalize_ride(&json!({"cost": "free"})).cost, 0.0);
        assert_eq!(normalize_ride(&json!({"cost": null, "fare": 8})).cost, 8.0);
    }

    #[test]
    fn status_aliases_and_passthrough() {
        assert_eq!(normalize_ride(&json!({"ride_status": "ongoing"})).status, RideStatus::InProgress);
        assert_eq!(normalize_ride(&json!({"status": "Canceled"})).status, RideStatus::Cancelled);

        let ride = normalize_ride(&json!({"status": "no-show"}));
        assert_eq!(ride.status, RideStatus::Other("no-show".to_string()));
        assert!(!ride.status.is_known());
        assert_eq!(serde_json::to_value(&ride).unwrap()["status"], json!("no-show"));
    }

    #[test]
    fn payment_status_sources() {
        let paid = |v: Value| normalize_ride(&v).payment_status;
        assert_eq!(paid(json!({"paymentStatus": "refunded"})).as_deref(), Some("refunded"));
        assert_eq!(paid(json!({"paymentStatus": true})).as_deref(), Some("paid"));
        assert_eq!(paid(json!({"customer_paid": "1"})).as_deref(), Some("paid"));
        assert_eq!(paid(json!({"customer_paid": "yes"})).as_deref(), Some("unpaid"));
        assert_eq!(paid(json!({"customerPaid": 1})).as_deref(), Some("paid"));
    }

    #[test]
    fn asap_uses_truthy_set() {
        assert_eq!(normalize_ride(&json!({"asap": "true"})).asap, Some(true));
        assert_eq!(normalize_ride(&json!({"is_asap": 2})).asap, Some(false));
    }

    #[test]
    fn canonical_shape_serializes_camel_case() {
        let value = serde_json::to_value(normalize_ride(&json!({"id": "r1"}))).unwrap();
        for key in ["customerId", "customerName", "requestedAt", "completedAt", "paymentStatus"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn stats_count_by_status() {
        let rides: Vec<Ride> = [
            json!({"status": "completed", "finalFare": 20}),
            json!({"status": "completed", "estimatedFare": "5.5"}),
            json!({"status": "ongoing", "fare": 100}),
            json!({"status": "pending"}),
        ]
        .iter()
        .map(normalize_ride)
        .collect();

        let stats = DashboardStats::from_rides(&rides);
        assert_eq!(stats.total_bookings, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.pending_confirmations, 1);
        assert_eq!(stats.total_revenue, 25.5);
    }
}

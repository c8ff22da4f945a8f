//! Request payloads and result envelopes for the dispatch API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::normalize::{resolve_flag, resolve_number, DashboardStats, Ride};

/// Result of a listing call. Failures degrade to `status: false` and an
/// empty `data`, never to an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub status: bool,
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Listing<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: false,
            data: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// One page of a list that the backend returns whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub status: bool,
    pub items: Vec<T>,
    /// Number of records across all pages
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Page<T> {
    /// Cut page `page` (1-based) of `limit` records out of `all`
    pub fn slice(all: Vec<T>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = all.len();
        let start = (page - 1).saturating_mul(limit).min(total);
        let items = all.into_iter().skip(start).take(limit).collect();

        Self {
            status: true,
            items,
            total,
            page,
            limit,
            message: None,
        }
    }

    pub fn failed(page: usize, limit: usize, message: impl Into<String>) -> Self {
        Self {
            status: false,
            items: Vec::new(),
            total: 0,
            page,
            limit,
            message: Some(message.into()),
        }
    }
}

/// Server side pagination of the ride list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_rides: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Pagination for a request that produced nothing
    pub fn empty(page: u64, limit: u64) -> Self {
        Self {
            current_page: page,
            total_pages: 1,
            total_rides: 0,
            limit,
            has_next_page: false,
            has_prev_page: false,
        }
    }

    /// Read the backend's `pagination` object, filling any missing field from
    /// the requested page and limit
    pub fn from_value(value: Option<&Value>, page: u64, limit: u64) -> Self {
        let fallback = Self::empty(page, limit);
        let value = match value {
            Some(value) if value.is_object() => value,
            _ => return fallback,
        };

        let number = |path: &'static str, default: u64| match value.pointer(path) {
            Some(v) if !v.is_null() => resolve_number(value, &[path]).max(0.0) as u64,
            _ => default,
        };

        Self {
            current_page: number("/currentPage", fallback.current_page),
            total_pages: number("/totalPages", fallback.total_pages),
            total_rides: number("/totalRides", fallback.total_rides),
            limit: number("/limit", fallback.limit),
            has_next_page: resolve_flag(value, &["/hasNextPage"]).unwrap_or(false),
            has_prev_page: resolve_flag(value, &["/hasPrevPage"]).unwrap_or(false),
        }
    }
}

/// A page of rides with the backend's pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidePage {
    pub status: bool,
    pub data: Vec<Ride>,
    pub pagination: Pagination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Dashboard counters. A failed fetch carries `status: false`, zeroed
/// counters and the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub status: bool,
    pub data: DashboardStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A successful mutation: the HTTP status plus whatever the backend said
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiReply {
    pub status: u16,
    pub message: Option<String>,
    pub body: Value,
}

/// Who a broadcast notification targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Rider,
    Driver,
}

/// Account creation through the public signup endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_color: Option<String>,
}

/// A driver account with its vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct NewDriver {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub car_name: String,
    pub car_number: String,
    pub car_model: String,
    pub car_color: String,
}

impl From<NewDriver> for NewUser {
    fn from(driver: NewDriver) -> Self {
        Self {
            full_name: driver.full_name,
            email: driver.email,
            phone_number: driver.phone_number,
            password: driver.password,
            user_type: UserType::Driver,
            is_admin: None,
            car_name: Some(driver.car_name),
            car_number: Some(driver.car_number),
            car_model: Some(driver.car_model),
            car_color: Some(driver.car_color),
        }
    }
}

/// Partial update of a driver. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_color: Option<String>,
}

/// Push notification content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: None,
            image: None,
        }
    }

    /// Attach a key-value pair delivered with the notification
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Title and body must both carry text
    pub(crate) fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.body.trim().is_empty() {
            return Err(Error::invalid_input("Notification title and body are required"));
        }
        Ok(())
    }
}

/// Fare changes for one vehicle class
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePricingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fare: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_mileage_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_mile_after_base: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl VehiclePricingUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        let prices = [
            self.base_fare,
            self.base_mileage_limit,
            self.price_per_mile_after_base,
        ];
        if prices.iter().flatten().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(Error::invalid_input("Prices must be non-negative numbers"));
        }
        Ok(())
    }
}

/// Global base price and per-mile rate
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_miles: Option<f64>,
}

impl PriceUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.base_price.is_none() && self.per_miles.is_none() {
            return Err(Error::invalid_input("Nothing to update"));
        }
        let prices = [self.base_price, self.per_miles];
        if prices.iter().flatten().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(Error::invalid_input("Prices must be non-negative numbers"));
        }
        Ok(())
    }
}

/// Switch maintenance mode on or off
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceUpdate {
    pub maintenance_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_services: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_end_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_slice_clamps_to_bounds() {
        let page = Page::slice((1..=7).collect::<Vec<_>>(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);

        let past_end = Page::slice((1..=7).collect::<Vec<_>>(), 5, 3);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 7);

        let zero = Page::slice(vec![1, 2], 0, 0);
        assert_eq!((zero.page, zero.limit), (1, 1));
        assert_eq!(zero.items, vec![1]);
    }

    #[test]
    fn pagination_fills_missing_fields() {
        let pagination = Pagination::from_value(Some(&json!({"totalPages": "4", "hasNextPage": true})), 2, 10);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 4);
        assert_eq!(pagination.total_rides, 0);
        assert_eq!(pagination.limit, 10);
        assert!(pagination.has_next_page);
        assert!(!pagination.has_prev_page);

        assert_eq!(Pagination::from_value(None, 3, 5), Pagination::empty(3, 5));
    }

    #[test]
    fn new_driver_signs_up_as_driver() {
        let user = NewUser::from(NewDriver {
            full_name: "Dan Driver".to_string(),
            email: "dan@example.com".to_string(),
            phone_number: "+447000000001".to_string(),
            password: "secret".to_string(),
            car_name: "Skoda".to_string(),
            car_number: "SK19 ABC".to_string(),
            car_model: "Octavia".to_string(),
            car_color: "Black".to_string(),
        });
        let value = serde_json::to_value(user).unwrap();
        assert_eq!(value["userType"], "driver");
        assert_eq!(value["carNumber"], "SK19 ABC");
        assert!(value.get("isAdmin").is_none());
    }

    #[test]
    fn notification_omits_absent_fields() {
        let plain = serde_json::to_value(Notification::new("Hi", "There")).unwrap();
        assert_eq!(plain, json!({"title": "Hi", "body": "There"}));

        let rich = Notification::new("Hi", "There")
            .with_data("screen", "bookings")
            .with_image("https://img.example.com/a.png");
        let value = serde_json::to_value(rich).unwrap();
        assert_eq!(value["data"], json!({"screen": "bookings"}));
        assert_eq!(value["image"], "https://img.example.com/a.png");
    }

    #[test]
    fn price_update_rejects_negative_and_empty() {
        assert!(PriceUpdate::default().validate().is_err());
        let negative = PriceUpdate {
            base_price: Some(-1.0),
            per_miles: None,
        };
        assert!(negative.validate().is_err());
        let ok = PriceUpdate {
            base_price: Some(3.5),
            per_miles: Some(1.2),
        };
        assert!(ok.validate().is_ok());
        assert_eq!(
            serde_json::to_value(PriceUpdate { base_price: None, per_miles: Some(1.2) }).unwrap(),
            json!({"perMiles": 1.2})
        );
    }
}

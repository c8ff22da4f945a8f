//! Customer (rider) records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{join_name, resolve_text, FieldPath};

pub(crate) const ACCOUNT_ID: &[FieldPath] = &["/id", "/_id"];
pub(crate) const FULL_NAME: &[FieldPath] = &["/fullName", "/name"];
pub(crate) const FIRST_NAME: &[FieldPath] = &["/first_name", "/firstName"];
pub(crate) const LAST_NAME: &[FieldPath] = &["/last_name", "/lastName"];
pub(crate) const PHONE: &[FieldPath] = &["/phoneNumber", "/phonenumber", "/phone"];
pub(crate) const EMAIL: &[FieldPath] = &["/email"];
pub(crate) const CREATED_AT: &[FieldPath] = &["/createdAt", "/created_at"];

/// Canonical customer record.
///
/// The backend does not report ride counts, spend or rating; they stay zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_rides: u32,
    pub total_spent: f64,
    pub rating: f64,
    pub joined_date: Option<String>,
}

/// Normalize a backend rider account
pub fn normalize_customer(record: &Value) -> Customer {
    let id = resolve_text(record, ACCOUNT_ID).unwrap_or_default();
    let phone = resolve_text(record, PHONE);
    let email = resolve_text(record, EMAIL);

    Customer {
        name: display_name(record, &id, phone.as_deref(), email.as_deref()),
        email: email.unwrap_or_else(|| "-".to_string()),
        phone: phone.unwrap_or_else(|| "-".to_string()),
        total_rides: 0,
        total_spent: 0.0,
        rating: 0.0,
        joined_date: resolve_text(record, CREATED_AT),
        id,
    }
}

/// Full name, then first and last name, then phone, then email, then the id
pub(crate) fn display_name(
    record: &Value,
    id: &str,
    phone: Option<&str>,
    email: Option<&str>,
) -> String {
    resolve_text(record, FULL_NAME)
        .or_else(|| join_name(resolve_text(record, FIRST_NAME), resolve_text(record, LAST_NAME)))
        .or_else(|| phone.map(str::to_string))
        .or_else(|| email.map(str::to_string))
        .unwrap_or_else(|| format!("ID {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_rider_shape() {
        let customer = normalize_customer(&json!({
            "_id": "65f0c",
            "fullName": "Morag Brown",
            "phoneNumber": "+447123456789",
            "email": "morag@example.com",
            "userType": "rider",
            "createdAt": "2024-03-01T10:00:00.000Z"
        }));
        assert_eq!(customer.id, "65f0c");
        assert_eq!(customer.name, "Morag Brown");
        assert_eq!(customer.phone, "+447123456789");
        assert_eq!(customer.email, "morag@example.com");
        assert_eq!(customer.joined_date.as_deref(), Some("2024-03-01T10:00:00.000Z"));
        assert_eq!(customer.total_rides, 0);
        assert_eq!(customer.total_spent, 0.0);
    }

    #[test]
    fn legacy_split_name_shape() {
        let customer = normalize_customer(&json!({
            "id": 12,
            "first_name": "Iain",
            "last_name": null,
            "email": null,
            "phonenumber": "07700900123",
            "created_at": "2023-11-02"
        }));
        assert_eq!(customer.id, "12");
        assert_eq!(customer.name, "Iain");
        assert_eq!(customer.email, "-");
        assert_eq!(customer.phone, "07700900123");
    }

    #[test]
    fn name_falls_back_to_contact_then_id() {
        let by_email = normalize_customer(&json!({"id": 3, "email": "a@b.c"}));
        assert_eq!(by_email.name, "a@b.c");

        let by_id = normalize_customer(&json!({"id": 4}));
        assert_eq!(by_id.name, "ID 4");
        assert_eq!(by_id.phone, "-");
        assert_eq!(by_id.joined_date, None);
    }
}

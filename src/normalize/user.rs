//! Managed user accounts

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::customer::{display_name, ACCOUNT_ID, CREATED_AT, EMAIL};
use super::{resolve_flag, resolve_text, FieldPath};

const CONTACT: &[FieldPath] = &["/contactNumber", "/phoneNumber", "/phonenumber", "/phone"];
const ADDRESS: &[FieldPath] = &["/address"];
const ROLE: &[FieldPath] = &["/role", "/userType"];
const IS_ADMIN: &[FieldPath] = &["/isAdmin", "/is_admin"];
const ACTIVE: &[FieldPath] = &["/isActive", "/is_active", "/active", "/status"];

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Driver,
    Rider,
    Unknown,
}

impl UserRole {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "driver" => Self::Driver,
            "rider" | "customer" => Self::Rider,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Driver => "driver",
            Self::Rider => "rider",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a backend account carries administrator privilege: an `isAdmin`
/// flag from the truthy set, or an `admin` role.
pub fn is_admin_record(record: &Value) -> bool {
    resolve_flag(record, IS_ADMIN).unwrap_or(false)
        || resolve_text(record, ROLE).map(|r| UserRole::parse(&r)) == Some(UserRole::Admin)
}

/// A managed account, distinct from the logged-in admin's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: String,
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: String,
}

/// Normalize a backend account into an [`AppUser`]
pub fn normalize_user(record: &Value) -> AppUser {
    let id = resolve_text(record, ACCOUNT_ID).unwrap_or_default();
    let contact = resolve_text(record, CONTACT);
    let email = resolve_text(record, EMAIL);

    let role = if is_admin_record(record) {
        UserRole::Admin
    } else {
        resolve_text(record, ROLE)
            .map(|r| UserRole::parse(&r))
            .unwrap_or(UserRole::Unknown)
    };

    AppUser {
        name: display_name(record, &id, contact.as_deref(), email.as_deref()),
        contact_number: contact.unwrap_or_default(),
        email: email.unwrap_or_default(),
        address: resolve_text(record, ADDRESS).unwrap_or_default(),
        role,
        is_active: resolve_flag(record, ACTIVE).unwrap_or(true),
        created_at: resolve_text(record, CREATED_AT).unwrap_or_default(),
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn managed_user_shape() {
        let user = normalize_user(&json!({
            "id": "u1",
            "name": "Fiona Grant",
            "contactNumber": "01383 000000",
            "email": "fiona@example.com",
            "address": "1 High St, Dunfermline",
            "role": "manager",
            "isActive": true,
            "createdAt": "2024-02-02"
        }));
        assert_eq!(user.role, UserRole::Manager);
        assert_eq!(user.contact_number, "01383 000000");
        assert_eq!(user.address, "1 High St, Dunfermline");
        assert!(user.is_active);
    }

    #[test]
    fn backend_account_shape() {
        let user = normalize_user(&json!({
            "_id": "a9",
            "fullName": "Driver Dan",
            "phoneNumber": "+447000000009",
            "userType": "driver",
            "isActive": "0"
        }));
        assert_eq!(user.id, "a9");
        assert_eq!(user.name, "Driver Dan");
        assert_eq!(user.role, UserRole::Driver);
        assert_eq!(user.email, "");
        assert!(!user.is_active);
    }

    #[test]
    fn is_admin_flag_overrides_user_type() {
        let user = normalize_user(&json!({"_id": "x", "userType": "rider", "isAdmin": true}));
        assert_eq!(user.role, UserRole::Admin);
        assert!(is_admin_record(&json!({"role": "Admin"})));
        assert!(!is_admin_record(&json!({"isAdmin": "yes"})));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(UserRole::Manager).unwrap(), json!("manager"));
        assert_eq!(UserRole::parse("CUSTOMER"), UserRole::Rider);
        assert_eq!(UserRole::parse("owner"), UserRole::Unknown);
    }
}

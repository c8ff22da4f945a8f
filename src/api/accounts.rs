use log::debug;
use reqwest::Method;
use serde_json::{Map, Value};

use super::{listing, reply, ApiReply, DispatchClient, DriverUpdate, Listing, NewDriver, NewUser, Page, UserType};
use crate::error::{Error, Result};
use crate::normalize::{
    is_admin_record, normalize_customer, normalize_driver, normalize_user, AppUser, Customer, Driver, UserRole,
};

const DELETE_DRIVER_DISABLED: &str =
    "Delete user endpoint not implemented in backend. Contact developer to add DELETE /api/users/:id endpoint.";
const DELETE_USER_DISABLED: &str = "Delete user not implemented in backend";
const TOGGLE_USER_DISABLED: &str = "Toggle user status not implemented in backend";
const LIST_USERS_DISABLED: &str = "Admin user management not implemented in backend";

impl DispatchClient {
    /// Riders, paged on the client since the backend returns them all
    pub async fn list_customers(&self, page: usize, limit: usize) -> Page<Customer> {
        let response = self
            .request(Method::GET, "/auth/users")
            .query("userType", "rider")
            .execute()
            .await;

        let customers = listing(response, "customers", normalize_customer);
        if !customers.status {
            let message = customers.message.unwrap_or_default();
            return Page::failed(page.max(1), limit.max(1), message);
        }
        Page::slice(customers.data, page, limit)
    }

    pub async fn list_drivers(&self) -> Listing<Driver> {
        let response = self
            .request(Method::GET, "/auth/users")
            .query("userType", "driver")
            .execute()
            .await;

        listing(response, "drivers", normalize_driver)
    }

    /// Register a driver and its vehicle. Signup is public, so no token is sent.
    pub async fn create_driver(&self, driver: NewDriver) -> Result<ApiReply> {
        self.create_user(NewUser::from(driver)).await
    }

    pub async fn update_driver(&self, driver_id: &str, update: &DriverUpdate) -> Result<ApiReply> {
        let response = self
            .request(Method::PUT, &format!("/auth/users/{}", driver_id))
            .json(update)?
            .execute()
            .await?;

        reply(response, "update driver")
    }

    pub async fn delete_driver(&self, driver_id: &str) -> Result<ApiReply> {
        Self::require(self.options.features.user_management, DELETE_DRIVER_DISABLED)?;
        self.delete_account(driver_id, "delete driver").await
    }

    /// Managed accounts, optionally narrowed to one role. Administrators are
    /// never listed.
    pub async fn list_users(&self, role: Option<UserRole>) -> Listing<AppUser> {
        if !self.options.features.user_management {
            debug!("{}", LIST_USERS_DISABLED);
            return Listing::failed(LIST_USERS_DISABLED);
        }

        let mut request = self.request(Method::GET, "/auth/users");
        if let Some(role) = role {
            request = request.query("userType", role.as_str());
        }

        let response = request.execute().await;
        let users = listing(response, "users", |record: &Value| {
            (!is_admin_record(record)).then(|| normalize_user(record))
        });

        Listing {
            status: users.status,
            data: users.data.into_iter().flatten().collect(),
            message: users.message,
        }
    }

    /// Create an account of any type through the public signup endpoint
    pub async fn create_user(&self, user: NewUser) -> Result<ApiReply> {
        if user.full_name.trim().is_empty() || user.phone_number.trim().is_empty() {
            return Err(Error::invalid_input("Full name and phone number are required"));
        }

        let response = self
            .public(Method::POST, "/auth/signup")
            .json(&user)?
            .execute()
            .await?;

        let action = match user.user_type {
            UserType::Rider => "create rider",
            UserType::Driver => "create driver",
        };
        reply(response, action)
    }

    /// Update a profile. `fields` are sent as given, together with `userId`.
    pub async fn update_user(&self, user_id: &str, fields: Map<String, Value>) -> Result<ApiReply> {
        let mut payload = fields;
        payload.insert("userId".to_string(), Value::String(user_id.to_string()));

        let response = self
            .request(Method::PUT, "/auth/update-profile")
            .json(&payload)?
            .execute()
            .await?;

        reply(response, "update user")
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<ApiReply> {
        Self::require(self.options.features.user_management, DELETE_USER_DISABLED)?;
        self.delete_account(user_id, "delete user").await
    }

    /// Flip an account between active and inactive
    pub async fn toggle_user_active(&self, user_id: &str) -> Result<ApiReply> {
        Self::require(self.options.features.user_management, TOGGLE_USER_DISABLED)?;

        let response = self
            .request(Method::PATCH, &format!("/users/{}/toggle-active", user_id))
            .execute()
            .await?;

        reply(response, "toggle user status")
    }

    async fn delete_account(&self, user_id: &str, action: &str) -> Result<ApiReply> {
        let response = self
            .request(Method::DELETE, &format!("/users/{}", user_id))
            .execute()
            .await?;

        reply(response, action)
    }
}

use reqwest::Method;
use serde_json::json;

use super::DispatchClient;
use crate::error::Result;
use crate::fetch::FetchResponse;

impl DispatchClient {
    /// Ask the backend to text an OTP to `phone_number`
    pub async fn request_admin_otp(&self, phone_number: &str) -> Result<FetchResponse> {
        self.public(Method::POST, "/auth/login")
            .json(&json!({ "phoneNumber": phone_number }))?
            .execute()
            .await
    }

    /// Exchange an OTP for the account and its token
    pub async fn verify_admin_otp(&self, phone_number: &str, otp: &str) -> Result<FetchResponse> {
        self.public(Method::POST, "/auth/verify-otp")
            .json(&json!({ "phoneNumber": phone_number, "otp": otp }))?
            .execute()
            .await
    }

    /// Sign in with email and password
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<FetchResponse> {
        self.public(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }))?
            .execute()
            .await
    }
}

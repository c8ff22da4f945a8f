//! Types for the admin login flow

use serde::Serialize;

use super::session::Session;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Admin privileges required.";
pub const OTP_SENT_MESSAGE: &str = "OTP sent successfully";
pub const OTP_SEND_FAILED_MESSAGE: &str = "Failed to send OTP";
pub const INVALID_OTP_MESSAGE: &str = "Invalid OTP";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid credentials";

/// Uniform result of a login step, whatever shape the backend answered in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

impl AuthOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Where the admin login flow stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Anonymous,
    OtpPending { phone_number: String },
    Authenticated(Session),
}

impl LoginState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginState::Authenticated(_))
    }
}

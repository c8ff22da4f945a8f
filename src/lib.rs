//! Dispatch Admin Client Library
//!
//! Client side of a taxi-dispatch admin dashboard: the OTP admin login and
//! its persisted session, normalizers that turn the backend's loosely shaped
//! JSON into canonical records, and one client method per backend endpoint.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod normalize;

pub use api::DispatchClient;
pub use config::ClientOptions;
pub use error::{Error, Result};

/// A convenience module for common imports
pub mod prelude {
    pub use crate::api::{Listing, Notification};
    pub use crate::auth::{AuthOutcome, LoginFlow, LoginState};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::DispatchClient;
}

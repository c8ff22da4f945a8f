//! Configuration options for the dispatch admin client

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::normalize::is_truthy;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Storage key holding the serialized admin session
pub const DEFAULT_SESSION_KEY: &str = "admin-user";

pub const ENV_BASE_URL: &str = "DISPATCH_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "DISPATCH_REQUEST_TIMEOUT_SECS";
pub const ENV_USER_MANAGEMENT: &str = "DISPATCH_ENABLE_USER_MANAGEMENT";
pub const ENV_SETTINGS: &str = "DISPATCH_ENABLE_SETTINGS";

/// Endpoints that not every backend build provides.
///
/// When a flag is off the matching client functions answer with
/// [`Error::NotImplemented`] and never touch the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendFeatures {
    /// User listing, deletion and active-flag toggling
    pub user_management: bool,

    /// Pricing, maintenance mode and app status settings
    pub settings: bool,
}

/// Configuration options for the dispatch admin client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Origin of the backend, without the `/api` suffix
    pub base_url: String,

    /// The request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,

    /// Optional backend capabilities
    pub features: BackendFeatures,

    /// The storage key for the persisted session
    pub session_key: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            features: BackendFeatures::default(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

impl ClientOptions {
    /// Build options from the process environment.
    ///
    /// Unset variables keep their defaults. A base URL that does not parse or
    /// a timeout that is not a whole number of seconds is a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            Url::parse(base_url.trim())
                .map_err(|e| Error::config(format!("{} is not a valid URL: {}", ENV_BASE_URL, e)))?;
            options.base_url = base_url.trim().trim_end_matches('/').to_string();
        }

        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!("{} must be a whole number of seconds", ENV_REQUEST_TIMEOUT))
            })?;
            options.request_timeout = Some(Duration::from_secs(secs));
        }

        let flag = |name: &str| lookup(name).map(|v| is_truthy(&Value::String(v))).unwrap_or(false);
        options.features = BackendFeatures {
            user_management: flag(ENV_USER_MANAGEMENT),
            settings: flag(ENV_SETTINGS),
        };

        Ok(options)
    }

    /// Set the backend origin
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the optional backend capabilities
    pub fn with_features(mut self, value: BackendFeatures) -> Self {
        self.features = value;
        self
    }

    /// Set the session storage key
    pub fn with_session_key(mut self, value: &str) -> Self {
        self.session_key = value.to_string();
        self
    }
}

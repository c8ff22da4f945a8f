//! Client for the dispatch backend's REST API
//!
//! One method per backend capability. Listing methods degrade to an empty,
//! `status: false` [`Listing`] on any failure; mutations return
//! [`crate::Result`] with [`Error::Api`] carrying the backend's message.

mod accounts;
mod auth;
mod notifications;
mod rides;
mod settings;
mod types;

pub use types::*;

use std::sync::Arc;

use log::warn;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::auth::{MemoryStorage, SessionStore};
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::{FetchBuilder, FetchResponse};
use crate::normalize::items;

/// The main entry point for talking to the dispatch backend
#[derive(Debug, Clone)]
pub struct DispatchClient {
    /// HTTP client used for requests
    http_client: Client,

    /// The admin session shared with the login flow
    session: Arc<SessionStore>,

    /// Client options
    options: ClientOptions,
}

impl DispatchClient {
    /// Create a client with an in-memory session
    ///
    /// # Example
    ///
    /// ```
    /// use dispatch_admin::{config::ClientOptions, DispatchClient};
    ///
    /// let options = ClientOptions::default().with_base_url("http://localhost:5000");
    /// let client = DispatchClient::new(options);
    /// assert!(!client.session().is_authenticated());
    /// ```
    pub fn new(options: ClientOptions) -> Self {
        let session = SessionStore::new(MemoryStorage::new(), &options.session_key);
        Self::with_session_store(options, Arc::new(session))
    }

    /// Create a client sharing an existing session store. A store holding
    /// no session yet is loaded from its storage first.
    pub fn with_session_store(options: ClientOptions, session: Arc<SessionStore>) -> Self {
        if !session.is_authenticated() {
            session.load();
        }

        Self {
            http_client: Client::new(),
            session,
            options,
        }
    }

    /// The session store used for bearer tokens
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.options.base_url.trim_end_matches('/'), path)
    }

    /// A request carrying the session's bearer token, when there is one
    fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        let token = self.session.token();
        self.public(method, path).bearer_auth(token.as_deref())
    }

    /// A request without credentials
    fn public(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.http_client, &self.url(path), method)
            .timeout(self.options.request_timeout)
    }

    /// Fail with the backend's own wording when an optional endpoint is off
    fn require(enabled: bool, message: &str) -> Result<()> {
        if enabled {
            Ok(())
        } else {
            Err(Error::not_implemented(message))
        }
    }
}

/// Turn a response into an [`ApiReply`], or an [`Error::Api`] when the
/// status is not 2xx or the body reports failure
pub(crate) fn reply(response: FetchResponse, action: &str) -> Result<ApiReply> {
    let status = response.status.as_u16();

    if !response.is_success() {
        let message = response
            .body
            .message()
            .unwrap_or_else(|| format!("Failed to {} ({})", action, status));
        return Err(Error::api(Some(status), message));
    }

    if response.body.success_flag() == Some(false) {
        let message = response
            .body
            .message()
            .unwrap_or_else(|| format!("Failed to {}", action));
        return Err(Error::api(Some(status), message));
    }

    Ok(ApiReply {
        status,
        message: response.body.message(),
        body: response.body.into_json(),
    })
}

/// Turn a list response into records, degrading every failure to an empty,
/// unsuccessful listing
pub(crate) fn listing<T>(
    response: Result<FetchResponse>,
    what: &str,
    normalize: fn(&Value) -> T,
) -> Listing<T> {
    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch {}: {}", what, e);
            return Listing::failed(e.user_message());
        }
    };

    if !response.is_success() {
        let message = response
            .body
            .message()
            .unwrap_or_else(|| format!("Failed to fetch {}: {}", what, response.status.as_u16()));
        warn!("{}", message);
        return Listing::failed(message);
    }

    if response.body.success_flag() == Some(false) {
        let message = response
            .body
            .message()
            .unwrap_or_else(|| format!("Failed to fetch {}", what));
        warn!("{}", message);
        return Listing::failed(message);
    }

    let message = response.body.message();
    let payload = response.body.into_json();
    let data = items(&payload).iter().map(normalize).collect();

    Listing {
        status: true,
        data,
        message,
    }
}

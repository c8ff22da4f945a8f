//! Admin authentication: the two-step OTP login and the persisted session
//!
//! ```no_run
//! use dispatch_admin::{auth::LoginFlow, DispatchClient};
//!
//! # async fn run() {
//! let client = DispatchClient::new(Default::default());
//! let mut flow = LoginFlow::new(client);
//!
//! let sent = flow.request_otp("+447123456789").await;
//! if sent.success {
//!     let verified = flow.verify_otp("123456").await;
//!     println!("{}", verified.message);
//! }
//! # }
//! ```

mod session;
mod storage;
mod types;

use log::{info, warn};
use serde_json::Value;

use crate::api::DispatchClient;
use crate::error::Result;
use crate::fetch::FetchResponse;
use crate::normalize::{is_admin_record, resolve_text, FieldPath};

pub use session::*;
pub use storage::*;
pub use types::*;

/// Where the account object sits in a login response, checked in order
const ACCOUNT: &[FieldPath] = &["/data/user", "/user", "/data"];

const TOKEN: &[FieldPath] = &[
    "/token",
    "/accessToken",
    "/access_token",
    "/data/token",
    "/data/accessToken",
    "/data/user/token",
];

/// The admin login state machine.
///
/// Anonymous → (OTP requested) → OtpPending → (admin verified) →
/// Authenticated → (logout) → Anonymous. Every step reports an
/// [`AuthOutcome`]; network failures never escape as errors.
pub struct LoginFlow {
    client: DispatchClient,
    state: LoginState,
    otp: String,
    error: Option<String>,
    notice: Option<String>,
}

impl LoginFlow {
    /// Start the flow. A session already held by the client's store starts
    /// it authenticated.
    pub fn new(client: DispatchClient) -> Self {
        let state = match client.session().current() {
            Some(session) => LoginState::Authenticated(session),
            None => LoginState::Anonymous,
        };

        Self {
            client,
            state,
            otp: String::new(),
            error: None,
            notice: None,
        }
    }

    /// Resume a flow whose OTP was requested earlier, for example by a
    /// previous process
    pub fn with_pending_otp(client: DispatchClient, phone_number: &str) -> Self {
        let mut flow = Self::new(client);
        flow.state = LoginState::OtpPending {
            phone_number: phone_number.trim().to_string(),
        };
        flow
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// The last error shown to the user
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last success message shown to the user
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The code most recently submitted for verification
    pub fn otp(&self) -> &str {
        &self.otp
    }

    /// Ask the backend to send an OTP to `phone_number`
    pub async fn request_otp(&mut self, phone_number: &str) -> AuthOutcome {
        if self.state.is_authenticated() {
            return self.report(AuthOutcome::failure("Already logged in"));
        }

        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return self.report(AuthOutcome::failure("Phone number is required"));
        }

        let response = self.client.request_admin_otp(phone_number).await;
        let outcome = match accepted(response) {
            Ok(Some(response)) => {
                self.state = LoginState::OtpPending {
                    phone_number: phone_number.to_string(),
                };
                AuthOutcome::success(
                    response.body.message().unwrap_or_else(|| OTP_SENT_MESSAGE.to_string()),
                )
            }
            Ok(None) => AuthOutcome::failure(OTP_SEND_FAILED_MESSAGE),
            Err(message) => AuthOutcome::failure(message),
        };

        self.report(outcome)
    }

    /// Request another OTP for the pending phone number
    pub async fn resend_otp(&mut self) -> AuthOutcome {
        match &self.state {
            LoginState::OtpPending { phone_number } => {
                let phone_number = phone_number.clone();
                self.request_otp(&phone_number).await
            }
            _ => self.report(AuthOutcome::failure("Request an OTP first")),
        }
    }

    /// Verify the six digit `code` for the pending phone number.
    ///
    /// Only accounts flagged as administrators are signed in. Any other
    /// account sends the flow back to anonymous and nothing is persisted.
    pub async fn verify_otp(&mut self, code: &str) -> AuthOutcome {
        let phone_number = match &self.state {
            LoginState::OtpPending { phone_number } => phone_number.clone(),
            _ => return self.report(AuthOutcome::failure("Request an OTP first")),
        };

        self.otp = code.trim().to_string();
        if self.otp.len() != 6 || !self.otp.bytes().all(|b| b.is_ascii_digit()) {
            return self.report(AuthOutcome::failure("Enter the 6-digit OTP"));
        }

        let response = self.client.verify_admin_otp(&phone_number, &self.otp).await;
        let outcome = match accepted(response) {
            Ok(Some(response)) => self.complete_login(&response.body.into_json()),
            Ok(None) => AuthOutcome::failure(INVALID_OTP_MESSAGE),
            Err(message) => AuthOutcome::failure(message),
        };

        self.report(outcome)
    }

    /// Sign in with email and password, subject to the same admin check as
    /// OTP verification
    pub async fn login_with_password(&mut self, email: &str, password: &str) -> AuthOutcome {
        if self.state.is_authenticated() {
            return self.report(AuthOutcome::failure("Already logged in"));
        }

        let response = self.client.login_with_password(email.trim(), password).await;
        let outcome = match accepted(response) {
            Ok(Some(response)) => self.complete_login(&response.body.into_json()),
            Ok(None) => AuthOutcome::failure(LOGIN_FAILED_MESSAGE),
            Err(message) => AuthOutcome::failure(message),
        };

        self.report(outcome)
    }

    /// Abandon the pending OTP and start over with a different number
    pub fn change_phone_number(&mut self) {
        if matches!(self.state, LoginState::OtpPending { .. }) {
            self.state = LoginState::Anonymous;
        }
        self.otp.clear();
        self.error = None;
        self.notice = None;
    }

    /// Drop the session, in memory and in storage
    pub fn logout(&mut self) {
        self.client.session().clear();
        self.state = LoginState::Anonymous;
        self.otp.clear();
        self.error = None;
        self.notice = None;
        info!("Logged out");
    }

    fn complete_login(&mut self, body: &Value) -> AuthOutcome {
        let account = ACCOUNT
            .iter()
            .filter_map(|path| body.pointer(path))
            .find(|v| v.is_object())
            .unwrap_or(body);

        if !is_admin_record(account) {
            warn!("Rejected login for an account without admin privileges");
            self.state = LoginState::Anonymous;
            self.otp.clear();
            return AuthOutcome::failure(ACCESS_DENIED_MESSAGE);
        }

        let session = Session::from_account(account, resolve_text(body, TOKEN));
        if let Err(e) = self.client.session().save(session.clone()) {
            warn!("Session is held in memory only, persisting failed: {}", e);
        }
        info!("Admin {} logged in", session.id);
        self.state = LoginState::Authenticated(session);

        AuthOutcome::success(
            body.get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(LOGIN_SUCCESS_MESSAGE),
        )
    }

    fn report(&mut self, outcome: AuthOutcome) -> AuthOutcome {
        if outcome.success {
            self.notice = Some(outcome.message.clone());
            self.error = None;
        } else {
            self.error = Some(outcome.message.clone());
            self.notice = None;
        }
        outcome
    }
}

/// Classify a login response: `Ok(Some)` when accepted, `Ok(None)` when
/// rejected without a message, `Err(message)` otherwise.
fn accepted(response: Result<FetchResponse>) -> std::result::Result<Option<FetchResponse>, String> {
    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!("Login request failed: {}", e);
            return Err(NETWORK_ERROR_MESSAGE.to_string());
        }
    };

    if response.is_success() && response.body.success_flag() != Some(false) {
        return Ok(Some(response));
    }

    match response.body.message() {
        Some(message) => Err(message),
        None => Ok(None),
    }
}

use reqwest::Method;
use serde::Serialize;

use super::{reply, ApiReply, DispatchClient, Notification, UserType};
use crate::error::{Error, Result};

/// A notification together with its addressing fields
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Addressed<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_type: Option<UserType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_ids: Option<&'a [String]>,
    #[serde(flatten)]
    notification: &'a Notification,
}

impl<'a> Addressed<'a> {
    fn new(notification: &'a Notification) -> Self {
        Self {
            user_type: None,
            user_id: None,
            user_ids: None,
            notification,
        }
    }
}

impl DispatchClient {
    /// Send a test notification to the logged-in admin's own devices
    pub async fn send_test_notification(&self) -> Result<ApiReply> {
        let response = self.request(Method::POST, "/notifications/test").execute().await?;
        reply(response, "send test notification")
    }

    /// Broadcast a promotion, optionally only to riders or drivers
    pub async fn send_promotional_notification(
        &self,
        notification: &Notification,
        user_type: Option<UserType>,
    ) -> Result<ApiReply> {
        let payload = Addressed {
            user_type,
            ..Addressed::new(notification)
        };
        self.send("/notifications/promotional", &payload).await
    }

    /// Notify every rider and driver
    pub async fn send_notification_to_all(&self, notification: &Notification) -> Result<ApiReply> {
        self.send("/notifications/send-to-all", &Addressed::new(notification))
            .await
    }

    pub async fn send_notification_to_type(
        &self,
        user_type: UserType,
        notification: &Notification,
    ) -> Result<ApiReply> {
        let payload = Addressed {
            user_type: Some(user_type),
            ..Addressed::new(notification)
        };
        self.send("/notifications/send-to-type", &payload).await
    }

    pub async fn send_notification_to_user(&self, user_id: &str, notification: &Notification) -> Result<ApiReply> {
        if user_id.trim().is_empty() {
            return Err(Error::invalid_input("A user id is required"));
        }

        let payload = Addressed {
            user_id: Some(user_id),
            ..Addressed::new(notification)
        };
        self.send("/notifications/send", &payload).await
    }

    /// Notify a set of users. At least one user id is required.
    pub async fn send_bulk_notification(&self, user_ids: &[String], notification: &Notification) -> Result<ApiReply> {
        if user_ids.is_empty() {
            return Err(Error::invalid_input("Select at least one user"));
        }

        let payload = Addressed {
            user_ids: Some(user_ids),
            ..Addressed::new(notification)
        };
        self.send("/notifications/send-bulk", &payload).await
    }

    async fn send(&self, path: &str, payload: &Addressed<'_>) -> Result<ApiReply> {
        payload.notification.validate()?;

        let response = self
            .request(Method::POST, path)
            .json(payload)?
            .execute()
            .await?;

        reply(response, "send notification")
    }
}

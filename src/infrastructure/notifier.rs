//! Alert delivery

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::domain::interfaces::{Notification, Notifier};
use crate::shared::errors::NotifyError;

/// Posts the publish request as JSON to a notification gateway
pub struct WebhookNotifier {
    http_client: Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            "Publishing to {}: {}",
            self.endpoint,
            serde_json::to_string(notification).unwrap_or_default()
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await
            .map_err(|e| NotifyError::PublishFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::PublishFailed(format!("gateway returned {}", status)));
        }

        info!("Received response: {}", status);
        Ok(())
    }
}

/// Writes alerts to the log only. Used when no gateway is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, notification: &Notification) -> Result<(), NotifyError> {
        warn!(
            "No notify endpoint configured, alert for {} not delivered: {}",
            notification.topic_arn, notification.message
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notification() -> Notification {
        Notification::sms(
            "arn:aws:sns:ap-southeast-2:000000000000:petrol-alert",
            "X from 100 to 121 and 0 others",
            Some("PETROLWATCH"),
            Some("PETROL WATCH - Price increase detected!"),
        )
    }

    #[tokio::test]
    async fn test_publish_posts_notification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/publish"))
            .and(body_partial_json(json!({
                "TopicArn": "arn:aws:sns:ap-southeast-2:000000000000:petrol-alert",
                "Message": "X from 100 to 121 and 0 others",
                "Subject": "PETROL WATCH - Price increase detected!",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(format!("{}/publish", server.uri()));
        notifier.publish(&notification()).await.unwrap();
    }

    #[tokio::test]
    async fn test_gateway_rejection_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri());
        let err = notifier.publish(&notification()).await.unwrap_err();

        assert!(matches!(err, NotifyError::PublishFailed(_)));
    }

    #[tokio::test]
    async fn test_log_notifier_accepts() {
        assert!(LogNotifier.publish(&notification()).await.is_ok());
    }
}

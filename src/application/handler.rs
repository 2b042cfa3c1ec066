//! Invocation handler: wires the concrete collaborators and runs one cycle

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

use crate::config::MonitorConfig;
use crate::domain::interfaces::{ComputeController, InvocationContext, Notifier};
use crate::domain::price::{CycleReport, PriceMonitor};
use crate::infrastructure::{
    ControlPlaneClient, FsObjectStore, LogComputeController, LogNotifier, UpstreamClient, WebhookNotifier,
};
use crate::shared::errors::MonitorError;

/// Trigger payload. Only `url` is interpreted; other fields are kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TriggerEvent {
    pub fn from_json(raw: &str) -> Result<Self, MonitorError> {
        serde_json::from_str(raw).map_err(|e| MonitorError::Config(format!("Invalid event payload: {}", e)))
    }
}

pub struct CheckPricesHandler {
    monitor: PriceMonitor,
    context: InvocationContext,
}

impl CheckPricesHandler {
    pub fn new(monitor: PriceMonitor, context: InvocationContext) -> Self {
        Self { monitor, context }
    }

    /// Build the handler with the production collaborators
    pub fn from_config(
        config: &MonitorConfig,
        store_root: &Path,
        context: InvocationContext,
    ) -> Result<Self, MonitorError> {
        let fetcher = Arc::new(UpstreamClient::new(config.url_query_timeout())?);
        let store = Arc::new(FsObjectStore::new(store_root));

        let notifier: Arc<dyn Notifier> = match &config.notify_endpoint {
            Some(endpoint) => Arc::new(WebhookNotifier::new(endpoint.clone())),
            None => {
                warn!("⚠️ NOTIFY_ENDPOINT not set, alerts will only be logged");
                Arc::new(LogNotifier)
            }
        };
        let controller: Arc<dyn ComputeController> = match &config.control_plane_endpoint {
            Some(endpoint) => Arc::new(ControlPlaneClient::new(endpoint.clone())),
            None => {
                warn!("⚠️ CONTROL_PLANE_ENDPOINT not set, cold start recovery will only be logged");
                Arc::new(LogComputeController)
            }
        };

        let monitor = PriceMonitor::new(config, fetcher, store, notifier, controller);
        Ok(Self::new(monitor, context))
    }

    pub async fn handle(&self, event: &TriggerEvent) -> Result<CycleReport, MonitorError> {
        let run_id = uuid::Uuid::new_v4();
        let span = info_span!("check_prices", %run_id, function = %self.context.function_name);

        async {
            info!(
                "Event Received: {}",
                serde_json::to_string(event).unwrap_or_default()
            );

            match self.monitor.check_prices(&self.context, event.url.as_deref()).await {
                Ok(report) => {
                    info!(
                        "✅ Saved {} prices under {} (alert: {})",
                        report.stations,
                        report.key,
                        report.alert.as_ref().map(|a| a.message()).unwrap_or_else(|| "none".to_string())
                    );
                    Ok(report)
                }
                Err(e) => {
                    error!("❌ Price check failed: {}", e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_event_with_url() {
        let event = TriggerEvent::from_json(r#"{"url": "http://replay/box.json", "source": "aws.events"}"#).unwrap();
        assert_eq!(event.url.as_deref(), Some("http://replay/box.json"));
        assert_eq!(event.extra.get("source"), Some(&json!("aws.events")));
    }

    #[test]
    fn test_empty_event() {
        let event = TriggerEvent::from_json("{}").unwrap();
        assert_eq!(event, TriggerEvent::default());
    }

    #[test]
    fn test_invalid_event() {
        assert!(matches!(TriggerEvent::from_json("[1, 2]"), Err(MonitorError::Config(_))));
    }

    fn listing(prices: [i64; 2]) -> Value {
        json!({ "message": { "list": [
            { "id": "a1", "name": "United Petersham", "prices": { "E10": { "amount": prices[0] } } },
            { "id": "b2", "name": "Ampol Leichhardt", "prices": { "E10": { "amount": prices[1] } } },
        ] } })
    }

    #[tokio::test]
    async fn test_two_cycles_against_live_collaborators() {
        let server = MockServer::start().await;
        let store_root = tempfile::tempdir().unwrap();

        let config = MonitorConfig {
            centre_lat: -33.8969,
            centre_lng: 151.1553,
            min_coord_dist: 0.01,
            max_coord_dist: 0.02,
            alert_topic: "petrol-alert".to_string(),
            prices_bucket: "prices".to_string(),
            url_query_timeout: 5,
            petrol_type: "E10".to_string(),
            url_base: format!("{}/station/box", server.uri()),
            notify_endpoint: Some(format!("{}/publish", server.uri())),
            control_plane_endpoint: None,
        };
        let context = InvocationContext {
            function_name: "checkPrices".to_string(),
            memory_limit_mb: 128,
        };
        let handler = CheckPricesHandler::from_config(&config, store_root.path(), context).unwrap();

        Mock::given(method("GET"))
            .and(path("/station/box"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing([179, 183])))
            .mount(&server)
            .await;

        let first = handler.handle(&TriggerEvent::default()).await.unwrap();
        assert_eq!(first.key, "-33.897.151.155.json");
        assert!(first.alert.is_none());
        assert!(store_root.path().join("prices").join(&first.key).exists());

        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/station/box"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing([205, 186])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/publish"))
            .and(body_partial_json(json!({ "Message": "United Petersham from 179 to 205 and 0 others" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let second = handler.handle(&TriggerEvent::default()).await.unwrap();
        assert_eq!(second.overlap, Some(2));
        assert_eq!(second.alert.map(|a| a.new_price), Some(205));
    }
}

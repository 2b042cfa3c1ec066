//! One check cycle: fetch, extract, compare, alert, persist

use rand::Rng;
use rand_distr::Normal;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::MonitorConfig;
use crate::domain::geo::GeoJitter;
use crate::domain::interfaces::{ComputeController, HttpFetcher, InvocationContext, Notification, Notifier, ObjectStore};
use crate::domain::recovery::RecoveryAction;
use crate::shared::errors::{FetchError, MonitorError};
use crate::shared::types::{AlertEvent, BoundingBox, Coordinate};
use crate::shared::utils::timestamp_ms;
use super::{PriceComparator, PriceExtractor, SnapshotStore, ALERT_NAME, ALERT_SUBJECT};

/// Mean and spread of the simulated delay between page load and query, in ms
const AJAX_DELAY_MEAN_MS: f64 = 1500.0;
const AJAX_DELAY_STD_MS: f64 = 200.0;

/// Summary of a successful cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub key: String,
    pub stations: usize,
    /// `None` when there was no previous snapshot
    pub overlap: Option<usize>,
    pub alert: Option<AlertEvent>,
}

/// Monitors fuel prices around a fixed center
pub struct PriceMonitor {
    center: Coordinate,
    url_base: String,
    alert_topic: String,
    jitter: GeoJitter,
    extractor: PriceExtractor,
    comparator: PriceComparator,
    snapshots: SnapshotStore,
    fetcher: Arc<dyn HttpFetcher>,
    notifier: Arc<dyn Notifier>,
    controller: Arc<dyn ComputeController>,
}

impl PriceMonitor {
    pub fn new(
        config: &MonitorConfig,
        fetcher: Arc<dyn HttpFetcher>,
        store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        controller: Arc<dyn ComputeController>,
    ) -> Self {
        Self {
            center: config.center(),
            url_base: config.url_base.clone(),
            alert_topic: config.alert_topic.clone(),
            jitter: GeoJitter::new(config.min_coord_dist, config.max_coord_dist),
            extractor: PriceExtractor::new(config.petrol_type.clone()),
            comparator: PriceComparator::default(),
            snapshots: SnapshotStore::new(store, config.prices_bucket.clone()),
            fetcher,
            notifier,
            controller,
        }
    }

    /// Run one cycle. `override_url` replaces the generated upstream query.
    pub async fn check_prices(
        &self,
        context: &InvocationContext,
        override_url: Option<&str>,
    ) -> Result<CycleReport, MonitorError> {
        let coords = self.center.rounded();
        let url = self.plan_query(coords, override_url);

        let raw = self.fetch_raw_data(&url, context).await?;
        let new_prices = self.extractor.extract(&raw)?;

        let key = coords.snapshot_key();
        let old_prices = self.snapshots.load(&key).await?;

        let comparison = self.comparator.compare(old_prices.as_ref(), &new_prices);
        if old_prices.is_some() {
            info!(
                "{} stations are common between old and new data, resulting in the following updates: {}",
                comparison.overlap,
                serde_json::to_string(&comparison.deltas).unwrap_or_default()
            );
        }

        if let Some(alert) = &comparison.alert {
            self.publish_alert(alert).await?;
        }

        self.snapshots.save(&key, &new_prices).await?;

        Ok(CycleReport {
            key,
            stations: new_prices.len(),
            overlap: old_prices.map(|_| comparison.overlap),
            alert: comparison.alert,
        })
    }

    fn plan_query(&self, coords: Coordinate, override_url: Option<&str>) -> String {
        let mut rng = rand::thread_rng();
        let boundary = self.jitter.compute_boundary(coords, &mut rng);
        match override_url {
            Some(url) => url.to_string(),
            None => build_query_url(&self.url_base, &boundary, timestamp_ms(), &mut rng),
        }
    }

    async fn fetch_raw_data(&self, url: &str, context: &InvocationContext) -> Result<Value, MonitorError> {
        info!("Querying {}", url);
        match self.fetcher.fetch(url).await {
            Ok(raw) => Ok(raw),
            Err(FetchError::Timeout(detail)) => {
                warn!("Connection timed out");
                if let Err(e) = RecoveryAction::force_cold_restart(self.controller.as_ref(), context).await {
                    error!("❌ Cold start mitigation failed: {}", e);
                }
                Err(MonitorError::UpstreamTimeout(detail))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn publish_alert(&self, alert: &AlertEvent) -> Result<(), MonitorError> {
        let notification = Notification::sms(
            self.alert_topic.clone(),
            alert.message(),
            Some(ALERT_NAME),
            Some(ALERT_SUBJECT),
        );
        self.notifier.publish(&notification).await?;
        info!("🚨 Price alert published: {}", notification.message);
        Ok(())
    }
}

/// Upstream box query with a browser-style cache buster.
///
/// `ts` is the request time; `_` imitates the page load time a little earlier.
pub fn build_query_url<R: Rng>(base: &str, boundary: &BoundingBox, now_ms: i64, rng: &mut R) -> String {
    let delay = Normal::new(AJAX_DELAY_MEAN_MS, AJAX_DELAY_STD_MS)
        .map(|normal| rng.sample(normal))
        .unwrap_or(AJAX_DELAY_MEAN_MS);
    let ajax = now_ms - delay as i64;
    format!(
        "{}?neLat={}&neLng={}&swLat={}&swLng={}&ts={}&_={}",
        base, boundary.ne_lat, boundary.ne_lng, boundary.sw_lat, boundary.sw_lng, now_ms, ajax
    )
}

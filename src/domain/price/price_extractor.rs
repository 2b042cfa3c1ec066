//! Normalizes the upstream station listing into a snapshot

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::shared::errors::MonitorError;
use crate::shared::types::{Snapshot, StationPrice};

/// Upstream response envelope
#[derive(Debug, Deserialize)]
struct StationBoxResponse {
    message: StationBoxMessage,
}

#[derive(Debug, Deserialize)]
struct StationBoxMessage {
    list: Vec<StationRecord>,
}

/// One station as listed upstream
#[derive(Debug, Deserialize)]
struct StationRecord {
    id: StationId,
    name: String,
    /// Other grades are never read, so they are kept undecoded
    #[serde(default)]
    prices: HashMap<String, Value>,
}

/// Station ids are opaque; some feeds send them as numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StationId {
    Text(String),
    Number(serde_json::Number),
}

impl StationId {
    fn into_string(self) -> String {
        match self {
            StationId::Text(s) => s,
            StationId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GradePrice {
    amount: f64,
}

/// Keeps only the stations that list the tracked fuel grade
pub struct PriceExtractor {
    grade: String,
}

impl PriceExtractor {
    pub fn new(grade: impl Into<String>) -> Self {
        Self { grade: grade.into() }
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    /// Build a snapshot from the raw payload.
    ///
    /// Fails with `UpstreamHttp` when the payload does not have the expected
    /// shape and with `NoData` when no station lists the grade.
    pub fn extract(&self, raw: &Value) -> Result<Snapshot, MonitorError> {
        let response = StationBoxResponse::deserialize(raw)
            .map_err(|e| MonitorError::UpstreamHttp(format!("Malformed station listing: {}", e)))?;

        let stations = response.message.list;
        info!("Found data on {} stations.", stations.len());

        let mut snapshot = Snapshot::new();
        for mut station in stations {
            let Some(entry) = station.prices.remove(&self.grade) else {
                continue;
            };
            let grade_price = GradePrice::deserialize(&entry).map_err(|e| {
                MonitorError::UpstreamHttp(format!("Malformed {} price for {}: {}", self.grade, station.name, e))
            })?;

            let price = to_subunits(grade_price.amount);
            if price as f64 != grade_price.amount {
                debug!("Rounded {} amount {} to {}", station.name, grade_price.amount, price);
            }
            snapshot.insert(station.id.into_string(), StationPrice::new(station.name, price));
        }

        if snapshot.is_empty() {
            return Err(MonitorError::NoData(self.grade.clone()));
        }

        Ok(snapshot)
    }
}

fn to_subunits(amount: f64) -> i64 {
    amount.round() as i64
}

//! Price domain - extraction, comparison and monitoring

mod price_monitor;
mod price_extractor;
mod price_comparator;
mod snapshot_store;

pub use price_monitor::{build_query_url, CycleReport, PriceMonitor};
pub use price_extractor::PriceExtractor;
pub use price_comparator::{Comparison, PriceComparator};
pub use snapshot_store::SnapshotStore;

/// Price rise, in subunits, that a station must exceed to count towards an alert
pub const ALERT_THRESHOLD: i64 = 20;

/// SMS sender id attached to alerts
pub const ALERT_NAME: &str = "PETROLWATCH";

pub const ALERT_SUBJECT: &str = "PETROL WATCH - Price increase detected!";

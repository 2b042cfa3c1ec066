//! Snapshot diffing and alert detection

use std::collections::BTreeMap;
use crate::shared::types::{AlertEvent, PriceDelta, Snapshot};
use super::ALERT_THRESHOLD;

/// Outcome of comparing two snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Stations present in both snapshots
    pub overlap: usize,
    /// Changed prices keyed by station name
    pub deltas: BTreeMap<String, PriceDelta>,
    pub alert: Option<AlertEvent>,
}

/// Compares a fresh snapshot against the previous one for the same key
pub struct PriceComparator {
    threshold: i64,
}

impl Default for PriceComparator {
    fn default() -> Self {
        Self::new(ALERT_THRESHOLD)
    }
}

impl PriceComparator {
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    /// Diff `new` against `old`.
    ///
    /// A station qualifies when its price rose by strictly more than the
    /// threshold. The alert names the qualifying station with the lowest id.
    pub fn compare(&self, old: Option<&Snapshot>, new: &Snapshot) -> Comparison {
        let Some(old) = old else {
            return Comparison::default();
        };

        let mut comparison = Comparison::default();
        let mut increases = 0usize;
        let mut example: Option<AlertEvent> = None;

        for (station_id, new_values) in new.iter() {
            let Some(old_values) = old.get(station_id) else {
                continue;
            };
            comparison.overlap += 1;

            let (old_price, new_price) = (old_values.price, new_values.price);
            if old_price == new_price {
                continue;
            }
            comparison
                .deltas
                .insert(new_values.name.clone(), PriceDelta { old_price, new_price });

            if new_price.saturating_sub(old_price) > self.threshold {
                increases += 1;
                if example.is_none() {
                    example = Some(AlertEvent {
                        station_id: station_id.clone(),
                        name: new_values.name.clone(),
                        old_price,
                        new_price,
                        others: 0,
                    });
                }
            }
        }

        comparison.alert = example.map(|alert| AlertEvent {
            others: increases - 1,
            ..alert
        });
        comparison
    }
}

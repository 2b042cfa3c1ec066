//! Common types used across the application

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::utils::{format_coord, round_to};

/// Decimal places used when deriving snapshot keys from a coordinate
pub const KEY_PRECISION: i32 = 3;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Round both components to the snapshot key precision
    pub fn rounded(&self) -> Self {
        Self {
            lat: round_to(self.lat, KEY_PRECISION),
            lng: round_to(self.lng, KEY_PRECISION),
        }
    }

    /// Object store key for snapshots taken around this coordinate.
    ///
    /// The coordinate is rounded first, so any two centers that agree to
    /// three decimal places share a key.
    pub fn snapshot_key(&self) -> String {
        let rounded = self.rounded();
        format!("{}.{}.json", format_coord(rounded.lat), format_coord(rounded.lng))
    }
}

/// Query rectangle sent to the upstream service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ne_lat: f64,
    pub ne_lng: f64,
    pub sw_lat: f64,
    pub sw_lng: f64,
}

/// Price of the tracked grade at one station, in currency subunits (cents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationPrice {
    pub name: String,
    pub price: i64,
}

impl StationPrice {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Point-in-time prices for one geographic key, keyed by upstream station id.
///
/// Serializes as a plain JSON object: `{"<id>": {"name": .., "price": ..}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    stations: BTreeMap<String, StationPrice>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, station_id: impl Into<String>, price: StationPrice) {
        self.stations.insert(station_id.into(), price);
    }

    pub fn get(&self, station_id: &str) -> Option<&StationPrice> {
        self.stations.get(station_id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Stations in ascending station id order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StationPrice)> {
        self.stations.iter()
    }
}

impl FromIterator<(String, StationPrice)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, StationPrice)>>(iter: I) -> Self {
        Self {
            stations: iter.into_iter().collect(),
        }
    }
}

/// Price change for a station present in both snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceDelta {
    #[serde(rename = "old")]
    pub old_price: i64,
    #[serde(rename = "new")]
    pub new_price: i64,
}

/// Alert raised when at least one station rose by more than the threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub station_id: String,
    pub name: String,
    pub old_price: i64,
    pub new_price: i64,
    /// Qualifying stations besides the representative one
    pub others: usize,
}

impl AlertEvent {
    pub fn message(&self) -> String {
        format!(
            "{} from {} to {} and {} others",
            self.name, self.old_price, self.new_price, self.others
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_key_rounds_coordinates() {
        let centre = Coordinate::new(-33.86549, 151.20931);
        assert_eq!(centre.snapshot_key(), "-33.865.151.209.json");
    }

    #[test]
    fn test_snapshot_key_stable_for_nearby_centres() {
        let a = Coordinate::new(-27.46801, 153.02349);
        let b = Coordinate::new(-27.46849, 153.02341);
        assert_eq!(a.snapshot_key(), b.snapshot_key());
    }

    #[test]
    fn test_snapshot_key_on_binary_half_boundary() {
        let centre = Coordinate::new(-33.8685, 151.2095);
        assert_eq!(centre.snapshot_key(), "-33.868.151.209.json");
    }

    #[test]
    fn test_snapshot_key_whole_degrees() {
        let centre = Coordinate::new(-34.0, 151.0);
        assert_eq!(centre.snapshot_key(), "-34.0.151.0.json");
    }

    #[test]
    fn test_rounding_is_idempotent() {
        for x in [-33.86549, 151.2095, 0.0004999, 12.3456789, -0.0005] {
            let once = round_to(x, KEY_PRECISION);
            assert_eq!(round_to(once, KEY_PRECISION), once);
        }
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("abc", StationPrice::new("Metro Ashfield", 189));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"abc": {"name": "Metro Ashfield", "price": 189}})
        );

        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_alert_message() {
        let alert = AlertEvent {
            station_id: "A".to_string(),
            name: "X".to_string(),
            old_price: 100,
            new_price: 121,
            others: 0,
        };
        assert_eq!(alert.message(), "X from 100 to 121 and 0 others");
    }
}

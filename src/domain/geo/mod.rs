//! Geo domain - query boundary computation

mod geo_jitter;

pub use geo_jitter::{wobble, GeoJitter};

/// Largest absolute wobble applied to a boundary component, in degrees
pub const WOBBLE_MAX: f64 = 0.0005;

/// Decimal places kept after wobbling
pub const WOBBLE_PRECISION: i32 = 14;

//! Randomized query boundaries

use rand::Rng;
use crate::shared::types::{BoundingBox, Coordinate};
use crate::shared::utils::round_to;
use super::{WOBBLE_MAX, WOBBLE_PRECISION};

/// Derives a jittered bounding box around a center so that consecutive
/// queries never share the same shape
pub struct GeoJitter {
    min_dist: f64,
    max_dist: f64,
}

impl GeoJitter {
    pub fn new(min_dist: f64, max_dist: f64) -> Self {
        Self { min_dist, max_dist }
    }

    /// NE corner is pushed out by `[min_dist, max_dist]` per axis, SW corner
    /// pulled in by the same range, then every component is wobbled.
    pub fn compute_boundary<R: Rng>(&self, center: Coordinate, rng: &mut R) -> BoundingBox {
        BoundingBox {
            ne_lat: wobble(center.lat + self.offset(rng), rng),
            ne_lng: wobble(center.lng + self.offset(rng), rng),
            sw_lat: wobble(center.lat - self.offset(rng), rng),
            sw_lng: wobble(center.lng - self.offset(rng), rng),
        }
    }

    fn offset<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max_dist > self.min_dist {
            rng.gen_range(self.min_dist..=self.max_dist)
        } else {
            self.min_dist
        }
    }
}

/// Small symmetric perturbation, rounded to 14 decimal places
pub fn wobble<R: Rng>(coord: f64, rng: &mut R) -> f64 {
    round_to(coord + rng.gen_range(-WOBBLE_MAX..WOBBLE_MAX), WOBBLE_PRECISION)
}

//! Petrol Watch - fuel price snapshot diffing and alerting
//! Built with Domain-Driven Design principles

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use config::MonitorConfig;
pub use domain::geo::GeoJitter;
pub use domain::price::{PriceComparator, PriceExtractor, PriceMonitor};
pub use domain::recovery::RecoveryAction;

use serde::Deserialize;
use std::{env, fs, path::Path, str::FromStr, time::Duration};

use crate::shared::errors::MonitorError;
use crate::shared::types::Coordinate;

pub const DEFAULT_PETROL_TYPE: &str = "E10";
pub const DEFAULT_URL_BASE: &str = "https://petrolspy.com.au/webservice-1/station/box";

/// Monitor configuration, built once at start-up
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorConfig {
    pub centre_lat: f64,
    pub centre_lng: f64,
    pub min_coord_dist: f64,
    pub max_coord_dist: f64,
    pub alert_topic: String,
    pub prices_bucket: String,
    /// Upstream request timeout in seconds
    pub url_query_timeout: u64,
    #[serde(default = "default_petrol_type")]
    pub petrol_type: String,
    #[serde(default = "default_url_base")]
    pub url_base: String,
    /// Where alerts are POSTed; alerts are only logged when unset
    #[serde(default)]
    pub notify_endpoint: Option<String>,
    /// Control plane used for cold restarts; reconfiguration is only logged when unset
    #[serde(default)]
    pub control_plane_endpoint: Option<String>,
}

fn default_petrol_type() -> String {
    DEFAULT_PETROL_TYPE.to_string()
}

fn default_url_base() -> String {
    DEFAULT_URL_BASE.to_string()
}

impl MonitorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MonitorError> {
        let s = fs::read_to_string(path.as_ref())
            .map_err(|e| MonitorError::Config(format!("Failed to read config file: {}", e)))?;
        let cfg: Self = toml::from_str(&s)
            .map_err(|e| MonitorError::Config(format!("Failed to parse config file: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self, MonitorError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MonitorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| MonitorError::Config(format!("{} is not set", name)))
        };

        let cfg = Self {
            centre_lat: parse(&required("CENTRE_LAT")?, "CENTRE_LAT")?,
            centre_lng: parse(&required("CENTRE_LNG")?, "CENTRE_LNG")?,
            min_coord_dist: parse(&required("MIN_COORD_DIST")?, "MIN_COORD_DIST")?,
            max_coord_dist: parse(&required("MAX_COORD_DIST")?, "MAX_COORD_DIST")?,
            alert_topic: required("PETROL_ALERT_TOPIC")?,
            prices_bucket: required("PRICES_BUCKET")?,
            url_query_timeout: parse(&required("URL_QUERY_TIMEOUT")?, "URL_QUERY_TIMEOUT")?,
            petrol_type: lookup("PETROL_TYPE").unwrap_or_else(default_petrol_type),
            url_base: lookup("URL_BASE").unwrap_or_else(default_url_base),
            notify_endpoint: lookup("NOTIFY_ENDPOINT"),
            control_plane_endpoint: lookup("CONTROL_PLANE_ENDPOINT"),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if !self.centre_lat.is_finite() || self.centre_lat.abs() > 90.0 {
            return Err(MonitorError::Config(format!("CENTRE_LAT out of range: {}", self.centre_lat)));
        }
        if !self.centre_lng.is_finite() || self.centre_lng.abs() > 180.0 {
            return Err(MonitorError::Config(format!("CENTRE_LNG out of range: {}", self.centre_lng)));
        }
        if !(self.min_coord_dist >= 0.0 && self.min_coord_dist <= self.max_coord_dist) {
            return Err(MonitorError::Config(format!(
                "Coordinate distances must satisfy 0 <= min <= max, got {} and {}",
                self.min_coord_dist, self.max_coord_dist
            )));
        }
        if !self.max_coord_dist.is_finite() {
            return Err(MonitorError::Config("MAX_COORD_DIST must be finite".to_string()));
        }
        if self.url_query_timeout == 0 {
            return Err(MonitorError::Config("URL_QUERY_TIMEOUT must be positive".to_string()));
        }
        if self.alert_topic.is_empty() || self.prices_bucket.is_empty() || self.petrol_type.is_empty() {
            return Err(MonitorError::Config(
                "PETROL_ALERT_TOPIC, PRICES_BUCKET and PETROL_TYPE must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.centre_lat, self.centre_lng)
    }

    pub fn url_query_timeout(&self) -> Duration {
        Duration::from_secs(self.url_query_timeout)
    }
}

fn parse<T: FromStr>(value: &str, name: &str) -> Result<T, MonitorError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| MonitorError::Config(format!("Invalid {} '{}': {}", name, value, e)))
}

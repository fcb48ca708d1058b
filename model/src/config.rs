use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::live::LiveTiming;

pub const API_URL_ENV_VAR: &str = "TRANSIT_API_URL";

pub fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}
pub fn default_live_mode() -> LiveMode {
    LiveMode::Stream
}
pub fn default_reconnect_interval_secs() -> f64 {
    3.0
}
pub fn default_poll_interval_secs() -> f64 {
    2.0
}
pub fn default_idle_timeout_secs() -> f64 {
    30.0
}
pub fn default_initial_region() -> MapRegion {
    // Bloomington, Indiana
    MapRegion {
        latitude: 39.1653,
        longitude: -86.5264,
        latitude_delta: 0.05,
        longitude_delta: 0.05,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveMode {
    Stream,
    Poll,
}

/// What the map shows before anything is selected
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_live_mode")]
    pub live_mode: LiveMode,
    #[serde(default = "default_reconnect_interval_secs")]
    pub reconnect_interval_secs: f64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: f64,
    /// A live connection or poll that's silent this long is given up on
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: f64,
    #[serde(default = "default_initial_region")]
    pub initial_region: MapRegion,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            live_mode: default_live_mode(),
            reconnect_interval_secs: default_reconnect_interval_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            initial_region: default_initial_region(),
        }
    }
}

impl SessionConfig {
    /// Reads a JSON config file if there is one, then lets the environment override the
    /// backend URL.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_json(&fs_err::read_to_string(path)?)
                .map_err(|err| anyhow!("{path}: {err}"))?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
            if !url.trim().is_empty() {
                info!("Using {API_URL_ENV_VAR}={url}");
                config.api_url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            bail!("api_url can't be empty");
        }
        for (name, secs) in [
            ("reconnect_interval_secs", self.reconnect_interval_secs),
            ("poll_interval_secs", self.poll_interval_secs),
            ("idle_timeout_secs", self.idle_timeout_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                bail!("{name} must be positive, not {secs}");
            }
        }
        Ok(())
    }

    pub fn timing(&self) -> LiveTiming {
        LiveTiming {
            reconnect_interval: Duration::from_secs_f64(self.reconnect_interval_secs),
            poll_interval: Duration::from_secs_f64(self.poll_interval_secs),
            idle_timeout: Duration::from_secs_f64(self.idle_timeout_secs),
        }
    }
}

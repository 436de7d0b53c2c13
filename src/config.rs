//! Sweep settings.
//!
//! Layering, lowest to highest: built-in defaults, TOML config file, CLI flags
//! (the API key flag also reads `GOOGLE_MAPS_API_KEY`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SweepError};
use crate::model::LatLng;
use crate::places::DEFAULT_TOKEN_DELAY;
use crate::places::google::DEFAULT_ENDPOINT;

pub const DEFAULT_OUTPUT: &str = "pharmacies_in_sydney_grid_finer.csv";

/// Rough centre of greater Sydney.
pub const SYDNEY_CENTER: LatLng = LatLng::new(-33.899890, 150.980259);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub place_type: String,
    pub center: LatLng,
    pub cell_size_deg: f64,
    pub cells_per_axis: u32,
    /// Search radius per cell. 2.5 km undercounts any cell holding more than
    /// the API's 60-result ceiling.
    pub radius_m: u32,
    pub cap: usize,
    pub token_delay_ms: u64,
    pub timeout_secs: u64,
    pub output: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            place_type: "pharmacy".to_string(),
            center: SYDNEY_CENTER,
            cell_size_deg: 0.015,
            cells_per_axis: 60,
            radius_m: 2500,
            cap: 2000,
            token_delay_ms: DEFAULT_TOKEN_DELAY.as_millis() as u64,
            timeout_secs: 30,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Values supplied on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub place_type: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub cell_size_deg: Option<f64>,
    pub cells_per_axis: Option<u32>,
    pub radius_m: Option<u32>,
    pub cap: Option<usize>,
    pub token_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub output: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "places-sweep", "places-sweep")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl SweepConfig {
    /// Load from `explicit` (which must exist) or else from the platform config
    /// file if one is present, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
        Self::from_toml_str(&text)
            .map_err(|e| SweepError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn apply(&mut self, o: ConfigOverrides) {
        if let Some(v) = o.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = o.endpoint {
            self.endpoint = v;
        }
        if let Some(v) = o.place_type {
            self.place_type = v;
        }
        if let Some(v) = o.center_lat {
            self.center.lat = v;
        }
        if let Some(v) = o.center_lng {
            self.center.lng = v;
        }
        if let Some(v) = o.cell_size_deg {
            self.cell_size_deg = v;
        }
        if let Some(v) = o.cells_per_axis {
            self.cells_per_axis = v;
        }
        if let Some(v) = o.radius_m {
            self.radius_m = v;
        }
        if let Some(v) = o.cap {
            self.cap = v;
        }
        if let Some(v) = o.token_delay_ms {
            self.token_delay_ms = v;
        }
        if let Some(v) = o.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = o.output {
            self.output = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(SweepError::MissingApiKey);
        }
        if !self.center.lat.is_finite() || !self.center.lng.is_finite() {
            return Err(SweepError::Config(format!(
                "center must be finite, got {}",
                self.center
            )));
        }
        if !self.cell_size_deg.is_finite() || self.cell_size_deg <= 0.0 {
            return Err(SweepError::Config(format!(
                "cell_size_deg must be a positive number, got {}",
                self.cell_size_deg
            )));
        }
        if self.radius_m == 0 {
            return Err(SweepError::Config("radius_m must be greater than 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(SweepError::Config("timeout_secs must be greater than 0".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(SweepError::Config("endpoint must not be empty".into()));
        }
        Ok(())
    }

    pub fn token_delay(&self) -> Duration {
        Duration::from_millis(self.token_delay_ms)
    }
}

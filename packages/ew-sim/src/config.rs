//! TOML-backed simulation configuration: tick rate, antenna preset
//! overrides, and per-satellite scenario setup.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ew_types::AntennaConfig;

use crate::antenna;
use crate::error::SimConfigError;
use crate::satellite::DegradationConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteEntry {
    pub norad_id: u32,
    pub az_deg: f64,
    pub el_deg: f64,
    #[serde(default = "default_frequency_offset_hz")]
    pub frequency_offset_hz: f64,
    #[serde(default)]
    pub degradation: DegradationConfig,
}

fn default_frequency_offset_hz() -> f64 {
    crate::constants::SATELLITE_UPLINK_DOWNLINK_OFFSET_HZ
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_tick_hz")]
    pub tick_hz: f64,
    #[serde(default)]
    pub log_level: Option<String>,
    /// Additional antenna presets merged over the built-in catalog
    /// (§6: "implementers may extend"), keyed by preset id.
    #[serde(default)]
    pub antennas: HashMap<String, AntennaConfig>,
    #[serde(default)]
    pub satellites: Vec<SatelliteEntry>,
}

fn default_tick_hz() -> f64 {
    60.0
}

impl Default for SimConfig {
    fn default() -> SimConfig {
        SimConfig {
            tick_hz: default_tick_hz(),
            log_level: None,
            antennas: HashMap::new(),
            satellites: Vec::new(),
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<SimConfig, SimConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SimConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SimConfig = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Resolves a preset id against the built-in catalog, falling back to
    /// this config's `[antennas.*]` overrides.
    pub fn antenna_preset(&self, id: &str) -> Result<AntennaConfig, SimConfigError> {
        if let Some(cfg) = self.antennas.get(id) {
            return Ok(cfg.clone());
        }
        antenna::config::lookup(id).ok_or_else(|| SimConfigError::UnknownPreset(id.to_string()))
    }
}

use serde::{Deserialize, Serialize};

use crate::enums::TrackingMode;
use crate::signal::RfSignal;
use crate::units::{Dbm, Degrees, Hz};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Staged {
    pub az: Option<f64>,
    pub el: Option<f64>,
    pub pol: Option<f64>,
    pub beacon_hz: Option<f64>,
    pub beacon_bw_hz: Option<f64>,
}

impl Staged {
    pub fn has_any(&self) -> bool {
        self.az.is_some()
            || self.el.is_some()
            || self.pol.is_some()
            || self.beacon_hz.is_some()
            || self.beacon_bw_hz.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fault {
    pub on: bool,
    pub message: Option<String>,
}

/// Recomputed every tick from the current RF propagation pass; cheap to
/// regenerate, never persisted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RfMetrics {
    pub peak_gain_dbi: f64,
    pub hpbw_deg: f64,
    pub g_over_t_db: f64,
    pub noise_floor_dbm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntennaState {
    pub uuid: String,
    pub team_id: String,
    pub server_id: String,
    pub config_id: String,

    pub is_powered: bool,
    pub is_operational: bool,
    pub is_loopback: bool,
    pub is_locked: bool,
    pub is_auto_track_switch_up: bool,
    pub is_auto_track_enabled: bool,

    pub azimuth: Degrees,
    pub elevation: Degrees,
    pub polarization: Degrees,

    pub target_az: Degrees,
    pub target_el: Degrees,
    pub target_pol: Degrees,

    pub staged: Staged,
    pub has_staged_changes: bool,
    pub is_slewing: bool,

    pub tracking_mode: TrackingMode,
    pub target_satellite_id: Option<u32>,

    pub beacon_freq_hz: Hz,
    pub beacon_search_bw_hz: Hz,
    pub beacon_power: Option<Dbm>,
    pub is_beacon_locked: bool,

    pub heater_on: bool,
    pub blower_on: bool,
    pub precip_on: bool,

    pub rx_signals_in: Vec<RfSignal>,
    pub rf_metrics: Option<RfMetrics>,

    pub fault: Fault,
}

impl AntennaState {
    pub fn new(uuid: String, team_id: String, server_id: String, config_id: String) -> AntennaState {
        AntennaState {
            uuid,
            team_id,
            server_id,
            config_id,
            is_powered: false,
            is_operational: false,
            is_loopback: false,
            is_locked: false,
            is_auto_track_switch_up: false,
            is_auto_track_enabled: false,
            azimuth: Degrees(0.0),
            elevation: Degrees(0.0),
            polarization: Degrees(0.0),
            target_az: Degrees(0.0),
            target_el: Degrees(0.0),
            target_pol: Degrees(0.0),
            staged: Staged::default(),
            has_staged_changes: false,
            is_slewing: false,
            tracking_mode: TrackingMode::Manual,
            target_satellite_id: None,
            beacon_freq_hz: Hz(0.0),
            beacon_search_bw_hz: Hz(0.0),
            beacon_power: None,
            is_beacon_locked: false,
            heater_on: false,
            blower_on: false,
            precip_on: false,
            rx_signals_in: Vec::new(),
            rf_metrics: None,
            fault: Fault::default(),
        }
    }

    /// Breaking the lock resets both `is_locked` and `is_auto_track_enabled`,
    /// per the AntennaState invariant in §3.
    pub fn break_lock(&mut self) {
        self.is_locked = false;
        self.is_auto_track_enabled = false;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransmitterModem {
    pub id: String,
    pub modem_number: u32,
    pub antenna_id: Option<String>,
    pub if_signal: Option<RfSignal>,
    pub is_powered: bool,
    pub is_transmitting: bool,
    pub is_transmitting_switch_up: bool,
    pub is_test_mode: bool,
    pub is_faulted: bool,
    pub is_fault_switch_up: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmitterState {
    pub unit: u32,
    pub team_id: String,
    pub server_id: String,
    pub modems: [TransmitterModem; 4],
    pub active_modem: u32,
}

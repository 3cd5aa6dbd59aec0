//! The process-wide, single-threaded satellite registry (§4.1). Owned by
//! the tick loop, constructed once at simulation start and passed by
//! reference — never a global singleton (§9 Design Notes).

use std::collections::HashMap;

use ew_types::{Degrees, RfSignal};

use crate::satellite::Satellite;

pub struct SimulationManager {
    satellites: HashMap<u32, Satellite>,
    pub is_developer_mode: bool,
}

impl SimulationManager {
    pub fn new() -> SimulationManager {
        SimulationManager {
            satellites: HashMap::new(),
            is_developer_mode: false,
        }
    }

    /// Duplicates by `norad_id` replace the existing entry.
    pub fn add_satellite(&mut self, sat: Satellite) {
        self.satellites.insert(sat.norad_id, sat);
    }

    pub fn sat_by_norad(&self, id: u32) -> Option<&Satellite> {
        self.satellites.get(&id)
    }

    pub fn sat_by_norad_mut(&mut self, id: u32) -> Option<&mut Satellite> {
        self.satellites.get_mut(&id)
    }

    /// Linear scan; satellites whose az and el are each within `tol_deg` of
    /// the query point.
    pub fn sats_by_az_el(&self, az: Degrees, el: Degrees, tol_deg: f64) -> Vec<&Satellite> {
        self.satellites
            .values()
            .filter(|s| {
                (s.az.value() - az.value()).abs() <= tol_deg
                    && (s.el.value() - el.value()).abs() <= tol_deg
            })
            .collect()
    }

    /// Forwards an antenna-radiated carrier to the satellite whose
    /// `norad_id` matches `target_norad`. A missing satellite is a no-op,
    /// per §4.1 failure semantics.
    pub fn add_signal(&mut self, target_norad: u32, sig: RfSignal) {
        if let Some(sat) = self.satellites.get_mut(&target_norad) {
            sat.rx_signal.push(sig);
        }
    }

    pub fn remove_signal(&mut self, target_norad: u32, signal_id: &str) {
        if let Some(sat) = self.satellites.get_mut(&target_norad) {
            sat.rx_signal.retain(|s| s.signal_id != signal_id);
            sat.external_signal.retain(|s| s.signal_id != signal_id);
        }
    }

    pub fn satellites(&self) -> impl Iterator<Item = &Satellite> {
        self.satellites.values()
    }

    pub fn satellites_mut(&mut self) -> impl Iterator<Item = &mut Satellite> {
        self.satellites.values_mut()
    }
}

impl Default for SimulationManager {
    fn default() -> Self {
        SimulationManager::new()
    }
}

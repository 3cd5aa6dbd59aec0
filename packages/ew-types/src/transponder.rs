use serde::{Deserialize, Serialize};

use crate::units::{Db, Dbi, Dbm, Hz};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transponder {
    pub id: String,
    pub uplink_freq: Hz,
    pub downlink_freq: Hz,
    pub bandwidth: Hz,
    pub max_power: Dbm,
    pub gain: Dbi,
    pub noise_figure: Db,
    pub saturation_power: Dbm,
    pub active: bool,
}

impl Transponder {
    /// Lookup key: exact uplink-frequency match, per §4.1/§4.4.
    pub fn matches_uplink(&self, freq: Hz) -> bool {
        self.active && (self.uplink_freq.value() - freq.value()).abs() < 1.0
    }
}

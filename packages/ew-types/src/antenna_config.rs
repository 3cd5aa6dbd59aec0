use serde::{Deserialize, Serialize};

use crate::enums::PolarizationType;
use crate::units::{Db, Degrees, Hz};

/// Either a flat feed loss or the frequency-dependent `a + b*sqrt(fGHz) + c*fGHz` model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FeedLossModel {
    Scalar { db: f64 },
    Frequency { a: f64, b: f64, c: f64 },
}

impl FeedLossModel {
    pub fn loss_db(&self, freq: Hz) -> Db {
        match *self {
            FeedLossModel::Scalar { db } => Db(db),
            FeedLossModel::Frequency { a, b, c } => {
                let f_ghz = freq.ghz();
                Db(a + b * f_ghz.sqrt() + c * f_ghz)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternModel {
    /// Parabolic main lobe to 1.2x HPBW, ITU-465-style sidelobe envelope beyond.
    ItuStyle,
}

/// Physical parameters of one antenna instance, read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntennaConfig {
    pub id: String,
    pub label: String,
    pub diameter_m: f64,
    pub efficiency: f64,
    pub pol_type: PolarizationType,
    pub rx_freq_min: Hz,
    pub rx_freq_max: Hz,
    pub tx_freq_min: Hz,
    pub tx_freq_max: Hz,
    pub feed_loss: FeedLossModel,
    pub surface_rms_m: f64,
    pub blockage_fraction: f64,
    pub xpd_db: Db,
    pub beamwidth_k: f64,
    pub pattern_model: PatternModel,
    pub pointing_sigma_deg: f64,
    pub lna_noise_figure_db: Db,
    pub rx_chain_loss_db: Db,
    pub physical_temp_k: f64,
    pub el_min: Degrees,
    pub el_max: Degrees,
    pub az_continuous: bool,
    pub max_slew_rate_deg_s: f64,
}

impl AntennaConfig {
    pub fn beamwidth_default() -> f64 {
        70.0
    }

    pub fn el_in_range(&self, el: Degrees) -> bool {
        el.value() >= self.el_min.value() && el.value() <= self.el_max.value()
    }
}

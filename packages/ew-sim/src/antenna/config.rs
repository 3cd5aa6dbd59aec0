//! Static antenna preset catalog (§6): named, physically-realistic dish
//! configurations resolvable by id.

use std::collections::HashMap;
use std::sync::OnceLock;

use ew_types::{AntennaConfig, Db, Degrees, FeedLossModel, Hz, PatternModel, PolarizationType};

fn c_band_9m_vortek() -> AntennaConfig {
    AntennaConfig {
        id: "C_BAND_9M_VORTEK".into(),
        label: "Vortek 9m C-Band".into(),
        diameter_m: 9.0,
        efficiency: 0.68,
        pol_type: PolarizationType::Linear,
        rx_freq_min: Hz::from_ghz(3.4),
        rx_freq_max: Hz::from_ghz(4.8),
        tx_freq_min: Hz::from_ghz(5.85),
        tx_freq_max: Hz::from_ghz(6.725),
        feed_loss: FeedLossModel::Frequency { a: 0.2, b: 0.05, c: 0.01 },
        surface_rms_m: 0.0015,
        blockage_fraction: 0.04,
        xpd_db: Db(30.0),
        beamwidth_k: 70.0,
        pattern_model: PatternModel::ItuStyle,
        pointing_sigma_deg: 0.02,
        lna_noise_figure_db: Db(0.7),
        rx_chain_loss_db: Db(0.5),
        physical_temp_k: 290.0,
        el_min: Degrees(5.0),
        el_max: Degrees(90.0),
        az_continuous: true,
        max_slew_rate_deg_s: 3.0,
    }
}

fn ku_band_3m_antestar() -> AntennaConfig {
    AntennaConfig {
        id: "KU_BAND_3M_ANTESTAR".into(),
        label: "Antestar 3m Ku-Band".into(),
        diameter_m: 3.0,
        efficiency: 0.6,
        pol_type: PolarizationType::Circular,
        rx_freq_min: Hz::from_ghz(10.7),
        rx_freq_max: Hz::from_ghz(12.75),
        tx_freq_min: Hz::from_ghz(13.75),
        tx_freq_max: Hz::from_ghz(14.5),
        feed_loss: FeedLossModel::Frequency { a: 0.3, b: 0.08, c: 0.015 },
        surface_rms_m: 0.001,
        blockage_fraction: 0.06,
        xpd_db: Db(27.0),
        beamwidth_k: 70.0,
        pattern_model: PatternModel::ItuStyle,
        pointing_sigma_deg: 0.03,
        lna_noise_figure_db: Db(1.2),
        rx_chain_loss_db: Db(0.6),
        physical_temp_k: 290.0,
        el_min: Degrees(5.0),
        el_max: Degrees(90.0),
        az_continuous: true,
        max_slew_rate_deg_s: 5.0,
    }
}

fn x_band_5m_meridian() -> AntennaConfig {
    AntennaConfig {
        id: "X_BAND_5M_MERIDIAN".into(),
        label: "Meridian 5m X-Band".into(),
        diameter_m: 5.0,
        efficiency: 0.63,
        pol_type: PolarizationType::Linear,
        rx_freq_min: Hz::from_ghz(7.25),
        rx_freq_max: Hz::from_ghz(7.75),
        tx_freq_min: Hz::from_ghz(7.9),
        tx_freq_max: Hz::from_ghz(8.4),
        feed_loss: FeedLossModel::Scalar { db: 0.4 },
        surface_rms_m: 0.0012,
        blockage_fraction: 0.05,
        xpd_db: Db(28.0),
        beamwidth_k: 70.0,
        pattern_model: PatternModel::ItuStyle,
        pointing_sigma_deg: 0.025,
        lna_noise_figure_db: Db(0.9),
        rx_chain_loss_db: Db(0.5),
        physical_temp_k: 290.0,
        el_min: Degrees(5.0),
        el_max: Degrees(90.0),
        az_continuous: false,
        max_slew_rate_deg_s: 2.5,
    }
}

/// The static catalog keyed by stable identifier. "Implementers may
/// extend" (§6) — merge additional entries from a `[antennas.*]` TOML
/// table at startup (see `SimConfig::load`).
pub fn catalog() -> &'static HashMap<String, AntennaConfig> {
    static CATALOG: OnceLock<HashMap<String, AntennaConfig>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let mut m = HashMap::new();
        for cfg in [c_band_9m_vortek(), ku_band_3m_antestar(), x_band_5m_meridian()] {
            m.insert(cfg.id.clone(), cfg);
        }
        m
    })
}

pub fn lookup(id: &str) -> Option<AntennaConfig> {
    catalog().get(id).cloned()
}

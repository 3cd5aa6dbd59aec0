//! RF link-budget physics: off-axis angle, gain pattern, free-space path
//! loss, and polarization mismatch. Pure functions, no state of their own.

use ew_types::{AntennaConfig, Db, Dbi, Degrees, Hz, Polarization, PolarizationType};

pub fn off_axis_angle_deg(sat_az: Degrees, sat_el: Degrees, ant_az: Degrees, ant_el: Degrees) -> f64 {
    let daz = sat_az.value() - ant_az.value();
    let del = sat_el.value() - ant_el.value();
    (daz * daz + del * del).sqrt()
}

/// FSPL in dB over the fixed GEO slant range.
pub fn fspl_db(freq: Hz, slant_range_km: f64) -> f64 {
    32.45 + 20.0 * slant_range_km.log10() + 20.0 * freq.mhz().log10()
}

fn atmosphere_zenith_db(f_ghz: f64) -> f64 {
    if f_ghz < 1.0 {
        0.01
    } else if f_ghz < 10.0 {
        0.02 + (f_ghz - 1.0) * 0.005
    } else if f_ghz < 20.0 {
        0.1 + (f_ghz - 10.0) * 0.02
    } else {
        0.3 + (f_ghz - 20.0) * 0.05
    }
}

/// Slant multiplier `min(1/sin(el), 3)`, el floored at 0.1 deg to avoid
/// division by zero at the horizon (§8 boundary behavior).
pub fn slant_factor(el: Degrees) -> f64 {
    let el_rad = el.value().max(0.1).to_radians();
    (1.0 / el_rad.sin()).min(3.0)
}

pub fn atmospheric_loss_db(freq: Hz, el: Degrees) -> f64 {
    atmosphere_zenith_db(freq.ghz()) * slant_factor(el)
}

/// Linear polarization mismatch loss, Δ-based model with XPD floor (§9
/// Design Notes resolves the historical ambiguity in favor of this model).
/// `handedness` is the antenna's assumed circular sense when `pol_type`
/// is `Circular` (antenna configs carry no explicit handedness field, so a
/// default is supplied by the caller; see DESIGN.md).
pub fn polarization_mismatch_loss_db(
    pol_type: PolarizationType,
    antenna_skew: Degrees,
    antenna_circular_handedness: Polarization,
    xpd_db: Db,
    signal_polarization: Option<Polarization>,
    signal_rotation: Degrees,
) -> Db {
    let Some(sig_pol) = signal_polarization else {
        return Db(0.0);
    };

    let antenna_is_circular = matches!(pol_type, PolarizationType::Circular);
    let signal_is_circular = sig_pol.is_circular();

    if antenna_is_circular || signal_is_circular {
        if antenna_is_circular && signal_is_circular && sig_pol == antenna_circular_handedness {
            Db(0.5)
        } else {
            Db(3.0)
        }
    } else {
        let delta_rad = (signal_rotation.value() - antenna_skew.value()).abs().to_radians();
        let cos_term = delta_rad.cos().abs().max(1e-12);
        let floor = -20.0 * cos_term.log10();
        Db(floor.min(xpd_db.value()))
    }
}

/// Aperture efficiency, `η_base` pre-clamped to `[0.01, 0.95]`.
pub fn aperture_efficiency(freq: Hz, config: &AntennaConfig) -> f64 {
    let eta_base = config.efficiency.clamp(0.01, 0.95);
    let lambda = freq.wavelength_m();
    let ruze = (4.0 * std::f64::consts::PI * config.surface_rms_m / lambda).powi(2);
    eta_base * (-ruze).exp() * (1.0 - config.blockage_fraction).powi(2)
}

pub fn peak_gain_dbi(freq: Hz, config: &AntennaConfig) -> Dbi {
    let eta = aperture_efficiency(freq, config);
    let lambda = freq.wavelength_m();
    let d_over_lambda = std::f64::consts::PI * config.diameter_m / lambda;
    Dbi(10.0 * (eta * d_over_lambda * d_over_lambda).log10())
}

pub fn hpbw_deg(freq: Hz, config: &AntennaConfig) -> f64 {
    config.beamwidth_k * freq.wavelength_m() / config.diameter_m
}

/// Gain at off-axis angle `theta_deg`, ITU-465-style envelope beyond the
/// main lobe.
pub fn pattern_gain_dbi(freq: Hz, theta_deg: f64, config: &AntennaConfig) -> Dbi {
    let g_max = peak_gain_dbi(freq, config);
    let hpbw = hpbw_deg(freq, config);
    if theta_deg <= 1.2 * hpbw {
        let ratio = theta_deg / hpbw;
        Dbi(g_max.value() - 12.0 * ratio * ratio)
    } else {
        let lambda = freq.wavelength_m();
        let envelope = 25.0 * (theta_deg * config.diameter_m / lambda).max(1e-3).log10();
        Dbi(g_max.value() - envelope.min(32.0))
    }
}

pub fn pointing_loss_db(theta_deg: f64, hpbw_deg: f64) -> Db {
    let ratio = theta_deg / hpbw_deg;
    Db((12.0 * ratio * ratio).max(0.0))
}

/// Sky temperature per §4.3.5, `sec(el)` floored at 0.1 deg.
pub fn sky_temp_k(el: Degrees) -> f64 {
    let sec_el = slant_factor_unclamped(el);
    8.0 + 4.0 * (sec_el - 1.0)
}

fn slant_factor_unclamped(el: Degrees) -> f64 {
    let el_rad = el.value().max(0.1).to_radians();
    1.0 / el_rad.sin()
}

fn loss_to_temp_k(phys_temp_k: f64, loss_db: f64) -> f64 {
    phys_temp_k * (10f64.powf(loss_db / 10.0) - 1.0)
}

fn lna_temp_k(noise_figure_db: f64) -> f64 {
    290.0 * (10f64.powf(noise_figure_db / 10.0) - 1.0)
}

pub struct NoiseBudget {
    pub t_sys_k: f64,
    pub noise_floor_dbm: f64,
    pub g_over_t_db: f64,
}

/// Friis-cascaded system noise temperature, noise floor over `bandwidth`,
/// and G/T, per §4.3.5.
pub fn noise_budget(freq: Hz, el: Degrees, bandwidth: Hz, config: &AntennaConfig) -> NoiseBudget {
    let atm_loss_db = atmospheric_loss_db(freq, el);
    let feed_loss_db = config.feed_loss.loss_db(freq).value();

    let t_atm = loss_to_temp_k(260.0, atm_loss_db);
    let t_feed = loss_to_temp_k(config.physical_temp_k, feed_loss_db);
    let t_lna = lna_temp_k(config.lna_noise_figure_db.value());

    let t_ant = sky_temp_k(el) + t_atm;
    let l_atm_lin = 10f64.powf(atm_loss_db / 10.0);
    let l_feed_lin = 10f64.powf(feed_loss_db / 10.0);

    let t_sys = t_ant * l_atm_lin * l_feed_lin + t_feed * l_atm_lin + t_lna;
    let noise_floor_dbm = -174.0 + 10.0 * (t_sys / 290.0).log10() + 10.0 * bandwidth.value().log10();
    let g_over_t_db = peak_gain_dbi(freq, config).value() - 10.0 * t_sys.log10();

    NoiseBudget {
        t_sys_k: t_sys,
        noise_floor_dbm,
        g_over_t_db,
    }
}

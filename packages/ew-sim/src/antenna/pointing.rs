//! Pointing state machine (§4.3.1) and slew dynamics (§4.3.2).

use ew_types::{AntennaConfig, CoreEvent, Degrees, TrackingMode};

use crate::constants::TICK_DT_S;

/// Sets targets on entry to a tracking mode per the §4.3.1 table. Returns
/// the new mode; callers are responsible for cancelling any in-flight
/// timers/step-track state the old mode owned (that's a cross-cutting
/// concern of `AntennaCore::set_tracking_mode`, not this pure function).
pub fn enter_mode(state: &mut ew_types::AntennaState, mode: TrackingMode) {
    match mode {
        TrackingMode::Stow => {
            state.staged.az = Some(0.0);
            state.staged.el = Some(0.0);
            state.has_staged_changes = true;
        }
        TrackingMode::Maintenance => {
            state.staged.el = Some(5.0);
            state.has_staged_changes = true;
        }
        TrackingMode::Manual | TrackingMode::StepTrack | TrackingMode::ProgramTrack => {
            state.target_az = state.azimuth;
            state.target_el = state.elevation;
        }
    }
    state.tracking_mode = mode;
}

/// Validates and commits staged values; on violation, raises `fault` and
/// leaves staged values untouched (transactional, §5).
pub fn apply_changes(state: &mut ew_types::AntennaState, config: &AntennaConfig, events: &mut Vec<CoreEvent>) {
    if let Some(az) = state.staged.az {
        if !config.az_continuous && !(0.0..=360.0).contains(&az) {
            state.fault = ew_types::Fault {
                on: true,
                message: Some(format!("azimuth {az} out of range for non-continuous dish")),
            };
            events.push(CoreEvent::AntennaError {
                antenna_id: state.uuid.clone(),
                message: state.fault.message.clone().unwrap_or_default(),
            });
            return;
        }
    }
    if let Some(el) = state.staged.el {
        if !config.el_in_range(Degrees(el)) {
            state.fault = ew_types::Fault {
                on: true,
                message: Some(format!(
                    "elevation {el} outside configured range [{}, {}]",
                    config.el_min.value(),
                    config.el_max.value()
                )),
            };
            events.push(CoreEvent::AntennaError {
                antenna_id: state.uuid.clone(),
                message: state.fault.message.clone().unwrap_or_default(),
            });
            return;
        }
    }

    if let Some(az) = state.staged.az {
        state.target_az = Degrees(az);
    }
    if let Some(el) = state.staged.el {
        state.target_el = Degrees(el);
    }
    if let Some(pol) = state.staged.pol {
        state.target_pol = Degrees(pol);
    }
    if let Some(f) = state.staged.beacon_hz {
        state.beacon_freq_hz = ew_types::Hz(f);
    }
    if let Some(bw) = state.staged.beacon_bw_hz {
        state.beacon_search_bw_hz = ew_types::Hz(bw);
    }

    state.staged = ew_types::Staged::default();
    state.has_staged_changes = false;
    events.push(CoreEvent::AntennaStateChanged(Box::new(state.clone())));
}

fn move_toward(actual: f64, target: f64, max_delta: f64) -> (f64, bool) {
    let delta = target - actual;
    if delta.abs() <= max_delta {
        (target, delta.abs() > 1e-12)
    } else {
        (actual + delta.signum() * max_delta, true)
    }
}

/// One `UPDATE`'s worth of geometric slew toward `target_*` (§4.3.2). Pure
/// integrator: never breaks lock by itself.
pub fn slew(state: &mut ew_types::AntennaState, config: &AntennaConfig) {
    let max_delta = config.max_slew_rate_deg_s * TICK_DT_S;

    let (new_az, az_moved) = move_toward(state.azimuth.value(), state.target_az.value(), max_delta);
    let (new_el, el_moved) = move_toward(state.elevation.value(), state.target_el.value(), max_delta);
    let (new_pol, pol_moved) = move_toward(state.polarization.value(), state.target_pol.value(), 2.0 * max_delta);

    state.azimuth = Degrees(new_az);
    state.elevation = Degrees(new_el);
    state.polarization = Degrees(new_pol);
    state.is_slewing = az_moved || el_moved || pol_moved;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ew_types::{AntennaState, Db, FeedLossModel, PatternModel, PolarizationType, Hz};

    fn config() -> AntennaConfig {
        AntennaConfig {
            id: "t".into(),
            label: "t".into(),
            diameter_m: 9.0,
            efficiency: 0.65,
            pol_type: PolarizationType::Linear,
            rx_freq_min: Hz(0.0),
            rx_freq_max: Hz(1e12),
            tx_freq_min: Hz(0.0),
            tx_freq_max: Hz(1e12),
            feed_loss: FeedLossModel::Scalar { db: 0.3 },
            surface_rms_m: 0.001,
            blockage_fraction: 0.05,
            xpd_db: Db(30.0),
            beamwidth_k: 70.0,
            pattern_model: PatternModel::ItuStyle,
            pointing_sigma_deg: 0.02,
            lna_noise_figure_db: Db(0.8),
            rx_chain_loss_db: Db(0.5),
            physical_temp_k: 290.0,
            el_min: Degrees(5.0),
            el_max: Degrees(90.0),
            az_continuous: true,
            max_slew_rate_deg_s: 3.0,
        }
    }

    #[test]
    fn slew_respects_max_rate() {
        let cfg = config();
        let mut state = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
        state.target_az = Degrees(100.0);
        slew(&mut state, &cfg);
        let max_delta = cfg.max_slew_rate_deg_s * TICK_DT_S;
        assert!((state.azimuth.value() - max_delta).abs() < 1e-9);
        assert!(state.is_slewing);
    }

    #[test]
    fn slew_stops_when_target_reached() {
        let cfg = config();
        let mut state = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
        state.target_az = Degrees(0.0);
        state.target_el = Degrees(0.0);
        state.target_pol = Degrees(0.0);
        slew(&mut state, &cfg);
        assert!(!state.is_slewing);
    }

    #[test]
    fn polarization_slews_at_double_rate() {
        let cfg = config();
        let mut state = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
        state.target_pol = Degrees(100.0);
        slew(&mut state, &cfg);
        let max_delta = cfg.max_slew_rate_deg_s * TICK_DT_S;
        assert!((state.polarization.value() - 2.0 * max_delta).abs() < 1e-9);
    }

    #[test]
    fn apply_changes_rejects_out_of_range_elevation_and_retains_staged() {
        let cfg = config();
        let mut state = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
        state.staged.el = Some(120.0);
        state.has_staged_changes = true;
        let mut events = Vec::new();
        apply_changes(&mut state, &cfg, &mut events);
        assert!(state.fault.on);
        assert!(state.has_staged_changes, "staged values retained on violation");
        assert_eq!(state.target_el.value(), 0.0);
    }

    #[test]
    fn apply_changes_commits_valid_staged_values() {
        let cfg = config();
        let mut state = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
        state.staged.az = Some(180.0);
        state.staged.el = Some(45.0);
        state.has_staged_changes = true;
        let mut events = Vec::new();
        apply_changes(&mut state, &cfg, &mut events);
        assert!(!state.has_staged_changes);
        assert_eq!(state.target_az.value(), 180.0);
        assert_eq!(state.target_el.value(), 45.0);
    }

    #[test]
    fn stow_mode_stages_zero_without_immediate_commit() {
        let mut state = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
        state.azimuth = Degrees(123.0);
        enter_mode(&mut state, TrackingMode::Stow);
        assert_eq!(state.staged.az, Some(0.0));
        assert_eq!(state.staged.el, Some(0.0));
        // not yet applied
        assert_eq!(state.target_az.value(), 0.0);
    }
}

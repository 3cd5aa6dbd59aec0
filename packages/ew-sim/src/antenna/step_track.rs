//! Step-track hill-climb controller (§4.3.4): alternating coordinate
//! descent over az/el with adaptive step size, locking onto a beacon peak.

use ew_types::{AntennaState, Degrees, Dbm, Hz};

use crate::constants::STEP_TRACK_LOCK_THRESHOLD_DBM;

const STEP_DEFAULT_DEG: f64 = 0.02;
const STEP_MIN_DEG: f64 = 0.005;
const STEP_MAX_DEG: f64 = 0.2;
const UPDATE_INTERVAL_TICKS: u32 = 10;
const IMPROVEMENT_THRESHOLD_DB: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Az,
    El,
}

pub struct StepTrackController {
    step_deg: f64,
    axis: Axis,
    dir: f64,
    last_power_dbm: Option<f64>,
    consec_up: u32,
    consec_down: u32,
    counter: u32,
}

impl StepTrackController {
    pub fn new() -> StepTrackController {
        StepTrackController {
            step_deg: STEP_DEFAULT_DEG,
            axis: Axis::Az,
            dir: 1.0,
            last_power_dbm: None,
            consec_up: 0,
            consec_down: 0,
            counter: 0,
        }
    }

    /// `start_step_track`: fresh baseline, default step/axis/dir.
    pub fn reset(&mut self) {
        *self = StepTrackController::new();
    }

    fn measure_beacon(state: &AntennaState) -> Option<Dbm> {
        let lo = state.beacon_freq_hz.value() - state.beacon_search_bw_hz.value() / 2.0;
        let hi = state.beacon_freq_hz.value() + state.beacon_search_bw_hz.value() / 2.0;
        state
            .rx_signals_in
            .iter()
            .filter(|s| s.frequency.value() >= lo && s.frequency.value() <= hi)
            .max_by(|a, b| a.power.value().partial_cmp(&b.power.value()).unwrap())
            .map(|s| s.power)
    }

    fn step_target(&self, state: &mut AntennaState) {
        let delta = self.dir * self.step_deg;
        match self.axis {
            Axis::Az => {
                state.target_az = Degrees((state.target_az.value() + delta).clamp(0.0, 90.0));
            }
            Axis::El => {
                state.target_el = Degrees((state.target_el.value() + delta).clamp(0.0, 90.0));
            }
        }
    }

    /// One `UPDATE` while `tracking_mode == StepTrack` and engaged. Rate
    /// limited to once every `UPDATE_INTERVAL_TICKS` ticks.
    pub fn update(&mut self, state: &mut AntennaState) {
        self.counter += 1;
        if self.counter < UPDATE_INTERVAL_TICKS {
            return;
        }
        self.counter = 0;

        let measured = Self::measure_beacon(state);
        state.beacon_power = measured;
        let measured_value = measured.map(|p| p.value()).unwrap_or(f64::NEG_INFINITY);

        if measured.is_none() || measured_value < STEP_TRACK_LOCK_THRESHOLD_DBM {
            state.is_beacon_locked = false;
            if let Some(last) = self.last_power_dbm {
                if measured_value < last {
                    self.dir = -self.dir;
                }
            }
            self.step_deg = (self.step_deg * 1.2).min(STEP_MAX_DEG);
            self.step_target(state);
            self.last_power_dbm = Some(measured_value);
            return;
        }

        let Some(last) = self.last_power_dbm else {
            // first sample after (re)start: establish baseline, don't step.
            self.last_power_dbm = Some(measured_value);
            return;
        };

        let delta = measured_value - last;
        if delta > IMPROVEMENT_THRESHOLD_DB {
            self.consec_up += 1;
            self.consec_down = 0;
            if self.consec_up >= 3 {
                state.is_beacon_locked = true;
            }
            if self.consec_up >= 5 {
                self.step_deg = (self.step_deg * 1.2).min(STEP_MAX_DEG);
                self.consec_up = 0;
            }
        } else if delta < -IMPROVEMENT_THRESHOLD_DB {
            self.consec_down += 1;
            self.consec_up = 0;
            self.dir = -self.dir;
            self.step_deg = (self.step_deg * 0.7).max(STEP_MIN_DEG);
            if self.consec_down >= 3 {
                self.axis = match self.axis {
                    Axis::Az => Axis::El,
                    Axis::El => Axis::Az,
                };
                self.consec_down = 0;
            }
        } else {
            state.is_beacon_locked = true;
            self.last_power_dbm = Some(measured_value);
            return;
        }

        self.last_power_dbm = Some(measured_value);
        self.step_target(state);
    }

    pub fn step_deg(&self) -> f64 {
        self.step_deg
    }
}

impl Default for StepTrackController {
    fn default() -> Self {
        StepTrackController::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ew_types::{Modulation, Polarization, RfSignal, SignalOrigin};

    fn fresh_state() -> AntennaState {
        let mut s = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
        s.beacon_freq_hz = Hz::from_mhz(1000.0);
        s.beacon_search_bw_hz = Hz::from_mhz(1.0);
        s
    }

    fn beacon_at(power_dbm: f64) -> RfSignal {
        RfSignal {
            signal_id: "beacon".into(),
            server_id: "s".into(),
            norad_id: Some(1),
            frequency: Hz::from_mhz(1000.0),
            bandwidth: Hz::from_mhz(0.1),
            power: Dbm(power_dbm),
            modulation: Some(Modulation::Qpsk),
            fec: None,
            polarization: Some(Polarization::H),
            rotation: Degrees(0.0),
            feed: None,
            is_degraded: false,
            origin: SignalOrigin::SatelliteTx,
        }
    }

    fn drive_n_updates(ctrl: &mut StepTrackController, state: &mut AntennaState, n: usize, power_fn: impl Fn(usize) -> f64) {
        for i in 0..n {
            state.rx_signals_in = vec![beacon_at(power_fn(i))];
            for _ in 0..UPDATE_INTERVAL_TICKS {
                ctrl.update(state);
            }
        }
    }

    #[test]
    fn s5_converges_and_locks_on_monotonic_beacon() {
        let mut ctrl = StepTrackController::new();
        let mut state = fresh_state();
        // Power increases each sample toward a peak, then holds flat once
        // the peak is reached -- enough improvements in a row should lock.
        drive_n_updates(&mut ctrl, &mut state, 10, |i| -80.0 + (i as f64) * 0.5);
        assert!(state.is_beacon_locked);
    }

    #[test]
    fn below_lock_threshold_clears_lock_and_grows_step() {
        let mut ctrl = StepTrackController::new();
        let mut state = fresh_state();
        let step_before = ctrl.step_deg();
        drive_n_updates(&mut ctrl, &mut state, 1, |_| -150.0);
        assert!(!state.is_beacon_locked);
        assert!(ctrl.step_deg() >= step_before);
    }

    #[test]
    fn no_signal_is_treated_like_below_threshold() {
        let mut ctrl = StepTrackController::new();
        let mut state = fresh_state();
        state.rx_signals_in = Vec::new();
        for _ in 0..UPDATE_INTERVAL_TICKS {
            ctrl.update(&mut state);
        }
        assert!(!state.is_beacon_locked);
    }

    #[test]
    fn first_sample_does_not_step() {
        let mut ctrl = StepTrackController::new();
        let mut state = fresh_state();
        state.rx_signals_in = vec![beacon_at(-90.0)];
        let az_before = state.target_az.value();
        for _ in 0..UPDATE_INTERVAL_TICKS {
            ctrl.update(&mut state);
        }
        assert_eq!(state.target_az.value(), az_before);
    }

    #[test]
    fn rate_limited_to_every_tenth_tick() {
        let mut ctrl = StepTrackController::new();
        let mut state = fresh_state();
        state.rx_signals_in = vec![beacon_at(-90.0)];
        ctrl.update(&mut state);
        // fewer than UPDATE_INTERVAL_TICKS calls: no sample taken yet.
        assert!(state.beacon_power.is_none());
    }
}

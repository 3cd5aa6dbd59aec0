//! `AntennaCore` (§4.3): owns one antenna's state and config, and
//! orchestrates pointing, slew, auto-track, step-track, RF physics, and
//! interference arbitration through a single per-tick entry point.

pub mod auto_track;
pub mod config;
pub mod interference;
pub mod physics;
pub mod pointing;
pub mod step_track;
pub mod tx;

use ew_types::{AntennaConfig, AntennaState, CoreEvent, Degrees, Polarization, RfMetrics, TrackingMode};

use crate::constants::{ANTENNA_POWER_UP_RAMP_MS, BORESIGHT_TOLERANCE_DEG};
use crate::manager::SimulationManager;
use crate::scheduler::{Scheduler, TimerId};
use auto_track::AutoTrack;
use step_track::StepTrackController;

pub struct AntennaCore {
    pub state: AntennaState,
    pub config: AntennaConfig,
    /// Antenna configs carry only `pol_type` (linear/circular), not a
    /// specific handedness; see DESIGN.md for why this is a fixed per-core
    /// value rather than a config field.
    pub circular_handedness: Polarization,
    auto_track: AutoTrack,
    step_track: Option<StepTrackController>,
    power_timers: Scheduler<()>,
    power_up_timer_id: Option<TimerId>,
}

impl AntennaCore {
    pub fn new(uuid: String, team_id: String, server_id: String, config: AntennaConfig) -> AntennaCore {
        let config_id = config.id.clone();
        AntennaCore {
            state: AntennaState::new(uuid, team_id, server_id, config_id),
            config,
            circular_handedness: Polarization::Rhcp,
            auto_track: AutoTrack::new(),
            step_track: None,
            power_timers: Scheduler::new(),
            power_up_timer_id: None,
        }
    }

    pub fn set_tracking_mode(&mut self, mode: TrackingMode) {
        if self.state.tracking_mode == TrackingMode::StepTrack && mode != TrackingMode::StepTrack {
            self.step_track = None;
        }
        if mode != TrackingMode::Manual {
            self.auto_track.handle_power_off();
            self.state.is_auto_track_enabled = false;
        }
        pointing::enter_mode(&mut self.state, mode);
    }

    pub fn apply_changes(&mut self, events: &mut Vec<CoreEvent>) {
        pointing::apply_changes(&mut self.state, &self.config, events);
    }

    pub fn toggle_auto_track(&mut self, up: bool, manager: &SimulationManager, events: &mut Vec<CoreEvent>) {
        self.auto_track.handle_toggle(up, &mut self.state, manager, events);
    }

    /// Power-on takes a 3s ramp (`ANTENNA_POWER_UP_RAMP_MS`), mirroring the
    /// transmitter's own deferred power sequence; power-off is immediate and
    /// breaks any lock or auto-track in progress.
    pub fn set_power(&mut self, on: bool, events: &mut Vec<CoreEvent>) {
        if let Some(id) = self.power_up_timer_id.take() {
            self.power_timers.cancel(id);
        }
        if on {
            self.power_up_timer_id = Some(self.power_timers.schedule_after_ms(ANTENNA_POWER_UP_RAMP_MS, ()));
            return;
        }

        self.state.is_powered = false;
        self.auto_track.handle_power_off();
        if self.state.is_auto_track_enabled {
            self.state.is_auto_track_enabled = false;
            events.push(CoreEvent::AntennaTrackChanged(false));
        }
        if self.state.is_locked {
            self.state.is_locked = false;
            events.push(CoreEvent::AntennaLocked(false));
        }
        events.push(CoreEvent::AntennaPowerChanged(false));
    }

    /// Loopback has no automatic trigger; toggled directly by an operator.
    pub fn toggle_loopback(&mut self, on: bool, events: &mut Vec<CoreEvent>) {
        if self.state.is_loopback != on {
            self.state.is_loopback = on;
            events.push(CoreEvent::AntennaLoopbackChanged(on));
        }
    }

    pub fn start_step_track(&mut self) {
        if self.state.tracking_mode == TrackingMode::StepTrack {
            self.step_track = Some(StepTrackController::new());
        }
    }

    pub fn stop_step_track(&mut self) {
        self.step_track = None;
        self.state.is_beacon_locked = false;
    }

    /// `move_to_target_satellite`: stages an immediate slew target in
    /// `program_track` mode (shorter-arc azimuth correction, as auto-track).
    pub fn move_to_target_satellite(&mut self, norad_id: u32, manager: &SimulationManager) {
        self.state.target_satellite_id = Some(norad_id);
        let Some(sat) = manager.sat_by_norad(norad_id) else {
            return;
        };
        let mut target_az = sat.az.value();
        if (target_az - self.state.azimuth.value()).abs() > 180.0 {
            target_az = sat.az.value() + 360.0;
        }
        self.state.target_az = Degrees(target_az);
        self.state.target_el = sat.el;
    }

    /// Populates `rx_signals_in` and `rf_metrics` from every carrier
    /// radiated by satellites at boresight (§4.3.5), then arbitrates
    /// interference across the resulting candidate set (§4.3.6).
    fn run_rf_pass(&mut self, manager: &SimulationManager) {
        let az = self.state.azimuth;
        let el = self.state.elevation;
        let visible = manager.sats_by_az_el(az, el, BORESIGHT_TOLERANCE_DEG);

        let mut candidates = Vec::new();
        let mut last_metrics: Option<RfMetrics> = None;

        for sat in &visible {
            for s in &sat.tx_signal {
                let theta = physics::off_axis_angle_deg(sat.az, sat.el, az, el);
                let fspl = physics::fspl_db(s.frequency, crate::constants::GEO_SLANT_RANGE_KM);
                let l_atm = physics::atmospheric_loss_db(s.frequency, el);
                let l_pol = physics::polarization_mismatch_loss_db(
                    self.config.pol_type,
                    self.state.polarization,
                    self.circular_handedness,
                    self.config.xpd_db,
                    s.polarization,
                    s.rotation,
                );
                let l_feed = self.config.feed_loss.loss_db(s.frequency);
                let hpbw = physics::hpbw_deg(s.frequency, &self.config);
                let l_point = physics::pointing_loss_db(theta, hpbw);
                let g_theta = physics::pattern_gain_dbi(s.frequency, theta, &self.config);

                let p_rx = s.power.value() - fspl - l_atm - l_pol.value() - l_feed.value() - l_point.value()
                    + g_theta.value();

                candidates.push(s.with_power(ew_types::Dbm(p_rx)));

                let noise = physics::noise_budget(s.frequency, el, s.bandwidth, &self.config);
                last_metrics = Some(RfMetrics {
                    peak_gain_dbi: physics::peak_gain_dbi(s.frequency, &self.config).value(),
                    hpbw_deg: hpbw,
                    g_over_t_db: noise.g_over_t_db,
                    noise_floor_dbm: noise.noise_floor_dbm,
                });
            }
        }

        self.state.rx_signals_in = interference::arbitrate(candidates);
        self.state.rf_metrics = last_metrics;
    }

    /// One `UPDATE`: power-up ramp, slew, auto-track lock timer, step-track
    /// hill climb, RF propagation and interference arbitration (§5 ordering
    /// contract).
    pub fn tick(&mut self, manager: &SimulationManager, events: &mut Vec<CoreEvent>) {
        if !self.power_timers.advance_tick().is_empty() {
            self.power_up_timer_id = None;
            self.state.is_powered = true;
            events.push(CoreEvent::AntennaPowerChanged(true));
        }

        pointing::slew(&mut self.state, &self.config);
        self.auto_track.tick(&mut self.state, events);

        self.run_rf_pass(manager);

        if self.state.tracking_mode == TrackingMode::StepTrack {
            if let Some(ctrl) = self.step_track.as_mut() {
                ctrl.update(&mut self.state);
            }
        }
    }
}

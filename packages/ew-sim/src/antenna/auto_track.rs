//! Auto-track acquisition (§4.3.3): a one-shot lock timer gated on finding
//! a strong-enough carrier at the antenna's current boresight.

use ew_types::{AntennaState, CoreEvent, Degrees};

use crate::constants::{AUTO_TRACK_LOCK_DELAY_MS, BORESIGHT_TOLERANCE_DEG, LOCK_THRESHOLD_DBM};
use crate::manager::SimulationManager;
use crate::scheduler::{Scheduler, TimerId};

pub struct AutoTrack {
    timers: Scheduler<()>,
    lock_timer_id: Option<TimerId>,
}

impl AutoTrack {
    pub fn new() -> AutoTrack {
        AutoTrack {
            timers: Scheduler::new(),
            lock_timer_id: None,
        }
    }

    fn cancel_pending_lock(&mut self) {
        if let Some(id) = self.lock_timer_id.take() {
            self.timers.cancel(id);
        }
    }

    /// `handle_auto_track_toggle(up)`.
    pub fn handle_toggle(
        &mut self,
        up: bool,
        state: &mut AntennaState,
        manager: &SimulationManager,
        events: &mut Vec<CoreEvent>,
    ) {
        state.is_auto_track_switch_up = up;

        if !up {
            self.cancel_pending_lock();
            if state.is_auto_track_enabled {
                state.is_auto_track_enabled = false;
                events.push(CoreEvent::AntennaTrackChanged(false));
            }
            if state.is_locked {
                state.is_locked = false;
                events.push(CoreEvent::AntennaLocked(false));
            }
            return;
        }

        if !state.is_operational || !state.is_powered {
            return;
        }

        if !state.is_auto_track_enabled {
            state.is_auto_track_enabled = true;
            events.push(CoreEvent::AntennaTrackChanged(true));
        }

        let candidates = manager.sats_by_az_el(state.azimuth, state.elevation, BORESIGHT_TOLERANCE_DEG);
        let strongest = candidates.into_iter().flat_map(|sat| sat.tx_signal.iter()).max_by(|a, b| {
            a.power.value().partial_cmp(&b.power.value()).unwrap()
        });

        let Some(carrier) = strongest else {
            return;
        };
        if carrier.power.value() <= LOCK_THRESHOLD_DBM {
            return;
        }
        let Some(sat) = manager
            .satellites()
            .find(|s| s.tx_signal.iter().any(|c| c.signal_id == carrier.signal_id))
        else {
            return;
        };

        let mut target_az = sat.az.value();
        if (target_az - state.azimuth.value()).abs() > 180.0 {
            target_az = sat.az.value() + 360.0;
        }
        state.target_az = Degrees(target_az);
        state.target_el = sat.el;

        self.cancel_pending_lock();
        self.lock_timer_id = Some(self.timers.schedule_after_ms(AUTO_TRACK_LOCK_DELAY_MS, ()));
    }

    /// Power loss must cancel any pending lock timer (§7 timer-leak contract).
    pub fn handle_power_off(&mut self) {
        self.cancel_pending_lock();
    }

    pub fn tick(&mut self, state: &mut AntennaState, events: &mut Vec<CoreEvent>) {
        if !self.timers.advance_tick().is_empty() {
            self.lock_timer_id = None;
            if state.is_auto_track_enabled && !state.is_locked {
                state.is_locked = true;
                events.push(CoreEvent::AntennaLocked(true));
            }
        }
    }
}

impl Default for AutoTrack {
    fn default() -> Self {
        AutoTrack::new()
    }
}

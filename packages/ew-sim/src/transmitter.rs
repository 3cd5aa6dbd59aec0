//! Transmitter / modem state machines and power-budget enforcement (§4.2).

use ew_types::{CoreEvent, Degrees, Fec, Hz, Modulation, Polarization, RfSignal, SignalOrigin};
use ew_types::{Dbm, TransmitterModem, TransmitterState};

use crate::constants::{FAULT_RESET_DELAY_MS, POWER_BUDGET_W, POWER_UP_RAMP_MS};
use crate::scheduler::Scheduler;

/// `P_consumed = (bandwidth_Hz / 1e6) * 10^((120 + power_dBm)/10)`.
pub fn power_consumption_w(bandwidth: Hz, power: Dbm) -> f64 {
    (bandwidth.value() / 1.0e6) * 10f64.powf((120.0 + power.value()) / 10.0)
}

/// `round(100 * consumed / POWER_BUDGET)`, monotone non-decreasing in both
/// bandwidth and power (invariant 5, §8).
pub fn power_percent(consumed_w: f64) -> f64 {
    (100.0 * consumed_w / POWER_BUDGET_W).round()
}

#[derive(Debug, Clone, Copy)]
enum TimerEvent {
    PowerUp { modem_idx: usize },
    FaultReset { modem_idx: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ModemStagedConfig {
    pub antenna_id: Option<String>,
    pub frequency: Option<Hz>,
    pub bandwidth: Option<Hz>,
    pub power: Option<Dbm>,
    pub modulation: Option<Modulation>,
    pub fec: Option<Fec>,
    pub polarization: Option<Polarization>,
    pub rotation: Option<Degrees>,
}

pub struct Transmitter {
    pub state: TransmitterState,
    timers: Scheduler<TimerEvent>,
    /// One handle per modem, so a later schedule cancels this modem's own
    /// pending timer rather than any other modem's.
    power_up_timer_ids: [Option<crate::scheduler::TimerId>; 4],
    fault_reset_timer_ids: [Option<crate::scheduler::TimerId>; 4],
}

impl Transmitter {
    pub fn new(unit: u32, team_id: String, server_id: String) -> Transmitter {
        let modems = std::array::from_fn(|i| TransmitterModem {
            id: format!("tx{unit}-modem{}", i + 1),
            modem_number: (i + 1) as u32,
            ..Default::default()
        });
        Transmitter {
            state: TransmitterState {
                unit,
                team_id,
                server_id,
                modems,
                active_modem: 1,
            },
            timers: Scheduler::new(),
            power_up_timer_ids: [None; 4],
            fault_reset_timer_ids: [None; 4],
        }
    }

    pub fn toggle_transmit(&mut self, modem_idx: usize, events: &mut Vec<CoreEvent>) {
        self.state.modems[modem_idx].is_transmitting_switch_up =
            !self.state.modems[modem_idx].is_transmitting_switch_up;
        self.update_transmission_state(modem_idx, events);
    }

    /// Recomputes whether `modem_idx` is actually transmitting and, if the
    /// aggregate power budget (§3 TransmitterState invariant) is exceeded,
    /// faults that modem and emits `TxError`. No retry — the caller must
    /// explicitly clear the fault via `toggle_fault_reset`.
    fn update_transmission_state(&mut self, modem_idx: usize, events: &mut Vec<CoreEvent>) {
        {
            let modem = &mut self.state.modems[modem_idx];
            modem.is_transmitting =
                modem.is_transmitting_switch_up && modem.is_powered && !modem.is_faulted;
        }

        let total_w: f64 = self
            .state
            .modems
            .iter()
            .filter(|m| m.is_transmitting)
            .filter_map(|m| m.if_signal.as_ref().map(|s| power_consumption_w(s.bandwidth, s.power)))
            .sum();

        if total_w > POWER_BUDGET_W {
            let unit = self.state.unit;
            let modem = &mut self.state.modems[modem_idx];
            modem.is_faulted = true;
            modem.is_transmitting = false;
            events.push(CoreEvent::TxError {
                unit,
                modem: modem.modem_number,
                message: format!(
                    "modem {} exceeds power budget: {:.1} W > {:.1} W",
                    modem.modem_number, total_w, POWER_BUDGET_W
                ),
            });
        }

        events.push(CoreEvent::TxTransmitChanged {
            unit: self.state.unit,
            modem: self.state.modems[modem_idx].modem_number,
            transmitting: self.state.modems[modem_idx].is_transmitting,
        });
    }

    /// Raises the fault-reset switch and schedules a single 250ms deferred
    /// clear; repeated calls before it fires coalesce onto the same timer
    /// rather than queuing duplicates (§4.2).
    pub fn toggle_fault_reset(&mut self, modem_idx: usize) {
        self.state.modems[modem_idx].is_fault_switch_up = true;
        if let Some(id) = self.fault_reset_timer_ids[modem_idx].take() {
            self.timers.cancel(id);
        }
        let id = self
            .timers
            .schedule_after_ms(FAULT_RESET_DELAY_MS, TimerEvent::FaultReset { modem_idx });
        self.fault_reset_timer_ids[modem_idx] = Some(id);
    }

    pub fn toggle_power(&mut self, modem_idx: usize, on: bool, events: &mut Vec<CoreEvent>) {
        if let Some(id) = self.power_up_timer_ids[modem_idx].take() {
            self.timers.cancel(id);
        }
        if on {
            let id = self
                .timers
                .schedule_after_ms(POWER_UP_RAMP_MS, TimerEvent::PowerUp { modem_idx });
            self.power_up_timer_ids[modem_idx] = Some(id);
        } else {
            let modem = &mut self.state.modems[modem_idx];
            modem.is_powered = false;
            modem.is_transmitting = false;
            modem.is_faulted = false;
            events.push(CoreEvent::TxTransmitChanged {
                unit: self.state.unit,
                modem: modem.modem_number,
                transmitting: false,
            });
        }
    }

    /// `apply_changes`: all-or-nothing commit of staged config into
    /// `if_signal`, then re-validates the power budget.
    pub fn apply_changes(
        &mut self,
        modem_idx: usize,
        staged: ModemStagedConfig,
        events: &mut Vec<CoreEvent>,
    ) {
        let unit = self.state.unit;
        let modem_number = self.state.modems[modem_idx].modem_number;
        let signal_id = RfSignal::make_signal_id(unit, modem_number);

        {
            let modem = &mut self.state.modems[modem_idx];
            modem.antenna_id = staged.antenna_id.or_else(|| modem.antenna_id.clone());

            let prev = modem.if_signal.clone();
            let frequency = staged
                .frequency
                .or_else(|| prev.as_ref().map(|s| s.frequency))
                .unwrap_or(Hz(0.0));
            let bandwidth = staged
                .bandwidth
                .or_else(|| prev.as_ref().map(|s| s.bandwidth))
                .unwrap_or(Hz(0.0));
            let power = staged
                .power
                .or_else(|| prev.as_ref().map(|s| s.power))
                .unwrap_or(Dbm(0.0));
            let modulation = staged.modulation.or_else(|| prev.as_ref().and_then(|s| s.modulation));
            let fec = staged.fec.or_else(|| prev.as_ref().and_then(|s| s.fec));
            let polarization = staged
                .polarization
                .or_else(|| prev.as_ref().and_then(|s| s.polarization));
            let rotation = staged.rotation.unwrap_or_else(|| prev.as_ref().map(|s| s.rotation).unwrap_or(Degrees(0.0)));

            modem.if_signal = Some(RfSignal {
                signal_id,
                server_id: self.state.server_id.clone(),
                norad_id: None,
                frequency,
                bandwidth,
                power,
                modulation,
                fec,
                polarization,
                rotation,
                feed: None,
                is_degraded: false,
                origin: SignalOrigin::Transmitter,
            });
        }

        events.push(CoreEvent::TxConfigChanged {
            unit,
            modem: modem_number,
        });
        self.update_transmission_state(modem_idx, events);
    }

    /// Drive the transmitter's deferred timers by one tick. Returns nothing;
    /// observable effects land directly on `self.state` and `events`.
    pub fn tick(&mut self, events: &mut Vec<CoreEvent>) {
        for fired in self.timers.advance_tick() {
            match fired {
                TimerEvent::PowerUp { modem_idx } => {
                    self.state.modems[modem_idx].is_powered = true;
                    self.power_up_timer_ids[modem_idx] = None;
                    events.push(CoreEvent::TxTransmitChanged {
                        unit: self.state.unit,
                        modem: self.state.modems[modem_idx].modem_number,
                        transmitting: self.state.modems[modem_idx].is_transmitting,
                    });
                }
                TimerEvent::FaultReset { modem_idx } => {
                    let modem = &mut self.state.modems[modem_idx];
                    if !modem.is_transmitting {
                        modem.is_faulted = false;
                    }
                    modem.is_fault_switch_up = false;
                    self.fault_reset_timer_ids[modem_idx] = None;
                }
            }
        }
    }

    /// IF carriers currently exposed to the RF front end: modems that are
    /// powered, transmitting, and not faulted (§4.2 "Producing carriers").
    pub fn outgoing_carriers(&self) -> Vec<RfSignal> {
        self.state
            .modems
            .iter()
            .filter(|m| m.is_powered && m.is_transmitting && !m.is_faulted)
            .filter_map(|m| m.if_signal.clone())
            .collect()
    }
}

//! Receiver classification (§4.5): filters an antenna's surviving `rx_signals_in`
//! against one modem's tuning and classifies the result for the UI.

use ew_types::{CoreEvent, Fec, Hz, Modulation, RfSignal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RxClassification {
    Found,
    Degraded,
    Denied,
    NoSignal,
}

#[derive(Debug, Clone)]
pub struct ReceiverModem {
    pub id: String,
    pub modem_number: u32,
    pub center_freq: Hz,
    pub bandwidth: Hz,
    pub modulation: Modulation,
    pub fec: Fec,
}

impl ReceiverModem {
    fn lower(&self) -> f64 {
        self.center_freq.value() - self.bandwidth.value() / 2.0
    }

    fn upper(&self) -> f64 {
        self.center_freq.value() + self.bandwidth.value() / 2.0
    }

    fn overlaps(&self, s: &RfSignal) -> bool {
        s.lower_band_edge().value() < self.upper() && s.upper_band_edge().value() > self.lower()
    }
}

/// Classifies `rx_signals_in` against `modem`'s tuning, per §4.5 steps 1-4.
/// Returns the surviving, degradation-annotated carriers and the overall
/// classification.
pub fn classify(rx_signals_in: &[RfSignal], modem: &ReceiverModem) -> (Vec<RfSignal>, RxClassification) {
    let step1: Vec<&RfSignal> = rx_signals_in
        .iter()
        .filter(|s| s.bandwidth.value() <= modem.bandwidth.value() && modem.overlaps(s))
        .collect();

    let step2: Vec<&RfSignal> = step1
        .into_iter()
        .filter(|s| s.modulation == Some(modem.modulation) && s.fec == Some(modem.fec))
        .collect();

    let half_window = modem.bandwidth.value() * 0.5;
    let tenth_window = modem.bandwidth.value() * 0.1;

    let survivors: Vec<RfSignal> = step2
        .into_iter()
        .filter(|s| (s.frequency.value() - modem.center_freq.value()).abs() <= half_window)
        .map(|s| {
            if (s.frequency.value() - modem.center_freq.value()).abs() > tenth_window {
                s.degraded()
            } else {
                s.clone()
            }
        })
        .collect();

    let classification = match survivors.len() {
        1 => RxClassification::Found,
        2 => RxClassification::Degraded,
        0 => RxClassification::NoSignal,
        _ => RxClassification::Denied,
    };

    (survivors, classification)
}

/// Four-modem receiver bank, mirroring `Transmitter`'s structure. Owns no
/// timers of its own -- classification is a pure per-tick recomputation.
pub struct ReceiverBank {
    pub antenna_id: String,
    pub modems: [Option<ReceiverModem>; 4],
    pub active_modem: u32,
    last_signal_ids: [Vec<String>; 4],
}

impl ReceiverBank {
    pub fn new(antenna_id: String) -> ReceiverBank {
        ReceiverBank {
            antenna_id,
            modems: [None, None, None, None],
            active_modem: 0,
            last_signal_ids: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
        }
    }

    pub fn configure(&mut self, modem_idx: usize, modem: ReceiverModem, events: &mut Vec<CoreEvent>) {
        self.modems[modem_idx] = Some(modem);
        events.push(CoreEvent::RxConfigChanged {
            antenna_id: self.antenna_id.clone(),
        });
    }

    pub fn set_active_modem(&mut self, modem_idx: u32, events: &mut Vec<CoreEvent>) {
        self.active_modem = modem_idx;
        events.push(CoreEvent::RxActiveModemChanged {
            antenna_id: self.antenna_id.clone(),
            modem: modem_idx,
        });
    }

    /// Runs classification for every configured modem and emits
    /// `RxSignalFound`/`RxSignalLost` edge-triggered transitions.
    pub fn tick(&mut self, rx_signals_in: &[RfSignal], events: &mut Vec<CoreEvent>) {
        for idx in 0..4 {
            let Some(modem) = &self.modems[idx] else { continue };
            let (survivors, _classification) = classify(rx_signals_in, modem);
            let current_ids: Vec<String> = survivors.iter().map(|s| s.signal_id.clone()).collect();

            for id in &current_ids {
                if !self.last_signal_ids[idx].contains(id) {
                    events.push(CoreEvent::RxSignalFound {
                        antenna_id: self.antenna_id.clone(),
                        signal_id: id.clone(),
                    });
                }
            }
            for id in &self.last_signal_ids[idx] {
                if !current_ids.contains(id) {
                    events.push(CoreEvent::RxSignalLost {
                        antenna_id: self.antenna_id.clone(),
                        signal_id: id.clone(),
                    });
                }
            }
            self.last_signal_ids[idx] = current_ids;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ew_types::{Degrees, Dbm, Polarization, SignalOrigin};

    fn carrier(freq_mhz: f64, bw_mhz: f64) -> RfSignal {
        RfSignal {
            signal_id: "s1".into(),
            server_id: "s".into(),
            norad_id: Some(1),
            frequency: Hz::from_mhz(freq_mhz),
            bandwidth: Hz::from_mhz(bw_mhz),
            power: Dbm(-80.0),
            modulation: Some(Modulation::Qpsk),
            fec: Some(Fec::ThreeQuarters),
            polarization: Some(Polarization::H),
            rotation: Degrees(0.0),
            feed: None,
            is_degraded: false,
            origin: SignalOrigin::SatelliteTx,
        }
    }

    fn modem(center_mhz: f64, bw_mhz: f64) -> ReceiverModem {
        ReceiverModem {
            id: "r1".into(),
            modem_number: 1,
            center_freq: Hz::from_mhz(center_mhz),
            bandwidth: Hz::from_mhz(bw_mhz),
            modulation: Modulation::Qpsk,
            fec: Fec::ThreeQuarters,
        }
    }

    #[test]
    fn on_center_carrier_is_found() {
        let sigs = vec![carrier(3710.0, 3.0)];
        let m = modem(3710.0, 3.0);
        let (survivors, class) = classify(&sigs, &m);
        assert_eq!(survivors.len(), 1);
        assert!(!survivors[0].is_degraded);
        assert_eq!(class, RxClassification::Found);
    }

    #[test]
    fn offset_within_50_but_beyond_10_pct_is_degraded() {
        // bw=3MHz: 10% window = 0.3MHz, 50% window = 1.5MHz.
        let sigs = vec![carrier(3710.5, 3.0)];
        let m = modem(3710.0, 3.0);
        let (survivors, class) = classify(&sigs, &m);
        assert_eq!(survivors.len(), 1);
        assert!(survivors[0].is_degraded);
        assert_eq!(class, RxClassification::Found);
    }

    #[test]
    fn outside_50_pct_window_is_dropped() {
        let sigs = vec![carrier(3712.0, 3.0)];
        let m = modem(3710.0, 3.0);
        let (survivors, class) = classify(&sigs, &m);
        assert!(survivors.is_empty());
        assert_eq!(class, RxClassification::NoSignal);
    }

    #[test]
    fn mismatched_modulation_is_dropped() {
        let mut sig = carrier(3710.0, 3.0);
        sig.modulation = Some(Modulation::Bpsk);
        let m = modem(3710.0, 3.0);
        let (survivors, _) = classify(&[sig], &m);
        assert!(survivors.is_empty());
    }

    #[test]
    fn too_wide_bandwidth_is_dropped() {
        let sigs = vec![carrier(3710.0, 10.0)];
        let m = modem(3710.0, 3.0);
        let (survivors, _) = classify(&sigs, &m);
        assert!(survivors.is_empty());
    }

    #[test]
    fn bank_emits_found_and_lost_on_transitions() {
        let mut bank = ReceiverBank::new("ant1".into());
        let mut events = Vec::new();
        bank.configure(0, modem(3710.0, 3.0), &mut events);

        let mut events = Vec::new();
        bank.tick(&[carrier(3710.0, 3.0)], &mut events);
        assert!(events
            .iter()
            .any(|e| matches!(e, CoreEvent::RxSignalFound { signal_id, .. } if signal_id == "s1")));

        let mut events = Vec::new();
        bank.tick(&[], &mut events);
        assert!(events
            .iter()
            .any(|e| matches!(e, CoreEvent::RxSignalLost { signal_id, .. } if signal_id == "s1")));
    }
}

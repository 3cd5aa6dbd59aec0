//! End-to-end scenarios S1-S6 (§8), driving the public `ew_sim` API through
//! explicit ticks exactly as the scenarios specify.

use ew_sim::antenna::interference;
use ew_sim::antenna::tx as antenna_tx;
use ew_sim::antenna::AntennaCore;
use ew_sim::manager::SimulationManager;
use ew_sim::satellite::{DegradationConfig, Satellite};
use ew_sim::transmitter::{ModemStagedConfig, Transmitter};
use ew_types::{
    Degrees, Dbm, Fec, Hz, Modulation, Polarization, RfSignal, SignalOrigin, Transponder,
};

fn c_band_antenna(uuid: &str) -> AntennaCore {
    let config = ew_sim::antenna::config::lookup("C_BAND_9M_VORTEK").expect("preset exists");
    AntennaCore::new(uuid.into(), "team".into(), "srv".into(), config)
}

fn geo_transponder() -> Transponder {
    Transponder {
        id: "tp1".into(),
        uplink_freq: Hz::from_mhz(5935.0),
        downlink_freq: Hz::from_mhz(3710.0),
        bandwidth: Hz::from_mhz(36.0),
        max_power: ew_types::Dbm(50.0),
        gain: ew_types::Dbi(110.0),
        noise_figure: ew_types::Db(3.0),
        saturation_power: ew_types::Dbm(40.0),
        active: true,
    }
}

#[test]
fn s1_happy_uplink_downlink() {
    let mut tx = Transmitter::new(1, "team".into(), "srv".into());
    let mut events = Vec::new();
    tx.state.modems[0].is_powered = true;
    tx.apply_changes(
        0,
        ModemStagedConfig {
            antenna_id: Some("ant1".into()),
            frequency: Some(Hz::from_mhz(1735.0)),
            bandwidth: Some(Hz::from_mhz(3.0)),
            power: Some(Dbm(3.0)),
            modulation: Some(Modulation::Qpsk),
            fec: Some(Fec::ThreeQuarters),
            polarization: Some(Polarization::H),
            rotation: Some(Degrees(0.0)),
        },
        &mut events,
    );
    tx.toggle_transmit(0, &mut events);
    assert!(tx.state.modems[0].is_transmitting);

    let mut tx_antenna = c_band_antenna("tx-ant");
    tx_antenna.state.is_powered = true;
    tx_antenna.state.is_operational = true;
    tx_antenna.state.azimuth = Degrees(180.0);
    tx_antenna.state.elevation = Degrees(45.0);

    let mut manager = SimulationManager::new();
    let mut sat = Satellite::new(1, Degrees(180.0), Degrees(45.0), Hz(2.225e9), DegradationConfig::default());
    sat.add_transponder(geo_transponder());
    manager.add_satellite(sat);

    for carrier in tx.outgoing_carriers() {
        antenna_tx::radiate(
            &carrier,
            &tx_antenna.state,
            &tx_antenna.config,
            tx_antenna.circular_handedness,
            &mut manager,
        );
    }

    {
        let sat = manager.sat_by_norad(1).unwrap();
        assert_eq!(sat.rx_signal.len(), 1);
        assert!((sat.rx_signal[0].frequency.mhz() - 5935.0).abs() < 1.0);
    }

    manager.sat_by_norad_mut(1).unwrap().process();

    {
        let sat = manager.sat_by_norad(1).unwrap();
        assert_eq!(sat.tx_signal.len(), 1);
        assert!((sat.tx_signal[0].frequency.mhz() - 3710.0).abs() < 1.0);
        assert!(sat.tx_signal[0].power.value() > -130.0);
    }

    let mut rx_antenna = c_band_antenna("rx-ant");
    rx_antenna.state.is_powered = true;
    rx_antenna.state.is_operational = true;
    rx_antenna.state.azimuth = Degrees(180.0);
    rx_antenna.state.elevation = Degrees(45.0);
    rx_antenna.toggle_auto_track(true, &manager, &mut events);

    rx_antenna.tick(&manager, &mut events);

    assert_eq!(rx_antenna.state.rx_signals_in.len(), 1);
    let metrics = rx_antenna.state.rf_metrics.expect("metrics computed");
    assert!(rx_antenna.state.rx_signals_in[0].power.value() > metrics.noise_floor_dbm);
}

#[test]
fn s2_power_budget_violation() {
    let mut tx = Transmitter::new(1, "team".into(), "srv".into());
    let mut events = Vec::new();
    tx.state.modems[0].is_powered = true;
    tx.apply_changes(
        0,
        ModemStagedConfig {
            antenna_id: Some("ant1".into()),
            frequency: Some(Hz::from_mhz(1735.0)),
            bandwidth: Some(Hz::from_mhz(36.0)),
            power: Some(Dbm(40.0)),
            modulation: Some(Modulation::Qpsk),
            fec: Some(Fec::ThreeQuarters),
            polarization: Some(Polarization::H),
            rotation: Some(Degrees(0.0)),
        },
        &mut events,
    );
    tx.toggle_transmit(0, &mut events);

    assert!(tx.state.modems[0].is_faulted);
    assert!(!tx.state.modems[0].is_transmitting);
    assert!(events
        .iter()
        .any(|e| matches!(e, ew_types::CoreEvent::TxError { .. })));
}

fn co_channel_pair(power_a: f64, power_b: f64, freq_b_mhz: f64) -> Vec<RfSignal> {
    let sig = |id: &str, freq_mhz: f64, power: f64| RfSignal {
        signal_id: id.into(),
        server_id: "s".into(),
        norad_id: Some(1),
        frequency: Hz::from_mhz(freq_mhz),
        bandwidth: Hz::from_mhz(10.0),
        power: Dbm(power),
        modulation: None,
        fec: None,
        polarization: None,
        rotation: Degrees(0.0),
        feed: None,
        is_degraded: false,
        origin: SignalOrigin::SatelliteTx,
    };
    vec![sig("a", 1000.0, power_a), sig("b", freq_b_mhz, power_b)]
}

#[test]
fn s3_co_channel_interference_removes_weaker() {
    let survivors = interference::arbitrate(co_channel_pair(-90.0, -95.0, 1000.0));
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].signal_id, "a");
}

#[test]
fn s4_partial_overlap_degradation() {
    // 1007 MHz vs 1000 MHz, both 10 MHz wide -> 3 MHz overlap = 30% of a's
    // bandwidth; 12 dB power difference.
    let survivors = interference::arbitrate(co_channel_pair(-90.0, -102.0, 1007.0));
    assert_eq!(survivors.len(), 2);
    let weaker = survivors.iter().find(|s| s.signal_id == "b").unwrap();
    assert!(weaker.is_degraded);
}

#[test]
fn s5_step_track_converges_and_locks() {
    use ew_sim::antenna::step_track::StepTrackController;
    use ew_types::AntennaState;

    let mut ctrl = StepTrackController::new();
    let mut state = AntennaState::new("u".into(), "t".into(), "s".into(), "c".into());
    state.beacon_freq_hz = Hz::from_mhz(1000.0);
    state.beacon_search_bw_hz = Hz::from_mhz(1.0);

    for update in 0..30 {
        let power = -90.0 + (update as f64 * 0.4).min(8.0);
        state.rx_signals_in = vec![RfSignal {
            signal_id: "beacon".into(),
            server_id: "s".into(),
            norad_id: Some(1),
            frequency: Hz::from_mhz(1000.0),
            bandwidth: Hz::from_mhz(0.1),
            power: Dbm(power),
            modulation: Some(Modulation::Qpsk),
            fec: None,
            polarization: Some(Polarization::H),
            rotation: Degrees(0.0),
            feed: None,
            is_degraded: false,
            origin: SignalOrigin::SatelliteTx,
        }];
        for _ in 0..10 {
            ctrl.update(&mut state);
        }
        if state.is_beacon_locked {
            break;
        }
    }

    assert!(state.is_beacon_locked);
}

#[test]
fn s6_lock_cancellation_on_power_off() {
    let mut antenna = c_band_antenna("rx-ant");
    antenna.state.is_powered = true;
    antenna.state.is_operational = true;
    antenna.state.azimuth = Degrees(180.0);
    antenna.state.elevation = Degrees(45.0);

    let mut manager = SimulationManager::new();
    let mut sat = Satellite::new(1, Degrees(180.0), Degrees(45.0), Hz(2.225e9), DegradationConfig::default());
    sat.tx_signal.push(RfSignal {
        signal_id: "sat1-dl".into(),
        server_id: "s".into(),
        norad_id: Some(1),
        frequency: Hz::from_mhz(3710.0),
        bandwidth: Hz::from_mhz(3.0),
        power: Dbm(-60.0),
        modulation: Some(Modulation::Qpsk),
        fec: Some(Fec::ThreeQuarters),
        polarization: Some(Polarization::H),
        rotation: Degrees(0.0),
        feed: None,
        is_degraded: false,
        origin: SignalOrigin::SatelliteTx,
    });
    manager.add_satellite(sat);

    let mut events = Vec::new();
    antenna.toggle_auto_track(true, &manager, &mut events);
    assert!(antenna.state.is_auto_track_enabled);

    // Cut power before the 3s (180-tick) lock delay elapses.
    for _ in 0..90 {
        antenna.tick(&manager, &mut events);
    }
    antenna.set_power(false, &mut events);

    for _ in 0..400 {
        antenna.tick(&manager, &mut events);
    }

    assert!(!antenna.state.is_locked);
    assert!(!antenna.state.is_auto_track_enabled);
}

//! Satellite / bent-pipe transponder model (§4.4).

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use ew_types::{Degrees, Hz, RfSignal, SignalOrigin, Transponder};

use crate::constants::{BOLTZMANN_K, REF_TEMP_K};
use crate::noise::{unit_rand, SmoothNoise};

/// Configurable degradation hooks named in §4.4.g, loaded from `SimConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationConfig {
    pub power_variation_range_db: f64,
    pub rain_fade_enabled: bool,
    pub scintillation_enabled: bool,
    /// Linear-power interference injected per tick, if any (dBm of a
    /// notional co-channel jammer summed in at the transponder).
    pub interference_injection_dbm: Option<f64>,
    pub dropout_probability: Option<f64>,
}

impl Default for DegradationConfig {
    fn default() -> DegradationConfig {
        DegradationConfig {
            power_variation_range_db: 1.0,
            rain_fade_enabled: true,
            scintillation_enabled: true,
            interference_injection_dbm: None,
            dropout_probability: None,
        }
    }
}

pub struct Satellite {
    pub norad_id: u32,
    pub az: Degrees,
    pub el: Degrees,
    pub frequency_offset: Hz,
    pub transponders: Vec<Transponder>,
    pub external_signal: Vec<RfSignal>,
    pub rx_signal: Vec<RfSignal>,
    pub tx_signal: Vec<RfSignal>,
    pub health: f64,
    pub degradation_config: DegradationConfig,

    noise_gens: HashMap<String, SmoothNoise>,
    rng: StdRng,
}

impl Satellite {
    pub fn new(
        norad_id: u32,
        az: Degrees,
        el: Degrees,
        frequency_offset: Hz,
        degradation_config: DegradationConfig,
    ) -> Satellite {
        Satellite {
            norad_id,
            az,
            el,
            frequency_offset,
            transponders: Vec::new(),
            external_signal: Vec::new(),
            rx_signal: Vec::new(),
            tx_signal: Vec::new(),
            health: 1.0,
            degradation_config,
            noise_gens: HashMap::new(),
            rng: StdRng::seed_from_u64(norad_id as u64 ^ 0x9E3779B9),
        }
    }

    pub fn add_transponder(&mut self, t: Transponder) {
        self.transponders.push(t);
    }

    fn transponder_for(&self, uplink_freq: Hz) -> Option<&Transponder> {
        self.transponders.iter().find(|t| t.matches_uplink(uplink_freq))
    }

    /// One `UPDATE`: drain incoming carriers through their matching
    /// transponder, apply impairments, and refill `tx_signal`. `rx_signal`
    /// and `external_signal` are cleared and expected to be refilled by the
    /// caller before the next tick (§5 shared-resources contract).
    pub fn process(&mut self) {
        let mut out = Vec::new();

        let incoming: Vec<RfSignal> = self
            .external_signal
            .drain(..)
            .chain(self.rx_signal.drain(..))
            .collect();

        for sig in incoming {
            let Some(transponder) = self.transponder_for(sig.frequency).cloned() else {
                continue;
            };
            if !transponder.active {
                continue;
            }

            let mut power_mw = sig.power.to_mw();

            // b. Saturation (soft-knee compression toward saturation_power).
            let p_dbm = 10.0 * power_mw.log10();
            let sat_dbm = transponder.saturation_power.value();
            let compressed_dbm = if p_dbm > sat_dbm {
                let over = p_dbm - sat_dbm;
                (sat_dbm + over / (1.0 + over / 10.0)).min(transponder.max_power.value())
            } else {
                p_dbm
            };
            power_mw = 10f64.powf(compressed_dbm / 10.0);

            // c. Additive thermal noise referred to the transponder input.
            let noise_w = BOLTZMANN_K
                * REF_TEMP_K
                * transponder.bandwidth.value()
                * 10f64.powf(transponder.noise_figure.value() / 10.0);
            let noise_dbm = 10.0 * (noise_w * 1000.0).log10();
            let noise_mw = 10f64.powf(noise_dbm / 10.0);
            power_mw += noise_mw;

            // d. Transponder gain.
            let mut p_dbm = 10.0 * power_mw.log10() + transponder.gain.value();

            // e. Frequency translation to downlink.
            let f_down = Hz(sig.frequency.value() - self.frequency_offset.value());

            // f. Polarization flip.
            let pol = sig.polarization.map(|p| p.flipped());

            // g. Configurable degradation effects, keyed per signal id.
            let noise_gen = self
                .noise_gens
                .entry(sig.signal_id.clone())
                .or_insert_with(|| SmoothNoise::for_signal_id(&sig.signal_id));
            p_dbm += noise_gen.sample() * self.degradation_config.power_variation_range_db;

            let f_ghz = f_down.ghz();
            let mut is_degraded = sig.is_degraded;
            if self.degradation_config.rain_fade_enabled {
                let rain_fade = (f_ghz / 10.0) * unit_rand(&mut self.rng) * 2.0;
                p_dbm -= rain_fade;
            }
            if self.degradation_config.scintillation_enabled {
                let scint = (unit_rand(&mut self.rng) - 0.5) * 1.5;
                p_dbm += scint;
            }
            if let Some(jammer_dbm) = self.degradation_config.interference_injection_dbm {
                let sum_mw = 10f64.powf(p_dbm / 10.0) + 10f64.powf(jammer_dbm / 10.0);
                p_dbm = 10.0 * sum_mw.log10();
            }

            p_dbm -= (1.0 - self.health) * 10.0;
            is_degraded = is_degraded || self.health < 0.9;

            let out_sig = RfSignal {
                signal_id: sig.signal_id,
                server_id: sig.server_id,
                norad_id: Some(self.norad_id),
                frequency: f_down,
                bandwidth: sig.bandwidth,
                power: ew_types::Dbm(p_dbm),
                modulation: sig.modulation,
                fec: sig.fec,
                polarization: pol,
                rotation: sig.rotation,
                feed: sig.feed,
                is_degraded,
                origin: SignalOrigin::SatelliteTx,
            };
            out.push(out_sig);
        }

        self.walk_health();

        // 4. Independent random dropout, if configured.
        self.tx_signal = if let Some(p) = self.degradation_config.dropout_probability {
            out.into_iter()
                .filter(|_| unit_rand(&mut self.rng) >= p)
                .collect()
        } else {
            out
        };
    }

    /// Slow random walk of `health` within `[0.5, 1.0]` (§4.4 step 3).
    fn walk_health(&mut self) {
        let r = unit_rand(&mut self.rng);
        if r < 1e-4 {
            self.health = (self.health - 0.01).max(0.5);
        } else if self.health < 1.0 && r < 1e-3 {
            self.health = (self.health + 0.01).min(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ew_types::{Db, Dbi, Dbm, Polarization};

    fn transponder(uplink_mhz: f64, offset_hz: f64) -> Transponder {
        Transponder {
            id: "tp1".into(),
            uplink_freq: Hz::from_mhz(uplink_mhz),
            downlink_freq: Hz::from_mhz(uplink_mhz) - Hz(offset_hz),
            bandwidth: Hz::from_mhz(36.0),
            max_power: Dbm(50.0),
            gain: Dbi(110.0),
            noise_figure: Db(3.0),
            saturation_power: Dbm(40.0),
            active: true,
        }
    }

    fn uplink_signal(freq_mhz: f64, power_dbm: f64) -> RfSignal {
        RfSignal {
            signal_id: "tx1-modem1".into(),
            server_id: "srv".into(),
            norad_id: None,
            frequency: Hz::from_mhz(freq_mhz),
            bandwidth: Hz::from_mhz(3.0),
            power: Dbm(power_dbm),
            modulation: None,
            fec: None,
            polarization: Some(Polarization::H),
            rotation: Degrees(0.0),
            feed: None,
            is_degraded: false,
            origin: SignalOrigin::AntennaTx,
        }
    }

    #[test]
    fn unmatched_uplink_frequency_is_skipped() {
        let mut sat = Satellite::new(1, Degrees(180.0), Degrees(45.0), Hz(2.225e9), DegradationConfig::default());
        sat.add_transponder(transponder(5935.0, 2.225e9));
        sat.rx_signal.push(uplink_signal(1234.0, -90.0));
        sat.process();
        assert!(sat.tx_signal.is_empty());
    }

    #[test]
    fn matched_uplink_translates_and_preserves_signal_id() {
        let mut sat = Satellite::new(1, Degrees(180.0), Degrees(45.0), Hz(2.225e9), DegradationConfig::default());
        sat.add_transponder(transponder(5935.0, 2.225e9));
        sat.rx_signal.push(uplink_signal(5935.0, -90.0));
        sat.process();
        assert_eq!(sat.tx_signal.len(), 1);
        let out = &sat.tx_signal[0];
        assert_eq!(out.signal_id, "tx1-modem1");
        assert!((out.frequency.mhz() - 3710.0).abs() < 1.0);
    }

    #[test]
    fn polarization_flips_h_to_v() {
        let mut sat = Satellite::new(1, Degrees(180.0), Degrees(45.0), Hz(2.225e9), DegradationConfig::default());
        sat.add_transponder(transponder(5935.0, 2.225e9));
        sat.rx_signal.push(uplink_signal(5935.0, -90.0));
        sat.process();
        assert_eq!(sat.tx_signal[0].polarization, Some(Polarization::V));
    }

    #[test]
    fn inactive_transponder_drops_carrier() {
        let mut sat = Satellite::new(1, Degrees(180.0), Degrees(45.0), Hz(2.225e9), DegradationConfig::default());
        let mut tp = transponder(5935.0, 2.225e9);
        tp.active = false;
        sat.add_transponder(tp);
        sat.rx_signal.push(uplink_signal(5935.0, -90.0));
        sat.process();
        assert!(sat.tx_signal.is_empty());
    }
}

//! Shared engine state: the simulation manager plus every registered
//! ground station, wrapped for concurrent access from socket handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use ew_sim::antenna::tx as antenna_tx;
use ew_sim::config::SimConfig;
use ew_sim::error::SimConfigError;
use ew_sim::satellite::Satellite;
use ew_sim::{AntennaCore, ReceiverBank, SimulationManager, Transmitter};
use ew_types::{CoreEvent, Degrees, Hz};

/// One control-plane unit: an antenna paired with the transmitter and
/// receiver bank physically wired to it. The sandbox's teams each own one
/// or more of these; the server does not otherwise model team identity.
pub struct GroundStation {
    pub antenna: AntennaCore,
    pub transmitter: Transmitter,
    pub receiver: ReceiverBank,
}

pub struct Engine {
    pub manager: SimulationManager,
    pub stations: HashMap<String, GroundStation>,
    config: SimConfig,
}

impl Engine {
    pub fn new() -> Engine {
        Engine::from_config(SimConfig::default())
    }

    /// Seeds the satellite registry from `config.satellites`, matching the
    /// CLI binary's bootstrap (`packages/ew-sim/src/main.rs`). Ground
    /// stations are not part of `SimConfig` (it has no operator-team
    /// concept) and are instead added at runtime via `register_station`.
    pub fn from_config(config: SimConfig) -> Engine {
        let mut manager = SimulationManager::new();
        for entry in &config.satellites {
            manager.add_satellite(Satellite::new(
                entry.norad_id,
                Degrees(entry.az_deg),
                Degrees(entry.el_deg),
                Hz(entry.frequency_offset_hz),
                entry.degradation.clone(),
            ));
        }
        Engine {
            manager,
            stations: HashMap::new(),
            config,
        }
    }

    /// Resolves `preset_id` against the loaded `SimConfig` (built-in
    /// catalog plus any `[antennas.*]` overrides) and wires up a fresh
    /// antenna/transmitter/receiver triplet under `station_id`.
    pub fn register_station(
        &mut self,
        station_id: String,
        preset_id: &str,
        unit: u32,
        team_id: String,
        server_id: String,
    ) -> Result<(), SimConfigError> {
        let preset = self.config.antenna_preset(preset_id)?;
        let antenna = AntennaCore::new(station_id.clone(), team_id, server_id.clone(), preset);
        let transmitter = Transmitter::new(unit, antenna.state.team_id.clone(), server_id);
        let receiver = ReceiverBank::new(station_id.clone());
        self.stations.insert(station_id, GroundStation { antenna, transmitter, receiver });
        Ok(())
    }

    /// One `UPDATE` (§5 ordering contract): Transmitter -> AntennaTx (compose
    /// + radiate outbound) -> Satellite -> AntennaRx (RF pass + interference
    /// arbitration) -> Receiver classification.
    pub fn tick(&mut self, events: &mut Vec<CoreEvent>) {
        for station in self.stations.values_mut() {
            station.transmitter.tick(events);
        }

        for station in self.stations.values() {
            for carrier in station.transmitter.outgoing_carriers() {
                antenna_tx::radiate(
                    &carrier,
                    &station.antenna.state,
                    &station.antenna.config,
                    station.antenna.circular_handedness,
                    &mut self.manager,
                );
            }
        }

        for sat in self.manager.satellites_mut() {
            sat.process();
        }

        for station in self.stations.values_mut() {
            station.antenna.tick(&self.manager, events);
            station.receiver.tick(&station.antenna.state.rx_signals_in, events);
            events.push(CoreEvent::AntennaStateChanged(Box::new(station.antenna.state.clone())));
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

pub type SharedEngine = Arc<RwLock<Engine>>;

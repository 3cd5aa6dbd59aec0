//! Socket.IO command dispatch. Each handler takes a write lock on the
//! shared [`Engine`](crate::state::Engine), mutates one station, and lets
//! the next tick's `AntennaStateChanged` broadcast carry the result back
//! out rather than replying inline.

use serde::Deserialize;
use serde_json::Value;
use socketioxide::extract::{Data, SocketRef};
use tracing::{info, warn};

use ew_sim::AntennaCore;
use ew_types::TrackingMode;

use crate::state::SharedEngine;

#[derive(Debug, Deserialize)]
struct StationTarget {
    station_id: String,
}

#[derive(Debug, Deserialize)]
struct SetPower {
    station_id: String,
    on: bool,
}

#[derive(Debug, Deserialize)]
struct ToggleAutoTrack {
    station_id: String,
    up: bool,
}

#[derive(Debug, Deserialize)]
struct ToggleLoopback {
    station_id: String,
    on: bool,
}

#[derive(Debug, Deserialize)]
struct SetTrackingMode {
    station_id: String,
    mode: String,
}

#[derive(Debug, Deserialize)]
struct MoveToSatellite {
    station_id: String,
    norad_id: u32,
}

#[derive(Debug, Deserialize)]
struct StageChanges {
    station_id: String,
    az_deg: Option<f64>,
    el_deg: Option<f64>,
    pol_deg: Option<f64>,
    beacon_hz: Option<f64>,
    beacon_bw_hz: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RegisterStation {
    station_id: String,
    preset_id: String,
    unit: u32,
    team_id: String,
    server_id: String,
}

fn parse_mode(mode: &str) -> Option<TrackingMode> {
    match mode {
        "stow" => Some(TrackingMode::Stow),
        "maintenance" => Some(TrackingMode::Maintenance),
        "manual" => Some(TrackingMode::Manual),
        "step_track" => Some(TrackingMode::StepTrack),
        "program_track" => Some(TrackingMode::ProgramTrack),
        _ => None,
    }
}

async fn with_antenna<F: FnOnce(&mut AntennaCore)>(engine: &SharedEngine, station_id: &str, f: F) {
    let mut eng = engine.write().await;
    match eng.stations.get_mut(station_id) {
        Some(station) => f(&mut station.antenna),
        None => warn!(station_id, "command for unknown station"),
    }
}

pub async fn on_connect(socket: SocketRef, engine: SharedEngine) {
    info!(socket_id = %socket.id, "client connected");

    socket.on_disconnect(move |s: SocketRef| {
        let id = s.id.to_string();
        async move {
            info!(socket_id = %id, "client disconnected");
        }
    });

    {
        let engine = engine.clone();
        socket.on("station:register", move |socket: SocketRef, Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<RegisterStation>(data) else { return };
                let mut eng = engine.write().await;
                let result = eng.register_station(
                    cmd.station_id.clone(),
                    &cmd.preset_id,
                    cmd.unit,
                    cmd.team_id,
                    cmd.server_id,
                );
                drop(eng);
                if let Err(err) = result {
                    warn!(station_id = %cmd.station_id, %err, "station registration failed");
                    let _ = socket.emit("station:register_error", &err.to_string());
                }
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:set_power", move |socket: SocketRef, Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<SetPower>(data) else { return };
                let mut eng = engine.write().await;
                let Some(station) = eng.stations.get_mut(&cmd.station_id) else {
                    warn!(station_id = %cmd.station_id, "set_power for unknown station");
                    return;
                };
                let mut events = Vec::new();
                station.antenna.set_power(cmd.on, &mut events);
                drop(eng);
                let _ = socket.emit("core-events", &events);
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:toggle_auto_track", move |socket: SocketRef, Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<ToggleAutoTrack>(data) else { return };
                let mut eng = engine.write().await;
                let crate::state::Engine { manager, stations, .. } = &mut *eng;
                let Some(station) = stations.get_mut(&cmd.station_id) else {
                    warn!(station_id = %cmd.station_id, "toggle_auto_track for unknown station");
                    return;
                };
                let mut events = Vec::new();
                station.antenna.toggle_auto_track(cmd.up, manager, &mut events);
                drop(eng);
                let _ = socket.emit("core-events", &events);
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:toggle_loopback", move |socket: SocketRef, Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<ToggleLoopback>(data) else { return };
                let mut eng = engine.write().await;
                let Some(station) = eng.stations.get_mut(&cmd.station_id) else {
                    warn!(station_id = %cmd.station_id, "toggle_loopback for unknown station");
                    return;
                };
                let mut events = Vec::new();
                station.antenna.toggle_loopback(cmd.on, &mut events);
                drop(eng);
                let _ = socket.emit("core-events", &events);
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:set_tracking_mode", move |Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<SetTrackingMode>(data) else { return };
                let Some(mode) = parse_mode(&cmd.mode) else {
                    warn!(mode = %cmd.mode, "unknown tracking mode");
                    return;
                };
                with_antenna(&engine, &cmd.station_id, |a| a.set_tracking_mode(mode)).await;
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:start_step_track", move |Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<StationTarget>(data) else { return };
                with_antenna(&engine, &cmd.station_id, |a| a.start_step_track()).await;
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:stop_step_track", move |Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<StationTarget>(data) else { return };
                with_antenna(&engine, &cmd.station_id, |a| a.stop_step_track()).await;
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:move_to_satellite", move |Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<MoveToSatellite>(data) else { return };
                let mut eng = engine.write().await;
                let crate::state::Engine { manager, stations, .. } = &mut *eng;
                if let Some(station) = stations.get_mut(&cmd.station_id) {
                    station.antenna.move_to_target_satellite(cmd.norad_id, manager);
                } else {
                    warn!(station_id = %cmd.station_id, "move_to_satellite for unknown station");
                }
            }
        });
    }

    {
        let engine = engine.clone();
        socket.on("antenna:stage_changes", move |socket: SocketRef, Data::<Value>(data)| {
            let engine = engine.clone();
            async move {
                let Ok(cmd) = serde_json::from_value::<StageChanges>(data) else { return };
                let mut eng = engine.write().await;
                let Some(station) = eng.stations.get_mut(&cmd.station_id) else {
                    warn!(station_id = %cmd.station_id, "stage_changes for unknown station");
                    return;
                };
                let staged = &mut station.antenna.state.staged;
                if let Some(az) = cmd.az_deg {
                    staged.az = Some(az);
                }
                if let Some(el) = cmd.el_deg {
                    staged.el = Some(el);
                }
                if let Some(pol) = cmd.pol_deg {
                    staged.pol = Some(pol);
                }
                if let Some(hz) = cmd.beacon_hz {
                    staged.beacon_hz = Some(hz);
                }
                if let Some(bw) = cmd.beacon_bw_hz {
                    staged.beacon_bw_hz = Some(bw);
                }
                station.antenna.state.has_staged_changes = station.antenna.state.staged.has_any();
                let mut events = Vec::new();
                station.antenna.apply_changes(&mut events);
                drop(eng);
                let _ = socket.emit("core-events", &events);
            }
        });
    }
}

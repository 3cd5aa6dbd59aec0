//! Standalone CLI runner: loads a `SimConfig`, builds a `SimulationManager`
//! with its configured satellites, and drives the tick loop headless.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ew_sim::config::SimConfig;
use ew_sim::manager::SimulationManager;
use ew_sim::satellite::Satellite;
use ew_types::{Degrees, Hz};

#[derive(Parser, Debug)]
#[command(name = "ew-sim", about = "EW ground-station simulation core")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 60.0)]
    tick_hz: f64,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Run this many ticks then exit instead of running forever.
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let tick_hz = if args.tick_hz > 0.0 { args.tick_hz } else { config.tick_hz };
    tracing::info!(tick_hz, satellites = config.satellites.len(), "starting ew-sim");

    let mut manager = SimulationManager::new();
    for entry in &config.satellites {
        let sat = Satellite::new(
            entry.norad_id,
            Degrees(entry.az_deg),
            Degrees(entry.el_deg),
            Hz(entry.frequency_offset_hz),
            entry.degradation.clone(),
        );
        manager.add_satellite(sat);
    }

    let dt_ms = 1000.0 / tick_hz;
    let mut tick: u64 = 0;
    loop {
        for sat in manager.satellites_mut() {
            sat.process();
        }
        tick += 1;

        if let Some(limit) = args.ticks {
            if tick >= limit {
                tracing::info!(tick, "reached tick limit, exiting");
                break;
            }
        }
        if args.ticks.is_none() && tick % (tick_hz as u64).max(1) == 0 {
            tracing::debug!(tick, dt_ms, "tick");
        }
        if args.ticks.is_none() && tick > 10_000_000 {
            break;
        }
    }

    Ok(())
}

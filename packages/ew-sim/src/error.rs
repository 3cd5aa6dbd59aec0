use thiserror::Error;

/// Ambient-layer errors: config loading and antenna-preset lookups. Per
/// SPEC_FULL §2, operational faults reachable during normal simulation
/// (validation failures, power-budget violations) are NOT represented here
/// — they surface as `AntennaState.fault` / `CoreEvent::TxError` so a single
/// component's fault never aborts a tick.
#[derive(Debug, Error)]
pub enum SimConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown antenna preset id: {0}")]
    UnknownPreset(String),
}

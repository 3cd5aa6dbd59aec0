use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modulation {
    Bpsk,
    Qpsk,
    Qam8,
    Qam16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fec {
    OneHalf,
    TwoThirds,
    ThreeQuarters,
    FiveSixths,
    SevenEighths,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarization {
    H,
    V,
    Rhcp,
    Lhcp,
}

impl Polarization {
    pub fn is_circular(self) -> bool {
        matches!(self, Polarization::Rhcp | Polarization::Lhcp)
    }

    /// H<->V flip, circular handedness preserved. Matches §4.4 transponder step f.
    pub fn flipped(self) -> Polarization {
        match self {
            Polarization::H => Polarization::V,
            Polarization::V => Polarization::H,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolarizationType {
    Linear,
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalOrigin {
    Transmitter,
    AntennaTx,
    SatelliteTx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingMode {
    Stow,
    Maintenance,
    Manual,
    StepTrack,
    ProgramTrack,
}

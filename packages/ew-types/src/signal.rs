//! `RfSignal` — the immutable-by-convention carrier value object that flows
//! through the chain from transmitter to receiver.

use serde::{Deserialize, Serialize};

use crate::enums::{Fec, Modulation, Polarization, SignalOrigin};
use crate::units::{Db, Dbm, Degrees, Hz};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfSignal {
    pub signal_id: String,
    pub server_id: String,
    pub norad_id: Option<u32>,
    pub frequency: Hz,
    pub bandwidth: Hz,
    pub power: Dbm,
    pub modulation: Option<Modulation>,
    pub fec: Option<Fec>,
    pub polarization: Option<Polarization>,
    pub rotation: Degrees,
    pub feed: Option<String>,
    pub is_degraded: bool,
    pub origin: SignalOrigin,
}

impl RfSignal {
    /// Builds the canonical origin id used by the transmitter: `"tx{unit}-modem{n}"`.
    pub fn make_signal_id(unit: u32, modem_number: u32) -> String {
        format!("tx{unit}-modem{modem_number}")
    }

    pub fn lower_band_edge(&self) -> Hz {
        Hz(self.frequency.value() - self.bandwidth.value() / 2.0)
    }

    pub fn upper_band_edge(&self) -> Hz {
        Hz(self.frequency.value() + self.bandwidth.value() / 2.0)
    }

    /// Overlap bandwidth in Hz between this signal's band and `other`'s. 0 if disjoint.
    pub fn overlap_hz(&self, other: &RfSignal) -> f64 {
        let lo = self.lower_band_edge().value().max(other.lower_band_edge().value());
        let hi = self.upper_band_edge().value().min(other.upper_band_edge().value());
        (hi - lo).max(0.0)
    }

    /// Returns a value-semantics copy with `power` replaced. `signal_id` is preserved.
    pub fn with_power(&self, power: Dbm) -> RfSignal {
        RfSignal {
            power,
            ..self.clone()
        }
    }

    /// Returns a value-semantics copy with `is_degraded` forced true.
    /// `is_degraded` is monotonic: once set it is never cleared downstream.
    pub fn degraded(&self) -> RfSignal {
        RfSignal {
            is_degraded: true,
            ..self.clone()
        }
    }

    pub fn with_power_and_origin(&self, power: Dbm, origin: SignalOrigin) -> RfSignal {
        RfSignal {
            power,
            origin,
            ..self.clone()
        }
    }

    pub fn with_frequency(&self, frequency: Hz) -> RfSignal {
        RfSignal {
            frequency,
            ..self.clone()
        }
    }

    pub fn with_polarization(&self, polarization: Option<Polarization>) -> RfSignal {
        RfSignal {
            polarization,
            ..self.clone()
        }
    }
}

/// `overlap_pct` as defined in §4.3.6: overlap bandwidth as a percentage of
/// `s`'s own bandwidth (not symmetric — `s` is always the candidate being judged).
pub fn overlap_pct(s: &RfSignal, o: &RfSignal) -> f64 {
    if s.bandwidth.value() <= 0.0 {
        return 0.0;
    }
    100.0 * s.overlap_hz(o) / s.bandwidth.value()
}

/// Carrier-to-interference ratio in dB, from two dBm powers.
pub fn carrier_to_interference_db(s: Dbm, o: Dbm) -> Db {
    Db(10.0 * (s.to_mw() / o.to_mw()).log10())
}

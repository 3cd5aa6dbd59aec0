pub mod antenna_config;
pub mod antenna_state;
pub mod enums;
pub mod events;
pub mod signal;
pub mod transponder;
pub mod units;

pub use antenna_config::{AntennaConfig, FeedLossModel, PatternModel};
pub use antenna_state::{AntennaState, Fault, RfMetrics, Staged, TransmitterModem, TransmitterState};
pub use enums::{Fec, Modulation, Polarization, PolarizationType, SignalOrigin, TrackingMode};
pub use events::{CoreEvent, EventSink};
pub use signal::{carrier_to_interference_db, overlap_pct, RfSignal};
pub use transponder::Transponder;
pub use units::{Db, Dbi, Dbm, Degrees, Hz};

//! The typed sum-type replacing the original's pervasive "any"-typed event
//! payloads (§9 Design Notes). The bus itself (transport, fan-out) is an
//! external collaborator; this module only fixes the payload shapes.

use serde::{Deserialize, Serialize};

use crate::antenna_state::AntennaState;

/// The boundary named in the original's "opaque event bus" design note:
/// core components emit `CoreEvent`s into one of these, never into a
/// transport type directly. `Vec<CoreEvent>` is the concrete sink used
/// throughout the simulation core; a server-side sink drains and
/// re-broadcasts over its own transport.
pub trait EventSink {
    fn emit(&mut self, event: CoreEvent);
}

impl EventSink for Vec<CoreEvent> {
    fn emit(&mut self, event: CoreEvent) {
        self.push(event);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum CoreEvent {
    Update { dt_ms: f64 },
    Draw { dt_ms: f64 },
    Sync,

    AntennaStateChanged(Box<AntennaState>),
    AntennaLocked(bool),
    AntennaError { antenna_id: String, message: String },
    AntennaLoopbackChanged(bool),
    AntennaTrackChanged(bool),
    AntennaPowerChanged(bool),

    TxConfigChanged { unit: u32, modem: u32 },
    TxTransmitChanged { unit: u32, modem: u32, transmitting: bool },
    TxError { unit: u32, modem: u32, message: String },
    TxActiveModemChanged { unit: u32, active: u32 },

    RxConfigChanged { antenna_id: String },
    RxActiveModemChanged { antenna_id: String, modem: u32 },
    RxSignalFound { antenna_id: String, signal_id: String },
    RxSignalLost { antenna_id: String, signal_id: String },
}

//! The wire-level envelope and the tagged payload it carries.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// One logical message, tagged by kind. Every exchange between a server
/// handler and a participant is one of these variants; there is no runtime
/// shape inspection anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Participant announces its display name.
    Name(String),
    /// Server confirms the participant's slot.
    Welcome { slot: u8 },
    /// Server asks for the next vessel of the given length.
    PlacementRequest { length: u8 },
    /// Participant proposes a placement.
    Placement {
        row: i32,
        col: i32,
        direction: String,
    },
    /// Server accepts or rejects the proposed placement.
    PlacementOutcome(bool),
    /// Still playing (true) or the match is over (false).
    Playing(bool),
    /// A rendered grid with a caption.
    BoardView { caption: String, rendered: String },
    /// Server asks for a target coordinate.
    TargetRequest,
    /// Participant attacks a coordinate.
    Target { row: i32, col: i32 },
    /// Result of the attack, with the sunk vessel's class when it sank one.
    ShotOutcome { hit: bool, sunk: Option<String> },
    /// The winner's display name.
    Winner(String),
    /// Free-form status text for the participant.
    Info(String),
}

/// The packet envelope: id, creation timestamp, ack flag, and at most one
/// payload. Ack envelopes echo the id they acknowledge and carry no payload.
///
/// Ids are assigned by the sending link from a monotonic per-connection
/// counter, so they are unique among outstanding messages and usable for
/// ack correlation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: u64,
    pub timestamp_ms: u64,
    pub ack: bool,
    pub payload: Option<Payload>,
}

impl Envelope {
    /// A data envelope carrying `payload`, stamped now.
    pub fn data(id: u64, payload: Payload) -> Self {
        Envelope {
            id,
            timestamp_ms: now_ms(),
            ack: false,
            payload: Some(payload),
        }
    }

    /// An ack envelope echoing `id`, stamped now.
    pub fn ack(id: u64) -> Self {
        Envelope {
            id,
            timestamp_ms: now_ms(),
            ack: true,
            payload: None,
        }
    }

    /// Milliseconds since the envelope was stamped, by wall clock. Zero if
    /// the peer's clock is ahead of ours.
    pub fn age_ms(&self) -> u64 {
        now_ms().saturating_sub(self.timestamp_ms)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Serialize an envelope for the wire.
pub fn encode(env: &Envelope) -> anyhow::Result<Vec<u8>> {
    bincode::serialize(env).map_err(|e| anyhow::anyhow!("serialization error: {}", e))
}

/// Deserialize an envelope from the wire. A malformed frame surfaces as an
/// ordinary error for the session layer to turn into an abort.
pub fn decode(bytes: &[u8]) -> anyhow::Result<Envelope> {
    bincode::deserialize(bytes).map_err(|e| anyhow::anyhow!("deserialization error: {}", e))
}

use crate::domain::{
    DiscoveryFailure, MessageId, Peer, PeerId, SendErrorCode, TrackerError,
};
use serde::{Deserialize, Serialize};

/// Callbacks emitted by the transport, consumed by `SessionController::handle_event`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Discovery finished with a (possibly empty) set of peers
    PeersFound(Vec<Peer>),
    /// Discovery finished without a peer
    NoPeersFound(DiscoveryFailure),
    SendAcknowledged { peer: PeerId, id: MessageId },
    SendFailed {
        peer: PeerId,
        id: MessageId,
        code: SendErrorCode,
    },
    MessageReceived { from: PeerId, payload: Vec<u8> },
    PeerAvailabilityChanged { peer: PeerId, available: bool },
}

impl TransportEvent {
    /// Short name for log output
    pub fn kind(&self) -> &'static str {
        match self {
            TransportEvent::PeersFound(_) => "PeersFound",
            TransportEvent::NoPeersFound(_) => "NoPeersFound",
            TransportEvent::SendAcknowledged { .. } => "SendAcknowledged",
            TransportEvent::SendFailed { .. } => "SendFailed",
            TransportEvent::MessageReceived { .. } => "MessageReceived",
            TransportEvent::PeerAvailabilityChanged { .. } => "PeerAvailabilityChanged",
        }
    }
}

/// Which callback produced an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "callback", content = "code", rename_all = "snake_case")]
pub enum AnomalySource {
    Send,
    Acknowledgment,
    Failure(SendErrorCode),
}

/// A callback referring to message state the tracker does not hold as pending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub source: AnomalySource,
    pub peer: PeerId,
    pub error: TrackerError,
}

/// Notifications delivered to the [`Observer`](crate::application::Observer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    DiscoveryStarted,
    PeerBound { peer: Peer },
    PeerUnbound { peer: Peer },
    DiscoveryFailed { reason: DiscoveryFailure },
    MessageSent { id: MessageId, payload: Vec<u8> },
    MessageAcknowledged { id: MessageId },
    MessageFailed { id: MessageId, code: SendErrorCode },
    MessageReceived { from: PeerId, payload: Vec<u8> },
    PeerAvailabilityChanged { peer: PeerId, available: bool },
    Anomaly(Anomaly),
}

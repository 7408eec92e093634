use crate::application::TransportEvent;
use crate::domain::{MessageId, PeerId};
use serde::{Deserialize, Serialize};

/// Immediate failures of a send request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TransportError {
    #[error("Transport I/O failure: {0}")]
    Io(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Peer discovery and message delivery, provided by the host platform
///
/// Results arrive later as [`TransportEvent`]s. Push-style transports feed
/// them to the controller through a serialized entry point (`SessionLoop::submit`
/// or a `SessionHandle`); pull-style transports return them from `poll_events`.
pub trait Transport {
    /// Start a discovery round. Must eventually produce `PeersFound` or `NoPeersFound`.
    fn discover_peers(&mut self);

    /// Hand a payload to the transport, returning the id used in later callbacks
    fn send(&mut self, peer: &PeerId, payload: &[u8]) -> Result<MessageId, TransportError>;

    /// Drain events the transport has buffered since the last call
    fn poll_events(&mut self) -> Vec<TransportEvent> {
        Vec::new()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn discover_peers(&mut self) {
        (**self).discover_peers()
    }

    fn send(&mut self, peer: &PeerId, payload: &[u8]) -> Result<MessageId, TransportError> {
        (**self).send(peer, payload)
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        (**self).poll_events()
    }
}

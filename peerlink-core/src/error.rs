use crate::application::runtime::QueueError;
use crate::domain::RegistryError;
use crate::infrastructure::TransportError;

/// Errors reported synchronously to the caller of a session operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No peer is bound, find peers first")]
    NoBoundPeer,

    #[error("Send rejected: {0}")]
    SendRejected(#[from] TransportError),

    #[error("Peer registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Event queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Session runtime has shut down")]
    RuntimeClosed,
}

pub type Result<T> = std::result::Result<T, SessionError>;

// Domain layer (core)
pub mod domain;

// Application layer (state machine, observers, runtime)
pub mod application;

// Infrastructure layer (transport seam)
pub mod infrastructure;

pub mod error;

// Re-exports for convenience
pub use application::runtime::{EventQueue, QueueError, SessionLoop};
#[cfg(feature = "native")]
pub use application::runtime::{SessionHandle, SessionRuntime, SessionSnapshot};
#[cfg(feature = "native")]
pub use application::ChannelObserver;
pub use application::{
    Anomaly, AnomalySource, Observer, PeerSelector, RecordingObserver, SelectionPolicy,
    SessionConfig, SessionController, SessionEvent, TracingObserver, TransportEvent,
};
pub use domain::{
    DiscoveryFailure, MessageId, MessageStatus, MessageTracker, PendingMessage, Peer, PeerId,
    PeerRegistry, Reachability, RegistryError, SendErrorCode, SessionId, SessionState, Timestamp,
    TrackerError,
};
pub use error::{Result, SessionError};
pub use infrastructure::{Transport, TransportError};

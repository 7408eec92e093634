mod failure;
mod message;
mod message_tracker;
mod peer;
mod peer_registry;
mod session;
mod timestamp;

pub use failure::{DiscoveryFailure, ParseCodeError, SendErrorCode};
pub use message::{MessageId, MessageStatus, PendingMessage};
pub use message_tracker::{MessageTracker, TrackerError};
pub use peer::{Peer, PeerId, Reachability};
pub use peer_registry::{PeerRegistry, RegistryError};
pub use session::{SessionId, SessionState};
pub use timestamp::Timestamp;

use crate::domain::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a remote endpoint, as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Whether a peer can currently be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    /// No availability report received since discovery
    #[default]
    Unknown,
    Available,
    Unreachable,
}

impl Reachability {
    pub fn from_available(available: bool) -> Self {
        if available {
            Reachability::Available
        } else {
            Reachability::Unreachable
        }
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reachability::Unknown => write!(f, "unknown"),
            Reachability::Available => write!(f, "available"),
            Reachability::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// A discovered remote endpoint capable of exchanging messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    id: PeerId,
    reachability: Reachability,
    discovered_at: Timestamp,
}

impl Peer {
    /// A freshly discovered peer with unknown reachability
    pub fn new(id: impl Into<PeerId>) -> Self {
        Self {
            id: id.into(),
            reachability: Reachability::Unknown,
            discovered_at: Timestamp::now(),
        }
    }

    pub fn with_reachability(mut self, reachability: Reachability) -> Self {
        self.reachability = reachability;
        self
    }

    pub fn id(&self) -> &PeerId {
        &self.id
    }

    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    /// True unless the peer was explicitly reported unreachable
    pub fn is_reachable(&self) -> bool {
        self.reachability != Reachability::Unreachable
    }

    pub fn discovered_at(&self) -> Timestamp {
        self.discovered_at
    }

    pub(crate) fn set_reachability(&mut self, reachability: Reachability) {
        self.reachability = reachability;
    }
}

use crate::domain::{Peer, Reachability};
use serde::{Deserialize, Serialize};

/// Chooses which discovered peer to bind
///
/// Returns an index into `peers`, or `None` to decline every candidate.
pub trait PeerSelector: Send {
    fn select(&self, peers: &[Peer]) -> Option<usize>;
}

impl<F> PeerSelector for F
where
    F: Fn(&[Peer]) -> Option<usize> + Send,
{
    fn select(&self, peers: &[Peer]) -> Option<usize> {
        self(peers)
    }
}

/// Built-in selection policies, usable from configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First peer in discovery order
    #[default]
    First,
    /// Last peer in discovery order
    Last,
    /// First available peer, then first with unknown reachability.
    /// Never picks a peer reported unreachable.
    FirstReachable,
}

impl PeerSelector for SelectionPolicy {
    fn select(&self, peers: &[Peer]) -> Option<usize> {
        match self {
            SelectionPolicy::First => (!peers.is_empty()).then_some(0),
            SelectionPolicy::Last => peers.len().checked_sub(1),
            SelectionPolicy::FirstReachable => peers
                .iter()
                .position(|p| p.reachability() == Reachability::Available)
                .or_else(|| {
                    peers
                        .iter()
                        .position(|p| p.reachability() == Reachability::Unknown)
                }),
        }
    }
}

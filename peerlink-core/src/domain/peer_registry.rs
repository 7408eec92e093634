use crate::domain::{Peer, PeerId, Reachability};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum RegistryError {
    #[error("No discovered peer with id {0}")]
    NoPeer(PeerId),
}

/// Tracks the latest discovery result and the single bound peer
///
/// The bound peer is kept as its own copy so a later discovery result that
/// omits it does not silently drop the binding. Only `bind` and `unbind`
/// change which peer is bound.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    /// Latest discovery result, in transport order
    discovered: Vec<Peer>,
    bound: Option<Peer>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the discovery result. Repeated ids keep their first occurrence.
    pub fn record_discovered(&mut self, peers: Vec<Peer>) {
        let mut discovered: Vec<Peer> = Vec::with_capacity(peers.len());
        for peer in peers {
            if discovered.iter().any(|p| p.id() == peer.id()) {
                tracing::debug!(peer = %peer.id(), "Ignoring repeated peer in discovery result");
                continue;
            }
            discovered.push(peer);
        }
        self.discovered = discovered;
    }

    pub fn discovered(&self) -> &[Peer] {
        &self.discovered
    }

    pub fn has_discoverable_peer(&self) -> bool {
        !self.discovered.is_empty()
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<&Peer> {
        self.discovered.iter().find(|p| p.id() == peer_id)
    }

    /// Bind a discovered peer, replacing any previous binding
    pub fn bind(&mut self, peer_id: &PeerId) -> Result<&Peer, RegistryError> {
        let peer = self
            .get(peer_id)
            .cloned()
            .ok_or_else(|| RegistryError::NoPeer(peer_id.clone()))?;

        if let Some(previous) = self.bound.as_ref().filter(|p| p.id() != peer_id) {
            tracing::debug!(from = %previous.id(), to = %peer_id, "Replacing bound peer");
        }

        let bound = self.bound.insert(peer);
        Ok(&*bound)
    }

    /// Drop the binding, returning the previously bound peer
    pub fn unbind(&mut self) -> Option<Peer> {
        self.bound.take()
    }

    pub fn current_peer(&self) -> Option<&Peer> {
        self.bound.as_ref()
    }

    pub fn is_bound(&self, peer_id: &PeerId) -> bool {
        self.bound.as_ref().is_some_and(|p| p.id() == peer_id)
    }

    /// Update reachability for a peer. Never changes the binding.
    ///
    /// Returns the previous reachability, or `None` when the peer is neither
    /// discovered nor bound.
    pub fn mark_availability(&mut self, peer_id: &PeerId, available: bool) -> Option<Reachability> {
        let reachability = Reachability::from_available(available);
        let mut previous = None;

        if let Some(peer) = self.discovered.iter_mut().find(|p| p.id() == peer_id) {
            previous = Some(peer.reachability());
            peer.set_reachability(reachability);
        }

        if let Some(peer) = self.bound.as_mut().filter(|p| p.id() == peer_id) {
            previous = previous.or(Some(peer.reachability()));
            peer.set_reachability(reachability);
        }

        previous
    }
}

use crate::application::{
    Anomaly, AnomalySource, Observer, PeerSelector, SessionConfig, SessionEvent, TransportEvent,
};
use crate::domain::{
    DiscoveryFailure, MessageId, MessageTracker, Peer, PeerId, PeerRegistry, SendErrorCode,
    SessionId, SessionState, TrackerError,
};
use crate::error::{Result, SessionError};
use crate::infrastructure::Transport;
use std::fmt;

/// Peer session state machine
///
/// Owns the peer registry and message tracker, forwards requests to the
/// transport and reports every outcome to the observer. All transport
/// callbacks enter through [`handle_event`](Self::handle_event); the
/// controller itself is not thread-safe and expects one serialized caller.
///
/// ```text
///  Idle ──find_peers──▶ Discovering ──PeersFound──▶ PeerBound ◀─┐
///   ▲                        │                        │  send   │ ack / nak
///   └────NoPeersFound────────┘                        └─────────┘
/// ```
pub struct SessionController<T, O> {
    session_id: SessionId,
    transport: T,
    observer: O,
    registry: PeerRegistry,
    tracker: MessageTracker,
    selector: Box<dyn PeerSelector>,
    state: SessionState,
}

impl<T: Transport, O: Observer> SessionController<T, O> {
    pub fn new(transport: T, observer: O) -> Self {
        Self::with_config(transport, observer, &SessionConfig::default())
    }

    pub fn with_config(transport: T, observer: O, config: &SessionConfig) -> Self {
        let session_id = SessionId::new();
        tracing::debug!(session = %session_id, "🎯 Session controller created");

        Self {
            session_id,
            transport,
            observer,
            registry: PeerRegistry::new(),
            tracker: MessageTracker::new(config.history_limit),
            selector: Box::new(config.selection),
            state: SessionState::Idle,
        }
    }

    /// Replace the peer selection policy
    pub fn with_selector(mut self, selector: impl PeerSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    // ===== Requests =====

    /// Ask the transport for peers. The result arrives later as a transport event.
    pub fn find_peers(&mut self) {
        tracing::debug!(session = %self.session_id, "🔍 Requesting peer discovery");
        self.state = SessionState::Discovering;
        self.notify(SessionEvent::DiscoveryStarted);
        self.transport.discover_peers();
    }

    /// Send a payload to the bound peer, returning the transport-assigned id
    ///
    /// Fails without touching the transport when no peer is bound. Several
    /// sends may be outstanding at once.
    pub fn send(&mut self, payload: impl Into<Vec<u8>>) -> Result<MessageId> {
        let payload = payload.into();

        let Some(peer_id) = self.registry.current_peer().map(|p| p.id().clone()) else {
            tracing::debug!(session = %self.session_id, "Send refused: no bound peer");
            return Err(SessionError::NoBoundPeer);
        };

        let id = self.transport.send(&peer_id, &payload).map_err(|e| {
            tracing::warn!(session = %self.session_id, peer = %peer_id, "❌ Transport rejected send: {}", e);
            SessionError::SendRejected(e)
        })?;

        let tracked = self
            .tracker
            .track(id, peer_id.clone(), payload.clone())
            .map(|_| ());

        match tracked {
            Ok(()) => {
                tracing::debug!(
                    session = %self.session_id,
                    peer = %peer_id,
                    "📤 Message {} sent ({} in flight)",
                    id,
                    self.tracker.pending_count()
                );
                self.notify(SessionEvent::MessageSent { id, payload });
            }
            Err(error) => self.report_anomaly(AnomalySource::Send, peer_id, error),
        }

        Ok(id)
    }

    /// Bind a specific discovered peer, replacing the current binding
    pub fn bind(&mut self, peer_id: &PeerId) -> Result<Peer> {
        let peer = self.registry.bind(peer_id)?.clone();
        self.state = SessionState::PeerBound;

        tracing::info!(session = %self.session_id, "🔗 Bound to peer {}", peer.id());
        self.notify(SessionEvent::PeerBound { peer: peer.clone() });
        Ok(peer)
    }

    /// Drop the current binding. Outstanding sends keep being tracked.
    pub fn unbind(&mut self) -> Option<Peer> {
        let peer = self.registry.unbind()?;
        if self.state == SessionState::PeerBound {
            self.state = SessionState::Idle;
        }

        tracing::info!(session = %self.session_id, "🔌 Unbound from peer {}", peer.id());
        self.notify(SessionEvent::PeerUnbound { peer: peer.clone() });
        Some(peer)
    }

    // ===== Transport callbacks =====

    /// Single entry point for transport callbacks
    pub fn handle_event(&mut self, event: TransportEvent) {
        tracing::trace!(session = %self.session_id, kind = event.kind(), "Handling transport event");

        match event {
            TransportEvent::PeersFound(peers) => self.on_peers_found(peers),
            TransportEvent::NoPeersFound(reason) => self.on_discovery_failed(reason),
            TransportEvent::SendAcknowledged { peer, id } => self.on_acknowledged(peer, id),
            TransportEvent::SendFailed { peer, id, code } => self.on_failed(peer, id, code),
            TransportEvent::MessageReceived { from, payload } => {
                tracing::debug!(session = %self.session_id, "📥 Received {} bytes from {}", payload.len(), from);
                self.notify(SessionEvent::MessageReceived { from, payload });
            }
            TransportEvent::PeerAvailabilityChanged { peer, available } => {
                self.on_availability_changed(peer, available)
            }
        }
    }

    /// Drain and handle events buffered by a pull-style transport
    pub fn poll_transport(&mut self) -> usize {
        let events = self.transport.poll_events();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    fn on_peers_found(&mut self, peers: Vec<Peer>) {
        tracing::debug!(session = %self.session_id, "Discovery returned {} peer(s)", peers.len());
        self.registry.record_discovered(peers);

        let discovered = self.registry.discovered();
        let selected = self
            .selector
            .select(discovered)
            .and_then(|index| discovered.get(index))
            .map(|peer| peer.id().clone());

        let Some(peer_id) = selected else {
            if self.registry.has_discoverable_peer() {
                tracing::debug!(session = %self.session_id, "Selection policy declined every peer");
            }
            self.on_discovery_failed(DiscoveryFailure::ServiceNotFound);
            return;
        };

        if let Err(e) = self.bind(&peer_id) {
            tracing::error!(session = %self.session_id, "Selected peer could not be bound: {}", e);
            self.on_discovery_failed(DiscoveryFailure::ServiceNotFound);
        }
    }

    fn on_discovery_failed(&mut self, reason: DiscoveryFailure) {
        self.registry.record_discovered(Vec::new());
        self.state = if self.registry.current_peer().is_some() {
            SessionState::PeerBound
        } else {
            SessionState::Idle
        };

        tracing::warn!(session = %self.session_id, "❌ Discovery failed: {}", reason);
        self.notify(SessionEvent::DiscoveryFailed { reason });
    }

    fn on_acknowledged(&mut self, peer: PeerId, id: MessageId) {
        match self.tracker.resolve_acknowledged(id) {
            Ok(message) => {
                if message.peer() != &peer {
                    tracing::debug!(
                        "Ack for message {} came from {} (sent to {})",
                        id,
                        peer,
                        message.peer()
                    );
                }
                tracing::debug!(
                    session = %self.session_id,
                    "✅ Message {} acknowledged after {}ms",
                    id,
                    message.round_trip_millis().unwrap_or_default()
                );
                self.notify(SessionEvent::MessageAcknowledged { id });
            }
            Err(error) => self.report_anomaly(AnomalySource::Acknowledgment, peer, error),
        }
    }

    fn on_failed(&mut self, peer: PeerId, id: MessageId, code: SendErrorCode) {
        match self.tracker.resolve_failed(id, code) {
            Ok(_) => {
                tracing::warn!(session = %self.session_id, peer = %peer, "❌ Message {} failed: {}", id, code);
                self.notify(SessionEvent::MessageFailed { id, code });
            }
            Err(error) => self.report_anomaly(AnomalySource::Failure(code), peer, error),
        }
    }

    fn on_availability_changed(&mut self, peer: PeerId, available: bool) {
        if self.registry.mark_availability(&peer, available).is_none() {
            tracing::debug!(session = %self.session_id, "Availability report for undiscovered peer {}", peer);
        }

        if !available && self.registry.is_bound(&peer) {
            tracing::warn!(session = %self.session_id, "⚠️  Bound peer {} is unreachable, binding kept", peer);
        }

        self.notify(SessionEvent::PeerAvailabilityChanged { peer, available });
    }

    fn report_anomaly(&mut self, source: AnomalySource, peer: PeerId, error: TrackerError) {
        tracing::warn!(
            session = %self.session_id,
            peer = %peer,
            source = ?source,
            "⚠️  Ignoring transport callback: {}",
            error
        );
        self.notify(SessionEvent::Anomaly(Anomaly {
            source,
            peer,
            error,
        }));
    }

    fn notify(&mut self, event: SessionEvent) {
        self.observer.notify(&event);
    }
}

impl<T, O> SessionController<T, O> {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_peer(&self) -> Option<&Peer> {
        self.registry.current_peer()
    }

    /// Number of sends awaiting acknowledgment or error
    pub fn pending_count(&self) -> usize {
        self.tracker.pending_count()
    }

    /// Ids of outstanding sends, oldest first
    pub fn in_flight(&self) -> Vec<MessageId> {
        self.tracker.pending().iter().map(|m| m.id()).collect()
    }

    /// True while at least one send is outstanding
    pub fn is_sending(&self) -> bool {
        self.tracker.pending_count() > 0
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &MessageTracker {
        &self.tracker
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_parts(self) -> (T, O) {
        (self.transport, self.observer)
    }
}

impl<T: fmt::Debug, O: fmt::Debug> fmt::Debug for SessionController<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .field("tracker", &self.tracker)
            .field("transport", &self.transport)
            .field("observer", &self.observer)
            .finish_non_exhaustive()
    }
}

use crate::application::SessionEvent;

/// Sink for session notifications (UI, logging, test recorder)
///
/// Called from the controller's serialized context. Implementations must not
/// block; hand work to another context (see `ChannelObserver`) if they need to.
pub trait Observer {
    fn notify(&mut self, event: &SessionEvent);
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn notify(&mut self, event: &SessionEvent) {
        (**self).notify(event)
    }
}

/// Keeps every notification in order
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Vec<SessionEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&SessionEvent> {
        self.events.last()
    }

    /// Take the recorded events, leaving the recorder empty
    pub fn take(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count_matching(&self, predicate: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl Observer for RecordingObserver {
    fn notify(&mut self, event: &SessionEvent) {
        self.events.push(event.clone());
    }
}

/// Logs every notification through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::DiscoveryStarted => tracing::debug!("🔍 Discovery started"),
            SessionEvent::PeerBound { peer } => tracing::info!("🔗 Bound to peer {}", peer.id()),
            SessionEvent::PeerUnbound { peer } => {
                tracing::info!("🔌 Unbound from peer {}", peer.id())
            }
            SessionEvent::DiscoveryFailed { reason } => {
                tracing::warn!("❌ Discovery failed: {}", reason)
            }
            SessionEvent::MessageSent { id, payload } => {
                tracing::debug!("📤 Sent message {} ({} bytes)", id, payload.len())
            }
            SessionEvent::MessageAcknowledged { id } => {
                tracing::debug!("✅ Message {} acknowledged", id)
            }
            SessionEvent::MessageFailed { id, code } => {
                tracing::warn!("❌ Message {} failed: {}", id, code)
            }
            SessionEvent::MessageReceived { from, payload } => {
                tracing::debug!("📥 Received {} bytes from {}", payload.len(), from)
            }
            SessionEvent::PeerAvailabilityChanged { peer, available } => {
                tracing::info!("Peer {} available: {}", peer, available)
            }
            SessionEvent::Anomaly(anomaly) => {
                tracing::warn!(
                    peer = %anomaly.peer,
                    source = ?anomaly.source,
                    "⚠️  Transport anomaly: {}",
                    anomaly.error
                )
            }
        }
    }
}

/// Forwards notifications to another task over an unbounded channel
///
/// Sending never blocks. Events are dropped once the receiver is gone.
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: tokio::sync::mpsc::UnboundedSender<SessionEvent>,
}

#[cfg(feature = "native")]
impl ChannelObserver {
    pub fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[cfg(feature = "native")]
impl Observer for ChannelObserver {
    fn notify(&mut self, event: &SessionEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::trace!("Observer channel closed, dropping notification");
        }
    }
}

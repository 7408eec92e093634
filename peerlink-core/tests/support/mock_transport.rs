use peerlink_core::{
    DiscoveryFailure, MessageId, Peer, PeerId, SendErrorCode, Transport, TransportError,
    TransportEvent,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared state behind a `MockTransport`; the test keeps one handle and
/// the controller owns the transport
#[derive(Debug, Default)]
pub struct MockLink {
    /// Ids handed out by `send`, in order
    pub scripted_ids: VecDeque<Result<MessageId, TransportError>>,

    /// Every `send` the controller issued
    pub sends: Vec<(PeerId, Vec<u8>)>,

    pub discover_calls: usize,

    /// Callbacks returned on the next `poll_events`
    pub pending: VecDeque<TransportEvent>,
}

/// In-memory transport with scripted ids and callbacks
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    link: Arc<Mutex<MockLink>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&self) -> Arc<Mutex<MockLink>> {
        self.link.clone()
    }

    pub fn script_ids(&self, ids: &[u64]) {
        let mut link = self.link.lock().unwrap();
        link.scripted_ids
            .extend(ids.iter().map(|id| Ok(MessageId(*id))));
    }

    pub fn script_rejection(&self, error: TransportError) {
        self.link.lock().unwrap().scripted_ids.push_back(Err(error));
    }

    pub fn emit(&self, event: TransportEvent) {
        self.link.lock().unwrap().pending.push_back(event);
    }

    pub fn emit_peers(&self, names: &[&str]) {
        self.emit(TransportEvent::PeersFound(
            names.iter().map(|name| Peer::new(*name)).collect(),
        ));
    }

    pub fn emit_no_peers(&self, reason: DiscoveryFailure) {
        self.emit(TransportEvent::NoPeersFound(reason));
    }

    pub fn emit_ack(&self, peer: &str, id: u64) {
        self.emit(TransportEvent::SendAcknowledged {
            peer: PeerId::new(peer),
            id: MessageId(id),
        });
    }

    pub fn emit_nak(&self, peer: &str, id: u64, code: SendErrorCode) {
        self.emit(TransportEvent::SendFailed {
            peer: PeerId::new(peer),
            id: MessageId(id),
            code,
        });
    }

    pub fn emit_received(&self, from: &str, payload: &str) {
        self.emit(TransportEvent::MessageReceived {
            from: PeerId::new(from),
            payload: payload.as_bytes().to_vec(),
        });
    }

    pub fn send_count(&self) -> usize {
        self.link.lock().unwrap().sends.len()
    }

    pub fn discover_calls(&self) -> usize {
        self.link.lock().unwrap().discover_calls
    }
}

impl Transport for MockTransport {
    fn discover_peers(&mut self) {
        self.link.lock().unwrap().discover_calls += 1;
    }

    fn send(&mut self, peer: &PeerId, payload: &[u8]) -> Result<MessageId, TransportError> {
        let mut link = self.link.lock().unwrap();
        link.sends.push((peer.clone(), payload.to_vec()));
        link.scripted_ids
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Unavailable("no scripted id".to_string())))
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        self.link.lock().unwrap().pending.drain(..).collect()
    }
}

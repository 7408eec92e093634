use cucumber::World;
use peerlink_core::{
    MessageId, PeerId, RecordingObserver, SessionConfig, SessionError, SessionEvent, SessionLoop,
    Transport, TransportError, TransportEvent,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct ScriptState {
    ids: VecDeque<MessageId>,
    sends: Vec<(PeerId, Vec<u8>)>,
    callbacks: VecDeque<TransportEvent>,
}

/// Transport whose ids and callbacks are scripted by the steps
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    pub fn will_assign(&self, id: u64) {
        self.state.lock().unwrap().ids.push_back(MessageId(id));
    }

    pub fn emit(&self, event: TransportEvent) {
        self.state.lock().unwrap().callbacks.push_back(event);
    }

    pub fn sends(&self) -> Vec<(PeerId, Vec<u8>)> {
        self.state.lock().unwrap().sends.clone()
    }
}

impl Transport for ScriptedTransport {
    fn discover_peers(&mut self) {}

    fn send(&mut self, peer: &PeerId, payload: &[u8]) -> Result<MessageId, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.sends.push((peer.clone(), payload.to_vec()));
        state
            .ids
            .pop_front()
            .ok_or_else(|| TransportError::Unavailable("no id scripted".to_string()))
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        self.state.lock().unwrap().callbacks.drain(..).collect()
    }
}

#[derive(Debug, World)]
pub struct PeerWorld {
    /// Session under test
    pub session: SessionLoop<ScriptedTransport, RecordingObserver>,

    /// Handle to the transport the session owns
    pub transport: ScriptedTransport,

    /// Outcome of the last send
    pub last_send: Option<Result<MessageId, SessionError>>,

    /// Outcome of the last explicit bind
    pub last_bind: Option<Result<PeerId, SessionError>>,
}

impl Default for PeerWorld {
    fn default() -> Self {
        let transport = ScriptedTransport::default();
        let session = SessionLoop::new(
            transport.clone(),
            RecordingObserver::new(),
            &SessionConfig::default(),
        );
        Self {
            session,
            transport,
            last_send: None,
            last_bind: None,
        }
    }
}

impl PeerWorld {
    /// Deliver all scripted callbacks
    pub fn deliver(&mut self, event: TransportEvent) {
        self.transport.emit(event);
        self.session.run_until_idle();
    }

    pub fn events(&self) -> &[SessionEvent] {
        self.session.controller().observer().events()
    }

    pub fn count(&self, predicate: impl Fn(&SessionEvent) -> bool) -> usize {
        self.session
            .controller()
            .observer()
            .count_matching(predicate)
    }

    pub fn bound_peer(&self) -> Option<&str> {
        self.session
            .controller()
            .current_peer()
            .map(|peer| peer.id().as_str())
    }
}

/// Short name for an error, as written in feature files
pub fn error_kind(error: &SessionError) -> &'static str {
    match error {
        SessionError::NoBoundPeer => "no bound peer",
        SessionError::SendRejected(_) => "send rejected",
        SessionError::Registry(_) => "unknown peer",
        SessionError::Queue(_) => "queue full",
        SessionError::RuntimeClosed => "runtime closed",
    }
}

/// Split `"P1, P2"` into peer ids
pub fn peer_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

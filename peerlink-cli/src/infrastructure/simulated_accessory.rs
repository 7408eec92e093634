use peerlink_core::{
    DiscoveryFailure, MessageId, Peer, PeerId, Reachability, SendErrorCode, Transport,
    TransportError, TransportEvent,
};
use std::collections::VecDeque;

/// Behaviour of the simulated wearable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryConfig {
    pub peers: Vec<String>,
    /// Report this failure instead of any peers
    pub discovery_failure: Option<DiscoveryFailure>,
    /// Every Nth send fails; 0 disables failure injection
    pub fail_every: u32,
    pub fail_code: SendErrorCode,
    /// Answer each delivered message
    pub echo: bool,
    pub max_payload: usize,
}

impl Default for AccessoryConfig {
    fn default() -> Self {
        Self {
            peers: vec!["gear-s3".to_string()],
            discovery_failure: None,
            fail_every: 0,
            fail_code: SendErrorCode::PeerNoResponse,
            echo: true,
            max_payload: 4096,
        }
    }
}

/// In-process transport standing in for a paired wearable
///
/// Callbacks are buffered and handed out by `poll_events`, so the session
/// sees them on its next poll rather than during `send`.
#[derive(Debug)]
pub struct SimulatedAccessory {
    config: AccessoryConfig,
    next_id: u64,
    outbox: VecDeque<TransportEvent>,
}

impl SimulatedAccessory {
    pub fn new(config: AccessoryConfig) -> Self {
        Self {
            config,
            next_id: 0,
            outbox: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &AccessoryConfig {
        &self.config
    }

    /// Number of sends accepted so far
    pub fn accepted(&self) -> u64 {
        self.next_id
    }

    fn knows(&self, peer: &PeerId) -> bool {
        self.config.peers.iter().any(|p| p == peer.as_str())
    }

    fn should_fail(&self, id: MessageId) -> bool {
        self.config.fail_every > 0 && id.value() % u64::from(self.config.fail_every) == 0
    }
}

impl Default for SimulatedAccessory {
    fn default() -> Self {
        Self::new(AccessoryConfig::default())
    }
}

impl Transport for SimulatedAccessory {
    fn discover_peers(&mut self) {
        let event = match self.config.discovery_failure {
            Some(reason) => {
                tracing::debug!("Simulated discovery fails with {}", reason);
                TransportEvent::NoPeersFound(reason)
            }
            None => TransportEvent::PeersFound(
                self.config
                    .peers
                    .iter()
                    .map(|id| Peer::new(id.as_str()).with_reachability(Reachability::Available))
                    .collect(),
            ),
        };
        self.outbox.push_back(event);
    }

    fn send(&mut self, peer: &PeerId, payload: &[u8]) -> Result<MessageId, TransportError> {
        if payload.is_empty() {
            return Err(TransportError::InvalidPayload("empty payload".to_string()));
        }
        if payload.len() > self.config.max_payload {
            return Err(TransportError::InvalidPayload(format!(
                "{} bytes exceeds the {} byte limit",
                payload.len(),
                self.config.max_payload
            )));
        }
        if !self.knows(peer) {
            return Err(TransportError::Unavailable(format!(
                "no connection to {}",
                peer
            )));
        }

        self.next_id += 1;
        let id = MessageId(self.next_id);

        if self.should_fail(id) {
            tracing::debug!("Simulating {} for message {}", self.config.fail_code, id);
            self.outbox.push_back(TransportEvent::SendFailed {
                peer: peer.clone(),
                id,
                code: self.config.fail_code,
            });
            return Ok(id);
        }

        self.outbox.push_back(TransportEvent::SendAcknowledged {
            peer: peer.clone(),
            id,
        });

        if self.config.echo {
            let text = String::from_utf8_lossy(payload);
            self.outbox.push_back(TransportEvent::MessageReceived {
                from: peer.clone(),
                payload: format!("{} (echo #{})", text, id).into_bytes(),
            });
        }

        Ok(id)
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        self.outbox.drain(..).collect()
    }
}

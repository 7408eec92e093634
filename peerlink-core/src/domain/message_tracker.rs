use crate::domain::{MessageId, MessageStatus, PeerId, PendingMessage, SendErrorCode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Correlation failures. These point at a duplicate or stale transport
/// callback and never change tracker state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TrackerError {
    #[error("Unknown message id: {0}")]
    UnknownId(MessageId),

    #[error("Message {id} already resolved as {status}")]
    AlreadyResolved { id: MessageId, status: MessageStatus },

    #[error("Message id {0} is already pending")]
    DuplicateId(MessageId),
}

/// Correlates outgoing message ids with their delivery state
///
/// Resolved messages leave the pending set and are kept in a bounded FIFO
/// history. An id evicted from history is reported as unknown.
#[derive(Debug)]
pub struct MessageTracker {
    pending: HashMap<MessageId, PendingMessage>,
    history: VecDeque<PendingMessage>,
    history_limit: usize,
}

impl MessageTracker {
    pub fn new(history_limit: usize) -> Self {
        Self {
            pending: HashMap::new(),
            history: VecDeque::new(),
            history_limit,
        }
    }

    /// Register a freshly sent message
    pub fn track(
        &mut self,
        id: MessageId,
        peer: PeerId,
        payload: Vec<u8>,
    ) -> Result<&PendingMessage, TrackerError> {
        if self.pending.contains_key(&id) {
            return Err(TrackerError::DuplicateId(id));
        }

        let message = self
            .pending
            .entry(id)
            .or_insert_with(|| PendingMessage::new(id, peer, payload));
        Ok(&*message)
    }

    pub fn resolve_acknowledged(&mut self, id: MessageId) -> Result<PendingMessage, TrackerError> {
        self.resolve(id, MessageStatus::Acknowledged)
    }

    pub fn resolve_failed(
        &mut self,
        id: MessageId,
        code: SendErrorCode,
    ) -> Result<PendingMessage, TrackerError> {
        self.resolve(id, MessageStatus::Failed(code))
    }

    fn resolve(
        &mut self,
        id: MessageId,
        status: MessageStatus,
    ) -> Result<PendingMessage, TrackerError> {
        let Some(mut message) = self.pending.remove(&id) else {
            return Err(match self.find_resolved(id) {
                Some(resolved) => TrackerError::AlreadyResolved {
                    id,
                    status: resolved.status(),
                },
                None => TrackerError::UnknownId(id),
            });
        };

        message.resolve(status);
        self.remember(message.clone());
        Ok(message)
    }

    fn remember(&mut self, message: PendingMessage) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(message);
    }

    fn find_resolved(&self, id: MessageId) -> Option<&PendingMessage> {
        self.history.iter().rev().find(|m| m.id() == id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: MessageId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Current status of a pending or remembered message
    pub fn status(&self, id: MessageId) -> Option<MessageStatus> {
        self.pending
            .get(&id)
            .or_else(|| self.find_resolved(id))
            .map(PendingMessage::status)
    }

    pub fn get(&self, id: MessageId) -> Option<&PendingMessage> {
        self.pending.get(&id).or_else(|| self.find_resolved(id))
    }

    /// Outstanding messages, oldest first
    pub fn pending(&self) -> Vec<&PendingMessage> {
        let mut pending: Vec<_> = self.pending.values().collect();
        pending.sort_by_key(|m| (m.created_at(), m.id()));
        pending
    }

    /// Resolved messages, oldest first
    pub fn history(&self) -> impl Iterator<Item = &PendingMessage> {
        self.history.iter()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }
}

impl Default for MessageTracker {
    fn default() -> Self {
        Self::new(32)
    }
}

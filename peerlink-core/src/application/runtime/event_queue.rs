use crate::application::{SessionConfig, TransportEvent};
use std::collections::VecDeque;

/// Transport callbacks waiting for the controller, oldest first
///
/// The bound is enforced on push. Storage grows with use, so a large bound
/// costs nothing until events actually pile up.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<TransportEvent>,
    bound: usize,
}

impl EventQueue {
    pub fn new(bound: usize) -> Self {
        Self {
            events: VecDeque::new(),
            bound,
        }
    }

    pub fn is_full(&self) -> bool {
        self.events.len() >= self.bound
    }

    /// Rejects the event once `bound` callbacks are waiting
    pub fn push(&mut self, event: TransportEvent) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full { max: self.bound });
        }
        self.events.push_back(event);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TransportEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn bound(&self) -> usize {
        self.bound
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(SessionConfig::default().queue_capacity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Event queue is full (max size: {max})")]
    Full { max: usize },
}

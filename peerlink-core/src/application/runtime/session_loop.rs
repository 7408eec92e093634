use crate::application::runtime::{EventQueue, QueueError};
use crate::application::{Observer, SessionConfig, SessionController, TransportEvent};
use crate::infrastructure::Transport;

/// Session loop - feeds transport callbacks to the controller in batches
///
/// Callbacks pushed from elsewhere wait in a bounded queue; `poll` first
/// drains whatever the transport buffered itself, then up to `batch_size`
/// queued events. Everything runs on the caller's thread.
#[derive(Debug)]
pub struct SessionLoop<T, O> {
    /// Owns registry, tracker and state
    controller: SessionController<T, O>,

    /// Callbacks submitted from outside the transport
    inbound: EventQueue,

    /// Max queued events handled per poll
    batch_size: usize,
}

impl<T: Transport, O: Observer> SessionLoop<T, O> {
    pub fn new(transport: T, observer: O, config: &SessionConfig) -> Self {
        Self::with_controller(
            SessionController::with_config(transport, observer, config),
            config,
        )
    }

    pub fn with_controller(controller: SessionController<T, O>, config: &SessionConfig) -> Self {
        Self {
            controller,
            inbound: EventQueue::new(config.queue_capacity),
            batch_size: config.batch_size,
        }
    }

    /// Submit a transport callback (non-blocking)
    pub fn submit(&mut self, event: TransportEvent) -> Result<(), QueueError> {
        let kind = event.kind();
        self.inbound.push(event).inspect_err(|e| {
            tracing::warn!("⚠️  Dropping {} callback: {}", kind, e);
        })
    }

    /// Handle pending callbacks, returns how many were processed
    pub fn poll(&mut self) -> usize {
        let mut processed = self.controller.poll_transport();

        let mut batch = 0;
        while batch < self.batch_size {
            match self.inbound.pop() {
                Some(event) => {
                    self.controller.handle_event(event);
                    batch += 1;
                }
                None => break,
            }
        }
        processed += batch;

        if processed > 0 {
            tracing::trace!(
                "Processed {} callback(s), {} still queued",
                processed,
                self.inbound.len()
            );
        }
        processed
    }

    /// Poll until both the transport and the queue are quiet
    pub fn run_until_idle(&mut self) -> usize {
        let mut total = 0;
        loop {
            let processed = self.poll();
            if processed == 0 {
                return total;
            }
            total += processed;
        }
    }
}

impl<T, O> SessionLoop<T, O> {
    pub fn queued(&self) -> usize {
        self.inbound.len()
    }

    pub fn controller(&self) -> &SessionController<T, O> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SessionController<T, O> {
        &mut self.controller
    }

    pub fn into_controller(self) -> SessionController<T, O> {
        self.controller
    }
}

use peerlink_core::{Observer, SessionEvent};
use std::io::Write;

/// Counts of what a session reported, for the demo summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionTally {
    pub sent: usize,
    pub acknowledged: usize,
    pub failed: usize,
    pub received: usize,
    pub anomalies: usize,
    pub discovery_failures: usize,
}

impl SessionTally {
    fn record(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::MessageSent { .. } => self.sent += 1,
            SessionEvent::MessageAcknowledged { .. } => self.acknowledged += 1,
            SessionEvent::MessageFailed { .. } => self.failed += 1,
            SessionEvent::MessageReceived { .. } => self.received += 1,
            SessionEvent::Anomaly(_) => self.anomalies += 1,
            SessionEvent::DiscoveryFailed { .. } => self.discovery_failures += 1,
            _ => {}
        }
    }

    /// Sends still waiting for an ACK or NAK
    pub fn unresolved(&self) -> usize {
        self.sent.saturating_sub(self.acknowledged + self.failed)
    }
}

/// Prints session events as human-readable lines
pub struct ConsoleObserver<W = std::io::Stdout> {
    out: W,
    tally: SessionTally,
}

impl ConsoleObserver {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tally: SessionTally::default(),
        }
    }

    pub fn tally(&self) -> SessionTally {
        self.tally
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// One console line for an event
pub fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::DiscoveryStarted => "Searching for peers...".to_string(),
        SessionEvent::PeerBound { peer } => format!("Connected to {}", peer.id()),
        SessionEvent::PeerUnbound { peer } => format!("Disconnected from {}", peer.id()),
        SessionEvent::DiscoveryFailed { reason } => {
            format!("Discovery failed: {}", reason.as_str())
        }
        SessionEvent::MessageSent { id, payload } => {
            format!("Sent: {} (#{})", String::from_utf8_lossy(payload), id)
        }
        SessionEvent::MessageAcknowledged { id } => format!("ACK Received: #{}", id),
        SessionEvent::MessageFailed { id, code } => {
            format!("NAK Received: #{} {}", id, code.as_str())
        }
        SessionEvent::MessageReceived { from, payload } => {
            format!("Received: {} from {}", String::from_utf8_lossy(payload), from)
        }
        SessionEvent::PeerAvailabilityChanged { peer, available } => {
            let status = if *available { "available" } else { "unreachable" };
            format!("Peer {} is {}", peer, status)
        }
        SessionEvent::Anomaly(anomaly) => {
            format!("Ignored callback from {}: {}", anomaly.peer, anomaly.error)
        }
    }
}

impl<W: Write> Observer for ConsoleObserver<W> {
    fn notify(&mut self, event: &SessionEvent) {
        self.tally.record(event);
        if let Err(e) = writeln!(self.out, "{}", describe(event)) {
            tracing::trace!("Console write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerlink_core::{
        Anomaly, AnomalySource, MessageId, PeerId, SendErrorCode, TrackerError,
    };

    fn output(events: &[SessionEvent]) -> (String, SessionTally) {
        let mut observer = ConsoleObserver::new(Vec::new());
        for event in events {
            observer.notify(event);
        }
        let tally = observer.tally();
        (String::from_utf8(observer.into_inner()).unwrap(), tally)
    }

    #[test]
    fn test_message_lines() {
        let (text, _) = output(&[
            SessionEvent::MessageSent {
                id: MessageId(1),
                payload: b"hello".to_vec(),
            },
            SessionEvent::MessageAcknowledged { id: MessageId(1) },
            SessionEvent::MessageFailed {
                id: MessageId(2),
                code: SendErrorCode::PeerUnreachable,
            },
            SessionEvent::MessageReceived {
                from: PeerId::new("gear-s3"),
                payload: b"hello (echo #1)".to_vec(),
            },
        ]);

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Sent: hello (#1)",
                "ACK Received: #1",
                "NAK Received: #2 PEER_AGENT_UNREACHABLE",
                "Received: hello (echo #1) from gear-s3",
            ]
        );
    }

    #[test]
    fn test_tally() {
        let (_, tally) = output(&[
            SessionEvent::MessageSent {
                id: MessageId(1),
                payload: b"a".to_vec(),
            },
            SessionEvent::MessageSent {
                id: MessageId(2),
                payload: b"b".to_vec(),
            },
            SessionEvent::MessageAcknowledged { id: MessageId(1) },
            SessionEvent::Anomaly(Anomaly {
                source: AnomalySource::Acknowledgment,
                peer: PeerId::new("gear-s3"),
                error: TrackerError::UnknownId(MessageId(9)),
            }),
        ]);

        assert_eq!(tally.sent, 2);
        assert_eq!(tally.acknowledged, 1);
        assert_eq!(tally.anomalies, 1);
        assert_eq!(tally.unresolved(), 1);
    }
}

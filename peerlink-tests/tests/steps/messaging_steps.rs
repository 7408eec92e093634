use cucumber::{given, then, when};
use peerlink_core::{
    AnomalySource, MessageId, MessageStatus, PeerId, SendErrorCode, SessionEvent, TransportEvent,
};
use peerlink_tests::{PeerWorld, error_kind};

// ===== Given Steps =====

#[given(expr = "the transport will assign id {int}")]
async fn transport_assigns(world: &mut PeerWorld, id: u64) {
    world.transport.will_assign(id);
}

#[given(expr = "messages {string} and {string} are in flight")]
async fn two_in_flight(world: &mut PeerWorld, first: String, second: String) {
    for text in [first, second] {
        world
            .session
            .controller_mut()
            .send(text)
            .expect("Send should be accepted");
    }
}

// ===== When Steps =====

#[when(expr = "I send {string}")]
async fn send_message(world: &mut PeerWorld, text: String) {
    world.last_send = Some(world.session.controller_mut().send(text));
}

#[when(expr = "the transport acknowledges message {int} from {string}")]
async fn transport_acks(world: &mut PeerWorld, id: u64, peer: String) {
    world.deliver(TransportEvent::SendAcknowledged {
        peer: PeerId::new(peer),
        id: MessageId(id),
    });
}

#[when(expr = "the transport reports failure {string} for message {int} from {string}")]
async fn transport_naks(world: &mut PeerWorld, code: String, id: u64, peer: String) {
    let code: SendErrorCode = code.parse().expect("Unknown error code");
    world.deliver(TransportEvent::SendFailed {
        peer: PeerId::new(peer),
        id: MessageId(id),
        code,
    });
}

#[when(expr = "{string} sends {string}")]
async fn peer_sends(world: &mut PeerWorld, peer: String, text: String) {
    world.deliver(TransportEvent::MessageReceived {
        from: PeerId::new(peer),
        payload: text.into_bytes(),
    });
}

// ===== Then Steps =====

#[then(expr = "the send returns id {int}")]
async fn send_returns(world: &mut PeerWorld, id: u64) {
    match &world.last_send {
        Some(Ok(actual)) => assert_eq!(*actual, MessageId(id)),
        other => panic!("Expected successful send, got {:?}", other),
    }
}

#[then(expr = "the send fails with {string}")]
async fn send_fails(world: &mut PeerWorld, kind: String) {
    match &world.last_send {
        Some(Err(error)) => assert_eq!(error_kind(error), kind),
        other => panic!("Expected send failure, got {:?}", other),
    }
}

#[then(expr = "the transport received {int} send(s)")]
async fn transport_received(world: &mut PeerWorld, count: usize) {
    assert_eq!(world.transport.sends().len(), count);
}

#[then(expr = "the observer saw {int} acknowledgment(s) for message {int}")]
async fn saw_acks(world: &mut PeerWorld, count: usize, id: u64) {
    let seen = world.count(|e| *e == SessionEvent::MessageAcknowledged { id: MessageId(id) });
    assert_eq!(seen, count);
}

#[then(expr = "the observer saw message {int} fail with {string}")]
async fn saw_failure(world: &mut PeerWorld, id: u64, label: String) {
    let seen = world.count(|e| {
        matches!(e, SessionEvent::MessageFailed { id: failed, code }
            if *failed == MessageId(id) && code.as_str() == label)
    });
    assert_eq!(seen, 1, "events: {:?}", world.events());
}

#[then(expr = "the observer saw {int} acknowledgment anomaly/anomalies")]
async fn saw_ack_anomalies(world: &mut PeerWorld, count: usize) {
    let seen = world.count(|e| {
        matches!(e, SessionEvent::Anomaly(anomaly) if anomaly.source == AnomalySource::Acknowledgment)
    });
    assert_eq!(seen, count);
}

#[then(expr = "the observer saw {string} from {string}")]
async fn saw_received(world: &mut PeerWorld, text: String, peer: String) {
    let expected = SessionEvent::MessageReceived {
        from: PeerId::new(peer),
        payload: text.into_bytes(),
    };
    assert!(world.events().contains(&expected), "events: {:?}", world.events());
}

#[then(expr = "{int} message(s) is/are pending")]
async fn pending_count(world: &mut PeerWorld, count: usize) {
    assert_eq!(world.session.controller().pending_count(), count);
}

#[then(expr = "message {int} is still awaiting a reply")]
async fn still_pending(world: &mut PeerWorld, id: u64) {
    assert_eq!(
        world.session.controller().tracker().status(MessageId(id)),
        Some(MessageStatus::Sent)
    );
}

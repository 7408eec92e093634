use peerlink_cli::{AccessoryConfig, ConsoleObserver, SimulatedAccessory};
use peerlink_core::{
    DiscoveryFailure, SendErrorCode, SessionConfig, SessionError, SessionLoop, SessionState,
    TransportError,
};

type Session = SessionLoop<SimulatedAccessory, ConsoleObserver<Vec<u8>>>;

fn session(accessory: AccessoryConfig) -> Session {
    SessionLoop::new(
        SimulatedAccessory::new(accessory),
        ConsoleObserver::new(Vec::new()),
        &SessionConfig::default(),
    )
}

fn lines(session: Session) -> Vec<String> {
    let (_, observer) = session.into_controller().into_parts();
    String::from_utf8(observer.into_inner())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_chat_round_trip_with_echo() {
    let mut session = session(AccessoryConfig::default());

    session.controller_mut().find_peers();
    session.run_until_idle();
    assert_eq!(session.controller().state(), SessionState::PeerBound);

    session.controller_mut().send("hello").unwrap();
    session.run_until_idle();

    assert_eq!(
        lines(session),
        vec![
            "Searching for peers...",
            "Connected to gear-s3",
            "Sent: hello (#1)",
            "ACK Received: #1",
            "Received: hello (echo #1) from gear-s3",
        ]
    );
}

#[test]
fn test_injected_failures_show_as_nak() {
    let mut session = session(AccessoryConfig {
        fail_every: 2,
        fail_code: SendErrorCode::PeerUnreachable,
        echo: false,
        ..Default::default()
    });

    session.controller_mut().find_peers();
    session.run_until_idle();
    for text in ["one", "two", "three"] {
        session.controller_mut().send(text).unwrap();
    }
    session.run_until_idle();

    let tally = session.controller().observer().tally();
    assert_eq!(tally.acknowledged, 2);
    assert_eq!(tally.failed, 1);
    assert_eq!(session.controller().state(), SessionState::PeerBound);
    assert!(lines(session).contains(&"NAK Received: #2 PEER_AGENT_UNREACHABLE".to_string()));
}

#[test]
fn test_discovery_failure_is_reported() {
    let mut session = session(AccessoryConfig {
        discovery_failure: Some(DiscoveryFailure::DeviceNotConnected),
        ..Default::default()
    });

    session.controller_mut().find_peers();
    session.run_until_idle();

    assert_eq!(session.controller().state(), SessionState::Idle);
    assert_eq!(session.controller().observer().tally().discovery_failures, 1);
    assert_eq!(
        lines(session).last().map(String::as_str),
        Some("Discovery failed: FINDPEER_DEVICE_NOT_CONNECTED")
    );
}

#[test]
fn test_empty_message_is_rejected_synchronously() {
    let mut session = session(AccessoryConfig::default());
    session.controller_mut().find_peers();
    session.run_until_idle();

    let result = session.controller_mut().send("");

    assert!(matches!(
        result,
        Err(SessionError::SendRejected(TransportError::InvalidPayload(_)))
    ));
    assert_eq!(session.controller().pending_count(), 0);
}

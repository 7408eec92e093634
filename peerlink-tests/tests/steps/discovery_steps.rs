use cucumber::{given, then, when};
use peerlink_core::{DiscoveryFailure, Peer, PeerId, SessionEvent, TransportEvent};
use peerlink_tests::{PeerWorld, error_kind, peer_list};

// ===== Given Steps =====

#[given("an idle session")]
async fn idle_session(_world: &mut PeerWorld) {
    // Fresh world is already idle
}

#[given(expr = "a session bound to {string}")]
async fn session_bound_to(world: &mut PeerWorld, peer: String) {
    session_bound_among(world, peer.clone(), peer).await;
}

#[given(expr = "a session bound to {string} among {string}")]
async fn session_bound_among(world: &mut PeerWorld, peer: String, peers: String) {
    world.session.controller_mut().find_peers();
    world.deliver(TransportEvent::PeersFound(
        peer_list(&peers).into_iter().map(Peer::new).collect(),
    ));

    if world.bound_peer() != Some(peer.as_str()) {
        world
            .session
            .controller_mut()
            .bind(&PeerId::new(peer))
            .expect("Peer should be bindable");
    }
    world.session.controller_mut().observer_mut().take();
}

// ===== When Steps =====

#[when("I search for peers")]
async fn search_for_peers(world: &mut PeerWorld) {
    world.session.controller_mut().find_peers();
}

#[when(expr = "the transport finds peers {string}")]
async fn transport_finds_peers(world: &mut PeerWorld, peers: String) {
    world.deliver(TransportEvent::PeersFound(
        peer_list(&peers).into_iter().map(Peer::new).collect(),
    ));
}

#[when("the transport finds no peers")]
async fn transport_finds_nothing(world: &mut PeerWorld) {
    world.deliver(TransportEvent::PeersFound(Vec::new()));
}

#[when(expr = "discovery fails with {string}")]
async fn discovery_fails(world: &mut PeerWorld, reason: String) {
    let reason: DiscoveryFailure = reason.parse().expect("Unknown discovery failure");
    world.deliver(TransportEvent::NoPeersFound(reason));
}

#[when(expr = "I bind {string}")]
async fn bind_peer(world: &mut PeerWorld, peer: String) {
    let result = world
        .session
        .controller_mut()
        .bind(&PeerId::new(peer))
        .map(|peer| peer.id().clone());
    world.last_bind = Some(result);
}

#[when("I unbind")]
async fn unbind(world: &mut PeerWorld) {
    world.session.controller_mut().unbind();
}

#[when(expr = "peer {string} becomes unreachable")]
async fn peer_unreachable(world: &mut PeerWorld, peer: String) {
    world.deliver(TransportEvent::PeerAvailabilityChanged {
        peer: PeerId::new(peer),
        available: false,
    });
}

// ===== Then Steps =====

#[then(expr = "the session state is {string}")]
async fn session_state_is(world: &mut PeerWorld, state: String) {
    assert_eq!(world.session.controller().state().to_string(), state);
}

#[then(expr = "the bound peer is {string}")]
async fn bound_peer_is(world: &mut PeerWorld, peer: String) {
    assert_eq!(world.bound_peer(), Some(peer.as_str()));
}

#[then("no peer is bound")]
async fn no_peer_bound(world: &mut PeerWorld) {
    assert_eq!(world.bound_peer(), None);
}

#[then(expr = "the observer saw discovery failure {string}")]
async fn saw_discovery_failure(world: &mut PeerWorld, label: String) {
    let seen = world.count(|e| {
        matches!(e, SessionEvent::DiscoveryFailed { reason } if reason.as_str() == label)
    });
    assert_eq!(seen, 1, "events: {:?}", world.events());
}

#[then(expr = "binding fails with {string}")]
async fn binding_fails(world: &mut PeerWorld, kind: String) {
    match &world.last_bind {
        Some(Err(error)) => assert_eq!(error_kind(error), kind),
        other => panic!("Expected bind failure, got {:?}", other),
    }
}

pub mod mock_transport;

use mock_transport::MockTransport;
use peerlink_core::{
    RecordingObserver, SessionConfig, SessionController, SessionEvent, SessionLoop,
};

/// Test fixture: a session loop over a mock transport with a recording observer
pub struct SessionFixture {
    pub session: SessionLoop<MockTransport, RecordingObserver>,
    pub transport: MockTransport,
}

impl SessionFixture {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let transport = MockTransport::new();
        let session = SessionLoop::new(transport.clone(), RecordingObserver::new(), &config);
        Self { session, transport }
    }

    /// Discover the given peers and let the default policy bind the first one
    pub fn bound_to(peers: &[&str]) -> Self {
        let mut fixture = Self::new();
        fixture.controller().find_peers();
        fixture.transport.emit_peers(peers);
        fixture.tick();
        fixture.clear_events();
        fixture
    }

    pub fn controller(&mut self) -> &mut SessionController<MockTransport, RecordingObserver> {
        self.session.controller_mut()
    }

    /// Deliver everything the transport has buffered
    pub fn tick(&mut self) -> usize {
        self.session.run_until_idle()
    }

    pub fn events(&self) -> &[SessionEvent] {
        self.session.controller().observer().events()
    }

    pub fn count(&self, predicate: impl Fn(&SessionEvent) -> bool) -> usize {
        self.session.controller().observer().count_matching(predicate)
    }

    pub fn clear_events(&mut self) {
        self.controller().observer_mut().take();
    }
}

/// Install a subscriber once so `RUST_LOG` works in tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

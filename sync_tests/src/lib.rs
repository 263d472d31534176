// Test peer for end-to-end synchronization tests.
//
// `TestPeer` bundles a real `Session` with its inbound event queue and a
// loopback transport, so tests drive the same code paths the host shell
// would: share/join through `SessionEvent`s, clicks through
// `local_dot_click`, and delivery by pumping each peer's queue. The only
// test-specific code is the pump helpers — there is no mock session logic.
//
// See `tests/full_sync.rs` for the scenarios.

use std::sync::mpsc::Receiver;

use reflection_game::GameState;
use reflection_protocol::types::Orientation;
use reflection_session::loopback::{LoopbackHub, LoopbackTransport};
use reflection_session::{Session, SessionEvent};

/// One simulated activity instance on a loopback hub.
pub struct TestPeer {
    pub session: Session<LoopbackTransport>,
    events: Receiver<SessionEvent>,
}

impl TestPeer {
    /// Register a fresh peer on the hub with a cleared horizontal grid.
    pub fn new(hub: &LoopbackHub) -> Self {
        let (transport, events) = hub
            .register_peer()
            .expect("hub has room for another test peer");
        Self {
            session: Session::new(GameState::new(Orientation::Horizontal), Some(transport)),
            events,
        }
    }

    /// Become the sharer and process the resulting tube notification.
    pub fn share(&mut self) {
        self.session.handle_event(SessionEvent::Shared);
        self.pump();
    }

    /// Join the existing share (enumeration replay included).
    pub fn join(&mut self) {
        self.session.handle_event(SessionEvent::Joined);
        self.pump();
    }

    /// Drain this peer's inbound queue into its session.
    pub fn pump(&mut self) {
        self.session.drain(&self.events);
    }

    /// Snapshot of this peer's grid for convergence assertions.
    pub fn snapshot(&self) -> (Vec<i64>, Orientation) {
        self.session.game().save()
    }
}

/// Pump every peer once, in order.
pub fn pump_all(peers: &mut [TestPeer]) {
    for peer in peers.iter_mut() {
        peer.pump();
    }
}

/// Assert that every peer's grid matches the first peer's.
pub fn assert_converged(peers: &[TestPeer]) {
    let reference = peers[0].snapshot();
    for (i, peer) in peers.iter().enumerate() {
        assert_eq!(peer.snapshot(), reference, "peer {i} diverged");
    }
}

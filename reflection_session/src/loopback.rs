// In-process group channel connecting sessions in one process.
//
// `LoopbackHub` plays the role of the host's presence transport for tests
// and the demo binary: every registered peer gets a `LoopbackTransport`
// (the outbound half) and an `mpsc::Receiver<SessionEvent>` (the inbound
// half). Tube offers fan out as `NewTube` events to every peer — `Open`
// for the offerer, `LocalPending` for everyone else — and `send_text`
// delivers to every accepted peer except the sender, matching the group
// channel's own-echo suppression.
//
// The hub state sits behind one `Mutex`; transports only hold the lock for
// the duration of a single operation and `mpsc` sends never block, so
// there is no lock-ordering hazard. Delivery into a queue whose session
// has gone away is silently dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::event::SessionEvent;
use crate::session::MAX_PARTICIPANTS;
use crate::transport::{PeerId, Transport, TransportError, TubeId, TubeInfo, TubeState, TubeType};

/// Shared hub wiring up to `MAX_PARTICIPANTS` loopback peers.
#[derive(Clone)]
pub struct LoopbackHub {
    inner: Arc<Mutex<HubState>>,
}

struct HubState {
    capacity: usize,
    next_peer: u32,
    next_tube: TubeId,
    peers: BTreeMap<PeerId, Sender<SessionEvent>>,
    tubes: Vec<TubeRecord>,
}

struct TubeRecord {
    id: TubeId,
    initiator: PeerId,
    tube_type: TubeType,
    service: String,
    params: BTreeMap<String, String>,
    accepted: BTreeSet<PeerId>,
}

impl TubeRecord {
    /// The tube as seen by `peer`: pending until that peer has accepted.
    fn info_for(&self, peer: PeerId) -> TubeInfo {
        TubeInfo {
            id: self.id,
            initiator: self.initiator,
            tube_type: self.tube_type,
            service: self.service.clone(),
            params: self.params.clone(),
            state: if self.accepted.contains(&peer) {
                TubeState::Open
            } else {
                TubeState::LocalPending
            },
        }
    }
}

impl LoopbackHub {
    /// A hub with the standard participant limit.
    pub fn new() -> Self {
        Self::with_capacity(MAX_PARTICIPANTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState {
                capacity,
                next_peer: 0,
                next_tube: 0,
                peers: BTreeMap::new(),
                tubes: Vec::new(),
            })),
        }
    }

    /// Attach a new peer. Returns its outbound transport and the inbound
    /// event queue its session should drain.
    pub fn register_peer(
        &self,
    ) -> Result<(LoopbackTransport, Receiver<SessionEvent>), TransportError> {
        let mut hub = self.lock();
        if hub.peers.len() >= hub.capacity {
            return Err(TransportError::Full);
        }
        let peer = PeerId(hub.next_peer);
        hub.next_peer += 1;
        let (tx, rx) = mpsc::channel();
        hub.peers.insert(peer, tx);
        Ok((
            LoopbackTransport {
                inner: self.inner.clone(),
                peer,
            },
            rx,
        ))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        // A poisoned hub only happens when another test thread panicked;
        // continuing with the inner state keeps unrelated peers usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for LoopbackHub {
    fn default() -> Self {
        Self::new()
    }
}

/// The outbound half handed to one peer's session.
pub struct LoopbackTransport {
    inner: Arc<Mutex<HubState>>,
    peer: PeerId,
}

impl LoopbackTransport {
    pub fn peer(&self) -> PeerId {
        self.peer
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for LoopbackTransport {
    fn offer_tube(&mut self, service: &str) -> Result<TubeId, TransportError> {
        let mut hub = self.lock();
        let id = hub.next_tube;
        hub.next_tube += 1;
        let record = TubeRecord {
            id,
            initiator: self.peer,
            tube_type: TubeType::DBus,
            service: service.to_string(),
            params: BTreeMap::new(),
            accepted: BTreeSet::from([self.peer]),
        };
        // Notify every registered peer, the offerer included — the offerer's
        // own session connects through the same NewTube path as everyone else.
        for (&peer, tx) in &hub.peers {
            let _ = tx.send(SessionEvent::NewTube(record.info_for(peer)));
        }
        hub.tubes.push(record);
        Ok(id)
    }

    fn list_tubes(&mut self) -> Result<Vec<TubeInfo>, TransportError> {
        let hub = self.lock();
        Ok(hub
            .tubes
            .iter()
            .map(|record| record.info_for(self.peer))
            .collect())
    }

    fn accept_tube(&mut self, id: TubeId) -> Result<(), TransportError> {
        let peer = self.peer;
        let mut hub = self.lock();
        let record = hub
            .tubes
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(TransportError::UnknownTube(id))?;
        // Re-accepting is a no-op.
        record.accepted.insert(peer);
        Ok(())
    }

    fn send_text(&mut self, id: TubeId, text: &str) -> Result<(), TransportError> {
        let hub = self.lock();
        let record = hub
            .tubes
            .iter()
            .find(|record| record.id == id)
            .ok_or(TransportError::UnknownTube(id))?;
        for &peer in &record.accepted {
            if peer == self.peer {
                continue;
            }
            if let Some(tx) = hub.peers.get(&peer) {
                let _ = tx.send(SessionEvent::Message(text.to_string()));
            }
        }
        Ok(())
    }
}

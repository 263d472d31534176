// The session coordinator: solo/shared state machine and protocol dispatch.
//
// One `Session` exists per running activity instance. It owns the local
// `GameState`, the collaboration role, and the single retained sync tube,
// and it is driven entirely by `SessionEvent`s from one inbound queue plus
// local UI calls (`start_new_game`, `local_dot_click`). Everything runs on
// one thread; see `event.rs` for the ordering guarantee.
//
// State machine:
//
//   Solo ──Shared──▶ Initiating ──NewTube──▶ Connected ──Teardown──▶ Closed
//     └───Joined──▶ Joining ─────NewTube──────▶ ─┘
//
// Sharing and joining are mostly the same: both end up connected through
// the same `NewTube` acceptance path. A joiner additionally replays the
// transport's tube enumeration through that path, so tubes offered before
// it arrived are caught up idempotently.
//
// Failure policy (all local, never fatal to the session):
// - missing transport at share/join time: log, abort setup, stay solo;
// - tube enumeration failure: log, wait for a natural NewTube;
// - malformed / unknown / undecodable inbound message: log, drop;
// - send failure: log, fire-and-forget semantics anyway.

use std::sync::mpsc::Receiver;

use rand::Rng;
use tracing::{debug, warn};

use reflection_game::{GameError, GameState};
use reflection_protocol::SyncMessage;
use reflection_protocol::types::{ColorState, DotIndex, Orientation};
use reflection_protocol::wire::{self, WireError};

use crate::event::SessionEvent;
use crate::transport::{Transport, TubeId, TubeInfo, TubeState, TubeType};

/// Service name our tubes are offered under; tubes for any other service
/// are ignored.
pub const SERVICE: &str = "org.sugarlabs.ReflectionActivity";

/// Most peers a session will ever hold, the sharer included.
pub const MAX_PARTICIPANTS: usize = 4;

/// Collaboration role. `Uninitialized` means the session has never shared
/// nor joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Uninitialized,
    Initiator,
    Joiner,
}

/// Where the session is in its lifecycle. `Closed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Solo,
    Initiating,
    Joining,
    Connected,
    Closed,
}

/// Coordinator for one activity instance.
pub struct Session<T: Transport> {
    transport: Option<T>,
    role: Role,
    phase: Phase,
    waiting_for_peer: bool,
    chat_tube: Option<TubeId>,
    game: GameState,
}

impl<T: Transport> Session<T> {
    /// A solo session. `transport: None` models a host whose shared-activity
    /// object never materialized — share/join attempts then abort with a log
    /// line and the session stays solo.
    pub fn new(game: GameState, transport: Option<T>) -> Self {
        Self {
            transport,
            role: Role::Uninitialized,
            phase: Phase::Solo,
            waiting_for_peer: false,
            chat_tube: None,
            game,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn waiting_for_peer(&self) -> bool {
        self.waiting_for_peer
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Process one inbound event. Events after teardown are ignored —
    /// `Closed` is terminal.
    pub fn handle_event(&mut self, event: SessionEvent) {
        if self.phase == Phase::Closed {
            return;
        }
        match event {
            SessionEvent::Shared => self.on_share_established(),
            SessionEvent::Joined => self.on_join_established(),
            SessionEvent::NewTube(info) => self.on_new_tube(info),
            SessionEvent::Message(raw) => self.on_message_received(&raw),
            SessionEvent::Teardown => self.teardown(),
        }
    }

    /// Drain every queued event without blocking.
    pub fn drain(&mut self, events: &Receiver<SessionEvent>) {
        while let Ok(event) = events.try_recv() {
            self.handle_event(event);
        }
    }

    /// We created the share: offer a sync tube and wait for our own
    /// `NewTube` notification to connect.
    pub fn on_share_established(&mut self) {
        if self.transport.is_none() {
            warn!("failed to share: shared activity is unavailable");
            return;
        }
        self.role = Role::Initiator;
        self.waiting_for_peer = false;
        self.phase = Phase::Initiating;
        debug!("sharing: offering a sync tube");
        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.offer_tube(SERVICE) {
                warn!("failed to offer sync tube: {e}");
            }
        }
    }

    /// We joined an existing share: replay the tube enumeration through the
    /// normal acceptance path to catch up on tubes offered before we
    /// arrived.
    pub fn on_join_established(&mut self) {
        if self.transport.is_none() {
            warn!("failed to join: shared activity is unavailable");
            return;
        }
        self.role = Role::Joiner;
        self.waiting_for_peer = true;
        self.phase = Phase::Joining;
        debug!("joining: enumerating existing tubes");
        let tubes = match self.transport.as_mut().map(Transport::list_tubes) {
            Some(Ok(tubes)) => tubes,
            Some(Err(e)) => {
                // Not fatal: a future NewTube notification can still
                // connect us.
                warn!("tube enumeration failed: {e}");
                return;
            }
            None => return,
        };
        for info in tubes {
            self.on_new_tube(info);
        }
    }

    /// Acceptance path shared by live notifications and enumeration replay.
    /// Retains exactly one chat tube; repeats for that tube are no-ops.
    pub fn on_new_tube(&mut self, info: TubeInfo) {
        debug!(
            "new tube: id={} initiator={:?} type={:?} service={} state={:?}",
            info.id, info.initiator, info.tube_type, info.service, info.state
        );
        if info.tube_type != TubeType::DBus || info.service != SERVICE {
            return;
        }
        if self.chat_tube == Some(info.id) {
            debug!("tube {} already accepted", info.id);
            return;
        }
        if self.chat_tube.is_some() {
            debug!("already holding a sync tube; ignoring tube {}", info.id);
            return;
        }
        if info.state == TubeState::LocalPending {
            let Some(transport) = self.transport.as_mut() else {
                return;
            };
            if let Err(e) = transport.accept_tube(info.id) {
                warn!("failed to accept tube {}: {e}", info.id);
                return;
            }
        }
        self.chat_tube = Some(info.id);
        self.phase = Phase::Connected;
        self.waiting_for_peer = false;
        debug!("connected on tube {}", info.id);
    }

    /// Decode one inbound message and apply it to local state. Never fatal:
    /// a bad message from one peer is logged and dropped, and the session
    /// continues.
    pub fn on_message_received(&mut self, raw: &str) {
        match wire::decode(raw) {
            Ok(SyncMessage::NewGame { dots, orientation }) => {
                debug!("remote new game: {} dots, {orientation}", dots.len());
                self.game.restore(dots, orientation);
            }
            Ok(SyncMessage::DotClick { dot, color }) => {
                if let Err(e) = self.game.set_dot(dot, color) {
                    warn!("dropping remote dot click: {e}");
                }
            }
            Err(WireError::Empty) => {}
            Err(e) => {
                warn!("dropping inbound message: {e}");
            }
        }
    }

    /// Start a fresh local grid and re-sync every peer to it.
    pub fn start_new_game(&mut self, orientation: Orientation) {
        self.start_new_game_with_rng(orientation, &mut rand::rng());
    }

    /// Seedable variant of `start_new_game` for deterministic callers.
    pub fn start_new_game_with_rng(&mut self, orientation: Orientation, rng: &mut impl Rng) {
        self.game.new_game(orientation, rng);
        self.broadcast_new_game();
    }

    /// A local dot interaction: apply it, then tell the peers. Returns the
    /// dot's new color.
    pub fn local_dot_click(&mut self, dot: DotIndex) -> Result<ColorState, GameError> {
        let color = self.game.press(dot)?;
        self.broadcast_dot_click(dot, color);
        Ok(color)
    }

    /// Broadcast the full current grid so peers overwrite theirs. Called on
    /// every new grid — re-syncing beats diverging.
    pub fn broadcast_new_game(&mut self) {
        let (dots, orientation) = self.game.save();
        self.send_event(&wire::encode_new_game(&dots, orientation));
    }

    /// Broadcast a single dot mutation.
    pub fn broadcast_dot_click(&mut self, dot: DotIndex, color: ColorState) {
        self.send_event(&wire::encode_dot_click(dot, color));
    }

    /// Transmit one wire line to the group. A no-op when no tube exists —
    /// solo play calls this on every click and it must cost nothing.
    fn send_event(&mut self, entry: &str) {
        let Some(tube) = self.chat_tube else {
            return;
        };
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        if let Err(e) = transport.send_text(tube, entry) {
            warn!("broadcast failed: {e}");
        }
    }

    fn teardown(&mut self) {
        debug!("session closed");
        self.chat_tube = None;
        self.phase = Phase::Closed;
    }
}

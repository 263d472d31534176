// Transport seam between the session coordinator and the host shell.
//
// The host provides a group channel: tubes are offered by the sharer,
// discovered and accepted by joiners, and carry opaque UTF-8 text broadcast
// to every accepted peer. The coordinator never sees the underlying
// transport — it talks to this trait, and inbound traffic arrives as
// `SessionEvent`s on the session's single event queue (see `event.rs`).
//
// `TubeInfo` mirrors the host's channel-discovery tuple: enumeration returns
// one entry per open tube, and the coordinator accepts only entries matching
// `(TubeType::DBus, service == SERVICE)`.
//
// The in-process implementation used by tests and the demo binary lives in
// `loopback.rs`.

use std::collections::BTreeMap;

/// Identifier of one tube within the host's channel.
pub type TubeId = u64;

/// Identifier the transport assigns to a connected peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PeerId(pub u32);

/// Kind of tube. Only D-Bus tubes carry the sync protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TubeType {
    DBus,
    Stream,
}

/// Per-peer view of a tube's acceptance state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TubeState {
    /// Offered to us but not yet accepted locally.
    LocalPending,
    /// Accepted and usable.
    Open,
}

/// One entry of a tube enumeration, or the payload of a new-tube
/// notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TubeInfo {
    pub id: TubeId,
    pub initiator: PeerId,
    pub tube_type: TubeType,
    pub service: String,
    pub params: BTreeMap<String, String>,
    pub state: TubeState,
}

/// Transport failures. All of these are logged and absorbed by the
/// coordinator — none is fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("session is full")]
    Full,
    #[error("no tube with id {0}")]
    UnknownTube(TubeId),
    #[error("tube enumeration failed: {0}")]
    Enumeration(String),
    #[error("send failed: {0}")]
    Send(String),
}

/// Group-channel operations the host shell exposes.
///
/// `send_text` is fire-and-forget: no acknowledgment, no delivery guarantee,
/// no retry. Per-sender ordering is assumed from the underlying channel.
pub trait Transport {
    /// Offer a new tube under the given service name. Every peer (including
    /// the offerer) is notified through a `SessionEvent::NewTube`.
    fn offer_tube(&mut self, service: &str) -> Result<TubeId, TransportError>;

    /// Enumerate tubes that are already open, with state relative to the
    /// caller. Used by joiners to catch up on tubes offered before they
    /// arrived.
    fn list_tubes(&mut self) -> Result<Vec<TubeInfo>, TransportError>;

    /// Accept a locally pending tube. Accepting an already-accepted tube is
    /// a no-op.
    fn accept_tube(&mut self, id: TubeId) -> Result<(), TransportError>;

    /// Broadcast one opaque text message to every other accepted peer.
    fn send_text(&mut self, id: TubeId, text: &str) -> Result<(), TransportError>;
}

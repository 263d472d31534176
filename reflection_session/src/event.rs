// Inbound events for the session coordinator.
//
// The host shell's callback-style signals (shared, joined, new tube,
// message received, teardown) become explicit values delivered through one
// `mpsc` queue per session. The coordinator processes them one at a time on
// a single thread, so no two message receipts — nor a receipt and a local
// click — ever run concurrently. That serialization is the session's whole
// concurrency model; the `Session` itself needs no locking.

use crate::transport::TubeInfo;

/// One host signal, queued for the coordinator.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// We created the share: become the initiator.
    Shared,
    /// We attached to an existing share: become a joiner.
    Joined,
    /// The transport announced a tube (new, or replayed from enumeration).
    NewTube(TubeInfo),
    /// An opaque text message arrived from a peer.
    Message(String),
    /// The activity is shutting down.
    Teardown,
}

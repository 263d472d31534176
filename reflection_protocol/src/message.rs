// Protocol messages for peer-to-peer game synchronization.
//
// `SyncMessage` is the full protocol vocabulary: two message kinds, both
// broadcast from one peer to all others over the shared text tube.
//
// - `NewGame`: the sender's complete grid. Receipt is an unconditional
//   overwrite of local state (last-writer-wins for whole-grid resets), so
//   arrival order across senders never matters.
// - `DotClick`: a single dot color mutation. Commutative across distinct dot
//   indices, so no cross-sender ordering is required.
//
// Messages are ephemeral: constructed, encoded (`wire.rs`), transmitted,
// decoded, applied, discarded. They are never persisted — Journal
// persistence uses its own space-separated form (see the game crate).

use crate::types::{ColorState, DotIndex, Orientation};

/// A single protocol message, broadcast to every peer in the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncMessage {
    /// A complete fresh grid: overwrite local state with this one.
    NewGame {
        dots: Vec<ColorState>,
        orientation: Orientation,
    },
    /// One dot changed color.
    DotClick { dot: DotIndex, color: ColorState },
}

impl SyncMessage {
    /// The single-character wire tag for this message kind.
    pub fn tag(&self) -> char {
        match self {
            SyncMessage::NewGame { .. } => 'n',
            SyncMessage::DotClick { .. } => 'p',
        }
    }
}

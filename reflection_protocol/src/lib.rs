// reflection_protocol — wire protocol for Reflection peer synchronization.
//
// This crate defines the two message kinds exchanged between peers in a
// shared Reflection game, and the text wire format they travel in. It is
// shared between the session coordinator (`reflection_session`) and the game
// state crate (`reflection_game`), and depends on neither.
//
// Module overview:
// - `types.rs`:   `Orientation` plus the `DotIndex` / `ColorState` aliases.
// - `message.rs`: `SyncMessage` — the tagged union of protocol messages.
// - `wire.rs`:    `tag '|' json` encoding and decoding, with `WireError`.
//
// Design decisions:
// - **Line-oriented text, JSON payloads.** The transport carries opaque
//   UTF-8 strings; JSON keeps the delimiter out of payloads by construction.
// - **Positional array payloads.** `[dot_list, orientation]` and
//   `[dot_index, color]` — compact, and compatible with the historically
//   deployed peer encoding.
// - **No version field.** The protocol is fixed at v1; unknown tags are an
//   explicit error the coordinator drops, not an extension point.

pub mod message;
pub mod types;
pub mod wire;

pub use message::SyncMessage;
pub use types::{ColorState, DotIndex, Orientation, ParseOrientationError};
pub use wire::{WireError, decode, encode};

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode, decode, compare. Both message kinds must survive the wire.
    fn roundtrip(msg: &SyncMessage) {
        let wire = encode(msg);
        let recovered = decode(&wire).unwrap();
        assert_eq!(&recovered, msg);
    }

    #[test]
    fn roundtrip_new_game_all_orientations() {
        for orientation in [
            Orientation::Horizontal,
            Orientation::Vertical,
            Orientation::Bilateral,
        ] {
            roundtrip(&SyncMessage::NewGame {
                dots: vec![0, 3, 1, 2, 0, 1],
                orientation,
            });
        }
    }

    #[test]
    fn roundtrip_new_game_empty_dots() {
        roundtrip(&SyncMessage::NewGame {
            dots: vec![],
            orientation: Orientation::Horizontal,
        });
    }

    #[test]
    fn roundtrip_dot_click() {
        roundtrip(&SyncMessage::DotClick { dot: 0, color: 0 });
        roundtrip(&SyncMessage::DotClick { dot: 95, color: 3 });
    }

    #[test]
    fn tags_are_stable() {
        let new_game = SyncMessage::NewGame {
            dots: vec![],
            orientation: Orientation::Horizontal,
        };
        let click = SyncMessage::DotClick { dot: 0, color: 0 };
        assert_eq!(new_game.tag(), 'n');
        assert_eq!(click.tag(), 'p');
        assert!(encode(&new_game).starts_with("n|"));
        assert!(encode(&click).starts_with("p|"));
    }
}

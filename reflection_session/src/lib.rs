// reflection_session — peer session coordinator for shared Reflection games.
//
// This crate turns a solo Reflection game into a shared one: it owns the
// collaboration role (initiator vs joiner), the lifecycle of the single
// sync tube, and the dispatch of inbound protocol messages onto the local
// `GameState`. The control flow is:
//
//   local UI action → Session encodes (reflection_protocol) → broadcast →
//   each peer's Session decodes → mutates its GameState → UI re-renders
//
// Module overview:
// - `session.rs`:   `Session` — the solo/shared state machine and the
//                   protocol entry points (`broadcast_*`,
//                   `on_message_received`).
// - `event.rs`:     `SessionEvent` — host signals as queued values, one
//                   single-threaded inbound queue per session.
// - `transport.rs`: the group-channel seam (`Transport`, `TubeInfo`) the
//                   host shell implements.
// - `loopback.rs`:  in-process transport wiring several sessions together,
//                   used by the integration tests and the `sync-demo`
//                   binary.
//
// Rendering, toolbars, and the production presence transport live in the
// host shell, not here.

pub mod event;
pub mod loopback;
pub mod session;
pub mod transport;

pub use event::SessionEvent;
pub use session::{MAX_PARTICIPANTS, Phase, Role, SERVICE, Session};
pub use transport::{Transport, TransportError, TubeId, TubeInfo, TubeState, TubeType};

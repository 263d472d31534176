// reflection_game — headless game state for the Reflection puzzle.
//
// This crate owns the grid the players actually mutate: a fixed field of
// dots, one half randomized at game start, solved by recoloring the other
// half into a mirror image. It has no rendering, toolbar, or transport
// code — the session crate drives it through the small mutation surface
// (`press`, `set_dot`, `restore`) and the host shell persists it through
// the Journal hooks.
//
// Module overview:
// - `grid.rs`:    `GameState` — dot storage, clicks, save/restore snapshots,
//                 mirror geometry and the solved check.
// - `journal.rs`: string-metadata persistence hooks (shutdown write,
//                 startup read), `dotlist` + `orientation` keys.
//
// Shared vocabulary (`Orientation`, `ColorState`, `DotIndex`) comes from
// `reflection_protocol::types` so the wire format and the grid can never
// disagree about it.

pub mod grid;
pub mod journal;

pub use grid::{COLOR_COUNT, GRID_COLS, GRID_ROWS, GameError, GameState};
pub use journal::{JournalError, read_metadata, write_metadata};

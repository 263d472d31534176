// Grid state for the Reflection puzzle.
//
// The grid is a fixed 12 x 8 field of dots, stored row-major in a flat
// `Vec<ColorState>`. One half of the grid (which half depends on the
// orientation) is randomized at game start; the player recolors the other
// half until the grid is mirror-symmetric across the orientation's axis.
//
// Invariant: the dot list's length and index domain are fixed when a grid
// is created and never change while that game runs. Only per-dot color
// values mutate — locally via `press` (cycle to the next palette color) or
// remotely via `set_dot` (set the exact color a peer reported).
//
// `save` / `restore` are the serialization contract shared by the sync
// protocol (`NewGame` messages) and the Journal hooks (`journal.rs`):
// a `(dot_list, orientation)` pair. `restore` is an unconditional whole-grid
// overwrite — last writer wins, by design of the sync protocol.

use rand::Rng;

use reflection_protocol::types::{ColorState, DotIndex, Orientation};

/// Grid width in dots.
pub const GRID_COLS: usize = 12;
/// Grid height in dots.
pub const GRID_ROWS: usize = 8;
/// Number of palette colors; dot states range over `0..COLOR_COUNT`.
pub const COLOR_COUNT: ColorState = 4;

/// Errors from single-dot mutations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Dot index outside the current grid. Remote clicks with stale or
    /// corrupt indices land here; the session logs and drops them.
    #[error("dot {dot} out of range (grid has {len} dots)")]
    DotOutOfRange { dot: DotIndex, len: usize },
}

/// The complete mutable state of one puzzle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    orientation: Orientation,
    dots: Vec<ColorState>,
}

impl GameState {
    /// An all-cleared grid with the given orientation.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            dots: vec![0; GRID_COLS * GRID_ROWS],
        }
    }

    /// Start a fresh game: randomize the source half of the grid, clear the
    /// mirror half. The caller supplies the RNG so tests stay deterministic.
    pub fn new_game(&mut self, orientation: Orientation, rng: &mut impl Rng) {
        self.orientation = orientation;
        self.dots = vec![0; GRID_COLS * GRID_ROWS];
        for i in 0..self.dots.len() {
            if self.in_source_half(i) {
                self.dots[i] = rng.random_range(0..COLOR_COUNT);
            }
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn dots(&self) -> &[ColorState] {
        &self.dots
    }

    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    /// Local click: cycle the dot to the next palette color and return the
    /// new color, which the session broadcasts to peers.
    pub fn press(&mut self, dot: DotIndex) -> Result<ColorState, GameError> {
        let len = self.dots.len();
        let cell = self
            .dots
            .get_mut(dot)
            .ok_or(GameError::DotOutOfRange { dot, len })?;
        *cell = (*cell + 1) % COLOR_COUNT;
        Ok(*cell)
    }

    /// Remote click: set the dot to exactly the color the peer reported.
    /// Peers are trusted — no check against the sender's prior state, only
    /// a bounds check so a corrupt index cannot panic the session.
    pub fn set_dot(&mut self, dot: DotIndex, color: ColorState) -> Result<(), GameError> {
        let len = self.dots.len();
        let cell = self
            .dots
            .get_mut(dot)
            .ok_or(GameError::DotOutOfRange { dot, len })?;
        *cell = color;
        Ok(())
    }

    /// Snapshot the serialization contract: `(dot_list, orientation)`.
    pub fn save(&self) -> (Vec<ColorState>, Orientation) {
        (self.dots.clone(), self.orientation)
    }

    /// Overwrite the whole grid. Unconditional: a received `NewGame` or a
    /// Journal restore always wins over whatever was here.
    pub fn restore(&mut self, dots: Vec<ColorState>, orientation: Orientation) {
        self.dots = dots;
        self.orientation = orientation;
    }

    /// The dot that mirrors `dot` across the orientation's axis (both axes
    /// for bilateral).
    pub fn mirror_index(&self, dot: DotIndex) -> DotIndex {
        let row = dot / GRID_COLS;
        let col = dot % GRID_COLS;
        let (mrow, mcol) = match self.orientation {
            Orientation::Horizontal => (GRID_ROWS - 1 - row, col),
            Orientation::Vertical => (row, GRID_COLS - 1 - col),
            Orientation::Bilateral => (GRID_ROWS - 1 - row, GRID_COLS - 1 - col),
        };
        mrow * GRID_COLS + mcol
    }

    /// True when every dot matches its mirror. For bilateral grids this
    /// requires symmetry across both axes, not just the point reflection.
    pub fn is_solved(&self) -> bool {
        if self.dots.len() != GRID_COLS * GRID_ROWS {
            // A restored grid of foreign size has no defined mirror.
            return false;
        }
        (0..self.dots.len()).all(|i| {
            let sym = self.dots[i] == self.dots[self.mirror_index(i)];
            match self.orientation {
                Orientation::Bilateral => {
                    let row = i / GRID_COLS;
                    let col = i % GRID_COLS;
                    let hmirror = (GRID_ROWS - 1 - row) * GRID_COLS + col;
                    let vmirror = row * GRID_COLS + (GRID_COLS - 1 - col);
                    sym && self.dots[i] == self.dots[hmirror] && self.dots[i] == self.dots[vmirror]
                }
                _ => sym,
            }
        })
    }

    /// Whether `dot` lies in the half (quadrant, for bilateral) that gets
    /// randomized at game start.
    fn in_source_half(&self, dot: DotIndex) -> bool {
        let row = dot / GRID_COLS;
        let col = dot % GRID_COLS;
        match self.orientation {
            Orientation::Horizontal => row < GRID_ROWS / 2,
            Orientation::Vertical => col < GRID_COLS / 2,
            Orientation::Bilateral => row < GRID_ROWS / 2 && col < GRID_COLS / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn fresh_grid_is_cleared() {
        let game = GameState::new(Orientation::Horizontal);
        assert_eq!(game.dot_count(), GRID_COLS * GRID_ROWS);
        assert!(game.dots().iter().all(|&d| d == 0));
    }

    #[test]
    fn new_game_randomizes_source_half_only() {
        let mut game = GameState::new(Orientation::Horizontal);
        let mut rng = StdRng::seed_from_u64(7);
        game.new_game(Orientation::Vertical, &mut rng);

        // Right half (the mirror half for vertical) stays cleared.
        for row in 0..GRID_ROWS {
            for col in GRID_COLS / 2..GRID_COLS {
                assert_eq!(game.dots()[row * GRID_COLS + col], 0);
            }
        }
        // Left half carries at least one non-zero dot for any real seed.
        assert!(game.dots().iter().any(|&d| d != 0));
    }

    #[test]
    fn press_cycles_through_palette() {
        let mut game = GameState::new(Orientation::Horizontal);
        for expected in [1, 2, 3, 0] {
            assert_eq!(game.press(5).unwrap(), expected);
        }
    }

    #[test]
    fn press_out_of_range_is_error() {
        let mut game = GameState::new(Orientation::Horizontal);
        let err = game.press(GRID_COLS * GRID_ROWS).unwrap_err();
        assert!(matches!(err, GameError::DotOutOfRange { .. }));
    }

    #[test]
    fn set_dot_applies_exact_color() {
        let mut game = GameState::new(Orientation::Horizontal);
        game.set_dot(12, 3).unwrap();
        assert_eq!(game.dots()[12], 3);
        // Setting again with a different color just overwrites.
        game.set_dot(12, 1).unwrap();
        assert_eq!(game.dots()[12], 1);
    }

    #[test]
    fn save_restore_roundtrip() {
        let mut game = GameState::new(Orientation::Horizontal);
        let mut rng = StdRng::seed_from_u64(99);
        game.new_game(Orientation::Bilateral, &mut rng);
        let (dots, orientation) = game.save();

        let mut other = GameState::new(Orientation::Vertical);
        other.restore(dots.clone(), orientation);
        assert_eq!(other.save(), (dots, orientation));
    }

    #[test]
    fn restore_overwrites_unconditionally() {
        let mut game = GameState::new(Orientation::Horizontal);
        game.press(0).unwrap();
        game.restore(vec![0, 1, 2, 3], Orientation::Vertical);
        assert_eq!(game.dots(), &[0, 1, 2, 3]);
        assert_eq!(game.orientation(), Orientation::Vertical);
    }

    #[test]
    fn mirror_index_is_an_involution() {
        for orientation in [
            Orientation::Horizontal,
            Orientation::Vertical,
            Orientation::Bilateral,
        ] {
            let game = GameState::new(orientation);
            for i in 0..game.dot_count() {
                assert_eq!(game.mirror_index(game.mirror_index(i)), i);
            }
        }
    }

    #[test]
    fn cleared_grid_is_solved() {
        for orientation in [
            Orientation::Horizontal,
            Orientation::Vertical,
            Orientation::Bilateral,
        ] {
            assert!(GameState::new(orientation).is_solved());
        }
    }

    #[test]
    fn solving_by_mirroring_the_source_half() {
        let mut game = GameState::new(Orientation::Horizontal);
        let mut rng = StdRng::seed_from_u64(3);
        game.new_game(Orientation::Vertical, &mut rng);
        assert!(!game.is_solved());

        let source = game.save().0;
        for (i, &color) in source.iter().enumerate() {
            let mirror = game.mirror_index(i);
            if mirror > i {
                game.set_dot(mirror, color).unwrap();
            }
        }
        assert!(game.is_solved());
    }

    #[test]
    fn foreign_size_grid_is_never_solved() {
        let mut game = GameState::new(Orientation::Horizontal);
        game.restore(vec![0, 0], Orientation::Horizontal);
        assert!(!game.is_solved());
    }
}

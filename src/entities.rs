/// All game entity types — pure data, minimal logic.
///
/// The formation is the one container with real invariants, so its storage
/// is private and every mutation goes through a method.

use std::collections::{BTreeMap, BTreeSet};

use crate::consts::{
    ENEMY_COLUMN_COUNT, ENEMY_ROW_COUNT, ENEMY_SPACING, FIELD_HEIGHT, FIELD_WIDTH,
    STARTING_LIVES,
};

// ── Positions & playfield ─────────────────────────────────────────────────────

/// A single cell on the playfield. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one row up (toward the enemies).
    pub const fn up(self) -> Self {
        Self { x: self.x, y: self.y - 1 }
    }

    /// The cell one row down (toward the player).
    pub const fn down(self) -> Self {
        Self { x: self.x, y: self.y + 1 }
    }
}

/// Fixed grid the whole simulation happens inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playfield {
    pub width: i32,
    pub height: i32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Horizontal steps a row takes before the formation drops one row.
    pub fn sweep_limit(&self) -> i32 {
        self.width - ENEMY_COLUMN_COUNT - ENEMY_SPACING * (ENEMY_COLUMN_COUNT - 1)
    }

    /// Once the lowest enemy row sits here, the next descent ends the game.
    pub fn danger_row(&self) -> i32 {
        self.height - 2
    }

    pub fn player_start(&self) -> Position {
        Position::new(self.width / 2, self.height - 1)
    }
}

// ── Enemy formation ───────────────────────────────────────────────────────────

/// Live enemies as a sparse grid: row `y` → occupied `x` values.
///
/// Rows with no survivors are never stored, and a position can only live in
/// the row keyed by its own `y`, so no cell is ever occupied twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Formation {
    rows: BTreeMap<i32, BTreeSet<i32>>,
    /// Cumulative number of rows the formation has dropped.
    descent: i32,
}

impl Formation {
    /// The opening formation: even rows packed against the left wall, odd
    /// rows against the right wall, so each row's first sweep closes the gap.
    pub fn initial(field: &Playfield) -> Self {
        let mut rows = BTreeMap::new();
        for y in 0..ENEMY_ROW_COUNT {
            let step = ENEMY_SPACING + 1;
            let xs: BTreeSet<i32> = (0..ENEMY_COLUMN_COUNT)
                .map(|column| {
                    if y % 2 == 0 {
                        column * step
                    } else {
                        field.width - column * step - 1
                    }
                })
                .collect();
            rows.insert(y, xs);
        }
        Self { rows, descent: 0 }
    }

    /// Build a formation from arbitrary positions (duplicates collapse).
    pub fn from_positions<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        let mut rows: BTreeMap<i32, BTreeSet<i32>> = BTreeMap::new();
        for pos in positions {
            rows.entry(pos.y).or_default().insert(pos.x);
        }
        Self { rows, descent: 0 }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.rows.get(&pos.y).is_some_and(|xs| xs.contains(&pos.x))
    }

    /// Remove exactly one enemy. Returns whether it was present.
    pub fn remove(&mut self, pos: Position) -> bool {
        let Some(xs) = self.rows.get_mut(&pos.y) else {
            return false;
        };
        let removed = xs.remove(&pos.x);
        if xs.is_empty() {
            self.rows.remove(&pos.y);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows that still hold at least one enemy.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn descent(&self) -> i32 {
        self.descent
    }

    /// `y` of the lowest occupied row.
    pub fn lowest_row(&self) -> Option<i32> {
        self.rows.keys().next_back().copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (i32, &BTreeSet<i32>)> + '_ {
        self.rows.iter().map(|(&y, xs)| (y, xs))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows
            .iter()
            .flat_map(|(&y, xs)| xs.iter().map(move |&x| Position::new(x, y)))
    }

    /// One horizontal step: even rows right, odd rows left.
    pub fn swept(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|(&y, xs)| {
                let dx = if y % 2 == 0 { 1 } else { -1 };
                (y, xs.iter().map(|&x| x + dx).collect())
            })
            .collect();
        Self {
            rows,
            descent: self.descent,
        }
    }

    /// Every row drops by one.
    pub fn descended(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|(&y, xs)| (y + 1, xs.clone()))
            .collect();
        Self {
            rows,
            descent: self.descent + 1,
        }
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    /// Timed sub-state after a hit; the player glyph flashes.
    LifeLost,
    Won,
    Lost,
}

impl GameStatus {
    /// Status line shown under the playfield.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            GameStatus::Playing => None,
            GameStatus::Paused => Some("Paused"),
            GameStatus::LifeLost => Some("Lost a life"),
            GameStatus::Won => Some("You win"),
            GameStatus::Lost => Some("Game over"),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub field: Playfield,
    pub player: Position,
    pub enemies: Formation,
    /// Travel upward.
    pub player_bullets: Vec<Position>,
    /// Travel downward.
    pub enemy_bullets: Vec<Position>,
    pub score: u32,
    pub lives: u32,
    pub status: GameStatus,
    /// Horizontal steps taken since the last descent.
    pub sweep_ticks: i32,
    /// LifeLost ticks elapsed in the current flash sequence.
    pub life_lost_ticks: u32,
}

impl GameState {
    /// A fresh game on `field`.
    pub fn new(field: Playfield) -> Self {
        Self {
            field,
            player: field.player_start(),
            enemies: Formation::initial(&field),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            score: 0,
            lives: STARTING_LIVES,
            status: GameStatus::Playing,
            sweep_ticks: 0,
            life_lost_ticks: 0,
        }
    }

    /// Whether the renderer should draw the player this frame.
    pub fn player_visible(&self) -> bool {
        self.status != GameStatus::LifeLost || self.life_lost_ticks % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playfield_bounds() {
        let field = Playfield::new(10, 5);
        assert!(field.contains(Position::new(0, 0)));
        assert!(field.contains(Position::new(9, 4)));
        assert!(!field.contains(Position::new(10, 4)));
        assert!(!field.contains(Position::new(9, 5)));
        assert!(!field.contains(Position::new(-1, 2)));
        assert!(!field.contains(Position::new(3, -1)));
    }

    #[test]
    fn default_sweep_limit() {
        // 50 - 10 - 1 * 9
        assert_eq!(Playfield::default().sweep_limit(), 31);
    }

    #[test]
    fn initial_formation_shape() {
        let field = Playfield::default();
        let f = Formation::initial(&field);
        assert_eq!(f.len(), 50);
        assert_eq!(f.row_count(), 5);
        assert_eq!(f.lowest_row(), Some(4));
        assert!(f.contains(Position::new(0, 0)));
        assert!(f.contains(Position::new(18, 2)));
        assert!(f.contains(Position::new(49, 1)));
        assert!(f.contains(Position::new(31, 3)));
        assert!(!f.contains(Position::new(1, 0)));
    }

    #[test]
    fn remove_drops_only_that_cell_and_empty_rows() {
        let mut f = Formation::from_positions([
            Position::new(1, 3),
            Position::new(3, 3),
            Position::new(5, 4),
        ]);
        assert!(f.remove(Position::new(5, 4)));
        assert_eq!(f.row_count(), 1);
        assert_eq!(f.lowest_row(), Some(3));
        assert!(f.contains(Position::new(1, 3)));
        assert!(f.contains(Position::new(3, 3)));
        assert!(!f.remove(Position::new(5, 4)));
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn sweep_alternates_by_row_parity() {
        let f = Formation::from_positions([Position::new(4, 2), Position::new(4, 3)]);
        let s = f.swept();
        assert!(s.contains(Position::new(5, 2)));
        assert!(s.contains(Position::new(3, 3)));
        assert_eq!(s.descent(), 0);
    }

    #[test]
    fn descend_shifts_every_row() {
        let f = Formation::from_positions([Position::new(4, 2), Position::new(7, 3)]);
        let d = f.descended();
        assert!(d.contains(Position::new(4, 3)));
        assert!(d.contains(Position::new(7, 4)));
        assert_eq!(d.descent(), 1);
        assert_eq!(d.lowest_row(), Some(4));
    }

    #[test]
    fn player_flashes_during_life_lost() {
        let mut s = GameState::new(Playfield::default());
        assert!(s.player_visible());
        s.status = GameStatus::LifeLost;
        s.life_lost_ticks = 0;
        assert!(!s.player_visible());
        s.life_lost_ticks = 1;
        assert!(s.player_visible());
    }
}

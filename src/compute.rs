/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`. Side effects are limited to the injected RNG and logging.

use std::collections::{BTreeSet, HashSet};

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::consts::{
    BULLET_HIT_SCORE, ENEMY_FIRE_DENOMINATOR, ENEMY_FIRE_NUMERATOR, ENEMY_HIT_SCORE,
    LIFE_LOST_TICKS, PLAYER_MOVE_INCREMENT,
};
use crate::engine::Event;
use crate::entities::{GameState, GameStatus, Playfield, Position};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state for a playfield.
pub fn init_state(field: Playfield) -> GameState {
    GameState::new(field)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

fn move_player_by(state: &GameState, dx: i32) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let target = Position::new(state.player.x + dx, state.player.y);
    if !state.field.contains(target) {
        return state.clone();
    }
    GameState {
        player: target,
        ..state.clone()
    }
}

pub fn move_player_left(state: &GameState) -> GameState {
    move_player_by(state, -PLAYER_MOVE_INCREMENT)
}

pub fn move_player_right(state: &GameState) -> GameState {
    move_player_by(state, PLAYER_MOVE_INCREMENT)
}

/// Fire a bullet from the cell just above the player. No cooldown or cap.
pub fn player_shoot(state: &GameState) -> GameState {
    let spawn = state.player.up();
    if state.status != GameStatus::Playing || !state.field.contains(spawn) {
        return state.clone();
    }
    let mut player_bullets = state.player_bullets.clone();
    player_bullets.push(spawn);
    GameState {
        player_bullets,
        ..state.clone()
    }
}

pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
        other => other,
    };
    GameState {
        status,
        ..state.clone()
    }
}

/// Start over, only from a finished game.
pub fn restart(state: &GameState) -> GameState {
    if state.status.is_terminal() {
        init_state(state.field)
    } else {
        state.clone()
    }
}

// ── Formation movement ───────────────────────────────────────────────────────

/// Sweep the formation one cell sideways, or drop it a row once the sweep
/// limit is reached. Dropping into the danger row loses the game instead.
pub fn move_formation(state: &GameState) -> GameState {
    if state.sweep_ticks < state.field.sweep_limit() {
        return GameState {
            enemies: state.enemies.swept(),
            sweep_ticks: state.sweep_ticks + 1,
            ..state.clone()
        };
    }

    let reached_player = state
        .enemies
        .lowest_row()
        .is_some_and(|y| y >= state.field.danger_row());
    if reached_player {
        return GameState {
            status: GameStatus::Lost,
            sweep_ticks: 0,
            ..state.clone()
        };
    }

    let enemies = state.enemies.descended();
    debug!("formation descended to offset {}", enemies.descent());
    GameState {
        enemies,
        sweep_ticks: 0,
        ..state.clone()
    }
}

// ── Bullet motion ────────────────────────────────────────────────────────────

/// Player bullets rise, enemy bullets fall; anything leaving the field is
/// dropped. Survivors keep their order.
pub fn move_bullets(state: &GameState) -> GameState {
    let field = state.field;
    let player_bullets = state
        .player_bullets
        .iter()
        .map(|b| b.up())
        .filter(|&b| field.contains(b))
        .collect();
    let enemy_bullets = state
        .enemy_bullets
        .iter()
        .map(|b| b.down())
        .filter(|&b| field.contains(b))
        .collect();
    GameState {
        player_bullets,
        enemy_bullets,
        ..state.clone()
    }
}

// ── Enemy fire ───────────────────────────────────────────────────────────────

/// Pick an enemy able to hit the player, or `None` if no enemy is in a lane
/// the player can occupy.
///
/// The player moves in steps of `PLAYER_MOVE_INCREMENT`, so only columns
/// congruent to the player's column are worth firing from. A row is chosen
/// uniformly first, then a column within it.
pub fn choose_enemy_shooter(state: &GameState, rng: &mut impl Rng) -> Option<Position> {
    let lane = state.player.x.rem_euclid(PLAYER_MOVE_INCREMENT);
    let candidates: Vec<(i32, Vec<i32>)> = state
        .enemies
        .rows()
        .filter_map(|(y, xs)| {
            let xs: Vec<i32> = xs
                .iter()
                .copied()
                .filter(|x| x.rem_euclid(PLAYER_MOVE_INCREMENT) == lane)
                .collect();
            (!xs.is_empty()).then_some((y, xs))
        })
        .collect();

    let (y, xs) = candidates.choose(rng)?;
    let x = xs.choose(rng)?;
    Some(Position::new(*x, *y))
}

/// With a fixed chance per enemy tick, one eligible enemy fires.
pub fn spawn_enemy_bullet(state: &GameState, rng: &mut impl Rng) -> GameState {
    if !rng.gen_ratio(ENEMY_FIRE_NUMERATOR, ENEMY_FIRE_DENOMINATOR) {
        return state.clone();
    }
    let Some(shooter) = choose_enemy_shooter(state, rng) else {
        return state.clone();
    };
    debug!("enemy at ({}, {}) fires", shooter.x, shooter.y);
    let mut enemy_bullets = state.enemy_bullets.clone();
    enemy_bullets.push(shooter);
    GameState {
        enemy_bullets,
        ..state.clone()
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Player bullets ↔ enemies. Each hit removes that one enemy and the bullet.
/// A cleared formation wins the game.
pub fn resolve_player_bullets_vs_enemies(state: &GameState) -> GameState {
    let mut enemies = state.enemies.clone();
    let mut score = state.score;

    let player_bullets = state
        .player_bullets
        .iter()
        .copied()
        .filter(|&bullet| {
            if enemies.remove(bullet) {
                trace!("enemy destroyed at ({}, {})", bullet.x, bullet.y);
                score += ENEMY_HIT_SCORE;
                false
            } else {
                true
            }
        })
        .collect();

    let status = if enemies.is_empty() && state.status == GameStatus::Playing {
        GameStatus::Won
    } else {
        state.status
    };

    GameState {
        enemies,
        player_bullets,
        score,
        status,
        ..state.clone()
    }
}

/// Enemy bullets ↔ player. Every bullet on the player's cell costs a life,
/// so simultaneous hits each count.
pub fn resolve_enemy_bullets_vs_player(state: &GameState) -> GameState {
    let mut lives = state.lives;
    let mut hit = false;

    let enemy_bullets = state
        .enemy_bullets
        .iter()
        .copied()
        .filter(|&bullet| {
            if bullet == state.player {
                lives = lives.saturating_sub(1);
                hit = true;
                false
            } else {
                true
            }
        })
        .collect();

    if !hit {
        return state.clone();
    }
    GameState {
        enemy_bullets,
        lives,
        status: GameStatus::LifeLost,
        life_lost_ticks: 0,
        ..state.clone()
    }
}

/// Player bullets ↔ enemy bullets.
///
/// Bullets closing on each other one cell per tick from an even gap swap
/// cells without ever sharing one, so an enemy bullet directly below a
/// player bullet counts as a hit too. Shared cells are paired first; the
/// adjacent rule only sees what is left.
pub fn resolve_bullets_vs_bullets(state: &GameState) -> GameState {
    let state = cancel_shared_cells(state);
    cancel_bullet_pairs(&state, Position::down)
}

/// Cancel player and enemy bullets sitting on the same cell.
pub fn cancel_shared_cells(state: &GameState) -> GameState {
    cancel_bullet_pairs(state, |cell| cell)
}

/// Pair each player bullet with at most one enemy bullet at `partner(cell)`.
fn cancel_bullet_pairs(state: &GameState, partner: impl Fn(Position) -> Position) -> GameState {
    let player_cells: BTreeSet<Position> = state.player_bullets.iter().copied().collect();
    let mut enemy_cells: HashSet<Position> = state.enemy_bullets.iter().copied().collect();

    let mut spent_player = HashSet::new();
    let mut spent_enemy = HashSet::new();
    let mut score = state.score;

    for &bullet in &player_cells {
        let other = partner(bullet);
        if !enemy_cells.remove(&other) {
            continue;
        }
        spent_enemy.insert(other);
        spent_player.insert(bullet);
        trace!("bullets collided at ({}, {})", bullet.x, bullet.y);
        score += BULLET_HIT_SCORE;
    }

    if spent_player.is_empty() {
        return state.clone();
    }

    let player_bullets = state
        .player_bullets
        .iter()
        .copied()
        .filter(|b| !spent_player.contains(b))
        .collect();
    let enemy_bullets = state
        .enemy_bullets
        .iter()
        .copied()
        .filter(|b| !spent_enemy.contains(b))
        .collect();

    GameState {
        player_bullets,
        enemy_bullets,
        score,
        ..state.clone()
    }
}

// ── Ticks ────────────────────────────────────────────────────────────────────

/// Slow tick: move the formation, maybe fire, then check player bullets
/// against the moved enemies.
pub fn enemy_tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let state = move_formation(state);
    if state.status != GameStatus::Playing {
        return state;
    }
    let state = spawn_enemy_bullet(&state, rng);
    resolve_player_bullets_vs_enemies(&state)
}

/// Fast tick: move every bullet, then run the three collision passes in
/// order. A win in the first pass ends the tick.
///
/// Bullets already sharing a cell (a shot fired point-blank into an enemy
/// bullet) would end up two cells apart after moving, so they cancel first.
pub fn bullet_tick(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let state = cancel_shared_cells(state);
    let state = move_bullets(&state);
    let state = resolve_player_bullets_vs_enemies(&state);
    if state.status != GameStatus::Playing {
        return state;
    }
    let state = resolve_enemy_bullets_vs_player(&state);
    resolve_bullets_vs_bullets(&state)
}

/// Flash timer for the LifeLost sub-state. On expiry the game resumes, or
/// ends if no lives are left.
pub fn life_lost_tick(state: &GameState) -> GameState {
    if state.status != GameStatus::LifeLost {
        return state.clone();
    }
    let ticks = state.life_lost_ticks + 1;
    if ticks < LIFE_LOST_TICKS {
        return GameState {
            life_lost_ticks: ticks,
            ..state.clone()
        };
    }
    let status = if state.lives == 0 {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    };
    GameState {
        status,
        life_lost_ticks: 0,
        ..state.clone()
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

/// Apply one event to a state. Events that do not apply in the current
/// status return an unchanged copy.
pub fn advance(state: &GameState, event: Event, rng: &mut impl Rng) -> GameState {
    match event {
        Event::MoveLeft => move_player_left(state),
        Event::MoveRight => move_player_right(state),
        Event::Shoot => player_shoot(state),
        Event::TogglePause => toggle_pause(state),
        Event::Restart => restart(state),
        Event::EnemyTick => enemy_tick(state, rng),
        Event::BulletTick => bullet_tick(state),
        Event::LifeLostTick => life_lost_tick(state),
    }
}

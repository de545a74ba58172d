use retro_shooter::consts::*;
use retro_shooter::{Engine, Event, Formation, GameState, GameStatus, Playfield, Position};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn engine() -> Engine<StdRng> {
    Engine::with_rng(Playfield::default(), StdRng::seed_from_u64(7))
}

fn engine_from(state: GameState) -> Engine<StdRng> {
    Engine::from_state(state, StdRng::seed_from_u64(7))
}

#[test]
fn fresh_game() {
    let e = engine();
    let s = e.state();
    assert_eq!(s.lives, 3);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn first_enemy_tick_sweeps_every_row() {
    let mut e = engine();
    let before = e.state().clone();
    let outcome = e.advance(Event::EnemyTick);

    assert_eq!(outcome.status, GameStatus::Playing);
    assert_eq!(outcome.score, 0);
    assert_eq!(outcome.lives_delta, 0);

    let after = e.state();
    assert_eq!(after.enemies.len(), before.enemies.len());
    for pos in before.enemies.positions() {
        let dx = if pos.y % 2 == 0 { 1 } else { -1 };
        assert!(after.enemies.contains(Position::new(pos.x + dx, pos.y)));
    }
}

#[test]
fn shot_travels_up_and_kills_lowest_enemy_in_column() {
    let mut e = engine();
    // 25 → 31, under the right-hand end of the odd rows
    for _ in 0..3 {
        e.advance(Event::MoveRight);
    }
    assert_eq!(e.state().player, Position::new(31, 14));
    e.advance(Event::Shoot);

    let mut ticks = 0;
    while e.state().score == 0 && ticks < FIELD_HEIGHT {
        e.advance(Event::BulletTick);
        ticks += 1;
    }

    let s = e.state();
    assert_eq!(s.score, ENEMY_HIT_SCORE);
    assert!(s.player_bullets.is_empty());
    assert!(!s.enemies.contains(Position::new(31, 3)));
    assert!(s.enemies.contains(Position::new(31, 1)));
    assert_eq!(s.enemies.len(), 49);
}

#[test]
fn pause_freezes_everything() {
    let mut e = engine();
    e.advance(Event::Shoot);
    e.advance(Event::TogglePause);
    let frozen = e.state().clone();

    for _ in 0..20 {
        for event in [
            Event::EnemyTick,
            Event::BulletTick,
            Event::LifeLostTick,
            Event::MoveLeft,
            Event::Shoot,
            Event::Restart,
        ] {
            let outcome = e.advance(event);
            assert_eq!(outcome.status, GameStatus::Paused);
            assert_eq!(outcome.lives_delta, 0);
        }
    }
    assert_eq!(e.state(), &frozen);

    assert_eq!(e.advance(Event::TogglePause).status, GameStatus::Playing);
}

#[test]
fn hit_reports_lost_life() {
    let state = GameState {
        enemy_bullets: vec![Position::new(25, 13)],
        ..GameState::new(Playfield::default())
    };
    let mut e = engine_from(state);
    let outcome = e.advance(Event::BulletTick);
    assert_eq!(outcome.status, GameStatus::LifeLost);
    assert_eq!(outcome.lives_delta, -1);
    assert_eq!(e.state().lives, 2);
}

#[test]
fn point_blank_shot_cancels_incoming_bullet() {
    let state = GameState {
        enemy_bullets: vec![Position::new(25, 13)],
        ..GameState::new(Playfield::default())
    };
    let mut e = engine_from(state);
    e.advance(Event::Shoot);
    let outcome = e.advance(Event::BulletTick);

    assert_eq!(outcome.status, GameStatus::Playing);
    assert_eq!(outcome.lives_delta, 0);
    assert_eq!(outcome.score, BULLET_HIT_SCORE);
    assert_eq!(e.state().lives, STARTING_LIVES);
    assert!(e.state().player_bullets.is_empty());
    assert!(e.state().enemy_bullets.is_empty());
}

#[test]
fn bullets_sharing_a_cell_cancel_before_moving() {
    let state = GameState {
        player_bullets: vec![Position::new(5, 10)],
        enemy_bullets: vec![Position::new(5, 10)],
        ..GameState::new(Playfield::default())
    };
    let mut e = engine_from(state);
    let outcome = e.advance(Event::BulletTick);

    assert_eq!(outcome.score, BULLET_HIT_SCORE);
    assert!(e.state().player_bullets.is_empty());
    assert!(e.state().enemy_bullets.is_empty());
}

#[test]
fn no_input_during_life_lost() {
    let state = GameState {
        status: GameStatus::LifeLost,
        ..GameState::new(Playfield::default())
    };
    let mut e = engine_from(state.clone());
    for event in [Event::MoveLeft, Event::MoveRight, Event::Shoot, Event::TogglePause] {
        e.advance(event);
    }
    assert_eq!(e.state(), &state);
}

#[test]
fn last_life_lost_waits_for_flash_to_finish() {
    let state = GameState {
        lives: 1,
        enemy_bullets: vec![Position::new(25, 13)],
        ..GameState::new(Playfield::default())
    };
    let mut e = engine_from(state);
    assert_eq!(e.advance(Event::BulletTick).status, GameStatus::LifeLost);
    assert_eq!(e.state().lives, 0);

    for _ in 1..LIFE_LOST_TICKS {
        assert_eq!(e.advance(Event::LifeLostTick).status, GameStatus::LifeLost);
    }
    assert_eq!(e.advance(Event::LifeLostTick).status, GameStatus::Lost);
}

#[test]
fn formation_reaching_player_row_ends_game() {
    let mut e = engine();
    let field = Playfield::default();
    // Each descent costs `sweep_limit` sweeps plus the descent tick itself;
    // the lowest row starts at 4 and may descend until it sits on row 13.
    let per_row = field.sweep_limit() + 1;
    let descents = field.danger_row() - (ENEMY_ROW_COUNT - 1);
    let expected = per_row * descents + per_row;

    let mut ticks = 0;
    while e.status() == GameStatus::Playing {
        e.advance(Event::EnemyTick);
        ticks += 1;
        assert!(e.state().enemies.positions().all(|pos| field.contains(pos)));
        assert!(ticks <= expected, "formation never reached the player");
    }
    assert_eq!(e.status(), GameStatus::Lost);
    assert_eq!(ticks, expected);
    assert_eq!(e.state().enemies.lowest_row(), Some(field.danger_row()));
}

#[test]
fn clearing_formation_wins_and_restart_resets() {
    let state = GameState {
        enemies: Formation::from_positions([Position::new(25, 5)]),
        player_bullets: vec![Position::new(25, 6)],
        score: 40,
        lives: 1,
        ..GameState::new(Playfield::default())
    };
    let mut e = engine_from(state);
    let outcome = e.advance(Event::BulletTick);
    assert_eq!(outcome.status, GameStatus::Won);
    assert_eq!(outcome.score, 40 + ENEMY_HIT_SCORE);

    // Terminal: only restart does anything
    e.advance(Event::BulletTick);
    e.advance(Event::MoveLeft);
    assert_eq!(e.state().player, Position::new(25, 14));

    let outcome = e.advance(Event::Restart);
    assert_eq!(outcome.status, GameStatus::Playing);
    assert_eq!(outcome.score, 0);
    assert_eq!(outcome.lives_delta, STARTING_LIVES as i32 - 1);
    assert_eq!(e.state(), &GameState::new(Playfield::default()));
}

#[test]
fn restart_ignored_mid_game() {
    let mut e = engine();
    e.advance(Event::MoveLeft);
    let before = e.state().clone();
    e.advance(Event::Restart);
    assert_eq!(e.state(), &before);
}

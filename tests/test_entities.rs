use retro_shooter::entities::*;

#[test]
fn position_steps() {
    let pos = Position::new(4, 7);
    assert_eq!(pos.up(), Position::new(4, 6));
    assert_eq!(pos.down(), Position::new(4, 8));
    assert_eq!(pos.up().down(), pos);
}

#[test]
fn status_messages() {
    assert_eq!(GameStatus::Playing.message(), None);
    assert_eq!(GameStatus::Paused.message(), Some("Paused"));
    assert_eq!(GameStatus::LifeLost.message(), Some("Lost a life"));
    assert_eq!(GameStatus::Won.message(), Some("You win"));
    assert_eq!(GameStatus::Lost.message(), Some("Game over"));
}

#[test]
fn only_won_and_lost_are_terminal() {
    assert!(GameStatus::Won.is_terminal());
    assert!(GameStatus::Lost.is_terminal());
    assert!(!GameStatus::Playing.is_terminal());
    assert!(!GameStatus::Paused.is_terminal());
    assert!(!GameStatus::LifeLost.is_terminal());
}

#[test]
fn initial_formation_fits_field() {
    let field = Playfield::default();
    let formation = Formation::initial(&field);
    assert!(formation.positions().all(|pos| field.contains(pos)));
    assert_eq!(formation.descent(), 0);
}

#[test]
fn from_positions_collapses_duplicates() {
    let f = Formation::from_positions([
        Position::new(1, 1),
        Position::new(1, 1),
        Position::new(2, 1),
    ]);
    assert_eq!(f.len(), 2);
    assert_eq!(f.row_count(), 1);
}

#[test]
fn game_state_clone_is_independent() {
    let original = GameState::new(Playfield::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 3;
    cloned.score = 999;
    cloned.enemies.remove(Position::new(0, 0));
    cloned.player_bullets.push(Position::new(5, 5));

    assert_eq!(original.player.x, 25);
    assert_eq!(original.score, 0);
    assert!(original.enemies.contains(Position::new(0, 0)));
    assert!(original.player_bullets.is_empty());
}

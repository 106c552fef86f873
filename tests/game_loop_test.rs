//! Integration test: Snake game loop
//!
//! Drives whole games through the public API: random play checking the
//! board invariants every tick, the fixed scenarios, and timer behaviour.

use neon_snake::config::EngineConfig;
use neon_snake::game::{
    activate_boost, process_input, request_direction, restart_game, start_game, step_snake,
    tick_snake, toggle_pause, Direction, Food, FoodKind, GameError, GameInput, GameOverCause,
    GamePhase, GridSizing, GridSpec, InputOutcome, Position, SnakeGame,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashSet, VecDeque};

/// Config with no random food or ghosts, so a test controls the board.
fn quiet_config() -> EngineConfig {
    EngineConfig {
        min_foods: 0,
        food_spawn_min_ms: u64::MAX / 4,
        food_spawn_max_ms: u64::MAX / 4,
        ghost_spawn_chance: 0.0,
        ..EngineConfig::default()
    }
}

fn started(grid: GridSpec, config: EngineConfig, seed: u64) -> (SnakeGame, ChaCha8Rng) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut game = SnakeGame::new(grid, config, 0, &mut rng);
    start_game(&mut game, &mut rng).unwrap();
    game.foods.clear();
    game.ghost = None;
    (game, rng)
}

fn put_snake(game: &mut SnakeGame, cells: &[(i16, i16)], direction: Direction) {
    game.snake = cells.iter().map(|&(x, y)| Position::new(x, y)).collect();
    game.direction = direction;
    game.next_direction = direction;
}

fn put_food(game: &mut SnakeGame, x: i16, y: i16, kind: FoodKind) {
    game.foods.push(Food {
        pos: Position::new(x, y),
        kind,
        id: 10_000 + game.foods.len() as u64,
        spawned_at_ms: game.clock_ms,
    });
}

fn knight_shaped(from: Position, to: Position) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    (dx == 1 && dy == 2) || (dx == 2 && dy == 1)
}

// =============================================================================
// Random play invariants
// =============================================================================

#[test]
fn test_random_play_keeps_board_invariants() {
    let config = EngineConfig {
        ghost_spawn_chance: 0.5,
        food_spawn_min_ms: 300,
        food_spawn_max_ms: 600,
        ..EngineConfig::default()
    };

    for seed in 0..40u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = SnakeGame::new(GridSpec::new(1, 24, 16), config.clone(), 0, &mut rng);
        start_game(&mut game, &mut rng).unwrap();

        for _ in 0..600 {
            if game.phase == GamePhase::GameOver {
                restart_game(&mut game, true, &mut rng).unwrap();
            }
            if rng.gen_bool(0.3) {
                let dir = Direction::ALL[rng.gen_range(0..4)];
                request_direction(&mut game, dir, &mut rng).unwrap();
            }
            if rng.gen_bool(0.02) {
                activate_boost(&mut game);
            }

            let len_before = game.snake.len();
            let head = game.head().unwrap();
            let target = head.step(game.next_direction);
            let eats = game
                .foods
                .iter()
                .find(|f| f.pos == target)
                .map(|f| f.kind)
                .or_else(|| {
                    game.ghost
                        .as_ref()
                        .filter(|g| g.pos == target)
                        .map(|_| FoodKind::Apple)
                });
            let ghost_before = game.ghost.as_ref().map(|g| (g.id, g.pos));
            let level_before = game.level;

            step_snake(&mut game, &mut rng);

            if game.phase == GamePhase::GameOver {
                match game.game_over_cause {
                    Some(GameOverCause::Wall) => {
                        assert!(!game.grid.contains(target.x, target.y));
                    }
                    Some(GameOverCause::SelfCollision) => {
                        assert!(game.snake.contains(&target));
                    }
                    Some(GameOverCause::Bomb) => {
                        assert_eq!(eats, Some(FoodKind::Bomb));
                        assert_eq!(game.snake.len(), len_before);
                    }
                    other => panic!("unexpected end: {:?}", other),
                }
                continue;
            }

            // Every segment in bounds and pairwise distinct
            let mut seen = HashSet::new();
            for seg in &game.snake {
                assert!(game.grid.contains(seg.x, seg.y), "segment out of bounds");
                assert!(seen.insert(*seg), "duplicate segment");
            }

            // Net growth law
            let grew = usize::from(eats.is_some());
            assert_eq!(game.snake.len(), len_before + grew);

            // Food never overlaps the snake, the ghost or other food
            let mut food_cells = HashSet::new();
            for food in &game.foods {
                assert!(!game.snake.contains(&food.pos));
                assert!(food_cells.insert(food.pos));
            }
            assert!(game.foods.len() <= game.config.max_foods);

            if let Some(ghost) = &game.ghost {
                assert!(game.grid.contains(ghost.pos.x, ghost.pos.y));
                assert!(!game.snake.contains(&ghost.pos));
                assert!(!food_cells.contains(&ghost.pos));
                if let Some((id, from)) = ghost_before {
                    if id == ghost.id && from != ghost.pos {
                        assert!(knight_shaped(from, ghost.pos));
                    }
                }
            }

            assert!(game.level >= level_before);
            assert!(game.level <= level_before + 1);
            let fastest = game.config.min_interval_ms.min(game.config.boost_interval_ms);
            assert!(game.current_interval_ms() >= fastest);
            if !game.config.allow_negative_score {
                assert!(game.score >= 0);
            }
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_basic_consumption() {
    let (mut game, mut rng) = started(GridSpec::new(1, 30, 20), quiet_config(), 1);
    put_snake(&mut game, &[(10, 10)], Direction::Right);
    put_food(&mut game, 11, 10, FoodKind::Apple);

    let interval = game.current_interval_ms();
    tick_snake(&mut game, interval, &mut rng);

    assert_eq!(
        game.snake,
        VecDeque::from([Position::new(11, 10), Position::new(10, 10)])
    );
    assert_eq!(game.score, FoodKind::Apple.points());
    assert!(game.next_food_spawn_ms <= game.clock_ms + 500);
}

#[test]
fn test_scenario_wall_collision() {
    let (mut game, mut rng) = started(GridSpec::new(1, 30, 20), quiet_config(), 2);
    put_snake(&mut game, &[(0, 5)], Direction::Left);

    tick_snake(&mut game, 150, &mut rng);

    assert_eq!(game.phase, GamePhase::GameOver);
    assert_eq!(game.game_over_cause, Some(GameOverCause::Wall));
}

#[test]
fn test_scenario_self_collision() {
    let (mut game, mut rng) = started(GridSpec::new(1, 30, 20), quiet_config(), 3);
    put_snake(
        &mut game,
        &[(5, 5), (5, 6), (5, 7), (6, 7), (6, 6), (6, 5)],
        Direction::Up,
    );
    process_input(&mut game, GameInput::Move(Direction::Right), &mut rng);

    tick_snake(&mut game, 150, &mut rng);

    assert_eq!(game.phase, GamePhase::GameOver);
    assert_eq!(game.game_over_cause, Some(GameOverCause::SelfCollision));
}

#[test]
fn test_anti_reversal_law() {
    let (mut game, mut rng) = started(GridSpec::new(1, 30, 20), quiet_config(), 4);
    put_snake(&mut game, &[(10, 10), (9, 10), (8, 10)], Direction::Right);

    process_input(&mut game, GameInput::Move(Direction::Left), &mut rng);
    tick_snake(&mut game, 150, &mut rng);

    assert_eq!(game.phase, GamePhase::Playing);
    assert_eq!(game.direction, Direction::Right);
    assert_eq!(game.head(), Some(Position::new(11, 10)));
}

#[test]
fn test_scenario_pause_resume_offset() {
    let (mut game, mut rng) = started(GridSpec::new(1, 30, 20), quiet_config(), 5);
    put_snake(&mut game, &[(2, 10)], Direction::Right);

    // 120ms into the first interval
    tick_snake(&mut game, 120, &mut rng);
    toggle_pause(&mut game);

    let score = game.score;
    let snake = game.snake.clone();
    for _ in 0..20 {
        tick_snake(&mut game, 150, &mut rng);
    }
    assert_eq!(game.score, score);
    assert_eq!(game.snake, snake);

    toggle_pause(&mut game);
    assert!(!tick_snake(&mut game, 29, &mut rng));
    assert!(tick_snake(&mut game, 1, &mut rng));
    assert_eq!(game.head(), Some(Position::new(3, 10)));
    // Only one step for the whole pause
    assert_eq!(game.tick_count, 1);
}

#[test]
fn test_scenario_level_speedup_with_floor() {
    let (mut game, mut rng) = started(GridSpec::new(1, 250, 5), quiet_config(), 6);
    put_snake(&mut game, &[(0, 2)], Direction::Right);

    let mut previous_level = game.level;
    let mut previous_interval = game.current_interval_ms();
    for _ in 0..240 {
        let ahead = game.head().unwrap().step(Direction::Right);
        game.foods.clear();
        put_food(&mut game, ahead.x, ahead.y, FoodKind::Apple);
        step_snake(&mut game, &mut rng);
        assert_eq!(game.phase, GamePhase::Playing);

        let crossed = game.score / 100 + 1 > i64::from(previous_level);
        if crossed {
            assert_eq!(game.level, previous_level + 1);
            assert!(
                game.current_interval_ms() < previous_interval
                    || game.current_interval_ms() == game.config.min_interval_ms
            );
        } else {
            assert_eq!(game.level, previous_level);
        }
        assert!(game.current_interval_ms() >= game.config.min_interval_ms);
        previous_level = game.level;
        previous_interval = game.current_interval_ms();
    }

    assert_eq!(game.score, 2400);
    assert_eq!(game.level, 25);
    assert_eq!(game.current_interval_ms(), 50);
}

#[test]
fn test_poison_floor_both_branches() {
    for allow_negative in [false, true] {
        let config = EngineConfig {
            allow_negative_score: allow_negative,
            ..quiet_config()
        };
        let (mut game, mut rng) = started(GridSpec::new(1, 30, 20), config, 7);
        put_snake(&mut game, &[(5, 5)], Direction::Right);
        game.score = 10;
        put_food(&mut game, 6, 5, FoodKind::Poison);

        step_snake(&mut game, &mut rng);

        if allow_negative {
            assert_eq!(game.score, -10);
        } else {
            assert_eq!(game.score, 0);
        }
    }
}

#[test]
fn test_boost_expiry_restores_level_speed() {
    let (mut game, mut rng) = started(GridSpec::new(1, 60, 10), quiet_config(), 8);
    put_snake(&mut game, &[(0, 5)], Direction::Right);
    game.score = 310;
    put_food(&mut game, 1, 5, FoodKind::Turbo);

    step_snake(&mut game, &mut rng);
    assert_eq!(game.level, 4);
    assert_eq!(game.current_interval_ms(), 75);

    // Real time: boosted ticks run at 75ms
    let mut elapsed = 0;
    while game.is_boosted() {
        game.foods.clear();
        tick_snake(&mut game, 25, &mut rng);
        elapsed += 25;
        assert!(elapsed < 10_000);
    }
    assert_eq!(game.current_interval_ms(), 120);
    assert_eq!(game.phase, GamePhase::Playing);
}

// =============================================================================
// Startup and sizing
// =============================================================================

#[test]
fn test_degenerate_viewport_cannot_start() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let grid = GridSpec::from_viewport(20, 10, &GridSizing::default());
    assert!(grid.is_empty());

    let mut game = SnakeGame::new(grid, EngineConfig::default(), 0, &mut rng);
    assert_eq!(start_game(&mut game, &mut rng), Err(GameError::EmptyGrid));
    assert_eq!(
        process_input(&mut game, GameInput::Start, &mut rng),
        InputOutcome::CannotStart
    );
    assert_eq!(game.phase, GamePhase::Ready);
    assert!(game.foods.is_empty());
}

#[test]
fn test_full_run_reports_once() {
    let (mut game, mut rng) = started(GridSpec::new(1, 10, 10), quiet_config(), 10);
    game.high_score = 5;
    put_snake(&mut game, &[(5, 5)], Direction::Right);
    put_food(&mut game, 6, 5, FoodKind::Cherry);

    for _ in 0..20 {
        tick_snake(&mut game, 150, &mut rng);
    }

    assert_eq!(game.phase, GamePhase::GameOver);
    let run = game.take_finished().unwrap();
    assert_eq!(run.score, 20);
    assert_eq!(run.length, 2);
    assert!(run.new_high_score);
    assert_eq!(game.high_score, 20);
    assert!(game.take_finished().is_none());

    restart_game(&mut game, true, &mut rng).unwrap();
    assert_eq!(game.phase, GamePhase::Playing);
    assert_eq!(game.high_score, 20);
    assert!(game.last_run().is_none());
}

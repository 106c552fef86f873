//! Snake game data structures.
//!
//! One `SnakeGame` is one independent game instance: grid, snake, food,
//! score and the tick accumulator that stands in for the frame timer.

use super::food::{Food, GhostFood};
use super::viewport::GridSpec;
use crate::config::EngineConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Cardinal direction for snake movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the (dx, dy) delta for this direction.
    pub fn delta(&self) -> (i16, i16) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// A position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// Lifecycle phase of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Snake idle at its spawn cell, no ticks.
    Ready,
    Playing,
    /// Ticks suspended, state frozen.
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Playing => "PLAYING",
            Self::Paused => "PAUSED",
            Self::GameOver => "GAME OVER",
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    Wall,
    SelfCollision,
    Bomb,
    Quit,
}

impl GameOverCause {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Wall => "hit the wall",
            Self::SelfCollision => "bit its own tail",
            Self::Bomb => "ate a bomb",
            Self::Quit => "left the game",
        }
    }
}

/// Floating score text shown where food was eaten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePopup {
    pub pos: Position,
    pub text: String,
    pub ticks_left: u32,
    /// Negative popups render in the poison colour.
    pub negative: bool,
}

/// Read-only values for the HUD, refreshed once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    pub score: i64,
    pub high_score: i64,
    pub level: u32,
    pub phase: GamePhase,
    pub interval_ms: u64,
    pub boost_ticks: u32,
    pub food_count: usize,
    pub ghost_present: bool,
    pub length: usize,
}

/// Conditions that keep a game from starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The viewport produced a grid with no cells.
    EmptyGrid,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "cannot start: the play field has no cells"),
        }
    }
}

impl std::error::Error for GameError {}

/// Summary of a finished run, handed to the host for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedRun {
    pub score: i64,
    pub level: u32,
    pub length: usize,
    pub cause: GameOverCause,
    /// Played (unpaused) game time.
    pub duration_ms: u64,
    pub new_high_score: bool,
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct SnakeGame {
    pub config: EngineConfig,
    pub grid: GridSpec,
    pub phase: GamePhase,
    pub game_over_cause: Option<GameOverCause>,

    // Snake state
    /// Snake body segments. Head is at the front (index 0).
    pub snake: VecDeque<Position>,
    /// Direction applied on the last tick.
    pub direction: Direction,
    /// Buffered next direction, applied at the next tick boundary.
    pub next_direction: Direction,

    // Food
    pub foods: Vec<Food>,
    pub ghost: Option<GhostFood>,
    pub next_entity_id: u64,
    /// Game clock time at which the next timed food spawn is due.
    pub next_food_spawn_ms: u64,

    // Scoring
    pub score: i64,
    pub high_score: i64,
    pub level: u32,

    // Timing
    /// Tick interval for the current level, ignoring boost.
    pub level_interval_ms: u64,
    /// Remaining boosted ticks; 0 when no boost is active.
    pub boost_ticks: u32,
    /// Sub-step time accumulator (milliseconds).
    pub accumulated_time_ms: u64,
    /// Played time in milliseconds, advanced by one interval per tick.
    pub clock_ms: u64,
    pub tick_count: u64,

    // Transient effects (renderer only)
    pub popups: Vec<ScorePopup>,
    pub poison_flash_ticks: u32,

    /// Set when a run ends; kept until the next run for the game-over screen.
    pub finished: Option<FinishedRun>,
    /// True once the host has taken `finished` for persistence.
    pub finished_reported: bool,
}

impl SnakeGame {
    /// Create a game in `Ready` with the snake idle at its spawn cell.
    pub fn new<R: Rng>(grid: GridSpec, config: EngineConfig, high_score: i64, rng: &mut R) -> Self {
        let level_interval_ms = config.interval_for_level(1);
        let mut game = Self {
            config,
            grid,
            phase: GamePhase::Ready,
            game_over_cause: None,

            snake: VecDeque::new(),
            direction: Direction::Right,
            next_direction: Direction::Right,

            foods: Vec::new(),
            ghost: None,
            next_entity_id: 0,
            next_food_spawn_ms: 0,

            score: 0,
            high_score: high_score.max(0),
            level: 1,

            level_interval_ms,
            boost_ticks: 0,
            accumulated_time_ms: 0,
            clock_ms: 0,
            tick_count: 0,

            popups: Vec::new(),
            poison_flash_ticks: 0,

            finished: None,
            finished_reported: false,
        };

        super::logic::reset_run(&mut game, rng);
        game
    }

    /// Spawn cell: grid centre.
    pub fn spawn_position(&self) -> Position {
        Position::new(self.grid.width / 2, self.grid.height / 2)
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.front().copied()
    }

    /// True if the snake, any food or the ghost occupies `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.snake.contains(&pos)
            || self.foods.iter().any(|f| f.pos == pos)
            || self.ghost.as_ref().is_some_and(|g| g.pos == pos)
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_ticks > 0
    }

    /// Interval of the next tick: boosted while a boost runs, else the level's.
    pub fn current_interval_ms(&self) -> u64 {
        if self.is_boosted() {
            self.config.boost_interval_ms
        } else {
            self.level_interval_ms
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            high_score: self.high_score,
            level: self.level,
            phase: self.phase,
            interval_ms: self.current_interval_ms(),
            boost_ticks: self.boost_ticks,
            food_count: self.foods.len(),
            ghost_present: self.ghost.is_some(),
            length: self.snake.len(),
        }
    }

    /// Hand the record of a run that just ended to the host, once.
    pub fn take_finished(&mut self) -> Option<FinishedRun> {
        if self.finished_reported {
            return None;
        }
        let run = self.finished?;
        self.finished_reported = true;
        Some(run)
    }

    /// The most recent finished run, until the next one starts.
    pub fn last_run(&self) -> Option<&FinishedRun> {
        self.finished.as_ref()
    }

    pub(crate) fn alloc_id(&mut self) -> u64 {
        self.next_entity_id += 1;
        self.next_entity_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_opposite_deltas_cancel() {
        for d in Direction::ALL {
            let (dx, dy) = d.delta();
            let (ox, oy) = d.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_position_step() {
        let p = Position::new(3, 3);
        assert_eq!(p.step(Direction::Up), Position::new(3, 2));
        assert_eq!(p.step(Direction::Right), Position::new(4, 3));
    }

    fn test_game() -> SnakeGame {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        SnakeGame::new(GridSpec::new(1, 20, 16), EngineConfig::default(), 40, &mut rng)
    }

    #[test]
    fn test_new_game_defaults() {
        let game = test_game();
        assert_eq!(game.phase, GamePhase::Ready);
        assert!(game.game_over_cause.is_none());
        assert_eq!(game.score, 0);
        assert_eq!(game.high_score, 40);
        assert_eq!(game.level, 1);
        assert_eq!(game.snake.len(), 1);
        assert_eq!(game.head(), Some(Position::new(10, 8)));
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.current_interval_ms(), 150);
        assert!(game.ghost.is_none());
    }

    #[test]
    fn test_new_game_has_initial_food() {
        let game = test_game();
        assert!(game.foods.len() >= 2 && game.foods.len() <= 4);
        for food in &game.foods {
            assert!(!game.snake.contains(&food.pos));
            assert!(game.grid.contains(food.pos.x, food.pos.y));
        }
    }

    #[test]
    fn test_food_ids_unique() {
        let game = test_game();
        let mut ids: Vec<u64> = game.foods.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), game.foods.len());
    }

    #[test]
    fn test_empty_grid_game_is_inert() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let game = SnakeGame::new(GridSpec::new(0, 0, 0), EngineConfig::default(), 0, &mut rng);
        assert_eq!(game.phase, GamePhase::Ready);
        assert!(game.foods.is_empty());
    }

    #[test]
    fn test_negative_high_score_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let game = SnakeGame::new(GridSpec::new(1, 5, 5), EngineConfig::default(), -9, &mut rng);
        assert_eq!(game.high_score, 0);
    }

    #[test]
    fn test_hud_snapshot() {
        let mut game = test_game();
        game.score = 120;
        game.level = 2;
        let hud = game.hud();
        assert_eq!(hud.score, 120);
        assert_eq!(hud.level, 2);
        assert_eq!(hud.phase, GamePhase::Ready);
        assert_eq!(hud.length, 1);
    }

    #[test]
    fn test_game_error_message() {
        assert!(GameError::EmptyGrid.to_string().contains("cannot start"));
    }
}

//! Snake game logic: phase transitions, the tick loop, eating and spawning.

use super::food::{
    ghost_step, pick_food_kind, random_free_cell, Food, FoodEffect, GhostFood, GhostMove,
};
use super::types::*;
use crate::constants::{
    FOOD_RESPAWN_AFTER_EAT_MS, INITIAL_FOODS_MAX, MAX_DT_MS, MAX_SPAWN_ATTEMPTS,
    POISON_FLASH_TICKS, POPUP_TICKS,
};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info};

/// UI-agnostic input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Move(Direction),
    /// Direction change with a boost on top (Shift+arrow).
    MoveBoost(Direction),
    /// Enter: start from Ready, replay from GameOver.
    Start,
    /// Space: pause toggle, doubles as start/replay outside of a run.
    Pause,
    Boost,
    /// R: back to Ready.
    Restart,
    Quit,
    Other,
}

/// What the host should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    /// The play field is empty; show a "cannot start" message.
    CannotStart,
    Quit,
}

/// Process player input. Input only buffers direction or flips flags; the
/// snake and food only ever change inside `step_snake`.
pub fn process_input<R: Rng>(game: &mut SnakeGame, input: GameInput, rng: &mut R) -> InputOutcome {
    let result = match input {
        GameInput::Move(direction) => request_direction(game, direction, rng),
        GameInput::MoveBoost(direction) => {
            let result = request_direction(game, direction, rng);
            activate_boost(game);
            result
        }
        GameInput::Start => match game.phase {
            GamePhase::Ready => start_game(game, rng),
            GamePhase::GameOver => restart_game(game, true, rng),
            GamePhase::Playing | GamePhase::Paused => Ok(()),
        },
        GameInput::Pause => match game.phase {
            GamePhase::Ready => start_game(game, rng),
            GamePhase::GameOver => restart_game(game, true, rng),
            GamePhase::Playing | GamePhase::Paused => {
                toggle_pause(game);
                Ok(())
            }
        },
        GameInput::Boost => {
            activate_boost(game);
            Ok(())
        }
        GameInput::Restart => restart_game(game, false, rng),
        GameInput::Quit => {
            quit_game(game);
            return InputOutcome::Quit;
        }
        GameInput::Other => Ok(()),
    };

    match result {
        Ok(()) => InputOutcome::Continue,
        Err(GameError::EmptyGrid) => InputOutcome::CannotStart,
    }
}

/// Reinitialise every per-run field. Leaves the phase alone.
pub(crate) fn reset_run<R: Rng>(game: &mut SnakeGame, rng: &mut R) {
    let spawn = game.spawn_position();
    game.snake = VecDeque::from([spawn]);
    game.direction = Direction::Right;
    game.next_direction = Direction::Right;

    game.score = 0;
    game.level = 1;
    game.level_interval_ms = game.config.interval_for_level(1);
    game.boost_ticks = 0;
    game.accumulated_time_ms = 0;
    game.clock_ms = 0;
    game.tick_count = 0;

    game.game_over_cause = None;
    game.finished = None;
    game.finished_reported = false;
    game.popups.clear();
    game.poison_flash_ticks = 0;

    game.ghost = None;
    game.foods.clear();
    let lo = game.config.min_foods;
    let hi = INITIAL_FOODS_MAX.min(game.config.max_foods).max(lo);
    let count = rng.gen_range(lo..=hi);
    for _ in 0..count {
        if !spawn_food(game, rng) {
            break;
        }
    }
    schedule_next_spawn(game, rng);
}

/// `Ready -> Playing` with fresh run state.
///
/// A no-op while a run is in progress. Fails on a grid with no cells and
/// leaves the game where it was.
pub fn start_game<R: Rng>(game: &mut SnakeGame, rng: &mut R) -> Result<(), GameError> {
    match game.phase {
        GamePhase::Playing | GamePhase::Paused => return Ok(()),
        GamePhase::Ready | GamePhase::GameOver => {}
    }
    if game.grid.is_empty() {
        return Err(GameError::EmptyGrid);
    }

    reset_run(game, rng);
    game.phase = GamePhase::Playing;
    info!(
        width = game.grid.width,
        height = game.grid.height,
        interval_ms = game.level_interval_ms,
        "game started"
    );
    Ok(())
}

/// Buffer a direction change for the next tick.
///
/// The exact reverse of the active direction is ignored. From `Ready` the
/// first request also starts the game, heading that way.
pub fn request_direction<R: Rng>(
    game: &mut SnakeGame,
    direction: Direction,
    rng: &mut R,
) -> Result<(), GameError> {
    match game.phase {
        GamePhase::Ready => {
            start_game(game, rng)?;
            // Single segment: every heading is safe.
            game.direction = direction;
            game.next_direction = direction;
        }
        GamePhase::Playing => {
            if direction != game.direction.opposite() {
                game.next_direction = direction;
            }
        }
        GamePhase::Paused | GamePhase::GameOver => {}
    }
    Ok(())
}

/// `Playing <-> Paused`. The accumulator is left untouched, so a resumed game
/// ticks at the same offset it would have without the pause.
pub fn toggle_pause(game: &mut SnakeGame) {
    match game.phase {
        GamePhase::Playing => {
            game.phase = GamePhase::Paused;
            info!(score = game.score, "paused");
        }
        GamePhase::Paused => {
            game.phase = GamePhase::Playing;
            info!(interval_ms = game.current_interval_ms(), "resumed");
        }
        GamePhase::Ready | GamePhase::GameOver => {}
    }
}

/// Start (or restart) the boost countdown. Only while playing.
pub fn activate_boost(game: &mut SnakeGame) {
    if game.phase != GamePhase::Playing {
        return;
    }
    let before = game.current_interval_ms();
    game.boost_ticks = game.config.boost_ticks;
    restart_timer_if_changed(game, before);
    debug!(ticks = game.boost_ticks, "boost");
}

/// Back to `Ready` with fresh state; straight into `Playing` if `auto_play`.
pub fn restart_game<R: Rng>(
    game: &mut SnakeGame,
    auto_play: bool,
    rng: &mut R,
) -> Result<(), GameError> {
    reset_run(game, rng);
    game.phase = GamePhase::Ready;
    if auto_play {
        start_game(game, rng)
    } else {
        Ok(())
    }
}

/// End a running or paused game so the run gets recorded.
pub fn quit_game(game: &mut SnakeGame) {
    if matches!(game.phase, GamePhase::Playing | GamePhase::Paused) {
        end_game(game, GameOverCause::Quit);
    }
}

/// Advance the game. Called from the host loop.
///
/// `dt_ms` is milliseconds since last call. Internally steps movement in
/// `current_interval_ms` increments. Returns true if the game state changed.
pub fn tick_snake<R: Rng>(game: &mut SnakeGame, dt_ms: u64, rng: &mut R) -> bool {
    if game.phase != GamePhase::Playing {
        return false;
    }

    // Clamp dt to prevent a burst of steps after a stall
    let dt_ms = dt_ms.min(MAX_DT_MS);

    game.accumulated_time_ms += dt_ms;
    let mut changed = false;

    loop {
        let interval = game.current_interval_ms();
        if game.accumulated_time_ms < interval {
            break;
        }
        game.accumulated_time_ms -= interval;
        step_snake(game, rng);
        changed = true;

        if game.phase != GamePhase::Playing {
            break;
        }
    }

    changed
}

/// Single movement step.
pub fn step_snake<R: Rng>(game: &mut SnakeGame, rng: &mut R) {
    if game.phase != GamePhase::Playing {
        return;
    }

    let interval_before = game.current_interval_ms();
    game.clock_ms += interval_before;
    game.tick_count += 1;
    age_effects(game);
    game.boost_ticks = game.boost_ticks.saturating_sub(1);

    // Apply buffered direction
    game.direction = game.next_direction;

    let Some(head) = game.head() else {
        return;
    };
    let new_head = head.step(game.direction);

    if !game.grid.contains(new_head.x, new_head.y) {
        end_game(game, GameOverCause::Wall);
        return;
    }

    // The tail has not moved yet, so it counts as body.
    if game.snake.contains(&new_head) {
        end_game(game, GameOverCause::SelfCollision);
        return;
    }

    game.snake.push_front(new_head);

    let mut grew = false;
    if let Some(index) = game.foods.iter().position(|f| f.pos == new_head) {
        let food = game.foods.remove(index);
        if !eat_food(game, &food) {
            game.snake.pop_back();
            end_game(game, GameOverCause::Bomb);
            return;
        }
        grew = true;
    } else if game.ghost.as_ref().is_some_and(|g| g.pos == new_head) {
        game.ghost = None;
        let points = game.config.ghost_points;
        add_score(game, points);
        push_popup(game, new_head, format!("+{} GHOST", points), false);
        debug!(points, "ghost food eaten");
        grew = true;
    }

    if !grew {
        game.snake.pop_back();
    }

    maintain_food(game, rng);
    move_ghost(game, rng);
    update_level(game);
    restart_timer_if_changed(game, interval_before);
}

/// Apply a food's points and effect. Returns false if it ends the run.
fn eat_food(game: &mut SnakeGame, food: &Food) -> bool {
    let points = food.kind.points();
    debug!(kind = food.kind.name(), points, id = food.id, "food eaten");

    match food.kind.effect() {
        FoodEffect::Death => return false,
        FoodEffect::Turbo => {
            add_score(game, points);
            game.boost_ticks = game.config.boost_ticks;
            push_popup(game, food.pos, format!("+{} TURBO", points), false);
        }
        FoodEffect::Poison => {
            add_score(game, points);
            game.poison_flash_ticks = POISON_FLASH_TICKS;
            push_popup(game, food.pos, points.to_string(), true);
        }
        FoodEffect::None => {
            add_score(game, points);
            push_popup(game, food.pos, format!("+{}", points), false);
        }
    }

    let respawn_at = game.clock_ms + FOOD_RESPAWN_AFTER_EAT_MS;
    game.next_food_spawn_ms = game.next_food_spawn_ms.min(respawn_at);
    true
}

fn add_score(game: &mut SnakeGame, delta: i64) {
    game.score = game.score.saturating_add(delta);
    if !game.config.allow_negative_score {
        game.score = game.score.max(0);
    }
}

fn push_popup(game: &mut SnakeGame, pos: Position, text: String, negative: bool) {
    game.popups.push(ScorePopup {
        pos,
        text,
        ticks_left: POPUP_TICKS,
        negative,
    });
}

fn age_effects(game: &mut SnakeGame) {
    for popup in &mut game.popups {
        popup.ticks_left = popup.ticks_left.saturating_sub(1);
    }
    game.popups.retain(|p| p.ticks_left > 0);
    game.poison_flash_ticks = game.poison_flash_ticks.saturating_sub(1);
}

/// Place one food on a free cell. Gives up quietly when the board is too full.
fn spawn_food<R: Rng>(game: &mut SnakeGame, rng: &mut R) -> bool {
    let Some(pos) = random_free_cell(&game.grid, |p| game.is_occupied(p), rng, MAX_SPAWN_ATTEMPTS)
    else {
        debug!("no free cell for food");
        return false;
    };
    let kind = pick_food_kind(&game.config.food_weights, rng.gen::<f64>());
    let id = game.alloc_id();
    game.foods.push(Food {
        pos,
        kind,
        id,
        spawned_at_ms: game.clock_ms,
    });
    true
}

fn spawn_ghost<R: Rng>(game: &mut SnakeGame, rng: &mut R) {
    let Some(pos) = random_free_cell(&game.grid, |p| game.is_occupied(p), rng, MAX_SPAWN_ATTEMPTS)
    else {
        return;
    };
    let id = game.alloc_id();
    game.ghost = Some(GhostFood {
        pos,
        id,
        ticks_until_move: game.config.ghost_move_interval_ticks,
    });
    debug!(x = pos.x, y = pos.y, "ghost food appeared");
}

fn schedule_next_spawn<R: Rng>(game: &mut SnakeGame, rng: &mut R) {
    let lo = game.config.food_spawn_min_ms;
    let hi = game.config.food_spawn_max_ms.max(lo);
    game.next_food_spawn_ms = game.clock_ms + rng.gen_range(lo..=hi);
}

/// Keep the minimum food count, and on each spawn deadline add one food and
/// maybe a ghost.
fn maintain_food<R: Rng>(game: &mut SnakeGame, rng: &mut R) {
    while game.foods.len() < game.config.min_foods {
        if !spawn_food(game, rng) {
            break;
        }
    }

    if game.clock_ms >= game.next_food_spawn_ms {
        if game.foods.len() < game.config.max_foods {
            spawn_food(game, rng);
        }
        if game.ghost.is_none() && rng.gen::<f64>() < game.config.ghost_spawn_chance {
            spawn_ghost(game, rng);
        }
        schedule_next_spawn(game, rng);
    }
}

fn move_ghost<R: Rng>(game: &mut SnakeGame, rng: &mut R) {
    let Some(mut ghost) = game.ghost.take() else {
        return;
    };

    ghost.ticks_until_move = ghost.ticks_until_move.saturating_sub(1);
    if ghost.ticks_until_move > 0 {
        game.ghost = Some(ghost);
        return;
    }

    match ghost_step(ghost.pos, &game.grid, |p| game.is_occupied(p), rng) {
        GhostMove::Moved(pos) => {
            ghost.pos = pos;
            ghost.ticks_until_move = game.config.ghost_move_interval_ticks;
            game.ghost = Some(ghost);
        }
        GhostMove::Escaped => debug!(id = ghost.id, "ghost food escaped"),
    }
}

fn update_level(game: &mut SnakeGame) {
    let level = game.config.level_for_score(game.score);
    if level > game.level {
        game.level = level;
        game.level_interval_ms = game.config.interval_for_level(level);
        if let Some(head) = game.head() {
            push_popup(game, head, format!("LEVEL {}", level), false);
        }
        info!(level, interval_ms = game.level_interval_ms, "level up");
    }
}

/// Restart the tick timer when the effective interval changed.
fn restart_timer_if_changed(game: &mut SnakeGame, interval_before: u64) {
    if game.current_interval_ms() != interval_before {
        game.accumulated_time_ms = 0;
    }
}

fn end_game(game: &mut SnakeGame, cause: GameOverCause) {
    game.phase = GamePhase::GameOver;
    game.game_over_cause = Some(cause);

    let new_high_score = game.score > game.high_score;
    if new_high_score {
        game.high_score = game.score;
        info!(score = game.score, "new high score");
    }
    info!(
        score = game.score,
        level = game.level,
        length = game.snake.len(),
        cause = ?cause,
        "game over"
    );

    game.finished_reported = false;
    game.finished = Some(FinishedRun {
        score: game.score,
        level: game.level,
        length: game.snake.len(),
        cause,
        duration_ms: game.clock_ms,
        new_high_score,
    });
}

//! Terminal input mapping.
//!
//! Turns crossterm key and mouse events into `GameInput`s. Mouse drags stand
//! in for touch swipes.

use crate::constants::{SWIPE_DEBOUNCE_MS, SWIPE_THRESHOLD_CELLS};
use crate::game::{Direction, GameInput};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Map a key press to a game action.
pub fn map_key(key: KeyEvent) -> GameInput {
    if key.kind == KeyEventKind::Release {
        return GameInput::Other;
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let arrow = match key.code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = arrow {
        return if shift {
            GameInput::MoveBoost(direction)
        } else {
            GameInput::Move(direction)
        };
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') => GameInput::Move(Direction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') => GameInput::Move(Direction::Down),
        KeyCode::Char('a') | KeyCode::Char('A') => GameInput::Move(Direction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') => GameInput::Move(Direction::Right),
        KeyCode::Char(' ') => GameInput::Pause,
        KeyCode::Enter => GameInput::Start,
        KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Tab | KeyCode::BackTab => {
            GameInput::Boost
        }
        KeyCode::Char('r') | KeyCode::Char('R') => GameInput::Restart,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => GameInput::Quit,
        _ => GameInput::Other,
    }
}

/// Resolves mouse drags into direction swipes.
///
/// A terminal row is about twice as tall as a column is wide, so vertical
/// travel counts double against the threshold.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<(i32, i32)>,
    last_swipe_ms: Option<u64>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one mouse event. `now_ms` is any monotonic millisecond clock.
    pub fn handle(&mut self, event: MouseEvent, now_ms: u64) -> Option<Direction> {
        let here = (i32::from(event.column), i32::from(event.row));
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some(here);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let direction = self.resolve(here, now_ms)?;
                // Keep dragging to chain turns without lifting the button.
                self.origin = Some(here);
                Some(direction)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let direction = self.resolve(here, now_ms);
                self.origin = None;
                direction
            }
            _ => None,
        }
    }

    fn resolve(&mut self, here: (i32, i32), now_ms: u64) -> Option<Direction> {
        let (ox, oy) = self.origin?;
        let dx = here.0 - ox;
        let dy = (here.1 - oy) * 2;

        if dx.abs().max(dy.abs()) < SWIPE_THRESHOLD_CELLS {
            return None;
        }
        if let Some(last) = self.last_swipe_ms {
            if now_ms.saturating_sub(last) < SWIPE_DEBOUNCE_MS {
                return None;
            }
        }
        self.last_swipe_ms = Some(now_ms);

        let direction = if dx.abs() >= dy.abs() {
            if dx > 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(direction)
    }
}

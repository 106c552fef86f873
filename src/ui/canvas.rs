//! Pixel canvas for the play field.
//!
//! `paint` turns a game into a grid of colours with no terminal involved, so
//! the picture can be checked in tests. The scene packs two pixel rows into
//! one terminal row with half blocks.

use crate::constants::FOOD_INTRO_MS;
use crate::game::{Direction, FoodKind, GamePhase, Position, SnakeGame};
use ratatui::style::Color;

pub const EMPTY_BG: Color = Color::Rgb(10, 10, 14);
pub const POISON_FLASH_BG: Color = Color::Rgb(70, 0, 20);

pub const HEAD_COLOR: (u8, u8, u8) = (0, 255, 157);
pub const BODY_BRIGHT: (u8, u8, u8) = (0, 204, 125);
pub const BODY_DIM: (u8, u8, u8) = (0, 70, 45);
pub const TURBO_GLOW: (u8, u8, u8) = (255, 215, 0);
pub const EYE_COLOR: Color = Color::Rgb(5, 20, 15);
pub const GHOST_BRIGHT: Color = Color::Rgb(200, 150, 255);
pub const GHOST_DIM: Color = Color::Rgb(90, 60, 140);

/// Canvas colour for a food kind.
pub fn food_color(kind: FoodKind) -> (u8, u8, u8) {
    match kind {
        FoodKind::Apple => (255, 68, 68),
        FoodKind::Cherry => (220, 20, 60),
        FoodKind::Banana => (255, 255, 0),
        FoodKind::Turbo => (255, 215, 0),
        FoodKind::Poison => (139, 0, 139),
        FoodKind::Bomb => (255, 0, 0),
    }
}

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn lerp(from: (u8, u8, u8), to: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8;
    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Row-major pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Color>,
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Fill the pixels of one grid cell.
    fn fill_cell(&mut self, pos: Position, cell: usize, color: Color) {
        let Some((px, py)) = cell_origin(pos, cell) else {
            return;
        };
        for dy in 0..cell {
            for dx in 0..cell {
                self.set(px + dx, py + dy, color);
            }
        }
    }
}

fn cell_origin(pos: Position, cell: usize) -> Option<(usize, usize)> {
    let x = usize::try_from(pos.x).ok()?;
    let y = usize::try_from(pos.y).ok()?;
    Some((x * cell, y * cell))
}

/// Body colour for segment `index` (1 = just behind the head) of `len`.
pub fn body_color(index: usize, len: usize) -> Color {
    let t = index.saturating_sub(1) as f64 / len.saturating_sub(2).max(1) as f64;
    rgb(lerp(BODY_BRIGHT, BODY_DIM, t))
}

/// Render the board into pixels.
pub fn paint(game: &SnakeGame) -> PixelCanvas {
    let (w, h) = game.grid.pixel_size();
    let cell = usize::from(game.grid.cell_size);
    let background = if game.poison_flash_ticks > 0 {
        POISON_FLASH_BG
    } else {
        EMPTY_BG
    };
    let mut canvas = PixelCanvas::new(w, h, background);
    if cell == 0 {
        return canvas;
    }

    for food in &game.foods {
        let base = food_color(food.kind);
        let age = game.clock_ms.saturating_sub(food.spawned_at_ms);
        // Fades in from the background over the intro window.
        let color = if age < FOOD_INTRO_MS {
            let t = age as f64 / FOOD_INTRO_MS as f64;
            lerp((40, 40, 50), base, 0.4 + 0.6 * t)
        } else {
            base
        };
        canvas.fill_cell(food.pos, cell, rgb(color));
    }

    if let Some(ghost) = &game.ghost {
        let color = if game.tick_count % 4 < 2 {
            GHOST_BRIGHT
        } else {
            GHOST_DIM
        };
        canvas.fill_cell(ghost.pos, cell, color);
    }

    let len = game.snake.len();
    for (i, segment) in game.snake.iter().enumerate().skip(1) {
        canvas.fill_cell(*segment, cell, body_color(i, len));
    }

    if let Some(head) = game.head() {
        canvas.fill_cell(head, cell, head_color(game));
        if cell >= 2 && game.phase != GamePhase::Ready {
            paint_eyes(&mut canvas, head, cell, game.direction);
        }
    }

    canvas
}

/// Head colour, glowing toward gold while boosted.
pub fn head_color(game: &SnakeGame) -> Color {
    if !game.is_boosted() || game.config.boost_ticks == 0 {
        return rgb(HEAD_COLOR);
    }
    let remaining = f64::from(game.boost_ticks) / f64::from(game.config.boost_ticks);
    rgb(lerp(HEAD_COLOR, TURBO_GLOW, 0.35 + 0.65 * remaining))
}

/// Two eye pixels on the leading edge of the head.
fn paint_eyes(canvas: &mut PixelCanvas, head: Position, cell: usize, direction: Direction) {
    let Some((px, py)) = cell_origin(head, cell) else {
        return;
    };
    let far = cell - 1;
    let eyes = match direction {
        Direction::Up => [(0, 0), (far, 0)],
        Direction::Down => [(0, far), (far, far)],
        Direction::Left => [(0, 0), (0, far)],
        Direction::Right => [(far, 0), (far, far)],
    };
    for (dx, dy) in eyes {
        canvas.set(px + dx, py + dy, EYE_COLOR);
    }
}

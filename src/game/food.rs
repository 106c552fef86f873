//! Food kinds, weighted spawning and ghost-food movement.

use super::types::Position;
use super::viewport::GridSpec;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What eating a food does beyond its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodEffect {
    None,
    /// Temporary speed boost.
    Turbo,
    /// Score penalty and a screen flash.
    Poison,
    /// Ends the run.
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodKind {
    Apple,
    Cherry,
    Banana,
    Turbo,
    Poison,
    Bomb,
}

impl FoodKind {
    /// Sampling order for the cumulative-probability draw.
    pub const ALL: [FoodKind; 6] = [
        FoodKind::Apple,
        FoodKind::Cherry,
        FoodKind::Banana,
        FoodKind::Turbo,
        FoodKind::Poison,
        FoodKind::Bomb,
    ];

    pub fn points(&self) -> i64 {
        match self {
            Self::Apple => 10,
            Self::Cherry => 20,
            Self::Banana => 15,
            Self::Turbo => 5,
            Self::Poison => -20,
            Self::Bomb => 0,
        }
    }

    pub fn effect(&self) -> FoodEffect {
        match self {
            Self::Apple | Self::Cherry | Self::Banana => FoodEffect::None,
            Self::Turbo => FoodEffect::Turbo,
            Self::Poison => FoodEffect::Poison,
            Self::Bomb => FoodEffect::Death,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Apple => "Apple",
            Self::Cherry => "Cherry",
            Self::Banana => "Banana",
            Self::Turbo => "Turbo",
            Self::Poison => "Poison",
            Self::Bomb => "Bomb",
        }
    }
}

/// Relative spawn weights per food kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodWeights {
    pub apple: f64,
    pub cherry: f64,
    pub banana: f64,
    pub turbo: f64,
    pub poison: f64,
    pub bomb: f64,
}

impl Default for FoodWeights {
    fn default() -> Self {
        Self {
            apple: 0.35,
            cherry: 0.20,
            banana: 0.20,
            turbo: 0.10,
            poison: 0.10,
            bomb: 0.05,
        }
    }
}

impl FoodWeights {
    pub fn weight(&self, kind: FoodKind) -> f64 {
        match kind {
            FoodKind::Apple => self.apple,
            FoodKind::Cherry => self.cherry,
            FoodKind::Banana => self.banana,
            FoodKind::Turbo => self.turbo,
            FoodKind::Poison => self.poison,
            FoodKind::Bomb => self.bomb,
        }
    }

    fn weight_mut(&mut self, kind: FoodKind) -> &mut f64 {
        match kind {
            FoodKind::Apple => &mut self.apple,
            FoodKind::Cherry => &mut self.cherry,
            FoodKind::Banana => &mut self.banana,
            FoodKind::Turbo => &mut self.turbo,
            FoodKind::Poison => &mut self.poison,
            FoodKind::Bomb => &mut self.bomb,
        }
    }

    /// Scale weights to sum to 1. Negative or non-finite weights count as 0;
    /// an all-zero table falls back to the defaults.
    pub fn normalized(mut self) -> Self {
        for kind in FoodKind::ALL {
            let w = self.weight_mut(kind);
            if !w.is_finite() || *w < 0.0 {
                *w = 0.0;
            }
        }
        let total: f64 = FoodKind::ALL.iter().map(|&k| self.weight(k)).sum();
        if total <= 0.0 {
            return Self::default();
        }
        for kind in FoodKind::ALL {
            *self.weight_mut(kind) /= total;
        }
        self
    }
}

/// Cumulative-probability selection for one uniform `roll` in `[0, 1)`.
pub fn pick_food_kind(weights: &FoodWeights, roll: f64) -> FoodKind {
    let mut cumulative = 0.0;
    for kind in FoodKind::ALL {
        cumulative += weights.weight(kind);
        if roll < cumulative {
            return kind;
        }
    }
    // Rounding left the roll just above the total.
    FoodKind::Apple
}

/// An ordinary food item on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub pos: Position,
    pub kind: FoodKind,
    pub id: u64,
    /// Game clock at spawn, drives the intro animation.
    pub spawned_at_ms: u64,
}

/// The wandering high-value food.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostFood {
    pub pos: Position,
    pub id: u64,
    pub ticks_until_move: u32,
}

/// Pick a random cell that `is_occupied` rejects, giving up after `attempts`.
pub fn random_free_cell<R, F>(
    grid: &GridSpec,
    is_occupied: F,
    rng: &mut R,
    attempts: u32,
) -> Option<Position>
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    if grid.is_empty() {
        return None;
    }
    (0..attempts)
        .map(|_| {
            Position::new(
                rng.gen_range(0..grid.width),
                rng.gen_range(0..grid.height),
            )
        })
        .find(|&pos| !is_occupied(pos))
}

pub const KNIGHT_OFFSETS: [(i16, i16); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// The eight knight-move targets from `from`, unfiltered.
pub fn knight_moves(from: Position) -> [Position; 8] {
    KNIGHT_OFFSETS.map(|(dx, dy)| from.offset(dx, dy))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMove {
    Moved(Position),
    /// No legal target; the ghost leaves the board.
    Escaped,
}

/// Uniformly random legal knight move. No pursuit, no flight.
pub fn ghost_step<R, F>(from: Position, grid: &GridSpec, is_occupied: F, rng: &mut R) -> GhostMove
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    let candidates: Vec<Position> = knight_moves(from)
        .into_iter()
        .filter(|p| grid.contains(p.x, p.y) && !is_occupied(*p))
        .collect();

    match candidates.choose(rng) {
        Some(&pos) => GhostMove::Moved(pos),
        None => GhostMove::Escaped,
    }
}

//! Engine configuration.
//!
//! Score floor, speed curve, food weights and the ghost are plain data
//! here, so rule variations need no code changes.
//! Read from `~/.neon-snake/config.json`; every field is optional.

use crate::constants::*;
use crate::game::food::FoodWeights;
use crate::game::viewport::GridSizing;
use crate::utils::persistence::{data_path, load_json_or_default};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When false, poison cannot push the score below zero.
    pub allow_negative_score: bool,

    pub base_interval_ms: u64,
    pub min_interval_ms: u64,
    /// Interval reduction per level above 1.
    pub interval_step_ms: u64,
    pub boost_interval_ms: u64,
    pub boost_ticks: u32,
    pub points_per_level: i64,

    pub min_foods: usize,
    pub max_foods: usize,
    pub food_spawn_min_ms: u64,
    pub food_spawn_max_ms: u64,
    pub food_weights: FoodWeights,

    pub ghost_spawn_chance: f64,
    pub ghost_points: i64,
    pub ghost_move_interval_ticks: u32,

    pub grid: GridSizing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_negative_score: false,
            base_interval_ms: BASE_INTERVAL_MS,
            min_interval_ms: MIN_INTERVAL_MS,
            interval_step_ms: INTERVAL_STEP_MS,
            boost_interval_ms: BOOST_INTERVAL_MS,
            boost_ticks: BOOST_TICKS,
            points_per_level: POINTS_PER_LEVEL,
            min_foods: MIN_FOODS,
            max_foods: MAX_FOODS,
            food_spawn_min_ms: FOOD_SPAWN_MIN_MS,
            food_spawn_max_ms: FOOD_SPAWN_MAX_MS,
            food_weights: FoodWeights::default(),
            ghost_spawn_chance: GHOST_SPAWN_CHANCE,
            ghost_points: GHOST_POINTS,
            ghost_move_interval_ticks: GHOST_MOVE_INTERVAL_TICKS,
            grid: GridSizing::default(),
        }
    }
}

impl EngineConfig {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match data_path(CONFIG_FILE) {
            Ok(path) => Self::load_from(&path),
            Err(_) => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        load_json_or_default::<Self>(path).validated()
    }

    /// Clamp values into a range the engine can run with.
    pub fn validated(mut self) -> Self {
        self.min_interval_ms = self.min_interval_ms.max(1);
        self.base_interval_ms = self.base_interval_ms.max(self.min_interval_ms);
        self.boost_interval_ms = self.boost_interval_ms.max(1);
        self.points_per_level = self.points_per_level.max(1);
        self.ghost_move_interval_ticks = self.ghost_move_interval_ticks.max(1);
        self.ghost_spawn_chance = if self.ghost_spawn_chance.is_finite() {
            self.ghost_spawn_chance.clamp(0.0, 1.0)
        } else {
            GHOST_SPAWN_CHANCE
        };
        self.max_foods = self.max_foods.max(1);
        self.min_foods = self.min_foods.min(self.max_foods);
        if self.food_spawn_max_ms < self.food_spawn_min_ms {
            std::mem::swap(&mut self.food_spawn_min_ms, &mut self.food_spawn_max_ms);
        }
        self.food_weights = self.food_weights.normalized();
        self.grid = self.grid.validated();
        self
    }

    /// Tick interval for a level, before any boost.
    pub fn interval_for_level(&self, level: u32) -> u64 {
        let reduction = self
            .interval_step_ms
            .saturating_mul(u64::from(level.saturating_sub(1)));
        self.base_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms)
    }

    pub fn level_for_score(&self, score: i64) -> u32 {
        let level = score.max(0) / self.points_per_level + 1;
        u32::try_from(level).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert!(!config.allow_negative_score);
        assert_eq!(config.base_interval_ms, 150);
        assert_eq!(config.boost_interval_ms, 75);
        assert_eq!(config.max_foods, 5);
    }

    #[test]
    fn test_interval_curve_is_monotonic_with_floor() {
        let config = EngineConfig::default();
        assert_eq!(config.interval_for_level(1), 150);
        assert_eq!(config.interval_for_level(2), 140);
        let mut previous = config.interval_for_level(1);
        for level in 2..200 {
            let interval = config.interval_for_level(level);
            assert!(interval <= previous);
            assert!(interval >= config.min_interval_ms);
            previous = interval;
        }
        assert_eq!(config.interval_for_level(u32::MAX), config.min_interval_ms);
    }

    #[test]
    fn test_level_for_score() {
        let config = EngineConfig::default();
        assert_eq!(config.level_for_score(-50), 1);
        assert_eq!(config.level_for_score(0), 1);
        assert_eq!(config.level_for_score(99), 1);
        assert_eq!(config.level_for_score(100), 2);
        assert_eq!(config.level_for_score(250), 3);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let path = std::env::temp_dir().join(format!(
            "neon-snake-config-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "allow_negative_score": true, "max_foods": 3 }"#).unwrap();

        let config = EngineConfig::load_from(&path);
        assert!(config.allow_negative_score);
        assert_eq!(config.max_foods, 3);
        assert_eq!(config.base_interval_ms, BASE_INTERVAL_MS);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = EngineConfig::load_from(Path::new("/definitely/not/here.json"));
        assert_eq!(config, EngineConfig::default().validated());
    }

    #[test]
    fn test_validation_clamps_nonsense() {
        let config = EngineConfig {
            min_interval_ms: 0,
            base_interval_ms: 0,
            min_foods: 9,
            max_foods: 4,
            food_spawn_min_ms: 5000,
            food_spawn_max_ms: 1000,
            ghost_spawn_chance: 7.0,
            ..EngineConfig::default()
        }
        .validated();
        assert_eq!(config.min_interval_ms, 1);
        assert_eq!(config.base_interval_ms, 1);
        assert_eq!(config.min_foods, 4);
        assert_eq!(config.food_spawn_min_ms, 1000);
        assert_eq!(config.food_spawn_max_ms, 5000);
        assert_eq!(config.ghost_spawn_chance, 1.0);
    }
}

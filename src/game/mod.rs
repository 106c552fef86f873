//! Snake game core.
//!
//! The player steers a snake around a grid sized from the terminal, eating
//! weighted-random food. Some food helps (turbo), some hurts (poison) and one
//! kind ends the run outright (bomb). A ghost food hops around the board in
//! knight moves and is worth a bonus if caught.

pub mod food;
pub mod logic;
pub mod types;
pub mod viewport;

pub use food::{Food, FoodEffect, FoodKind, FoodWeights, GhostFood};
pub use logic::*;
pub use types::*;
pub use viewport::{GridSizing, GridSpec};

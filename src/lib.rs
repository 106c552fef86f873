//! Neon Snake - terminal snake with weighted food, boosts and a ghost.
//!
//! This module exposes the game logic for testing and for the binary.

pub mod config;
pub mod constants;
pub mod game;
pub mod input;
pub mod ui;
pub mod utils;

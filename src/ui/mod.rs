//! Terminal rendering.

pub mod canvas;
pub mod game_common;
pub mod snake_scene;

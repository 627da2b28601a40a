//! Grid snake simulation core: a snake that moves one cell per tick, grows
//! by eating food and dies on walls or its own body.
//!
//! Rendering, input and frame pacing belong to the caller, which drives a
//! [`Game`] through `steer`, `update`, `toggle_pause` and `restart`.

pub mod logger;

pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod policy;
pub mod rng;
pub mod snake;

pub use config::{GameConfig, Validate};
pub use food::Food;
pub use game::{EndReason, Game, Status, Tick};
pub use grid::{Direction, Grid, Position};
pub use policy::SpeedPolicy;
pub use rng::GameRng;
pub use snake::{Collision, Snake, Step};

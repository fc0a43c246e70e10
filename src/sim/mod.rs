//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters as frame timestamps and countdown ticks
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use autopilot::suggest_command;
pub use collision::{basket_catches, catch_reach, centers_within};
pub use state::{
    Basket, FallingItem, FruitKind, GameEvent, GamePhase, GameState, ItemKind, ItemType,
};
pub use tick::{apply_command, collect, countdown, frame, roll_item_type, spawn_item};

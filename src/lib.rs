//! Fruit Catch - a pose-controlled falling item game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (basket, items, collisions, game state)
//! - `engine`: Round lifecycle, deterministic stepping and notifications
//! - `input`: Gesture commands and pose label mapping
//! - `renderer`: Display list generation and Canvas 2D painting
//! - `platform`: Browser integration (frame loop, countdown, listeners)
//! - `settings` / `tuning`: Preferences and data-driven game balance

pub mod engine;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::GameEngine;
pub use input::GestureCommand;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Basket sprite is square
    pub const BASKET_SIZE: f32 = 80.0;
    /// Gap between basket bottom and canvas bottom
    pub const BASKET_BOTTOM_MARGIN: f32 = 10.0;

    /// Falling item sprite is square
    pub const ITEM_SIZE: f32 = 50.0;
    /// Items start just above the visible area
    pub const ITEM_SPAWN_Y: f32 = -50.0;
    /// Items deactivate once they fall past this y (independent of canvas height)
    pub const ITEM_DESPAWN_Y: f32 = 600.0;

    /// Lane centers as fractions of canvas width
    pub const LANE_CENTERS: [f32; 3] = [1.0 / 6.0, 3.0 / 6.0, 5.0 / 6.0];

    /// Countdown interval
    pub const TIMER_INTERVAL_MS: f64 = 1000.0;
    /// Nominal display refresh used by the native demo
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Glyph sizes
    pub const BASKET_FONT_PX: f32 = 60.0;
    pub const ITEM_FONT_PX: f32 = 40.0;
}

/// Canvas dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of one of the three lanes
    #[inline]
    pub fn section_width(&self) -> f32 {
        self.width / 3.0
    }
}

/// Center of an axis-aligned square given its top-left corner
#[inline]
pub fn square_center(top_left: Vec2, size: f32) -> Vec2 {
    top_left + Vec2::splat(size / 2.0)
}

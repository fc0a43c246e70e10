//! Data-driven game balance
//!
//! Everything that shapes difficulty lives here so a round can be retuned
//! from JSON without touching simulation code.

use serde::{Deserialize, Serialize};

/// Fastest base fall speed accepted from config, pixels per frame
const MAX_FALL_SPEED: f32 = 1000.0;

/// Replace a non-finite float with its default
macro_rules! reset_non_finite {
    ($tuning:expr, $defaults:expr, $($field:ident),+ $(,)?) => {
        $(
            if !$tuning.$field.is_finite() {
                log::warn!(
                    "{} {} is not finite, using default",
                    stringify!($field),
                    $tuning.$field
                );
                $tuning.$field = $defaults.$field;
            }
        )+
    };
}

/// Balance knobs for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Round length in seconds
    pub round_seconds: u32,
    /// Fraction of the remaining gap the basket covers each frame
    pub basket_smoothing: f32,
    /// Gap below which the basket snaps onto its target
    pub basket_snap_distance: f32,
    /// Inward tolerance subtracted from the basket/item hit radius
    pub catch_tolerance: f32,

    /// Spawn cadence at level 0 (ms)
    pub base_spawn_interval_ms: f64,
    /// Spawn cadence floor (ms)
    pub min_spawn_interval_ms: f64,
    /// Cadence reduction per level (ms)
    pub spawn_interval_step_ms: f64,

    /// Score needed per level
    pub points_per_level: u32,
    /// Extra fall speed per level above 1 (multiplicative)
    pub level_speed_step: f32,

    /// Bomb probability at level 0
    pub bomb_chance_base: f32,
    /// Bomb probability added per level
    pub bomb_chance_per_level: f32,
    /// Rolls above this (and not a bomb) spawn gold
    pub gold_roll_threshold: f32,

    /// Base fall speed range, pixels per frame
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_seconds: 60,
            basket_smoothing: 0.1,
            basket_snap_distance: 0.5,
            catch_tolerance: 10.0,

            base_spawn_interval_ms: 1500.0,
            min_spawn_interval_ms: 500.0,
            spawn_interval_step_ms: 100.0,

            points_per_level: 500,
            level_speed_step: 0.1,

            bomb_chance_base: 0.1,
            bomb_chance_per_level: 0.02,
            gold_roll_threshold: 0.8,

            fall_speed_min: 3.0,
            fall_speed_max: 5.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Clamp values into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        reset_non_finite!(
            self,
            defaults,
            basket_smoothing,
            basket_snap_distance,
            catch_tolerance,
            base_spawn_interval_ms,
            min_spawn_interval_ms,
            spawn_interval_step_ms,
            level_speed_step,
            bomb_chance_base,
            bomb_chance_per_level,
            gold_roll_threshold,
            fall_speed_min,
            fall_speed_max,
        );

        self.round_seconds = self.round_seconds.max(1);
        if !(self.basket_smoothing > 0.0 && self.basket_smoothing <= 1.0) {
            log::warn!(
                "basket_smoothing {} out of range, using default",
                self.basket_smoothing
            );
            self.basket_smoothing = defaults.basket_smoothing;
        }
        self.basket_snap_distance = self.basket_snap_distance.max(0.0);
        self.catch_tolerance = self.catch_tolerance.max(0.0);

        self.min_spawn_interval_ms = self.min_spawn_interval_ms.max(1.0);
        self.base_spawn_interval_ms = self.base_spawn_interval_ms.max(self.min_spawn_interval_ms);
        self.spawn_interval_step_ms = self.spawn_interval_step_ms.max(0.0);

        self.points_per_level = self.points_per_level.max(1);
        self.level_speed_step = self.level_speed_step.max(0.0);

        self.bomb_chance_base = self.bomb_chance_base.clamp(0.0, 1.0);
        self.bomb_chance_per_level = self.bomb_chance_per_level.max(0.0);
        self.gold_roll_threshold = self.gold_roll_threshold.clamp(0.0, 1.0);

        self.fall_speed_min = self.fall_speed_min.clamp(0.0, MAX_FALL_SPEED);
        self.fall_speed_max = self.fall_speed_max.min(MAX_FALL_SPEED + 1.0);
        if self.fall_speed_max <= self.fall_speed_min {
            // random_range needs a non-empty range
            self.fall_speed_max = self.fall_speed_min + 0.01;
        }
        self
    }

    /// Spawn cadence after a spawn at `level`
    pub fn spawn_interval_ms(&self, level: u32) -> f64 {
        (self.base_spawn_interval_ms - level as f64 * self.spawn_interval_step_ms)
            .max(self.min_spawn_interval_ms)
    }

    /// Probability that a spawn at `level` is a bomb
    pub fn bomb_chance(&self, level: u32) -> f32 {
        self.bomb_chance_base + level as f32 * self.bomb_chance_per_level
    }

    /// Fall speed multiplier applied to every item at `level`
    pub fn level_speed_multiplier(&self, level: u32) -> f32 {
        1.0 + level.saturating_sub(1) as f32 * self.level_speed_step
    }

    /// Level reached with `score` points
    pub fn level_for_score(&self, score: u32) -> u32 {
        score / self.points_per_level + 1
    }
}

//! Data-driven simulation constants
//!
//! Defaults reproduce the classic feel. Any field can be overridden from JSON;
//! missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Canvas size in logical units
    pub width: f32,
    pub height: f32,

    // === Particles ===
    pub dry_after_ms: u64,
    pub rest_speed: f32,
    pub growth_per_tick: f32,
    pub wall_restitution: f32,
    pub obstacle_restitution: f32,
    /// Use exact circle-rectangle tests for obstacles instead of the
    /// corner point test
    pub exact_obstacle_collision: bool,

    // === Gravity ===
    pub max_tilt: f32,
    pub tilt_step: f32,

    // === Brush ===
    pub base_brush_size: f32,
    pub max_hold_brush_size: f32,
    pub brush_ramp_per_ms: f32,
    pub paint_interval_ms: u64,

    // === Power-ups ===
    pub power_up_radius: f32,
    pub power_up_interval_ms: u64,
    pub size_up_factor: f32,
    pub size_up_max_brush: f32,
    pub speed_up_factor: f32,
    pub speed_up_duration_ms: u64,
    /// Selecting a gravity preset cancels pending speed-up reverts
    pub cancel_speed_up_on_preset: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,

            dry_after_ms: DRY_AFTER_MS,
            rest_speed: REST_SPEED,
            growth_per_tick: GROWTH_PER_TICK,
            wall_restitution: WALL_RESTITUTION,
            obstacle_restitution: OBSTACLE_RESTITUTION,
            exact_obstacle_collision: false,

            max_tilt: MAX_TILT,
            tilt_step: TILT_STEP,

            base_brush_size: BASE_BRUSH_SIZE,
            max_hold_brush_size: MAX_HOLD_BRUSH_SIZE,
            brush_ramp_per_ms: BRUSH_RAMP_PER_MS,
            paint_interval_ms: PAINT_INTERVAL_MS,

            power_up_radius: POWER_UP_RADIUS,
            power_up_interval_ms: POWER_UP_INTERVAL_MS,
            size_up_factor: SIZE_UP_FACTOR,
            size_up_max_brush: SIZE_UP_MAX_BRUSH,
            speed_up_factor: SPEED_UP_FACTOR,
            speed_up_duration_ms: SPEED_UP_DURATION_MS,
            cancel_speed_up_on_preset: false,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON and reject unusable values
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|e| SimError::InvalidTuning(e.to_string()))?;
        tuning.validate()?;
        log::debug!("Loaded tuning overrides: {:?}", tuning);
        Ok(tuning)
    }

    /// Sizes, radii and factors must be positive and finite; intervals
    /// must be non-zero.
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("base_brush_size", self.base_brush_size),
            ("max_hold_brush_size", self.max_hold_brush_size),
            ("power_up_radius", self.power_up_radius),
            ("size_up_factor", self.size_up_factor),
            ("size_up_max_brush", self.size_up_max_brush),
            ("speed_up_factor", self.speed_up_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidTuning(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let intervals = [
            ("paint_interval_ms", self.paint_interval_ms),
            ("power_up_interval_ms", self.power_up_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(SimError::InvalidTuning(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }

    /// Serialize the full parameter set (handy for writing an override file)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Brush size after holding the paint button for `hold_ms`
    pub fn hold_brush_size(&self, hold_ms: u64) -> f32 {
        (self.base_brush_size + hold_ms as f32 * self.brush_ramp_per_ms)
            .min(self.max_hold_brush_size)
    }
}

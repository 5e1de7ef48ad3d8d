//! Gravity Paint - falling, colliding, merging paint particles
//!
//! Core modules:
//! - `sim`: Simulation core (gravity, collisions, merging, power-ups, timers)
//! - `renderer`: Scene building and the browser Canvas 2D backend
//! - `tuning`: Data-driven simulation constants
//! - `settings`: User preferences (brush color, shape, gravity preset)

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use settings::Settings;
pub use tuning::Tuning;

/// Simulation configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Canvas dimensions in logical units
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Particles older than this are dry (no more merging or growth)
    pub const DRY_AFTER_MS: u64 = 5000;
    /// Velocity components below this count as "at rest" for growth
    pub const REST_SPEED: f32 = 0.1;
    /// Radius added per tick while resting and wet
    pub const GROWTH_PER_TICK: f32 = 0.01;

    /// Velocity multiplier on wall contact
    pub const WALL_RESTITUTION: f32 = -0.5;
    /// Velocity multiplier on obstacle contact (full reversal)
    pub const OBSTACLE_RESTITUTION: f32 = -1.0;

    /// Horizontal gravity bias limit and tilt button step
    pub const MAX_TILT: f32 = 0.5;
    pub const TILT_STEP: f32 = 0.1;

    /// Brush defaults
    pub const BASE_BRUSH_SIZE: f32 = 3.0;
    pub const MAX_HOLD_BRUSH_SIZE: f32 = 10.0;
    /// Brush size gained per millisecond of holding the paint button
    pub const BRUSH_RAMP_PER_MS: f32 = 1.0 / 100.0;
    pub const PAINT_INTERVAL_MS: u64 = 100;

    /// Power-up defaults
    pub const POWER_UP_RADIUS: f32 = 10.0;
    pub const POWER_UP_INTERVAL_MS: u64 = 10_000;
    pub const SIZE_UP_FACTOR: f32 = 1.5;
    pub const SIZE_UP_MAX_BRUSH: f32 = 20.0;
    pub const SPEED_UP_FACTOR: f32 = 1.5;
    pub const SPEED_UP_DURATION_MS: u64 = 5000;
}

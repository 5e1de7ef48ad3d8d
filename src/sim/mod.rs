//! Simulation core
//!
//! All physics and gameplay logic lives here. This module must stay free of
//! rendering and platform code:
//! - One fixed step per `tick`
//! - Seeded RNG only
//! - Timers run on the simulation clock, never on wall time

pub mod collision;
pub mod color;
pub mod gravity;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_rect_overlap, circles_overlap};
pub use color::{Rgb, blend, blend_hex};
pub use gravity::{Gravity, GravityPreset};
pub use schedule::{Missed, Scheduler, TaskId, TaskKind};
pub use spawn::{begin_paint, emit_paint, end_paint, spawn_power_up};
pub use state::{Brush, Obstacle, Particle, PowerUp, PowerUpKind, Shape, SimulationState};
pub use tick::{PaintEdge, TickInput, TickOutcome, apply_power_up, select_preset, step, tick};

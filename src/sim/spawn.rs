//! Particle and power-up emission
//!
//! Power-ups appear on a fixed interval at random positions. Paint is emitted
//! from the top-center of the canvas while the paint button is held, with the
//! brush growing the longer the hold lasts.

use glam::Vec2;
use rand::Rng;

use super::color::Rgb;
use super::schedule::{Missed, TaskKind};
use super::state::{PaintHold, Particle, PowerUpKind, Shape, SimulationState};
use crate::error::SimError;

/// Spawn a power-up at a uniformly random canvas position (50/50 kind)
pub fn spawn_power_up(state: &mut SimulationState) -> u32 {
    let x = state.rng.random_range(0.0..state.tuning.width);
    let y = state.rng.random_range(0.0..state.tuning.height);
    let kind = if state.rng.random_bool(0.5) {
        PowerUpKind::SizeUp
    } else {
        PowerUpKind::SpeedUp
    };

    let id = state.add_power_up(Vec2::new(x, y), kind);
    log::debug!("Spawned {:?} power-up #{} at ({:.0}, {:.0})", kind, id, x, y);
    id
}

/// Start a press-and-hold paint stroke. Ignored if one is already running.
///
/// A stalled frame emits once rather than replaying every missed interval.
pub fn begin_paint(state: &mut SimulationState) -> bool {
    if state.brush.hold.is_some() {
        return false;
    }

    let task = state.scheduler.schedule_repeating(
        TaskKind::EmitPaint,
        state.now_ms,
        state.tuning.paint_interval_ms,
        Missed::Skip,
    );
    state.brush.hold = Some(PaintHold {
        started_ms: state.now_ms,
        task,
    });
    true
}

/// Release the paint button: stop emitting and reset the brush size.
///
/// Returns whether a stroke was in progress.
pub fn end_paint(state: &mut SimulationState) -> bool {
    state.brush.size = state.tuning.base_brush_size;
    match state.brush.hold.take() {
        Some(hold) => {
            state.scheduler.cancel(hold.task);
            true
        }
        None => false,
    }
}

/// Emit one particle for the held stroke, as of `at_ms`.
///
/// The brush size ramps with hold duration before the particle is created.
pub fn emit_paint(state: &mut SimulationState, at_ms: u64) -> Option<u32> {
    let hold = state.brush.hold?;
    let hold_ms = at_ms.saturating_sub(hold.started_ms);
    state.brush.size = state.tuning.hold_brush_size(hold_ms);

    let id = state.next_entity_id();
    let origin = Vec2::new(state.tuning.width / 2.0, 0.0);
    state.particles.push(Particle::new(
        id,
        origin,
        state.brush.color,
        state.brush.size,
        state.brush.shape,
        at_ms,
    ));
    Some(id)
}

/// Brush size slider. Sizes below 1 are raised to 1 so radii stay positive.
pub fn set_brush_size(state: &mut SimulationState, size: u32) {
    state.brush.size = (size as f32).max(1.0);
}

/// Color picker. Malformed colors keep the current brush color.
pub fn set_brush_color(state: &mut SimulationState, hex: &str) -> Result<Rgb, SimError> {
    let color = Rgb::from_hex(hex)?;
    state.brush.color = color;
    Ok(color)
}

pub fn set_brush_shape(state: &mut SimulationState, shape: Shape) {
    state.brush.shape = shape;
}

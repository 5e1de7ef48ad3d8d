//! Draw list generation
//!
//! Turns simulation state into an ordered list of 2D primitives. Backends only
//! have to know how to fill rectangles, circles and triangles.

use glam::Vec2;

use crate::sim::{PowerUpKind, Rgb, Shape, SimulationState};

/// Colors for scene elements
pub mod colors {
    use crate::sim::Rgb;

    pub const OBSTACLE: Rgb = Rgb::new(128, 128, 128);
    pub const SIZE_UP: Rgb = Rgb::new(0, 128, 0);
    pub const SPEED_UP: Rgb = Rgb::new(0, 0, 255);
}

/// A filled 2D primitive in canvas coordinates (+y down)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Reset the whole canvas to transparent
    Clear,
    /// Axis-aligned rectangle from its top-left corner
    Rect {
        min: Vec2,
        size: Vec2,
        color: Rgb,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
    },
    Triangle { points: [Vec2; 3], color: Rgb },
}

pub fn power_up_color(kind: PowerUpKind) -> Rgb {
    match kind {
        PowerUpKind::SizeUp => colors::SIZE_UP,
        PowerUpKind::SpeedUp => colors::SPEED_UP,
    }
}

/// Primitive for a particle of the given shape
pub fn particle_shape(shape: Shape, center: Vec2, radius: f32, color: Rgb) -> DrawCommand {
    match shape {
        Shape::Circle => DrawCommand::Circle {
            center,
            radius,
            color,
        },
        Shape::Square => DrawCommand::Rect {
            min: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
            color,
        },
        // Apex up, base on the bottom of the bounding box
        Shape::Triangle => DrawCommand::Triangle {
            points: [
                Vec2::new(center.x, center.y - radius),
                Vec2::new(center.x - radius, center.y + radius),
                Vec2::new(center.x + radius, center.y + radius),
            ],
            color,
        },
    }
}

/// Build the frame: clear, obstacles, power-ups, then particles
pub fn build_scene(state: &SimulationState) -> Vec<DrawCommand> {
    let mut commands =
        Vec::with_capacity(1 + state.obstacles.len() + state.power_ups.len() + state.particles.len());

    commands.push(DrawCommand::Clear);

    for obstacle in &state.obstacles {
        commands.push(DrawCommand::Rect {
            min: obstacle.rect.min(),
            size: Vec2::new(obstacle.rect.width, obstacle.rect.height),
            color: colors::OBSTACLE,
        });
    }

    for power_up in &state.power_ups {
        commands.push(DrawCommand::Circle {
            center: power_up.pos,
            radius: power_up.radius,
            color: power_up_color(power_up.kind),
        });
    }

    for p in &state.particles {
        commands.push(particle_shape(p.shape, p.pos, p.radius(), p.color));
    }

    commands
}

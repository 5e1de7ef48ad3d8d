//! Simulation state and entity types
//!
//! Everything the simulation mutates lives in [`SimulationState`], which is
//! passed by `&mut` to every subsystem. There are no globals.

use std::f32::consts::PI;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, circle_rect_overlap, circles_overlap};
use super::color::{Rgb, blend};
use super::gravity::{Gravity, GravityPreset};
use super::schedule::{Missed, Scheduler, TaskId, TaskKind};
use crate::tuning::Tuning;

/// Particle silhouette (rendering only; collisions always use the radius)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "circle" => Some(Shape::Circle),
            "square" => Some(Shape::Square),
            "triangle" => Some(Shape::Triangle),
            _ => None,
        }
    }
}

/// Area of a circle of radius `r`; a particle's mass by definition
#[inline]
pub fn mass_for_radius(r: f32) -> f32 {
    PI * r * r
}

/// A blob of paint
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub shape: Shape,
    /// Simulation clock time the paint was laid down (oldest source for merges)
    pub created_ms: u64,
    radius: f32,
    mass: f32,
    is_dry: bool,
}

impl Particle {
    pub fn new(id: u32, pos: Vec2, color: Rgb, size: f32, shape: Shape, now_ms: u64) -> Self {
        debug_assert!(size > 0.0, "particle radius must be positive");
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            color,
            shape,
            created_ms: now_ms,
            radius: size,
            mass: mass_for_radius(size),
            is_dry: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn is_dry(&self) -> bool {
        self.is_dry
    }

    /// Change the radius, keeping mass = π·r²
    pub fn set_radius(&mut self, r: f32) {
        self.radius = r;
        self.mass = mass_for_radius(r);
    }

    /// Dry out once older than `dry_after_ms`. Never un-dries.
    pub fn dry_if_old(&mut self, now_ms: u64, dry_after_ms: u64) {
        if now_ms.saturating_sub(self.created_ms) > dry_after_ms {
            self.is_dry = true;
        }
    }

    /// Age check, gravity integration, wall and obstacle response.
    ///
    /// Walls: left, right and floor reflect with `wall_restitution`; the top
    /// is open. Obstacles reverse the full velocity once per overlapping
    /// obstacle.
    pub fn update_motion(
        &mut self,
        gravity: Vec2,
        obstacles: &[Obstacle],
        tuning: &Tuning,
        now_ms: u64,
    ) {
        self.dry_if_old(now_ms, tuning.dry_after_ms);

        // Explicit Euler, one tick per step
        self.vel += gravity;
        self.pos += self.vel;

        let r = self.radius;
        if self.pos.x < r {
            self.pos.x = r;
            self.vel.x *= tuning.wall_restitution;
        }
        if self.pos.x > tuning.width - r {
            self.pos.x = tuning.width - r;
            self.vel.x *= tuning.wall_restitution;
        }
        if self.pos.y > tuning.height - r {
            self.pos.y = tuning.height - r;
            self.vel.y *= tuning.wall_restitution;
        }

        for obstacle in obstacles {
            if obstacle.hits(self.pos, r, tuning.exact_obstacle_collision) {
                self.vel *= tuning.obstacle_restitution;
            }
        }
    }

    /// Grow while wet and at rest. Returns whether the particle grew.
    pub fn grow(&mut self, tuning: &Tuning) -> bool {
        let resting =
            self.vel.x.abs() < tuning.rest_speed && self.vel.y.abs() < tuning.rest_speed;
        if self.is_dry || !resting {
            return false;
        }
        self.set_radius(self.radius + tuning.growth_per_tick);
        true
    }

    #[inline]
    pub fn overlaps(&self, other: &Particle) -> bool {
        circles_overlap(self.pos, self.radius, other.pos, other.radius)
    }

    /// Combine two particles into a new one with id `id`.
    ///
    /// Mass is the exact sum; position and velocity are mass-weighted; color
    /// is blended by `a`'s mass fraction; shape comes from `a`; the creation
    /// time is the older of the two so drying is not postponed.
    pub fn merge(id: u32, a: &Particle, b: &Particle) -> Particle {
        let total = a.mass + b.mass;
        let pos = (a.pos * a.mass + b.pos * b.mass) / total;
        let vel = (a.vel * a.mass + b.vel * b.mass) / total;

        Particle {
            id,
            pos,
            vel,
            color: blend(a.color, b.color, a.mass / total),
            shape: a.shape,
            created_ms: a.created_ms.min(b.created_ms),
            radius: (total / PI).sqrt(),
            mass: total,
            is_dry: false,
        }
    }
}

/// A static rectangular obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    /// Whether a circle hits this obstacle.
    ///
    /// The default test only checks the rectangle's raw `(x, y)` corner as a
    /// point, so paint mostly passes through obstacles. `exact` uses true
    /// circle-rectangle overlap.
    pub fn hits(&self, center: Vec2, radius: f32, exact: bool) -> bool {
        if exact {
            circle_rect_overlap(center, radius, &self.rect)
        } else {
            circles_overlap(center, radius, self.rect.min(), 0.0)
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Bigger brush for future paint
    SizeUp,
    /// Temporarily stronger vertical gravity
    SpeedUp,
}

/// A collectible power-up
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
}

/// An in-progress press-and-hold on the paint button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintHold {
    pub started_ms: u64,
    pub task: TaskId,
}

/// Brush parameters applied to newly emitted particles
#[derive(Debug, Clone)]
pub struct Brush {
    pub size: f32,
    pub color: Rgb,
    pub shape: Shape,
    pub hold: Option<PaintHold>,
}

/// Complete simulation session state
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock (ms), set by the host each tick
    pub now_ms: u64,
    /// Ticks simulated so far
    pub time_ticks: u64,
    pub gravity: Gravity,
    pub brush: Brush,
    /// Live particles in scan order
    pub particles: Vec<Particle>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub scheduler: Scheduler,
    pub tuning: Tuning,
    /// Lifetime counters (diagnostics only)
    pub total_merges: u64,
    pub total_collected: u64,
    next_id: u32,
}

impl SimulationState {
    /// Create a session with default tuning, starting at `now_ms`
    pub fn new(seed: u64, now_ms: u64) -> Self {
        Self::with_tuning(seed, now_ms, Tuning::default())
    }

    /// Create a session with custom tuning (see [`Tuning::validate`])
    pub fn with_tuning(seed: u64, now_ms: u64, tuning: Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unusable tuning: {:?}", tuning);
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(
            TaskKind::SpawnPowerUp,
            now_ms,
            tuning.power_up_interval_ms,
            Missed::CatchUp,
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            now_ms,
            time_ticks: 0,
            gravity: Gravity::new(GravityPreset::Earth, tuning.max_tilt),
            brush: Brush {
                size: tuning.base_brush_size,
                color: Rgb::BLACK,
                shape: Shape::Circle,
                hold: None,
            },
            particles: Vec::new(),
            obstacles: vec![
                Obstacle::new(100.0, 200.0, 50.0, 20.0),
                Obstacle::new(250.0, 150.0, 20.0, 100.0),
            ],
            power_ups: Vec::new(),
            scheduler,
            tuning,
            total_merges: 0,
            total_collected: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a particle at `pos` with velocity zero
    pub fn add_particle(&mut self, pos: Vec2, color: Rgb, size: f32, shape: Shape) -> u32 {
        let id = self.next_entity_id();
        self.particles
            .push(Particle::new(id, pos, color, size, shape, self.now_ms));
        id
    }

    pub fn add_power_up(&mut self, pos: Vec2, kind: PowerUpKind) -> u32 {
        let id = self.next_entity_id();
        let radius = self.tuning.power_up_radius;
        self.power_ups.push(PowerUp {
            id,
            pos,
            radius,
            kind,
        });
        id
    }

    /// Sum of particle masses (conserved by merging)
    pub fn total_mass(&self) -> f32 {
        self.particles.iter().map(Particle::mass).sum()
    }
}

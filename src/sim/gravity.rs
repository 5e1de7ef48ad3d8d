//! Gravity presets and the live gravity vector
//!
//! Gravity is an acceleration in canvas units per tick². +y points down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Named gravity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GravityPreset {
    #[default]
    Earth,
    Moon,
    Jupiter,
    Sun,
    BlackHole,
}

impl GravityPreset {
    pub const ALL: [GravityPreset; 5] = [
        GravityPreset::Earth,
        GravityPreset::Moon,
        GravityPreset::Jupiter,
        GravityPreset::Sun,
        GravityPreset::BlackHole,
    ];

    /// Selector value (matches the `<option>` values in the page)
    pub fn as_str(&self) -> &'static str {
        match self {
            GravityPreset::Earth => "earth",
            GravityPreset::Moon => "moon",
            GravityPreset::Jupiter => "jupiter",
            GravityPreset::Sun => "sun",
            GravityPreset::BlackHole => "blackHole",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "earth" => Some(GravityPreset::Earth),
            "moon" => Some(GravityPreset::Moon),
            "jupiter" => Some(GravityPreset::Jupiter),
            "sun" => Some(GravityPreset::Sun),
            "blackhole" | "black_hole" | "black-hole" => Some(GravityPreset::BlackHole),
            _ => None,
        }
    }

    /// Acceleration vector for this preset
    pub fn vector(&self) -> Vec2 {
        match self {
            GravityPreset::Earth => Vec2::new(0.0, 0.5),
            GravityPreset::Moon => Vec2::new(0.0, 0.08),
            GravityPreset::Jupiter => Vec2::new(0.0, 1.2),
            GravityPreset::Sun => Vec2::new(0.0, 27.95),
            GravityPreset::BlackHole => Vec2::new(0.0, 50.0),
        }
    }
}

/// The session's current gravity
#[derive(Debug, Clone)]
pub struct Gravity {
    current: Vec2,
    /// Limit for the horizontal tilt bias
    max_tilt: f32,
}

impl Gravity {
    pub fn new(preset: GravityPreset, max_tilt: f32) -> Self {
        Self {
            current: preset.vector(),
            max_tilt,
        }
    }

    #[inline]
    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Replace gravity wholesale (tests, scripted scenes)
    pub fn set(&mut self, g: Vec2) {
        self.current = g;
    }

    /// Switch to a preset by selector name.
    ///
    /// Unknown names leave gravity untouched.
    pub fn set_preset(&mut self, name: &str) -> Result<Vec2, SimError> {
        let preset = GravityPreset::from_str(name)
            .ok_or_else(|| SimError::UnknownGravityPreset(name.to_string()))?;
        Ok(self.apply_preset(preset))
    }

    pub fn apply_preset(&mut self, preset: GravityPreset) -> Vec2 {
        self.current = preset.vector();
        self.current
    }

    /// Nudge the horizontal component, clamped to ±max_tilt
    pub fn tilt(&mut self, delta: f32) -> Vec2 {
        self.current.x = (self.current.x + delta).clamp(-self.max_tilt, self.max_tilt);
        self.current
    }

    /// Multiply the vertical component (speed-up power-up)
    pub fn scale_vertical(&mut self, factor: f32) -> Vec2 {
        self.current.y *= factor;
        self.current
    }

    /// Undo [`Gravity::scale_vertical`] by dividing the vertical component
    pub fn unscale_vertical(&mut self, factor: f32) -> Vec2 {
        self.current.y /= factor;
        self.current
    }
}

//! RGB paint colors and weighted blending

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// An opaque 8-bit RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string (hex digits in either case)
    pub fn from_hex(s: &str) -> Result<Self, SimError> {
        let invalid = || SimError::InvalidColorFormat(s.to_string());

        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = SimError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// Blend two colors channel by channel.
///
/// `ratio` is the weight of `c1` (the mass fraction of the first particle in
/// a merge): `round(c1 * ratio + c2 * (1 - ratio))`, rounding half away from
/// zero. Ratios outside 0-1 are clamped; a non-finite ratio blends evenly.
pub fn blend(c1: Rgb, c2: Rgb, ratio: f32) -> Rgb {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.5
    };

    let mix = |a: u8, b: u8| -> u8 {
        let v = (a as f32 * ratio + b as f32 * (1.0 - ratio)).round();
        v.clamp(0.0, 255.0) as u8
    };

    Rgb::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b))
}

/// String form of [`blend`]: fails fast on malformed input
pub fn blend_hex(c1: &str, c2: &str, ratio: f32) -> Result<String, SimError> {
    Ok(blend(Rgb::from_hex(c1)?, Rgb::from_hex(c2)?, ratio).to_hex())
}

//! Gradient color ramps: map a noise value to a color.
//!
//! A ramp is a list of `(position, color)` stops sorted by position.
//! `color_at` interpolates between the two stops bracketing a value and
//! clamps to the end stops outside their range.

use serde::{Deserialize, Serialize};

use crate::color::{oklab_to_srgb, srgb_to_oklab, Srgb};
use crate::error::NoiseError;

/// One stop of a [`GradientColor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientPoint {
    pub position: f64,
    pub color: Srgb,
}

/// Space in which neighboring stops are blended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    #[default]
    Srgb,
    OkLab,
}

#[derive(Deserialize)]
struct RawGradient {
    points: Vec<GradientPoint>,
    #[serde(default)]
    space: ColorSpace,
}

impl TryFrom<RawGradient> for GradientColor {
    type Error = NoiseError;

    fn try_from(raw: RawGradient) -> Result<Self, Self::Error> {
        GradientColor::new(raw.points, raw.space)
    }
}

/// A color ramp with at least two stops at distinct, finite positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGradient")]
pub struct GradientColor {
    points: Vec<GradientPoint>,
    space: ColorSpace,
}

const NAMES: &[&str] = &["grayscale", "terrain", "ocean", "fire", "earth", "neon"];

impl GradientColor {
    /// Sorts `points` by position. Fewer than two stops, non-finite
    /// positions and repeated positions are rejected.
    pub fn new(mut points: Vec<GradientPoint>, space: ColorSpace) -> Result<Self, NoiseError> {
        if points.len() < 2 {
            return Err(NoiseError::InvalidGradient(format!(
                "at least 2 stops required, got {}",
                points.len()
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.position.is_finite()) {
            return Err(NoiseError::InvalidGradient(format!(
                "stop position {} is not finite",
                p.position
            )));
        }
        points.sort_by(|a, b| a.position.total_cmp(&b.position));
        if let Some(w) = points.windows(2).find(|w| w[0].position == w[1].position) {
            return Err(NoiseError::InvalidGradient(format!(
                "duplicate stop position {}",
                w[0].position
            )));
        }
        Ok(Self { points, space })
    }

    /// Builds a ramp from `(position, "#rrggbb")` pairs.
    pub fn from_hex(stops: &[(f64, &str)], space: ColorSpace) -> Result<Self, NoiseError> {
        let points = stops
            .iter()
            .map(|&(position, hex)| {
                Ok(GradientPoint {
                    position,
                    color: Srgb::from_hex(hex)?,
                })
            })
            .collect::<Result<Vec<_>, NoiseError>>()?;
        Self::new(points, space)
    }

    /// Built-in ramps; `stops` must already be sorted with distinct positions.
    fn builtin(stops: &[(f64, [u8; 3])], space: ColorSpace) -> Self {
        let points = stops
            .iter()
            .map(|&(position, [r, g, b])| GradientPoint {
                position,
                color: Srgb::from_rgb8(r, g, b),
            })
            .collect();
        Self { points, space }
    }

    /// Inserts a stop, keeping positions sorted and distinct.
    pub fn add_point(&mut self, position: f64, color: Srgb) -> Result<(), NoiseError> {
        if !position.is_finite() {
            return Err(NoiseError::InvalidGradient(format!(
                "stop position {position} is not finite"
            )));
        }
        let idx = self.points.partition_point(|p| p.position < position);
        if self.points.get(idx).is_some_and(|p| p.position == position) {
            return Err(NoiseError::InvalidGradient(format!(
                "duplicate stop position {position}"
            )));
        }
        self.points.insert(idx, GradientPoint { position, color });
        Ok(())
    }

    pub fn points(&self) -> &[GradientPoint] {
        &self.points
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn set_space(&mut self, space: ColorSpace) {
        self.space = space;
    }

    /// Position range covered by the stops.
    pub fn domain(&self) -> (f64, f64) {
        let first = self.points.first().map_or(0.0, |p| p.position);
        let last = self.points.last().map_or(0.0, |p| p.position);
        (first, last)
    }

    /// Color for `value`. NaN maps to the first stop.
    pub fn color_at(&self, value: f64) -> Srgb {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Srgb::BLACK;
        };
        if value.is_nan() || value <= first.position {
            return first.color;
        }
        if value >= last.position {
            return last.color;
        }
        let idx = self.points.partition_point(|p| p.position <= value);
        let (lo, hi) = (&self.points[idx - 1], &self.points[idx]);
        let t = (value - lo.position) / (hi.position - lo.position);
        match self.space {
            ColorSpace::Srgb => lo.color.lerp(hi.color, t),
            ColorSpace::OkLab => {
                let (a, b) = (srgb_to_oklab(lo.color), srgb_to_oklab(hi.color));
                oklab_to_srgb(crate::color::OkLab {
                    l: a.l + t * (b.l - a.l),
                    a: a.a + t * (b.a - a.a),
                    b: a.b + t * (b.b - a.b),
                })
            }
        }
    }

    // -- Built-in ramps --

    /// Black at -1 to white at 1.
    pub fn grayscale() -> Self {
        Self::builtin(&[(-1.0, [0, 0, 0]), (1.0, [255, 255, 255])], ColorSpace::Srgb)
    }

    /// Deep water through beaches and grass to snow, with sea level at 0.
    pub fn terrain() -> Self {
        Self::builtin(
            &[
                (-1.00, [0, 0, 128]),
                (-0.20, [32, 64, 128]),
                (-0.04, [64, 96, 192]),
                (-0.02, [192, 192, 128]),
                (0.00, [0, 192, 0]),
                (0.25, [192, 192, 0]),
                (0.50, [160, 96, 64]),
                (0.75, [128, 255, 255]),
                (1.00, [255, 255, 255]),
            ],
            ColorSpace::Srgb,
        )
    }

    /// Deep blues to cyan.
    pub fn ocean() -> Self {
        Self::builtin(
            &[
                (-1.0, [0x00, 0x1f, 0x3f]),
                (-0.5, [0x00, 0x33, 0x66]),
                (0.0, [0x00, 0x5f, 0x73]),
                (0.5, [0x0a, 0x93, 0x96]),
                (1.0, [0x94, 0xd2, 0xbd]),
            ],
            ColorSpace::OkLab,
        )
    }

    /// Reds, oranges, yellows.
    pub fn fire() -> Self {
        Self::builtin(
            &[
                (-1.0, [0x80, 0x00, 0x00]),
                (-0.5, [0xcc, 0x00, 0x00]),
                (0.0, [0xff, 0x45, 0x00]),
                (0.5, [0xff, 0x8c, 0x00]),
                (1.0, [0xff, 0xd7, 0x00]),
            ],
            ColorSpace::OkLab,
        )
    }

    /// Browns, greens, golds.
    pub fn earth() -> Self {
        Self::builtin(
            &[
                (-1.0, [0x5c, 0x40, 0x33]),
                (-0.5, [0x8b, 0x69, 0x14]),
                (0.0, [0x6b, 0x8e, 0x23]),
                (0.5, [0xda, 0xa5, 0x20]),
                (1.0, [0xd2, 0xb4, 0x8c]),
            ],
            ColorSpace::OkLab,
        )
    }

    /// Vibrant pinks, greens, yellows.
    pub fn neon() -> Self {
        Self::builtin(
            &[
                (-1.0, [0xff, 0x00, 0xff]),
                (-0.5, [0x00, 0xff, 0x41]),
                (0.0, [0xff, 0xff, 0x00]),
                (0.5, [0xff, 0x00, 0x80]),
                (1.0, [0x00, 0xff, 0xff]),
            ],
            ColorSpace::OkLab,
        )
    }

    /// Looks up a built-in ramp by name (case insensitive).
    pub fn from_name(name: &str) -> Result<Self, NoiseError> {
        match name.to_ascii_lowercase().as_str() {
            "grayscale" | "greyscale" => Ok(Self::grayscale()),
            "terrain" => Ok(Self::terrain()),
            "ocean" => Ok(Self::ocean()),
            "fire" => Ok(Self::fire()),
            "earth" => Ok(Self::earth()),
            "neon" => Ok(Self::neon()),
            _ => Err(NoiseError::Unknown {
                kind: "gradient",
                name: name.to_string(),
            }),
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        NAMES
    }
}

impl Default for GradientColor {
    fn default() -> Self {
        Self::grayscale()
    }
}

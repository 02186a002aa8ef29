//! Color types used by gradient ramps and renderers.
//!
//! Renderers work in `Srgb` with `f64` components in [0, 1]. Gradient ramps
//! may interpolate in OKLab instead, which keeps brightness even across
//! stops of very different hue.

use crate::error::NoiseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`, so the round trip through serde
/// quantizes to 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear RGB color (gamma-decoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// OKLab perceptual color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Parses `"#rrggbb"` or `"rrggbb"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Srgb, NoiseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(NoiseError::InvalidColor(format!(
                "expected 6 hex digits in {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| NoiseError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_rgb8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Channels clamped to [0, 1] and rounded to 8 bits.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Per-channel linear interpolation in sRGB space.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }

    /// Multiplies every channel by `factor`, clamping the result to [0, 1].
    pub fn scaled(self, factor: f64) -> Srgb {
        Srgb {
            r: (self.r * factor).clamp(0.0, 1.0),
            g: (self.g * factor).clamp(0.0, 1.0),
            b: (self.b * factor).clamp(0.0, 1.0),
        }
    }

    pub fn clamped(self) -> Srgb {
        self.scaled(1.0)
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

pub fn linear_to_oklab(c: LinearRgb) -> OkLab {
    let l_ = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
    let m_ = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
    let s_ = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;

    let (l_c, m_c, s_c) = (l_.cbrt(), m_.cbrt(), s_.cbrt());

    OkLab {
        l: 0.2104542553 * l_c + 0.7936177850 * m_c - 0.0040720468 * s_c,
        a: 1.9779984951 * l_c - 2.4285922050 * m_c + 0.4505937099 * s_c,
        b: 0.0259040371 * l_c + 0.7827717662 * m_c - 0.8086757660 * s_c,
    }
}

pub fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l_ = c.l + 0.3963377774 * c.a + 0.2158037573 * c.b;
    let m_ = c.l - 0.1055613458 * c.a - 0.0638541728 * c.b;
    let s_ = c.l - 0.0894841775 * c.a - 1.2914855480 * c.b;

    let (l, m, s) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

pub fn srgb_to_oklab(c: Srgb) -> OkLab {
    linear_to_oklab(srgb_to_linear(c))
}

/// OKLab back to sRGB, clamped into gamut.
pub fn oklab_to_srgb(c: OkLab) -> Srgb {
    linear_to_srgb(oklab_to_linear(c)).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn gamma_boundaries_are_continuous() {
        let below = srgb_component_to_linear(0.04045);
        let above = srgb_component_to_linear(0.04045 + 1e-9);
        assert!((below - above).abs() < 1e-6);
        let below = linear_component_to_srgb(0.0031308);
        let above = linear_component_to_srgb(0.0031308 + 1e-9);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn white_in_oklab_has_l_near_one_and_zero_chroma() {
        let lab = srgb_to_oklab(Srgb::WHITE);
        assert!((lab.l - 1.0).abs() < 1e-4, "L = {}", lab.l);
        assert!(lab.a.abs() < 1e-4 && lab.b.abs() < 1e-4);
    }

    #[test]
    fn oklab_round_trips_primaries() {
        for c in [
            Srgb::new(1.0, 0.0, 0.0),
            Srgb::new(0.0, 1.0, 0.0),
            Srgb::new(0.0, 0.0, 1.0),
            Srgb::new(0.5, 0.25, 0.75),
        ] {
            let back = oklab_to_srgb(srgb_to_oklab(c));
            assert!(
                approx_eq(back.r, c.r) && approx_eq(back.g, c.g) && approx_eq(back.b, c.b),
                "{c:?} -> {back:?}"
            );
        }
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Srgb::from_hex("#ff0000").unwrap(), Srgb::new(1.0, 0.0, 0.0));
        assert_eq!(Srgb::from_hex("00FF00").unwrap(), Srgb::new(0.0, 1.0, 0.0));
        assert!(matches!(Srgb::from_hex("#fff"), Err(NoiseError::InvalidColor(_))));
        assert!(matches!(Srgb::from_hex("#gg0000"), Err(NoiseError::InvalidColor(_))));
        assert!(Srgb::from_hex("#ff00é").is_err());
    }

    #[test]
    fn hex_output_clamps_and_rounds() {
        assert_eq!(Srgb::new(1.5, -0.2, 0.5).to_hex(), "#ff0080");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Srgb::from_rgb8(0x12, 0xab, 0xef)).unwrap();
        assert_eq!(json, "\"#12abef\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_rgb8(), [0x12, 0xab, 0xef]);
        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }

    #[test]
    fn scaled_clamps_channels() {
        let c = Srgb::new(0.6, 0.2, 0.0).scaled(2.0);
        assert_eq!(c, Srgb::new(1.0, 0.4, 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rgb8_round_trips(r: u8, g: u8, b: u8) {
                prop_assert_eq!(Srgb::from_rgb8(r, g, b).to_rgb8(), [r, g, b]);
            }

            #[test]
            fn lerp_endpoints(t in 0.0_f64..=1.0) {
                let a = Srgb::new(0.1, 0.2, 0.3);
                let b = Srgb::new(0.9, 0.8, 0.7);
                let m = a.lerp(b, t);
                prop_assert!(m.r >= a.r - 1e-12 && m.r <= b.r + 1e-12);
                prop_assert_eq!(a.lerp(b, 0.0), a);
            }
        }
    }
}
